//! Rendering primitives for CLI output.

use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};
use serde::Serialize;

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Casebook · command (context)"
/// Plain mode: "casebook command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Casebook", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("casebook {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }
    lines.join("\n")
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Render a borderless table.
///
/// Plain mode drops the header and joins cells with tabs.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if ctx.mode.is_pretty() {
        let mut table = ComfyTable::new();
        table.load_preset(comfy_table::presets::NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(ctx.width.min(u16::MAX as usize) as u16);

        let header_cells: Vec<Cell> = columns
            .iter()
            .map(|c| {
                let mut cell = Cell::new(c.header);
                if ctx.color {
                    cell = cell.add_attribute(Attribute::Dim);
                }
                cell
            })
            .collect();
        table.set_header(header_cells);

        for i in 0..columns.len() {
            if let Some(column) = table.column_mut(i) {
                column.set_padding((0, 2));
            }
        }

        for row in rows {
            table.add_row(row);
        }

        table.to_string()
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print a message to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print a value as pretty JSON to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }
    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

/// Print a warning to stderr. Shown in every mode so JSON stdout stays clean.
pub fn print_warning(ctx: &UiContext, message: &str) {
    if ctx.mode.is_pretty() {
        eprintln!("{}", badge(ctx, Badge::Warn, message));
    } else {
        eprintln!("warning={}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header_modes() {
        let h = header(&pretty_ctx(), "report list", Some("3"));
        assert!(h.contains("Casebook"));
        assert!(h.contains("report list (3)"));
        assert_eq!(header(&plain_ctx(), "report list", None), "casebook report list");
    }

    #[test]
    fn test_kv_plain() {
        let line = kv(&plain_ctx(), "Detention Units", "40");
        assert_eq!(line, "detention_units=40");
    }

    #[test]
    fn test_kv_and_hint_pretty() {
        let ctx = pretty_ctx();
        assert_eq!(kv(&ctx, "Name", "Max"), "Name: Max");
        assert_eq!(hint(&ctx, "casebook init"), "Hint: casebook init");
    }

    #[test]
    fn test_receipt_plain() {
        let r = receipt(&plain_ctx(), "Added report", &[("ID", "7a2e3c0b"), ("Case", "AB12")]);
        assert!(r.starts_with("status=ok"));
        assert!(r.contains("id=7a2e3c0b"));
        assert!(r.contains("case=AB12"));
    }

    #[test]
    fn test_receipt_pretty() {
        let r = receipt(&pretty_ctx(), "Added report", &[("ID", "7a2e3c0b")]);
        assert!(r.contains("[\u{2713}] Added report"));
        assert!(r.contains("  ID: 7a2e3c0b"));
    }

    #[test]
    fn test_simple_table_plain_is_tab_separated() {
        let columns = [Column::new("ID"), Column::new("Name")];
        let rows = vec![
            vec!["a1".to_string(), "Max Mustermann".to_string()],
            vec!["b2".to_string(), "Erika".to_string()],
        ];
        let t = simple_table(&plain_ctx(), &columns, &rows);
        assert_eq!(t, "a1\tMax Mustermann\nb2\tErika");
    }

    #[test]
    fn test_simple_table_pretty_has_headers() {
        let columns = [Column::new("ID"), Column::new("Name")];
        let rows = vec![vec!["a1".to_string(), "Max".to_string()]];
        let t = simple_table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("ID"));
        assert!(t.contains("Name"));
        assert!(t.contains("Max"));
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&pretty_ctx(), "Not found: report", Some("casebook report list"));
        assert!(e.contains("[\u{2717}] Not found: report"));
        assert!(e.contains("Hint: casebook report list"));

        let e = error_message(&plain_ctx(), "boom", None);
        assert_eq!(e, "error=boom");
    }
}
