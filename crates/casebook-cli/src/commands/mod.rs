//! Command handlers, one module per command group.

pub mod crimes;
pub mod files;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod notes;
pub mod presets;
pub mod reports;

use chrono::{DateTime, Utc};

use crate::app::AppContext;
use crate::cli::OutputArgs;
use crate::ui::{
    badge, blank_line, format_datetime, header, hint, print, receipt, simple_table, Badge, Column,
    OutputMode, UiContext,
};

/// Print an action receipt unless `--quiet`.
pub(crate) fn print_receipt(ctx: &AppContext, title: &str, items: &[(&str, &str)]) {
    if ctx.quiet() {
        return;
    }
    let ui = ctx.ui_context(&OutputArgs::default());
    print(&ui, &receipt(&ui, title, items));
}

pub(crate) fn print_cancelled(ctx: &AppContext) {
    if ctx.quiet() {
        return;
    }
    let ui = ctx.ui_context(&OutputArgs::default());
    match ui.mode {
        OutputMode::Pretty => print(&ui, &badge(&ui, Badge::Info, "Cancelled")),
        OutputMode::Plain | OutputMode::Json => println!("status=cancelled"),
    }
}

/// Render a listing: header, table and a count in pretty mode; bare rows
/// in plain mode.
pub(crate) fn print_listing(
    ui: &UiContext,
    command: &str,
    columns: &[Column],
    rows: &[Vec<String>],
    noun: &str,
) {
    match ui.mode {
        OutputMode::Pretty => {
            print(ui, &header(ui, command, None));
            blank_line(ui);
            if rows.is_empty() {
                print(ui, &hint(ui, &format!("No {}s found.", noun)));
                return;
            }
            print(ui, &simple_table(ui, columns, rows));
            blank_line(ui);
            let plural = if rows.len() == 1 { "" } else { "s" };
            print(ui, &hint(ui, &format!("{} {}{}", rows.len(), noun, plural)));
        }
        OutputMode::Plain => {
            if rows.is_empty() {
                println!("count=0");
            } else {
                print(ui, &simple_table(ui, columns, rows));
            }
        }
        OutputMode::Json => {}
    }
}

/// A stored timestamp in the display timezone.
pub(crate) fn stamp(ctx: &AppContext, ui: &UiContext, at: &DateTime<Utc>) -> anyhow::Result<String> {
    Ok(format_datetime(&ctx.localize(at)?, ui.mode.is_pretty()))
}
