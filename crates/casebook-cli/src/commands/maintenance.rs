use casebook_core::CasebookError;

use crate::app::AppContext;
use crate::cli::CheckArgs;
use crate::errors::CliError;
use crate::ui::print_json;

const REPAIR_HINT: &str = "Run `casebook check --repair` to recompute totals and links from the reports.";

pub fn handle_check(ctx: &AppContext, args: &CheckArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let unreadable: Vec<String> = book
        .load_issues()
        .iter()
        .filter(|issue| matches!(issue, CasebookError::CorruptData { .. }))
        .map(ToString::to_string)
        .collect();
    let issues: Vec<String> = book.verify().iter().map(ToString::to_string).collect();

    if !unreadable.is_empty() && args.repair {
        return Err(CliError::integrity_failed(
            "Cannot repair while documents are unreadable",
            "Restore the unreadable documents from a backup first.",
        )
        .into());
    }

    let repaired = if args.repair && !issues.is_empty() {
        let changed = book.rebuild_totals()?;
        tracing::info!(changed, "rebuilt totals and links");
        Some(changed)
    } else {
        None
    };
    let remaining: Vec<String> = match repaired {
        Some(_) => book.verify().iter().map(ToString::to_string).collect(),
        None => issues.clone(),
    };
    let ok = unreadable.is_empty() && remaining.is_empty();

    if args.json {
        let status = if ok { "ok" } else { "failed" };
        print_json(&serde_json::json!({
            "status": status,
            "reports": book.ledger().reports().len(),
            "perpetrator_files": book.ledger().perpetrator_files().len(),
            "unreadable": unreadable,
            "issues": issues,
            "repaired": repaired,
        }))?;
    } else if ok {
        if !ctx.quiet() {
            println!("Integrity check: OK");
            println!("- reports: {}", book.ledger().reports().len());
            println!(
                "- perpetrator files: {}",
                book.ledger().perpetrator_files().len()
            );
            if let Some(changed) = repaired {
                println!("- repaired: {} record(s)", changed);
                for issue in &issues {
                    println!("  - {}", issue);
                }
            }
        }
    } else {
        eprintln!("Integrity check: FAILED");
        for issue in unreadable.iter().chain(&remaining) {
            eprintln!("- {}", issue);
        }
    }

    if ok {
        return Ok(());
    }
    let hint = if unreadable.is_empty() {
        REPAIR_HINT
    } else {
        "Restore the unreadable documents from a backup."
    };
    Err(CliError::integrity_failed("Integrity check failed", hint).into())
}
