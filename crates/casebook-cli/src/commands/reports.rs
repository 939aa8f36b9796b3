use casebook_core::case_number::{generate_case_number, DEFAULT_CASE_NUMBER_LEN};
use casebook_core::{format_crime_list, Casebook, CasebookError, NewReport, Report, ReportChanges};

use crate::app::AppContext;
use crate::cli::{
    DeleteArgs, ReportAddArgs, ReportEditArgs, ReportListArgs, ReportShowArgs, ReportSubcommand,
};
use crate::errors::CliError;
use crate::helpers::{
    confirm_delete, find_file, find_report, interactive, prompt_crimes, prompt_perpetrator,
    resolve_crimes,
};
use crate::ui::{
    blank_line, header, kv, print, print_json, short_id, single_line, truncate, validate_format,
    Column, OutputMode,
};

use super::{print_cancelled, print_listing, print_receipt, stamp};

pub fn handle_report(ctx: &AppContext, command: &ReportSubcommand) -> anyhow::Result<()> {
    match command {
        ReportSubcommand::Add(args) => handle_add(ctx, args),
        ReportSubcommand::List(args) => handle_list(ctx, args),
        ReportSubcommand::Show(args) => handle_show(ctx, args),
        ReportSubcommand::Edit(args) => handle_edit(ctx, args),
        ReportSubcommand::Delete(args) => handle_delete(ctx, args),
    }
}

fn handle_add(ctx: &AppContext, args: &ReportAddArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let prompts = interactive(args.no_input);

    let perpetrator = match &args.perpetrator {
        Some(name) => name.clone(),
        None if prompts => prompt_perpetrator(book.ledger().perpetrator_files())?,
        None => {
            return Err(CliError::invalid_input("A perpetrator is required")
                .with_hint("Pass --perpetrator <NAME>")
                .into())
        }
    };
    let crimes = if args.crimes.is_empty() && prompts {
        prompt_crimes(book.catalog())?
    } else {
        resolve_crimes(&book, &args.crimes)?
    };
    let case_number = args
        .case_number
        .clone()
        .unwrap_or_else(|| generate_case_number(DEFAULT_CASE_NUMBER_LEN));

    let new = NewReport::new(case_number, perpetrator, &args.report_type, crimes)
        .with_description(args.description.clone().unwrap_or_default());
    let report = book.create_report(new)?;
    tracing::info!(id = %report.id, case = %report.display_id, "report filed");

    let cost = report.cost()?;
    let file_totals = match report.linked_perpetrator_id {
        Some(file_id) => book
            .ledger()
            .get_perpetrator_file(file_id)
            .map(|f| format!("{} units, {} fine", f.total_detention_units, f.total_fine)),
        None => None,
    };
    print_receipt(
        ctx,
        "Filed report",
        &[
            ("ID", short_id(&report.id).as_str()),
            ("Case number", report.display_id.as_str()),
            ("Perpetrator", report.perpetrator_name.as_str()),
            ("Crimes", format_crime_list(&report.crimes).as_str()),
            ("Detention units", cost.detention_units.to_string().as_str()),
            ("Fine", cost.fine.to_string().as_str()),
            ("File totals", file_totals.as_deref().unwrap_or("-")),
        ],
    );
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &ReportListArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let ui = ctx.ui_context(&args.output);

    let mut reports: Vec<&Report> = match &args.perpetrator {
        Some(query) => {
            let file = find_file(&book, query)?;
            book.ledger().linked_reports(file.id)?
        }
        None => book.ledger().reports().iter().collect(),
    };
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if ui.mode.is_json() {
        return print_json(&reports);
    }

    let rows = reports
        .iter()
        .map(|report| -> anyhow::Result<Vec<String>> {
            let cost = report.cost()?;
            let id = if ui.mode.is_pretty() {
                short_id(&report.id)
            } else {
                report.id.to_string()
            };
            Ok(vec![
                id,
                report.display_id.clone(),
                stamp(ctx, &ui, &report.created_at)?,
                truncate(&single_line(&report.perpetrator_name), 30),
                report.report_type.clone(),
                cost.detention_units.to_string(),
                cost.fine.to_string(),
            ])
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let columns = [
        Column::new("ID"),
        Column::new("Case"),
        Column::new("Created"),
        Column::new("Perpetrator"),
        Column::new("Type"),
        Column::new("Units"),
        Column::new("Fine"),
    ];
    print_listing(&ui, "report list", &columns, &rows, "report");
    Ok(())
}

fn handle_show(ctx: &AppContext, args: &ReportShowArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let report = find_report(&book, &args.id)?;
    let ui = ctx.ui_context(&args.output);

    if ui.mode.is_json() {
        return print_json(report);
    }

    let cost = report.cost()?;
    if ui.mode == OutputMode::Pretty {
        print(&ui, &header(&ui, "report show", Some(report.display_id.as_str())));
        blank_line(&ui);
    }
    print(&ui, &kv(&ui, "ID", &report.id.to_string()));
    print(&ui, &kv(&ui, "Case number", &report.display_id));
    print(&ui, &kv(&ui, "Created", &stamp(ctx, &ui, &report.created_at)?));
    print(&ui, &kv(&ui, "Perpetrator", &linked_name(&book, report)));
    print(&ui, &kv(&ui, "Type", &report.report_type));
    print(&ui, &kv(&ui, "Crimes", &format_crime_list(&report.crimes)));
    print(&ui, &kv(&ui, "Detention units", &cost.detention_units.to_string()));
    print(&ui, &kv(&ui, "Fine", &cost.fine.to_string()));
    if !report.description.is_empty() {
        if ui.mode.is_pretty() {
            blank_line(&ui);
            print(&ui, &report.description);
        } else {
            print(&ui, &kv(&ui, "Description", &single_line(&report.description)));
        }
    }
    Ok(())
}

/// The perpetrator name, flagged when the report is not linked to a file.
fn linked_name(book: &Casebook, report: &Report) -> String {
    let linked = report
        .linked_perpetrator_id
        .and_then(|id| book.ledger().get_perpetrator_file(id))
        .is_some();
    if linked {
        report.perpetrator_name.clone()
    } else {
        format!("{} (no file)", report.perpetrator_name)
    }
}

fn handle_edit(ctx: &AppContext, args: &ReportEditArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let id = find_report(&book, &args.id)?.id;

    let mut changes = ReportChanges::new();
    if let Some(case_number) = &args.case_number {
        changes = changes.display_id(case_number);
    }
    if let Some(perpetrator) = &args.perpetrator {
        changes = changes.perpetrator_name(perpetrator);
    }
    if let Some(report_type) = &args.report_type {
        changes = changes.report_type(report_type);
    }
    if !args.crimes.is_empty() {
        changes = changes.crimes(resolve_crimes(&book, &args.crimes)?);
    }
    if let Some(description) = &args.description {
        changes = changes.description(description);
    }
    if changes.is_empty() {
        return Err(CliError::invalid_input("Nothing to change")
            .with_hint("Pass --case-number, --perpetrator, --type, --crime or --description")
            .into());
    }

    let report = book.edit_report(id, changes)?;
    tracing::info!(id = %report.id, "report updated");
    let cost = report.cost()?;
    print_receipt(
        ctx,
        "Updated report",
        &[
            ("ID", short_id(&report.id).as_str()),
            ("Case number", report.display_id.as_str()),
            ("Perpetrator", report.perpetrator_name.as_str()),
            ("Detention units", cost.detention_units.to_string().as_str()),
            ("Fine", cost.fine.to_string().as_str()),
        ],
    );
    Ok(())
}

fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let report = find_report(&book, &args.id)?;
    let (id, case_number) = (report.id, report.display_id.clone());

    let prompt = format!(
        "Delete report {}? Its penalties are removed from the perpetrator file.",
        case_number
    );
    if !confirm_delete(&prompt, args.force)? {
        print_cancelled(ctx);
        return Ok(());
    }

    book.delete_report(id)?
        .ok_or_else(|| CasebookError::NotFound(format!("report {}", id)))?;
    tracing::info!(%id, "report deleted");
    print_receipt(
        ctx,
        "Deleted report",
        &[
            ("ID", short_id(&id).as_str()),
            ("Case number", case_number.as_str()),
        ],
    );
    Ok(())
}
