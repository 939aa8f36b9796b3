use std::path::Path;

use casebook_core::{Casebook, ImageChange, NewPerpetratorFile, PerpetratorFileChanges};

use crate::app::AppContext;
use crate::cli::{
    FileAddArgs, FileDeleteArgs, FileEditArgs, FileShowArgs, FileSubcommand, OutputArgs,
};
use crate::errors::CliError;
use crate::helpers::{confirm_delete, find_file};
use crate::ui::{
    blank_line, header, kv, or_dash, print, print_json, short_id, simple_table, single_line, truncate,
    validate_format, Column, OutputMode,
};

use super::{print_cancelled, print_listing, print_receipt, stamp};

pub fn handle_file(ctx: &AppContext, command: &FileSubcommand) -> anyhow::Result<()> {
    match command {
        FileSubcommand::Add(args) => handle_add(ctx, args),
        FileSubcommand::List(args) => handle_list(ctx, args),
        FileSubcommand::Show(args) => handle_show(ctx, args),
        FileSubcommand::Edit(args) => handle_edit(ctx, args),
        FileSubcommand::Delete(args) => handle_delete(ctx, args),
    }
}

/// Copy an image into the data directory, returning its reference.
fn import_image(book: &Casebook, source: &str) -> anyhow::Result<String> {
    let image_ref = book.import_image(Path::new(source))?;
    tracing::info!(source = %source, image = %image_ref, "image imported");
    Ok(image_ref)
}

/// Remove an image imported for a change that was then rejected.
fn discard_import(book: &Casebook, image_ref: &str) {
    if let Err(err) = book.images().remove(image_ref) {
        tracing::warn!(image = %image_ref, error = %err, "failed to remove unused image");
    }
}

fn handle_add(ctx: &AppContext, args: &FileAddArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;

    let mut new = NewPerpetratorFile::new(&args.name);
    if let Some(dob) = &args.dob {
        new = new.with_date_of_birth(dob);
    }
    if let Some(birthplace) = &args.birthplace {
        new = new.with_birthplace(birthplace);
    }
    if let Some(description) = &args.description {
        new = new.with_description(description);
    }
    let imported = match &args.image {
        Some(source) => Some(import_image(&book, source)?),
        None => None,
    };
    if let Some(image_ref) = &imported {
        new = new.with_image_ref(image_ref);
    }

    let file = match book.create_perpetrator_file(new) {
        Ok(file) => file,
        Err(err) => {
            if let Some(image_ref) = &imported {
                if err.is_user_error() {
                    discard_import(&book, image_ref);
                }
            }
            return Err(err.into());
        }
    };
    tracing::info!(id = %file.id, "perpetrator file created");
    print_receipt(
        ctx,
        "Created perpetrator file",
        &[
            ("ID", short_id(&file.id).as_str()),
            ("Name", file.name.as_str()),
        ],
    );
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &OutputArgs) -> anyhow::Result<()> {
    validate_format(args.format.as_deref(), args.json)?;
    let book = ctx.open_casebook()?;
    let ui = ctx.ui_context(args);
    let files = book.ledger().perpetrator_files();

    if ui.mode.is_json() {
        return print_json(files);
    }

    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|file| {
            let id = if ui.mode.is_pretty() {
                short_id(&file.id)
            } else {
                file.id.to_string()
            };
            vec![
                id,
                truncate(&single_line(&file.name), 30),
                file.date_of_birth.clone(),
                file.linked_report_ids.len().to_string(),
                file.total_detention_units.to_string(),
                file.total_fine.to_string(),
            ]
        })
        .collect();

    let columns = [
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Born"),
        Column::new("Reports"),
        Column::new("Units"),
        Column::new("Fine"),
    ];
    print_listing(&ui, "file list", &columns, &rows, "perpetrator file");
    Ok(())
}

fn handle_show(ctx: &AppContext, args: &FileShowArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let file = find_file(&book, &args.file)?;
    let reports = book.ledger().linked_reports(file.id)?;
    let ui = ctx.ui_context(&args.output);

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "file": file,
            "reports": reports,
        }));
    }

    if ui.mode == OutputMode::Pretty {
        print(&ui, &header(&ui, "file show", Some(file.name.as_str())));
        blank_line(&ui);
    }
    print(&ui, &kv(&ui, "ID", &file.id.to_string()));
    print(&ui, &kv(&ui, "Name", &file.name));
    print(&ui, &kv(&ui, "Date of birth", or_dash(&file.date_of_birth)));
    print(&ui, &kv(&ui, "Birthplace", or_dash(&file.birthplace)));
    if let Some(image_ref) = &file.image_ref {
        let shown = match book.images().path(image_ref) {
            Ok(path) => path.display().to_string(),
            Err(_) => format!("{} (invalid)", image_ref),
        };
        print(&ui, &kv(&ui, "Image", &shown));
    }
    print(&ui, &kv(&ui, "Created", &stamp(ctx, &ui, &file.created_at)?));
    print(&ui, &kv(&ui, "Detention units", &file.total_detention_units.to_string()));
    print(&ui, &kv(&ui, "Fine", &file.total_fine.to_string()));
    print(&ui, &kv(&ui, "Reports", &reports.len().to_string()));

    if ui.mode.is_pretty() {
        if !file.description.is_empty() {
            blank_line(&ui);
            print(&ui, &file.description);
        }
        if !reports.is_empty() {
            blank_line(&ui);
            let columns = [
                Column::new("ID"),
                Column::new("Case"),
                Column::new("Created"),
                Column::new("Type"),
                Column::new("Crimes"),
            ];
            let rows = reports
                .iter()
                .map(|report| -> anyhow::Result<Vec<String>> {
                    Ok(vec![
                        short_id(&report.id),
                        report.display_id.clone(),
                        stamp(ctx, &ui, &report.created_at)?,
                        report.report_type.clone(),
                        report.crimes.len().to_string(),
                    ])
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            print(&ui, &simple_table(&ui, &columns, &rows));
        }
    } else {
        print(&ui, &kv(&ui, "Description", &single_line(&file.description)));
        for report in &reports {
            print(&ui, &kv(&ui, "Report", &report.id.to_string()));
        }
    }
    Ok(())
}

fn handle_edit(ctx: &AppContext, args: &FileEditArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let id = find_file(&book, &args.file)?.id;

    let mut changes = PerpetratorFileChanges::new();
    if let Some(name) = &args.name {
        changes = changes.name(name);
    }
    if let Some(dob) = &args.dob {
        changes = changes.date_of_birth(dob);
    }
    if let Some(birthplace) = &args.birthplace {
        changes = changes.birthplace(birthplace);
    }
    if let Some(description) = &args.description {
        changes = changes.description(description);
    }
    if args.clear_image {
        changes = changes.image(ImageChange::Clear);
    }
    if changes.is_empty() && args.image.is_none() {
        return Err(CliError::invalid_input("Nothing to change")
            .with_hint("Pass --name, --dob, --birthplace, --description, --image or --clear-image")
            .into());
    }

    let imported = match &args.image {
        Some(source) => Some(import_image(&book, source)?),
        None => None,
    };
    if let Some(image_ref) = &imported {
        changes = changes.image(ImageChange::Replace(image_ref.clone()));
    }

    let file = match book.edit_perpetrator_file(id, changes) {
        Ok(file) => file,
        Err(err) => {
            if let Some(image_ref) = &imported {
                if err.is_user_error() {
                    discard_import(&book, image_ref);
                }
            }
            return Err(err.into());
        }
    };
    tracing::info!(id = %file.id, "perpetrator file updated");
    print_receipt(
        ctx,
        "Updated perpetrator file",
        &[
            ("ID", short_id(&file.id).as_str()),
            ("Name", file.name.as_str()),
        ],
    );
    Ok(())
}

fn handle_delete(ctx: &AppContext, args: &FileDeleteArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let file = find_file(&book, &args.file)?;
    let (id, name) = (file.id, file.name.clone());
    let report_count = file.linked_report_ids.len();

    let prompt = format!(
        "Delete perpetrator file '{}'? Its {} report(s) are kept.",
        name, report_count
    );
    if !confirm_delete(&prompt, args.force)? {
        print_cancelled(ctx);
        return Ok(());
    }

    book.delete_perpetrator_file(id)?;
    tracing::info!(%id, "perpetrator file deleted");
    print_receipt(
        ctx,
        "Deleted perpetrator file",
        &[("ID", short_id(&id).as_str()), ("Name", name.as_str())],
    );
    Ok(())
}
