use casebook_core::{Crime, CrimeChanges};

use crate::app::AppContext;
use crate::cli::{CrimeAddArgs, CrimeEditArgs, CrimeListArgs, CrimeRemoveArgs, CrimeSubcommand};
use crate::errors::CliError;
use crate::helpers::{confirm_delete, find_crime};
use crate::ui::{print_json, validate_format, Column};

use super::{print_cancelled, print_listing, print_receipt};

pub fn handle_crime(ctx: &AppContext, command: &CrimeSubcommand) -> anyhow::Result<()> {
    match command {
        CrimeSubcommand::Add(args) => handle_add(ctx, args),
        CrimeSubcommand::List(args) => handle_list(ctx, args),
        CrimeSubcommand::Edit(args) => handle_edit(ctx, args),
        CrimeSubcommand::Remove(args) => handle_remove(ctx, args),
    }
}

fn crime_receipt(ctx: &AppContext, title: &str, crime: &Crime) {
    print_receipt(
        ctx,
        title,
        &[
            ("Crime", crime.display_name().as_str()),
            ("Detention units", crime.detention_units.to_string().as_str()),
            ("Fine", crime.fine.to_string().as_str()),
        ],
    );
}

fn handle_add(ctx: &AppContext, args: &CrimeAddArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let crime = book.add_crime(&args.name, &args.statute, args.detention_units, args.fine)?;
    crime_receipt(ctx, "Added crime", &crime);
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &CrimeListArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let ui = ctx.ui_context(&args.output);

    let crimes = match &args.filter {
        Some(filter) => book.catalog().search(filter),
        None => book.catalog().crimes().to_vec(),
    };

    if ui.mode.is_json() {
        return print_json(&crimes);
    }

    let rows: Vec<Vec<String>> = crimes
        .iter()
        .map(|crime| {
            vec![
                crime.name.clone(),
                crime.statute.clone(),
                crime.detention_units.to_string(),
                crime.fine.to_string(),
            ]
        })
        .collect();
    let columns = [
        Column::new("Name"),
        Column::new("Statute"),
        Column::new("Units"),
        Column::new("Fine"),
    ];
    print_listing(&ui, "crime list", &columns, &rows, "crime");
    Ok(())
}

fn handle_edit(ctx: &AppContext, args: &CrimeEditArgs) -> anyhow::Result<()> {
    let changes = CrimeChanges {
        name: args.name.clone(),
        statute: args.statute.clone(),
        detention_units: args.detention_units,
        fine: args.fine,
    };
    if changes.name.is_none()
        && changes.statute.is_none()
        && changes.detention_units.is_none()
        && changes.fine.is_none()
    {
        return Err(CliError::invalid_input("Nothing to change")
            .with_hint("Pass --name, --statute, --detention-units or --fine")
            .into());
    }

    let mut book = ctx.open_casebook()?;
    let key = find_crime(&book, &args.crime)?;
    let crime = book.edit_crime(&key, changes)?;
    crime_receipt(ctx, "Updated crime", &crime);
    Ok(())
}

fn handle_remove(ctx: &AppContext, args: &CrimeRemoveArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let key = find_crime(&book, &args.crime)?;

    let prompt = format!(
        "Remove '{}' from the catalog? Filed reports keep their copy.",
        key
    );
    if !confirm_delete(&prompt, args.force)? {
        print_cancelled(ctx);
        return Ok(());
    }

    let crime = book.remove_crime(&key)?;
    crime_receipt(ctx, "Removed crime", &crime);
    Ok(())
}
