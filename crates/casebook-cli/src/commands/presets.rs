use std::fs;

use casebook_core::template::{form_defaults, unique_placeholders};
use casebook_core::PresetChanges;

use crate::app::AppContext;
use crate::cli::{
    OutputArgs, PresetAddArgs, PresetDeleteArgs, PresetEditArgs, PresetGenerateArgs,
    PresetShowArgs, PresetSubcommand,
};
use crate::constants::exit_codes;
use crate::errors::CliError;
use crate::helpers::{confirm_delete, fill_placeholders, find_preset, interactive, parse_key_values};
use crate::ui::{
    blank_line, header, kv, print, print_json, short_id, single_line, truncate, validate_format,
    Column, OutputMode,
};

use super::{print_cancelled, print_listing, print_receipt};

pub fn handle_preset(ctx: &AppContext, command: &PresetSubcommand) -> anyhow::Result<()> {
    match command {
        PresetSubcommand::Add(args) => handle_add(ctx, args),
        PresetSubcommand::List(args) => handle_list(ctx, args),
        PresetSubcommand::Show(args) => handle_show(ctx, args),
        PresetSubcommand::Edit(args) => handle_edit(ctx, args),
        PresetSubcommand::Delete(args) => handle_delete(ctx, args),
        PresetSubcommand::Generate(args) => handle_generate(ctx, args),
    }
}

fn handle_add(ctx: &AppContext, args: &PresetAddArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let preset = book.add_preset(&args.name, &args.template)?;
    let placeholders = unique_placeholders(&preset.template).join(", ");
    print_receipt(
        ctx,
        "Added preset",
        &[
            ("ID", short_id(&preset.id).as_str()),
            ("Name", preset.name.as_str()),
            ("Placeholders", placeholders.as_str()),
        ],
    );
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &OutputArgs) -> anyhow::Result<()> {
    validate_format(args.format.as_deref(), args.json)?;
    let book = ctx.open_casebook()?;
    let ui = ctx.ui_context(args);
    let presets = book.presets().presets();

    if ui.mode.is_json() {
        return print_json(presets);
    }

    let rows: Vec<Vec<String>> = presets
        .iter()
        .map(|preset| {
            let id = if ui.mode.is_pretty() {
                short_id(&preset.id)
            } else {
                preset.id.to_string()
            };
            vec![
                id,
                truncate(&single_line(&preset.name), 40),
                unique_placeholders(&preset.template).len().to_string(),
            ]
        })
        .collect();
    let columns = [
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Placeholders"),
    ];
    print_listing(&ui, "preset list", &columns, &rows, "preset");
    Ok(())
}

fn handle_show(ctx: &AppContext, args: &PresetShowArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let preset = find_preset(&book, &args.preset)?;
    let ui = ctx.ui_context(&args.output);
    let placeholders = unique_placeholders(&preset.template);

    match ui.mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "id": preset.id,
            "name": preset.name,
            "template": preset.template,
            "placeholders": placeholders,
        }))?,
        OutputMode::Pretty => {
            print(&ui, &header(&ui, "preset show", Some(preset.name.as_str())));
            blank_line(&ui);
            print(&ui, &kv(&ui, "ID", &preset.id.to_string()));
            print(&ui, &kv(&ui, "Placeholders", &placeholders.join(", ")));
            blank_line(&ui);
            print(&ui, &preset.template);
        }
        OutputMode::Plain => {
            print(&ui, &kv(&ui, "ID", &preset.id.to_string()));
            print(&ui, &kv(&ui, "Name", &preset.name));
            print(&ui, &kv(&ui, "Placeholders", &placeholders.join(",")));
            print(&ui, &kv(&ui, "Template", &single_line(&preset.template)));
        }
    }
    Ok(())
}

fn handle_edit(ctx: &AppContext, args: &PresetEditArgs) -> anyhow::Result<()> {
    if args.name.is_none() && args.template.is_none() {
        return Err(CliError::invalid_input("Nothing to change")
            .with_hint("Pass --name or --template")
            .into());
    }
    let mut book = ctx.open_casebook()?;
    let id = find_preset(&book, &args.preset)?.id;
    let preset = book.edit_preset(
        id,
        PresetChanges {
            name: args.name.clone(),
            template: args.template.clone(),
        },
    )?;
    print_receipt(
        ctx,
        "Updated preset",
        &[
            ("ID", short_id(&preset.id).as_str()),
            ("Name", preset.name.as_str()),
        ],
    );
    Ok(())
}

fn handle_delete(ctx: &AppContext, args: &PresetDeleteArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let preset = find_preset(&book, &args.preset)?;
    let (id, name) = (preset.id, preset.name.clone());

    if !confirm_delete(&format!("Delete preset '{}'?", name), args.force)? {
        print_cancelled(ctx);
        return Ok(());
    }

    book.delete_preset(id)?;
    print_receipt(
        ctx,
        "Deleted preset",
        &[("ID", short_id(&id).as_str()), ("Name", name.as_str())],
    );
    Ok(())
}

fn handle_generate(ctx: &AppContext, args: &PresetGenerateArgs) -> anyhow::Result<()> {
    let book = ctx.open_casebook()?;
    let preset = find_preset(&book, &args.preset)?;

    let placeholders = unique_placeholders(&preset.template);
    let mut values = parse_key_values(&args.values)?;
    for key in values.keys() {
        if !placeholders.contains(key) {
            tracing::warn!(placeholder = %key, preset = %preset.name, "value for unknown placeholder");
        }
    }
    let defaults = form_defaults(&placeholders, &ctx.now()?);
    fill_placeholders(
        &placeholders,
        &defaults,
        &mut values,
        interactive(args.no_input),
    )?;

    let document = book.generate(preset.id, &values)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &document).map_err(|err| {
                CliError::new(
                    format!("Failed to write {}: {}", path, err),
                    exit_codes::STORAGE,
                )
            })?;
            print_receipt(
                ctx,
                "Generated document",
                &[("Preset", preset.name.as_str()), ("Path", path.as_str())],
            );
        }
        None => println!("{}", document),
    }
    Ok(())
}
