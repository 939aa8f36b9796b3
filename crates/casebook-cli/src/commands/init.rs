use std::fs;
use std::path::PathBuf;

use dialoguer::Confirm;

use casebook_core::Casebook;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::{InitArgs, OutputArgs};
use crate::config::{default_data_dir, write_config, CasebookConfig};
use crate::constants::exit_codes;
use crate::errors::CliError;
use crate::helpers::{interactive, parse_timezone};
use crate::ui::{blank_line, hint, print, print_warning};

use super::{print_cancelled, print_receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}",
            config_path.display()
        ))
        .with_hint("Pass --force to overwrite it")
        .into());
    }

    let data_dir = match args.path.as_deref().or(ctx.cli().data_dir.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_data_dir()?,
    };
    let timezone = args
        .timezone
        .as_deref()
        .map(parse_timezone)
        .transpose()?
        .map(|tz| tz.name().to_string());

    if interactive(args.no_input) {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create casebook data at {}?", data_dir.display()))
            .default(true)
            .interact()?;
        if !confirmed {
            print_cancelled(ctx);
            return Ok(());
        }
    }

    fs::create_dir_all(&data_dir).map_err(|err| {
        CliError::new(
            format!("Failed to create {}: {}", data_dir.display(), err),
            exit_codes::STORAGE,
        )
    })?;
    let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

    // Opening seeds the crime catalog and presets.
    let book = Casebook::open_dir(&data_dir)?;
    let ui = ctx.ui_context(&OutputArgs::default());
    for issue in book.load_issues() {
        print_warning(&ui, &issue.to_string());
    }

    write_config(&config_path, &CasebookConfig::new(data_dir.clone(), timezone.clone()))?;
    tracing::info!(data = %data_dir.display(), config = %config_path.display(), "initialized");

    let data = data_dir.display().to_string();
    let config = config_path.display().to_string();
    let crimes = book.catalog().len().to_string();
    let presets = book.presets().presets().len().to_string();
    print_receipt(
        ctx,
        "Initialized casebook",
        &[
            ("Data", data.as_str()),
            ("Config", config.as_str()),
            ("Crimes", crimes.as_str()),
            ("Presets", presets.as_str()),
            ("Timezone", timezone.as_deref().unwrap_or("local")),
        ],
    );
    if !ctx.quiet() && ui.mode.is_pretty() {
        blank_line(&ui);
        print(
            &ui,
            &hint(&ui, "casebook report add -p <NAME> -c <CRIME>  \u{00B7}  casebook crime list"),
        );
    }
    Ok(())
}
