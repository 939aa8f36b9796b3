//! Interactive prompts built on dialoguer.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};

use dialoguer::{Confirm, FuzzySelect, Input, MultiSelect};

use casebook_core::{Crime, CrimeCatalog, PerpetratorFile};

use crate::errors::CliError;

/// Prompts are shown only on a terminal and when not disabled.
pub fn interactive(no_input: bool) -> bool {
    !no_input && io::stdin().is_terminal()
}

pub fn prompt_text(prompt: &str, default: Option<&str>) -> anyhow::Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}

/// Ask before deleting; `force` skips the question. Non-interactive
/// sessions must pass `--force`.
pub fn confirm_delete(prompt: &str, force: bool) -> anyhow::Result<bool> {
    if force {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input("Refusing to delete without confirmation")
            .with_hint("Pass --force")
            .into());
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Fill every placeholder missing from `values`.
///
/// Interactive sessions are asked for each one, prefilled from `defaults`.
/// Otherwise the default is used when there is one and the placeholder is
/// left for the renderer to strip when there is not.
pub fn fill_placeholders(
    placeholders: &[String],
    defaults: &BTreeMap<String, String>,
    values: &mut BTreeMap<String, String>,
    interactive: bool,
) -> anyhow::Result<()> {
    for name in placeholders {
        if values.contains_key(name) {
            continue;
        }
        let default = defaults.get(name);
        if interactive {
            let mut input = Input::<String>::new()
                .with_prompt(name.as_str())
                .allow_empty(true);
            if let Some(default) = default {
                input = input.default(default.clone());
            }
            values.insert(name.clone(), input.interact_text()?);
        } else if let Some(default) = default {
            values.insert(name.clone(), default.clone());
        }
    }
    Ok(())
}

/// Pick an existing perpetrator or type a new name.
pub fn prompt_perpetrator(files: &[PerpetratorFile]) -> anyhow::Result<String> {
    if files.is_empty() {
        return prompt_text("Perpetrator", None);
    }
    let mut items: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    items.push("(new perpetrator)");
    let selection = FuzzySelect::new()
        .with_prompt("Perpetrator")
        .items(&items)
        .default(0)
        .interact()?;
    match files.get(selection) {
        Some(file) => Ok(file.name.clone()),
        None => prompt_text("Perpetrator", None),
    }
}

/// Multi-select crimes from the catalog.
pub fn prompt_crimes(catalog: &CrimeCatalog) -> anyhow::Result<Vec<Crime>> {
    let labels: Vec<String> = catalog.crimes().iter().map(Crime::display_name).collect();
    let selections = MultiSelect::new()
        .with_prompt("Crimes (space to select)")
        .items(&labels)
        .interact()?;
    Ok(selections
        .into_iter()
        .filter_map(|i| catalog.crimes().get(i).cloned())
        .collect())
}
