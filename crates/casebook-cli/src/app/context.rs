//! Application context for the Casebook CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local, Utc};
use once_cell::unsync::OnceCell;

use casebook_core::Casebook;

use crate::cli::{Cli, OutputArgs};
use crate::config::{read_config, CasebookConfig};
use crate::errors::CliError;
use crate::ui::{print_warning, UiContext};

use super::resolver::{missing_data_message, resolve_config_path, resolve_data_dir};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<CasebookConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists. Loaded on first use.
    pub fn config(&self) -> anyhow::Result<Option<&CasebookConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                read_config(&path).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(config.as_ref())
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli, self.config()?)
    }

    /// Open the data directory. It must exist; `casebook init` creates it.
    pub fn open_casebook(&self) -> anyhow::Result<Casebook> {
        let data_dir = self.data_dir()?;
        if !data_dir.is_dir() {
            return Err(
                CliError::not_found(missing_data_message(&data_dir), "casebook init").into(),
            );
        }
        tracing::info!(path = %data_dir.display(), "opening data directory");
        let casebook = Casebook::open_dir(&data_dir)?;

        if !casebook.load_issues().is_empty() {
            let ui = self.ui_context(&OutputArgs::default());
            for issue in casebook.load_issues() {
                print_warning(&ui, &issue.to_string());
            }
        }
        Ok(casebook)
    }

    pub fn ui_context(&self, output: &OutputArgs) -> UiContext {
        UiContext::from_env(
            output.json,
            output.format.as_deref(),
            self.cli.no_color,
            self.cli.ascii,
        )
    }

    /// Configured display timezone, if any.
    pub fn timezone(&self) -> anyhow::Result<Option<chrono_tz::Tz>> {
        let Some(name) = self.config()?.and_then(|c| c.ui.timezone.as_deref()) else {
            return Ok(None);
        };
        let tz = name
            .parse::<chrono_tz::Tz>()
            .map_err(|_| CliError::invalid_input(format!("Invalid timezone in config: {}", name)))?;
        Ok(Some(tz))
    }

    /// Current time in the display timezone (local time when unset).
    pub fn now(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        self.localize(&Utc::now())
    }

    /// Convert a stored timestamp to the display timezone.
    pub fn localize(&self, at: &DateTime<Utc>) -> anyhow::Result<DateTime<FixedOffset>> {
        Ok(match self.timezone()? {
            Some(tz) => at.with_timezone(&tz).fixed_offset(),
            None => at.with_timezone(&Local).fixed_offset(),
        })
    }
}
