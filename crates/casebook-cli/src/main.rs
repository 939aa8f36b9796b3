//! Casebook CLI - case records, perpetrator files and report templates
//!
//! Command-line front end for `casebook-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, OutputArgs};
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV, VERBOSE_LOG_FILTER};
use crate::errors::describe_error;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let ctx = AppContext::new(&cli);
    if let Err(err) = run(&ctx) {
        tracing::debug!(error = ?err, "command failed");
        let (message, hint, code) = describe_error(&err);
        let ui = ctx.ui_context(&OutputArgs::default());
        print_error(&ui, &message, hint.as_deref());
        std::process::exit(code);
    }
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &AppContext) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Commands::Init(args) => commands::init::handle_init(ctx, args),
        Commands::Note(command) => commands::notes::handle_note(ctx, command),
        Commands::Report(command) => commands::reports::handle_report(ctx, command),
        Commands::File(command) => commands::files::handle_file(ctx, command),
        Commands::Crime(command) => commands::crimes::handle_crime(ctx, command),
        Commands::Preset(command) => commands::presets::handle_preset(ctx, command),
        Commands::Check(args) => commands::maintenance::handle_check(ctx, args),
        Commands::Completions(args) => commands::misc::handle_completions(args),
    }
}
