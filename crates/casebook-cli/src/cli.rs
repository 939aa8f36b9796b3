use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use casebook_core::VERSION;

use crate::constants::DEFAULT_REPORT_TYPE;

/// Casebook - case records, perpetrator files and report templates
#[derive(Parser)]
#[command(name = "casebook")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the data directory
    #[arg(short, long, global = true, env = "CASEBOOK_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log progress to stderr (overridden by CASEBOOK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Output selection shared by listing and show commands
#[derive(Args, Clone, Default)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Data directory to create (defaults to $XDG_DATA_HOME/casebook)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Display timezone for dates and template defaults (IANA name)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// Recompute totals and links from the reports
    #[arg(long)]
    pub repair: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

// --- note ---

#[derive(Args)]
pub struct NoteAddArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Note text (prompted for when omitted)
    #[arg(long)]
    pub content: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct NoteShowArgs {
    /// Note ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct NoteEditArgs {
    /// Note ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New text
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Subcommand)]
pub enum NoteSubcommand {
    /// Add a note
    Add(NoteAddArgs),
    /// List notes, newest first
    List(OutputArgs),
    /// Show a note
    Show(NoteShowArgs),
    /// Edit a note
    Edit(NoteEditArgs),
    /// Delete a note
    Delete(DeleteArgs),
}

// --- report ---

#[derive(Args)]
pub struct ReportAddArgs {
    /// Case number (generated when omitted)
    #[arg(long = "case-number", value_name = "CASE")]
    pub case_number: Option<String>,

    /// Perpetrator name (a file is created if none exists)
    #[arg(short, long)]
    pub perpetrator: Option<String>,

    /// Report type
    #[arg(short = 't', long = "type", default_value = DEFAULT_REPORT_TYPE)]
    pub report_type: String,

    /// Crime from the catalog, as "Name" or "Name (Statute)" (repeatable)
    #[arg(short, long = "crime", value_name = "CRIME")]
    pub crimes: Vec<String>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct ReportListArgs {
    /// Only reports for this perpetrator (case-insensitive)
    #[arg(short, long)]
    pub perpetrator: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ReportShowArgs {
    /// Report ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ReportEditArgs {
    /// Report ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New case number
    #[arg(long = "case-number", value_name = "CASE")]
    pub case_number: Option<String>,

    /// New perpetrator name (moves the report to that file)
    #[arg(short, long)]
    pub perpetrator: Option<String>,

    /// New report type
    #[arg(short = 't', long = "type")]
    pub report_type: Option<String>,

    /// Replace the crime list (repeatable)
    #[arg(short, long = "crime", value_name = "CRIME")]
    pub crimes: Vec<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// File a report against a perpetrator
    Add(ReportAddArgs),
    /// List reports
    List(ReportListArgs),
    /// Show a report
    Show(ReportShowArgs),
    /// Edit a report (totals are rebalanced)
    Edit(ReportEditArgs),
    /// Delete a report (its penalties are removed from the file)
    Delete(DeleteArgs),
}

// --- file ---

#[derive(Args)]
pub struct FileAddArgs {
    /// Perpetrator name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Date of birth
    #[arg(long)]
    pub dob: Option<String>,

    /// Birthplace
    #[arg(long)]
    pub birthplace: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Image to attach (copied into the data directory)
    #[arg(long, value_name = "PATH")]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct FileShowArgs {
    /// File ID (UUID or prefix) or perpetrator name
    #[arg(value_name = "FILE")]
    pub file: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct FileEditArgs {
    /// File ID (UUID or prefix) or perpetrator name
    #[arg(value_name = "FILE")]
    pub file: String,

    /// New name (copied to linked reports)
    #[arg(long)]
    pub name: Option<String>,

    /// New date of birth
    #[arg(long)]
    pub dob: Option<String>,

    /// New birthplace
    #[arg(long)]
    pub birthplace: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// Replace the image
    #[arg(long, value_name = "PATH", conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the image
    #[arg(long)]
    pub clear_image: bool,
}

#[derive(Args)]
pub struct FileDeleteArgs {
    /// File ID (UUID or prefix) or perpetrator name
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum FileSubcommand {
    /// Create a perpetrator file
    Add(FileAddArgs),
    /// List perpetrator files
    List(OutputArgs),
    /// Show a perpetrator file with its linked reports
    Show(FileShowArgs),
    /// Edit a perpetrator file
    Edit(FileEditArgs),
    /// Delete a perpetrator file (reports are kept)
    Delete(FileDeleteArgs),
}

// --- crime ---

#[derive(Args)]
pub struct CrimeAddArgs {
    /// Crime name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Statute reference, e.g. "§ 242 StGB"
    #[arg(short, long, default_value = "")]
    pub statute: String,

    /// Detention units
    #[arg(short = 'u', long, default_value_t = 0)]
    pub detention_units: i64,

    /// Fine
    #[arg(short, long, default_value_t = 0)]
    pub fine: i64,
}

#[derive(Args)]
pub struct CrimeListArgs {
    /// Case-insensitive filter on name or statute
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct CrimeEditArgs {
    /// Crime as "Name" or "Name (Statute)"
    #[arg(value_name = "CRIME")]
    pub crime: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New statute reference
    #[arg(short, long)]
    pub statute: Option<String>,

    /// New detention units
    #[arg(short = 'u', long)]
    pub detention_units: Option<i64>,

    /// New fine
    #[arg(short, long)]
    pub fine: Option<i64>,
}

#[derive(Args)]
pub struct CrimeRemoveArgs {
    /// Crime as "Name" or "Name (Statute)"
    #[arg(value_name = "CRIME")]
    pub crime: String,

    /// Skip confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum CrimeSubcommand {
    /// Add a crime to the catalog
    Add(CrimeAddArgs),
    /// List or search the catalog
    List(CrimeListArgs),
    /// Edit a catalog crime (existing reports keep their copy)
    Edit(CrimeEditArgs),
    /// Remove a crime from the catalog
    Remove(CrimeRemoveArgs),
}

// --- preset ---

#[derive(Args)]
pub struct PresetAddArgs {
    /// Preset name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Template text with [placeholders]
    #[arg(long)]
    pub template: String,
}

#[derive(Args)]
pub struct PresetShowArgs {
    /// Preset ID (UUID or prefix) or name
    #[arg(value_name = "PRESET")]
    pub preset: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct PresetEditArgs {
    /// Preset ID (UUID or prefix) or name
    #[arg(value_name = "PRESET")]
    pub preset: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New template text
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct PresetDeleteArgs {
    /// Preset ID (UUID or prefix) or name
    #[arg(value_name = "PRESET")]
    pub preset: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct PresetGenerateArgs {
    /// Preset ID (UUID or prefix) or name
    #[arg(value_name = "PRESET")]
    pub preset: String,

    /// Placeholder value as KEY=VALUE (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub values: Vec<String>,

    /// Disable interactive prompts (unfilled placeholders are dropped)
    #[arg(long)]
    pub no_input: bool,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum PresetSubcommand {
    /// Add a report preset
    Add(PresetAddArgs),
    /// List report presets
    List(OutputArgs),
    /// Show a preset and its placeholders
    Show(PresetShowArgs),
    /// Edit a preset
    Edit(PresetEditArgs),
    /// Delete a preset
    Delete(PresetDeleteArgs),
    /// Fill in a preset and print the document
    Generate(PresetGenerateArgs),
}

/// Arguments for delete commands addressed by ID
#[derive(Args)]
pub struct DeleteArgs {
    /// ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and config
    Init(InitArgs),

    /// Free-text notes
    #[command(subcommand)]
    Note(NoteSubcommand),

    /// Incident reports
    #[command(subcommand)]
    Report(ReportSubcommand),

    /// Perpetrator files
    #[command(subcommand)]
    File(FileSubcommand),

    /// Crime catalog
    #[command(subcommand)]
    Crime(CrimeSubcommand),

    /// Report presets and document generation
    #[command(subcommand)]
    Preset(PresetSubcommand),

    /// Check that file totals and links match the reports
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_add() {
        let cli = Cli::try_parse_from([
            "casebook",
            "report",
            "add",
            "-p",
            "Max",
            "-c",
            "Raub",
            "-c",
            "Diebstahl (§ 242 StGB)",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(ReportSubcommand::Add(args)) => {
                assert_eq!(args.perpetrator.as_deref(), Some("Max"));
                assert_eq!(args.crimes.len(), 2);
                assert_eq!(args.report_type, "Anzeige");
            }
            _ => panic!("expected report add"),
        }
    }

    #[test]
    fn test_image_flags_conflict() {
        let result = Cli::try_parse_from([
            "casebook",
            "file",
            "edit",
            "Max",
            "--image",
            "a.png",
            "--clear-image",
        ]);
        assert!(result.is_err());
    }
}
