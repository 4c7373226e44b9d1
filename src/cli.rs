use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,            // global --quiet
    pub no_color: bool,         // global --no-color
    pub addr: Option<String>,   // global --addr override
}

#[derive(Parser)]
#[command(name = "ncfg")]
#[command(
    about = "A safety-checked CLI for viewing and editing a cluster's versioned nodes configuration"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Admin server address (host:port); overrides the config file
    #[arg(long, global = true, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current nodes configuration
    Show,

    /// Edit the nodes configuration in a text editor, with a diff-and-confirm
    /// step before anything is written back
    Edit(EditArgs),

    /// Finalize initial cluster setup with a metadata replication property
    Bootstrap(BootstrapArgs),

    /// Remove drained, dead nodes from the configuration
    Shrink(ShrinkArgs),

    /// Initialize a nodecfg.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser)]
pub struct EditArgs {
    /// Editor program (default: config file, then $EDITOR, then nano)
    #[arg(long)]
    pub editor: Option<String>,
}

#[derive(Parser)]
pub struct BootstrapArgs {
    /// Replication factors for metadata logs at various scopes
    /// (e.g. rack=2 or rack=3,region=2), repeatable
    #[arg(
        long = "replicate-across",
        value_name = "SCOPE=FACTOR",
        required = true,
        value_delimiter = ','
    )]
    pub replicate_across: Vec<String>,
}

#[derive(Parser)]
pub struct ShrinkArgs {
    /// Node indexes to remove from the configuration
    #[arg(value_name = "NODE_INDEX", required = true)]
    pub node_indexes: Vec<u64>,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
