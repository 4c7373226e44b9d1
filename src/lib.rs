//! **nodecfg** - Safety-checked CLI for a cluster's versioned nodes configuration
//!
//! Interactive edit-validate-diff-confirm-apply workflow against a remote
//! admin server, with version reconciliation so one operator's write never
//! silently reuses the version another operator already read.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core editing workflow - documents, diffs, reconciliation, the edit loop
pub mod core {
    /// Versioned config document and deterministic snapshot rendering
    pub mod document;
    pub use self::document::{ConfigDocument, Snapshot};

    /// Unified line diffs between snapshots
    pub mod diff;
    pub use self::diff::{DiffReport, unified};

    /// Version/timestamp reconciliation applied before the final diff
    pub mod reconcile;
    pub use self::reconcile::reconcile;

    /// Interactive edit loop state machine
    pub mod edit;
    pub use self::edit::{Decision, EditError, EditLoopController, Outcome, run as edit_run};

    /// Pretty-print the current configuration
    pub mod show;
    pub use self::show::run as show_run;

    /// Cluster membership one-shots: bootstrap and shrink
    pub mod membership;
    pub use self::membership::{run_bootstrap as bootstrap_run, run_shrink as shrink_run};
}

/// Admin server access - wire types, codec, blocking client
pub mod admin {
    /// Protocol requests and responses, location scopes, capabilities
    pub mod types;
    pub use self::types::{Capabilities, LocationScope, ReplicationProperty};

    /// Canonical wire form of the config document
    pub mod codec;
    pub use self::codec::WireCodec;

    /// Newline-delimited JSON client with fixed timeouts
    pub mod client;
    pub use self::client::{AdminClient, AdminOptions};
}

/// Infrastructure - configuration, editor hand-off, console I/O
pub mod infra {
    /// Layered tool configuration with TOML and env support
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// External editor gateway over a temp file
    pub mod editor;
    pub use self::editor::ExternalEditor;

    /// Colored output and interactive prompts
    pub mod term;
    pub use self::term::ConsolePrompter;
}

// Strategic re-exports for clean CLI interface
pub use self::admin::{AdminClient, AdminOptions, LocationScope, ReplicationProperty};
pub use self::cli::{AppContext, Cli, Commands};
pub use self::core::{ConfigDocument, DiffReport, Snapshot};
pub use self::infra::{Config, load_config};
