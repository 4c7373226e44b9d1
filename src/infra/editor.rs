//! External editor hand-off through a temporary file.
//!
//! The buffer is written to a `.json` temp file, the operator's editor runs
//! on it, and the saved contents come back. A non-zero editor exit aborts
//! the attempt.

use std::io::{self, Write};
use std::process::{Command, ExitStatus};
use std::{env, fs};

use anyhow::Result;
use tracing::debug;

use crate::core::edit::EditorGateway;

const FALLBACK_EDITOR: &str = "nano";

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to launch editor {program:?}: {source}")]
    Launch { program: String, source: io::Error },

    #[error("editor {program:?} exited with {status}")]
    NonZeroExit { program: String, status: ExitStatus },

    #[error("editor buffer error: {0}")]
    Io(#[from] io::Error),
}

/// Launches the operator's editor on a temp file seeded with the given text.
#[derive(Debug, Clone, Default)]
pub struct ExternalEditor {
    program: Option<String>,
}

impl ExternalEditor {
    /// `program` overrides `$EDITOR`; both fall back to `nano`.
    pub fn new(program: Option<String>) -> Self {
        Self { program }
    }

    fn resolve_program(&self) -> String {
        self.program
            .clone()
            .or_else(|| env::var("EDITOR").ok().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| FALLBACK_EDITOR.to_owned())
    }

    pub fn edit_text(&self, initial: &str) -> Result<String, EditorError> {
        let mut file = tempfile::Builder::new()
            .prefix("nodes-config.")
            .suffix(".json")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        let program = self.resolve_program();
        debug!(%program, path = %file.path().display(), "launching editor");
        let status = Command::new(&program)
            .arg(file.path())
            .status()
            .map_err(|source| EditorError::Launch {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EditorError::NonZeroExit { program, status });
        }

        Ok(fs::read_to_string(file.path())?)
    }
}

impl EditorGateway for ExternalEditor {
    fn edit(&self, initial: &str) -> Result<String> {
        Ok(self.edit_text(initial)?)
    }
}
