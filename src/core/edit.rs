//! Interactive edit loop for the nodes configuration.
//!
//! Drives fetch -> edit -> validate -> diff -> confirm -> apply against a
//! remote store, with retry handling for everything that can go wrong after
//! the initial fetch. The store, codec, external editor and operator prompts
//! sit behind traits so the whole loop can be scripted in tests.
//!
//! The baseline document is fetched once per session and never re-fetched:
//! every retry diffs against the same snapshot the operator first saw, and
//! version monotonicity of the outgoing write is guaranteed by
//! [`crate::core::reconcile::reconcile`]. Detecting concurrent external
//! writes is the remote store's job, not ours.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::cli::{AppContext, EditArgs};
use crate::core::diff::{self, DiffReport};
use crate::core::document::{ConfigDocument, Snapshot};
use crate::core::reconcile::reconcile;

/// Remote access to the authoritative encoded document.
pub trait DocumentStore {
    fn fetch(&mut self) -> Result<Vec<u8>>;
    fn write(&mut self, encoded: &[u8]) -> Result<()>;
}

/// Conversion between the wire form and the editable document.
pub trait DocumentCodec {
    fn decode(&self, encoded: &[u8]) -> Result<ConfigDocument>;
    fn encode(&self, document: &ConfigDocument) -> Result<Vec<u8>>;
}

/// Hands text to the operator's editor and returns the saved buffer.
pub trait EditorGateway {
    fn edit(&self, initial: &str) -> Result<String>;
}

/// Operator interaction at the confirm and retry gates.
pub trait Prompter {
    /// Present the final diff and ask what to do with it.
    fn decide(&mut self, diff: &DiffReport) -> Decision;

    /// Report a recoverable error and ask whether to try again.
    fn confirm_retry(&mut self, error: &EditError) -> bool;
}

/// Operator choice at the confirm step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Apply,
    EditAgain,
    Cancel,
}

/// Terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The reconciled document was written to the store.
    Applied,
    /// The session ended without a write.
    Cancelled,
}

/// Everything that can go wrong inside a session. Only a failed fetch is
/// fatal; the rest is reported and gated on a retry prompt.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("failed to fetch the current config: {0:#}")]
    Fetch(anyhow::Error),

    #[error("editor failed: {0:#}")]
    Editor(anyhow::Error),

    #[error("edited text is not a valid config document: {0}")]
    Parse(serde_json::Error),

    #[error("no changes detected")]
    NoChanges,

    #[error("error on serializing config: {0:#}")]
    Encode(anyhow::Error),

    #[error("error on overwriting config: {0:#}")]
    Write(anyhow::Error),
}

impl EditError {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EditError::Fetch(_))
    }
}

/// Transient state for one editing session.
///
/// `current_text` carries the operator's last saved buffer across retries, so
/// a parse error or a rejected write never costs them their work.
#[derive(Debug)]
pub struct EditSession {
    original: ConfigDocument,
    baseline: Snapshot,
    current_text: String,
    attempts: u32,
}

impl EditSession {
    fn new(original: ConfigDocument) -> Self {
        let baseline = original.snapshot();
        let current_text = baseline.as_str().to_owned();
        Self {
            original,
            baseline,
            current_text,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Result of one pass through the editing states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Applied,
    EditAgain,
    Cancelled,
}

/// Drives the edit state machine against its collaborators.
pub struct EditLoopController<S, C, E, P> {
    store: S,
    codec: C,
    editor: E,
    prompter: P,
    clock: fn() -> u64,
}

impl<S, C, E, P> EditLoopController<S, C, E, P>
where
    S: DocumentStore,
    C: DocumentCodec,
    E: EditorGateway,
    P: Prompter,
{
    pub fn new(store: S, codec: C, editor: E, prompter: P) -> Self {
        Self::with_clock(store, codec, editor, prompter, now_ms)
    }

    /// Like [`new`](Self::new), with an injected wall clock.
    pub fn with_clock(store: S, codec: C, editor: E, prompter: P, clock: fn() -> u64) -> Self {
        Self {
            store,
            codec,
            editor,
            prompter,
            clock,
        }
    }

    /// Run one session to a terminal state. There is no iteration cap; the
    /// loop runs until the operator applies, cancels, or declines a retry.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> Result<Outcome, EditError> {
        let raw = self.store.fetch().map_err(EditError::Fetch)?;
        let original = self.codec.decode(&raw).map_err(EditError::Fetch)?;
        let mut session = EditSession::new(original);

        loop {
            match self.attempt(&mut session) {
                Ok(Attempt::Applied) => return Ok(Outcome::Applied),
                Ok(Attempt::Cancelled) => return Ok(Outcome::Cancelled),
                Ok(Attempt::EditAgain) => continue,
                Err(error) if error.is_recoverable() => {
                    debug!(attempt = session.attempts, %error, "recoverable edit error");
                    if !self.prompter.confirm_retry(&error) {
                        return Ok(Outcome::Cancelled);
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// One pass through Editing -> Validating -> Confirming -> Applying.
    fn attempt(&mut self, session: &mut EditSession) -> Result<Attempt, EditError> {
        // Editing: hand the current buffer to the external editor. The buffer
        // only advances on a successful save, so an editor failure retries
        // with the text the operator last had.
        let saved = self
            .editor
            .edit(&session.current_text)
            .map_err(EditError::Editor)?;
        session.current_text = saved;
        session.attempts += 1;

        // Validating: parse, then reject a true no-op. The pre-reconciliation
        // diff is what catches "reopened and resaved unchanged" -- the forced
        // version bump must not count as a change.
        let edited = ConfigDocument::parse(&session.current_text).map_err(EditError::Parse)?;
        if !diff::unified(&session.baseline, &edited.snapshot()).has_changes() {
            return Err(EditError::NoChanges);
        }

        // Reconcile before rendering the final diff so the operator confirms
        // the exact bytes that will be written.
        let reconciled = reconcile(&session.original, edited, (self.clock)());
        let final_diff = diff::unified(&session.baseline, &reconciled.snapshot());
        debug!(
            attempt = session.attempts,
            diff_lines = final_diff.lines.len(),
            "confirming edit"
        );

        match self.prompter.decide(&final_diff) {
            Decision::EditAgain => Ok(Attempt::EditAgain),
            Decision::Cancel => Ok(Attempt::Cancelled),
            Decision::Apply => {
                // Encode fully before any write, so a shape violation can
                // never leave a partial write behind.
                let encoded = self.codec.encode(&reconciled).map_err(EditError::Encode)?;
                self.store.write(&encoded).map_err(EditError::Write)?;
                Ok(Attempt::Applied)
            }
        }
    }
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// `ncfg edit` entry point.
pub fn run(args: EditArgs, ctx: &AppContext) -> Result<()> {
    use crate::admin::client::AdminClient;
    use crate::admin::codec::WireCodec;
    use crate::infra::config::load_config;
    use crate::infra::editor::ExternalEditor;
    use crate::infra::term::{ConsolePrompter, print_success};

    let config = load_config()?;
    let client = AdminClient::connect(config.admin_options(ctx.addr.as_deref()))
        .context("connect to admin server")?;
    let editor = ExternalEditor::new(args.editor.or(config.editor.program));
    let prompter = ConsolePrompter::new(ctx);

    let mut controller = EditLoopController::new(client, WireCodec, editor, prompter);
    match controller.run()? {
        Outcome::Applied => print_success(ctx, "Successfully updated the config"),
        Outcome::Cancelled => {
            if !ctx.quiet {
                println!("No changes applied");
            }
        }
    }
    Ok(())
}
