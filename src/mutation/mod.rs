//! Create, update and delete against the content API.
//!
//! A mutation never edits the local collection. Its only state-changing
//! effect is a full reload once the server has accepted it.

pub mod deletion;
pub mod form;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{FolioError, Result};
use crate::record::Kind;
use crate::remote::{ContentApi, cancellable};
use crate::sync::ListSynchronizer;

pub use deletion::{DeletionGuard, DeletionSet};
pub use form::{ProjectForm, PublicationForm, RecordForm, filename_from_pathname};

/// Submission state of an editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What an editor submits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { pathname: String },
}

/// A create or edit form and its submission state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub mode: EditorMode,
    pub form: RecordForm,
    pub status: SubmitStatus,
    pub open: bool,
}

impl Editor {
    pub fn create(kind: Kind) -> Self {
        Self {
            mode: EditorMode::Create,
            form: RecordForm::empty(kind),
            status: SubmitStatus::Idle,
            open: true,
        }
    }

    pub fn edit(pathname: &str, form: RecordForm) -> Self {
        Self {
            mode: EditorMode::Edit {
                pathname: pathname.to_string(),
            },
            form,
            status: SubmitStatus::Idle,
            open: true,
        }
    }

    /// Move to `Submitting` and hand out what to submit.
    ///
    /// Returns `None` while a submission is already running.
    pub fn begin_submit(&mut self) -> Option<(EditorMode, RecordForm)> {
        if self.status == SubmitStatus::Submitting {
            return None;
        }
        self.status = SubmitStatus::Submitting;
        Some((self.mode.clone(), self.form.clone()))
    }

    /// Apply a submission outcome.
    ///
    /// Success closes the editor and resets its fields; failure keeps it open
    /// with the message. A cancelled submission returns to `Idle` silently.
    pub fn finish(&mut self, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                self.status = SubmitStatus::Succeeded;
                self.open = false;
                self.form = RecordForm::empty(self.form.kind());
                self.mode = EditorMode::Create;
            }
            Err(FolioError::Cancelled) => self.status = SubmitStatus::Idle,
            Err(e) => self.status = SubmitStatus::Failed(e.to_string()),
        }
    }
}

/// Runs mutations for one record kind and resynchronizes after each success.
pub struct MutationCoordinator<A> {
    sync: Arc<ListSynchronizer<A>>,
    deleting: DeletionSet,
    lifetime: CancellationToken,
}

impl<A: ContentApi> MutationCoordinator<A> {
    pub fn new(sync: Arc<ListSynchronizer<A>>, lifetime: CancellationToken) -> Self {
        Self {
            sync,
            deleting: DeletionSet::new(),
            lifetime,
        }
    }

    pub fn deleting(&self) -> &DeletionSet {
        &self.deleting
    }

    pub fn is_deleting(&self, pathname: &str) -> bool {
        self.deleting.contains(pathname)
    }

    pub async fn create(&self, form: &RecordForm) -> Result<()> {
        self.check_kind(form)?;
        let payload = form.payload()?;
        let request = self.sync.routes().create(payload);

        cancellable(&self.lifetime, self.sync.api().send(request)).await?;
        tracing::info!(kind = %form.kind(), title = form.title(), "record created");

        self.resync().await;
        Ok(())
    }

    /// Update the record at `pathname`, keyed by its filename.
    pub async fn update(&self, pathname: &str, form: &RecordForm) -> Result<()> {
        self.check_kind(form)?;
        let payload = form.payload()?;
        let filename = filename_from_pathname(pathname);
        let request = self.sync.routes().update(&filename, payload)?;

        cancellable(&self.lifetime, self.sync.api().send(request)).await?;
        tracing::info!(kind = %form.kind(), filename = %filename, "record updated");

        self.resync().await;
        Ok(())
    }

    /// Delete the record at `pathname`.
    ///
    /// The pathname is in the deletion set for exactly the duration of the
    /// request. A failed delete leaves the collection untouched.
    pub async fn delete(&self, pathname: &str) -> Result<()> {
        let guard = self.deleting.begin(pathname).ok_or_else(|| {
            FolioError::Validation(format!("'{pathname}' is already being deleted"))
        })?;
        let filename = filename_from_pathname(pathname);
        let request = self.sync.routes().delete(&filename);

        let result = cancellable(&self.lifetime, self.sync.api().send(request)).await;
        drop(guard);
        result?;
        tracing::info!(kind = %self.sync.routes().kind(), filename = %filename, "record deleted");

        self.resync().await;
        Ok(())
    }

    fn check_kind(&self, form: &RecordForm) -> Result<()> {
        let kind = self.sync.routes().kind();
        if form.kind() != kind {
            return Err(FolioError::Validation(format!(
                "a {} form cannot be submitted to {kind}",
                form.kind().singular()
            )));
        }
        Ok(())
    }

    /// Reload after a successful mutation. The outcome lands in the
    /// collection state, not in the mutation's result.
    async fn resync(&self) {
        match self.sync.reload().await {
            Ok(()) | Err(FolioError::Cancelled) => {}
            Err(e) => tracing::warn!("reload after mutation failed: {e}"),
        }
    }
}
