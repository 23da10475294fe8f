//! One administrative view of a record kind.
//!
//! A panel ties together the collection, the mutations that act on it, and
//! the user-facing parameters (search text, page, open form, pending delete
//! confirmation). Panels never share state; dropping one cancels everything
//! it still has in flight.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{FolioError, Result};
use crate::mutation::{Editor, EditorMode, MutationCoordinator, RecordForm};
use crate::record::Kind;
use crate::remote::{ContentApi, HttpApi, Routes};
use crate::sync::{CollectionState, EnrichedItem, ListSynchronizer};
use crate::view::{self, Page};

#[derive(Debug, Default)]
struct UiState {
    search: String,
    page: usize,
    editor: Option<Editor>,
    /// Bumped whenever a form is opened, so a submission can tell its own
    /// form from one opened while it ran.
    editor_serial: u64,
    confirm_delete: Option<String>,
}

pub struct Panel<A> {
    kind: Kind,
    page_size: usize,
    sync: Arc<ListSynchronizer<A>>,
    mutations: MutationCoordinator<A>,
    lifetime: CancellationToken,
    ui: Mutex<UiState>,
}

impl Panel<HttpApi> {
    /// Build a panel backed by the HTTP API described in `config`.
    pub fn connect(kind: Kind, config: &Config) -> Result<Self> {
        let routes = Routes::new(&config.base_url()?, kind, config.endpoints(kind))?;
        let api = Arc::new(HttpApi::from_config(config)?);
        Ok(Self::new(api, routes, config.page_size))
    }
}

impl<A: ContentApi> Panel<A> {
    pub fn new(api: Arc<A>, routes: Routes, page_size: usize) -> Self {
        let kind = routes.kind();
        let lifetime = CancellationToken::new();
        let sync = Arc::new(ListSynchronizer::new(api, routes, lifetime.clone()));
        let mutations = MutationCoordinator::new(sync.clone(), lifetime.clone());
        Self {
            kind,
            page_size: page_size.max(1),
            sync,
            mutations,
            lifetime,
            ui: Mutex::new(UiState {
                page: 1,
                ..UiState::default()
            }),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn state(&self) -> CollectionState {
        self.sync.state()
    }

    pub fn is_loading(&self) -> bool {
        self.sync.is_loading()
    }

    /// The loaded item at `pathname`, in whatever state its detail is in.
    pub fn item(&self, pathname: &str) -> Option<EnrichedItem> {
        self.sync.find(pathname)
    }

    /// Reload the collection, superseding any load in flight.
    pub async fn refresh(&self) -> Result<()> {
        self.sync.reload().await
    }

    /// Abandon the load in flight without touching the collection.
    pub fn abort(&self) {
        self.sync.abort();
    }

    /// Cancel everything this panel has in flight. Also runs on drop.
    pub fn close(&self) {
        self.lifetime.cancel();
    }

    // Search and pagination

    pub fn search(&self) -> String {
        self.ui.lock().search.clone()
    }

    /// Changing the search text returns to the first page.
    pub fn set_search(&self, text: &str) {
        let mut ui = self.ui.lock();
        ui.search = text.to_string();
        ui.page = 1;
    }

    pub fn set_page(&self, page: usize) {
        self.ui.lock().page = page;
    }

    pub fn next_page(&self) {
        let mut ui = self.ui.lock();
        ui.page = ui.page.saturating_add(1);
    }

    pub fn prev_page(&self) {
        let mut ui = self.ui.lock();
        ui.page = ui.page.saturating_sub(1).max(1);
    }

    /// The visible page, recomputed from the current collection.
    ///
    /// The stored page number follows the clamp, so paging onward from a
    /// shrunken result set starts from a page that exists.
    pub fn page(&self) -> Page {
        let state = self.sync.state();
        let mut ui = self.ui.lock();
        let page = view::project(state.items(), &ui.search, ui.page, self.page_size);
        ui.page = page.current_page;
        page
    }

    // Create and edit

    pub fn open_create(&self) {
        self.open_editor(Editor::create(self.kind));
    }

    /// Open an edit form prefilled from the loaded detail of `pathname`.
    pub fn open_edit(&self, pathname: &str) -> Result<()> {
        let item = self
            .item(pathname)
            .ok_or_else(|| FolioError::NotFound(pathname.to_string()))?;
        let detail = item.detail.as_ref().ok_or_else(|| {
            FolioError::Validation(format!(
                "'{pathname}' has no loaded details to edit{}",
                item.error
                    .as_ref()
                    .map(|e| format!(": {e}"))
                    .unwrap_or_default()
            ))
        })?;
        self.open_editor(Editor::edit(pathname, RecordForm::from_detail(detail)));
        Ok(())
    }

    fn open_editor(&self, editor: Editor) {
        let mut ui = self.ui.lock();
        ui.editor_serial = ui.editor_serial.wrapping_add(1);
        ui.editor = Some(editor);
    }

    pub fn editor(&self) -> Option<Editor> {
        self.ui.lock().editor.clone()
    }

    /// Edit the open form in place.
    pub fn update_form(&self, edit: impl FnOnce(&mut RecordForm)) -> Result<()> {
        let mut ui = self.ui.lock();
        let editor = ui.editor.as_mut().ok_or_else(no_open_form)?;
        edit(&mut editor.form);
        Ok(())
    }

    pub fn close_editor(&self) {
        self.ui.lock().editor = None;
    }

    /// Submit the open form.
    ///
    /// On success the form closes and the collection is reloaded; on failure
    /// the form stays open carrying the error message. A form closed or
    /// replaced while the submission runs is left alone.
    pub async fn submit(&self) -> Result<()> {
        let (serial, mode, form) = {
            let mut ui = self.ui.lock();
            let serial = ui.editor_serial;
            let editor = ui.editor.as_mut().ok_or_else(no_open_form)?;
            let (mode, form) = editor.begin_submit().ok_or_else(|| {
                FolioError::Validation("the form is already being submitted".to_string())
            })?;
            (serial, mode, form)
        };

        let outcome = match &mode {
            EditorMode::Create => self.mutations.create(&form).await,
            EditorMode::Edit { pathname } => self.mutations.update(pathname, &form).await,
        };

        let mut ui = self.ui.lock();
        if ui.editor_serial == serial
            && let Some(editor) = ui.editor.as_mut()
            && editor.mode == mode
        {
            editor.finish(&outcome);
            if !editor.open {
                ui.editor = None;
            }
        }
        outcome
    }

    // Delete

    /// Ask for confirmation before deleting `pathname`.
    pub fn request_delete(&self, pathname: &str) -> Result<()> {
        if self.mutations.is_deleting(pathname) {
            return Err(FolioError::Validation(format!(
                "'{pathname}' is already being deleted"
            )));
        }
        self.ui.lock().confirm_delete = Some(pathname.to_string());
        Ok(())
    }

    pub fn pending_confirmation(&self) -> Option<String> {
        self.ui.lock().confirm_delete.clone()
    }

    pub fn cancel_delete(&self) {
        self.ui.lock().confirm_delete = None;
    }

    /// Delete the record awaiting confirmation. The prompt closes whatever
    /// the outcome.
    pub async fn confirm_delete(&self) -> Result<()> {
        let pathname = self.ui.lock().confirm_delete.clone().ok_or_else(|| {
            FolioError::Validation("no delete is awaiting confirmation".to_string())
        })?;

        let outcome = self.mutations.delete(&pathname).await;

        let mut ui = self.ui.lock();
        if ui.confirm_delete.as_deref() == Some(pathname.as_str()) {
            ui.confirm_delete = None;
        }
        outcome
    }

    pub fn is_deleting(&self, pathname: &str) -> bool {
        self.mutations.is_deleting(pathname)
    }
}

impl<A> Drop for Panel<A> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

fn no_open_form() -> FolioError {
    FolioError::Validation("no form is open".to_string())
}
