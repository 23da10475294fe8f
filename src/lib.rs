pub mod commands;
pub mod config;
pub mod error;
pub mod mutation;
pub mod panel;
pub mod record;
pub mod remote;
pub mod sync;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{FolioError, Result};
pub use mutation::{Editor, EditorMode, MutationCoordinator, RecordForm, SubmitStatus};
pub use panel::Panel;
pub use record::{Content, Detail, Kind, Partner, Project, Publication};
pub use remote::{ApiError, ContentApi, Endpoints, HttpApi, Routes};
pub use sync::{CollectionState, EnrichedItem, IndexEntry, ItemStatus, ListSynchronizer};
pub use view::{Page, project};
