mod config;
mod create;
mod delete;
mod edit;
pub mod interactive;
mod list;
mod show;

pub use config::{cmd_config_set, cmd_config_show};
pub use create::{RecordFields, cmd_create};
pub use delete::cmd_delete;
pub use edit::cmd_edit;
pub use list::cmd_list;
pub use show::cmd_show;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::panel::Panel;
use crate::record::Kind;
use crate::remote::HttpApi;
use crate::sync::{EnrichedItem, ItemStatus};

/// Print any serializable value as pretty JSON
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Connect a panel for `kind` using the on-disk configuration.
fn connect(kind: Kind) -> Result<Panel<HttpApi>> {
    let config = Config::load()?;
    Panel::connect(kind, &config)
}

/// Connect and load the collection.
async fn connect_loaded(kind: Kind) -> Result<Panel<HttpApi>> {
    let panel = connect(kind)?;
    panel.refresh().await?;
    Ok(panel)
}

/// Title cell for an item: its title once loaded, otherwise why it is not.
pub fn format_item_title(item: &EnrichedItem) -> String {
    match (item.status(), &item.detail, &item.error) {
        (ItemStatus::Ready, Some(detail), _) => detail.title().to_string(),
        (ItemStatus::Failed, _, Some(error)) => format!("error: {error}").red().to_string(),
        _ => "loading".dimmed().to_string(),
    }
}
