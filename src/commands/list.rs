use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{format_item_title, print_json};
use crate::config::Config;
use crate::error::{FolioError, Result};
use crate::panel::Panel;
use crate::record::Kind;

/// A row in the list table
#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Pathname")]
    pathname: String,
}

/// List one page of records, newest first
pub async fn cmd_list(
    kind: Kind,
    search: Option<&str>,
    page: usize,
    page_size: Option<usize>,
    output_json: bool,
) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(size) = page_size {
        if size == 0 {
            return Err(FolioError::Validation(
                "--page-size must be at least 1".to_string(),
            ));
        }
        config.page_size = size;
    }

    let panel = Panel::connect(kind, &config)?;
    panel.refresh().await?;
    if let Some(search) = search {
        panel.set_search(search);
    }
    panel.set_page(page);
    let page = panel.page();

    if output_json {
        return print_json(&json!({
            "kind": kind,
            "search": panel.search(),
            "page": page.current_page,
            "total_pages": page.total_pages,
            "total_items": page.total_items,
            "items": page.items,
        }));
    }

    if page.items.is_empty() {
        println!("No {kind} found");
        return Ok(());
    }

    let rows: Vec<ListRow> = page
        .items
        .iter()
        .map(|item| ListRow {
            date: item
                .detail
                .as_ref()
                .map(|d| d.date().to_string())
                .unwrap_or_default(),
            title: format_item_title(item),
            pathname: item.pathname().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{}",
        format!(
            "Page {} of {} ({} {kind})",
            page.current_page, page.total_pages, page.total_items
        )
        .dimmed()
    );

    Ok(())
}
