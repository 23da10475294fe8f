use owo_colors::OwoColorize;

use super::{connect_loaded, print_json};
use crate::error::{FolioError, Result};
use crate::record::{Detail, Kind};

/// Display one record in full
pub async fn cmd_show(kind: Kind, pathname: &str, output_json: bool) -> Result<()> {
    let panel = connect_loaded(kind).await?;
    let item = panel
        .item(pathname)
        .ok_or_else(|| FolioError::NotFound(pathname.to_string()))?;

    if output_json {
        return print_json(&item);
    }

    let Some(detail) = &item.detail else {
        let reason = item.error.as_deref().unwrap_or("details are still loading");
        return Err(FolioError::Validation(format!(
            "could not load '{pathname}': {reason}"
        )));
    };

    println!("{}", detail.title().bold());
    println!("{} {}", "date:".cyan(), detail.date());
    match detail {
        Detail::Publication(p) => {
            println!("{} {}", "authors:".cyan(), p.authors.join(", "));
            println!("{} {}", "venue:".cyan(), p.venue);
            println!("{} {}", "url:".cyan(), p.publication_url);
        }
        Detail::Project(p) => {
            println!("{} {}", "partner:".cyan(), p.partner.name);
            println!("{} {}", "partner url:".cyan(), p.partner.url);
        }
    }
    println!("{}", format!("source: {}", item.entry.url).dimmed());

    println!();
    println!("{}", detail.content().to_text());

    Ok(())
}
