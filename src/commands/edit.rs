use owo_colors::OwoColorize;
use serde_json::json;

use super::create::{RecordFields, submit_fields};
use super::{connect_loaded, print_json};
use crate::error::Result;
use crate::record::Kind;

/// Update a record. Fields not given keep their current values.
pub async fn cmd_edit(
    kind: Kind,
    pathname: &str,
    fields: &RecordFields,
    output_json: bool,
) -> Result<()> {
    let panel = connect_loaded(kind).await?;
    panel.open_edit(pathname)?;
    let title = submit_fields(&panel, fields).await?;

    if output_json {
        return print_json(&json!({
            "action": "updated",
            "kind": kind,
            "pathname": pathname,
            "title": title,
        }));
    }

    println!("Updated {} '{}'", kind.singular(), title.cyan());
    Ok(())
}
