use owo_colors::OwoColorize;
use serde_json::json;

use super::interactive::confirm;
use super::{connect, print_json};
use crate::error::Result;
use crate::record::Kind;

/// Delete a record, asking first unless `yes` is set
pub async fn cmd_delete(kind: Kind, pathname: &str, yes: bool, output_json: bool) -> Result<()> {
    let panel = connect(kind)?;
    panel.request_delete(pathname)?;

    if !yes && !confirm(&format!("Delete {} {pathname}", kind.singular()))? {
        panel.cancel_delete();
        println!("Aborted");
        return Ok(());
    }

    panel.confirm_delete().await?;

    if output_json {
        return print_json(&json!({
            "action": "deleted",
            "kind": kind,
            "pathname": pathname,
        }));
    }

    println!("Deleted {} {}", kind.singular(), pathname.cyan());
    Ok(())
}
