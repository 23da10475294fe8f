use std::io::{self, Read};

use clap::Args;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{connect, print_json};
use crate::error::{FolioError, Result};
use crate::mutation::RecordForm;
use crate::panel::Panel;
use crate::record::Kind;
use crate::remote::ContentApi;

/// Field values given on the command line. Unset fields leave the form as is.
#[derive(Args, Debug, Clone, Default)]
pub struct RecordFields {
    /// Record title
    #[arg(long)]
    pub title: Option<String>,

    /// Body text; paragraphs are separated by a blank line. Use '-' to read stdin
    #[arg(long)]
    pub content: Option<String>,

    /// Date, e.g. 2024-03-01
    #[arg(long)]
    pub date: Option<String>,

    /// Publication link (publications only)
    #[arg(long)]
    pub url: Option<String>,

    /// Comma-separated author names (publications only)
    #[arg(long)]
    pub authors: Option<String>,

    /// Where it was published (publications only)
    #[arg(long)]
    pub venue: Option<String>,

    /// Partner organization (projects only)
    #[arg(long)]
    pub partner_name: Option<String>,

    /// Partner website (projects only)
    #[arg(long)]
    pub partner_url: Option<String>,
}

impl RecordFields {
    /// Write the given fields into `form`.
    ///
    /// A field that does not belong to the form's kind is an error rather
    /// than silently ignored.
    pub fn apply(&self, form: &mut RecordForm) -> Result<()> {
        let content = self.content.as_deref().map(read_content).transpose()?;

        match form {
            RecordForm::Publication(f) => {
                for (flag, value) in [
                    ("--partner-name", &self.partner_name),
                    ("--partner-url", &self.partner_url),
                ] {
                    reject_foreign(flag, value, Kind::Publications)?;
                }
                set(&mut f.title, &self.title);
                set(&mut f.content, &content);
                set(&mut f.date, &self.date);
                set(&mut f.publication_url, &self.url);
                set(&mut f.authors, &self.authors);
                set(&mut f.venue, &self.venue);
            }
            RecordForm::Project(f) => {
                for (flag, value) in [
                    ("--url", &self.url),
                    ("--authors", &self.authors),
                    ("--venue", &self.venue),
                ] {
                    reject_foreign(flag, value, Kind::Projects)?;
                }
                set(&mut f.title, &self.title);
                set(&mut f.content, &content);
                set(&mut f.date, &self.date);
                set(&mut f.partner_name, &self.partner_name);
                set(&mut f.partner_url, &self.partner_url);
            }
        }
        Ok(())
    }
}

fn reject_foreign(flag: &str, value: &Option<String>, kind: Kind) -> Result<()> {
    if value.is_some() {
        return Err(FolioError::Validation(format!(
            "{flag} does not apply to {kind}"
        )));
    }
    Ok(())
}

fn set(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

fn read_content(value: &str) -> Result<String> {
    if value != "-" {
        return Ok(value.to_string());
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Fill the panel's open form from `fields` and submit it.
pub(super) async fn submit_fields<A: ContentApi>(
    panel: &Panel<A>,
    fields: &RecordFields,
) -> Result<String> {
    let mut applied = Ok(());
    panel.update_form(|form| applied = fields.apply(form))?;
    applied?;

    let title = panel
        .editor()
        .map(|e| e.form.title().trim().to_string())
        .unwrap_or_default();
    panel.submit().await?;
    Ok(title)
}

/// Create a record
pub async fn cmd_create(kind: Kind, fields: &RecordFields, output_json: bool) -> Result<()> {
    let panel = connect(kind)?;
    panel.open_create();
    let title = submit_fields(&panel, fields).await?;

    if output_json {
        return print_json(&json!({
            "action": "created",
            "kind": kind,
            "title": title,
        }));
    }

    println!("Created {} '{}'", kind.singular(), title.cyan());
    Ok(())
}
