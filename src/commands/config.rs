//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::error::Result;
use crate::record::Kind;
use crate::remote::Endpoints;

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn endpoints_line(endpoints: &Endpoints) -> Result<String> {
    let value = serde_json::to_value(endpoints)?;
    let shape = |field: &str| value[field].as_str().unwrap_or_default().to_string();
    Ok(format!(
        "list={} create={} delete={} update={}",
        shape("list"),
        shape("create"),
        shape("delete"),
        shape("update")
    ))
}

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.base_url().ok();
    let token = config.token();

    if output_json {
        return print_json(&json!({
            "base_url": base_url,
            "auth": {
                "token_configured": token.is_some(),
            },
            "page_size": config.page_size,
            "publications": config.publications,
            "projects": config.projects,
            "config_file": Config::config_path().to_string_lossy(),
        }));
    }

    println!("{}\n", "Configuration:".cyan().bold());

    match &base_url {
        Some(url) => println!("{}: {url}", "base_url".cyan()),
        None => println!("{}: {}", "base_url".cyan(), "not configured".dimmed()),
    }

    let token_status = match &token {
        Some(token) => mask_sensitive_value(token).green().to_string(),
        None => "not configured".dimmed().to_string(),
    };
    println!("{}: {token_status}", "auth.token".cyan());
    println!("{}: {}", "page_size".cyan(), config.page_size);

    println!();
    for kind in Kind::ALL {
        println!(
            "{}: {}",
            kind.as_str().cyan(),
            endpoints_line(&config.endpoints(kind))?
        );
    }

    println!();
    println!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    );
    Ok(())
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    if output_json {
        return print_json(&json!({
            "action": "config_set",
            "key": key,
            "success": true,
        }));
    }

    if key == "auth.token" {
        println!("Set {}", key.cyan());
    } else {
        println!("Set {} to {value}", key.cyan());
    }
    Ok(())
}
