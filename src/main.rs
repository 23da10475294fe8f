use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use folio::Result;
use folio::commands::{
    RecordFields, cmd_config_set, cmd_config_show, cmd_create, cmd_delete, cmd_edit, cmd_list,
    cmd_show,
};
use folio::record::Kind;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Manage portfolio publications and projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage publications
    #[command(visible_alias = "pub")]
    Publications {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage projects
    #[command(visible_alias = "proj")]
    Projects {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RecordAction {
    /// List records, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Only records whose title contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Records per page (default: page_size from config)
        #[arg(long)]
        page_size: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display one record
    #[command(visible_alias = "s")]
    Show {
        /// Pathname from the index, e.g. publications/mesh.json
        pathname: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record
    #[command(visible_alias = "c")]
    Create {
        #[command(flatten)]
        fields: RecordFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a record; fields not given keep their current values
    Edit {
        /// Pathname from the index
        pathname: String,

        #[command(flatten)]
        fields: RecordFields,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    #[command(visible_alias = "rm")]
    Delete {
        /// Pathname from the index
        pathname: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, auth.token, page_size, <kind>.list|create|delete|update)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run_record(kind: Kind, action: RecordAction) -> Result<()> {
    match action {
        RecordAction::List {
            search,
            page,
            page_size,
            json,
        } => cmd_list(kind, search.as_deref(), page, page_size, json).await,
        RecordAction::Show { pathname, json } => cmd_show(kind, &pathname, json).await,
        RecordAction::Create { fields, json } => cmd_create(kind, &fields, json).await,
        RecordAction::Edit {
            pathname,
            fields,
            json,
        } => cmd_edit(kind, &pathname, &fields, json).await,
        RecordAction::Delete {
            pathname,
            yes,
            json,
        } => cmd_delete(kind, &pathname, yes, json).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Publications { action } => run_record(Kind::Publications, action).await,
        Commands::Projects { action } => run_record(Kind::Projects, action).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
