//! Catalog command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto category and cast member use-cases.
//! - Print results as JSON on stdout and failures on stderr.
//!
//! # Invariants
//! - Exit code is non-zero whenever a use-case fails.

use catalog_core::service::cast_member_service::{
    CreateCastMemberInput, ListCastMembersInput, UpdateCastMemberInput,
};
use catalog_core::service::category_service::{
    CreateCategoryInput, ListCategoriesInput, UpdateCategoryInput,
};
use catalog_core::{
    init_logging, open_db, open_db_in_memory, CastMemberFilter, CastMemberService,
    CastMemberType, CategoryService, CoreConfig, SqliteCastMemberRepository,
    SqliteCategoryRepository,
};
use clap::{Args, Parser, Subcommand};
use log::error;
use rusqlite::Connection;
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Video catalog administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (overrides CATALOG_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core linkage check
    Ping,

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage cast members
    CastMembers {
        #[command(subcommand)]
        action: CastMemberAction,
    },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    per_page: Option<String>,
    /// Field to sort by (`name` or `created_at`)
    #[arg(long)]
    sort: Option<String>,
    /// `asc` or `desc`
    #[arg(long)]
    sort_dir: Option<String>,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        is_active: Option<bool>,
    },
    /// Update a category
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        is_active: Option<bool>,
    },
    /// Show one category
    Get { id: String },
    /// List categories
    List {
        #[command(flatten)]
        paging: ListArgs,
        /// Name substring filter
        #[arg(long)]
        filter: Option<String>,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Subcommand)]
enum CastMemberAction {
    /// Create a cast member
    Create {
        name: String,
        /// 1 = director, 2 = actor
        #[arg(short = 't', long = "type")]
        member_type: i64,
    },
    /// Update a cast member
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short = 't', long = "type")]
        member_type: Option<i64>,
    },
    /// Show one cast member
    Get { id: String },
    /// List cast members
    List {
        #[command(flatten)]
        paging: ListArgs,
        /// Name substring filter
        #[arg(long)]
        name: Option<String>,
        /// Type code filter; unknown codes are ignored
        #[arg(long = "type")]
        member_type: Option<i64>,
    },
    /// Delete a cast member
    Delete { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    match cli.command {
        Commands::Ping => {
            print_json(&json!({
                "ping": catalog_core::ping(),
                "version": catalog_core::core_version(),
            }))
        }
        Commands::Categories { action } => {
            let conn = open_connection(cli.db.or(config.db_path))?;
            run_category(&conn, action)
        }
        Commands::CastMembers { action } => {
            let conn = open_connection(cli.db.or(config.db_path))?;
            run_cast_member(&conn, action)
        }
    }
}

fn open_connection(path: Option<PathBuf>) -> CliResult<Connection> {
    let conn = match path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    Ok(conn)
}

fn run_category(conn: &Connection, action: CategoryAction) -> CliResult<()> {
    let service = CategoryService::new(SqliteCategoryRepository::try_new(conn)?);
    match action {
        CategoryAction::Create {
            name,
            description,
            is_active,
        } => print_json(&service.create(CreateCategoryInput {
            name,
            description,
            is_active,
        })?),
        CategoryAction::Update {
            id,
            name,
            description,
            clear_description,
            is_active,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            print_json(&service.update(UpdateCategoryInput {
                id,
                name,
                description,
                is_active,
            })?)
        }
        CategoryAction::Get { id } => print_json(&service.get(&id)?),
        CategoryAction::List { paging, filter } => {
            print_json(&service.list(ListCategoriesInput {
                page: paging.page,
                per_page: paging.per_page,
                sort: paging.sort,
                sort_dir: paging.sort_dir,
                filter,
            })?)
        }
        CategoryAction::Delete { id } => {
            service.delete(&id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_cast_member(conn: &Connection, action: CastMemberAction) -> CliResult<()> {
    let service = CastMemberService::new(SqliteCastMemberRepository::try_new(conn)?);
    match action {
        CastMemberAction::Create { name, member_type } => {
            print_json(&service.create(CreateCastMemberInput { name, member_type })?)
        }
        CastMemberAction::Update {
            id,
            name,
            member_type,
        } => print_json(&service.update(UpdateCastMemberInput {
            id,
            name,
            member_type,
        })?),
        CastMemberAction::Get { id } => print_json(&service.get(&id)?),
        CastMemberAction::List {
            paging,
            name,
            member_type,
        } => {
            let filter = CastMemberFilter {
                name,
                member_type: member_type.and_then(|code| CastMemberType::try_from_code(code).ok()),
            };
            print_json(&service.list(ListCastMembersInput {
                page: paging.page,
                per_page: paging.per_page,
                sort: paging.sort,
                sort_dir: paging.sort_dir,
                filter: Some(filter),
            })?)
        }
        CastMemberAction::Delete { id } => {
            service.delete(&id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
