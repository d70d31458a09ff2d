//! CLI for the projgate access control engine.
//!
//! Every command runs as the identity named by `--as`, resolved against the
//! users table of the same database.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;

use projgate::core::validate_email;
use projgate::store::{SqliteStore, UserDirectory};
use projgate::{AuthUser, Engine, EngineConfig, EngineError, GrantId, ProjectId, ProjectPatch, Role};

#[derive(Parser, Debug)]
#[command(name = "projgate", version, about = "Project ownership and sharing")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "PROJGATE_DB", default_value = "projgate.db")]
    db: PathBuf,

    /// Email of the acting user.
    #[arg(long = "as", env = "PROJGATE_USER")]
    actor: Option<String>,

    /// JSON file with engine settings.
    #[arg(long, env = "PROJGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage user accounts.
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Create a project owned by the acting user.
    Create { name: String },
    /// List projects visible to the acting user.
    List,
    /// Show one project.
    Get { id: i64 },
    /// Rename a project.
    Rename { id: i64, name: String },
    /// Delete a project with no grants or files left.
    Delete { id: i64 },
    /// List grants on a project.
    Grantees { project_id: i64 },
    /// Let an email see a project.
    Grant { project_id: i64, email: String },
    /// Remove a grant.
    Revoke { grant_id: i64 },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Register a user account.
    Add {
        email: String,
        #[arg(long, default_value_t = false)]
        admin: bool,
    },
}

type CliEngine = Engine<SqliteStore, SqliteStore>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    tracing::debug!(db = %cli.db.display(), "database ready");

    let engine: CliEngine = Engine::new(store.clone(), store.clone(), config);
    let actor = cli.actor.as_deref();

    match cli.command {
        Commands::User {
            command: UserCommands::Add { email, admin },
        } => {
            validate_email(&email)?;
            let role = if admin { Role::Admin } else { Role::User };
            let user = store.register_user(&email, role).await?;
            tracing::info!(user = %user.id, role = %user.role, "user registered");
            print_json(&user)
        }
        Commands::Create { name } => {
            let actor = resolve_actor(&engine, actor).await?;
            let id = engine.create_project(&name, &actor).await?;
            print_json(&serde_json::json!({
                "message": "Project Successfully Added",
                "id": id,
                "project_name": name.trim(),
                "user": actor.email,
            }))
        }
        Commands::List => {
            let actor = resolve_actor(&engine, actor).await?;
            print_json(&engine.list_visible_projects(&actor).await?)
        }
        Commands::Get { id } => {
            let actor = resolve_actor(&engine, actor).await?;
            print_json(&engine.get_project(ProjectId(id), &actor).await?)
        }
        Commands::Rename { id, name } => {
            let actor = resolve_actor(&engine, actor).await?;
            engine
                .update_project(ProjectId(id), &ProjectPatch::rename(name), &actor)
                .await?;
            print_success()
        }
        Commands::Delete { id } => {
            let actor = resolve_actor(&engine, actor).await?;
            engine.delete_project(ProjectId(id), &actor).await?;
            print_success()
        }
        Commands::Grantees { project_id } => {
            let actor = resolve_actor(&engine, actor).await?;
            let project_id = ProjectId(project_id);
            engine.get_project(project_id, &actor).await?;
            print_json(&engine.list_grantees(project_id).await?)
        }
        Commands::Grant { project_id, email } => {
            let actor = resolve_actor(&engine, actor).await?;
            let project_id = ProjectId(project_id);
            engine.authorize(project_id, &actor).await?;
            let access_id = engine.grant_access(project_id, &email).await?;
            print_json(&serde_json::json!({
                "message": "User Access added",
                "access_id": access_id,
            }))
        }
        Commands::Revoke { grant_id } => {
            let actor = resolve_actor(&engine, actor).await?;
            let grant = engine.get_grant(GrantId(grant_id)).await?;
            engine.authorize(grant.project_id, &actor).await?;
            engine.revoke_access(grant.id).await?;
            print_success()
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        None => Ok(EngineConfig::default()),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
        }
    }
}

async fn resolve_actor(engine: &CliEngine, email: Option<&str>) -> anyhow::Result<AuthUser> {
    let Some(email) = email else {
        bail!("no acting user: pass --as <email> or set PROJGATE_USER");
    };
    engine
        .directory()
        .lookup(email)
        .await?
        .ok_or_else(|| anyhow!("unknown user: {}", email))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_success() -> anyhow::Result<()> {
    print_json(&serde_json::json!({ "msg": "success" }))
}

/// Distinct exit codes per failure kind, so scripts can branch on them.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::NotFound(_)) => 2,
        Some(EngineError::AlreadyExists(_)) => 3,
        Some(EngineError::Unauthorized(_)) => 4,
        Some(EngineError::Validation(_)) => 5,
        Some(EngineError::Store(_)) | None => 1,
    }
}
