//! CLI module for the Taskly command-line interface.
//!
//! Provides subcommands for interacting with the Taskly service:
//! - `signup` / `login` / `logout` - Account and session management
//! - `list` - Show the task dashboard with filtering
//! - `add` / `edit` / `toggle` / `delete` / `show` - Task operations
//! - `config check` - Validate configuration file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::api::models::TaskDraft;
use crate::api::validation::{validate_draft, validate_email, validate_password};
use crate::api::{auth, tasks, ApiError};
use crate::session::SessionUser;
use crate::AppContext;

pub mod filter;
pub mod guard;

use filter::TaskFilter;
use guard::Access;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "taskly")]
#[command(author, version, about = "A fast, lightweight client for the Taskly to-do service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "taskly.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (default: http://localhost:8000)
    #[arg(long, env = "TASKLY_API_URL")]
    pub api_url: Option<String>,

    /// Subcommand to run (if none, shows the overview)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account and sign in
    Signup {
        /// Email address for the new account
        email: String,
        /// Password (prompted securely when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign in with an existing account
    Login {
        /// Email address of the account
        email: String,
        /// Password (prompted securely when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show the task dashboard
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value = "all")]
        filter: TaskFilter,
    },

    /// Show details for one task
    Show {
        /// Task ID
        id: String,
    },

    /// Create a new task
    Add {
        /// Task title (prompted when omitted)
        title: Option<String>,
        /// Optional longer description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit an existing task
    Edit {
        /// Task ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Run a CLI command
pub async fn run_command(ctx: &AppContext, cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Signup { email, password }) => {
            cmd_signup(ctx, email, password.as_deref()).await
        }
        Some(Commands::Login { email, password }) => {
            cmd_login(ctx, email, password.as_deref()).await
        }
        Some(Commands::Logout) => cmd_logout(ctx),
        Some(Commands::Whoami) => cmd_whoami(ctx),
        Some(Commands::List { filter }) => cmd_list(ctx, *filter).await,
        Some(Commands::Show { id }) => cmd_show(ctx, id).await,
        Some(Commands::Add { title, description }) => {
            cmd_add(ctx, title.as_deref(), description.as_deref()).await
        }
        Some(Commands::Edit {
            id,
            title,
            description,
        }) => cmd_edit(ctx, id, title.as_deref(), description.as_deref()).await,
        Some(Commands::Toggle { id }) => cmd_toggle(ctx, id).await,
        Some(Commands::Delete { id, yes }) => cmd_delete(ctx, id, *yes).await,
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(cli),
        None => cmd_home(ctx),
    }
}

/// Static overview shown when no subcommand is given
fn cmd_home(ctx: &AppContext) -> Result<()> {
    println!();
    println!("Taskly - your personal to-do list");
    println!();
    println!("Capture tasks in seconds and check them off from anywhere.");
    println!();
    println!("Quick start:");
    println!("  taskly signup <email>    Create an account");
    println!("  taskly login <email>     Sign in");
    println!("  taskly list              Show your dashboard");
    println!("  taskly add \"Buy milk\"    Create a task");
    println!();
    match ctx.session.user() {
        Some(user) => println!("Signed in as {}", user.email),
        None => println!("Not signed in."),
    }
    println!("Server: {}", ctx.api_url);
    println!();
    Ok(())
}

/// Create an account, then store the session
async fn cmd_signup(ctx: &AppContext, email: &str, password: Option<&str>) -> Result<()> {
    if let Err(msg) = validate_email(email) {
        anyhow::bail!("{}", msg);
    }
    let password = read_password(password)?;
    if let Err(msg) = validate_password(&password) {
        anyhow::bail!("{}", msg);
    }

    match auth::register(&ctx.api, email, &password).await {
        Ok(response) => {
            let user = SessionUser {
                id: response.user.id,
                email: response.user.email,
            };
            ctx.session
                .login(&response.token.access_token, &user)
                .context("Account created, but the session could not be saved")?;
            println!("[OK] Account created. Signed in as {}", user.email);
            println!("Run 'taskly list' to see your dashboard.");
            Ok(())
        }
        Err(ApiError::Conflict(_)) => anyhow::bail!("Email already registered"),
        Err(ApiError::Unprocessable(msg)) => anyhow::bail!("{}", msg),
        Err(ApiError::Network(err)) => {
            debug!(error = %err, "Signup transport failure");
            anyhow::bail!("Failed to connect to the server. Is it running?");
        }
        Err(err) => anyhow::bail!("Registration failed: {}", err.message()),
    }
}

/// Sign in, then store the session
async fn cmd_login(ctx: &AppContext, email: &str, password: Option<&str>) -> Result<()> {
    if let Err(msg) = validate_email(email) {
        anyhow::bail!("{}", msg);
    }
    let password = read_password(password)?;

    match auth::login(&ctx.api, email, &password).await {
        Ok(response) => {
            let user = SessionUser {
                id: response.user.id,
                email: response.user.email,
            };
            ctx.session
                .login(&response.token.access_token, &user)
                .context("Signed in, but the session could not be saved")?;
            println!("[OK] Signed in as {}", user.email);
            println!("Run 'taskly list' to see your dashboard.");
            Ok(())
        }
        Err(ApiError::Unauthorized(_)) => anyhow::bail!("Invalid email or password"),
        Err(ApiError::Network(err)) => {
            debug!(error = %err, "Login transport failure");
            anyhow::bail!("Failed to connect to the server. Is it running?");
        }
        Err(err) => anyhow::bail!("Login failed: {}", err.message()),
    }
}

fn cmd_logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout()?;
    println!("[OK] Signed out.");
    Ok(())
}

fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    match ctx.session.user() {
        Some(user) => {
            println!("Signed in as {} (id: {})", user.email, user.id);
            Ok(())
        }
        None => {
            println!("Not signed in. Run 'taskly login <email>' first.");
            Ok(())
        }
    }
}

/// The dashboard: fetch all tasks, filter client-side, show counts
async fn cmd_list(ctx: &AppContext, filter: TaskFilter) -> Result<()> {
    require_auth(ctx)?;

    let tasks = match tasks::list(&ctx.api).await {
        Ok(tasks) => tasks,
        Err(err) => return Err(screen_error(err, "Failed to load tasks")),
    };

    let (active, completed) = filter::counts(&tasks);
    let total = active + completed;
    println!();
    println!(
        "You have {} active and {} completed task{}.",
        active,
        completed,
        if total == 1 { "" } else { "s" }
    );
    println!();

    let visible = filter.apply(&tasks);
    if visible.is_empty() {
        println!("{}", filter.empty_message());
        println!();
        return Ok(());
    }

    println!(
        "{:<36}  {:<5}  {:<40}  {:<10}",
        "ID", "DONE", "TITLE", "CREATED"
    );
    println!("{}", "-".repeat(97));
    for task in visible {
        println!(
            "{:<36}  {:<5}  {:<40}  {:<10}",
            task.id,
            if task.completed { "[x]" } else { "[ ]" },
            truncate(&task.title, 40),
            format_date(&task.created_at)
        );
    }
    println!();
    Ok(())
}

/// Show details for a specific task
async fn cmd_show(ctx: &AppContext, id: &str) -> Result<()> {
    require_auth(ctx)?;

    let task = match tasks::get(&ctx.api, id).await {
        Ok(task) => task,
        Err(ApiError::Forbidden(_)) => {
            anyhow::bail!("You do not have permission to view this task")
        }
        Err(ApiError::NotFound(_)) => anyhow::bail!("Task not found: {}", id),
        Err(err) => return Err(screen_error(err, "Failed to load task")),
    };

    println!();
    println!("=== Task: {} ===", task.title);
    println!();
    println!("ID:          {}", task.id);
    println!(
        "Status:      {}",
        if task.completed { "Completed" } else { "Active" }
    );
    if let Some(description) = &task.description {
        if !description.is_empty() {
            println!("Description: {}", description);
        }
    }
    println!("Created:     {}", format_date(&task.created_at));
    println!("Updated:     {}", format_date(&task.updated_at));
    if let Some(completed_at) = &task.completed_at {
        println!("Completed:   {}", format_date(completed_at));
    }
    println!();
    Ok(())
}

/// Create a new task from the draft
async fn cmd_add(ctx: &AppContext, title: Option<&str>, description: Option<&str>) -> Result<()> {
    require_auth(ctx)?;

    let title = match title {
        Some(title) => title.to_string(),
        None => prompt_line("Title: ")?,
    };
    let draft = TaskDraft {
        title,
        description: description
            .map(|d| d.to_string())
            .filter(|d| !d.is_empty()),
    };
    if let Err(msg) = validate_draft(&draft) {
        anyhow::bail!("{}", msg);
    }

    match tasks::create(&ctx.api, &draft).await {
        Ok(task) => {
            println!("[OK] Task created: {}", task.title);
            println!("ID: {}", task.id);
            println!("Run 'taskly list' to see your dashboard.");
            Ok(())
        }
        Err(ApiError::Validation(_)) => {
            anyhow::bail!("Invalid task data. Please check your input.")
        }
        Err(err) => Err(screen_error(err, "Failed to create task. Please try again.")),
    }
}

/// Edit an existing task: fetch the current fields, overlay what was given,
/// send the whole draft back as a full replace
async fn cmd_edit(
    ctx: &AppContext,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    require_auth(ctx)?;

    if title.is_none() && description.is_none() {
        anyhow::bail!("Nothing to update. Pass --title and/or --description.");
    }

    let current = match tasks::get(&ctx.api, id).await {
        Ok(task) => task,
        Err(ApiError::Forbidden(_)) => {
            anyhow::bail!("You do not have permission to edit this task")
        }
        Err(ApiError::NotFound(_)) => anyhow::bail!("Task not found: {}", id),
        Err(err) => return Err(screen_error(err, "Failed to load task")),
    };

    let draft = TaskDraft {
        title: title.map(|t| t.to_string()).unwrap_or(current.title),
        description: description
            .map(|d| d.to_string())
            .filter(|d| !d.is_empty())
            .or(current.description),
    };
    if let Err(msg) = validate_draft(&draft) {
        anyhow::bail!("{}", msg);
    }

    match tasks::update(&ctx.api, id, &draft).await {
        Ok(task) => {
            println!("[OK] Task updated: {}", task.title);
            Ok(())
        }
        Err(ApiError::Forbidden(_)) => {
            anyhow::bail!("You do not have permission to edit this task")
        }
        Err(ApiError::NotFound(_)) => anyhow::bail!("Task not found: {}", id),
        Err(err) => Err(screen_error(err, "Failed to update task. Please try again.")),
    }
}

/// Toggle completion, then re-fetch the list for fresh counts
async fn cmd_toggle(ctx: &AppContext, id: &str) -> Result<()> {
    require_auth(ctx)?;

    let task = match tasks::toggle(&ctx.api, id).await {
        Ok(task) => task,
        Err(ApiError::NotFound(_)) => anyhow::bail!("Task not found: {}", id),
        Err(err) => return Err(screen_error(err, "Failed to update task")),
    };

    println!(
        "[OK] Marked '{}' as {}.",
        task.title,
        if task.completed { "completed" } else { "active" }
    );

    // Counts come from a fresh fetch, not from patching local state
    match tasks::list(&ctx.api).await {
        Ok(tasks) => {
            let (active, completed) = filter::counts(&tasks);
            println!("{} active, {} completed.", active, completed);
        }
        Err(err) => {
            debug!(error = %err, "Could not refresh counts after toggle");
        }
    }
    Ok(())
}

/// Delete a task after explicit confirmation
async fn cmd_delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    require_auth(ctx)?;

    if !yes && !confirm(&format!("Delete task {}? [y/N]: ", id)) {
        println!("Aborted.");
        return Ok(());
    }

    match tasks::delete(&ctx.api, id).await {
        Ok(()) => {
            println!("[OK] Task {} deleted.", id);
            Ok(())
        }
        Err(ApiError::NotFound(_)) => anyhow::bail!("Task not found: {}", id),
        Err(ApiError::Forbidden(_)) => {
            anyhow::bail!("You do not have permission to delete this task")
        }
        Err(err) => Err(screen_error(err, "Failed to delete task")),
    }
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    use crate::config::Config;

    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Defaults will be used. To customize, create taskly.toml.");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  API URL:  {}", config.server.api_url);
            println!("  Timeout:  {}s", config.server.timeout_secs);
            println!();
            println!("Storage:");
            println!("  Data Dir: {}", config.storage.data_dir.display());
            println!();
            println!("Logging:");
            println!("  Level:    {}", config.logging.level);
            println!();
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check the configuration file syntax and try again.");
            anyhow::bail!("Invalid configuration file");
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Gate a protected command on the stored session
fn require_auth(ctx: &AppContext) -> Result<()> {
    match guard::check(&ctx.session) {
        Access::Authorized => Ok(()),
        Access::LoginRequired => {
            anyhow::bail!("You are not signed in. Run 'taskly login <email>' first.")
        }
    }
}

/// Wrap an API error in the screen's local message. Transport failures get
/// the connect hint instead.
fn screen_error(err: ApiError, message: &str) -> anyhow::Error {
    match err {
        ApiError::Network(source) => {
            debug!(error = %source, "Transport failure");
            anyhow::anyhow!("Failed to connect to the server. Is it running?")
        }
        other => anyhow::anyhow!("{}: {}", message, other.message()),
    }
}

/// Password from the flag, or a hidden prompt
fn read_password(provided: Option<&str>) -> Result<String> {
    match provided {
        Some(password) => Ok(password.to_string()),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn confirm(prompt: &str) -> bool {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer).ok();
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Render a server timestamp as a short date, falling back to the raw string
fn format_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
