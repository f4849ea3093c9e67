//! `kbconsole`: command-line shell for the admin console client core.
//!
//! Subcommands map onto the core's operations: `login`/`logout` drive
//! the auth service, `whoami` and `permissions` inspect the session,
//! `can` runs a permission query, and `check` dry-runs the navigation
//! guard against a console path.

use anyhow::Result;
use clap::{Parser, Subcommand};
use kbconsole::router::guard::GuardDecision;
use kbconsole::{
    rbac, ApiClient, AuthService, ConsoleConfig, Navigator, RouteGuard, RouteTable,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kbconsole", version, about = "Knowledge-base admin console client")]
struct Cli {
    /// Backend base URL (overrides config and environment).
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate against the backend and persist the session token.
    Login {
        /// Admin username.
        username: String,
        /// Password; prompted interactively when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the local session and the persisted token.
    Logout,
    /// Show the logged-in user's profile.
    Whoami,
    /// List the session's permissions and roles.
    Permissions,
    /// Check a single permission string (e.g. `knowledge:create`).
    Can {
        /// Permission to test.
        permission: String,
    },
    /// Dry-run the navigation guard against a console path.
    Check {
        /// Target path (e.g. `/knowledge-import`).
        path: String,
    },
}

/// Navigator for the CLI: redirects are reported, not followed.
struct PrintingNavigator;

impl Navigator for PrintingNavigator {
    fn push(&self, target: &str) {
        println!("-> would navigate to {target}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::load();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let session = Arc::new(kbconsole::SessionStore::new());
    let api = ApiClient::new(
        config.base_url.clone(),
        Arc::clone(&session),
        config.token_file(),
        Arc::new(PrintingNavigator),
    )?;
    let auth = AuthService::new(api);

    match cli.command {
        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()?,
            };
            let resp = auth.login(&username, &password).await?;
            println!("logged in as {}", resp.user.username);
            let roles = session.roles();
            if !roles.is_empty() {
                let names: Vec<&str> = roles.iter().map(|r| r.display_name.as_str()).collect();
                println!("roles: {}", names.join(", "));
            }
        }
        Command::Logout => {
            auth.logout();
            println!("logged out");
        }
        Command::Whoami => {
            auth.initialize().await;
            match session.user() {
                Some(user) => {
                    println!("{} (id {})", user.username, user.id);
                    if let Some(name) = user.full_name {
                        println!("name:  {name}");
                    }
                    if let Some(email) = user.email {
                        println!("email: {email}");
                    }
                }
                None => println!("not logged in"),
            }
        }
        Command::Permissions => {
            auth.initialize().await;
            if !session.is_authenticated() {
                println!("not logged in");
                return Ok(());
            }
            let mut permissions: Vec<String> = session.permissions().into_iter().collect();
            permissions.sort();
            println!("permissions ({}):", permissions.len());
            for permission in permissions {
                println!("  {permission}");
            }
            let roles = session.roles();
            println!("roles ({}):", roles.len());
            for role in roles {
                println!("  {} ({})", role.name, role.display_name);
            }
        }
        Command::Can { permission } => {
            auth.initialize().await;
            let granted = rbac::has_permission(&session, &permission);
            println!("{}", if granted { "granted" } else { "denied" });
        }
        Command::Check { path } => {
            auth.initialize().await;
            let guard = RouteGuard::new(RouteTable::console(), auth);
            match guard.check(&path).await {
                GuardDecision::Allow => println!("allow"),
                GuardDecision::Deny { notice } => println!("deny: {notice}"),
                decision @ GuardDecision::RedirectToLogin { .. }
                | decision @ GuardDecision::RedirectHome => {
                    // location() is always Some for redirect decisions.
                    println!("redirect: {}", decision.location().unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}
