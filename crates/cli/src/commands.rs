//! CLI commands

use anyhow::{Context, Result};
use batteries_core::{CredentialStore, FileStorage};
use batteries_http::{ApiClientFactory, ClientConfig};
use batteries_session::{Rehydration, SessionManager};
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::console::{ConsoleForm, ConsoleNotifier, LoggingNavigator};
use crate::state_dir::StateDir;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "BATTERIES_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored credential
    Logout,

    /// Restore the stored session and show the logged-in user
    Whoami,

    /// Show whether a credential is stored
    Status,

    /// Password reset operations
    ResetPassword {
        #[command(subcommand)]
        command: ResetPasswordCommands,
    },
}

#[derive(Subcommand)]
pub enum ResetPasswordCommands {
    /// Email a reset-password link
    Send {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with the key from a reset-password link
    Confirm {
        #[arg(long)]
        token_key: String,

        #[arg(long, env = "BATTERIES_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
}

/// Wired collaborators shared by every command
pub struct App {
    api: ApiClientFactory,
    session: SessionManager,
    storage_path: PathBuf,
}

impl App {
    pub async fn bootstrap(state_dir: &StateDir, config_path: Option<PathBuf>) -> Result<Self> {
        state_dir.create_directories().await?;

        let config_path = config_path.or_else(|| {
            let path = state_dir.config_path();
            path.exists().then_some(path)
        });
        let config = ClientConfig::load(config_path.as_deref())
            .context("Failed to load client configuration")?;
        debug!(back_host_url = %config.back_host_url, api_base = %config.api_base, "Loaded configuration");

        let storage_path = state_dir.storage_path();
        let credentials = CredentialStore::new(Arc::new(FileStorage::new(&storage_path)));

        let api = ApiClientFactory::builder()
            .config(config)
            .credentials(credentials)
            .notifier(Arc::new(ConsoleNotifier))
            .build()?;
        let session = SessionManager::new(api.clone(), Arc::new(LoggingNavigator));

        Ok(Self {
            api,
            session,
            storage_path,
        })
    }
}

impl Commands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Commands::Login { email, password } => login(app, &email, &password).await,
            Commands::Logout => {
                app.session.logout(true).await?;
                Ok(())
            }
            Commands::Whoami => whoami(app).await,
            Commands::Status => {
                let state = if app.session.state().is_authenticated() {
                    "logged in"
                } else {
                    "logged out"
                };
                println!("Session: {state}");
                println!("API: {}", app.api.base_url());
                println!("Storage: {}", app.storage_path.display());
                Ok(())
            }
            Commands::ResetPassword { command } => command.execute(app).await,
        }
    }
}

impl ResetPasswordCommands {
    async fn execute(self, app: &App) -> Result<()> {
        let form = Arc::new(ConsoleForm::new());
        let client = app.api.with_form(form.clone());

        let result = match self {
            ResetPasswordCommands::Send { email } => client.send_reset_password_link(&email).await,
            ResetPasswordCommands::Confirm {
                token_key,
                new_password,
            } => client.reset_password(&token_key, &new_password).await,
        };
        form.flush();

        println!("{}", result?.message);
        Ok(())
    }
}

async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let form = Arc::new(ConsoleForm::new());
    let client = app.api.with_form(form.clone());

    let token = client.access_token(email, password).await;
    form.flush();

    let user = app.session.login(&token?).await?;
    info!(user_id = %user.id, "Login complete");
    println!("Logged in as {} <{}>", user.full_name(), user.email);
    Ok(())
}

async fn whoami(app: &App) -> Result<()> {
    match app.session.rehydrate().await? {
        Rehydration::Restored(user) => {
            println!("{} <{}>", user.full_name(), user.email);
            if let Some(phone) = &user.phone_number {
                println!("Phone: {phone}");
            }
            if user.is_superuser {
                println!("Role: superuser");
            }
        }
        Rehydration::Anonymous => println!("Not logged in"),
        Rehydration::Expired => println!("Stored session is no longer valid; logged out"),
        Rehydration::Skipped => println!("Session already restored"),
    }
    Ok(())
}
