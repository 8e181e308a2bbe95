//! Hostlink - Local auth bridge for a co-located supervisor
//!
//! Lets the supervisor validate and reset local user credentials over a
//! loopback/bridge-network HTTP API, and manages the local user store.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hostlink_auth::{CredentialStore, LocalProvider, ProviderRegistry, LOCAL_PROVIDER};
use hostlink_core::{Config, TrustedOrigin, SUPERVISOR_ENV};
use hostlink_server::{create_router, LocalAuthBridge, AUTH_PATH, PASSWORD_RESET_PATH};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Hostlink - Local auth bridge for the supervisor
#[derive(Parser, Debug)]
#[command(name = "hostlink")]
#[command(version, about, long_about = None)]
struct Args {
    /// Credential document of the local auth provider
    #[arg(long, global = true, env = "HOSTLINK_STORE")]
    store: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the auth bridge
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "HOSTLINK_BIND", default_value = "0.0.0.0:8099")]
        bind: SocketAddr,

        /// Trusted supervisor endpoint (<ip>:<port>), fixed at startup
        #[arg(long)]
        supervisor: Option<String>,

        /// Environment variable holding the supervisor endpoint, re-read on
        /// every request when --supervisor is not given
        #[arg(long, default_value = SUPERVISOR_ENV)]
        supervisor_env: String,

        /// Run without the local auth provider; every request answers 404
        #[arg(long)]
        no_provider: bool,
    },

    /// Manage local users
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Add a user
    Add { username: String, password: String },
    /// Remove a user
    Remove { username: String },
    /// List users
    List,
    /// Change a user's password
    ChangePassword {
        username: String,
        new_password: String,
    },
    /// Check a username/password pair
    Validate { username: String, password: String },
    /// Disable a user
    Disable { username: String },
    /// Re-enable a disabled user
    Enable { username: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let mut config = Config::new();
    if let Some(store) = args.store {
        config = config.with_store_path(store);
    }

    match args.command {
        Command::Serve {
            bind,
            supervisor,
            supervisor_env,
            no_provider,
        } => {
            let trusted_origin = match supervisor {
                Some(endpoint) => endpoint
                    .parse::<TrustedOrigin>()
                    .context("Invalid --supervisor endpoint")?,
                None => TrustedOrigin::Env(supervisor_env),
            };
            let config = config.with_bind(bind).with_trusted_origin(trusted_origin);
            serve(config, no_provider).await
        }
        Command::User(command) => run_user_command(&config, command).await,
    }
}

async fn serve(config: Config, no_provider: bool) -> Result<()> {
    info!("Hostlink v{}", env!("CARGO_PKG_VERSION"));

    let mut providers = ProviderRegistry::new();
    if no_provider {
        warn!("Local auth provider: DISABLED (--no-provider flag set)");
    } else {
        let provider = LocalProvider::load(config.store_path.clone()).with_context(|| {
            format!("Failed to load credential store {:?}", config.store_path)
        })?;
        info!(
            "Local auth provider: {} user(s) in {:?}",
            provider.user_count(),
            config.store_path
        );
        providers.register(LOCAL_PROVIDER, Arc::new(provider));
    }

    match &config.trusted_origin {
        TrustedOrigin::Fixed(ip) => info!("Trusted supervisor: {}", ip),
        TrustedOrigin::Env(var) => match config.trusted_origin.resolve() {
            Some(ip) => info!("Trusted supervisor: {} (from {}, re-read per request)", ip, var),
            None => warn!("{} is not set; all requests are rejected until it is", var),
        },
    }

    let bridge = Arc::new(LocalAuthBridge::new(
        providers,
        config.trusted_origin.clone(),
    ));
    let router = create_router(bridge);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!("Listening on {}", config.bind);
    info!("  POST {}", AUTH_PATH);
    info!("  POST {}", PASSWORD_RESET_PATH);

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Goodbye!");
    Ok(())
}

async fn run_user_command(config: &Config, command: UserCommand) -> Result<()> {
    let provider = LocalProvider::load(config.store_path.clone())
        .with_context(|| format!("Failed to load credential store {:?}", config.store_path))?;

    match command {
        UserCommand::Add { username, password } => {
            provider.add_user(&username, &password)?;
            provider.persist().await?;
            println!("User added");
        }
        UserCommand::Remove { username } => {
            provider.remove_user(&username)?;
            provider.persist().await?;
            println!("User removed");
        }
        UserCommand::List => {
            let users = provider.list_users();
            for user in &users {
                if user.disabled {
                    println!("{} (disabled)", user.username);
                } else {
                    println!("{}", user.username);
                }
            }
            println!();
            println!("Total users: {}", users.len());
        }
        UserCommand::ChangePassword {
            username,
            new_password,
        } => {
            provider.change_password(&username, &new_password)?;
            provider.persist().await?;
            println!("Password changed");
        }
        UserCommand::Validate { username, password } => {
            if provider.validate_login(&username, &password).await.is_err() {
                bail!("Auth invalid");
            }
            println!("Auth valid");
        }
        UserCommand::Disable { username } => {
            provider.set_disabled(&username, true)?;
            provider.persist().await?;
            println!("User disabled");
        }
        UserCommand::Enable { username } => {
            provider.set_disabled(&username, false)?;
            provider.persist().await?;
            println!("User enabled");
        }
    }

    Ok(())
}
