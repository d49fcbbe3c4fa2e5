//! WorkFlowX server binary.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use workflowx::api::{AppState, create_router};
use workflowx::config::ConfigLoader;

/// WorkFlowX - employee management server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding organisation, departments, roles and validation YAML.
    #[arg(short, long, default_value = "./config/workflowx")]
    config: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Username of the bootstrapped administrator.
    #[arg(long, default_value = "admin")]
    admin_username: String,

    /// Password of the bootstrapped administrator. Without it no account
    /// exists and every guarded route answers 401.
    #[arg(long, env = "WORKFLOWX_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConfigLoader::load(&args.config)?;
    info!(
        organisation = %config.organisation().name,
        version = %config.organisation().version,
        departments = config.config().departments().len(),
        roles = config.config().roles().len(),
        "Configuration loaded from {}",
        args.config.display()
    );

    let state = AppState::new(config)?;
    match &args.admin_password {
        Some(password) => {
            state.bootstrap_admin(&args.admin_username, password).await?;
        }
        None => warn!("No admin password given; set WORKFLOWX_ADMIN_PASSWORD to create one"),
    }

    let app = create_router(state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
