use anyhow::Result;
use clap::{Parser, Subcommand};
use interview_gateway::{GatewayConfig, PublicTokenIssuer, SigningKey, create_app};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "interview-gateway")]
#[command(about = "Auth gateway for the interview platform API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway HTTP server
    Serve {
        /// Bind address, e.g. 0.0.0.0:8080 (overrides BIND)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Mint a public interview token without going through the API
    MintToken {
        /// Interview session the token is scoped to
        interview_id: Uuid,
        /// Token lifetime in seconds
        #[arg(long, default_value_t = interview_gateway::DEFAULT_PUBLIC_TOKEN_TTL_SECONDS)]
        ttl_seconds: u64,
        /// Signing key (overrides SUPABASE_JWT_SIGNING_KEY)
        #[arg(long, env = "SUPABASE_JWT_SIGNING_KEY", hide_env_values = true)]
        signing_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("interview_gateway=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = GatewayConfig::from_env()?;
            if let Some(bind) = bind {
                config.bind = bind.parse()?;
            }

            info!("Starting interview gateway on {}", config.bind);
            let app = create_app(&config)?;

            let listener = tokio::net::TcpListener::bind(config.bind).await?;
            axum::serve(listener, app).await?;
        }
        Commands::MintToken {
            interview_id,
            ttl_seconds,
            signing_key,
        } => {
            let issuer = PublicTokenIssuer::new(&SigningKey::new(signing_key), ttl_seconds);
            let token = issuer.issue(interview_id)?;
            println!("{token}");
        }
    }

    Ok(())
}
