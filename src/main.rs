//! chatrelay binary
//!
//! Either serves `/chat` over HTTP or relays a single request and exits.

use chatrelay::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    credential::ApiKey,
    handlers::{self, AppState},
    invocation,
    relay::Relay,
    telemetry,
};
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Config { output } => write_template(output.as_deref()),
        Command::Serve => {
            let (config, relay) = bootstrap(config_path.as_deref())?;
            serve(config, relay).await
        }
        Command::Invoke { method, body } => {
            let (_, relay) = bootstrap(config_path.as_deref())?;
            invoke(&method, body, &relay).await
        }
    }
}

/// Resolve configuration and the credential once, before any request is handled
fn bootstrap(config_path: Option<&Path>) -> Result<(Config, Relay), Box<dyn Error>> {
    // A .env file is optional
    dotenvy::dotenv().ok();

    let config = Config::load(config_path)?;
    telemetry::init(&config.observability.log_level);

    let api_key = ApiKey::from_env(config.upstream.api_key_env()).inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start without a usable upstream credential");
    })?;
    let relay = Relay::from_config(&config, api_key)?;

    tracing::info!(
        model = %config.upstream.model(),
        upstream = %config.upstream.completions_url(),
        "Relay configured"
    );

    Ok((config, relay))
}

async fn serve(config: Config, relay: Relay) -> Result<(), Box<dyn Error>> {
    let addr = config.socket_addr()?;
    let app = handlers::router(AppState::new(relay), &config.server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Chat endpoint available at http://{}/chat", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn invoke(method: &str, body: Option<String>, relay: &Relay) -> Result<(), Box<dyn Error>> {
    let method = invocation::parse_method(method)?;
    let body = match body {
        Some(body) => body.into_bytes(),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };

    let mut stdout = std::io::stdout().lock();
    let status = invocation::run(&method, &body, relay, &mut stdout).await?;
    tracing::debug!(status = status.as_u16(), "Invocation complete");
    Ok(())
}

fn write_template(output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let template = generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template)?;
            eprintln!("Wrote configuration template to {}", path.display());
        }
        None => print!("{}", template),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
