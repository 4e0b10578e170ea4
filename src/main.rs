//! FitTrack
//!
//! Fitness and nutrition tracking server, over HTTP (default) or MCP stdio.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use fittrack::build_info;
use fittrack::config::{ServerConfig, Transport};
use fittrack::db::{self, Database};
use fittrack::http;
use fittrack::mcp::FitTrackService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the MCP stdio channel stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fittrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env()?;

    build_info::print_startup_banner(config.transport.as_str());
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "Database schema ready");
        Ok(())
    })?;

    match config.transport {
        Transport::Http => {
            http::serve(&config, database).await?;
        }
        Transport::Mcp => {
            eprintln!("Starting MCP server on stdio...");
            let service = FitTrackService::new(database);
            let server = service.serve((stdin(), stdout())).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
