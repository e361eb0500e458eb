//! Classroom Extender - course and roster backend for Google Classroom.
//!
//! This binary parses configuration, connects to MongoDB, and serves the API.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classroom_extender::{
    config::Config,
    server::create_router,
    store::{self, MongoClassroomStore},
    GoogleClassroomClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Classroom Extender v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  MongoDB database: {}", config.mongo_database);
    info!("  Classroom API: {}", config.classroom_api_url);
    info!("  Redirect URI: {}", config.google_redirect_uri);
    match config.cors_origin {
        Some(ref origin) => info!("  CORS origin: {}", origin),
        None => info!("  CORS origin: any"),
    }

    info!("Connecting to MongoDB...");
    let db = match store::connect(&config.mongo_uri, &config.mongo_database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to MongoDB: {}", e);
            error!("  Check that the server is reachable and CLASSROOM_MONGO_URI is correct");
            return ExitCode::FAILURE;
        }
    };
    let store = MongoClassroomStore::new(&db);

    let classroom = match GoogleClassroomClient::with_endpoints(
        config.oauth_credentials(),
        config.http_timeout(),
        config.classroom_api_url.as_str(),
        config.google_auth_url.as_str(),
        config.google_token_url.as_str(),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build classroom client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router = create_router(classroom, store, config.router_config());

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on http://{}", addr);
    info!("  curl http://{}/health", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "classroom_extender=debug,tower_http=debug"
    } else {
        "classroom_extender=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
