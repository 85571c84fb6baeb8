//! User service entry-point: loads settings, connects storage and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_service::domain::ports::{
    DeadlineUserRepository, InMemoryUserRepository, RequestDeadlines, UserRepository,
};
use user_service::inbound::http::state::HttpState;
use user_service::outbound::persistence::{MongoUserRepository, connect};
use user_service::settings::{LogFormat, Settings, StorageBackend};

fn init_tracing(format: LogFormat) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn build_repository(
    storage: StorageBackend,
    deadlines: RequestDeadlines,
) -> std::io::Result<Arc<dyn UserRepository>> {
    match storage {
        StorageBackend::Memory => {
            info!("using in-memory user storage");
            Ok(Arc::new(DeadlineUserRepository::new(
                InMemoryUserRepository::new(),
                deadlines,
            )))
        }
        StorageBackend::Mongo(mongo) => {
            let database = connect(&mongo).await.map_err(std::io::Error::other)?;
            let repository = MongoUserRepository::new(&database, &mongo.collection);
            Ok(Arc::new(DeadlineUserRepository::new(repository, deadlines)))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let runtime = settings.resolve().map_err(std::io::Error::other)?;

    init_tracing(runtime.log_format);

    let repository = build_repository(runtime.storage, runtime.deadlines).await?;
    let http_state = web::Data::new(HttpState::new(repository));

    let config =
        ServerConfig::new(runtime.listener).with_error_body_policy(runtime.error_body_policy);
    create_server(http_state, config)?.await
}
