use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use eventlinq_match::config::{LogFormat, LoggingSettings, Settings, StoreBackend};
use eventlinq_match::core::Matcher;
use eventlinq_match::routes::{self, AppState};
use eventlinq_match::services::{
    CachedProfileStore, InMemoryProfileStore, IntroStore, PostgresProfileStore, ProfileStore,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

/// `EVENTLINQ_CONFIG` points at an alternative settings file
fn load_settings() -> Result<Settings, config::ConfigError> {
    match std::env::var("EVENTLINQ_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    }
}

type Stores = (Arc<dyn ProfileStore>, Arc<dyn IntroStore>);

async fn build_stores(settings: &Settings) -> std::io::Result<Stores> {
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(60);
    let cache_capacity = settings.cache.capacity.unwrap_or(1000);

    match settings.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            let memory = Arc::new(InMemoryProfileStore::new());
            let profiles: Arc<dyn ProfileStore> = memory.clone();
            let intros: Arc<dyn IntroStore> = memory;
            Ok((profiles, intros))
        }
        StoreBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresProfileStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );

            let intros: Arc<dyn IntroStore> = Arc::new(postgres.clone());

            let profiles: Arc<dyn ProfileStore> = if settings.cache.enabled {
                info!("Profile cache enabled ({} entries, TTL: {}s)", cache_capacity, cache_ttl);
                Arc::new(CachedProfileStore::new(postgres, cache_capacity, cache_ttl))
            } else {
                Arc::new(postgres)
            };

            Ok((profiles, intros))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging comes up with defaults if the settings themselves fail to load
    let settings = load_settings();
    init_logging(
        &settings
            .as_ref()
            .map(|s| s.logging.clone())
            .unwrap_or_default(),
    );

    info!("Starting EventLinq match service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let (store, intros) = build_stores(&settings).await?;

    let matcher = Matcher::new(settings.matcher_config());

    info!("Matcher initialized: {:?}", matcher.config());

    let app_state = AppState {
        store,
        intros,
        matcher,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
