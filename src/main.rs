use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pharmabill::config::{database, seed, Config, LogFormat};
use pharmabill::middleware::RequestId;
use pharmabill::AppState;

fn init_tracing(format: LogFormat, level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pharmabill=debug,actix_web={}", level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.app.log_format, &config.app.log_level);
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting PharmaBill");
    tracing::info!("Environment: {}", config.app.env);

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to open database")?;
    database::run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    if config.app.seed_demo_data {
        seed::seed_demo_data(&pool)
            .await
            .context("Failed to seed demo data")?;
    }

    let state = AppState::build(pool, config.invoicing.clone(), config.inventory.clone())
        .await
        .context("Failed to initialise services")?;

    let bind_address = config.server.bind_address();
    let allowed_origin = config.cors.allowed_origin.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .wrap(RequestId)
            .wrap(cors)
            .configure(|cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
