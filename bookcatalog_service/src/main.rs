use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime::TokioCurrentThread;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use bookcatalog_service::app_config::config_app;
use bookcatalog_service::catalog::CatalogService;
use bookcatalog_service::catalog_repository::{
    CatalogRepository, InMemoryCatalogRepository, PostgresCatalogRepository,
};
use bookcatalog_service::reviews::ReviewAggregator;
use bookcatalog_service::settings::Settings;

// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
fn init_telemetry() {
    let app_name = "bookcatalog_service";

    // Start a new Jaeger trace pipeline.
    // Spans are exported in batch - recommended setup for a production application.
    global::set_text_map_propagator(TraceContextPropagator::new());
    #[allow(deprecated)]
    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(app_name)
        .install_batch(TokioCurrentThread)
        .expect("Failed to install OpenTelemetry tracer.");

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Create a `tracing` layer using the Jaeger tracer
    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);
    // Create a `tracing` layer to emit spans as structured logs to stdout
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    // Combined them all together in a `tracing` subscriber
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber.")
}

async fn init_catalog_repository(
    settings: &Settings,
) -> anyhow::Result<Arc<dyn CatalogRepository>> {
    if settings.use_in_memory_db {
        return Ok(match &settings.catalog_seed_path {
            Some(path) => Arc::new(InMemoryCatalogRepository::from_seed_file(path)?),
            None => Arc::new(InMemoryCatalogRepository::default()),
        });
    }
    Ok(Arc::new(
        PostgresCatalogRepository::init(settings.pool_config()?).await?,
    ))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let mut settings = Settings::load()?;
    // The first command line argument takes precedence over PORT
    if let Some(port) = std::env::args().nth(1) {
        settings.port = port.parse().context("Invalid port argument")?;
    }

    let catalog_repository = init_catalog_repository(&settings).await?;
    let catalog = Arc::new(CatalogService::new(
        catalog_repository,
        settings.page_size()?,
    ));
    let review_aggregator = Arc::new(ReviewAggregator::new(
        &settings.reviews_url,
        settings.api_key()?,
    )?);

    let server = HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(review_aggregator.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind(("0.0.0.0", settings.port))?;

    tracing::info!("Application started on port {}", settings.port);
    server.run().await?;

    Ok(())
}
