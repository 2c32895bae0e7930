//! hwregistryd entry point.
//!
//! Builds the registry core, starts the interval presence poller and
//! serves the admin HTTP and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hwregistry::api;
use hwregistry::app_state::AppState;
use hwregistry::config::{LogFormat, RegistryConfig};
use hwregistry::domain::{EventBus, InstanceRegistry};
use hwregistry::service::ServiceManager;
use hwregistry::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = RegistryConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting hwregistryd");

    // Build domain layer
    let registry = Arc::new(InstanceRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let service_manager = Arc::new(
        ServiceManager::new(registry, event_bus.clone()).with_ref_baseline(config.ref_baseline),
    );
    let poller = service_manager.spawn_presence_poller(config.client_poll_interval());
    tracing::info!(
        interval_secs = config.client_poll_interval_secs,
        ref_baseline = config.ref_baseline,
        "presence poller started"
    );

    // Build application state
    let app_state = AppState {
        service_manager,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "admin surface listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    poller.abort();
    tracing::info!("hwregistryd stopped");
    Ok(())
}
