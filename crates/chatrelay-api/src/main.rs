use axum::{routing::any, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatrelay_api::{
    handlers::complete,
    queue::{StorageQueuePublisher, STORAGE_SCOPE},
    settings::ApiSettings,
    state::AppState,
};
use chatrelay_llm::{AzureChatClient, Credential, EntraTokenProvider, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    init_logging();

    // Missing configuration is a fatal precondition: report and terminate
    // before any network activity.
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("{}", err);
            std::process::exit(1);
        }
    };
    let api_settings = match ApiSettings::from_env() {
        Ok(api_settings) => api_settings,
        Err(err) => {
            tracing::warn!("{}", err);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting chatrelay API server");

    // The identity chain reads the managed-identity client id from
    // AZURE_CLIENT_ID. Export it here, once, before any credential or
    // provider is built; nothing else reads the environment after startup.
    if let Some(id) = &settings.client_id {
        std::env::set_var("AZURE_CLIENT_ID", id);
    }

    // Credential-acquisition failures propagate unhandled.
    let credential = Credential::resolve(&settings)?;
    let client = AzureChatClient::builder()
        .resource_name(settings.service.as_str())
        .deployment(settings.deployment.as_str())
        .credential(credential)
        .build()?;

    // The queue always authenticates with identity tokens, independently of
    // which strategy the chat client resolved.
    let queue_provider = EntraTokenProvider::new(STORAGE_SCOPE)?;
    let publisher =
        StorageQueuePublisher::new(&api_settings.queue_service_url, Arc::new(queue_provider));

    let state = Arc::new(AppState::new(Arc::new(client), Arc::new(publisher)));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", api_settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/complete", any(complete::complete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_logging() {
    // Default to warn, matching the demo's deliberately quiet baseline;
    // RUST_LOG raises verbosity for the Azure and HTTP layers.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
