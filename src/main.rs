//! pricewatch-gateway server entry point.
//!
//! Starts the Axum HTTP server and, when enabled, the background spot
//! price poller.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pricewatch_gateway::api;
use pricewatch_gateway::app_state::AppState;
use pricewatch_gateway::config::GatewayConfig;
use pricewatch_gateway::notifier::{AlertNotifier, SmtpNotifier};
use pricewatch_gateway::persistence::memory::{MemoryAlertStore, MemoryHistoryStore};
use pricewatch_gateway::persistence::postgres::{PgAlertStore, PgHistoryStore};
use pricewatch_gateway::persistence::{AlertStore, HistoryStore};
use pricewatch_gateway::pricing::aws::AwsPricingProvider;
use pricewatch_gateway::pricing::PricingProvider;
use pricewatch_gateway::scheduler::SpotPricePoller;
use pricewatch_gateway::service::{HistoryService, PricingService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting pricewatch-gateway");

    // Build persistence layer
    let (history_store, alert_store): (Arc<dyn HistoryStore>, Arc<dyn AlertStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await?;
                sqlx::migrate!().run(&pool).await?;
                tracing::info!("connected to postgres");
                (
                    Arc::new(PgHistoryStore::new(pool.clone())),
                    Arc::new(PgAlertStore::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory stores");
                (
                    Arc::new(MemoryHistoryStore::new()),
                    Arc::new(MemoryAlertStore::new()),
                )
            }
        };

    // Build pricing and service layer
    let provider: Arc<dyn PricingProvider> = Arc::new(AwsPricingProvider::from_env().await);
    let pricing = Arc::new(PricingService::new(
        Arc::clone(&provider),
        config.cache_ttl,
    ));
    let history = Arc::new(HistoryService::new(
        Arc::clone(&history_store),
        Arc::clone(&pricing),
        config.history_seed_days,
    ));

    // Build notifier, when SMTP is configured
    let notifier: Option<Arc<dyn AlertNotifier>> = match &config.smtp {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp).map_err(|e| e.to_string())?;
            tracing::info!(host = %smtp.host, "smtp notifier configured");
            Some(Arc::new(notifier))
        }
        None => {
            tracing::warn!("SMTP not configured, alert delivery disabled");
            None
        }
    };

    // Start the background spot price poller
    if config.poller_enabled {
        let poller = Arc::new(SpotPricePoller::new(
            Arc::clone(&provider),
            Arc::clone(&history_store),
            Arc::clone(&alert_store),
            notifier,
            config.poll_interval,
            config.alert_quiet_period,
        ));
        tracing::info!(
            interval_secs = config.poll_interval.as_secs(),
            "spot price poller enabled"
        );
        tokio::spawn(poller.run());
    } else {
        tracing::info!("spot price poller disabled");
    }

    // Build application state and router
    let app_state = AppState::new(pricing, history, alert_store);
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
