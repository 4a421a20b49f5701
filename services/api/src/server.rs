use crate::cli::ServeArgs;
use crate::infra::{AppState, IdentityBackend, LedgerStore};
use crate::routes::with_finance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use finance_ai::assistant::GeminiClient;
use finance_ai::config::AppConfig;
use finance_ai::error::AppError;
use finance_ai::telemetry;
use finance_ai::FinanceApp;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(LedgerStore::from_config(&config.ledger)?);
    let identity = Arc::new(IdentityBackend::from_config(&config.identity));
    let advisor = Arc::new(GeminiClient::new(&config.assistant));
    if !advisor.is_configured() {
        warn!("GEMINI_API_KEY not set; advisor endpoints answer 503 AI_NOT_CONFIGURED");
    }

    let finance_app = Arc::new(FinanceApp::new(store, identity, advisor));
    let app = with_finance_routes(finance_app)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "finance api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
