use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAuditLog, PlanningContext};
use crate::routes::reorder_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stockflow::config::AppConfig;
use stockflow::error::AppError;
use stockflow::telemetry;
use stockflow::workflows::reorder::{CsvAuditLog, DecisionSink};
use tracing::info;

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

    let audit: Arc<dyn DecisionSink> = if args.in_memory_audit {
        Arc::new(InMemoryAuditLog::default())
    } else {
        Arc::new(CsvAuditLog::new(config.storage.audit_log_path.clone()))
    };
    let planning = PlanningContext {
        snapshot_path: config.storage.snapshot_path.clone(),
        audit,
    };

    let app = reorder_routes()
        .layer(Extension(planning))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        in_memory_audit = args.in_memory_audit,
        "reorder planning service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
