use crate::infra::{AppState, PlanningContext};
use crate::plan::RecordingView;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use stockflow::error::AppError;
use stockflow::workflows::reorder::report::views::ComparisonSummary;
use stockflow::workflows::reorder::{
    Budget, CsvSnapshotSource, DecisionRecorder, ReorderError, RunComparator, SnapshotSource,
};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct PlanRequest {
    pub(crate) budget: f64,
    /// Cleaned snapshot CSV; the configured snapshot file is used when absent.
    #[serde(default)]
    pub(crate) snapshot_csv: Option<String>,
    /// Persist the optimized run's decisions to the audit log.
    #[serde(default)]
    pub(crate) record: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlanResponse {
    pub(crate) data_source: SnapshotDataSource,
    pub(crate) summary: ComparisonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) recording: Option<RecordingView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SnapshotDataSource {
    Request,
    Configured,
}

pub(crate) fn reorder_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/reorder/plan", axum::routing::post(plan_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn plan_endpoint(
    Extension(planning): Extension<PlanningContext>,
    Json(payload): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let PlanRequest {
        budget,
        snapshot_csv,
        record,
    } = payload;

    let budget = Budget::new(budget).map_err(ReorderError::from)?;

    let (snapshot, data_source) = match snapshot_csv {
        Some(csv) => (
            CsvSnapshotSource::from_reader(Cursor::new(csv.into_bytes()))?,
            SnapshotDataSource::Request,
        ),
        None => (
            CsvSnapshotSource::new(planning.snapshot_path.clone()).load()?,
            SnapshotDataSource::Configured,
        ),
    };

    let report = RunComparator::new().compare(&snapshot, budget);

    let recording = if record {
        let recorder = DecisionRecorder::new(planning.audit.clone());
        Some(RecordingView::from(&recorder.record(report.optimized())))
    } else {
        None
    };

    info!(
        ?data_source,
        candidates = snapshot.len(),
        recorded = record,
        "served reorder plan"
    );

    Ok(Json(PlanResponse {
        data_source,
        summary: report.summary(),
        recording,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAuditLog;
    use axum::body::Body;
    use axum::http::Request;
    use std::path::PathBuf;
    use std::sync::Arc;
    use stockflow::workflows::reorder::{DecisionStatus, RunType};
    use tower::ServiceExt;

    const SNAPSHOT: &str = "PRODUCT_ID,PRODUCT_NAME,CURRENT_STOCK,REORDER_QUANTITY,UNIT_COST,UNIT_PRICE,LOW_STOCK_THRESHOLD\n\
108,Coffee Beans,1,7.00,6.00,15.00,3.00\n\
107,Energy Drink,0,10.00,2.50,5.00,3.00\n\
106,Cola,35,26.00,1.30,2.00,8.00\n\
101,Berry Juice,4,20.00,2.70,4.50,6.00\n";

    fn planning(audit: InMemoryAuditLog) -> PlanningContext {
        PlanningContext {
            snapshot_path: PathBuf::from("./no-such-snapshot.csv"),
            audit: Arc::new(audit),
        }
    }

    fn request(budget: f64, record: bool) -> PlanRequest {
        PlanRequest {
            budget,
            snapshot_csv: Some(SNAPSHOT.to_string()),
            record,
        }
    }

    #[tokio::test]
    async fn plan_endpoint_returns_both_runs() {
        let audit = InMemoryAuditLog::default();
        let Json(body) = plan_endpoint(Extension(planning(audit.clone())), Json(request(70.0, false)))
            .await
            .expect("plan builds");

        assert_eq!(body.data_source, SnapshotDataSource::Request);
        assert_eq!(body.summary.optimized.items_evaluated, 3);
        assert_eq!(body.summary.ranked[0].name, "Coffee Beans");
        let selected: Vec<&str> = body
            .summary
            .optimized
            .selected
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(selected, vec!["Coffee Beans", "Energy Drink"]);
        assert!(body.recording.is_none());
        assert!(audit.decisions().is_empty());
    }

    #[tokio::test]
    async fn plan_endpoint_records_the_optimized_run() {
        let audit = InMemoryAuditLog::default();
        let Json(body) = plan_endpoint(Extension(planning(audit.clone())), Json(request(70.0, true)))
            .await
            .expect("plan builds");

        let recording = body.recording.expect("recording summary");
        assert_eq!(recording.attempted, 3);
        assert_eq!(recording.persisted, 3);
        assert_eq!(recording.failed, 0);

        let decisions = audit.decisions();
        assert!(decisions
            .iter()
            .all(|decision| decision.run_type == RunType::Optimized));
        assert_eq!(decisions[2].item_id.0, "101");
        assert_eq!(decisions[2].status, DecisionStatus::Rejected);
        assert_eq!(decisions[2].budget_cost, 0.0);
    }

    #[tokio::test]
    async fn negative_budget_is_a_bad_request() {
        let router = reorder_routes().layer(Extension(planning(InMemoryAuditLog::default())));

        let response = router
            .oneshot(
                Request::post("/api/v1/reorder/plan")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "budget": -1.0, "snapshot_csv": SNAPSHOT }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_configured_snapshot_is_unavailable() {
        let router = reorder_routes().layer(Extension(planning(InMemoryAuditLog::default())));

        let response = router
            .oneshot(
                Request::post("/api/v1/reorder/plan")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "budget": 100.0 }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
