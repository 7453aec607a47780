use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use stockflow::workflows::reorder::{Decision, DecisionSink, PersistenceError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Where the plan endpoint reads candidates from and records decisions to.
#[derive(Clone)]
pub(crate) struct PlanningContext {
    pub(crate) snapshot_path: PathBuf,
    pub(crate) audit: Arc<dyn DecisionSink>,
}

/// Decision trail kept in process memory; used when the service runs
/// without an audit log file.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditLog {
    decisions: Arc<Mutex<Vec<Decision>>>,
}

impl DecisionSink for InMemoryAuditLog {
    fn append(&self, decision: &Decision) -> Result<(), PersistenceError> {
        let mut guard = self
            .decisions
            .lock()
            .map_err(|_| PersistenceError::Unavailable("audit mutex poisoned".into()))?;
        guard.push(decision.clone());
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryAuditLog {
    pub(crate) fn decisions(&self) -> Vec<Decision> {
        self.decisions
            .lock()
            .expect("audit mutex poisoned")
            .clone()
    }
}
