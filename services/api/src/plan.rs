use chrono::Local;
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockflow::config::{AppConfig, ConfigError};
use stockflow::error::AppError;
use stockflow::telemetry;
use stockflow::workflows::reorder::report::views::ComparisonSummary;
use stockflow::workflows::reorder::{
    render_markdown, Budget, ComparisonReport, CsvAuditLog, CsvSnapshotSource, DecisionRecorder,
    RecordingSummary, ReorderError, ReportContext, RunComparator, RunType, SnapshotSource,
};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct PlanArgs {
    /// Reorder budget (falls back to STOCKFLOW_DEFAULT_BUDGET)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) budget: Option<f64>,
    /// Cleaned candidate snapshot CSV (defaults to STOCKFLOW_SNAPSHOT_PATH)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Append-only decision trail (defaults to STOCKFLOW_AUDIT_LOG_PATH)
    #[arg(long)]
    pub(crate) audit_log: Option<PathBuf>,
    /// Markdown report destination (defaults to STOCKFLOW_REPORT_PATH)
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Skip writing decision records
    #[arg(long)]
    pub(crate) no_audit: bool,
    /// Record the cheapest-first baseline run alongside the optimized run
    #[arg(long)]
    pub(crate) record_baseline: bool,
    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

/// Recording outcome for one run, reported apart from the allocation counts.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RecordingView {
    pub(crate) run_type: RunType,
    pub(crate) attempted: usize,
    pub(crate) persisted: usize,
    pub(crate) failed: usize,
}

impl From<&RecordingSummary> for RecordingView {
    fn from(summary: &RecordingSummary) -> Self {
        Self {
            run_type: summary.run_type,
            attempted: summary.attempted,
            persisted: summary.persisted,
            failed: summary.failed(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    report_path: &'a Path,
    summary: ComparisonSummary,
    recordings: &'a [RecordingView],
}

const NOTHING_TO_REORDER: &str =
    "No products are below their low-stock threshold; nothing to reorder.\n";

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    print!("{}", execute_plan(args, &config)?);
    Ok(())
}

/// Runs both allocators, records decisions and writes the report. Returns
/// the text to show the operator.
pub(crate) fn execute_plan(args: PlanArgs, config: &AppConfig) -> Result<String, AppError> {
    let budget = resolve_budget(args.budget, config.default_budget)?;

    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| config.storage.snapshot_path.clone());
    let snapshot = CsvSnapshotSource::new(snapshot_path).load()?;
    if snapshot.is_empty() {
        return Ok(NOTHING_TO_REORDER.to_string());
    }

    let report = RunComparator::new().compare(&snapshot, budget);

    let recordings = if args.no_audit {
        Vec::new()
    } else {
        let audit_path = args
            .audit_log
            .unwrap_or_else(|| config.storage.audit_log_path.clone());
        let recorder = DecisionRecorder::new(Arc::new(CsvAuditLog::new(audit_path)));
        let mut summaries = vec![recorder.record(report.optimized())];
        if args.record_baseline {
            summaries.push(recorder.record(report.baseline()));
        }
        summaries.iter().map(RecordingView::from).collect()
    };

    let report_path = args
        .report
        .unwrap_or_else(|| config.reporting.report_path.clone());
    let context = ReportContext {
        generated_at: Local::now().naive_local(),
        currency: config.reporting.currency.clone(),
    };
    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&report_path, render_markdown(&report, &context))?;
    info!(path = %report_path.display(), "wrote reorder report");

    if args.json {
        let output = PlanOutput {
            report_path: &report_path,
            summary: report.summary(),
            recordings: &recordings,
        };
        let rendered = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
        Ok(format!("{rendered}\n"))
    } else {
        Ok(render_plan_summary(
            &report,
            &recordings,
            &report_path,
            &config.reporting.currency,
        ))
    }
}

/// An explicit budget always wins; it is validated even when a default exists.
pub(crate) fn resolve_budget(
    explicit: Option<f64>,
    default_budget: Option<Budget>,
) -> Result<Budget, AppError> {
    match (explicit, default_budget) {
        (Some(amount), _) => Budget::new(amount).map_err(|err| ReorderError::from(err).into()),
        (None, Some(budget)) => Ok(budget),
        (None, None) => Err(ConfigError::MissingBudget.into()),
    }
}

pub(crate) fn render_plan_summary(
    report: &ComparisonReport,
    recordings: &[RecordingView],
    report_path: &Path,
    currency: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Reorder plan for budget {currency} {:.2}",
        report.budget().amount()
    );

    for run in [report.optimized(), report.baseline()] {
        let _ = writeln!(out, "\n{}", run.run_type().label());
        let _ = writeln!(
            out,
            "- {} evaluated | {} selected | {} rejected",
            run.items_evaluated(),
            run.selected().len(),
            run.rejected().len()
        );
        let _ = writeln!(
            out,
            "- spent {currency} {:.2} | remaining {currency} {:.2} | expected profit {currency} {:.2}",
            run.total_cost_spent(),
            run.remaining_budget(),
            run.total_expected_profit()
        );
    }

    let _ = writeln!(
        out,
        "\nProfit difference vs baseline: {currency} {:.2}",
        report.profit_uplift()
    );

    if recordings.is_empty() {
        out.push_str("Audit log: skipped\n");
    }
    for recording in recordings {
        let _ = writeln!(
            out,
            "Audit log ({}): {} of {} decisions written, {} failed writes",
            recording.run_type.label(),
            recording.persisted,
            recording.attempted,
            recording.failed
        );
    }

    let _ = writeln!(out, "Report written to {}", report_path.display());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use stockflow::config::{
        AppEnvironment, ReportingConfig, ServerConfig, StorageConfig, TelemetryConfig,
    };
    use stockflow::workflows::reorder::{
        CandidateItem, CandidateRow, DecisionStatus, ItemId, Snapshot,
    };

    const SNAPSHOT: &str = "PRODUCT_ID,PRODUCT_NAME,CURRENT_STOCK,REORDER_QUANTITY,UNIT_COST,UNIT_PRICE,LOW_STOCK_THRESHOLD\n\
X,Xylitol Gum,0,100.00,1.00,1.90,1.00\n\
Y,Yerba Mate,0,60.00,1.00,1.50,1.00\n\
Z,Zest Soda,0,50.00,1.00,1.40,1.00\n";

    static SCRATCH: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stockflow-plan-{}-{}",
            std::process::id(),
            SCRATCH.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    fn config(dir: &Path) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            storage: StorageConfig {
                snapshot_path: dir.join("snapshot.csv"),
                audit_log_path: dir.join("audit.csv"),
            },
            reporting: ReportingConfig {
                report_path: dir.join("reports").join("plan.md"),
                currency: "Rs".to_string(),
            },
            default_budget: Budget::new(150.0).ok(),
        }
    }

    fn report() -> ComparisonReport {
        let items = [("X", 100.0, 1.9), ("Y", 60.0, 1.5), ("Z", 50.0, 1.4)]
            .into_iter()
            .map(|(id, quantity, unit_price)| {
                CandidateItem::from_row(CandidateRow {
                    id: ItemId::from(id),
                    name: id.to_string(),
                    current_stock: 0.0,
                    reorder_quantity: quantity,
                    unit_cost: 1.0,
                    unit_price,
                    low_stock_threshold: 1.0,
                })
                .expect("valid candidate")
            })
            .collect();
        RunComparator::new().compare(&Snapshot::new(items), Budget::new(150.0).expect("budget"))
    }

    #[test]
    fn explicit_budget_is_validated_before_the_default() {
        let fallback = Budget::new(500.0).ok();
        let error = resolve_budget(Some(-1.0), fallback).expect_err("negative budget");
        assert!(matches!(
            error,
            AppError::Reorder(ReorderError::Configuration(_))
        ));

        let budget = resolve_budget(None, fallback).expect("default budget");
        assert_eq!(budget.amount(), 500.0);
    }

    #[test]
    fn missing_budget_is_a_configuration_error() {
        let error = resolve_budget(None, None).expect_err("no budget");
        assert!(matches!(error, AppError::Config(ConfigError::MissingBudget)));
    }

    #[test]
    fn summary_reports_failed_writes_separately() {
        let recordings = vec![RecordingView {
            run_type: RunType::Optimized,
            attempted: 3,
            persisted: 2,
            failed: 1,
        }];
        let text = render_plan_summary(&report(), &recordings, Path::new("plan.md"), "Rs");

        assert!(text.contains("Reorder plan for budget Rs 150.00"));
        assert!(text.contains("- 3 evaluated | 2 selected | 1 rejected"));
        assert!(text.contains("Profit difference vs baseline: Rs 60.00"));
        assert!(text.contains(
            "Audit log (Priority Score (Greedy)): 2 of 3 decisions written, 1 failed writes"
        ));
        assert!(text.contains("Report written to plan.md"));
    }

    #[test]
    fn skipped_audit_is_reported() {
        let text = render_plan_summary(&report(), &[], Path::new("plan.md"), "Rs");
        assert!(text.contains("Audit log: skipped"));
    }

    #[test]
    fn recording_the_baseline_appends_a_second_batch() {
        let dir = scratch_dir();
        let config = config(&dir);
        std::fs::write(&config.storage.snapshot_path, SNAPSHOT).expect("snapshot written");

        let text = execute_plan(
            PlanArgs {
                record_baseline: true,
                ..PlanArgs::default()
            },
            &config,
        )
        .expect("plan runs");

        let decisions = CsvAuditLog::new(&config.storage.audit_log_path)
            .read_all()
            .expect("audit log parses");
        assert_eq!(decisions.len(), 6);
        assert!(decisions[..3]
            .iter()
            .all(|decision| decision.run_type == RunType::Optimized));
        assert!(decisions[3..]
            .iter()
            .all(|decision| decision.run_type == RunType::Baseline));
        assert_eq!(decisions[3].item_id.0, "Z");
        assert_eq!(decisions[5].item_id.0, "X");
        assert_eq!(decisions[5].status, DecisionStatus::Rejected);

        let markdown =
            std::fs::read_to_string(&config.reporting.report_path).expect("report written");
        assert!(markdown.contains("Xylitol Gum"));
        assert!(text.contains(
            "Audit log (Cheapest First (Baseline)): 3 of 3 decisions written, 0 failed writes"
        ));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn json_output_lists_the_recorded_runs() {
        let dir = scratch_dir();
        let config = config(&dir);
        std::fs::write(&config.storage.snapshot_path, SNAPSHOT).expect("snapshot written");
        let report_path = dir.join("override.md");

        let text = execute_plan(
            PlanArgs {
                budget: Some(160.0),
                report: Some(report_path.clone()),
                json: true,
                ..PlanArgs::default()
            },
            &config,
        )
        .expect("plan runs");

        let value: serde_json::Value = serde_json::from_str(&text).expect("json output");
        assert_eq!(value["recordings"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["recordings"][0]["run_type"], "OPTIMIZED");
        assert_eq!(value["summary"]["optimized"]["items_selected"], 2);
        assert!(report_path.exists());
        assert!(!config.reporting.report_path.exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_snapshot_writes_nothing() {
        let dir = scratch_dir();
        let config = config(&dir);
        std::fs::write(
            &config.storage.snapshot_path,
            "PRODUCT_ID,PRODUCT_NAME,CURRENT_STOCK,REORDER_QUANTITY,UNIT_COST,UNIT_PRICE,LOW_STOCK_THRESHOLD\n\
             106,Cola,35,26.00,1.30,2.00,8.00\n",
        )
        .expect("snapshot written");

        let text = execute_plan(
            PlanArgs {
                record_baseline: true,
                ..PlanArgs::default()
            },
            &config,
        )
        .expect("plan runs");

        assert_eq!(text, NOTHING_TO_REORDER);
        assert!(!config.storage.audit_log_path.exists());
        assert!(!config.reporting.report_path.exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
