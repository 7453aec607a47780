use crate::plan::{run_plan, PlanArgs};
use crate::prepare::{run_prepare, PrepareArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use stockflow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "stockflow",
    about = "Plan budget-constrained reorders for low-stock inventory",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Allocate a reorder budget across low-stock products and write the report
    Plan(PlanArgs),
    /// Clean a raw sales export into the candidate snapshot layout
    Prepare(PrepareArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Keep recorded decisions in memory instead of the audit log file
    #[arg(long)]
    pub(crate) in_memory_audit: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plan(args) => run_plan(args),
        Command::Prepare(args) => run_prepare(args),
    }
}
