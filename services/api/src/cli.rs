use crate::demo::{run_demo, run_profile_report, DemoArgs, ProfileReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use donor_ledger::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Donor Ledger",
    about = "Reconcile donor activity into eligibility, tier, and achievement summaries",
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
    /// Print a donor profile report from a JSON snapshot and optional payments CSV
    Profile(ProfileReportArgs),
    /// Run the engine against a built-in sample donor
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Profile(args) => run_profile_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
