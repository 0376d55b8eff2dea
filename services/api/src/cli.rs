use crate::demo::{run_demo, run_overdue_batch, DemoArgs, OverdueBatchArgs};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rental_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rental Desk",
    about = "Run the movie rental desk service and its overdue notice batch",
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
    /// Run one overdue notice pass over the sample store
    NotifyOverdue(OverdueBatchArgs),
    /// Walk through pricing, due-date and eligibility rules from the command line
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
    /// Pin the business date (YYYY-MM-DD) instead of using the system clock
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::NotifyOverdue(args) => run_overdue_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
