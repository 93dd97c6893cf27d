use std::io;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use hindsight::core::history::{PRINCIPAL, START_AGE};
use hindsight::core::{
    DEFAULT_BOND_OFFSET, DEFAULT_CAP_GAINS_RATE, Page, Result, Scenario, build_report,
};

#[derive(Parser, Debug)]
#[command(
    name = "hindsight",
    about = "Historical comparison charts: glide paths, Roth vs brokerage, stocks vs silver"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print one page report as JSON
    Report(ReportArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPage {
    GlidePath,
    Roth,
    Silver,
}

impl From<CliPage> for Page {
    fn from(value: CliPage) -> Self {
        match value {
            CliPage::GlidePath => Page::GlidePath,
            CliPage::Roth => Page::Roth,
            CliPage::Silver => Page::Silver,
        }
    }
}

#[derive(clap::Args, Debug)]
struct ReportArgs {
    #[arg(value_enum)]
    page: CliPage,
    #[arg(
        long,
        default_value_t = DEFAULT_BOND_OFFSET,
        allow_hyphen_values = true,
        help = "Age at which bond allocation starts rising from zero"
    )]
    bond_offset: i32,
    #[arg(
        long,
        default_value_t = DEFAULT_CAP_GAINS_RATE,
        help = "Capital gains tax rate on sale in percent"
    )]
    cap_gains_rate: f64,
    #[arg(long, default_value_t = START_AGE)]
    start_age: u32,
    #[arg(long, default_value_t = PRINCIPAL)]
    principal: f64,
    #[arg(long)]
    pretty: bool,
}

impl ReportArgs {
    fn scenario(&self) -> Result<Scenario> {
        Scenario {
            bond_offset: self.bond_offset,
            cap_gains_rate: self.cap_gains_rate,
            start_age: self.start_age,
            principal: self.principal,
        }
        .validated()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Serve { bind, port } => {
            if let Err(e) = hindsight::api::run_http_server(SocketAddr::new(bind, port)).await {
                error!(error = %e, "server error");
                return ExitCode::FAILURE;
            }
        }
        Command::Report(args) => {
            let scenario = match args.scenario() {
                Ok(scenario) => scenario,
                Err(e) => {
                    error!(error = %e, "invalid scenario");
                    return ExitCode::FAILURE;
                }
            };
            let report = match build_report(args.page.into(), &scenario) {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "report failed");
                    return ExitCode::FAILURE;
                }
            };
            let json = if args.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            match json {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!(error = %e, "could not serialize report");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
