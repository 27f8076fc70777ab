use clap::Parser;
use daily_spend::args::{Args, Command};
use daily_spend::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without a real Transactions export. When
    // DAILY_SPEND_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Testing,
    // otherwise it will be Mode::Csv.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(
            home,
            init_args.transactions_csv(),
            init_args.categories_csv(),
        )
        .await?
        .print(),

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            commands::report(config, mode, report_args.date())
                .await?
                .print()
        }

        Command::Trends(trends_args) => {
            let config = Config::load(home).await?;
            commands::trends(config, mode, trends_args.end(), trends_args.days())
                .await?
                .print()
        }

        Command::Classify(classify_args) => {
            let config = Config::load(home).await?;
            commands::classify(&config, classify_args.description()).print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only. The binary and
            // the library share the crate name `daily_spend`.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
