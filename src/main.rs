use clap::Parser as _;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use vartree::application::{Application, ApplicationError};
use vartree::cli::Cli;

#[compio::main]
#[snafu::report]
async fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args).await?;

    Ok(())
}

fn setup_tracing(cli_args: &Cli) {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(cli_args.log_level))
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
