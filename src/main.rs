use clap::Parser;
use depotkit::cli::{self, Cli};
use depotkit::init_logging_with;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging_with(cli.log_format)?;
    tracing::debug!("depotkit {} (built {})", depotkit::VERSION, depotkit::BUILD_DATE);

    cli::run(cli).await
}
