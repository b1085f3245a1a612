use anyhow::Result;
use clap::Parser;
use oss_bench::BenchConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oss-bench", version, about = "Measure object storage download throughput")]
struct Cli {
  #[clap(flatten)]
  config: BenchConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenv::dotenv().ok();

  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  oss_bench::run(&cli.config).await?;
  Ok(())
}
