mod cli;

use anyhow::Result;
use clap::Parser;
use cli::opt;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = opt::Cli::parse();
    let _guard = opt
        .telemetry
        .debug
        .then(|| {
            kokoro_utils::tracing::setup(
                kokoro_utils::tracing::TracingConfig::builder()
                    .package(env!("CARGO_PKG_NAME"))
                    .version(env!("CARGO_PKG_VERSION"))
                    .sentry_dsn(opt.telemetry.sentry_dsn.clone())
                    .env(opt.telemetry.env.clone())
                    .build(),
            )
        })
        .transpose()?;
    cli::exec(opt.command, &opt.api).await
}
