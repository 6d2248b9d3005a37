use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct TelemetryArgs {
    #[arg(short, long, help = "Log to stderr and report errors to sentry if configured")]
    pub debug: bool,

    #[arg(long = "sentry-dsn", help = "Sentry url")]
    pub sentry_dsn: Option<String>,

    #[arg(long, default_value = "dev", help = "Set the environment reported to sentry")]
    pub env: String,
}
