use clap::{Args, Parser, Subcommand};
use kokoro_utils::args::api::ApiArgs;
use kokoro_utils::args::telemetry::TelemetryArgs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kokoro", about = "Take mental health screenings against an assessment service")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Answer a questionnaire interactively and view the risk assessment
    Assess(Assess),

    /// List previous assessments
    History(History),

    /// Show the most recent risk assessment
    Latest(Latest),

    /// Show support resources for a risk level
    Resources(Resources),

    Register(Register),

    /// Check that the service is reachable
    Status,

    /// Write json schemas of the exchanged data
    Schema(Schema),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct Login {
    #[arg(long, env = "KOKORO_EMAIL")]
    pub(crate) email: String,

    #[arg(long, env = "KOKORO_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,
}

#[derive(Debug, Parser)]
pub(crate) struct Assess {
    #[command(flatten)]
    pub(crate) login: Login,

    #[arg(short, long, help = "Skip the selection and start this questionnaire")]
    pub(crate) questionnaire: Option<String>,

    #[arg(long, help = "Refuse to submit until every question is answered")]
    pub(crate) require_complete: bool,

    #[arg(long, help = "Refuse to submit answers outside a question's scale")]
    pub(crate) strict_scale: bool,

    #[arg(long, help = "Show support resources together with the result")]
    pub(crate) resources: bool,
}

#[derive(Debug, Parser)]
pub(crate) struct History {
    #[command(flatten)]
    pub(crate) login: Login,

    #[arg(short, long)]
    pub(crate) limit: Option<u32>,
}

#[derive(Debug, Parser)]
pub(crate) struct Latest {
    #[command(flatten)]
    pub(crate) login: Login,
}

#[derive(Debug, Parser)]
pub(crate) struct Resources {
    #[arg(required = true)]
    pub(crate) level: String,

    #[command(flatten)]
    pub(crate) login: Login,
}

#[derive(Debug, Parser)]
pub(crate) struct Register {
    #[arg(long)]
    pub(crate) email: String,

    #[arg(long)]
    pub(crate) username: String,

    #[arg(long, env = "KOKORO_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,

    #[arg(long)]
    pub(crate) full_name: String,

    #[arg(long)]
    pub(crate) age: u32,

    #[arg(long)]
    pub(crate) gender: String,
}

#[derive(Debug, Parser)]
pub(crate) struct Schema {
    #[arg(required = true)]
    pub(crate) output_folder: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_flags() {
        let cli = Cli::try_parse_from([
            "kokoro",
            "assess",
            "--email",
            "ada@example.org",
            "--password",
            "secret",
            "--questionnaire",
            "phq9",
            "--strict-scale",
        ])
        .unwrap();
        let Commands::Assess(assess) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(assess.questionnaire.as_deref(), Some("phq9"));
        assert!(assess.strict_scale);
        assert!(!assess.require_complete);
        assert!(!cli.telemetry.debug);
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from(["kokoro", "--api-url", "https://mind.example.org", "--debug", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert!(cli.telemetry.debug);
        assert_eq!(cli.api.api_url.as_str(), "https://mind.example.org/");
    }

    #[test]
    fn test_resources_needs_level() {
        assert!(Cli::try_parse_from(["kokoro", "resources", "--email", "a@b.c", "--password", "x"]).is_err());
    }
}
