use clap::Args;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, Args)]
pub struct ApiArgs {
    #[arg(
        long = "api-url",
        env = "KOKORO_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Base url of the assessment service"
    )]
    pub api_url: Url,

    #[arg(long, help = "Give up on a request after this many seconds. Requests wait indefinitely if unset")]
    pub timeout_secs: Option<u64>,
}

impl ApiArgs {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        api: ApiArgs,
    }

    #[test]
    fn test_explicit_values() {
        let cli = Cli::try_parse_from(["kokoro", "--api-url", "https://mind.example.org/", "--timeout-secs", "5"]).unwrap();
        assert_eq!(cli.api.api_url.as_str(), "https://mind.example.org/");
        assert_eq!(cli.api.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_timeout_is_optional() {
        let cli = Cli::try_parse_from(["kokoro", "--api-url", "http://localhost:8000"]).unwrap();
        assert_eq!(cli.api.timeout(), None);
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(Cli::try_parse_from(["kokoro", "--api-url", "not a url"]).is_err());
    }
}
