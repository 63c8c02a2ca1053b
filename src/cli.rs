use crate::config::ConfigOverrides;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "logsearch",
    about = "Ask questions about your logs and metrics",
    long_about = "logsearch is a terminal client for the Log Search Assistant. Prompts are sent to the assistant backend, which searches and queries your logs and keeps the conversation context between questions.",
    version
)]
pub struct Cli {
    /// Base URL of the assistant backend
    #[arg(long = "url", env = "LOGSEARCH_URL")]
    pub url: Option<String>,

    /// Initial prompt to send (if not provided, starts interactive REPL)
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "LOGSEARCH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Skip the backend health probe at startup
    #[arg(long)]
    pub no_health_check: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.url.clone(),
            request_timeout_secs: self.timeout,
            no_health_check: self.no_health_check,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "logsearch",
            "--url",
            "http://logs.internal:8000",
            "--timeout",
            "30",
            "--no-health-check",
            "-p",
            "show me errors",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(
            overrides.base_url.as_deref(),
            Some("http://logs.internal:8000")
        );
        assert_eq!(overrides.request_timeout_secs, Some(30));
        assert!(overrides.no_health_check);
        assert_eq!(cli.prompt.as_deref(), Some("show me errors"));
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["logsearch", "--timeout", "soon"]).is_err());
    }
}
