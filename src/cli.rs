use clap::{Parser, ValueEnum};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

/// How the log pane acquires its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogMode {
    /// Refetch the full log text on every log tick
    #[default]
    Poll,
    /// Fetch the full log text once at startup
    Once,
    /// Append chunks from a long-lived streaming request
    Stream,
}

#[derive(Parser, Debug)]
#[command(name = "ctw", version = VERSION, about = "Container Status Watcher TUI")]
pub struct Cli {
    /// Base URL of the dashboard backend serving /api/*
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    pub url: String,

    /// Log acquisition strategy
    #[arg(short, long, value_enum, default_value_t = LogMode::Poll)]
    pub logs: LogMode,

    /// Status poll interval in seconds
    #[arg(short, long, default_value_t = 6)]
    pub status_interval: u64,

    /// Log refresh interval in seconds (poll and stream modes)
    #[arg(long, default_value_t = 10)]
    pub log_interval: u64,

    /// Timeout in seconds for non-streaming requests
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    /// Start with stick-to-bottom unchecked (stream mode)
    #[arg(long)]
    pub no_stick: bool,

    /// Mask ip:port addresses in log output
    #[arg(long)]
    pub redact: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Write debug logs to the state directory
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let cli = Cli::parse_from(["ctw"]);
        assert_eq!(cli.url, "http://127.0.0.1:3000");
        assert_eq!(cli.logs, LogMode::Poll);
        assert_eq!(cli.status_interval, 6);
        assert_eq!(cli.log_interval, 10);
        assert!(!cli.no_stick);
    }

    #[test]
    fn stream_mode_parses() {
        let cli = Cli::parse_from(["ctw", "--logs", "stream", "--no-stick"]);
        assert_eq!(cli.logs, LogMode::Stream);
        assert!(cli.no_stick);
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["ctw", "--logs", "tail"]).is_err());
    }
}
