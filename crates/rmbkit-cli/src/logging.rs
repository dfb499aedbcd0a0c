//! Log verbosity flags and `tracing` subscriber setup.

use clap::Args;
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Increase log verbosity (`-v` info, `-vv` debug, `-vvv` trace).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LogArgs {
    pub fn default_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for the confirmation lines.
pub fn init(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        let mut args = LogArgs::default();
        assert_eq!(args.default_directive(), "warn");
        args.verbose = 2;
        assert_eq!(args.default_directive(), "debug");
        args.verbose = 9;
        assert_eq!(args.default_directive(), "trace");
        args.quiet = true;
        assert_eq!(args.default_directive(), "error");
    }
}
