use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// How much the service logs, derived from `-v`/`-q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose(u8),
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Verbose(verbose)
        }
    }

    pub fn log_filter(self) -> &'static str {
        match self {
            // Show only errors
            Verbosity::Quiet => "off,catbrowse_server=error,catbrowse_catalog=error",
            Verbosity::Verbose(0) => "warn,catbrowse_server=info,catbrowse_catalog=info",
            // Also show requests and provider calls
            Verbosity::Verbose(1) => {
                "info,catbrowse_server=debug,catbrowse_catalog=debug,tower_http=debug"
            },
            Verbosity::Verbose(2) => {
                "info,catbrowse_server=trace,catbrowse_catalog=trace,tower_http=trace"
            },
            Verbosity::Verbose(_) => "trace",
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logger(verbosity: Verbosity) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
}
