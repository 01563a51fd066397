//! Logging setup.
//!
//! Output goes through `tracing` with an `EnvFilter` built from the command
//! line verbosity and the server's debug mode. `RUST_LOG` replaces the
//! computed filter entirely.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level that is still emitted.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Debug mode logs at debug level or finer, whatever was requested.
    #[must_use]
    pub fn with_debug(self, debug: bool) -> Self {
        if debug {
            self.max(Self::Verbose)
        } else {
            self
        }
    }
}

/// Filter directives used when `RUST_LOG` is not set.
///
/// Debug mode also surfaces axum's extractor rejections, which explain why
/// a form submission was turned away before reaching a handler.
#[must_use]
pub fn default_directives(verbosity: Verbosity, debug: bool) -> String {
    let level = verbosity.with_debug(debug).level();
    let mut directives = format!("compressor_ledger={level}");
    if debug {
        directives.push_str(",axum::rejection=trace");
    }
    directives
}

/// Install the global subscriber.
///
/// In debug mode events carry their source file and line. Calling this more
/// than once is harmless; later calls are ignored.
///
/// # Examples
///
/// ```no_run
/// use compressor_ledger::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose, false);
/// ```
pub fn init_logging(verbosity: Verbosity, debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity, debug)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(debug)
                .with_line_number(debug),
        )
        .try_init();
}

/// Initialize logging for tests, warnings and errors only.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
