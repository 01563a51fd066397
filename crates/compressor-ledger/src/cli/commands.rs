//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;

/// Serve command arguments. Flags override the loaded configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeCommand {
    /// Interface to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Show error details in responses and enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl ServeCommand {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.debug {
            config.server.debug = true;
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults_leave_config_alone() {
        let mut config = Config::default();
        ServeCommand::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_serve_overrides() {
        let mut config = Config::default();
        let cmd = ServeCommand {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
            debug: true,
        };
        cmd.apply(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.debug);
    }

    #[test]
    fn test_debug_flag_never_disables_configured_debug() {
        let mut config = Config::default();
        config.server.debug = true;
        ServeCommand::default().apply(&mut config);
        assert!(config.server.debug);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
