//! Command-line argument parsing for the orrery viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Interactive solar-system viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Do not spawn the comet.
    #[arg(long)]
    pub no_comet: bool,

    /// Disable the glow layer around the sun.
    #[arg(long)]
    pub no_glow: bool,

    /// Follow the named entity once the scene is ready.
    #[arg(long)]
    pub follow: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.no_comet {
            self.comet.enabled = false;
        }
        if args.no_glow {
            self.sun.glow = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            no_comet: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert!(!config.comet.enabled);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert!(config.sun.glow);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--no-glow",
            "--follow",
            "Earth",
            "--log-level",
            "debug",
        ]);
        assert!(args.no_glow);
        assert!(!args.no_comet);
        assert_eq!(args.follow.as_deref(), Some("Earth"));

        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert!(!config.sun.glow);
        assert_eq!(config.debug.log_level, "debug");
    }
}
