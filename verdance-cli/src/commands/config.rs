//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for locating,
//! inspecting and creating the configuration file.

use clap::Subcommand;
use std::path::Path;
use verdance::backend::resolve_credentials_path;
use verdance::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::{load_config, GlobalOptions};

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration settings
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, options: &GlobalOptions) -> Result<(), CliError> {
    let path = options.config.clone().unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::Show => run_show(options),
        ConfigCommands::Init { force } => run_init(&path, force),
    }
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// Show the effective configuration settings.
fn run_show(options: &GlobalOptions) -> Result<(), CliError> {
    let config = load_config(options.config.as_deref())?;
    for line in describe(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Write a default configuration file.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(path)?;
    println!("Created {}", path.display());
    Ok(())
}

fn describe(config: &ConfigFile) -> Vec<String> {
    let credentials = match &config.backend.credentials_path {
        Some(path) => path.display().to_string(),
        None => format!(
            "(not set, resolves to {})",
            resolve_credentials_path(None).display()
        ),
    };
    let seed = config
        .simulation
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(not set)".to_string());

    vec![
        "Configuration Settings".to_string(),
        "======================".to_string(),
        String::new(),
        "[backend]".to_string(),
        format!("  credentials = {}", credentials),
        format!(
            "  request_timeout = {}",
            config.backend.request_timeout_secs
        ),
        format!("  cloud_cover_max = {}", config.backend.cloud_cover_max_pct),
        String::new(),
        "[analysis]".to_string(),
        format!("  radius = {}", config.analysis.default_radius_m),
        format!("  health_months = {}", config.analysis.default_health_months),
        format!("  trend_years = {}", config.analysis.default_trend_years),
        String::new(),
        "[simulation]".to_string(),
        format!("  seed = {}", seed),
        String::new(),
        "[logging]".to_string(),
        format!("  file = {}", config.logging.file.display()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_then_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        run_init(&path, false).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[backend]"));

        std::fs::write(&path, "[analysis]\nradius = 900\n").unwrap();
        run_init(&path, false).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[analysis]\nradius = 900\n"
        );

        run_init(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_describe_lists_every_section() {
        let mut config = ConfigFile::default();
        config.simulation.seed = Some(5);
        let lines = describe(&config);

        for section in ["[backend]", "[analysis]", "[simulation]", "[logging]"] {
            assert!(lines.iter().any(|l| l == section), "missing {}", section);
        }
        assert!(lines.iter().any(|l| l == "  seed = 5"));
    }
}
