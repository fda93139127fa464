//! `tfdocs serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use tfdocs_config::{CliSettings, Config};
use tfdocs_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tfdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Provider repository containing the docs/ directory (overrides config).
    #[arg(short = 'd', long)]
    project_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Registry origin to fetch the preview shell from and proxy to (overrides config).
    #[arg(long, env = "TFDOCS_ORIGIN")]
    origin: Option<String>,

    /// Provider name shown in pages (default: project directory name).
    #[arg(long)]
    provider_name: Option<String>,

    /// Enable verbose output (log every request and upstream fetch).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            project_dir: self.project_dir,
            origin: self.origin,
            provider_name: self.provider_name,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(path = ?config.config_path, "Loaded configuration");
        let server_config = server_config_from_config(&config);

        let docs_dir = server_config.project_dir.join(&server_config.docs_root);
        if !docs_dir.is_dir() {
            output.warning(&format!(
                "Documentation directory not found: {}",
                docs_dir.display()
            ));
        }

        output.field(
            "Listening",
            &format!("{}:{}", server_config.host, server_config.port),
        );
        output.field("Docs", &docs_dir.display().to_string());
        output.field("Provider", &server_config.provider_name);
        output.field("Origin", &server_config.origin);
        output.preview_link(&server_config.preview_url());

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
