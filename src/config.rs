//! Application configuration.
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `METATAG_`-prefixed environment variables (e.g.
//! `METATAG_SERVER__PORT=8080`), then CLI flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the MetaTag backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where to reach the external backend and how long to wait for it.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("backend.base_url", "http://localhost:8000")?
            .set_default("backend.request_timeout_secs", 120)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        // Environment variables, e.g. METATAG_BACKEND__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("METATAG")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags (and their env fallbacks handled by clap) win.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;

        Url::parse(&cfg.backend.base_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid backend.base_url {:?}: {e}",
                cfg.backend.base_url
            ))
        })?;

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let cfg = AppConfig::load_from_args(["metatag"]).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
        assert_eq!(cfg.backend.request_timeout_secs, 120);
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cfg = AppConfig::load_from_args([
            "metatag",
            "--port",
            "8080",
            "--backend-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn malformed_backend_url_is_rejected() {
        let result = AppConfig::load_from_args(["metatag", "--backend-url", "not a url"]);
        assert!(result.is_err());
    }
}
