//! # Configuración del Cliente
//! src/config.rs
//!
//! Configuración del binario `go2web` con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./go2web example.com \
//!   --max-redirects 5 \
//!   --cache-ttl 600 \
//!   --timeout 10
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! GO2WEB_CACHE_DIR=/tmp/go2web GO2WEB_LOG_LEVEL=debug ./go2web example.com
//! ```

use crate::logging;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Configuración del cliente HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "go2web")]
#[command(about = "Cliente HTTP/1.1 sobre sockets TCP/TLS, con cache y redirects")]
#[command(version = "0.1.0")]
pub struct Config {
    /// URL a pedir (sin esquema se asume https://)
    pub url: String,

    // === Redirects ===

    /// Máximo de fetches al seguir redirects
    #[arg(long = "max-redirects", default_value = "10", env = "GO2WEB_MAX_REDIRECTS")]
    pub max_redirects: usize,

    // === Cache ===

    /// No leer ni escribir el cache
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Directorio del cache de respuestas
    #[arg(long = "cache-dir", default_value = ".cache", env = "GO2WEB_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// Segundos que una entrada de cache sigue vigente
    #[arg(long = "cache-ttl", default_value = "3600", env = "GO2WEB_CACHE_TTL")]
    pub cache_ttl_secs: u64,

    // === Red ===

    /// Timeout de conexión y de lectura en segundos
    #[arg(long = "timeout", default_value = "15", env = "GO2WEB_TIMEOUT")]
    pub timeout_secs: u64,

    /// Validar certificados TLS y hostname (desactivado por defecto)
    #[arg(long = "verify-tls", env = "GO2WEB_VERIFY_TLS")]
    pub verify_tls: bool,

    // === Logging ===

    /// Nivel de log: off, error, warn, info, debug, trace (sin valor manda RUST_LOG)
    #[arg(long = "log-level", env = "GO2WEB_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Nivel de log explícito, si hay uno válido
    pub fn log_level_filter(&self) -> Option<LevelFilter> {
        self.log_level
            .as_deref()
            .and_then(|level| logging::parse_level(level).ok())
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL must not be empty".to_string());
        }

        if self.max_redirects == 0 {
            return Err("Max redirects must be >= 1".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be > 0".to_string());
        }

        if self.cache_ttl_secs == 0 {
            return Err("Cache TTL must be > 0".to_string());
        }

        if let Some(level) = &self.log_level {
            logging::parse_level(level)?;
        }

        Ok(())
    }

    /// Resumen de la configuración
    pub fn summary(&self) -> String {
        let cache = if self.no_cache {
            "disabled".to_string()
        } else {
            format!("{} (ttl {} s)", self.cache_dir.display(), self.cache_ttl_secs)
        };

        let tls = if self.verify_tls {
            "verified (webpki roots)"
        } else {
            "NOT verified"
        };

        format!(
            "go2web configuration\n   URL:           {}\n   Max redirects: {}\n   Cache:         {}\n   Timeout:       {} s\n   TLS:           {}\n   Log level:     {}",
            self.url,
            self.max_redirects,
            cache,
            self.timeout_secs,
            tls,
            self.log_level.as_deref().unwrap_or("RUST_LOG")
        )
    }

    /// Imprime el resumen por stderr (stdout queda para la respuesta)
    pub fn print_summary(&self) {
        eprintln!("{}", self.summary());
        eprintln!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            url: String::new(),
            max_redirects: 10,
            no_cache: false,
            cache_dir: PathBuf::from(".cache"),
            cache_ttl_secs: 3600,
            timeout_secs: 15,
            verify_tls: false,
            log_level: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            url: "example.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.cache_dir, PathBuf::from(".cache"));
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.timeout_secs, 15);
        assert!(!config.no_cache);
        assert!(!config.verify_tls);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_validate_success() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_url() {
        let result = Config::default().validate();
        assert!(result.unwrap_err().contains("URL"));
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_zero_redirects() {
        let mut config = config();
        config.max_redirects = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Max redirects"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = config();
        config.timeout_secs = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Timeout"));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let mut config = config();
        config.cache_ttl_secs = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Cache TTL"));
    }

    #[test]
    fn test_validate_unknown_log_level() {
        let mut config = config();
        config.log_level = Some("loud".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("log level"));
    }

    #[test]
    fn test_log_level_filter() {
        let mut config = config();
        assert_eq!(config.log_level_filter(), None);

        config.log_level = Some("trace".to_string());
        assert_eq!(config.log_level_filter(), Some(LevelFilter::Trace));

        config.log_level = Some("nonsense".to_string());
        assert_eq!(config.log_level_filter(), None);
    }

    // ==================== CLI ====================

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "go2web",
            "http://example.com/x",
            "--max-redirects",
            "3",
            "--no-cache",
            "--cache-dir",
            "/tmp/c",
            "--timeout",
            "5",
            "--verify-tls",
        ])
        .unwrap();

        assert_eq!(config.url, "http://example.com/x");
        assert_eq!(config.max_redirects, 3);
        assert!(config.no_cache);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/c"));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.verify_tls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_cli_requires_url() {
        assert!(Config::try_parse_from(["go2web"]).is_err());
    }

    // ==================== Summary ====================

    #[test]
    fn test_summary_mentions_settings() {
        let summary = config().summary();
        assert!(summary.contains("example.com"));
        assert!(summary.contains("ttl 3600"));
        assert!(summary.contains("NOT verified"));
    }

    #[test]
    fn test_summary_cache_disabled() {
        let mut config = config();
        config.no_cache = true;
        assert!(config.summary().contains("disabled"));
    }

    #[test]
    fn test_config_print_summary() {
        // Should not panic
        config().print_summary();
    }
}
