//! # Logging
//! src/logging.rs
//!
//! Inicializa `env_logger` como backend de la fachada `log`.
//!
//! `RUST_LOG` se lee primero; un `--log-level` explícito lo sobreescribe.
//! Sin ninguno de los dos el nivel es `info`:
//!
//! ```bash
//! go2web example.com                                  # info
//! RUST_LOG=debug go2web example.com                   # debug
//! RUST_LOG=debug go2web example.com --log-level warn  # warn
//! ```

use log::LevelFilter;
use std::str::FromStr;

/// Niveles aceptados por `--log-level`
pub const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Nivel cuando no hay `RUST_LOG` ni `--log-level`
pub const DEFAULT_LEVEL: &str = "info";

/// Parsea un nivel de log (case-insensitive)
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(level.trim()).map_err(|_| {
        format!(
            "Unknown log level '{}' (expected one of: {})",
            level,
            LEVELS.join(", ")
        )
    })
}

/// Instala el logger global
///
/// * `level` - Nivel explícito; `None` deja mandar a `RUST_LOG`
///
/// Retorna `false` si ya había un logger instalado; llamarla dos veces
/// no es un error.
pub fn init_logger(level: Option<LevelFilter>) -> bool {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_LEVEL);
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(level) = level {
        builder.filter_level(level);
        builder.filter_module("rustls", level.min(LevelFilter::Warn));
        builder.filter_module("go2web", level);
    }

    builder.format_timestamp_millis();
    builder.target(env_logger::Target::Stderr);

    builder.try_init().is_ok()
}
