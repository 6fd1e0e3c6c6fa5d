//! # go2web
//! src/lib.rs
//!
//! Cliente HTTP/1.1 mínimo implementado directamente sobre sockets TCP y
//! TLS, sin librerías HTTP de alto nivel.
//!
//! ## Arquitectura
//!
//! - `http`: URL, construcción de requests y decodificación de respuestas
//!   (incluyendo chunked transfer-encoding)
//! - `client`: transporte TCP/TLS, redirects y el `Fetcher`
//! - `cache`: cache en disco de respuestas con TTL
//! - `config`: configuración CLI/env del binario
//! - `logging`: inicialización de `env_logger`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! let fetched = go2web::fetch("https://example.com", 10, true).unwrap();
//! println!("{}", fetched.response().status_code);
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod http;
pub mod logging;

pub use client::{fetch, FetchError, FetchOutcome, Fetched, Fetcher};
