//! # Cache de Respuestas
//! src/cache/mod.rs
//!
//! Persiste el resultado `(status, headers, body)` de cada fetch exitoso
//! en un directorio configurable, con expiración perezosa por TTL.

pub mod storage;

pub use storage::{cache_key, CacheEntry, CacheError, ResponseCache, DEFAULT_CACHE_DIR, DEFAULT_TTL};
