//! # Cache de Respuestas en Disco
//! src/cache/storage.rs
//!
//! Guarda cada respuesta exitosa en un archivo JSON por URL:
//!
//! ```json
//! {"timestamp": 1717171717.5, "status_code": "200", "headers": {...}, "body": "..."}
//! ```
//!
//! - El nombre del archivo es la URL con todo carácter no alfanumérico
//!   reemplazado por `_`, truncada a 255 caracteres
//! - Las entradas vencidas (más viejas que el TTL) nunca se retornan y se
//!   borran en el siguiente acceso (expiración perezosa)
//! - No hay locking entre procesos: gana el último que escribe

use crate::http::{Headers, ParsedResponse};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Directorio de cache por defecto
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// TTL por defecto (1 hora)
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Largo máximo del nombre de archivo
const MAX_KEY_LEN: usize = 255;

/// Errores de I/O de la cache (se loguean, nunca llegan al caller)
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Entrada persistida en disco
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Segundos desde epoch en que se guardó
    pub timestamp: f64,
    pub status_code: String,
    pub headers: Headers,
    pub body: String,
}

impl CacheEntry {
    /// Crea una entrada con el timestamp actual
    pub fn new(status_code: &str, headers: &Headers, body: &str) -> Self {
        Self::at(now_secs(), status_code, headers, body)
    }

    /// Crea una entrada con un timestamp explícito
    pub fn at(timestamp: f64, status_code: &str, headers: &Headers, body: &str) -> Self {
        Self {
            timestamp,
            status_code: status_code.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        }
    }

    /// Verifica si la entrada superó el TTL
    pub fn is_expired(&self, ttl: Duration, now: f64) -> bool {
        now - self.timestamp > ttl.as_secs_f64()
    }

    pub fn into_response(self) -> ParsedResponse {
        ParsedResponse {
            status_code: self.status_code,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Deriva el nombre de archivo de una URL
///
/// # Ejemplo
/// ```
/// use go2web::cache::cache_key;
///
/// assert_eq!(cache_key("https://example.com/a?b=1"), "https___example_com_a_b_1");
/// ```
pub fn cache_key(url: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("static regex"));

    // Tras el reemplazo todo es ASCII, así que truncar por bytes es seguro
    let mut key = re.replace_all(url, "_").into_owned();
    key.truncate(MAX_KEY_LEN);
    key
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Cache de respuestas con directorio y TTL inyectados
#[derive(Debug, Clone)]
pub struct ResponseCache {
    /// Directorio donde vive un archivo por URL
    dir: PathBuf,

    /// Edad máxima de una entrada
    ttl: Duration,
}

impl ResponseCache {
    /// Crea la cache (el directorio se crea al primer `put`)
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Ruta del archivo asociado a una URL
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    /// Guarda una respuesta
    ///
    /// Los errores de escritura se loguean y se ignoran.
    pub fn put(&self, url: &str, status_code: &str, headers: &Headers, body: &str) {
        let entry = CacheEntry::new(status_code, headers, body);
        if let Err(e) = self.write_entry(url, &entry) {
            warn!("Error escribiendo cache para {}: {}", url, e);
        }
    }

    /// Obtiene una respuesta vigente
    ///
    /// Retorna `None` si no existe, si no se puede leer o si venció
    /// (en cuyo caso se borra el archivo).
    pub fn get(&self, url: &str) -> Option<ParsedResponse> {
        let path = self.entry_path(url);
        if !path.exists() {
            return None;
        }

        let entry = match Self::read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error leyendo cache {}: {}", path.display(), e);
                return None;
            }
        };

        if entry.is_expired(self.ttl, now_secs()) {
            debug!("Entrada de cache vencida para {}", url);
            if let Err(e) = fs::remove_file(&path) {
                warn!("No se pudo borrar {}: {}", path.display(), e);
            }
            return None;
        }

        Some(entry.into_response())
    }

    /// Escribe una entrada (archivo temporal propio + rename)
    pub fn write_entry(&self, url: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(url);

        // Un temporal único por escritor: dos procesos nunca comparten archivo
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        let mut writer = BufWriter::new(&mut temp);
        serde_json::to_writer(&mut writer, entry)?;
        writer.flush()?;
        drop(writer);

        // Renombrar (atómico en sistemas Unix)
        temp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    fn read_entry(path: &Path) -> Result<CacheEntry, CacheError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Borra todas las entradas vencidas o ilegibles
    ///
    /// Retorna cuántos archivos se eliminaron.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = now_secs();
        self.remove_where(|path| match Self::read_entry(path) {
            Ok(entry) => entry.is_expired(self.ttl, now),
            Err(_) => true,
        })
    }

    /// Borra todas las entradas
    pub fn clear(&self) -> Result<usize, CacheError> {
        self.remove_where(|_| true)
    }

    fn remove_where<F: Fn(&Path) -> bool>(&self, should_remove: F) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.is_file() && should_remove(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR, DEFAULT_TTL)
    }
}
