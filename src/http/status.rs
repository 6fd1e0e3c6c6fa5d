//! # Status Line de la Respuesta
//! src/http/status.rs
//!
//! Parsea la primera línea de una respuesta HTTP:
//!
//! ```text
//! HTTP/1.1 301 Moved Permanently
//! ```
//!
//! El código se mantiene como string (tal cual lo envía el servidor). Solo
//! importa si es **3xx**: en ese caso el cliente sigue `Location`.
//!
//! Los campos se separan por cualquier cantidad de espacios; una línea sin
//! código se acepta con código vacío.

use super::response::DecodeError;

/// Status line parseada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Versión HTTP (ej: "HTTP/1.1")
    pub version: String,

    /// Código numérico como string (ej: "301")
    pub code: String,

    /// Reason phrase, puede estar vacía
    pub reason: String,
}

impl StatusLine {
    /// Parsea una status line
    ///
    /// # Errores
    ///
    /// Retorna `DecodeError::InvalidStatusLine` si la línea no empieza con
    /// `HTTP/`.
    ///
    /// # Ejemplo
    /// ```
    /// use go2web::http::StatusLine;
    ///
    /// let status = StatusLine::parse("HTTP/1.1 404 Not Found").unwrap();
    /// assert_eq!(status.code, "404");
    /// assert_eq!(status.reason, "Not Found");
    /// assert_eq!(status.header_value(), "404 Not Found");
    /// ```
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        let line = line.trim();
        if !line.starts_with("HTTP/") {
            return Err(DecodeError::InvalidStatusLine(line.to_string()));
        }

        // VERSION CODE REASON (la razón puede tener espacios)
        let (version, rest) = split_token(line);
        let (code, reason) = split_token(rest);

        Ok(Self {
            version: version.to_string(),
            code: code.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Valor del header sintético `Status`: "<code> <reason>" o "<code>"
    pub fn header_value(&self) -> String {
        if self.reason.is_empty() {
            self.code.clone()
        } else {
            format!("{} {}", self.code, self.reason)
        }
    }
}

/// Primer token y el resto, sin los espacios que los separan
fn split_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (text, ""),
    }
}

/// Verifica si un código indica redirección (3xx)
///
/// # Ejemplo
/// ```
/// use go2web::http::status::is_redirect;
/// assert!(is_redirect("302"));
/// assert!(!is_redirect("200"));
/// ```
pub fn is_redirect(code: &str) -> bool {
    code.starts_with('3')
}
