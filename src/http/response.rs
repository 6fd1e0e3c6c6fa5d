//! # Parsing de Respuestas HTTP/1.1
//! src/http/response.rs
//!
//! Convierte los bytes crudos recibidos por el transporte en un
//! [`ParsedResponse`]: status code, headers y body ya decodificado.
//!
//! ## Formato de una respuesta HTTP/1.1
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Transfer-Encoding: chunked\r\n
//! \r\n
//! 4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n
//! ```
//!
//! ## Pasos
//!
//! 1. Separar head y body en el primer `\r\n\r\n`
//! 2. Status line → header sintético `Status: <code> <reason>`
//! 3. Headers `Name: Value` (trim, case preservado, el último gana)
//! 4. Si `Transfer-Encoding: chunked`, quitar el framing
//! 5. Convertir el body a texto

use super::chunked::decode_chunked;
use super::charset::decode_text;
use super::status::{self, StatusLine};
use super::Headers;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nombre del header sintético con "<code> <reason>"
pub const STATUS_HEADER: &str = "Status";

const HEAD_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Errores que pueden ocurrir al parsear una respuesta
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No hay línea vacía que separe headers y body
    #[error("Malformed response: missing blank line between head and body")]
    MissingSeparator,

    /// La primera línea no es una status line HTTP
    #[error("Malformed response: invalid status line {0:?}")]
    InvalidStatusLine(String),
}

/// Respuesta parseada: `(status_code, headers, body)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Código como string (ej: "200")
    pub status_code: String,

    /// Headers en orden de llegada, incluyendo el sintético `Status`
    pub headers: Headers,

    /// Body completamente decodificado
    pub body: String,
}

impl ParsedResponse {
    /// Parsea una respuesta HTTP completa
    ///
    /// # Errores
    ///
    /// * `DecodeError::MissingSeparator` - No hay `\r\n\r\n`
    /// * `DecodeError::InvalidStatusLine` - La primera línea no empieza con `HTTP/`
    ///
    /// # Ejemplo
    /// ```
    /// use go2web::http::ParsedResponse;
    ///
    /// let raw = b"HTTP/1.1 301 Moved Permanently\r\nLocation: /x\r\n\r\nbody";
    /// let response = ParsedResponse::parse(raw).unwrap();
    ///
    /// assert_eq!(response.status_code, "301");
    /// assert_eq!(response.header("Location"), Some("/x"));
    /// assert_eq!(response.body, "body");
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self, DecodeError> {
        let split = raw
            .windows(HEAD_SEPARATOR.len())
            .position(|w| w == HEAD_SEPARATOR)
            .ok_or(DecodeError::MissingSeparator)?;

        let head = decode_text(&raw[..split]);
        let body = &raw[split + HEAD_SEPARATOR.len()..];

        let headers = Self::parse_head(&head)?;
        let status_code = headers
            .get(STATUS_HEADER)
            .and_then(|s| s.split(' ').next())
            .unwrap_or_default()
            .to_string();

        let is_chunked = headers
            .get("Transfer-Encoding")
            .map(|te| te.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false);

        let body = if is_chunked {
            decode_chunked(body)
        } else {
            body.to_vec()
        };

        let body = decode_text(&body);

        Ok(Self {
            status_code,
            headers,
            body,
        })
    }

    /// Parsea status line y headers
    ///
    /// Líneas sin ':' se ignoran.
    fn parse_head(head: &str) -> Result<Headers, DecodeError> {
        let mut lines = head.split("\r\n");
        let status = StatusLine::parse(lines.next().unwrap_or_default())?;

        let mut headers = Headers::new();
        headers.insert(STATUS_HEADER, &status.header_value());

        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim(), value.trim());
            }
        }

        Ok(headers)
    }

    /// Obtiene un header específico (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn is_redirect(&self) -> bool {
        status::is_redirect(&self.status_code)
    }

    /// Destino de un redirect, si existe
    pub fn location(&self) -> Option<&str> {
        self.header("Location").filter(|l| !l.is_empty())
    }

    /// Descompone en la tupla `(status_code, headers, body)`
    pub fn into_parts(self) -> (String, Headers, String) {
        (self.status_code, self.headers, self.body)
    }
}
