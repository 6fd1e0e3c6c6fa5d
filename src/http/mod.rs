//! # Módulo HTTP
//!
//! Este módulo implementa el lado cliente de HTTP/1.1 desde cero, sin usar
//! librerías de alto nivel. Incluye:
//!
//! - Descomposición de URLs en host, path, esquema y puerto
//! - Construcción de requests HTTP/1.1
//! - Parsing de responses (status line, headers, body)
//! - Decodificación chunked (RFC 7230)
//! - Conversión de bytes a texto
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Host: example.com\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>hola</h1>
//! ```

pub mod charset;   // Bytes → texto
pub mod chunked;   // Transfer-Encoding: chunked
pub mod headers;   // Mapa ordenado de headers
pub mod request;   // Construcción de HTTP requests
pub mod response;  // Parsing de HTTP responses
pub mod status;    // Status line y clases de códigos
pub mod url;       // URL → Target

// Re-exportamos los tipos principales para facilitar su uso
pub use charset::Charset;
pub use headers::Headers;
pub use request::{Method, Request};
pub use response::{DecodeError, ParsedResponse};
pub use status::StatusLine;
pub use url::{Scheme, Target};
