//! # Construcción de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo arma el texto literal de un request HTTP/1.1 listo para
//! escribirse en el socket.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Host: example.com\r\n
//! User-Agent: Mozilla/5.0 ...\r\n
//! Accept: text/html,application/json,*/*\r\n
//! Accept-Encoding: identity\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! Los headers obligatorios siempre ganan sobre los del caller.
//! `Accept-Encoding` queda fijo en `identity`: el cliente nunca descomprime,
//! así que el servidor no debe comprimir.

use super::Headers;

/// User-Agent de navegador de escritorio para minimizar bloqueos
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

pub const ACCEPT: &str = "text/html,application/json,*/*";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::GET
    }
}

/// Request HTTP/1.1 a enviar
#[derive(Debug, Clone)]
pub struct Request {
    /// Host destino (va en el header `Host`)
    host: String,

    method: Method,

    /// Path con query string (ej: "/search?q=rust")
    path: String,

    /// Headers del caller, antes de aplicar los obligatorios
    headers: Headers,

    body: Option<Vec<u8>>,
}

impl Request {
    /// Crea un `GET /` para el host indicado
    ///
    /// # Ejemplo
    /// ```
    /// use go2web::http::Request;
    ///
    /// let text = Request::new("example.com").to_string();
    /// assert!(text.starts_with("GET / HTTP/1.1\r\n"));
    /// assert!(text.contains("Host: example.com\r\n"));
    /// assert!(text.ends_with("\r\n\r\n"));
    /// ```
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            method: Method::GET,
            path: "/".to_string(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Establece el path (un path vacío se normaliza a "/")
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };
        self
    }

    /// Agrega un header del caller
    ///
    /// Si coincide con un header obligatorio, será reemplazado al construir.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Agrega varios headers del caller
    pub fn with_headers(mut self, headers: &Headers) -> Self {
        for (name, value) in headers.iter() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Establece el body (agrega `Content-Length` al construir)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Headers finales: los del caller más los obligatorios, que siempre ganan
    pub fn headers(&self) -> Headers {
        let mut headers = self.headers.clone();

        headers.insert("Host", &self.host);
        headers.insert("User-Agent", USER_AGENT);
        headers.insert("Accept", ACCEPT);
        headers.insert("Accept-Encoding", "identity");
        headers.insert("Connection", "close");

        if let Some(body) = &self.body {
            headers.insert("Content-Length", &body.len().to_string());
        }

        headers
    }

    /// Convierte el request a bytes listos para enviar por el socket
    ///
    /// - Request line: `GET /path HTTP/1.1\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body (si existe)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        let request_line = format!("{} {} HTTP/1.1\r\n", self.method.as_str(), self.path);
        result.extend_from_slice(request_line.as_bytes());

        for (name, value) in self.headers().iter() {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");

        if let Some(body) = &self.body {
            result.extend_from_slice(body);
        }

        result
    }
}

impl std::fmt::Display for Request {
    /// Texto del request (el body se muestra con reemplazo si no es UTF-8)
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
