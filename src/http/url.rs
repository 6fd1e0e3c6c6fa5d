//! # Descomposición de URLs
//! src/http/url.rs
//!
//! Convierte un string como `example.com/search?q=rust` en un [`Target`]
//! con host, path (incluyendo query), esquema y puerto.
//!
//! No hay camino de error: una URL malformada produce campos vacíos o
//! aproximados. No se soporta un puerto explícito en la URL (`host:8080`
//! queda como parte del host).

use std::fmt;

/// Esquemas soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Puerto por defecto del esquema
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destino de una petición, derivado una vez por URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Authority tal cual aparece en la URL (ej: "example.com")
    pub host: String,

    /// Path con query string (ej: "/search?q=rust")
    pub path: String,

    pub scheme: Scheme,

    pub port: u16,
}

impl Target {
    /// Parsea una URL en sus componentes
    ///
    /// Si la URL no empieza con `http://` o `https://` se asume `https://`.
    ///
    /// # Ejemplo
    /// ```
    /// use go2web::http::{Scheme, Target};
    ///
    /// let target = Target::parse("example.com/search?q=rust");
    ///
    /// assert_eq!(target.host, "example.com");
    /// assert_eq!(target.path, "/search?q=rust");
    /// assert_eq!(target.scheme, Scheme::Https);
    /// assert_eq!(target.port, 443);
    /// ```
    pub fn parse(url: &str) -> Self {
        let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            (Scheme::Https, url)
        };

        // El fragmento nunca viaja al servidor
        let rest = match rest.find('#') {
            Some(pos) => &rest[..pos],
            None => rest,
        };

        // La authority termina en el primer '/' o '?'
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let host = rest[..authority_end].to_string();
        let remainder = &rest[authority_end..];

        let (path, query) = match remainder.find('?') {
            Some(pos) => (&remainder[..pos], &remainder[pos + 1..]),
            None => (remainder, ""),
        };

        let mut path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        if !query.is_empty() {
            path.push('?');
            path.push_str(query);
        }

        Self {
            host,
            path,
            scheme,
            port: scheme.default_port(),
        }
    }

    /// Reconstruye la URL base `scheme://host`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_default() {
        let target = Target::parse("example.com");

        assert_eq!(target.host, "example.com");
        assert_eq!(target.path, "/");
        assert_eq!(target.scheme, Scheme::Https);
        assert_eq!(target.port, 443);
    }

    #[test]
    fn test_parse_http() {
        let target = Target::parse("http://example.com/about");

        assert_eq!(target.host, "example.com");
        assert_eq!(target.path, "/about");
        assert_eq!(target.scheme, Scheme::Http);
        assert_eq!(target.port, 80);
    }

    #[test]
    fn test_parse_with_query() {
        let target = Target::parse("https://duckduckgo.com/html/?q=rust+lang&ia=web");

        assert_eq!(target.host, "duckduckgo.com");
        assert_eq!(target.path, "/html/?q=rust+lang&ia=web");
    }

    #[test]
    fn test_parse_query_without_path() {
        let target = Target::parse("https://example.com?page=2");

        assert_eq!(target.host, "example.com");
        assert_eq!(target.path, "/?page=2");
    }

    #[test]
    fn test_parse_empty_query_is_dropped() {
        let target = Target::parse("https://example.com/a?");
        assert_eq!(target.path, "/a");
    }

    #[test]
    fn test_parse_drops_fragment() {
        let target = Target::parse("https://example.com/docs#section-2");
        assert_eq!(target.path, "/docs");
    }

    #[test]
    fn test_explicit_port_stays_in_host() {
        let target = Target::parse("http://localhost:8080/status");

        assert_eq!(target.host, "localhost:8080");
        assert_eq!(target.port, 80);
    }

    #[test]
    fn test_malformed_is_best_effort() {
        let target = Target::parse("");
        assert_eq!(target.host, "");
        assert_eq!(target.path, "/");

        let target = Target::parse("https://");
        assert_eq!(target.host, "");
        assert_eq!(target.scheme, Scheme::Https);
    }

    #[test]
    fn test_display_and_origin() {
        let target = Target::parse("http://example.com/a?b=c");
        assert_eq!(target.to_string(), "http://example.com/a?b=c");
        assert_eq!(target.origin(), "http://example.com");
    }
}
