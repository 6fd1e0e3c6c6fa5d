//! # Máquina de Estados de Redirects
//! src/client/redirect.rs
//!
//! ```text
//!            ┌──────────── 3xx + Location nueva ─────────────┐
//!            ▼                                               │
//! FETCHING ──┴─► (respuesta) ──► REDIRECTING ──► (respuesta) ─┘
//!                  │                 │
//!                  │ no-3xx o sin    ├─ Location ya visitada ─► LOOP_ABORTED
//!                  │ Location        └─ límite alcanzado ─────► MAX_REDIRECTS_ABORTED
//!                  ▼
//!                 DONE
//! ```
//!
//! La transición es una función pura sobre ([`RedirectChain`], respuesta),
//! así la terminación por ciclo o por límite se prueba sin red.

use crate::http::{ParsedResponse, Target};
use std::collections::HashSet;

/// Máximo de fetches por defecto
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Estados del resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    /// Primer fetch de la URL original
    Fetching { url: String },

    /// Siguiendo un `Location`
    Redirecting { url: String },

    /// Respuesta final (no-3xx, o 3xx sin `Location`)
    Done,

    /// `Location` apunta a una URL ya visitada en esta cadena
    LoopAborted { url: String },

    /// Se alcanzó `max_redirects`
    MaxRedirectsAborted,
}

impl RedirectState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RedirectState::Done | RedirectState::LoopAborted { .. } | RedirectState::MaxRedirectsAborted
        )
    }

    /// URL a pedir en este estado, si corresponde
    pub fn url(&self) -> Option<&str> {
        match self {
            RedirectState::Fetching { url } | RedirectState::Redirecting { url } => Some(url),
            _ => None,
        }
    }
}

/// Resuelve un `Location` contra el destino actual
///
/// - URL absoluta: se usa tal cual
/// - `//host/path`: hereda el esquema
/// - `/path`: hereda esquema y host
/// - cualquier otra cosa: `scheme://host/` + valor
///
/// # Ejemplo
/// ```
/// use go2web::client::redirect::resolve_location;
/// use go2web::http::Target;
///
/// let current = Target::parse("https://example.com/old");
/// assert_eq!(resolve_location(&current, "/new"), "https://example.com/new");
/// ```
pub fn resolve_location(current: &Target, location: &str) -> String {
    let location = location.trim();
    let lower = location.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") {
        location.to_string()
    } else if location.starts_with("//") {
        format!("{}:{}", current.scheme, location)
    } else if location.starts_with('/') {
        format!("{}{}", current.origin(), location)
    } else {
        format!("{}/{}", current.origin(), location)
    }
}

/// Estado acumulado de una cadena de redirects
#[derive(Debug, Clone)]
pub struct RedirectChain {
    /// URLs en el orden en que se visitaron (la original primero)
    urls: Vec<String>,

    visited: HashSet<String>,

    redirects: usize,

    max_redirects: usize,
}

impl RedirectChain {
    pub fn new(url: &str, max_redirects: usize) -> Self {
        let mut visited = HashSet::new();
        visited.insert(url.to_string());

        Self {
            urls: vec![url.to_string()],
            visited,
            redirects: 0,
            max_redirects,
        }
    }

    /// Estado inicial
    pub fn start(&self) -> RedirectState {
        if self.redirects >= self.max_redirects {
            RedirectState::MaxRedirectsAborted
        } else {
            RedirectState::Fetching {
                url: self.urls[0].clone(),
            }
        }
    }

    /// Transición tras recibir la respuesta de `target`
    pub fn advance(&mut self, target: &Target, response: &ParsedResponse) -> RedirectState {
        if !response.is_redirect() {
            return RedirectState::Done;
        }

        let location = match response.location() {
            Some(location) => location,
            None => return RedirectState::Done,
        };

        let next = resolve_location(target, location);
        if self.visited.contains(&next) {
            return RedirectState::LoopAborted { url: next };
        }

        self.visited.insert(next.clone());
        self.urls.push(next.clone());
        self.redirects += 1;

        if self.redirects >= self.max_redirects {
            RedirectState::MaxRedirectsAborted
        } else {
            RedirectState::Redirecting { url: next }
        }
    }

    pub fn redirects(&self) -> usize {
        self.redirects
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: &str) -> ParsedResponse {
        ParsedResponse::parse(raw.as_bytes()).unwrap()
    }

    fn redirect_to(location: &str) -> ParsedResponse {
        response(&format!("HTTP/1.1 302 Found\r\nLocation: {}\r\n\r\n", location))
    }

    // ==================== Location ====================

    #[test]
    fn test_resolve_absolute() {
        let current = Target::parse("https://example.com/a");
        assert_eq!(
            resolve_location(&current, "http://other.org/x"),
            "http://other.org/x"
        );
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let current = Target::parse("http://example.com/a");
        assert_eq!(
            resolve_location(&current, "//cdn.example.com/x"),
            "http://cdn.example.com/x"
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        let current = Target::parse("https://example.com/old/page");
        assert_eq!(resolve_location(&current, "/new"), "https://example.com/new");
    }

    #[test]
    fn test_resolve_relative_segment() {
        let current = Target::parse("https://example.com/dir/page");
        assert_eq!(
            resolve_location(&current, "login.html"),
            "https://example.com/login.html"
        );
    }

    #[test]
    fn test_resolve_relative_starting_with_http_word() {
        let current = Target::parse("https://example.com/");
        assert_eq!(
            resolve_location(&current, "httpdocs/index.html"),
            "https://example.com/httpdocs/index.html"
        );
    }

    // ==================== Transitions ====================

    #[test]
    fn test_start_state() {
        let chain = RedirectChain::new("https://a.com/", 10);
        assert_eq!(
            chain.start(),
            RedirectState::Fetching {
                url: "https://a.com/".to_string()
            }
        );
    }

    #[test]
    fn test_zero_max_aborts_immediately() {
        let chain = RedirectChain::new("https://a.com/", 0);
        assert_eq!(chain.start(), RedirectState::MaxRedirectsAborted);
    }

    #[test]
    fn test_non_redirect_is_done() {
        let mut chain = RedirectChain::new("https://a.com/", 10);
        let target = Target::parse("https://a.com/");

        let state = chain.advance(&target, &response("HTTP/1.1 200 OK\r\n\r\nok"));
        assert_eq!(state, RedirectState::Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_redirect_without_location_is_done() {
        let mut chain = RedirectChain::new("https://a.com/", 10);
        let target = Target::parse("https://a.com/");

        let state = chain.advance(&target, &response("HTTP/1.1 304 Not Modified\r\n\r\n"));
        assert_eq!(state, RedirectState::Done);
    }

    #[test]
    fn test_redirect_moves_to_redirecting() {
        let mut chain = RedirectChain::new("https://a.com/", 10);
        let target = Target::parse("https://a.com/");

        let state = chain.advance(&target, &redirect_to("/b"));

        assert_eq!(
            state,
            RedirectState::Redirecting {
                url: "https://a.com/b".to_string()
            }
        );
        assert_eq!(state.url(), Some("https://a.com/b"));
        assert_eq!(chain.redirects(), 1);
        assert_eq!(chain.urls(), &["https://a.com/", "https://a.com/b"]);
    }

    #[test]
    fn test_two_cycle_is_detected() {
        let mut chain = RedirectChain::new("https://a.com/", 10);

        let state = chain.advance(&Target::parse("https://a.com/"), &redirect_to("https://b.com/"));
        assert!(matches!(state, RedirectState::Redirecting { .. }));

        let state = chain.advance(&Target::parse("https://b.com/"), &redirect_to("https://a.com/"));
        assert_eq!(
            state,
            RedirectState::LoopAborted {
                url: "https://a.com/".to_string()
            }
        );
        assert_eq!(chain.redirects(), 1);
    }

    #[test]
    fn test_self_redirect_is_a_loop() {
        let mut chain = RedirectChain::new("https://a.com/", 10);
        let state = chain.advance(&Target::parse("https://a.com/"), &redirect_to("/"));

        assert!(matches!(state, RedirectState::LoopAborted { .. }));
    }

    #[test]
    fn test_limit_is_reached() {
        let max = 3;
        let mut chain = RedirectChain::new("https://a.com/0", max);
        let mut state = chain.start();
        let mut fetches = 0;

        while let Some(url) = state.url().map(str::to_string) {
            fetches += 1;
            let target = Target::parse(&url);
            state = chain.advance(&target, &redirect_to(&format!("/{}", fetches)));
        }

        assert_eq!(state, RedirectState::MaxRedirectsAborted);
        assert_eq!(fetches, max);
        assert_eq!(chain.redirects(), max);
    }
}
