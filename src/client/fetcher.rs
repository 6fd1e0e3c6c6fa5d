//! # Fetcher
//! src/client/fetcher.rs
//!
//! Orquesta cache → URL → request → transporte → decoder, siguiendo
//! redirects con [`RedirectChain`] hasta llegar a un estado terminal.
//!
//! Solo se cachea la respuesta final no-3xx, bajo la URL original.

use super::redirect::{RedirectChain, RedirectState, DEFAULT_MAX_REDIRECTS};
use super::transport::{TcpTransport, Transport, TransportError, DEFAULT_TIMEOUT};
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::http::{DecodeError, Headers, ParsedResponse, Request, Target};
use log::{debug, info, warn};
use std::time::Duration;
use thiserror::Error;

/// Errores que abortan un fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Could not initialise transport: {0}")]
    Setup(#[source] TransportError),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },

    #[error("max_redirects is 0, nothing was fetched")]
    NoAttempts,
}

/// Cómo terminó un fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Respuesta final de la red
    Final,

    /// Servida desde el cache sin tocar la red
    FromCache,

    /// Se cortó porque `url` ya se había visitado
    RedirectLoop { url: String },

    /// Se agotaron los fetches permitidos
    RedirectLimit { max_redirects: usize },
}

/// Resultado de un fetch
#[derive(Debug, Clone)]
pub struct Fetched {
    response: ParsedResponse,
    outcome: FetchOutcome,
    chain: Vec<String>,
}

impl Fetched {
    pub fn response(&self) -> &ParsedResponse {
        &self.response
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    /// URLs visitadas, la original primero
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// `true` si la respuesta no quedó a medio camino de un redirect
    pub fn is_final(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Final | FetchOutcome::FromCache)
    }

    pub fn into_response(self) -> ParsedResponse {
        self.response
    }

    /// Triple `(status, headers, body)`
    pub fn into_parts(self) -> (String, Headers, String) {
        self.response.into_parts()
    }
}

/// Cliente HTTP con cache y resolución de redirects
pub struct Fetcher<T: Transport = TcpTransport> {
    transport: T,
    cache: ResponseCache,
    max_redirects: usize,
    use_cache: bool,
}

impl Fetcher<TcpTransport> {
    /// Fetcher con transporte real, timeout por defecto y cache en `.cache`
    pub fn new() -> Result<Self, FetchError> {
        let transport = TcpTransport::new(DEFAULT_TIMEOUT, false).map_err(FetchError::Setup)?;
        Ok(Self::with_transport(transport, ResponseCache::default()))
    }

    /// Construye el fetcher a partir de la configuración del binario
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let transport = TcpTransport::new(Duration::from_secs(config.timeout_secs), config.verify_tls)
            .map_err(FetchError::Setup)?;
        let cache = ResponseCache::new(&config.cache_dir, Duration::from_secs(config.cache_ttl_secs));

        Ok(Self::with_transport(transport, cache)
            .with_max_redirects(config.max_redirects)
            .with_cache_enabled(!config.no_cache))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(transport: T, cache: ResponseCache) -> Self {
        Self {
            transport,
            cache,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            use_cache: true,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_cache_enabled(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Fetch con los parámetros configurados
    pub fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        self.fetch_with(url, self.max_redirects, self.use_cache)
    }

    /// Fetch con parámetros explícitos
    ///
    /// `max_redirects` acota el número total de fetches de red. Un loop o
    /// el límite no son errores: se devuelve la última respuesta con el
    /// `FetchOutcome` correspondiente.
    pub fn fetch_with(&self, url: &str, max_redirects: usize, use_cache: bool) -> Result<Fetched, FetchError> {
        if use_cache {
            if let Some(response) = self.cache.get(url) {
                info!("Usando respuesta en cache para {}", url);
                return Ok(Fetched {
                    response,
                    outcome: FetchOutcome::FromCache,
                    chain: vec![url.to_string()],
                });
            }
        }

        let mut chain = RedirectChain::new(url, max_redirects);
        let mut state = chain.start();
        let mut last: Option<ParsedResponse> = None;

        let outcome = loop {
            match state {
                RedirectState::Fetching { url: current } | RedirectState::Redirecting { url: current } => {
                    let (target, response) = self.fetch_once(&current)?;
                    state = chain.advance(&target, &response);

                    if let RedirectState::Redirecting { url: ref next } = state {
                        info!("Redirigiendo a: {}", next);
                    }
                    last = Some(response);
                }
                RedirectState::Done => break FetchOutcome::Final,
                RedirectState::LoopAborted { url: looped } => {
                    warn!("Loop de redirects detectado en {}", looped);
                    break FetchOutcome::RedirectLoop { url: looped };
                }
                RedirectState::MaxRedirectsAborted => {
                    warn!("Máximo de redirects alcanzado ({})", max_redirects);
                    break FetchOutcome::RedirectLimit { max_redirects };
                }
            }
        };

        let response = last.ok_or(FetchError::NoAttempts)?;

        if use_cache && outcome == FetchOutcome::Final && !response.is_redirect() {
            self.cache
                .put(url, &response.status_code, &response.headers, &response.body);
        }

        Ok(Fetched {
            response,
            outcome,
            chain: chain.into_urls(),
        })
    }

    /// Un ciclo request/respuesta sin seguir redirects
    pub fn fetch_once(&self, url: &str) -> Result<(Target, ParsedResponse), FetchError> {
        let target = Target::parse(url);
        let request = Request::new(&target.host).with_path(&target.path);
        debug!("GET {} ({}:{})", url, target.host, target.port);

        let raw = self
            .transport
            .send(&target, &request.to_bytes())
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let response = ParsedResponse::parse(raw.as_bytes()).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        debug!("{} → {}", url, response.status_code);
        Ok((target, response))
    }
}

/// Fetch con transporte real y el cache por defecto
///
/// # Ejemplo
/// ```no_run
/// let fetched = go2web::fetch("example.com", 10, true).unwrap();
/// let (status, _headers, body) = fetched.into_parts();
/// println!("{} ({} bytes)", status, body.len());
/// ```
pub fn fetch(url: &str, max_redirects: usize, use_cache: bool) -> Result<Fetched, FetchError> {
    Fetcher::new()?.fetch_with(url, max_redirects, use_cache)
}
