//! # Cliente HTTP
//! src/client/mod.rs
//!
//! - `transport`: sockets TCP/TLS bloqueantes
//! - `tls`: configuración de `rustls`
//! - `redirect`: máquina de estados de redirects
//! - `fetcher`: orquestación cache + red + redirects

pub mod fetcher;
pub mod redirect;
pub mod tls;
pub mod transport;

pub use fetcher::{fetch, FetchError, FetchOutcome, Fetched, Fetcher};
pub use redirect::{resolve_location, RedirectChain, RedirectState, DEFAULT_MAX_REDIRECTS};
pub use transport::{RawResponse, TcpTransport, Transport, TransportError, DEFAULT_TIMEOUT};
