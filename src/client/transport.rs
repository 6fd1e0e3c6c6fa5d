//! # Transporte TCP/TLS
//! src/client/transport.rs
//!
//! Abre un socket bloqueante, opcionalmente negocia TLS, escribe el
//! request completo y lee hasta que el servidor cierra la conexión.
//!
//! ## Reglas
//!
//! - Timeout de conexión y de cada lectura configurable (default 15s)
//! - Un timeout de lectura se trata como fin de datos, no como error
//! - El socket es dueño de su scope: se cierra en todos los caminos de salida
//! - Los fallos de conexión se reportan como [`TransportError`], nunca como panic

use super::tls::TlsConnector;
use crate::http::charset::decode_text;
use crate::http::Target;
use log::{debug, warn};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;

/// Timeout por defecto para conectar y para cada lectura
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 8192;

/// Fallos a nivel de conexión
#[derive(Debug, Error)]
pub enum TransportError {
    /// No se pudo resolver el host
    #[error("DNS lookup failed for {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Ninguna dirección aceptó la conexión
    #[error("Could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// El host no sirve como nombre TLS
    #[error("Invalid TLS server name: {0:?}")]
    InvalidServerName(String),

    /// Error de configuración o sesión TLS
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Falló el handshake TLS
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),

    #[error("Failed to send request: {0}")]
    Write(#[source] io::Error),

    #[error("Failed to read response: {0}")]
    Read(#[source] io::Error),
}

/// Bytes crudos de una respuesta, sin estructura asumida
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse(Vec<u8>);

impl RawResponse {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodifica los bytes como texto (UTF-8, Latin-1, ASCII con reemplazo)
    pub fn text(&self) -> String {
        decode_text(&self.0)
    }
}

impl From<Vec<u8>> for RawResponse {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Envía un request ya serializado a un destino y retorna la respuesta cruda
///
/// Es la costura que permite sustituir la red en tests.
pub trait Transport {
    fn send(&self, target: &Target, request: &[u8]) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, target: &Target, request: &[u8]) -> Result<RawResponse, TransportError> {
        (**self).send(target, request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, target: &Target, request: &[u8]) -> Result<RawResponse, TransportError> {
        (**self).send(target, request)
    }
}

/// Transporte real sobre sockets bloqueantes
#[derive(Clone)]
pub struct TcpTransport {
    timeout: Duration,
    tls: TlsConnector,
}

impl TcpTransport {
    /// Crea el transporte
    ///
    /// * `timeout` - Límite para conectar y para cada lectura
    /// * `verify_tls` - Validar certificados y hostname (por defecto no)
    pub fn new(timeout: Duration, verify_tls: bool) -> Result<Self, TransportError> {
        Ok(Self {
            timeout,
            tls: TlsConnector::new(verify_tls)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Conecta a `host:port`, envía `request` y lee hasta el cierre
    pub fn exchange(
        &self,
        host: &str,
        port: u16,
        use_tls: bool,
        request: &[u8],
    ) -> Result<RawResponse, TransportError> {
        let socket = self.connect(host, port)?;

        let bytes = if use_tls {
            let mut stream = self.tls.connect(host, socket)?;
            write_request(&mut stream, request)?;
            read_until_close(&mut stream)?
        } else {
            let mut stream = socket;
            write_request(&mut stream, request)?;
            read_until_close(&mut stream)?
        };

        debug!("{} bytes recibidos de {}:{}", bytes.len(), host, port);
        Ok(RawResponse(bytes))
    }

    /// Resuelve el host y prueba cada dirección hasta conectar
    fn connect(&self, host: &str, port: u16) -> Result<TcpStream, TransportError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                host: host.to_string(),
                source: io::Error::new(ErrorKind::NotFound, "no addresses returned"),
            });
        }

        let mut last_error = io::Error::new(ErrorKind::Other, "no address attempted");

        for addr in addrs {
            debug!("Conectando a {} ({})", host, addr);
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    let configured = stream
                        .set_read_timeout(Some(self.timeout))
                        .and_then(|_| stream.set_write_timeout(Some(self.timeout)));

                    return match configured {
                        Ok(()) => Ok(stream),
                        Err(source) => Err(TransportError::Connect {
                            host: host.to_string(),
                            port,
                            source,
                        }),
                    };
                }
                Err(e) => {
                    debug!("Fallo al conectar a {}: {}", addr, e);
                    last_error = e;
                }
            }
        }

        Err(TransportError::Connect {
            host: host.to_string(),
            port,
            source: last_error,
        })
    }
}

impl Transport for TcpTransport {
    fn send(&self, target: &Target, request: &[u8]) -> Result<RawResponse, TransportError> {
        self.exchange(&target.host, target.port, target.scheme.is_tls(), request)
    }
}

fn write_request<S: Write>(stream: &mut S, request: &[u8]) -> Result<(), TransportError> {
    stream.write_all(request).map_err(TransportError::Write)?;
    stream.flush().map_err(TransportError::Write)
}

/// Lee hasta que el servidor cierra o vence el timeout de lectura
///
/// Un servidor TLS que cierra sin `close_notify` produce `UnexpectedEof`;
/// se trata como un cierre normal.
fn read_until_close<S: Read>(stream: &mut S) -> Result<Vec<u8>, TransportError> {
    let mut response = Vec::new();
    let mut buffer = [0u8; READ_CHUNK];

    loop {
        match stream.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => response.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                warn!("Timeout leyendo del socket, {} bytes acumulados", response.len());
                break;
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("El servidor cerró sin close_notify");
                break;
            }
            Err(e) => return Err(TransportError::Read(e)),
        }
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Lee del cliente hasta el final de los headers
    fn read_request(stream: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&received).into_owned()
    }

    fn transport(timeout: Duration) -> TcpTransport {
        TcpTransport::new(timeout, false).unwrap()
    }

    #[test]
    fn test_exchange_reads_until_close() {
        let listener = ephemeral_listener();
        let port = listener.local_addr().unwrap().port();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhola")
                .unwrap();
            request
        });

        let response = transport(Duration::from_secs(5))
            .exchange("127.0.0.1", port, false, b"GET / HTTP/1.1\r\nHost: test\r\n\r\n")
            .unwrap();

        assert_eq!(
            response.text(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhola"
        );

        let request = t.join().unwrap();
        assert!(request.starts_with("GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_large_response_is_accumulated() {
        let listener = ephemeral_listener();
        let port = listener.local_addr().unwrap().port();
        let body = "x".repeat(100_000);
        let expected = format!("HTTP/1.1 200 OK\r\n\r\n{}", body);
        let to_send = expected.clone();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            stream.write_all(to_send.as_bytes()).unwrap();
        });

        let response = transport(Duration::from_secs(5))
            .exchange("127.0.0.1", port, false, b"GET / HTTP/1.1\r\n\r\n")
            .unwrap();

        assert_eq!(response.len(), expected.len());
        t.join().unwrap();
    }

    #[test]
    fn test_read_timeout_is_end_of_data() {
        let listener = ephemeral_listener();
        let port = listener.local_addr().unwrap().port();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            stream.write_all(b"HTTP/1.1 200 OK\r\n\r\npartial").unwrap();
            // Mantener la conexión abierta más que el timeout del cliente
            thread::sleep(Duration::from_millis(1200));
        });

        let response = transport(Duration::from_millis(300))
            .exchange("127.0.0.1", port, false, b"GET / HTTP/1.1\r\n\r\n")
            .unwrap();

        assert_eq!(response.text(), "HTTP/1.1 200 OK\r\n\r\npartial");
        t.join().unwrap();
    }

    #[test]
    fn test_connection_refused() {
        let port = {
            let listener = ephemeral_listener();
            listener.local_addr().unwrap().port()
        };

        let result = transport(Duration::from_secs(2)).exchange("127.0.0.1", port, false, b"GET / HTTP/1.1\r\n\r\n");

        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[test]
    fn test_unresolvable_host() {
        let result = transport(Duration::from_secs(2)).exchange(
            "no-such-host.invalid",
            80,
            false,
            b"GET / HTTP/1.1\r\n\r\n",
        );

        assert!(matches!(result, Err(TransportError::Resolve { .. })));
    }

    #[test]
    fn test_tls_against_plain_server_fails_handshake() {
        let listener = ephemeral_listener();
        let port = listener.local_addr().unwrap().port();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            // ClientHello
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n");
        });

        let result = transport(Duration::from_secs(5)).exchange("127.0.0.1", port, true, b"GET / HTTP/1.1\r\n\r\n");

        assert!(matches!(
            result,
            Err(TransportError::Handshake(_)) | Err(TransportError::Tls(_))
        ));
        t.join().unwrap();
    }

    #[test]
    fn test_send_uses_target() {
        let listener = ephemeral_listener();
        let port = listener.local_addr().unwrap().port();

        let t = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            stream.write_all(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap();
        });

        let target = Target {
            host: "127.0.0.1".to_string(),
            path: "/".to_string(),
            scheme: crate::http::Scheme::Http,
            port,
        };

        let response = transport(Duration::from_secs(5))
            .send(&target, b"GET / HTTP/1.1\r\n\r\n")
            .unwrap();

        assert!(response.text().starts_with("HTTP/1.1 204"));
        t.join().unwrap();
    }

    #[test]
    fn test_raw_response_text_is_lossy() {
        let raw = RawResponse::new(vec![b'o', b'k', 0xFF]);
        assert_eq!(raw.text(), "ok\u{FFFD}");
        assert!(!raw.is_empty());
    }
}
