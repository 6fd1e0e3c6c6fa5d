//! # Conexiones TLS
//! src/client/tls.rs
//!
//! Envuelve un `TcpStream` en una sesión TLS con `rustls`.
//!
//! ## ADVERTENCIA: modo inseguro por defecto
//!
//! Por política, el cliente **no valida** la cadena de certificados ni el
//! hostname del servidor (`verify = false`). Cualquier certificado es
//! aceptado, lo que expone las conexiones a ataques man-in-the-middle.
//! Las firmas del handshake sí se verifican con los algoritmos del provider.
//!
//! Con `verify = true` se usan las raíces de `webpki-roots` y la
//! verificación estándar de `rustls`.

use super::transport::TransportError;
use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct, RootCertStore, SignatureScheme, StreamOwned};
use std::net::TcpStream;
use std::sync::Arc;

/// Stream TLS dueño del socket: al hacer drop se cierra la conexión
pub type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// Verificador que acepta cualquier certificado y hostname
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider.signature_verification_algorithms.supported_schemes()
    }
}

/// Crea conexiones TLS cliente a partir de una configuración compartida
#[derive(Clone)]
pub struct TlsConnector {
    config: Arc<ClientConfig>,
    verify: bool,
}

impl TlsConnector {
    /// Crea el connector
    ///
    /// * `verify` - `false` acepta cualquier certificado (default del cliente)
    pub fn new(verify: bool) -> Result<Self, TransportError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;

        let config = if verify {
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            builder.with_root_certificates(roots).with_no_client_auth()
        } else {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
                .with_no_client_auth()
        };

        Ok(Self {
            config: Arc::new(config),
            verify,
        })
    }

    /// Indica si se validan certificados
    pub fn verifies_certificates(&self) -> bool {
        self.verify
    }

    /// Negocia TLS sobre un socket ya conectado
    ///
    /// El handshake se completa aquí para que sus errores se distingan de
    /// los de escritura.
    pub fn connect(&self, host: &str, socket: TcpStream) -> Result<TlsStream, TransportError> {
        let server_name = server_name(host)?;
        let connection = ClientConnection::new(Arc::clone(&self.config), server_name)?;
        let mut stream = StreamOwned::new(connection, socket);

        while stream.conn.is_handshaking() {
            stream
                .conn
                .complete_io(&mut stream.sock)
                .map_err(TransportError::Handshake)?;
        }

        debug!(
            "TLS negociado con {} ({:?})",
            host,
            stream.conn.protocol_version()
        );
        Ok(stream)
    }
}

/// Convierte el host en un `ServerName` (DNS o IP)
pub fn server_name(host: &str) -> Result<ServerName<'static>, TransportError> {
    ServerName::try_from(host.to_string())
        .map_err(|_| TransportError::InvalidServerName(host.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_connector_builds() {
        let connector = TlsConnector::new(false).unwrap();
        assert!(!connector.verifies_certificates());
    }

    #[test]
    fn test_verifying_connector_builds() {
        let connector = TlsConnector::new(true).unwrap();
        assert!(connector.verifies_certificates());
    }

    #[test]
    fn test_server_name_dns_and_ip() {
        assert!(server_name("example.com").is_ok());
        assert!(server_name("127.0.0.1").is_ok());
    }

    #[test]
    fn test_server_name_invalid() {
        assert!(matches!(
            server_name("exa mple.com"),
            Err(TransportError::InvalidServerName(_))
        ));
        assert!(server_name("").is_err());
    }
}
