//! # Decodificación Chunked (RFC 7230 §4.1)
//! src/http/chunked.rs
//!
//! ## Formato
//!
//! ```text
//! 4\r\n
//! Wiki\r\n
//! 5;ext=1\r\n
//! pedia\r\n
//! 0\r\n
//! \r\n
//! ```
//!
//! El decoder es tolerante: si el framing está corrupto (tamaño no
//! hexadecimal, chunk truncado, falta el `\r\n` tras los datos) se detiene
//! y retorna lo decodificado hasta ahí más el resto literal. Nunca falla.
//! Los tamaños cuentan bytes, por eso trabaja sobre `&[u8]` y no sobre texto.

use log::warn;

const CRLF: &[u8] = b"\r\n";

/// Decodifica un body chunked (ya sin headers)
///
/// # Ejemplo
/// ```
/// use go2web::http::chunked::decode_chunked;
///
/// let body = decode_chunked(b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n");
/// assert_eq!(body, b"Wikipedia");
/// ```
pub fn decode_chunked(body: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::with_capacity(body.len());
    let mut index = 0;

    while index < body.len() {
        let size_end = match find_crlf(body, index) {
            Some(pos) => pos,
            None => {
                warn!("Chunked: línea de tamaño sin terminar en offset {}", index);
                decoded.extend_from_slice(&body[index..]);
                break;
            }
        };

        let size = match parse_chunk_size(&body[index..size_end]) {
            Some(size) => size,
            None => {
                warn!("Chunked: tamaño inválido en offset {}", index);
                decoded.extend_from_slice(&body[index..]);
                break;
            }
        };

        if size == 0 {
            break;
        }

        let chunk_start = size_end + CRLF.len();
        let chunk_end = match chunk_start.checked_add(size) {
            Some(end) if end <= body.len() => end,
            _ => {
                warn!(
                    "Chunked: chunk truncado (esperados {} bytes, quedan {})",
                    size,
                    body.len() - chunk_start
                );
                decoded.extend_from_slice(&body[chunk_start..]);
                break;
            }
        };

        decoded.extend_from_slice(&body[chunk_start..chunk_end]);

        // Cada chunk debe cerrarse con \r\n
        let trailer = &body[chunk_end..body.len().min(chunk_end + CRLF.len())];
        if trailer != CRLF {
            if !trailer.is_empty() {
                warn!("Chunked: falta \\r\\n después del chunk en offset {}", chunk_end);
            }
            decoded.extend_from_slice(&body[chunk_end..]);
            break;
        }

        index = chunk_end + CRLF.len();
    }

    decoded
}

/// Codifica bytes como un body chunked con chunks de `chunk_size` bytes
///
/// Útil para tests y para armar bodies de requests.
pub fn encode_chunked(data: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(data.len() + 16);

    for chunk in data.chunks(chunk_size.max(1)) {
        encoded.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        encoded.extend_from_slice(chunk);
        encoded.extend_from_slice(CRLF);
    }

    encoded.extend_from_slice(b"0\r\n\r\n");
    encoded
}

/// Parsea la línea de tamaño (hex), ignorando extensiones `;name=value`
fn parse_chunk_size(line: &[u8]) -> Option<usize> {
    let line = std::str::from_utf8(line).ok()?;
    let size = line.split(';').next().unwrap_or_default().trim();

    if size.is_empty() {
        return None;
    }

    usize::from_str_radix(size, 16).ok()
}

fn find_crlf(body: &[u8], from: usize) -> Option<usize> {
    body[from..]
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .map(|pos| from + pos)
}
