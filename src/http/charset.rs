//! # Decodificación de Bytes a Texto
//! src/http/charset.rs
//!
//! Los bytes recibidos se convierten a texto probando encodings en orden
//! {UTF-8, Latin-1, ASCII}, cada uno con reemplazo de bytes inválidos por
//! U+FFFD. Con reemplazo ninguno falla, así que en la práctica gana el
//! primero; Latin-1 queda como fallback final.
//!
//! El charset que declare `Content-Type` no se consulta.

/// Encodings soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
    Ascii,
}

/// Orden fijo en que se prueban los encodings
pub const DECODE_ORDER: [Charset; 3] = [Charset::Utf8, Charset::Latin1, Charset::Ascii];

impl Charset {
    /// Decodifica con reemplazo de bytes inválidos
    pub fn decode_lossy(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Utf8 => Some(String::from_utf8_lossy(bytes).into_owned()),
            Charset::Latin1 => Some(decode_latin1(bytes)),
            Charset::Ascii => Some(
                bytes
                    .iter()
                    .map(|&b| {
                        if b.is_ascii() {
                            b as char
                        } else {
                            char::REPLACEMENT_CHARACTER
                        }
                    })
                    .collect(),
            ),
        }
    }
}

/// Decodifica bytes a texto con el primer encoding de [`DECODE_ORDER`]
///
/// # Ejemplo
/// ```
/// use go2web::http::charset::decode_text;
///
/// assert_eq!(decode_text("año".as_bytes()), "año");
/// assert_eq!(decode_text(&[b'a', 0xF1, b'o']), "a\u{FFFD}o");
/// ```
pub fn decode_text(bytes: &[u8]) -> String {
    DECODE_ORDER
        .iter()
        .find_map(|charset| charset.decode_lossy(bytes))
        .unwrap_or_else(|| decode_latin1(bytes))
}

/// Latin-1 mapea cada byte al code point del mismo valor, nunca falla
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
