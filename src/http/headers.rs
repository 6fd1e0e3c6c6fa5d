//! # Mapa Ordenado de Headers
//! src/http/headers.rs
//!
//! Los headers HTTP se guardan en el orden en que llegan (o en que se
//! agregan), conservando el case original del nombre. La búsqueda y el
//! reemplazo ignoran mayúsculas/minúsculas, como exige HTTP.
//!
//! Se serializa como un objeto JSON (`{"Name": "value", ...}`) respetando
//! el orden, que es el formato que usa la cache en disco.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Colección ordenada de pares `nombre → valor`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Crea un mapa vacío
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Inserta un header
    ///
    /// Si ya existe un header con el mismo nombre (sin importar el case),
    /// se sobrescribe en su posición original y el nombre toma el case
    /// de la última escritura.
    ///
    /// # Ejemplo
    /// ```
    /// use go2web::http::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.insert("Content-Type", "text/plain");
    /// headers.insert("content-type", "text/html");
    ///
    /// assert_eq!(headers.len(), 1);
    /// assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    /// ```
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(idx) => {
                self.entries[idx] = (name.to_string(), value.to_string());
            }
            None => {
                self.entries.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Obtiene el valor de un header (búsqueda case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Elimina un header y retorna su valor
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera los headers en orden de inserción
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k.as_ref(), v.as_ref());
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object of header names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            headers.insert(&name, &value);
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeadersVisitor)
    }
}
