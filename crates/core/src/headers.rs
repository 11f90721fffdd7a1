//! Delivery header normalisation and extraction
//!
//! Each logical field is looked up through an ordered list of header names
//! so that current, vendor-prefixed and legacy senders are all accepted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{Result, WebhookVerificationError};

/// The three headers every signed delivery carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// Delivery identifier
    Id,
    /// Unix-seconds timestamp
    Timestamp,
    /// Space-separated `version,value` signature tokens
    Signature,
}

impl HeaderField {
    /// All fields, in extraction order
    pub const ALL: [HeaderField; 3] = [Self::Id, Self::Timestamp, Self::Signature];

    /// Accepted header names, most preferred first
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id", "svix-id", "msg-id"],
            Self::Timestamp => &["timestamp", "svix-timestamp", "msg-timestamp"],
            Self::Signature => &["signature", "svix-signature", "msg-signature"],
        }
    }

    /// Canonical (current) header name
    pub fn canonical_name(&self) -> &'static str {
        self.names()[0]
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Case-insensitive delivery header map
///
/// Names are lowercased on insertion; values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct DeliveryHeaders {
    entries: BTreeMap<String, String>,
}

impl DeliveryHeaders {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any value stored under the same name
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove a header by name
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    /// Look up a header by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Look up a logical field through its ordered name list
    pub fn field(&self, field: HeaderField) -> Option<&str> {
        field.names().iter().find_map(|name| self.get(name))
    }

    /// Number of stored headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no headers are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(lowercased name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for DeliveryHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl From<HashMap<String, String>> for DeliveryHeaders {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for DeliveryHeaders {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<DeliveryHeaders> for BTreeMap<String, String> {
    fn from(headers: DeliveryHeaders) -> Self {
        headers.entries
    }
}

/// Raw values of the three signed-delivery headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

/// Pull id, timestamp and signature out of `headers`.
///
/// All three are resolved before returning; the first absent field (in
/// id, timestamp, signature order) is reported.
pub fn extract(headers: &DeliveryHeaders) -> Result<ExtractedHeaders<'_>> {
    let lookup = |field: HeaderField| {
        headers
            .field(field)
            .ok_or(WebhookVerificationError::MissingHeader(field))
    };

    Ok(ExtractedHeaders {
        id: lookup(HeaderField::Id)?,
        timestamp: lookup(HeaderField::Timestamp)?,
        signature: lookup(HeaderField::Signature)?,
    })
}
