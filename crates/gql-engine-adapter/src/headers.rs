//! Header set merging and conversion into the multi-value wire representation.
//!
//! API definitions carry headers as plain `name -> value` maps. Several of those maps may apply to
//! the same upstream (per-source headers, global headers, proxy auth headers); they are combined
//! with [`merge_headers`] where earlier sets win on conflicts.

use crate::error::{AdapterError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header name -> value, as written in an API definition.
pub type HeaderSet = BTreeMap<String, String>;

/// Canonical header name -> values, as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireHeaders(BTreeMap<String, Vec<String>>);

impl WireHeaders {
    /// Append `value` under the canonical form of `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.0
            .entry(canonical_header_key(name))
            .or_default()
            .push(value.into());
    }

    /// All values for `name` (matched case-insensitively).
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.0
            .get(&canonical_header_key(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Convert into a `reqwest` header map for the collaborator performing the upstream call.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidHeader`] if a name or value is not representable in HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut out = HeaderMap::new();
        for (name, values) in &self.0 {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AdapterError::InvalidHeader(format!("name '{name}': {e}")))?;
            for value in values {
                let header_value = HeaderValue::from_str(value)
                    .map_err(|e| AdapterError::InvalidHeader(format!("value for '{name}': {e}")))?;
                out.append(header_name.clone(), header_value);
            }
        }
        Ok(out)
    }
}

/// Merge header sets given in priority order (highest first).
///
/// Names are compared through [`canonical_header_key`]; the first set that defines a name wins.
#[must_use]
pub fn merge_headers<'a, I>(sets: I) -> HeaderSet
where
    I: IntoIterator<Item = &'a HeaderSet>,
{
    let mut merged = HeaderSet::new();
    for set in sets {
        for (name, value) in set {
            let canonical = canonical_header_key(name);
            if merged.contains_key(&canonical) {
                continue;
            }
            merged.insert(canonical, value.clone());
        }
    }
    merged
}

/// Convert a plain header set into wire headers.
///
/// An empty set yields `None`; callers treat `None` and "no headers" the same way.
#[must_use]
pub fn to_wire_headers(headers: &HeaderSet) -> Option<WireHeaders> {
    if headers.is_empty() {
        return None;
    }

    let mut wire = WireHeaders::default();
    for (name, value) in headers {
        wire.add(name, value.clone());
    }
    Some(wire)
}

/// Canonical MIME-style casing: `x-request-id` -> `X-Request-Id`.
///
/// Names containing bytes outside the HTTP token alphabet are returned unchanged.
#[must_use]
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for b in name.bytes() {
        let c = if upper {
            b.to_ascii_uppercase()
        } else {
            b.to_ascii_lowercase()
        };
        out.push(char::from(c));
        upper = b == b'-';
    }
    out
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
