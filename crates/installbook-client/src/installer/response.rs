//! Tolerant list envelope shared by the installer and vehicle endpoints.

use serde_json::Value;

/// The shapes a list endpoint has been observed to answer with.
///
/// - a bare JSON array: `["2023", "2024"]`
/// - a `data` wrapper: `{"data": [...]}` (possibly nesting a domain key:
///   `{"data": {"makes": [...]}}`)
/// - a domain wrapper: `{"locations": [...]}`, `{"installers": [...]}`,
///   `{"makes": [...]}`
///
/// Anything else is [`RawListResponse::Unrecognized`] and normalizes to an
/// empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum RawListResponse {
    Bare(Vec<Value>),
    Data(Vec<Value>),
    Domain { key: String, items: Vec<Value> },
    Unrecognized(Value),
}

impl RawListResponse {
    /// Classifies a decoded payload, trying `data` before the domain keys.
    #[must_use]
    pub fn classify(payload: Value, domain_keys: &[&str]) -> Self {
        match payload {
            Value::Array(items) => RawListResponse::Bare(items),
            Value::Object(mut map) => {
                match map.remove("data") {
                    Some(Value::Array(items)) => return RawListResponse::Data(items),
                    Some(nested @ Value::Object(_)) => {
                        if let RawListResponse::Domain { key, items } =
                            Self::classify(nested.clone(), domain_keys)
                        {
                            return RawListResponse::Domain { key, items };
                        }
                        map.insert("data".to_string(), nested);
                    }
                    Some(other) => {
                        map.insert("data".to_string(), other);
                    }
                    None => {}
                }

                for key in domain_keys {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return RawListResponse::Domain {
                            key: (*key).to_string(),
                            items,
                        };
                    }
                }

                RawListResponse::Unrecognized(Value::Object(map))
            }
            other => RawListResponse::Unrecognized(other),
        }
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        match self {
            RawListResponse::Bare(items)
            | RawListResponse::Data(items)
            | RawListResponse::Domain { items, .. } => items,
            RawListResponse::Unrecognized(_) => Vec::new(),
        }
    }
}
