use serde::{Serialize, Serializer};

/// Outcome of a per-entity fetch inside a fan-out.
///
/// A page that loads analytics for every patient must not fail because one
/// patient's request did. Failed or absent records become `Missing`, which
/// rollups treat as "no data".
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ready(T),
    Missing,
}

impl<T> Fetched<T> {
    pub fn from_result<E>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Fetched::Ready(value),
            Err(_) => Fetched::Missing,
        }
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Fetched::Ready(value) => Some(value),
            Fetched::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Fetched::Missing)
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Fetched::Ready(v),
            None => Fetched::Missing,
        }
    }
}

/// Serializes as the inner value, or `null` when missing.
impl<T: Serialize> Serialize for Fetched<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ready().serialize(serializer)
    }
}
