//! The JSON claims codec.

use serde_json::{Map, Value};

use crate::PastError;

/// A string-keyed claims mapping recovered from a verified payload.
///
/// Only a top-level JSON object is a valid token payload; arrays and
/// scalars are rejected. Insertion order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Decode verified payload bytes into a claims mapping.
    pub fn decode(payload: &[u8]) -> Result<Self, PastError> {
        match serde_json::from_slice(payload) {
            Ok(Value::Object(map)) => Ok(Claims(map)),
            Ok(_) | Err(_) => Err(PastError::NotAJsonToken),
        }
    }

    /// Encode a claims mapping to payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(&self.0).expect("a string-keyed map always serializes")
    }

    /// Look up a single claim.
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consume the claims, yielding the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Claims(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_objects() {
        let claims = Claims::decode(br#"{"sub":"alice","n":3}"#).unwrap();
        assert_eq!(claims.get("sub").and_then(Value::as_str), Some("alice"));
        assert_eq!(claims.get("n").and_then(Value::as_i64), Some(3));
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            Claims::decode(br#"["a","b"]"#),
            Err(PastError::NotAJsonToken)
        ));
        assert!(matches!(
            Claims::decode(br#""just a string""#),
            Err(PastError::NotAJsonToken)
        ));
        assert!(matches!(Claims::decode(b"42"), Err(PastError::NotAJsonToken)));
        assert!(matches!(Claims::decode(b"null"), Err(PastError::NotAJsonToken)));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            Claims::decode(b"{\"sub\":"),
            Err(PastError::NotAJsonToken)
        ));
        assert!(matches!(Claims::decode(b""), Err(PastError::NotAJsonToken)));
        assert!(matches!(
            Claims::decode(&[0xff, 0xfe]),
            Err(PastError::NotAJsonToken)
        ));
    }

    #[test]
    fn round_trip() {
        let claims = Claims::decode(br#"{"sub":"alice","exp":"2099-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(Claims::decode(&claims.encode()).unwrap(), claims);
    }
}
