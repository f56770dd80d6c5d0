//! # Entity Codec
//!
//! Records are stored as one JSON object per key, field for field. No defaults are
//! filled in: a stored record missing a field fails to decode.

use crate::registry::entity::LedgerEntity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failures converting between records and their stored bytes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    #[error("Unable to marshal {kind}: {reason}")]
    Encode { kind: String, reason: String },

    #[error("Unable to unmarshal {kind}: {reason}")]
    Decode { kind: String, reason: String },
}

/// Encodes an entity into its stored representation.
pub fn encode<E: LedgerEntity>(entity: &E) -> Result<Vec<u8>, CodecError> {
    to_bytes(E::KIND, entity)
}

/// Decodes a stored record.
pub fn decode<E: LedgerEntity>(bytes: &[u8]) -> Result<E, CodecError> {
    from_bytes(E::KIND, bytes)
}

pub fn to_bytes<T: Serialize + ?Sized>(kind: &str, value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

pub fn from_bytes<T: DeserializeOwned>(kind: &str, bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceType};

    #[test]
    fn test_stored_shape_matches_record_fields() {
        let resource = Resource {
            id: "r1".into(),
            name: "Car".into(),
            resource_type_id: "rt1".into(),
            active: true,
        };
        let bytes = encode(&resource).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "r1", "name": "Car", "resource_type_id": "rt1", "active": true})
        );
        assert_eq!(decode::<Resource>(&bytes).unwrap(), resource);
    }

    #[test]
    fn test_missing_field_is_a_decode_error() {
        let err = decode::<ResourceType>(br#"{"id": "rt1", "name": "Vehicle"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Decode { ref kind, .. } if kind == "ResourceType"));
    }

    #[test]
    fn test_malformed_bytes_are_a_decode_error() {
        assert!(decode::<ResourceType>(b"\x00not-json").is_err());
    }
}
