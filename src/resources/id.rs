//! Conversion between remote numeric ids and resource id strings.

use crate::error::ProviderError;

pub fn format_id(id: i64) -> String {
    id.to_string()
}

/// Parses a stored resource id. A non-numeric id means the local state is
/// corrupt; the error is fatal.
pub fn parse_id(id: &str) -> Result<i64, ProviderError> {
    id.parse::<i64>().map_err(|source| ProviderError::InvalidId {
        id: id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id() {
        assert_eq!(format_id(42), "42");
    }

    #[test]
    fn test_parse_id_roundtrip() {
        assert_eq!(parse_id(&format_id(17357)).unwrap(), 17357);
    }

    #[test]
    fn test_parse_id_rejects_non_numeric() {
        let err = parse_id("tf_abc").unwrap_err();
        match err {
            ProviderError::InvalidId { id, .. } => assert_eq!(id, "tf_abc"),
            other => panic!("expected InvalidId, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_id_rejects_empty() {
        assert!(matches!(parse_id(""), Err(ProviderError::InvalidId { .. })));
    }
}
