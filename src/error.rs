use thiserror::Error;

use crate::truenas::TrueNasError;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration rejected before any remote call was made.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Stored resource id is not a remote numeric id. Not retryable.
    #[error("invalid resource id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("provider configuration error: {0}")]
    Config(String),

    #[error("unknown resource type: {0}")]
    UnknownResource(String),

    #[error("cannot import {kind} {id}: it does not exist")]
    ImportNotFound { kind: &'static str, id: i64 },

    #[error("malformed state: {0}")]
    State(#[from] serde_json::Error),

    #[error(transparent)]
    TrueNas(#[from] TrueNasError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ProviderError::Validation("locked needs the user to have a password".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: locked needs the user to have a password"
        );
    }

    #[test]
    fn test_invalid_id_display() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = ProviderError::InvalidId {
            id: "abc".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid resource id 'abc'"));
    }

    #[test]
    fn test_unknown_resource_display() {
        let err = ProviderError::UnknownResource("truenas_share".to_string());
        assert_eq!(err.to_string(), "unknown resource type: truenas_share");
    }

    #[test]
    fn test_truenas_error_from_conversion() {
        let api_err = TrueNasError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        let err: ProviderError = api_err.into();
        assert!(matches!(err, ProviderError::TrueNas(_)));
        assert_eq!(err.to_string(), "API error (500): boom");
    }

    #[test]
    fn test_serde_error_from_conversion() {
        let serde_err = serde_json::from_str::<i64>("\"x\"").unwrap_err();
        let err: ProviderError = serde_err.into();
        assert!(matches!(err, ProviderError::State(_)));
        assert!(err.to_string().starts_with("malformed state:"));
    }
}
