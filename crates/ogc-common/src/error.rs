//! Error types for GeoServer communication and OGC document handling.

use thiserror::Error;

/// Result type alias using GeoServerError.
pub type GeoServerResult<T> = Result<T, GeoServerError>;

/// Coarse classification of a [`GeoServerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or non-2xx status.
    Transport,
    /// HTTP 200 with a body that does not match the expected contract.
    InvalidResponseShape,
    /// Malformed or structurally unexpected XML.
    Parse,
    /// The client was configured with unusable settings.
    Config,
}

/// Primary error type for GeoServer operations.
#[derive(Debug, Error)]
pub enum GeoServerError {
    // === Configuration Errors ===
    #[error("Invalid GeoServer configuration: {0}")]
    InvalidConfig(String),

    // === Transport Errors ===
    #[error("Request to {url} timed out after {attempts} attempt(s)")]
    Timeout { url: String, attempts: u32 },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Failed to fetch features from {type_name}: {source}")]
    FeatureRequest {
        type_name: String,
        #[source]
        source: Box<GeoServerError>,
    },

    // === Response Shape Errors ===
    #[error("Invalid response from {type_name}: {message}")]
    InvalidResponseShape { type_name: String, message: String },

    #[error("GeoServer returned an exception report: {message}")]
    ServiceException { message: String },

    // === Parse Errors ===
    #[error("Failed to parse {document}: {message}")]
    XmlParse {
        document: &'static str,
        message: String,
    },

    #[error("Unexpected {document} structure: {message}")]
    XmlStructure {
        document: &'static str,
        message: String,
    },
}

impl GeoServerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoServerError::InvalidConfig(_) => ErrorKind::Config,
            GeoServerError::Timeout { .. }
            | GeoServerError::HttpStatus { .. }
            | GeoServerError::Network { .. } => ErrorKind::Transport,
            GeoServerError::FeatureRequest { source, .. } => source.kind(),
            GeoServerError::InvalidResponseShape { .. }
            | GeoServerError::ServiceException { .. } => ErrorKind::InvalidResponseShape,
            GeoServerError::XmlParse { .. } | GeoServerError::XmlStructure { .. } => {
                ErrorKind::Parse
            }
        }
    }

    /// Only timeouts are retried by the transport client.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeoServerError::Timeout { .. })
    }

    /// HTTP status code when the server answered with a non-2xx response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GeoServerError::HttpStatus { status, .. } => Some(*status),
            GeoServerError::FeatureRequest { source, .. } => source.http_status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_request_delegates_kind() {
        let err = GeoServerError::FeatureRequest {
            type_name: "ws:roads".to_string(),
            source: Box::new(GeoServerError::HttpStatus {
                url: "http://gs/wfs".to_string(),
                status: 503,
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.http_status(), Some(503));
        assert!(err.to_string().contains("ws:roads"));
    }

    #[test]
    fn test_only_timeouts_are_retryable() {
        let timeout = GeoServerError::Timeout {
            url: "http://gs/wms".to_string(),
            attempts: 1,
        };
        let status = GeoServerError::HttpStatus {
            url: "http://gs/wms".to_string(),
            status: 500,
        };
        assert!(timeout.is_retryable());
        assert!(!status.is_retryable());
    }
}
