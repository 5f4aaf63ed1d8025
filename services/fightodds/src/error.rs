//! Errors raised by the fetch collaborators.
//!
//! Absence of data (no search hits, unparseable dates, rows without odds) is
//! never an error; only a failed request or a page with no table structure
//! at all ends up here, and the pipeline catches both per entity.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport failure or timeout
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Non-success HTTP response
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Expected table/markers absent from the document
    #[error("unexpected page structure at {url}: {reason}")]
    Structure { url: String, reason: String },
}

impl SourceError {
    pub fn fetch(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn structure(url: &str, reason: &str) -> Self {
        Self::Structure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, Self::Structure { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Status { url, .. } | Self::Structure { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Status {
            url: "https://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "unexpected status 503 for https://example.com/a");
        assert!(!err.is_structure());

        let err = SourceError::structure("https://example.com/b", "no table rows");
        assert!(err.is_structure());
        assert_eq!(err.url(), "https://example.com/b");
    }
}
