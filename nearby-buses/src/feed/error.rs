//! Feed error types.

/// Errors from fetching the stop registry or the arrivals feed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request never got a response (DNS, connect, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not the JSON shape we expect.
    #[error("failed to parse response: {message}")]
    Parse { message: String },

    /// A local fixture could not be read.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl FetchError {
    pub(crate) fn parse(err: impl std::fmt::Display) -> Self {
        FetchError::Parse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::Status {
            status: 503,
            url: "https://example.test/stops".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://example.test/stops");

        let err = FetchError::parse("expected an object");
        assert_eq!(err.to_string(), "failed to parse response: expected an object");

        let err = FetchError::Io {
            path: "data/stops.json".into(),
            message: "not found".into(),
        };
        assert!(err.to_string().contains("data/stops.json"));
    }
}
