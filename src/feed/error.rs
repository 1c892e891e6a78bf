use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while acquiring and parsing a feed.
///
/// Every variant is terminal for the request that produced it. The
/// `Display` text is the message reported to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Network-level error (DNS, connection, TLS, body read, etc.)
    #[error("Error making request: {0}")]
    Transport(String),
    /// Feed origin answered with a status other than 200
    #[error("Error: Received status code {0}")]
    HttpStatus(u16),
    /// Response body is not well-formed XML
    #[error("Error parsing XML: {0}")]
    Parse(String),
    /// Well-formed XML without a `channel` element under the root
    #[error("No channel element found in RSS feed.")]
    MissingChannel,
}

/// Category of a [`FeedError`], for branching without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    Parse,
    Structure,
}

impl FeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::Transport(_) => ErrorKind::Transport,
            FeedError::HttpStatus(_) => ErrorKind::HttpStatus,
            FeedError::Parse(_) => ErrorKind::Parse,
            FeedError::MissingChannel => ErrorKind::Structure,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FeedError::Transport("connection refused".into()).to_string(),
            "Error making request: connection refused"
        );
        assert_eq!(
            FeedError::HttpStatus(500).to_string(),
            "Error: Received status code 500"
        );
        assert_eq!(
            FeedError::Parse("unexpected end".into()).to_string(),
            "Error parsing XML: unexpected end"
        );
        assert_eq!(
            FeedError::MissingChannel.to_string(),
            "No channel element found in RSS feed."
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(FeedError::Transport(String::new()).kind(), ErrorKind::Transport);
        assert_eq!(FeedError::HttpStatus(404).kind(), ErrorKind::HttpStatus);
        assert_eq!(FeedError::Parse(String::new()).kind(), ErrorKind::Parse);
        assert_eq!(FeedError::MissingChannel.kind(), ErrorKind::Structure);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::HttpStatus).unwrap(),
            "\"http-status\""
        );
    }
}
