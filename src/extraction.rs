//! Extraction outcome types.
//!
//! None of the public operations propagate errors across the subsystem
//! boundary: a transient site outage or a redesigned page must never crash
//! the calling layer. Instead of swallowing failures silently, every
//! operation returns an [`Extraction`] so "no data because navigation
//! failed" stays distinguishable from "no data because the site has none".

use serde::Serialize;
use thiserror::Error;

/// Why an extraction came back empty.
#[derive(Debug, Clone, Error, Serialize)]
pub enum ScrapeError {
    /// Browser launch or navigation failed (timeout, unreachable host)
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// An expected container/selector was absent from the page
    #[error("expected element missing: {0}")]
    Structure(&'static str),

    /// A row or cell did not have the expected shape
    #[error("malformed content: {0}")]
    Parse(String),
}

/// Result of one extraction operation.
///
/// `Data` may hold an empty container — that means the page was reached
/// and simply had nothing to offer. `Empty` names the failure that kept
/// us from extracting at all.
#[derive(Debug, Clone, Serialize)]
pub enum Extraction<T> {
    Data(T),
    Empty(ScrapeError),
}

impl<T> Extraction<T> {
    /// Wrap an internal result, logging the failure reason on the way out.
    pub fn from_result(result: Result<T, ScrapeError>, op: &str) -> Self {
        match result {
            Ok(data) => Extraction::Data(data),
            Err(err) => {
                tracing::warn!("{} returned no data: {}", op, err);
                Extraction::Empty(err)
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Extraction::Data(data) => Some(data),
            Extraction::Empty(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ScrapeError> {
        match self {
            Extraction::Data(_) => None,
            Extraction::Empty(err) => Some(err),
        }
    }
}

impl<T: Default> Extraction<T> {
    /// Collapse to the fail-soft contract: data on success, the type's
    /// empty default on failure.
    pub fn into_data(self) -> T {
        match self {
            Extraction::Data(data) => data,
            Extraction::Empty(_) => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data_defaults_on_empty() {
        let empty: Extraction<Vec<String>> =
            Extraction::Empty(ScrapeError::Structure("#tblFixture"));
        assert!(empty.into_data().is_empty());
    }

    #[test]
    fn test_data_preserved() {
        let ex = Extraction::Data(vec![1, 2, 3]);
        assert_eq!(ex.data(), Some(&vec![1, 2, 3]));
        assert!(ex.error().is_none());
        assert_eq!(ex.into_data(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_keeps_reason() {
        let ex: Extraction<Vec<i32>> =
            Extraction::Empty(ScrapeError::Navigation("timeout".into()));
        assert!(matches!(ex.error(), Some(ScrapeError::Navigation(_))));
    }
}
