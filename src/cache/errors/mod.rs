use thiserror::Error;

use crate::cache::types::LockAttempts;

/// Defines the type for errors returned by the caller supplied fallback loader
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// StoreError represents a failure of the backing key-value store.
/// The facade performs no retries, a store failure propagates unchanged to whichever
/// strategy invoked the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value store is unavailable: {0}")]
    Unavailable(String),

    #[error("counter '{key}' holds a non-numeric payload")]
    NonNumericCounter { key: String },
}

/// CacheError represents the failures a caller of [`crate::cache::client::CacheClient`]
/// can observe. "Record not found" is not an error, the strategies surface it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cached payload under '{key}' could not be decoded")]
    Decode {
        key: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("value could not be encoded for caching")]
    Encode(#[source] serde_json::Error),

    #[error("fallback loader failed")]
    Loader(#[source] LoaderError),

    #[error("gave up acquiring lock '{key}' after {attempts} attempts")]
    LockRetriesExhausted { key: String, attempts: LockAttempts },
}

#[cfg(test)]
mod tests {
    use crate::cache::errors::{CacheError, StoreError};

    #[test]
    fn store_unavailable_error_description() {
        let error = StoreError::Unavailable("connection refused".to_string());
        assert_eq!("key-value store is unavailable: connection refused", error.to_string());
    }

    #[test]
    fn non_numeric_counter_error_description() {
        let error = StoreError::NonNumericCounter { key: "icr:order:2024:01:01".to_string() };
        assert_eq!("counter 'icr:order:2024:01:01' holds a non-numeric payload", error.to_string());
    }

    #[test]
    fn lock_retries_exhausted_error_description() {
        let error = CacheError::LockRetriesExhausted { key: "lock:cache:shop:1".to_string(), attempts: 100 };
        assert_eq!("gave up acquiring lock 'lock:cache:shop:1' after 100 attempts", error.to_string());
    }

    #[test]
    fn store_error_converts_to_cache_error() {
        let error: CacheError = StoreError::Unavailable("timed out".to_string()).into();
        assert!(matches!(error, CacheError::Store(_)));
    }
}
