use thiserror::Error;

pub type Result<T> = std::result::Result<T, TyposError>;

/// Problems in a typos definition given as JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TyposError {
    #[error("Invalid suggestion for \"{key}\": expected a string but found {found}")]
    InvalidSuggestion { key: String, found: &'static str },
    #[error("Suggestions for \"{key}\" must not contain nested lists")]
    NestedList { key: String },
    #[error("Typo entries must have a non-empty key")]
    EmptyKey,
    #[error("Invalid typos definition: expected an object, list or string but found {0}")]
    InvalidDefinition(&'static str),
}

/// A dictionary that could not be loaded.
#[derive(Debug, Error)]
#[error("Failed to load dictionary \"{name}\" from {location}: {detail}")]
pub struct DictionaryLoadError {
    pub name: String,
    pub location: String,
    /// The full cause chain, rendered once.
    pub detail: String,
    #[source]
    cause: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl DictionaryLoadError {
    pub fn new(name: &str, location: &str, cause: anyhow::Error) -> Self {
        DictionaryLoadError {
            name: name.to_string(),
            location: location.to_string(),
            detail: format!("{cause:#}"),
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[test]
    fn test_load_error_keeps_cause() {
        let cause = anyhow!("file not found").context("Could not read words.txt");
        let err = DictionaryLoadError::new("words", "words.txt", cause);
        assert_eq!(
            "Failed to load dictionary \"words\" from words.txt: \
             Could not read words.txt: file not found",
            err.to_string()
        );
        assert!(err.source().is_some());
    }
}
