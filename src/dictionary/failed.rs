use std::sync::Arc;

use crate::error::DictionaryLoadError;
use crate::options::{SearchOptions, SpellingDictionaryOptions, SuggestOptions};
use crate::trie::{Collector, SuggestionResult};
use crate::{FindResult, SpellingDictionary};

/// Stands in for a dictionary that could not be loaded, so that the rest
/// of a collection keeps working. The error is reported through `errors()`.
#[derive(Debug)]
pub struct FailedToLoadDictionary {
    name: String,
    source: String,
    options: SpellingDictionaryOptions,
    error: Arc<DictionaryLoadError>,
}

impl FailedToLoadDictionary {
    pub fn new(name: &str, source: &str, cause: anyhow::Error) -> Self {
        FailedToLoadDictionary {
            name: name.to_string(),
            source: source.to_string(),
            options: SpellingDictionaryOptions::default(),
            error: Arc::new(DictionaryLoadError::new(name, source, cause)),
        }
    }
}

impl SpellingDictionary for FailedToLoadDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        0
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        false
    }

    fn contains_no_suggest_words(&self) -> bool {
        false
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        &self.options
    }

    fn has(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn find(&self, _word: &str, _options: &SearchOptions) -> Option<FindResult> {
        None
    }

    fn is_forbidden(&self, _word: &str, _ignore_case_and_accents: Option<bool>) -> bool {
        false
    }

    fn is_no_suggest_word(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn suggest(&self, _word: &str, _options: &SuggestOptions) -> Vec<SuggestionResult> {
        Vec::new()
    }

    fn gen_suggestions(&self, _collector: &mut dyn Collector, _options: &SuggestOptions) {}

    fn errors(&self) -> Vec<Arc<DictionaryLoadError>> {
        vec![self.error.clone()]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_failed_dictionary() {
        let d = FailedToLoadDictionary::new("words", "missing.txt", anyhow!("no such file"));
        assert!(!d.has("anything", &SearchOptions::default()));
        assert_eq!(0, d.size());
        let errors = d.errors();
        assert_eq!(1, errors.len());
        assert_eq!("words", errors[0].name);
        assert!(errors[0].to_string().contains("no such file"));
    }
}
