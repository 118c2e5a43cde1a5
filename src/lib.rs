#![warn(missing_debug_implementations)]

//! Word lookup and suggestion engine for spell-checking linters.
//!
//! Many word sources (word lists, typo tables, forbidden-word lists, ignore
//! lists) are exposed through the one [`SpellingDictionary`] trait and
//! combined with [`SpellingDictionaryCollection`].

use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

pub mod cache;
pub mod caching;
pub mod dictionary;
mod error;
pub mod forms;
pub mod loader;
pub mod options;
mod repmap;
pub mod trie;
pub mod typos;

pub use crate::caching::CachingDictionary;
pub use crate::dictionary::{
    create_collection, create_failed_to_load_dictionary,
    create_flag_words_dictionary, create_ignore_words_dictionary,
    create_spelling_dictionary, create_spelling_dictionary_from_trie_file,
    create_suggest_dictionary, create_suggest_dictionary_from_def, create_typos_dictionary,
    create_typos_dictionary_from_def, SpellingDictionaryCollection,
};
pub use crate::error::{DictionaryLoadError, TyposError};
pub use crate::options::{
    CompoundWordsMethod, SearchOptions, SpellingDictionaryOptions,
    SuggestOptions, UseCompounds,
};
pub use crate::trie::{Collector, SuggestionResult};
pub use crate::typos::{TypoValue, TyposDef};

/// The outcome of a successful dictionary search.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindResult {
    /// The form of the word that matched.
    pub found: String,
    /// The word must be flagged even though it was found.
    pub forbidden: bool,
    /// The word is fine but must never be offered as a suggestion.
    pub no_suggest: bool,
}

impl FindResult {
    pub fn new(found: impl Into<String>, forbidden: bool, no_suggest: bool) -> Self {
        FindResult {
            found: found.into(),
            forbidden,
            no_suggest,
        }
    }
}

pub trait SpellingDictionary: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Where the words came from, for example a file path.
    fn source(&self) -> &str;

    /// An approximation of the number of words, used to order collections.
    fn size(&self) -> usize;

    fn is_dictionary_case_sensitive(&self) -> bool;

    fn contains_no_suggest_words(&self) -> bool;

    fn options(&self) -> &SpellingDictionaryOptions;

    /// Returns true if the word is a known, valid word.
    fn has(&self, word: &str, options: &SearchOptions) -> bool;

    /// A more detailed search for a word. Might take longer than `has`.
    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult>;

    /// Returns true if the word must always be flagged.
    /// `ignore_case_and_accents` defaults to false when `None`.
    fn is_forbidden(&self, word: &str, ignore_case_and_accents: Option<bool>) -> bool;

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool;

    /// Returns a ranked list of corrections for `word`.
    /// The list may be empty.
    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult>;

    /// Feed candidate corrections for `collector.word()` into `collector`.
    fn gen_suggestions(&self, collector: &mut dyn Collector, options: &SuggestOptions);

    fn preferred_suggestions(&self, _word: &str) -> Vec<SuggestionResult> {
        Vec::new()
    }

    /// Apply the dictionary's replacement map to `word`.
    fn map_word(&self, word: &str) -> String {
        word.to_string()
    }

    /// Errors captured while loading this dictionary.
    fn errors(&self) -> Vec<Arc<DictionaryLoadError>> {
        Vec::new()
    }
}
