use itertools::Itertools;
use std::sync::Arc;

use crate::dictionary::collector_options;
use crate::error::DictionaryLoadError;
use crate::options::{
    CompoundWordsMethod, SearchOptions, SpellingDictionaryOptions, SuggestOptions,
    DEFAULT_FORBIDDEN_IGNORE_CASE,
};
use crate::trie::{
    Collector, SuggestionCollector, SuggestionFilter, SuggestionResult, CASE_INSENSITIVE_PREFIX,
};
use crate::{FindResult, SpellingDictionary};

/// Several dictionaries searched as one.
///
/// A word is known if any member knows it, unless some member forbids it.
/// A member listing the word as no-suggest overrides a forbidding member.
#[derive(Debug)]
pub struct SpellingDictionaryCollection {
    dictionaries: Vec<Arc<dyn SpellingDictionary>>,
    name: String,
    source: String,
    options: SpellingDictionaryOptions,
    is_dictionary_case_sensitive: bool,
    contains_no_suggest_words: bool,
}

impl SpellingDictionaryCollection {
    pub fn new(
        mut dictionaries: Vec<Arc<dyn SpellingDictionary>>,
        name: &str,
        source: Option<&str>,
    ) -> Self {
        // Biggest first. The sort is stable so equal sizes keep their order.
        dictionaries.sort_by_key(|d| std::cmp::Reverse(d.size()));
        let source = match source {
            Some(source) => source.to_string(),
            None => dictionaries.iter().map(|d| d.name()).join(", "),
        };
        SpellingDictionaryCollection {
            is_dictionary_case_sensitive: dictionaries
                .iter()
                .any(|d| d.is_dictionary_case_sensitive()),
            contains_no_suggest_words: dictionaries.iter().any(|d| d.contains_no_suggest_words()),
            dictionaries,
            name: name.to_string(),
            source,
            options: SpellingDictionaryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SpellingDictionaryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dictionaries(&self) -> &[Arc<dyn SpellingDictionary>] {
        &self.dictionaries
    }

    fn compound_method(&self, options: &SuggestOptions) -> CompoundWordsMethod {
        if self.options.use_compounds.is_some_and(|c| c.is_enabled()) {
            CompoundWordsMethod::JoinWords
        } else {
            options
                .compound_method
                .unwrap_or(CompoundWordsMethod::SeparateWords)
        }
    }

    fn is_acceptable_suggestion(
        &self,
        word: &str,
        ignore_case: bool,
        search: &SearchOptions,
    ) -> bool {
        if !ignore_case && word.starts_with(CASE_INSENSITIVE_PREFIX) {
            return false;
        }
        !self.is_forbidden(word, None) && !self.is_no_suggest_word(word, search)
    }
}

impl SpellingDictionary for SpellingDictionaryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.dictionaries.iter().map(|d| d.size()).sum()
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        self.is_dictionary_case_sensitive
    }

    fn contains_no_suggest_words(&self) -> bool {
        self.contains_no_suggest_words
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        &self.options
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        if word.is_empty() {
            return false;
        }
        self.dictionaries.iter().any(|d| d.has(word, options)) && !self.is_forbidden(word, None)
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        if word.is_empty() {
            return None;
        }
        self.dictionaries
            .iter()
            .filter_map(|d| d.find(word, options))
            .reduce(|acc, r| FindResult {
                found: if !acc.forbidden && r.forbidden {
                    r.found
                } else {
                    acc.found
                },
                forbidden: acc.forbidden || r.forbidden,
                no_suggest: acc.no_suggest || r.no_suggest,
            })
    }

    fn is_forbidden(&self, word: &str, ignore_case_and_accents: Option<bool>) -> bool {
        if word.is_empty() {
            return false;
        }
        let ignore_case = ignore_case_and_accents.unwrap_or(DEFAULT_FORBIDDEN_IGNORE_CASE);
        let search = SearchOptions::default().with_ignore_case(ignore_case);
        self.dictionaries
            .iter()
            .any(|d| d.is_forbidden(word, Some(ignore_case)))
            && !self.is_no_suggest_word(word, &search)
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        if !self.contains_no_suggest_words || word.is_empty() {
            return false;
        }
        self.dictionaries
            .iter()
            .any(|d| d.is_no_suggest_word(word, options))
    }

    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        if word.is_empty() {
            return Vec::new();
        }
        let search = options.search_options();
        let ignore_case = search.resolve_ignore_case();
        let filter: SuggestionFilter<'_> = Box::new(move |sugg: &str, _cost: u32| {
            self.is_acceptable_suggestion(sugg, ignore_case, &search)
        });
        let mut collector =
            SuggestionCollector::new(word, collector_options(options, Some(filter), None));
        self.gen_suggestions(&mut collector, options);
        collector.suggestions()
    }

    fn gen_suggestions(&self, collector: &mut dyn Collector, options: &SuggestOptions) {
        let options = SuggestOptions {
            compound_method: Some(self.compound_method(options)),
            ..*options
        };
        for dictionary in &self.dictionaries {
            if collector.timed_out() {
                break;
            }
            dictionary.gen_suggestions(collector, &options);
        }
    }

    fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.dictionaries
            .iter()
            .flat_map(|d| d.preferred_suggestions(word))
            .unique_by(|s| s.word.clone())
            .collect()
    }

    fn errors(&self) -> Vec<Arc<DictionaryLoadError>> {
        self.dictionaries.iter().flat_map(|d| d.errors()).collect()
    }
}
