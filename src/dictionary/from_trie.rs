use log::trace;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::cache::{AutoCache, GenerationalCache};
use crate::dictionary::collector_options;
use crate::forms::{outer_word_forms, word_search_forms, word_suggest_forms};
use crate::options::{
    CompoundWordsMethod, SearchOptions, SpellingDictionaryOptions, SuggestOptions,
};
use crate::repmap::RepMap;
use crate::trie::{
    impersonate, Collector, FindFullResult, FindWordOptions, SuggestionCollector,
    SuggestionResult, Trie, WeightMap,
};
use crate::{FindResult, SpellingDictionary};

const FIND_CACHE_SIZE: usize = 1000;
const FORBIDDEN_CACHE_SIZE: usize = 1000;
const REMAP_CACHE_SIZE: usize = 1000;

type RemapFn = Box<dyn Fn(&String) -> Vec<String> + Send + Sync>;

/// The options that decide the outcome of an any-form search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FindKey {
    compound_min_length: Option<usize>,
    ignore_case: bool,
}

/// A dictionary backed by a word trie.
#[derive(Debug)]
pub struct SpellingDictionaryFromTrie {
    trie: Arc<Trie>,
    name: String,
    source: String,
    options: SpellingDictionaryOptions,
    rep_map: RepMap,
    weight_map: Option<Arc<WeightMap>>,
    is_dictionary_case_sensitive: bool,
    size: OnceCell<usize>,
    find_cache: Mutex<GenerationalCache<String, (FindKey, Option<FindFullResult>)>>,
    forbidden_cache: Mutex<GenerationalCache<String, bool>>,
    /// Only present when the dictionary has a replacement map.
    remap_cache: Option<Mutex<AutoCache<String, Vec<String>, RemapFn>>>,
}

impl SpellingDictionaryFromTrie {
    pub fn new(
        trie: impl Into<Arc<Trie>>,
        name: &str,
        source: &str,
        options: SpellingDictionaryOptions,
    ) -> Self {
        let trie = trie.into();
        let rep_map = RepMap::from_options(&options);
        let weight_map = options
            .dictionary_information
            .as_ref()
            .map(|info| WeightMap::from_edit_costs(&info.suggestion_edit_costs))
            .filter(|map| !map.is_empty())
            .map(Arc::new);
        let remap_cache = (!rep_map.is_empty()).then(|| {
            let rep_map = rep_map.clone();
            let remap: RemapFn = Box::new(move |word: &String| rep_map.remap(word));
            Mutex::new(AutoCache::new(remap, REMAP_CACHE_SIZE))
        });
        SpellingDictionaryFromTrie {
            is_dictionary_case_sensitive: options
                .case_sensitive
                .unwrap_or_else(|| trie.is_case_aware()),
            trie,
            name: name.to_string(),
            source: source.to_string(),
            rep_map,
            weight_map,
            options,
            size: OnceCell::new(),
            find_cache: Mutex::new(GenerationalCache::new(FIND_CACHE_SIZE)),
            forbidden_cache: Mutex::new(GenerationalCache::new(FORBIDDEN_CACHE_SIZE)),
            remap_cache,
        }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    fn find_key(&self, options: &SearchOptions) -> FindKey {
        FindKey {
            compound_min_length: options
                .use_compounds
                .or(self.options.use_compounds)
                .and_then(|compounds| compounds.min_length()),
            ignore_case: options.resolve_ignore_case(),
        }
    }

    fn find_any_form(&self, word: &str, key: FindKey) -> Option<FindFullResult> {
        if let Some((cached_key, result)) = self.find_cache.lock().get(word) {
            if cached_key == key {
                return result;
            }
        }
        let result = self.find_any_form_uncached(word, key);
        self.find_cache
            .lock()
            .set(word.to_string(), (key, result.clone()));
        result
    }

    fn find_any_form_uncached(&self, word: &str, key: FindKey) -> Option<FindFullResult> {
        let forms = outer_word_forms(word, |w| self.remap(w));
        forms.iter().find_map(|form| self.find_form(form, key))
    }

    fn remap(&self, word: &str) -> Vec<String> {
        match &self.remap_cache {
            Some(cache) => cache.lock().get(&word.to_string()),
            None => Vec::new(),
        }
    }

    fn find_form(&self, word: &str, key: FindKey) -> Option<FindFullResult> {
        let case_sensitive = !key.ignore_case;
        let direct = FindWordOptions {
            case_sensitive,
            use_legacy_word_compounds: None,
        };
        let result = self.trie.find_word(word, &direct);
        if result.is_found() {
            return Some(result);
        }

        let forms = word_search_forms(word, self.is_dictionary_case_sensitive, key.ignore_case);
        for form in &forms {
            let result = self.trie.find_word(form, &direct);
            if result.is_found() {
                return Some(result);
            }
        }

        let min_length = key.compound_min_length?;
        let legacy = FindWordOptions {
            case_sensitive,
            use_legacy_word_compounds: Some(min_length),
        };
        forms
            .iter()
            .map(|form| self.trie.find_word(form, &legacy))
            .find(FindFullResult::is_found)
    }

    fn is_forbidden_word(&self, word: &str) -> bool {
        if let Some(forbidden) = self.forbidden_cache.lock().get(word) {
            return forbidden;
        }
        let forbidden = self.trie.is_forbidden_word(word);
        self.forbidden_cache.lock().set(word.to_string(), forbidden);
        forbidden
    }

    fn compound_method(&self, options: &SuggestOptions) -> CompoundWordsMethod {
        options.compound_method.unwrap_or_else(|| {
            if self.options.use_compounds.is_some_and(|c| c.is_enabled()) {
                CompoundWordsMethod::JoinWords
            } else {
                CompoundWordsMethod::None
            }
        })
    }
}

impl SpellingDictionary for SpellingDictionaryFromTrie {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        *self.size.get_or_init(|| self.trie.count_plain_words())
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        self.is_dictionary_case_sensitive
    }

    fn contains_no_suggest_words(&self) -> bool {
        self.options.no_suggest
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        &self.options
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        if word.is_empty() {
            return false;
        }
        self.find_any_form(word, self.find_key(options))
            .is_some_and(|r| !r.forbidden && r.found.is_some_and(|f| !f.is_empty()))
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        if word.is_empty() {
            return None;
        }
        let no_suggest = self.options.no_suggest;
        match self.find_any_form(word, self.find_key(options)) {
            Some(FindFullResult {
                found: Some(found),
                forbidden,
                ..
            }) => {
                trace!("{}: found {word} as {found}", self.name);
                if forbidden && self.options.ignore_forbidden_words {
                    return None;
                }
                Some(FindResult::new(found, forbidden, no_suggest))
            }
            _ => self
                .is_forbidden(word, None)
                .then(|| FindResult::new(word, true, no_suggest)),
        }
    }

    /// Forbidden entries are stored case exact, so the word is checked as
    /// given whatever `_ignore_case_and_accents` says.
    fn is_forbidden(&self, word: &str, _ignore_case_and_accents: Option<bool>) -> bool {
        if word.is_empty()
            || self.options.ignore_forbidden_words
            || !self.trie.has_forbidden_words()
        {
            return false;
        }
        self.is_forbidden_word(word)
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        self.options.no_suggest && self.has(word, options)
    }

    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        if word.is_empty() {
            return Vec::new();
        }
        let mut collector = SuggestionCollector::new(
            word,
            collector_options(options, None, self.weight_map.clone()),
        );
        self.gen_suggestions(&mut collector, options);
        collector.suggestions()
    }

    fn gen_suggestions(&self, collector: &mut dyn Collector, options: &SuggestOptions) {
        if self.options.no_suggest {
            return;
        }
        let method = self.compound_method(options);
        for form in word_suggest_forms(collector.word()) {
            let mut view = impersonate(collector, &form);
            self.trie.gen_suggestions(&mut view, method);
        }
    }

    fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.trie
            .preferred_suggestions(word)
            .iter()
            .enumerate()
            .map(|(i, s)| SuggestionResult::preferred(s.as_str(), i as u32 + 1))
            .collect()
    }

    fn map_word(&self, word: &str) -> String {
        self.rep_map.map(word)
    }
}
