//! A dictionary view with fixed search options and memoized lookups.

use fnv::FnvHashMap;
use log::trace;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::cache::{CacheStats, GenerationalCache};
use crate::options::{SearchOptions, SuggestOptions};
use crate::trie::SuggestionResult;
use crate::{FindResult, SpellingDictionary};

const CACHE_SIZE: usize = 1000;

/// Identifies a wrapper by the address of the wrapped dictionary.
type WrapperKey = (usize, SearchOptions);

static WRAPPERS: Lazy<Mutex<FnvHashMap<WrapperKey, Weak<CachingDictionary>>>> =
    Lazy::new(Default::default);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CachingStats {
    pub has: CacheStats,
    pub is_forbidden: CacheStats,
    pub is_no_suggest_word: CacheStats,
}

#[derive(Debug)]
pub struct CachingDictionary {
    dictionary: Arc<dyn SpellingDictionary>,
    options: SearchOptions,
    has_cache: Mutex<GenerationalCache<String, bool>>,
    forbidden_cache: Mutex<GenerationalCache<String, bool>>,
    no_suggest_cache: Mutex<GenerationalCache<String, bool>>,
}

fn memo(
    cache: &Mutex<GenerationalCache<String, bool>>,
    word: &str,
    compute: impl FnOnce() -> bool,
) -> bool {
    if let Some(value) = cache.lock().get(word) {
        return value;
    }
    let value = compute();
    cache.lock().set(word.to_string(), value);
    value
}

impl CachingDictionary {
    pub fn new(dictionary: Arc<dyn SpellingDictionary>, options: SearchOptions) -> Self {
        CachingDictionary {
            dictionary,
            options,
            has_cache: Mutex::new(GenerationalCache::new(CACHE_SIZE)),
            forbidden_cache: Mutex::new(GenerationalCache::new(CACHE_SIZE)),
            no_suggest_cache: Mutex::new(GenerationalCache::new(CACHE_SIZE)),
        }
    }

    /// The shared wrapper for this dictionary instance and these options.
    /// A new one is made once every earlier one has been dropped.
    pub fn for_dictionary(
        dictionary: &Arc<dyn SpellingDictionary>,
        options: SearchOptions,
    ) -> Arc<CachingDictionary> {
        let key = (Arc::as_ptr(dictionary) as *const () as usize, options);
        let mut wrappers = WRAPPERS.lock();
        if let Some(existing) = wrappers.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        wrappers.retain(|_, wrapper| wrapper.strong_count() > 0);
        trace!("new caching wrapper for {}", dictionary.name());
        let wrapper = Arc::new(CachingDictionary::new(dictionary.clone(), options));
        wrappers.insert(key, Arc::downgrade(&wrapper));
        wrapper
    }

    pub fn dictionary(&self) -> &Arc<dyn SpellingDictionary> {
        &self.dictionary
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn has(&self, word: &str) -> bool {
        memo(&self.has_cache, word, || self.dictionary.has(word, &self.options))
    }

    pub fn find(&self, word: &str) -> Option<FindResult> {
        self.dictionary.find(word, &self.options)
    }

    pub fn is_forbidden(&self, word: &str) -> bool {
        memo(&self.forbidden_cache, word, || {
            self.dictionary.is_forbidden(word, self.options.ignore_case)
        })
    }

    pub fn is_no_suggest_word(&self, word: &str) -> bool {
        memo(&self.no_suggest_cache, word, || {
            self.dictionary.is_no_suggest_word(word, &self.options)
        })
    }

    pub fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.dictionary.suggest(word, options)
    }

    pub fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.dictionary.preferred_suggestions(word)
    }

    pub fn stats(&self) -> CachingStats {
        CachingStats {
            has: self.has_cache.lock().stats(),
            is_forbidden: self.forbidden_cache.lock().stats(),
            is_no_suggest_word: self.no_suggest_cache.lock().stats(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dictionary::create_spelling_dictionary;
    use crate::options::SpellingDictionaryOptions;

    fn dictionary(words: &[&str]) -> Arc<dyn SpellingDictionary> {
        create_spelling_dictionary(words, "caching", "test", &SpellingDictionaryOptions::default())
    }

    #[test]
    fn test_has_is_memoized() {
        let dict =
            CachingDictionary::new(dictionary(&["apple", "!pink"]), SearchOptions::default());
        assert!(dict.has("apple"));
        assert!(dict.has("apple"));
        assert!(!dict.has("pink"));
        assert!(dict.is_forbidden("pink"));
        let stats = dict.stats();
        assert_eq!(1, stats.has.hits);
        assert_eq!(2, stats.has.misses);
        assert_eq!(1, stats.is_forbidden.misses);
    }

    #[test]
    fn test_forbidden_is_case_exact() {
        let options = SearchOptions::default().with_ignore_case(true);
        let dict = CachingDictionary::new(dictionary(&["apple", "!pink"]), options);
        assert!(dict.is_forbidden("pink"));
        assert!(!dict.is_forbidden("Pink"));
        assert!(!dict.is_forbidden("PINK"));
    }

    #[test]
    fn test_for_dictionary_is_shared() {
        let d = dictionary(&["shared", "wrapper"]);
        let a = CachingDictionary::for_dictionary(&d, SearchOptions::default());
        let b = CachingDictionary::for_dictionary(&d, SearchOptions::default());
        assert!(Arc::ptr_eq(&a, &b));
        let strict = SearchOptions::default().with_ignore_case(false);
        let c = CachingDictionary::for_dictionary(&d, strict);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(&strict, c.options());
    }

    #[test]
    fn test_delegates() {
        let dict =
            CachingDictionary::new(dictionary(&["mango", "teh: the"]), SearchOptions::default());
        assert_eq!(Some(FindResult::new("mango", false, false)), dict.find("mango"));
        assert_eq!("mango", dict.suggest("mangoo", &SuggestOptions::default())[0].word);
        assert_eq!(1, dict.preferred_suggestions("teh").len());
        assert!(!dict.is_no_suggest_word("mango"));
    }
}
