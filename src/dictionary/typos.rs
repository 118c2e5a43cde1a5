use fnv::FnvHashSet;

use crate::options::{SearchOptions, SpellingDictionaryOptions, SuggestOptions};
use crate::trie::{Collector, SuggestionResult};
use crate::typos::{TypoValue, TyposDef, NO_SUGGEST_PREFIX};
use crate::{FindResult, SpellingDictionary};

/// Known misspellings. Every key is forbidden unless it is marked with `!`,
/// and the suggested corrections are accepted without being flagged.
#[derive(Debug)]
pub struct TyposDictionary {
    name: String,
    source: String,
    options: SpellingDictionaryOptions,
    def: TyposDef,
    /// Explicit `!` keys and all suggestions.
    ignore_words: FnvHashSet<String>,
    /// Only the explicit `!` keys.
    no_suggest_words: FnvHashSet<String>,
}

impl TyposDictionary {
    pub fn new(def: TyposDef, name: &str, source: &str) -> Self {
        let no_suggest_words: FnvHashSet<String> =
            def.no_suggest_keys().map(str::to_string).collect();
        let mut ignore_words = no_suggest_words.clone();
        ignore_words.extend(def.all_suggestions().map(str::to_string));
        TyposDictionary {
            name: name.to_string(),
            source: source.to_string(),
            options: SpellingDictionaryOptions::default(),
            def,
            ignore_words,
            no_suggest_words,
        }
    }

    pub fn def(&self) -> &TyposDef {
        &self.def
    }

    /// Tries `word`, then its lowercase form.
    fn lookup<'a>(word: &'a str, lc: &'a str, matches: impl Fn(&str) -> bool) -> Option<&'a str> {
        [word, lc].into_iter().find(|w| matches(w))
    }

    fn typo_value(&self, word: &str) -> Option<&TypoValue> {
        if word.starts_with(NO_SUGGEST_PREFIX) {
            return None;
        }
        self.def
            .get(word)
            .or_else(|| self.def.get(&word.to_lowercase()))
    }

    fn suggestions_for(&self, word: &str) -> Vec<SuggestionResult> {
        self.typo_value(word)
            .map(|value| {
                value
                    .suggestions()
                    .iter()
                    .enumerate()
                    .map(|(i, s)| SuggestionResult::preferred(s.as_str(), i as u32 + 1))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SpellingDictionary for TyposDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.def.len()
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        true
    }

    fn contains_no_suggest_words(&self) -> bool {
        !self.no_suggest_words.is_empty()
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        &self.options
    }

    fn has(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn find(&self, word: &str, _options: &SearchOptions) -> Option<FindResult> {
        if word.is_empty() {
            return None;
        }
        let lc = word.to_lowercase();
        if let Some(found) = Self::lookup(word, &lc, |w| self.ignore_words.contains(w)) {
            return Some(FindResult::new(found, false, true));
        }
        let is_typo = |w: &str| !w.starts_with(NO_SUGGEST_PREFIX) && self.def.contains_key(w);
        Self::lookup(word, &lc, is_typo).map(|found| FindResult::new(found, true, false))
    }

    fn is_forbidden(&self, word: &str, _ignore_case_and_accents: Option<bool>) -> bool {
        self.find(word, &SearchOptions::default())
            .is_some_and(|r| r.forbidden)
    }

    fn is_no_suggest_word(&self, word: &str, _options: &SearchOptions) -> bool {
        if word.is_empty() {
            return false;
        }
        let lc = word.to_lowercase();
        Self::lookup(word, &lc, |w| self.no_suggest_words.contains(w)).is_some()
    }

    fn suggest(&self, word: &str, _options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.suggestions_for(word)
    }

    fn gen_suggestions(&self, collector: &mut dyn Collector, _options: &SuggestOptions) {
        for sugg in self.suggestions_for(collector.word()) {
            collector.add(sugg);
        }
    }

    fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.suggestions_for(word)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trie::{CollectorOptions, SuggestionCollector};

    fn typos(lines: &[&str]) -> TyposDictionary {
        TyposDictionary::new(TyposDef::from_lines(lines), "typos", "memory")
    }

    #[test]
    fn test_suggest_in_order() {
        let d = typos(&["wont: won't, will not"]);
        assert_eq!(
            vec![
                SuggestionResult::preferred("won't", 1),
                SuggestionResult::preferred("will not", 2)
            ],
            d.suggest("wont", &SuggestOptions::default())
        );
        assert_eq!(2, d.suggest("Wont", &SuggestOptions::default()).len());
        assert!(d.suggest("won't", &SuggestOptions::default()).is_empty());
    }

    #[test]
    fn test_find() {
        let d = typos(&["wont: won't, will not", "!colour", "bad"]);
        let opts = SearchOptions::default();
        assert_eq!(Some(FindResult::new("wont", true, false)), d.find("wont", &opts));
        assert_eq!(Some(FindResult::new("wont", true, false)), d.find("WONT", &opts));
        assert_eq!(Some(FindResult::new("bad", true, false)), d.find("bad", &opts));
        assert_eq!(Some(FindResult::new("won't", false, true)), d.find("won't", &opts));
        assert_eq!(Some(FindResult::new("colour", false, true)), d.find("colour", &opts));
        assert_eq!(None, d.find("fine", &opts));
        assert_eq!(None, d.find("!colour", &opts));
        assert_eq!(None, d.find("", &opts));
        assert!(!d.has("wont", &opts));
    }

    #[test]
    fn test_forbidden_and_no_suggest() {
        let d = typos(&["wont: won't", "!colour"]);
        let opts = SearchOptions::default();
        assert!(d.is_forbidden("wont", None));
        assert!(!d.is_forbidden("won't", None));
        assert!(d.is_no_suggest_word("colour", &opts));
        assert!(!d.is_no_suggest_word("won't", &opts));
        assert!(d.contains_no_suggest_words());
        assert!(!typos(&["wont: won't"]).contains_no_suggest_words());
    }

    #[test]
    fn test_gen_suggestions() {
        let d = typos(&["teh: the"]);
        let mut collector = SuggestionCollector::new("teh", CollectorOptions::default());
        d.gen_suggestions(&mut collector, &SuggestOptions::default());
        assert_eq!(vec![SuggestionResult::preferred("the", 1)], collector.suggestions());
    }
}
