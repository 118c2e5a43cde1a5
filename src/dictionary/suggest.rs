use fnv::FnvHashSet;

use crate::dictionary::TyposDictionary;
use crate::forms::strip_accents;
use crate::options::{SearchOptions, SpellingDictionaryOptions, SuggestOptions};
use crate::trie::{Collector, SuggestionResult};
use crate::typos::TyposDef;
use crate::{FindResult, SpellingDictionary};

/// A table of corrections that neither accepts nor flags any word.
#[derive(Debug)]
pub struct SuggestDictionary {
    typos: TyposDictionary,
    suggestions: FnvHashSet<String>,
    /// Lowercase and accent-free forms of `suggestions`.
    suggestions_folded: FnvHashSet<String>,
}

fn fold(word: &str) -> String {
    strip_accents(&word.to_lowercase())
}

impl SuggestDictionary {
    pub fn new(def: TyposDef, name: &str, source: &str) -> Self {
        let suggestions: FnvHashSet<String> = def.all_suggestions().map(str::to_string).collect();
        let suggestions_folded = suggestions.iter().map(|s| fold(s)).collect();
        SuggestDictionary {
            typos: TyposDictionary::new(def, name, source),
            suggestions,
            suggestions_folded,
        }
    }

    /// True if `word` is one of the corrections offered by this table.
    pub fn is_suggested_word(&self, word: &str, ignore_case_and_accents: bool) -> bool {
        if self.suggestions.contains(word) {
            return true;
        }
        ignore_case_and_accents && self.suggestions_folded.contains(&fold(word))
    }
}

impl SpellingDictionary for SuggestDictionary {
    fn name(&self) -> &str {
        self.typos.name()
    }

    fn source(&self) -> &str {
        self.typos.source()
    }

    fn size(&self) -> usize {
        self.typos.size()
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        true
    }

    fn contains_no_suggest_words(&self) -> bool {
        false
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        self.typos.options()
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

    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.typos.suggest(word, options)
    }

    fn gen_suggestions(&self, collector: &mut dyn Collector, options: &SuggestOptions) {
        self.typos.gen_suggestions(collector, options)
    }

    fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.typos.preferred_suggestions(word)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_suggest_dictionary_is_neutral() {
        let d = SuggestDictionary::new(TyposDef::from_lines(&["cafe: café"]), "sugg", "memory");
        let opts = SearchOptions::default();
        assert!(!d.has("cafe", &opts));
        assert_eq!(None, d.find("cafe", &opts));
        assert!(!d.is_forbidden("cafe", None));
        assert_eq!(
            vec![SuggestionResult::preferred("café", 1)],
            d.suggest("cafe", &SuggestOptions::default())
        );
    }

    #[test]
    fn test_is_suggested_word() {
        let d = SuggestDictionary::new(TyposDef::from_lines(&["cafe: Café"]), "sugg", "memory");
        assert!(d.is_suggested_word("Café", false));
        assert!(!d.is_suggested_word("cafe", false));
        assert!(d.is_suggested_word("cafe", true));
    }
}
