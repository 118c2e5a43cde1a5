use fnv::FnvHashSet;

use crate::forms::{nfc, strip_accents};
use crate::options::{SearchOptions, SpellingDictionaryOptions, SuggestOptions};
use crate::trie::{
    parse_dictionary_lines, Collector, ParseOptions, SuggestionResult, CASE_INSENSITIVE_PREFIX,
};
use crate::{FindResult, SpellingDictionary};

/// Words that are accepted but never suggested.
#[derive(Debug)]
pub struct IgnoreWordsDictionary {
    name: String,
    source: String,
    options: SpellingDictionaryOptions,
    dict: FnvHashSet<String>,
    /// Lowercase and accent-free forms, for searches that ignore case.
    dict_non_strict: FnvHashSet<String>,
}

impl IgnoreWordsDictionary {
    pub fn new<S: AsRef<str>>(lines: &[S], name: &str, source: &str) -> Self {
        let parsed = parse_dictionary_lines(lines, &ParseOptions::default());
        let mut dict = FnvHashSet::default();
        let mut dict_non_strict = FnvHashSet::default();
        for word in parsed.words {
            match word.strip_prefix(CASE_INSENSITIVE_PREFIX) {
                Some(stripped) => dict_non_strict.insert(nfc(stripped)),
                None => dict.insert(nfc(&word)),
            };
        }
        IgnoreWordsDictionary {
            name: name.to_string(),
            source: source.to_string(),
            options: SpellingDictionaryOptions {
                no_suggest: true,
                ..Default::default()
            },
            dict,
            dict_non_strict,
        }
    }

    fn lookup(&self, word: &str, options: &SearchOptions) -> Option<String> {
        if word.is_empty() {
            return None;
        }
        let word = nfc(word);
        if self.dict.contains(&word) {
            return Some(word);
        }
        let lc = word.to_lowercase();
        if self.dict.contains(&lc) {
            return Some(lc);
        }
        if !options.resolve_ignore_case() {
            return None;
        }
        if self.dict_non_strict.contains(&lc) {
            return Some(lc);
        }
        let stripped = strip_accents(&lc);
        self.dict_non_strict.contains(&stripped).then_some(stripped)
    }
}

impl SpellingDictionary for IgnoreWordsDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.dict.len()
    }

    fn is_dictionary_case_sensitive(&self) -> bool {
        true
    }

    fn contains_no_suggest_words(&self) -> bool {
        true
    }

    fn options(&self) -> &SpellingDictionaryOptions {
        &self.options
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        self.lookup(word, options).is_some()
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        self.lookup(word, options)
            .map(|found| FindResult::new(found, false, true))
    }

    fn is_forbidden(&self, _word: &str, _ignore_case_and_accents: Option<bool>) -> bool {
        false
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        self.has(word, options)
    }

    fn suggest(&self, _word: &str, _options: &SuggestOptions) -> Vec<SuggestionResult> {
        Vec::new()
    }

    fn gen_suggestions(&self, _collector: &mut dyn Collector, _options: &SuggestOptions) {}
}
