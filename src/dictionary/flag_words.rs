use crate::dictionary::{SpellingDictionaryFromTrie, TyposDictionary};
use crate::options::{SearchOptions, SpellingDictionaryOptions, SuggestOptions};
use crate::trie::{
    parse_dictionary, Collector, ParseOptions, SuggestionResult, CASE_INSENSITIVE_PREFIX,
    COMPOUND_FIX, OPTIONAL_COMPOUND_FIX,
};
use crate::typos::{parse_entry, TyposDef};
use crate::{FindResult, SpellingDictionary};

/// Words that must always be flagged.
///
/// Plain entries and `word: suggestion` entries live in a typos table.
/// Entries using compound or case markers need a trie, which is kept as an
/// auxiliary dictionary whose words are all forbidden. Like the typos
/// table, it matches a word or its lowercase form.
#[derive(Debug)]
pub struct FlagWordsDictionary {
    typos: TyposDictionary,
    aux: Option<SpellingDictionaryFromTrie>,
}

fn needs_trie(key: &str) -> bool {
    key.contains([OPTIONAL_COMPOUND_FIX, COMPOUND_FIX, CASE_INSENSITIVE_PREFIX])
}

impl FlagWordsDictionary {
    pub fn new<S: AsRef<str>>(lines: &[S], name: &str, source: &str) -> Self {
        let mut def = TyposDef::new();
        let mut trie_lines = Vec::new();
        for line in lines {
            let Some(entry) = parse_entry(line.as_ref()) else {
                continue;
            };
            if entry.suggestions.is_empty() && needs_trie(entry.key) {
                trie_lines.push(entry.key.replace(CASE_INSENSITIVE_PREFIX, "").to_lowercase());
            } else {
                def.insert_line(line.as_ref());
            }
        }
        let aux = (!trie_lines.is_empty()).then(|| {
            let options = ParseOptions {
                strip_case_and_accents: false,
                make_words_forbidden: true,
            };
            let trie = parse_dictionary(&trie_lines, &options);
            SpellingDictionaryFromTrie::new(
                trie,
                name,
                source,
                SpellingDictionaryOptions::default(),
            )
        });
        FlagWordsDictionary {
            typos: TyposDictionary::new(def, name, source),
            aux,
        }
    }

    fn find_in_aux(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        let aux = self.aux.as_ref()?;
        if let Some(result) = aux.find(word, options).filter(|r| r.forbidden) {
            return Some(result);
        }
        // Marked entries are stored in lowercase.
        let forbidden =
            aux.is_forbidden(word, None) || aux.is_forbidden(&word.to_lowercase(), None);
        forbidden.then(|| FindResult::new(word, true, false))
    }
}

impl SpellingDictionary for FlagWordsDictionary {
    fn name(&self) -> &str {
        self.typos.name()
    }

    fn source(&self) -> &str {
        self.typos.source()
    }

    fn size(&self) -> usize {
        self.typos.size() + self.aux.as_ref().map_or(0, |aux| aux.trie().size())
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

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        if word.is_empty() {
            return None;
        }
        match self.typos.find(word, options) {
            Some(result) if result.forbidden => return Some(result),
            Some(_) => return None,
            None => (),
        }
        self.find_in_aux(word, options)
    }

    fn is_forbidden(&self, word: &str, ignore_case_and_accents: Option<bool>) -> bool {
        let options = SearchOptions::default()
            .with_ignore_case(ignore_case_and_accents.unwrap_or(false));
        self.find(word, &options).is_some_and(|r| r.forbidden)
    }

    fn is_no_suggest_word(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.typos.suggest(word, options)
    }

    fn gen_suggestions(&self, _collector: &mut dyn Collector, _options: &SuggestOptions) {}

    fn preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.typos.preferred_suggestions(word)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn flags(lines: &[&str]) -> FlagWordsDictionary {
        FlagWordsDictionary::new(lines, "flag", "memory")
    }

    #[test]
    fn test_plain_flag_words() {
        let d = flags(&["Avocado", "hte: the"]);
        let opts = SearchOptions::default();
        assert_eq!(Some(FindResult::new("Avocado", true, false)), d.find("Avocado", &opts));
        assert_eq!(None, d.find("avocado", &opts));
        assert!(d.is_forbidden("hte", None));
        assert!(!d.has("Avocado", &opts));
        assert_eq!(vec![SuggestionResult::preferred("the", 1)], d.preferred_suggestions("hte"));
        assert_eq!(2, d.size());
    }

    #[test]
    fn test_ignored_entry_is_not_found() {
        let d = flags(&["colour", "!colour"]);
        assert_eq!(None, d.find("colour", &SearchOptions::default()));
        assert!(!d.is_forbidden("colour", None));
    }

    #[test]
    fn test_marked_entries_use_trie() {
        let d = flags(&["pink*", "~Stink"]);
        assert!(d.aux.is_some());
        assert!(d.is_forbidden("pink", None));
        assert!(!d.is_forbidden("pinkbug", None));
        assert!(d.is_forbidden("Stink", None));
        assert!(d.is_forbidden("stink", None));
        assert!(!d.is_forbidden("stinky", None));
    }

    #[test]
    fn test_no_suggestions_generated() {
        let d = flags(&["teh: the"]);
        let suggs = d.suggest("teh", &SuggestOptions::default());
        assert_eq!(vec![SuggestionResult::preferred("the", 1)], suggs);
        assert!(d.suggest("", &SuggestOptions::default()).is_empty());
    }
}
