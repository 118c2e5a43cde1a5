//! The dictionary variants and the functions that build them.
//!
//! Building a dictionary is memoized: asking twice for a dictionary with the
//! same words, name, source and options returns the same `Arc`.

use anyhow::Context;
use fnv::FnvHasher;
use log::{debug, trace};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::options::{
    SpellingDictionaryOptions, SuggestOptions, DEFAULT_IGNORE_CASE, DEFAULT_NUM_SUGGESTIONS,
};
use crate::trie::{
    parse_dictionary, CollectorOptions, ParseOptions, SuggestionFilter, Trie, WeightMap,
    COMPOUND_FIX, DEFAULT_COLLECTOR_TIMEOUT, MAX_NUM_CHANGES, OPTIONAL_COMPOUND_FIX,
};
use crate::typos::TyposDef;
use crate::SpellingDictionary;

mod collection;
mod failed;
mod flag_words;
mod from_trie;
mod ignore_words;
mod suggest;
mod typos;

pub use crate::dictionary::collection::SpellingDictionaryCollection;
pub use crate::dictionary::failed::FailedToLoadDictionary;
pub use crate::dictionary::flag_words::FlagWordsDictionary;
pub use crate::dictionary::from_trie::SpellingDictionaryFromTrie;
pub use crate::dictionary::ignore_words::IgnoreWordsDictionary;
pub use crate::dictionary::suggest::SuggestDictionary;
pub use crate::dictionary::typos::TyposDictionary;

const CONSTRUCTION_CACHE_SIZE: usize = 64;

/// Identifies a built dictionary. The content of the word list is only
/// fingerprinted, so the cheap fields are compared as well.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ConstructionKey {
    kind: &'static str,
    name: String,
    source: String,
    len: usize,
    fingerprint: (u64, u64),
}

/// Recently built dictionaries, most recently used first.
#[derive(Default)]
struct ConstructionCache {
    entries: VecDeque<(ConstructionKey, Arc<dyn SpellingDictionary>)>,
}

impl ConstructionCache {
    fn get(&mut self, key: &ConstructionKey) -> Option<Arc<dyn SpellingDictionary>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let dict = entry.1.clone();
        self.entries.push_front(entry);
        Some(dict)
    }

    /// Returns the dictionary that ends up cached under `key`, which is an
    /// earlier one if another thread got there first.
    fn insert(
        &mut self,
        key: ConstructionKey,
        dict: Arc<dyn SpellingDictionary>,
    ) -> Arc<dyn SpellingDictionary> {
        if let Some(existing) = self.get(&key) {
            return existing;
        }
        self.entries.push_front((key, dict.clone()));
        self.entries.truncate(CONSTRUCTION_CACHE_SIZE);
        dict
    }
}

static CONSTRUCTED: Lazy<Mutex<ConstructionCache>> = Lazy::new(Default::default);

fn content_hash<S: AsRef<str>>(seed: u64, lines: &[S], extra: &impl Hash) -> u64 {
    let mut hasher = FnvHasher::with_key(seed);
    for line in lines {
        line.as_ref().hash(&mut hasher);
    }
    extra.hash(&mut hasher);
    hasher.finish()
}

fn construction_key<S: AsRef<str>>(
    kind: &'static str,
    lines: &[S],
    name: &str,
    source: &str,
    extra: &impl Hash,
) -> ConstructionKey {
    ConstructionKey {
        kind,
        name: name.to_string(),
        source: source.to_string(),
        len: lines.len(),
        fingerprint: (
            content_hash(0xcbf2_9ce4_8422_2325, lines, extra),
            content_hash(0x6c62_272e_07bb_0142, lines, extra),
        ),
    }
}

fn cached(key: &ConstructionKey) -> Option<Arc<dyn SpellingDictionary>> {
    let dict = CONSTRUCTED.lock().get(key)?;
    trace!("reusing dictionary {}", dict.name());
    Some(dict)
}

// The lock is not held while building, since building may construct other
// dictionaries.
fn memoized(
    key: ConstructionKey,
    build: impl FnOnce() -> Arc<dyn SpellingDictionary>,
) -> Arc<dyn SpellingDictionary> {
    if let Some(dict) = cached(&key) {
        return dict;
    }
    let dict = build();
    CONSTRUCTED.lock().insert(key, dict)
}

/// Translate caller-facing suggestion options to collector settings.
pub(crate) fn collector_options<'a>(
    options: &SuggestOptions,
    filter: Option<SuggestionFilter<'a>>,
    weight_map: Option<Arc<WeightMap>>,
) -> CollectorOptions<'a> {
    CollectorOptions {
        num_suggestions: options.num_suggestions.unwrap_or(DEFAULT_NUM_SUGGESTIONS),
        change_limit: options.num_changes.unwrap_or(MAX_NUM_CHANGES),
        include_ties: options.include_ties.unwrap_or(false),
        ignore_case: options.ignore_case.unwrap_or(DEFAULT_IGNORE_CASE),
        timeout: options.timeout.unwrap_or(DEFAULT_COLLECTOR_TIMEOUT),
        filter,
        weight_map,
    }
}

/// Build a dictionary from word list lines.
pub fn create_spelling_dictionary<S: AsRef<str>>(
    words: &[S],
    name: &str,
    source: &str,
    options: &SpellingDictionaryOptions,
) -> Arc<dyn SpellingDictionary> {
    let key = construction_key("words", words, name, source, options);
    memoized(key, || {
        let parse_options = ParseOptions {
            strip_case_and_accents: options.support_non_strict_searches.unwrap_or(true),
            make_words_forbidden: false,
        };
        let trie = parse_dictionary(words, &parse_options);
        debug!("built dictionary {name} from {source} with {} entries", trie.size());
        Arc::new(SpellingDictionaryFromTrie::new(trie, name, source, options.clone()))
    })
}

/// Build a dictionary from a serialized trie.
pub fn create_spelling_dictionary_from_trie_file(
    text: &str,
    name: &str,
    source: &str,
    options: &SpellingDictionaryOptions,
) -> anyhow::Result<Arc<dyn SpellingDictionary>> {
    let key = construction_key("trie", &[text], name, source, options);
    if let Some(dict) = cached(&key) {
        return Ok(dict);
    }
    let trie = Trie::from_json(text).with_context(|| format!("Could not read trie {source}"))?;
    debug!("loaded trie {name} from {source} with {} entries", trie.size());
    let dict = Arc::new(SpellingDictionaryFromTrie::new(trie, name, source, options.clone()));
    Ok(CONSTRUCTED.lock().insert(key, dict))
}

/// Build a dictionary of words that must always be flagged.
pub fn create_flag_words_dictionary<S: AsRef<str>>(
    words: &[S],
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    let key = construction_key("flagWords", words, name, source, &());
    memoized(key, || {
        let dict = FlagWordsDictionary::new(words, name, source);
        debug!("built flag words dictionary {name} from {source} with {} entries", dict.size());
        Arc::new(dict)
    })
}

/// Build a dictionary of words that are accepted but never suggested.
///
/// Entries using compound markers need the full trie search, so such lists
/// become a case sensitive trie dictionary instead.
pub fn create_ignore_words_dictionary<S: AsRef<str>>(
    words: &[S],
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    let key = construction_key("ignoreWords", words, name, source, &());
    memoized(key, || {
        let uses_compounds = words
            .iter()
            .any(|w| w.as_ref().contains([OPTIONAL_COMPOUND_FIX, COMPOUND_FIX]));
        if uses_compounds {
            let options = SpellingDictionaryOptions {
                case_sensitive: Some(true),
                no_suggest: true,
                support_non_strict_searches: Some(true),
                ..Default::default()
            };
            return create_spelling_dictionary(words, name, source, &options);
        }
        let dict = IgnoreWordsDictionary::new(words, name, source);
        debug!("built ignore words dictionary {name} from {source} with {} entries", dict.size());
        Arc::new(dict)
    })
}

/// Build a typos dictionary from `key: suggestion, ...` lines.
pub fn create_typos_dictionary<S: AsRef<str>>(
    entries: &[S],
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    create_typos_dictionary_from_def(TyposDef::from_lines(entries), name, source)
}

pub fn create_typos_dictionary_from_def(
    def: TyposDef,
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    let key = construction_key::<&str>("typos", &[], name, source, &def);
    memoized(key, || {
        debug!("built typos dictionary {name} from {source} with {} entries", def.len());
        Arc::new(TyposDictionary::new(def, name, source))
    })
}

/// Build a dictionary that only supplies suggestions.
pub fn create_suggest_dictionary<S: AsRef<str>>(
    entries: &[S],
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    create_suggest_dictionary_from_def(TyposDef::from_lines(entries), name, source)
}

pub fn create_suggest_dictionary_from_def(
    def: TyposDef,
    name: &str,
    source: &str,
) -> Arc<dyn SpellingDictionary> {
    let key = construction_key::<&str>("suggest", &[], name, source, &def);
    memoized(key, || {
        debug!("built suggest dictionary {name} from {source} with {} entries", def.len());
        Arc::new(SuggestDictionary::new(def, name, source))
    })
}

/// A placeholder for a dictionary that could not be built. Never memoized.
pub fn create_failed_to_load_dictionary(
    name: &str,
    source: &str,
    error: anyhow::Error,
) -> Arc<dyn SpellingDictionary> {
    Arc::new(FailedToLoadDictionary::new(name, source, error))
}

pub fn create_collection(
    dictionaries: Vec<Arc<dyn SpellingDictionary>>,
    name: &str,
    source: Option<&str>,
) -> SpellingDictionaryCollection {
    SpellingDictionaryCollection::new(dictionaries, name, source)
}
