//! Build dictionaries from definitions found in configuration files.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dictionary::{
    create_collection, create_failed_to_load_dictionary, create_flag_words_dictionary,
    create_ignore_words_dictionary, create_spelling_dictionary,
    create_spelling_dictionary_from_trie_file, create_suggest_dictionary,
    create_suggest_dictionary_from_def, create_typos_dictionary, create_typos_dictionary_from_def,
    SpellingDictionaryCollection,
};
use crate::options::SpellingDictionaryOptions;
use crate::trie::Trie;
use crate::typos::TyposDef;
use crate::SpellingDictionary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DictionaryKind {
    #[default]
    Words,
    FlagWords,
    IgnoreWords,
    Typos,
    Suggest,
}

/// Where to find a dictionary and how to read it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryDefinition {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "type", default)]
    pub kind: DictionaryKind,
    #[serde(flatten)]
    pub options: SpellingDictionaryOptions,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// The entries of a serialized trie, markers included.
fn trie_entries(text: &str, source: &str) -> Result<Vec<String>> {
    let trie = Trie::from_json(text).with_context(|| format!("Could not read trie {source}"))?;
    Ok(trie.words())
}

fn typos_def(text: &str, source: &str) -> Result<TyposDef> {
    serde_json::from_str(text).with_context(|| format!("Could not parse typos in {source}"))
}

fn try_load(def: &DictionaryDefinition) -> Result<Arc<dyn SpellingDictionary>> {
    let source = def.path.display().to_string();
    let text = read_to_string(&def.path)
        .with_context(|| format!("Could not read dictionary file {source}"))?;
    let name = def.name.as_str();

    if is_json(&def.path) {
        return match def.kind {
            DictionaryKind::Words => {
                create_spelling_dictionary_from_trie_file(&text, name, &source, &def.options)
            }
            DictionaryKind::FlagWords => {
                let words = trie_entries(&text, &source)?;
                Ok(create_flag_words_dictionary(&words, name, &source))
            }
            DictionaryKind::IgnoreWords => {
                let words = trie_entries(&text, &source)?;
                Ok(create_ignore_words_dictionary(&words, name, &source))
            }
            DictionaryKind::Typos => {
                let typos = typos_def(&text, &source)?;
                Ok(create_typos_dictionary_from_def(typos, name, &source))
            }
            DictionaryKind::Suggest => {
                let typos = typos_def(&text, &source)?;
                Ok(create_suggest_dictionary_from_def(typos, name, &source))
            }
        };
    }

    let lines: Vec<&str> = text.lines().collect();
    let dict = match def.kind {
        DictionaryKind::Words => create_spelling_dictionary(&lines, name, &source, &def.options),
        DictionaryKind::FlagWords => create_flag_words_dictionary(&lines, name, &source),
        DictionaryKind::IgnoreWords => create_ignore_words_dictionary(&lines, name, &source),
        DictionaryKind::Typos => create_typos_dictionary(&lines, name, &source),
        DictionaryKind::Suggest => create_suggest_dictionary(&lines, name, &source),
    };
    Ok(dict)
}

/// Load one dictionary. A dictionary that cannot be loaded is replaced by
/// one that knows no words and reports the error.
pub fn load_dictionary(def: &DictionaryDefinition) -> Arc<dyn SpellingDictionary> {
    match try_load(def) {
        Ok(dict) => {
            debug!("loaded {:?} dictionary {} from {}", def.kind, def.name, def.path.display());
            dict
        }
        Err(err) => {
            warn!("{err:#}");
            create_failed_to_load_dictionary(&def.name, &def.path.display().to_string(), err)
        }
    }
}

pub fn load_collection(name: &str, defs: &[DictionaryDefinition]) -> SpellingDictionaryCollection {
    create_collection(defs.iter().map(load_dictionary).collect(), name, None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::SearchOptions;
    use crate::trie::{parse_dictionary, ParseOptions};
    use std::fs::write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("spelldict-{}-{name}", std::process::id()));
        write(&path, contents).unwrap();
        path
    }

    fn definition(name: &str, path: PathBuf, kind: DictionaryKind) -> DictionaryDefinition {
        DictionaryDefinition {
            name: name.to_string(),
            path,
            kind,
            options: SpellingDictionaryOptions::default(),
        }
    }

    #[test]
    fn test_definition_from_json() {
        let def: DictionaryDefinition = serde_json::from_str(
            r#"{"name": "fruit", "path": "fruit.txt", "type": "flagWords", "noSuggest": true}"#,
        )
        .unwrap();
        assert_eq!(DictionaryKind::FlagWords, def.kind);
        assert!(def.options.no_suggest);

        let def: DictionaryDefinition =
            serde_json::from_str(r#"{"name": "words", "path": "words.txt"}"#).unwrap();
        assert_eq!(DictionaryKind::Words, def.kind);
    }

    #[test]
    fn test_load_word_list() {
        let path = temp_file("words.txt", "apple\nmango\n# comment\n");
        let dict = load_dictionary(&definition("fruit", path, DictionaryKind::Words));
        assert!(dict.errors().is_empty());
        assert!(dict.has("mango", &SearchOptions::default()));
        assert!(!dict.has("comment", &SearchOptions::default()));
    }

    #[test]
    fn test_load_json() {
        let path = temp_file("typos.json", r#"{"teh": "the"}"#);
        let dict = load_dictionary(&definition("typos", path, DictionaryKind::Typos));
        assert!(dict.is_forbidden("teh", None));

        let trie = parse_dictionary(&["kiwi"], &ParseOptions::default());
        let path = temp_file("trie.json", &trie.to_json().unwrap());
        let dict = load_dictionary(&definition("trie", path, DictionaryKind::Words));
        assert!(dict.has("kiwi", &SearchOptions::default()));
    }

    #[test]
    fn test_load_json_trie_per_kind() {
        let trie = parse_dictionary(&["badword", "colour"], &ParseOptions::default());
        let text = trie.to_json().unwrap();
        let opts = SearchOptions::default();

        let path = temp_file("flag-trie.json", &text);
        let dict = load_dictionary(&definition("flags", path, DictionaryKind::FlagWords));
        assert!(dict.errors().is_empty());
        assert!(!dict.has("badword", &opts));
        assert!(dict.is_forbidden("badword", None));

        let path = temp_file("ignore-trie.json", &text);
        let dict = load_dictionary(&definition("ignore", path, DictionaryKind::IgnoreWords));
        assert!(dict.has("colour", &opts));
        assert!(dict.is_no_suggest_word("colour", &opts));
        assert!(!dict.is_forbidden("colour", None));

        let path = temp_file("suggest.json", r#"{"cafe": "café"}"#);
        let dict = load_dictionary(&definition("suggest", path, DictionaryKind::Suggest));
        assert!(!dict.is_forbidden("cafe", None));
        assert_eq!("café", dict.suggest("cafe", &Default::default())[0].word);

        let path = temp_file("bad-flag-trie.json", "[1, 2]");
        let dict = load_dictionary(&definition("bad", path, DictionaryKind::FlagWords));
        assert_eq!(1, dict.errors().len());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("spelldict-does-not-exist.txt");
        let dict = load_dictionary(&definition("missing", path, DictionaryKind::Words));
        let errors = dict.errors();
        assert_eq!(1, errors.len());
        assert_eq!("missing", errors[0].name);
        assert!(errors[0].detail.contains("Could not read dictionary file"));
        assert_eq!(0, dict.size());
    }

    #[test]
    fn test_load_collection() {
        let words = temp_file("coll-words.txt", "avocado\n");
        let flags = temp_file("coll-flags.txt", "Avocado\n");
        let missing = std::env::temp_dir().join("spelldict-missing-collection.txt");
        let collection = load_collection(
            "project",
            &[
                definition("words", words, DictionaryKind::Words),
                definition("flags", flags, DictionaryKind::FlagWords),
                definition("missing", missing, DictionaryKind::Words),
            ],
        );
        let opts = SearchOptions::default();
        assert!(collection.has("avocado", &opts));
        assert!(!collection.has("Avocado", &opts));
        assert_eq!(1, collection.errors().len());
    }
}
