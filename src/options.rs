//! Search, suggestion and dictionary options.
//!
//! All of these are plain values. `SearchOptions` in particular is `Copy`
//! and `Hash` so that it can key the lookup caches directly.

use serde::{Deserialize, Serialize};

/// Used when `SearchOptions::ignore_case` is not set.
pub const DEFAULT_IGNORE_CASE: bool = true;
/// Used when `is_forbidden` is called without `ignore_case_and_accents`.
pub const DEFAULT_FORBIDDEN_IGNORE_CASE: bool = false;
pub const DEFAULT_NUM_SUGGESTIONS: usize = 10;
/// Shortest word piece accepted by legacy compound matching.
pub const DEFAULT_LEGACY_MIN_COMPOUND_LENGTH: usize = 3;

/// Whether words may be formed by joining dictionary words.
/// Configured as `true`, `false`, or a minimum piece length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CompoundsSetting", into = "CompoundsSetting")]
pub enum UseCompounds {
    No,
    Yes,
    MinLength(usize),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum CompoundsSetting {
    Flag(bool),
    Length(usize),
}

impl From<CompoundsSetting> for UseCompounds {
    fn from(setting: CompoundsSetting) -> Self {
        match setting {
            CompoundsSetting::Flag(true) => UseCompounds::Yes,
            CompoundsSetting::Flag(false) | CompoundsSetting::Length(0) => UseCompounds::No,
            CompoundsSetting::Length(n) => UseCompounds::MinLength(n),
        }
    }
}

impl From<UseCompounds> for CompoundsSetting {
    fn from(compounds: UseCompounds) -> Self {
        match compounds {
            UseCompounds::No => CompoundsSetting::Flag(false),
            UseCompounds::Yes => CompoundsSetting::Flag(true),
            UseCompounds::MinLength(n) => CompoundsSetting::Length(n),
        }
    }
}

impl From<bool> for UseCompounds {
    fn from(enabled: bool) -> Self {
        if enabled {
            UseCompounds::Yes
        } else {
            UseCompounds::No
        }
    }
}

impl UseCompounds {
    pub fn is_enabled(self) -> bool {
        self.min_length().is_some()
    }

    /// The shortest allowed piece, or `None` if compounds are disabled.
    pub fn min_length(self) -> Option<usize> {
        match self {
            UseCompounds::No | UseCompounds::MinLength(0) => None,
            UseCompounds::Yes => Some(DEFAULT_LEGACY_MIN_COMPOUND_LENGTH),
            UseCompounds::MinLength(n) => Some(n),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub ignore_case: Option<bool>,
    pub use_compounds: Option<UseCompounds>,
}

impl SearchOptions {
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }

    pub fn with_compounds(mut self, compounds: impl Into<UseCompounds>) -> Self {
        self.use_compounds = Some(compounds.into());
        self
    }

    pub fn resolve_ignore_case(&self) -> bool {
        self.ignore_case.unwrap_or(DEFAULT_IGNORE_CASE)
    }
}

/// How suggestions may combine several dictionary words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompoundWordsMethod {
    /// Only whole words.
    #[default]
    None,
    /// Words joined with `+`, as in `apple+mango`.
    JoinWords,
    /// Words separated by a space, as in `apple mango`.
    SeparateWords,
}

impl CompoundWordsMethod {
    pub fn separator(self) -> Option<char> {
        match self {
            CompoundWordsMethod::None => None,
            CompoundWordsMethod::JoinWords => Some(crate::trie::JOIN_SEPARATOR),
            CompoundWordsMethod::SeparateWords => Some(crate::trie::WORD_SEPARATOR),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestOptions {
    pub ignore_case: Option<bool>,
    pub use_compounds: Option<UseCompounds>,
    /// Defaults to 10.
    pub num_suggestions: Option<usize>,
    /// Maximum number of edits. Defaults to 5.
    pub num_changes: Option<usize>,
    /// Keep suggestions tied with the last one even past `num_suggestions`.
    pub include_ties: Option<bool>,
    /// Advisory time limit in milliseconds.
    pub timeout: Option<u64>,
    pub compound_method: Option<CompoundWordsMethod>,
}

impl SuggestOptions {
    pub fn with_num_suggestions(mut self, num_suggestions: usize) -> Self {
        self.num_suggestions = Some(num_suggestions);
        self
    }

    pub fn with_num_changes(mut self, num_changes: usize) -> Self {
        self.num_changes = Some(num_changes);
        self
    }

    pub fn with_compound_method(mut self, method: CompoundWordsMethod) -> Self {
        self.compound_method = Some(method);
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }

    pub fn with_include_ties(mut self, include_ties: bool) -> Self {
        self.include_ties = Some(include_ties);
        self
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            ignore_case: self.ignore_case,
            use_compounds: self.use_compounds,
        }
    }
}

/// Per-dictionary settings, as found in a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellingDictionaryOptions {
    /// Pairs of `[from, to]` applied to words before lookup.
    /// `from` may list alternatives separated by `|` and may be anchored
    /// with `^` or `$`.
    pub rep_map: Vec<(String, String)>,
    pub case_sensitive: Option<bool>,
    /// Words in this dictionary are valid but never suggested.
    pub no_suggest: bool,
    pub use_compounds: Option<UseCompounds>,
    /// Treat forbidden entries as unknown instead.
    pub ignore_forbidden_words: bool,
    pub dictionary_information: Option<DictionaryInformation>,
    /// Also store case and accent insensitive forms of the words.
    /// Defaults to true.
    pub support_non_strict_searches: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryInformation {
    /// Characters to drop from words before lookup, for example
    /// `"\u{300}-\u{362}"` to ignore combining accents.
    pub ignore: Option<String>,
    pub suggestion_edit_costs: Vec<EditCostDef>,
}

/// Custom edit costs for groups of related characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditCostDef {
    /// Groups of related characters, separated by `|`.
    pub map: String,
    pub replace: Option<u32>,
    pub ins_del: Option<u32>,
    pub swap: Option<u32>,
}
