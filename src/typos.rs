//! Typo tables: known misspellings and their corrections.
//!
//! In text form every line holds one entry:
//!
//! ```text
//! # comment
//! wont: won't, will not
//! teh -> the
//! badword
//! !okayword
//! ```
//!
//! A key without suggestions is forbidden outright. A key starting with `!`
//! is an allowed word that must never be suggested.

use fnv::FnvHashMap;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till};
use nom::character::complete::{anychar, char};
use nom::combinator::{all_consuming, map, not, opt, recognize};
use nom::multi::{many1_count, separated_list0};
use nom::sequence::{pair, preceded};
use nom::{Finish, IResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::hash::{Hash, Hasher};

use crate::error::{Result, TyposError};

type Input<'a> = &'a str;

/// Marks a typo key as an allowed word that is never suggested.
pub const NO_SUGGEST_PREFIX: char = '!';

/// One parsed line of a typos list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypoEntry<'a> {
    pub key: &'a str,
    pub suggestions: Vec<&'a str>,
}

fn separator(input: Input) -> IResult<Input, Input> {
    alt((tag("->"), tag(":")))(input)
}

fn key(input: Input) -> IResult<Input, Input> {
    recognize(many1_count(preceded(not(separator), anychar)))(input)
}

fn suggestion_list(input: Input) -> IResult<Input, Vec<Input>> {
    separated_list0(char(','), take_till(|c| c == ','))(input)
}

fn typo_entry(input: Input) -> IResult<Input, (Input, Option<Vec<Input>>)> {
    pair(key, opt(preceded(separator, suggestion_list)))(input)
}

/// Parse `key`, `key: a, b` or `key -> a, b`, ignoring `#` comments.
/// Returns `None` for blank lines and lines without a key.
pub fn parse_entry(line: &str) -> Option<TypoEntry<'_>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return None;
    }
    let parsed = map(all_consuming(typo_entry), |(key, suggestions)| TypoEntry {
        key: key.trim(),
        suggestions: suggestions
            .unwrap_or_default()
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
    })(line)
    .finish();
    match parsed {
        Ok((_, entry)) if !entry.key.is_empty() => Some(entry),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypoValue {
    NoSuggestions,
    Preferred(String),
    Suggestions(Vec<String>),
}

impl TypoValue {
    pub fn from_suggestions(mut suggestions: Vec<String>) -> Self {
        match suggestions.len() {
            0 => TypoValue::NoSuggestions,
            1 => TypoValue::Preferred(suggestions.remove(0)),
            _ => TypoValue::Suggestions(suggestions),
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            TypoValue::NoSuggestions => &[],
            TypoValue::Preferred(s) => std::slice::from_ref(s),
            TypoValue::Suggestions(v) => v,
        }
    }

    fn merge(&mut self, other: TypoValue) {
        let mut merged = self.suggestions().to_vec();
        for s in other.suggestions() {
            if !merged.contains(s) {
                merged.push(s.clone());
            }
        }
        *self = TypoValue::from_suggestions(merged);
    }
}

/// An ordered map from typo keys to their suggestions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TyposDef {
    entries: Vec<(String, TypoValue)>,
    index: FnvHashMap<String, usize>,
}

impl TyposDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Suggestions for a repeated key are merged.
    pub fn insert(&mut self, key: impl Into<String>, value: TypoValue) {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1.merge(value);
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    pub fn insert_line(&mut self, line: &str) {
        if let Some(entry) = parse_entry(line) {
            let suggestions = entry.suggestions.iter().map(|s| s.to_string()).collect();
            self.insert(entry.key, TypoValue::from_suggestions(suggestions));
        }
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut def = TyposDef::new();
        for line in lines {
            def.insert_line(line.as_ref());
        }
        def
    }

    /// Accepts an object mapping keys to `null`, `false`, a string or a
    /// list of strings; a list of such objects or of text lines; or a
    /// single string of text lines.
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut def = TyposDef::new();
        def.merge_json(value)?;
        Ok(def)
    }

    fn merge_json(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(TyposError::EmptyKey);
                    }
                    self.insert(key, typo_value_from_json(key, value)?);
                }
            }
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(line) => self.insert_line(line),
                        Value::Object(_) => self.merge_json(item)?,
                        other => {
                            return Err(TyposError::InvalidDefinition(json_type(other)))
                        }
                    }
                }
            }
            Value::String(text) => {
                for line in text.lines() {
                    self.insert_line(line);
                }
            }
            other => return Err(TyposError::InvalidDefinition(json_type(other))),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TypoValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys marked with `!`, without the marker.
    pub fn no_suggest_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|(k, _)| k.strip_prefix(NO_SUGGEST_PREFIX))
    }

    pub fn all_suggestions(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, v)| v.suggestions())
            .map(String::as_str)
    }
}

impl Hash for TyposDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl<'de> Deserialize<'de> for TyposDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TyposDef::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn typo_value_from_json(key: &str, value: &Value) -> Result<TypoValue> {
    match value {
        Value::Null | Value::Bool(false) => Ok(TypoValue::NoSuggestions),
        Value::String(s) => Ok(TypoValue::from_suggestions(
            Some(s.trim().to_string()).filter(|s| !s.is_empty()).into_iter().collect(),
        )),
        Value::Array(items) => {
            let mut suggestions = Vec::new();
            for item in items {
                match item {
                    Value::String(s) if !s.trim().is_empty() => {
                        suggestions.push(s.trim().to_string())
                    }
                    Value::String(_) => (),
                    Value::Array(_) => {
                        return Err(TyposError::NestedList { key: key.to_string() })
                    }
                    other => {
                        return Err(TyposError::InvalidSuggestion {
                            key: key.to_string(),
                            found: json_type(other),
                        })
                    }
                }
            }
            Ok(TypoValue::from_suggestions(suggestions))
        }
        other => Err(TyposError::InvalidSuggestion {
            key: key.to_string(),
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
