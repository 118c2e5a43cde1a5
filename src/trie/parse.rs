#![allow(non_upper_case_globals)]

//! Turns word list lines into trie entries.

use bitflags::bitflags;
use itertools::Itertools;

use crate::forms::strip_accents;
use crate::trie::{
    Trie, CASE_INSENSITIVE_PREFIX, FORBID_PREFIX, KEEP_EXACT_PREFIX,
    OPTIONAL_COMPOUND_FIX,
};
use crate::typos::parse_entry;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LineFlags: u8 {
        /// `!word`: the word must be flagged.
        const Forbidden = 0x01;
        /// `~word`: already a case insensitive form.
        const CaseInsensitive = 0x02;
        /// `=word`: do not add case and accent insensitive forms.
        const KeepExact = 0x04;
        /// `*word`: may also end a compound.
        const OptionalCompoundEnd = 0x08;
        /// `word*`: may also start a compound.
        const OptionalCompoundBegin = 0x10;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Add `~` forms for the lowercase and accent-free spellings.
    pub strip_case_and_accents: bool,
    /// Flip the forbidden marker on every entry.
    pub make_words_forbidden: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strip_case_and_accents: true,
            make_words_forbidden: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDictionary {
    /// Trie entries with their markers.
    pub words: Vec<String>,
    /// `word: suggestion` lines.
    pub preferred: Vec<(String, Vec<String>)>,
}

fn split_flags(mut word: &str) -> (LineFlags, &str) {
    let mut flags = LineFlags::empty();
    loop {
        if let Some(rest) = word.strip_prefix(FORBID_PREFIX) {
            flags.toggle(LineFlags::Forbidden);
            word = rest;
        } else if let Some(rest) = word.strip_prefix(CASE_INSENSITIVE_PREFIX) {
            flags |= LineFlags::CaseInsensitive;
            word = rest;
        } else if let Some(rest) = word.strip_prefix(KEEP_EXACT_PREFIX) {
            flags |= LineFlags::KeepExact;
            word = rest;
        } else {
            break;
        }
    }
    if let Some(rest) = word.strip_prefix(OPTIONAL_COMPOUND_FIX) {
        flags |= LineFlags::OptionalCompoundEnd;
        word = rest;
    }
    if let Some(rest) = word.strip_suffix(OPTIONAL_COMPOUND_FIX) {
        flags |= LineFlags::OptionalCompoundBegin;
        word = rest;
    }
    (flags, word)
}

/// `*` expands to both the bare word and the `+` compound form.
fn expand_compounds(word: &str, flags: LineFlags) -> Vec<String> {
    let heads: &[&str] = if flags.contains(LineFlags::OptionalCompoundEnd) {
        &["", "+"]
    } else {
        &[""]
    };
    let tails: &[&str] = if flags.contains(LineFlags::OptionalCompoundBegin) {
        &["", "+"]
    } else {
        &[""]
    };
    heads
        .iter()
        .cartesian_product(tails)
        .map(|(head, tail)| format!("{head}{word}{tail}"))
        .collect()
}

fn parse_line(line: &str, options: &ParseOptions, parsed: &mut ParsedDictionary) {
    let Some(entry) = parse_entry(line) else {
        return;
    };
    if !entry.suggestions.is_empty() {
        let suggestions = entry.suggestions.iter().map(|s| s.to_string()).collect();
        parsed.preferred.push((entry.key.to_string(), suggestions));
        return;
    }
    let (mut flags, word) = split_flags(entry.key);
    if word.is_empty() {
        return;
    }
    if options.make_words_forbidden {
        flags.toggle(LineFlags::Forbidden);
    }

    let mut prefix = String::new();
    if flags.contains(LineFlags::Forbidden) {
        prefix.push(FORBID_PREFIX);
    }
    if flags.contains(LineFlags::CaseInsensitive) {
        prefix.push(CASE_INSENSITIVE_PREFIX);
    }
    let variants = expand_compounds(word, flags);
    for variant in &variants {
        parsed.words.push(format!("{prefix}{variant}"));
    }

    let plain = LineFlags::Forbidden | LineFlags::CaseInsensitive | LineFlags::KeepExact;
    if options.strip_case_and_accents && !flags.intersects(plain) {
        for variant in &variants {
            let lc = variant.to_lowercase();
            let stripped = strip_accents(&lc);
            for form in [lc, stripped] {
                if form != *variant {
                    parsed.words.push(format!("{CASE_INSENSITIVE_PREFIX}{form}"));
                }
            }
        }
    }
}

/// Parse word list lines. `#` starts a comment and `word: suggestion`
/// lines record preferred suggestions instead of words.
pub fn parse_dictionary_lines<S: AsRef<str>>(
    lines: &[S],
    options: &ParseOptions,
) -> ParsedDictionary {
    let mut parsed = ParsedDictionary::default();
    for line in lines {
        parse_line(line.as_ref(), options, &mut parsed);
    }
    parsed.words = parsed.words.into_iter().unique().collect();
    parsed
}

/// Parse word list lines straight into a trie.
pub fn parse_dictionary<S: AsRef<str>>(lines: &[S], options: &ParseOptions) -> Trie {
    Trie::from_parsed(parse_dictionary_lines(lines, options))
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(lines: &[&str], options: ParseOptions) -> Vec<String> {
        parse_dictionary_lines(lines, &options).words
    }

    #[test]
    fn test_strip_case_and_accents() {
        assert_eq!(
            vec!["Köln", "~köln", "~koln"],
            words(&["Köln"], ParseOptions::default())
        );
        assert_eq!(vec!["apple"], words(&["apple"], ParseOptions::default()));
        assert_eq!(vec!["Paris"], words(&["=Paris"], ParseOptions::default()));
    }

    #[test]
    fn test_markers() {
        let opts = ParseOptions {
            strip_case_and_accents: false,
            ..Default::default()
        };
        assert_eq!(vec!["!Pink"], words(&["!Pink"], opts));
        assert_eq!(vec!["~pink"], words(&["~pink"], opts));
        assert_eq!(vec!["red", "red+"], words(&["red*"], opts));
        assert_eq!(vec!["berry", "+berry"], words(&["*berry"], opts));
        assert_eq!(
            vec!["berry", "berry+", "+berry", "+berry+"],
            words(&["*berry*"], opts)
        );
    }

    #[test]
    fn test_make_words_forbidden() {
        let opts = ParseOptions {
            strip_case_and_accents: false,
            make_words_forbidden: true,
        };
        assert_eq!(vec!["!pink", "ok"], words(&["pink", "!ok"], opts));
    }

    #[test]
    fn test_comments_and_suggestions() {
        let parsed = parse_dictionary_lines(
            &["# header", "apple # fruit", "", "teh: the"],
            &ParseOptions::default(),
        );
        assert_eq!(vec!["apple"], parsed.words);
        assert_eq!(
            vec![("teh".to_string(), vec!["the".to_string()])],
            parsed.preferred
        );
    }

    #[test]
    fn test_parse_dictionary() {
        let trie = parse_dictionary(&["Köln", "teh: the"], &ParseOptions::default());
        assert!(trie.has("Köln"));
        assert!(trie.has("~koln"));
        assert!(!trie.has("teh"));
        assert_eq!(&["the"], trie.preferred_suggestions("teh"));
    }
}
