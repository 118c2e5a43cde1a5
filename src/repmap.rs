//! Character replacement maps applied to words before they are looked up.

use itertools::Itertools;

use crate::options::SpellingDictionaryOptions;

/// `remap` gives up on producing more variants past this many.
const MAX_REMAP_VARIANTS: usize = 64;

#[derive(Clone, Debug, Default)]
struct Rep {
    anchor_begin: bool,
    anchor_end: bool,
    from: String,
    to: String,
}

impl Rep {
    fn matches(&self, word: &str, at_start: bool) -> bool {
        if self.anchor_begin && !at_start {
            false
        } else if self.anchor_end {
            word == self.from
        } else {
            word.starts_with(&self.from)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RepMap {
    reps: Vec<Rep>,
}

impl RepMap {
    /// Build the map from the `repMap` pairs and the characters listed in
    /// `dictionaryInformation.ignore`, which map to nothing.
    pub fn from_options(options: &SpellingDictionaryOptions) -> Self {
        let mut map = RepMap::default();
        for (from, to) in &options.rep_map {
            for alternative in from.split('|') {
                map.push(alternative, to);
            }
        }
        let ignore = options
            .dictionary_information
            .as_ref()
            .and_then(|info| info.ignore.as_deref());
        if let Some(ignore) = ignore {
            for c in expand_character_set(ignore) {
                map.push(c.encode_utf8(&mut [0; 4]), "");
            }
        }
        map
    }

    pub fn push(&mut self, from: &str, to: &str) {
        let mut rep = Rep::default();
        let mut from = from;
        if let Some(rest) = from.strip_prefix('^') {
            from = rest;
            rep.anchor_begin = true;
        }
        if let Some(rest) = from.strip_suffix('$') {
            from = rest;
            rep.anchor_end = true;
        }
        if from.is_empty() {
            return;
        }
        rep.from = from.to_string();
        rep.to = to.to_string();
        self.reps.push(rep);
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    fn longest_match(&self, word: &str, at_start: bool) -> Option<&Rep> {
        let mut longest_len = 0;
        let mut longest_rep: Option<&Rep> = None;
        for rep in self.reps.iter() {
            if rep.from.len() > longest_len && rep.matches(word, at_start) {
                longest_len = rep.from.len();
                longest_rep = Some(rep);
            }
        }
        longest_rep
    }

    /// Apply the replacements left to right, preferring the longest match.
    pub fn map(&self, word: &str) -> String {
        if self.reps.is_empty() {
            return word.to_string();
        }
        let mut output = String::new();
        let mut skip_to = 0;
        for (i, c) in word.char_indices() {
            if i < skip_to {
                continue;
            }
            if let Some(rep) = self.longest_match(&word[i..], i == 0) {
                output += &rep.to;
                skip_to = i + rep.from.len();
            } else {
                output.push(c);
            }
        }
        output
    }

    /// Every combination of applying or skipping each possible replacement.
    /// The unchanged word comes first.
    pub fn remap(&self, word: &str) -> Vec<String> {
        if self.reps.is_empty() {
            return vec![word.to_string()];
        }
        // edits[i] lists (end, replacement) for text starting at byte i
        let mut edits: Vec<Vec<(usize, &str)>> = vec![Vec::new(); word.len() + 1];
        for (i, c) in word.char_indices() {
            let end = i + c.len_utf8();
            edits[i].push((end, &word[i..end]));
            for rep in self.reps.iter() {
                if rep.matches(&word[i..], i == 0) {
                    edits[i].push((i + rep.from.len(), rep.to.as_str()));
                }
            }
        }

        let mut tails: Vec<Vec<String>> = vec![Vec::new(); word.len() + 1];
        tails[word.len()].push(String::new());
        for (i, _) in word.char_indices().rev() {
            let mut variants = Vec::new();
            'edits: for &(end, replacement) in &edits[i] {
                for tail in &tails[end] {
                    if variants.len() >= MAX_REMAP_VARIANTS {
                        break 'edits;
                    }
                    variants.push(format!("{replacement}{tail}"));
                }
            }
            tails[i] = variants;
        }
        tails.swap_remove(0).into_iter().unique().collect()
    }
}

/// Expand a character set such as `a-z` or `\u{300}-\u{362}xy` into its
/// characters. A `-` at either end stands for itself.
pub fn expand_character_set(set: &str) -> Vec<char> {
    let chars: Vec<char> = set.chars().collect();
    let mut result = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (lo, hi) = (chars[i], chars[i + 2]);
            if lo <= hi {
                result.extend(lo..=hi);
            }
            i += 3;
        } else {
            if chars[i] != '|' {
                result.push(chars[i]);
            }
            i += 1;
        }
    }
    result.into_iter().unique().collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::DictionaryInformation;

    fn rep_map(pairs: &[(&str, &str)]) -> RepMap {
        let options = SpellingDictionaryOptions {
            rep_map: pairs
                .iter()
                .map(|(f, t)| (f.to_string(), t.to_string()))
                .collect(),
            ..Default::default()
        };
        RepMap::from_options(&options)
    }

    #[test]
    fn test_map_longest_match() {
        let map = rep_map(&[("a", "b"), ("ae", "ä")]);
        assert_eq!("bäb", map.map("aaea"));
    }

    #[test]
    fn test_map_anchors() {
        let map = rep_map(&[("^x", "ks"), ("y$", "i")]);
        assert_eq!("ksaxi", map.map("xaxy"));
    }

    #[test]
    fn test_map_alternatives() {
        let map = rep_map(&[("’|‘", "'")]);
        assert_eq!("don't", map.map("don’t"));
        assert_eq!("'tis", map.map("‘tis"));
    }

    #[test]
    fn test_remap_all_variants() {
        let map = rep_map(&[("ae", "ä")]);
        assert_eq!(vec!["aeae", "aeä", "äae", "ää"], map.remap("aeae"));
        assert_eq!(vec!["word"], map.remap("word"));
    }

    #[test]
    fn test_ignore_characters() {
        let options = SpellingDictionaryOptions {
            dictionary_information: Some(DictionaryInformation {
                ignore: Some("\u{300}-\u{36f}".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let map = RepMap::from_options(&options);
        assert_eq!("Koln", map.map("Ko\u{308}ln"));
    }

    #[test]
    fn test_expand_character_set() {
        assert_eq!(vec!['a', 'b', 'c', 'x'], expand_character_set("a-cx"));
        assert_eq!(vec!['-', 'a'], expand_character_set("-a"));
        assert_eq!(vec!['a', '-'], expand_character_set("a-"));
    }
}
