//! A prefix tree of dictionary entries.
//!
//! Entries are stored as plain strings in which a few marker characters
//! carry meaning:
//!
//! - `!word` marks `word` as forbidden.
//! - `~word` is a case and accent insensitive form of some entry.
//! - `word+` may start a compound, `+word` may end one, and `+word+` may
//!   appear in the middle.
//!
//! The markers live in separate subtrees of the root, so ordinary lookups
//! never see them unless they ask.

use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

mod collector;
mod parse;
mod suggest;
mod weights;

pub use crate::trie::collector::{
    impersonate, Collector, CollectorOptions, Impersonated, SuggestionCollector,
    SuggestionFilter, SuggestionResult, BASE_COST, DEFAULT_COLLECTOR_TIMEOUT,
    MAX_NUM_CHANGES,
};
pub use crate::trie::parse::{
    parse_dictionary, parse_dictionary_lines, LineFlags, ParseOptions, ParsedDictionary,
};
pub use crate::trie::weights::WeightMap;

pub const FORBID_PREFIX: char = '!';
pub const CASE_INSENSITIVE_PREFIX: char = '~';
pub const COMPOUND_FIX: char = '+';
pub const OPTIONAL_COMPOUND_FIX: char = '*';
pub const KEEP_EXACT_PREFIX: char = '=';
/// Joins the parts of a compound suggestion.
pub const JOIN_SEPARATOR: char = '+';
/// Separates the words of a multi-word suggestion.
pub const WORD_SEPARATOR: char = ' ';

const ROOT: u32 = 0;

type Roots = SmallVec<[u32; 2]>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Node {
    /// Sorted by char.
    children: Vec<(char, u32)>,
    eow: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FindWordOptions {
    /// Only look at exact spellings, not at the `~` forms.
    pub case_sensitive: bool,
    /// Split the word into known words of at least this many chars.
    pub use_legacy_word_compounds: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindFullResult {
    /// The form that matched. Legacy compounds are joined with `+`.
    pub found: Option<String>,
    pub forbidden: bool,
    pub compound_used: bool,
    /// False if the match needed the case insensitive forms.
    pub case_matched: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trie {
    nodes: Vec<Node>,
    num_words: usize,
    has_forbidden: bool,
    is_case_aware: bool,
    preferred: FnvHashMap<String, Vec<String>>,
}

impl Default for Trie {
    fn default() -> Self {
        Trie {
            nodes: vec![Node::default()],
            num_words: 0,
            has_forbidden: false,
            is_case_aware: false,
            preferred: FnvHashMap::default(),
        }
    }
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from entries that already carry their markers.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    pub fn from_parsed(parsed: ParsedDictionary) -> Self {
        let mut trie = Trie::from_words(&parsed.words);
        for (word, suggestions) in parsed.preferred {
            trie.add_preferred_suggestions(&word, suggestions);
        }
        trie
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut node = ROOT;
        for c in word.chars() {
            node = match self.child(node, c) {
                Some(next) => next,
                None => self.add_child(node, c),
            };
        }
        let node = &mut self.nodes[node as usize];
        if !node.eow {
            node.eow = true;
            self.num_words += 1;
        }
        if word.starts_with(FORBID_PREFIX) {
            self.has_forbidden = true;
        } else if word.starts_with(CASE_INSENSITIVE_PREFIX) {
            self.is_case_aware = true;
        }
    }

    fn add_child(&mut self, node: u32, c: char) -> u32 {
        let next = self.nodes.len() as u32;
        self.nodes.push(Node::default());
        let children = &mut self.nodes[node as usize].children;
        let pos = children.partition_point(|&(k, _)| k < c);
        children.insert(pos, (c, next));
        next
    }

    pub fn add_preferred_suggestions(&mut self, word: &str, suggestions: Vec<String>) {
        let entry = self.preferred.entry(word.to_string()).or_default();
        for s in suggestions {
            if !entry.contains(&s) {
                entry.push(s);
            }
        }
    }

    fn child(&self, node: u32, c: char) -> Option<u32> {
        let children = &self.nodes[node as usize].children;
        children
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| children[i].1)
    }

    fn children(&self, node: u32) -> &[(char, u32)] {
        &self.nodes[node as usize].children
    }

    fn is_eow(&self, node: u32) -> bool {
        self.nodes[node as usize].eow
    }

    fn walk(&self, node: u32, chars: impl IntoIterator<Item = char>) -> Option<u32> {
        chars.into_iter().try_fold(node, |n, c| self.child(n, c))
    }

    /// The number of stored entries, markers included.
    pub fn size(&self) -> usize {
        self.num_words
    }

    /// The number of entries outside the `!` and `~` subtrees.
    pub fn count_plain_words(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<u32> = self
            .children(ROOT)
            .iter()
            .filter(|(c, _)| *c != FORBID_PREFIX && *c != CASE_INSENSITIVE_PREFIX)
            .map(|&(_, n)| n)
            .collect();
        while let Some(node) = stack.pop() {
            if self.is_eow(node) {
                count += 1;
            }
            stack.extend(self.children(node).iter().map(|&(_, n)| n));
        }
        count
    }

    pub fn has_forbidden_words(&self) -> bool {
        self.has_forbidden
    }

    /// True if the trie holds case insensitive `~` forms.
    pub fn is_case_aware(&self) -> bool {
        self.is_case_aware
    }

    pub fn has_preferred_suggestions(&self) -> bool {
        !self.preferred.is_empty()
    }

    pub fn preferred_suggestions(&self, word: &str) -> &[String] {
        self.preferred.get(word).map_or(&[], Vec::as_slice)
    }

    pub fn all_preferred_suggestions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.preferred.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Exact membership of the entry, markers and all.
    pub fn has(&self, word: &str) -> bool {
        !word.is_empty() && self.walk(ROOT, word.chars()).is_some_and(|n| self.is_eow(n))
    }

    pub fn is_forbidden_word(&self, word: &str) -> bool {
        self.has_forbidden
            && !word.is_empty()
            && self
                .walk(ROOT, std::iter::once(FORBID_PREFIX).chain(word.chars()))
                .is_some_and(|n| self.is_eow(n))
    }

    /// All entries in the trie, in sorted order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut path = String::new();
        self.collect_words(ROOT, &mut path, &mut words);
        words
    }

    fn collect_words(&self, node: u32, path: &mut String, words: &mut Vec<String>) {
        if self.is_eow(node) {
            words.push(path.clone());
        }
        for &(c, child) in self.children(node) {
            path.push(c);
            self.collect_words(child, path, words);
            path.pop();
        }
    }

    fn roots(&self, case_sensitive: bool) -> Roots {
        let mut roots: Roots = smallvec![ROOT];
        if !case_sensitive {
            if let Some(ci) = self.child(ROOT, CASE_INSENSITIVE_PREFIX) {
                roots.push(ci);
            }
        }
        roots
    }

    pub fn find_word(&self, word: &str, options: &FindWordOptions) -> FindFullResult {
        if word.is_empty() || word.starts_with([FORBID_PREFIX, CASE_INSENSITIVE_PREFIX]) {
            return FindFullResult::default();
        }
        if self.has(word) {
            return FindFullResult {
                found: Some(word.to_string()),
                forbidden: self.is_forbidden_word(word),
                compound_used: false,
                case_matched: true,
            };
        }
        let roots = self.roots(options.case_sensitive);
        let chars: Vec<char> = word.chars().collect();
        if let Some(min_length) = options.use_legacy_word_compounds {
            return self.find_legacy_compound(&chars, &roots, min_length.max(1));
        }
        for (i, &root) in roots.iter().enumerate() {
            if let Some(compound_used) = self.match_compound(&chars, root, &roots) {
                return FindFullResult {
                    found: Some(word.to_string()),
                    forbidden: !compound_used && self.is_forbidden_word(word),
                    compound_used,
                    case_matched: i == 0,
                };
            }
        }
        FindFullResult::default()
    }

    /// Match `chars` starting at `root`. At a node where a compound may
    /// break off (it has an end-of-word `+` child), the rest may continue
    /// from the `+` subtree of any root.
    /// Returns whether a compound break was used.
    ///
    /// The walk keeps its own stack and visits each state once, so long
    /// words cost time linear in the states reached.
    fn match_compound(&self, chars: &[char], root: u32, roots: &[u32]) -> Option<bool> {
        // (node, pos, segment_start)
        let mut stack = vec![(root, 0, 0)];
        let mut seen: FnvHashSet<(u32, usize, bool, bool)> = FnvHashSet::default();
        while let Some((node, pos, segment_start)) = stack.pop() {
            let used = segment_start > 0;
            let may_break = pos > segment_start;
            if !seen.insert((node, pos, may_break, used)) {
                continue;
            }
            if pos == chars.len() {
                if self.is_eow(node) {
                    return Some(used);
                }
                continue;
            }
            // Pushed first so the plain continuation is tried before them.
            if may_break && self.child(node, COMPOUND_FIX).is_some_and(|n| self.is_eow(n)) {
                for &r in roots.iter().rev() {
                    if let Some(joint) = self.child(r, COMPOUND_FIX) {
                        stack.push((joint, pos, pos));
                    }
                }
            }
            if let Some(next) = self.child(node, chars[pos]) {
                stack.push((next, pos + 1, segment_start));
            }
        }
        None
    }

    fn find_legacy_compound(
        &self,
        chars: &[char],
        roots: &[u32],
        min_length: usize,
    ) -> FindFullResult {
        let len = chars.len();
        // split[i] is where the piece starting at i ends, choosing the
        // longest known piece after which the rest still splits.
        let mut split: Vec<Option<usize>> = vec![None; len + 1];
        for start in (0..len).rev() {
            split[start] = self
                .known_piece_ends(chars, start, roots)
                .into_iter()
                .filter(|&end| end - start >= min_length)
                .filter(|&end| end == len || (len - end >= min_length && split[end].is_some()))
                .max();
        }
        let mut found = Vec::new();
        let mut start = 0;
        while start < len {
            let Some(end) = split[start] else {
                return FindFullResult::default();
            };
            found.push(chars[start..end].iter().collect::<String>());
            start = end;
        }
        FindFullResult {
            compound_used: found.len() > 1,
            found: Some(found.join(&JOIN_SEPARATOR.to_string())),
            forbidden: false,
            case_matched: true,
        }
    }

    /// Ends of the known words that start at `chars[start]`.
    fn known_piece_ends(&self, chars: &[char], start: usize, roots: &[u32]) -> Vec<usize> {
        let mut ends = Vec::new();
        for &root in roots {
            let mut node = root;
            for (i, &c) in chars[start..].iter().enumerate() {
                match self.child(node, c) {
                    Some(next) => node = next,
                    None => break,
                }
                if self.is_eow(node) {
                    ends.push(start + i + 1);
                }
            }
        }
        ends
    }
}

impl FindFullResult {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn trie(words: &[&str]) -> Trie {
        Trie::from_words(words)
    }

    #[test]
    fn test_has() {
        let t = trie(&["apple", "ape", "!pink", "~koln"]);
        assert!(t.has("apple"));
        assert!(t.has("ape"));
        assert!(!t.has("ap"));
        assert!(!t.has("pink"));
        assert!(t.has("!pink"));
        assert!(!t.has(""));
        assert_eq!(4, t.size());
        assert_eq!(2, t.count_plain_words());
        assert!(t.has_forbidden_words());
        assert!(t.is_case_aware());
    }

    #[test]
    fn test_words_sorted() {
        let t = trie(&["b", "ab", "a"]);
        assert_eq!(vec!["a", "ab", "b"], t.words());
    }

    #[test]
    fn test_forbidden() {
        let t = trie(&["pink", "!pink", "!stinkbug"]);
        assert!(t.is_forbidden_word("pink"));
        assert!(t.is_forbidden_word("stinkbug"));
        assert!(!t.is_forbidden_word("apple"));
        let r = t.find_word("pink", &FindWordOptions::default());
        assert_eq!(Some("pink".to_string()), r.found);
        assert!(r.forbidden);
    }

    #[test]
    fn test_find_case_insensitive_forms() {
        let t = trie(&["Köln", "~köln", "~koln"]);
        let sensitive = FindWordOptions {
            case_sensitive: true,
            ..Default::default()
        };
        assert!(!t.find_word("koln", &sensitive).is_found());
        let r = t.find_word("koln", &FindWordOptions::default());
        assert_eq!(Some("koln".to_string()), r.found);
        assert!(!r.case_matched);
    }

    #[test]
    fn test_marker_compounds() {
        let t = trie(&["red", "red+", "berry", "+berry", "+berry+", "pie", "+pie"]);
        let opts = FindWordOptions::default();
        let r = t.find_word("redberry", &opts);
        assert_eq!(Some("redberry".to_string()), r.found);
        assert!(r.compound_used);
        assert!(t.find_word("redberrypie", &opts).is_found());
        assert!(!t.find_word("pieberry", &opts).is_found());
        assert!(!t.find_word("berryred", &opts).is_found());
    }

    #[test]
    fn test_long_compound_words() {
        let patterns = ["ab*", "*ab*", "*ab", "a*", "*a*", "*a", "b*", "*b*", "*b"];
        let t = parse_dictionary(&patterns, &ParseOptions::default());
        let opts = FindWordOptions::default();
        let word = "ab".repeat(40);
        assert!(t.find_word(&word, &opts).is_found());
        assert!(!t.find_word(&format!("{word}c"), &opts).is_found());

        let t = parse_dictionary(&["*a*"], &ParseOptions::default());
        let r = t.find_word(&"a".repeat(100_000), &opts);
        assert!(r.is_found());
        assert!(r.compound_used);
        assert!(!t.find_word(&format!("{}b", "a".repeat(100_000)), &opts).is_found());
    }

    #[test]
    fn test_legacy_compounds() {
        let t = trie(&["error", "code", "co"]);
        let opts = FindWordOptions {
            case_sensitive: true,
            use_legacy_word_compounds: Some(3),
        };
        let r = t.find_word("errorcode", &opts);
        assert_eq!(Some("error+code".to_string()), r.found);
        assert!(r.compound_used);
        assert!(!t.find_word("errorco", &opts).is_found());
        let r = t.find_word("code", &opts);
        assert_eq!(Some("code".to_string()), r.found);
        assert!(!r.compound_used);

        let long = "code".repeat(50_000);
        assert!(t.find_word(&long, &opts).is_found());
        assert!(!t.find_word(&format!("{long}x"), &opts).is_found());
    }

    #[test]
    fn test_markers_are_not_words() {
        let t = trie(&["!pink", "~pink"]);
        assert!(!t.find_word("!pink", &FindWordOptions::default()).is_found());
        assert!(!t.find_word("~pink", &FindWordOptions::default()).is_found());
    }

    #[test]
    fn test_json_round_trip_keeps_preferred() {
        let mut t = trie(&["the"]);
        t.add_preferred_suggestions("teh", vec!["the".to_string()]);
        let t2 = Trie::from_json(&t.to_json().unwrap()).unwrap();
        assert!(t2.has("the"));
        assert_eq!(&["the"], t2.preferred_suggestions("teh"));
    }
}
