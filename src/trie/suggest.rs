//! Suggestion search over the trie.
//!
//! This is a depth-first walk that carries one row of a weighted
//! Damerau-Levenshtein table per trie level. A branch is abandoned as soon
//! as every entry in its row exceeds the collector's current `max_cost`,
//! so the walk stays close to the query word. The walk can also step
//! across `+` compound joints for free, and with a compound method it can
//! start over at the root after any complete word.

use log::trace;

use crate::options::CompoundWordsMethod;
use crate::trie::{
    Collector, Roots, SuggestionResult, Trie, WeightMap, CASE_INSENSITIVE_PREFIX,
    COMPOUND_FIX, FORBID_PREFIX,
};

/// Check the collector's clock after visiting this many nodes.
const TIMEOUT_CHECK_INTERVAL: usize = 256;
/// Multi-word suggestions hold no more words than this.
const MAX_WORDS_IN_SUGGESTION: usize = 3;

struct Walk<'t, 'c> {
    trie: &'t Trie,
    query: Vec<char>,
    collector: &'c mut dyn Collector,
    weights: WeightMap,
    separator: Option<char>,
    roots: Roots,
    path: String,
    visited: usize,
    stopped: bool,
}

impl Trie {
    /// Feed words close to `collector.word()` into the collector.
    pub fn gen_suggestions(&self, collector: &mut dyn Collector, method: CompoundWordsMethod) {
        let query: Vec<char> = collector.word().chars().collect();
        if query.is_empty() {
            return;
        }
        let weights = collector.weight_map().cloned().unwrap_or_default();
        let roots = self.roots(!collector.ignore_case());
        let mut walk = Walk {
            trie: self,
            query,
            collector,
            weights,
            separator: method.separator(),
            roots,
            path: String::new(),
            visited: 0,
            stopped: false,
        };
        let first_row: Vec<u32> = walk.initial_row();
        for root in walk.roots.clone() {
            walk.visit(root, &first_row, None, 1);
        }
        trace!("suggestion walk visited {} nodes", walk.visited);
    }
}

impl Walk<'_, '_> {
    fn initial_row(&self) -> Vec<u32> {
        let mut row = Vec::with_capacity(self.query.len() + 1);
        row.push(0);
        for (j, &q) in self.query.iter().enumerate() {
            row.push(row[j] + self.weights.ins_del_cost(q));
        }
        row
    }

    fn next_row(&self, row: &[u32], parent: Option<(&[u32], char)>, c: char) -> Vec<u32> {
        let w = &self.weights;
        let mut next = Vec::with_capacity(row.len());
        next.push(row[0] + w.ins_del_cost(c));
        for j in 1..row.len() {
            let q = self.query[j - 1];
            let insert = row[j] + w.ins_del_cost(c);
            let delete = next[j - 1] + w.ins_del_cost(q);
            let replace = row[j - 1] + w.replace_cost(q, c);
            let mut best = insert.min(delete).min(replace);
            if j > 1 {
                if let Some((grandparent, pc)) = parent {
                    if q == pc && self.query[j - 2] == c && pc != c {
                        best = best.min(grandparent[j - 2] + w.swap_cost(pc, c));
                    }
                }
            }
            next.push(best);
        }
        next
    }

    fn is_root(&self, node: u32) -> bool {
        self.roots.contains(&node)
    }

    /// `row` is the table row for `self.path`. `parent` is the row before
    /// the last char of the path, along with that char.
    fn visit(&mut self, node: u32, row: &[u32], parent: Option<(&[u32], char)>, words: usize) {
        if self.stopped {
            return;
        }
        self.visited += 1;
        if self.visited % TIMEOUT_CHECK_INTERVAL == 0 && self.collector.timed_out() {
            self.stopped = true;
            return;
        }

        let cost = row[row.len() - 1];
        let is_word = self.trie.is_eow(node) && !self.is_root(node);
        if is_word
            && cost <= self.collector.max_cost()
            && !self.trie.is_forbidden_word(&self.path)
        {
            self.collector.add(SuggestionResult::new(self.path.clone(), cost));
        }
        let min_cost = row.iter().copied().min().unwrap_or(0);
        if min_cost > self.collector.max_cost() {
            return;
        }

        let trie = self.trie;
        let at_root = self.is_root(node);
        for &(c, child) in trie.children(node) {
            if at_root && [FORBID_PREFIX, CASE_INSENSITIVE_PREFIX, COMPOUND_FIX].contains(&c) {
                continue;
            }
            if c == COMPOUND_FIX {
                if trie.is_eow(child) && words < MAX_WORDS_IN_SUGGESTION {
                    self.cross_joint(row, parent, words);
                }
                continue;
            }
            let next = self.next_row(row, parent, c);
            self.path.push(c);
            self.visit(child, &next, Some((row, c)), words);
            self.path.pop();
        }

        if let Some(separator) = self.separator {
            if is_word && words < MAX_WORDS_IN_SUGGESTION {
                self.path.push(separator);
                for root in self.roots.clone() {
                    self.visit(root, row, None, words + 1);
                }
                self.path.pop();
            }
        }
    }

    /// Continue from the `+` subtree of each root without consuming input.
    fn cross_joint(&mut self, row: &[u32], parent: Option<(&[u32], char)>, words: usize) {
        for root in self.roots.clone() {
            if let Some(joint) = self.trie.child(root, COMPOUND_FIX) {
                self.visit(joint, row, parent, words + 1);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trie::{CollectorOptions, SuggestionCollector};

    fn suggest(trie: &Trie, word: &str, method: CompoundWordsMethod) -> Vec<(String, u32)> {
        let mut collector = SuggestionCollector::new(word, CollectorOptions::default());
        trie.gen_suggestions(&mut collector, method);
        collector
            .suggestions()
            .into_iter()
            .map(|s| (s.word, s.cost))
            .collect()
    }

    fn words(suggs: &[(String, u32)]) -> Vec<&str> {
        suggs.iter().map(|(w, _)| w.as_str()).collect()
    }

    #[test]
    fn test_single_edits() {
        let t = Trie::from_words(["mango", "tangle", "apple"]);
        let suggs = suggest(&t, "tango", CompoundWordsMethod::None);
        assert_eq!(("mango".to_string(), 100), suggs[0]);
        assert!(!words(&suggs).contains(&"apple"));
    }

    #[test]
    fn test_swap() {
        let t = Trie::from_words(["the"]);
        assert_eq!(vec![("the".to_string(), 105)], suggest(&t, "teh", CompoundWordsMethod::None));
    }

    #[test]
    fn test_exact_word_costs_nothing() {
        let t = Trie::from_words(["apple"]);
        assert_eq!(vec![("apple".to_string(), 0)], suggest(&t, "apple", CompoundWordsMethod::None));
    }

    #[test]
    fn test_skips_markers() {
        let t = Trie::from_words(["!mangos", "~mango", "Mango"]);
        let suggs = suggest(&t, "mangos", CompoundWordsMethod::None);
        assert_eq!(vec!["mango", "Mango"], words(&suggs));
        let mut collector = SuggestionCollector::new(
            "mangos",
            CollectorOptions {
                ignore_case: false,
                ..Default::default()
            },
        );
        t.gen_suggestions(&mut collector, CompoundWordsMethod::None);
        assert_eq!(1, collector.suggestions().len());
    }

    #[test]
    fn test_forbidden_not_suggested() {
        let t = Trie::from_words(["pink", "!pink", "pinky"]);
        assert_eq!(vec!["pinky"], words(&suggest(&t, "pinkk", CompoundWordsMethod::None)));
    }

    #[test]
    fn test_separate_and_join_words() {
        let t = Trie::from_words(["apple", "mango"]);
        let suggs = suggest(&t, "appletango", CompoundWordsMethod::SeparateWords);
        assert!(words(&suggs).contains(&"apple mango"));
        assert!(!words(&suggs).contains(&"apple+mango"));
        let suggs = suggest(&t, "applemango", CompoundWordsMethod::JoinWords);
        assert_eq!("apple+mango", suggs[0].0);
        let suggs = suggest(&t, "applemango", CompoundWordsMethod::None);
        assert!(words(&suggs).iter().all(|w| !w.contains([' ', '+'])));
    }

    #[test]
    fn test_marker_compounds() {
        let t = Trie::from_words(["red", "red+", "berry", "+berry"]);
        let suggs = suggest(&t, "redbery", CompoundWordsMethod::None);
        assert_eq!(("redberry".to_string(), 100), suggs[0]);
    }
}
