//! Gathering and ranking suggestion candidates.

use fnv::FnvHashMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::options::DEFAULT_NUM_SUGGESTIONS;
use crate::trie::{WeightMap, JOIN_SEPARATOR, WORD_SEPARATOR};

/// The cost of one ordinary edit.
pub const BASE_COST: u32 = 100;
pub const MAX_NUM_CHANGES: usize = 5;
/// Milliseconds.
pub const DEFAULT_COLLECTOR_TIMEOUT: u64 = 1000;

const MAX_COST_SCALE: f64 = 0.5;
const MAX_ALLOWED_COST_SCALE: f64 = 1.03 * MAX_COST_SCALE;
/// Extra cost for very short suggestions, indexed by length.
const WORD_LENGTH_COST: [u32; 5] = [0, 50, 25, 5, 0];
/// Extra cost for each word beyond the first in a compound suggestion.
const EXTRA_WORD_COST: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub word: String,
    pub cost: u32,
    pub is_preferred: bool,
}

impl SuggestionResult {
    pub fn new(word: impl Into<String>, cost: u32) -> Self {
        SuggestionResult {
            word: word.into(),
            cost,
            is_preferred: false,
        }
    }

    pub fn preferred(word: impl Into<String>, cost: u32) -> Self {
        SuggestionResult {
            word: word.into(),
            cost,
            is_preferred: true,
        }
    }
}

fn char_len(word: &str) -> usize {
    word.chars().count()
}

/// Lower cost first, then shorter words, then alphabetical.
pub fn compare_results(a: &SuggestionResult, b: &SuggestionResult) -> Ordering {
    a.cost
        .cmp(&b.cost)
        .then_with(|| char_len(&a.word).cmp(&char_len(&b.word)))
        .then_with(|| a.word.cmp(&b.word))
}

/// Something that accepts suggestion candidates for one word.
pub trait Collector {
    /// The word to find suggestions for.
    fn word(&self) -> &str;
    fn add(&mut self, suggestion: SuggestionResult);
    /// Candidates costing more than this will be rejected. May shrink as
    /// better candidates arrive.
    fn max_cost(&self) -> u32;
    fn max_num_suggestions(&self) -> usize;
    fn ignore_case(&self) -> bool;
    fn weight_map(&self) -> Option<&WeightMap>;
    fn timed_out(&self) -> bool;
}

pub type SuggestionFilter<'a> = Box<dyn Fn(&str, u32) -> bool + Send + Sync + 'a>;

pub struct CollectorOptions<'a> {
    pub num_suggestions: usize,
    pub change_limit: usize,
    pub include_ties: bool,
    pub ignore_case: bool,
    /// Milliseconds.
    pub timeout: u64,
    pub filter: Option<SuggestionFilter<'a>>,
    pub weight_map: Option<Arc<WeightMap>>,
}

impl Default for CollectorOptions<'_> {
    fn default() -> Self {
        CollectorOptions {
            num_suggestions: DEFAULT_NUM_SUGGESTIONS,
            change_limit: MAX_NUM_CHANGES,
            include_ties: false,
            ignore_case: true,
            timeout: DEFAULT_COLLECTOR_TIMEOUT,
            filter: None,
            weight_map: None,
        }
    }
}

impl fmt::Debug for CollectorOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorOptions")
            .field("num_suggestions", &self.num_suggestions)
            .field("change_limit", &self.change_limit)
            .field("include_ties", &self.include_ties)
            .field("ignore_case", &self.ignore_case)
            .field("timeout", &self.timeout)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

/// Keeps the best suggestions seen so far, deduplicated by word.
pub struct SuggestionCollector<'a> {
    word: String,
    num_suggestions: usize,
    include_ties: bool,
    ignore_case: bool,
    max_cost: u32,
    deadline: Instant,
    filter: Option<SuggestionFilter<'a>>,
    weight_map: Option<Arc<WeightMap>>,
    suggs: FnvHashMap<String, SuggestionResult>,
}

impl<'a> SuggestionCollector<'a> {
    pub fn new(word: &str, options: CollectorOptions<'a>) -> Self {
        let change_limit = options.change_limit.min(MAX_NUM_CHANGES) as f64;
        let scaled_len = char_len(word) as f64 * MAX_ALLOWED_COST_SCALE;
        let max_cost = (BASE_COST as f64 * scaled_len.min(change_limit)) as u32;
        SuggestionCollector {
            word: word.to_string(),
            num_suggestions: options.num_suggestions,
            include_ties: options.include_ties,
            ignore_case: options.ignore_case,
            max_cost,
            deadline: Instant::now() + Duration::from_millis(options.timeout),
            filter: options.filter,
            weight_map: options.weight_map,
            suggs: FnvHashMap::default(),
        }
    }

    /// Multi-word suggestions and very short words cost a little extra.
    fn adjusted_cost(&self, suggestion: &SuggestionResult) -> u32 {
        if suggestion.is_preferred {
            return suggestion.cost;
        }
        let words: Vec<&str> = suggestion
            .word
            .split([JOIN_SEPARATOR, WORD_SEPARATOR])
            .filter(|w| !w.is_empty())
            .collect();
        let length_cost: u32 = words
            .iter()
            .map(|w| WORD_LENGTH_COST.get(char_len(w)).copied().unwrap_or(0))
            .sum();
        let extra_words = words.len().saturating_sub(1) as u32;
        suggestion.cost + length_cost + extra_words * EXTRA_WORD_COST
    }

    fn sorted(&self) -> Vec<SuggestionResult> {
        let mut suggs: Vec<SuggestionResult> = self.suggs.values().cloned().collect();
        suggs.sort_by(compare_results);
        suggs
    }

    /// Lower `max_cost` to the cost of the last wanted suggestion and drop
    /// everything more expensive.
    fn drop_max(&mut self) {
        if self.num_suggestions == 0 {
            self.suggs.clear();
            return;
        }
        let sorted = self.sorted();
        let Some(last) = sorted.get(self.num_suggestions - 1) else {
            return;
        };
        let max_cost = last.cost;
        self.max_cost = max_cost;
        for sugg in sorted.iter().filter(|s| s.cost > max_cost) {
            self.suggs.remove(&sugg.word);
        }
    }

    /// The collected suggestions, best first.
    pub fn suggestions(&self) -> Vec<SuggestionResult> {
        let mut sorted = self.sorted();
        if self.num_suggestions == 0 {
            return Vec::new();
        }
        if sorted.len() > self.num_suggestions {
            let limit = sorted[self.num_suggestions - 1].cost;
            if self.include_ties {
                sorted.retain(|s| s.cost <= limit);
            } else {
                sorted.truncate(self.num_suggestions);
            }
        }
        sorted
    }
}

impl Collector for SuggestionCollector<'_> {
    fn word(&self) -> &str {
        &self.word
    }

    fn add(&mut self, suggestion: SuggestionResult) {
        let cost = self.adjusted_cost(&suggestion);
        if cost > self.max_cost {
            return;
        }
        if let Some(filter) = &self.filter {
            if !filter(&suggestion.word, cost) {
                return;
            }
        }
        if let Some(known) = self.suggs.get_mut(&suggestion.word) {
            known.cost = known.cost.min(cost);
            known.is_preferred |= suggestion.is_preferred;
            return;
        }
        let is_preferred = suggestion.is_preferred;
        self.suggs.insert(
            suggestion.word.clone(),
            SuggestionResult {
                word: suggestion.word,
                cost,
                is_preferred,
            },
        );
        if self.suggs.len() > self.num_suggestions {
            self.drop_max();
        }
    }

    fn max_cost(&self) -> u32 {
        self.max_cost
    }

    fn max_num_suggestions(&self) -> usize {
        self.num_suggestions
    }

    fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    fn weight_map(&self) -> Option<&WeightMap> {
        self.weight_map.as_deref()
    }

    fn timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl fmt::Debug for SuggestionCollector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionCollector")
            .field("word", &self.word)
            .field("max_cost", &self.max_cost)
            .field("suggs", &self.suggs.len())
            .finish()
    }
}

/// A view of a collector that asks about a different word but stores
/// into the same results.
#[derive(Debug)]
pub struct Impersonated<'c, C: ?Sized> {
    inner: &'c mut C,
    word: String,
}

pub fn impersonate<'c, C: Collector + ?Sized>(
    collector: &'c mut C,
    word: &str,
) -> Impersonated<'c, C> {
    Impersonated {
        inner: collector,
        word: word.to_string(),
    }
}

impl<C: Collector + ?Sized> Collector for Impersonated<'_, C> {
    fn word(&self) -> &str {
        &self.word
    }

    fn add(&mut self, suggestion: SuggestionResult) {
        self.inner.add(suggestion);
    }

    fn max_cost(&self) -> u32 {
        self.inner.max_cost()
    }

    fn max_num_suggestions(&self) -> usize {
        self.inner.max_num_suggestions()
    }

    fn ignore_case(&self) -> bool {
        self.inner.ignore_case()
    }

    fn weight_map(&self) -> Option<&WeightMap> {
        self.inner.weight_map()
    }

    fn timed_out(&self) -> bool {
        self.inner.timed_out()
    }
}
