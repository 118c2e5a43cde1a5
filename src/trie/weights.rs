//! Edit costs used while walking the trie for suggestions.

use fnv::FnvHashMap;

use crate::options::EditCostDef;
use crate::repmap::expand_character_set;
use crate::trie::BASE_COST;

/// Substituting a letter for another case of itself.
const CASE_CHANGE_COST: u32 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightMap {
    replace: FnvHashMap<(char, char), u32>,
    ins_del: FnvHashMap<char, u32>,
    swap: FnvHashMap<(char, char), u32>,
}

impl WeightMap {
    /// Each definition lists groups of related characters separated by `|`.
    /// Costs apply between characters of the same group.
    pub fn from_edit_costs(defs: &[EditCostDef]) -> Self {
        let mut map = WeightMap::default();
        for def in defs {
            for group in def.map.split('|') {
                let chars = expand_character_set(group);
                for &a in &chars {
                    if let Some(cost) = def.ins_del {
                        map.ins_del.insert(a, cost);
                    }
                    for &b in &chars {
                        if a == b {
                            continue;
                        }
                        if let Some(cost) = def.replace {
                            map.replace.insert((a, b), cost);
                        }
                        if let Some(cost) = def.swap {
                            map.swap.insert((a, b), cost);
                        }
                    }
                }
            }
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.replace.is_empty() && self.ins_del.is_empty() && self.swap.is_empty()
    }

    pub fn replace_cost(&self, from: char, to: char) -> u32 {
        if from == to {
            return 0;
        }
        if let Some(&cost) = self.replace.get(&(from, to)) {
            return cost;
        }
        if from.to_lowercase().eq(to.to_lowercase()) {
            CASE_CHANGE_COST
        } else {
            BASE_COST
        }
    }

    pub fn ins_del_cost(&self, c: char) -> u32 {
        self.ins_del.get(&c).copied().unwrap_or(BASE_COST)
    }

    pub fn swap_cost(&self, a: char, b: char) -> u32 {
        self.swap.get(&(a, b)).copied().unwrap_or(BASE_COST)
    }
}
