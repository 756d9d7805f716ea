//! Grouping of tracked casinos by state.

use std::collections::HashMap;

use crate::model::CurrentCasino;

/// Key used for casinos with no (or an unnamed) state reference.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Casinos grouped by state name.
///
/// Groups are kept in first-seen order and casinos within a group in input
/// order.
#[derive(Debug)]
pub struct StateGroups<'a> {
    groups: Vec<(String, Vec<&'a CurrentCasino>)>,
}

impl<'a> StateGroups<'a> {
    pub fn get(&self, state: &str) -> Option<&[&'a CurrentCasino]> {
        self.groups
            .iter()
            .find(|(name, _)| name == state)
            .map(|(_, casinos)| casinos.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a CurrentCasino])> {
        self.groups
            .iter()
            .map(|(name, casinos)| (name.as_str(), casinos.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// State name a casino is reported under.
pub fn state_name(casino: &CurrentCasino) -> &str {
    casino
        .state
        .as_ref()
        .map(|s| s.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_STATE)
}

/// Group `casinos` by [`state_name`]. Every input lands in exactly one group.
pub fn group_by_state(casinos: &[CurrentCasino]) -> StateGroups<'_> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&CurrentCasino>)> = Vec::new();

    for casino in casinos {
        let name = state_name(casino);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(casino);
    }

    StateGroups { groups }
}
