use std::ops::Deref;

use crate::group::{Combinations, Group, Player};

/// An ordered collection of distinct groups still available to the search.
///
/// Insertion order is preserved and removals never reorder what remains, so
/// enumerating a pool is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPool {
    groups: Vec<Group>,
}

impl GroupPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `size`-player group of players `1..=players`, in lexicographic order.
    pub fn all(players: Player, size: usize) -> Self {
        Self {
            groups: Combinations::new(players, size).collect(),
        }
    }

    /// Append a group to the end of the pool.
    ///
    /// Returns `false` and leaves the pool untouched if an equal group is already present.
    pub fn append(&mut self, group: Group) -> bool {
        if self.find_equal(&group).is_some() {
            return false;
        }
        self.groups.push(group);
        true
    }

    /// Position of the first group holding exactly the same players as `group`.
    pub fn find_equal(&self, group: &Group) -> Option<usize> {
        self.groups.iter().position(|candidate| {
            candidate.len() == group.len() && candidate.shared(group) == group.len()
        })
    }

    /// Remove every group which shares more than `max_shared` players with `reference`.
    ///
    /// With `max_shared == 0` this strips every group seating any player of `reference`;
    /// with `max_shared == 1` it strips only the groups which would seat some pair of
    /// `reference` together again.
    pub fn remove_matching(&mut self, reference: &Group, max_shared: usize) {
        self.groups.retain(|group| group.shared(reference) <= max_shared);
    }

    /// [`remove_matching`][Self::remove_matching] for each of `references`.
    pub fn remove_matching_for_each<'a>(
        &mut self,
        references: impl IntoIterator<Item = &'a Group>,
        max_shared: usize,
    ) {
        for reference in references {
            self.remove_matching(reference, max_shared);
        }
    }
}

impl Deref for GroupPool {
    type Target = [Group];

    fn deref(&self) -> &Self::Target {
        &self.groups
    }
}

impl<'a> IntoIterator for &'a GroupPool {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
