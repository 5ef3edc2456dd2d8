use std::{fmt, ops::Deref};

use crate::{
    group::{Group, Player},
    pool::GroupPool,
};

/// One full round: every player seated at exactly one table.
///
/// Tables are held in ascending order of their lowest player. The default
/// round is empty and only ever anchors the root of a [`SearchTree`][crate::SearchTree].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Round(Vec<Group>);

impl Round {
    /// Assemble a round from its tables, checking that they seat players `1..=players`
    /// exactly once each.
    pub fn new(mut groups: Vec<Group>, players: Player) -> Result<Self, Error> {
        let mut seated = vec![false; players as usize + 1];
        for group in &groups {
            for &player in group.iter() {
                if player == 0 || player > players {
                    return Err(Error::UnknownPlayer { player, players });
                }
                if std::mem::replace(&mut seated[player as usize], true) {
                    return Err(Error::DoubleBooked { player });
                }
            }
        }
        if let Some(player) = (1..=players).find(|&player| !seated[player as usize]) {
            return Err(Error::Unseated { player });
        }

        groups.sort_unstable_by_key(Group::lowest);
        Ok(Self(groups))
    }

    /// The tables of this round.
    pub fn groups(&self) -> &[Group] {
        &self.0
    }
}

impl Deref for Round {
    type Target = [Group];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Round {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, group) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

/// Outcome of asking a [`RoundBuilder`] for another round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundSearch {
    Found(Round),
    Exhausted,
}

/// Enumerates every way to partition a pool's groups into a full round.
///
/// The builder keeps one cursor per table. Each call to [`find_next`][Self::find_next]
/// resumes from where the previous one stopped, so repeated calls walk through all
/// partitions in the counting order of the cursors, table `0` changing slowest.
/// Each distinct partition is produced exactly once, whatever order the pool is in.
///
/// The pool's groups are expected to seat players `1..=players` of a layout whose
/// `tables` tables of that size seat everyone, so every partition found is a full round.
#[derive(Debug, Clone)]
pub struct RoundBuilder<'a> {
    pool: &'a GroupPool,
    cursor: Vec<usize>,
}

impl<'a> RoundBuilder<'a> {
    pub fn new(pool: &'a GroupPool, tables: usize) -> Self {
        Self {
            pool,
            cursor: vec![0; tables],
        }
    }

    /// Find the next round, or report that every round of the pool has been produced.
    pub fn find_next(&mut self) -> RoundSearch {
        if self.cursor.is_empty() {
            return RoundSearch::Exhausted;
        }

        let mut picked = Vec::with_capacity(self.cursor.len());
        if self.descend(self.pool, 0, &mut picked) {
            picked.sort_unstable_by_key(Group::lowest);
            RoundSearch::Found(Round(picked))
        } else {
            RoundSearch::Exhausted
        }
    }

    /// Seat table `depth` and every table after it, drawing from `worker`.
    ///
    /// `worker` holds only groups disjoint from the tables already in `picked`.
    fn descend(&mut self, worker: &GroupPool, depth: usize, picked: &mut Vec<Group>) -> bool {
        if depth == self.cursor.len() - 1 {
            let Some(group) = worker.get(self.cursor[depth]) else {
                return false;
            };
            picked.push(group.clone());
            self.cursor[depth] += 1;
            return true;
        }

        // the lowest available player has to sit at this table, so only groups holding
        // them are candidates; this keeps each partition from being found once per
        // ordering of its tables
        let anchor = worker.iter().filter_map(Group::lowest).min();

        while let Some(candidate) = worker.get(self.cursor[depth]) {
            if candidate.lowest() == anchor {
                // every other group holding the anchor goes too, wherever it sits in the pool
                let mut subworker = worker.clone();
                subworker.remove_matching(candidate, 0);

                picked.push(candidate.clone());
                if self.descend(&subworker, depth + 1, picked) {
                    // the cursor stays on this candidate so the next call resumes below it
                    return true;
                }
                picked.pop();
            }

            self.cursor[depth] += 1;
            self.cursor[depth + 1..].fill(0);
        }

        false
    }
}

impl Iterator for RoundBuilder<'_> {
    type Item = Round;

    fn next(&mut self) -> Option<Self::Item> {
        match self.find_next() {
            RoundSearch::Found(round) => Some(round),
            RoundSearch::Exhausted => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("player {player} is not one of players 1..={players}")]
    UnknownPlayer { player: Player, players: Player },
    #[error("player {player} is seated at more than one table")]
    DoubleBooked { player: Player },
    #[error("player {player} is not seated at any table")]
    Unseated { player: Player },
}
