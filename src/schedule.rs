use std::{collections::BTreeMap, fmt, ops::Deref};

use crate::{group::Player, round::Round};

/// The rounds of one complete schedule, first round first.
///
/// Schedules borrow their rounds from the search tree, so they only live for the
/// duration of a report. Use [`to_rounds`][Self::to_rounds] to keep one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<'a> {
    rounds: Vec<&'a Round>,
}

impl<'a> Schedule<'a> {
    pub fn new(rounds: Vec<&'a Round>) -> Self {
        Self { rounds }
    }

    /// Clone the rounds out of the search tree.
    pub fn to_rounds(&self) -> Vec<Round> {
        self.rounds.iter().map(|&round| round.clone()).collect()
    }

    /// How often each pair of players shares a table over the whole schedule.
    ///
    /// Pairs are listed lowest player first; pairs which never meet are absent.
    pub fn pair_meetings(&self) -> BTreeMap<(Player, Player), usize> {
        let mut meetings = BTreeMap::new();
        for group in self.rounds.iter().flat_map(|round| round.iter()) {
            for pair in group.pairs() {
                *meetings.entry(pair).or_insert(0) += 1;
            }
        }
        meetings
    }

    /// The pairs of players who share a table more than `allowance` times.
    pub fn repeated_pairs(&self, allowance: usize) -> Vec<(Player, Player)> {
        self.pair_meetings()
            .into_iter()
            .filter_map(|(pair, count)| (count > allowance).then_some(pair))
            .collect()
    }
}

impl<'a> Deref for Schedule<'a> {
    type Target = [&'a Round];

    fn deref(&self) -> &Self::Target {
        &self.rounds
    }
}

impl fmt::Display for Schedule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, round) in self.rounds.iter().enumerate() {
            writeln!(f, "round {}: {round}", idx + 1)?;
        }
        Ok(())
    }
}
