use std::{fmt, ops::Deref};

/// A player identifier, numbered from `1`.
pub type Player = u16;

/// The players seated at one table for one round.
///
/// Players are always stored in ascending order, so two groups holding the same
/// players compare equal regardless of the order they were listed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(
    // We maintain the invariant that this slice is sorted and free of duplicates
    Box<[Player]>,
);

impl Group {
    /// Create a group from any collection of players.
    ///
    /// Returns `None` if a player appears more than once.
    pub fn new(players: impl IntoIterator<Item = Player>) -> Option<Self> {
        let mut players: Vec<Player> = players.into_iter().collect();
        players.sort_unstable();
        let len = players.len();
        players.dedup();
        (players.len() == len).then(|| Self(players.into_boxed_slice()))
    }

    /// The lowest player at this table, or `None` for an empty group.
    pub fn lowest(&self) -> Option<Player> {
        self.0.first().copied()
    }

    /// `true` when `player` sits at this table.
    pub fn contains(&self, player: Player) -> bool {
        self.0.binary_search(&player).is_ok()
    }

    /// The number of players this group has in common with `other`.
    pub fn shared(&self, other: &Group) -> usize {
        // both sides are sorted, so a single merge pass counts the overlap
        let (mut left, mut right) = (self.0.iter().peekable(), other.0.iter().peekable());
        let mut count = 0;
        while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
            match l.cmp(r) {
                std::cmp::Ordering::Less => {
                    left.next();
                }
                std::cmp::Ordering::Greater => {
                    right.next();
                }
                std::cmp::Ordering::Equal => {
                    count += 1;
                    left.next();
                    right.next();
                }
            }
        }
        count
    }

    /// `true` when the two groups have no player in common.
    pub fn is_disjoint(&self, other: &Group) -> bool {
        self.shared(other) == 0
    }

    /// Iterate over every pair of players seated together at this table.
    pub fn pairs(&self) -> impl Iterator<Item = (Player, Player)> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(move |(idx, &a)| self.0[idx + 1..].iter().map(move |&b| (a, b)))
    }
}

impl Deref for Group {
    type Target = [Player];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, player) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{player}")?;
        }
        write!(f, "]")
    }
}

/// Every `size`-player group drawn from players `1..=players`, in lexicographic order.
///
/// Produced with the usual successor step: bump the rightmost position which
/// has not yet reached its ceiling, then reset every position to its right to
/// consecutive values.
#[derive(Debug, Clone)]
pub struct Combinations {
    players: Player,
    next: Option<Vec<Player>>,
}

impl Combinations {
    pub fn new(players: Player, size: usize) -> Self {
        let next = (size <= players as usize).then(|| (1..=size as Player).collect());
        Self { players, next }
    }

    /// The largest value position `idx` may hold in a combination of `size` players.
    fn ceiling(&self, idx: usize, size: usize) -> Player {
        self.players - (size - 1 - idx) as Player
    }
}

impl Iterator for Combinations {
    type Item = Group;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let size = current.len();

        let mut successor = current.clone();
        if let Some(idx) = (0..size).rev().find(|&idx| successor[idx] < self.ceiling(idx, size)) {
            successor[idx] += 1;
            for reset in idx + 1..size {
                successor[reset] = successor[reset - 1] + 1;
            }
            self.next = Some(successor);
        }

        Some(Group(current.into_boxed_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn group(players: &[Player]) -> Group {
        Group::new(players.iter().copied()).unwrap()
    }

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn players_are_sorted() {
        assert_eq!(&*group(&[3, 1, 2]), &[1, 2, 3]);
        assert_eq!(group(&[4, 2]), group(&[2, 4]));
    }

    #[test]
    fn duplicate_players_are_rejected() {
        assert!(Group::new([1, 2, 1]).is_none());
    }

    #[rstest]
    #[case(&[1, 2], &[3, 4], 0)]
    #[case(&[1, 2], &[2, 3], 1)]
    #[case(&[1, 2, 3], &[3, 2, 1], 3)]
    #[case(&[1, 4, 7], &[2, 4, 7], 2)]
    fn shared_counts_common_players(
        #[case] left: &[Player],
        #[case] right: &[Player],
        #[case] expect: usize,
    ) {
        assert_eq!(group(left).shared(&group(right)), expect);
        assert_eq!(group(right).shared(&group(left)), expect);
    }

    #[test]
    fn pairs_of_a_table() {
        let pairs: Vec<_> = group(&[1, 3, 5]).pairs().collect();
        assert_eq!(pairs, [(1, 3), (1, 5), (3, 5)]);
    }

    #[test]
    fn display() {
        assert_eq!(group(&[2, 1]).to_string(), "[1, 2]");
    }

    #[rstest]
    #[case(4, 2)]
    #[case(6, 3)]
    #[case(8, 2)]
    #[case(9, 3)]
    #[case(5, 5)]
    #[case(5, 1)]
    fn combinations_are_complete_and_ordered(#[case] players: Player, #[case] size: usize) {
        let groups: Vec<_> = Combinations::new(players, size).collect();
        assert_eq!(groups.len(), binomial(players as usize, size));
        assert!(groups.iter().all(|g| g.len() == size));
        assert!(groups
            .iter()
            .all(|g| g.iter().all(|&p| (1..=players).contains(&p))));
        // strict lexicographic order implies pairwise distinct
        assert!(groups.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn combinations_of_four_choose_two() {
        let groups: Vec<Vec<Player>> = Combinations::new(4, 2).map(|g| g.to_vec()).collect();
        let expect: Vec<Vec<Player>> = vec![
            vec![1, 2],
            vec![1, 3],
            vec![1, 4],
            vec![2, 3],
            vec![2, 4],
            vec![3, 4],
        ];
        assert_eq!(groups, expect);
    }

    #[test]
    fn combinations_edge_sizes() {
        assert_eq!(Combinations::new(3, 4).count(), 0);
        let empty: Vec<_> = Combinations::new(3, 0).collect();
        assert_eq!(empty.len(), 1);
        assert!(empty[0].is_empty());
    }
}
