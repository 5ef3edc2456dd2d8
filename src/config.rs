use crate::group::Player;

/// How completed schedules are handed to the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Report every schedule, one after the other.
    Continuous,
    /// Report schedules of at least `from` rounds, stepping through them one at a time;
    /// shorter schedules only advance the progress counter.
    Stepped { from: usize },
}

impl Pace {
    /// `true` when a schedule of `rounds` rounds is reported in full.
    pub fn reports(self, rounds: usize) -> bool {
        match self {
            Pace::Continuous => true,
            Pace::Stepped { from } => rounds >= from,
        }
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self::Stepped { from: 0 }
    }
}

/// Parameters of a schedule search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub players: Player,
    pub tables: usize,
    /// The most players a table may have in common with any table of an earlier round.
    ///
    /// `1` forbids any pair of players from sharing a table twice.
    pub max_shared: usize,
    pub pace: Pace,
    /// Index of the only round explored at each depth, first round first.
    ///
    /// Depths past the end of the list are explored in full.
    pub start_positions: Vec<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: 8,
            tables: 4,
            max_shared: 1,
            pace: Pace::default(),
            start_positions: Vec::new(),
        }
    }
}

impl Config {
    pub fn new(players: Player, tables: usize) -> Self {
        Self {
            players,
            tables,
            ..Self::default()
        }
    }

    pub fn with_max_shared(mut self, max_shared: usize) -> Self {
        self.max_shared = max_shared;
        self
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_start_positions(mut self, start_positions: impl IntoIterator<Item = usize>) -> Self {
        self.start_positions = start_positions.into_iter().collect();
        self
    }

    /// The start position for rounds at `depth`, if one was chosen.
    pub fn start_position(&self, depth: usize) -> Option<usize> {
        self.start_positions.get(depth).copied()
    }

    /// Check that the parameters describe a searchable tournament.
    pub fn layout(&self) -> Result<Layout, Error> {
        if self.players == 0 {
            return Err(Error::NoPlayers);
        }
        if self.tables == 0 {
            return Err(Error::NoTables);
        }
        if self.players as usize % self.tables != 0 {
            return Err(Error::Indivisible {
                players: self.players,
                tables: self.tables,
            });
        }
        let group_size = self.players as usize / self.tables;
        if group_size < 2 {
            return Err(Error::GroupTooSmall { group_size });
        }
        if self.max_shared >= group_size {
            return Err(Error::Unbounded {
                max_shared: self.max_shared,
                group_size,
            });
        }
        Ok(Layout {
            players: self.players,
            tables: self.tables,
            group_size,
        })
    }
}

/// Validated shape of every round: `tables` tables of `group_size` players each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub players: Player,
    pub tables: usize,
    pub group_size: usize,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("a tournament needs at least one player")]
    NoPlayers,
    #[error("a tournament needs at least one table")]
    NoTables,
    #[error("{players} players cannot be split evenly across {tables} tables")]
    Indivisible { players: Player, tables: usize },
    #[error("tables of {group_size} player(s) cannot pair anyone up; seat at least 2 per table")]
    GroupTooSmall { group_size: usize },
    #[error("tables may share at most {max_shared} players with earlier tables, which never excludes a table of {group_size}")]
    Unbounded { max_shared: usize, group_size: usize },
}
