//! Enumerate tournament schedules in which no two players share a table twice.
//!
//! `players` players are split every round across `tables` tables of equal size.
//! The search walks a tree of rounds depth first: each level holds the rounds
//! still possible once the groups that would repeat a pairing are removed, and a
//! path ends in a complete schedule when no further round can be seated.

mod config;
mod group;
mod pool;
mod round;
mod schedule;
mod search;
mod tree;

pub use config::{Config, Error as ConfigError, Layout, Pace};
pub use group::{Combinations, Group, Player};
pub use pool::GroupPool;
pub use round::{Error as RoundError, Round, RoundBuilder, RoundSearch};
pub use schedule::Schedule;
pub use search::{enumerate_rounds, Enumeration, OutOfRange, Reporter, Scheduler, Summary};
pub use tree::{NodeId, SearchTree};
