use std::ops::ControlFlow;

use crate::{
    config::{self, Config, Layout},
    pool::GroupPool,
    round::RoundBuilder,
    schedule::Schedule,
    tree::{NodeId, SearchTree},
};

/// Receives the results of a schedule search as they are found.
///
/// Returning [`ControlFlow::Break`] from [`schedule`][Self::schedule] or
/// [`progress`][Self::progress] stops the search; this is also the place to
/// pause between results.
///
/// Any `FnMut(u64, &Schedule) -> ControlFlow<()>` closure is a reporter which
/// ignores progress and out-of-range notices.
pub trait Reporter {
    /// A complete schedule, along with the number of schedules found so far, this one included.
    fn schedule(&mut self, count: u64, schedule: &Schedule<'_>) -> ControlFlow<()>;

    /// A complete schedule too short to be reported in full under the configured [`Pace`][config::Pace].
    fn progress(&mut self, _count: u64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// A start position asked for a round past the last one available.
    fn out_of_range(&mut self, _miss: &OutOfRange) {}
}

impl<F> Reporter for F
where
    F: FnMut(u64, &Schedule<'_>) -> ControlFlow<()>,
{
    fn schedule(&mut self, count: u64, schedule: &Schedule<'_>) -> ControlFlow<()> {
        self(count, schedule)
    }
}

/// A start position which selected no round, because fewer rounds were available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// Zero-based position in the schedule.
    pub depth: usize,
    pub requested: usize,
    pub available: usize,
}

/// Rounds found below one node of the search tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Rounds produced by the builder, including those skipped by a start position.
    pub found: usize,
    /// Rounds attached to the tree.
    pub attached: usize,
    pub selection: Option<usize>,
}

impl Enumeration {
    /// `true` when rounds existed but the start position skipped all of them.
    pub fn missed(&self) -> bool {
        self.selection.is_some() && self.attached == 0 && self.found > 0
    }
}

/// Attach the rounds which can be built from `pool` as children of `parent`.
///
/// With a `selection`, only the round at that position is attached and the
/// enumeration stops as soon as it is found.
pub fn enumerate_rounds(
    tree: &mut SearchTree,
    parent: NodeId,
    pool: &GroupPool,
    tables: usize,
    selection: Option<usize>,
) -> Enumeration {
    let mut enumeration = Enumeration {
        selection,
        ..Enumeration::default()
    };

    for round in RoundBuilder::new(pool, tables) {
        let position = enumeration.found;
        enumeration.found += 1;
        if selection.is_some_and(|selected| selected != position) {
            continue;
        }
        if tree.push_child(parent, round).is_some() {
            enumeration.attached += 1;
        }
        if selection.is_some() {
            break;
        }
    }

    enumeration
}

/// Totals of a finished (or halted) search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub schedules: u64,
    /// Rounds in the longest schedule found.
    pub longest: usize,
    pub nodes_created: u64,
    pub peak_nodes: usize,
    /// `true` if the reporter stopped the search early.
    pub halted: bool,
}

/// Searches for every schedule of a validated [`Config`].
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: Config,
    layout: Layout,
}

impl Scheduler {
    pub fn new(config: Config) -> Result<Self, config::Error> {
        let layout = config.layout()?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Run the search to completion, or until the reporter breaks.
    pub fn run<R: Reporter>(&self, reporter: &mut R) -> Summary {
        let pool = GroupPool::all(self.layout.players, self.layout.group_size);
        log::info!(
            "searching schedules of {} players at {} tables of {} ({} groups)",
            self.layout.players,
            self.layout.tables,
            self.layout.group_size,
            pool.len(),
        );

        let mut search = Search {
            config: &self.config,
            tables: self.layout.tables,
            tree: SearchTree::new(),
            reporter,
            found: 0,
            longest: 0,
        };
        let root = search.tree.root();
        search.populate(root, &pool, 0);
        let halted = search.explore(root, &pool, 0).is_break();

        let summary = Summary {
            schedules: search.found,
            longest: search.longest,
            nodes_created: search.tree.created(),
            peak_nodes: search.tree.peak_len(),
            halted,
        };
        log::info!(
            "found {} schedules, longest {} rounds; {} nodes created, at most {} alive{}",
            summary.schedules,
            summary.longest,
            summary.nodes_created,
            summary.peak_nodes,
            if halted { " (halted)" } else { "" },
        );
        summary
    }
}

/// State of one running search.
struct Search<'a, R> {
    config: &'a Config,
    tables: usize,
    tree: SearchTree,
    reporter: &'a mut R,
    found: u64,
    longest: usize,
}

impl<R: Reporter> Search<'_, R> {
    /// Attach the rounds for schedule position `depth` below `parent`.
    fn populate(&mut self, parent: NodeId, pool: &GroupPool, depth: usize) -> Enumeration {
        let enumeration = enumerate_rounds(
            &mut self.tree,
            parent,
            pool,
            self.tables,
            self.config.start_position(depth),
        );
        log::debug!(
            "depth {depth}: {} rounds from {} groups, {} attached",
            enumeration.found,
            pool.len(),
            enumeration.attached,
        );

        match enumeration.selection {
            Some(requested) if enumeration.missed() => {
                let miss = OutOfRange {
                    depth,
                    requested,
                    available: enumeration.found,
                };
                log::warn!(
                    "start position {} at depth {} is out of range: only {} rounds available",
                    miss.requested,
                    miss.depth,
                    miss.available,
                );
                self.reporter.out_of_range(&miss);
            }
            _ => {}
        }
        enumeration
    }

    /// Explore every round below `parent`, whose children were built from `pool`.
    ///
    /// `depth` is the schedule position of those children. Returns the number of
    /// children explored; zero means `parent` ends a schedule.
    fn explore(
        &mut self,
        parent: NodeId,
        pool: &GroupPool,
        depth: usize,
    ) -> ControlFlow<(), usize> {
        let Some(mut child) = self.tree.first_child(parent) else {
            return ControlFlow::Continue(0);
        };
        if pool.is_empty() {
            return ControlFlow::Continue(0);
        }

        let mut branches = 0;
        loop {
            let mut reduced = pool.clone();
            reduced.remove_matching_for_each(&self.tree[child], self.config.max_shared);

            let enumeration = self.populate(child, &reduced, depth + 1);
            let below = self.explore(child, &reduced, depth + 1)?;
            // rounds cut away by a start position do not make this a complete schedule
            if below == 0 && !enumeration.missed() {
                self.complete(child, depth + 1)?;
            }
            drop(reduced);
            branches += 1;

            match self.tree.advance(child) {
                Some(next) => child = next,
                None => break,
            }
        }

        ControlFlow::Continue(branches)
    }

    fn complete(&mut self, leaf: NodeId, rounds: usize) -> ControlFlow<()> {
        self.found += 1;
        self.longest = self.longest.max(rounds);
        log::trace!("schedule {} complete with {rounds} rounds", self.found);

        if self.config.pace.reports(rounds) {
            let schedule = Schedule::new(self.tree.path(leaf));
            self.reporter.schedule(self.found, &schedule)
        } else {
            self.reporter.progress(self.found)
        }
    }
}
