use std::{
    io::{BufRead, Write},
    ops::ControlFlow,
};

use anyhow::{Context, Result};
use clap::Parser;
use table_schedule::{
    Config, GroupPool, OutOfRange, Pace, Player, Reporter, RoundBuilder, Schedule, Scheduler,
};

/// Enumerate tournament schedules in which no two players share a table twice.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Number of players
    #[arg(default_value_t = 8)]
    players: Player,

    /// Number of tables each round is split across
    #[arg(default_value_t = 4)]
    tables: usize,

    /// Explore only this round at the next depth; repeat for later rounds
    #[arg(short, long = "start", value_name = "INDEX")]
    start: Vec<usize>,

    /// Print schedules of at least this many rounds and wait for ENTER after each;
    /// shorter ones are only counted. -1 prints every schedule without waiting
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    autostop: i64,

    /// Most players a table may share with any table of an earlier round
    #[arg(short, long, default_value_t = 1)]
    max_shared: usize,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let pace = match self.autostop {
            -1 => Pace::Continuous,
            from => Pace::Stepped {
                from: usize::try_from(from)
                    .with_context(|| format!("autostop must be -1 or at least 0, not {from}"))?,
            },
        };
        Ok(Config::new(self.players, self.tables)
            .with_max_shared(self.max_shared)
            .with_pace(pace)
            .with_start_positions(self.start.iter().copied()))
    }
}

/// Prints schedules to stdout, pausing between them when stepping.
struct Terminal {
    pace: Pace,
}

impl Terminal {
    fn wait_for_enter(&self) -> ControlFlow<()> {
        print!("\nPress ENTER for next result...");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            // stdin closed: nobody is left to step through results
            Ok(0) | Err(_) => ControlFlow::Break(()),
            Ok(_) => ControlFlow::Continue(()),
        }
    }
}

impl Reporter for Terminal {
    fn schedule(&mut self, count: u64, schedule: &Schedule<'_>) -> ControlFlow<()> {
        println!("\nNew possible tournament #{count} ({} rounds):", schedule.len());
        print!("{schedule}");
        match self.pace {
            Pace::Continuous => ControlFlow::Continue(()),
            Pace::Stepped { .. } => self.wait_for_enter(),
        }
    }

    fn progress(&mut self, count: u64) -> ControlFlow<()> {
        print!("\r{count}");
        let _ = std::io::stdout().flush();
        ControlFlow::Continue(())
    }

    fn out_of_range(&mut self, miss: &OutOfRange) {
        eprintln!(
            "start position {} is out of range at round {}: only {} rounds available",
            miss.requested,
            miss.depth + 1,
            miss.available,
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.config()?;
    let scheduler = Scheduler::new(config).context("invalid tournament configuration")?;
    let layout = scheduler.layout();

    if let Some(&start) = scheduler.config().start_positions.first() {
        let pool = GroupPool::all(layout.players, layout.group_size);
        match RoundBuilder::new(&pool, layout.tables).nth(start) {
            Some(round) => println!("selected start round:\n{round}"),
            None => println!("selected start round {start} does not exist"),
        }
    }

    let mut terminal = Terminal {
        pace: scheduler.config().pace,
    };
    let summary = scheduler.run(&mut terminal);

    println!(
        "\n{} schedules found, longest {} rounds{}",
        summary.schedules,
        summary.longest,
        if summary.halted { " (stopped early)" } else { "" },
    );
    Ok(())
}
