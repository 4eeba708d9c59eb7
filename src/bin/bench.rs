//! FlatKV Benchmark Harness
//!
//! Times inserts, reads and updates of generated student rows against each
//! index strategy and prints the average latency per operation. `--repeats`
//! sweeps several workload sizes in one run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use flatkv::workload::WorkloadGenerator;
use flatkv::{Config, IndexKind, RecordStore, Result, WritePolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// FlatKV insert/read timing harness
#[derive(Parser, Debug)]
#[command(name = "flatkv-bench")]
#[command(about = "Compare insert, read and update latency of the FlatKV index strategies")]
#[command(version)]
struct Args {
    /// Directory for the benchmark record files
    #[arg(short, long, default_value = "./flatkv_bench")]
    dir: PathBuf,

    /// Index strategies to measure (defaults to all)
    #[arg(short, long, value_enum)]
    index: Vec<IndexKind>,

    /// Duplicate/update policy
    #[arg(long, value_enum, default_value_t = WritePolicy::Strict)]
    policy: WritePolicy,

    /// Insert+read pairs per run
    #[arg(short, long, default_value = "10000")]
    ops: u64,

    /// Workload sizes to sweep, e.g. `1,10,100,1000` (overrides --ops)
    #[arg(short, long, value_delimiter = ',')]
    repeats: Vec<u64>,

    /// Number of runs per strategy
    #[arg(short, long, default_value = "1")]
    turns: u32,

    /// Rebuild the index between each insert and its read
    #[arg(long)]
    rebuild_each: bool,

    /// Seed for the generated workload
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the record files after the run
    #[arg(long)]
    keep: bool,
}

/// Totals of one run
#[derive(Debug, Default)]
struct RunStats {
    inserts: u64,
    duplicates: u64,
    reads: u64,
    updates: u64,
    insert_time: Duration,
    read_time: Duration,
    update_time: Duration,
}

impl RunStats {
    fn avg(total: Duration, count: u64) -> f64 {
        if count == 0 {
            0.0
        } else {
            total.as_secs_f64() / count as f64
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatkv=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("FlatKV bench v{}", flatkv::VERSION);
    tracing::info!("Record directory: {}", args.dir.display());

    if let Err(e) = run(&args) {
        tracing::error!("Benchmark failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.dir)?;

    let kinds: Vec<IndexKind> = if args.index.is_empty() {
        IndexKind::ALL.to_vec()
    } else {
        args.index.clone()
    };

    let sizes: Vec<u64> = if args.repeats.is_empty() {
        vec![args.ops]
    } else {
        args.repeats.clone()
    };

    for kind in kinds {
        let path = args.dir.join(format!("{kind}_db.txt"));

        for turn in 1..=args.turns {
            for &ops in &sizes {
                let seed = args.seed.map(|s| s.wrapping_add(u64::from(turn)));
                let stats = run_once(&path, kind, args, ops, seed)?;

                println!(
                    "{kind:>6} turn {turn} ops {ops}: {} inserts ({} duplicates), {} reads, \
                     {} updates | insert avg {:.10} s | read avg {:.10} s | update avg {:.10} s",
                    stats.inserts,
                    stats.duplicates,
                    stats.reads,
                    stats.updates,
                    RunStats::avg(stats.insert_time, stats.inserts + stats.duplicates),
                    RunStats::avg(stats.read_time, stats.reads),
                    RunStats::avg(stats.update_time, stats.updates),
                );
            }
        }

        if !args.keep && path.exists() {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}

fn run_once(
    path: &Path,
    kind: IndexKind,
    args: &Args,
    ops: u64,
    seed: Option<u64>,
) -> Result<RunStats> {
    let config = Config::builder()
        .path(path)
        .index_kind(kind)
        .write_policy(args.policy)
        .build();
    let store = RecordStore::open(config)?;
    store.reset()?;

    let mut generator = match seed {
        Some(seed) => WorkloadGenerator::seeded(seed),
        None => WorkloadGenerator::random(),
    };
    let mut stats = RunStats::default();
    let mut stored = Vec::new();

    for _ in 0..ops {
        let student = generator.student();

        let start = Instant::now();
        let outcome = store.insert_student(&student);
        stats.insert_time += start.elapsed();

        match outcome {
            Ok(()) => {
                stats.inserts += 1;
                stored.push(student.clone());
            }
            Err(e) if e.is_duplicate_key() => stats.duplicates += 1,
            Err(e) => return Err(e),
        }

        if args.rebuild_each {
            store.rebuild()?;
        }

        let start = Instant::now();
        store.read(&student.full_name)?;
        stats.read_time += start.elapsed();
        stats.reads += 1;
    }

    // Every stored key gets one new value
    for student in &stored {
        let revised = generator.revision(student);

        let start = Instant::now();
        store.update_student(&revised)?;
        stats.update_time += start.elapsed();
        stats.updates += 1;
    }

    store.close()?;
    Ok(stats)
}
