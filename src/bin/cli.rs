//! FlatKV CLI
//!
//! Command-line interface for a FlatKV record file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flatkv::log::LogRecovery;
use flatkv::{Config, FlatError, IndexKind, RecordStore, Result, TailPolicy, WritePolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// FlatKV CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for the FlatKV record store")]
#[command(version)]
struct Args {
    /// Record file
    #[arg(short, long, default_value = "./flatkv_data/records.db")]
    path: PathBuf,

    /// Lookup strategy
    #[arg(short, long, value_enum, default_value_t = IndexKind::Hash)]
    index: IndexKind,

    /// Duplicate/update policy
    #[arg(long, value_enum, default_value_t = WritePolicy::Strict)]
    policy: WritePolicy,

    /// What to do with a partially written last record
    #[arg(long, value_enum, default_value_t = TailPolicy::Truncate)]
    tail: TailPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a new record
    Insert {
        /// The key
        key: String,

        /// Payload fields, in order
        fields: Vec<String>,
    },

    /// Print the latest fields of a key
    Read {
        /// The key to read
        key: String,
    },

    /// Replace the fields of an existing key
    Update {
        /// The key to update
        key: String,

        /// New payload fields, in order
        fields: Vec<String>,
    },

    /// Delete the record file
    Reset,

    /// Print every current record (or every raw entry with --all)
    Dump {
        /// Include superseded entries with their offsets
        #[arg(short, long)]
        all: bool,
    },

    /// Check the file for malformed or partial records without modifying it
    Verify,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            match e {
                FlatError::NotFound(_) | FlatError::DuplicateKey(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Verify must not repair the file, so it runs before the store opens
    if let Commands::Verify = args.command {
        let report = LogRecovery::verify(&args.path)?;
        println!("path:       {}", args.path.display());
        println!("records:    {}", report.entries_recovered);
        println!("malformed:  {}", report.entries_malformed);
        println!("valid len:  {}", report.valid_len);
        println!("tail bytes: {}", report.tail_bytes);
        return Ok(());
    }

    let config = Config::builder()
        .path(&args.path)
        .index_kind(args.index)
        .write_policy(args.policy)
        .tail_policy(args.tail)
        .build();
    let store = RecordStore::open(config)?;

    match args.command {
        Commands::Insert { key, fields } => store.insert(&key, &fields)?,
        Commands::Read { key } => {
            let record = store.read(&key)?;
            println!("{}", record.fields.join("\t"));
        }
        Commands::Update { key, fields } => store.update(&key, &fields)?,
        Commands::Reset => store.reset()?,
        Commands::Dump { all: true } => {
            for (offset, record) in store.entries()? {
                println!("{offset}\t{}\t{}", record.key, record.fields.join("\t"));
            }
        }
        Commands::Dump { all: false } => {
            for record in store.records()? {
                println!("{}\t{}", record.key, record.fields.join("\t"));
            }
        }
        Commands::Verify => {}
    }

    store.close()
}
