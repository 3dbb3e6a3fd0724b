//! ordkv CLI
//!
//! Command-line driver mapping one subcommand onto one store operation.

use clap::{Parser, Subcommand};
use ordkv::{Cursor, Options, Store, WriteBatch};
use tracing_subscriber::{fmt, EnvFilter};

/// ordkv CLI
#[derive(Parser, Debug)]
#[command(name = "ordkv-cli")]
#[command(about = "CLI for the ordkv embedded ordered key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./ordkv_data")]
    data_dir: String,

    /// Create the store if it does not exist
    #[arg(short, long)]
    create: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every entry in key order
    Scan {
        /// Descending order
        #[arg(short, long)]
        reverse: bool,

        /// Stop after this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print entries whose key starts with a prefix
    Prefix {
        prefix: String,

        #[arg(short, long)]
        reverse: bool,
    },

    /// Print entries with start <= key <= end
    Range {
        start: String,
        end: String,

        #[arg(short, long)]
        reverse: bool,
    },

    /// Print the number of keys
    Count,

    /// Insert generated key_NNNNNN records in one batch
    Load {
        /// Number of records
        count: usize,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ordkv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let options = Options::builder()
        .data_dir(&args.data_dir)
        .create_if_missing(args.create)
        .build();

    let store = match Store::open(options) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store at {}: {}", args.data_dir, e);
            std::process::exit(1);
        }
    };

    let result = run(&store, args.command);
    store.close();

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &Store, command: Commands) -> ordkv::Result<()> {
    match command {
        Commands::Get { key } => match store.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Put { key, value } => {
            store.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            store.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Scan { reverse, limit } => {
            let cursor = open_cursor(store, reverse)?;
            print_entries(cursor.take(limit.unwrap_or(usize::MAX)));
        }
        Commands::Prefix { prefix, reverse } => {
            let cursor = open_cursor(store, reverse)?;
            print_entries(cursor.prefix(prefix.as_bytes()));
        }
        Commands::Range {
            start,
            end,
            reverse,
        } => {
            let cursor = open_cursor(store, reverse)?;
            print_entries(cursor.range(start.as_bytes(), end.as_bytes()));
        }
        Commands::Count => println!("{}", store.len()?),
        Commands::Load { count } => {
            let mut batch = WriteBatch::new();
            for i in 0..count {
                batch.put(format!("key_{:06}", i), format!("value_{}", i));
            }
            store.apply_batch(batch)?;
            println!("Loaded {} records", count);
        }
    }
    Ok(())
}

fn open_cursor(store: &Store, reverse: bool) -> ordkv::Result<Cursor> {
    if reverse {
        store.reverse_cursor()
    } else {
        store.cursor()
    }
}

fn print_entries(entries: impl Iterator<Item = (Vec<u8>, Vec<u8>)>) {
    for (key, value) in entries {
        println!(
            "{} => {}",
            String::from_utf8_lossy(&key),
            String::from_utf8_lossy(&value)
        );
    }
}
