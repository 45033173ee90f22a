//! Process configuration: CLI flags with sensible defaults, no other
//! environment variables consulted.

use std::path::PathBuf;

use clap::Parser;

use crate::storage::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug, Clone)]
#[command(name = "slotdb-server", about = "A minimal single-node relational database engine")]
pub struct Config {
    /// Path to the single on-disk database file.
    #[arg(long, default_value = "data/dbfile")]
    pub db_path: PathBuf,

    /// Fixed page size in bytes, set once at engine start.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Address the HTTP shell binds to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("data/dbfile"),
            page_size: DEFAULT_PAGE_SIZE,
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}
