use clap::Parser;

use crate::store::quicklist::DEFAULT_BLOCK_CAPACITY;

pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024;
pub const DEFAULT_QUEUE_DEPTH: usize = 1024;

/// Runtime settings, read from the command line or the environment.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "quickdis", version, about)]
pub struct Config {
    /// The address to bind to
    #[arg(long, default_value = "127.0.0.1", env = "QUICKDIS_BIND")]
    pub bind: String,

    /// The port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "QUICKDIS_PORT")]
    pub port: u16,

    /// Maximum number of elements held by a single quicklist block
    #[arg(long, default_value_t = DEFAULT_BLOCK_CAPACITY, value_parser = parse_block_capacity)]
    pub list_block_capacity: usize,

    /// Largest request frame accepted from a client, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_SIZE, env = "QUICKDIS_MAX_FRAME_SIZE")]
    pub max_frame_size: usize,

    /// Number of requests that may wait for the dispatch loop
    #[arg(long, default_value_t = DEFAULT_QUEUE_DEPTH)]
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            list_block_capacity: DEFAULT_BLOCK_CAPACITY,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

fn parse_block_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("block capacity must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
