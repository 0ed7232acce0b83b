//! Reads an HTML page snapshot from stdin and writes the extracted
//! conversation as JSON to stdout.
//!
//! Set `RUST_LOG=debug` to see container strategy and cleanup decisions on
//! stderr.

use std::io::{self, Read};

use rs_chat_export::extract_bytes;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let conversation = extract_bytes(&html);
    match conversation.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
