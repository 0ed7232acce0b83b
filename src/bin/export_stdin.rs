//! Reads an HTML page snapshot from stdin, lays the conversation out on the
//! recording canvas and writes the display list to stdout. The suggested
//! filename and any render warnings go to stderr.

use std::io::{self, Read, Write};

use rs_chat_export::layout::{PreloadedImages, RecordingCanvas};
use rs_chat_export::{encoding, export, LayoutOptions, Options};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut bytes = Vec::new();
    if io::stdin().read_to_end(&mut bytes).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }
    let page = encoding::decode_snapshot(&bytes);

    let layout = LayoutOptions::default();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    let images = PreloadedImages::new();
    let document = match export(&page.html, &Options::default(), &layout, &mut canvas, &images).await {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for warning in &document.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!("{} ({} pages)", document.filename, document.pages);
    if io::stdout().write_all(&document.bytes).is_err() {
        std::process::exit(1);
    }
}
