mod cli;
mod error;
mod vod;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use tokio::fs;
use tracing::{event, Level};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use vod::VodStream;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("segprobe=warn")),
        )
        .init();

    let (stream, mut progress_rx) = VodStream::new(&args.input, &args.network_options)?;

    // Progress goes to stderr so stdout stays a clean playlist document
    let progress_handle = tokio::spawn(async move {
        while let Some(update) = progress_rx.next().await {
            eprintln!("{}", update);
        }
    });

    let prepared = stream.prepare().await;

    // Closing the sender ends the drain task
    drop(stream);
    progress_handle.await?;

    let prepared = prepared?;
    event!(
        Level::DEBUG,
        "prepared {} with {} segments via {}",
        prepared.id,
        prepared.segment_count,
        prepared.source
    );

    if args.output_options.data_url {
        println!("{}", prepared.data_url());
    } else if let Some(path) = &args.output_options.output {
        fs::write(path, &prepared.playlist).await?;
        eprintln!(
            "Wrote {} segment playlist for {} to {}",
            prepared.segment_count,
            prepared.id,
            path.display()
        );
    } else {
        print!("{}", prepared.playlist);
    }

    Ok(())
}
