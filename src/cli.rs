use std::path::PathBuf;

use clap::Parser;

/// Rebuild a playable HLS VOD playlist for a CDN-hosted course video
#[derive(Parser, Clone, Debug)]
#[clap(version, about)]
pub struct Args {
    /// Course video page URL, or a bare video id
    #[clap(value_parser)]
    pub input: String,

    #[clap(flatten)]
    pub output_options: OutputOptions,

    #[clap(flatten)]
    pub network_options: NetworkOptions,
}

#[derive(Parser, Clone, Debug)]
#[clap(help_heading = "OUTPUT OPTIONS")]
pub struct OutputOptions {
    /// Write the playlist document to this file instead of stdout
    #[clap(short, long, value_parser, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Print a base64 data URL instead of the raw playlist document.
    /// Suitable for feeding an HLS player directly, bypassing CORS.
    #[clap(long)]
    pub data_url: bool,
}

#[derive(Parser, Clone, Debug)]
#[clap(help_heading = "NETWORK OPTIONS")]
pub struct NetworkOptions {
    /// Maximum number of times to retry network requests before giving up
    #[clap(long, value_parser, default_value_t = 3)]
    pub max_retries: u32,

    /// Network requests timeout in seconds
    #[clap(
        short,
        long,
        value_parser,
        value_name = "SECONDS",
        default_value_t = 30
    )]
    pub timeout: u64,
}
