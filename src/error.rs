use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegprobeError {
    #[error("http request returned status code {0}, url: {1}")]
    NetworkRequest(u16, String),

    #[error("no video id found in \"{0}\"")]
    InvalidVideoId(String),

    #[error("could not prepare stream: no segments found for video {0}")]
    DiscoveryExhausted(String),

    #[error("invalid relay url: {0}")]
    Relay(#[from] url::ParseError),
}
