mod http_client;
mod metadata;
mod playlist;
mod probe;
mod progress;
mod video_id;

use std::fmt::Display;

use anyhow::Result;
use futures::channel::mpsc;
use tracing::{event, instrument, Level};

use self::http_client::RelayedClient;
pub use self::playlist::PLAYLIST_CONTENT_TYPE;
pub use self::probe::PROBE_CEILING;
pub use self::progress::{Progress, ProgressSender};
pub use self::video_id::VideoId;
use crate::cli::NetworkOptions;
use crate::error::SegprobeError;

/// Segment store on the third-party CDN
pub const CDN_BASE: &str = "https://vodstore.b-cdn.net/library";
/// Public CORS relay; the CDN serves no Access-Control-Allow-Origin headers
pub const RELAY_BASE: &str = "https://api.allorigins.win/raw";
/// Segment files are named {SEGMENT_PREFIX}-00001.ts onward
pub const SEGMENT_PREFIX: &str = "segment";
pub const SEGMENT_DURATION_SECS: u32 = 10;
/// Count reported when probing never finds a segment. A stand-in, not a
/// measurement: `prepare` refuses to synthesize a playlist from it.
pub const FALLBACK_SEGMENT_COUNT: u32 = 1;

fn metadata_url(id: &VideoId) -> String {
    format!("{}/{}/metadata.json", CDN_BASE, id.as_str())
}

/// Where a segment count came from
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountSource {
    /// Computed from the duration in the metadata descriptor
    Metadata,
    /// Last segment located by probing the CDN
    Probe,
    /// Nothing answered; the count is the documented stand-in
    Fallback,
}

impl Display for CountSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metadata => write!(f, "metadata"),
            Self::Probe => write!(f, "probing"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DiscoveredCount {
    pub count: u32,
    pub source: CountSource,
}

/// A course video addressed by id on the CDN. Each instance owns its own
/// discovery state; concurrent streams share nothing.
#[derive(Debug)]
pub struct VodStream {
    id: VideoId,
    client: RelayedClient,
    progress: ProgressSender,
}

/// Discovery outcome ready to hand to a player
#[derive(Debug)]
pub struct PreparedStream {
    pub id: VideoId,
    pub segment_count: u32,
    pub source: CountSource,
    pub playlist: String,
}

impl PreparedStream {
    /// In-memory form for HLS players, dodging CORS on the playlist itself
    pub fn data_url(&self) -> String {
        playlist::to_data_url(&self.playlist)
    }
}

impl VodStream {
    /// Extract the video id from `input` and set up the relayed client.
    /// Returns the receiver half of the progress side channel along with the
    /// stream; dropping it discards updates without affecting discovery.
    pub fn new(
        input: &str,
        network_options: &NetworkOptions,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Progress>)> {
        let id = VideoId::extract(input)
            .ok_or_else(|| SegprobeError::InvalidVideoId(input.to_owned()))?;
        let client = RelayedClient::new(network_options)?;
        let (progress, rx) = ProgressSender::channel();

        Ok((
            Self {
                id,
                client,
                progress,
            },
            rx,
        ))
    }

    /// Determine how many segments the video has.
    ///
    /// Tries the metadata descriptor first, falls back to binary-search
    /// probing. Infallible by contract: never an error, never zero. When
    /// nothing answers it reports the fallback stand-in, which callers must
    /// check for via the source before trusting the count.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn discover_segment_count(&self) -> DiscoveredCount {
        self.progress.send(Progress::FetchingMetadata);
        if let Some(seconds) = metadata::fetch_duration(&self.client, &self.id).await {
            self.progress.send(Progress::MetadataDuration { seconds });
            let count = metadata::segments_for_duration(seconds);
            self.progress.send(Progress::Discovered {
                count,
                source: CountSource::Metadata,
            });
            return DiscoveredCount {
                count,
                source: CountSource::Metadata,
            };
        }

        event!(Level::DEBUG, "metadata path failed, probing segments");
        let client = &self.client;
        let found = probe::discover_last_segment(&self.progress, |index| {
            let url = playlist::segment_url(&self.id, index);
            async move { client.segment_exists(&url).await }
        })
        .await;

        match found {
            Some(count) => {
                self.progress.send(Progress::Discovered {
                    count,
                    source: CountSource::Probe,
                });
                DiscoveredCount {
                    count,
                    source: CountSource::Probe,
                }
            }
            None => {
                self.progress.send(Progress::NoSegmentsFound);
                DiscoveredCount {
                    count: FALLBACK_SEGMENT_COUNT,
                    source: CountSource::Fallback,
                }
            }
        }
    }

    /// Discover the segment count and synthesize the playlist.
    ///
    /// The fallback stand-in is fatal here: no playlist is built for a video
    /// with no reachable segments, and the caller gets a typed error to show
    /// instead of an empty stream.
    pub async fn prepare(&self) -> Result<PreparedStream> {
        let discovered = self.discover_segment_count().await;
        if discovered.source == CountSource::Fallback {
            return Err(SegprobeError::DiscoveryExhausted(self.id.to_string()).into());
        }

        let playlist = playlist::synthesize(&self.id, discovered.count);

        Ok(PreparedStream {
            id: self.id.clone(),
            segment_count: discovered.count,
            source: discovered.source,
            playlist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_url_shape() {
        let id = VideoId::extract("ab12cd34ef56").unwrap();
        assert_eq!(
            metadata_url(&id),
            "https://vodstore.b-cdn.net/library/ab12cd34ef56/metadata.json"
        );
    }

    /// A probed count feeds straight into synthesis: the document must carry
    /// exactly that many segment entries
    #[tokio::test]
    async fn probed_count_round_trips_into_playlist() {
        let id = VideoId::extract("ab12cd34ef56").unwrap();
        let (progress, _rx) = ProgressSender::channel();
        let n = 37;

        let found = probe::discover_last_segment(&progress, |i| async move { i <= n })
            .await
            .unwrap();
        assert_eq!(found, n);

        let doc = playlist::synthesize(&id, found);
        assert_eq!(doc.matches("#EXTINF:10,\n").count(), n as usize);
        let last = playlist::segment_url(&id, n);
        assert!(doc.contains(&last));
    }
}
