use serde::Deserialize;
use tracing::{event, Level};

use super::http_client::RelayedClient;
use super::video_id::VideoId;
use super::{metadata_url, SEGMENT_DURATION_SECS};

/// Per-video descriptor hosted next to the segments. Only the duration
/// matters here; everything else is ignored.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoMetadata {
    duration_in_seconds: Option<f64>,
}

/// Fast path: read the video duration from its metadata descriptor.
///
/// Any failure (network, malformed body, missing or nonsense duration) is
/// logged and reported as `None`, sending discovery down the probing path.
pub async fn fetch_duration(client: &RelayedClient, id: &VideoId) -> Option<f64> {
    let bytes = match client.fetch_bytes(&metadata_url(id)).await {
        Ok(bytes) => bytes,
        Err(e) => {
            event!(Level::DEBUG, "metadata unavailable for {}: {}", id, e);
            return None;
        }
    };

    parse_duration(&bytes).or_else(|| {
        event!(Level::DEBUG, "metadata for {} has no usable duration", id);
        None
    })
}

fn parse_duration(bytes: &[u8]) -> Option<f64> {
    let metadata: VideoMetadata = serde_json::from_slice(bytes).ok()?;
    metadata.duration_in_seconds.filter(|d| *d > 0.0)
}

/// Number of fixed-length segments covering a duration
pub fn segments_for_duration(seconds: f64) -> u32 {
    (seconds / f64::from(SEGMENT_DURATION_SECS)).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_to_segment_count() {
        assert_eq!(segments_for_duration(95.0), 10);
        assert_eq!(segments_for_duration(100.0), 10);
        assert_eq!(segments_for_duration(101.0), 11);
        assert_eq!(segments_for_duration(0.5), 1);
    }

    #[test]
    fn parses_descriptor() {
        let body = br#"{"title": "Lesson 4", "durationInSeconds": 347.2, "width": 1920}"#;
        assert_eq!(parse_duration(body), Some(347.2));
    }

    #[test]
    fn missing_duration_is_none() {
        assert_eq!(parse_duration(br#"{"title": "Lesson 4"}"#), None);
    }

    #[test]
    fn malformed_body_is_none() {
        assert_eq!(parse_duration(b"<html>not json</html>"), None);
    }

    #[test]
    fn nonpositive_duration_is_none() {
        assert_eq!(parse_duration(br#"{"durationInSeconds": 0}"#), None);
        assert_eq!(parse_duration(br#"{"durationInSeconds": -3.5}"#), None);
    }
}
