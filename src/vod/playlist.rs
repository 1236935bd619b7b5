use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::video_id::VideoId;
use super::{CDN_BASE, SEGMENT_DURATION_SECS, SEGMENT_PREFIX};

/// Content-Type for HLS playlists, used in the data URL handed to players
pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// URL of a single media segment, 1-based index zero-padded to 5 digits
pub fn segment_url(id: &VideoId, index: u32) -> String {
    format!("{}/{}/{}-{:05}.ts", CDN_BASE, id, SEGMENT_PREFIX, index)
}

/// Build a VOD media playlist covering segments 1..=count.
///
/// Pure formatting over its inputs: no network, no validation, byte-identical
/// output for identical inputs. If `count` overshoots the true end of the
/// video the excess entries 404 at playback time; INDEPENDENT-SEGMENTS lets
/// the player recover from those per segment instead of giving up.
pub fn synthesize(id: &VideoId, count: u32) -> String {
    let mut doc = String::new();
    doc.push_str("#EXTM3U\n");
    doc.push_str("#EXT-X-PLAYLIST-TYPE:VOD\n");
    doc.push_str(&format!("#EXT-X-TARGETDURATION:{}\n", SEGMENT_DURATION_SECS));
    doc.push_str("#EXT-X-INDEPENDENT-SEGMENTS\n");
    for index in 1..=count {
        doc.push_str(&format!("#EXTINF:{},\n", SEGMENT_DURATION_SECS));
        doc.push_str(&segment_url(id, index));
        doc.push('\n');
    }
    doc.push_str("#EXT-X-ENDLIST\n");

    doc
}

/// Encode a playlist as an in-memory data URL, the form handed to an HLS
/// player when no origin will serve the document with CORS headers
pub fn to_data_url(playlist: &str) -> String {
    format!(
        "data:{};base64,{}",
        PLAYLIST_CONTENT_TYPE,
        STANDARD.encode(playlist)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::extract("ab12cd34ef56").unwrap()
    }

    #[test]
    fn three_segment_document() {
        let doc = synthesize(&id(), 3);
        let expected = "\
#EXTM3U
#EXT-X-PLAYLIST-TYPE:VOD
#EXT-X-TARGETDURATION:10
#EXT-X-INDEPENDENT-SEGMENTS
#EXTINF:10,
https://vodstore.b-cdn.net/library/ab12cd34ef56/segment-00001.ts
#EXTINF:10,
https://vodstore.b-cdn.net/library/ab12cd34ef56/segment-00002.ts
#EXTINF:10,
https://vodstore.b-cdn.net/library/ab12cd34ef56/segment-00003.ts
#EXT-X-ENDLIST
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn synthesis_is_idempotent() {
        assert_eq!(synthesize(&id(), 42), synthesize(&id(), 42));
    }

    #[test]
    fn parses_as_media_playlist() {
        let doc = synthesize(&id(), 17);
        let playlist = m3u8_rs::parse_media_playlist(doc.as_bytes()).unwrap().1;
        assert_eq!(playlist.segments.len(), 17);
        assert!(playlist.end_list);
        assert_eq!(playlist.target_duration, 10.0);
        assert!(matches!(
            playlist.playlist_type,
            Some(m3u8_rs::MediaPlaylistType::Vod)
        ));
        assert_eq!(playlist.segments[0].uri, segment_url(&id(), 1));
    }

    #[test]
    fn data_url_round_trips() {
        let doc = synthesize(&id(), 2);
        let url = to_data_url(&doc);
        let prefix = format!("data:{};base64,", PLAYLIST_CONTENT_TYPE);
        assert!(url.starts_with(&prefix));
        let decoded = STANDARD.decode(&url[prefix.len()..]).unwrap();
        assert_eq!(decoded, doc.as_bytes());
    }
}
