use std::fmt::Display;

use reqwest::Url;

/// Length of the CDN's video id tokens
const TOKEN_LEN: usize = 12;

/// URLs containing this path marker carry the id as the first token instead
/// of the last. Quirk of the two page-URL shapes in the wild, kept verbatim
/// for compatibility.
const FIRST_TOKEN_MARKER: &str = "commentary";

/// Opaque token addressing a video's segment directory on the CDN
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VideoId(String);

impl VideoId {
    /// Extract a video id from a page URL or a bare token.
    ///
    /// Candidates are the exactly-12-character alphanumeric runs in the URL
    /// path. With the commentary marker in the path the first candidate wins,
    /// otherwise the last one does.
    pub fn extract(input: &str) -> Option<Self> {
        let input = input.trim();
        if is_token(input) {
            return Some(Self(input.to_owned()));
        }

        let path = match Url::parse(input) {
            Ok(url) => url.path().to_owned(),
            Err(_) => input.to_owned(),
        };

        let mut candidates = path
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| is_token(t));
        let id = if path.contains(FIRST_TOKEN_MARKER) {
            candidates.next()
        } else {
            candidates.last()
        };
        id.map(|t| Self(t.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ids are fixed length, alphanumeric, and always mix letters and digits
fn is_token(s: &str) -> bool {
    s.len() == TOKEN_LEN
        && s.chars().all(|c| c.is_ascii_alphanumeric())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| c.is_ascii_alphabetic())
}
