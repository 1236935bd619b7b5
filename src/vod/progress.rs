use std::fmt::Display;

use futures::channel::mpsc;

use super::CountSource;

/// Human-readable discovery progress, reported out-of-band while a stream is
/// being prepared
#[derive(Clone, Debug)]
pub enum Progress {
    FetchingMetadata,
    MetadataDuration { seconds: f64 },
    Probing { index: u32, low: u32, high: u32 },
    Discovered { count: u32, source: CountSource },
    NoSegmentsFound,
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchingMetadata => write!(f, "Fetching video metadata"),
            Self::MetadataDuration { seconds } => {
                write!(f, "Video duration is {:.0} seconds", seconds)
            }
            Self::Probing { index, low, high } => {
                write!(f, "Probing segment {:05} (search window {}..{})", index, low, high)
            }
            Self::Discovered { count, source } => {
                write!(f, "Found {} segments via {}", count, source)
            }
            Self::NoSegmentsFound => write!(f, "No segments found"),
        }
    }
}

/// Sender half of the progress side channel. Sending never blocks and never
/// fails: a dropped receiver means the caller abandoned the run, and its
/// updates are simply discarded.
#[derive(Clone, Debug)]
pub struct ProgressSender(mpsc::UnboundedSender<Progress>);

impl ProgressSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Progress>) {
        let (tx, rx) = mpsc::unbounded();
        (Self(tx), rx)
    }

    pub fn send(&self, progress: Progress) {
        let _ = self.0.unbounded_send(progress);
    }
}
