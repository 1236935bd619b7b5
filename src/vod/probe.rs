use std::future::Future;

use super::progress::{Progress, ProgressSender};

/// Upper bound on the segment index space: 600 ten-second segments, 100
/// minutes of video. Caps the worst case at ceil(log2(600)) + 1 = 11 probes.
pub const PROBE_CEILING: u32 = 600;

/// Binary search for the last existing segment index, 1-based.
///
/// `probe` answers "does segment i exist". Correctness relies on existence
/// being monotonic: segments 1..N exist and N+1.. do not. A CDN serving gaps
/// makes the search undercount.
///
/// Returns `None` if no segment ever answered, which callers must distinguish
/// from a zero-length video (the CDN hosts none of those).
pub async fn discover_last_segment<F, Fut>(progress: &ProgressSender, probe: F) -> Option<u32>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut low = 1;
    let mut high = PROBE_CEILING;
    let mut best = None;

    // Sequential by nature: each answer picks the next midpoint
    while low <= high {
        let mid = low + (high - low) / 2;
        progress.send(Progress::Probing {
            index: mid,
            low,
            high,
        });
        if probe(mid).await {
            best = Some(mid);
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Probe against a pretend CDN where segments 1..=n exist, counting calls
    async fn search(n: u32) -> (Option<u32>, u32) {
        let (progress, _rx) = ProgressSender::channel();
        let probes = Cell::new(0);
        let found = discover_last_segment(&progress, |i| {
            probes.set(probes.get() + 1);
            async move { i <= n }
        })
        .await;
        (found, probes.get())
    }

    #[tokio::test]
    async fn finds_exact_count_for_every_n() {
        for n in 1..=PROBE_CEILING {
            let (found, probes) = search(n).await;
            assert_eq!(found, Some(n), "wrong count for n={}", n);
            assert!(probes <= 11, "{} probes for n={}", probes, n);
        }
    }

    #[tokio::test]
    async fn no_segments_returns_none() {
        let (found, probes) = search(0).await;
        assert_eq!(found, None);
        assert!(probes <= 11);
    }

    #[tokio::test]
    async fn full_video_hits_ceiling() {
        let (found, _) = search(PROBE_CEILING).await;
        assert_eq!(found, Some(PROBE_CEILING));
    }
}
