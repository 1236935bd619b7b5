use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies, RetryTransientMiddleware};
use tracing::{event, Level};

use super::RELAY_BASE;
use crate::cli::NetworkOptions;
use crate::error::SegprobeError;

/// HTTP client that rewrites every request through a public CORS relay,
/// since the CDN grants no cross-origin reads of its own
#[derive(Clone, Debug)]
pub struct RelayedClient {
    client: ClientWithMiddleware,
    relay: Url,
}

impl RelayedClient {
    pub fn new(network_options: &NetworkOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network_options.timeout))
            .build()?;
        let retry_policy = policies::ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(10))
            .backoff_exponent(2)
            .build_with_max_retries(network_options.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let relay = Url::parse(RELAY_BASE).map_err(SegprobeError::Relay)?;

        Ok(Self { client, relay })
    }

    /// Target URL wrapped in the relay's url= query parameter
    fn relayed(&self, target: &str) -> Url {
        let mut url = self.relay.clone();
        url.query_pairs_mut().append_pair("url", target);
        url
    }

    /// Fetch a document through the relay
    pub async fn fetch_bytes(&self, target: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(self.relayed(target)).send().await?;
        if !resp.status().is_success() {
            return Err(
                SegprobeError::NetworkRequest(resp.status().as_u16(), target.to_owned()).into(),
            );
        }
        let bytes = resp.bytes().await?.into_iter().collect();

        Ok(bytes)
    }

    /// Existence check: request the first byte only, any 2xx means the
    /// segment is there. Network errors count as absence; the retry
    /// middleware has already given transient failures a bounded number of
    /// second chances by the time this reports false.
    pub async fn segment_exists(&self, target: &str) -> bool {
        let resp = self
            .client
            .get(self.relayed(target))
            .header(header::RANGE, "bytes=0-0")
            .send()
            .await;

        match resp {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                event!(Level::WARN, "probe failed for {}: {}", target, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_wraps_target() {
        let client = RelayedClient::new(&NetworkOptions {
            max_retries: 0,
            timeout: 1,
        })
        .unwrap();
        let url = client.relayed("https://cdn.example.com/a/b.ts");
        assert!(url.as_str().starts_with(RELAY_BASE));
        assert_eq!(
            url.query_pairs().next(),
            Some(("url".into(), "https://cdn.example.com/a/b.ts".into()))
        );
    }
}
