//! Digital Asset Links probe.
//!
//! App links advertise domain ownership through a well-known JSON file on
//! the declared host. The probe is best effort: the wait is bounded and
//! every transport failure maps to `Unreachable` so an offline machine can
//! still complete an audit.

use std::time::Duration;
use tenken_policy::{LinkVerifier, VerificationStatus};
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpLinkVerifier {
    client: reqwest::blocking::Client,
}

impl HttpLinkVerifier {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl LinkVerifier for HttpLinkVerifier {
    fn verify(&self, host: &str) -> VerificationStatus {
        let url = format!("https://{host}/.well-known/assetlinks.json");
        match self.client.get(&url).send() {
            Ok(response) if response.status().is_success() => VerificationStatus::Verified,
            Ok(response) => {
                debug!(host, status = %response.status(), "assetlinks probe refused");
                VerificationStatus::NotFound
            }
            Err(error) => {
                debug!(host, %error, "assetlinks probe failed");
                VerificationStatus::Unreachable
            }
        }
    }
}
