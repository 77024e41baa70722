use crate::payload::Payload;
use reqwest::{Client, StatusCode};
use std::future::Future;

/// Result of one send attempt. None of these stop a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server answered 200 or 201.
    Accepted(u16),
    /// The server answered with any other status.
    Rejected(u16),
    /// No response: connection refused, DNS failure, invalid URL, timeout.
    Failed(String),
}

impl SubmitOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            code @ (200 | 201) => SubmitOutcome::Accepted(code),
            code => SubmitOutcome::Rejected(code),
        }
    }
}

/// Delivers one payload to one destination.
pub trait Submitter {
    fn submit(&self, url: &str, payload: &Payload) -> impl Future<Output = SubmitOutcome>;
}

/// JSON `POST` over a shared `reqwest` client, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpSubmitter {
    client: Client,
}

impl HttpSubmitter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Submitter for HttpSubmitter {
    async fn submit(&self, url: &str, payload: &Payload) -> SubmitOutcome {
        // `.json()` sets `Content-Type: application/json`
        match self.client.post(url).json(payload).send().await {
            Ok(resp) => SubmitOutcome::from_status(resp.status()),
            Err(e) => SubmitOutcome::Failed(e.to_string()),
        }
    }
}
