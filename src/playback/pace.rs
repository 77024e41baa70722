use std::{future::Future, time::Duration};

/// The pause taken after each step. Swapped out in tests so no real time
/// passes.
pub trait Pacer {
    fn pause(&self, interval: Duration) -> impl Future<Output = ()>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Parse a pause given in (possibly fractional) seconds. Negative and
/// non-finite values are refused.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("bad interval {s:?}: {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("bad interval {s:?}: {e}"))
}
