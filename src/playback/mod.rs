// src/playback/mod.rs

pub mod channel;
pub mod pace;
pub mod submit;

pub use channel::{validate, Channel, ChannelSpec, Span, CHANNEL_ID_PLACEHOLDER};
pub use pace::{parse_interval, Pacer, TokioPacer};
pub use submit::{HttpSubmitter, SubmitOutcome, Submitter};

use crate::{error::FeedResult, payload, rows::Rows};
use std::time::Duration;
use tracing::{error, info, warn};

/// Everything a run needs besides the rows and its I/O seams.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Sent in this order within each step.
    pub channels: Vec<Channel>,
    pub span: Span,
    /// Pause after each step.
    pub interval: Duration,
}

/// Tally of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub steps: usize,
    pub attempts: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl PlaybackReport {
    fn record(&mut self, outcome: &SubmitOutcome) {
        self.attempts += 1;
        match outcome {
            SubmitOutcome::Accepted(_) => self.accepted += 1,
            SubmitOutcome::Rejected(_) => self.rejected += 1,
            SubmitOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Replay `rows` to every channel in lockstep.
///
/// All channel ranges are validated first; on a range error nothing is sent.
/// Then, for each step `i`, every channel in declaration order gets the row
/// at `start + i` converted and submitted, one after another, followed by a
/// single pause of `config.interval`. Failed or rejected sends are logged
/// and the run carries on.
pub async fn run<S, P>(
    rows: &Rows,
    config: &PlaybackConfig,
    submitter: &S,
    pacer: &P,
) -> FeedResult<PlaybackReport>
where
    S: Submitter,
    P: Pacer,
{
    let steps = validate(&config.channels, config.span, rows.len())?;
    info!(
        steps,
        channels = config.channels.len(),
        total_rows = rows.len(),
        interval = ?config.interval,
        "starting playback"
    );

    let mut report = PlaybackReport::default();
    for step in 0..steps {
        for ch in &config.channels {
            // validated above: start >= 0 and start + step < rows.len()
            let index = ch.start as usize + step;
            debug_assert!(index < rows.len());
            let Some(row) = rows.get(index) else {
                continue;
            };
            let body = payload::convert(&row);
            info!(step, channel = ch.id, row = index, payload = %body, "sending");

            let outcome = submitter.submit(&ch.url, &body).await;
            match &outcome {
                SubmitOutcome::Accepted(status) => {
                    info!(channel = ch.id, row = index, status, "POST ok")
                }
                SubmitOutcome::Rejected(status) => {
                    warn!(channel = ch.id, row = index, status, url = %ch.url, "POST rejected")
                }
                SubmitOutcome::Failed(err) => {
                    error!(channel = ch.id, row = index, url = %ch.url, "POST failed: {}", err)
                }
            }
            report.record(&outcome);
        }
        report.steps += 1;
        pacer.pause(config.interval).await;
    }

    info!(
        steps = report.steps,
        attempts = report.attempts,
        accepted = report.accepted,
        rejected = report.rejected,
        failed = report.failed,
        "playback complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FeedError, payload::Payload, rows::read_rows};
    use serde_json::{json, Value};
    use std::{cell::RefCell, path::Path, rc::Rc};
    use tracing_subscriber::{fmt, EnvFilter};

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_target(false)
            .with_test_writer()
            .try_init();
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Send(String, Value),
        Pause(Duration),
    }

    /// Records sends and pauses on one shared timeline.
    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
        reply: Option<SubmitOutcome>,
    }

    impl Recorder {
        fn replying(reply: SubmitOutcome) -> Self {
            Self {
                reply: Some(reply),
                ..Self::default()
            }
        }

        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn sends(&self) -> Vec<(String, Value)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Send(url, body) => Some((url, body)),
                    Event::Pause(_) => None,
                })
                .collect()
        }
    }

    impl Submitter for Recorder {
        async fn submit(&self, url: &str, payload: &Payload) -> SubmitOutcome {
            let body = serde_json::to_value(payload).unwrap();
            self.events
                .borrow_mut()
                .push(Event::Send(url.to_string(), body));
            self.reply.clone().unwrap_or(SubmitOutcome::Accepted(200))
        }
    }

    impl Pacer for Recorder {
        async fn pause(&self, interval: Duration) {
            self.events.borrow_mut().push(Event::Pause(interval));
        }
    }

    fn sample_rows(n: usize) -> Rows {
        let mut text = String::from("seq,pw,stack\n");
        for i in 0..n {
            text.push_str(&format!("{i},{i}.5,S{i}\n"));
        }
        read_rows(text.as_bytes(), Path::new("sample.csv")).unwrap()
    }

    fn config(channels: &[(u32, i64)], span: Span) -> PlaybackConfig {
        PlaybackConfig {
            channels: channels
                .iter()
                .map(|&(id, start)| Channel::from_template(id, start, "http://sink/{pemfc_id}"))
                .collect(),
            span,
            interval: Duration::from_millis(250),
        }
    }

    #[tokio::test]
    async fn test_step_major_channel_minor_order() {
        init_logging();
        let rows = sample_rows(10);
        let cfg = config(&[(1, 0), (2, 4), (3, 7)], Span::Count(3));
        let rec = Recorder::default();

        let report = run(&rows, &cfg, &rec, &rec).await.unwrap();

        assert_eq!(report.steps, 3);
        assert_eq!(report.attempts, 9);
        assert_eq!(report.accepted, 9);

        let pause = Event::Pause(Duration::from_millis(250));
        let send = |id: u32, seq: i64| {
            Event::Send(
                format!("http://sink/{id}"),
                json!({"seq": seq, "PW": seq as f64 + 0.5, "stack": format!("S{seq}")}),
            )
        };
        assert_eq!(
            rec.events(),
            vec![
                send(1, 0),
                send(2, 4),
                send(3, 7),
                pause.clone(),
                send(1, 1),
                send(2, 5),
                send(3, 8),
                pause.clone(),
                send(1, 2),
                send(2, 6),
                send(3, 9),
                pause,
            ]
        );
    }

    #[tokio::test]
    async fn test_range_error_sends_nothing() {
        init_logging();
        let rows = sample_rows(10);
        let cfg = config(&[(1, 0), (2, 8)], Span::Count(3));
        let rec = Recorder::default();

        let err = run(&rows, &cfg, &rec, &rec).await.unwrap_err();

        assert!(matches!(err, FeedError::SpanOutOfRange { channel: 2, end: 11, .. }));
        assert!(rec.events().is_empty());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let rows = sample_rows(4);
        let cfg = config(&[(1, 0), (2, 2)], Span::Count(2));

        let rejected = Recorder::replying(SubmitOutcome::Rejected(503));
        let report = run(&rows, &cfg, &rejected, &rejected).await.unwrap();
        assert_eq!((report.attempts, report.rejected), (4, 4));

        let failed = Recorder::replying(SubmitOutcome::Failed("connection refused".into()));
        let report = run(&rows, &cfg, &failed, &failed).await.unwrap();
        assert_eq!((report.attempts, report.failed, report.steps), (4, 4, 2));
        assert_eq!(failed.sends().len(), 4);
    }

    #[tokio::test]
    async fn test_overlapping_channels_are_allowed() {
        let rows = sample_rows(3);
        let cfg = config(&[(1, 0), (2, 0)], Span::Count(3));
        let rec = Recorder::default();

        let report = run(&rows, &cfg, &rec, &rec).await.unwrap();

        assert_eq!(report.attempts, 6);
        let sends = rec.sends();
        assert_eq!(sends[0].1, sends[1].1);
    }

    #[tokio::test]
    async fn test_until_span_plays_start_to_end() {
        let rows = sample_rows(6);
        let cfg = config(&[(9, 2)], Span::Until(5));
        let rec = Recorder::default();

        let report = run(&rows, &cfg, &rec, &rec).await.unwrap();

        assert_eq!(report.steps, 3);
        let seqs: Vec<_> = rec.sends().into_iter().map(|(_, b)| b["seq"].clone()).collect();
        assert_eq!(seqs, [json!(2), json!(3), json!(4)]);
    }

    #[tokio::test]
    async fn test_zero_steps_neither_sends_nor_pauses() {
        let rows = sample_rows(2);
        let cfg = config(&[(1, 0)], Span::Count(0));
        let rec = Recorder::default();

        let report = run(&rows, &cfg, &rec, &rec).await.unwrap();

        assert_eq!(report, PlaybackReport::default());
        assert!(rec.events().is_empty());
    }
}
