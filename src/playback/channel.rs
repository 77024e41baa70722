use crate::error::{FeedError, FeedResult};
use std::str::FromStr;

/// Placeholder in a URL template that is replaced by the channel id.
pub const CHANNEL_ID_PLACEHOLDER: &str = "{pemfc_id}";

/// One destination replayed in lockstep with the others: rows are read
/// from `start` onward and posted to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: u32,
    pub start: i64,
    pub url: String,
}

impl Channel {
    /// Build a channel whose URL is `template` with every `{pemfc_id}`
    /// replaced by `id`.
    pub fn from_template(id: u32, start: i64, template: &str) -> Self {
        Self {
            id,
            start,
            url: template.replace(CHANNEL_ID_PLACEHOLDER, &id.to_string()),
        }
    }
}

/// `ID:START` pair as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: u32,
    pub start: i64,
}

impl FromStr for ChannelSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, start) = s
            .split_once(':')
            .ok_or_else(|| format!("expected ID:START, got {s:?}"))?;
        let id = id
            .trim()
            .parse()
            .map_err(|e| format!("bad channel id {id:?}: {e}"))?;
        let start = start
            .trim()
            .parse()
            .map_err(|e| format!("bad start index {start:?}: {e}"))?;
        Ok(Self { id, start })
    }
}

/// How many steps to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// `offset` rows per channel, starting at each channel's own start.
    Count(usize),
    /// Rows `start..end`; `end` is exclusive. Meant for a single channel,
    /// with several the shortest range wins.
    Until(i64),
}

/// Check every channel's read range against `total` rows, in declaration
/// order, and return the number of steps to play.
///
/// Overlapping ranges between channels are allowed.
pub fn validate(channels: &[Channel], span: Span, total: usize) -> FeedResult<usize> {
    let total_i = i64::try_from(total).unwrap_or(i64::MAX);
    let mut steps = match span {
        Span::Count(n) => n,
        Span::Until(_) if channels.is_empty() => 0,
        Span::Until(_) => usize::MAX,
    };

    for ch in channels {
        if ch.start < 0 {
            return Err(FeedError::StartOutOfRange {
                channel: ch.id,
                start: ch.start,
            });
        }
        let end = match span {
            Span::Count(n) => ch.start.saturating_add(i64::try_from(n).unwrap_or(i64::MAX)),
            Span::Until(end) => end,
        };
        if end > total_i {
            return Err(FeedError::SpanOutOfRange {
                channel: ch.id,
                start: ch.start,
                end,
                total,
            });
        }
        if let Span::Until(end) = span {
            // start past end plays nothing
            steps = steps.min(usize::try_from(end - ch.start).unwrap_or(0));
        }
    }

    Ok(steps)
}
