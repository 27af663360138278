use std::fmt;
use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceUnavailable>;

/// One upstream call failed. The failover layer recovers from this by asking
/// the other provider.
#[derive(Debug, Error)]
pub enum SourceUnavailable {
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("malformed payload from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("no rows returned for {what}")]
    Empty { what: String },
    #[error("{source_name} does not know team {team}")]
    UnknownTeam {
        source_name: &'static str,
        team: String,
    },
}

impl SourceUnavailable {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceUnavailable::Timeout {
                url: url.to_owned(),
            }
        } else if err.is_decode() {
            SourceUnavailable::Malformed {
                url: url.to_owned(),
                reason: err.to_string(),
            }
        } else {
            SourceUnavailable::Network {
                url: url.to_owned(),
                source: err,
            }
        }
    }
}

/// The logical query being served, carried in failover errors and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    TeamStats { year: i32 },
    Standings { year: i32 },
    Schedule { year: i32, team: String },
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::TeamStats { year } => write!(f, "team stats for {year}"),
            Query::Standings { year } => write!(f, "standings for {year}"),
            Query::Schedule { year, team } => write!(f, "{year} schedule for {team}"),
        }
    }
}

/// Both providers failed for one query. Shown as "data not available" on the
/// affected panel only.
#[derive(Debug, Error)]
#[error("{query} not available (primary: {primary}; secondary: {secondary})")]
pub struct DataUnavailable {
    pub query: Query,
    pub primary: SourceUnavailable,
    pub secondary: SourceUnavailable,
}

/// What kind of row failed to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedKind {
    StandingsLine,
    StandingsRow,
    ScheduleRow,
    Date,
    StatRow,
}

/// A row that was skipped or passed through unparsed. Collected alongside
/// the result; never returned as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} could not be normalized: {input:?}")]
pub struct ParseDegraded {
    pub kind: DegradedKind,
    pub input: String,
}

impl ParseDegraded {
    pub fn new(kind: DegradedKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// The team had no decided games one week ago, so there is no win % to
/// compare against. Callers omit the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no decided games as of one week ago")]
pub struct DegenerateWindow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("season {season} is not the current season ({current}); last-7-days analysis skipped")]
    NotCurrentSeason { season: i32, current: i32 },
}

/// Logo fetch failed; the palette falls back to the neutral triple.
#[derive(Debug, Error)]
pub enum AssetUnavailable {
    #[error("logo request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("no team id for {0}")]
    UnknownTeam(String),
}
