use infoflow_logging::{flow_debug, flow_info, flow_warn};

use crate::{
    Article, InputValidator, SearchError, SearchQuery, SearchResponse, TimeWindow,
    ValidationError,
};

/// Monotonic id of a submission within one session.
pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Handed out by [`SearchSession::begin`]; the holder runs the query and
/// reports back with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub submission: SubmissionId,
    pub query: SearchQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The result belonged to a superseded submission and was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Loading,
    Success {
        articles: Vec<Article>,
        total_count: u64,
    },
    Failed {
        message: String,
    },
}

/// Read-only copy of the session for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub status: SearchStatus,
    pub query: Option<SearchQuery>,
    pub results: Vec<Article>,
    pub total_count: u64,
    pub error_message: Option<String>,
}

/// State of the current (or most recent) search attempt.
///
/// Results only exist in the `Success` phase and the error message only in
/// the `Error` phase, so stale data can never sit next to a `Loading` status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSession {
    phase: Phase,
    query: Option<SearchQuery>,
    latest: SubmissionId,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the input and, if valid, clears prior results and enters
    /// `Loading`. An invalid topic leaves the session untouched.
    pub fn begin(
        &mut self,
        validator: &InputValidator,
        raw_topic: &str,
        window: TimeWindow,
    ) -> Result<SearchTicket, ValidationError> {
        let query = validator.validate(raw_topic, window)?;

        if self.phase == Phase::Loading {
            flow_debug!(
                "submission {} superseded before completing",
                self.latest
            );
        }

        self.latest += 1;
        self.phase = Phase::Loading;
        self.query = Some(query.clone());

        flow_info!(
            "search submitted id={} window={} topic_len={}",
            self.latest,
            query.window().code(),
            query.topic().len()
        );
        flow_debug!("search topic id={} topic={:?}", self.latest, query.topic());

        Ok(SearchTicket {
            submission: self.latest,
            query,
        })
    }

    /// Applies the outcome of `submission` if it is still the latest one.
    pub fn complete(
        &mut self,
        submission: SubmissionId,
        result: Result<SearchResponse, SearchError>,
    ) -> Completion {
        if submission != self.latest || self.phase != Phase::Loading {
            flow_debug!(
                "discarding stale result id={} latest={}",
                submission,
                self.latest
            );
            return Completion::Stale;
        }

        self.phase = match result {
            Ok(response) => {
                flow_info!(
                    "search succeeded id={} articles={} total={}",
                    submission,
                    response.articles.len(),
                    response.total_count
                );
                Phase::Success {
                    articles: response.articles,
                    total_count: response.total_count,
                }
            }
            Err(err) => {
                flow_warn!("search failed id={}: {}", submission, err);
                Phase::Failed {
                    message: err.user_message(),
                }
            }
        };
        Completion::Applied
    }

    pub fn status(&self) -> SearchStatus {
        match self.phase {
            Phase::Idle => SearchStatus::Idle,
            Phase::Loading => SearchStatus::Loading,
            Phase::Success { .. } => SearchStatus::Success,
            Phase::Failed { .. } => SearchStatus::Error,
        }
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn results(&self) -> &[Article] {
        match &self.phase {
            Phase::Success { articles, .. } => articles,
            _ => &[],
        }
    }

    pub fn total_count(&self) -> u64 {
        match self.phase {
            Phase::Success { total_count, .. } => total_count,
            _ => 0,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn latest_submission(&self) -> SubmissionId {
        self.latest
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            query: self.query.clone(),
            results: self.results().to_vec(),
            total_count: self.total_count(),
            error_message: self.error_message().map(ToOwned::to_owned),
        }
    }
}
