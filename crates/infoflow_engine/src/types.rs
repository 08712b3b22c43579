use infoflow_core::{SearchError, SearchResponse, SubmissionId};

/// Reply of the backend health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }

    /// Short human description, e.g. `InfoFlow News API 1.0.0`.
    pub fn describe(&self) -> String {
        match (self.service.is_empty(), self.version.is_empty()) {
            (false, false) => format!("{} {}", self.service, self.version),
            (false, true) => self.service.clone(),
            _ => format!("status {}", self.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SearchCompleted {
        submission: SubmissionId,
        result: Result<SearchResponse, SearchError>,
    },
    HealthChecked(Result<HealthStatus, SearchError>),
}
