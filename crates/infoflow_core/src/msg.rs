#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Frontend finished its setup.
    Started,
    /// User edited the topic input.
    TopicChanged(String),
    /// User picked a recency window.
    WindowSelected(crate::TimeWindow),
    /// User asked to search for the current topic and window.
    SearchSubmitted,
    /// Engine finished a search.
    SearchCompleted {
        submission: crate::SubmissionId,
        result: Result<crate::SearchResponse, crate::SearchError>,
    },
    /// Engine finished a health check.
    BackendChecked { reachable: bool, detail: String },
}
