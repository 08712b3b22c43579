#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckBackend,
    RunSearch {
        submission: crate::SubmissionId,
        query: crate::SearchQuery,
    },
}
