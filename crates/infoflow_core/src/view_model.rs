use crate::{BackendReachability, SessionSnapshot, TimeWindow};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub topic_input: String,
    pub window: TimeWindow,
    pub session: SessionSnapshot,
    pub articles: Vec<ArticleRowView>,
    /// Prompt left by a rejected submission; never part of the session.
    pub notice: Option<String>,
    pub backend: BackendReachability,
    /// False while a search is in flight so the trigger can be disabled.
    pub can_submit: bool,
    /// The last search succeeded but found nothing.
    pub is_empty_result: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRowView {
    pub position: usize,
    pub title: String,
    pub description: String,
    pub source: String,
    pub published: String,
    pub url: String,
    pub image_url: Option<String>,
}
