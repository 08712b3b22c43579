use crate::view_model::{AppViewModel, ArticleRowView};
use crate::{
    Completion, DateFormatter, InputValidator, SearchError, SearchResponse, SearchSession,
    SearchStatus, SearchTicket, SubmissionId, TimeWindow, ValidationError,
};

/// What the frontend last learned about the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendReachability {
    #[default]
    Unknown,
    Reachable { detail: String },
    Unreachable { detail: String },
}

/// Frontend state: the search form plus the single [`SearchSession`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    topic_input: String,
    window: TimeWindow,
    validator: InputValidator,
    formatter: DateFormatter,
    session: SearchSession,
    notice: Option<String>,
    backend: BackendReachability,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(
        validator: InputValidator,
        formatter: DateFormatter,
        window: TimeWindow,
    ) -> Self {
        Self {
            validator,
            formatter,
            window,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let snapshot = self.session.snapshot();
        let articles = snapshot
            .results
            .iter()
            .enumerate()
            .map(|(index, article)| ArticleRowView {
                position: index + 1,
                title: article.title.clone(),
                description: article.description.clone(),
                source: article.source.clone(),
                published: self.formatter.format(&article.published_at),
                url: article.url.clone(),
                image_url: article.image_url.clone(),
            })
            .collect();
        let is_empty_result =
            snapshot.status == SearchStatus::Success && snapshot.results.is_empty();

        AppViewModel {
            topic_input: self.topic_input.clone(),
            window: self.window,
            can_submit: snapshot.status != SearchStatus::Loading,
            is_empty_result,
            articles,
            session: snapshot,
            notice: self.notice.clone(),
            backend: self.backend.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_topic_input(&mut self, text: String) {
        if self.topic_input != text {
            self.topic_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_window(&mut self, window: TimeWindow) {
        if self.window != window {
            self.window = window;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_search(&mut self) -> Result<SearchTicket, ValidationError> {
        let outcome = self
            .session
            .begin(&self.validator, &self.topic_input, self.window);
        self.notice = match &outcome {
            Ok(_) => None,
            Err(err) => Some(err.to_string()),
        };
        self.mark_dirty();
        outcome
    }

    pub(crate) fn apply_result(
        &mut self,
        submission: SubmissionId,
        result: Result<SearchResponse, SearchError>,
    ) {
        if self.session.complete(submission, result) == Completion::Applied {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_backend(&mut self, backend: BackendReachability) {
        if self.backend != backend {
            self.backend = backend;
            self.mark_dirty();
        }
    }
}
