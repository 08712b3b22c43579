//! InfoFlow core: search-session state machine, validation and view-model helpers.
mod article;
mod date_format;
mod effect;
mod msg;
mod query;
mod search;
mod session;
mod state;
mod update;
mod view_model;
mod window;

pub use article::Article;
pub use date_format::{DateFormatter, DATE_UNAVAILABLE};
pub use effect::Effect;
pub use msg::Msg;
pub use query::{
    InputValidator, SearchQuery, ValidationError, DEFAULT_MAX_RESULTS, MAX_RESULTS_CAP,
};
pub use search::{
    SearchError, SearchResponse, CONNECTION_FAILURE_MESSAGE, PROTOCOL_FAILURE_MESSAGE,
    SEARCH_FAILED_MESSAGE,
};
pub use session::{
    Completion, SearchSession, SearchStatus, SearchTicket, SessionSnapshot, SubmissionId,
};
pub use state::{AppState, BackendReachability};
pub use update::update;
pub use view_model::{AppViewModel, ArticleRowView};
pub use window::{TimeWindow, UnknownTimeWindow};
