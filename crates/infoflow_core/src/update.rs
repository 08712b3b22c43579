use crate::{AppState, BackendReachability, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::CheckBackend],
        Msg::TopicChanged(text) => {
            state.set_topic_input(text);
            Vec::new()
        }
        Msg::WindowSelected(window) => {
            state.select_window(window);
            Vec::new()
        }
        Msg::SearchSubmitted => match state.begin_search() {
            Ok(ticket) => vec![Effect::RunSearch {
                submission: ticket.submission,
                query: ticket.query,
            }],
            // The notice is set; the session and its results stay as they were.
            Err(_) => Vec::new(),
        },
        Msg::SearchCompleted { submission, result } => {
            state.apply_result(submission, result);
            Vec::new()
        }
        Msg::BackendChecked { reachable, detail } => {
            let backend = if reachable {
                BackendReachability::Reachable { detail }
            } else {
                BackendReachability::Unreachable { detail }
            };
            state.set_backend(backend);
            Vec::new()
        }
    };

    (state, effects)
}
