use chrono::{Days, NaiveDate};
use infoflow_core::{AppViewModel, ArticleRowView, BackendReachability, SearchStatus, TimeWindow};

pub const PROMPT: &str = "topic> ";

/// Full redraw of the search screen.
pub fn render(view: &AppViewModel, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![
        format!(
            "InfoFlow | window: {} ({}) | backend: {}",
            view.window,
            since_label(view.window, today),
            backend_label(&view.backend)
        ),
        String::new(),
    ];

    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    let session = &view.session;
    let topic = session
        .query
        .as_ref()
        .map(|query| query.topic().to_string())
        .unwrap_or_default();
    let window_label = session
        .query
        .as_ref()
        .map(|query| query.window().label())
        .unwrap_or_default();

    match session.status {
        SearchStatus::Idle => {
            lines.push("Type a topic and press Enter to search the news.".to_string());
        }
        SearchStatus::Loading => {
            lines.push(format!("Searching \"{topic}\" ({window_label})..."));
        }
        SearchStatus::Error => {
            let message = session.error_message.as_deref().unwrap_or_default();
            lines.push(format!("Error: {message}"));
        }
        SearchStatus::Success if view.is_empty_result => {
            lines.push(format!(
                "No news found for \"{topic}\" in the selected period. \
                 Try another topic or time window."
            ));
        }
        SearchStatus::Success => {
            lines.push(format!(
                "Showing {} of {} articles for \"{topic}\" ({window_label})",
                view.articles.len(),
                session.total_count
            ));
            for row in &view.articles {
                lines.push(String::new());
                lines.extend(format_article(row));
            }
        }
    }

    lines
}

pub fn render_windows(selected: TimeWindow) -> Vec<String> {
    TimeWindow::ALL
        .iter()
        .enumerate()
        .map(|(index, window)| {
            let marker = if *window == selected { '*' } else { ' ' };
            format!("{marker} {}. {} [{}]", index + 1, window.label(), window.code())
        })
        .collect()
}

pub fn render_help() -> Vec<String> {
    vec![
        "Type a topic and press Enter to search.".to_string(),
        "  :w <code|1-4>  select the time window".to_string(),
        "  :windows       list time windows".to_string(),
        "  :help          show this help".to_string(),
        "  :q             quit".to_string(),
    ]
}

fn format_article(row: &ArticleRowView) -> Vec<String> {
    let mut lines = vec![
        format!("{:>2}. {}", row.position, row.title),
        format!("    {} | {}", row.source, row.published),
    ];
    if !row.description.is_empty() {
        lines.push(format!("    {}", row.description));
    }
    lines.push(format!("    {}", row.url));
    lines
}

fn since_label(window: TimeWindow, today: NaiveDate) -> String {
    today
        .checked_sub_days(Days::new(u64::from(window.lookback_days())))
        .map(|since| format!("since {}", since.format("%d/%m/%Y")))
        .unwrap_or_default()
}

fn backend_label(backend: &BackendReachability) -> String {
    match backend {
        BackendReachability::Unknown => "checking".to_string(),
        BackendReachability::Reachable { detail } => format!("up ({detail})"),
        BackendReachability::Unreachable { detail } => format!("unreachable ({detail})"),
    }
}
