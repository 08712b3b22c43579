use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use infoflow_core::{
    Article, SearchError, SearchQuery, SearchResponse, SearchStatus, TimeWindow,
    ValidationError, CONNECTION_FAILURE_MESSAGE,
};
use infoflow_engine::{
    ClientSettings, ReqwestSearchClient, SearchClient, SearchService, SubmitOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(infoflow_logging::initialize_for_tests);
}

fn page(topic: &str, count: usize) -> SearchResponse {
    SearchResponse {
        articles: (1..=count)
            .map(|n| Article {
                title: format!("{topic} {n}"),
                url: format!("https://example.com/{topic}/{n}"),
                ..Article::default()
            })
            .collect(),
        total_count: count as u64,
    }
}

/// Answers per topic after a per-topic delay and counts calls.
#[derive(Default)]
struct ScriptedClient {
    delays: HashMap<String, Duration>,
    failures: HashMap<String, SearchError>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn delay(mut self, topic: &str, delay: Duration) -> Self {
        self.delays.insert(topic.to_string(), delay);
        self
    }

    fn fail(mut self, topic: &str, err: SearchError) -> Self {
        self.failures.insert(topic.to_string(), err);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchClient for ScriptedClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(query.topic()) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(query.topic()) {
            Some(err) => Err(err.clone()),
            None => Ok(page(query.topic(), 5)),
        }
    }
}

/// Holds every search until the test opens the gate.
struct GatedClient {
    gate: Arc<Notify>,
}

#[async_trait::async_trait]
impl SearchClient for GatedClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        self.gate.notified().await;
        Ok(page(query.topic(), 3))
    }
}

/// Starts a submission in the background and returns once it is in flight.
async fn spawn_and_wait_for_loading<C>(
    service: &Arc<SearchService<C>>,
    topic: &'static str,
) -> JoinHandle<Result<SubmitOutcome, ValidationError>>
where
    C: SearchClient + 'static,
{
    let handle = {
        let service = service.clone();
        tokio::spawn(async move { service.submit(topic, TimeWindow::LastWeek).await })
    };
    loop {
        let snapshot = service.snapshot();
        let in_flight = snapshot.status == SearchStatus::Loading
            && snapshot.query.as_ref().map(SearchQuery::topic) == Some(topic);
        if in_flight {
            return handle;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test]
async fn successful_submit_reaches_success() {
    init_logging();
    let service = SearchService::new(ScriptedClient::default());

    let outcome = service.submit("tecnologia", TimeWindow::LastWeek).await;

    assert_eq!(outcome, Ok(SubmitOutcome::Applied { submission: 1 }));
    let snapshot = service.snapshot();
    assert_eq!(snapshot.status, SearchStatus::Success);
    assert_eq!(snapshot.results.len(), 5);
    assert_eq!(snapshot.total_count, 5);
    assert_eq!(snapshot.results, page("tecnologia", 5).articles);
}

#[tokio::test]
async fn blank_topic_never_reaches_client() {
    let service = SearchService::new(ScriptedClient::default());
    service.submit("tecnologia", TimeWindow::LastWeek).await.unwrap();
    let before = service.snapshot();

    for raw in ["", "   ", "\t\n"] {
        let outcome = service.submit(raw, TimeWindow::LastYear).await;
        assert_eq!(outcome, Err(ValidationError::EmptyTopic));
    }

    assert_eq!(service.client().calls(), 1);
    assert_eq!(service.snapshot(), before);
}

#[tokio::test]
async fn connection_failure_enters_error() {
    init_logging();
    let client = ScriptedClient::default().fail(
        "tecnologia",
        SearchError::Connection("connection refused".to_string()),
    );
    let service = SearchService::new(client);

    service.submit("tecnologia", TimeWindow::LastWeek).await.unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.status, SearchStatus::Error);
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some(CONNECTION_FAILURE_MESSAGE)
    );
    assert!(snapshot.results.is_empty());
}

#[tokio::test]
async fn loading_snapshot_never_shows_old_results() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let service = Arc::new(SearchService::new(GatedClient { gate: gate.clone() }));

    gate.notify_one();
    service.submit("primeiro", TimeWindow::LastWeek).await.unwrap();
    assert_eq!(service.snapshot().results.len(), 3);

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.submit("segundo", TimeWindow::LastWeek).await })
    };

    while service.snapshot().status != SearchStatus::Loading {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let loading = service.snapshot();
    assert!(loading.results.is_empty());
    assert_eq!(loading.total_count, 0);
    assert!(loading.error_message.is_none());
    assert_eq!(loading.query.unwrap().topic(), "segundo");

    gate.notify_one();
    let outcome = pending.await.unwrap();
    assert_eq!(outcome, Ok(SubmitOutcome::Applied { submission: 2 }));
    assert_eq!(service.snapshot().results, page("segundo", 3).articles);
}

#[tokio::test]
async fn slow_earlier_submission_does_not_clobber_later_one() {
    init_logging();
    let client = ScriptedClient::default()
        .delay("lento", Duration::from_millis(300))
        .delay("rapido", Duration::from_millis(10));
    let service = Arc::new(SearchService::new(client));

    let slow = spawn_and_wait_for_loading(&service, "lento").await;
    let fast = service.submit("rapido", TimeWindow::LastWeek).await;
    let slow = slow.await.unwrap();

    assert_eq!(slow, Ok(SubmitOutcome::Superseded { submission: 1 }));
    assert_eq!(fast, Ok(SubmitOutcome::Applied { submission: 2 }));
    let snapshot = service.snapshot();
    assert_eq!(snapshot.status, SearchStatus::Success);
    assert_eq!(snapshot.query.unwrap().topic(), "rapido");
    assert_eq!(snapshot.results, page("rapido", 5).articles);
}

#[tokio::test]
async fn identical_submissions_give_identical_snapshots() {
    let service = SearchService::new(ScriptedClient::default());

    service.submit("tecnologia", TimeWindow::LastWeek).await.unwrap();
    let first = service.snapshot();
    service.submit("tecnologia", TimeWindow::LastWeek).await.unwrap();

    assert_eq!(service.snapshot(), first);
}

#[tokio::test]
async fn stale_http_reply_is_discarded_end_to_end() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/news/search"))
        .and(body_partial_json(json!({ "tema": "lento" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({
                    "success": true,
                    "artigos": [ { "titulo": "old" } ],
                    "total_artigos": 1
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/news/search"))
        .and(body_partial_json(json!({ "tema": "rapido" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "quota exceeded"
        })))
        .mount(&server)
        .await;

    let client = ReqwestSearchClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .unwrap();
    let service = Arc::new(SearchService::new(client));

    let slow = spawn_and_wait_for_loading(&service, "lento").await;
    let fast = service.submit("rapido", TimeWindow::LastWeek).await;
    let slow = slow.await.unwrap();

    assert!(matches!(slow, Ok(SubmitOutcome::Superseded { .. })));
    assert!(matches!(fast, Ok(SubmitOutcome::Applied { .. })));
    let snapshot = service.snapshot();
    assert_eq!(snapshot.status, SearchStatus::Error);
    assert_eq!(snapshot.error_message.as_deref(), Some("quota exceeded"));
    assert!(snapshot.results.is_empty());
}
