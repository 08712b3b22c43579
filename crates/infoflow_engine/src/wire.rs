//! JSON schema of the news backend and its mapping onto core types.
use infoflow_core::{Article, SearchError, SearchQuery, SearchResponse, TimeWindow};
use infoflow_logging::{flow_debug, flow_warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::HealthStatus;

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequestBody<'a> {
    tema: &'a str,
    janela_tempo: &'static str,
    max_articles: u32,
}

impl<'a> From<&'a SearchQuery> for SearchRequestBody<'a> {
    fn from(query: &'a SearchQuery) -> Self {
        Self {
            tema: query.topic(),
            janela_tempo: query.window().code(),
            max_articles: query.max_results(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSearchResponse {
    #[serde(default)]
    success: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    tema: Option<Value>,
    #[serde(default)]
    janela_tempo: Option<Value>,
    #[serde(default)]
    total_artigos: Option<Value>,
    #[serde(default)]
    artigos: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    #[serde(default, deserialize_with = "lenient_text")]
    titulo: String,
    #[serde(default, deserialize_with = "lenient_text")]
    descricao: String,
    #[serde(default, deserialize_with = "lenient_text")]
    fonte: String,
    #[serde(default, deserialize_with = "lenient_text")]
    data_publicacao: String,
    #[serde(default, deserialize_with = "lenient_text")]
    url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    imagem: String,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        let image_url = Some(wire.imagem).filter(|url| !url.trim().is_empty());
        Article {
            title: wire.titulo,
            description: wire.descricao,
            source: wire.fonte,
            published_at: wire.data_publicacao,
            url: wire.url,
            image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireFailure {
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireHealth {
    #[serde(default, deserialize_with = "lenient_text")]
    status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    service: String,
    #[serde(default, deserialize_with = "lenient_text")]
    version: String,
}

/// Classifies a search reply by status code and body.
pub(crate) fn decode_search_response(
    status: u16,
    body: &[u8],
    query: &SearchQuery,
) -> Result<SearchResponse, SearchError> {
    if !(200..300).contains(&status) {
        return Err(SearchError::backend(Some(status), failure_message(body)));
    }

    let wire: WireSearchResponse = serde_json::from_slice(body)
        .map_err(|err| SearchError::Protocol(err.to_string()))?;

    if !matches!(wire.success, Some(Value::Bool(true))) {
        return Err(SearchError::backend(
            None,
            wire.error.as_ref().and_then(value_text),
        ));
    }

    check_echo(&wire, query);

    let articles: Vec<Article> = wire
        .artigos
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_article(index, entry))
        .collect();
    let total_count = wire
        .total_artigos
        .as_ref()
        .and_then(value_count)
        .unwrap_or(articles.len() as u64);

    flow_debug!(
        "decoded search reply status={} articles={} total={}",
        status,
        articles.len(),
        total_count
    );
    Ok(SearchResponse {
        articles,
        total_count,
    })
}

pub(crate) fn decode_health_response(status: u16, body: &[u8]) -> Result<HealthStatus, SearchError> {
    if !(200..300).contains(&status) {
        return Err(SearchError::backend(Some(status), failure_message(body)));
    }
    let wire: WireHealth =
        serde_json::from_slice(body).map_err(|err| SearchError::Protocol(err.to_string()))?;
    Ok(HealthStatus {
        status: wire.status,
        service: wire.service,
        version: wire.version,
    })
}

/// Entries that are not JSON objects are skipped; a page never fails on one item.
fn normalize_article(index: usize, entry: Value) -> Option<Article> {
    if !entry.is_object() {
        flow_warn!("skipping article {} of type {}", index, value_kind(&entry));
        return None;
    }
    match serde_json::from_value::<WireArticle>(entry) {
        Ok(wire) => Some(Article::from(wire)),
        Err(err) => {
            flow_warn!("skipping article {}: {}", index, err);
            None
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn failure_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<WireFailure>(body)
        .ok()
        .and_then(|failure| failure.error)
        .as_ref()
        .and_then(value_text)
}

fn check_echo(wire: &WireSearchResponse, query: &SearchQuery) {
    if let Some(topic) = wire.tema.as_ref().and_then(value_text) {
        if topic != query.topic() {
            flow_warn!(
                "backend echoed a different topic ({} chars, sent {})",
                topic.len(),
                query.topic().len()
            );
        }
    }
    let echoed_window = wire
        .janela_tempo
        .as_ref()
        .and_then(value_text)
        .map(|code| TimeWindow::from_code(&code));
    if let Some(window) = echoed_window {
        if window != Some(query.window()) {
            flow_warn!(
                "backend echoed window {:?}, sent {}",
                window.map(TimeWindow::code),
                query.window().code()
            );
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn value_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    })
}
