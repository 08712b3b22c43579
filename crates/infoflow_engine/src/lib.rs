//! InfoFlow engine: backend client, wire schema and search execution.
mod client;
mod engine;
mod service;
mod types;
mod wire;

pub use client::{
    ClientError, ClientSettings, ReqwestSearchClient, SearchClient, HEALTH_PATH, SEARCH_PATH,
};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use service::{SearchService, SubmitOutcome};
pub use types::{EngineEvent, HealthStatus};
