use std::sync::{mpsc, Arc};
use std::thread;

use infoflow_core::{SearchQuery, SubmissionId};
use infoflow_logging::{flow_debug, flow_info};
use thiserror::Error;

use crate::{EngineEvent, SearchClient};

enum EngineCommand {
    Search {
        submission: SubmissionId,
        query: SearchQuery,
    },
    CheckHealth,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Runs searches on a background tokio runtime for synchronous frontends.
///
/// Commands go in through [`EngineHandle::search`]; results come back on the
/// paired [`EngineEvents`] in completion order, which may differ from
/// submission order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving end of an engine. Owned by exactly one consumer.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn start(client: Arc<dyn SearchClient>) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
            flow_debug!("engine command channel closed");
        });

        flow_info!("engine started");
        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn search(&self, submission: SubmissionId, query: SearchQuery) {
        let _ = self.cmd_tx.send(EngineCommand::Search { submission, query });
    }

    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth);
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    client: &dyn SearchClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Search { submission, query } => {
            let result = client.search(&query).await;
            EngineEvent::SearchCompleted { submission, result }
        }
        EngineCommand::CheckHealth => EngineEvent::HealthChecked(client.health().await),
    };
    let _ = event_tx.send(event);
}
