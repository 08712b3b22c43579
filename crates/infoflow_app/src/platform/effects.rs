use std::sync::mpsc;
use std::thread;

use infoflow_core::{Effect, Msg};
use infoflow_engine::{EngineEvent, EngineEvents, EngineHandle};
use infoflow_logging::{flow_debug, flow_info, flow_warn};

use super::app::LoopEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        events: EngineEvents,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        spawn_event_loop(events, loop_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunSearch { submission, query } => {
                    flow_info!(
                        "RunSearch submission={} window={} max={}",
                        submission,
                        query.window().code(),
                        query.max_results()
                    );
                    self.engine.search(submission, query);
                }
                Effect::CheckBackend => self.engine.check_health(),
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if loop_tx.send(LoopEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
        flow_debug!("engine event loop finished");
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { submission, result } => {
            if let Err(err) = &result {
                flow_warn!("Search {} failed: {}", submission, err);
            }
            Msg::SearchCompleted { submission, result }
        }
        EngineEvent::HealthChecked(Ok(health)) => Msg::BackendChecked {
            reachable: health.is_ok(),
            detail: health.describe(),
        },
        EngineEvent::HealthChecked(Err(err)) => {
            flow_warn!("Health check failed: {}", err);
            Msg::BackendChecked {
                reachable: false,
                detail: err.user_message(),
            }
        }
    }
}
