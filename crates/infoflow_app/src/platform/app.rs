use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Local;
use infoflow_core::{update, AppState, Msg};
use infoflow_engine::{EngineHandle, ReqwestSearchClient};
use infoflow_logging::{flow_debug, flow_info, flow_warn};

use super::config::{self, LoadedConfig};
use super::effects::EffectRunner;
use super::input::{parse_line, Command};
use super::logging;
use super::ui;

/// Everything the main loop reacts to.
pub enum LoopEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let path = config::config_path();
    let LoadedConfig { config, problem } = config::load_config(&path);
    logging::initialize(config.log_destination, config.log_level());
    if let Some(problem) = problem {
        flow_warn!("{}", problem);
    }
    flow_info!("InfoFlow starting, backend {}", config.api_base_url);

    let client = ReqwestSearchClient::new(config.client_settings())
        .context("failed to set up the news client")?;
    let (engine, events) =
        EngineHandle::start(Arc::new(client)).context("failed to start search engine")?;

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let effects = EffectRunner::new(engine, events, loop_tx.clone());
    spawn_input_reader(loop_tx);

    let state = AppState::with_settings(
        config.validator(),
        config.formatter(),
        config.default_window(),
    );
    let mut app = TerminalApp {
        state,
        effects,
        out: io::stdout(),
    };
    if !app.dispatch(vec![Msg::Started])? {
        app.redraw()?;
    }

    let mut input_closed = false;
    for event in loop_rx {
        match event {
            LoopEvent::Msg(msg) => {
                app.dispatch(vec![msg])?;
            }
            LoopEvent::Command(command) => {
                if app.handle_command(command)?.is_break() {
                    break;
                }
            }
            LoopEvent::InputClosed => {
                flow_debug!("stdin closed");
                input_closed = true;
            }
        }
        // Piped input: stay until the last search has landed.
        if input_closed && app.state.view().can_submit {
            break;
        }
    }

    flow_info!("InfoFlow exiting");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if loop_tx.send(LoopEvent::Command(parse_line(&line))).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

struct TerminalApp {
    state: AppState,
    effects: EffectRunner,
    out: io::Stdout,
}

impl TerminalApp {
    fn handle_command(&mut self, command: Command) -> io::Result<ControlFlow<()>> {
        match command {
            Command::Search(topic) => {
                if !self.state.view().can_submit {
                    self.print(&["A search is already running, please wait.".to_string()])?;
                    return Ok(ControlFlow::Continue(()));
                }
                let msgs = vec![Msg::TopicChanged(topic), Msg::SearchSubmitted];
                if !self.dispatch(msgs)? {
                    self.print(&[])?;
                }
            }
            Command::SelectWindow(window) => {
                if !self.dispatch(vec![Msg::WindowSelected(window)])? {
                    self.print(&[])?;
                }
            }
            Command::ListWindows => {
                let lines = ui::render::render_windows(self.state.view().window);
                self.print(&lines)?;
            }
            Command::Help => self.print(&ui::render::render_help())?,
            Command::Quit => return Ok(ControlFlow::Break(())),
            Command::Unknown(line) => {
                let mut lines = vec![format!("Unknown command: {line}")];
                lines.extend(ui::render::render_help());
                self.print(&lines)?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Applies a batch of messages and redraws once if anything changed.
    fn dispatch(&mut self, msgs: Vec<Msg>) -> io::Result<bool> {
        let mut dirty = false;
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            dirty |= state.consume_dirty();
            self.state = state;
            self.effects.enqueue(effects);
        }
        if dirty {
            self.redraw()?;
        }
        Ok(dirty)
    }

    fn redraw(&mut self) -> io::Result<()> {
        let today = Local::now().date_naive();
        let lines = ui::render::render(&self.state.view(), today);
        self.print(&lines)
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        let mut out = self.out.lock();
        for line in lines {
            writeln!(out, "{line}")?;
        }
        write!(out, "{}", ui::render::PROMPT)?;
        out.flush()
    }
}
