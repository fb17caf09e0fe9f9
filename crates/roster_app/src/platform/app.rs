use std::io::{self, Write};
use std::sync::{mpsc, Arc};

use anyhow::Context;
use clap::Parser;
use roster_client::{DownloadWriter, HttpRemoteService, RemoteHandle};
use roster_core::{update, AppState, Effect, Msg};
use roster_logging::{roster_info, roster_warn};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::input::spawn_stdin_reader;
use super::ui::render::render;
use super::ui::terminal::TerminalView;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Help,
    Unknown(String),
    /// Stdin reached end of input. The app exits once nothing is in flight.
    InputClosed,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    logging::initialize(config.log_destination, config.log_level);
    roster_info!(
        "Starting roster; server={} download_dir={:?}",
        config.server_url,
        config.download_dir
    );

    let service = HttpRemoteService::new(config.remote_settings()?)?;
    let remote = RemoteHandle::new(Arc::new(service)).context("starting remote worker")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        remote,
        DownloadWriter::new(config.download_dir.clone()),
        event_tx.clone(),
    );

    // Queued ahead of stdin so an empty stdin cannot close input first.
    if let Some(url) = cli.url {
        let _ = event_tx.send(AppEvent::Msg(Msg::InputChanged(url)));
        let _ = event_tx.send(AppEvent::Msg(Msg::ScrapeSubmitted));
    }
    spawn_stdin_reader(event_tx.clone());
    drop(event_tx);

    let mut coordinator = Coordinator::new(runner, TerminalView::new(io::stdout()));
    coordinator.render_all();

    let mut input_closed = false;
    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => coordinator.dispatch_msg(msg),
            AppEvent::Help => coordinator.report(|view| view.show_help()),
            AppEvent::Unknown(text) => coordinator.report(|view| view.show_unknown(&text)),
            AppEvent::InputClosed => input_closed = true,
            AppEvent::Quit => break,
        }
        if input_closed && coordinator.in_flight.is_idle() {
            break;
        }
    }

    roster_info!("Exiting");
    Ok(())
}

/// Owns the application state; the only place `update` is called.
struct Coordinator<W: Write> {
    state: AppState,
    runner: EffectRunner,
    view: TerminalView<W>,
    in_flight: InFlight,
}

impl<W: Write> Coordinator<W> {
    fn new(runner: EffectRunner, view: TerminalView<W>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            view,
            in_flight: InFlight::default(),
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        self.in_flight.settle(&msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        self.in_flight.start(&effects);
        self.runner.enqueue(effects);
        if was_dirty {
            self.render_all();
        }
    }

    fn render_all(&mut self) {
        let view = self.state.view();
        render(&view, self.view.screen_mut());
        self.report(|view| view.present());
    }

    fn report(&mut self, draw: impl FnOnce(&mut TerminalView<W>) -> io::Result<()>) {
        if let Err(err) = draw(&mut self.view) {
            roster_warn!("Failed to write to terminal: {}", err);
        }
    }
}

/// Remote calls and download saves that have started but not reported back.
///
/// Notice dismissal timers are not counted; nothing waits on them.
#[derive(Debug, Default)]
struct InFlight(usize);

impl InFlight {
    fn start(&mut self, effects: &[Effect]) {
        self.0 += effects
            .iter()
            .filter(|effect| !matches!(effect, Effect::ScheduleDismiss { .. }))
            .count();
    }

    fn settle(&mut self, msg: &Msg) {
        if matches!(
            msg,
            Msg::ScrapeFinished(_) | Msg::ExportFinished { .. } | Msg::DownloadSaved { .. }
        ) {
            self.0 = self.0.saturating_sub(1);
        }
    }

    fn is_idle(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use roster_core::{ExportFormat, ExportPayload, Record, ScrapeReply};

    use super::*;

    /// Feeds `msg` through `update` the way the coordinator does.
    fn step(state: AppState, in_flight: &mut InFlight, msg: Msg) -> AppState {
        in_flight.settle(&msg);
        let (state, effects) = update(state, msg);
        in_flight.start(&effects);
        state
    }

    #[test]
    fn scrape_keeps_work_in_flight_until_reply() {
        let mut in_flight = InFlight::default();
        let state = step(
            AppState::new(),
            &mut in_flight,
            Msg::InputChanged("https://example.edu/staff".to_string()),
        );
        let state = step(state, &mut in_flight, Msg::ScrapeSubmitted);
        assert!(!in_flight.is_idle());

        step(
            state,
            &mut in_flight,
            Msg::ScrapeFinished(Ok(ScrapeReply {
                records: vec![Record::default()],
                count: 1,
            })),
        );
        assert!(in_flight.is_idle());
    }

    #[test]
    fn export_stays_in_flight_until_download_is_saved() {
        let mut in_flight = InFlight::default();
        let mut state = AppState::new();
        for msg in [
            Msg::InputChanged("https://example.edu/staff".to_string()),
            Msg::ScrapeSubmitted,
            Msg::ScrapeFinished(Ok(ScrapeReply {
                records: vec![Record::default()],
                count: 1,
            })),
            Msg::ExportClicked(ExportFormat::Csv),
        ] {
            state = step(state, &mut in_flight, msg);
        }
        assert!(!in_flight.is_idle());

        let state = step(
            state,
            &mut in_flight,
            Msg::ExportFinished {
                format: ExportFormat::Csv,
                result: Ok(ExportPayload {
                    bytes: b"name\n".to_vec(),
                    received_at: Utc::now(),
                }),
            },
        );
        assert!(!in_flight.is_idle(), "save still pending");

        step(
            state,
            &mut in_flight,
            Msg::DownloadSaved {
                format: ExportFormat::Csv,
                result: Ok("professors.csv".into()),
            },
        );
        assert!(in_flight.is_idle());
    }

    #[test]
    fn dismiss_timers_do_not_hold_the_app_open() {
        let mut in_flight = InFlight::default();
        in_flight.start(&[Effect::ScheduleDismiss {
            notice_id: 1,
            after: Duration::from_secs(5),
        }]);
        assert!(in_flight.is_idle());

        // A validation failure only schedules a dismissal.
        step(AppState::new(), &mut in_flight, Msg::ScrapeSubmitted);
        assert!(in_flight.is_idle());
    }
}
