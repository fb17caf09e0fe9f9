use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use roster_logging::{roster_debug, roster_warn};

use crate::{RemoteError, RemoteFormat, RemoteRecord, RemoteService, ScrapeOutput};

enum RemoteCommand {
    Scrape {
        url: String,
    },
    Export {
        records: Vec<RemoteRecord>,
        format: RemoteFormat,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    ScrapeCompleted(Result<ScrapeOutput, RemoteError>),
    ExportCompleted {
        format: RemoteFormat,
        result: Result<Vec<u8>, RemoteError>,
    },
}

/// Runs remote calls on a background tokio runtime so the caller never blocks.
///
/// Each command produces exactly one [`RemoteEvent`]. Commands are not queued
/// behind each other: two exports sent back to back run concurrently.
#[derive(Clone)]
pub struct RemoteHandle {
    cmd_tx: mpsc::Sender<RemoteCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<RemoteEvent>>>,
}

impl RemoteHandle {
    pub fn new(service: Arc<dyn RemoteService>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(service.as_ref(), command, event_tx).await;
                });
            }
            roster_debug!("remote command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn scrape(&self, url: impl Into<String>) {
        self.send(RemoteCommand::Scrape { url: url.into() });
    }

    pub fn export(&self, records: Vec<RemoteRecord>, format: RemoteFormat) {
        self.send(RemoteCommand::Export { records, format });
    }

    pub fn try_recv(&self) -> Option<RemoteEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks until the next event. Returns `None` once the worker has shut down.
    pub fn recv(&self) -> Option<RemoteEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }

    fn send(&self, command: RemoteCommand) {
        if self.cmd_tx.send(command).is_err() {
            roster_warn!("remote worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    service: &dyn RemoteService,
    command: RemoteCommand,
    event_tx: mpsc::Sender<RemoteEvent>,
) {
    let event = match command {
        RemoteCommand::Scrape { url } => RemoteEvent::ScrapeCompleted(service.scrape(&url).await),
        RemoteCommand::Export { records, format } => {
            let result = service.export(&records, format).await;
            RemoteEvent::ExportCompleted { format, result }
        }
    };
    let _ = event_tx.send(event);
}
