use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use roster_client::{
    DownloadWriter, RemoteError, RemoteErrorKind, RemoteEvent, RemoteFormat, RemoteHandle,
    RemoteRecord,
};
use roster_core::{
    Effect, ExportFormat, ExportPayload, Msg, NoticeId, Record, RemoteFailure, ScrapeReply,
};
use roster_logging::{roster_error, roster_info, roster_warn};

use super::app::AppEvent;

/// Executes core effects and feeds their completions back as messages.
pub struct EffectRunner {
    remote: RemoteHandle,
    downloads: DownloadWriter,
    events: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        remote: RemoteHandle,
        downloads: DownloadWriter,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        let runner = Self {
            remote,
            downloads,
            events,
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Scrape { url } => {
                    roster_info!("Scrape url_len={} url={}", url.len(), url);
                    self.remote.scrape(url);
                }
                Effect::Export { records, format } => {
                    roster_info!(
                        "Export records={} format={}",
                        records.len(),
                        format.as_str()
                    );
                    let records = records.into_iter().map(to_remote).collect();
                    self.remote.export(records, to_remote_format(format));
                }
                Effect::SaveDownload {
                    file_name,
                    bytes,
                    format,
                } => self.save_download(file_name, bytes, format),
                Effect::ScheduleDismiss { notice_id, after } => {
                    self.schedule_dismiss(notice_id, after)
                }
            }
        }
    }

    fn save_download(&self, file_name: String, bytes: Vec<u8>, format: ExportFormat) {
        let downloads = self.downloads.clone();
        let events = self.events.clone();
        thread::spawn(move || {
            let result = match downloads.write(&file_name, &bytes) {
                Ok(path) => {
                    roster_info!("Saved export to {:?} ({} bytes)", path, bytes.len());
                    Ok(path)
                }
                Err(err) => {
                    roster_error!("Failed to save export {}: {}", file_name, err);
                    Err(err.to_string())
                }
            };
            let _ = events.send(AppEvent::Msg(Msg::DownloadSaved { format, result }));
        });
    }

    fn schedule_dismiss(&self, notice_id: NoticeId, after: Duration) {
        let events = self.events.clone();
        thread::spawn(move || {
            thread::sleep(after);
            let _ = events.send(AppEvent::Msg(Msg::NoticeExpired(notice_id)));
        });
    }

    fn spawn_event_loop(&self) {
        let remote = self.remote.clone();
        let events = self.events.clone();
        thread::spawn(move || {
            while let Some(event) = remote.recv() {
                if events.send(AppEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }
}

fn map_event(event: RemoteEvent) -> Msg {
    match event {
        RemoteEvent::ScrapeCompleted(result) => Msg::ScrapeFinished(
            result
                .map(|output| ScrapeReply {
                    records: output.records.into_iter().map(from_remote).collect(),
                    count: output.count,
                })
                .map_err(|err| map_failure("scrape", err)),
        ),
        RemoteEvent::ExportCompleted { format, result } => Msg::ExportFinished {
            format: from_remote_format(format),
            result: result
                .map(|bytes| ExportPayload {
                    bytes,
                    received_at: Utc::now(),
                })
                .map_err(|err| map_failure("export", err)),
        },
    }
}

fn map_failure(operation: &str, err: RemoteError) -> RemoteFailure {
    if err.is_transport() {
        // Details stay in the log; the user gets a generic message.
        roster_warn!("{} transport failure: {}", operation, err);
        return RemoteFailure::Transport(err.to_string());
    }
    roster_info!("{} rejected by service: {}", operation, err);
    match err.kind {
        RemoteErrorKind::HttpStatus(code) => RemoteFailure::Status(code),
        _ => RemoteFailure::Service(err.message),
    }
}

fn to_remote(record: Record) -> RemoteRecord {
    RemoteRecord {
        name: record.name,
        email: record.email,
        department: record.department,
    }
}

fn from_remote(record: RemoteRecord) -> Record {
    Record::new(record.name, record.email, record.department)
}

fn to_remote_format(format: ExportFormat) -> RemoteFormat {
    match format {
        ExportFormat::Csv => RemoteFormat::Csv,
        ExportFormat::Json => RemoteFormat::Json,
    }
}

fn from_remote_format(format: RemoteFormat) -> ExportFormat {
    match format {
        RemoteFormat::Csv => ExportFormat::Csv,
        RemoteFormat::Json => ExportFormat::Json,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use roster_client::{RemoteService, ScrapeOutput};
    use tempfile::TempDir;

    use super::*;

    struct FixedService;

    #[async_trait::async_trait]
    impl RemoteService for FixedService {
        async fn scrape(&self, _url: &str) -> Result<ScrapeOutput, RemoteError> {
            Ok(ScrapeOutput {
                records: vec![RemoteRecord {
                    name: Some("A".to_string()),
                    email: Some("a@x.edu".to_string()),
                    department: Some("CS".to_string()),
                }],
                count: 1,
            })
        }

        async fn export(
            &self,
            _records: &[RemoteRecord],
            _format: RemoteFormat,
        ) -> Result<Vec<u8>, RemoteError> {
            Err(RemoteError {
                kind: RemoteErrorKind::Service,
                message: "匯出失敗: boom".to_string(),
            })
        }
    }

    fn next_msg(rx: &mpsc::Receiver<AppEvent>) -> Msg {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(AppEvent::Msg(msg)) => return msg,
                Ok(_) => continue,
                Err(err) => panic!("no message: {err}"),
            }
        }
    }

    fn runner(dir: &TempDir) -> (EffectRunner, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let remote = RemoteHandle::new(Arc::new(FixedService)).expect("runtime");
        let runner = EffectRunner::new(remote, DownloadWriter::new(dir.path().to_path_buf()), tx);
        (runner, rx)
    }

    #[test]
    fn transport_errors_become_generic_failures() {
        let err = RemoteError {
            kind: RemoteErrorKind::Network,
            message: "connection refused".to_string(),
        };
        assert!(matches!(
            map_failure("scrape", err),
            RemoteFailure::Transport(_)
        ));

        let err = RemoteError {
            kind: RemoteErrorKind::HttpStatus(503),
            message: "503 Service Unavailable".to_string(),
        };
        assert_eq!(map_failure("scrape", err), RemoteFailure::Status(503));
    }

    #[test]
    fn records_survive_the_round_trip_through_wire_types() {
        let record = Record::new(Some("A".to_string()), None, Some("CS".to_string()));
        assert_eq!(from_remote(to_remote(record.clone())), record);
    }

    #[test]
    fn export_formats_map_both_ways() {
        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let remote = to_remote_format(format);
            assert_eq!(remote.to_string(), format.as_str());
            assert_eq!(from_remote_format(remote), format);
        }
    }

    #[test]
    fn scrape_effect_comes_back_as_finished_message() {
        let dir = TempDir::new().unwrap();
        let (runner, rx) = runner(&dir);

        runner.enqueue(vec![Effect::Scrape {
            url: "https://example.edu/staff".to_string(),
        }]);

        match next_msg(&rx) {
            Msg::ScrapeFinished(Ok(reply)) => {
                assert_eq!(reply.count, 1);
                assert_eq!(reply.records[0].email.as_deref(), Some("a@x.edu"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn export_failure_keeps_service_message() {
        let dir = TempDir::new().unwrap();
        let (runner, rx) = runner(&dir);

        runner.enqueue(vec![Effect::Export {
            records: vec![Record::default()],
            format: ExportFormat::Json,
        }]);

        assert_eq!(
            next_msg(&rx),
            Msg::ExportFinished {
                format: ExportFormat::Json,
                result: Err(RemoteFailure::Service("匯出失敗: boom".to_string())),
            }
        );
    }

    #[test]
    fn save_download_writes_file_and_reports_path() {
        let dir = TempDir::new().unwrap();
        let (runner, rx) = runner(&dir);

        runner.enqueue(vec![Effect::SaveDownload {
            file_name: "professors_2024-05-01T12-30-00.csv".to_string(),
            bytes: b"name\nA\n".to_vec(),
            format: ExportFormat::Csv,
        }]);

        match next_msg(&rx) {
            Msg::DownloadSaved {
                format: ExportFormat::Csv,
                result: Ok(path),
            } => {
                assert_eq!(path, dir.path().join("professors_2024-05-01T12-30-00.csv"));
                assert_eq!(std::fs::read(path).unwrap(), b"name\nA\n");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn dismissal_fires_after_delay() {
        let dir = TempDir::new().unwrap();
        let (runner, rx) = runner(&dir);

        runner.enqueue(vec![Effect::ScheduleDismiss {
            notice_id: 3,
            after: Duration::from_millis(10),
        }]);

        assert_eq!(next_msg(&rx), Msg::NoticeExpired(3));
    }
}
