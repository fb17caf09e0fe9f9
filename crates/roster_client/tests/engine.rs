use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use roster_client::{
    RemoteError, RemoteEvent, RemoteFormat, RemoteHandle, RemoteRecord, RemoteService,
    ScrapeOutput,
};

#[derive(Default)]
struct StubService {
    scrapes: AtomicUsize,
    exports: AtomicUsize,
}

#[async_trait::async_trait]
impl RemoteService for StubService {
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, RemoteError> {
        self.scrapes.fetch_add(1, Ordering::SeqCst);
        Ok(ScrapeOutput {
            records: vec![RemoteRecord {
                name: Some(url.to_string()),
                ..RemoteRecord::default()
            }],
            count: 1,
        })
    }

    async fn export(
        &self,
        records: &[RemoteRecord],
        format: RemoteFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        self.exports.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{format}:{}", records.len()).into_bytes())
    }
}

fn next_event(handle: &RemoteHandle) -> RemoteEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = handle.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no remote event");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn each_command_yields_one_event() {
    let stub = Arc::new(StubService::default());
    let handle = RemoteHandle::new(stub.clone()).expect("runtime");

    handle.scrape("https://example.edu/staff");
    match next_event(&handle) {
        RemoteEvent::ScrapeCompleted(Ok(output)) => {
            assert_eq!(output.count, 1);
            assert_eq!(
                output.records[0].name.as_deref(),
                Some("https://example.edu/staff")
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }

    handle.export(vec![RemoteRecord::default(); 3], RemoteFormat::Json);
    assert_eq!(
        next_event(&handle),
        RemoteEvent::ExportCompleted {
            format: RemoteFormat::Json,
            result: Ok(b"json:3".to_vec()),
        }
    );

    assert_eq!(stub.scrapes.load(Ordering::SeqCst), 1);
    assert_eq!(stub.exports.load(Ordering::SeqCst), 1);
    thread::sleep(Duration::from_millis(20));
    assert!(handle.try_recv().is_none());
}

#[test]
fn repeated_exports_are_not_coalesced() {
    let stub = Arc::new(StubService::default());
    let handle = RemoteHandle::new(stub.clone()).expect("runtime");

    handle.export(vec![RemoteRecord::default()], RemoteFormat::Csv);
    handle.export(vec![RemoteRecord::default()], RemoteFormat::Csv);
    next_event(&handle);
    next_event(&handle);

    assert_eq!(stub.exports.load(Ordering::SeqCst), 2);
}
