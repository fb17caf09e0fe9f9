use crate::{
    ensure_exportable, export_file_name, validate_url, AppState, Effect, ExportFormat,
    ExportPayload, Msg, NoticeKind, RemoteFailure, ScrapeReply,
};

const SCRAPE_REJECTED: &str = "採集失敗";
const SCRAPE_UNREACHABLE: &str = "網路連接失敗，請檢查連線";
const EXPORT_REJECTED: &str = "匯出失敗";
const EXPORT_UNREACHABLE: &str = "匯出失敗，請稍後再試";
const SAVE_FAILED: &str = "無法儲存匯出檔案";

/// Pure update function: applies a message to state and returns any effects.
///
/// Every failure path produces exactly one notification. A completed scrape
/// always leaves the loading state, whatever its outcome.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::ScrapeSubmitted => submit_scrape(&mut state),
        Msg::ScrapeFinished(result) => finish_scrape(&mut state, result),
        Msg::ExportClicked(format) => submit_export(&mut state, format),
        Msg::ExportFinished { format, result } => finish_export(&mut state, format, result),
        Msg::DownloadSaved { format, result } => {
            let notice = match result {
                Ok(_) => state.notify(
                    NoticeKind::Success,
                    format!("成功匯出 {} 檔案", format.label()),
                ),
                Err(_) => state.notify(NoticeKind::Error, SAVE_FAILED),
            };
            vec![notice]
        }
        Msg::NoticeExpired(id) => {
            state.expire_notice(id);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit_scrape(state: &mut AppState) -> Vec<Effect> {
    // The trigger is disabled while loading; this is a guard, not a queue.
    if state.request().is_loading() {
        return Vec::new();
    }

    let url = match validate_url(state.input()) {
        Ok(url) => url.to_owned(),
        Err(err) => return vec![state.notify(NoticeKind::Error, err.user_message())],
    };

    state.begin_scrape();
    vec![Effect::Scrape { url }]
}

fn finish_scrape(state: &mut AppState, result: Result<ScrapeReply, RemoteFailure>) -> Vec<Effect> {
    let notice = match result {
        Ok(ScrapeReply { records, count }) => {
            state.finish_scrape(records);
            state.notify(NoticeKind::Success, format!("成功採集 {count} 筆教授資料"))
        }
        Err(failure) => {
            state.finish_scrape(Vec::new());
            state.notify(
                NoticeKind::Error,
                failure.user_message(SCRAPE_REJECTED, SCRAPE_UNREACHABLE),
            )
        }
    };
    vec![notice]
}

// Export deliberately has no in-flight guard and does not touch loading.
fn submit_export(state: &mut AppState, format: ExportFormat) -> Vec<Effect> {
    if let Err(err) = ensure_exportable(state.request().records()) {
        return vec![state.notify(NoticeKind::Error, err.user_message())];
    }

    vec![Effect::Export {
        records: state.request().records().to_vec(),
        format,
    }]
}

fn finish_export(
    state: &mut AppState,
    format: ExportFormat,
    result: Result<ExportPayload, RemoteFailure>,
) -> Vec<Effect> {
    match result {
        Ok(ExportPayload { bytes, received_at }) => vec![Effect::SaveDownload {
            file_name: export_file_name(received_at, format),
            bytes,
            format,
        }],
        Err(failure) => vec![state.notify(
            NoticeKind::Error,
            failure.user_message(EXPORT_REJECTED, EXPORT_UNREACHABLE),
        )],
    }
}
