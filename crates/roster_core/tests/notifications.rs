use std::sync::Once;

use roster_core::{update, AppState, Effect, Msg, NOTICE_TIMEOUT};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(roster_logging::initialize_for_tests);
}

fn dismiss_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleDismiss { notice_id, after } => {
                assert_eq!(*after, NOTICE_TIMEOUT);
                Some(*notice_id)
            }
            _ => None,
        })
        .expect("dismiss effect")
}

#[test]
fn notice_expires_after_its_timer() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ScrapeSubmitted);
    let id = dismiss_id(&effects);
    assert!(state.notification().is_some());

    let (mut state, _) = update(state, Msg::NoticeExpired(id));
    assert!(state.notification().is_none());
    assert!(state.consume_dirty());
}

#[test]
fn newer_notice_replaces_and_outlives_stale_timer() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ScrapeSubmitted);
    let first = dismiss_id(&effects);

    let (state, effects) = update(state, Msg::ExportClicked(Default::default()));
    let second = dismiss_id(&effects);
    assert_ne!(first, second);
    assert_eq!(
        state.notification().map(|n| n.message.as_str()),
        Some("沒有資料可匯出")
    );

    // The first timer firing must not dismiss the replacement.
    let (mut state, _) = update(state, Msg::NoticeExpired(first));
    state.consume_dirty();
    assert_eq!(state.notification().map(|n| n.id), Some(second));

    let (mut state, _) = update(state, Msg::NoticeExpired(first));
    assert!(!state.consume_dirty());

    let (state, _) = update(state, Msg::NoticeExpired(second));
    assert!(state.notification().is_none());
}
