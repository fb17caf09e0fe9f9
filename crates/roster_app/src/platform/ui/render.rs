use roster_core::{AppViewModel, DisplayMode};

use super::ViewController;

/// Single render dispatch: the display mode alone decides which panel shows.
pub fn render(view: &AppViewModel, target: &mut dyn ViewController) {
    match view.mode {
        DisplayMode::Loading => target.render_loading(true),
        DisplayMode::Empty | DisplayMode::Results => {
            target.render_loading(false);
            target.render_results(&view.rows);
        }
    }

    match &view.notification {
        Some(notice) => target.notify(notice),
        None => target.dismiss_notification(),
    }
}
