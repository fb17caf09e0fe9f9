pub mod input;
pub mod render;
pub mod terminal;

use roster_core::{Notification, RecordRow};

/// Binding between the coordinator and a concrete UI toolkit.
///
/// Implementations only mutate what the user sees; they never touch
/// application state.
pub trait ViewController {
    /// Active: show the loading panel and disable the scrape trigger.
    /// Inactive: re-enable the trigger.
    fn render_loading(&mut self, active: bool);

    /// Empty rows show the empty placeholder and hide the table and export
    /// control; otherwise the table and export control are shown. The row
    /// count label is always updated.
    fn render_results(&mut self, rows: &[RecordRow]);

    /// Replace the current notification banner.
    fn notify(&mut self, notice: &Notification);

    fn dismiss_notification(&mut self);
}
