use std::fmt::Write as _;
use std::io::{self, Write};

use roster_core::{NoticeKind, Notification, RecordRow};
use unicode_width::UnicodeWidthStr;

use super::ViewController;

const HELP_TEXT: &str = "\
輸入網址後按 Enter 開始採集
  :export [csv|json]  匯出目前資料 (預設 csv)
  :help               顯示說明
  :quit               離開";

/// The three mutually exclusive display panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    Loading,
    #[default]
    Empty,
    Table,
}

/// Everything currently visible, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub panel: Panel,
    pub rows: Vec<RecordRow>,
    pub total_count: usize,
    pub export_visible: bool,
    pub scrape_enabled: bool,
    pub banner: Option<Notification>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            panel: Panel::Empty,
            rows: Vec::new(),
            total_count: 0,
            export_visible: false,
            scrape_enabled: true,
            banner: None,
        }
    }
}

impl Screen {
    fn same_body(&self, other: &Screen) -> bool {
        self.panel == other.panel
            && self.rows == other.rows
            && self.total_count == other.total_count
            && self.export_visible == other.export_visible
    }
}

impl ViewController for Screen {
    fn render_loading(&mut self, active: bool) {
        if active {
            self.panel = Panel::Loading;
        }
        self.scrape_enabled = !active;
    }

    fn render_results(&mut self, rows: &[RecordRow]) {
        if rows.is_empty() {
            self.panel = Panel::Empty;
            self.rows.clear();
            self.export_visible = false;
        } else {
            self.panel = Panel::Table;
            self.rows = rows.to_vec();
            self.export_visible = true;
        }
        self.total_count = rows.len();
    }

    fn notify(&mut self, notice: &Notification) {
        self.banner = Some(notice.clone());
    }

    fn dismiss_notification(&mut self) {
        self.banner = None;
    }
}

/// Draws a [`Screen`] to a line-oriented terminal, only repeating what changed.
pub struct TerminalView<W: Write> {
    screen: Screen,
    shown: Option<Screen>,
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            screen: Screen::default(),
            shown: None,
            out,
        }
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn present(&mut self) -> io::Result<()> {
        let (body_changed, banner_changed, trigger_changed) = match &self.shown {
            Some(shown) => (
                !shown.same_body(&self.screen),
                shown.banner != self.screen.banner,
                shown.scrape_enabled != self.screen.scrape_enabled,
            ),
            None => (true, true, true),
        };
        if !(body_changed || banner_changed || trigger_changed) {
            return Ok(());
        }

        let mut text = String::new();
        if body_changed {
            text.push_str(&format_body(&self.screen));
        }
        if banner_changed {
            if let Some(banner) = &self.screen.banner {
                text.push_str(&format_banner(banner));
            }
        }
        text.push_str(prompt(self.screen.scrape_enabled));

        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        self.shown = Some(self.screen.clone());
        Ok(())
    }

    pub fn show_help(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{HELP_TEXT}")?;
        self.out.write_all(prompt(self.screen.scrape_enabled).as_bytes())?;
        self.out.flush()
    }

    pub fn show_unknown(&mut self, input: &str) -> io::Result<()> {
        writeln!(self.out, "無法辨識的指令: {input} (輸入 :help 查看說明)")?;
        self.out.write_all(prompt(self.screen.scrape_enabled).as_bytes())?;
        self.out.flush()
    }
}

fn prompt(scrape_enabled: bool) -> &'static str {
    if scrape_enabled {
        "網址> "
    } else {
        "(採集中…) > "
    }
}

fn format_banner(notice: &Notification) -> String {
    let tag = match notice.kind {
        NoticeKind::Success => "OK",
        NoticeKind::Error => "錯誤",
    };
    format!("[{tag}] {}\n", notice.message)
}

pub fn format_body(screen: &Screen) -> String {
    let mut out = String::from("\n");
    match screen.panel {
        Panel::Loading => out.push_str("採集中，請稍候...\n"),
        Panel::Empty => out.push_str("尚無資料\n"),
        Panel::Table => out.push_str(&format_table(&screen.rows)),
    }
    let _ = write!(out, "共 {} 筆", screen.total_count);
    if screen.export_visible {
        out.push_str("  |  :export 匯出");
    }
    out.push('\n');
    out
}

fn format_table(rows: &[RecordRow]) -> String {
    let headers = ["#", "姓名", "Email", "系所"];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.index.to_string(),
                row.name.clone(),
                row.email.clone(),
                row.department.clone(),
            ]
        })
        .collect();

    // Widths are terminal columns; CJK characters occupy two.
    let mut widths = headers.map(|h| h.width());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers.map(str::to_string), &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let fill = width.saturating_sub(cell.width());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
