//! Main rendering logic for the detail view.
//!
//! Draws whatever the [`DetailView`] has committed; it never reads the
//! store.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::stats::InSync;

use super::panels::{GaugeEntry, GaugeSet, PanelLine, PanelText};
use super::style::Styles;
use super::view::{BodyView, DetailView, GAUGE_ROW_HEIGHT};

const GAUGE_TITLE: &str = "In Sync";
const UNKNOWN_PERCENT: &str = "n/a";

const LEGEND: &[(&str, &str)] = &[
    ("q", "back"),
    ("s", "status"),
    ("d", "detailed status"),
    ("m", "dmesg"),
    ("i", "inSync"),
    ("n/p", "next/prev resource"),
];

/// Main render function.
pub fn render(frame: &mut Frame, view: &DetailView) {
    let plan = view.layout();
    let chunks = Layout::vertical([
        Constraint::Length(plan.header),
        Constraint::Length(plan.body_height),
        Constraint::Length(plan.spacer),
        Constraint::Length(plan.footer),
    ])
    .split(frame.area());

    render_header(frame, chunks[0], view);
    match view.body() {
        BodyView::Gauges(gauges) => render_gauges(frame, chunks[1], gauges),
        BodyView::Text(text) => render_text(frame, chunks[1], text),
    }
    // chunks[2] is the borderless spacer; nothing to draw.
    render_footer(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, view: &DetailView) {
    let header = Paragraph::new(view.header()).style(Styles::header());
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(LEGEND.len() * 3);
    for (i, (key, what)) in LEGEND.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Styles::help()));
        }
        spans.push(Span::styled(*key, Styles::help_key()));
        spans.push(Span::styled(format!(": {}", what), Styles::help()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn to_line(line: &PanelLine) -> Line<'_> {
    Line::from(
        line.segments
            .iter()
            .map(|s| Span::styled(s.text.as_str(), Styles::from_class(s.class)))
            .collect::<Vec<_>>(),
    )
}

/// Text modes and the gauge notice: one box open at the bottom, the footer
/// closes it.
fn render_text(frame: &mut Frame, area: Rect, text: &PanelText) {
    let lines: Vec<Line> = text.lines.iter().map(to_line).collect();
    let block = Block::default().borders(Borders::TOP | Borders::LEFT | Borders::RIGHT);
    let para = Paragraph::new(lines).block(block).style(Styles::default());
    frame.render_widget(para, area);
}

fn render_gauges(frame: &mut Frame, area: Rect, gauges: &GaugeSet) {
    let rows = Layout::vertical(
        gauges
            .iter()
            .map(|_| Constraint::Length(GAUGE_ROW_HEIGHT))
            .collect::<Vec<_>>(),
    )
    .split(area);

    for ((_, entry), row) in gauges.iter().zip(rows.iter()) {
        render_gauge_row(frame, *row, entry);
    }
}

fn render_gauge_row(frame: &mut Frame, area: Rect, entry: &GaugeEntry) {
    let cols =
        Layout::horizontal([Constraint::Ratio(3, 12), Constraint::Ratio(9, 12)]).split(area);

    let label = Paragraph::new(entry.label.as_str())
        .block(Block::bordered())
        .style(Styles::default());
    frame.render_widget(label, cols[0]);

    let block = Block::bordered().title(Span::styled(GAUGE_TITLE, Styles::gauge_title()));
    match entry.in_sync {
        InSync::Percent(p) => {
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(Styles::gauge())
                .percent(u16::from(p));
            frame.render_widget(gauge, cols[1]);
        }
        InSync::Unknown => {
            let placeholder = Paragraph::new(UNKNOWN_PERCENT)
                .alignment(Alignment::Center)
                .style(Styles::dim())
                .block(block);
            frame.render_widget(placeholder, cols[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logtail::{LogTail, LogTailError};
    use crate::store::ResourceStore;
    use crate::store::scenario::demo_resources;
    use crate::tui::panels::TXT_UNCONFIGURED;
    use crate::tui::state::ViewMode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    struct NoLog;

    impl LogTail for NoLog {
        fn tail(&self, _: &str, _: usize) -> Result<Vec<String>, LogTailError> {
            Ok(Vec::new())
        }
    }

    fn draw(mode: ViewMode) -> String {
        draw_resource(mode, "r0", 20)
    }

    fn draw_resource(mode: ViewMode, resource: &str, height: u16) -> String {
        let store = ResourceStore::new();
        store.replace_all(demo_resources());
        let mut view = DetailView::new(mode, Some(resource.to_string()));
        view.refresh_and_relayout(&store, &NoLog, height);

        let mut terminal = Terminal::new(TestBackend::new(100, height)).unwrap();
        terminal.draw(|f| render(f, &view)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_status_screen() {
        let screen = draw(ViewMode::Status);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].contains("Details for r0"));
        assert!(screen.contains("Resource: r0: (Overall danger score: 2)"));
        assert!(rows[19].starts_with("q: back | s: status"));
    }

    #[test]
    fn test_gauge_screen() {
        let screen = draw(ViewMode::InSyncGauges);
        assert!(screen.contains("Vol 0 (/dev/drbd100)"));
        assert!(screen.contains("Vol 1 (/dev/drbd101)"));
        assert!(screen.contains(GAUGE_TITLE));
        assert!(screen.contains("63%"));
        // Footer stays pinned to the last row.
        assert!(screen.lines().nth(19).unwrap().starts_with("q: back"));
    }

    #[test]
    fn test_gauge_screen_unconfigured_shows_notice() {
        let screen = draw_resource(ViewMode::InSyncGauges, "r2", 10);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].contains("Details for r2"));
        // Top border on row 1, the notice right below it.
        assert!(rows[1].starts_with("┌"));
        assert!(rows[2].contains(TXT_UNCONFIGURED));
        assert!(!screen.contains(GAUGE_TITLE));
        assert!(rows[9].starts_with("q: back"));
    }

    #[test]
    fn test_gauge_screen_missing_resource() {
        let screen = draw_resource(ViewMode::InSyncGauges, "r9", 10);
        assert!(screen.contains("Resource r9 is not available."));
    }
}
