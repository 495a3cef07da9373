//! Detail view controller.
//!
//! Owns the mode, the selected resource, the committed panel content and the
//! layout plan. Every refresh pulls one snapshot from the store, renders it
//! into a pending value and commits it only when it differs from what is on
//! screen. The caller repaints only when a refresh returns something other
//! than [`Redraw::None`].

use tracing::{debug, info};

use crate::logtail::LogTail;
use crate::store::SnapshotSource;

use super::panels::{
    GaugeChange, GaugeSet, PanelText, log_line_budget, render_log_tail, render_missing,
    render_status, render_unconfigured,
};
use super::state::ViewMode;

/// Rows taken by one gauge (label box and gauge box share a row band).
pub const GAUGE_ROW_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 1;
const FOOTER_HEIGHT: u16 = 1;
/// Top border plus one line of text.
const NOTICE_HEIGHT: u16 = 2;

/// What a refresh requires from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    None,
    /// Same layout, new content.
    Content,
    /// Layout plan changed; repaint everything.
    Layout,
}

/// Body kind of the current layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Gauges { rows: usize },
    Text,
    /// One-line text in place of gauges: resource missing or unconfigured.
    Notice,
}

/// Vertical split of the terminal. Heights always sum to the terminal height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub header: u16,
    pub body: Body,
    pub body_height: u16,
    pub spacer: u16,
    pub footer: u16,
}

impl LayoutPlan {
    fn new(height: u16, body: Body, wanted: u16) -> Self {
        let header = height.min(HEADER_HEIGHT);
        let footer = (height - header).min(FOOTER_HEIGHT);
        let free = height - header - footer;
        let body_height = wanted.min(free);
        Self {
            header,
            body,
            body_height,
            spacer: free - body_height,
            footer,
        }
    }

    /// Text body filling everything between header and footer.
    pub fn text(height: u16) -> Self {
        Self::new(height, Body::Text, u16::MAX)
    }

    /// Gauge body sized for `rows` gauges; leftover goes to the spacer.
    pub fn gauges(height: u16, rows: usize) -> Self {
        let wanted = u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_mul(GAUGE_ROW_HEIGHT);
        Self::new(height, Body::Gauges { rows }, wanted)
    }

    /// Single notice line where the gauges would be.
    pub fn notice(height: u16) -> Self {
        Self::new(height, Body::Notice, NOTICE_HEIGHT)
    }
}

/// Pending and committed panel content.
#[derive(Debug, Default)]
struct RenderBuffer {
    pending: PanelText,
    rendered: Option<PanelText>,
}

impl RenderBuffer {
    fn stage(&mut self, text: PanelText) {
        self.pending = text;
    }

    /// Commits the pending value. Returns true if it differs from the
    /// committed one.
    fn commit(&mut self) -> bool {
        if self.rendered.as_ref() == Some(&self.pending) {
            return false;
        }
        self.rendered = Some(std::mem::take(&mut self.pending));
        true
    }

    fn clear(&mut self) {
        self.rendered = None;
    }
}

/// Borrowed body content for the renderer.
#[derive(Debug)]
pub enum BodyView<'a> {
    Gauges(&'a GaugeSet),
    Text(&'a PanelText),
}

#[derive(Debug)]
pub struct DetailView {
    mode: ViewMode,
    selected: Option<String>,
    previously_selected: Option<String>,
    buffer: RenderBuffer,
    gauges: GaugeSet,
    /// Gauge mode shows a notice instead of gauges.
    gauge_notice: bool,
    layout: LayoutPlan,
    height: u16,
}

impl DetailView {
    pub fn new(mode: ViewMode, selected: Option<String>) -> Self {
        Self {
            mode,
            selected,
            previously_selected: None,
            buffer: RenderBuffer::default(),
            gauges: GaugeSet::new(),
            gauge_notice: false,
            layout: LayoutPlan::text(0),
            height: 0,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn previously_selected(&self) -> Option<&str> {
        self.previously_selected.as_deref()
    }

    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    pub fn header(&self) -> String {
        match &self.selected {
            Some(name) => format!(
                "drbdtop {} - Details for {}",
                env!("CARGO_PKG_VERSION"),
                name
            ),
            None => format!("drbdtop {} - no resources", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Committed body content, paired with the layout it was planned for.
    pub fn body(&self) -> BodyView<'_> {
        let committed = self.buffer.rendered.as_ref().unwrap_or(&self.buffer.pending);
        match (self.mode, self.layout.body) {
            (ViewMode::InSyncGauges, Body::Gauges { .. }) => BodyView::Gauges(&self.gauges),
            (ViewMode::InSyncGauges, Body::Notice) => BodyView::Text(committed),
            (m, Body::Text) if m.is_text() => BodyView::Text(committed),
            (m, body) => unreachable!("view mode {:?} cannot show body {:?}", m, body),
        }
    }

    /// Switches mode. The same mode is a no-op.
    pub fn set_mode(
        &mut self,
        mode: ViewMode,
        source: &dyn SnapshotSource,
        log: &dyn LogTail,
    ) -> Redraw {
        if mode == self.mode {
            return Redraw::None;
        }
        info!(from = self.mode.name(), to = mode.name(), "view mode switched");
        self.mode = mode;
        self.buffer.clear();
        self.refresh_and_relayout(source, log, self.height)
    }

    /// Selects another resource and rebuilds the layout.
    pub fn select_resource(
        &mut self,
        name: &str,
        source: &dyn SnapshotSource,
        log: &dyn LogTail,
    ) -> Redraw {
        if self.selected.as_deref() == Some(name) {
            return Redraw::None;
        }
        info!(from = ?self.selected, to = name, "resource selected");
        self.previously_selected = self.selected.replace(name.to_string());
        if self.mode == ViewMode::InSyncGauges {
            self.gauges.clear();
        }
        self.refresh_and_relayout(source, log, self.height)
    }

    pub fn next_resource(&mut self, source: &dyn SnapshotSource, log: &dyn LogTail) -> Redraw {
        self.step_resource(source, log, true)
    }

    pub fn prev_resource(&mut self, source: &dyn SnapshotSource, log: &dyn LogTail) -> Redraw {
        self.step_resource(source, log, false)
    }

    fn step_resource(
        &mut self,
        source: &dyn SnapshotSource,
        log: &dyn LogTail,
        forward: bool,
    ) -> Redraw {
        let names = source.resource_names();
        if names.is_empty() {
            return Redraw::None;
        }
        let current = self
            .selected
            .as_deref()
            .and_then(|s| names.iter().position(|n| n == s));
        let idx = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % names.len(),
            (Some(i), false) => (i + names.len() - 1) % names.len(),
        };
        self.select_resource(&names[idx], source, log)
    }

    /// Re-derives content for the current mode.
    ///
    /// A changed terminal height, a newly picked resource or a changed gauge
    /// set escalate to a relayout.
    pub fn refresh(
        &mut self,
        source: &dyn SnapshotSource,
        log: &dyn LogTail,
        height: u16,
    ) -> Redraw {
        if height != self.height || self.pick_first(source) {
            return self.refresh_and_relayout(source, log, height);
        }
        let redraw = self.update_content(source, log);
        if redraw == Redraw::Layout {
            self.relayout();
        }
        redraw
    }

    /// Re-derives content and replans the layout for `height`. Always
    /// reports a repaint.
    pub fn refresh_and_relayout(
        &mut self,
        source: &dyn SnapshotSource,
        log: &dyn LogTail,
        height: u16,
    ) -> Redraw {
        self.height = height;
        self.pick_first(source);
        // The log budget depends on the text layout; the gauge layout
        // depends on the reconciled gauge set.
        if self.mode.is_text() {
            self.relayout();
        }
        self.update_content(source, log);
        if !self.mode.is_text() {
            self.relayout();
        }
        Redraw::Layout
    }

    fn relayout(&mut self) {
        self.layout = match self.mode {
            ViewMode::InSyncGauges if self.gauge_notice => LayoutPlan::notice(self.height),
            ViewMode::InSyncGauges => LayoutPlan::gauges(self.height, self.gauges.len()),
            ViewMode::Status | ViewMode::DetailedStatus | ViewMode::LogTail => {
                LayoutPlan::text(self.height)
            }
        };
        debug!(mode = self.mode.name(), layout = ?self.layout, "relayout");
    }

    /// Selects the first known resource when nothing is selected yet.
    fn pick_first(&mut self, source: &dyn SnapshotSource) -> bool {
        if self.selected.is_some() {
            return false;
        }
        self.selected = source.resource_names().into_iter().next();
        self.selected.is_some()
    }

    /// Renders and commits the body. `Layout` means the gauge set was
    /// rebuilt or the gauge notice came or went, so the plan is stale.
    fn update_content(&mut self, source: &dyn SnapshotSource, log: &dyn LogTail) -> Redraw {
        let Some(name) = self.selected.clone() else {
            self.gauges.clear();
            self.gauge_notice = false;
            self.buffer.stage(PanelText::default());
            return self.commit_text();
        };

        match self.mode {
            ViewMode::InSyncGauges => {
                let (change, notice) = match source.snapshot(&name) {
                    Some(res) if res.unconfigured => {
                        (self.gauges.clear(), Some(render_unconfigured()))
                    }
                    Some(res) => (self.gauges.reconcile(&res), None),
                    None => (self.gauges.clear(), Some(render_missing(&name))),
                };
                let had_notice = std::mem::replace(&mut self.gauge_notice, notice.is_some());
                let text = match notice {
                    Some(text) => {
                        self.buffer.stage(text);
                        self.commit_text()
                    }
                    None => {
                        self.buffer.clear();
                        Redraw::None
                    }
                };
                if had_notice != self.gauge_notice {
                    return Redraw::Layout;
                }
                let gauges = match change {
                    GaugeChange::Rebuilt => Redraw::Layout,
                    GaugeChange::Updated => Redraw::Content,
                    GaugeChange::Unchanged => Redraw::None,
                };
                gauges.max(text)
            }
            ViewMode::Status | ViewMode::DetailedStatus => {
                let detailed = self.mode == ViewMode::DetailedStatus;
                let text = match source.snapshot(&name) {
                    Some(res) => render_status(&res, detailed),
                    None => render_missing(&name),
                };
                self.buffer.stage(text);
                self.commit_text()
            }
            ViewMode::LogTail => {
                let budget = log_line_budget(self.text_body_height());
                let fetched = log.tail(&name, budget);
                if let Err(e) = &fetched {
                    debug!(resource = %name, error = %e, "log tail failed");
                }
                self.buffer.stage(render_log_tail(&name, &fetched, budget));
                self.commit_text()
            }
        }
    }

    fn commit_text(&mut self) -> Redraw {
        if self.buffer.commit() {
            Redraw::Content
        } else {
            Redraw::None
        }
    }

    fn text_body_height(&self) -> u16 {
        match self.layout.body {
            Body::Text => self.layout.body_height,
            body => unreachable!("text mode {:?} planned with body {:?}", self.mode, body),
        }
    }
}
