//! Live highlight synchronization between the editing form and the preview.
//!
//! Form focus arrives as [`FormSignal`]s (or direct [`Synchronizer::highlight_field`]
//! calls) at interaction rate. Requests are debounced so that only the last
//! one inside the quiet window is applied; applying clears the previous
//! highlight, locates the field in the preview and decorates it. Scrolling is
//! handed to the host as a [`FrameRequest`] for its next frame.

mod debounce;
mod reverse;
mod styles;
mod tooltip;
mod visibility;

pub use debounce::Debouncer;
pub use reverse::{SyncBinding, setup_bidirectional_sync};
pub use styles::{
    CLICKABLE_CLASS, HIGHLIGHT_CLASS, HIGHLIGHT_CSS, STYLE_ELEMENT_ID, TOOLTIP_CLASS,
    inject_styles,
};
pub use visibility::is_rendered;

use crate::config::SyncConfig;
use crate::locator::locate;
use html::{DOM, NodeId};
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use tokio::time::{Instant, sleep_until};
use tooltip::spawn_tooltip;

/// A highlight waiting out the debounce window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightRequest {
    pub field: String,
    /// Label for the tooltip; no tooltip without one.
    pub display_name: Option<String>,
}

/// Focus changes reported by the editing form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSignal {
    Focus {
        field: String,
        display_name: Option<String>,
    },
    Blur,
}

/// Work for the host to perform on its next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRequest {
    ScrollIntoView { node: NodeId, centered: bool },
}

/// Result of applying a highlight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HighlightOutcome {
    Highlighted { field: String, node: NodeId },
    NotFound { field: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Highlighted {
    node: NodeId,
    tooltip: Option<NodeId>,
}

/// Owns the highlight state for one preview document.
///
/// The document itself is borrowed per call; only node handles are kept, and
/// each is checked against the document before it is touched.
#[derive(Debug)]
pub struct Synchronizer {
    config: SyncConfig,
    active: Option<String>,
    highlighted: HashMap<String, Highlighted>,
    requests: Debouncer<HighlightRequest>,
    frame_requests: Vec<FrameRequest>,
    binding: SyncBinding,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

impl Synchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            active: None,
            highlighted: HashMap::new(),
            requests: Debouncer::new(config.debounce()),
            frame_requests: Vec::new(),
            binding: SyncBinding::detached(),
        }
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Request a highlight of `field`. Replaces any request still waiting.
    pub fn highlight_field(&mut self, field: &str, display_name: Option<&str>) {
        self.highlight_field_at(field, display_name, Instant::now());
    }

    /// [`Synchronizer::highlight_field`] with an explicit request time.
    pub fn highlight_field_at(&mut self, field: &str, display_name: Option<&str>, now: Instant) {
        trace!("highlight requested for {field:?}");
        self.requests.schedule(
            HighlightRequest {
                field: field.to_owned(),
                display_name: display_name.map(str::to_owned),
            },
            now,
        );
    }

    pub fn pending_field(&self) -> Option<&str> {
        self.requests.pending().map(|request| request.field.as_str())
    }

    /// When the waiting request becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.requests.deadline()
    }

    /// Number of requests dropped because a newer one arrived first.
    pub const fn superseded_requests(&self) -> u64 {
        self.requests.superseded()
    }

    /// Apply the waiting request if it is due at `now`.
    pub fn poll(&mut self, dom: &mut DOM, now: Instant) -> Option<HighlightOutcome> {
        let request = self.requests.take_due(now)?;
        Some(self.apply(dom, request))
    }

    /// Wait out the debounce window and apply the waiting request, if any.
    pub async fn settle(&mut self, dom: &mut DOM) -> Option<HighlightOutcome> {
        let deadline = self.requests.deadline()?;
        sleep_until(deadline).await;
        self.poll(dom, Instant::now())
    }

    fn apply(&mut self, dom: &mut DOM, request: HighlightRequest) -> HighlightOutcome {
        self.clear_decorations(dom);
        let Some(node) = locate(dom, &request.field) else {
            debug!("field {:?} not present in preview", request.field);
            return HighlightOutcome::NotFound {
                field: request.field,
            };
        };
        dom.add_class(node, HIGHLIGHT_CLASS);
        let label = request
            .display_name
            .as_deref()
            .filter(|name| self.config.tooltips_enabled && !name.trim().is_empty());
        let tooltip = match label.map(|name| spawn_tooltip(dom, node, name)) {
            Some(Ok(tooltip)) => tooltip,
            Some(Err(error)) => {
                warn!("tooltip for {:?} not attached: {error}", request.field);
                None
            }
            None => None,
        };
        self.highlighted
            .insert(request.field.clone(), Highlighted { node, tooltip });
        self.active = Some(request.field.clone());
        if self.config.scroll_into_view {
            self.frame_requests.push(FrameRequest::ScrollIntoView {
                node,
                centered: true,
            });
        }
        info!("highlighted field {:?} at {node:?}", request.field);
        HighlightOutcome::Highlighted {
            field: request.field,
            node,
        }
    }

    /// Remove every decoration and tooltip, drop queued frame work and any
    /// waiting request. A no-op when already idle.
    pub fn clear_highlight(&mut self, dom: &mut DOM) {
        if self.requests.cancel() {
            trace!("pending highlight cancelled");
        }
        self.clear_decorations(dom);
    }

    fn clear_decorations(&mut self, dom: &mut DOM) {
        for (field, entry) in self.highlighted.drain() {
            if dom.contains(entry.node) {
                dom.remove_class(entry.node, HIGHLIGHT_CLASS);
            }
            if let Some(tooltip) = entry.tooltip.filter(|tooltip| dom.contains(*tooltip)) {
                dom.remove_node(tooltip);
            }
            trace!("cleared highlight of {field:?}");
        }
        self.active = None;
        self.frame_requests.clear();
    }

    pub fn active_field(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Element currently decorated for `field`.
    pub fn highlighted_node(&self, field: &str) -> Option<NodeId> {
        self.highlighted.get(field).map(|entry| entry.node)
    }

    pub fn tooltip_node(&self, field: &str) -> Option<NodeId> {
        self.highlighted.get(field).and_then(|entry| entry.tooltip)
    }

    /// No highlight shown and none waiting.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.highlighted.is_empty() && self.requests.pending().is_none()
    }

    /// Drain work queued for the host's next frame.
    pub fn take_frame_requests(&mut self) -> Vec<FrameRequest> {
        core::mem::take(&mut self.frame_requests)
    }

    pub fn handle_form_signal(&mut self, dom: &mut DOM, signal: FormSignal) {
        match signal {
            FormSignal::Focus {
                field,
                display_name,
            } => self.highlight_field(&field, display_name.as_deref()),
            FormSignal::Blur => self.clear_highlight(dom),
        }
    }

    /// Install click sync on `dom`, replacing one installed earlier by this
    /// synchronizer. The returned handle and [`Synchronizer::cleanup`] can both release it.
    pub fn setup_bidirectional_sync<F>(&mut self, dom: &mut DOM, on_field_click: F) -> SyncBinding
    where
        F: FnMut(&str) + 'static,
    {
        self.binding.release(dom);
        self.binding = setup_bidirectional_sync(dom, on_field_click);
        self.binding.clone()
    }

    /// Tear down everything this synchronizer installed. Safe to call repeatedly.
    pub fn cleanup(&mut self, dom: &mut DOM) {
        self.clear_highlight(dom);
        if self.binding.release(dom) {
            debug!("click sync released during cleanup");
        }
    }
}
