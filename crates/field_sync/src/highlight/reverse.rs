//! Preview to form direction: clicking a field element focuses its field.

use super::styles::CLICKABLE_CLASS;
use super::visibility::is_rendered;
use crate::locator::{REVERSE_LOOKUP_ATTRIBUTES, field_id_of};
use html::{ClickEvent, DOM, ListenerId, NodeId};
use log::{debug, info, warn};

/// Handle to an installed click listener. Releasing it more than once is harmless.
///
/// The handle belongs to the document it was installed on. Releasing it
/// against another document removes nothing and leaves the handle active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncBinding {
    listener: Option<ListenerId>,
}

impl SyncBinding {
    /// A binding with nothing installed.
    pub const fn detached() -> Self {
        Self { listener: None }
    }

    pub const fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Remove the listener from `dom`. Returns whether a listener was removed.
    pub fn release(&mut self, dom: &mut DOM) -> bool {
        let Some(listener) = self.listener else {
            return false;
        };
        if !dom.remove_click_listener(listener) {
            debug!("click sync listener {listener:?} is not installed in this document");
            return false;
        }
        self.listener = None;
        debug!("released click sync listener {listener:?}");
        true
    }
}

/// Install one click listener on `<body>` that reports the field identifier
/// of a clicked element to `on_field_click`, and mark every visible element
/// that exposes an identifier with the clickable class.
///
/// A click on an element without an identifier does nothing; a recognized
/// click has its default action prevented.
pub fn setup_bidirectional_sync<F>(dom: &mut DOM, mut on_field_click: F) -> SyncBinding
where
    F: FnMut(&str) + 'static,
{
    let Some(body) = dom.body() else {
        warn!("document has no body; click sync not installed");
        return SyncBinding::detached();
    };
    let marked = mark_clickable(dom, body);
    let listener = dom.add_click_listener(
        body,
        Box::new(move |dom: &DOM, event: &mut ClickEvent| {
            let Some(field) = field_id_of(dom, event.target) else {
                return;
            };
            debug!("click on {:?} selects field {field:?}", event.target);
            event.prevent_default();
            on_field_click(field);
        }),
    );
    info!("click sync installed; {marked} element(s) marked clickable");
    SyncBinding {
        listener: Some(listener),
    }
}

/// Add the clickable class to rendered elements under `scope` exposing an identifier.
fn mark_clickable(dom: &mut DOM, scope: NodeId) -> usize {
    let targets: Vec<NodeId> = dom
        .descendants(scope)
        .filter(|node| {
            REVERSE_LOOKUP_ATTRIBUTES
                .iter()
                .any(|name| dom.attr(*node, name).is_some_and(|value| !value.trim().is_empty()))
        })
        .filter(|node| is_rendered(dom, *node))
        .collect();
    for node in &targets {
        dom.add_class(*node, CLICKABLE_CLASS);
    }
    targets.len()
}
