//! Click listener registry with bubbling dispatch.

use super::{DOM, NodeId};
use core::fmt;
use core::mem::take;
use core::sync::atomic::{AtomicU64, Ordering};

/// Source of listener ids, shared by every document in the process.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`DOM::add_click_listener`]. Unique across documents, so a
/// handle presented to the wrong document matches nothing there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A click travelling from its target up to the document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
    pub current_target: NodeId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type ClickListener = Box<dyn FnMut(&DOM, &mut ClickEvent)>;

struct Registered {
    id: ListenerId,
    node: NodeId,
    listener: ClickListener,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<Registered>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.entries.len())
            .finish()
    }
}

impl DOM {
    /// Register a click listener on `node`. Listeners see clicks on `node` and on
    /// any of its descendants.
    pub fn add_click_listener(&mut self, node: NodeId, listener: ClickListener) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.listeners.entries.push(Registered { id, node, listener });
        id
    }

    /// Remove a listener. Returns false if it was already gone or belongs to another document.
    pub fn remove_click_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.entries.len();
        self.listeners.entries.retain(|entry| entry.id != id);
        self.listeners.entries.len() != before
    }

    pub fn click_listener_count(&self) -> usize {
        self.listeners.entries.len()
    }

    /// Deliver a click at `target`, bubbling through its ancestors.
    pub fn dispatch_click(&mut self, target: NodeId) -> ClickEvent {
        let mut event = ClickEvent {
            target,
            current_target: target,
            default_prevented: false,
        };
        let path: Vec<NodeId> = target.ancestors(&self.arena).collect();
        // Listeners only get `&DOM`, so the registry can be moved out for the walk.
        let mut entries = take(&mut self.listeners.entries);
        for node in path {
            event.current_target = node;
            for entry in entries.iter_mut().filter(|entry| entry.node == node) {
                (entry.listener)(self, &mut event);
            }
        }
        self.listeners.entries = entries;
        event
    }
}
