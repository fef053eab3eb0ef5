use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Token for one attached pointer-move/pointer-up listener pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Attaches the global pointer listeners a drag consumes.
///
/// Every `subscribe` is paired with exactly one `unsubscribe` on each path
/// out of the dragging state.
pub trait PointerCapture {
    fn subscribe(&mut self) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Bookkeeping implementation that tracks which listeners are attached.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: HashSet<ListenerId>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, id: ListenerId) -> bool {
        self.active.contains(&id)
    }
}

impl PointerCapture for ListenerRegistry {
    fn subscribe(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.insert(id);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        if !self.active.remove(&id) {
            log::warn!("Pointer listener {:?} was not attached", id);
        }
    }
}

impl<T: PointerCapture> PointerCapture for Rc<RefCell<T>> {
    fn subscribe(&mut self) -> ListenerId {
        self.borrow_mut().subscribe()
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.borrow_mut().unsubscribe(id)
    }
}
