//! Ordered listener collection fed by the socket session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hippy_devtools_common::DevtoolsFrame;

use crate::error::DevtoolsError;

/// Callback receiving every non-handshake frame.
pub type Listener = Rc<dyn Fn(&DevtoolsFrame) -> Result<(), DevtoolsError>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Listener collection shared between the socket session and the bridge.
///
/// Delivery order is registration order. Cloning yields another handle to
/// the same collection.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

/// Outcome of delivering one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that returned `Ok`
    pub delivered: usize,
    /// Listeners that returned an error
    pub failed: usize,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` and returns the handle that removes it again.
    pub fn register(&self, listener: Listener) -> Unsubscribe {
        let mut registry = self.inner.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, listener));

        Unsubscribe {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    /// Delivers `frame` to the listeners registered right now, in order.
    ///
    /// Listeners added or removed by a callback take effect from the next
    /// frame on. A failing listener is logged and the remaining listeners
    /// still receive the frame.
    pub fn dispatch(&self, frame: &DevtoolsFrame) -> DispatchReport {
        let snapshot: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        let mut report = DispatchReport::default();
        for listener in snapshot {
            match listener(frame) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    log::error!(
                        "[DevTools] Error calling listener for '{}': {}",
                        frame.event,
                        e
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }
}

/// Removes one listener registration. Calling it more than once is harmless.
pub struct Unsubscribe {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Unsubscribe {
    /// A handle that is not attached to any registry.
    pub fn detached() -> Self {
        Self {
            registry: Weak::new(),
            id: 0,
        }
    }

    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn recording(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Listener {
        let log = log.clone();
        Rc::new(move |frame: &DevtoolsFrame| -> Result<(), DevtoolsError> {
            log.borrow_mut().push(format!("{name}:{}", frame.event));
            Ok(())
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.register(recording(&log, "a"));
        let b = registry.register(recording(&log, "b"));
        registry.register(recording(&log, "c"));

        registry.dispatch(&DevtoolsFrame::new("one", json!(null)));
        b.unsubscribe();
        registry.register(recording(&log, "d"));
        let report = registry.dispatch(&DevtoolsFrame::new("two", json!(null)));

        assert_eq!(
            *log.borrow(),
            vec!["a:one", "b:one", "c:one", "a:two", "c:two", "d:two"]
        );
        assert_eq!(report.delivered, 3);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = registry.register(recording(&log, "a"));
        registry.register(recording(&log, "b"));

        a.unsubscribe();
        a.unsubscribe();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_listener_removing_itself_still_gets_current_frame() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

        let self_removing: Listener = {
            let log = log.clone();
            let handle = handle.clone();
            Rc::new(move |frame: &DevtoolsFrame| -> Result<(), DevtoolsError> {
                log.borrow_mut().push(format!("once:{}", frame.event));
                if let Some(handle) = handle.borrow_mut().take() {
                    handle.unsubscribe();
                }
                Ok(())
            })
        };
        *handle.borrow_mut() = Some(registry.register(self_removing));
        registry.register(recording(&log, "after"));

        registry.dispatch(&DevtoolsFrame::new("x", json!(null)));
        registry.dispatch(&DevtoolsFrame::new("y", json!(null)));

        assert_eq!(*log.borrow(), vec!["once:x", "after:x", "after:y"]);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_still_gets_current_frame() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let later: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

        let remover: Listener = {
            let log = log.clone();
            let later = later.clone();
            Rc::new(move |frame: &DevtoolsFrame| -> Result<(), DevtoolsError> {
                log.borrow_mut().push(format!("remover:{}", frame.event));
                if let Some(handle) = later.borrow_mut().take() {
                    handle.unsubscribe();
                }
                Ok(())
            })
        };
        registry.register(remover);
        *later.borrow_mut() = Some(registry.register(recording(&log, "later")));

        let report = registry.dispatch(&DevtoolsFrame::new("x", json!(null)));
        assert_eq!(report.delivered, 2);
        assert_eq!(registry.len(), 1);
        registry.dispatch(&DevtoolsFrame::new("y", json!(null)));

        assert_eq!(*log.borrow(), vec!["remover:x", "later:x", "remover:y"]);
    }

    #[test]
    fn test_failing_listener_does_not_stop_dispatch() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.register(Rc::new(|_: &DevtoolsFrame| -> Result<(), DevtoolsError> {
            Err(DevtoolsError::NoContentNode)
        }));
        registry.register(recording(&log, "b"));

        let report = registry.dispatch(&DevtoolsFrame::new("x", json!(1)));
        assert_eq!(report, DispatchReport { delivered: 1, failed: 1 });
        assert_eq!(*log.borrow(), vec!["b:x"]);
    }

    #[test]
    fn test_detached_unsubscribe() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        registry.register(recording(&log, "a"));

        Unsubscribe::detached().unsubscribe();
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }
}
