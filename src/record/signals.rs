use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures_channel::oneshot;
use tracing::debug;

/// Named, fire-once signals of a single record's content source.
///
/// Cloning shares the same source. Listeners attached after a name fired
/// resolve immediately; a second emit of the same name is ignored. When
/// every clone is dropped, the listeners still waiting are cancelled.
#[derive(Debug, Clone, Default)]
pub struct ContentSignals {
    state: Rc<RefCell<SignalState>>,
}

#[derive(Debug, Default)]
struct SignalState {
    fired: HashSet<String>,
    listeners: HashMap<String, Vec<oneshot::Sender<()>>>,
}

impl ContentSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&self, event: &str) -> oneshot::Receiver<()> {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.borrow_mut();
        if state.fired.contains(event) {
            // The receiver is still alive here, so this cannot fail.
            let _ = sender.send(());
        } else {
            state
                .listeners
                .entry(event.to_string())
                .or_default()
                .push(sender);
        }
        receiver
    }

    /// Fires `event`. Returns `false` if it had already fired.
    pub fn emit(&self, event: &str) -> bool {
        let listeners = {
            let mut state = self.state.borrow_mut();
            if !state.fired.insert(event.to_string()) {
                return false;
            }
            state.listeners.remove(event).unwrap_or_default()
        };
        debug!("Signal '{}' fired for {} listener(s)", event, listeners.len());
        for listener in listeners {
            // A listener dropped on the other side is simply no longer interested.
            let _ = listener.send(());
        }
        true
    }

    pub fn has_fired(&self, event: &str) -> bool {
        self.state.borrow().fired.contains(event)
    }
}
