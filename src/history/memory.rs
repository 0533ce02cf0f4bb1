//! In-memory history stack.
//!
//! Behaves like a browser session history: `push` truncates any forward
//! entries, `back`/`forward` move through the stack and notify listeners
//! the way a pop-state event would.

use std::sync::{Arc, Mutex, Weak};

use crate::history::{HistoryAdapter, PathListener, Unsubscribe};

type SharedListener = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Default)]
struct MemoryState {
    entries: Vec<String>,
    index: usize,
    listeners: Vec<(u64, SharedListener)>,
    next_listener_id: u64,
}

/// A history backend that lives entirely in memory.
///
/// Clones share the same stack, so a test can keep a handle while the
/// router owns another.
#[derive(Clone)]
pub struct MemoryHistory {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryHistory {
    /// Create a history with a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        let state = MemoryState {
            entries: vec![initial.into()],
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Move one entry back. Returns `false` at the start of the stack.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Move one entry forward. Returns `false` at the end of the stack.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries and notify listeners of the new location.
    pub fn go(&self, delta: isize) -> bool {
        let (path, listeners) = {
            let mut state = self.lock();
            let Some(target) = state.index.checked_add_signed(delta) else {
                return false;
            };
            if target >= state.entries.len() {
                return false;
            }
            state.index = target;

            let listeners: Vec<SharedListener> =
                state.listeners.iter().map(|(_, l)| l.clone()).collect();
            (state.entries[target].clone(), listeners)
        };

        tracing::trace!(path = %path, delta, "Memory history moved");
        for listener in listeners {
            listener(path.clone());
        }
        true
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.lock().index
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory history mutex poisoned")
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryAdapter for MemoryHistory {
    fn current_path(&self) -> String {
        let state = self.lock();
        state.entries[state.index].clone()
    }

    fn listen(&self, on_change: PathListener) -> Unsubscribe {
        let id = {
            let mut state = self.lock();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push((id, Arc::from(on_change)));
            id
        };

        let weak: Weak<Mutex<MemoryState>> = Arc::downgrade(&self.state);
        Unsubscribe::new(move || {
            if let Some(state) = weak.upgrade() {
                if let Ok(mut state) = state.lock() {
                    state.listeners.retain(|(listener_id, _)| *listener_id != id);
                }
            }
        })
    }

    fn push(&self, path: &str) {
        let mut state = self.lock();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(path.to_string());
        state.index = keep;
    }

    fn replace(&self, path: &str) {
        let mut state = self.lock();
        let index = state.index;
        state.entries[index] = path.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_push_and_replace() {
        let history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        history.replace("/c");

        assert_eq!(history.entries(), ["/", "/a", "/c"]);
        assert_eq!(history.current_path(), "/c");
    }

    #[test]
    fn test_back_forward_notify() {
        let history = MemoryHistory::new("/");
        history.push("/a");

        let seen = Arc::new(StdMutex::new(Vec::new()));
        let s = seen.clone();
        let _handle = history.listen(Box::new(move |path| s.lock().unwrap().push(path)));

        assert!(history.back());
        assert!(!history.back());
        assert!(history.forward());
        assert!(!history.forward());

        assert_eq!(*seen.lock().unwrap(), ["/", "/a"]);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        history.back();
        history.back();
        history.push("/c");

        assert_eq!(history.entries(), ["/", "/c"]);
        assert!(!history.forward());
    }

    #[test]
    fn test_push_does_not_notify() {
        let history = MemoryHistory::new("/");
        let seen = Arc::new(StdMutex::new(Vec::<String>::new()));
        let s = seen.clone();
        let _handle = history.listen(Box::new(move |path| s.lock().unwrap().push(path)));

        history.push("/a");
        history.replace("/b");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_on_drop() {
        let history = MemoryHistory::new("/");
        let handle = history.listen(Box::new(|_| {}));
        assert_eq!(history.listener_count(), 1);

        drop(handle);
        assert_eq!(history.listener_count(), 0);
    }
}
