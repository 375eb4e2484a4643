use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Display names currently in use, plus the number of named connections.
///
/// Names are kept as a multiset: two connections that pick the same name
/// each hold one entry, so the connection count and the number of entries
/// always agree. Every mutation happens under a single lock and returns the
/// count observed inside it.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    inner: Mutex<Names>,
}

#[derive(Debug, Default)]
struct Names {
    active: HashMap<String, usize>,
    count: usize,
}

impl Names {
    fn check_invariant(&self) {
        debug_assert_eq!(
            self.count,
            self.active.values().sum::<usize>(),
            "presence count diverged from active names"
        );
    }
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Names> {
        // Nothing panics between the map and counter updates, so a poisoned
        // guard still holds consistent data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `name` for one more connection. Returns the new count.
    pub fn register_name(&self, name: &str) -> usize {
        let mut names = self.lock();
        *names.active.entry(name.to_string()).or_insert(0) += 1;
        names.count += 1;
        names.check_invariant();
        names.count
    }

    /// Release one connection's hold on `name`. Returns the new count, which
    /// is unchanged when the name was not registered.
    pub fn unregister_name(&self, name: &str) -> usize {
        let mut names = self.lock();
        let released = match names.active.get_mut(name) {
            Some(holders) if *holders > 1 => {
                *holders -= 1;
                true
            }
            Some(_) => {
                names.active.remove(name);
                true
            }
            None => false,
        };
        if released {
            names.count = names.count.saturating_sub(1);
        }
        names.check_invariant();
        names.count
    }

    pub fn count(&self) -> usize {
        self.lock().count
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.lock().active.contains_key(name)
    }

    /// Distinct names in use, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().active.keys().cloned().collect();
        names.sort();
        names
    }
}
