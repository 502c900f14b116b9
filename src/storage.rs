//! Key/value persistence for the email prompt.
//!
//! The prompt keeps three flags across page loads. Two live in the durable
//! tier (`localStorage`) and one in the session tier (`sessionStorage`).
//! Everything goes through [`KeyValueStore`] so the gate can be driven by an
//! in-memory store in tests, or when the browser refuses storage access.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use thiserror::Error;

pub const SUBMITTED_KEY: &str = "provokely_modal_submitted";
pub const CLOSED_AT_KEY: &str = "provokely_modal_closed_at";
pub const SHOWN_SESSION_KEY: &str = "provokely_modal_shown_session";

const TRUE_VALUE: &str = "1";

#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Durable,
    Session,
}

/// `localStorage` / `sessionStorage` backed store.
pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    pub fn open(tier: Tier) -> Option<Self> {
        let window = web_sys::window()?;
        let storage = match tier {
            Tier::Durable => window.local_storage(),
            Tier::Session => window.session_storage(),
        };
        storage.ok().flatten().map(|storage| Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Opens the browser store for `tier`, or falls back to memory so the page
/// keeps working with storage disabled.
pub fn open_store(tier: Tier) -> Rc<dyn KeyValueStore> {
    match BrowserStore::open(tier) {
        Some(store) => Rc::new(store),
        None => {
            warn!("{:?} storage unavailable, prompt state will not persist", tier);
            Rc::new(MemoryStore::default())
        }
    }
}

/// Typed view over the prompt's persisted flags.
#[derive(Clone)]
pub struct PromptFlags {
    durable: Rc<dyn KeyValueStore>,
    session: Rc<dyn KeyValueStore>,
}

impl PromptFlags {
    pub fn new(durable: Rc<dyn KeyValueStore>, session: Rc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    pub fn browser() -> Self {
        Self::new(open_store(Tier::Durable), open_store(Tier::Session))
    }

    pub fn submitted(&self) -> bool {
        self.durable.get(SUBMITTED_KEY).as_deref() == Some(TRUE_VALUE)
    }

    pub fn mark_submitted(&self) {
        write(&*self.durable, SUBMITTED_KEY, TRUE_VALUE);
    }

    /// Epoch millis of the last dismissal; 0 when never dismissed or unreadable.
    pub fn closed_at(&self) -> i64 {
        self.durable
            .get(CLOSED_AT_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(0)
    }

    pub fn record_closed(&self, now_ms: i64) {
        write(&*self.durable, CLOSED_AT_KEY, &now_ms.to_string());
    }

    pub fn shown_this_session(&self) -> bool {
        self.session.get(SHOWN_SESSION_KEY).as_deref() == Some(TRUE_VALUE)
    }

    pub fn mark_shown(&self) {
        write(&*self.session, SHOWN_SESSION_KEY, TRUE_VALUE);
    }
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!("{}", e);
    }
}

#[cfg(test)]
pub(crate) fn memory_flags() -> (PromptFlags, Rc<MemoryStore>, Rc<MemoryStore>) {
    let durable = Rc::new(MemoryStore::default());
    let session = Rc::new(MemoryStore::default());
    let flags = PromptFlags::new(durable.clone(), session.clone());
    (flags, durable, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_default_to_unset() {
        let (flags, _, _) = memory_flags();
        assert!(!flags.submitted());
        assert!(!flags.shown_this_session());
        assert_eq!(flags.closed_at(), 0);
    }

    #[test]
    fn flags_use_opaque_string_encoding() {
        let (flags, durable, session) = memory_flags();
        flags.mark_submitted();
        flags.mark_shown();
        flags.record_closed(1_700_000_000_123);

        assert_eq!(durable.get(SUBMITTED_KEY).as_deref(), Some("1"));
        assert_eq!(session.get(SHOWN_SESSION_KEY).as_deref(), Some("1"));
        assert_eq!(durable.get(CLOSED_AT_KEY).as_deref(), Some("1700000000123"));
        assert_eq!(flags.closed_at(), 1_700_000_000_123);
    }

    #[test]
    fn session_flag_does_not_leak_into_durable_tier() {
        let (flags, durable, _) = memory_flags();
        flags.mark_shown();
        assert_eq!(durable.get(SHOWN_SESSION_KEY), None);
    }

    #[test]
    fn only_literal_one_counts_as_true() {
        let (flags, durable, _) = memory_flags();
        durable.set(SUBMITTED_KEY, "true").unwrap();
        assert!(!flags.submitted());
        durable.set(SUBMITTED_KEY, "1").unwrap();
        assert!(flags.submitted());
    }

    #[test]
    fn garbage_timestamp_reads_as_never_closed() {
        let (flags, durable, _) = memory_flags();
        durable.set(CLOSED_AT_KEY, "yesterday").unwrap();
        assert_eq!(flags.closed_at(), 0);
    }
}
