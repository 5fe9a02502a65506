//! Bounded in-process log buffer backing the `log!` macro.
//!
//! Retention follows the active `LogConfig`: at most `max_entries` entries
//! are kept (oldest evicted first) and each message is cut to
//! `max_entry_bytes`.

use crate::{
    config::{Config, schema::LogConfig},
    dto::{Page, PageRequest},
    log::{Level, Topic},
    utils::{format, time},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg(not(test))]
static LOG: std::sync::Mutex<VecDeque<LogEntry>> = std::sync::Mutex::new(VecDeque::new());

#[cfg(not(test))]
fn with_log<R>(f: impl FnOnce(&mut VecDeque<LogEntry>) -> R) -> R {
    let mut guard = LOG.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    f(&mut guard)
}

// Unit tests run one per thread; a per-thread buffer keeps them apart.
#[cfg(test)]
thread_local! {
    static LOG: std::cell::RefCell<VecDeque<LogEntry>> =
        const { std::cell::RefCell::new(VecDeque::new()) };
}

#[cfg(test)]
fn with_log<R>(f: impl FnOnce(&mut VecDeque<LogEntry>) -> R) -> R {
    LOG.with_borrow_mut(f)
}

pub(crate) fn log_config() -> LogConfig {
    Config::try_get().map(|c| c.log.clone()).unwrap_or_default()
}

///
/// LogEntry
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogEntry {
    pub crate_name: String,
    pub created_at: u64,
    pub level: Level,
    pub topic: Option<String>,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(crate_name: &str, level: Level, topic: Option<Topic>, message: &str) -> Self {
        Self {
            crate_name: crate_name.to_string(),
            created_at: time::now_secs(),
            level,
            topic: topic.map(|t| t.as_str().to_string()),
            message: message.to_string(),
        }
    }
}

///
/// LogBuffer
///

pub struct LogBuffer;

impl LogBuffer {
    /// Append an entry, applying the configured size limits.
    /// Returns the number of entries retained afterwards.
    pub fn append(mut entry: LogEntry) -> usize {
        let cfg = log_config();
        if cfg.max_entries == 0 {
            return 0;
        }

        let max_bytes = usize::try_from(cfg.max_entry_bytes).unwrap_or(usize::MAX);
        if entry.message.len() > max_bytes {
            entry.message = format::truncate_bytes(&entry.message, max_bytes).to_string();
        }

        let max_entries = usize::try_from(cfg.max_entries).unwrap_or(usize::MAX);
        with_log(|log| {
            log.push_back(entry);
            while log.len() > max_entries {
                log.pop_front();
            }
            log.len()
        })
    }

    /// Filtered page of entries, oldest first.
    #[must_use]
    pub fn entries_page(
        topic: Option<Topic>,
        min_level: Option<Level>,
        request: PageRequest,
    ) -> Page<LogEntry> {
        let request = request.clamped();
        let offset = usize::try_from(request.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        let topic = topic.map(Topic::as_str);

        with_log(|log| {
            let matching: Vec<&LogEntry> = log
                .iter()
                .filter(|e| topic.is_none_or(|t| e.topic.as_deref() == Some(t)))
                .filter(|e| min_level.is_none_or(|min| e.level >= min))
                .collect();

            Page {
                total: matching.len() as u64,
                entries: matching
                    .into_iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect(),
            }
        })
    }

    pub fn clear() {
        with_log(VecDeque::clear);
    }
}

///
/// TESTS
///
