use crate::{
    dto::{Page, PageRequest},
    model::log::{LogBuffer, LogEntry, log_config},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Level
///

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Display, Serialize, Deserialize)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Config,
    Cut,
    Registry,
    Selector,
    TokenService,
    Transfer,
}

impl Topic {
    /// Snake-case key entries are stored and filtered under.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Cut => "cut",
            Self::Registry => "registry",
            Self::Selector => "selector",
            Self::TokenService => "token_service",
            Self::Transfer => "transfer",
        }
    }
}

#[macro_export]
macro_rules! log {
    // =========================================
    // (1) With topic (normal + trailing comma)
    // =========================================
    ($topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner Some($topic), $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // (2) No topic (normal + trailing comma)
    // =========================================
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(
            @inner None::<$crate::log::Topic>,
            $crate::log::Level::$level,
            $fmt $(, $arg)*
        );
    }};

    // =========================================
    // INTERNAL
    // =========================================
    (@inner $topic:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let message = format!($fmt $(, $arg)*);
        $crate::log::__record(env!("CARGO_PKG_NAME"), $topic, $level, &message);
    }};
}

///
/// Helpers
///

#[doc(hidden)]
pub fn __record(crate_name: &str, topic: Option<Topic>, level: Level, message: &str) {
    if log_config().echo {
        println!("{}", render_line(crate_name, topic, level, message));
    }

    LogBuffer::append(LogEntry::new(crate_name, level, topic, message));
}

fn render_line(crate_name: &str, topic: Option<Topic>, level: Level, message: &str) -> String {
    let name = crate::utils::format::ellipsize_middle(crate_name, 9, 4, 4);
    let name_centered = format!("{name:^9}");

    let (color, reset) = match level {
        Level::Ok => ("\x1b[32m", "\x1b[0m"),
        Level::Info => ("\x1b[34m", "\x1b[0m"),
        Level::Warn => ("\x1b[33m", "\x1b[0m"),
        Level::Error => ("\x1b[31m", "\x1b[0m"),
        Level::Debug => ("", ""),
    };
    let label = format!("{color}{:^5}{reset}", level.to_string().to_uppercase());

    match topic {
        Some(t) => format!("{label}|{name_centered}| [{t}] {message}"),
        None => format!("{label}|{name_centered}| {message}"),
    }
}

/// Page through retained log entries, oldest first.
#[must_use]
pub fn entries_page(
    topic: Option<Topic>,
    min_level: Option<Level>,
    request: PageRequest,
) -> Page<LogEntry> {
    LogBuffer::entries_page(topic, min_level, request)
}

///
/// TESTS
///
