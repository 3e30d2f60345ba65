//! Accept/skip level filtering

use super::log_level::LogLevel;
use super::message::Message;
use std::collections::HashSet;

/// Decides whether a handler processes a message, by level membership.
///
/// A non-empty accept set wins: only its levels pass. Otherwise a non-empty
/// skip set rejects its levels. With neither set, every level passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFilter {
    accept_levels: Option<HashSet<LogLevel>>,
    skip_levels: Option<HashSet<LogLevel>>,
}

impl LevelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_accept_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.set_accept_levels(Some(levels.into_iter().collect()));
        self
    }

    #[must_use]
    pub fn with_skip_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.set_skip_levels(Some(levels.into_iter().collect()));
        self
    }

    /// Replace the accept set. `None` clears it.
    pub fn set_accept_levels(&mut self, levels: Option<HashSet<LogLevel>>) {
        self.accept_levels = levels;
    }

    /// Replace the skip set. `None` clears it.
    pub fn set_skip_levels(&mut self, levels: Option<HashSet<LogLevel>>) {
        self.skip_levels = levels;
    }

    pub fn accept_levels(&self) -> Option<&HashSet<LogLevel>> {
        self.accept_levels.as_ref()
    }

    pub fn skip_levels(&self) -> Option<&HashSet<LogLevel>> {
        self.skip_levels.as_ref()
    }

    #[inline]
    pub fn accepts_level(&self, level: LogLevel) -> bool {
        if let Some(accept) = self.accept_levels.as_ref().filter(|set| !set.is_empty()) {
            return accept.contains(&level);
        }

        if let Some(skip) = self.skip_levels.as_ref().filter(|set| !set.is_empty()) {
            return !skip.contains(&level);
        }

        true
    }

    #[inline]
    pub fn accepts(&self, message: &Message) -> bool {
        self.accepts_level(message.level)
    }
}
