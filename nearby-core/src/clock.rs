//! Wall-clock capability used to evaluate opening hours.

use chrono::{Local, NaiveDateTime};

/// Source of the current local time.
///
/// Pipelines read the clock once per run so every candidate is evaluated
/// against the same instant.
pub trait Clock: Send + Sync {
    /// Return the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// [`Clock`] backed by the operating system's local time zone.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
