use chrono::{Duration, NaiveDate, Weekday};

use crate::{ExerciseConflict, Interval};

/// Caller-owned view and interaction state, threaded explicitly into the
/// operations that need it instead of living in module globals.
#[derive(Debug, Default)]
pub struct Session {
    week_offset: i64,
    pending_conflict: Option<ExerciseConflict>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The browsed week as an inclusive Monday-to-Sunday interval, shifted
    /// from the week containing `today` by the browsed offset.
    #[must_use]
    pub fn week(&self, today: NaiveDate) -> Interval {
        let first = today.week(Weekday::Mon).first_day() + Duration::days(7 * self.week_offset);
        Interval {
            first,
            last: first + Duration::days(6),
        }
    }

    #[must_use]
    pub fn week_offset(&self) -> i64 {
        self.week_offset
    }

    pub fn previous_week(&mut self) {
        self.week_offset -= 1;
    }

    pub fn next_week(&mut self) {
        self.week_offset += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Parks a logging conflict until the caller resolves or abandons it.
    pub fn begin_conflict(&mut self, conflict: ExerciseConflict) {
        self.pending_conflict = Some(conflict);
    }

    pub fn take_conflict(&mut self) -> Option<ExerciseConflict> {
        self.pending_conflict.take()
    }

    /// Abandons the pending conflict, reverting the logging flow to idle
    /// without any state change.
    pub fn abandon_conflict(&mut self) {
        self.pending_conflict = None;
    }

    #[must_use]
    pub fn has_pending_conflict(&self) -> bool {
        self.pending_conflict.is_some()
    }
}

/// Synchronous user-confirmation capability, consumed before destructive
/// operations are applied.
pub trait Confirmation {
    fn confirm(&self, prompt: &Prompt) -> Decision;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// Outcome of an operation gated on user confirmation. A declined operation
/// changes nothing but is still signalled to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmed<T> {
    Accepted(T),
    Declined,
}
