//! Date-window policy for initial and incremental syncs.

use chrono::{DateTime, Duration, Utc};

/// A half-open fetch window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Which fetch policy applies to an account in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Initial,
    Incremental,
}

/// Initial fetch window: up to `history_days` of history ending at the link
/// timestamp.
pub fn initial_window(linked_at: DateTime<Utc>, history_days: i64) -> SyncWindow {
    SyncWindow {
        start: linked_at - Duration::days(history_days),
        end: linked_at,
    }
}

/// Incremental window `[last_sync, now)`, or `None` while the debounce
/// holds (`now - last_sync < debounce_days`) to limit provider load.
pub fn incremental_window(
    last_sync: DateTime<Utc>,
    now: DateTime<Utc>,
    debounce_days: i64,
) -> Option<SyncWindow> {
    if now - last_sync < Duration::days(debounce_days) {
        return None;
    }
    Some(SyncWindow {
        start: last_sync,
        end: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn initial_window_reaches_back_from_link_time() {
        let linked_at = at(1, 0);
        let window = initial_window(linked_at, 730);
        assert_eq!(window.end, linked_at);
        assert_eq!(window.start, linked_at - Duration::days(730));
        assert!(!window.is_empty());
    }

    #[test]
    fn incremental_window_starts_at_last_sync() {
        let window = incremental_window(at(1, 0), at(5, 0), 3).expect("past debounce");
        assert_eq!(window.start, at(1, 0));
        assert_eq!(window.end, at(5, 0));
    }

    #[test]
    fn sync_two_days_after_last_sync_is_debounced() {
        assert!(incremental_window(at(1, 0), at(3, 0), 3).is_none());
    }

    #[test]
    fn debounce_boundary_is_inclusive() {
        assert!(incremental_window(at(1, 0), at(4, 0), 3).is_some());
    }

    #[test]
    fn degenerate_window_is_empty() {
        let window = SyncWindow {
            start: at(5, 0),
            end: at(5, 0),
        };
        assert!(window.is_empty());
    }
}
