use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, AppResult};

/// Half-open interval `[start, end)` in absolute time.
///
/// Back-to-back windows (`a.end == b.start`) do not overlap, which keeps
/// consecutive bookings legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::InvalidTimeWindow(format!(
                "end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    fn window(start_hour: u32, end_hour: u32) -> TimeWindow {
        TimeWindow::new(at(start_hour, 0), at(end_hour, 0)).unwrap()
    }

    #[test]
    fn rejects_degenerate_windows() {
        assert!(TimeWindow::new(at(10, 0), at(10, 0)).is_err());
        assert!(TimeWindow::new(at(12, 0), at(10, 0)).is_err());
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = window(10, 12);
        let b = window(11, 13);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn a_window_overlaps_itself() {
        let a = window(10, 12);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn back_to_back_windows_do_not_overlap() {
        let a = window(10, 12);
        let b = window(12, 14);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn containment_follows_half_open_semantics() {
        let a = window(10, 12);
        assert!(a.contains(at(10, 0)));
        assert!(a.contains(at(11, 59)));
        assert!(!a.contains(at(12, 0)));
        assert!(!a.contains(at(9, 59)));
    }

    #[test]
    fn duration_is_end_minus_start() {
        let a = window(10, 12);
        assert_eq!(a.duration(), Duration::hours(2));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let a = window(8, 9);
        let b = window(13, 15);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contained_window_overlaps() {
        let outer = window(8, 18);
        let inner = window(10, 11);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
