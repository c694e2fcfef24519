use chrono::{Datelike, NaiveDate};

/// Month-grid calendar widget.
///
/// Holds the displayed year/month and derives the grid: a leading run
/// of blanks aligning day 1 under its weekday (weeks start on Sunday),
/// then the days of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
}

impl MonthView {
    /// View for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    fn first_of_month(&self) -> NaiveDate {
        // month is always kept in 1..=12 by the navigation methods
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch"))
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_of_month();
        let next_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match next_first {
            Some(next) => next.signed_duration_since(first).num_days() as u32,
            None => 31,
        }
    }

    /// Weekday of day 1, as an offset from Sunday (0 = Sunday).
    pub fn first_weekday(&self) -> usize {
        self.first_of_month().weekday().num_days_from_sunday() as usize
    }

    /// The grid cells in row-major order: `None` for leading blanks,
    /// `Some(day)` for the days of the month.
    pub fn grid(&self) -> Vec<Option<u32>> {
        let mut cells: Vec<Option<u32>> = vec![None; self.first_weekday()];
        cells.extend((1..=self.days_in_month()).map(Some));
        cells
    }

    pub fn is_today(&self, day: u32, today: NaiveDate) -> bool {
        self.year == today.year() && self.month == today.month() && day == today.day()
    }

    pub fn is_sunday(&self, day: u32) -> bool {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .map(|d| d.weekday().num_days_from_sunday() == 0)
            .unwrap_or(false)
    }

    /// Header label, e.g. "August 2026".
    pub fn label(&self) -> String {
        self.first_of_month().format("%B %Y").to_string()
    }
}

/// Weekday header row, Sunday first.
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthView { year: 2026, month: 8 }.days_in_month(), 31);
        assert_eq!(MonthView { year: 2026, month: 2 }.days_in_month(), 28);
        assert_eq!(MonthView { year: 2024, month: 2 }.days_in_month(), 29);
        assert_eq!(MonthView { year: 2026, month: 12 }.days_in_month(), 31);
    }

    #[test]
    fn test_first_weekday_alignment() {
        // August 1, 2026 is a Saturday
        let view = MonthView { year: 2026, month: 8 };
        assert_eq!(view.first_weekday(), 6);

        let grid = view.grid();
        assert_eq!(grid.len(), 6 + 31);
        assert!(grid[..6].iter().all(Option::is_none));
        assert_eq!(grid[6], Some(1));
        assert_eq!(*grid.last().unwrap(), Some(31));
    }

    #[test]
    fn test_month_navigation_rollover() {
        let mut view = MonthView { year: 2025, month: 12 };
        view.next_month();
        assert_eq!(view, MonthView { year: 2026, month: 1 });
        view.prev_month();
        assert_eq!(view, MonthView { year: 2025, month: 12 });
    }

    #[test]
    fn test_is_today() {
        let view = MonthView { year: 2026, month: 8 };
        let today = date(2026, 8, 7);
        assert!(view.is_today(7, today));
        assert!(!view.is_today(8, today));
        // Same day number in a different displayed month is not today
        let other = MonthView { year: 2026, month: 9 };
        assert!(!other.is_today(7, today));
    }

    #[test]
    fn test_is_sunday() {
        // August 2, 2026 is a Sunday
        let view = MonthView { year: 2026, month: 8 };
        assert!(view.is_sunday(2));
        assert!(!view.is_sunday(3));
        assert!(!view.is_sunday(40)); // out of range, not a panic
    }

    #[test]
    fn test_label() {
        assert_eq!(MonthView { year: 2026, month: 8 }.label(), "August 2026");
    }

    #[test]
    fn test_containing() {
        let view = MonthView::containing(date(2026, 8, 7));
        assert_eq!(view, MonthView { year: 2026, month: 8 });
    }
}
