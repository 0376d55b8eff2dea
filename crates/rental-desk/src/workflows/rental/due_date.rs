use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Rentals starting on this day are subject to the weekend shift.
pub const REST_DAY: Weekday = Weekday::Sat;

/// Day the shop expects weekend rentals back.
pub const RETURN_DAY: Weekday = Weekday::Mon;

/// Rental period applied to a fresh rental.
pub const BASE_RENTAL_DAYS: u32 = 1;

/// Pure due-date policy. Holds no clock; callers pass the reference date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DueDatePolicy;

impl DueDatePolicy {
    /// `reference_date + base_days`, except that a rental starting on [`REST_DAY`] is due no
    /// earlier than the following [`RETURN_DAY`]. Saturates at [`NaiveDate::MAX`].
    pub fn compute_due_date(&self, reference_date: NaiveDate, base_days: u32) -> NaiveDate {
        let base = reference_date
            .checked_add_days(Days::new(u64::from(base_days)))
            .unwrap_or(NaiveDate::MAX);
        if reference_date.weekday() != REST_DAY {
            return base;
        }

        base.max(next_weekday_after(reference_date, RETURN_DAY))
    }
}

/// First date strictly after `date` that falls on `weekday`, or [`NaiveDate::MAX`] when the
/// calendar runs out first.
pub fn next_weekday_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = date.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let ahead = (target + 7 - current) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    date.checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(NaiveDate::MAX)
}
