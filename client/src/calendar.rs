//! Month grid for the calendar page.

use chrono::{Datelike, Months, NaiveDate};

use eventify_server::models::Event;

/// Column headers; weeks start on Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first_day: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell<'a> {
    /// Padding before day 1.
    Empty,
    Day {
        date: NaiveDate,
        events: Vec<&'a Event>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid<'a> {
    pub cells: Vec<CalendarCell<'a>>,
}

impl CalendarMonth {
    /// `month` is 1-based. Returns `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// e.g. "June 2025".
    pub fn title(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    pub fn next(&self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next().first_day - self.first_day).num_days() as u32
    }

    /// Leading empty cells for the weekday of day 1, then one cell per day
    /// holding the events dated exactly on it.
    pub fn grid<'a>(&self, events: &'a [Event]) -> CalendarGrid<'a> {
        let offset = self.first_day.weekday().num_days_from_sunday() as usize;
        let mut cells: Vec<CalendarCell<'a>> = vec![CalendarCell::Empty; offset];

        for date in self.first_day.iter_days().take(self.days_in_month() as usize) {
            cells.push(CalendarCell::Day {
                date,
                events: events.iter().filter(|e| e.event_date == date).collect(),
            });
        }

        CalendarGrid { cells }
    }
}

impl<'a> CalendarGrid<'a> {
    /// Rows of seven cells; the last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell<'a>]> {
        self.cells.chunks(WEEKDAY_LABELS.len())
    }

    pub fn day(&self, day: u32) -> Option<&CalendarCell<'a>> {
        self.cells.iter().find(
            |cell| matches!(cell, CalendarCell::Day { date, .. } if date.day() == day),
        )
    }
}
