//! Outings ("sortides") and the classes they leave uncovered.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::schedule::{is_school_day, weekday_of, ScheduleEntry, TimeRange};
use crate::types::DbId;
use crate::validation::validate_date_range;

/// Longest outing accepted, in calendar days (inclusive).
pub const MAX_OUTING_DAYS: i64 = 31;

/// Dates and optional hours during which the accompanying professors are away.
///
/// `range == None` means the whole school day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub range: Option<TimeRange>,
}

impl OutingWindow {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        range: Option<TimeRange>,
    ) -> Result<Self, CoreError> {
        validate_date_range(start_date, end_date)?;
        let days = (end_date - start_date).num_days() + 1;
        if days > MAX_OUTING_DAYS {
            return Err(CoreError::validation(format!(
                "An outing may last at most {MAX_OUTING_DAYS} days, got {days}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
            range,
        })
    }

    /// Whether the outing keeps its professors away during `range` on `date`.
    pub fn covers(&self, date: NaiveDate, range: &TimeRange) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match &self.range {
            Some(window) => window.overlaps(range),
            None => true,
        }
    }

    /// Monday-to-Friday dates inside the window, in order.
    pub fn school_days(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .filter(|d| is_school_day(*d))
            .collect()
    }
}

/// A timetabled class that needs a substitute because its professor is away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassToCover {
    pub date: NaiveDate,
    pub schedule_id: DbId,
    pub professor_id: DbId,
    pub range: TimeRange,
    pub subject_code: String,
}

/// List every class of the `absent` professors that falls inside the outing.
///
/// Guard-duty hours (`G`) are not classes and are skipped. The result is
/// sorted by date, start time and professor id.
pub fn classes_to_cover(
    window: &OutingWindow,
    absent: &HashSet<DbId>,
    schedule: &[ScheduleEntry],
) -> Vec<ClassToCover> {
    let mut classes = Vec::new();

    for date in window.school_days() {
        let weekday = weekday_of(date);
        for entry in schedule.iter().filter(|e| {
            absent.contains(&e.professor_id)
                && e.weekday == weekday
                && !e.is_guard()
                && window.covers(date, &e.range)
        }) {
            classes.push(ClassToCover {
                date,
                schedule_id: entry.id,
                professor_id: entry.professor_id,
                range: entry.range,
                subject_code: entry.subject_code.clone(),
            });
        }
    }

    classes.sort_by_key(|c| (c.date, c.range.start, c.professor_id, c.schedule_id));
    classes
}
