//! Date cadences: randomized forward-only sequences plus the deterministic
//! weekly/monthly recurrences the randomized ones are derived from.

use chrono::{Datelike, Duration, Weekday};
use ledgerlab_core::Date;
use rand::Rng;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CadenceError {
    #[error("invalid day range [{min}, {max}]: min must be >= 1 and <= max")]
    InvalidRange { min: i64, max: i64 },
}

fn check_range(min: i64, max: i64) -> Result<(), CadenceError> {
    if min < 1 || min > max {
        Err(CadenceError::InvalidRange { min, max })
    } else {
        Ok(())
    }
}

/// A lazy, strictly increasing sequence of dates starting after `begin`,
/// each step a uniform draw of days in `[days_min, days_max]`.
///
/// The loop tests the date from *before* the step against `end`, so the
/// final yielded date may land on or past `end`.
pub fn date_seq<'r, R: Rng>(
    begin: Date,
    end: Date,
    days_min: i64,
    days_max: i64,
    rng: &'r mut R,
) -> Result<impl Iterator<Item = Date> + 'r, CadenceError> {
    check_range(days_min, days_max)?;
    let mut date = begin;
    Ok(std::iter::from_fn(move || {
        if date < end {
            date = date + Duration::days(rng.gen_range(days_min..=days_max));
            Some(date)
        } else {
            None
        }
    }))
}

/// Shifts every upstream date forward by an independent uniform draw in
/// `[delay_min, delay_max]` days, to simulate billing delay.
pub fn delay<'r, I, R>(
    dates: I,
    delay_min: i64,
    delay_max: i64,
    rng: &'r mut R,
) -> Result<impl Iterator<Item = Date> + 'r, CadenceError>
where
    I: IntoIterator<Item = Date>,
    I::IntoIter: 'r,
    R: Rng,
{
    check_range(delay_min, delay_max)?;
    Ok(dates
        .into_iter()
        .map(move |date| date + Duration::days(rng.gen_range(delay_min..=delay_max))))
}

/// Weekly recurrence on `weekday`, first occurrence on or after `begin`,
/// inclusive of `end`.
pub fn weekly(begin: Date, end: Date, weekday: Weekday) -> impl Iterator<Item = Date> {
    let offset = (7 + i64::from(weekday.num_days_from_monday())
        - i64::from(begin.weekday().num_days_from_monday()))
        % 7;
    let first = begin + Duration::days(offset);
    std::iter::successors(Some(first), |date| Some(*date + Duration::days(7)))
        .take_while(move |date| *date <= end)
}

/// Monthly recurrence on `begin`'s day of month, inclusive of `end`.
/// Months lacking that day are skipped.
pub fn monthly(begin: Date, end: Date) -> impl Iterator<Item = Date> {
    let day = begin.day();
    let mut year = begin.year();
    let mut month = begin.month();
    std::iter::from_fn(move || loop {
        let candidate = Date::from_ymd_opt(year, month, day);
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
        match candidate {
            Some(date) if date > end => return None,
            Some(date) => return Some(date),
            None => continue,
        }
    })
}

/// Keeps the first of every `n` upstream items, e.g. biweekly events from a
/// weekly recurrence. `n >= 1` is a precondition.
pub fn every_nth<I: Iterator>(iter: I, n: usize) -> Result<impl Iterator<Item = I::Item>, CadenceError> {
    if n < 1 {
        return Err(CadenceError::InvalidRange {
            min: n as i64,
            max: n as i64,
        });
    }
    Ok(iter.step_by(n))
}
