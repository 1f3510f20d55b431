/*!
This module defines the internal core time data types.

This includes a count of days since the Unix epoch, a Gregorian date and a
Gregorian datetime with millisecond precision.

These types exist to provide a home for the core algorithms in this crate.
For example, converting from milliseconds since the Unix epoch to Gregorian
calendar fields and back again.

These routines are specifically implemented on simple primitive integer types
and implicitly assume that the inputs are valid (i.e., within this crate's
minimum and maximum ranges). Validation happens at the public API boundary.

# Naming

The types in this module are prefixed with letter `I` to make it clear that
they are internal types. Specifically, to distinguish them from this crate's
public types. For example, `PointInTime` versus `IDateTime`.
*/

pub(crate) const MS_PER_SECOND: i64 = 1_000;
pub(crate) const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub(crate) const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub(crate) const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// The number of days in every span of 400 consecutive Gregorian years.
const DAYS_PER_ERA: i64 = 146_097;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IEpochDay {
    pub(crate) epoch_day: i32,
}

impl IEpochDay {
    /// Converts days since the Unix epoch to a Gregorian date.
    ///
    /// This is Neri-Schneider. There's no branching or divisions.
    ///
    /// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L40C3-L40C34>
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_date(&self) -> IDate {
        const s: u32 = 82;
        const K: u32 = 719468 + 146097 * s;
        const L: u32 = 400 * s;

        let N_U = self.epoch_day as u32;
        let N = N_U.wrapping_add(K);

        let N_1 = 4 * N + 3;
        let C = N_1 / 146097;
        let N_C = (N_1 % 146097) / 4;

        let N_2 = 4 * N_C + 3;
        let P_2 = 2939745 * (N_2 as u64);
        let Z = (P_2 / 4294967296) as u32;
        let N_Y = (P_2 % 4294967296) as u32 / 2939745 / 4;
        let Y = 100 * C + Z;

        let N_3 = 2141 * N_Y + 197913;
        let M = N_3 / 65536;
        let D = (N_3 % 65536) / 2141;

        let J = N_Y >= 306;
        let year = Y.wrapping_sub(L).wrapping_add(J as u32) as i16;
        let month = (if J { M - 12 } else { M }) as i8;
        let day = (D + 1) as i8;
        IDate { year, month, day }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDate {
    pub(crate) year: i16,
    pub(crate) month: i8,
    pub(crate) day: i8,
}

impl IDate {
    /// Converts a Gregorian date to days since the Unix epoch.
    ///
    /// This is Neri-Schneider. There's no branching or divisions.
    ///
    /// Ref: https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L83
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_epoch_day(&self) -> IEpochDay {
        const s: u32 = 82;
        const K: u32 = 719468 + 146097 * s;
        const L: u32 = 400 * s;

        let year = self.year as u32;
        let month = self.month as u32;
        let day = self.day as u32;

        let J = month <= 2;
        let Y = year.wrapping_add(L).wrapping_sub(J as u32);
        let M = if J { month + 12 } else { month };
        let D = day - 1;
        let C = Y / 100;

        let y_star = 1461 * Y / 4 - C + C / 4;
        let m_star = (979 * M - 2919) / 32;
        let N = y_star + m_star + D;

        let N_U = N.wrapping_sub(K);
        let epoch_day = N_U as i32;
        IEpochDay { epoch_day }
    }

    /// Returns the ordinal day of the year of this date, starting at `1`.
    #[inline]
    pub(crate) fn day_of_year(self) -> i16 {
        let first = IDate { year: self.year, month: 1, day: 1 };
        let days =
            self.to_epoch_day().epoch_day - first.to_epoch_day().epoch_day;
        days as i16 + 1
    }

    /// Returns the date `days` days after this one.
    ///
    /// Callers must ensure the result stays within the supported range of
    /// years.
    #[inline]
    pub(crate) fn add_days(self, days: i32) -> IDate {
        let epoch_day = self.to_epoch_day().epoch_day + days;
        IEpochDay { epoch_day }.to_date()
    }
}

/// A Gregorian datetime with millisecond precision.
///
/// The derived ordering compares fields lexicographically from the year down
/// to the millisecond, which is the chronological order of wall clock
/// values.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDateTime {
    pub(crate) year: i16,
    pub(crate) month: i8,
    pub(crate) day: i8,
    pub(crate) hour: i8,
    pub(crate) minute: i8,
    pub(crate) second: i8,
    pub(crate) millisecond: i16,
}

impl IDateTime {
    /// The fields of the Unix epoch, `1970-01-01T00:00:00.000`.
    pub(crate) const EPOCH: IDateTime = IDateTime {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    /// The smallest supported datetime.
    pub(crate) const MIN: IDateTime = IDateTime {
        year: -9999,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    /// The largest supported datetime.
    pub(crate) const MAX: IDateTime = IDateTime {
        year: 9999,
        month: 12,
        day: 31,
        hour: 23,
        minute: 59,
        second: 59,
        millisecond: 999,
    };

    #[inline]
    pub(crate) const fn date(&self) -> IDate {
        IDate { year: self.year, month: self.month, day: self.day }
    }

    /// Returns the number of milliseconds elapsed since the start of this
    /// datetime's day.
    #[inline]
    pub(crate) const fn time_millis(&self) -> i64 {
        (self.hour as i64) * MS_PER_HOUR
            + (self.minute as i64) * MS_PER_MINUTE
            + (self.second as i64) * MS_PER_SECOND
            + (self.millisecond as i64)
    }

    /// Converts these fields to milliseconds since the Unix epoch, treating
    /// them as UTC.
    pub(crate) fn to_epoch_millis(&self) -> i64 {
        if *self >= IDateTime::EPOCH {
            self.millis_after_epoch()
        } else {
            -self.millis_before_epoch()
        }
    }

    /// Returns the number of milliseconds from the Unix epoch up to this
    /// datetime, which must not precede the epoch.
    fn millis_after_epoch(&self) -> i64 {
        assert!(
            *self >= IDateTime::EPOCH,
            "datetime {self:?} is before the Unix epoch",
        );
        let mut days = days_between_years(1970, self.year);
        for month in 1..self.month {
            days += i64::from(days_in_month(self.year, month));
        }
        days += i64::from(self.day) - 1;
        days * MS_PER_DAY + self.time_millis()
    }

    /// Returns the number of milliseconds from this datetime up to the Unix
    /// epoch, which this datetime must strictly precede.
    fn millis_before_epoch(&self) -> i64 {
        assert!(
            *self < IDateTime::EPOCH,
            "datetime {self:?} is not before the Unix epoch",
        );
        // Whole days from the end of this datetime's day up to the epoch.
        let mut days = i64::from(days_in_month(self.year, self.month))
            - i64::from(self.day);
        for month in self.month + 1..=12 {
            days += i64::from(days_in_month(self.year, month));
        }
        days += days_between_years(self.year + 1, 1970);
        (MS_PER_DAY - self.time_millis()) + days * MS_PER_DAY
    }

    /// Converts milliseconds since the Unix epoch to Gregorian fields in
    /// UTC.
    pub(crate) fn from_epoch_millis(millis: i64) -> IDateTime {
        if millis == 0 {
            IDateTime::EPOCH
        } else if millis > 0 {
            IDateTime::walk_forward(millis)
        } else {
            IDateTime::walk_backward(millis)
        }
    }

    /// Consumes whole years and then whole months starting from the epoch.
    fn walk_forward(millis: i64) -> IDateTime {
        assert!(millis > 0, "forward walk requires positive millis");
        let mut days = millis / MS_PER_DAY;
        let time = millis % MS_PER_DAY;

        let eras = days / DAYS_PER_ERA;
        days -= eras * DAYS_PER_ERA;
        let mut year = 1970 + (eras * 400) as i16;
        loop {
            let len = i64::from(days_in_year(year));
            if days < len {
                break;
            }
            days -= len;
            year += 1;
        }
        let mut month = 1;
        loop {
            let len = i64::from(days_in_month(year, month));
            if days < len {
                break;
            }
            days -= len;
            month += 1;
        }
        IDateTime::from_parts(year, month, (days + 1) as i8, time)
    }

    /// Consumes whole years and then whole months backwards from the epoch.
    ///
    /// Days are counted from the end of each period, so the day of month is
    /// recovered as the complement of what remains.
    fn walk_backward(millis: i64) -> IDateTime {
        assert!(millis < 0, "backward walk requires negative millis");
        let magnitude = -millis;
        let whole_days = magnitude / MS_PER_DAY;
        let rem = magnitude % MS_PER_DAY;
        // `days_back` is the 1-based index of the containing day, counting
        // backwards from 1969-12-31.
        let (mut days_back, time) = if rem == 0 {
            (whole_days, 0)
        } else {
            (whole_days + 1, MS_PER_DAY - rem)
        };

        let eras = (days_back - 1) / DAYS_PER_ERA;
        days_back -= eras * DAYS_PER_ERA;
        let mut year = 1970 - (eras * 400) as i16;
        loop {
            year -= 1;
            let len = i64::from(days_in_year(year));
            if days_back <= len {
                break;
            }
            days_back -= len;
        }
        let mut month = 12;
        let day = loop {
            let len = i64::from(days_in_month(year, month));
            if days_back <= len {
                break len - days_back + 1;
            }
            days_back -= len;
            month -= 1;
        };
        IDateTime::from_parts(year, month, day as i8, time)
    }

    fn from_parts(year: i16, month: i8, day: i8, time: i64) -> IDateTime {
        IDateTime {
            year,
            month,
            day,
            hour: (time / MS_PER_HOUR) as i8,
            minute: (time / MS_PER_MINUTE % 60) as i8,
            second: (time / MS_PER_SECOND % 60) as i8,
            millisecond: (time % MS_PER_SECOND) as i16,
        }
    }

    /// Moves the minute field by `minutes`, which must be in `-60..=60`.
    ///
    /// An overflow of the minute field carries into the hour exactly once.
    /// That carry may in turn roll the day, month and year.
    pub(crate) fn shift_minutes(self, minutes: i16) -> IDateTime {
        assert!(
            -60 <= minutes && minutes <= 60,
            "minute shift {minutes} is bigger than one hour",
        );
        let mut dt = self;
        let mut minute = i16::from(dt.minute) + minutes;
        let carry = if minute > 59 {
            minute -= 60;
            1
        } else if minute < 0 {
            minute += 60;
            -1
        } else {
            0
        };
        dt.minute = minute as i8;
        if carry == 0 {
            return dt;
        }
        dt.hour += carry;
        if dt.hour > 23 {
            dt.hour = 0;
            dt.day += 1;
            if dt.day > days_in_month(dt.year, dt.month) {
                dt.day = 1;
                dt.month += 1;
                if dt.month > 12 {
                    dt.month = 1;
                    dt.year += 1;
                }
            }
        } else if dt.hour < 0 {
            dt.hour = 23;
            dt.day -= 1;
            if dt.day < 1 {
                dt.month -= 1;
                if dt.month < 1 {
                    dt.month = 12;
                    dt.year -= 1;
                }
                dt.day = days_in_month(dt.year, dt.month);
            }
        }
        dt
    }
}

/// Returns the number of days from January 1 of year `start` to January 1
/// of year `end`. This is negative when `end < start`.
fn days_between_years(start: i16, end: i16) -> i64 {
    // Leap days in the years strictly before `year`, counted from year 0.
    fn leap_days_before(year: i16) -> i64 {
        let y = i64::from(year) - 1;
        y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
    }
    365 * (i64::from(end) - i64::from(start)) + leap_days_before(end)
        - leap_days_before(start)
}

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
pub(crate) const fn days_in_year(year: i16) -> i16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Return the number of days in the given month.
#[inline]
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
