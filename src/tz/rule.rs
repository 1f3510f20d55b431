use crate::{
    civil::{self, Month, Weekday},
    error::{tz::rule::Error as E, Error},
    tz::UtcOffset,
    util::itime::IDateTime,
};

/// A selector for the day of the month on which a transition occurs.
///
/// The variants mirror the shapes used by the `ON` column of tzdata rule
/// lines. Each of them is resolved to a concrete day of the month for a
/// particular year via [`DaySelector::day_in`].
///
/// # Example
///
/// ```
/// use tempora::{civil::{Month, Weekday}, tz::DaySelector};
///
/// let second_sunday = DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 };
/// assert_eq!(second_sunday.day_in(2024, Month::March), 10);
/// assert_eq!(second_sunday.to_string(), "Sun>=8");
///
/// let last_sunday = DaySelector::Last(Weekday::Sunday);
/// assert_eq!(last_sunday.day_in(2024, Month::October), 27);
/// assert_eq!(last_sunday.to_string(), "lastSun");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DaySelector {
    /// A fixed day of the month. When the month is shorter than this day in
    /// a particular year (e.g., February 29 in a non-leap year), the last
    /// day of the month is used instead.
    Fixed(i8),
    /// The last occurrence of the given weekday in the month.
    Last(Weekday),
    /// The first occurrence of `weekday` on or after `day`.
    OnOrAfter {
        /// The weekday to search for.
        weekday: Weekday,
        /// The day of the month at which the search starts.
        day: i8,
    },
    /// The last occurrence of `weekday` on or before `day`.
    OnOrBefore {
        /// The weekday to search for.
        weekday: Weekday,
        /// The day of the month at which the search starts.
        day: i8,
    },
}

impl DaySelector {
    /// Resolves this selector to a day of the month in the given year.
    ///
    /// The selector is not validated against the month given. See
    /// [`TransitionRule::new`] for the checks that guarantee a selector
    /// always picks a day inside its month.
    pub fn day_in(self, year: i16, month: Month) -> i8 {
        match self {
            DaySelector::Fixed(day) => day.min(month.days(year)),
            DaySelector::Last(weekday) => {
                let last = month.days(year);
                let last_weekday = civil::weekday(year, month, last);
                last - weekday.distance_to(last_weekday) as i8
            }
            DaySelector::OnOrAfter { weekday, day } => {
                let start = civil::weekday(year, month, day);
                day + start.distance_to(weekday) as i8
            }
            DaySelector::OnOrBefore { weekday, day } => {
                let start = civil::weekday(year, month, day);
                day - weekday.distance_to(start) as i8
            }
        }
    }

    /// Checks that this selector picks a day inside `month` in every year.
    fn validate(self, month: Month) -> Result<(), Error> {
        // February in a leap year is the longest a month ever gets.
        let max = month.days(2000);
        // And February in a common year is the shortest.
        let min = month.days(1999);
        match self {
            DaySelector::Fixed(day) => {
                if !(1 <= day && day <= max) {
                    return Err(Error::range("day", day, 1, max));
                }
            }
            DaySelector::Last(_) => {}
            DaySelector::OnOrAfter { day, .. } => {
                if !(1 <= day && day <= max) {
                    return Err(Error::range("day", day, 1, max));
                }
                if day + 6 > min {
                    return Err(E::DayNotAlwaysInMonth { day, month }.into());
                }
            }
            DaySelector::OnOrBefore { day, .. } => {
                if !(1 <= day && day <= max) {
                    return Err(Error::range("day", day, 1, max));
                }
                if day < 7 || day > min {
                    return Err(E::DayNotAlwaysInMonth { day, month }.into());
                }
            }
        }
        Ok(())
    }
}

impl core::fmt::Display for DaySelector {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            DaySelector::Fixed(day) => write!(f, "{day}"),
            DaySelector::Last(wd) => write!(f, "last{}", wd.abbreviation()),
            DaySelector::OnOrAfter { weekday, day } => {
                write!(f, "{}>={day}", weekday.abbreviation())
            }
            DaySelector::OnOrBefore { weekday, day } => {
                write!(f, "{}<={day}", weekday.abbreviation())
            }
        }
    }
}

/// A recurring daylight saving time transition.
///
/// A rule says that, in every year from its first year through its last
/// year, at the given hour of a day in the given month, the offset of a time
/// zone becomes its standard offset plus `saving_minutes`. A rule with a
/// saving of zero marks the return to standard time.
///
/// The hour of a transition is always interpreted in the zone's standard
/// local time.
///
/// # Display format
///
/// The `Display` impl writes a rule in the style of a tzdata `Rule` line,
/// without the `Rule`, `NAME` and `TYPE` columns:
///
/// ```
/// use tempora::{civil::{Month, Weekday}, tz::{DaySelector, TransitionRule}};
///
/// let rule = TransitionRule::new(
///     2007,
///     None,
///     Month::March,
///     DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 },
///     2,
///     60,
/// )?;
/// assert_eq!(rule.to_string(), "2007 max Mar Sun>=8 2:00 1:00");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TransitionRule {
    from_year: i16,
    to_year: Option<i16>,
    month: Month,
    day: DaySelector,
    hour: i8,
    saving_minutes: i16,
}

impl TransitionRule {
    /// Creates a new transition rule.
    ///
    /// When `to_year` is `None`, the rule stays in effect for every year
    /// after `from_year`.
    ///
    /// # Errors
    ///
    /// This returns an error when:
    ///
    /// * Either year is outside of `-9999..=9999`.
    /// * `to_year` is before `from_year`.
    /// * `hour` is outside of `0..=23`.
    /// * `saving_minutes` is outside of `-60..=60`.
    /// * The day selector can pick a day outside of `month`. A fixed day
    ///   must exist in the month in at least leap years, an `OnOrAfter`
    ///   search must end before the shortest version of the month does and
    ///   an `OnOrBefore` search must start between the 7th and the last day
    ///   of the shortest version of the month.
    pub fn new(
        from_year: i16,
        to_year: Option<i16>,
        month: Month,
        day: DaySelector,
        hour: i8,
        saving_minutes: i16,
    ) -> Result<TransitionRule, Error> {
        if !(-9999 <= from_year && from_year <= 9999) {
            return Err(Error::range("from year", from_year, -9999, 9999));
        }
        if let Some(to) = to_year {
            if !(-9999 <= to && to <= 9999) {
                return Err(Error::range("to year", to, -9999, 9999));
            }
            if to < from_year {
                return Err(
                    E::ToYearBeforeFromYear { from: from_year, to }.into()
                );
            }
        }
        if !(0 <= hour && hour <= 23) {
            return Err(Error::range("transition hour", hour, 0, 23));
        }
        if !(-60 <= saving_minutes && saving_minutes <= 60) {
            return Err(Error::range(
                "saving minutes",
                saving_minutes,
                -60,
                60,
            ));
        }
        day.validate(month)?;
        Ok(TransitionRule {
            from_year,
            to_year,
            month,
            day,
            hour,
            saving_minutes,
        })
    }

    /// Returns the first year in which this rule applies.
    #[inline]
    pub fn from_year(&self) -> i16 {
        self.from_year
    }

    /// Returns the last year in which this rule applies, or `None` when the
    /// rule is still in effect.
    #[inline]
    pub fn to_year(&self) -> Option<i16> {
        self.to_year
    }

    /// Returns the month in which the transition occurs.
    #[inline]
    pub fn month(&self) -> Month {
        self.month
    }

    /// Returns the selector for the day on which the transition occurs.
    #[inline]
    pub fn day(&self) -> DaySelector {
        self.day
    }

    /// Returns the hour, in standard local time, at which the transition
    /// occurs.
    #[inline]
    pub fn hour(&self) -> i8 {
        self.hour
    }

    /// Returns the number of minutes added to the standard offset while this
    /// rule is active.
    #[inline]
    pub fn saving_minutes(&self) -> i16 {
        self.saving_minutes
    }

    /// Returns true when this rule applies in the given year.
    #[inline]
    pub fn covers(&self, year: i16) -> bool {
        self.from_year <= year && self.to_year.map_or(true, |to| year <= to)
    }

    /// Returns the day of the month on which the transition occurs in the
    /// given year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year given is outside of the years
    /// covered by this rule.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::{Month, Weekday}, tz::{DaySelector, TransitionRule}};
    ///
    /// let rule = TransitionRule::new(
    ///     1996,
    ///     None,
    ///     Month::October,
    ///     DaySelector::Last(Weekday::Sunday),
    ///     1,
    ///     0,
    /// )?;
    /// assert_eq!(rule.day_for_year(2023)?, 29);
    /// assert_eq!(rule.day_for_year(2024)?, 27);
    /// assert!(rule.day_for_year(1995).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn day_for_year(&self, year: i16) -> Result<i8, Error> {
        if !self.covers(year) {
            return Err(E::YearNotCovered {
                year,
                from: self.from_year,
                to: self.to_year,
            }
            .into());
        }
        Ok(self.day.day_in(year, self.month))
    }

    /// Returns `base` with this rule's saving applied to it.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting offset is outside of the
    /// supported range of offsets.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::{Month, Weekday}, tz::{DaySelector, TransitionRule, UtcOffset}};
    ///
    /// let rule = TransitionRule::new(
    ///     1996,
    ///     None,
    ///     Month::March,
    ///     DaySelector::Last(Weekday::Sunday),
    ///     1,
    ///     60,
    /// )?;
    /// let summer = rule.apply_to_offset(UtcOffset::new(1, 0)?)?;
    /// assert_eq!(summer.to_string(), "+02:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn apply_to_offset(
        &self,
        base: UtcOffset,
    ) -> Result<UtcOffset, Error> {
        base.checked_add_minutes(i32::from(self.saving_minutes))
    }

    /// Returns the standard local time at which this rule takes effect in
    /// the given year, or `None` when the year isn't covered.
    pub(crate) fn transition_in(&self, year: i16) -> Option<IDateTime> {
        let day = self.day_for_year(year).ok()?;
        Some(IDateTime {
            year,
            month: self.month.to_number(),
            day,
            hour: self.hour,
            minute: 0,
            second: 0,
            millisecond: 0,
        })
    }
}

impl core::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} ", self.from_year)?;
        match self.to_year {
            None => f.write_str("max")?,
            Some(to) if to == self.from_year => f.write_str("only")?,
            Some(to) => write!(f, "{to}")?,
        }
        write!(
            f,
            " {} {} {}:00 ",
            self.month.abbreviation(),
            self.day,
            self.hour,
        )?;
        let save = self.saving_minutes;
        if save == 0 {
            f.write_str("0")
        } else {
            let sign = if save < 0 { "-" } else { "" };
            let save = save.unsigned_abs();
            write!(f, "{sign}{}:{:02}", save / 60, save % 60)
        }
    }
}
