use crate::{civil::days_in_month, error::Error};

/// A representation for the month of a Gregorian year.
///
/// Months are totally ordered by their number, with `January` (`1`) being
/// the smallest and `December` (`12`) being the largest.
///
/// Month arithmetic via [`Month::advance`] and [`Month::back`] is cyclic, so
/// that going forward one month from `December` yields `January`.
///
/// # Example
///
/// ```
/// use tempora::civil::Month;
///
/// assert_eq!(Month::November.advance(3), Month::February);
/// assert_eq!(Month::February.back(3), Month::November);
/// assert_eq!(Month::February.days(2000), 29);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(i8)]
#[allow(missing_docs)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

const ALL: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Converts a month number in the range `1..=12` to a `Month`.
    ///
    /// # Errors
    ///
    /// This returns an error when the number given is outside of `1..=12`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::civil::Month;
    ///
    /// assert_eq!(Month::from_number(3)?, Month::March);
    /// assert!(Month::from_number(13).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_number(number: i8) -> Result<Month, Error> {
        if !(1 <= number && number <= 12) {
            return Err(Error::range("month", number, 1, 12));
        }
        Ok(Month::from_index(number - 1))
    }

    /// Returns the number of this month, in the range `1..=12`.
    #[inline]
    pub const fn to_number(self) -> i8 {
        self as i8
    }

    /// Returns the month `n` months after this one, wrapping around from
    /// `December` to `January`.
    ///
    /// Advancing by any multiple of `12` returns the same month.
    #[inline]
    pub fn advance(self, n: u32) -> Month {
        let index = (self.index() as u32 + n % 12) % 12;
        Month::from_index(index as i8)
    }

    /// Returns the month `n` months before this one, wrapping around from
    /// `January` to `December`.
    ///
    /// This is the inverse of [`Month::advance`].
    #[inline]
    pub fn back(self, n: u32) -> Month {
        let index = (self.index() as u32 + 12 - n % 12) % 12;
        Month::from_index(index as i8)
    }

    /// Returns the next month, with `December` wrapping to `January`.
    #[inline]
    pub fn next(self) -> Month {
        self.advance(1)
    }

    /// Returns the previous month, with `January` wrapping to `December`.
    #[inline]
    pub fn previous(self) -> Month {
        self.back(1)
    }

    /// Returns the number of days in this month for the given year.
    ///
    /// The year only matters for `February`.
    #[inline]
    pub const fn days(self, year: i16) -> i8 {
        days_in_month(year, self)
    }

    /// Returns the full English name of this month. For example, `March`.
    pub fn name(self) -> &'static str {
        use self::Month::*;

        match self {
            January => "January",
            February => "February",
            March => "March",
            April => "April",
            May => "May",
            June => "June",
            July => "July",
            August => "August",
            September => "September",
            October => "October",
            November => "November",
            December => "December",
        }
    }

    /// Returns the three letter English abbreviation of this month. For
    /// example, `Mar`.
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    /// Returns the month for a zero based index. This panics when the index
    /// isn't in `0..=11`, which always indicates a bug in the caller.
    #[inline]
    pub(crate) fn from_index(index: i8) -> Month {
        ALL[index as usize]
    }

    /// Returns the zero based index of this month.
    #[inline]
    fn index(self) -> i8 {
        self.to_number() - 1
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Month {
    fn arbitrary(g: &mut quickcheck::Gen) -> Month {
        *g.choose(&ALL).unwrap()
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Month>> {
        alloc::boxed::Box::new(
            self.to_number()
                .shrink()
                .filter_map(|n| Month::from_number(n).ok()),
        )
    }
}
