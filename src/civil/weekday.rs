use crate::{error::Error, util::itime::IEpochDay};

/// A representation for the day of the week.
///
/// The default representation used by this crate numbers weekdays starting
/// from Monday at `0` through Sunday at `6`. Conversions for the alternative
/// convention that starts the week on Sunday are also provided.
///
/// Weekday arithmetic is cyclic. Going forward one day from `Sunday` yields
/// `Monday`.
///
/// # Example
///
/// ```
/// use tempora::civil::Weekday;
///
/// assert_eq!(Weekday::Sunday.next(), Weekday::Monday);
/// assert_eq!(Weekday::Sunday.distance_to(Weekday::Wednesday), 3);
/// assert_eq!(Weekday::Wednesday.distance_to(Weekday::Sunday), 4);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(i8)]
#[allow(missing_docs)]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

impl Weekday {
    /// Converts an offset from Monday (`0`) through Sunday (`6`) to a
    /// weekday.
    ///
    /// # Errors
    ///
    /// This returns an error when the offset is not in `0..=6`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::civil::Weekday;
    ///
    /// assert_eq!(Weekday::from_monday_zero_offset(2)?, Weekday::Wednesday);
    /// assert!(Weekday::from_monday_zero_offset(7).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_monday_zero_offset(offset: i8) -> Result<Weekday, Error> {
        if !(0 <= offset && offset <= 6) {
            return Err(Error::range("weekday", offset, 0, 6));
        }
        Ok(ALL[offset as usize])
    }

    /// Converts an offset from Sunday (`0`) through Saturday (`6`) to a
    /// weekday.
    ///
    /// # Errors
    ///
    /// This returns an error when the offset is not in `0..=6`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::civil::Weekday;
    ///
    /// assert_eq!(Weekday::from_sunday_zero_offset(0)?, Weekday::Sunday);
    /// assert_eq!(Weekday::from_sunday_zero_offset(1)?, Weekday::Monday);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_sunday_zero_offset(offset: i8) -> Result<Weekday, Error> {
        if !(0 <= offset && offset <= 6) {
            return Err(Error::range("weekday", offset, 0, 6));
        }
        Ok(Weekday::Sunday.advance(offset as u32))
    }

    /// Returns this weekday as an offset from Monday, in `0..=6`.
    #[inline]
    pub const fn to_monday_zero_offset(self) -> i8 {
        self as i8
    }

    /// Returns this weekday as an offset from Sunday, in `0..=6`.
    #[inline]
    pub const fn to_sunday_zero_offset(self) -> i8 {
        (self as i8 + 1) % 7
    }

    /// Returns the weekday `n` days after this one.
    ///
    /// Advancing by a multiple of `7` returns the same weekday.
    #[inline]
    pub fn advance(self, n: u32) -> Weekday {
        let offset = (self as u32 + n % 7) % 7;
        ALL[offset as usize]
    }

    /// Returns the weekday `n` days before this one.
    ///
    /// This is the inverse of [`Weekday::advance`].
    #[inline]
    pub fn back(self, n: u32) -> Weekday {
        let offset = (self as u32 + 7 - n % 7) % 7;
        ALL[offset as usize]
    }

    /// Returns the day after this one.
    #[inline]
    pub fn next(self) -> Weekday {
        self.advance(1)
    }

    /// Returns the day before this one.
    #[inline]
    pub fn previous(self) -> Weekday {
        self.back(1)
    }

    /// Returns the number of days, in `0..=6`, needed to advance from this
    /// weekday to `other`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::civil::Weekday;
    ///
    /// assert_eq!(Weekday::Friday.distance_to(Weekday::Monday), 3);
    /// assert_eq!(Weekday::Friday.distance_to(Weekday::Friday), 0);
    /// ```
    #[inline]
    pub fn distance_to(self, other: Weekday) -> u8 {
        (other as i8 - self as i8).rem_euclid(7) as u8
    }

    /// Returns the number of days, in `0..=6`, needed to advance from
    /// `other` to this weekday.
    #[inline]
    pub fn distance_from(self, other: Weekday) -> u8 {
        other.distance_to(self)
    }

    /// Returns the full English name of this weekday. For example, `Monday`.
    pub fn name(self) -> &'static str {
        use self::Weekday::*;

        match self {
            Monday => "Monday",
            Tuesday => "Tuesday",
            Wednesday => "Wednesday",
            Thursday => "Thursday",
            Friday => "Friday",
            Saturday => "Saturday",
            Sunday => "Sunday",
        }
    }

    /// Returns the three letter English abbreviation of this weekday. For
    /// example, `Mon`.
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    /// Returns the weekday of a day counted from `1970-01-01`, which was a
    /// Thursday.
    #[inline]
    pub(crate) fn from_epoch_day(day: IEpochDay) -> Weekday {
        let offset = (day.epoch_day + 3).rem_euclid(7);
        ALL[offset as usize]
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Weekday {
    fn arbitrary(g: &mut quickcheck::Gen) -> Weekday {
        *g.choose(&ALL).unwrap()
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Weekday>> {
        alloc::boxed::Box::new(
            self.to_monday_zero_offset()
                .shrink()
                .filter_map(|n| Weekday::from_monday_zero_offset(n).ok()),
        )
    }
}
