use alloc::string::{String, ToString};

use crate::{
    error::{tz::offset::Error as E, Error, ErrorContext},
    util::itime::MS_PER_MINUTE,
};

/// Represents a fixed offset from UTC as a number of hours and minutes.
///
/// Negative offsets correspond to time zones west of the prime meridian,
/// while positive offsets correspond to time zones east of the prime
/// meridian. Equivalently, in all cases, `local-time - offset = UTC`.
///
/// The hours and minutes of an offset never have opposite signs. That is,
/// `-05:30` is represented as `-5` hours and `-30` minutes. A zero component
/// is compatible with either sign, so `-00:30` is `0` hours and `-30`
/// minutes.
///
/// # Display format
///
/// This type implements the `std::fmt::Display` trait. It will convert the
/// offset to a string in the form `{sign}{hours}:{minutes}`, where both
/// components are zero padded to two digits. A zero offset is displayed as
/// `+00:00`. Use [`UtcOffset::format`] to omit the colon.
///
/// ```
/// use tempora::tz::UtcOffset;
///
/// let o = UtcOffset::new(-5, -30)?;
/// assert_eq!(o.to_string(), "-05:30");
/// assert_eq!(o.format(false), "-0530");
/// assert_eq!(o.milliseconds(), -19_800_000);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct UtcOffset {
    hours: i8,
    minutes: i8,
}

impl UtcOffset {
    /// The minimum possible offset, `-25:59`.
    pub const MIN: UtcOffset = UtcOffset { hours: -25, minutes: -59 };

    /// The maximum possible offset, `+25:59`.
    pub const MAX: UtcOffset = UtcOffset { hours: 25, minutes: 59 };

    /// The offset corresponding to UTC. That is, no offset at all.
    pub const UTC: UtcOffset = UtcOffset { hours: 0, minutes: 0 };

    /// Creates a new offset from the given hours and minutes.
    ///
    /// # Errors
    ///
    /// This returns an error when `hours` is outside of `-25..=25`, when
    /// `minutes` is outside of `-59..=59` or when one of them is strictly
    /// positive while the other is strictly negative.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// assert!(UtcOffset::new(5, 30).is_ok());
    /// assert!(UtcOffset::new(0, -30).is_ok());
    /// assert!(UtcOffset::new(-5, 30).is_err());
    /// assert!(UtcOffset::new(5, 60).is_err());
    /// ```
    pub fn new(hours: i8, minutes: i8) -> Result<UtcOffset, Error> {
        if !(-25 <= hours && hours <= 25) {
            return Err(Error::range("offset hours", hours, -25, 25));
        }
        if !(-59 <= minutes && minutes <= 59) {
            return Err(Error::range("offset minutes", minutes, -59, 59));
        }
        if (hours > 0 && minutes < 0) || (hours < 0 && minutes > 0) {
            return Err(E::SignMismatch { hours, minutes }.into());
        }
        Ok(UtcOffset { hours, minutes })
    }

    /// Creates a new offset in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics under the same conditions that [`UtcOffset::new`]
    /// returns an error.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// const IST: UtcOffset = UtcOffset::constant(5, 30);
    /// assert_eq!(IST.to_string(), "+05:30");
    /// ```
    pub const fn constant(hours: i8, minutes: i8) -> UtcOffset {
        if !(-25 <= hours && hours <= 25) {
            panic!("invalid UTC offset hours")
        }
        if !(-59 <= minutes && minutes <= 59) {
            panic!("invalid UTC offset minutes")
        }
        if (hours > 0 && minutes < 0) || (hours < 0 && minutes > 0) {
            panic!("UTC offset hours and minutes have opposite signs")
        }
        UtcOffset { hours, minutes }
    }

    /// Creates a new offset from a total number of minutes.
    ///
    /// # Errors
    ///
    /// This returns an error when the offset would be outside of
    /// `-25:59..=+25:59`. In units of minutes, that is `-1559..=1559`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// assert_eq!(UtcOffset::from_minutes(-330)?, UtcOffset::new(-5, -30)?);
    /// assert_eq!(UtcOffset::from_minutes(90)?.to_string(), "+01:30");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_minutes(minutes: i32) -> Result<UtcOffset, Error> {
        let min = UtcOffset::MIN.total_minutes();
        let max = UtcOffset::MAX.total_minutes();
        if !(min <= minutes && minutes <= max) {
            return Err(Error::range("offset minutes", minutes, min, max));
        }
        let (hours, minutes) = ((minutes / 60) as i8, (minutes % 60) as i8);
        Ok(UtcOffset { hours, minutes })
    }

    /// Returns the hours component of this offset.
    #[inline]
    pub fn hours(self) -> i8 {
        self.hours
    }

    /// Returns the minutes component of this offset. This has the same
    /// sign as [`UtcOffset::hours`] unless one of them is zero.
    #[inline]
    pub fn minutes(self) -> i8 {
        self.minutes
    }

    /// Returns the total number of minutes in this offset.
    #[inline]
    pub fn total_minutes(self) -> i32 {
        i32::from(self.hours) * 60 + i32::from(self.minutes)
    }

    /// Returns the total number of seconds in this offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// assert_eq!(UtcOffset::new(-5, -30)?.seconds(), -19_800);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn seconds(self) -> i32 {
        self.total_minutes() * 60
    }

    /// Returns the total number of milliseconds in this offset.
    #[inline]
    pub fn milliseconds(self) -> i64 {
        i64::from(self.total_minutes()) * MS_PER_MINUTE
    }

    /// Returns true if and only if this offset is less than zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.hours < 0 || self.minutes < 0
    }

    /// Returns this offset with `minutes` added to it.
    ///
    /// The sum is computed on the total number of minutes, so the result
    /// always has hours and minutes of a consistent sign.
    ///
    /// # Errors
    ///
    /// This returns an error when the result is outside of
    /// `-25:59..=+25:59`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// let o = UtcOffset::new(5, 30)?;
    /// assert_eq!(o.checked_add_minutes(30)?.to_string(), "+06:00");
    /// let o = UtcOffset::new(0, 30)?;
    /// assert_eq!(o.checked_add_minutes(-60)?.to_string(), "-00:30");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn checked_add_minutes(
        self,
        minutes: i32,
    ) -> Result<UtcOffset, Error> {
        let total = self.total_minutes().saturating_add(minutes);
        UtcOffset::from_minutes(total)
    }

    /// Formats this offset as `±HH:MM` when `use_colon` is true and as
    /// `±HHMM` otherwise.
    ///
    /// The sign is negative when either component is negative. Both
    /// magnitudes are zero padded to two digits.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// let o = UtcOffset::new(9, 0)?;
    /// assert_eq!(o.format(true), "+09:00");
    /// assert_eq!(o.format(false), "+0900");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn format(self, use_colon: bool) -> String {
        if use_colon {
            return self.to_string();
        }
        let mut buf = String::with_capacity(5);
        // Writing to a `String` never fails.
        let _ = self.write(&mut buf, false);
        buf
    }

    /// Parses an offset from text of the form `±HH:MM` or `±HHMM`.
    ///
    /// The sign applies to both the hours and the minutes.
    ///
    /// # Errors
    ///
    /// This returns an error quoting the text given when it doesn't have
    /// exactly that form, or when the hours or minutes are out of the range
    /// accepted by [`UtcOffset::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// assert_eq!(UtcOffset::parse("-05:30")?, UtcOffset::new(-5, -30)?);
    /// assert_eq!(UtcOffset::parse("+0900")?, UtcOffset::new(9, 0)?);
    /// assert!(UtcOffset::parse("+5:30").is_err());
    /// assert!(UtcOffset::parse("05:30").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(text: &str) -> Result<UtcOffset, Error> {
        let bytes = text.as_bytes();
        let (sign, rest) = match bytes.split_first() {
            Some((&b'+', rest)) => (1, rest),
            Some((&b'-', rest)) => (-1, rest),
            _ => return Err(E::invalid_format(text).into()),
        };
        let digits: [u8; 4] = match *rest {
            [h1, h2, b':', m1, m2] | [h1, h2, m1, m2] => [h1, h2, m1, m2],
            _ => return Err(E::invalid_format(text).into()),
        };
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(E::invalid_format(text).into());
        }
        let hours = ((digits[0] - b'0') * 10 + (digits[1] - b'0')) as i8;
        let minutes = ((digits[2] - b'0') * 10 + (digits[3] - b'0')) as i8;
        UtcOffset::new(sign * hours, sign * minutes)
            .with_context(|| E::invalid_format(text))
    }

    /// Writes this offset with an optional colon separator.
    pub(crate) fn write<W: core::fmt::Write>(
        self,
        mut wtr: W,
        use_colon: bool,
    ) -> core::fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        let hours = self.hours.unsigned_abs();
        let minutes = self.minutes.unsigned_abs();
        if use_colon {
            write!(wtr, "{sign}{hours:02}:{minutes:02}")
        } else {
            write!(wtr, "{sign}{hours:02}{minutes:02}")
        }
    }
}

impl Default for UtcOffset {
    fn default() -> UtcOffset {
        UtcOffset::UTC
    }
}

impl core::fmt::Debug for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("UtcOffset(")?;
        self.write(&mut *f, true)?;
        f.write_str(")")
    }
}

impl core::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.write(f, true)
    }
}

impl core::str::FromStr for UtcOffset {
    type Err = Error;

    fn from_str(text: &str) -> Result<UtcOffset, Error> {
        UtcOffset::parse(text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UtcOffset {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UtcOffset {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<UtcOffset, D::Error> {
        use serde::de;

        struct UtcOffsetVisitor;

        impl<'de> de::Visitor<'de> for UtcOffsetVisitor {
            type Value = UtcOffset;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a UTC offset string like `-05:30`")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<UtcOffset, E> {
                UtcOffset::parse(value).map_err(de::Error::custom)
            }

            #[inline]
            fn visit_bytes<E: de::Error>(
                self,
                value: &[u8],
            ) -> Result<UtcOffset, E> {
                let value = core::str::from_utf8(value).map_err(|_| {
                    let unexpected = de::Unexpected::Bytes(value);
                    de::Error::invalid_value(unexpected, &self)
                })?;
                self.visit_str(value)
            }
        }

        deserializer.deserialize_str(UtcOffsetVisitor)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for UtcOffset {
    fn arbitrary(g: &mut quickcheck::Gen) -> UtcOffset {
        let min = UtcOffset::MIN.total_minutes();
        let max = UtcOffset::MAX.total_minutes();
        let minutes = i32::arbitrary(g).rem_euclid(max - min + 1) + min;
        // OK because the total is always in range.
        UtcOffset::from_minutes(minutes).unwrap()
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = UtcOffset>> {
        alloc::boxed::Box::new(
            self.total_minutes()
                .shrink()
                .filter_map(|minutes| UtcOffset::from_minutes(minutes).ok()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let o = UtcOffset::new(-5, -30).unwrap();
        assert_eq!(o.hours(), -5);
        assert_eq!(o.minutes(), -30);
        assert_eq!(o.seconds(), -19_800);
        assert_eq!(o.milliseconds(), -19_800_000);

        assert!(UtcOffset::new(0, -30).is_ok());
        assert!(UtcOffset::new(-3, 0).is_ok());

        let err = UtcOffset::new(-5, 30).unwrap_err();
        assert!(err.is_invalid_argument());
        insta::assert_snapshot!(
            err,
            @"UTC offset hours (-5) and minutes (30) must not have opposite signs",
        );
        insta::assert_snapshot!(
            UtcOffset::new(1, 60).unwrap_err(),
            @"Expected offset minutes between -59 and 59 inclusive, found 60",
        );
        insta::assert_snapshot!(
            UtcOffset::new(26, 0).unwrap_err(),
            @"Expected offset hours between -25 and 25 inclusive, found 26",
        );
    }

    #[test]
    fn formatting() {
        let o = UtcOffset::new(-5, -30).unwrap();
        assert_eq!(o.format(true), "-05:30");
        assert_eq!(o.format(false), "-0530");
        assert_eq!(UtcOffset::UTC.format(true), "+00:00");
        assert_eq!(UtcOffset::new(0, -15).unwrap().to_string(), "-00:15");
        assert_eq!(UtcOffset::MAX.to_string(), "+25:59");
        assert_eq!(UtcOffset::MIN.format(false), "-2559");
        assert_eq!(
            alloc::format!("{:?}", UtcOffset::constant(1, 0)),
            "UtcOffset(+01:00)",
        );
    }

    #[test]
    fn parsing() {
        assert_eq!(UtcOffset::parse("+00:00").unwrap(), UtcOffset::UTC);
        assert_eq!(UtcOffset::parse("-00:00").unwrap(), UtcOffset::UTC);
        let parse = |text| UtcOffset::parse(text).unwrap();
        assert_eq!(parse("-0030"), UtcOffset::new(0, -30).unwrap());
        assert_eq!(parse("+1200"), UtcOffset::new(12, 0).unwrap());

        let bad = [
            "",
            "+",
            "05:30",
            "+5:30",
            "+05:3",
            "+05::30",
            "+05:30 ",
            "+0a:30",
            "\u{2212}05:30",
        ];
        for text in bad {
            let err = UtcOffset::parse(text).unwrap_err();
            assert!(err.is_invalid_format(), "{text:?}");
            assert!(err.is_invalid_argument(), "{text:?}");
            let quoted = alloc::format!("{text:?}");
            assert!(err.to_string().contains(&quoted), "{text:?}");
        }
        insta::assert_snapshot!(
            UtcOffset::parse("+05:75").unwrap_err(),
            @r###"invalid UTC offset "+05:75", expected a sign followed by two hour digits, an optional colon and two minute digits (e.g., `+05:30` or `-0800`): Expected offset minutes between -59 and 59 inclusive, found 75"###,
        );
        // Well formed, but beyond the largest supported offset.
        assert_eq!(parse("+25:59"), UtcOffset::MAX);
        assert_eq!(parse("-2559"), UtcOffset::MIN);
        let err = UtcOffset::parse("+30:00").unwrap_err();
        assert!(err.is_invalid_argument());
        insta::assert_snapshot!(
            err,
            @r###"invalid UTC offset "+30:00", expected a sign followed by two hour digits, an optional colon and two minute digits (e.g., `+05:30` or `-0800`): Expected offset hours between -25 and 25 inclusive, found 30"###,
        );
    }

    #[test]
    fn add_minutes_normalizes() {
        let add = |o: UtcOffset, minutes| o.checked_add_minutes(minutes);
        let o = UtcOffset::new(5, 30).unwrap();
        assert_eq!(add(o, 30).unwrap(), UtcOffset::new(6, 0).unwrap());
        assert_eq!(add(o, -60).unwrap(), UtcOffset::new(4, 30).unwrap());
        let o = UtcOffset::new(-1, 0).unwrap();
        assert_eq!(add(o, 30).unwrap(), UtcOffset::new(0, -30).unwrap());
        assert!(UtcOffset::MAX.checked_add_minutes(1).is_err());
    }

    quickcheck::quickcheck! {
        fn prop_parse_inverts_format(offset: UtcOffset) -> bool {
            UtcOffset::parse(&offset.format(true)).unwrap() == offset
                && UtcOffset::parse(&offset.format(false)).unwrap() == offset
        }

        fn prop_signs_agree(offset: UtcOffset) -> bool {
            !(offset.hours() > 0 && offset.minutes() < 0)
                && !(offset.hours() < 0 && offset.minutes() > 0)
        }

        fn prop_ordering_matches_minutes(a: UtcOffset, b: UtcOffset) -> bool {
            a.cmp(&b) == a.total_minutes().cmp(&b.total_minutes())
        }
    }
}
