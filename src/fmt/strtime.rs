/*!
Support for "printf"-style formatting and parsing of points in time.

The directives supported are a subset of those found in POSIX `strftime`
and `strptime`:

| Directive | Example | Description |
| --------- | ------- | ----------- |
| `%%` | `%%` | A literal `%`. |
| `%A` | `Sunday` | The full weekday. |
| `%a` | `Sun` | The abbreviated weekday. |
| `%B` | `June` | The full month name. |
| `%b`, `%h` | `Jun` | The abbreviated month name. |
| `%d` | `01`, `31` | The day of the month, zero padded. |
| `%e` | ` 1`, `31` | The day of the month, space padded. |
| `%F` | `2024-07-14` | Equivalent to `%Y-%m-%d`. |
| `%f` | `250` | The millisecond, zero padded to three digits. |
| `%H` | `00`, `23` | The hour in a 24 hour clock, zero padded. |
| `%j` | `001`, `366` | The day of the year, zero padded. |
| `%M` | `00`, `59` | The minute, zero padded. |
| `%m` | `01`, `12` | The month, zero padded. |
| `%S` | `00`, `59` | The second, zero padded. |
| `%T` | `23:30:59` | Equivalent to `%H:%M:%S`. |
| `%Y` | `2024`, `-0044` | The year, zero padded to four digits. |
| `%Z` | `Europe/Berlin` | The name of the time zone. |
| `%z` | `+0530` | The UTC offset in effect. |
| `%:z` | `+05:30` | The UTC offset in effect, with a colon. |

When parsing, a whitespace byte in the format string matches any amount of
whitespace (including none) in the input, and every other literal byte must
match exactly. The values matched by `%Z`, `%a` and `%A` are checked for
their shape but otherwise ignored. The parsed point in time is in a fixed
offset zone when `%z` or `%:z` is present and in UTC otherwise. A year is
required, along with either a month and a day or a day of the year. Time of
day fields that aren't present default to zero.

# Example

```
use tempora::{civil::Month, fmt::strtime, tz::{TimeZone, UtcOffset}, PointInTime};

let tz = TimeZone::fixed(UtcOffset::new(-5, 0)?);
let pt = PointInTime::new_in(tz, 2024, Month::July, 4, 9, 30, 0, 0)?;
assert_eq!(
    strtime::format("%A, %B %e %Y at %T %z", &pt)?,
    "Thursday, July  4 2024 at 09:30:00 -0500",
);

let parsed = strtime::parse("%F %H:%M %z", "2024-07-04 09:30 -0500")?;
assert_eq!(parsed, pt);

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use alloc::string::String;

use crate::{
    civil::{self, Month, Weekday},
    error::{fmt::strtime::Error as E, Error, ErrorContext},
    fmt::{
        util::{self, Colon},
        Formatter,
    },
    tz::{TimeZone, UtcOffset},
    util::itime::{self, IDate},
    PointInTime,
};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAY_ABBREVIATIONS: [&str; 7] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
    "Nov", "Dec",
];

/// A [`Formatter`] using `strftime`/`strptime` style patterns.
///
/// This is a thin wrapper around [`format`] and [`parse`] for callers that
/// want to work with any `Formatter`.
///
/// # Example
///
/// ```
/// use tempora::{fmt::{strtime::Strtime, Formatter}, PointInTime};
///
/// fn render(f: &dyn Formatter, pt: &PointInTime) -> String {
///     f.format(pt, "%d %b %Y").unwrap()
/// }
///
/// let pt = PointInTime::from_epoch_seconds(951_826_154)?;
/// assert_eq!(render(&Strtime::new(), &pt), "29 Feb 2000");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Strtime {
    _priv: (),
}

impl Strtime {
    /// Creates a new `strtime` formatter.
    pub const fn new() -> Strtime {
        Strtime { _priv: () }
    }
}

impl Formatter for Strtime {
    fn format(
        &self,
        pt: &PointInTime,
        pattern: &str,
    ) -> Result<String, Error> {
        format(pattern, pt)
    }

    fn parse(&self, text: &str, pattern: &str) -> Result<PointInTime, Error> {
        parse(pattern, text)
    }
}

/// Formats a point in time according to the given pattern.
///
/// # Errors
///
/// This returns an error when the pattern contains an unknown directive or
/// ends with a lone `%`.
///
/// # Example
///
/// ```
/// use tempora::{fmt::strtime, PointInTime};
///
/// let pt = PointInTime::from_epoch_millis(1_720_000_000_123)?;
/// assert_eq!(
///     strtime::format("%a %j %T.%f %Z", &pt)?,
///     "Wed 185 09:46:40.123 UTC",
/// );
/// assert!(strtime::format("%Q", &pt).is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn format(pattern: &str, pt: &PointInTime) -> Result<String, Error> {
    let mut buf = String::with_capacity(pattern.len() + 16);
    let mut fmt = Formatting { pt, fmt: pattern, wtr: &mut buf };
    fmt.format().context(E::FailedStrftime)?;
    Ok(buf)
}

/// Parses text into a point in time according to the given pattern.
///
/// # Errors
///
/// This returns an error when the input doesn't match the pattern, when
/// input remains after the pattern is exhausted, when the year, month or day
/// is missing, or when the values parsed don't form a valid point in time.
///
/// # Example
///
/// ```
/// use tempora::{fmt::strtime, PointInTime};
///
/// let pt = strtime::parse("%Y-%j %H:%M:%S", "2000-060 12:09:14")?;
/// assert_eq!(pt, PointInTime::from_epoch_seconds(951_826_154)?);
///
/// assert!(strtime::parse("%Y-%m-%d", "2023-02-29").is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(pattern: &str, input: &str) -> Result<PointInTime, Error> {
    let mut parser = Parser {
        fmt: pattern.as_bytes(),
        inp: input.as_bytes(),
        tm: Parsed::default(),
    };
    parser.parse().context(E::FailedStrptime)?;
    parser.tm.to_point_in_time().context(E::FailedStrptime)
}

struct Formatting<'p, 'f, 'w> {
    pt: &'p PointInTime,
    fmt: &'f str,
    wtr: &'w mut String,
}

impl<'p, 'f, 'w> Formatting<'p, 'f, 'w> {
    fn format(&mut self) -> Result<(), Error> {
        use core::fmt::Write;

        let pt = self.pt;
        while !self.fmt.is_empty() {
            // Literal text is copied through as whole `str` chunks, which
            // keeps multi-byte characters intact.
            let end = self.fmt.find('%').unwrap_or(self.fmt.len());
            self.wtr.push_str(&self.fmt[..end]);
            self.fmt = &self.fmt[end..];
            if self.fmt.is_empty() {
                break;
            }
            let colons = self.fmt[1..].bytes().take_while(|&b| b == b':');
            let colons = colons.count();
            let Some(&directive) = self.fmt.as_bytes().get(1 + colons) else {
                return Err(E::UnexpectedEndAfterPercent.into());
            };
            if colons > 0 && directive != b'z' || colons > 1 {
                return Err(E::ColonCount { directive }.into());
            }
            // Writing to a `String` never fails, so the results of `write!`
            // below are ignored.
            let w = &mut *self.wtr;
            match directive {
                b'%' => w.push('%'),
                b'A' => w.push_str(local_weekday(pt).name()),
                b'a' => w.push_str(local_weekday(pt).abbreviation()),
                b'B' => w.push_str(pt.month().name()),
                b'b' | b'h' => w.push_str(pt.month().abbreviation()),
                b'd' => {
                    let _ = write!(w, "{:02}", pt.day());
                }
                b'e' => {
                    let _ = write!(w, "{:>2}", pt.day());
                }
                b'F' => {
                    let _ = util::write_year(&mut *w, pt.year());
                    let month = pt.month().to_number();
                    let _ = write!(w, "-{month:02}-{:02}", pt.day());
                }
                b'f' => {
                    let _ = write!(w, "{:03}", pt.millisecond());
                }
                b'H' => {
                    let _ = write!(w, "{:02}", pt.hour());
                }
                b'j' => {
                    let _ = write!(w, "{:03}", pt.day_of_year());
                }
                b'M' => {
                    let _ = write!(w, "{:02}", pt.minute());
                }
                b'm' => {
                    let _ = write!(w, "{:02}", pt.month().to_number());
                }
                b'S' => {
                    let _ = write!(w, "{:02}", pt.second());
                }
                b'T' => {
                    let (h, m, s) = (pt.hour(), pt.minute(), pt.second());
                    let _ = write!(w, "{h:02}:{m:02}:{s:02}");
                }
                b'Y' => {
                    let _ = util::write_year(&mut *w, pt.year());
                }
                b'Z' => w.push_str(pt.time_zone().name()),
                b'z' => {
                    let _ = pt.offset().write(&mut *w, colons == 1);
                }
                _ => return Err(E::UnknownDirective { directive }.into()),
            }
            self.fmt = &self.fmt[2 + colons..];
        }
        Ok(())
    }
}

/// The fields found while parsing.
#[derive(Debug, Default)]
struct Parsed {
    year: Option<i16>,
    month: Option<i8>,
    day: Option<i8>,
    day_of_year: Option<i16>,
    hour: Option<i8>,
    minute: Option<i8>,
    second: Option<i8>,
    millisecond: Option<i16>,
    offset: Option<UtcOffset>,
}

impl Parsed {
    fn to_point_in_time(&self) -> Result<PointInTime, Error> {
        let year =
            self.year.ok_or(E::MissingField { what: "year (`%Y`)" })?;
        if !(-9999 <= year && year <= 9999) {
            return Err(Error::range("year", year, -9999, 9999));
        }
        let (month, day) = match (self.month, self.day, self.day_of_year) {
            (Some(month), Some(day), doy) => {
                let month = Month::from_number(month)?;
                let max_day = month.days(year);
                if let Some(parsed) = doy {
                    if 1 <= day && day <= max_day {
                        let date =
                            IDate { year, month: month.to_number(), day };
                        let got = date.day_of_year();
                        if got != parsed {
                            return Err(
                                E::MismatchDayOfYear { parsed, got }.into()
                            );
                        }
                    }
                }
                (month, day)
            }
            (None, None, Some(doy)) => {
                let max = itime::days_in_year(year);
                if !(1 <= doy && doy <= max) {
                    return Err(Error::range("day of year", doy, 1, max));
                }
                let first = IDate { year, month: 1, day: 1 };
                let date = first.add_days(i32::from(doy) - 1);
                (Month::from_number(date.month)?, date.day)
            }
            (None, _, _) => {
                return Err(E::MissingField { what: "month (`%m`)" }.into())
            }
            (Some(_), None, _) => {
                return Err(E::MissingField { what: "day (`%d`)" }.into())
            }
        };
        let tz = self.offset.map_or_else(TimeZone::utc, TimeZone::fixed);
        PointInTime::new_in(
            tz,
            year,
            month,
            day,
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.millisecond.unwrap_or(0),
        )
    }
}

/// Returns the weekday of the wall clock date, which is what `%a` and `%A`
/// write next to `%d`.
fn local_weekday(pt: &PointInTime) -> Weekday {
    civil::weekday(pt.year(), pt.month(), pt.day())
}

struct Parser<'f, 'i> {
    fmt: &'f [u8],
    inp: &'i [u8],
    tm: Parsed,
}

impl<'f, 'i> Parser<'f, 'i> {
    fn parse(&mut self) -> Result<(), Error> {
        let fail = |directive| E::DirectiveFailure { directive, colons: 0 };

        while let Some(&f) = self.fmt.first() {
            if f != b'%' {
                self.parse_literal()?;
                continue;
            }
            let colons =
                self.fmt[1..].iter().take_while(|&&b| b == b':').count();
            let Some(&directive) = self.fmt.get(1 + colons) else {
                return Err(E::UnexpectedEndAfterPercent.into());
            };
            if colons > 0 && directive != b'z' || colons > 1 {
                return Err(E::ColonCount { directive }.into());
            }
            if self.inp.is_empty() {
                return Err(E::ExpectedNonEmpty { directive }.into());
            }
            self.fmt = &self.fmt[2 + colons..];
            match directive {
                b'%' => self.parse_percent().context(fail(b'%'))?,
                b'A' => {
                    self.parse_weekday(&WEEKDAY_NAMES).context(fail(b'A'))?
                }
                b'a' => self
                    .parse_weekday(&WEEKDAY_ABBREVIATIONS)
                    .context(fail(b'a'))?,
                b'B' => {
                    self.parse_month_name(&MONTH_NAMES).context(fail(b'B'))?
                }
                b'b' | b'h' => self
                    .parse_month_name(&MONTH_ABBREVIATIONS)
                    .context(fail(directive))?,
                b'd' => self.parse_day().context(fail(b'd'))?,
                b'e' => self.parse_day_padded().context(fail(b'e'))?,
                b'F' => self.parse_iso_date().context(fail(b'F'))?,
                b'f' => self.parse_fractional().context(fail(b'f'))?,
                b'H' => self.parse_hour().context(fail(b'H'))?,
                b'j' => self.parse_day_of_year().context(fail(b'j'))?,
                b'M' => self.parse_minute().context(fail(b'M'))?,
                b'm' => self.parse_month().context(fail(b'm'))?,
                b'S' => self.parse_second().context(fail(b'S'))?,
                b'T' => self.parse_clock().context(fail(b'T'))?,
                b'Y' => self.parse_year().context(fail(b'Y'))?,
                b'Z' => self.parse_zone_name().context(fail(b'Z'))?,
                b'z' => {
                    let colon = if colons == 1 {
                        Colon::Required
                    } else {
                        Colon::Absent
                    };
                    self.parse_offset(colon).context(E::DirectiveFailure {
                        directive: b'z',
                        colons: colons as u8,
                    })?
                }
                _ => return Err(E::UnknownDirective { directive }.into()),
            }
        }
        if !self.inp.is_empty() {
            let remaining = String::from_utf8_lossy(self.inp).into();
            return Err(E::UnconsumedInput { remaining }.into());
        }
        Ok(())
    }

    /// Matches the current literal byte of the format string against the
    /// input. Whitespace matches zero or more whitespace bytes.
    fn parse_literal(&mut self) -> Result<(), Error> {
        let f = self.fmt[0];
        self.fmt = &self.fmt[1..];
        if f.is_ascii_whitespace() {
            while self.inp.first().map_or(false, |b| b.is_ascii_whitespace())
            {
                self.inp = &self.inp[1..];
            }
            return Ok(());
        }
        self.inp = util::parse_byte(self.inp, f)?;
        Ok(())
    }

    fn parse_percent(&mut self) -> Result<(), Error> {
        self.inp = util::parse_byte(self.inp, b'%')?;
        Ok(())
    }

    fn parse_weekday(&mut self, names: &[&str; 7]) -> Result<(), Error> {
        let (_, inp) = util::parse_choice(self.inp, names, "weekday")?;
        self.inp = inp;
        Ok(())
    }

    fn parse_month_name(&mut self, names: &[&str; 12]) -> Result<(), Error> {
        let (index, inp) = util::parse_choice(self.inp, names, "month")?;
        self.inp = inp;
        // At most twelve choices.
        self.tm.month = Some(index as i8 + 1);
        Ok(())
    }

    fn parse_day(&mut self) -> Result<(), Error> {
        let (day, inp) = util::parse_digits(self.inp, 2, "day")?;
        self.inp = inp;
        self.tm.day = Some(day as i8);
        Ok(())
    }

    fn parse_day_padded(&mut self) -> Result<(), Error> {
        if let Some((&b' ', rest)) = self.inp.split_first() {
            self.inp = rest;
        }
        let (day, inp) = util::parse_number(self.inp, 2, "day")?;
        self.inp = inp;
        self.tm.day = Some(day as i8);
        Ok(())
    }

    fn parse_iso_date(&mut self) -> Result<(), Error> {
        self.parse_year()?;
        self.inp = util::parse_byte(self.inp, b'-')?;
        self.parse_month()?;
        self.inp = util::parse_byte(self.inp, b'-')?;
        self.parse_day()
    }

    fn parse_fractional(&mut self) -> Result<(), Error> {
        let (millis, inp) = util::parse_fraction(self.inp)?;
        self.inp = inp;
        self.tm.millisecond = Some(millis);
        Ok(())
    }

    fn parse_hour(&mut self) -> Result<(), Error> {
        let (hour, inp) = util::parse_digits(self.inp, 2, "hour")?;
        self.inp = inp;
        self.tm.hour = Some(hour as i8);
        Ok(())
    }

    fn parse_day_of_year(&mut self) -> Result<(), Error> {
        let (doy, inp) = util::parse_digits(self.inp, 3, "day of year")?;
        self.inp = inp;
        self.tm.day_of_year = Some(doy as i16);
        Ok(())
    }

    fn parse_minute(&mut self) -> Result<(), Error> {
        let (minute, inp) = util::parse_digits(self.inp, 2, "minute")?;
        self.inp = inp;
        self.tm.minute = Some(minute as i8);
        Ok(())
    }

    fn parse_month(&mut self) -> Result<(), Error> {
        let (month, inp) = util::parse_digits(self.inp, 2, "month")?;
        self.inp = inp;
        self.tm.month = Some(month as i8);
        Ok(())
    }

    fn parse_second(&mut self) -> Result<(), Error> {
        let (second, inp) = util::parse_digits(self.inp, 2, "second")?;
        self.inp = inp;
        self.tm.second = Some(second as i8);
        Ok(())
    }

    fn parse_clock(&mut self) -> Result<(), Error> {
        self.parse_hour()?;
        self.inp = util::parse_byte(self.inp, b':')?;
        self.parse_minute()?;
        self.inp = util::parse_byte(self.inp, b':')?;
        self.parse_second()
    }

    fn parse_year(&mut self) -> Result<(), Error> {
        let (sign, inp) = match self.inp.split_first() {
            Some((&b'-', rest)) => (-1, rest),
            Some((&b'+', rest)) => (1, rest),
            _ => (1, self.inp),
        };
        let (year, inp) = util::parse_digits(inp, 4, "year")?;
        self.inp = inp;
        self.tm.year = Some(sign * year as i16);
        Ok(())
    }

    /// Skips over a time zone name or abbreviation, like `EST` or
    /// `America/New_York`.
    fn parse_zone_name(&mut self) -> Result<(), Error> {
        let len = self
            .inp
            .iter()
            .take_while(|&&b| {
                b.is_ascii_alphanumeric()
                    || matches!(b, b'_' | b'/' | b'+' | b'-')
            })
            .count();
        if len == 0 {
            return Err(crate::error::fmt::Error::ExpectedChoice {
                what: "time zone",
            }
            .into());
        }
        self.inp = &self.inp[len..];
        Ok(())
    }

    fn parse_offset(&mut self, colon: Colon) -> Result<(), Error> {
        let (offset, inp) = util::parse_offset(self.inp, colon)?;
        self.inp = inp;
        self.tm.offset = Some(offset);
        Ok(())
    }
}
