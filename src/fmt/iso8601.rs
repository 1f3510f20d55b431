/*!
The ISO 8601 text format of a point in time, extended with a time zone
annotation.

This is the format used by the `Display` and `FromStr` trait
implementations of [`PointInTime`]:

```text
2000-02-29T12:09:14.000+00:00[UTC]
2024-07-04T12:00:00.000-04:00[America/New_York]
```

Years from `0000` through `9999` are written with four digits. Other years
are written with a sign and six digits, for example `-000044`.

# Parsing

The parser is more lenient than the printer:

* The separator between the date and time may be `T`, `t` or a space.
* Seconds and fractional seconds are optional. Up to nine fractional digits
  are accepted, but anything beyond milliseconds is truncated.
* The offset may be `Z`, `±HH:MM` or `±HHMM`, and may be omitted when a time
  zone annotation is present.
* The annotation may be omitted. The point in time is then in a fixed offset
  zone (or UTC for `Z`).

When both a numeric offset and an annotation are present, the offset must
agree with the offset of the named zone at that instant. When the offset is
`Z`, the instant is taken as given and only viewed in the named zone.

Named zones are resolved through a [`ZoneProvider`]. Annotations that are
`UTC` or a numeric offset resolve to fixed zones without consulting the
provider.
*/

use alloc::string::String;

use crate::{
    civil::Month,
    error::{fmt::iso8601::Error as E, Error, ErrorContext},
    fmt::util::{self, Colon},
    tz::{TimeZone, UtcOffset, ZoneProvider, ZoneRegistry},
    PointInTime,
};

/// Parses an ISO 8601 point in time. Only fixed offset zones may be named in
/// its annotation.
///
/// This is what `PointInTime`'s `FromStr` implementation uses.
///
/// # Example
///
/// ```
/// use tempora::{fmt::iso8601, PointInTime};
///
/// let pt = iso8601::parse("2000-02-29T12:09:14Z")?;
/// assert_eq!(pt, PointInTime::from_epoch_seconds(951_826_154)?);
///
/// let pt: PointInTime = "2024-06-01 08:00+05:30".parse()?;
/// assert_eq!(pt.to_string(), "2024-06-01T08:00:00.000+05:30[+05:30]");
///
/// assert!(iso8601::parse("2024-06-01T08:00[Europe/Paris]")
///     .unwrap_err()
///     .is_not_found());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(text: &str) -> Result<PointInTime, Error> {
    parse_with(text, &ZoneRegistry::new())
}

/// Parses an ISO 8601 point in time, looking up the zone named in its
/// annotation with the provider given.
///
/// # Errors
///
/// Besides malformed text and out of range values, this returns an error
/// when the named zone can't be found, or when the numeric offset disagrees
/// with the named zone.
///
/// # Example
///
/// ```
/// use tempora::{
///     civil::{Month, Weekday},
///     fmt::iso8601,
///     tz::{DaySelector, TimeZone, TransitionRule, UtcOffset, ZoneRegistry},
/// };
///
/// let last_sunday = DaySelector::Last(Weekday::Sunday);
/// let berlin = TimeZone::new(
///     "Europe/Berlin",
///     UtcOffset::new(1, 0)?,
///     [
///         TransitionRule::new(1996, None, Month::March, last_sunday, 2, 60)?,
///         TransitionRule::new(1996, None, Month::October, last_sunday, 2, 0)?,
///     ],
/// )?;
/// let registry: ZoneRegistry = [berlin].into_iter().collect();
///
/// let pt = iso8601::parse_with("2024-07-01T12:00[Europe/Berlin]", &registry)?;
/// assert_eq!(pt.to_string(), "2024-07-01T12:00:00.000+02:00[Europe/Berlin]");
///
/// let err = iso8601::parse_with(
///     "2024-07-01T12:00+01:00[Europe/Berlin]",
///     &registry,
/// ).unwrap_err();
/// assert!(err.is_invalid_format());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_with<P: ZoneProvider>(
    text: &str,
    provider: P,
) -> Result<PointInTime, Error> {
    Parser { provider: &provider }
        .parse(text.as_bytes())
        .with_context(|| E::failed_parse(text))
}

/// Formats a point in time as ISO 8601 text with a time zone annotation.
///
/// # Example
///
/// ```
/// use tempora::{fmt::iso8601, PointInTime};
///
/// let pt = PointInTime::from_epoch_millis(-62_198_755_200_000)?;
/// assert_eq!(iso8601::format(&pt), "-000001-01-01T00:00:00.000+00:00[UTC]");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn format(pt: &PointInTime) -> String {
    let mut buf = String::with_capacity(40);
    // Writing to a `String` never fails.
    let _ = write(&mut buf, pt);
    buf
}

/// Writes a point in time as ISO 8601 text with a time zone annotation.
pub(crate) fn write<W: core::fmt::Write>(
    mut wtr: W,
    pt: &PointInTime,
) -> core::fmt::Result {
    let year = pt.year();
    if 0 <= year && year <= 9999 {
        write!(wtr, "{year:04}")?;
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        write!(wtr, "{sign}{:06}", year.unsigned_abs())?;
    }
    write!(
        wtr,
        "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        pt.month().to_number(),
        pt.day(),
        pt.hour(),
        pt.minute(),
        pt.second(),
        pt.millisecond(),
    )?;
    pt.offset().write(&mut wtr, true)?;
    write!(wtr, "[{}]", pt.time_zone().name())
}

/// The offset found after the time of day.
#[derive(Clone, Copy, Debug)]
enum ParsedOffset {
    Zulu,
    Numeric(UtcOffset),
}

struct Parser<'p> {
    provider: &'p dyn ZoneProvider,
}

impl<'p> Parser<'p> {
    fn parse(&self, inp: &[u8]) -> Result<PointInTime, Error> {
        let (year, inp) = parse_year(inp)?;
        let inp = util::parse_byte(inp, b'-')?;
        let (month, inp) = util::parse_digits(inp, 2, "month")?;
        let inp = util::parse_byte(inp, b'-')?;
        let (day, inp) = util::parse_digits(inp, 2, "day")?;
        let inp = match inp.split_first() {
            Some((&(b'T' | b't' | b' '), rest)) => rest,
            _ => return Err(E::ExpectedTimeSeparator.into()),
        };
        let (hour, inp) = util::parse_digits(inp, 2, "hour")?;
        let inp = util::parse_byte(inp, b':')?;
        let (minute, mut inp) = util::parse_digits(inp, 2, "minute")?;
        let (mut second, mut millisecond) = (0, 0);
        if let Some((&b':', rest)) = inp.split_first() {
            let (s, rest) = util::parse_digits(rest, 2, "second")?;
            second = s;
            inp = rest;
            if let Some((&(b'.' | b','), rest)) = inp.split_first() {
                let (ms, rest) = util::parse_fraction(rest)?;
                millisecond = ms;
                inp = rest;
            }
        }
        let (offset, inp) = parse_offset(inp)?;
        let (name, inp) = parse_annotation(inp)?;
        if !inp.is_empty() {
            let remaining = String::from_utf8_lossy(inp).into();
            return Err(E::TrailingInput { remaining }.into());
        }

        // All of the numbers parsed above have at most two digits, except
        // for the year, which was checked to fit in an `i16`.
        let wall = PointInTime::new(
            year,
            Month::from_number(month as i8)?,
            day as i8,
            hour as i8,
            minute as i8,
            second as i8,
            millisecond,
        )?;
        let Some(name) = name else {
            return match offset {
                None => Err(E::MissingOffset.into()),
                Some(ParsedOffset::Zulu) => Ok(wall),
                Some(ParsedOffset::Numeric(offset)) => PointInTime::from_local(
                    TimeZone::fixed(offset),
                    wall.to_idatetime(),
                ),
            };
        };
        let tz = self.resolve(name)?;
        match offset {
            None => PointInTime::from_local(tz, wall.to_idatetime()),
            Some(ParsedOffset::Zulu) => Ok(wall.with_time_zone(tz)),
            Some(ParsedOffset::Numeric(parsed)) => {
                let millis = wall.epoch_millis() - parsed.milliseconds();
                let pt = PointInTime::from_epoch_millis_in(tz, millis)?;
                let zone = pt.offset();
                if zone != parsed {
                    let name = pt.time_zone().name().into();
                    let err = E::MismatchOffset { parsed, zone, name };
                    return Err(err.into());
                }
                Ok(pt)
            }
        }
    }

    /// Finds the zone with the given annotation name.
    fn resolve(&self, name: &str) -> Result<TimeZone, Error> {
        if name.eq_ignore_ascii_case("UTC")
            || name.starts_with('+')
            || name.starts_with('-')
        {
            return TimeZone::parse(name);
        }
        self.provider.get(name)
    }
}

/// Parses a four digit year, or a signed six digit year.
fn parse_year(inp: &[u8]) -> Result<(i16, &[u8]), Error> {
    let (sign, digits) = match inp.split_first() {
        Some((&b'+', _)) => (1, 6),
        Some((&b'-', _)) => (-1, 6),
        _ => (1, 4),
    };
    let inp = if digits == 6 { &inp[1..] } else { inp };
    let (year, inp) = util::parse_digits(inp, digits, "year")?;
    if year > 9999 {
        return Err(Error::range("year", sign * year, -9999, 9999));
    }
    // At most four significant digits.
    Ok((sign as i16 * year as i16, inp))
}

fn parse_offset(inp: &[u8]) -> Result<(Option<ParsedOffset>, &[u8]), Error> {
    match inp.first() {
        Some(b'Z' | b'z') => Ok((Some(ParsedOffset::Zulu), &inp[1..])),
        Some(b'+' | b'-') => {
            let (offset, inp) = util::parse_offset(inp, Colon::Optional)?;
            Ok((Some(ParsedOffset::Numeric(offset)), inp))
        }
        _ => Ok((None, inp)),
    }
}

/// Parses an optional `[name]` annotation.
fn parse_annotation(inp: &[u8]) -> Result<(Option<&str>, &[u8]), Error> {
    let Some((&b'[', rest)) = inp.split_first() else {
        return Ok((None, inp));
    };
    let Some(end) = rest.iter().position(|&b| b == b']') else {
        return Err(E::UnterminatedAnnotation.into());
    };
    if end == 0 {
        return Err(E::EmptyAnnotation.into());
    }
    // The input came from a `&str` and `]` is ASCII, so this is a char
    // boundary.
    let name = core::str::from_utf8(&rest[..end])
        .map_err(|_| Error::from(E::UnterminatedAnnotation))?;
    Ok((Some(name), &rest[end + 1..]))
}
