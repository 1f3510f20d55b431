/*!
Routines for interacting with time zones and the zone registry.

A [`TimeZone`] is a name, a standard [`UtcOffset`] and an ordered list of
[`TransitionRule`]s describing when daylight saving time starts and ends. A
zone without rules is a fixed offset from UTC.

This crate doesn't read time zone databases. Named zones are built from
rules by the caller, and can be collected in a [`ZoneRegistry`] (or any other
[`ZoneProvider`]) which is then passed explicitly to the routines that need
to look up zones by name.

# Example

This shows how to build a zone following the US rules since 2007 and use it
to view an instant in New York:

```
use tempora::{
    civil::{Month, Weekday},
    tz::{DaySelector, TimeZone, TransitionRule, UtcOffset},
    PointInTime,
};

let second_sunday = DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 };
let first_sunday = DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 1 };
let tz = TimeZone::new(
    "America/New_York",
    UtcOffset::new(-5, 0)?,
    [
        TransitionRule::new(2007, None, Month::March, second_sunday, 2, 60)?,
        TransitionRule::new(2007, None, Month::November, first_sunday, 1, 0)?,
    ],
)?;

let pt = PointInTime::new(2024, Month::July, 4, 16, 0, 0, 0)?;
let local = pt.with_time_zone(tz);
assert_eq!(local.hour(), 12);
assert_eq!(local.offset().to_string(), "-04:00");

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    db::{ZoneProvider, ZoneRegistry},
    offset::UtcOffset,
    rule::{DaySelector, TransitionRule},
    timezone::TimeZone,
};

#[cfg(test)]
pub(crate) use self::timezone::testdata;

mod db;
mod offset;
mod rule;
mod timezone;
