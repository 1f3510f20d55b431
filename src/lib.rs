/*!
Tempora is a library for points in time on the proleptic Gregorian calendar,
with millisecond resolution, fixed UTC offsets and rule based daylight saving
time.

The central type is [`PointInTime`]. It is an instant (a number of
milliseconds since the Unix epoch) paired with a [`TimeZone`](tz::TimeZone),
and it exposes both views of itself: the instant, and the wall clock fields
(year, month, day, hour, minute, second and millisecond) it corresponds to in
its zone. Every conversion between the two goes through the same calendar
routines, so they always agree.

# Overview

* [`civil`] has the calendar building blocks: [`civil::Month`],
[`civil::Weekday`], leap years and month lengths.
* [`tz`] has [`tz::UtcOffset`], daylight saving [`tz::TransitionRule`]s, the
[`tz::TimeZone`] combining them, and a [`tz::ZoneRegistry`] for looking up
zones by name.
* [`fmt`] has the ISO 8601 format used by `Display` and `FromStr`, a
`strftime`/`strptime` style [`fmt::Formatter`] and (with the `serde` feature)
Serde helpers.

Years from `-9999` through `9999` are supported. Every operation that could
leave that range, or that receives an out of range field, returns an
[`Error`].

# Example

```
use tempora::{
    civil::{Month, Weekday},
    tz::{DaySelector, TimeZone, TransitionRule, UtcOffset},
    PointInTime,
};

// The US rules in effect since 2007. Transition hours are given in
// standard time, so the November rule's 01:00 is 02:00 daylight time.
let new_york = TimeZone::new(
    "America/New_York",
    UtcOffset::new(-5, 0)?,
    [
        TransitionRule::new(
            2007,
            None,
            Month::March,
            DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 },
            2,
            60,
        )?,
        TransitionRule::new(
            2007,
            None,
            Month::November,
            DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 1 },
            1,
            0,
        )?,
    ],
)?;

let pt = PointInTime::new_in(new_york, 2024, Month::March, 9, 12, 0, 0, 0)?;
assert_eq!(pt.to_string(), "2024-03-09T12:00:00.000-05:00[America/New_York]");

// Adding days keeps the wall clock time, even across a transition.
let next = pt.add_days(1)?;
assert_eq!(next.to_string(), "2024-03-10T12:00:00.000-04:00[America/New_York]");
assert_eq!(next.epoch_millis() - pt.epoch_millis(), 23 * 60 * 60 * 1000);
assert_eq!(next.weekday(), Weekday::Sunday);

// Adding hours is exact.
let later = pt.add_hours(24)?;
assert_eq!(later.hour(), 13);

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** (enabled by default) - When enabled, [`PointInTime::now`] and
[`TimeZone::current_offset`](tz::TimeZone::current_offset) become
available, and [`Error`] implements `std::error::Error`.
* **logging** - When enabled, the `log` crate is used to emit messages about
zone registry activity and transition rule selection.
* **serde** - When enabled, [`PointInTime`] and [`tz::UtcOffset`] implement
Serde's `Serialize` and `Deserialize` traits using their string forms, and
`fmt::serde` provides helpers for an integer number of milliseconds.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

// Errors, zone names and zone rules all live on the heap.
extern crate alloc;

pub use crate::{error::Error, point::PointInTime};

#[macro_use]
mod logging;

pub mod civil;
mod error;
pub mod fmt;
mod point;
pub mod tz;
mod util;
