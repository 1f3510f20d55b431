/*!
Formatting and parsing of points in time.

This module provides two text formats:

* [`iso8601`] is the interchange format. It is what the `Display` and
`FromStr` trait implementations of [`PointInTime`] use, and it round trips
every point in time whose zone is UTC or a fixed offset.
* [`strtime`] formats and parses according to a `strftime`/`strptime`
style pattern given by the caller.

The [`Formatter`] trait describes pattern based formatting in the abstract,
so that callers can accept any implementation of it. [`strtime::Strtime`] is
the implementation provided by this crate.

When the `serde` crate feature is enabled, `PointInTime` and
[`UtcOffset`](crate::tz::UtcOffset) implement `Serialize` and `Deserialize`
using their string forms, and the `serde` module provides
helpers for an integer number of milliseconds from the Unix epoch instead.

# Example

```
use tempora::{fmt::{strtime::Strtime, Formatter}, PointInTime};

let pt: PointInTime = "2000-02-29T12:09:14Z".parse()?;
assert_eq!(pt.to_string(), "2000-02-29T12:09:14.000+00:00[UTC]");

let fmt = Strtime::new();
assert_eq!(fmt.format(&pt, "%Y/%m/%d")?, "2000/02/29");
assert_eq!(fmt.parse("2000/02/29 12:09:14", "%Y/%m/%d %T")?, pt);

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use alloc::string::String;

use crate::{error::Error, PointInTime};

pub mod iso8601;
#[cfg(feature = "serde")]
pub mod serde;
pub mod strtime;
mod util;

const _: &'static dyn Formatter = &self::strtime::Strtime::new();

/// Formats and parses points in time according to a pattern.
///
/// The meaning of a pattern is up to the implementation. Implementations
/// should make `parse` accept what `format` produces for the same pattern,
/// as long as the pattern carries enough fields to identify an instant.
pub trait Formatter {
    /// Formats the point in time given according to `pattern`.
    fn format(&self, pt: &PointInTime, pattern: &str) -> Result<String, Error>;

    /// Parses `text` into a point in time according to `pattern`.
    fn parse(&self, text: &str, pattern: &str) -> Result<PointInTime, Error>;
}

impl<'a, F: Formatter + ?Sized> Formatter for &'a F {
    fn format(
        &self,
        pt: &PointInTime,
        pattern: &str,
    ) -> Result<String, Error> {
        (**self).format(pt, pattern)
    }

    fn parse(&self, text: &str, pattern: &str) -> Result<PointInTime, Error> {
        (**self).parse(text, pattern)
    }
}
