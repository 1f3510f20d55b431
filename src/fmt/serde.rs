/*!
This module provides helpers to use with [Serde].

The helpers are exposed as modules meant to be used with
Serde's [`with` attribute].

By default, [`PointInTime`](crate::PointInTime) serializes to its ISO 8601
string, which keeps its time zone. The helpers here instead serialize a
point in time as an integer number of milliseconds from the Unix epoch.
Only the instant survives this: deserialized values are always in UTC.

# Module hierarchy

Only the leaves of the tree are usable with Serde's `with` attribute. For
each leaf, the full path is spelled out for easy copy & paste.

* [`epoch_millis`]
    * [`tempora::fmt::serde::epoch_millis::required`](self::epoch_millis::required)
    * [`tempora::fmt::serde::epoch_millis::optional`](self::epoch_millis::optional)

# Example

```
use tempora::PointInTime;

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct Record {
    #[serde(with = "tempora::fmt::serde::epoch_millis::required")]
    created: PointInTime,
    #[serde(with = "tempora::fmt::serde::epoch_millis::optional")]
    deleted: Option<PointInTime>,
}

let json = r#"{"created":951826154250,"deleted":null}"#;
let got: Record = serde_json::from_str(&json)?;
assert_eq!(got.created, PointInTime::from_epoch_millis(951_826_154_250)?);
assert_eq!(got.deleted, None);
assert_eq!(serde_json::to_string(&got)?, json);

# Ok::<(), Box<dyn std::error::Error>>(())
```

[Serde]: https://serde.rs/
[`with` attribute]: https://serde.rs/field-attrs.html#with
*/

/// (De)serialize an integer number of milliseconds from the Unix epoch.
pub mod epoch_millis {
    use serde::de;

    use crate::PointInTime;

    struct Visitor;

    impl<'de> de::Visitor<'de> for Visitor {
        type Value = PointInTime;

        fn expecting(
            &self,
            f: &mut core::fmt::Formatter,
        ) -> core::fmt::Result {
            f.write_str("an integer number of milliseconds from the Unix epoch")
        }

        #[inline]
        fn visit_i8<E: de::Error>(self, v: i8) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_u8<E: de::Error>(self, v: u8) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_i16<E: de::Error>(self, v: i16) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_u16<E: de::Error>(self, v: u16) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_i32<E: de::Error>(self, v: i32) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_u32<E: de::Error>(self, v: u32) -> Result<PointInTime, E> {
            self.visit_i64(i64::from(v))
        }

        #[inline]
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<PointInTime, E> {
            PointInTime::from_epoch_millis(v).map_err(de::Error::custom)
        }

        #[inline]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<PointInTime, E> {
            let v = i64::try_from(v).map_err(|_| {
                de::Error::custom(alloc::format!(
                    "got unsigned integer {v} milliseconds, \
                     which is too big to fit in a `PointInTime`",
                ))
            })?;
            self.visit_i64(v)
        }

        #[inline]
        fn visit_i128<E: de::Error>(
            self,
            v: i128,
        ) -> Result<PointInTime, E> {
            let v = i64::try_from(v).map_err(|_| {
                de::Error::custom(alloc::format!(
                    "got signed integer {v} milliseconds, \
                     which is too big to fit in a `PointInTime`",
                ))
            })?;
            self.visit_i64(v)
        }

        #[inline]
        fn visit_u128<E: de::Error>(
            self,
            v: u128,
        ) -> Result<PointInTime, E> {
            let v = i64::try_from(v).map_err(|_| {
                de::Error::custom(alloc::format!(
                    "got unsigned integer {v} milliseconds, \
                     which is too big to fit in a `PointInTime`",
                ))
            })?;
            self.visit_i64(v)
        }
    }

    /// A visitor for `Option<PointInTime>`.
    struct OptionalVisitor;

    impl<'de> de::Visitor<'de> for OptionalVisitor {
        type Value = Option<PointInTime>;

        fn expecting(
            &self,
            f: &mut core::fmt::Formatter,
        ) -> core::fmt::Result {
            f.write_str(
                "an integer number of milliseconds from the Unix epoch \
                 or `None`",
            )
        }

        #[inline]
        fn visit_some<D: de::Deserializer<'de>>(
            self,
            de: D,
        ) -> Result<Option<PointInTime>, D::Error> {
            de.deserialize_i64(Visitor).map(Some)
        }

        #[inline]
        fn visit_none<E: de::Error>(self) -> Result<Option<PointInTime>, E> {
            Ok(None)
        }

        #[inline]
        fn visit_unit<E: de::Error>(self) -> Result<Option<PointInTime>, E> {
            Ok(None)
        }
    }

    /// (De)serialize a required integer number of milliseconds from the
    /// Unix epoch.
    pub mod required {
        use crate::PointInTime;

        /// Serialize a required integer number of milliseconds since the
        /// Unix epoch.
        #[inline]
        pub fn serialize<S: serde::Serializer>(
            pt: &PointInTime,
            se: S,
        ) -> Result<S::Ok, S::Error> {
            se.serialize_i64(pt.epoch_millis())
        }

        /// Deserialize a required integer number of milliseconds since the
        /// Unix epoch.
        #[inline]
        pub fn deserialize<'de, D: serde::Deserializer<'de>>(
            de: D,
        ) -> Result<PointInTime, D::Error> {
            de.deserialize_i64(super::Visitor)
        }
    }

    /// (De)serialize an optional integer number of milliseconds from the
    /// Unix epoch.
    pub mod optional {
        use crate::PointInTime;

        /// Serialize an optional integer number of milliseconds since the
        /// Unix epoch.
        #[inline]
        pub fn serialize<S: serde::Serializer>(
            pt: &Option<PointInTime>,
            se: S,
        ) -> Result<S::Ok, S::Error> {
            match *pt {
                None => se.serialize_none(),
                Some(ref pt) => se.serialize_i64(pt.epoch_millis()),
            }
        }

        /// Deserialize an optional integer number of milliseconds since the
        /// Unix epoch.
        #[inline]
        pub fn deserialize<'de, D: serde::Deserializer<'de>>(
            de: D,
        ) -> Result<Option<PointInTime>, D::Error> {
            de.deserialize_option(super::OptionalVisitor)
        }
    }
}
