use alloc::{collections::BTreeMap, string::String};

use crate::{
    error::{tz::db::Error as E, Error},
    tz::TimeZone,
};

/// A source of time zones looked up by name.
///
/// This crate never consults a process wide default. Callers that need named
/// zones pass a provider explicitly, for example to
/// [`fmt::iso8601::parse_with`](crate::fmt::iso8601::parse_with).
///
/// Loading real world rules (for example, from the IANA Time Zone Database)
/// is left to implementations of this trait. [`ZoneRegistry`] is a simple
/// in-memory implementation.
pub trait ZoneProvider {
    /// Returns the time zone with the given name.
    ///
    /// # Errors
    ///
    /// Implementations should return an error for which
    /// [`Error::is_not_found`] is true when no zone has the name given.
    fn get(&self, name: &str) -> Result<TimeZone, Error>;
}

impl<'a, P: ZoneProvider + ?Sized> ZoneProvider for &'a P {
    fn get(&self, name: &str) -> Result<TimeZone, Error> {
        (**self).get(name)
    }
}

/// An in-memory collection of time zones keyed by name.
///
/// Names are compared case insensitively (ASCII only). A registry always
/// contains the `UTC` zone.
///
/// # Example
///
/// ```
/// use tempora::tz::{TimeZone, UtcOffset, ZoneProvider, ZoneRegistry};
///
/// let mut registry = ZoneRegistry::new();
/// let kolkata = TimeZone::new("Asia/Kolkata", UtcOffset::new(5, 30)?, [])?;
/// registry.insert(kolkata.clone());
///
/// assert_eq!(registry.get("asia/kolkata")?, kolkata);
/// assert_eq!(registry.get("UTC")?, TimeZone::utc());
/// assert!(registry.get("Asia/Calcutta").unwrap_err().is_not_found());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, TimeZone>,
}

impl ZoneRegistry {
    /// Creates a registry containing only the `UTC` zone.
    pub fn new() -> ZoneRegistry {
        let mut registry = ZoneRegistry { zones: BTreeMap::new() };
        registry.insert(TimeZone::utc());
        registry
    }

    /// Adds a zone to this registry under its name.
    ///
    /// When a zone with the same name (ignoring ASCII case) already exists,
    /// it is replaced and returned.
    pub fn insert(&mut self, tz: TimeZone) -> Option<TimeZone> {
        debug!("inserting time zone `{}` into zone registry", tz.name());
        self.zones.insert(tz.name().to_ascii_lowercase(), tz)
    }

    /// Returns the names of the zones in this registry, in the order of
    /// their lowercase forms.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.zones.values().map(|tz| tz.name())
    }

    /// Returns the number of zones in this registry.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true when this registry has no zones. Since `UTC` is always
    /// present, this only happens for registries emptied by
    /// [`ZoneRegistry::remove`].
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Removes the zone with the given name and returns it.
    pub fn remove(&mut self, name: &str) -> Option<TimeZone> {
        self.zones.remove(&name.to_ascii_lowercase())
    }
}

impl Default for ZoneRegistry {
    fn default() -> ZoneRegistry {
        ZoneRegistry::new()
    }
}

impl ZoneProvider for ZoneRegistry {
    fn get(&self, name: &str) -> Result<TimeZone, Error> {
        match self.zones.get(&name.to_ascii_lowercase()) {
            Some(tz) => {
                trace!("found time zone `{name}` in zone registry");
                Ok(tz.clone())
            }
            None => {
                debug!("time zone `{name}` is not in zone registry");
                Err(E::not_found(name).into())
            }
        }
    }
}

impl Extend<TimeZone> for ZoneRegistry {
    fn extend<I: IntoIterator<Item = TimeZone>>(&mut self, zones: I) {
        for tz in zones {
            self.insert(tz);
        }
    }
}

impl FromIterator<TimeZone> for ZoneRegistry {
    fn from_iter<I: IntoIterator<Item = TimeZone>>(zones: I) -> ZoneRegistry {
        let mut registry = ZoneRegistry::new();
        registry.extend(zones);
        registry
    }
}
