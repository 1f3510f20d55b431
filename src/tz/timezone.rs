use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    error::{Error, ErrorContext},
    tz::{TransitionRule, UtcOffset},
    util::itime::IDateTime,
    PointInTime,
};

/// A named time zone with a standard offset and an ordered set of daylight
/// saving time transition rules.
///
/// A time zone without any rules behaves as a fixed offset from UTC. When a
/// zone has rules, its offset at any instant is its standard offset plus the
/// saving of the rule that most recently took effect.
///
/// # Selecting the active rule
///
/// Rule transitions are expressed in the zone's standard local time. For an
/// instant, the active rule is found by converting the instant to standard
/// local time and then:
///
/// 1. Among the rules covering that year, picking the one whose transition
///    is the latest one not after the instant.
/// 2. When no transition has happened yet that year, picking the rule with
///    the latest transition in the previous year.
/// 3. When there is still no candidate, no rule is active and the standard
///    offset is used.
///
/// When two rules transition at the same moment, the one listed later wins.
///
/// # Ownership
///
/// A time zone is a plain value. Cloning one copies its name and all of its
/// rules, and no state is shared between clones.
///
/// # Example
///
/// ```
/// use tempora::{
///     civil::{Month, Weekday},
///     tz::{DaySelector, TimeZone, TransitionRule, UtcOffset},
///     PointInTime,
/// };
///
/// let berlin = TimeZone::new(
///     "Europe/Berlin",
///     UtcOffset::new(1, 0)?,
///     [
///         TransitionRule::new(1996, None, Month::March, DaySelector::Last(Weekday::Sunday), 2, 60)?,
///         TransitionRule::new(1996, None, Month::October, DaySelector::Last(Weekday::Sunday), 2, 0)?,
///     ],
/// )?;
/// let winter = PointInTime::new(2024, Month::January, 15, 12, 0, 0, 0)?;
/// let summer = PointInTime::new(2024, Month::July, 15, 12, 0, 0, 0)?;
/// assert_eq!(berlin.offset(&winter).to_string(), "+01:00");
/// assert_eq!(berlin.offset(&summer).to_string(), "+02:00");
/// assert!(berlin.is_dst(&summer));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TimeZone {
    name: String,
    standard: UtcOffset,
    rules: Vec<ZoneRule>,
}

/// A transition rule along with the offset it produces in its zone.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ZoneRule {
    rule: TransitionRule,
    offset: UtcOffset,
}

impl TimeZone {
    /// Returns the UTC time zone.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{TimeZone, UtcOffset};
    ///
    /// let tz = TimeZone::utc();
    /// assert_eq!(tz.name(), "UTC");
    /// assert_eq!(tz.standard_offset(), UtcOffset::UTC);
    /// assert!(!tz.has_transitions());
    /// ```
    pub fn utc() -> TimeZone {
        TimeZone::fixed(UtcOffset::UTC)
    }

    /// Returns a time zone that always uses the given offset.
    ///
    /// The zone is named after the offset, e.g., `+05:30`, except for a zero
    /// offset which is named `UTC`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{TimeZone, UtcOffset};
    ///
    /// let tz = TimeZone::fixed(UtcOffset::new(5, 30)?);
    /// assert_eq!(tz.name(), "+05:30");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fixed(offset: UtcOffset) -> TimeZone {
        let name = if offset == UtcOffset::UTC {
            "UTC".to_string()
        } else {
            offset.to_string()
        };
        TimeZone { name, standard: offset, rules: Vec::new() }
    }

    /// Creates a new time zone from a name, a standard offset and a list of
    /// transition rules.
    ///
    /// The order of the rules matters only when two of them transition at
    /// the same moment, in which case the later one wins.
    ///
    /// # Errors
    ///
    /// This returns an error when the name is empty or when applying one of
    /// the rules to the standard offset produces an offset outside of
    /// `-25:59..=+25:59`.
    pub fn new(
        name: &str,
        standard: UtcOffset,
        rules: impl IntoIterator<Item = TransitionRule>,
    ) -> Result<TimeZone, Error> {
        if name.is_empty() {
            return Err(Error::from_args(format_args!(
                "time zone name must not be empty"
            )));
        }
        let rules = rules
            .into_iter()
            .map(|rule| {
                let offset =
                    rule.apply_to_offset(standard).with_context(|| {
                        Error::from_args(format_args!(
                            "rule `{rule}` cannot be applied to standard \
                             offset {standard} of time zone `{name}`",
                        ))
                    })?;
                Ok(ZoneRule { rule, offset })
            })
            .collect::<Result<Vec<ZoneRule>, Error>>()?;
        debug!(
            "created time zone `{name}` with standard offset {standard} \
             and {} transition rules",
            rules.len(),
        );
        Ok(TimeZone { name: name.to_string(), standard, rules })
    }

    /// Parses a fixed offset time zone.
    ///
    /// This accepts `UTC` or `Z` (in any case) for UTC, or a UTC offset in
    /// the form accepted by [`UtcOffset::parse`]. Named zones with rules are
    /// the business of a [`ZoneProvider`](crate::tz::ZoneProvider).
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{TimeZone, UtcOffset};
    ///
    /// assert_eq!(TimeZone::parse("utc")?, TimeZone::utc());
    /// assert_eq!(TimeZone::parse("Z")?, TimeZone::utc());
    /// let tz = TimeZone::parse("-0800")?;
    /// assert_eq!(tz.standard_offset(), UtcOffset::new(-8, 0)?);
    /// assert_eq!(tz.name(), "-08:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(text: &str) -> Result<TimeZone, Error> {
        if text.eq_ignore_ascii_case("UTC") || text.eq_ignore_ascii_case("Z")
        {
            return Ok(TimeZone::utc());
        }
        let offset = UtcOffset::parse(text).with_context(|| {
            Error::from_args(format_args!(
                "failed to parse {text:?} as a fixed offset time zone",
            ))
        })?;
        Ok(TimeZone::fixed(offset))
    }

    /// Returns the name of this time zone.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the offset in effect when no transition rule is active.
    #[inline]
    pub fn standard_offset(&self) -> UtcOffset {
        self.standard
    }

    /// Returns true when this zone has at least one transition rule.
    #[inline]
    pub fn has_transitions(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Returns the transition rules of this zone in the order given at
    /// construction.
    pub fn transitions(
        &self,
    ) -> impl ExactSizeIterator<Item = &TransitionRule> + '_ {
        self.rules.iter().map(|zr| &zr.rule)
    }

    /// Returns the offset from UTC in this zone at the instant given.
    #[inline]
    pub fn offset(&self, at: &PointInTime) -> UtcOffset {
        self.offset_at_epoch_millis(at.epoch_millis())
    }

    /// Returns the offset from UTC in this zone at the given number of
    /// milliseconds since the Unix epoch.
    pub fn offset_at_epoch_millis(&self, epoch_millis: i64) -> UtcOffset {
        self.rule_at_epoch_millis(epoch_millis)
            .map_or(self.standard, |zr| zr.offset)
    }

    /// Returns the offset from UTC in this zone right now.
    ///
    /// This is only available when the `std` feature is enabled.
    #[cfg(feature = "std")]
    pub fn current_offset(&self) -> UtcOffset {
        self.offset_at_epoch_millis(crate::point::now_epoch_millis())
    }

    /// Returns the transition rule in effect at the instant given, if any.
    ///
    /// A rule with a saving of zero may be returned. It means the zone has
    /// returned to standard time.
    pub fn transition_at(&self, at: &PointInTime) -> Option<&TransitionRule> {
        self.rule_at_epoch_millis(at.epoch_millis()).map(|zr| &zr.rule)
    }

    /// Returns true when a rule with a non-zero saving is in effect at the
    /// instant given.
    pub fn is_dst(&self, at: &PointInTime) -> bool {
        self.transition_at(at).map_or(false, |rule| rule.saving_minutes() != 0)
    }

    /// Converts an instant to the wall clock fields of this zone.
    ///
    /// The instant is first shifted by the standard offset. When a rule
    /// is active, its saving is then added to the minute field.
    pub(crate) fn to_local(&self, epoch_millis: i64) -> IDateTime {
        let standard = self.to_standard_local(epoch_millis);
        match self.active_rule(standard) {
            Some(zr) if zr.rule.saving_minutes() != 0 => {
                standard.shift_minutes(zr.rule.saving_minutes())
            }
            _ => standard,
        }
    }

    /// Converts wall clock fields of this zone to an instant.
    ///
    /// The offset is chosen by treating the wall clock fields as standard
    /// local time. Wall clock times skipped by a transition therefore don't
    /// round trip, and repeated ones resolve to the instant observing the
    /// standard offset.
    pub(crate) fn to_epoch_millis(&self, local: IDateTime) -> i64 {
        let offset =
            self.active_rule(local).map_or(self.standard, |zr| zr.offset);
        local.to_epoch_millis() - offset.milliseconds()
    }

    fn to_standard_local(&self, epoch_millis: i64) -> IDateTime {
        let standard = self.standard.milliseconds();
        IDateTime::from_epoch_millis(epoch_millis + standard)
    }

    fn rule_at_epoch_millis(&self, epoch_millis: i64) -> Option<&ZoneRule> {
        if self.rules.is_empty() {
            return None;
        }
        self.active_rule(self.to_standard_local(epoch_millis))
    }

    /// Returns the rule in effect at the given standard local time.
    fn active_rule(&self, local: IDateTime) -> Option<&ZoneRule> {
        if self.rules.is_empty() {
            return None;
        }
        let found = self
            .latest_transition(local.year, Some(local))
            .or_else(|| self.latest_transition(local.year - 1, None));
        if let Some(_zr) = found {
            trace!(
                "time zone `{}`: rule `{}` is active at {local:?}",
                self.name,
                _zr.rule,
            );
        } else {
            trace!(
                "time zone `{}`: no rule is active at {local:?}",
                self.name,
            );
        }
        found
    }

    /// Returns the rule with the latest transition in `year`, optionally
    /// ignoring transitions after `upto`.
    fn latest_transition(
        &self,
        year: i16,
        upto: Option<IDateTime>,
    ) -> Option<&ZoneRule> {
        let mut best: Option<(IDateTime, &ZoneRule)> = None;
        for zr in self.rules.iter() {
            let Some(at) = zr.rule.transition_in(year) else { continue };
            if upto.map_or(false, |upto| at > upto) {
                continue;
            }
            if best.map_or(true, |(best_at, _)| at >= best_at) {
                best = Some((at, zr));
            }
        }
        best.map(|(_, zr)| zr)
    }
}

impl Default for TimeZone {
    fn default() -> TimeZone {
        TimeZone::utc()
    }
}

impl core::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

impl core::str::FromStr for TimeZone {
    type Err = Error;

    fn from_str(text: &str) -> Result<TimeZone, Error> {
        TimeZone::parse(text)
    }
}


#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{
        civil::{Month, Weekday},
        tz::DaySelector,
        util::itime::MS_PER_MINUTE,
    };

    use super::{testdata::*, *};

    fn utc(year: i16, month: i8, day: i8, hour: i8, minute: i8) -> i64 {
        IDateTime { year, month, day, hour, minute, second: 0, millisecond: 0 }
            .to_epoch_millis()
    }

    fn offset(hours: i8, minutes: i8) -> UtcOffset {
        UtcOffset::new(hours, minutes).unwrap()
    }

    #[test]
    fn fixed() {
        let tz = TimeZone::fixed(offset(5, 30));
        assert_eq!(tz.name(), "+05:30");
        assert!(!tz.has_transitions());
        assert_eq!(tz.transitions().len(), 0);
        assert_eq!(tz.offset_at_epoch_millis(0), offset(5, 30));
        assert_eq!(tz.offset_at_epoch_millis(i64::from(i32::MAX)), offset(5, 30));
        assert_eq!(TimeZone::utc().to_string(), "UTC");
        assert_eq!(TimeZone::default(), TimeZone::utc());
    }

    #[test]
    fn parse() {
        assert_eq!(TimeZone::parse("UTC").unwrap(), TimeZone::utc());
        assert_eq!(TimeZone::parse("z").unwrap(), TimeZone::utc());
        assert_eq!(TimeZone::parse("+00:00").unwrap(), TimeZone::utc());
        assert_eq!(
            "-03:30".parse::<TimeZone>().unwrap(),
            TimeZone::fixed(offset(-3, -30)),
        );
        let err = TimeZone::parse("Europe/Berlin").unwrap_err();
        assert!(err.is_invalid_format());
        insta::assert_snapshot!(
            err,
            @r###"failed to parse "Europe/Berlin" as a fixed offset time zone: invalid UTC offset "Europe/Berlin", expected a sign followed by two hour digits, an optional colon and two minute digits (e.g., `+05:30` or `-0800`)"###,
        );
    }

    #[test]
    fn new_rejects_bad_zones() {
        let rule = TransitionRule::new(
            2000,
            None,
            Month::March,
            DaySelector::Fixed(1),
            2,
            60,
        )
        .unwrap();
        insta::assert_snapshot!(
            TimeZone::new("Far/East", UtcOffset::MAX, [rule.clone()]).unwrap_err(),
            @"rule `2000 max Mar 1 2:00 1:00` cannot be applied to standard offset +25:59 of time zone `Far/East`: Expected offset minutes between -1559 and 1559 inclusive, found 1619",
        );
        assert!(TimeZone::new("", UtcOffset::UTC, [rule]).is_err());
    }

    #[test]
    fn berlin_offsets() {
        let tz = berlin();
        assert!(tz.has_transitions());
        assert_eq!(tz.transitions().len(), 2);

        // Before the rules existed.
        assert_eq!(tz.offset_at_epoch_millis(utc(1990, 7, 1, 12, 0)), offset(1, 0));
        // Winter falls back to the previous year's October rule.
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 1, 15, 12, 0)), offset(1, 0));
        // Spring forward happens at 01:00 UTC.
        let spring = utc(2024, 3, 31, 1, 0);
        assert_eq!(tz.offset_at_epoch_millis(spring - 1), offset(1, 0));
        assert_eq!(tz.offset_at_epoch_millis(spring), offset(2, 0));
        // Fall back also happens at 01:00 UTC.
        let fall = utc(2024, 10, 27, 1, 0);
        assert_eq!(tz.offset_at_epoch_millis(fall - 1), offset(2, 0));
        assert_eq!(tz.offset_at_epoch_millis(fall), offset(1, 0));
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 12, 31, 23, 0)), offset(1, 0));
    }

    #[test]
    fn new_york_offsets() {
        let tz = new_york();
        // 2024-03-10 02:00 EST is 07:00 UTC.
        let spring = utc(2024, 3, 10, 7, 0);
        assert_eq!(tz.offset_at_epoch_millis(spring - 1), offset(-5, 0));
        assert_eq!(tz.offset_at_epoch_millis(spring), offset(-4, 0));
        // 2024-11-03 02:00 EDT is 01:00 EST, which is 06:00 UTC.
        let fall = utc(2024, 11, 3, 6, 0);
        assert_eq!(tz.offset_at_epoch_millis(fall - 1), offset(-4, 0));
        assert_eq!(tz.offset_at_epoch_millis(fall), offset(-5, 0));
    }

    #[test]
    fn local_conversion() {
        let tz = berlin();
        let local = |ms| {
            let dt = tz.to_local(ms);
            (dt.year, dt.month, dt.day, dt.hour, dt.minute)
        };
        let spring = utc(2024, 3, 31, 1, 0);
        assert_eq!(local(spring - MS_PER_MINUTE), (2024, 3, 31, 1, 59));
        assert_eq!(local(spring), (2024, 3, 31, 3, 0));
        let fall = utc(2024, 10, 27, 1, 0);
        assert_eq!(local(fall - MS_PER_MINUTE), (2024, 10, 27, 2, 59));
        assert_eq!(local(fall), (2024, 10, 27, 2, 0));
        // New year's eve carries through the year in DST free winter.
        assert_eq!(local(utc(2024, 12, 31, 23, 30)), (2025, 1, 1, 0, 30));

        for ms in [spring - 1, spring, fall, utc(2024, 7, 4, 12, 0)] {
            assert_eq!(tz.to_epoch_millis(tz.to_local(ms)), ms);
        }
    }

    #[test]
    fn negative_saving() {
        let tz = dublin();
        // Winter time is GMT, one hour behind standard time.
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 1, 15, 12, 0)), offset(0, 0));
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 7, 15, 12, 0)), offset(1, 0));
        // Both transitions happen at 01:00 UTC.
        let spring = utc(2024, 3, 31, 1, 0);
        assert_eq!(tz.offset_at_epoch_millis(spring - 1), offset(0, 0));
        assert_eq!(tz.offset_at_epoch_millis(spring), offset(1, 0));
        let fall = utc(2024, 10, 27, 1, 0);
        assert_eq!(tz.offset_at_epoch_millis(fall - 1), offset(1, 0));
        assert_eq!(tz.offset_at_epoch_millis(fall), offset(0, 0));
        let local = tz.to_local(fall);
        assert_eq!((local.hour, local.minute), (1, 0));
    }

    /// Checks that converting an instant to wall clock fields and back agrees
    /// with the zone's offset, and that the only instants which don't round
    /// trip share their wall clock time with another instant.
    fn check_round_trip(tz: &TimeZone, ms: i64) -> bool {
        let local = tz.to_local(ms);
        let offset = tz.offset_at_epoch_millis(ms).milliseconds();
        if local.to_epoch_millis() - ms != offset {
            return false;
        }
        let back = tz.to_epoch_millis(local);
        back == ms || tz.to_local(back) == local
    }

    #[test]
    fn round_trip_sweep() {
        let start = utc(2024, 1, 1, 0, 0);
        let end = utc(2026, 1, 1, 0, 0);
        for tz in [berlin(), new_york(), dublin()] {
            let mut ms = start;
            while ms < end {
                assert!(check_round_trip(&tz, ms), "{}: {ms}", tz.name());
                ms += 13 * MS_PER_MINUTE + 1;
            }
        }
    }

    quickcheck::quickcheck! {
        fn prop_round_trip(ms: i64) -> bool {
            let start = utc(1900, 1, 1, 0, 0);
            let end = utc(2100, 1, 1, 0, 0);
            let ms = ms.rem_euclid(end - start) + start;
            [berlin(), new_york(), dublin()]
                .iter()
                .all(|tz| check_round_trip(tz, ms))
        }
    }

    #[test]
    fn later_rule_wins_ties() {
        let day = DaySelector::Last(Weekday::Sunday);
        let rules = [
            TransitionRule::new(2000, None, Month::March, day, 2, 60).unwrap(),
            TransitionRule::new(2000, None, Month::March, day, 2, 30).unwrap(),
        ];
        let tz = TimeZone::new("Tie/Break", UtcOffset::UTC, rules).unwrap();
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 6, 1, 0, 0)), offset(0, 30));
        // With no rule transitioning back, the previous year's rule carries
        // over into January.
        assert_eq!(tz.offset_at_epoch_millis(utc(2024, 1, 1, 0, 0)), offset(0, 30));
        // But not before the first year the rules apply.
        assert_eq!(tz.offset_at_epoch_millis(utc(2000, 1, 1, 0, 0)), UtcOffset::UTC);
    }

    #[test]
    fn clone_is_independent() {
        let tz = berlin();
        let copy = tz.clone();
        assert_eq!(tz, copy);
        drop(tz);
        assert_eq!(copy.name(), "Europe/Berlin");
    }
}
