use tempora::{
    civil::{Month, Weekday},
    fmt::iso8601,
    tz::{
        DaySelector, TimeZone, TransitionRule, UtcOffset, ZoneProvider,
        ZoneRegistry,
    },
    PointInTime,
};

use crate::Result;

const HOUR: i64 = 60 * 60 * 1000;

fn berlin() -> TimeZone {
    let last_sunday = DaySelector::Last(Weekday::Sunday);
    let rules = [
        TransitionRule::new(1996, None, Month::March, last_sunday, 2, 60),
        TransitionRule::new(1996, None, Month::October, last_sunday, 2, 0),
    ];
    let rules = rules.into_iter().map(|rule| rule.unwrap());
    TimeZone::new("Europe/Berlin", UtcOffset::new(1, 0).unwrap(), rules)
        .unwrap()
}

fn new_york() -> TimeZone {
    let second_sunday =
        DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 };
    let first_sunday =
        DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 1 };
    let rules = [
        TransitionRule::new(2007, None, Month::March, second_sunday, 2, 60),
        TransitionRule::new(2007, None, Month::November, first_sunday, 1, 0),
    ];
    let rules = rules.into_iter().map(|rule| rule.unwrap());
    TimeZone::new("America/New_York", UtcOffset::new(-5, 0).unwrap(), rules)
        .unwrap()
}

/// A southern hemisphere zone, where daylight saving time spans the turn
/// of the year.
fn sydney() -> TimeZone {
    let first_sunday =
        DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 1 };
    let rules = [
        TransitionRule::new(2008, None, Month::April, first_sunday, 2, 0),
        TransitionRule::new(2008, None, Month::October, first_sunday, 2, 60),
    ];
    let rules = rules.into_iter().map(|rule| rule.unwrap());
    TimeZone::new("Australia/Sydney", UtcOffset::new(10, 0).unwrap(), rules)
        .unwrap()
}

#[test]
fn utc_offsets() -> Result {
    let offset = UtcOffset::new(-5, -30)?;
    assert_eq!(offset.format(true), "-05:30");
    assert_eq!(offset.format(false), "-0530");
    assert_eq!(offset.seconds(), -19_800);
    assert_eq!(offset.milliseconds(), -19_800_000);
    assert_eq!(UtcOffset::parse("-05:30")?, offset);
    assert_eq!(UtcOffset::parse("-0530")?, offset);
    assert_eq!(UtcOffset::new(0, -30)?.to_string(), "-00:30");

    let err = UtcOffset::new(5, -30).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(UtcOffset::new(0, 60).unwrap_err().is_invalid_argument());

    let err = UtcOffset::parse("5:30").unwrap_err();
    assert!(err.is_invalid_format());
    assert!(err.to_string().contains("5:30"), "{err}");
    assert!(UtcOffset::parse("+05:30 ").is_err());

    Ok(())
}

#[test]
fn fixed_zones() -> Result {
    let tz = TimeZone::fixed(UtcOffset::new(9, 0)?);
    assert_eq!(tz.name(), "+09:00");
    assert!(!tz.has_transitions());
    assert_eq!(tz.offset_at_epoch_millis(0), UtcOffset::new(9, 0)?);
    assert_eq!(tz.current_offset(), UtcOffset::new(9, 0)?);

    assert_eq!(TimeZone::parse("utc")?, TimeZone::utc());
    assert_eq!(TimeZone::parse("Z")?, TimeZone::utc());
    assert_eq!(TimeZone::parse("+0900")?, tz);
    assert!(TimeZone::parse("Asia/Tokyo").unwrap_err().is_invalid_format());

    let pt = PointInTime::new_in(tz.clone(), 2024, Month::March, 2, 8, 0, 0, 0)?;
    assert_eq!(pt.epoch_millis(), 1_709_334_000_000);
    assert!(!tz.is_dst(&pt));
    assert!(tz.transition_at(&pt).is_none());

    Ok(())
}

#[test]
fn transition_rules() -> Result {
    let rule = TransitionRule::new(
        2007,
        None,
        Month::March,
        DaySelector::OnOrAfter { weekday: Weekday::Sunday, day: 8 },
        2,
        60,
    )?;
    assert_eq!(rule.to_string(), "2007 max Mar Sun>=8 2:00 1:00");
    assert_eq!(rule.day_for_year(2024)?, 10);
    assert_eq!(rule.day_for_year(2025)?, 9);
    assert!(rule.day_for_year(2006).unwrap_err().is_invalid_argument());
    assert_eq!(
        rule.apply_to_offset(UtcOffset::new(-5, 0)?)?,
        UtcOffset::new(-4, 0)?,
    );
    assert_eq!(
        rule.apply_to_offset(UtcOffset::new(5, 30)?)?,
        UtcOffset::new(6, 30)?,
    );

    let half = TransitionRule::new(
        1990,
        Some(1999),
        Month::October,
        DaySelector::Fixed(31),
        2,
        30,
    )?;
    assert_eq!(half.to_string(), "1990 1999 Oct 31 2:00 0:30");
    assert_eq!(
        half.apply_to_offset(UtcOffset::new(10, 30)?)?,
        UtcOffset::new(11, 0)?,
    );
    assert!(half.day_for_year(2000).is_err());

    let last_sunday = DaySelector::Last(Weekday::Sunday);
    let bad = [
        TransitionRule::new(2000, Some(1999), Month::March, last_sunday, 2, 60),
        TransitionRule::new(2000, None, Month::March, last_sunday, 24, 60),
        TransitionRule::new(2000, None, Month::March, last_sunday, 2, 61),
        TransitionRule::new(10000, None, Month::March, last_sunday, 2, 60),
    ];
    for result in bad {
        assert!(result.unwrap_err().is_invalid_argument());
    }

    Ok(())
}

#[test]
fn zone_rule_list() {
    let tz = new_york();
    assert!(tz.has_transitions());
    assert_eq!(tz.standard_offset(), UtcOffset::constant(-5, 0));
    let rules: Vec<String> = tz.transitions().map(|r| r.to_string()).collect();
    assert_eq!(
        rules,
        vec!["2007 max Mar Sun>=8 2:00 1:00", "2007 max Nov Sun>=1 1:00 0"],
    );
}

#[test]
fn berlin_spring_forward() -> Result {
    let _ = crate::Logger::init();

    let tz = berlin();
    let before =
        PointInTime::new_in(tz.clone(), 2024, Month::March, 31, 1, 59, 59, 999)?;
    assert_eq!(before.offset(), UtcOffset::new(1, 0)?);
    assert!(!tz.is_dst(&before));

    let after = before.add_milliseconds(1)?;
    assert_eq!(after.epoch_millis(), 1_711_846_800_000);
    assert_eq!((after.hour(), after.minute()), (3, 0));
    assert_eq!(after.offset(), UtcOffset::new(2, 0)?);
    assert!(tz.is_dst(&after));
    assert_eq!(tz.transition_at(&after).map(|r| r.month()), Some(Month::March));

    // A wall clock time skipped by the transition is read as standard time.
    let skipped =
        PointInTime::new_in(tz.clone(), 2024, Month::March, 31, 2, 30, 0, 0)?;
    assert_eq!((skipped.hour(), skipped.minute()), (1, 30));
    assert_eq!(skipped.offset(), UtcOffset::new(1, 0)?);

    Ok(())
}

#[test]
fn berlin_fall_back() -> Result {
    let _ = crate::Logger::init();

    let tz = berlin();
    let last_summer =
        PointInTime::from_epoch_millis(1_729_990_800_000 - 1)?
            .with_time_zone(tz.clone());
    assert_eq!(
        last_summer.to_string(),
        "2024-10-27T02:59:59.999+02:00[Europe/Berlin]",
    );
    let first_winter = last_summer.add_milliseconds(1)?;
    assert_eq!(
        first_winter.to_string(),
        "2024-10-27T02:00:00.000+01:00[Europe/Berlin]",
    );
    assert!(!tz.is_dst(&first_winter));
    let rule = tz.transition_at(&first_winter).unwrap();
    assert_eq!((rule.month(), rule.saving_minutes()), (Month::October, 0));

    // A repeated wall clock time resolves to its later instant.
    let repeated =
        PointInTime::new_in(tz.clone(), 2024, Month::October, 27, 2, 30, 0, 0)?;
    assert_eq!(repeated.offset(), UtcOffset::new(1, 0)?);
    assert_eq!(repeated.epoch_millis(), 1_729_990_800_000 + HOUR / 2);

    Ok(())
}

#[test]
fn new_york_day_lengths() -> Result {
    let _ = crate::Logger::init();

    let tz = new_york();

    let pt = PointInTime::new_in(tz.clone(), 2024, Month::March, 9, 12, 0, 0, 0)?;
    let next = pt.add_days(1)?;
    assert_eq!(next.hour(), 12);
    assert_eq!(next.epoch_millis() - pt.epoch_millis(), 23 * HOUR);

    let pt = PointInTime::new_in(tz.clone(), 2024, Month::November, 2, 12, 0, 0, 0)?;
    let next = pt.add_days(1)?;
    assert_eq!(next.to_string(), "2024-11-03T12:00:00.000-05:00[America/New_York]");
    assert_eq!(next.epoch_millis() - pt.epoch_millis(), 25 * HOUR);

    // Hours are exact, so the wall clock repeats 01:00 on the way back.
    let start = PointInTime::new_in(tz, 2024, Month::November, 3, 0, 30, 0, 0)?;
    let hours: Vec<(i8, UtcOffset)> = (0..3)
        .map(|n| {
            let pt = start.add_hours(n).unwrap();
            (pt.hour(), pt.offset())
        })
        .collect();
    let (edt, est) = (UtcOffset::new(-4, 0)?, UtcOffset::new(-5, 0)?);
    assert_eq!(hours, vec![(0, edt), (1, edt), (1, est)]);

    Ok(())
}

#[test]
fn southern_hemisphere() -> Result {
    let _ = crate::Logger::init();

    let tz = sydney();

    let summer =
        PointInTime::new_in(tz.clone(), 2024, Month::January, 15, 12, 0, 0, 0)?;
    assert_eq!(summer.offset(), UtcOffset::new(11, 0)?);
    assert_eq!(summer.epoch_millis(), 1_705_280_400_000);
    assert!(tz.is_dst(&summer));

    let winter =
        PointInTime::new_in(tz.clone(), 2024, Month::July, 15, 12, 0, 0, 0)?;
    assert_eq!(winter.offset(), UtcOffset::new(10, 0)?);
    assert_eq!(winter.epoch_millis(), 1_721_008_800_000);
    assert!(!tz.is_dst(&winter));

    let months = summer.add_months(6)?;
    assert_eq!(months, winter);

    Ok(())
}

#[test]
fn converting_between_zones() -> Result {
    let _ = crate::Logger::init();

    let ny = PointInTime::new_in(new_york(), 2024, Month::July, 4, 9, 0, 0, 0)?;
    let de = ny.with_time_zone(berlin());
    assert_eq!(de, ny);
    assert_eq!(de.to_string(), "2024-07-04T15:00:00.000+02:00[Europe/Berlin]");
    let utc = de.with_time_zone(TimeZone::utc());
    assert_eq!(utc.hour(), 13);
    assert_eq!(utc.with_time_zone(new_york()).hour(), 9);

    Ok(())
}

#[test]
fn registry() -> Result {
    let _ = crate::Logger::init();

    let mut registry: ZoneRegistry = [berlin(), new_york()].into_iter().collect();
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.names().collect::<Vec<&str>>(),
        vec!["America/New_York", "Europe/Berlin", "UTC"],
    );
    assert_eq!(registry.get("europe/BERLIN")?, berlin());
    assert_eq!(registry.get("utc")?, TimeZone::utc());

    let err = registry.get("Mars/Olympus_Mons").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "failed to find time zone `Mars/Olympus_Mons` in zone registry",
    );

    let pt = iso8601::parse_with(
        "2024-07-04T09:00-04:00[America/New_York]",
        &registry,
    )?;
    assert_eq!(pt.time_zone(), &new_york());
    assert_eq!(pt.hour(), 9);

    assert!(registry.insert(sydney()).is_none());
    assert!(registry.insert(sydney()).is_some());
    assert_eq!(registry.remove("AUSTRALIA/SYDNEY"), Some(sydney()));
    assert_eq!(registry.len(), 3);

    Ok(())
}

#[cfg(feature = "logging")]
#[test]
fn zone_activity_is_logged() -> Result {
    let _ = crate::Logger::init();

    // Other tests log concurrently, so only growth is checked.
    let before = crate::records();
    let mut registry = ZoneRegistry::new();
    registry.insert(berlin());
    assert!(crate::records() > before);

    let before = crate::records();
    let pt = PointInTime::new_in(
        registry.get("Europe/Berlin")?,
        2024,
        Month::July,
        4,
        12,
        0,
        0,
        0,
    )?;
    assert_eq!(pt.offset(), UtcOffset::new(2, 0)?);
    assert!(crate::records() > before);

    Ok(())
}
