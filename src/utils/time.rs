use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Timelike, Utc};

pub const MS_PER_MINUTE: i64 = 60 * 1000;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Wall-clock zone used for every calendar computation (dates, hours, weekdays).
///
/// `LocalZone::system()` follows the host's local time like a browser would;
/// a fixed offset makes results reproducible regardless of where the code runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalZone {
    fixed: Option<FixedOffset>,
}

impl LocalZone {
    pub fn system() -> Self {
        Self { fixed: None }
    }

    /// Fixed offset east of UTC. Out-of-range offsets fall back to UTC.
    pub fn fixed_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            fixed: Some(offset),
        }
    }

    pub fn utc() -> Self {
        Self::fixed_minutes(0)
    }

    /// Wall-clock time of an epoch-millisecond instant.
    pub fn at(&self, epoch_ms: i64) -> DateTime<FixedOffset> {
        let instant = DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default();
        match self.fixed {
            Some(offset) => instant.with_timezone(&offset),
            None => instant.with_timezone(&Local).fixed_offset(),
        }
    }

    pub fn date_of(&self, epoch_ms: i64) -> NaiveDate {
        self.at(epoch_ms).date_naive()
    }

    /// Same local wall-clock time `days` calendar days later. Falls back to
    /// whole 24-hour steps when that local time doesn't exist.
    pub fn add_days(&self, epoch_ms: i64, days: u32) -> i64 {
        let fallback = epoch_ms.saturating_add(i64::from(days) * MS_PER_DAY);
        let Some(later) = self
            .at(epoch_ms)
            .naive_local()
            .checked_add_days(chrono::Days::new(u64::from(days)))
        else {
            return fallback;
        };
        let resolved = match self.fixed {
            Some(offset) => later.and_local_timezone(offset).earliest().map(|dt| dt.timestamp_millis()),
            None => later.and_local_timezone(Local).earliest().map(|dt| dt.timestamp_millis()),
        };
        resolved.unwrap_or(fallback)
    }

    /// Epoch ms of local midnight `days_back` calendar days before the day containing `now_ms`.
    ///
    /// The offset in force at `now_ms` is used for the whole computation.
    pub fn midnight_days_before(&self, now_ms: i64, days_back: u32) -> i64 {
        let now = self.at(now_ms);
        let day = now.date_naive() - chrono::Days::new(u64::from(days_back));
        let local_midnight = day.and_time(NaiveTime::MIN);
        local_midnight
            .and_local_timezone(*now.offset())
            .single()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(now_ms)
    }
}

/// `MM/DD/YY`, the short date used to key daily series.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%m/%d/%y").to_string()
}

/// Zero-padded `HH:MM`.
pub fn time_of_day(time: &DateTime<FixedOffset>) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// `M/D/YYYY h:MM:SS AM`, the long form shown on timeline tooltips.
pub fn time_stamp(time: &DateTime<FixedOffset>) -> String {
    let (is_pm, hour12) = time.hour12();
    format!(
        "{}/{}/{} {}:{:02}:{:02} {}",
        time.month(),
        time.day(),
        time.year(),
        hour12,
        time.minute(),
        time.second(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Serde adapter writing a [`NaiveDate`] as its [`date_stamp`] form.
pub mod date_stamp_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::date_stamp(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, "%m/%d/%y").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn formats_follow_display_conventions() {
        let zone = LocalZone::utc();
        let t = zone.at(ms(2024, 3, 4, 14, 5, 9));

        assert_eq!(date_stamp(t.date_naive()), "03/04/24");
        assert_eq!(time_of_day(&t), "14:05");
        assert_eq!(time_stamp(&t), "3/4/2024 2:05:09 PM");

        let midnight = zone.at(ms(2024, 3, 4, 0, 0, 0));
        assert_eq!(time_stamp(&midnight), "3/4/2024 12:00:00 AM");
        assert_eq!(time_of_day(&midnight), "00:00");
    }

    #[test]
    fn fixed_offset_shifts_calendar_date() {
        let instant = ms(2024, 3, 4, 23, 30, 0);
        assert_eq!(
            LocalZone::utc().date_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(
            LocalZone::fixed_minutes(60).date_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn oversized_offset_falls_back_to_utc() {
        assert_eq!(LocalZone::fixed_minutes(40_000_000), LocalZone::utc());
        assert_eq!(LocalZone::fixed_minutes(i32::MIN), LocalZone::utc());
        assert_eq!(LocalZone::fixed_minutes(24 * 60), LocalZone::utc());
        assert_ne!(LocalZone::fixed_minutes(-1439), LocalZone::utc());
    }

    #[test]
    fn add_days_keeps_wall_clock_time() {
        let zone = LocalZone::fixed_minutes(-300);
        let start = ms(2024, 2, 28, 23, 15, 0);
        assert_eq!(zone.add_days(start, 1), ms(2024, 2, 29, 23, 15, 0));
        assert_eq!(zone.add_days(start, 2), ms(2024, 3, 1, 23, 15, 0));
        assert_eq!(zone.add_days(start, 0), start);
    }

    #[test]
    fn midnight_lookback_counts_whole_days() {
        let zone = LocalZone::utc();
        let now = ms(2024, 3, 4, 15, 42, 10);

        assert_eq!(zone.midnight_days_before(now, 0), ms(2024, 3, 4, 0, 0, 0));
        assert_eq!(zone.midnight_days_before(now, 2), ms(2024, 3, 2, 0, 0, 0));
    }

    #[test]
    fn date_stamp_serde_round_trips() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "date_stamp_format")]
            date: NaiveDate,
        }

        let json = serde_json::to_string(&Wrapper {
            date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        })
        .unwrap();
        assert_eq!(json, r#"{"date":"12/31/23"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
