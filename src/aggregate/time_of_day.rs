use chrono::{Datelike, Timelike};

use crate::{config::AnalyticsConfig, dataset::Dataset};

use super::types::{HeatmapCell, TimeOfDayResult, TimeSlot};

const DAYS_PER_WEEK: u32 = 7;
const HOURS_PER_DAY: u32 = 24;

/// Visit counts by local time-of-day bucket and by weekday/hour cell.
///
/// Both grids are fixed size and always present; an empty dataset leaves every
/// count at zero.
pub fn time_of_day(dataset: &Dataset, config: &AnalyticsConfig) -> TimeOfDayResult {
    let interval = config.time_of_day_interval_minutes.max(1);
    let zone = config.zone();

    let mut time_slot: Vec<TimeSlot> = (0..config.time_slots())
        .map(|i| {
            let minutes = i * interval as usize;
            TimeSlot {
                timeindex: minutes,
                rate: 0,
                time: format!("{:02}:{:02}", minutes / 60, minutes % 60),
            }
        })
        .collect();

    let mut heatmap: Vec<HeatmapCell> = (1..=DAYS_PER_WEEK)
        .flat_map(|day| (1..=HOURS_PER_DAY).map(move |hour| HeatmapCell { day, hour, rate: 0 }))
        .collect();

    for record in dataset.records() {
        let local = zone.at(record.visit_time);
        let minutes = local.hour() * 60 + local.minute();

        if let Some(slot) = time_slot.get_mut((minutes / interval) as usize) {
            slot.rate += 1;
        }

        let weekday = local.weekday().number_from_monday() - 1;
        let cell = (weekday * HOURS_PER_DAY + local.hour()) as usize;
        if let Some(cell) = heatmap.get_mut(cell) {
            cell.rate += 1;
        }
    }

    TimeOfDayResult { time_slot, heatmap }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::dataset::test_support::record;
    use crate::utils::time::LocalZone;

    fn config() -> AnalyticsConfig {
        AnalyticsConfig {
            utc_offset_minutes: Some(0),
            ..AnalyticsConfig::default()
        }
    }

    // 2024-03-04 is a Monday.
    fn ms(d: u32, h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn rate(result: &TimeOfDayResult, day: u32, hour: u32) -> u64 {
        result
            .heatmap
            .iter()
            .find(|c| c.day == day && c.hour == hour)
            .map(|c| c.rate)
            .unwrap()
    }

    #[test]
    fn empty_dataset_gives_zeroed_grids() {
        let result = time_of_day(&Dataset::new(), &config());
        assert_eq!(result.time_slot.len(), 96);
        assert_eq!(result.heatmap.len(), 168);
        assert!(result.time_slot.iter().all(|s| s.rate == 0));
        assert!(result.heatmap.iter().all(|c| c.rate == 0));
        assert_eq!(result.time_slot[1].time, "00:15");
        assert_eq!(result.time_slot[95].timeindex, 1425);
    }

    #[test]
    fn counts_land_in_slot_and_weekday_hour_cell() {
        let dataset = Dataset::from_records(
            vec![
                record("https://a.com/", ms(4, 0, 5)),
                record("https://b.com/", ms(4, 0, 14)),
                record("https://a.com/", ms(4, 13, 31)),
                record("https://a.com/", ms(10, 23, 59)),
            ],
            4.0,
            LocalZone::utc(),
        );

        let result = time_of_day(&dataset, &config());

        assert_eq!(result.time_slot[0].rate, 2);
        assert_eq!(result.time_slot[54].rate, 1);
        assert_eq!(result.time_slot[54].time, "13:30");
        assert_eq!(result.time_slot[95].rate, 1);

        assert_eq!(rate(&result, 1, 1), 2);
        assert_eq!(rate(&result, 1, 14), 1);
        assert_eq!(rate(&result, 7, 24), 1);
        assert_eq!(rate(&result, 2, 1), 0);
    }

    #[test]
    fn buckets_follow_configured_zone() {
        let dataset = Dataset::from_records(
            vec![record("https://a.com/", ms(4, 23, 0))],
            4.0,
            LocalZone::utc(),
        );
        let mut config = config();
        config.utc_offset_minutes = Some(120);
        config.time_of_day_interval_minutes = 60;

        let result = time_of_day(&dataset, &config);
        assert_eq!(result.time_slot.len(), 24);
        assert_eq!(result.time_slot[1].rate, 1);
        // Tuesday 01:00 local
        assert_eq!(rate(&result, 2, 2), 1);
    }
}
