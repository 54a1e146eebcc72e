use crate::models::{
    Averages, AxisTick, DashboardResponse, LatestEntry, MoodEntry, MoodSummary, SleepChart,
};
use crate::mood::{Mood, SleepRange, hashtags};
use chrono::{Local, NaiveDate};

/// Check-ins needed before averages are shown.
pub const TRACKING_THRESHOLD: usize = 5;

pub fn build_dashboard(entries: &[MoodEntry]) -> DashboardResponse {
    build_dashboard_at(Local::now().date_naive(), entries)
}

pub fn build_dashboard_at(today: NaiveDate, entries: &[MoodEntry]) -> DashboardResponse {
    let sorted = chronological(entries);
    let latest = sorted.last().copied();
    let today_key = date_key(today);

    DashboardResponse {
        submitted_today: latest.is_some_and(|entry| local_date_key(entry) == today_key),
        latest: latest.map(latest_entry),
        averages: averages(&sorted),
        chart: sleep_chart(&sorted),
        entry_count: sorted.len(),
        today: today_key,
    }
}

/// Mean mood of the last five check-ins, rounded half up.
pub fn average_mood(entries: &[MoodEntry]) -> Option<Mood> {
    mean_mood(last_five(&chronological(entries)))
}

/// Mean sleep ordinal of the last five check-ins, unrounded.
pub fn average_sleep(entries: &[MoodEntry]) -> Option<f64> {
    mean_sleep(last_five(&chronological(entries)))
}

pub fn sleep_chart(entries: &[&MoodEntry]) -> SleepChart {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.date);

    SleepChart {
        categories: sorted
            .iter()
            .map(|entry| entry.date.with_timezone(&Local).format("%b %d").to_string())
            .collect(),
        values: sorted.iter().map(|entry| entry.sleep_hours.ordinal()).collect(),
        colors: sorted.iter().map(|entry| entry.sleep_hours.color()).collect(),
        y_axis: SleepRange::ALL
            .iter()
            .map(|range| AxisTick {
                value: range.ordinal(),
                label: range.as_str(),
            })
            .collect(),
    }
}

fn averages(sorted: &[&MoodEntry]) -> Averages {
    let keep_tracking = Averages::KeepTracking {
        logged: sorted.len(),
        needed: TRACKING_THRESHOLD,
    };
    if sorted.len() < TRACKING_THRESHOLD {
        return keep_tracking;
    }
    let recent = last_five(sorted);
    match (mean_mood(recent), mean_sleep(recent)) {
        (Some(mood), Some(sleep)) => Averages::Ready {
            mood,
            mood_label: mood.label(),
            mood_color: mood.color(),
            sleep,
        },
        _ => keep_tracking,
    }
}

fn mean_mood(recent: &[&MoodEntry]) -> Option<Mood> {
    if recent.is_empty() {
        return None;
    }
    let sum: u32 = recent
        .iter()
        .map(|entry| u32::from(entry.overall_mood.value()))
        .sum();
    let mean = f64::from(sum) / recent.len() as f64;
    Mood::from_value(mean.round() as i64).ok()
}

fn mean_sleep(recent: &[&MoodEntry]) -> Option<f64> {
    if recent.is_empty() {
        return None;
    }
    let sum: u32 = recent
        .iter()
        .map(|entry| u32::from(entry.sleep_hours.ordinal()))
        .sum();
    Some(f64::from(sum) / recent.len() as f64)
}

fn latest_entry(entry: &MoodEntry) -> LatestEntry {
    LatestEntry {
        date: local_date_key(entry),
        mood: MoodSummary::from(entry.overall_mood),
        sleep_hours: entry.sleep_hours,
        journal_entry: entry.journal_entry.clone(),
        hashtags: hashtags(&entry.feelings),
    }
}

fn chronological(entries: &[MoodEntry]) -> Vec<&MoodEntry> {
    let mut sorted: Vec<&MoodEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.date);
    sorted
}

fn last_five<'a, 'b>(sorted: &'a [&'b MoodEntry]) -> &'a [&'b MoodEntry] {
    &sorted[sorted.len().saturating_sub(TRACKING_THRESHOLD)..]
}

fn local_date_key(entry: &MoodEntry) -> String {
    date_key(entry.date.with_timezone(&Local).date_naive())
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
