use crate::models::{CheckIn, Mood};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Serialize;

pub const SUMMARY_PLACEHOLDER: &str = "Check-in to see your weekly summary here.";
const NO_NOTE: &str = "You checked in.";

#[derive(Debug, Serialize, PartialEq)]
pub struct DailyMood {
    pub date: String,
    pub weekday: String,
    pub mood: Option<Mood>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeeklySummary {
    Placeholder {
        message: String,
    },
    Stats {
        average_mood: f64,
        best_day: DateTime<Local>,
        best_mood: Mood,
        check_in_count: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct MoodReport {
    pub last_7_days: Vec<DailyMood>,
    pub summary: WeeklySummary,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MemoryCard {
    pub date: DateTime<Local>,
    pub mood: Mood,
    pub emoji: &'static str,
    pub note: String,
}

pub fn build_report(check_ins: &[CheckIn]) -> MoodReport {
    build_report_at(Local::now(), check_ins)
}

pub fn build_report_at(now: DateTime<Local>, check_ins: &[CheckIn]) -> MoodReport {
    let today = now.date_naive();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let mood = check_ins
            .iter()
            .find(|check_in| check_in.date.date_naive() == date)
            .map(|check_in| check_in.mood);
        last_7_days.push(DailyMood {
            date: date_key(date),
            weekday: date.format("%a").to_string(),
            mood,
        });
    }

    MoodReport {
        last_7_days,
        summary: weekly_summary(now, check_ins),
    }
}

/// Statistics over check-ins no older than seven days.
pub fn weekly_summary(now: DateTime<Local>, check_ins: &[CheckIn]) -> WeeklySummary {
    let window = Duration::days(7);
    let recent: Vec<&CheckIn> = check_ins
        .iter()
        .filter(|check_in| now.signed_duration_since(check_in.date) <= window)
        .collect();

    let Some(first) = recent.first() else {
        return WeeklySummary::Placeholder {
            message: SUMMARY_PLACEHOLDER.to_string(),
        };
    };

    let total: u32 = recent.iter().map(|check_in| u32::from(check_in.mood.value())).sum();
    let average = f64::from(total) / recent.len() as f64;

    // Strict comparison keeps the earliest of equally good days.
    let best = recent.iter().copied().fold(*first, |best, check_in| {
        if check_in.mood > best.mood { check_in } else { best }
    });

    WeeklySummary::Stats {
        average_mood: round_one_decimal(average),
        best_day: best.date,
        best_mood: best.mood,
        check_in_count: recent.len(),
    }
}

pub fn memory_lane(check_ins: &[CheckIn]) -> Vec<MemoryCard> {
    check_ins
        .iter()
        .rev()
        .map(|check_in| MemoryCard {
            date: check_in.date,
            mood: check_in.mood,
            emoji: check_in.mood.emoji(),
            note: display_note(check_in),
        })
        .collect()
}

fn display_note(check_in: &CheckIn) -> String {
    [&check_in.day_summary, &check_in.reason]
        .into_iter()
        .find(|text| !text.is_empty())
        .cloned()
        .unwrap_or_else(|| NO_NOTE.to_string())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn check_in(date: DateTime<Local>, mood: u8) -> CheckIn {
        CheckIn {
            date,
            mood: Mood::new(mood).unwrap(),
            reason: "reason".to_string(),
            day_summary: "day".to_string(),
            note: "Reason: reason. Day: day.".to_string(),
            habits: Vec::new(),
        }
    }

    #[test]
    fn empty_history_yields_placeholder() {
        let report = build_report_at(at(2026, 1, 5, 12), &[]);
        assert_eq!(report.last_7_days.len(), 7);
        assert!(report.last_7_days.iter().all(|day| day.mood.is_none()));
        assert_eq!(
            report.summary,
            WeeklySummary::Placeholder {
                message: SUMMARY_PLACEHOLDER.to_string()
            }
        );
    }

    #[test]
    fn last_7_days_ends_today_and_keeps_gaps() {
        let now = at(2026, 1, 5, 12);
        let check_ins = vec![check_in(at(2026, 1, 3, 9), 4), check_in(at(2026, 1, 3, 20), 1)];
        let report = build_report_at(now, &check_ins);

        assert_eq!(report.last_7_days.first().unwrap().date, "2025-12-30");
        assert_eq!(report.last_7_days.last().unwrap().date, "2026-01-05");
        assert_eq!(report.last_7_days.last().unwrap().weekday, "Mon");

        let point = report
            .last_7_days
            .iter()
            .find(|day| day.date == "2026-01-03")
            .expect("missing day");
        assert_eq!(point.mood, Mood::new(4));
        assert_eq!(report.last_7_days.iter().filter(|day| day.mood.is_some()).count(), 1);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let now = at(2026, 1, 5, 12);
        let check_ins = vec![
            check_in(at(2026, 1, 2, 9), 2),
            check_in(at(2026, 1, 3, 9), 3),
            check_in(at(2026, 1, 4, 9), 3),
        ];
        let WeeklySummary::Stats {
            average_mood,
            check_in_count,
            ..
        } = weekly_summary(now, &check_ins)
        else {
            panic!("expected stats");
        };
        assert_eq!(average_mood, 2.7);
        assert_eq!(check_in_count, 3);
    }

    #[test]
    fn best_day_prefers_first_of_ties() {
        let now = at(2026, 1, 5, 12);
        let check_ins = vec![
            check_in(at(2026, 1, 1, 9), 3),
            check_in(at(2026, 1, 2, 9), 5),
            check_in(at(2026, 1, 4, 9), 5),
        ];
        let WeeklySummary::Stats {
            best_day, best_mood, ..
        } = weekly_summary(now, &check_ins)
        else {
            panic!("expected stats");
        };
        assert_eq!(best_day, at(2026, 1, 2, 9));
        assert_eq!(best_mood.value(), 5);
    }

    #[test]
    fn old_check_ins_fall_out_of_the_window() {
        let now = at(2026, 1, 20, 12);
        let check_ins = vec![check_in(at(2026, 1, 1, 9), 5), check_in(at(2026, 1, 13, 12), 1)];
        let WeeklySummary::Stats {
            average_mood,
            check_in_count,
            ..
        } = weekly_summary(now, &check_ins)
        else {
            panic!("expected stats");
        };
        assert_eq!(check_in_count, 1);
        assert_eq!(average_mood, 1.0);

        let stale = vec![check_in(at(2026, 1, 1, 9), 5)];
        assert!(matches!(weekly_summary(now, &stale), WeeklySummary::Placeholder { .. }));
    }

    #[test]
    fn memory_lane_is_newest_first_with_note_fallbacks() {
        let mut quiet = check_in(at(2026, 1, 2, 9), 1);
        quiet.day_summary.clear();
        quiet.reason.clear();
        let mut reason_only = check_in(at(2026, 1, 3, 9), 3);
        reason_only.day_summary.clear();
        let full = check_in(at(2026, 1, 4, 9), 5);

        let cards = memory_lane(&[quiet, reason_only, full]);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].note, "day");
        assert_eq!(cards[0].emoji, "😁");
        assert_eq!(cards[1].note, "reason");
        assert_eq!(cards[2].note, NO_NOTE);
        assert_eq!(cards[2].emoji, "😞");
    }
}
