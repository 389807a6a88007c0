use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_NICKNAME: &str = "friend";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub nickname: String,
    pub age: Option<u32>,
    pub logged_in: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            nickname: DEFAULT_NICKNAME.to_string(),
            age: None,
            logged_in: false,
        }
    }
}

/// A mood rating on the 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😞",
            2 => "😕",
            3 => "😐",
            4 => "😊",
            _ => "😁",
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mood::new(value).ok_or_else(|| format!("mood must be between 1 and 5, got {value}"))
    }
}

impl TryFrom<i64> for Mood {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Mood::new)
            .ok_or_else(|| format!("mood must be between 1 and 5, got {value}"))
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckIn {
    pub date: DateTime<Local>,
    pub mood: Mood,
    pub reason: String,
    pub day_summary: String,
    pub note: String,
    #[serde(default)]
    pub habits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub date: DateTime<Local>,
    pub entry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// The persisted record: everything that survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SessionData {
    pub user: UserProfile,
    pub check_ins: Vec<CheckIn>,
    pub journal: Vec<JournalEntry>,
    pub habits: Vec<Habit>,
}

impl SessionData {
    pub fn add_habit(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let lowered = name.to_lowercase();
        if self.habits.iter().any(|habit| habit.name.to_lowercase() == lowered) {
            return false;
        }
        self.habits.push(Habit {
            name: name.to_string(),
            done: false,
        });
        true
    }

    pub fn toggle_habit(&mut self, name: &str, done: bool) -> bool {
        match self.habits.iter_mut().find(|habit| habit.name == name) {
            Some(habit) => {
                habit.done = done;
                true
            }
            None => false,
        }
    }

    pub fn completed_habits(&self) -> Vec<String> {
        self.habits
            .iter()
            .filter(|habit| habit.done)
            .map(|habit| habit.name.clone())
            .collect()
    }

    pub fn reset_habits(&mut self) {
        for habit in &mut self.habits {
            habit.done = false;
        }
    }

    pub fn save_journal(&mut self, text: &str, now: DateTime<Local>) -> Option<&JournalEntry> {
        let entry = text.trim();
        if entry.is_empty() {
            return None;
        }
        self.journal.push(JournalEntry {
            date: now,
            entry: entry.to_string(),
        });
        self.journal.last()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub age: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    pub entry: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitToggleRequest {
    pub name: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_rejects_values_outside_scale() {
        assert!(Mood::new(0).is_none());
        assert!(Mood::new(6).is_none());
        for value in 1..=5 {
            assert_eq!(Mood::new(value).map(Mood::value), Some(value));
        }
    }

    #[test]
    fn mood_deserialization_is_validated() {
        assert!(serde_json::from_str::<Mood>("3").is_ok());
        assert!(serde_json::from_str::<Mood>("9").is_err());
    }

    #[test]
    fn wide_integers_outside_scale_are_rejected() {
        assert!(Mood::try_from(300_i64).is_err());
        assert!(Mood::try_from(-1_i64).is_err());
        assert_eq!(Mood::try_from(4_i64).map(Mood::value), Ok(4));
    }

    #[test]
    fn habits_are_unique_ignoring_case() {
        let mut data = SessionData::default();
        assert!(data.add_habit("Walk"));
        assert!(!data.add_habit("walk"));
        assert!(!data.add_habit("   "));
        assert_eq!(data.habits.len(), 1);
        assert_eq!(data.habits[0].name, "Walk");
    }

    #[test]
    fn toggle_matches_exact_name_only() {
        let mut data = SessionData::default();
        data.add_habit("Read");
        assert!(!data.toggle_habit("read", true));
        assert!(data.toggle_habit("Read", true));
        assert_eq!(data.completed_habits(), vec!["Read".to_string()]);
        data.reset_habits();
        assert!(data.completed_habits().is_empty());
    }

    #[test]
    fn blank_journal_entries_are_ignored() {
        let mut data = SessionData::default();
        assert!(data.save_journal("  \n ", Local::now()).is_none());
        let saved = data.save_journal("  slept well ", Local::now()).cloned();
        assert_eq!(saved.map(|entry| entry.entry), Some("slept well".to_string()));
        assert_eq!(data.journal.len(), 1);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let data: SessionData = serde_json::from_str(r#"{"habits":[{"name":"Stretch"}]}"#).unwrap();
        assert_eq!(data.user.nickname, DEFAULT_NICKNAME);
        assert!(data.check_ins.is_empty());
        assert!(!data.habits[0].done);
    }
}
