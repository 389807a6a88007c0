//! Scripted check-in dialogue.
//!
//! The dialogue is a small linear state machine. Every partially captured
//! check-in lives inside the [`ConversationState`] variant that is waiting for
//! the next answer, so nothing half-finished can leak into the session record.

use crate::models::{CheckIn, Mood};
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

pub const ASK_MOOD: &str = "Of course. Let's start with your mood on a scale of 1 to 5.";
pub const ASK_REASON: &str =
    "Thank you for sharing that. What do you think is the main reason you're feeling this way?";
pub const ASK_DAY_SUMMARY: &str =
    "I see. And what has your day been like? Could you share a few things you've been through?";
pub const TUTORIAL: &str = "I'm Clarity, your personal check-in bot. You can talk to me daily to track your mood and journal your thoughts. Over time, the Dashboard and Memory Lane will show you insightful trends about your emotional well-being.";
pub const QUOTE: &str =
    "'The first step toward change is awareness. The second step is acceptance.' - Nathaniel Branden";

pub fn greeting(nickname: &str) -> String {
    format!("Hello, {nickname}. Whenever you're ready, we can start a check-in.")
}

pub fn closing(nickname: &str) -> String {
    format!(
        "Thank you for sharing so openly, {nickname}. Your thoughts are safe here. Remember to be kind to yourself."
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingMood,
    AwaitingReason {
        mood: Mood,
        started_at: DateTime<Local>,
    },
    AwaitingDaySummary {
        mood: Mood,
        started_at: DateTime<Local>,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChatAction {
    StartCheckIn,
    LearnMore,
    Quote,
    SelectMood {
        /// Anything that is not a whole number arrives as `None` and is ignored like an out-of-range mood.
        #[serde(default, deserialize_with = "whole_number")]
        mood: Option<i64>,
    },
    SubmitText { text: String },
}

impl ChatAction {
    pub fn select_mood(mood: i64) -> Self {
        ChatAction::SelectMood { mood: Some(mood) }
    }
}

fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

/// Which input control the presentation layer should offer next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Starter,
    Mood,
    Text,
}

impl ConversationState {
    pub fn input_mode(&self) -> InputMode {
        match self {
            ConversationState::Idle => InputMode::Starter,
            ConversationState::AwaitingMood => InputMode::Mood,
            ConversationState::AwaitingReason { .. }
            | ConversationState::AwaitingDaySummary { .. } => InputMode::Text,
        }
    }
}

/// The three answers of one finished cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub mood: Mood,
    pub started_at: DateTime<Local>,
    pub reason: String,
    pub day_summary: String,
}

impl Answers {
    pub fn note(&self) -> String {
        format!("Reason: {}. Day: {}.", self.reason, self.day_summary)
    }

    pub fn into_check_in(self, habits: Vec<String>) -> CheckIn {
        let note = self.note();
        CheckIn {
            date: self.started_at,
            mood: self.mood,
            reason: self.reason,
            day_summary: self.day_summary,
            note,
            habits,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignored,
    Reply(String),
    Completed(Answers),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: ConversationState,
    pub outcome: Outcome,
}

impl Transition {
    fn ignored(state: ConversationState) -> Self {
        Self {
            next: state,
            outcome: Outcome::Ignored,
        }
    }

    fn reply(next: ConversationState, text: &str) -> Self {
        Self {
            next,
            outcome: Outcome::Reply(text.to_string()),
        }
    }
}

pub fn advance(state: ConversationState, action: ChatAction, now: DateTime<Local>) -> Transition {
    use ConversationState::*;

    match (state, action) {
        (Idle, ChatAction::StartCheckIn) => Transition::reply(AwaitingMood, ASK_MOOD),
        (Idle, ChatAction::LearnMore) => Transition::reply(Idle, TUTORIAL),
        (Idle, ChatAction::Quote) => Transition::reply(Idle, QUOTE),
        (AwaitingMood, ChatAction::SelectMood { mood }) => {
            match mood.and_then(|value| Mood::try_from(value).ok()) {
                Some(mood) => Transition::reply(
                    AwaitingReason {
                        mood,
                        started_at: now,
                    },
                    ASK_REASON,
                ),
                None => Transition::ignored(AwaitingMood),
            }
        }
        (AwaitingReason { mood, started_at }, ChatAction::SubmitText { text }) => {
            let reason = text.trim();
            if reason.is_empty() {
                return Transition::ignored(AwaitingReason { mood, started_at });
            }
            Transition::reply(
                AwaitingDaySummary {
                    mood,
                    started_at,
                    reason: reason.to_string(),
                },
                ASK_DAY_SUMMARY,
            )
        }
        (
            AwaitingDaySummary {
                mood,
                started_at,
                reason,
            },
            ChatAction::SubmitText { text },
        ) => {
            let day_summary = text.trim();
            if day_summary.is_empty() {
                return Transition::ignored(AwaitingDaySummary {
                    mood,
                    started_at,
                    reason,
                });
            }
            Transition {
                next: Idle,
                outcome: Outcome::Completed(Answers {
                    mood,
                    started_at,
                    reason,
                    day_summary: day_summary.to_string(),
                }),
            }
        }
        (state, _) => Transition::ignored(state),
    }
}
