use crate::analysis::{Analyzer, analyze_or_fallback};
use crate::conversation::{self, ChatAction, ConversationState, InputMode, Outcome};
use crate::models::{CheckIn, DEFAULT_NICKNAME, Habit, LoginRequest, SessionData, UserProfile};
use crate::storage::apply_daily_reset;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BotMessage {
    pub text: String,
    /// Milliseconds the presentation layer waits before showing this line.
    pub delay_ms: u64,
}

impl BotMessage {
    fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub messages: Vec<BotMessage>,
    pub conversation: ConversationState,
    pub input: InputMode,
    pub check_in: Option<CheckIn>,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub user: UserProfile,
    pub display_name: String,
    pub conversation: ConversationState,
    pub input: InputMode,
    pub habits: Vec<Habit>,
    pub check_in_count: usize,
    pub journal_count: usize,
}

/// The live application state: the persisted record plus the in-flight dialogue.
#[derive(Debug, Default)]
pub struct Session {
    pub data: SessionData,
    pub conversation: ConversationState,
    /// Calendar day whose habit reset has already been applied.
    pub last_day: Option<NaiveDate>,
}

impl Session {
    pub fn new(data: SessionData, today: NaiveDate) -> Self {
        Self {
            data,
            conversation: ConversationState::Idle,
            last_day: Some(today),
        }
    }

    /// Clears the habit checklist the first time a new calendar day is seen.
    pub fn roll_day(&mut self, today: NaiveDate) -> bool {
        if !apply_daily_reset(&mut self.data, self.last_day, today) {
            return false;
        }
        self.last_day = Some(today);
        true
    }

    pub fn login(&mut self, request: LoginRequest) -> ChatReply {
        let name = request.name.trim().to_string();
        let nickname = [request.nickname.trim(), name.as_str()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_NICKNAME)
            .to_string();
        self.data.user = UserProfile {
            name,
            nickname,
            age: request.age,
            logged_in: true,
        };
        info!(nickname = %self.data.user.nickname, "member session started");
        self.restart()
    }

    pub fn start_guest(&mut self) -> ChatReply {
        self.data.user.logged_in = false;
        info!("guest session started");
        self.restart()
    }

    pub fn logout(&mut self) {
        let last_day = self.last_day;
        *self = Session {
            last_day,
            ..Session::default()
        };
    }

    /// Drops any half-finished check-in and greets the user again.
    fn restart(&mut self) -> ChatReply {
        self.conversation = ConversationState::Idle;
        self.reply(vec![BotMessage::now(conversation::greeting(&self.data.user.nickname))], None)
    }

    pub async fn chat(
        &mut self,
        action: ChatAction,
        analyzer: &dyn Analyzer,
        now: DateTime<Local>,
        follow_up_delay_ms: u64,
    ) -> ChatReply {
        let transition = conversation::advance(std::mem::take(&mut self.conversation), action, now);
        self.conversation = transition.next;

        match transition.outcome {
            Outcome::Ignored => self.reply(Vec::new(), None),
            Outcome::Reply(text) => self.reply(vec![BotMessage::now(text)], None),
            Outcome::Completed(answers) => {
                let analysis = analyze_or_fallback(analyzer, &answers).await;
                let check_in = answers.into_check_in(self.data.completed_habits());
                self.data.check_ins.push(check_in.clone());
                info!(mood = check_in.mood.value(), total = self.data.check_ins.len(), "check-in recorded");

                let messages = vec![
                    BotMessage::now(analysis),
                    BotMessage {
                        text: conversation::closing(&self.data.user.nickname),
                        delay_ms: follow_up_delay_ms,
                    },
                ];
                self.reply(messages, Some(check_in))
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let display_name = if self.data.user.logged_in {
            self.data.user.nickname.clone()
        } else {
            "guest".to_string()
        };
        SessionSnapshot {
            user: self.data.user.clone(),
            display_name,
            conversation: self.conversation.clone(),
            input: self.conversation.input_mode(),
            habits: self.data.habits.clone(),
            check_in_count: self.data.check_ins.len(),
            journal_count: self.data.journal.len(),
        }
    }

    fn reply(&self, messages: Vec<BotMessage>, check_in: Option<CheckIn>) -> ChatReply {
        ChatReply {
            messages,
            conversation: self.conversation.clone(),
            input: self.conversation.input_mode(),
            check_in,
        }
    }
}
