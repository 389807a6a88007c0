use crate::conversation::ChatAction;
use crate::errors::AppError;
use crate::journal::{self, EXPORT_FILE_NAME};
use crate::models::{Habit, HabitRequest, HabitToggleRequest, JournalEntry, JournalRequest, LoginRequest};
use crate::session::{ChatReply, Session, SessionSnapshot};
use crate::state::AppState;
use crate::stats::{MemoryCard, MoodReport, build_report, memory_lane};
use crate::storage::{clear_data, persist_data, write_last_date};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Local;
use tracing::{error, info};

// Each handler holds the session lock until it returns, so user actions run one at a time.

/// Writes the record; a failure is logged and the in-memory change is kept.
async fn persist_or_log(state: &AppState, session: &Session, what: &str) {
    if let Err(err) = persist_data(&state.paths.data, &session.data).await {
        error!("failed to persist {what}: {err}");
    }
}

/// Applies the daily habit reset when the calendar day changed while the server was running.
async fn roll_day(state: &AppState, session: &mut Session) {
    let today = Local::now().date_naive();
    if !session.roll_day(today) {
        return;
    }
    info!(%today, "new day, habit checklist reset");
    if let Err(err) = write_last_date(&state.paths.last_date, today).await {
        error!("failed to record reset date: {err}");
    }
    persist_or_log(state, session, "daily reset").await;
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    Json(session.snapshot())
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Json<ChatReply> {
    let mut session = state.session.lock().await;
    let reply = session.login(payload);
    persist_or_log(&state, &session, "profile").await;
    Json(reply)
}

pub async fn guest(State(state): State<AppState>) -> Json<ChatReply> {
    let mut session = state.session.lock().await;
    Json(session.start_guest())
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut session = state.session.lock().await;
    clear_data(&state.paths).await?;
    session.logout();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(action): Json<ChatAction>,
) -> Json<ChatReply> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    let reply = session
        .chat(action, state.analyzer.as_ref(), Local::now(), state.follow_up_delay_ms)
        .await;
    if reply.check_in.is_some() {
        persist_or_log(&state, &session, "check-in").await;
    }
    Json(reply)
}

pub async fn dashboard(State(state): State<AppState>) -> Json<MoodReport> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    Json(build_report(&session.data.check_ins))
}

pub async fn memories(State(state): State<AppState>) -> Json<Vec<MemoryCard>> {
    let session = state.session.lock().await;
    Json(memory_lane(&session.data.check_ins))
}

pub async fn list_journal(State(state): State<AppState>) -> Json<Vec<JournalEntry>> {
    let session = state.session.lock().await;
    Json(journal::history(&session.data.journal))
}

pub async fn save_journal(
    State(state): State<AppState>,
    Json(payload): Json<JournalRequest>,
) -> Json<Vec<JournalEntry>> {
    let mut session = state.session.lock().await;
    if session.data.save_journal(&payload.entry, Local::now()).is_some() {
        persist_or_log(&state, &session, "journal entry").await;
    }
    Json(journal::history(&session.data.journal))
}

pub async fn export_journal(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session.lock().await;
    let document = journal::export_journal(&session.data.journal)
        .ok_or_else(|| AppError::not_found("no journal entries to export"))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        document,
    ))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    Json(session.data.habits.clone())
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitRequest>,
) -> Json<Vec<Habit>> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    if session.data.add_habit(&payload.name) {
        persist_or_log(&state, &session, "habit").await;
    }
    Json(session.data.habits.clone())
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitToggleRequest>,
) -> Json<Vec<Habit>> {
    let mut session = state.session.lock().await;
    roll_day(&state, &mut session).await;
    if session.data.toggle_habit(&payload.name, payload.done) {
        persist_or_log(&state, &session, "habit toggle").await;
    }
    Json(session.data.habits.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, Analyzer};
    use crate::conversation::Answers;
    use crate::models::SessionData;
    use crate::storage::StoragePaths;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct Steady;

    #[async_trait]
    impl Analyzer for Steady {
        async fn analyze(&self, _answers: &Answers) -> Result<String, AnalysisError> {
            Ok("steady".to_string())
        }
    }

    fn unwritable_state() -> AppState {
        let mut dir = std::env::temp_dir();
        dir.push(format!("clarity_missing_dir_{}", std::process::id()));
        dir.push("never_created");
        let paths = StoragePaths::new(PathBuf::from(&dir).join("state.json"));
        let mut session = Session::new(SessionData::default(), Local::now().date_naive());
        session.login(LoginRequest {
            name: "Lee".to_string(),
            nickname: String::new(),
            age: None,
        });
        AppState::new(paths, session, Arc::new(Steady), 0)
    }

    #[tokio::test]
    async fn chat_reply_survives_a_failed_write() {
        let state = unwritable_state();
        for action in [
            ChatAction::StartCheckIn,
            ChatAction::select_mood(3),
            ChatAction::SubmitText {
                text: "rain".to_string(),
            },
        ] {
            chat(State(state.clone()), Json(action)).await;
        }

        let Json(reply) = chat(
            State(state.clone()),
            Json(ChatAction::SubmitText {
                text: "stayed in".to_string(),
            }),
        )
        .await;

        assert_eq!(reply.messages[0].text, "steady");
        assert!(reply.check_in.is_some());
        assert_eq!(state.session.lock().await.data.check_ins.len(), 1);
    }

    #[tokio::test]
    async fn handlers_reset_habits_after_the_day_changes() {
        let state = unwritable_state();
        {
            let mut session = state.session.lock().await;
            session.data.add_habit("Walk");
            session.data.toggle_habit("Walk", true);
            session.last_day = Local::now().date_naive().pred_opt();
        }

        let Json(habits) = list_habits(State(state.clone())).await;
        assert!(habits.iter().all(|habit| !habit.done));

        let Json(habits) = toggle_habit(
            State(state.clone()),
            Json(HabitToggleRequest {
                name: "Walk".to_string(),
                done: true,
            }),
        )
        .await;
        assert!(habits[0].done);

        let Json(habits) = list_habits(State(state.clone())).await;
        assert!(habits[0].done);
    }
}
