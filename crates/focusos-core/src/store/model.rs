//! Records kept in the local data store.
//!
//! Field names serialize in camelCase so blobs written by older web builds
//! of FocusOS load unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// Anything stored in a collection: addressable by id, stamped on update.
pub trait Record: Clone {
    /// Collection name used in storage keys and error messages.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn touch(&mut self, at: DateTime<Utc>);
}

macro_rules! impl_record {
    ($ty:ty, $collection:literal) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn touch(&mut self, at: DateTime<Utc>) {
                self.updated_at = at;
            }
        }
    };
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn parse_enum<T>(field: &str, value: &str, table: &[(&str, T)]) -> Result<T, ValidationError>
where
    T: Copy,
{
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, v)| *v)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: field.into(),
            message: format!(
                "expected one of {}, got '{value}'",
                table.iter().map(|(n, _)| *n).collect::<Vec<_>>().join(", ")
            ),
        })
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(
            "priority",
            s,
            &[
                ("low", Priority::Low),
                ("medium", Priority::Medium),
                ("high", Priority::High),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(
            "status",
            s,
            &[
                ("todo", TaskStatus::Todo),
                ("in-progress", TaskStatus::InProgress),
                ("completed", TaskStatus::Completed),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-provided fields of a task; id and timestamps are stamped on add.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub category: String,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            due_date: None,
            category: String::new(),
        }
    }

    pub(crate) fn into_task(self, at: DateTime<Utc>) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("title"));
        }
        Ok(Task {
            id: new_id(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            category: self.category.trim().to_string(),
            created_at: at,
            updated_at: at,
        })
    }
}

// ── Timer sessions ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Completed,
    InProgress,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub id: String,
    #[serde(rename = "type")]
    pub mode: TimerMode,
    /// Planned length in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimerSession {
    pub fn begin(mode: TimerMode, duration_secs: u64, at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            mode,
            duration_secs,
            start_time: at,
            end_time: None,
            status: SessionStatus::InProgress,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn set_status(&mut self, status: SessionStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.end_time = Some(at);
        self.set_status(SessionStatus::Completed, at);
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

// ── Mood ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Angry,
    Sad,
    Neutral,
    Happy,
    Excited,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Angry, Mood::Sad, Mood::Neutral, Mood::Happy, Mood::Excited];

    /// 1 (angry) ..= 5 (excited).
    pub fn score(self) -> u8 {
        match self {
            Mood::Angry => 1,
            Mood::Sad => 2,
            Mood::Neutral => 3,
            Mood::Happy => 4,
            Mood::Excited => 5,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.score() == score)
    }
}

impl std::str::FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(
            "mood",
            s,
            &[
                ("angry", Mood::Angry),
                ("sad", Mood::Sad),
                ("neutral", Mood::Neutral),
                ("happy", Mood::Happy),
                ("excited", Mood::Excited),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub mood: Mood,
    pub description: String,
    #[serde(default)]
    pub factors: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub mood: Mood,
    pub description: String,
    pub factors: Vec<String>,
    /// Defaults to the time of logging.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewMoodEntry {
    pub(crate) fn into_entry(self, at: DateTime<Utc>) -> Result<MoodEntry, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::Empty("description"));
        }
        let mut factors: Vec<String> = Vec::with_capacity(self.factors.len());
        for factor in self.factors {
            let factor = factor.trim().to_string();
            if !factor.is_empty() && !factors.contains(&factor) {
                factors.push(factor);
            }
        }
        Ok(MoodEntry {
            id: new_id(),
            mood: self.mood,
            description: description.to_string(),
            factors,
            timestamp: self.timestamp.unwrap_or(at),
            created_at: at,
            updated_at: at,
        })
    }
}

// ── Friends ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
    Online,
    Offline,
    Blocked,
}

impl std::str::FromStr for FriendStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(
            "status",
            s,
            &[
                ("pending", FriendStatus::Pending),
                ("accepted", FriendStatus::Accepted),
                ("online", FriendStatus::Online),
                ("offline", FriendStatus::Offline),
                ("blocked", FriendStatus::Blocked),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: FriendStatus,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFriend {
    pub name: String,
    pub email: String,
    pub status: FriendStatus,
}

impl NewFriend {
    pub(crate) fn into_friend(self, at: DateTime<Utc>) -> Result<Friend, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Empty("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidValue {
                field: "email".into(),
                message: format!("'{email}' is not an email address"),
            });
        }
        Ok(Friend {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            status: self.status,
            last_active: at,
            avatar: initials(name),
            created_at: at,
            updated_at: at,
        })
    }
}

/// Up to two uppercase initials, e.g. "Rachel Kim" -> "RK".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

// ── Learning ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::str::FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum(
            "difficulty",
            s,
            &[
                ("beginner", Difficulty::Beginner),
                ("intermediate", Difficulty::Intermediate),
                ("advanced", Difficulty::Advanced),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCourse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: Difficulty,
    /// Course length in hours.
    #[serde(rename = "duration")]
    pub duration_hours: f64,
    /// Percent complete, 0..=100.
    pub progress: u8,
    #[serde(default)]
    pub rating: f32,
    pub enrolled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration_hours: f64,
    pub rating: f32,
    pub enrolled: bool,
}

impl NewCourse {
    pub(crate) fn into_course(self, at: DateTime<Utc>) -> Result<LearningCourse, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("title"));
        }
        if !self.duration_hours.is_finite() || self.duration_hours < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!("{} is not a valid number of hours", self.duration_hours),
            });
        }
        Ok(LearningCourse {
            id: new_id(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            difficulty: self.difficulty,
            duration_hours: self.duration_hours,
            progress: 0,
            rating: self.rating.clamp(0.0, 5.0),
            enrolled: self.enrolled,
            created_at: at,
            updated_at: at,
        })
    }
}

/// Clamp a requested progress value into 0..=100.
pub fn clamp_progress(progress: i64) -> u8 {
    progress.clamp(0, 100) as u8
}

impl_record!(Task, "tasks");
impl_record!(TimerSession, "timerSessions");
impl_record!(MoodEntry, "moodEntries");
impl_record!(Friend, "friends");
impl_record!(LearningCourse, "learningCourses");
