//! Pure reducer over the five collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{
    Friend, FriendStatus, LearningCourse, MoodEntry, Record, Task, TimerSession,
};

/// In-memory state of one user's data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub timer_sessions: Vec<TimerSession>,
    pub mood_entries: Vec<MoodEntry>,
    pub friends: Vec<Friend>,
    pub learning_courses: Vec<LearningCourse>,
}

/// Which collection an action touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tasks,
    TimerSessions,
    MoodEntries,
    Friends,
    LearningCourses,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Tasks,
        Collection::TimerSessions,
        Collection::MoodEntries,
        Collection::Friends,
        Collection::LearningCourses,
    ];

    /// Storage key suffix.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Tasks => Task::COLLECTION,
            Collection::TimerSessions => TimerSession::COLLECTION,
            Collection::MoodEntries => MoodEntry::COLLECTION,
            Collection::Friends => Friend::COLLECTION,
            Collection::LearningCourses => LearningCourse::COLLECTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTasks(Vec<Task>),
    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(String),

    SetTimerSessions(Vec<TimerSession>),
    AddTimerSession(TimerSession),
    UpdateTimerSession(TimerSession),
    DeleteTimerSession(String),

    SetMoodEntries(Vec<MoodEntry>),
    AddMoodEntry(MoodEntry),
    UpdateMoodEntry(MoodEntry),
    DeleteMoodEntry(String),

    SetFriends(Vec<Friend>),
    AddFriend(Friend),
    UpdateFriend(Friend),
    UpdateFriendStatus {
        id: String,
        status: FriendStatus,
        at: DateTime<Utc>,
    },
    DeleteFriend(String),

    SetLearningCourses(Vec<LearningCourse>),
    AddCourse(LearningCourse),
    UpdateCourse(LearningCourse),
    UpdateCourseProgress {
        id: String,
        progress: u8,
        at: DateTime<Utc>,
    },
    DeleteCourse(String),
}

impl Action {
    pub fn collection(&self) -> Collection {
        use Action::*;
        match self {
            SetTasks(_) | AddTask(_) | UpdateTask(_) | DeleteTask(_) => Collection::Tasks,
            SetTimerSessions(_) | AddTimerSession(_) | UpdateTimerSession(_)
            | DeleteTimerSession(_) => Collection::TimerSessions,
            SetMoodEntries(_) | AddMoodEntry(_) | UpdateMoodEntry(_) | DeleteMoodEntry(_) => {
                Collection::MoodEntries
            }
            SetFriends(_) | AddFriend(_) | UpdateFriend(_) | UpdateFriendStatus { .. }
            | DeleteFriend(_) => Collection::Friends,
            SetLearningCourses(_) | AddCourse(_) | UpdateCourse(_)
            | UpdateCourseProgress { .. } | DeleteCourse(_) => Collection::LearningCourses,
        }
    }
}

fn prepend<T>(items: &mut Vec<T>, item: T) {
    items.insert(0, item);
}

fn replace<T: Record>(items: &mut [T], item: T) {
    if let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        *slot = item;
    }
}

fn remove<T: Record>(items: &mut Vec<T>, id: &str) {
    items.retain(|existing| existing.id() != id);
}

/// Apply `action` to `state`. Unknown ids leave the collection unchanged.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetTasks(tasks) => state.tasks = tasks,
        Action::AddTask(task) => prepend(&mut state.tasks, task),
        Action::UpdateTask(task) => replace(&mut state.tasks, task),
        Action::DeleteTask(id) => remove(&mut state.tasks, &id),

        Action::SetTimerSessions(sessions) => state.timer_sessions = sessions,
        Action::AddTimerSession(session) => prepend(&mut state.timer_sessions, session),
        Action::UpdateTimerSession(session) => replace(&mut state.timer_sessions, session),
        Action::DeleteTimerSession(id) => remove(&mut state.timer_sessions, &id),

        Action::SetMoodEntries(entries) => state.mood_entries = entries,
        Action::AddMoodEntry(entry) => prepend(&mut state.mood_entries, entry),
        Action::UpdateMoodEntry(entry) => replace(&mut state.mood_entries, entry),
        Action::DeleteMoodEntry(id) => remove(&mut state.mood_entries, &id),

        Action::SetFriends(friends) => state.friends = friends,
        // Friends keep insertion order.
        Action::AddFriend(friend) => state.friends.push(friend),
        Action::UpdateFriend(friend) => replace(&mut state.friends, friend),
        Action::UpdateFriendStatus { id, status, at } => {
            if let Some(friend) = state.friends.iter_mut().find(|f| f.id == id) {
                friend.status = status;
                friend.touch(at);
            }
        }
        Action::DeleteFriend(id) => remove(&mut state.friends, &id),

        Action::SetLearningCourses(courses) => state.learning_courses = courses,
        Action::AddCourse(course) => prepend(&mut state.learning_courses, course),
        Action::UpdateCourse(course) => replace(&mut state.learning_courses, course),
        Action::UpdateCourseProgress { id, progress, at } => {
            if let Some(course) = state.learning_courses.iter_mut().find(|c| c.id == id) {
                course.progress = progress.min(100);
                course.touch(at);
            }
        }
        Action::DeleteCourse(id) => remove(&mut state.learning_courses, &id),
    }
    state
}
