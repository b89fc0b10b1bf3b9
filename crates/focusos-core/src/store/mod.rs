//! Reducer-backed local data store.
//!
//! Each user's data is five independent collections, kept in memory as an
//! [`AppState`] and persisted as one JSON blob per collection under
//! `focusos:{user_id}:{collection}` in [`LocalStorage`]. Dispatching an
//! [`Action`] runs the pure [`reduce`] function and rewrites only the blob of
//! the collection that changed. There is no migration, versioning or
//! integrity checking: an unreadable blob is logged and treated as empty.

mod model;
mod reducer;
mod sample;

pub use model::{
    clamp_progress, initials, Difficulty, Friend, FriendStatus, LearningCourse, Mood, MoodEntry,
    NewCourse, NewFriend, NewMoodEntry, NewTask, Priority, Record, SessionStatus, Task,
    TaskStatus, TimerSession,
};
pub(crate) use model::parse_enum;
pub use reducer::{reduce, Action, AppState, Collection};
pub use sample::sample_state;

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::{StoreError, ValidationError};
use crate::storage::LocalStorage;

/// Storage key prefix for everything belonging to `user_id`.
pub fn user_prefix(user_id: &str) -> String {
    format!("focusos:{user_id}:")
}

pub fn collection_key(user_id: &str, collection: Collection) -> String {
    format!("{}{}", user_prefix(user_id), collection.key())
}

pub struct DataStore<'a> {
    storage: &'a LocalStorage,
    user_id: String,
    state: AppState,
}

impl<'a> DataStore<'a> {
    /// Load `user_id`'s collections.
    ///
    /// A user with no stored keys at all gets the sample data when `seed`
    /// is set (and it is persisted right away).
    pub fn load(storage: &'a LocalStorage, user_id: &str, seed: bool) -> Result<Self, StoreError> {
        let mut store = Self {
            storage,
            user_id: user_id.to_string(),
            state: AppState::default(),
        };

        let existing = storage.keys_with_prefix(&user_prefix(user_id))?;
        if existing.is_empty() {
            if seed {
                tracing::debug!(user_id, "seeding sample data");
                store.state = sample_state(Utc::now());
                for collection in Collection::ALL {
                    store.persist(collection)?;
                }
            }
            return Ok(store);
        }

        store.state = AppState {
            tasks: store.read(Collection::Tasks)?,
            timer_sessions: store.read(Collection::TimerSessions)?,
            mood_entries: store.read(Collection::MoodEntries)?,
            friends: store.read(Collection::Friends)?,
            learning_courses: store.read(Collection::LearningCourses)?,
        };
        Ok(store)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reduce `action` into the state and persist the touched collection.
    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        let collection = action.collection();
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.persist(collection)
    }

    /// Remove every stored collection of this user.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        for key in self.storage.keys_with_prefix(&user_prefix(&self.user_id))? {
            self.storage.remove(&key)?;
        }
        self.state = AppState::default();
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        let key = collection_key(&self.user_id, collection);
        let Some(blob) = self.storage.get(&key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&blob) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(%key, %err, "discarding unreadable collection");
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, collection: Collection) -> Result<(), StoreError> {
        let encode = |source| StoreError::Encode {
            collection: collection.key(),
            source,
        };
        let blob = match collection {
            Collection::Tasks => serde_json::to_string(&self.state.tasks),
            Collection::TimerSessions => serde_json::to_string(&self.state.timer_sessions),
            Collection::MoodEntries => serde_json::to_string(&self.state.mood_entries),
            Collection::Friends => serde_json::to_string(&self.state.friends),
            Collection::LearningCourses => serde_json::to_string(&self.state.learning_courses),
        }
        .map_err(encode)?;
        self.storage
            .set(&collection_key(&self.user_id, collection), &blob)?;
        Ok(())
    }

    fn existing<T: Record>(items: &[T], id: &str) -> Result<T, StoreError> {
        items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn task(&self, id: &str) -> Result<Task, StoreError> {
        Self::existing(&self.state.tasks, id)
    }

    pub fn add_task(&mut self, draft: NewTask) -> Result<Task, StoreError> {
        let task = draft.into_task(Utc::now())?;
        self.dispatch(Action::AddTask(task.clone()))?;
        Ok(task)
    }

    pub fn update_task(&mut self, mut task: Task) -> Result<Task, StoreError> {
        Self::existing(&self.state.tasks, &task.id)?;
        task.title = task.title.trim().to_string();
        if task.title.is_empty() {
            return Err(ValidationError::Empty("title").into());
        }
        task.touch(Utc::now());
        self.dispatch(Action::UpdateTask(task.clone()))?;
        Ok(task)
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        let mut task = self.task(id)?;
        task.status = status;
        self.update_task(task)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<(), StoreError> {
        Self::existing(&self.state.tasks, id)?;
        self.dispatch(Action::DeleteTask(id.to_string()))
    }

    // ── Timer sessions ───────────────────────────────────────────────

    /// Record a session produced by the timer engine.
    pub fn add_timer_session(&mut self, session: TimerSession) -> Result<(), StoreError> {
        self.dispatch(Action::AddTimerSession(session))
    }

    pub fn update_timer_session(
        &mut self,
        mut session: TimerSession,
    ) -> Result<TimerSession, StoreError> {
        Self::existing(&self.state.timer_sessions, &session.id)?;
        session.touch(Utc::now());
        self.dispatch(Action::UpdateTimerSession(session.clone()))?;
        Ok(session)
    }

    pub fn delete_timer_session(&mut self, id: &str) -> Result<(), StoreError> {
        Self::existing(&self.state.timer_sessions, id)?;
        self.dispatch(Action::DeleteTimerSession(id.to_string()))
    }

    // ── Mood ─────────────────────────────────────────────────────────

    pub fn add_mood_entry(&mut self, draft: NewMoodEntry) -> Result<MoodEntry, StoreError> {
        let entry = draft.into_entry(Utc::now())?;
        self.dispatch(Action::AddMoodEntry(entry.clone()))?;
        Ok(entry)
    }

    pub fn update_mood_entry(&mut self, mut entry: MoodEntry) -> Result<MoodEntry, StoreError> {
        Self::existing(&self.state.mood_entries, &entry.id)?;
        entry.description = entry.description.trim().to_string();
        if entry.description.is_empty() {
            return Err(ValidationError::Empty("description").into());
        }
        entry.touch(Utc::now());
        self.dispatch(Action::UpdateMoodEntry(entry.clone()))?;
        Ok(entry)
    }

    pub fn delete_mood_entry(&mut self, id: &str) -> Result<(), StoreError> {
        Self::existing(&self.state.mood_entries, id)?;
        self.dispatch(Action::DeleteMoodEntry(id.to_string()))
    }

    // ── Friends ──────────────────────────────────────────────────────

    pub fn friend(&self, id: &str) -> Result<Friend, StoreError> {
        Self::existing(&self.state.friends, id)
    }

    /// Case-insensitive lookup by email.
    pub fn friend_by_email(&self, email: &str) -> Option<&Friend> {
        let email = email.trim();
        self.state
            .friends
            .iter()
            .find(|f| f.email.eq_ignore_ascii_case(email))
    }

    pub fn add_friend(&mut self, draft: NewFriend) -> Result<Friend, StoreError> {
        let friend = draft.into_friend(Utc::now())?;
        self.dispatch(Action::AddFriend(friend.clone()))?;
        Ok(friend)
    }

    pub fn update_friend(&mut self, mut friend: Friend) -> Result<Friend, StoreError> {
        Self::existing(&self.state.friends, &friend.id)?;
        friend.name = friend.name.trim().to_string();
        if friend.name.is_empty() {
            return Err(ValidationError::Empty("name").into());
        }
        friend.avatar = initials(&friend.name);
        friend.touch(Utc::now());
        self.dispatch(Action::UpdateFriend(friend.clone()))?;
        Ok(friend)
    }

    pub fn update_friend_status(
        &mut self,
        id: &str,
        status: FriendStatus,
    ) -> Result<Friend, StoreError> {
        Self::existing(&self.state.friends, id)?;
        self.dispatch(Action::UpdateFriendStatus {
            id: id.to_string(),
            status,
            at: Utc::now(),
        })?;
        self.friend(id)
    }

    pub fn delete_friend(&mut self, id: &str) -> Result<(), StoreError> {
        Self::existing(&self.state.friends, id)?;
        self.dispatch(Action::DeleteFriend(id.to_string()))
    }

    // ── Learning ─────────────────────────────────────────────────────

    pub fn course(&self, id: &str) -> Result<LearningCourse, StoreError> {
        Self::existing(&self.state.learning_courses, id)
    }

    pub fn add_course(&mut self, draft: NewCourse) -> Result<LearningCourse, StoreError> {
        let course = draft.into_course(Utc::now())?;
        self.dispatch(Action::AddCourse(course.clone()))?;
        Ok(course)
    }

    pub fn update_course(
        &mut self,
        mut course: LearningCourse,
    ) -> Result<LearningCourse, StoreError> {
        Self::existing(&self.state.learning_courses, &course.id)?;
        course.progress = course.progress.min(100);
        course.touch(Utc::now());
        self.dispatch(Action::UpdateCourse(course.clone()))?;
        Ok(course)
    }

    /// Set progress, clamped into 0..=100.
    pub fn update_course_progress(
        &mut self,
        id: &str,
        progress: i64,
    ) -> Result<LearningCourse, StoreError> {
        Self::existing(&self.state.learning_courses, id)?;
        self.dispatch(Action::UpdateCourseProgress {
            id: id.to_string(),
            progress: clamp_progress(progress),
            at: Utc::now(),
        })?;
        self.course(id)
    }

    pub fn delete_course(&mut self, id: &str) -> Result<(), StoreError> {
        Self::existing(&self.state.learning_courses, id)?;
        self.dispatch(Action::DeleteCourse(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;

    fn storage() -> LocalStorage {
        LocalStorage::open_memory().unwrap()
    }

    #[test]
    fn new_user_without_seed_starts_empty() {
        let storage = storage();
        let store = DataStore::load(&storage, "u1", false).unwrap();
        assert_eq!(store.state(), &AppState::default());
        assert!(storage.keys_with_prefix("focusos:u1:").unwrap().is_empty());
    }

    #[test]
    fn new_user_with_seed_gets_samples_persisted() {
        let storage = storage();
        let store = DataStore::load(&storage, "u1", true).unwrap();
        assert_eq!(store.state().tasks.len(), 3);
        assert_eq!(store.state().friends.len(), 3);
        assert_eq!(storage.keys_with_prefix("focusos:u1:").unwrap().len(), 5);

        // Second load reads what was stored instead of reseeding.
        let again = DataStore::load(&storage, "u1", true).unwrap();
        assert_eq!(again.state(), store.state());
    }

    #[test]
    fn emptied_user_is_not_reseeded() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", true).unwrap();
        let ids: Vec<String> = store.state().tasks.iter().map(|t| t.id.clone()).collect();
        for id in ids {
            store.delete_task(&id).unwrap();
        }
        let again = DataStore::load(&storage, "u1", true).unwrap();
        assert!(again.state().tasks.is_empty());
    }

    #[test]
    fn dispatch_persists_only_touched_collection() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        store.add_task(NewTask::titled("Write tests")).unwrap();
        let keys = storage.keys_with_prefix("focusos:u1:").unwrap();
        assert_eq!(keys, vec!["focusos:u1:tasks"]);
    }

    #[test]
    fn users_are_isolated() {
        let storage = storage();
        let mut alice = DataStore::load(&storage, "alice", false).unwrap();
        alice.add_task(NewTask::titled("alice's task")).unwrap();
        let bob = DataStore::load(&storage, "bob", false).unwrap();
        assert!(bob.state().tasks.is_empty());
    }

    #[test]
    fn corrupt_blob_is_treated_as_empty() {
        let storage = storage();
        storage.set("focusos:u1:tasks", "{not json").unwrap();
        let mut store = DataStore::load(&storage, "u1", true).unwrap();
        assert!(store.state().tasks.is_empty());
        // Writing repairs the blob.
        store.add_task(NewTask::titled("fresh")).unwrap();
        let reloaded = DataStore::load(&storage, "u1", true).unwrap();
        assert_eq!(reloaded.state().tasks.len(), 1);
    }

    #[test]
    fn update_stamps_updated_at_and_validates() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        let task = store.add_task(NewTask::titled("draft")).unwrap();
        let mut edited = task.clone();
        edited.title = "  final  ".into();
        let updated = store.update_task(edited).unwrap();
        assert_eq!(updated.title, "final");
        assert!(updated.updated_at >= task.updated_at);
        assert_eq!(updated.created_at, task.created_at);

        let mut blank = updated.clone();
        blank.title = " ".into();
        assert!(matches!(
            store.update_task(blank),
            Err(StoreError::Invalid(ValidationError::Empty("title")))
        ));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        assert!(matches!(
            store.delete_task("nope"),
            Err(StoreError::NotFound { collection: "tasks", .. })
        ));
        assert!(matches!(
            store.update_friend_status("nope", FriendStatus::Accepted),
            Err(StoreError::NotFound { collection: "friends", .. })
        ));
        assert!(store.update_course_progress("nope", 5).is_err());
        assert!(store.delete_mood_entry("nope").is_err());
        assert!(store.delete_timer_session("nope").is_err());
    }

    #[test]
    fn task_status_change_round_trips_through_storage() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        let task = store.add_task(NewTask::titled("ship it")).unwrap();
        store.set_task_status(&task.id, TaskStatus::Completed).unwrap();
        let reloaded = DataStore::load(&storage, "u1", false).unwrap();
        assert_eq!(reloaded.task(&task.id).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn timer_sessions_are_recorded_newest_first() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        let first = TimerSession::begin(TimerMode::Focus, 1500, Utc::now());
        let second = TimerSession::begin(TimerMode::ShortBreak, 300, Utc::now());
        store.add_timer_session(first.clone()).unwrap();
        store.add_timer_session(second.clone()).unwrap();
        let ids: Vec<&str> = store.state().timer_sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[test]
    fn friend_lookup_and_status() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        let friend = store
            .add_friend(NewFriend {
                name: "Alex Lee".into(),
                email: "Alex.Lee@example.com".into(),
                status: FriendStatus::Pending,
            })
            .unwrap();
        assert_eq!(
            store.friend_by_email("alex.lee@example.com").map(|f| f.id.as_str()),
            Some(friend.id.as_str())
        );
        let accepted = store
            .update_friend_status(&friend.id, FriendStatus::Accepted)
            .unwrap();
        assert_eq!(accepted.status, FriendStatus::Accepted);
        assert!(accepted.updated_at >= friend.updated_at);
    }

    #[test]
    fn course_progress_is_clamped() {
        let storage = storage();
        let mut store = DataStore::load(&storage, "u1", false).unwrap();
        let course = store
            .add_course(NewCourse {
                title: "Deep Work".into(),
                description: String::new(),
                category: "Focus".into(),
                difficulty: Difficulty::Intermediate,
                duration_hours: 3.5,
                rating: 4.5,
                enrolled: true,
            })
            .unwrap();
        assert_eq!(store.update_course_progress(&course.id, 140).unwrap().progress, 100);
        assert_eq!(store.update_course_progress(&course.id, -3).unwrap().progress, 0);
    }

    #[test]
    fn clear_removes_everything_for_user_only() {
        let storage = storage();
        let mut alice = DataStore::load(&storage, "alice", true).unwrap();
        DataStore::load(&storage, "bob", true).unwrap();
        alice.clear().unwrap();
        assert!(alice.state().tasks.is_empty());
        assert!(storage.keys_with_prefix("focusos:alice:").unwrap().is_empty());
        assert_eq!(storage.keys_with_prefix("focusos:bob:").unwrap().len(), 5);
    }
}
