//! Starter records for a brand-new user.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::model::{
    initials, new_id, Difficulty, Friend, FriendStatus, LearningCourse, Mood, MoodEntry,
    Priority, Task, TaskStatus,
};
use super::reducer::AppState;

pub fn sample_state(now: DateTime<Utc>) -> AppState {
    AppState {
        tasks: sample_tasks(now),
        timer_sessions: Vec::new(),
        mood_entries: sample_moods(now),
        friends: sample_friends(now),
        learning_courses: sample_courses(now),
    }
}

fn task(
    title: &str,
    description: &str,
    priority: Priority,
    status: TaskStatus,
    due_in_days: i64,
    category: &str,
    now: DateTime<Utc>,
) -> Task {
    let due: NaiveDate = (now + Duration::days(due_in_days)).date_naive();
    Task {
        id: new_id(),
        title: title.into(),
        description: description.into(),
        priority,
        status,
        due_date: Some(due),
        category: category.into(),
        created_at: now,
        updated_at: now,
    }
}

fn sample_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        task(
            "Complete project proposal",
            "Write and submit the quarterly project proposal",
            Priority::High,
            TaskStatus::InProgress,
            5,
            "Work",
            now,
        ),
        task(
            "Review code changes",
            "Review pull requests and provide feedback to team members",
            Priority::Medium,
            TaskStatus::Todo,
            2,
            "Development",
            now,
        ),
        task(
            "Update documentation",
            "Update API documentation with new endpoints",
            Priority::Low,
            TaskStatus::Completed,
            -2,
            "Documentation",
            now,
        ),
    ]
}

fn sample_moods(now: DateTime<Utc>) -> Vec<MoodEntry> {
    let entry = |mood, description: &str, factors: &[&str], hours_ago| {
        let at = now - Duration::hours(hours_ago);
        MoodEntry {
            id: new_id(),
            mood,
            description: description.into(),
            factors: factors.iter().map(|f| f.to_string()).collect(),
            timestamp: at,
            created_at: at,
            updated_at: at,
        }
    };
    vec![
        entry(
            Mood::Happy,
            "Had a great workout this morning and feeling energized",
            &["Exercise", "Health"],
            2,
        ),
        entry(Mood::Neutral, "Regular work day, nothing special", &["Work"], 6),
        entry(
            Mood::Excited,
            "Completed a challenging project successfully!",
            &["Work", "Social"],
            24,
        ),
    ]
}

fn sample_friends(now: DateTime<Utc>) -> Vec<Friend> {
    let friend = |name: &str, email: &str, status, minutes_ago| Friend {
        id: new_id(),
        name: name.into(),
        email: email.into(),
        status,
        last_active: now - Duration::minutes(minutes_ago),
        avatar: initials(name),
        created_at: now,
        updated_at: now,
    };
    vec![
        friend("Mike Wilson", "mike.w@example.com", FriendStatus::Online, 0),
        friend("Alex Lee", "alex.lee@example.com", FriendStatus::Offline, 60),
        friend("Rachel Kim", "rachel.k@example.com", FriendStatus::Online, 5),
    ]
}

fn sample_courses(now: DateTime<Utc>) -> Vec<LearningCourse> {
    let course = |title: &str,
                  description: &str,
                  category: &str,
                  difficulty,
                  duration_hours,
                  progress,
                  rating,
                  enrolled| LearningCourse {
        id: new_id(),
        title: title.into(),
        description: description.into(),
        category: category.into(),
        difficulty,
        duration_hours,
        progress,
        rating,
        enrolled,
        created_at: now,
        updated_at: now,
    };
    vec![
        course(
            "Productivity Fundamentals",
            "Learn the basics of time management and productivity techniques.",
            "Time Management",
            Difficulty::Beginner,
            2.0,
            75,
            4.8,
            true,
        ),
        course(
            "Advanced Focus Techniques",
            "Master deep work and concentration strategies for better results.",
            "Focus",
            Difficulty::Intermediate,
            3.5,
            60,
            4.9,
            true,
        ),
        course(
            "Mindfulness & Well-being",
            "Develop mental clarity and emotional balance for sustained focus.",
            "Wellness",
            Difficulty::Advanced,
            5.0,
            0,
            4.7,
            false,
        ),
    ]
}
