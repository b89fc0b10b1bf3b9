//! Derived numbers for the dashboard, timer, mood and learning views.
//!
//! Everything here is a pure function over store records; callers pass
//! "today" explicitly so results don't depend on the wall clock.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::store::{AppState, LearningCourse, Mood, MoodEntry, TaskStatus, TimerSession};
use crate::timer::TimerMode;

/// How far back the mood streak looks.
pub const MOOD_STREAK_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_minutes: u64,
    pub sessions_count: usize,
    /// Share of completed sessions that were focus sessions, in percent.
    pub focus_rate: u8,
}

/// Totals over the sessions completed on `today` (by start date, UTC).
pub fn session_stats(sessions: &[TimerSession], today: NaiveDate) -> SessionStats {
    let completed: Vec<&TimerSession> = sessions
        .iter()
        .filter(|s| s.start_time.date_naive() == today && s.is_completed())
        .collect();
    if completed.is_empty() {
        return SessionStats {
            total_minutes: 0,
            sessions_count: 0,
            focus_rate: 0,
        };
    }

    let total_secs: u64 = completed.iter().map(|s| s.duration_secs).sum();
    let focus = completed.iter().filter(|s| s.mode == TimerMode::Focus).count();
    SessionStats {
        total_minutes: (total_secs as f64 / 60.0).round() as u64,
        sessions_count: completed.len(),
        focus_rate: ((focus as f64 / completed.len() as f64) * 100.0).round() as u8,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    /// Rounded mean score (1..=5), 0 without entries.
    pub average_mood: u8,
    pub most_common_mood: Mood,
    pub mood_streak: u32,
    pub total_entries: usize,
}

pub fn mood_stats(entries: &[MoodEntry], today: NaiveDate) -> MoodStats {
    if entries.is_empty() {
        return MoodStats {
            average_mood: 0,
            most_common_mood: Mood::Neutral,
            mood_streak: 0,
            total_entries: 0,
        };
    }

    let total: u32 = entries.iter().map(|e| u32::from(e.mood.score())).sum();
    let average = (f64::from(total) / entries.len() as f64).round() as u8;

    MoodStats {
        average_mood: average,
        most_common_mood: most_common_mood(entries),
        mood_streak: mood_streak(entries, today),
        total_entries: entries.len(),
    }
}

/// Ties go to the happier mood.
fn most_common_mood(entries: &[MoodEntry]) -> Mood {
    let mut counts = [0usize; 5];
    for entry in entries {
        counts[usize::from(entry.mood.score() - 1)] += 1;
    }
    let mut best = Mood::Angry;
    for mood in Mood::ALL {
        if counts[usize::from(mood.score() - 1)] >= counts[usize::from(best.score() - 1)] {
            best = mood;
        }
    }
    best
}

/// Consecutive days with at least one entry, counting back from `today`.
fn mood_streak(entries: &[MoodEntry], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while streak < MOOD_STREAK_WINDOW_DAYS {
        if !entries.iter().any(|e| e.timestamp.date_naive() == day) {
            break;
        }
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMood {
    pub date: NaiveDate,
    /// Mean score for the day, 0.0 without entries.
    pub average: f64,
    pub count: usize,
}

/// The seven days ending at `today`, oldest first.
pub fn weekly_mood_trend(entries: &[MoodEntry], today: NaiveDate) -> Vec<DayMood> {
    (0..7)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let scores: Vec<u8> = entries
                .iter()
                .filter(|e| e.timestamp.date_naive() == date)
                .map(|e| e.mood.score())
                .collect();
            let average = if scores.is_empty() {
                0.0
            } else {
                scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64
            };
            DayMood {
                date,
                average,
                count: scores.len(),
            }
        })
        .collect()
}

/// Short observations shown under the mood chart.
pub fn mood_insights(entries: &[MoodEntry], stats: &MoodStats) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }
    let mut insights = Vec::new();

    let mut factors: Vec<(&str, usize)> = Vec::new();
    for factor in entries.iter().flat_map(|e| e.factors.iter()) {
        match factors.iter_mut().find(|(name, _)| *name == factor.as_str()) {
            Some((_, count)) => *count += 1,
            None => factors.push((factor.as_str(), 1)),
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    factors.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some((top, _)) = factors.first() {
        insights.push(format!("\"{top}\" is your most tracked mood factor"));
    }

    if stats.average_mood >= 4 {
        insights.push("You've been in a positive mood lately!".to_string());
    } else if stats.average_mood <= 2 {
        insights.push("Consider what might be affecting your mood negatively".to_string());
    }

    if stats.mood_streak >= 7 {
        insights.push(format!(
            "Great job! You've tracked your mood for {} consecutive days",
            stats.mood_streak
        ));
    }
    insights
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    /// Mean progress over enrolled courses, in percent.
    pub overall_progress: u8,
    pub completed: usize,
    pub active: usize,
    pub hours_learned: f64,
}

pub fn learning_progress(courses: &[LearningCourse]) -> LearningProgress {
    let enrolled: Vec<&LearningCourse> = courses.iter().filter(|c| c.enrolled).collect();
    let overall = if enrolled.is_empty() {
        0
    } else {
        let sum: u32 = enrolled.iter().map(|c| u32::from(c.progress)).sum();
        (f64::from(sum) / enrolled.len() as f64).round() as u8
    };
    let hours: f64 = courses
        .iter()
        .map(|c| c.duration_hours * f64::from(c.progress) / 100.0)
        .sum();

    LearningProgress {
        overall_progress: overall,
        completed: courses.iter().filter(|c| c.progress >= 100).count(),
        active: enrolled.iter().filter(|c| c.progress < 100).count(),
        hours_learned: (hours * 10.0).round() / 10.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Completed focus time, in hours (one decimal).
    pub focus_hours: f64,
    pub mood_entries: usize,
    /// Mean mood score, one decimal; 0.0 without entries.
    pub average_mood: f64,
    pub friends: usize,
    pub enrolled_courses: usize,
}

pub fn dashboard(state: &AppState) -> Dashboard {
    let focus_secs: u64 = state
        .timer_sessions
        .iter()
        .filter(|s| s.is_completed() && s.mode == TimerMode::Focus)
        .map(|s| s.duration_secs)
        .sum();
    let average_mood = if state.mood_entries.is_empty() {
        0.0
    } else {
        let total: f64 = state
            .mood_entries
            .iter()
            .map(|e| f64::from(e.mood.score()))
            .sum();
        (total / state.mood_entries.len() as f64 * 10.0).round() / 10.0
    };

    Dashboard {
        total_tasks: state.tasks.len(),
        completed_tasks: state
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count(),
        focus_hours: (focus_secs as f64 / 3600.0 * 10.0).round() / 10.0,
        mood_entries: state.mood_entries.len(),
        average_mood,
        friends: state.friends.len(),
        enrolled_courses: state.learning_courses.iter().filter(|c| c.enrolled).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{sample_state, NewMoodEntry, SessionStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn session(mode: TimerMode, secs: u64, start: DateTime<Utc>, done: bool) -> TimerSession {
        let mut s = TimerSession::begin(mode, secs, start);
        if done {
            s.complete(start + Duration::seconds(secs as i64));
        } else {
            s.set_status(SessionStatus::Paused, start);
        }
        s
    }

    fn entry(mood: Mood, when: DateTime<Utc>, factors: &[&str]) -> MoodEntry {
        NewMoodEntry {
            mood,
            description: "note".into(),
            factors: factors.iter().map(|f| f.to_string()).collect(),
            timestamp: Some(when),
        }
        .into_entry(when)
        .unwrap()
    }

    #[test]
    fn session_stats_count_todays_completed_only() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sessions = vec![
            session(TimerMode::Focus, 1500, at(2025, 3, 10, 9), true),
            session(TimerMode::ShortBreak, 300, at(2025, 3, 10, 10), true),
            session(TimerMode::Focus, 1500, at(2025, 3, 10, 11), false),
            session(TimerMode::Focus, 1500, at(2025, 3, 9, 9), true),
        ];
        let stats = session_stats(&sessions, today);
        assert_eq!(stats.sessions_count, 2);
        assert_eq!(stats.total_minutes, 30);
        assert_eq!(stats.focus_rate, 50);
    }

    #[test]
    fn session_stats_empty_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let stats = session_stats(&[], today);
        assert_eq!(stats.sessions_count, 0);
        assert_eq!(stats.focus_rate, 0);
    }

    #[test]
    fn mood_stats_empty() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let stats = mood_stats(&[], today);
        assert_eq!(stats.average_mood, 0);
        assert_eq!(stats.most_common_mood, Mood::Neutral);
        assert_eq!(stats.mood_streak, 0);
    }

    #[test]
    fn mood_stats_average_common_and_streak() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = vec![
            entry(Mood::Happy, at(2025, 3, 10, 8), &[]),
            entry(Mood::Happy, at(2025, 3, 9, 8), &[]),
            entry(Mood::Sad, at(2025, 3, 8, 8), &[]),
            // gap on the 7th
            entry(Mood::Excited, at(2025, 3, 6, 8), &[]),
        ];
        let stats = mood_stats(&entries, today);
        // (4 + 4 + 2 + 5) / 4 = 3.75
        assert_eq!(stats.average_mood, 4);
        assert_eq!(stats.most_common_mood, Mood::Happy);
        assert_eq!(stats.mood_streak, 3);
        assert_eq!(stats.total_entries, 4);
    }

    #[test]
    fn streak_is_zero_without_entry_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = vec![entry(Mood::Happy, at(2025, 3, 9, 8), &[])];
        assert_eq!(mood_stats(&entries, today).mood_streak, 0);
    }

    #[test]
    fn streak_is_capped() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let start = at(2025, 3, 31, 12);
        let entries: Vec<MoodEntry> = (0..45)
            .map(|d| entry(Mood::Neutral, start - Duration::days(d), &[]))
            .collect();
        assert_eq!(mood_stats(&entries, today).mood_streak, MOOD_STREAK_WINDOW_DAYS);
    }

    #[test]
    fn most_common_tie_goes_to_happier_mood() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = vec![
            entry(Mood::Sad, at(2025, 3, 10, 8), &[]),
            entry(Mood::Excited, at(2025, 3, 10, 9), &[]),
        ];
        assert_eq!(mood_stats(&entries, today).most_common_mood, Mood::Excited);
    }

    #[test]
    fn weekly_trend_covers_seven_days_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = vec![
            entry(Mood::Happy, at(2025, 3, 10, 8), &[]),
            entry(Mood::Sad, at(2025, 3, 10, 20), &[]),
        ];
        let trend = weekly_mood_trend(&entries, today);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(trend[6].count, 2);
        assert_eq!(trend[6].average, 3.0);
        assert_eq!(trend[5].average, 0.0);
    }

    #[test]
    fn insights_name_top_factor() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = vec![
            entry(Mood::Happy, at(2025, 3, 10, 8), &["Work", "Sleep"]),
            entry(Mood::Excited, at(2025, 3, 10, 9), &["Sleep"]),
        ];
        let stats = mood_stats(&entries, today);
        let insights = mood_insights(&entries, &stats);
        assert_eq!(insights[0], "\"Sleep\" is your most tracked mood factor");
        assert!(insights.contains(&"You've been in a positive mood lately!".to_string()));
    }

    #[test]
    fn learning_progress_over_sample_courses() {
        let state = sample_state(Utc::now());
        let progress = learning_progress(&state.learning_courses);
        // enrolled: 75 and 60
        assert_eq!(progress.overall_progress, 68);
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.active, 2);
        // 2.0 * 0.75 + 3.5 * 0.6 = 3.6
        assert_eq!(progress.hours_learned, 3.6);
    }

    #[test]
    fn dashboard_counts_sample_state() {
        let mut state = sample_state(Utc::now());
        state.timer_sessions = vec![
            session(TimerMode::Focus, 1800, Utc::now(), true),
            session(TimerMode::Focus, 1800, Utc::now(), true),
            session(TimerMode::LongBreak, 900, Utc::now(), true),
        ];
        let board = dashboard(&state);
        assert_eq!(board.total_tasks, 3);
        assert_eq!(board.completed_tasks, 1);
        assert_eq!(board.focus_hours, 1.0);
        assert_eq!(board.mood_entries, 3);
        // (4 + 3 + 5) / 3
        assert_eq!(board.average_mood, 4.0);
        assert_eq!(board.friends, 3);
        assert_eq!(board.enrolled_courses, 2);
    }
}
