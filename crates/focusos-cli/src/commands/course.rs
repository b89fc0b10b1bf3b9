use clap::Subcommand;
use focusos_core::stats::learning_progress;
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::{Difficulty, NewCourse};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CourseAction {
    /// List courses
    List {
        /// Only courses you are enrolled in
        #[arg(long)]
        enrolled: bool,
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a course to the catalogue
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "General")]
        category: String,
        /// beginner, intermediate or advanced
        #[arg(long, default_value = "beginner")]
        difficulty: Difficulty,
        /// Length in hours
        #[arg(long, default_value_t = 1.0)]
        hours: f64,
        #[arg(long, default_value_t = 0.0)]
        rating: f32,
        #[arg(long)]
        enroll: bool,
    },
    /// Set progress in percent (clamped to 0..=100)
    Progress {
        id: String,
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    /// Enroll in (or with --drop, leave) a course
    Enroll {
        id: String,
        #[arg(long)]
        drop: bool,
    },
    /// Delete a course
    Delete { id: String },
    /// Overall learning progress
    Stats,
}

pub fn run(action: CourseAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;
    let mut store = open_store(&storage, &config)?;

    match action {
        CourseAction::List { enrolled, category } => {
            let courses: Vec<_> = store
                .state()
                .learning_courses
                .iter()
                .filter(|c| !enrolled || c.enrolled)
                .filter(|c| {
                    category
                        .as_deref()
                        .is_none_or(|cat| c.category.eq_ignore_ascii_case(cat))
                })
                .collect();
            print_json(&courses)?;
        }
        CourseAction::Add {
            title,
            description,
            category,
            difficulty,
            hours,
            rating,
            enroll,
        } => {
            let course = store.add_course(NewCourse {
                title,
                description: description.unwrap_or_default(),
                category,
                difficulty,
                duration_hours: hours,
                rating,
                enrolled: enroll,
            })?;
            print_json(&course)?;
        }
        CourseAction::Progress { id, percent } => {
            let course = store.update_course_progress(&id, percent)?;
            print_json(&course)?;
        }
        CourseAction::Enroll { id, drop } => {
            let mut course = store.course(&id)?;
            course.enrolled = !drop;
            let course = store.update_course(course)?;
            print_json(&course)?;
        }
        CourseAction::Delete { id } => {
            store.delete_course(&id)?;
            println!("Course deleted: {id}");
        }
        CourseAction::Stats => {
            print_json(&learning_progress(&store.state().learning_courses))?;
        }
    }
    Ok(())
}
