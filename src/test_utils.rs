#[cfg(test)]
pub mod fixtures {
    use crate::{
        auth::Claims,
        models::domain::{Course, Lesson, LessonType, Module, User, UserRole},
    };

    /// Claims for a caller with a derived email address.
    pub fn claims(sub: &str, role: UserRole) -> Claims {
        Claims::new(
            &User::new(sub, None, &format!("{}@example.com", sub), role),
            1,
        )
    }

    /// A published course owned by `instructor_id` with one module holding
    /// the given lessons, each five minutes long.
    pub fn published_course(id: &str, instructor_id: &str, lesson_ids: &[&str]) -> Course {
        let mut course = Course::new_draft("Rust", None, 10.0, None, instructor_id);
        course.id = id.to_string();
        course.published = true;

        let mut module = Module::new("Intro", 1);
        module.id = format!("{}-module", id);
        module.lessons = lesson_ids
            .iter()
            .enumerate()
            .map(|(i, lesson_id)| {
                let mut lesson = Lesson::new(lesson_id, i as i32, LessonType::Text, Some(5), "");
                lesson.id = lesson_id.to_string();
                lesson
            })
            .collect();
        course.modules.push(module);
        course
    }
}
