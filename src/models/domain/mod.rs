pub mod assessment;
pub mod attempt;
pub mod course;
pub mod enrollment;
pub mod lesson_progress;
pub mod notification;
pub mod user;

pub use assessment::{Question, QuestionOption, QuestionType, Test};
pub use attempt::{Attempt, Reflection};
pub use course::{Course, Lesson, LessonType, Module};
pub use enrollment::{Enrollment, NotificationPreferences};
pub use lesson_progress::LessonProgress;
pub use notification::Notification;
pub use user::{User, UserRole};
