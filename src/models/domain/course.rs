use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    pub published: bool,
    pub instructor_id: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Module {
    pub id: String,
    pub order: i32,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: String,
    pub order: i32,
    pub title: String,
    pub lesson_type: LessonType,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Video,
    Text,
}

impl Course {
    pub fn new_draft(
        title: &str,
        description: Option<String>,
        price: f64,
        discounted_price: Option<f64>,
        instructor_id: &str,
    ) -> Self {
        Course {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            price,
            discounted_price,
            published: false,
            instructor_id: instructor_id.to_string(),
            modules: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Every lesson of the course, modules and lessons both in `order`.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        let mut modules: Vec<&Module> = self.modules.iter().collect();
        modules.sort_by_key(|m| m.order);

        modules.into_iter().flat_map(|module| {
            let mut lessons: Vec<&Lesson> = module.lessons.iter().collect();
            lessons.sort_by_key(|l| l.order);
            lessons
        })
    }

    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .find(|l| l.id == lesson_id)
    }

    pub fn find_module_mut(&mut self, module_id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == module_id)
    }

    /// Price a new enrollment is charged at.
    pub fn effective_price(&self) -> f64 {
        self.discounted_price.unwrap_or(self.price)
    }

    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now());
    }
}

impl Module {
    pub fn new(title: &str, order: i32) -> Self {
        Module {
            id: Uuid::new_v4().to_string(),
            order,
            title: title.to_string(),
            lessons: Vec::new(),
        }
    }
}

impl Lesson {
    pub fn new(
        title: &str,
        order: i32,
        lesson_type: LessonType,
        duration: Option<i32>,
        content: &str,
    ) -> Self {
        Lesson {
            id: Uuid::new_v4().to_string(),
            order,
            title: title.to_string(),
            lesson_type,
            duration,
            content: content.to_string(),
        }
    }
}
