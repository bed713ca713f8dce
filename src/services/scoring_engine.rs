use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionType, Reflection, Test};
use crate::models::dto::request::AnswerInput;

const NUMERIC_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i32,
    pub total_points: i32,
    pub passed: bool,
    pub reflections: Vec<Reflection>,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score a full submission against the stored answer key.
    ///
    /// Every question of the test needs exactly one answer. Unknown
    /// questions, duplicate answers and options that do not belong to
    /// their question are rejected before anything is scored.
    pub fn score_submission(test: &Test, answers: &[AnswerInput]) -> AppResult<ScoreResult> {
        if test.questions.is_empty() {
            return Err(AppError::ValidationError(
                "Test has no questions".to_string(),
            ));
        }

        let answers_by_question = Self::index_answers(test, answers)?;

        let unanswered = test
            .questions
            .iter()
            .filter(|q| !answers_by_question.contains_key(q.id.as_str()))
            .count();
        if unanswered > 0 {
            return Err(AppError::ValidationError(format!(
                "incomplete submission: {} of {} questions unanswered",
                unanswered,
                test.questions.len()
            )));
        }

        let total_points = test.checked_total_points().ok_or_else(points_out_of_range)?;
        let mut score: i32 = 0;
        let mut reflections = Vec::with_capacity(test.questions.len());

        for question in &test.questions {
            let answer = answers_by_question[question.id.as_str()];
            let is_correct = Self::grade_question(question, answer)?;
            let points_awarded = if is_correct { question.points } else { 0 };
            score = score
                .checked_add(points_awarded)
                .ok_or_else(points_out_of_range)?;

            reflections.push(Reflection {
                question_id: question.id.clone(),
                selected_option_id: answer.option_id.clone(),
                is_correct,
                points_awarded,
                correct_option_id: if is_correct {
                    None
                } else {
                    question.correct_option().map(|o| o.id.clone())
                },
                explanation: question.explanation.clone(),
            });
        }

        Ok(ScoreResult {
            score,
            total_points,
            passed: Self::is_passing(score, total_points, test.passing_percentage),
            reflections,
        })
    }

    /// `score / total_points >= passing_percentage / 100`, in integers.
    pub fn is_passing(score: i32, total_points: i32, passing_percentage: i32) -> bool {
        i64::from(score) * 100 >= i64::from(passing_percentage) * i64::from(total_points)
    }

    fn index_answers<'a>(
        test: &Test,
        answers: &'a [AnswerInput],
    ) -> AppResult<HashMap<&'a str, &'a AnswerInput>> {
        let mut by_question = HashMap::with_capacity(answers.len());

        for answer in answers {
            if test.find_question(&answer.question_id).is_none() {
                return Err(AppError::ValidationError(format!(
                    "Unknown question '{}'",
                    answer.question_id
                )));
            }

            if by_question
                .insert(answer.question_id.as_str(), answer)
                .is_some()
            {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' answered more than once",
                    answer.question_id
                )));
            }
        }

        Ok(by_question)
    }

    fn grade_question(question: &Question, answer: &AnswerInput) -> AppResult<bool> {
        if let Some(option_id) = answer.option_id.as_deref() {
            let selected = question.find_option(option_id).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Option '{}' does not belong to question '{}'",
                    option_id, question.id
                ))
            })?;
            return Ok(selected.is_correct);
        }

        let value = answer.value.as_deref().ok_or_else(|| {
            AppError::ValidationError(format!(
                "Answer for question '{}' needs an optionId or a value",
                question.id
            ))
        })?;

        let expected = question.correct_option().map(|o| o.text.trim());

        match question.question_type {
            QuestionType::Mcq => Err(AppError::ValidationError(format!(
                "Question '{}' is multiple choice and needs an optionId",
                question.id
            ))),
            QuestionType::Numerical => {
                let given: f64 = value.trim().parse().map_err(|_| {
                    AppError::ValidationError(format!(
                        "Answer for question '{}' is not a number",
                        question.id
                    ))
                })?;

                Ok(expected
                    .and_then(|text| text.parse::<f64>().ok())
                    .map(|expected| (expected - given).abs() <= NUMERIC_TOLERANCE)
                    .unwrap_or(false))
            }
            QuestionType::Text => Ok(expected
                .map(|text| text.to_lowercase() == value.trim().to_lowercase())
                .unwrap_or(false)),
        }
    }
}

fn points_out_of_range() -> AppError {
    AppError::ValidationError("Test point total exceeds the supported range".to_string())
}
