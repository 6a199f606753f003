//! Declarative request validation, applied before any store mutation.
//!
//! Update payloads validate each rule only when the field is present.
//! "Today" for due-date checks is derived from the caller's timezone
//! offset when provided (minutes, JavaScript `getTimezoneOffset()`
//! convention: positive west of UTC), otherwise UTC. Create requests get a
//! one-day grace window on the due date; updates do not.

use chrono::{Duration, NaiveDate, Utc};
use todo_core::{CreateTodo, UpdateTodo};

use crate::error::{FieldError, ValidationError};

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;

pub fn validate_create(input: &CreateTodo) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    let title = input.title.trim();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            "Title must not exceed 200 characters",
        ));
    }

    if let Some(description) = &input.description {
        if description.trim().chars().count() > DESCRIPTION_MAX {
            errors.push(FieldError::new(
                "description",
                "Description must not exceed 1000 characters",
            ));
        }
    }

    if !(0..=3).contains(&input.priority) {
        errors.push(FieldError::new(
            "priority",
            "Priority must be between 0 (Low) and 3 (Urgent)",
        ));
    }

    if let Some(due_date) = input.due_date {
        // Grace window: a date that was "today" when the caller composed the
        // request must not bounce because the request arrived after midnight.
        if due_date < client_today(input.timezone_offset) - Duration::days(1) {
            errors.push(FieldError::new("dueDate", "Due date cannot be in the past"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

pub fn validate_update(input: &UpdateTodo) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if let Some(title) = &input.title {
        let title = title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title cannot be empty"));
        } else if title.chars().count() > TITLE_MAX {
            errors.push(FieldError::new(
                "title",
                "Title must not exceed 200 characters",
            ));
        }
    }

    if let Some(description) = &input.description {
        if description.trim().chars().count() > DESCRIPTION_MAX {
            errors.push(FieldError::new(
                "description",
                "Description must not exceed 1000 characters",
            ));
        }
    }

    if let Some(priority) = input.priority {
        if !(0..=3).contains(&priority) {
            errors.push(FieldError::new(
                "priority",
                "Priority must be between 0 (Low) and 3 (Urgent)",
            ));
        }
    }

    if let Some(due_date) = input.due_date {
        if due_date < client_today(input.timezone_offset) {
            errors.push(FieldError::new("dueDate", "Due date cannot be in the past"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// The current calendar date as the caller observes it. `offset_minutes`
/// follows `getTimezoneOffset()`: UTC-8 reports +480, so the caller's wall
/// clock is UTC minus the offset.
fn client_today(offset_minutes: Option<i32>) -> NaiveDate {
    let now = Utc::now();
    match offset_minutes {
        Some(offset) => (now - Duration::minutes(i64::from(offset))).date_naive(),
        None => now.date_naive(),
    }
}
