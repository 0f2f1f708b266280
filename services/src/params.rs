use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AttendanceError;
use models::attendance_session::SessionMethod;

/// Everything needed to open a new attendance session for a course.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionParams {
    pub course_id: Uuid,
    pub session_date: NaiveDate,
    #[validate(length(min = 1, max = 120, message = "session title must be 1-120 characters"))]
    pub title: Option<String>,
    pub method: SessionMethod,
}

impl CreateSessionParams {
    pub fn validated(self) -> Result<Self, AttendanceError> {
        self.validate()
            .map_err(|e| AttendanceError::Validation(common::format_validation_errors(&e)))?;
        Ok(self)
    }
}
