use std::str::FromStr;

use colaraz_core::{AppError, UserId};
use serde::{Deserialize, Serialize};

/// Whether a user may author new courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseCreatorState {
    /// Course authoring is allowed.
    Granted,
    /// Course authoring is not allowed. Also the meaning of a missing record.
    #[default]
    Denied,
}

impl CourseCreatorState {
    /// Maps a boolean creator flag to a state.
    #[must_use]
    pub fn from_flag(is_creator: bool) -> Self {
        if is_creator {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Returns a stable storage value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Returns whether authoring is allowed.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl FromStr for CourseCreatorState {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            _ => Err(AppError::Validation(format!(
                "unknown course creator state '{value}'"
            ))),
        }
    }
}

/// The single course-creator record of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCreatorStatus {
    /// User the record belongs to.
    pub user_id: UserId,
    /// Current state.
    pub state: CourseCreatorState,
    /// Actor that last set the state.
    pub approved_by: UserId,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::CourseCreatorState;

    #[test]
    fn state_round_trips_storage_values() {
        for state in [CourseCreatorState::Granted, CourseCreatorState::Denied] {
            assert!(matches!(
                CourseCreatorState::from_str(state.as_str()),
                Ok(parsed) if parsed == state
            ));
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(CourseCreatorState::from_str("pending").is_err());
    }

    #[test]
    fn missing_record_means_denied() {
        assert_eq!(CourseCreatorState::default(), CourseCreatorState::Denied);
        assert!(CourseCreatorState::from_flag(true).is_granted());
    }
}
