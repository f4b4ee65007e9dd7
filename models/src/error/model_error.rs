use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: Required attribute {attribute} is either null or empty {location}")]
    MissingAttribute {
        attribute: &'static str,
        location: ErrorLocation,
    },

    #[error("Translation Error: {message} {location}")]
    Translation {
        message: String,
        location: ErrorLocation,
    },
}

impl ModelError {
    /// Human-readable message without the location suffix.
    pub fn message(&self) -> String {
        match self {
            ModelError::MissingAttribute { attribute, .. } => {
                format!("Required attribute {attribute} is either null or empty")
            }
            ModelError::Translation { message, .. } => message.clone(),
        }
    }
}
