//! Success envelope shared by mutating endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// `{success: true, message}` returned when a mutation has nothing else to
/// report.
#[derive(Debug, Serialize, ToSchema)]
pub struct Acknowledgement {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Notification marked as read")]
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
