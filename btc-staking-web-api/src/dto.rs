use rocket::serde::{Deserialize, Serialize};

pub const STAKER_PARAM_MESSAGE: &str =
    "Please check params. 'staker' should be a bitcoin address of at most 90 characters.";

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
