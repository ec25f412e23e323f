use serde::{Deserialize, Serialize};

/// Placeholder used for identity fields the user did not supply.
pub const UNSET_IDENTITY_FIELD: &str = "0";

/// Identity passed to the game as `--username`, `--uuid`, `--accessToken`
/// and `--userType`. Token acquisition happens elsewhere; values are
/// forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchAccountProfile {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    pub user_type: String,
}

impl LaunchAccountProfile {
    /// Profile with only a username; every other field is `"0"`.
    pub fn offline(username: &str) -> Self {
        Self {
            username: username.to_string(),
            uuid: UNSET_IDENTITY_FIELD.into(),
            access_token: UNSET_IDENTITY_FIELD.into(),
            user_type: UNSET_IDENTITY_FIELD.into(),
        }
    }
}
