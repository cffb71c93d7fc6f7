use serde::{Deserialize, Serialize};

/// Mocked identity. Login and logout are local state transitions; there is
/// no token or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: String,
}
