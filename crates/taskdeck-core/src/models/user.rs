//! Backend user record

use serde::{Deserialize, Serialize};

/// User record reconciled by `POST /users/sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
}
