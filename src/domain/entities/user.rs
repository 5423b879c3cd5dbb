//! User entity - an account in the record store's auth collection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub email_visibility: bool,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
