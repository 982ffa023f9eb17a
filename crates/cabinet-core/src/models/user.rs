//! Application user records.

use serde::{Deserialize, Serialize};

use super::{CollectionKind, Extra, Record};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Nurse,
    #[default]
    Secretary,
}

/// A person who can sign in to the application.
///
/// Roles are informational; the store enforces no permissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Fields outside the schema, kept as they are
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(username: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: String::new(),
            username: username.into(),
            name: name.into(),
            role,
            email: None,
            active: true,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub active: Option<bool>,
    /// Other fields, merged into the record's extra fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for User {
    type Patch = UserPatch;
    const KIND: CollectionKind = CollectionKind::Users;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        super::merge_extra(&mut self.extra, patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_deserialize() {
        let user: User =
            serde_json::from_str(r#"{"id": "u1", "username": "lea", "name": "Léa Petit"}"#)
                .unwrap();
        assert_eq!(user.role, UserRole::Secretary);
        assert!(user.active);
    }

    #[test]
    fn test_deactivate() {
        let mut user = User::new("lea", "Léa Petit", UserRole::Nurse);
        user.apply(UserPatch {
            active: Some(false),
            ..Default::default()
        });
        assert!(!user.active);
        assert_eq!(user.role, UserRole::Nurse);
    }
}
