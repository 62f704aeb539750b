//! User profile model.
//!
//! `UserRecord` mirrors the `users.info` wire shape; `UserProfile` is the
//! flattened form the rest of the workspace consumes. Fallback chains
//! (display name, image URL) are explicit first-non-empty lookups so the
//! selection policy is testable on its own.

use serde::Deserialize;

/// Wire shape of the `user` object in a `users.info` response.
///
/// Unknown fields are ignored; Slack sends empty strings for unset profile
/// fields, which are treated the same as absent ones downstream.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub deleted: bool,
    pub tz: Option<String>,
    #[serde(default)]
    pub profile: ProfileFields,
}

/// Wire shape of the nested `user.profile` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProfileFields {
    pub real_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_original: Option<String>,
    pub image_512: Option<String>,
    pub image_192: Option<String>,
}

/// One channel member's profile, read-only after resolution.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Slack user ID.
    pub id: String,
    /// Account name (the `@handle` without the sigil).
    pub username: String,
    /// Preferred real name, if set.
    pub real_name: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// IANA timezone name.
    pub timezone: Option<String>,
    /// Full-resolution avatar URL.
    pub image_original: Option<String>,
    /// 512px avatar URL.
    pub image_512: Option<String>,
    /// 192px avatar URL.
    pub image_192: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// Whether the account has been deactivated.
    pub deleted: bool,
}

impl UserProfile {
    /// Display name: first non-empty of real name, account name.
    pub fn display_name(&self) -> &str {
        match non_empty(self.real_name.as_deref()) {
            Some(name) => name,
            None => &self.username,
        }
    }

    /// Avatar URL candidates, highest resolution first, empties dropped.
    pub fn image_candidates(&self) -> Vec<&str> {
        [
            self.image_original.as_deref(),
            self.image_512.as_deref(),
            self.image_192.as_deref(),
        ]
        .into_iter()
        .filter_map(non_empty)
        .collect()
    }
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.name,
            real_name: record.profile.real_name,
            title: record.profile.title,
            email: record.profile.email,
            phone: record.profile.phone,
            timezone: record.tz,
            image_original: record.profile.image_original,
            image_512: record.profile.image_512,
            image_192: record.profile.image_192,
            is_bot: record.is_bot,
            deleted: record.deleted,
        }
    }
}

/// Treat `None` and `Some("")` uniformly as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile() -> UserProfile {
        UserProfile {
            id: "U1".to_string(),
            username: "ada".to_string(),
            real_name: Some("Ada Lovelace".to_string()),
            title: Some("Engineer".to_string()),
            email: None,
            phone: None,
            timezone: Some("Europe/London".to_string()),
            image_original: Some("https://a.example/ada_original.jpg".to_string()),
            image_512: Some("https://a.example/ada_512.jpg".to_string()),
            image_192: Some("https://a.example/ada_192.jpg".to_string()),
            is_bot: false,
            deleted: false,
        }
    }

    #[test]
    fn test_display_name_prefers_real_name() {
        let p = profile();
        assert_eq!(p.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut p = profile();
        p.real_name = None;
        assert_eq!(p.display_name(), "ada");

        // Empty string counts as unset.
        p.real_name = Some(String::new());
        assert_eq!(p.display_name(), "ada");
    }

    #[test]
    fn test_image_candidates_ordered() {
        let p = profile();
        assert_eq!(
            p.image_candidates(),
            vec![
                "https://a.example/ada_original.jpg",
                "https://a.example/ada_512.jpg",
                "https://a.example/ada_192.jpg",
            ]
        );
    }

    #[test]
    fn test_image_candidates_skip_empty() {
        let mut p = profile();
        p.image_original = Some(String::new());
        p.image_512 = None;
        assert_eq!(p.image_candidates(), vec!["https://a.example/ada_192.jpg"]);
    }

    #[test]
    fn test_wire_record_defaults() {
        let record: UserRecord = serde_json::from_value(serde_json::json!({
            "id": "U9",
            "name": "ghost"
        }))
        .expect("deserialize");

        let p = UserProfile::from(record);
        assert_eq!(p.display_name(), "ghost");
        assert!(p.image_candidates().is_empty());
        assert!(!p.is_bot);
        assert!(!p.deleted);
    }
}
