//! Event creation input and short invite codes.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    recommendations::{Recommendation, build_recommendations},
    util::normalize_display,
};

/// Default invite lifetime: 24 hours.
pub const DEFAULT_INVITE_MINUTES: i64 = 1440;

const CODE_LEN: usize = 8;
const MAX_CODE_LEN: usize = 32;

/// Short code a participant types (or opens as a link) to join an event.
///
/// Codes are case-insensitive; the normalized form is lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Validates and normalizes a code typed by a user or taken from a link.
    pub fn parse(raw: &str) -> ResultEngine<Self> {
        let code = raw.trim().to_ascii_lowercase();
        if code.is_empty() {
            return Err(EngineError::InvalidCode("missing invite code".to_string()));
        }
        if code.len() > MAX_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::InvalidCode(format!("malformed invite code: {code}")));
        }
        Ok(Self(code))
    }

    /// Fresh random code taken from a v4 UUID.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple.chars().take(CODE_LEN).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub event_id: Uuid,
    pub code: InviteCode,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invite {
    /// Issues an invite valid for `minutes` from `now`. `None` never expires.
    pub fn issue(event_id: Uuid, now: DateTime<Utc>, minutes: Option<i64>) -> ResultEngine<Self> {
        let expires_at = match minutes {
            Some(minutes) if minutes <= 0 => {
                return Err(EngineError::InvalidAmount(
                    "invite lifetime must be > 0 minutes".to_string(),
                ));
            }
            Some(minutes) => Some(
                Duration::try_minutes(minutes)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        EngineError::InvalidAmount("invite lifetime out of range".to_string())
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            event_id,
            code: InviteCode::generate(),
            created_at: now,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Relative link the app routes to the join screen.
    pub fn join_path(&self) -> String {
        format!("/join/{}", self.code)
    }
}

/// Validated input for creating an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub adults_count: u32,
    pub minors_count: u32,
}

impl NewEvent {
    pub fn new(title: &str, adults_count: u32, minors_count: u32) -> ResultEngine<Self> {
        let title = normalize_display(title)
            .ok_or_else(|| EngineError::InvalidName("event title is required".to_string()))?;
        Ok(Self {
            title,
            adults_count,
            minors_count,
        })
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        build_recommendations(self.adults_count, self.minors_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized() {
        assert_eq!(InviteCode::parse("  AbC123 ").unwrap().as_str(), "abc123");
        assert!(InviteCode::parse("   ").is_err());
        assert!(InviteCode::parse("abc/../x").is_err());
    }

    #[test]
    fn generated_codes_are_short_and_parseable() {
        let code = InviteCode::generate();
        assert_eq!(code.as_str().len(), CODE_LEN);
        assert_eq!(InviteCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn invite_expires_after_lifetime() {
        let now = Utc::now();
        let invite = Invite::issue(Uuid::new_v4(), now, Some(DEFAULT_INVITE_MINUTES)).unwrap();
        assert!(!invite.is_expired(now));
        assert!(!invite.is_expired(now + Duration::minutes(1439)));
        assert!(invite.is_expired(now + Duration::minutes(1440)));
        assert!(invite.join_path().starts_with("/join/"));
    }

    #[test]
    fn invite_without_lifetime_never_expires() {
        let now = Utc::now();
        let invite = Invite::issue(Uuid::new_v4(), now, None).unwrap();
        assert!(!invite.is_expired(now + Duration::days(3650)));
        assert!(Invite::issue(Uuid::new_v4(), now, Some(0)).is_err());
    }

    #[test]
    fn event_title_is_required() {
        assert!(NewEvent::new("  ", 4, 2).is_err());
        let event = NewEvent::new(" Asadito  del sábado ", 4, 2).unwrap();
        assert_eq!(event.title, "Asadito del sábado");
        assert_eq!(event.recommendations().len(), 8);
    }
}
