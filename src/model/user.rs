use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_expires: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl User {
    pub fn new(email: String, password_hash: String, username: String, role: Role) -> Self {
        User {
            id: None,
            email,
            password_hash,
            username,
            role,
            nickname: None,
            phone: None,
            address: None,
            image: None,
            otp: None,
            otp_expires: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// True when `otp` matches the stored code and the code has not expired at `now`.
    pub fn otp_matches(&self, otp: &str, now: bson::DateTime) -> bool {
        match (&self.otp, self.otp_expires) {
            (Some(stored), Some(expires)) => stored == otp && now <= expires,
            _ => false,
        }
    }
}

/// Profile fields a user may edit; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.nickname.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user_with_otp(otp: &str, expires_in_secs: i64) -> User {
        let mut user = User::new("a@x.com".into(), "hash".into(), "a".into(), Role::User);
        user.otp = Some(otp.to_string());
        user.otp_expires = Some(bson::DateTime::from_chrono(Utc::now() + Duration::seconds(expires_in_secs)));
        user
    }

    #[test]
    fn test_otp_matches_before_expiry() {
        let user = user_with_otp("123456", 60);
        assert!(user.otp_matches("123456", bson::DateTime::now()));
        assert!(!user.otp_matches("654321", bson::DateTime::now()));
    }

    #[test]
    fn test_otp_rejected_after_expiry() {
        let user = user_with_otp("123456", -1);
        assert!(!user.otp_matches("123456", bson::DateTime::now()));
    }

    #[test]
    fn test_otp_absent() {
        let user = User::new("a@x.com".into(), "hash".into(), "a".into(), Role::User);
        assert!(!user.otp_matches("", bson::DateTime::now()));
    }

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::User.as_str(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_password_stored_under_password_key() {
        let user = User::new("a@x.com".into(), "hash".into(), "a".into(), Role::Admin);
        let doc = bson::to_document(&user).unwrap();
        assert_eq!(doc.get_str("password").unwrap(), "hash");
        assert_eq!(doc.get_str("role").unwrap(), "admin");
        assert!(!doc.contains_key("otp"));
    }
}
