//! User data model.
//!
//! A stored [`User`] carries the password hash and never leaves the service
//! layer; adapters expose [`PublicUser`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::validation::{
    EntityField, FieldCollector, FieldMode, INVALID_EMAIL_MESSAGE, INVALID_STRING_MESSAGE,
    InvalidFields, RawField, parse_email, parse_password, parse_string,
};
use crate::domain::ValidationRules;

/// Summary attached to rejected user payloads.
pub const INVALID_USER_MESSAGE: &str = "All user information must be properly fulfilled";
/// Summary attached to rejected login payloads.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credential fields must be properly fulfilled";

/// Server-assigned user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i32, example = 1)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Parse a path segment, accepting positive integers only.
    ///
    /// # Examples
    /// ```
    /// use social_events::domain::UserId;
    ///
    /// assert_eq!(UserId::parse("7"), Some(UserId::new(7)));
    /// assert_eq!(UserId::parse("0"), None);
    /// assert_eq!(UserId::parse("seven"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i32>().ok().filter(|id| *id > 0).map(Self)
    }

    /// Underlying integer.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Stored user including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub image_url: String,
}

impl User {
    /// Client-facing projection.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// User as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    pub id: UserId,
    #[schema(example = "Ann")]
    pub name: String,
    #[schema(example = "Lee")]
    pub last_name: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[schema(example = "https://cdn.example.com/avatars/ann.png")]
    pub image_url: String,
}

impl From<User> for PublicUser {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            last_name,
            email,
            image_url,
            password_hash: _,
        } = value;
        Self {
            id,
            name,
            last_name,
            email,
            image_url,
        }
    }
}

/// Editable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    LastName,
    Email,
    Password,
    ImageUrl,
}

impl EntityField for UserField {
    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ImageUrl => "image_url",
        }
    }

    fn message(self, rules: &ValidationRules) -> String {
        match self {
            Self::Name | Self::LastName | Self::ImageUrl => INVALID_STRING_MESSAGE.to_owned(),
            Self::Email => INVALID_EMAIL_MESSAGE.to_owned(),
            Self::Password => password_message(rules),
        }
    }
}

/// Login fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsField {
    Email,
    Password,
}

impl EntityField for CredentialsField {
    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn message(self, rules: &ValidationRules) -> String {
        match self {
            Self::Email => INVALID_EMAIL_MESSAGE.to_owned(),
            Self::Password => password_message(rules),
        }
    }
}

fn password_message(rules: &ValidationRules) -> String {
    format!(
        "Must be a non-empty string of at least {} characters long",
        rules.min_password_length()
    )
}

/// Validated registration payload; `password` is plaintext until hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub image_url: String,
}

impl NewUser {
    /// Swap the plaintext password for its hash.
    pub fn into_registration(self, password_hash: String) -> UserRegistration {
        UserRegistration {
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
            image_url: self.image_url,
        }
    }
}

/// Registration ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub image_url: String,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub image_url: Option<String>,
}

impl UserPatch {
    /// Overlay the supplied fields on `stored`.
    ///
    /// `password_hash` replaces the stored hash only when the patch carried a
    /// new plaintext password that the caller already hashed.
    pub fn apply(self, stored: User, password_hash: Option<String>) -> User {
        let Self {
            name,
            last_name,
            email,
            password: _,
            image_url,
        } = self;
        User {
            id: stored.id,
            name: name.unwrap_or(stored.name),
            last_name: last_name.unwrap_or(stored.last_name),
            email: email.unwrap_or(stored.email),
            password_hash: password_hash.unwrap_or(stored.password_hash),
            image_url: image_url.unwrap_or(stored.image_url),
        }
    }
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

/// User payload as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawUser {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Ann")]
    pub name: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Lee")]
    pub last_name: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "ann@example.com")]
    pub email: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "correct horse")]
    pub password: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: RawField,
}

struct CheckedUser {
    name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<Zeroizing<String>>,
    image_url: Option<String>,
}

impl RawUser {
    fn check(&self, collector: &mut FieldCollector<'_, UserField>) -> CheckedUser {
        let min = collector.rules().min_password_length();
        CheckedUser {
            name: collector.field(UserField::Name, &self.name, parse_string),
            last_name: collector.field(UserField::LastName, &self.last_name, parse_string),
            email: collector.field(UserField::Email, &self.email, parse_email),
            password: collector.field(UserField::Password, &self.password, |value| {
                parse_password(value, min).map(Zeroizing::new)
            }),
            image_url: collector.field(UserField::ImageUrl, &self.image_url, parse_string),
        }
    }

    /// Validate a registration payload; every field is required.
    pub fn into_new_user(self, rules: &ValidationRules) -> Result<NewUser, InvalidFields<UserField>> {
        let mut collector = FieldCollector::new(FieldMode::Required, rules);
        let checked = self.check(&mut collector);
        collector.finish(INVALID_USER_MESSAGE, || {
            Some(NewUser {
                name: checked.name?,
                last_name: checked.last_name?,
                email: checked.email?,
                password: checked.password?,
                image_url: checked.image_url?,
            })
        })
    }

    /// Validate an update payload; omitted fields are left alone.
    pub fn into_patch(self, rules: &ValidationRules) -> Result<UserPatch, InvalidFields<UserField>> {
        let mut collector = FieldCollector::new(FieldMode::Optional, rules);
        let checked = self.check(&mut collector);
        collector.finish(INVALID_USER_MESSAGE, || {
            Some(UserPatch {
                name: checked.name,
                last_name: checked.last_name,
                email: checked.email,
                password: checked.password,
                image_url: checked.image_url,
            })
        })
    }
}

/// Login payload as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawCredentials {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "ann@example.com")]
    pub email: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "correct horse")]
    pub password: RawField,
}

impl RawCredentials {
    /// Validate a login payload.
    pub fn into_credentials(
        self,
        rules: &ValidationRules,
    ) -> Result<Credentials, InvalidFields<CredentialsField>> {
        let mut collector = FieldCollector::new(FieldMode::Required, rules);
        let min = rules.min_password_length();
        let email = collector.field(CredentialsField::Email, &self.email, parse_email);
        let password = collector.field(CredentialsField::Password, &self.password, |value| {
            parse_password(value, min).map(Zeroizing::new)
        });
        collector.finish(INVALID_CREDENTIALS_MESSAGE, || {
            Some(Credentials {
                email: email?,
                password: password?,
            })
        })
    }
}

/// Aggregate activity figures for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserStatistics {
    pub user_id: UserId,
    /// Mean rating across events the user owns, rounded to two decimals.
    #[schema(example = 7.5)]
    pub average_score: f64,
    pub created_events: i64,
    pub attended_events: i64,
    pub friends: i64,
}

/// Issued bearer token together with the identifier it authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginToken {
    pub token: String,
    pub user_id: UserId,
}
