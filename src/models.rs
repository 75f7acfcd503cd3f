// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the stored documents plus the request and response
//! structures used by the REST API. Document types serialize their identity
//! as `_id` so clients see the same shape they would from a document store.
//!
//! ## Model Categories
//!
//! - **Users**: registered accounts and their public projection
//! - **Supplies**: relief supply listings (full CRUD)
//! - **Volunteers**: volunteer sign-ups
//! - **Community**: community posts and their comments
//! - **Envelopes**: the `{success, message, ...}` response wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Generate a new time-ordered document id.
pub fn new_document_id() -> String {
    Uuid::now_v7().to_string()
}

/// Render a timestamp the way posts and comments display it,
/// e.g. `October 18, 2026`.
pub fn display_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

// =============================================================================
// Users
// =============================================================================

/// A registered user as stored. `password` holds the bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User as exposed by the API (password hash redacted).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PublicUser {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Supplies
// =============================================================================

/// Supply amount. Clients send either a number or a numeric string; the value
/// is stored and returned exactly as sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

/// A relief supply listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Supply {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Public image URL.
    pub image: String,
    pub title: String,
    pub category: String,
    /// Quantity, as a number or string.
    #[schema(value_type = String)]
    pub amount: Amount,
    pub description: String,
}

/// Request to create a supply.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSupplyRequest {
    pub image: String,
    pub title: String,
    pub category: String,
    #[schema(value_type = String)]
    pub amount: Amount,
    pub description: String,
}

impl CreateSupplyRequest {
    pub fn into_supply(self, id: String) -> Supply {
        Supply {
            id,
            image: self.image,
            title: self.title,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Request to update a supply. Only the supplied fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSupplyRequest {
    pub image: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Amount>,
    pub description: Option<String>,
}

impl UpdateSupplyRequest {
    /// Overwrite the fields of `supply` that this request carries.
    pub fn apply_to(self, supply: &mut Supply) {
        if let Some(image) = self.image {
            supply.image = image;
        }
        if let Some(title) = self.title {
            supply.title = title;
        }
        if let Some(category) = self.category {
            supply.category = category;
        }
        if let Some(amount) = self.amount {
            supply.amount = amount;
        }
        if let Some(description) = self.description {
            supply.description = description;
        }
    }
}

// =============================================================================
// Volunteers
// =============================================================================

/// A volunteer sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Volunteer {
    #[serde(rename = "_id")]
    pub id: String,
    pub image: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub location: String,
    /// Free-text description of what the volunteer wants to help with.
    pub passion: String,
}

/// Request to register a volunteer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVolunteerRequest {
    pub image: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub location: String,
    pub passion: String,
}

impl CreateVolunteerRequest {
    pub fn into_volunteer(self, id: String) -> Volunteer {
        Volunteer {
            id,
            image: self.image,
            name: self.name,
            email: self.email,
            mobile: self.mobile,
            location: self.location,
            passion: self.passion,
        }
    }
}

// =============================================================================
// Community Posts & Comments
// =============================================================================

/// A community post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub image: String,
    pub title: String,
    pub description: String,
    /// Human-readable creation date, e.g. `October 18, 2026`.
    pub created_at: String,
}

/// Request to create a community post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommunityPostRequest {
    pub image: String,
    pub title: String,
    pub description: String,
}

/// A comment on a community post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    /// Human-readable posting date.
    pub time: String,
    /// Reference to the commented post. Not validated.
    #[serde(rename = "id")]
    pub post_id: String,
}

/// Request to post a comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub name: String,
    pub email: String,
    pub comment: String,
    /// Reference to the commented post.
    #[serde(rename = "id")]
    pub post_id: String,
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Optional cap on the number of returned records.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum number of records; absent or 0 returns everything.
    pub limit: Option<usize>,
}

impl LimitQuery {
    /// The effective cap, treating 0 as "no cap".
    pub fn cap(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }
}

/// Optional post filter for comment listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentQuery {
    /// Only return comments for this post reference.
    pub id: Option<String>,
}

impl CommentQuery {
    /// Post filter to apply; an empty `?id=` means no filter.
    pub fn post_filter(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

// =============================================================================
// Write Acknowledgements
// =============================================================================

/// Acknowledgement returned by create operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResult {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Acknowledgement returned by delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{success, message}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `{success, message, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// `{success, message, result}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub success: bool,
    pub message: String,
    pub result: T,
}

impl<T> ResultResponse<T> {
    pub fn ok(message: impl Into<String>, result: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            result,
        }
    }
}

/// `{success, message, token}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    /// Bearer token for protected routes.
    pub token: String,
}

/// `{success, message, url}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Public URL of the hosted image.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_supply() -> Supply {
        Supply {
            id: "s-1".into(),
            image: "https://img/1.png".into(),
            title: "Blankets".into(),
            category: "Shelter".into(),
            amount: Amount::Text("40".into()),
            description: "Wool blankets".into(),
        }
    }

    #[test]
    fn display_date_uses_long_month_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(display_date(at), "March 7, 2026");
    }

    #[test]
    fn amount_keeps_number_or_string_verbatim() {
        let number: Amount = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(serde_json::to_value(&number).unwrap(), json!(12));

        let text: Amount = serde_json::from_value(json!("12")).unwrap();
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("12"));
    }

    #[test]
    fn documents_serialize_identity_as_underscore_id() {
        let value = serde_json::to_value(sample_supply()).unwrap();
        assert_eq!(value["_id"], "s-1");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn comment_post_reference_serializes_as_id() {
        let comment = Comment {
            id: "c-1".into(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            comment: "Thanks!".into(),
            time: "March 7, 2026".into(),
            post_id: "p-9".into(),
        };
        let value = serde_json::to_value(comment).unwrap();
        assert_eq!(value["_id"], "c-1");
        assert_eq!(value["id"], "p-9");
    }

    #[test]
    fn community_post_uses_camel_case_created_at() {
        let post = CommunityPost {
            id: "p-1".into(),
            image: "i".into(),
            title: "t".into(),
            description: "d".into(),
            created_at: "March 7, 2026".into(),
        };
        let value = serde_json::to_value(post).unwrap();
        assert_eq!(value["createdAt"], "March 7, 2026");
    }

    #[test]
    fn update_request_only_touches_supplied_fields() {
        let mut supply = sample_supply();
        UpdateSupplyRequest {
            title: Some("Quilts".into()),
            amount: Some(Amount::Number(5.into())),
            ..Default::default()
        }
        .apply_to(&mut supply);

        assert_eq!(supply.title, "Quilts");
        assert_eq!(supply.amount, Amount::Number(5.into()));
        assert_eq!(supply.category, "Shelter");
        assert_eq!(supply.description, "Wool blankets");
    }

    #[test]
    fn limit_zero_means_no_cap() {
        assert_eq!(LimitQuery { limit: Some(0) }.cap(), None);
        assert_eq!(LimitQuery { limit: None }.cap(), None);
        assert_eq!(LimitQuery { limit: Some(2) }.cap(), Some(2));
    }

    #[test]
    fn public_user_drops_password() {
        let user = User {
            id: "u-1".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            password: "$2b$10$hash".into(),
        };
        let value = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "a@x.com");
    }

    #[test]
    fn insert_result_uses_camel_case() {
        let value = serde_json::to_value(InsertResult::new("abc")).unwrap();
        assert_eq!(value, json!({"acknowledged": true, "insertedId": "abc"}));
    }
}
