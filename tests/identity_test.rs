// ABOUTME: Integration tests for registration, login, token refresh and account deletion
// ABOUTME: Covers case-insensitive conflicts, generic credential errors and token kind separation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use serde_json::json;
use workout_tracker::{
    auth::{TokenKind, TokenManager},
    constants::error_messages::INVALID_CREDENTIALS,
    errors::ErrorCode,
    models::{CreateUserRequest, LoginRequest, RefreshRequest},
};

use common::{create_test_resources, register_and_login, TEST_PASSWORD};

fn registration(username: &str, email: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_owned(),
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
    }
}

#[tokio::test]
async fn test_register_normalizes_identity_fields() -> Result<()> {
    let resources = create_test_resources().await?;

    let user = resources
        .identity
        .register(&registration("  Alice ", "Alice@Example.COM"))
        .await?;

    assert!(user.id > 0);
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");

    let serialized = serde_json::to_value(&user)?;
    assert!(serialized.get("password").is_none());
    assert!(serialized.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_differing_in_case_conflicts() -> Result<()> {
    let resources = create_test_resources().await?;
    resources
        .identity
        .register(&registration("alice", "alice@example.com"))
        .await?;

    let err = resources
        .identity
        .register(&registration("ALICE", "other@example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.details, json!({ "field": "username" }));
    assert_eq!(resources.database.entity_counts().await?.users, 1);
    Ok(())
}

#[tokio::test]
async fn test_short_email_domain_and_minimum_password_register() -> Result<()> {
    let resources = create_test_resources().await?;

    let user = resources
        .identity
        .register(&CreateUserRequest {
            username: "alice".to_owned(),
            email: "a@x.com".to_owned(),
            password: "longenough1".to_owned(),
        })
        .await?;

    assert_eq!(user.email, "a@x.com");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_differing_in_case_conflicts() -> Result<()> {
    let resources = create_test_resources().await?;
    resources
        .identity
        .register(&registration("alice", "alice@example.com"))
        .await?;

    let err = resources
        .identity
        .register(&registration("bob", "ALICE@example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.details, json!({ "field": "email" }));
    Ok(())
}

#[tokio::test]
async fn test_invalid_registration_fields_are_rejected() -> Result<()> {
    let resources = create_test_resources().await?;

    let cases = [
        registration("al", "al@example.com"),
        registration("bad name", "bad@example.com"),
        registration("carol", "not-an-email"),
        registration("dave", "dave@localhost"),
        CreateUserRequest {
            username: "erin".to_owned(),
            email: "erin@example.com".to_owned(),
            password: "short".to_owned(),
        },
    ];

    for request in &cases {
        let err = resources.identity.register(request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidField, "{request:?}");
    }
    assert_eq!(resources.database.entity_counts().await?.users, 0);
    Ok(())
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_username() -> Result<()> {
    let resources = create_test_resources().await?;
    register_and_login(&resources, "alice").await?;

    let login = resources
        .identity
        .login(&LoginRequest {
            username: "ALICE".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await?;

    assert_eq!(login.user.username, "alice");
    assert_eq!(login.tokens.token_type, "bearer");
    Ok(())
}

#[tokio::test]
async fn test_login_failures_share_one_message() -> Result<()> {
    let resources = create_test_resources().await?;
    register_and_login(&resources, "alice").await?;

    let wrong_password = resources
        .identity
        .login(&LoginRequest {
            username: "alice".to_owned(),
            password: "not-the-password".to_owned(),
        })
        .await
        .unwrap_err();
    let unknown_user = resources
        .identity
        .login(&LoginRequest {
            username: "mallory".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap_err();

    for err in [wrong_password, unknown_user] {
        assert_eq!(err.code, ErrorCode::AuthInvalid);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }
    Ok(())
}

#[tokio::test]
async fn test_refresh_keeps_session_marker() -> Result<()> {
    let resources = create_test_resources().await?;
    let login = register_and_login(&resources, "alice").await?;
    let original = resources
        .identity
        .resolve_access_token(&login.tokens.access_token)
        .await?;

    let refreshed = resources
        .identity
        .refresh(&RefreshRequest {
            refresh_token: login.tokens.refresh_token.clone(),
        })
        .await?;
    let caller = resources
        .identity
        .resolve_access_token(&refreshed.access_token)
        .await?;

    assert_eq!(caller.user_id, original.user_id);
    assert_eq!(caller.session_marker, original.session_marker);
    Ok(())
}

#[tokio::test]
async fn test_each_login_opens_a_new_session_marker() -> Result<()> {
    let resources = create_test_resources().await?;
    let first = register_and_login(&resources, "alice").await?;
    let second = resources
        .identity
        .login(&LoginRequest {
            username: "alice".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await?;

    let a = resources
        .identity
        .resolve_access_token(&first.tokens.access_token)
        .await?;
    let b = resources
        .identity
        .resolve_access_token(&second.tokens.access_token)
        .await?;
    assert_ne!(a.session_marker, b.session_marker);
    Ok(())
}

#[tokio::test]
async fn test_token_kinds_are_not_interchangeable() -> Result<()> {
    let resources = create_test_resources().await?;
    let login = register_and_login(&resources, "alice").await?;

    let err = resources
        .identity
        .resolve_access_token(&login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let err = resources
        .identity
        .refresh(&RefreshRequest {
            refresh_token: login.tokens.access_token.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
    Ok(())
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() -> Result<()> {
    let resources = create_test_resources().await?;
    register_and_login(&resources, "alice").await?;

    let foreign = TokenManager::new(b"some-other-secret", 60, 60);
    let forged = foreign.issue(1, "alice", TokenKind::Access, "marker")?;

    let err = resources
        .identity
        .resolve_access_token(&forged)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
    Ok(())
}

#[tokio::test]
async fn test_deleted_identity_tokens_are_rejected() -> Result<()> {
    let resources = create_test_resources().await?;
    let login = register_and_login(&resources, "alice").await?;
    let caller = resources
        .identity
        .resolve_access_token(&login.tokens.access_token)
        .await?;

    assert_eq!(resources.identity.profile(&caller).await?.username, "alice");
    resources.identity.delete_account(&caller).await?;

    let err = resources
        .identity
        .resolve_access_token(&login.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let err = resources
        .identity
        .refresh(&RefreshRequest {
            refresh_token: login.tokens.refresh_token,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let err = resources.identity.delete_account(&caller).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_reregistered_username_rejects_earlier_tokens() -> Result<()> {
    let resources = create_test_resources().await?;
    let original = register_and_login(&resources, "alice").await?;
    let caller = resources
        .identity
        .resolve_access_token(&original.tokens.access_token)
        .await?;
    resources.identity.delete_account(&caller).await?;

    let successor = register_and_login(&resources, "alice").await?;
    assert_ne!(successor.user.id, original.user.id);

    let err = resources
        .identity
        .resolve_access_token(&original.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let err = resources
        .identity
        .refresh(&RefreshRequest {
            refresh_token: original.tokens.refresh_token,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let current = resources
        .identity
        .resolve_access_token(&successor.tokens.access_token)
        .await?;
    assert_eq!(current.user_id, successor.user.id);
    Ok(())
}
