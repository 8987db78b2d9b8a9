mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use stockroom_core::Role;

#[tokio::test]
async fn test_owner_creates_user_without_leaking_hash() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, user) = app
        .post(
            "/api/users",
            &token,
            json!({
                "name": "Sam Clerk",
                "email": "  Sam@Shop.Example ",
                "password": "secret1",
                "role": "SHOPKEEPER",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "sam@shop.example");
    assert_eq!(user["role"], "SHOPKEEPER");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let (status, users) = app.get("/api/users", &token).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    // Newest first.
    assert_eq!(users[0]["email"], "sam@shop.example");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, body) = app
        .post(
            "/api/users",
            &token,
            json!({
                "name": "Other Owner",
                "email": "owner@shop.example",
                "password": "secret1",
                "role": "OWNER",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "User with this email already exists: 'owner@shop.example'"
    );
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, body) = app
        .post("/api/users", &token, json!({"name": "Sam", "email": "sam@shop.example"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: password, role");

    let (status, _) = app
        .post(
            "/api/users",
            &token,
            json!({"name": "Sam", "email": "not-an-email", "password": "secret1", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/users",
            &token,
            json!({"name": "Sam", "email": "sam@shop.example", "password": "12345", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/users",
            &token,
            json!({"name": "Sam", "email": "sam@shop.example", "password": "secret1", "role": "ADMIN"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_owner_is_forbidden() {
    let app = TestApp::new().await;
    let (_, clerk) = app.user("clerk@shop.example", Role::Shopkeeper).await;
    let (_, stocker) = app.user("stock@shop.example", Role::Warehouse).await;

    for token in [&clerk, &stocker] {
        let (status, body) = app.get("/api/users", token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["kind"], "forbidden");
    }

    let (status, _) = app
        .post(
            "/api/users",
            &clerk,
            json!({"name": "Sam", "email": "sam@shop.example", "password": "secret1", "role": "OWNER"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_keeps_password_when_blank() {
    let app = TestApp::new().await;
    let token = app.owner().await;
    let (clerk, _) = app.user("clerk@shop.example", Role::Shopkeeper).await;
    let uri = format!("/api/users/{}", clerk.id);

    // Same email on the same account is not a conflict.
    let (status, updated) = app
        .put(
            &uri,
            &token,
            json!({"name": "Clerk Renamed", "email": "clerk@shop.example", "password": "", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Clerk Renamed");
    assert_eq!(updated["role"], "WAREHOUSE");

    let (status, _) = app
        .call(
            axum::http::Method::POST,
            "/api/auth/signin",
            None,
            Some(json!({"email": "clerk@shop.example", "password": common::PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(
            &uri,
            &token,
            json!({"name": "Clerk", "email": "owner@shop.example", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            "/api/users/missing",
            &token,
            json!({"name": "Nobody", "email": "nobody@shop.example", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_change_applies_to_existing_session() {
    let app = TestApp::new().await;
    let token = app.owner().await;
    let (clerk, clerk_token) = app.user("clerk@shop.example", Role::Shopkeeper).await;

    let (status, _) = app.post("/api/inventory", &clerk_token, json!({
        "itemCode": "A-1", "itemDesc": "A", "salePrice": 1, "costPrice": 1, "stock": 1,
    })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.put(
        &format!("/api/users/{}", clerk.id),
        &token,
        json!({"name": "Clerk", "email": "clerk@shop.example", "role": "WAREHOUSE"}),
    )
    .await;

    let (status, _) = app.post("/api/inventory", &clerk_token, json!({
        "itemCode": "A-1", "itemDesc": "A", "salePrice": 1, "costPrice": 1, "stock": 1,
    })).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_user_keeps_their_records() {
    let app = TestApp::new().await;
    let token = app.owner().await;
    let (clerk, clerk_token) = app.user("clerk@shop.example", Role::Shopkeeper).await;

    let (_, category) = app.post("/api/categories", &clerk_token, json!({"name": "Pens"})).await;

    let (status, body) = app.delete(&format!("/api/users/{}", clerk.id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, category) = app
        .get(&format!("/api/categories/{}", category["id"].as_str().unwrap()), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(category["createdById"].is_null());
    assert!(category["creator"].is_null());

    // The deleted user's token stops working.
    let (status, _) = app.get("/api/categories", &clerk_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.delete(&format!("/api/users/{}", clerk.id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_accounts_cannot_be_deleted() {
    let app = TestApp::new().await;
    let token = app.owner().await;
    let (other_owner, _) = app.user("second@shop.example", Role::Owner).await;

    let (status, body) = app
        .delete(&format!("/api/users/{}", other_owner.id), &token)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Owner accounts cannot be deleted");
}

#[tokio::test]
async fn test_other_owner_cannot_be_demoted() {
    let app = TestApp::new().await;
    let token = app.owner().await;
    let (other_owner, other_token) = app.user("second@shop.example", Role::Owner).await;
    let uri = format!("/api/users/{}", other_owner.id);

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({"name": "Second", "email": "second@shop.example", "role": "SHOPKEEPER"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Owner accounts cannot be demoted");

    // Demote-then-delete stays closed.
    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Renaming without a role change is fine, and so is lowering your own role.
    let (status, _) = app
        .put(
            &uri,
            &token,
            json!({"name": "Second Owner", "email": "second@shop.example", "role": "OWNER"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, updated) = app
        .put(
            &uri,
            &other_token,
            json!({"name": "Second Owner", "email": "second@shop.example", "role": "WAREHOUSE"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "WAREHOUSE");
}
