mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use stockroom_core::Role;
use tower::ServiceExt;

#[tokio::test]
async fn test_category_lifecycle() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, created) = app.post("/api/categories", &token, json!({"name": "Pens"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Pens");
    assert_eq!(created["creator"]["name"], "owner user");

    let (status, fetched) = app.get(&format!("/api/categories/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .put(
            &format!("/api/categories/{}", id),
            &token,
            json!({"name": "Pens", "description": "Writing"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Writing");

    let (status, body) = app.delete(&format!("/api/categories/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted successfully");

    let (status, body) = app.get(&format!("/api/categories/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (first, _) = app.post("/api/categories", &token, json!({"name": "Pens"})).await;
    let (second, body) = app.post("/api/categories", &token, json!({"name": "Pens"})).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
    assert_eq!(body["message"], "Category name already exists: 'Pens'");
}

#[tokio::test]
async fn test_rename_onto_other_category_conflicts() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    app.post("/api/categories", &token, json!({"name": "Pens"})).await;
    let (_, paper) = app.post("/api/categories", &token, json!({"name": "Paper"})).await;
    let paper_uri = format!("/api/categories/{}", paper["id"].as_str().unwrap());

    let (status, _) = app.put(&paper_uri, &token, json!({"name": "Pens"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.put(&paper_uri, &token, json!({"name": "Paper"})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_refused_while_items_use_it() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (_, category) = app.post("/api/categories", &token, json!({"name": "Pens"})).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    for code in ["PEN-1", "PEN-2", "PEN-3"] {
        let (status, _) = app
            .post(
                "/api/inventory",
                &token,
                json!({
                    "itemCode": code,
                    "itemDesc": "Pen",
                    "salePrice": 1.5,
                    "costPrice": 0.8,
                    "stock": 10,
                    "categoryId": category_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/categories/{}", category_id);
    let (status, body) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Cannot delete category: it is used by 3 inventory item(s)"
    );

    let (status, _) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_category_is_not_found() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, _) = app.delete("/api/categories/nope", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put("/api/categories/nope", &token, json!({"name": "X"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_sorted_and_open_to_every_role() {
    let app = TestApp::new().await;
    let (_, clerk) = app.user("clerk@shop.example", Role::Shopkeeper).await;

    for name in ["Toys", "Art", "Paper"] {
        let (status, _) = app.post("/api/categories", &clerk, json!({"name": name})).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/categories", &clerk).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Art", "Paper", "Toys"]);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let (status, body) = app.post("/api/categories", &token, json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let long = "x".repeat(101);
    let (status, _) = app.post("/api/categories", &token, json!({"name": long})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let app = TestApp::new().await;
    let token = app.owner().await;

    let response = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(Method::POST)
                .uri("/api/categories")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::parse_body(response).await;
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_requires_session() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) = app
        .call(Method::GET, "/api/categories", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_names_create_one() {
    let app = TestApp::with_file_database().await;
    let token = app.owner().await;

    for round in 0..5 {
        let name = format!("Pens {}", round);
        let body = json!({"name": name});
        let ((first, _), (second, _)) = tokio::join!(
            app.post("/api/categories", &token, body.clone()),
            app.post("/api/categories", &token, body.clone()),
        );

        let mut statuses = [first, second];
        statuses.sort();
        assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT], "{}", name);
    }

    let (_, list) = app.get("/api/categories", &token).await;
    assert_eq!(list.as_array().unwrap().len(), 5);
}
