use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use dscommerce_api::app::{build_app, services::AppServices};
use dscommerce_core::ProductId;
use dscommerce_infra::InMemoryCatalogStore;
use dscommerce_products::fixtures;

struct TestServer {
    base_url: String,
    store: Arc<InMemoryCatalogStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over the seeded catalog, bound to an ephemeral port.
        let store = Arc::new(InMemoryCatalogStore::seeded());
        let app = build_app(Arc::new(AppServices::new(store.clone(), 20)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn new_product_body() -> Value {
    json!({
        "name": "Console PlayStation 5",
        "description": "Next generation console with an SSD drive",
        "price": 3999.0,
        "imgUrl": "img/ps5.jpg",
        "categories": [{ "id": 2 }]
    })
}

#[tokio::test]
async fn health_is_ok_and_echoes_request_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "req-42");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn list_products_filters_by_name_and_pages() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/products?name=pc&size=1&sort=price,desc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["size"], 1);
    assert_eq!(body["numberOfElements"], 1);
    assert_eq!(body["content"][0]["name"], "PC Gamer Ex");
    // Listing items are the reduced representation.
    assert!(body["content"][0].get("description").is_none());
    assert!(body["content"][0].get("imgUrl").is_some());
}

#[tokio::test]
async fn list_products_without_filter_returns_everything() {
    let srv = TestServer::spawn().await;

    let body: Value = reqwest::get(srv.url("/products"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalElements"], 6);
    assert_eq!(body["size"], 20);
    assert_eq!(body["content"][0]["id"], 1);
}

#[tokio::test]
async fn list_products_rejects_unknown_sort() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/products?sort=stock")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_sort");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn get_product_by_id() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/products/2")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], 2);
    assert_eq!(body["name"], "Smart TV");
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_missing_product_is_404() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/products/1000")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Resource not found");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn malformed_id_is_400() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/products/abc")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn create_product_assigns_id_and_location() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut payload = new_product_body();
    payload["id"] = json!(1);

    let res = client
        .post(srv.url("/products"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["location"], "/products/7");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["categories"][0]["name"], "Eletrônicos");

    // The caller-supplied id did not overwrite product 1.
    let existing: Value = reqwest::get(srv.url("/products/1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(existing["name"], "The Lord of the Rings");
}

#[tokio::test]
async fn create_product_accepts_fixture_dto() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(srv.url("/products"))
        .json(&fixtures::product_dto())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Console PlayStation 5");
    // Category 1 resolves to the stored category, not the one in the body.
    assert_eq!(body["categories"][0]["name"], "Livros");
}

#[tokio::test]
async fn create_product_reports_every_invalid_field() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(srv.url("/products"))
        .json(&json!({
            "name": "PS",
            "description": "short",
            "price": -1.0,
            "categories": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["fieldName"].as_str().unwrap())
        .collect();
    for field in ["name", "description", "price", "categories"] {
        assert!(fields.contains(&field), "missing error for {field}");
    }
}

#[tokio::test]
async fn create_product_with_unknown_category_is_400() {
    let srv = TestServer::spawn().await;

    let mut payload = new_product_body();
    payload["categories"] = json!([{ "id": 99 }]);

    let res = reqwest::Client::new()
        .post(srv.url("/products"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(srv.store.len(), 6);
}

#[tokio::test]
async fn update_product_keeps_id_and_categories() {
    let srv = TestServer::spawn().await;

    let mut payload = new_product_body();
    payload["id"] = json!(42);

    let res = reqwest::Client::new()
        .put(srv.url("/products/3"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Console PlayStation 5");
    assert_eq!(body["price"], 3999.0);
    assert_eq!(body["categories"][0]["name"], "Computadores");
}

#[tokio::test]
async fn update_missing_product_is_404() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .put(srv.url("/products/1000"))
        .json(&new_product_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.delete(srv.url("/products/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/products/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(srv.url("/products/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_ordered_product_is_400() {
    let srv = TestServer::spawn().await;
    srv.store.mark_ordered(ProductId::new(5));

    let res = reqwest::Client::new()
        .delete(srv.url("/products/5"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "integrity_violation");
    assert_eq!(srv.store.len(), 6);
}

#[tokio::test]
async fn list_categories() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/categories")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Livros", "Eletrônicos", "Computadores"]);
}
