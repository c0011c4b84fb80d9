//! Mock academy backend for testing
//!
//! Thin layer over wiremock with canned envelopes for the academy REST API.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock academy API server
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// `GET /health` answering 200
    pub async fn mock_health(&self) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&self.server)
            .await;
    }

    /// Any GET on `route` answering `body`
    pub async fn mock_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_get_delayed(&self, route: &str, body: Value, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `DELETE route` answering `{success: true}`
    pub async fn mock_delete_ok(&self, route: &str) {
        self.mock_status("DELETE", route, 200, json!({"success": true})).await;
    }

    /// Requests received so far for a method and path
    pub async fn received(&self, verb: &str, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .count()
    }

    /// JSON bodies of the requests received for a method and path
    pub async fn bodies(&self, verb: &str, route: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}

/// Paginated list envelope with top-level pagination fields
pub fn page_envelope(items: Vec<Value>, count: u64, page: u32, page_size: u32) -> Value {
    let total_pages = ((count + u64::from(page_size) - 1) / u64::from(page_size)).max(1);
    json!({
        "success": true,
        "data": items,
        "count": count,
        "page": page,
        "pageSize": page_size,
        "totalPages": total_pages,
    })
}

pub fn ok_envelope(data: Value) -> Value {
    json!({"success": true, "data": data})
}

pub fn activity_json(id: &str, title: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("Descrição de {}", title),
        "type": kind,
        "difficulty": 2,
        "duration": 15,
        "equipment": ["luvas"],
    })
}

pub fn activities(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| activity_json(&format!("a{}", i), &format!("Técnica {}", i), "TECHNIQUE"))
        .collect()
}

pub fn unit_json(id: &str, name: &str, city: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "city": city,
        "state": "SP",
        "phone": "11987654321",
        "status": "active",
    })
}

pub fn student_json(id: u64, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "user": {"firstName": first, "lastName": last, "email": format!("{}@ex.com", first.to_lowercase()), "phone": "11987654321"},
        "category": "ADULT",
        "isActive": true,
    })
}
