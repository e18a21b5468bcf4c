//! In-process stand-in for the reqres.in API

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Running stub server; dropping it shuts the server down
pub struct ReqresStub {
    server: MockServer,
}

impl ReqresStub {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        mount_users(&server).await;
        mount_resources(&server).await;
        mount_auth(&server).await;
        Self { server }
    }

    /// Base URI matching the public API layout, e.g. `http://127.0.0.1:PORT/api`
    pub fn base_uri(&self) -> String {
        format!("{}/api", self.server.uri())
    }
}

/// Echoes the JSON request body back with a generated timestamp field
struct EchoBody {
    status: u16,
    stamp: &'static str,
    with_id: bool,
}

impl Respond for EchoBody {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut body = match serde_json::from_slice::<Value>(&request.body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if self.with_id {
            body.insert("id".to_string(), json!("742"));
        }
        body.insert(
            self.stamp.to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        ResponseTemplate::new(self.status).set_body_json(Value::Object(body))
    }
}

fn user(id: u32, email: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "first_name": first_name,
        "last_name": last_name,
        "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", id),
    })
}

fn page(page: u32, data: Vec<Value>) -> Value {
    json!({
        "page": page,
        "per_page": 6,
        "total": 12,
        "total_pages": 2,
        "data": data,
    })
}

/// Mocks are matched in mount order, so narrower matchers go first
async fn mount_users(server: &MockServer) {
    let second_page = vec![
        user(7, "michael.lawson@reqres.in", "Michael", "Lawson"),
        user(8, "lindsay.ferguson@reqres.in", "Lindsay", "Ferguson"),
        user(9, "tobias.funke@reqres.in", "Tobias", "Funke"),
        user(10, "byron.fields@reqres.in", "Byron", "Fields"),
        user(11, "george.edwards@reqres.in", "George", "Edwards"),
        user(12, "rachel.howell@reqres.in", "Rachel", "Howell"),
    ];
    let first_page = vec![
        user(1, "george.bluth@reqres.in", "George", "Bluth"),
        user(2, "janet.weaver@reqres.in", "Janet", "Weaver"),
        user(3, "emma.wong@reqres.in", "Emma", "Wong"),
        user(4, "eve.holt@reqres.in", "Eve", "Holt"),
        user(5, "charles.morris@reqres.in", "Charles", "Morris"),
        user(6, "tracey.ramos@reqres.in", "Tracey", "Ramos"),
    ];

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(2, second_page)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, first_page)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": user(2, "janet.weaver@reqres.in", "Janet", "Weaver"),
            "support": {
                "url": "https://reqres.in/#support-heading",
                "text": "To keep ReqRes free, contributions towards server costs are appreciated!"
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/23"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(EchoBody {
            status: 201,
            stamp: "createdAt",
            with_id: true,
        })
        .mount(server)
        .await;

    for verb in ["PUT", "PATCH"] {
        Mock::given(method(verb))
            .and(path_regex(r"^/api/users/\d+$"))
            .respond_with(EchoBody {
                status: 200,
                stamp: "updatedAt",
                with_id: false,
            })
            .mount(server)
            .await;
    }

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/users/\d+$"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

async fn mount_resources(server: &MockServer) {
    let colors = [
        (1, "cerulean", 2000, "#98B2D1", "15-4020"),
        (2, "fuchsia rose", 2001, "#C74375", "17-2031"),
        (3, "true red", 2002, "#BF1932", "19-1664"),
        (4, "aqua sky", 2003, "#7BC4C4", "14-4811"),
        (5, "tigerlily", 2004, "#E2583E", "17-1456"),
        (6, "blue turquoise", 2005, "#53B0AE", "15-5217"),
    ];
    let data = colors
        .iter()
        .map(|(id, name, year, color, pantone)| {
            json!({
                "id": id,
                "name": name,
                "year": year,
                "color": color,
                "pantone_value": pantone,
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/api/unknown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, data)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/unknown/23"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(server)
        .await;
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_string_contains("\"password\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "token": "QpwL5tke4Pnpja7X4"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Missing password"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_string_contains("\"password\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "QpwL5tke4Pnpja7X4"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Missing password"
        })))
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_serves_second_page() {
        let stub = ReqresStub::start().await;
        let body: Value = reqwest::get(format!("{}/users?page=2", stub.base_uri()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["page"], 2);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["data"][0]["first_name"], "Michael");
    }

    #[tokio::test]
    async fn test_stub_echoes_created_user() {
        let stub = ReqresStub::start().await;
        let response = reqwest::Client::new()
            .post(format!("{}/users", stub.base_uri()))
            .json(&json!({"name": "morpheus", "job": "leader"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["name"], "morpheus");
        assert!(body.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_stub_rejects_registration_without_password() {
        let stub = ReqresStub::start().await;
        let response = reqwest::Client::new()
            .post(format!("{}/register", stub.base_uri()))
            .json(&json!({"email": "sydney@fife"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
    }
}
