//! In-process mock of the PressureGuard REST API.
//!
//! Binds to a random local port and records every request it receives so
//! tests can assert on what the client actually put on the wire.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const LOGIN_TOKEN: &str = "tok-login";
pub const SIGNUP_TOKEN: &str = "tok-signup";
pub const RESET_TOKEN: &str = "tok-reset";
pub const GOOD_PASSWORD: &str = "s3cretpass";
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// One request as seen by the server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        init_logging();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request reached the mock server")
    }
}

/// A base URL on which nothing is listening
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A base URL whose server answers 200 and hangs up halfway through the body
pub fn truncated_body_base_url() -> String {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => seen.extend_from_slice(&buf[..n]),
            }
        }
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"partial\":",
        );
        let _ = stream.flush();
    });
    format!("http://{addr}")
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pressureguard_api_client=debug")
        .with_test_writer()
        .try_init();
}

fn user(name: &str, email: &str) -> Value {
    json!({
        "_id": "665f1c2e9b1d",
        "name": name,
        "email": email,
        "phone": "01000000000",
        "role": "patient",
        "dateOfBirth": "1990-03-07T00:00:00.000Z",
        "gender": "female"
    })
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    };
    state.requests.lock().unwrap().push(recorded.clone());

    let expected_auth = format!("Bearer {LOGIN_TOKEN}");
    let authorized = recorded.authorization.as_deref() == Some(expected_auth.as_str());

    match uri.path() {
        "/api/users/login" => {
            if body["password"] == GOOD_PASSWORD {
                let email = body["email"].as_str().unwrap_or_default();
                reply(
                    StatusCode::OK,
                    json!({"status": "success", "token": LOGIN_TOKEN, "data": {"user": user("Mona", email)}}),
                )
            } else {
                reply(
                    StatusCode::UNAUTHORIZED,
                    json!({"status": "fail", "message": "Incorrect email or password"}),
                )
            }
        }
        "/api/users/signup" => {
            if body["email"] == TAKEN_EMAIL {
                reply(StatusCode::CONFLICT, json!({"message": "E11000 duplicate key"}))
            } else if body["name"].as_str().unwrap_or_default().is_empty() {
                reply(
                    StatusCode::BAD_REQUEST,
                    json!({"status": "fail", "message": "Please tell us your name"}),
                )
            } else {
                let name = body["name"].as_str().unwrap_or_default();
                let email = body["email"].as_str().unwrap_or_default();
                reply(
                    StatusCode::CREATED,
                    json!({"status": "success", "token": SIGNUP_TOKEN, "data": {"user": user(name, email)}}),
                )
            }
        }
        "/api/users/getMe" => {
            if authorized {
                reply(
                    StatusCode::OK,
                    json!({"status": "success", "data": {"user": user("Mona", "mona@example.com")}}),
                )
            } else {
                reply(
                    StatusCode::UNAUTHORIZED,
                    json!({"status": "fail", "message": "You are not logged in"}),
                )
            }
        }
        "/api/users/updateMe" => {
            if authorized {
                let name = body["name"].as_str().unwrap_or("Mona");
                reply(
                    StatusCode::OK,
                    json!({"status": "success", "data": {"user": user(name, "mona@example.com")}}),
                )
            } else {
                reply(StatusCode::UNAUTHORIZED, json!({"message": "You are not logged in"}))
            }
        }
        "/api/users/logout" => reply(StatusCode::OK, json!({"status": "success"})),
        "/api/users/forgotPassword" => reply(
            StatusCode::OK,
            json!({"status": "success", "message": "Token sent to email!"}),
        ),
        "/api/users/resetPassword" => {
            if body["token"] == "good-reset-token" {
                reply(
                    StatusCode::OK,
                    json!({"status": "success", "token": RESET_TOKEN, "data": {"user": user("Mona", "mona@example.com")}}),
                )
            } else {
                reply(
                    StatusCode::BAD_REQUEST,
                    json!({"status": "fail", "message": "Token is invalid or has expired"}),
                )
            }
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            reply(StatusCode::OK, json!({"late": true}))
        }
        "/text" => (StatusCode::OK, "pong").into_response(),
        "/empty" => StatusCode::NO_CONTENT.into_response(),
        path if path.starts_with("/status/") => {
            let code: u16 = path.trim_start_matches("/status/").parse().unwrap_or(500);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if uri.query() == Some("bare") {
                reply(status, json!({}))
            } else {
                reply(status, json!({"message": format!("server says {code}")}))
            }
        }
        _ => reply(
            StatusCode::OK,
            json!({
                "method": recorded.method,
                "path": recorded.path,
                "authorization": recorded.authorization,
                "body": recorded.body,
            }),
        ),
    }
}
