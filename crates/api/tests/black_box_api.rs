use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, COOKIE, LOCATION, SET_COOKIE};
use serde_json::{Value, json};

use awap_api::config::AppConfig;

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod: in-memory stores seeded with the dev accounts.
        Self::spawn_with(AppConfig::for_tests(SECRET)).await
    }

    async fn spawn_with(config: AppConfig) -> Self {
        let app = awap_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: format!("http://{addr}"),
            client,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn token_for(&self, email: &str, password: &str) -> String {
        let res = self.login(email, password).await;
        assert_eq!(res.status(), StatusCode::OK, "login failed for {email}");
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.unwrap()
    }

    async fn post(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_token(secret: &str, role: &str) -> String {
    let now = Utc::now();
    let payload = json!({
        "id": 1,
        "email": "admin@awap.com",
        "name": "Admin User",
        "role": role,
        "iat": now.timestamp(),
        "exp": (now + ChronoDuration::minutes(10)).timestamp(),
        "jti": "0192f3a4-0000-7000-8000-000000000000",
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn location(res: &reqwest::Response) -> &str {
    res.headers().get(LOCATION).unwrap().to_str().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Sign-in
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_returns_public_user_token_and_cookie() {
    let srv = TestServer::spawn().await;
    let res = srv.login("admin@awap.com", "admin123").await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("awap.session-token="), "{cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("; Secure"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "admin@awap.com");
    assert_eq!(body["user"]["role"], "super_admin");
    assert_eq!(body["user"]["department"], "Administration");
    assert_eq!(body["redirect_to"], "/admin");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let srv = TestServer::spawn().await;

    let wrong = srv.login("manager@awap.com", "not-the-password").await;
    let unknown = srv.login("nobody@awap.com", "manager123").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let wrong: Value = wrong.json().await.unwrap();
    let unknown: Value = unknown.json().await.unwrap();
    assert_eq!(wrong["error"], "authentication_failed");
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn login_without_credentials_is_bad_request() {
    let srv = TestServer::spawn().await;
    let res = srv.post("/api/auth/login", None, json!({ "email": "admin@awap.com" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_credentials");

    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let srv = TestServer::spawn().await;
    let res = srv.post("/api/auth/logout", None, json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("awap.session-token="));
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_requires_a_valid_token() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/api/auth/session", None).await.status(), StatusCode::UNAUTHORIZED);

    let forged = mint_token("some-other-secret", "super_admin");
    assert_eq!(
        srv.get("/api/auth/session", Some(&forged)).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let mut tampered = srv.token_for("hr@awap.com", "hr1234").await;
    tampered.push('x');
    assert_eq!(
        srv.get("/api/auth/session", Some(&tampered)).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn session_reports_claims_and_role_view() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("lnd@awap.com", "lnd123").await;

    let res = srv.get("/api/auth/session", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "lnd@awap.com");
    assert_eq!(body["user"]["role"], "lnd");
    assert_eq!(body["user"]["department"], "Learning & Development");
    assert_eq!(body["view"]["title"], "Learning & Development Dashboard");
    assert_eq!(body["view"]["color"], "purple");
    assert_eq!(body["default_route"], "/dashboard");
    assert!(body["permissions"].as_array().unwrap().iter().any(|p| p == "manageTraining"));
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("manager@awap.com", "manager123").await;

    let res = srv
        .client
        .get(srv.url("/api/auth/session"))
        .header(COOKIE, format!("awap.session-token={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"]["title"], "Team Performance Dashboard");
}

#[tokio::test]
async fn secure_cookie_flag_follows_config() {
    let mut config = AppConfig::for_tests(SECRET);
    config.secure_cookies = true;
    let srv = TestServer::spawn_with(config).await;

    let res = srv.login("hr@awap.com", "hr1234").await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("; Secure"), "{cookie}");
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn stale_cookie_does_not_hide_valid_bearer() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("manager@awap.com", "manager123").await;
    let stale = mint_token("rotated-secret", "manager");

    let res = srv
        .client
        .get(srv.url("/api/auth/session"))
        .header(COOKIE, format!("awap.session-token={stale}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "manager@awap.com");
}

// ─────────────────────────────────────────────────────────────────────────────
// Gate
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_redirect_anonymous_users_to_sign_in() {
    let srv = TestServer::spawn().await;
    for path in ["/dashboard", "/dashboard/sentiment", "/admin", "/admin/users"] {
        let res = srv.get(path, None).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&res), "/auth/signin", "{path}");
    }
}

#[tokio::test]
async fn admin_pages_send_other_roles_to_their_dashboard() {
    let srv = TestServer::spawn().await;
    let hr = srv.token_for("hr@awap.com", "hr1234").await;
    let admin = srv.token_for("admin@awap.com", "admin123").await;

    let res = srv.get("/admin/users", Some(&hr)).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/dashboard");

    let res = srv.get("/admin/users", Some(&admin)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"], "admin");
    assert_eq!(body["view"]["title"], "System Administration");

    let res = srv.get("/dashboard", Some(&hr)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["view"]["title"], "HR Analytics Dashboard");
}

#[tokio::test]
async fn signin_page_is_public_and_bounces_signed_in_users() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/auth/signin", None).await.status(), StatusCode::OK);

    let admin = srv.token_for("admin@awap.com", "admin123").await;
    let res = srv.get("/auth/signin", Some(&admin)).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/admin");
}

#[tokio::test]
async fn admin_api_denies_with_json_401() {
    let srv = TestServer::spawn().await;
    let manager = srv.token_for("manager@awap.com", "manager123").await;

    for token in [None, Some(manager.as_str())] {
        let res = srv.get("/api/admin/users", token).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "unauthorized");
    }

    // Even a correctly signed token for a made-up role is rejected.
    let bogus = mint_token(SECRET, "root");
    assert_eq!(
        srv.get("/api/admin/users", Some(&bogus)).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_rules() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin@awap.com", "admin123").await;

    let weak = srv
        .post("/api/auth/signup", None, json!({ "name": "A", "email": "a@x.com", "password": "abc" }))
        .await;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    let body: Value = weak.json().await.unwrap();
    assert_eq!(body["error"], "weak_password");

    let dup = srv
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Impostor", "email": "admin@awap.com", "password": "whatever1" }),
        )
        .await;
    assert_eq!(dup.status(), StatusCode::BAD_REQUEST);
    let body: Value = dup.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_account");

    let escalate = srv
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Eve", "email": "eve@x.com", "password": "secret1", "role": "super_admin" }),
        )
        .await;
    assert_eq!(escalate.status(), StatusCode::BAD_REQUEST);
    let body: Value = escalate.json().await.unwrap();
    assert_eq!(body["error"], "invalid_input");

    let res = srv.get("/api/admin/users/count", Some(&admin)).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 4);

    // The seeded admin still signs in with the original password.
    assert_eq!(srv.login("admin@awap.com", "admin123").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_then_sign_in() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Ana", "email": "Ana@X.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "ana@x.com");
    assert_eq!(body["user"]["role"], "hr");
    assert_eq!(body["user"]["department"], "General");

    let token = srv.token_for("ana@x.com", "secret1").await;
    let res = srv.get("/dashboard", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_can_create_and_list_users() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin@awap.com", "admin123").await;

    let res = srv
        .post(
            "/api/admin/users",
            Some(&admin),
            json!({
                "name": "Second Admin",
                "email": "admin2@awap.com",
                "password": "admin456",
                "role": "super_admin",
                "department": "Administration",
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let missing = srv
        .post("/api/admin/users", Some(&admin), json!({ "name": "X", "email": "x@awap.com" }))
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let res = srv.get("/api/admin/users", Some(&admin)).await;
    let body: Value = res.json().await.unwrap();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 5);
    assert_eq!(users[0]["email"], "admin2@awap.com");
    assert!(users.iter().all(|u| u.get("password").is_none()));

    let res = srv.get("/api/admin/logs", Some(&admin)).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["logs"][0]["action_type"], "user_create");
    assert_eq!(body["logs"][0]["admin_name"], "Admin User");
}

#[tokio::test]
async fn toggle_status_disables_sign_in_and_is_audited() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin@awap.com", "admin123").await;
    let hr_token = srv.token_for("hr@awap.com", "hr1234").await;

    let users: Value = srv.get("/api/admin/users", Some(&admin)).await.json().await.unwrap();
    let hr_id = users["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "hr@awap.com")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let res = srv
        .post(&format!("/api/admin/users/{hr_id}/toggle-status"), Some(&admin), json!({}))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "disabled");
    assert_eq!(body["message"], "User disabled successfully");

    assert_eq!(srv.login("hr@awap.com", "hr1234").await.status(), StatusCode::UNAUTHORIZED);

    // Already-issued tokens keep their claims until they expire.
    assert_eq!(srv.get("/dashboard", Some(&hr_token)).await.status(), StatusCode::OK);

    let logs: Value = srv.get("/api/admin/logs", Some(&admin)).await.json().await.unwrap();
    assert_eq!(logs["logs"][0]["action_type"], "user_status_change");
    assert_eq!(logs["logs"][0]["target_id"], hr_id);

    let res = srv
        .post(&format!("/api/admin/users/{hr_id}/toggle-status"), Some(&admin), json!({}))
        .await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "active");
    assert_eq!(srv.login("hr@awap.com", "hr1234").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn toggle_status_rejects_unknown_and_malformed_ids() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin@awap.com", "admin123").await;

    let res = srv.post("/api/admin/users/999/toggle-status", Some(&admin), json!({})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv.post("/api/admin/users/abc/toggle-status", Some(&admin), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url("/api/admin/users/1/toggle-status"))
        .header(AUTHORIZATION, "Bearer not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
