use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;
use hotel_service::domain::auth::service::AuthService;
use hotel_service::domain::order::service::OrderService;
use hotel_service::domain::user::models::CredentialRecord;
use hotel_service::domain::user::models::Identity;
use hotel_service::domain::user::models::Profile;
use hotel_service::domain::user::models::Role;
use hotel_service::domain::user::models::Uid;
use hotel_service::domain::user::models::Username;
use hotel_service::domain::user::ports::CredentialStore;
use hotel_service::domain::user::service::UserService;
use hotel_service::inbound::http::router::create_router;
use hotel_service::inbound::http::router::AppState;
use hotel_service::outbound::repositories::InMemoryCredentialStore;
use hotel_service::outbound::repositories::InMemoryOrderRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const API_TOKEN: &str = "test-api-token";
pub const PASSWORD: &str = "secret";

/// Test application that spawns a real server on in-memory stores.
///
/// Seeded accounts, all with password `secret`:
/// `dev` (supervisor), `frontdesk` (employee), `101` (guest),
/// `retired` (disabled supervisor), `root` (admin), `ghost` (no role).
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub store: Arc<InMemoryCredentialStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(allow_admin_scope_escalation: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryCredentialStore::new());
        seed_accounts(&store).await;

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET, Duration::minutes(60 * 24)));
        let credential_store: Arc<dyn CredentialStore> = store.clone();

        let state = AppState {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&credential_store),
                authenticator,
                allow_admin_scope_escalation,
            )),
            user_service: Arc::new(UserService::new(credential_store)),
            order_service: Arc::new(OrderService::new(Arc::new(InMemoryOrderRepository::new()))),
            api_token: API_TOKEN.to_string(),
        };

        let router = create_router(state, &["http://localhost:3000".to_string()]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET),
            store,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// GET on a route group that requires the API token
    pub fn gated_get(&self, path: &str) -> reqwest::RequestBuilder {
        self.get(path).header("X-API-TOKEN", API_TOKEN)
    }

    pub fn gated_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.post(path).header("X-API-TOKEN", API_TOKEN)
    }

    pub fn gated_put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(self.url(path))
            .header("X-API-TOKEN", API_TOKEN)
    }

    pub fn gated_delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(self.url(path))
            .header("X-API-TOKEN", API_TOKEN)
    }

    /// POST /auth/token
    pub async fn login(&self, username: &str, password: &str, scopes: &[&str]) -> reqwest::Response {
        self.post("/auth/token")
            .json(&json!({
                "username": username,
                "password": password,
                "scopes": scopes,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in with the seeded password and return the access token.
    pub async fn token_for(&self, username: &str, scopes: &[&str]) -> String {
        let response = self.login(username, PASSWORD, scopes).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "login as {}", username);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    /// Sign a token directly, bypassing login policy.
    pub fn forge_token(&self, username: &str, scopes: &[&str]) -> String {
        let claims = auth::Claims::for_subject(username, scopes.iter().copied(), Duration::hours(1));
        self.jwt_handler.encode(&claims).expect("Failed to encode token")
    }

    pub async fn uid_of(&self, username: &str) -> String {
        self.store
            .find_by_username(&Username::new(username.to_string()).unwrap())
            .await
            .unwrap()
            .expect("seeded account missing")
            .identity
            .uid
            .to_string()
    }
}

async fn seed_accounts(store: &InMemoryCredentialStore) {
    let hash = auth::PasswordHasher::new()
        .hash(PASSWORD)
        .expect("Failed to hash password");

    let accounts = [
        ("dev", Some(Role::Supervisor), false, None),
        ("frontdesk", Some(Role::Employee), false, None),
        ("101", Some(Role::Guest), false, Some("101")),
        ("retired", Some(Role::Supervisor), true, None),
        ("root", Some(Role::Admin), false, None),
        ("ghost", None, false, None),
    ];

    for (index, (username, role, disabled, room)) in accounts.into_iter().enumerate() {
        let record = CredentialRecord {
            identity: Identity {
                uid: Uid::new(),
                username: Username::new(username.to_string()).unwrap(),
                role,
                position: None,
                disabled,
            },
            profile: Profile {
                room_number: room.map(str::to_string),
                ..Profile::default()
            },
            password_hash: hash.clone(),
            // Distinct timestamps keep listing order stable.
            created_at: Utc::now() + Duration::milliseconds(index as i64),
        };
        store.insert(record).await.expect("Failed to seed account");
    }
}
