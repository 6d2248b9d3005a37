use crate::fixtures;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use kokoro::Config;
use kokoro_model::login::{Credentials, TokenResponse};
use kokoro_model::submission::AssessmentSubmission;
use kokoro_model::user::{NewUser, User};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const FAKE_EMAIL: &str = "ada@example.org";
pub const FAKE_PASSWORD: &str = "secret";
pub const FAKE_TOKEN: &str = "token-123";
pub const FAKE_ASSESSMENT_ID: &str = "abc123";

#[derive(Default)]
struct Recorded {
    submissions: Vec<AssessmentSubmission>,
    history_limits: Vec<u32>,
}

type Shared = Arc<Mutex<Recorded>>;

/// In process http server answering the assessment api the way the real service does.
///
/// Besides `phq9` and `gad7` it serves two faulty questionnaires: `broken`, whose first question has
/// more labels than scale values, and `garbled`, which is not json at all.
pub struct FakeApi {
    base_url: Url,
    recorded: Shared,
    handle: JoinHandle<()>,
}

impl FakeApi {
    pub async fn start() -> Self {
        let recorded = Shared::default();
        let router = router(Arc::clone(&recorded));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        tracing::debug!(%addr, "Fake api listening");
        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            recorded,
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    #[must_use]
    pub fn config(&self) -> Config {
        Config::new(self.base_url())
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<AssessmentSubmission> {
        self.recorded.lock().unwrap().submissions.clone()
    }

    #[must_use]
    pub fn history_limits(&self) -> Vec<u32> {
        self.recorded.lock().unwrap().history_limits.clone()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/assessment/questionnaires", get(list_questionnaires))
        .route("/api/v1/assessment/questionnaires/{id}", get(get_questionnaire))
        .route("/api/v1/assessment/start", post(start))
        .route("/api/v1/assessment/submit", post(submit))
        .route("/api/v1/results/assessment/{id}", get(result))
        .route("/api/v1/results/user/latest", get(latest))
        .route("/api/v1/results/user/history", get(history))
        .route("/api/v1/results/resources/{level}", get(resources))
        .with_state(recorded)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {FAKE_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
    }
}

async fn health() -> Response {
    Json(json!({ "status": "healthy", "service": "mental-health-risk-api" })).into_response()
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.email != FAKE_EMAIL || credentials.password != FAKE_PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    Json(TokenResponse {
        access_token: FAKE_TOKEN.to_owned(),
        token_type: "bearer".to_owned(),
        user: fixtures::user(),
    })
    .into_response()
}

async fn register(Json(new_user): Json<NewUser>) -> Response {
    if new_user.email == FAKE_EMAIL {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(User {
        id: "u-2".to_owned(),
        email: new_user.email,
        username: new_user.username,
        full_name: new_user.full_name,
        age: new_user.age,
        gender: new_user.gender,
        created_at: None,
    })
    .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    Json(fixtures::user()).into_response()
}

async fn list_questionnaires() -> Response {
    let summaries: Vec<_> = [fixtures::phq9(), fixtures::gad7()]
        .iter()
        .map(kokoro_model::questionnaire::Questionnaire::summary)
        .collect();
    Json(summaries).into_response()
}

async fn get_questionnaire(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "phq9" => Json(fixtures::phq9()).into_response(),
        "gad7" => Json(fixtures::gad7()).into_response(),
        "broken" => {
            let mut questionnaire = fixtures::phq9();
            questionnaire.id = "broken".to_owned();
            questionnaire.questions[0].labels.push("Always".to_owned());
            Json(questionnaire).into_response()
        }
        "garbled" => "<html>maintenance</html>".into_response(),
        _ => detail(StatusCode::NOT_FOUND, "Questionnaire not found"),
    }
}

async fn start(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    tracing::debug!(%body, "Fake assessment started");
    Json(json!({ "id": FAKE_ASSESSMENT_ID, "responses": {}, "status": "in_progress" })).into_response()
}

async fn submit(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(submission): Json<AssessmentSubmission>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    recorded.lock().unwrap().submissions.push(submission);
    Json(json!({
        "assessment_id": FAKE_ASSESSMENT_ID,
        "status": "completed",
        "risk_level": "medium",
        "risk_score": 45.5
    }))
    .into_response()
}

fn stored_result() -> Response {
    let mut result = fixtures::medium_risk();
    result.id = Some("r-1".to_owned());
    result.ml_model_used = Some("ensemble-v2".to_owned());
    Json(result).into_response()
}

async fn result(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    if id == FAKE_ASSESSMENT_ID {
        stored_result()
    } else {
        detail(StatusCode::NOT_FOUND, "Assessment not found")
    }
}

async fn latest(headers: HeaderMap) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    stored_result()
}

async fn history(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let limit = query.get("limit").and_then(|limit| limit.parse::<u32>().ok()).unwrap_or(10);
    recorded.lock().unwrap().history_limits.push(limit);
    let assessments: Vec<_> = (1..=limit.min(3))
        .map(|i| {
            json!({
                "id": format!("a-{i}"),
                "responses": { "q1": 2, "q2": 1 },
                "status": "completed",
                "completed_at": format!("2026-10-0{i}T09:30:00")
            })
        })
        .collect();
    Json(json!({ "count": assessments.len(), "assessments": assessments })).into_response()
}

async fn resources(headers: HeaderMap, Path(level): Path<String>) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let resources = match level.as_str() {
        "medium" => vec![
            json!({ "title": "Sleep hygiene", "content": "Keep a regular bedtime.", "category": "self-care" }),
            json!({ "title": "Talk to someone", "content": "Reach out to a counselor.", "category": "support" }),
        ],
        "high" | "critical" => vec![
            json!({ "title": "Crisis line", "content": "Call your local crisis line now.", "category": "crisis" }),
        ],
        _ => vec![],
    };
    Json(json!({ "risk_level": level, "resources": resources })).into_response()
}
