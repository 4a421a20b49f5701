use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::assistant::{Advisor, AdvisorClient, AdvisorReply, AssistantError, ChatRole, ChatTurn};
use crate::identity::{bearer_token, AuthenticatedUser, IdentityProvider};
use crate::ledger::{
    CategoryCatalog, LedgerService, LedgerServiceError, RepositoryError, TransactionRepository,
};

/// Everything the finance endpoints need: the ledger, who is asking, and the
/// advisor.
pub struct FinanceApp<R, I, C> {
    pub ledger: LedgerService<R>,
    pub identity: Arc<I>,
    pub advisor: Advisor<C>,
}

impl<R, I, C> FinanceApp<R, I, C>
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    pub fn new(repository: Arc<R>, identity: Arc<I>, advisor: Arc<C>) -> Self {
        Self {
            ledger: LedgerService::new(repository),
            identity,
            advisor: Advisor::new(advisor),
        }
    }
}

/// Router builder exposing the ledger, scoring, and advisor endpoints.
pub fn finance_router<R, I, C>(app: Arc<FinanceApp<R, I, C>>) -> Router
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    Router::new()
        .route(
            "/api/transactions",
            get(list_transactions_handler::<R, I, C>).post(create_transaction_handler::<R, I, C>),
        )
        .route("/api/me", get(me_handler::<R, I, C>))
        .route("/api/logout", post(logout_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/analysis/score", get(score_handler::<R, I, C>))
        .route("/api/analysis/insight", post(insight_handler::<R, I, C>))
        .route("/api/analysis/deep", post(deep_analysis_handler::<R, I, C>))
        .route("/api/chat", post(chat_handler::<R, I, C>))
        .with_state(app)
}

async fn authenticate<R, I, C>(
    app: &FinanceApp<R, I, C>,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, Response>
where
    I: IdentityProvider + 'static,
{
    let Some(token) = bearer_token(headers) else {
        return Err(unauthorized());
    };
    match app.identity.resolve(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(unauthorized()),
        Err(err) => {
            warn!(error = %err, "treating failed identity lookup as unauthorized");
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn ledger_error_response(err: LedgerServiceError) -> Response {
    match err {
        LedgerServiceError::Validation(error) => bad_request(error.to_string()),
        LedgerServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            error!(%reason, "transaction store unavailable");
            let payload = json!({
                "error": "Transactions temporarily unavailable",
                "code": "TX_STORE_UNAVAILABLE",
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        LedgerServiceError::Repository(other) => {
            error!(error = %other, "transactions request failed");
            let payload = json!({
                "error": "Transactions request failed",
                "code": "TX_UNKNOWN_ERROR",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn advisor_response(outcome: Result<AdvisorReply, AssistantError>) -> Response {
    match outcome {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => {
            warn!(error = %err, "advisor unavailable");
            let payload = json!({
                "error": err.to_string(),
                "code": "AI_NOT_CONFIGURED",
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_transactions_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    match app.ledger.list(&user.user_id) {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(err) => ledger_error_response(err),
    }
}

pub(crate) async fn create_transaction_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    match app.ledger.create_from_payload(&user.user_id, &body) {
        Ok(transaction) => {
            (StatusCode::OK, Json(json!({ "transaction": transaction }))).into_response()
        }
        Err(err) => ledger_error_response(err),
    }
}

pub(crate) async fn me_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let payload = json!({
        "user": {
            "id": user.user_id.0,
            "email": user.email,
            "role": "USER",
            "last_login": serde_json::Value::Null,
        }
    });
    (StatusCode::OK, Json(payload)).into_response()
}

/// Sessions live with the identity provider; there is nothing to revoke here.
pub(crate) async fn logout_handler() -> Response {
    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}

pub(crate) async fn categories_handler() -> Response {
    (StatusCode::OK, Json(CategoryCatalog::standard())).into_response()
}

pub(crate) async fn score_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    match app.ledger.health_report(&user.user_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => ledger_error_response(err),
    }
}

pub(crate) async fn insight_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let report = match app.ledger.health_report(&user.user_id) {
        Ok(report) => report,
        Err(err) => return ledger_error_response(err),
    };
    advisor_response(app.advisor.insight(&report).await)
}

pub(crate) async fn deep_analysis_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    let user = match authenticate(&app, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let report = match app.ledger.health_report(&user.user_id) {
        Ok(report) => report,
        Err(err) => return ledger_error_response(err),
    };
    advisor_response(app.advisor.analysis(&report).await)
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    history: Vec<ChatHistoryEntry>,
}

/// History turns arrive either as `{role, text}` or in the Gemini
/// `{role, parts: [{text}]}` shape.
#[derive(Debug, Deserialize)]
struct ChatHistoryEntry {
    role: ChatRole,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    parts: Vec<ChatHistoryPart>,
}

#[derive(Debug, Deserialize)]
struct ChatHistoryPart {
    #[serde(default)]
    text: String,
}

impl From<ChatHistoryEntry> for ChatTurn {
    fn from(entry: ChatHistoryEntry) -> Self {
        let text = entry.text.unwrap_or_else(|| {
            entry
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        });
        ChatTurn {
            role: entry.role,
            text,
        }
    }
}

pub(crate) async fn chat_handler<R, I, C>(
    State(app): State<Arc<FinanceApp<R, I, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: TransactionRepository + 'static,
    I: IdentityProvider + 'static,
    C: AdvisorClient + 'static,
{
    if let Err(response) = authenticate(&app, &headers).await {
        return response;
    }
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return bad_request("Invalid JSON payload"),
    };
    let message = request.message.trim();
    if message.is_empty() {
        return bad_request("Invalid message");
    }
    let history: Vec<ChatTurn> = request.history.into_iter().map(ChatTurn::from).collect();
    advisor_response(app.advisor.chat(message, &history).await)
}
