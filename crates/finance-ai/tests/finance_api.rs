//! HTTP-level scenarios for the finance router: authentication, ledger
//! writes and reads, scoring, and the advisor endpoints, all driven through
//! `finance_router` with in-process collaborators.

mod common {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use finance_ai::assistant::{AdvisorClient, AssistantError, ChatTurn, GenerationRequest};
    use finance_ai::identity::StaticIdentity;
    use finance_ai::ledger::{
        InMemoryTransactionStore, RepositoryError, Transaction, TransactionRepository, UserId,
    };
    use finance_ai::{finance_router, FinanceApp};

    pub(super) const TOKEN: &str = "token-alice";
    pub(super) const OTHER_TOKEN: &str = "token-bob";

    /// Advisor double: replies with a fixed outcome and records what it saw.
    pub(super) struct RecordingAdvisor {
        reply: Mutex<Option<Result<String, AssistantError>>>,
        pub(super) prompts: Mutex<Vec<String>>,
        pub(super) histories: Mutex<Vec<Vec<ChatTurn>>>,
    }

    impl RecordingAdvisor {
        pub(super) fn replying(reply: Result<String, AssistantError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
                histories: Mutex::new(Vec::new()),
            }
        }

        fn take(&self) -> Result<String, AssistantError> {
            self.reply
                .lock()
                .expect("reply mutex")
                .take()
                .unwrap_or_else(|| Err(AssistantError::Transport("no reply scripted".into())))
        }
    }

    #[async_trait]
    impl AdvisorClient for RecordingAdvisor {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
            self.prompts
                .lock()
                .expect("prompt mutex")
                .push(request.prompt.clone());
            self.take()
        }

        async fn chat(
            &self,
            _system_instruction: &str,
            message: &str,
            history: &[ChatTurn],
        ) -> Result<String, AssistantError> {
            self.prompts
                .lock()
                .expect("prompt mutex")
                .push(message.to_string());
            self.histories
                .lock()
                .expect("history mutex")
                .push(history.to_vec());
            self.take()
        }
    }

    pub(super) struct OfflineStore;

    impl TransactionRepository for OfflineStore {
        fn list(&self, _user: &UserId) -> Result<Vec<Transaction>, RepositoryError> {
            Err(RepositoryError::Unavailable("disk detached".to_string()))
        }

        fn create(
            &self,
            _user: &UserId,
            _transaction: Transaction,
        ) -> Result<Transaction, RepositoryError> {
            Err(RepositoryError::Unavailable("disk detached".to_string()))
        }
    }

    pub(super) fn identity() -> Arc<StaticIdentity> {
        Arc::new(
            StaticIdentity::default()
                .with_user(TOKEN, "user-alice", "alice@example.test")
                .with_user(OTHER_TOKEN, "user-bob", "bob@example.test"),
        )
    }

    pub(super) fn router_with(advisor: Arc<RecordingAdvisor>) -> Router {
        let app = FinanceApp::new(
            Arc::new(InMemoryTransactionStore::default()),
            identity(),
            advisor,
        );
        finance_router(Arc::new(app))
    }

    pub(super) fn router() -> Router {
        router_with(Arc::new(RecordingAdvisor::replying(Ok(
            "AI Insight: เก็บออมต่อไป".to_string(),
        ))))
    }

    pub(super) fn offline_router() -> Router {
        let app = FinanceApp::new(
            Arc::new(OfflineStore),
            identity(),
            Arc::new(RecordingAdvisor::replying(Ok("unused".to_string()))),
        );
        finance_router(Arc::new(app))
    }

    pub(super) async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router dispatch");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }
}

mod auth {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn protected_routes_reject_missing_or_unknown_tokens() {
        let router = router();
        for (method, uri) in [
            ("GET", "/api/transactions"),
            ("GET", "/api/me"),
            ("GET", "/api/analysis/score"),
            ("POST", "/api/analysis/insight"),
        ] {
            let (status, body) = call(&router, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body, json!({ "error": "Unauthorized" }));

            let (status, _) = call(&router, method, uri, Some("forged"), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn me_reports_the_resolved_user() {
        let (status, body) = call(&router(), "GET", "/api/me", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "user": {
                    "id": "user-alice",
                    "email": "alice@example.test",
                    "role": "USER",
                    "last_login": null,
                }
            })
        );
    }

    #[tokio::test]
    async fn logout_and_categories_need_no_token() {
        let router = router();
        let (status, body) = call(&router, "POST", "/api/logout", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (status, body) = call(&router, "GET", "/api/categories", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["expense"]
            .as_array()
            .expect("expense list")
            .contains(&json!("Food")));
    }
}

mod transactions {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn created_transactions_are_listed_newest_first_per_user() {
        let router = router();
        let (status, created) = call(
            &router,
            "POST",
            "/api/transactions",
            Some(TOKEN),
            Some(r#"{"type":"expense","amount":120,"category":"Food","date":"2024-06-02","note":"lunch"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["transaction"]["type"], "expense");
        assert_eq!(created["transaction"]["note"], "lunch");
        assert!(!created["transaction"]["id"]
            .as_str()
            .expect("id")
            .is_empty());

        call(
            &router,
            "POST",
            "/api/transactions",
            Some(TOKEN),
            Some(r#"{"type":"income","amount":5000,"category":"Salary","date":"2024-06-10"}"#),
        )
        .await;

        let (status, listed) = call(&router, "GET", "/api/transactions", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        let dates: Vec<_> = listed["transactions"]
            .as_array()
            .expect("transactions")
            .iter()
            .map(|tx| tx["date"].as_str().expect("date").to_string())
            .collect();
        assert_eq!(dates, vec!["2024-06-10", "2024-06-02"]);

        let (_, other) = call(&router, "GET", "/api/transactions", Some(OTHER_TOKEN), None).await;
        assert_eq!(other, json!({ "transactions": [] }));
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected_with_the_first_failure() {
        let router = router();
        let cases = [
            ("not json", "Invalid JSON payload"),
            ("[1,2]", "Invalid JSON payload"),
            (r#"{"type":"loan","amount":1}"#, "Invalid type"),
            (r#"{"type":"income","amount":0}"#, "Invalid amount"),
            (r#"{"type":"income","amount":"10","category":""}"#, "Invalid amount"),
            (r#"{"type":"income","amount":10,"category":"  "}"#, "Invalid category"),
            (
                r#"{"type":"income","amount":10,"category":"Salary","date":""}"#,
                "Invalid date",
            ),
            (
                r#"{"type":"income","amount":10,"category":"Salary","date":"2024-06-01","note":7}"#,
                "Invalid note",
            ),
        ];

        for (payload, message) in cases {
            let (status, body) =
                call(&router, "POST", "/api/transactions", Some(TOKEN), Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body, json!({ "error": message }), "{payload}");
        }

        let (_, listed) = call(&router, "GET", "/api/transactions", Some(TOKEN), None).await;
        assert_eq!(listed, json!({ "transactions": [] }));
    }

    #[tokio::test]
    async fn unavailable_store_maps_to_service_unavailable() {
        let router = offline_router();
        let (status, body) = call(&router, "GET", "/api/transactions", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({
                "error": "Transactions temporarily unavailable",
                "code": "TX_STORE_UNAVAILABLE",
            })
        );
    }
}

mod analysis {
    use std::sync::Arc;

    use super::common::*;
    use axum::http::StatusCode;
    use finance_ai::assistant::{AssistantError, ChatRole, FALLBACK_INSIGHT};
    use serde_json::json;

    async fn seed_reference_ledger(router: &axum::Router) {
        let entries = [
            r#"{"type":"income","amount":1000,"category":"Salary","date":"2024-06-01"}"#,
            r#"{"type":"income","amount":1000,"category":"Salary","date":"2024-06-15"}"#,
            r#"{"type":"income","amount":1000,"category":"Freelance","date":"2024-06-20"}"#,
            r#"{"type":"expense","amount":400,"category":"Food","date":"2024-06-03"}"#,
            r#"{"type":"expense","amount":200,"category":"Transport","date":"2024-06-04"}"#,
            r#"{"type":"expense","amount":100,"category":"Rent","date":"2024-06-05"}"#,
            r#"{"type":"expense","amount":100,"category":"Bills","date":"2024-06-06"}"#,
            r#"{"type":"invest","amount":9000,"category":"Stocks","date":"2024-06-07"}"#,
        ];
        for entry in entries {
            let (status, _) =
                call(router, "POST", "/api/transactions", Some(TOKEN), Some(entry)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn score_endpoint_reports_the_composite() {
        let router = router();
        seed_reference_ledger(&router).await;

        let (status, report) =
            call(&router, "GET", "/api/analysis/score", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["total_score"], 87);
        assert_eq!(report["max_score"], 100);
        assert_eq!(report["tier"], "excellent");
        assert_eq!(report["summary"]["savings_rate"], 73);
        let scores: Vec<_> = report["metrics"]
            .as_array()
            .expect("metrics")
            .iter()
            .map(|metric| metric["score"].as_u64().expect("score"))
            .collect();
        assert_eq!(scores, vec![25, 25, 12, 25]);
    }

    #[tokio::test]
    async fn empty_ledger_scores_ten() {
        let (status, report) =
            call(&router(), "GET", "/api/analysis/score", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["total_score"], 10);
        assert_eq!(report["tier"], "poor");
    }

    #[tokio::test]
    async fn insight_uses_summary_figures() {
        let advisor = Arc::new(RecordingAdvisor::replying(Ok(" AI Insight: ดีมาก ".into())));
        let router = router_with(advisor.clone());
        seed_reference_ledger(&router).await;

        let (status, body) =
            call(&router, "POST", "/api/analysis/insight", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": "AI Insight: ดีมาก", "source": "model" }));

        let prompts = advisor.prompts.lock().expect("prompt mutex");
        assert!(prompts[0].contains("Income: ฿3000, Expenses: ฿800, Net: ฿2200, Savings: 73%"));
    }

    #[tokio::test]
    async fn advisor_failure_falls_back_to_canned_text() {
        let advisor = Arc::new(RecordingAdvisor::replying(Err(AssistantError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        })));
        let (status, body) = call(
            &router_with(advisor),
            "POST",
            "/api/analysis/insight",
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": FALLBACK_INSIGHT, "source": "fallback" }));
    }

    #[tokio::test]
    async fn missing_api_key_is_reported_as_not_configured() {
        let advisor = Arc::new(RecordingAdvisor::replying(Err(AssistantError::MissingApiKey)));
        let (status, body) = call(
            &router_with(advisor),
            "POST",
            "/api/analysis/deep",
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "AI_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn chat_accepts_both_history_shapes() {
        let advisor = Arc::new(RecordingAdvisor::replying(Ok("สวัสดีครับ".into())));
        let router = router_with(advisor.clone());
        let payload = r#"{
            "message": "ช่วยวางแผนการออม",
            "history": [
                {"role": "user", "parts": [{"text": "สวัสดี"}]},
                {"role": "model", "text": "สวัสดีครับ"}
            ]
        }"#;

        let (status, body) = call(&router, "POST", "/api/chat", Some(TOKEN), Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "สวัสดีครับ");

        let histories = advisor.histories.lock().expect("history mutex");
        assert_eq!(histories[0].len(), 2);
        assert_eq!(histories[0][0].role, ChatRole::User);
        assert_eq!(histories[0][0].text, "สวัสดี");
        assert_eq!(histories[0][1].role, ChatRole::Model);
    }

    #[tokio::test]
    async fn chat_requires_a_message() {
        let (status, body) = call(
            &router(),
            "POST",
            "/api/chat",
            Some(TOKEN),
            Some(r#"{"message":"   "}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid message" }));
    }
}
