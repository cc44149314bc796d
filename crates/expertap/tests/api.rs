//! HTTP-level tests driving the router with `oneshot`

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use expertap::parsing::parse_decision_text;
use expertap::{router, AppConfig, AppState, CompletionOptions, DecisionDb, Error, LlmProvider};

const DECISION_TEXT: &str = "Nr. 3855/C8/4446 din 10.12.2025\n\
Contestator: SC Alfa SRL\n\
Cerința privind experiență similară a fost considerată restrictivă.\n\
Admite contestația formulată.";

/// Replies with a fixed answer, or fails when `reply` is `None`
struct StubLlm {
    reply: Option<String>,
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn complete(&self, _prompt: &str, _options: &CompletionOptions) -> expertap::Result<String> {
        self.reply.clone().ok_or_else(|| Error::Llm("stub offline".into()))
    }

    async fn health_check(&self) -> expertap::Result<bool> {
        Ok(self.reply.is_some())
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-1"
    }
}

fn seeded_db() -> Arc<DecisionDb> {
    let db = DecisionDb::in_memory().unwrap();
    db.insert_decision(&parse_decision_text(
        DECISION_TEXT,
        Some("BO2025_3855_D1_CPV_55520000-1_A.txt"),
    ))
    .unwrap();
    Arc::new(db)
}

fn app_with(config: AppConfig, db: Option<Arc<DecisionDb>>, reply: Option<&str>) -> Router {
    let llm: Arc<dyn LlmProvider> = Arc::new(StubLlm {
        reply: reply.map(str::to_string),
    });
    router(AppState::new(config, db, Some(llm)))
}

fn app(reply: Option<&str>) -> Router {
    app_with(AppConfig::default(), Some(seeded_db()), reply)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart(uri: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "expertap-boundary";
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: text/plain\r\n\r\n",
        b = boundary,
        f = filename
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_and_ready() {
    let (status, body) = send(app(None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(app(None), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
    assert_eq!(body["llm"], false);

    let (_, body) = send(app(Some("ok")), get("/ready")).await;
    assert_eq!(body["llm"], true);

    let no_db = app_with(AppConfig::default(), None, None);
    let (status, _) = send(no_db, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_chat_grounded_answer_cites_decision() {
    let app = app(Some("Conform deciziei BO2025_3855, cerința de experiență similară este restrictivă."));
    let (status, body) = send(
        app,
        post_json(
            "/api/v1/chat",
            json!({"message": "Ce spune CNSC despre experiență similară?"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grounded"], true);
    assert!(!body["conversation_id"].as_str().unwrap().is_empty());

    let citations = body["citations"].as_array().unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0]["external_id"], "BO2025_3855");
    assert_eq!(citations[0]["verified"], true);
    assert!(DECISION_TEXT.contains(citations[0]["text"].as_str().unwrap()));
}

#[tokio::test]
async fn test_chat_validation_and_fallback() {
    let (status, body) = send(app(Some("ok")), post_json("/api/v1/chat", json!({"message": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");

    let long = "a".repeat(10_001);
    let (status, _) = send(app(Some("ok")), post_json("/api/v1/chat", json!({"message": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app(None),
        post_json("/api/v1/chat", json!({"message": "experiență similară"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grounded"], false);
    assert_eq!(body["citations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_chat_without_llm_is_unavailable() {
    let app = router(AppState::new(AppConfig::default(), Some(seeded_db()), None));
    let (status, body) = send(app, post_json("/api/v1/chat", json!({"message": "garanție"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "llm_error");
}

#[tokio::test]
async fn test_list_and_get_decision() {
    let app = app(None);
    let (status, body) = send(app.clone(), get("/api/v1/decisions?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 5);

    let summary = &body["decisions"][0];
    assert_eq!(summary["external_id"], "BO2025_3855");
    let id = summary["id"].as_str().unwrap().to_string();

    let (status, body) = send(app.clone(), get(&format!("/api/v1/decisions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["decision_number"], 4446);
    assert_eq!(body["cpv_code"], "55520000-1");
    assert!(body["sections"].is_array());

    let (status, body) = send(app, get("/api/v1/decisions/missing-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_pagination_bounds() {
    let (status, body) = send(app(None), get("/api/v1/decisions?offset=500")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decisions"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 1);

    let (status, _) = send(app(None), get("/api/v1/decisions?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(None), get("/api/v1/decisions?limit=101")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(None), get("/api/v1/decisions?ruling=RESPINS")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_stats_and_codes() {
    let (status, body) = send(app(None), get("/api/v1/decisions/stats/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_decisions"], 1);
    assert_eq!(body["by_criticism"]["D1"], 1);

    let (status, body) = send(app(None), get("/api/v1/decisions/codes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn test_database_disabled() {
    let app = app_with(AppConfig::default(), None, Some("ok"));
    let (status, body) = send(app, get("/api/v1/decisions")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "database_disabled");
}

#[tokio::test]
async fn test_upload_decision() {
    let (status, body) = send(
        app(None),
        multipart(
            "/api/v1/decisions/upload",
            "BO2024_77_R2_R.txt",
            "Nr. 77/C1/900 din 02.02.2024\nRespinge contestația ca nefondată.".as_bytes(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["external_id"], "BO2024_77");

    let (status, body) = send(
        app(None),
        multipart("/api/v1/decisions/upload", "BO2025_3855_D1_A.txt", b"again"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "conflict");

    let (status, _) = send(
        app(None),
        multipart("/api/v1/decisions/upload", "decizie.docx", b"x"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_documents_analyze() {
    let content = STANDARD.encode("  Caiet de sarcini\n\nExperiență similară: 3 contracte.  ");
    let (status, body) = send(
        app(None),
        post_json(
            "/api/v1/documents/analyze",
            json!({"filename": "caiet.txt", "content": content}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "Caiet de sarcini\nExperiență similară: 3 contracte.");
    assert_eq!(body["stats"]["lines"], 2);

    let (status, body) = send(
        app(None),
        post_json(
            "/api/v1/documents/analyze",
            json!({"filename": "oferta.xlsx", "content": STANDARD.encode("x")}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "unsupported_type");
}

#[tokio::test]
async fn test_documents_upload() {
    let (status, body) = send(
        app(None),
        multipart("/api/v1/documents/upload", "note.md", b"# Titlu\n\ntext"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "note.md");
    assert_eq!(body["stats"]["paragraphs"], 2);
}

#[tokio::test]
async fn test_redflags() {
    let reply = r#"{"red_flags": [{"category": "Experiență similară excesivă", "severity": "CRITICĂ",
        "clause": "3 contracte", "issue": "disproporționat", "legal_reference": "art. 172",
        "recommendation": "un contract"}]}"#;
    let (status, body) = send(
        app(Some(reply)),
        post_json(
            "/api/v1/redflags",
            json!({"text": "Ofertantul va face dovada experienței similare: experiență similară 3 contracte."}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["critical_count"], 1);
    assert_eq!(body["red_flags"][0]["severity"], "CRITICĂ");
    assert_eq!(body["used_jurisprudence"], true);

    let (status, _) = send(app(Some(reply)), post_json("/api/v1/redflags", json!({"text": "scurt"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_redflags_feature_disabled() {
    let mut config = AppConfig::default();
    config.features.red_flags_detector = false;
    let app = app_with(config, Some(seeded_db()), Some("{}"));

    let (status, body) = send(
        app,
        post_json("/api/v1/redflags", json!({"text": "Experiență similară de 10 contracte"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "feature_disabled");
}

#[tokio::test]
async fn test_ragmemo() {
    let (status, body) = send(
        app(Some("MEMO: BO2025_3855 confirmă caracterul restrictiv.")),
        post_json("/api/v1/ragmemo", json!({"topic": "experiență similară", "max_decisions": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topic"], "experiență similară");
    assert_eq!(body["decisions_used"], 1);

    let (status, _) = send(
        app(Some("x")),
        post_json("/api/v1/ragmemo", json!({"topic": "ab"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search() {
    let (status, body) = send(
        app(None),
        post_json(
            "/api/v1/search",
            json!({"query": "experiență similară", "filters": {"criticism_codes": ["D1"], "year_from": 2025}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["external_id"], "BO2025_3855");
    assert!(DECISION_TEXT.contains(body["results"][0]["excerpt"].as_str().unwrap()));

    let (status, body) = send(
        app(None),
        post_json("/api/v1/search", json!({"query": "experiență similară", "filters": {"ruling": "RESPINS"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, _) = send(app(None), post_json("/api/v1/search", json!({"query": "ab"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
