pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::study::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/flashcards", post(handlers::handle_flashcards))
        .route("/api/quiz", post(handlers::handle_quiz))
        .route("/api/study-buddy", post(handlers::handle_study_buddy))
        // The browser client posts here
        .route("/api/studybuddy", post(handlers::handle_study_buddy))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::transport::testing::{
        empty_reply, status, text_reply, ScriptedTransport,
    };
    use crate::llm_client::LlmClient;

    fn app(transport: &Arc<ScriptedTransport>) -> Router {
        let config = Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_base: "http://upstream.test".to_string(),
            gemini_model: "gemini-test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        };
        let llm = LlmClient::new(transport.clone(), config.generate_content_url());
        build_router(AppState { llm, config })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, body.to_string()).await
    }

    async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_upstream_call() {
        let cases = [
            ("/api/flashcards", json!({ "notes": "" }), "Notes are required"),
            ("/api/flashcards", json!({}), "Notes are required"),
            (
                "/api/quiz",
                json!({ "text": "   \n\t" }),
                "Text is required to generate a quiz",
            ),
            ("/api/study-buddy", json!({ "question": " " }), "Question is required"),
            ("/api/studybuddy", json!({}), "Question is required"),
        ];

        for (uri, body, message) in cases {
            let transport = Arc::new(ScriptedTransport::new(vec![text_reply("{}")]));
            let (status, body) = post_json(app(&transport), uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, json!({ "error": message }), "{uri}");
            assert_eq!(transport.calls(), 0, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unparsable_body_is_client_fault() {
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply("{}")]));
        let (status, body) = post_raw(app(&transport), "/api/quiz", "{oops".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_flashcards_round_trip_unmodified() {
        let flashcards = json!([
            { "front": "Photosynthesis", "back": "Converts light to chemical energy" },
            { "front": "Chlorophyll", "back": "Pigment that absorbs light" }
        ]);
        let reply = json!({ "flashcards": flashcards }).to_string();
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply(&reply)]));

        let (status, body) = post_json(
            app(&transport),
            "/api/flashcards",
            json!({ "notes": "Photosynthesis converts light to energy" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["flashcards"], flashcards);
        assert_eq!(transport.calls(), 1);
        let sent = &transport.requests()[0];
        assert!(sent["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .ends_with("Notes: Photosynthesis converts light to energy"));
    }

    #[tokio::test]
    async fn test_quiz_invalid_json_is_server_fault() {
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply("{not valid json")]));

        let (status, body) =
            post_json(app(&transport), "/api/quiz", json!({ "text": "The Nile" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "LLM returned invalid JSON structure" }));
    }

    #[tokio::test]
    async fn test_quiz_without_quiz_field_is_malformed() {
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply(r#"{"questions": []}"#)]));

        let (status, body) =
            post_json(app(&transport), "/api/quiz", json!({ "text": "The Nile" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "LLM returned invalid JSON structure");
    }

    #[tokio::test]
    async fn test_quiz_success() {
        let quiz = json!([{
            "question": "Which river is the longest?",
            "options": ["Amazon", "Nile", "Yangtze", "Danube"],
            "correct": 1,
            "explanation": "The Nile is usually cited as the longest."
        }]);
        let reply = json!({ "quiz": quiz }).to_string();
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply(&reply)]));

        let (status, body) =
            post_json(app(&transport), "/api/quiz", json!({ "text": "Rivers" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quiz"], quiz);
    }

    #[tokio::test]
    async fn test_study_buddy_answer() {
        let transport = Arc::new(ScriptedTransport::new(vec![text_reply("## Entropy\n\nDisorder.")]));

        let (status, body) = post_json(
            app(&transport),
            "/api/study-buddy",
            json!({ "question": "What is entropy?" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "answer": "## Entropy\n\nDisorder." }));
        assert!(transport.requests()[0].get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_study_buddy_no_content() {
        let transport = Arc::new(ScriptedTransport::new(vec![empty_reply()]));

        let (status, body) = post_json(
            app(&transport),
            "/api/study-buddy",
            json!({ "question": "Why?" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No content returned from Study Buddy");
    }

    #[tokio::test]
    async fn test_flashcards_no_content() {
        let transport = Arc::new(ScriptedTransport::new(vec![empty_reply()]));

        let (status, body) =
            post_json(app(&transport), "/api/flashcards", json!({ "notes": "Cells" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No content returned from LLM");
    }

    #[tokio::test]
    async fn test_upstream_forbidden_maps_to_internal_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(403)]));

        let (status, body) =
            post_json(app(&transport), "/api/flashcards", json!({ "notes": "Cells" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to generate flashcards due to internal server error."
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_then_success_through_router() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            status(429),
            status(429),
            text_reply(r#"{"flashcards": []}"#),
        ]));

        let (status, body) =
            post_json(app(&transport), "/api/flashcards", json!({ "notes": "Cells" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "flashcards": [] }));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_health() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app(&transport).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gemini-test");
    }
}
