//! `POST /api/batch` integration tests
//!
//! Drives the full actix-web application, middleware included.

#[cfg(test)]
mod tests {
    use crate::common::assertions::result_ids;
    use crate::common::{BatchFactory, TestHandlers};
    use actix_web::dev::ServiceResponse;
    use actix_web::test as actix_test;
    use batch_gateway::config::Config;
    use batch_gateway::server::server::HttpServer;
    use serde_json::{Value, json};

    fn header<'a, B>(resp: &'a ServiceResponse<B>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    // ==================== Envelope Validation ====================

    /// Test that a batch at the size limit is accepted
    #[actix_web::test]
    async fn test_batch_at_limit_is_accepted() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let paths: Vec<String> = (0..20).map(|i| format!("/api/users/{}", i)).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets(&paths))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(header(&resp, "x-batch-size"), Some("20"));

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["metadata"]["totalRequests"], 20);
        assert_eq!(body["results"][7]["data"]["id"], "7");
    }

    /// Test that one request over the limit is rejected before any dispatch
    #[actix_web::test]
    async fn test_batch_over_limit_is_rejected() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let paths = vec!["/api/services"; 21];
        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets(&paths))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid batch request");
        assert_eq!(body["details"][0]["field"], "requests");
        assert_eq!(handlers.services_called(), 0);
    }

    /// Test that an empty batch is rejected
    #[actix_web::test]
    async fn test_empty_batch_is_rejected() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(json!({"requests": []}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    /// Test that every envelope problem is reported at once
    #[actix_web::test]
    async fn test_all_envelope_problems_are_reported() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(json!({
                "requests": [
                    {"id": "a", "method": "GET", "path": "/api/services"},
                    {"id": "a", "method": "GET", "path": "/internal/metrics"},
                    {"id": "b", "method": "GET", "path": "/api/batch"}
                ],
                "options": {"timeout": 50}
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let body: Value = actix_test::read_body_json(resp).await;
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"requests[1].id"), "fields: {:?}", fields);
        assert!(fields.contains(&"requests[1].path"), "fields: {:?}", fields);
        assert!(fields.contains(&"requests[2].path"), "fields: {:?}", fields);
        assert!(fields.contains(&"options.timeout"), "fields: {:?}", fields);
    }

    /// Test the timeout option boundaries
    #[actix_web::test]
    async fn test_timeout_option_bounds() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        for (timeout, expected) in [(99, 400), (100, 200), (30_000, 200), (30_001, 400)] {
            let req = actix_test::TestRequest::post()
                .uri("/api/batch")
                .set_json(BatchFactory::gets_with_options(
                    &["/api/services"],
                    json!({"timeout": timeout}),
                ))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), expected, "timeout {}", timeout);
        }
    }

    /// Test that unknown envelope fields are rejected by the JSON extractor
    #[actix_web::test]
    async fn test_unknown_option_is_rejected() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets_with_options(
                &["/api/services"],
                json!({"retries": 3}),
            ))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        assert!(header(&resp, "x-request-id").is_some());
    }

    // ==================== Rate Limiting ====================

    /// Test that the eleventh batch in a window is refused
    #[actix_web::test]
    async fn test_rate_limit_after_ten_batches() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        for i in 0..10 {
            let req = actix_test::TestRequest::post()
                .uri("/api/batch")
                .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
                .set_json(BatchFactory::gets(&["/api/services"]))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 200, "batch {}", i);
            assert_eq!(
                header(&resp, "x-ratelimit-remaining"),
                Some((9 - i).to_string().as_str())
            );
        }

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .set_json(BatchFactory::gets(&["/api/services"]))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 429);
        assert_eq!(header(&resp, "x-ratelimit-limit"), Some("10"));
        assert_eq!(header(&resp, "x-ratelimit-remaining"), Some("0"));
        let retry_after: u64 = header(&resp, "retry-after").unwrap().parse().unwrap();
        assert!(retry_after >= 1 && retry_after <= 60);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["reset"].is_number());

        // A different caller has its own budget
        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .insert_header(("X-Real-IP", "198.51.100.4"))
            .set_json(BatchFactory::gets(&["/api/services"]))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    /// Test that rejected envelopes do not consume quota
    #[actix_web::test]
    async fn test_invalid_batches_do_not_consume_quota() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        for _ in 0..12 {
            let req = actix_test::TestRequest::post()
                .uri("/api/batch")
                .set_json(json!({"requests": []}))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 400);
        }

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets(&["/api/services"]))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(header(&resp, "x-ratelimit-remaining"), Some("9"));
    }

    /// Test that a disabled limiter lets every batch through
    #[actix_web::test]
    async fn test_rate_limit_disabled() {
        let mut config = Config::default();
        config.gateway.rate_limit.enabled = false;
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(config))).await;

        for _ in 0..15 {
            let req = actix_test::TestRequest::post()
                .uri("/api/batch")
                .set_json(BatchFactory::gets(&["/api/users/1"]))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 200);
        }
    }

    // ==================== Processing Semantics ====================

    /// Test that results come back in request order with per-result statuses
    #[actix_web::test]
    async fn test_mixed_batch_preserves_order() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(json!({
                "requests": [
                    {"id": "slow", "method": "GET", "path": "/api/sleep/80"},
                    {"id": "missing", "method": "GET", "path": "/api/nowhere"},
                    {"id": "broken", "method": "GET", "path": "/api/broken"},
                    {"id": "book", "method": "POST", "path": "/api/bookings", "body": {"slot": "10:00"}},
                    {"id": "wrong-method", "method": "DELETE", "path": "/api/services"}
                ]
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(
            result_ids(&body),
            vec!["slow", "missing", "broken", "book", "wrong-method"]
        );
        assert_eq!(body["success"], false);

        let results = &body["results"];
        assert_eq!(results[0]["status"], 200);
        assert_eq!(results[1]["status"], 404);
        assert_eq!(results[2]["status"], 503);
        assert_eq!(results[2]["error"], "calendar service unavailable");
        assert_eq!(results[3]["status"], 201);
        assert_eq!(results[3]["data"]["slot"], "10:00");
        assert_eq!(results[4]["status"], 405);

        assert_eq!(body["metadata"]["successCount"], 2);
        assert_eq!(body["metadata"]["errorCount"], 3);
    }

    /// Test that a failFast batch reports the untouched requests as skipped
    #[actix_web::test]
    async fn test_fail_fast_sequential_skips_remaining() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(json!({
                "requests": [
                    {"id": "1", "method": "GET", "path": "/api/broken"},
                    {"id": "2", "method": "GET", "path": "/api/services"},
                    {"id": "3", "method": "POST", "path": "/api/bookings", "body": {}}
                ],
                "options": {"failFast": true, "parallel": false}
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["results"][1]["skipped"], true);
        assert_eq!(body["results"][1]["status"], 424);
        assert_eq!(body["results"][2]["skipped"], true);
        assert_eq!(handlers.services_called(), 0);
        assert_eq!(handlers.bookings_called(), 0);
    }

    /// Test that a sub-request exceeding the batch timeout becomes a 504 result
    #[actix_web::test]
    async fn test_sub_request_timeout() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets_with_options(
                &["/api/sleep/1000", "/api/users/5"],
                json!({"timeout": 100}),
            ))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["results"][0]["status"], 504);
        assert_eq!(body["results"][0]["error"], "Request timed out after 100ms");
        assert_eq!(body["results"][1]["success"], true);
    }

    /// Test that repeated batches are served from the cache
    #[actix_web::test]
    async fn test_repeated_batch_hits_cache() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let mut bodies = Vec::new();
        for _ in 0..2 {
            let req = actix_test::TestRequest::post()
                .uri("/api/batch")
                .set_json(BatchFactory::gets(&["/api/services", "/api/services"]))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 200);
            bodies.push((
                header(&resp, "x-cache-hits").map(str::to_string),
                actix_test::read_body_json::<Value, _>(resp).await,
            ));
        }

        assert_eq!(handlers.services_called(), 1);
        assert_eq!(bodies[0].0.as_deref(), Some("0"));
        assert_eq!(bodies[1].0.as_deref(), Some("2"));
        assert_eq!(bodies[0].1["results"][0]["data"], bodies[1].1["results"][0]["data"]);
        assert_eq!(bodies[1].1["metadata"]["cachedCount"], 2);
        assert_eq!(bodies[1].1["metadata"]["deduplicatedCount"], 1);
    }

    /// Test that the health endpoint reflects cache activity
    #[actix_web::test]
    async fn test_health_reports_cache_activity() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .set_json(BatchFactory::gets(&["/api/services"]))
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache"]["entries"], 1);
    }

    /// Test that the caller's request id is echoed back
    #[actix_web::test]
    async fn test_request_id_round_trip() {
        let handlers = TestHandlers::new();
        let app = actix_test::init_service(HttpServer::create_app(handlers.app_state(Config::default()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/batch")
            .insert_header(("X-Request-ID", "booking-page-42"))
            .set_json(BatchFactory::gets(&["/api/health"]))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(header(&resp, "x-request-id"), Some("booking-page-42"));
        assert!(header(&resp, "x-duration").unwrap().ends_with("ms"));
    }
}
