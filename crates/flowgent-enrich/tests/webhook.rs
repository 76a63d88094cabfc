//! Integration tests for `WebhookClient` using wiremock HTTP mocks.

use chrono::Utc;
use flowgent_core::{Lead, LeadEnrichment, LeadSource, NewLead};
use flowgent_enrich::{WebhookClient, WebhookPayload};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_payload() -> WebhookPayload {
    let lead = Lead::from_new(
        NewLead {
            business_name: "Pioneer Healthcare Works".to_string(),
            website_url: Some("https://pioneer.example.com/error".to_string()),
            category: Some("Healthcare".to_string()),
            city: Some("Bangalore".to_string()),
            ..NewLead::default()
        },
        LeadSource::Scraper,
    );
    let enrichment = LeadEnrichment::preserving(&lead, 77);
    WebhookPayload::new(&lead, "rule_mirror", &enrichment, Utc::now())
}

#[tokio::test]
async fn dispatch_posts_payload_json() {
    let server = MockServer::start().await;
    let payload = sample_payload();

    Mock::given(method("POST"))
        .and(path("/hooks/leads"))
        .and(body_partial_json(serde_json::json!({
            "leadId": payload.lead_id,
            "businessName": "Pioneer Healthcare Works",
            "policy": "rule_mirror",
            "readinessScore": 77,
            "score": 80,
            "temperature": "hot",
            "pitchType": "seo_audit",
            "leadStatus": "has_website"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/hooks/leads", server.uri());
    WebhookClient::new(Some(&url))
        .expect("client construction should not fail")
        .dispatch(&payload)
        .await;
}

#[tokio::test]
async fn rejected_delivery_is_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    WebhookClient::new(Some(&server.uri()))
        .unwrap()
        .dispatch(&sample_payload())
        .await;
}

#[tokio::test]
async fn unreachable_endpoint_is_swallowed() {
    // Port 9 (discard) is not listening on test hosts.
    WebhookClient::new(Some("http://127.0.0.1:9/hook"))
        .unwrap()
        .dispatch(&sample_payload())
        .await;
}

#[tokio::test]
async fn unconfigured_client_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    WebhookClient::new(None).unwrap().dispatch(&sample_payload()).await;
}
