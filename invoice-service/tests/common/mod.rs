use invoice_service::config::ServiceConfig;
use invoice_service::startup::Application;
use serde_json::json;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = ServiceConfig::load().expect("Failed to load configuration");
        config.port = 0; // Random port for testing

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn generate_pdf_url(&self) -> String {
        format!("{}/api/generate-pdf", self.address)
    }
}

/// A well-formed request body; tests mutate fields as needed.
pub fn sample_request() -> serde_json::Value {
    json!({
        "title": "Proforma Invoice",
        "invoice_date": "2026-01-15",
        "billed_by": "Acme Therapy Ltd\n1 High Street\nLondon",
        "billed_to": "Jane Doe\n2 Low Road\nLeeds",
        "currency": "£",
        "cash_note": "Payment is due in cash on arrival",
        "deposit": 30,
        "items": [
            { "item": "Consultation", "quantity": 2, "rate": 50, "note": "evening" },
            { "item": "Follow-up", "quantity": 1, "rate": 25 }
        ]
    })
}
