//! End-to-end test of the HTTP scoring surface against real artifacts on
//! disk, served on an ephemeral port.

use std::io::Write;
use std::sync::Arc;

use loan_screen::api::{AppState, routes};
use loan_screen::features::{EncodingTable, NormalizationStats};
use loan_screen::model::{LogisticScorer, Scorer};
use loan_screen::pipeline::ScoringPipeline;

/// Write a stats CSV and classifier artifact, load them through the same
/// loaders production uses, and serve the router.
///
/// The classifier puts all its weight on `previous_loan_defaults_on_file`
/// (index 4): no prior defaults approves, a prior default denies.
async fn spawn_server() -> String {
    let mut stats_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(stats_file, "column,mean,std").unwrap();
    for feature in loan_screen::features::NUMERIC_FEATURES {
        writeln!(stats_file, "{feature},0.0,1.0").unwrap();
    }
    stats_file.flush().unwrap();

    let mut model_file = tempfile::NamedTempFile::new().unwrap();
    let mut weights = vec![0.0; 13];
    weights[4] = -2.0;
    write!(
        model_file,
        "{}",
        serde_json::json!({ "weights": weights, "intercept": 1.0 })
    )
    .unwrap();
    model_file.flush().unwrap();

    let stats = NormalizationStats::from_csv_path(stats_file.path()).unwrap();
    let scorer: Arc<dyn Scorer> =
        Arc::new(LogisticScorer::from_json_path(model_file.path()).unwrap());
    let pipeline = Arc::new(ScoringPipeline::new(
        EncodingTable::builtin(),
        stats,
        scorer,
    ));

    let app = routes(AppState {
        pipeline,
        mediator: None,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn record(defaults_on_file: &str) -> serde_json::Value {
    serde_json::json!({
        "person_age": 25.0,
        "person_gender": "male",
        "person_education": "bachelor",
        "person_income": 50000.0,
        "person_emp_exp": 2.0,
        "person_home_ownership": "rent",
        "loan_amnt": 10000.0,
        "loan_intent": "personal",
        "loan_int_rate": 11.5,
        "loan_percent_income": 0.2,
        "cb_person_cred_hist_length": 3.0,
        "credit_score": 650.0,
        "previous_loan_defaults_on_file": defaults_on_file
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn score_endpoint_approves_and_denies() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let approved: serde_json::Value = client
        .post(format!("{base}/api/score"))
        .json(&record("no"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(approved["label"], 1);
    assert_eq!(approved["decision"], "approved");

    let denied: serde_json::Value = client
        .post(format!("{base}/api/score"))
        .json(&record("yes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(denied["label"], 0);
    assert_eq!(denied["decision"], "denied");
}

#[tokio::test]
async fn score_endpoint_names_the_invalid_field() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/score"))
        .json(&record("maybe"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);

    let body: serde_json::Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("previous_loan_defaults_on_file"));
    assert!(message.contains("maybe"));
}

#[tokio::test]
async fn chat_endpoint_reports_missing_oracle() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/chat"))
        .json(&serde_json::json!({"message": "score a borrower"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 503);
}
