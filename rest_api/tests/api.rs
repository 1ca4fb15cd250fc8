//! HTTP surface tests driven through the router with `oneshot`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use lib::storage_engine::{HealthStorage, StorageConfig, create_storage};
use models::errors::{HealthError, HealthResult};
use models::filters::{DiseaseCaseFilter, PatientFilter};
use models::medical::{
    Disease, DiseaseCase, DiseaseCaseUpdate, DiseaseCaseView, HealthAlert, HealthAlertUpdate, HealthRecord,
    NewDisease, NewDiseaseCase, NewHealthAlert, NewHealthRecord, NewPatient, NewUser, Patient, PatientUpdate,
    User,
};
use models::stats::{DashboardStats, DiseaseStat};
use rest_api::build_router;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let storage = create_storage(&StorageConfig::in_memory()).unwrap();
    build_router(storage)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn patient_payload(name: &str, district: &str) -> Value {
    json!({ "name": name, "age": 31, "gender": "female", "district": district })
}

async fn create_patient(app: &Router, name: &str, district: &str) -> Value {
    let (status, body) = send(app, "POST", "/api/patients", Some(patient_payload(name, district))).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn field_errors(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_and_version_respond() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiLevel"], 1);
}

#[tokio::test]
async fn create_patient_assigns_ids_and_reads_back() {
    let app = app();
    let created = create_patient(&app, "Meera", "Kottayam").await;
    assert_eq!(created["patientId"], "KL000001");
    assert_eq!(created["healthStatus"], "healthy");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let second = create_patient(&app, "Nikhil", "Kottayam").await;
    assert_eq!(second["patientId"], "KL000002");
}

#[tokio::test]
async fn missing_required_field_is_rejected_without_insert() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/patients", Some(json!({ "age": 40, "gender": "male" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = field_errors(&body);
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"district".to_string()));

    let (status, body) = send(&app, "GET", "/api/patients/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_body_error() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/diseases")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(field_errors(&body), vec!["body"]);
}

#[tokio::test]
async fn unknown_patient_is_404_with_message() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/patients/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "PUT", "/api/patients/does-not-exist", Some(json!({ "age": 30 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn patient_list_filters_and_paginates() {
    let app = app();
    create_patient(&app, "Suresh", "Ernakulam").await;
    create_patient(&app, "Sunita", "Kollam").await;
    let latest = create_patient(&app, "Sudheer", "Ernakulam").await;
    let id = latest["id"].as_str().unwrap();
    let (status, _) = send(&app, "PUT", &format!("/api/patients/{id}"), Some(json!({ "healthStatus": "critical" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/patients?district=Ernakulam&search=su", None).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Sudheer", "Suresh"]);

    let (_, body) = send(&app, "GET", "/api/patients?district=Ernakulam&healthStatus=critical", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/patients?district=&limit=1&offset=1", None).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Sunita"]);

    let (status, body) = send(&app, "GET", "/api/patients?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body), vec!["limit"]);
}

#[tokio::test]
async fn dengue_case_shows_up_in_stats() {
    let app = app();
    let (status, disease) = send(
        &app,
        "POST",
        "/api/diseases",
        Some(json!({ "name": "Dengue", "type": "infectious", "infectious": true, "reportable": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(disease["id"].is_string());

    let patient = create_patient(&app, "Omana", "Thrissur").await;
    let (status, case) = send(
        &app,
        "POST",
        "/api/disease-cases",
        Some(json!({ "patientId": patient["id"], "diseaseId": disease["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(case["status"], "active");

    let (status, stats) = send(&app, "GET", "/api/disease-cases/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stats.as_array().unwrap().contains(&json!({ "name": "Dengue", "count": 1 })));

    let (_, cases) = send(&app, "GET", "/api/disease-cases?district=Thris", None).await;
    assert_eq!(cases[0]["patientName"], "Omana");
    assert_eq!(cases[0]["diseaseName"], "Dengue");

    let case_id = case["id"].as_str().unwrap();
    let (status, updated) =
        send(&app, "PUT", &format!("/api/disease-cases/{case_id}"), Some(json!({ "status": "recovered" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "recovered");

    let (status, body) =
        send(&app, "PUT", "/api/disease-cases/missing", Some(json!({ "status": "recovered" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Disease case not found" }));
}

#[tokio::test]
async fn case_with_unknown_references_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/disease-cases",
        Some(json!({ "patientId": "ghost", "diseaseId": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body), vec!["patientId", "diseaseId"]);
}

#[tokio::test]
async fn duplicate_disease_name_conflicts() {
    let app = app();
    let payload = json!({ "name": "Malaria", "type": "infectious" });
    let (status, _) = send(&app, "POST", "/api/diseases", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/api/diseases", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn active_only_hides_inactive_alerts() {
    let app = app();
    let alert = |title: &str, active: bool| {
        json!({ "title": title, "description": "Fever cluster", "severity": "high", "isActive": active })
    };
    let (status, active) = send(&app, "POST", "/api/health-alerts", Some(alert("Fever cluster", true))).await;
    assert_eq!(status, StatusCode::CREATED);
    send(&app, "POST", "/api/health-alerts", Some(alert("Stale", false))).await;

    let (_, body) = send(&app, "GET", "/api/health-alerts?activeOnly=true", None).await;
    let alerts = body.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["id"], active["id"]);

    let (_, body) = send(&app, "GET", "/api/health-alerts?activeOnly=yes", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let id = active["id"].as_str().unwrap();
    let (status, updated) =
        send(&app, "PUT", &format!("/api/health-alerts/{id}"), Some(json!({ "isActive": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isActive"], false);

    let (status, _) = send(&app, "PUT", "/api/health-alerts/missing", Some(json!({ "isActive": false }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut orphan = alert("Unlinked", true);
    orphan["diseaseId"] = json!("ghost");
    let (status, body) = send(&app, "POST", "/api/health-alerts", Some(orphan)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body), vec!["diseaseId"]);

    let (_, body) = send(&app, "GET", "/api/health-alerts", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_records_filter_by_patient() {
    let app = app();
    let first = create_patient(&app, "Priya", "Kannur").await;
    let second = create_patient(&app, "Rahul", "Kannur").await;
    for (patient, date) in [(&first, "2024-03-01"), (&first, "2024-05-01"), (&second, "2024-04-01")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/health-records",
            Some(json!({ "patientId": patient["id"], "checkupDate": date, "diagnosis": "Routine" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/health-records?patientId={}", first["id"].as_str().unwrap());
    let (_, body) = send(&app, "GET", &uri, None).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["checkupDate"], "2024-05-01T00:00:00Z");

    let id = records[0]["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/health-records/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&fetched, &records[0]);

    let (status, _) = send(&app, "GET", "/api/health-records/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, dashboard) = send(&app, "GET", "/api/dashboard/stats", None).await;
    assert_eq!(
        dashboard,
        json!({ "totalPatients": 2, "activeAlerts": 0, "totalScreenings": 3, "totalDiseaseCases": 0 })
    );
}

/// Storage double whose every call fails as if the database were unreachable.
struct UnavailableStorage;

fn unavailable<T>() -> HealthResult<T> {
    Err(HealthError::StorageError("connection refused at 10.0.0.7".to_string()))
}

#[async_trait]
impl HealthStorage for UnavailableStorage {
    async fn get_user(&self, _id: &str) -> HealthResult<Option<User>> {
        unavailable()
    }
    async fn get_user_by_username(&self, _username: &str) -> HealthResult<Option<User>> {
        unavailable()
    }
    async fn create_user(&self, _new_user: NewUser) -> HealthResult<User> {
        unavailable()
    }
    async fn get_patients(&self, _filter: &PatientFilter) -> HealthResult<Vec<Patient>> {
        unavailable()
    }
    async fn get_patients_count(&self) -> HealthResult<u64> {
        unavailable()
    }
    async fn get_patient_by_id(&self, _id: &str) -> HealthResult<Option<Patient>> {
        unavailable()
    }
    async fn create_patient(&self, _new_patient: NewPatient) -> HealthResult<Patient> {
        unavailable()
    }
    async fn update_patient(&self, _id: &str, _update: &PatientUpdate) -> HealthResult<Patient> {
        unavailable()
    }
    async fn get_health_records(&self, _patient_id: Option<&str>) -> HealthResult<Vec<HealthRecord>> {
        unavailable()
    }
    async fn get_health_record_by_id(&self, _id: &str) -> HealthResult<Option<HealthRecord>> {
        unavailable()
    }
    async fn create_health_record(&self, _new_record: NewHealthRecord) -> HealthResult<HealthRecord> {
        unavailable()
    }
    async fn get_diseases(&self) -> HealthResult<Vec<Disease>> {
        unavailable()
    }
    async fn create_disease(&self, _new_disease: NewDisease) -> HealthResult<Disease> {
        unavailable()
    }
    async fn get_disease_cases(&self, _filter: &DiseaseCaseFilter) -> HealthResult<Vec<DiseaseCaseView>> {
        unavailable()
    }
    async fn create_disease_case(&self, _new_case: NewDiseaseCase) -> HealthResult<DiseaseCase> {
        unavailable()
    }
    async fn update_disease_case(&self, _id: &str, _update: &DiseaseCaseUpdate) -> HealthResult<DiseaseCase> {
        unavailable()
    }
    async fn get_disease_stats(&self) -> HealthResult<Vec<DiseaseStat>> {
        unavailable()
    }
    async fn get_health_alerts(&self, _active_only: bool) -> HealthResult<Vec<HealthAlert>> {
        unavailable()
    }
    async fn create_health_alert(&self, _new_alert: NewHealthAlert) -> HealthResult<HealthAlert> {
        unavailable()
    }
    async fn update_health_alert(&self, _id: &str, _update: &HealthAlertUpdate) -> HealthResult<HealthAlert> {
        unavailable()
    }
    async fn get_dashboard_stats(&self) -> HealthResult<DashboardStats> {
        unavailable()
    }
    async fn flush(&self) -> HealthResult<()> {
        unavailable()
    }
    fn get_type(&self) -> &'static str {
        "unavailable"
    }
}

#[tokio::test]
async fn storage_failures_return_generic_500() {
    let app = build_router(Arc::new(UnavailableStorage));

    for (method, uri, body, message) in [
        ("GET", "/api/dashboard/stats", None, "Failed to fetch dashboard stats"),
        ("GET", "/api/patients", None, "Failed to fetch patients"),
        ("GET", "/api/patients/abc", None, "Failed to fetch patient"),
        ("POST", "/api/patients", Some(patient_payload("Tara", "Idukki")), "Failed to create patient"),
        ("GET", "/api/disease-cases/stats", None, "Failed to fetch disease statistics"),
    ] {
        let (status, response) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(response, json!({ "message": message }));
    }
}

#[tokio::test]
async fn validation_runs_before_storage() {
    let app = build_router(Arc::new(UnavailableStorage));
    let (status, body) = send(&app, "POST", "/api/health-alerts", Some(json!({ "severity": "extreme" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body), vec!["title", "description", "severity"]);
}
