//! Integration tests for the Becas HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use becas::api::{AppState, HealthResponse, StatusResponse, create_router};
use becas::config::ServerConfig;
use becas_core::{Catalog, DeletePolicy};
use serde_json::{Value, json};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn unlimited() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

/// Create a test server over a fresh in-memory catalog.
fn create_test_server() -> TestServer {
    create_test_server_with(Catalog::in_memory())
}

fn create_test_server_with(catalog: Catalog) -> TestServer {
    let state = AppState::with_config(catalog, unlimited());
    TestServer::new(create_router(state)).unwrap()
}

/// The `data` member of a success envelope.
fn data(response: &TestResponse) -> Value {
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true), "body: {}", body);
    body["data"].clone()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn create_edition(server: &TestServer, name: &str, active: bool) -> String {
    let response = server
        .post("/admin/convocatorias")
        .json(&json!({ "name": name, "year": 2025, "active": active }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&data(&response))
}

async fn create_stage(server: &TestServer, edition: &str, name: &str) -> String {
    let response = server
        .post(&format!("/admin/convocatorias/{}/etapas", edition))
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&data(&response))
}

fn sections_url(edition: &str, stage: &str) -> String {
    format!("/admin/convocatorias/{}/etapas/{}/secciones", edition, stage)
}

fn items_url(edition: &str, stage: &str, section: &str) -> String {
    format!("{}/{}/contenido", sections_url(edition, stage), section)
}

fn requirement(code: &str) -> Value {
    json!({
        "code": code,
        "title": "Documento de identidad",
        "description": "Copia simple del documento nacional de identidad.",
        "category": "pre_conditions",
        "subcategory": "acceso",
        "specifications": ["Formato PDF", "  "]
    })
}

/// Edition with one stage seeded with the preset sections.
/// Returns (edition, stage, requisitos section).
async fn seeded_tree(server: &TestServer) -> (String, String, String) {
    let edition = create_edition(server, "Beca 18 - 2025", true).await;
    let stage = create_stage(server, &edition, "Etapa de Preselección").await;
    let response = server
        .post(&format!("{}/presets", sections_url(&edition, &stage)))
        .await;
    response.assert_status(StatusCode::CREATED);
    let sections = data(&response);
    let section = id_of(&sections[0]);
    (edition, stage, section)
}

// =============================================================================
// HEALTH & STATUS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_status_counts_records() {
    let server = create_test_server();
    seeded_tree(&server).await;

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert!(!status.persistent);
    assert_eq!(status.delete_policy, DeletePolicy::Reject);
    assert_eq!(status.counts.editions, 1);
    assert_eq!(status.counts.stages, 1);
    assert_eq!(status.counts.sections, 5);
    assert_eq!(status.counts.items, 0);
}

// =============================================================================
// EDITIONS
// =============================================================================

#[tokio::test]
async fn test_edition_crud_flow() {
    let server = create_test_server();
    let id = create_edition(&server, "  Beca 18 - 2025  ", true).await;

    let response = server.get(&format!("/admin/convocatorias/{}", id)).await;
    response.assert_status_ok();
    let edition = data(&response);
    assert_eq!(edition["name"], "Beca 18 - 2025");
    assert_eq!(edition["year"], 2025);
    assert!(edition["createdAt"].is_string());

    let response = server
        .patch(&format!("/admin/convocatorias/{}", id))
        .json(&json!({ "active": false }))
        .await;
    response.assert_status_ok();
    assert_eq!(data(&response)["active"], json!(false));

    let response = server.delete(&format!("/admin/convocatorias/{}", id)).await;
    response.assert_status_ok();
    let report = data(&response);
    assert_eq!(report["kind"], "edition");
    assert_eq!(report["removed"], 1);

    server
        .get(&format!("/admin/convocatorias/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_editions_listed_newest_year_first() {
    let server = create_test_server();
    for (name, year) in [("Beca 2023", 2023), ("Beca 2025", 2025), ("Beca 2024", 2024)] {
        server
            .post("/admin/convocatorias")
            .json(&json!({ "name": name, "year": year }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let list = data(&server.get("/admin/convocatorias").await);
    let years: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2025, 2024, 2023]);
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let server = create_test_server();

    let response = server
        .post("/admin/convocatorias")
        .json(&json!({ "name": "ab", "year": 1999, "description": "short" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert!(body["fields"]["name"].is_string());
    assert!(body["fields"]["year"].is_string());
    assert!(body["fields"]["description"].is_string());

    let list = data(&server.get("/admin/convocatorias").await);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_edition_is_404() {
    let server = create_test_server();

    let response = server.get("/admin/convocatorias/missing").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

// =============================================================================
// DELETE POLICIES
// =============================================================================

#[tokio::test]
async fn test_reject_policy_returns_conflict() {
    let server = create_test_server();
    let edition = create_edition(&server, "Beca 18 - 2025", true).await;
    create_stage(&server, &edition, "Etapa de Selección").await;

    let response = server
        .delete(&format!("/admin/convocatorias/{}", edition))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    server
        .get(&format!("/admin/convocatorias/{}", edition))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_cascade_policy_removes_subtree() {
    let server =
        create_test_server_with(Catalog::in_memory().with_delete_policy(DeletePolicy::Cascade));
    let (edition, stage, section) = seeded_tree(&server).await;
    server
        .post(&items_url(&edition, &stage, &section))
        .json(&requirement("REQ-01"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .delete(&format!("/admin/convocatorias/{}", edition))
        .await;

    response.assert_status_ok();
    // edition + stage + 5 sections + 1 item
    assert_eq!(data(&response)["removed"], 8);
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.counts.total(), 0);
}

// =============================================================================
// STAGES, SECTIONS AND ITEMS
// =============================================================================

#[tokio::test]
async fn test_stage_ranks_and_moves() {
    let server = create_test_server();
    let edition = create_edition(&server, "Beca 18 - 2025", true).await;
    let first = create_stage(&server, &edition, "Etapa de Preselección").await;
    let second = create_stage(&server, &edition, "Etapa de Selección").await;

    let response = server
        .post(&format!(
            "/admin/convocatorias/{}/etapas/{}/move",
            edition, second
        ))
        .json(&json!({ "direction": "up" }))
        .await;
    response.assert_status_ok();
    let outcome = data(&response);
    assert_eq!(outcome["outcome"], "swapped");
    assert_eq!(outcome["moved"]["rank"], 1);
    assert_eq!(outcome["displaced"]["rank"], 2);

    let stages = data(
        &server
            .get(&format!("/admin/convocatorias/{}/etapas", edition))
            .await,
    );
    let ids: Vec<String> = stages.as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ids, vec![second.clone(), first]);

    let response = server
        .post(&format!(
            "/admin/convocatorias/{}/etapas/{}/move",
            edition, second
        ))
        .json(&json!({ "direction": "up" }))
        .await;
    let outcome = data(&response);
    assert_eq!(outcome["outcome"], "unchanged");
    assert_eq!(outcome["reason"], "at_top");
}

#[tokio::test]
async fn test_invalid_move_direction_is_client_error() {
    let server = create_test_server();
    let edition = create_edition(&server, "Beca 18 - 2025", true).await;
    let stage = create_stage(&server, &edition, "Etapa de Selección").await;

    let response = server
        .post(&format!(
            "/admin/convocatorias/{}/etapas/{}/move",
            edition, stage
        ))
        .json(&json!({ "direction": "sideways" }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_preset_sections_are_seeded_in_order() {
    let server = create_test_server();
    let (edition, stage, _) = seeded_tree(&server).await;

    let sections = data(&server.get(&sections_url(&edition, &stage)).await);
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0]["contentType"], "requisitos");
    let ranks: Vec<i64> = sections
        .iter()
        .map(|s| s["rank"].as_i64().unwrap())
        .collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_section_content_type_is_normalized() {
    let server = create_test_server();
    let edition = create_edition(&server, "Beca 18 - 2025", true).await;
    let stage = create_stage(&server, &edition, "Etapa de Selección").await;

    let response = server
        .post(&sections_url(&edition, &stage))
        .json(&json!({ "name": "Preguntas", "icon": "❓", "contentType": "  Preguntas   Frecuentes " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(data(&response)["contentType"], "preguntas_frecuentes");
}

#[tokio::test]
async fn test_item_crud_flow() {
    let server = create_test_server();
    let (edition, stage, section) = seeded_tree(&server).await;
    let url = items_url(&edition, &stage, &section);

    let response = server.post(&url).json(&requirement("REQ-01")).await;
    response.assert_status(StatusCode::CREATED);
    let item = data(&response);
    assert_eq!(item["rank"], 1);
    assert_eq!(item["specifications"], json!(["Formato PDF"]));
    let item_id = id_of(&item);

    let response = server
        .patch(&format!("{}/{}", url, item_id))
        .json(&json!({ "title": "DNI del postulante", "mandatory": false }))
        .await;
    response.assert_status_ok();
    let updated = data(&response);
    assert_eq!(updated["title"], "DNI del postulante");
    assert_eq!(updated["mandatory"], json!(false));
    assert_eq!(updated["code"], "REQ-01");

    server
        .delete(&format!("{}/{}", url, item_id))
        .await
        .assert_status_ok();
    let items = data(&server.get(&url).await);
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_item_with_bad_code_and_foreign_subcategory() {
    let server = create_test_server();
    let (edition, stage, section) = seeded_tree(&server).await;

    let mut body = requirement("REQ-1");
    body["subcategory"] = json!("antecedentes");
    let response = server
        .post(&items_url(&edition, &stage, &section))
        .json(&body)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["fields"]["code"].is_string());
    assert!(body["fields"]["subcategory"].is_string());
}

#[tokio::test]
async fn test_items_under_wrong_parent_are_404() {
    let server = create_test_server();
    let (edition, stage, _) = seeded_tree(&server).await;

    let response = server
        .post(&items_url(&edition, &stage, "no-such-section"))
        .json(&requirement("REQ-01"))
        .await;

    response.assert_status_not_found();
}

// =============================================================================
// EXPORT, IMPORT & PRESETS
// =============================================================================

#[tokio::test]
async fn test_csv_export_headers_and_rows() {
    let server = create_test_server();
    create_edition(&server, "Beca \"Especial\"", false).await;

    let response = server.get("/admin/export/convocatorias.csv").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert_eq!(content_type.to_str().unwrap(), "text/csv; charset=utf-8");
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"convocatorias_"));
    assert!(disposition.ends_with(".csv\""));

    let text = response.text();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "ID,Nombre,Año,Descripción,Estado,Fecha Creación,Última Actualización"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"Beca \"\"Especial\"\"\""));
    assert!(row.contains(",2025,"));
    assert!(row.contains("INACTIVA"));
}

#[tokio::test]
async fn test_csv_export_of_empty_catalog_is_404() {
    let server = create_test_server();

    let response = server.get("/admin/export/convocatorias.csv").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "Nothing to export");
}

#[tokio::test]
async fn test_import_is_not_implemented() {
    let server = create_test_server();

    let response = server.post("/admin/import/convocatorias").await;

    response.assert_status(StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_presets_lists_choices() {
    let server = create_test_server();

    let presets = data(&server.get("/admin/presets").await);

    assert_eq!(presets["stageNames"].as_array().unwrap().len(), 5);
    assert_eq!(presets["sectionTemplates"].as_array().unwrap().len(), 10);
    assert_eq!(presets["icons"].as_array().unwrap().len(), 20);
    assert_eq!(presets["categories"].as_array().unwrap().len(), 3);
}

// =============================================================================
// PUBLIC VIEWER
// =============================================================================

#[tokio::test]
async fn test_viewer_shows_only_active_records() {
    let server = create_test_server();
    let (edition, stage, section) = seeded_tree(&server).await;
    create_edition(&server, "Borrador 2025", false).await;
    server
        .post(&items_url(&edition, &stage, &section))
        .json(&requirement("REQ-01"))
        .await
        .assert_status(StatusCode::CREATED);

    let editions = data(&server.get("/convocatorias").await);
    assert_eq!(editions.as_array().unwrap().len(), 1);
    assert_eq!(id_of(&editions[0]), edition);

    let stages = data(
        &server
            .get(&format!("/convocatorias/{}/etapas", edition))
            .await,
    );
    assert_eq!(stages.as_array().unwrap().len(), 1);

    let view = data(
        &server
            .get(&format!(
                "/convocatorias/{}/etapas/{}/secciones/{}",
                edition, stage, section
            ))
            .await,
    );
    assert_eq!(view["content"]["kind"], "requirements");
    assert_eq!(view["content"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_viewer_hides_inactive_edition() {
    let server = create_test_server();
    let (edition, stage, _) = seeded_tree(&server).await;
    server
        .patch(&format!("/admin/convocatorias/{}", edition))
        .json(&json!({ "active": false }))
        .await
        .assert_status_ok();

    server
        .get(&format!(
            "/convocatorias/{}/etapas/{}/secciones",
            edition, stage
        ))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_viewer_other_content_is_under_development() {
    let server = create_test_server();
    let (edition, stage, _) = seeded_tree(&server).await;
    let sections = data(&server.get(&sections_url(&edition, &stage)).await);
    let cronograma = id_of(&sections[2]);

    let view = data(
        &server
            .get(&format!(
                "/convocatorias/{}/etapas/{}/secciones/{}",
                edition, stage, cronograma
            ))
            .await,
    );

    assert_eq!(view["section"]["contentType"], "cronograma");
    assert_eq!(view["content"]["kind"], "under_development");
}

#[tokio::test]
async fn test_unknown_path_falls_back_to_default_view() {
    let server = create_test_server();
    let edition = create_edition(&server, "Beca 18 - 2025", true).await;

    let response = server.get("/no/such/page").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(id_of(&body["editions"][0]), edition);
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    // /health is GET only
    let response = server.post("/health").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = create_test_server();

    let response = server
        .post("/admin/convocatorias")
        .text("not valid json")
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let state = AppState::with_config(Catalog::in_memory(), config);
    let server = TestServer::new(create_router(state)).unwrap();

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"], "Too Many Requests");
}
