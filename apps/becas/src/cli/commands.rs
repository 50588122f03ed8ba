//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::CliError;
use crate::api;
use crate::config::{AppConfig, Backend};
use becas_core::{
    Catalog, Category, EditionDraft, RequirementDraft, StageDraft, StagePath, Subcategory,
    presets::REQUIREMENTS_CONTENT_TYPE,
};
use chrono::{Datelike, Utc};
use std::path::{Path, PathBuf};

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Resolve the CSV destination.
///
/// An existing directory receives the dated file name; anything else is
/// used as a file path whose parent must exist.
fn resolve_export_path(output: Option<&Path>, file_name: &str) -> Result<PathBuf, CliError> {
    let target = match output {
        None => return Ok(PathBuf::from(file_name)),
        Some(dir) if dir.is_dir() => return Ok(dir.join(file_name)),
        Some(path) => path,
    };

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.is_dir() {
        return Err(CliError::Io(format!(
            "Output directory '{}' does not exist",
            parent.display()
        )));
    }

    Ok(target.to_path_buf())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: AppConfig) -> Result<(), CliError> {
    let catalog = config.open_catalog()?;
    let server = config.server.clone();

    println!("Becas Scholarship Content Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:          {}", server.host);
    println!("  Port:          {}", server.port);
    println!("  Backend:       {}", config.backend);
    println!("  Database:      {:?}", config.database);
    println!("  Delete policy: {}", config.delete_policy);
    println!();
    println!("Endpoints:");
    println!("  GET  /convocatorias              - Public viewer");
    println!("  *    /admin/convocatorias/...    - Admin console");
    println!("  GET  /admin/export/convocatorias.csv - CSV export");
    println!("  GET  /status                     - Record counts");
    println!("  GET  /health                     - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", server.host, server.port);
    api::run_server(&addr, catalog, server).await?;
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(config: &AppConfig, force: bool) -> Result<(), CliError> {
    if config.backend == Backend::Memory {
        println!("Memory backend selected: nothing to initialize");
        return Ok(());
    }

    let db_path = &config.database;
    if db_path.exists() {
        if !force {
            return Err(CliError::Io(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| CliError::Io(format!("Remove {:?}: {}", db_path, e)))?;
        tracing::warn!("Removed existing database at {:?}", db_path);
    }

    let _catalog = Catalog::with_redb(db_path)?;
    println!("Initialized new redb database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show record counts.
pub fn cmd_status(config: &AppConfig, json_mode: bool) -> Result<(), CliError> {
    let catalog = config.open_catalog()?;
    let counts = catalog.counts()?;

    if json_mode {
        let output = serde_json::json!({
            "database": config.database.to_string_lossy(),
            "backend": config.backend,
            "deletePolicy": config.delete_policy,
            "counts": counts,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Becas Catalog Status");
    println!("====================");
    println!("Database:      {:?}", config.database);
    println!("Backend:       {}", config.backend);
    println!("Delete policy: {}", config.delete_policy);
    println!();
    println!("Editions:      {}", counts.editions);
    println!("Stages:        {}", counts.stages);
    println!("Sections:      {}", counts.sections);
    println!("Items:         {}", counts.items);

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write every edition to a CSV file.
pub fn cmd_export(config: &AppConfig, output: Option<&Path>) -> Result<(), CliError> {
    let catalog = config.open_catalog()?;
    let export = catalog.export_editions_csv(Utc::now().date_naive())?;
    let target = resolve_export_path(output, &export.file_name)?;

    std::fs::write(&target, export.content.as_bytes())
        .map_err(|e| CliError::Io(format!("Write file: {}", e)))?;

    println!(
        "Exported {} bytes to {:?}",
        export.content.len(),
        target
    );
    Ok(())
}

// =============================================================================
// SEED DEMO COMMAND
// =============================================================================

fn demo_requirements() -> [RequirementDraft; 2] {
    let identity = RequirementDraft {
        code: "REQ-01".to_string(),
        title: "Documento Nacional de Identidad".to_string(),
        description: "Copia simple del DNI vigente del postulante, legible por ambas caras."
            .to_string(),
        category: Category::PreConditions,
        subcategory: Subcategory::Acceso.as_str().to_string(),
        document_type: "DNI".to_string(),
        required_document: "Copia del DNI".to_string(),
        specifications: vec![
            "Formato PDF".to_string(),
            "Ambas caras en una sola hoja".to_string(),
        ],
        ..RequirementDraft::default()
    };

    let enrollment = RequirementDraft {
        code: "REQ-02".to_string(),
        title: "Constancia de ingreso a la IES".to_string(),
        description: "Constancia emitida por la institución de educación superior elegible."
            .to_string(),
        category: Category::Mandatory,
        subcategory: Subcategory::ConstanciaIes.as_str().to_string(),
        document_type: "Constancia".to_string(),
        required_document: "Constancia de ingreso".to_string(),
        specifications: vec!["Firmada por la autoridad competente".to_string()],
        ..RequirementDraft::default()
    };

    [identity, enrollment]
}

/// Create a sample edition for the current year, one stage seeded with the
/// preset sections, and two requirement items.
pub fn cmd_seed_demo(config: &AppConfig, json_mode: bool) -> Result<(), CliError> {
    let mut catalog = config.open_catalog()?;
    let year = Utc::now().year();

    let edition = catalog.create_edition(
        EditionDraft::new(format!("Beca 18 - {}", year), year)
            .with_description("Convocatoria de demostración generada por la CLI."),
    )?;
    let stage = catalog.create_stage(&edition.id, StageDraft::new("Etapa de Preselección"))?;
    let stage_path = StagePath::new(edition.id.clone(), stage.id.clone());
    let sections = catalog.seed_preset_sections(&stage_path)?;

    let mut items = Vec::new();
    if let Some(section) = sections
        .iter()
        .find(|s| s.content_type == REQUIREMENTS_CONTENT_TYPE)
    {
        let section_path = stage_path.section(section.id.clone());
        for draft in demo_requirements() {
            items.push(catalog.create_item(&section_path, draft)?);
        }
    }

    tracing::info!(
        edition = %edition.id,
        sections = sections.len(),
        items = items.len(),
        "Demo content seeded"
    );

    if json_mode {
        let output = serde_json::json!({
            "edition": edition,
            "stage": stage,
            "sections": sections,
            "items": items,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Seeded edition '{}' ({})", edition.name, edition.id);
    println!("  Stage:    {}", stage.name);
    println!("  Sections: {}", sections.len());
    println!("  Items:    {}", items.len());
    if config.backend == Backend::Memory {
        println!("Note: memory backend selected, nothing was persisted");
    }
    Ok(())
}
