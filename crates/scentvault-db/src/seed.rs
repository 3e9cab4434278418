//! Catalog seeding from a JSON file.
//!
//! The file holds an array of perfume objects in the API's camelCase shape
//! (`name`, `topNotes`, `targetAudience`, ...).

use std::path::Path;

use tracing::info;

use scentvault_core::{CatalogRepository, Error, PerfumeInput, Result};

/// Parse a seed file into validated inputs.
pub async fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<PerfumeInput>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let inputs: Vec<PerfumeInput> = serde_json::from_slice(&bytes).map_err(|e| {
        Error::Serialization(format!("Invalid seed file {}: {}", path.display(), e))
    })?;
    for input in &inputs {
        input.validate()?;
    }
    Ok(inputs)
}

/// Insert `inputs` only when the catalog is empty. Returns the number inserted.
pub async fn seed_if_empty(repo: &dyn CatalogRepository, inputs: Vec<PerfumeInput>) -> Result<usize> {
    if repo.count().await? > 0 {
        info!(subsystem = "db", component = "seed", "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let total = inputs.len();
    for input in inputs {
        repo.insert(input).await?;
    }
    info!(subsystem = "db", component = "seed", result_count = total, "Catalog seeded");
    Ok(total)
}
