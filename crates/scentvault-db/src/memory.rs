//! In-memory catalog, used for local development and tests.
//!
//! Ids are assigned as the next integer after the highest numeric id held.

use async_trait::async_trait;
use tokio::sync::RwLock;

use scentvault_core::{CatalogRepository, Error, Perfume, PerfumeInput, Result};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    entries: RwLock<Vec<Perfume>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, keeping their ids.
    pub fn with_entries(entries: Vec<Perfume>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    fn next_id(entries: &[Perfume]) -> String {
        let max = entries
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

/// Display number first (missing last), then name.
fn catalog_order(a: &Perfume, b: &Perfume) -> std::cmp::Ordering {
    match (a.number, b.number) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Perfume>> {
        let mut all = self.entries.read().await.clone();
        all.sort_by(catalog_order);
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<Perfume>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, input: PerfumeInput) -> Result<String> {
        input.validate()?;
        let mut entries = self.entries.write().await;
        let id = Self::next_id(&entries);
        entries.push(Perfume::from_input(id.clone(), input));
        Ok(id)
    }

    async fn update(&self, id: &str, input: PerfumeInput) -> Result<()> {
        input.validate()?;
        let mut entries = self.entries.write().await;
        let slot = entries
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PerfumeNotFound(id.to_string()))?;
        *slot = Perfume::from_input(id, input);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|p| p.id != id);
        if entries.len() == before {
            return Err(Error::PerfumeNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.entries.read().await.len() as i64)
    }
}
