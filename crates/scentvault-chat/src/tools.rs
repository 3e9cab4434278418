//! Catalog tools exposed to the model.
//!
//! Both tools read the whole catalog once and run the shared relevance
//! filter; they only differ in their description and result cap. A failing
//! or slow store never surfaces as an error here: the tool logs and returns
//! an empty result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{debug, warn};

use scentvault_core::{with_timeout, CatalogItem, CatalogRepository, Perfume, ToolSpec};
use scentvault_search::filter_catalog;

/// Tools the assistant can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTool {
    SearchCatalog,
    FindMixIngredients,
}

impl CatalogTool {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchCatalog => "searchCatalog",
            Self::FindMixIngredients => "findMixIngredients",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "searchCatalog" => Some(Self::SearchCatalog),
            "findMixIngredients" => Some(Self::FindMixIngredients),
            _ => None,
        }
    }

    /// Declaration offered to the model.
    pub fn spec(self) -> ToolSpec {
        let (description, query_hint) = match self {
            Self::SearchCatalog => (
                "Cari parfum di katalog berdasarkan nama, notes, keluarga aroma, kegunaan, \
                 kesempatan, target, atau kualitas. Mengembalikan daftar parfum yang relevan.",
                "Kata kunci pencarian dari pertanyaan pengguna",
            ),
            Self::FindMixIngredients => (
                "Temukan parfum katalog yang cocok sebagai bahan untuk mencampur atau meracik \
                 parfum baru sesuai aroma yang diinginkan pengguna.",
                "Deskripsi aroma atau notes yang ingin dicampur",
            ),
        };

        ToolSpec {
            name: self.name().to_string(),
            description: description.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": query_hint}
                },
                "required": ["query"]
            }),
        }
    }
}

/// Executes catalog tools against a store.
#[derive(Clone)]
pub struct CatalogTools {
    catalog: Arc<dyn CatalogRepository>,
    store_timeout: Duration,
}

impl CatalogTools {
    pub fn new(catalog: Arc<dyn CatalogRepository>, store_timeout: Duration) -> Self {
        Self {
            catalog,
            store_timeout,
        }
    }

    /// Ranked catalog entries for `query`, at most `cap`.
    ///
    /// Store errors and timeouts are logged at WARN and yield an empty result.
    pub async fn lookup(&self, tool: CatalogTool, query: &str, cap: usize) -> Vec<Perfume> {
        let start = Instant::now();

        let catalog = match with_timeout(self.store_timeout, "catalog read", self.catalog.list_all())
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    component = "tools",
                    tool = tool.name(),
                    error = %e,
                    "Catalog read failed, returning no results"
                );
                return Vec::new();
            }
        };

        let ranked = filter_catalog(query, &catalog, cap);
        debug!(
            subsystem = "chat",
            component = "tools",
            tool = tool.name(),
            query = %query,
            candidate_count = catalog.len(),
            result_count = ranked.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool executed"
        );
        ranked
    }

    /// Run a tool and project the result to its tool-facing shape.
    pub async fn run(&self, tool: CatalogTool, query: &str, cap: usize) -> Vec<CatalogItem> {
        self.lookup(tool, query, cap)
            .await
            .iter()
            .map(CatalogItem::from)
            .collect()
    }
}

/// JSON payload of a tool result as fed back to the model.
pub fn tool_payload(items: &[CatalogItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scentvault_core::{Error, PerfumeInput, Result};
    use scentvault_db::test_fixtures::PerfumeBuilder;
    use scentvault_db::InMemoryCatalogRepository;

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogRepository for BrokenCatalog {
        async fn list_all(&self) -> Result<Vec<Perfume>> {
            Err(Error::Request("store unavailable".to_string()))
        }
        async fn get(&self, _id: &str) -> Result<Option<Perfume>> {
            unreachable!()
        }
        async fn insert(&self, _input: PerfumeInput) -> Result<String> {
            unreachable!()
        }
        async fn update(&self, _id: &str, _input: PerfumeInput) -> Result<()> {
            unreachable!()
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            unreachable!()
        }
        async fn count(&self) -> Result<i64> {
            unreachable!()
        }
    }

    struct StalledCatalog;

    #[async_trait]
    impl CatalogRepository for StalledCatalog {
        async fn list_all(&self) -> Result<Vec<Perfume>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
        async fn get(&self, _id: &str) -> Result<Option<Perfume>> {
            unreachable!()
        }
        async fn insert(&self, _input: PerfumeInput) -> Result<String> {
            unreachable!()
        }
        async fn update(&self, _id: &str, _input: PerfumeInput) -> Result<()> {
            unreachable!()
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            unreachable!()
        }
        async fn count(&self) -> Result<i64> {
            unreachable!()
        }
    }

    fn tools_over(entries: Vec<Perfume>) -> CatalogTools {
        CatalogTools::new(
            Arc::new(InMemoryCatalogRepository::with_entries(entries)),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in [CatalogTool::SearchCatalog, CatalogTool::FindMixIngredients] {
            assert_eq!(CatalogTool::from_name(tool.name()), Some(tool));
            assert_eq!(tool.spec().name, tool.name());
            assert_eq!(tool.spec().parameters["required"][0], "query");
        }
        assert_eq!(CatalogTool::from_name("deleteCatalog"), None);
    }

    #[tokio::test]
    async fn test_run_projects_items_with_number_default() {
        let tools = tools_over(vec![
            PerfumeBuilder::new("1", "Sunset Oud").number(3).build(),
            PerfumeBuilder::new("2", "Oud Noir").build(),
            PerfumeBuilder::new("3", "Ocean Breeze").number(1).build(),
        ]);

        let items = tools.run(CatalogTool::SearchCatalog, "oud please", 10).await;
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Sunset Oud", "Oud Noir"]);
        assert_eq!(items[0].number, 3);
        assert_eq!(items[1].number, 0);
    }

    #[tokio::test]
    async fn test_cap_is_applied() {
        let entries = (1..=8)
            .map(|i| PerfumeBuilder::new(&i.to_string(), &format!("Rose {}", i)).number(i).build())
            .collect();
        let tools = tools_over(entries);

        assert_eq!(tools.run(CatalogTool::FindMixIngredients, "rose", 5).await.len(), 5);
        assert_eq!(tools.run(CatalogTool::SearchCatalog, "rose", 10).await.len(), 8);
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty() {
        let tools = CatalogTools::new(Arc::new(BrokenCatalog), Duration::from_secs(1));
        assert!(tools.run(CatalogTool::SearchCatalog, "oud", 10).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_timeout_yields_empty() {
        let tools = CatalogTools::new(Arc::new(StalledCatalog), Duration::from_secs(15));
        assert!(tools.run(CatalogTool::SearchCatalog, "oud", 10).await.is_empty());
    }

    #[test]
    fn test_tool_payload_uses_camel_case() {
        let perfume = PerfumeBuilder::new("1", "Sunset Oud")
            .notes("Saffron", "Rose", "Oud")
            .build();
        let payload = tool_payload(&[CatalogItem::from(&perfume)]);
        assert!(payload.contains("\"topNotes\":\"Saffron\""));
        assert!(payload.contains("\"baseNotes\":\"Oud\""));
        assert_eq!(tool_payload(&[]), "[]");
    }
}
