//! Recipe generator: the second model call of the mixer path.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use scentvault_core::{with_timeout, CatalogItem, ChatBackend, Error, MixRecipe, Result};

use crate::prompts::{recipe_prompt, RECIPE_SYSTEM_PROMPT};
use crate::tools::tool_payload;

/// JSON schema of [`MixRecipe`] handed to the backend.
pub fn mix_recipe_schema() -> JsonValue {
    serde_json::to_value(schemars::schema_for!(MixRecipe)).unwrap_or(JsonValue::Null)
}

/// Invents a named blend from catalog ingredients.
#[derive(Clone)]
pub struct RecipeGenerator {
    backend: Arc<dyn ChatBackend>,
    timeout: Duration,
    schema: JsonValue,
}

impl RecipeGenerator {
    pub fn new(backend: Arc<dyn ChatBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            schema: mix_recipe_schema(),
        }
    }

    /// Generate a recipe for `preference` from `ingredients`.
    ///
    /// Callers must not pass an empty ingredient list. Missing or malformed
    /// structured output is an [`Error::Inference`].
    #[instrument(skip(self, preference, ingredients), fields(subsystem = "chat", component = "recipe", op = "generate", candidate_count = ingredients.len()))]
    pub async fn generate(&self, preference: &str, ingredients: &[CatalogItem]) -> Result<MixRecipe> {
        if ingredients.is_empty() {
            return Err(Error::InvalidInput(
                "recipe generation needs at least one ingredient".to_string(),
            ));
        }

        let prompt = recipe_prompt(preference, &tool_payload(ingredients));
        let value = with_timeout(
            self.timeout,
            "recipe generation",
            self.backend
                .generate_structured(RECIPE_SYSTEM_PROMPT, &prompt, &self.schema),
        )
        .await?
        .ok_or_else(|| Error::Inference("recipe generator produced no output".to_string()))?;

        let recipe: MixRecipe = serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("recipe output does not match schema: {}", e)))?;

        debug!(
            mix_name = %recipe.mix_name,
            lines = recipe.recipe.len(),
            "Recipe generated"
        );
        Ok(recipe)
    }
}

/// Render a recipe for the chat reply.
pub fn format_recipe(recipe: &MixRecipe) -> String {
    let lines: Vec<String> = recipe
        .recipe
        .iter()
        .map(|line| format!("- {} bagian {}", line.parts, line.perfume_name))
        .collect();

    format!(
        "**Nama Campuran:** {}\n\n**Resep:**\n{}\n\n**Deskripsi:**\n{}",
        recipe.mix_name,
        lines.join("\n"),
        recipe.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvault_core::RecipeLine;
    use scentvault_db::test_fixtures::PerfumeBuilder;
    use scentvault_inference::mock::{MockCall, MockChatBackend};
    use serde_json::json;

    fn ingredients() -> Vec<CatalogItem> {
        vec![
            CatalogItem::from(&PerfumeBuilder::new("1", "Vanilla Dream").build()),
            CatalogItem::from(&PerfumeBuilder::new("2", "Amber Night").build()),
        ]
    }

    #[test]
    fn test_format_recipe_template() {
        let recipe = MixRecipe {
            mix_name: "Senja Manis".to_string(),
            recipe: vec![
                RecipeLine {
                    perfume_name: "Vanilla Dream".to_string(),
                    parts: 2,
                },
                RecipeLine {
                    perfume_name: "Amber Night".to_string(),
                    parts: 1,
                },
            ],
            description: "Hangat dan lembut.".to_string(),
        };

        assert_eq!(
            format_recipe(&recipe),
            "**Nama Campuran:** Senja Manis\n\n**Resep:**\n- 2 bagian Vanilla Dream\n- 1 bagian Amber Night\n\n**Deskripsi:**\nHangat dan lembut."
        );
    }

    #[test]
    fn test_schema_uses_wire_field_names() {
        let schema = mix_recipe_schema();
        let props = &schema["properties"];
        assert!(props.get("mixName").is_some());
        assert!(props.get("recipe").is_some());
        assert!(props.get("description").is_some());
    }

    #[tokio::test]
    async fn test_generate_parses_structured_output() {
        let backend = MockChatBackend::new().then_structured(json!({
            "mixName": "Senja Manis",
            "recipe": [{"perfumeName": "Vanilla Dream", "parts": 2}],
            "description": "Hangat."
        }));
        let generator = RecipeGenerator::new(Arc::new(backend.clone()), Duration::from_secs(5));

        let recipe = generator
            .generate("manis dan hangat", &ingredients())
            .await
            .unwrap();
        assert_eq!(recipe.mix_name, "Senja Manis");
        assert_eq!(recipe.recipe[0].parts, 2);

        match &backend.calls()[0] {
            MockCall::Structured { prompt, system, .. } => {
                assert!(prompt.contains("manis dan hangat"));
                assert!(prompt.contains("Amber Night"));
                assert_eq!(system, RECIPE_SYSTEM_PROMPT);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_output_is_inference_error() {
        let backend = MockChatBackend::new().then_no_structured();
        let generator = RecipeGenerator::new(Arc::new(backend), Duration::from_secs(5));

        let err = generator.generate("x", &ingredients()).await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_malformed_output_is_inference_error() {
        let backend = MockChatBackend::new().then_structured(json!({"name": "wrong shape"}));
        let generator = RecipeGenerator::new(Arc::new(backend), Duration::from_secs(5));

        let err = generator.generate("x", &ingredients()).await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_empty_ingredients_never_reach_backend() {
        let backend = MockChatBackend::new();
        let generator = RecipeGenerator::new(Arc::new(backend.clone()), Duration::from_secs(5));

        assert!(generator.generate("x", &[]).await.is_err());
        assert_eq!(backend.structured_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let backend = MockChatBackend::new()
            .then_structured(json!({}))
            .with_latency(Duration::from_secs(600));
        let generator = RecipeGenerator::new(Arc::new(backend), Duration::from_secs(120));

        let err = generator.generate("x", &ingredients()).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }
}
