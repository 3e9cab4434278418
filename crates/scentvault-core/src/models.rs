//! Core data models for ScentVault.
//!
//! These types are shared across all ScentVault crates: the catalog entities,
//! the tool-facing projection handed to the language model, the mixer output,
//! and the provider-neutral conversation types the chat backends speak.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// =============================================================================
// CATALOG TYPES
// =============================================================================

/// Intended wearer of a perfume. Closed set; anything else is a data-entry error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum TargetAudience {
    Male,
    Female,
    Unisex,
}

impl std::fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Unisex => write!(f, "Unisex"),
        }
    }
}

impl std::str::FromStr for TargetAudience {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unisex" => Ok(Self::Unisex),
            _ => Err(format!("Invalid target audience: {}", s)),
        }
    }
}

/// Concentration tier. Closed set; anything else is a data-entry error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum QualityTier {
    Premium,
    Extrait,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Premium => write!(f, "Premium"),
            Self::Extrait => write!(f, "Extrait"),
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "premium" => Ok(Self::Premium),
            "extrait" => Ok(Self::Extrait),
            _ => Err(format!("Invalid quality tier: {}", s)),
        }
    }
}

/// One perfume record in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Perfume {
    /// Opaque store key.
    pub id: String,
    /// Display order. Older records may not carry one.
    #[serde(default)]
    pub number: Option<i32>,
    pub name: String,
    pub description: String,
    pub top_notes: String,
    pub middle_notes: String,
    pub base_notes: String,
    pub usage_context: String,
    pub target_audience: TargetAudience,
    pub occasion_location: String,
    pub scent_family: String,
    pub quality_tier: QualityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Perfume {
    /// Build a stored record from an id and the editable fields.
    pub fn from_input(id: impl Into<String>, input: PerfumeInput) -> Self {
        Self {
            id: id.into(),
            number: input.number,
            name: input.name,
            description: input.description,
            top_notes: input.top_notes,
            middle_notes: input.middle_notes,
            base_notes: input.base_notes,
            usage_context: input.usage_context,
            target_audience: input.target_audience,
            occasion_location: input.occasion_location,
            scent_family: input.scent_family,
            quality_tier: input.quality_tier,
            image_url: input.image_url,
        }
    }

    /// Lower-cased concatenation of every descriptive and classification
    /// field, used for keyword matching.
    pub fn search_blob(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.top_notes.as_str(),
            self.middle_notes.as_str(),
            self.base_notes.as_str(),
            self.scent_family.as_str(),
            self.usage_context.as_str(),
            self.occasion_location.as_str(),
            &self.target_audience.to_string(),
            &self.quality_tier.to_string(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// Editable fields of a perfume, used for add and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerfumeInput {
    #[serde(default)]
    pub number: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub top_notes: String,
    #[serde(default)]
    pub middle_notes: String,
    #[serde(default)]
    pub base_notes: String,
    #[serde(default)]
    pub usage_context: String,
    pub target_audience: TargetAudience,
    #[serde(default)]
    pub occasion_location: String,
    #[serde(default)]
    pub scent_family: String,
    pub quality_tier: QualityTier,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PerfumeInput {
    /// Reject inputs the catalog cannot hold.
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::InvalidInput(
                "Perfume name must not be empty".to_string(),
            ));
        }
        if let Some(n) = self.number {
            if n < 0 {
                return Err(crate::Error::InvalidInput(format!(
                    "Perfume number must not be negative, got {}",
                    n
                )));
            }
        }
        Ok(())
    }
}

impl From<Perfume> for PerfumeInput {
    fn from(p: Perfume) -> Self {
        Self {
            number: p.number,
            name: p.name,
            description: p.description,
            top_notes: p.top_notes,
            middle_notes: p.middle_notes,
            base_notes: p.base_notes,
            usage_context: p.usage_context,
            target_audience: p.target_audience,
            occasion_location: p.occasion_location,
            scent_family: p.scent_family,
            quality_tier: p.quality_tier,
            image_url: p.image_url,
        }
    }
}

/// Tool-facing projection of a [`Perfume`], in the field names the tool
/// schemas document to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub number: i32,
    pub name: String,
    pub description: String,
    pub top_notes: String,
    pub middle_notes: String,
    pub base_notes: String,
    pub scent_family: String,
    pub usage: String,
    pub occasion: String,
    pub audience: String,
    pub quality: String,
}

impl From<&Perfume> for CatalogItem {
    fn from(p: &Perfume) -> Self {
        Self {
            number: p.number.unwrap_or(0),
            name: p.name.clone(),
            description: p.description.clone(),
            top_notes: p.top_notes.clone(),
            middle_notes: p.middle_notes.clone(),
            base_notes: p.base_notes.clone(),
            scent_family: p.scent_family.clone(),
            usage: p.usage_context.clone(),
            occasion: p.occasion_location.clone(),
            audience: p.target_audience.to_string(),
            quality: p.quality_tier.to_string(),
        }
    }
}

// =============================================================================
// MIXER TYPES
// =============================================================================

/// One line of a mix: how many parts of which catalog perfume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLine {
    /// Name of the catalog perfume used as a base.
    pub perfume_name: String,
    /// Number of parts of this perfume in the blend.
    pub parts: u32,
}

/// A named blend invented from catalog perfumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MixRecipe {
    /// Creative name for the new blend.
    pub mix_name: String,
    /// Ordered recipe lines.
    pub recipe: Vec<RecipeLine>,
    /// How the source notes combine.
    pub description: String,
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Speaker of a conversation turn held by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn of a client-held conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    /// Preview of a file attached to this turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_preview: Option<String>,
}

/// Final answer of a chat flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatReply {
    pub response: String,
}

/// Output of the standalone recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Recommendations {
    pub recommendations: Vec<Perfume>,
}

// =============================================================================
// MODEL CONVERSATION TYPES
// =============================================================================

/// Role of a message sent to a chat backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned id correlating the call with its result.
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments.
    pub arguments: JsonValue,
}

impl ToolCall {
    /// Read a string argument by key.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// A message in a model conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Option<String>,
    /// Present on an assistant message that requested a tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Present on a tool result message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool name, present on a tool result message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
            tool_call: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(content.into()),
            tool_call: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant_tool_call(call: ToolCall) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_call: Some(call),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_call: None,
            tool_call_id: Some(call.id.clone()),
            name: Some(call.name.clone()),
        }
    }
}

impl From<&ChatTurn> for Message {
    fn from(turn: &ChatTurn) -> Self {
        let content = match &turn.file_preview {
            Some(preview) if !preview.is_empty() => {
                format!("{}\n\n[File]\n{}", turn.content, preview)
            }
            _ => turn.content.clone(),
        };
        match turn.role {
            ChatRole::User => Message::user(content),
            ChatRole::Assistant => Message::assistant(content),
        }
    }
}

/// Declaration of a tool the model may invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    /// Natural-language description the model selects on.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: JsonValue,
}

/// One request to a chat backend.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub system: String,
    pub messages: Vec<Message>,
    /// Empty means the model must answer in text.
    pub tools: Vec<ToolSpec>,
}

/// What the model did with a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// No tool invoked. `None` when the model produced no usable text.
    Text(Option<String>),
    /// The model invoked a tool.
    ToolCall(ToolCall),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Perfume {
        Perfume {
            id: "p1".to_string(),
            number: None,
            name: "Sunset Oud".to_string(),
            description: "Warm Resin".to_string(),
            top_notes: "Saffron".to_string(),
            middle_notes: "Rose".to_string(),
            base_notes: "Oud, Amber".to_string(),
            usage_context: "Evening".to_string(),
            target_audience: TargetAudience::Unisex,
            occasion_location: "Indoor".to_string(),
            scent_family: "Woody".to_string(),
            quality_tier: QualityTier::Extrait,
            image_url: None,
        }
    }

    #[test]
    fn test_target_audience_round_trips_through_str() {
        for a in [TargetAudience::Male, TargetAudience::Female, TargetAudience::Unisex] {
            assert_eq!(a.to_string().parse::<TargetAudience>().unwrap(), a);
        }
        assert_eq!("  male ".parse::<TargetAudience>().unwrap(), TargetAudience::Male);
    }

    #[test]
    fn test_closed_enumerations_reject_unknown_values() {
        assert!("Kids".parse::<TargetAudience>().is_err());
        assert!("EDT".parse::<QualityTier>().is_err());

        let json = r#"{"name":"X","targetAudience":"Kids","qualityTier":"Premium"}"#;
        assert!(serde_json::from_str::<PerfumeInput>(json).is_err());
    }

    #[test]
    fn test_search_blob_is_lowercase_and_covers_classification() {
        let blob = sample().search_blob();
        assert!(blob.contains("sunset oud"));
        assert!(blob.contains("oud, amber"));
        assert!(blob.contains("woody"));
        assert!(blob.contains("unisex"));
        assert!(blob.contains("extrait"));
        assert!(!blob.contains("Saffron"));
    }

    #[test]
    fn test_catalog_item_defaults_missing_number_to_zero() {
        let item = CatalogItem::from(&sample());
        assert_eq!(item.number, 0);
        assert_eq!(item.audience, "Unisex");
        assert_eq!(item.usage, "Evening");

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("topNotes").is_some());
        assert!(json.get("scentFamily").is_some());
    }

    #[test]
    fn test_perfume_input_validation() {
        let mut input = PerfumeInput::from(sample());
        assert!(input.validate().is_ok());

        input.name = "   ".to_string();
        assert!(input.validate().is_err());

        input.name = "Ok".to_string();
        input.number = Some(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_perfume_json_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["targetAudience"], "Unisex");
        assert_eq!(json["qualityTier"], "Extrait");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_mix_recipe_schema_names_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(MixRecipe)).unwrap();
        let text = schema.to_string();
        assert!(text.contains("mixName"));
        assert!(text.contains("perfumeName"));
        assert!(text.contains("parts"));
    }

    #[test]
    fn test_chat_turn_with_file_becomes_single_user_message() {
        let turn = ChatTurn {
            role: ChatRole::User,
            content: "cek ini".to_string(),
            file_preview: Some("isi file".to_string()),
        };
        let msg = Message::from(&turn);
        assert_eq!(msg.role, MessageRole::User);
        let content = msg.content.unwrap();
        assert!(content.starts_with("cek ini"));
        assert!(content.contains("isi file"));
    }

    #[test]
    fn test_tool_call_str_arg() {
        let call = ToolCall {
            id: "c1".to_string(),
            name: "searchCatalog".to_string(),
            arguments: serde_json::json!({"query": "vanilla"}),
        };
        assert_eq!(call.str_arg("query"), Some("vanilla"));
        assert_eq!(call.str_arg("missing"), None);
    }
}
