//! Flow orchestration for the perfume assistant.
//!
//! A chat turn is driven through [`FlowState`]: the model either answers
//! directly or requests one catalog tool. Search results go back to the model
//! for a summary; mixer ingredients go to the [`RecipeGenerator`] instead.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use scentvault_core::{
    with_timeout, CatalogItem, CatalogRepository, ChatBackend, ChatReply, ChatRequest, ChatRole,
    ChatTurn, Message, MixRecipe, ModelReply, Perfume, Recommendations, Result, ToolCall,
};

use crate::config::AssistantConfig;
use crate::prompts::{
    admin_system_prompt, public_system_prompt, recommend_prompt, APOLOGY_MESSAGE,
    DECLINE_MESSAGE, RECOMMEND_SYSTEM_PROMPT,
};
use crate::recipe::{format_recipe, RecipeGenerator};
use crate::tools::{tool_payload, CatalogTool, CatalogTools};

/// Which conversation surface a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Admin dashboard: search and mixer.
    Admin,
    /// Public catalog page: search only.
    Public,
}

impl Flow {
    fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Public => "public",
        }
    }

    fn tools(self) -> &'static [CatalogTool] {
        match self {
            Self::Admin => &[CatalogTool::SearchCatalog, CatalogTool::FindMixIngredients],
            Self::Public => &[CatalogTool::SearchCatalog],
        }
    }
}

/// State of one chat turn.
#[derive(Debug)]
enum FlowState {
    AwaitingModelResponse,
    SearchRequested(ToolCall),
    MixerRequested(ToolCall),
    AwaitingSecondaryGeneration(Vec<CatalogItem>),
    Responding(Option<String>),
}

impl FlowState {
    fn label(&self) -> &'static str {
        match self {
            Self::AwaitingModelResponse => "awaiting_model_response",
            Self::SearchRequested(_) => "search_requested",
            Self::MixerRequested(_) => "mixer_requested",
            Self::AwaitingSecondaryGeneration(_) => "awaiting_secondary_generation",
            Self::Responding(_) => "responding",
        }
    }
}

/// Structured output of the recommender.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
struct RecommendPicks {
    /// Catalog names, best match first.
    picks: Vec<String>,
}

/// The perfume assistant.
#[derive(Clone)]
pub struct PerfumeAssistant {
    backend: Arc<dyn ChatBackend>,
    tools: CatalogTools,
    recipes: RecipeGenerator,
    config: AssistantConfig,
}

impl PerfumeAssistant {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        backend: Arc<dyn ChatBackend>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            tools: CatalogTools::new(catalog, config.store_timeout),
            recipes: RecipeGenerator::new(backend.clone(), config.gen_timeout),
            backend,
            config,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Admin assistant turn. Both tools are available.
    pub async fn chat(
        &self,
        query: &str,
        file_content: Option<&str>,
        history: &[ChatTurn],
    ) -> ChatReply {
        let response = self.run_flow(Flow::Admin, query, file_content, history).await;
        ChatReply { response }
    }

    /// Public catalog assistant turn. Only search is available.
    pub async fn public_chat(&self, query: &str, history: &[ChatTurn]) -> ChatReply {
        let response = self.run_flow(Flow::Public, query, None, history).await;
        ChatReply { response }
    }

    /// Standalone mixer.
    ///
    /// Empty ingredients give a recipe-less decline; a generation failure is
    /// returned as an error.
    #[instrument(skip(self, preference), fields(subsystem = "chat", component = "assistant", op = "mix_perfume"))]
    pub async fn mix_perfume(&self, preference: &str) -> Result<MixRecipe> {
        let ingredients = self
            .tools
            .run(CatalogTool::FindMixIngredients, preference, self.config.mix_limit)
            .await;

        if ingredients.is_empty() {
            info!("No mix ingredients found, declining");
            return Ok(MixRecipe {
                mix_name: String::new(),
                recipe: Vec::new(),
                description: DECLINE_MESSAGE.to_string(),
            });
        }

        self.recipes.generate(preference, &ingredients).await
    }

    /// Standalone recommender.
    ///
    /// The model reorders the relevance-filtered candidates; when it fails
    /// the filter order is kept.
    #[instrument(skip(self, query), fields(subsystem = "chat", component = "assistant", op = "recommend_perfume"))]
    pub async fn recommend_perfume(&self, query: &str) -> Recommendations {
        let candidates = self
            .tools
            .lookup(CatalogTool::SearchCatalog, query, self.config.recommend_limit)
            .await;

        if candidates.is_empty() {
            return Recommendations {
                recommendations: Vec::new(),
            };
        }

        let recommendations = match self.rank_candidates(query, &candidates).await {
            Ok(Some(ranked)) => ranked,
            Ok(None) => {
                warn!("Recommender produced no usable picks, keeping filter order");
                candidates
            }
            Err(e) => {
                warn!(error = %e, "Recommender generation failed, keeping filter order");
                candidates
            }
        };

        Recommendations { recommendations }
    }

    async fn rank_candidates(
        &self,
        query: &str,
        candidates: &[Perfume],
    ) -> Result<Option<Vec<Perfume>>> {
        let items: Vec<CatalogItem> = candidates.iter().map(CatalogItem::from).collect();
        let schema = serde_json::to_value(schemars::schema_for!(RecommendPicks))?;
        let prompt = recommend_prompt(query, &tool_payload(&items));

        let value = with_timeout(
            self.config.gen_timeout,
            "recommendation",
            self.backend
                .generate_structured(RECOMMEND_SYSTEM_PROMPT, &prompt, &schema),
        )
        .await?;

        let Some(picks) = value.and_then(|v| serde_json::from_value::<RecommendPicks>(v).ok())
        else {
            return Ok(None);
        };

        Ok(Some(reorder_by_picks(candidates, &picks.picks)).filter(|r| !r.is_empty()))
    }

    #[instrument(skip(self, query, file_content, history), fields(subsystem = "chat", component = "assistant", op = "chat", flow = flow.as_str(), history_len = history.len()))]
    async fn run_flow(
        &self,
        flow: Flow,
        query: &str,
        file_content: Option<&str>,
        history: &[ChatTurn],
    ) -> String {
        let start = Instant::now();

        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message::from(&ChatTurn {
            role: ChatRole::User,
            content: query.to_string(),
            file_preview: file_content.map(str::to_string),
        }));

        let system = match flow {
            Flow::Admin => admin_system_prompt(),
            Flow::Public => public_system_prompt(),
        };
        let search_cap = match flow {
            Flow::Admin => self.config.search_limit,
            Flow::Public => self.config.public_search_limit,
        };

        let mut state = FlowState::AwaitingModelResponse;
        let text = loop {
            debug!(state = state.label(), "Flow state");
            state = match state {
                FlowState::AwaitingModelResponse => {
                    let request = ChatRequest {
                        system: system.clone(),
                        messages: messages.clone(),
                        tools: flow.tools().iter().map(|t| t.spec()).collect(),
                    };
                    match self.generate(request).await {
                        Some(ModelReply::Text(text)) => FlowState::Responding(text),
                        Some(ModelReply::ToolCall(call)) => {
                            match CatalogTool::from_name(&call.name)
                                .filter(|tool| flow.tools().contains(tool))
                            {
                                Some(CatalogTool::SearchCatalog) => FlowState::SearchRequested(call),
                                Some(CatalogTool::FindMixIngredients) => {
                                    FlowState::MixerRequested(call)
                                }
                                None => {
                                    warn!(tool = %call.name, "Model requested a tool not registered for this flow");
                                    FlowState::Responding(None)
                                }
                            }
                        }
                        None => FlowState::Responding(None),
                    }
                }

                FlowState::SearchRequested(call) => {
                    let tool_query = call.str_arg("query").unwrap_or(query).to_string();
                    debug!(tool = %call.name, query = %tool_query, "Search tool chosen");
                    let items = self
                        .tools
                        .run(CatalogTool::SearchCatalog, &tool_query, search_cap)
                        .await;

                    let payload = tool_payload(&items);
                    messages.push(Message::assistant_tool_call(call.clone()));
                    messages.push(Message::tool_result(&call, payload));

                    let follow_up = ChatRequest {
                        system: system.clone(),
                        messages: messages.clone(),
                        tools: Vec::new(),
                    };
                    match self.generate(follow_up).await {
                        Some(ModelReply::Text(text)) => FlowState::Responding(text),
                        Some(ModelReply::ToolCall(extra)) => {
                            warn!(tool = %extra.name, "Model requested a tool on the summary turn");
                            FlowState::Responding(None)
                        }
                        None => FlowState::Responding(None),
                    }
                }

                FlowState::MixerRequested(call) => {
                    let tool_query = call.str_arg("query").unwrap_or(query).to_string();
                    debug!(tool = %call.name, query = %tool_query, "Mixer tool chosen");
                    let items = self
                        .tools
                        .run(CatalogTool::FindMixIngredients, &tool_query, self.config.mix_limit)
                        .await;

                    if items.is_empty() {
                        info!("No mix ingredients found, declining");
                        FlowState::Responding(Some(DECLINE_MESSAGE.to_string()))
                    } else {
                        FlowState::AwaitingSecondaryGeneration(items)
                    }
                }

                FlowState::AwaitingSecondaryGeneration(items) => {
                    match self.recipes.generate(query, &items).await {
                        Ok(recipe) => FlowState::Responding(Some(format_recipe(&recipe))),
                        Err(e) => {
                            warn!(error = %e, "Recipe generation failed, apologizing");
                            FlowState::Responding(None)
                        }
                    }
                }

                FlowState::Responding(text) => break text,
            };
        };

        let response = match text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(text) => text,
            None => {
                warn!("No usable answer, replying with apology");
                APOLOGY_MESSAGE.to_string()
            }
        };

        info!(
            response_len = response.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat turn complete"
        );
        response
    }

    /// One chat generation under the configured timeout. Failures are logged
    /// and reported as `None`.
    async fn generate(&self, request: ChatRequest) -> Option<ModelReply> {
        match with_timeout(self.config.gen_timeout, "chat generation", self.backend.chat(request))
            .await
        {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, model = self.backend.model_name(), "Chat generation failed");
                None
            }
        }
    }
}

/// Candidates in pick order; unknown and repeated names are dropped.
fn reorder_by_picks(candidates: &[Perfume], picks: &[String]) -> Vec<Perfume> {
    let folded: Vec<String> = candidates.iter().map(|p| p.name.to_lowercase()).collect();
    let mut used = vec![false; candidates.len()];
    let mut ranked = Vec::with_capacity(candidates.len());

    for pick in picks {
        let wanted = pick.trim().to_lowercase();
        if let Some(idx) = folded
            .iter()
            .enumerate()
            .position(|(i, name)| !used[i] && *name == wanted)
        {
            used[idx] = true;
            ranked.push(candidates[idx].clone());
        }
    }
    ranked
}
