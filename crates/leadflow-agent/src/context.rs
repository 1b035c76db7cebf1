// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grounding-context assembly for generative backend requests.
//!
//! Builds the fixed instruction preamble, renders the catalog as
//! name/description/price lines, and converts the ordered turn history into
//! the backend's message format.

use leadflow_config::model::AgentConfig;
use leadflow_core::types::{BackendMessage, CompletionRequest, Product, Turn, TurnRole};
use tracing::info;

/// Default instruction preamble, mirroring the assistant's goals: understand
/// needs, recommend from the catalog, elicit contact info naturally, stay
/// conversational.
const DEFAULT_PREAMBLE: &str = "\
You are an intelligent AI sales assistant. Your role is to:
1. Understand the visitor's needs and pain points
2. Recommend relevant products from the catalog below
3. Capture lead information (name, email, phone) naturally in conversation
4. Be professional, helpful, and conversion-focused

Guidelines:
- Ask about their business challenges before recommending products
- When you identify a good fit, mention 2-3 specific features that solve their needs
- Naturally ask for contact info if they show interest
- Be conversational and personable, not pushy
- If they share contact info, acknowledge it and say someone will follow up";

/// Loads the instruction preamble following config priority: file > inline > default.
pub async fn load_preamble(config: &AgentConfig) -> String {
    // Priority 1: file path
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded instruction preamble from file");
                    return trimmed;
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read instruction preamble file, falling back"
                );
            }
        }
    }

    // Priority 2: inline string
    if let Some(ref prompt) = config.system_prompt
        && !prompt.is_empty()
    {
        return prompt.clone();
    }

    // Priority 3: default
    DEFAULT_PREAMBLE.to_string()
}

/// Renders the catalog as name/description/price lines for the preamble.
pub fn render_catalog(products: &[Product]) -> String {
    if products.is_empty() {
        return "(the catalog is currently empty)".to_string();
    }
    products
        .iter()
        .map(|p| format!("- {}: {} (${})", p.name, p.description, p.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the full system prompt: preamble + catalog + visitor identity hint.
pub fn build_system_prompt(
    preamble: &str,
    products: &[Product],
    visitor_name: Option<&str>,
) -> String {
    let identity = match visitor_name {
        Some(name) => format!("Customer's name: {name}"),
        None => "Get their name early in the conversation".to_string(),
    };
    format!(
        "{preamble}\n\nAvailable Products:\n{}\n\n{identity}",
        render_catalog(products)
    )
}

/// Converts the ordered turn history into backend messages.
pub fn history_to_messages(turns: &[Turn]) -> Vec<BackendMessage> {
    turns
        .iter()
        .map(|turn| BackendMessage {
            role: match turn.role {
                TurnRole::Visitor => "user".to_string(),
                TurnRole::Assistant => "assistant".to_string(),
            },
            content: turn.content.clone(),
        })
        .collect()
}

/// Assembles the complete grounded request: preamble + catalog + history.
///
/// The history already contains the inbound visitor turn, which is persisted
/// before context assembly begins.
pub fn assemble_context(
    preamble: &str,
    products: &[Product],
    visitor_name: Option<&str>,
    turns: &[Turn],
    model: &str,
    max_tokens: u32,
) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system: Some(build_system_prompt(preamble, products, visitor_name)),
        messages: history_to_messages(turns),
        max_tokens,
    }
}
