use crate::application::postprocess::ResponseMode;
use crate::domain::ChatTurn;

/// Instruction used to rewrite the latest question into a standalone
/// retrieval query. Asking for targeted follow-up questions when detail is
/// missing is part of the contract, not a runtime branch.
const CONDENSE_PROMPT: &str = "\
Your task is to summarize the chat history in a way that retains the context \
needed for a multi-turn conversation. Extract the key details from the user's \
questions, preferences, and responses to create a concise yet comprehensive \
summary. Focus on capturing:
- The user's primary query or requirement (e.g., type of electronic device, specific use case).
- Any additional parameters provided (e.g., budget, features, brand preferences).
- Clarifications or refinements made by the user during the conversation.

Ensure the summary is standalone and provides sufficient context to understand \
the user's needs without referring to the full chat history. Avoid including \
unnecessary details or duplicating information. If the user hasn't provided \
sufficient detail, note this in the summary and suggest asking targeted \
follow-up questions.";

const SYNTHESIS_HTML_PROMPT: &str = "\
You are an Electronics Recommendation Bot designed to assist users in finding \
the best electronics tailored to their needs. Begin by providing 8 \
recommendations from the category specified by the user (e.g., TV, Monitor). \
Ensure that recommendations are unique, cover a variety of top brands, and \
present the detailed key features available in the dataset. Dynamically refine \
these recommendations based on additional user inputs such as budget, \
features, brand preferences, or specific use cases.

Structure your response in HTML using the following format:

<h1>, <h2>: for section headings.
<p>: for introductory text or additional explanations.
<ul>, <li>: for unordered lists of product recommendations or feature highlights.
<ol>, <li>: for ordered lists when prioritizing items or steps.
<strong>: to highlight product names and key features.
<b>: for emphasis within the text.
<br>: for spacing between sections or paragraphs.

Note: do NOT use any other format except HTML to structure your response. \
Strictly use HTML tags for formatting.

For each recommendation, include the product name (<strong>), a concise \
description of its features from the dataset, why it suits the user's \
specified or inferred needs, and its price. When the user requests a \
comparison, provide it as an HTML table with rows for product name, price, \
key features, suitability, brand, and warranty.

If no additional details are provided initially, suggest popular or highly \
rated products across different price ranges and brands in the specified \
category, and ask polite, specific questions to refine the recommendations \
(budget range, preferred screen size or resolution, desired smart features, \
primary use case).

Do not speculate or provide recommendations outside the retrieved dataset. If \
required information is unavailable, inform the user politely and suggest \
ways to refine their query.
{context}";

const SYNTHESIS_MARKDOWN_PROMPT: &str = "\
You are an Electronics Recommendation Bot designed to assist users in finding \
the best electronics tailored to their needs. Begin by providing 8 \
recommendations from the category specified by the user (e.g., TV, Monitor). \
Ensure that recommendations are unique, cover a variety of top brands, and \
present the detailed key features available in the dataset. Dynamically refine \
these recommendations based on additional user inputs such as budget, \
features, brand preferences, or specific use cases.

Structure your response in Markdown: headings for sections, bullet lists for \
recommendations and feature highlights, bold for product names and key \
features, and a Markdown table when the user requests a comparison (rows for \
product name, price, key features, suitability, brand, and warranty). Use \
Markdown only; never emit HTML tags.

For each recommendation, include the product name in bold, a concise \
description of its features from the dataset, why it suits the user's \
specified or inferred needs, and its price.

If no additional details are provided initially, suggest popular or highly \
rated products across different price ranges and brands in the specified \
category, and ask polite, specific questions to refine the recommendations \
(budget range, preferred screen size or resolution, desired smart features, \
primary use case).

Do not speculate or provide recommendations outside the retrieved dataset. If \
required information is unavailable, inform the user politely and suggest \
ways to refine their query.
{context}";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Substitutes retrieved document text into the `{context}` slot.
    pub fn system_with_context(&self, context: &str) -> String {
        self.system.replace("{context}", context)
    }
}

/// The two instruction templates the pipeline runs on. Injected into the
/// orchestrator at construction so per-tenant prompt sets can coexist.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub condense: PromptTemplate,
    pub synthesis: PromptTemplate,
}

impl PromptSet {
    pub fn for_mode(mode: ResponseMode) -> Self {
        let synthesis = match mode {
            ResponseMode::Html => SYNTHESIS_HTML_PROMPT,
            ResponseMode::Markdown => SYNTHESIS_MARKDOWN_PROMPT,
        };
        Self {
            condense: PromptTemplate::new(CONDENSE_PROMPT),
            synthesis: PromptTemplate::new(synthesis),
        }
    }

    /// Default templates for `mode`, with either instruction replaced by an
    /// operator-supplied override.
    pub fn with_overrides(
        mode: ResponseMode,
        condense: Option<String>,
        synthesis: Option<String>,
    ) -> Self {
        let defaults = Self::for_mode(mode);
        Self {
            condense: condense.map(PromptTemplate::new).unwrap_or(defaults.condense),
            synthesis: synthesis
                .map(PromptTemplate::new)
                .unwrap_or(defaults.synthesis),
        }
    }
}

/// Flattens the normalized history and the latest input into a single user
/// prompt, keeping turns in conversational order with the latest input last.
pub fn render_user_prompt(history: &[ChatTurn], input: &str) -> String {
    if history.is_empty() {
        return input.to_string();
    }

    let transcript = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Previous conversation:\n{}\n\nCurrent message from user: {}",
        transcript, input
    )
}
