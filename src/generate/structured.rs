use serde::Deserialize;
use serde_json::{Map, Value};

use crate::chatmd::{ChatmdDocument, Choice, ResponseBlock};

/// Chatbot skeleton as described by a model's JSON answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredChatbot {
    pub title: String,
    pub welcome_message: String,
    pub welcome_choices: Vec<StructuredChoice>,
    /// Response blocks in the order the model emitted them.
    pub responses: Vec<(String, StructuredResponse)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructuredChoice {
    pub text: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StructuredResponse {
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub choices: Vec<StructuredChoice>,
}

#[derive(Deserialize)]
struct RawChatbot {
    title: String,
    welcome_message: String,
    #[serde(default)]
    welcome_choices: Vec<StructuredChoice>,
    #[serde(default)]
    responses: Map<String, Value>,
}

impl StructuredChatbot {
    /// Reads the typed schema from an already parsed JSON object. Response
    /// order follows the object's key order.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawChatbot = serde_json::from_value(value)?;

        let responses = raw
            .responses
            .into_iter()
            .map(|(id, response)| Ok((id, serde_json::from_value(response)?)))
            .collect::<Result<Vec<(String, StructuredResponse)>, serde_json::Error>>()?;

        Ok(Self {
            title: raw.title,
            welcome_message: raw.welcome_message,
            welcome_choices: raw.welcome_choices,
            responses,
        })
    }

    pub fn to_chatmd(&self) -> ChatmdDocument {
        ChatmdDocument {
            title: self.title.clone(),
            welcome_message: self.welcome_message.clone(),
            welcome_choices: convert_choices(&self.welcome_choices),
            blocks: self
                .responses
                .iter()
                .map(|(id, response)| ResponseBlock {
                    heading: id.clone(),
                    triggers: response.triggers.clone(),
                    content: response.content.clone(),
                    choices: convert_choices(&response.choices),
                })
                .collect(),
        }
    }

    pub fn response_ids(&self) -> Vec<String> {
        self.responses.iter().map(|(id, _)| id.clone()).collect()
    }
}

fn convert_choices(choices: &[StructuredChoice]) -> Vec<Choice> {
    choices
        .iter()
        .map(|choice| Choice::new(choice.text.as_str(), choice.target.as_str()))
        .collect()
}
