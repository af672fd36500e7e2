//! The fixed set of completion models the bot can be switched between.

use std::fmt;

/// A supported OpenAI chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Gpt35Turbo,
    Gpt4,
    Gpt4Turbo,
    Gpt4oMini,
    Gpt4o,
}

impl Model {
    /// API identifier, also used verbatim as the menu button payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Gpt4Turbo => "gpt-4-turbo",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4o => "gpt-4o",
        }
    }

    /// Human-readable name shown on menu buttons and confirmations.
    pub fn label(&self) -> &'static str {
        match self {
            Model::Gpt35Turbo => "GPT-3.5 Turbo",
            Model::Gpt4 => "GPT-4",
            Model::Gpt4Turbo => "GPT-4 Turbo",
            Model::Gpt4oMini => "GPT-4o mini",
            Model::Gpt4o => "GPT-4o",
        }
    }

    /// Parse a menu payload back into a model. Unknown ids are rejected so a
    /// session can never hold an unsupported model.
    pub fn from_id(id: &str) -> Option<Model> {
        match id {
            "gpt-3.5-turbo" => Some(Model::Gpt35Turbo),
            "gpt-4" => Some(Model::Gpt4),
            "gpt-4-turbo" => Some(Model::Gpt4Turbo),
            "gpt-4o-mini" => Some(Model::Gpt4oMini),
            "gpt-4o" => Some(Model::Gpt4o),
            _ => None,
        }
    }

    /// Keyboard layout for the selection menu.
    pub fn menu_rows() -> Vec<Vec<Model>> {
        vec![
            vec![Model::Gpt35Turbo, Model::Gpt4],
            vec![Model::Gpt4Turbo, Model::Gpt4oMini],
            vec![Model::Gpt4o],
        ]
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt35Turbo
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body text of the `/model` menu message.
pub const MENU_TEXT: &str = "GPT-3.5 Turbo - a fast, inexpensive model for simple tasks \n\n\
    GPT-4 and GPT-4 Turbo - the previous set of high-intelligence models \n\n\
    GPT-4o mini - affordable and intelligent small model for fast, lightweight tasks \n\n\
    GPT-4o - high-intelligence flagship model for complex, multi-step tasks";
