//! Generation prompt configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptConfig {
    /// Line placed between admitted context texts
    #[serde(default = "default_context_separator")]
    pub context_separator: String,

    /// Instruction block appended after the context
    #[serde(default)]
    pub instructions: Instructions,
}

/// Instruction variants. Selecting one is configuration, never a code path
/// decided from the retrieved content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instructions {
    /// Free-form answer grounded in the context
    Concise {
        #[serde(default = "default_concise_text")]
        text: String,
    },
    /// Binary answer driven by a marker value in the context
    YesNo {
        /// 1-based position of the marker among an entry's delimited
        /// values. Unset means the marker is recognised by value alone.
        #[serde(default)]
        marker_position: Option<usize>,
        /// Marker value meaning "yes"
        #[serde(default = "default_affirmative_value")]
        affirmative_value: String,
        /// Marker value meaning "no"
        #[serde(default = "default_negative_value")]
        negative_value: String,
        /// Output token for "yes"
        #[serde(default = "default_yes_token")]
        yes_token: String,
        /// Output token for "no"
        #[serde(default = "default_no_token")]
        no_token: String,
        /// Language of the output tokens
        #[serde(default = "default_language")]
        language: String,
    },
}

impl Instructions {
    /// Yes/no variant with the stock Swedish J/N marker convention.
    pub fn yes_no() -> Self {
        Instructions::YesNo {
            marker_position: None,
            affirmative_value: default_affirmative_value(),
            negative_value: default_negative_value(),
            yes_token: default_yes_token(),
            no_token: default_no_token(),
            language: default_language(),
        }
    }
}

impl Default for Instructions {
    fn default() -> Self {
        Instructions::Concise {
            text: default_concise_text(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            context_separator: default_context_separator(),
            instructions: Instructions::default(),
        }
    }
}

impl crate::validation::Validate for PromptConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.context_separator.is_empty() {
            return Err(ConfigError::invalid(
                "prompt.context_separator",
                "separator cannot be empty",
            ));
        }

        match &self.instructions {
            Instructions::Concise { text } => {
                if text.trim().is_empty() {
                    return Err(ConfigError::invalid(
                        "prompt.instructions.text",
                        "instruction text cannot be blank",
                    ));
                }
            }
            Instructions::YesNo {
                marker_position,
                affirmative_value,
                negative_value,
                yes_token,
                no_token,
                ..
            } => {
                if *marker_position == Some(0) {
                    return Err(ConfigError::invalid(
                        "prompt.instructions.marker_position",
                        "positions start at 1",
                    ));
                }
                if affirmative_value.is_empty() || negative_value.is_empty() {
                    return Err(ConfigError::invalid(
                        "prompt.instructions.affirmative_value",
                        "marker values cannot be empty",
                    ));
                }
                if affirmative_value == negative_value {
                    return Err(ConfigError::invalid(
                        "prompt.instructions.negative_value",
                        "affirmative and negative marker values must differ",
                    ));
                }
                if yes_token.is_empty() || no_token.is_empty() || yes_token == no_token {
                    return Err(ConfigError::invalid(
                        "prompt.instructions.yes_token",
                        "yes/no tokens must be non-empty and distinct",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn default_context_separator() -> String {
    "\n---\n".to_string()
}

fn default_concise_text() -> String {
    "Answer concisely based on the context.".to_string()
}

fn default_affirmative_value() -> String {
    "J".to_string()
}

fn default_negative_value() -> String {
    "N".to_string()
}

fn default_yes_token() -> String {
    "Ja".to_string()
}

fn default_no_token() -> String {
    "Nej".to_string()
}

fn default_language() -> String {
    "Swedish".to_string()
}
