use crate::models::QueryResult;
use docret_config::{Instructions, PromptConfig};

/// Builds the generation prompt from admitted context and the user question.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    config: PromptConfig,
}

impl PromptAssembler {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    /// Context texts in the given order, then the question, then the
    /// configured instructions. Same inputs always give the same prompt.
    pub fn assemble(&self, admitted: &[QueryResult], question: &str) -> String {
        let context = admitted
            .iter()
            .map(|r| r.context_text.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.context_separator);

        format!(
            "Context:\n{}\n\nQuestion: {}\n{}",
            context,
            question,
            instruction_text(&self.config.instructions)
        )
    }
}

fn instruction_text(instructions: &Instructions) -> String {
    match instructions {
        Instructions::Concise { text } => text.clone(),
        Instructions::YesNo {
            marker_position,
            affirmative_value,
            negative_value,
            yes_token,
            no_token,
            language,
        } => {
            // Context entries carry values only; column names stay in metadata.
            let marker = match marker_position {
                Some(n) => format!(
                    "The value at position {n} of an entry marks the answer: \
                     '{affirmative_value}' means yes and '{negative_value}' means no."
                ),
                None => format!(
                    "A value of '{affirmative_value}' in an entry means yes \
                     and a value of '{negative_value}' means no."
                ),
            };
            format!(
                "Each context entry lists values separated by delimiters. {marker} \
                 Answer in {language} with exactly one word, either '{yes_token}' or '{no_token}'."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;
    use pretty_assertions::assert_eq;

    fn hit(context: &str, distance: f32) -> QueryResult {
        QueryResult {
            id: context.to_string(),
            context_text: context.to_string(),
            metadata: Metadata::new(),
            distance,
        }
    }

    #[test]
    fn test_concise_prompt_layout() {
        let assembler = PromptAssembler::new(PromptConfig::default());
        let prompt = assembler.assemble(
            &[hit("foo | bar", 0.1), hit("baz", 0.3)],
            "What is foo?",
        );
        assert_eq!(
            prompt,
            "Context:\nfoo | bar\n---\nbaz\n\nQuestion: What is foo?\n\
             Answer concisely based on the context."
        );
    }

    #[test]
    fn test_context_order_follows_input() {
        let assembler = PromptAssembler::new(PromptConfig::default());
        let prompt = assembler.assemble(&[hit("first", 0.1), hit("second", 0.2)], "q");
        assert!(prompt.find("first").unwrap() < prompt.find("second").unwrap());
    }

    #[test]
    fn test_yes_no_instructions_describe_marker_by_value() {
        let assembler = PromptAssembler::new(PromptConfig {
            instructions: Instructions::yes_no(),
            ..Default::default()
        });
        let prompt = assembler.assemble(&[hit("J | delivered", 0.1)], "Levererades ordern?");
        assert!(prompt.contains("A value of 'J' in an entry means yes"));
        assert!(prompt.contains("a value of 'N' means no"));
        assert!(!prompt.contains("field"));
        assert!(prompt.contains("'Ja' or 'Nej'"));
        assert!(prompt.contains("Swedish"));
        assert!(prompt.contains("Question: Levererades ordern?"));
    }

    #[test]
    fn test_yes_no_marker_position() {
        let mut instructions = Instructions::yes_no();
        if let Instructions::YesNo { marker_position, .. } = &mut instructions {
            *marker_position = Some(1);
        }
        let assembler = PromptAssembler::new(PromptConfig {
            instructions,
            ..Default::default()
        });
        let prompt = assembler.assemble(&[hit("J | delivered", 0.1)], "q");
        assert!(prompt.contains("The value at position 1 of an entry marks the answer"));
        assert!(prompt.contains("'J' means yes and 'N' means no"));
    }

    #[test]
    fn test_deterministic() {
        let assembler = PromptAssembler::new(PromptConfig {
            instructions: Instructions::yes_no(),
            ..Default::default()
        });
        let hits = [hit("a", 0.1), hit("b", 0.2)];
        assert_eq!(assembler.assemble(&hits, "q"), assembler.assemble(&hits, "q"));
    }
}
