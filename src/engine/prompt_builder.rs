use serde::Serialize;

use crate::model::component::{Component, ComponentKind, Position, Properties, Size};
use crate::model::generation_input::{CanvasSize, GenerationInput};

/// Builds the instruction sent to the generative service.
/// This struct only formats text.
/// No parsing, no networking, no session logic.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(input: &GenerationInput) -> String {
        match input {
            GenerationInput::Text(description) => TextPromptBuilder::build(description),
            GenerationInput::Structured { components, canvas } => {
                StructuredPromptBuilder::build(components, *canvas)
            }
        }
    }
}

struct TextPromptBuilder;

impl TextPromptBuilder {
    fn build(description: &str) -> String {
        let mut prompt = String::new();

        push_role(&mut prompt);
        prompt.push_str("Build a web page from this description:\n\n");
        prompt.push_str(description);
        prompt.push_str("\n\n");
        push_output_format(&mut prompt);

        prompt
    }
}

struct StructuredPromptBuilder;

impl StructuredPromptBuilder {
    fn build(components: &[Component], canvas: CanvasSize) -> String {
        let mut prompt = String::new();

        push_role(&mut prompt);
        prompt.push_str(&format!(
            "Build a web page from this visual layout. The layout was drawn on a \
{}x{} pixel canvas; positions are the top-left corner of each component \
relative to that canvas.\n\n",
            canvas.width, canvas.height
        ));
        push_component_snapshot(&mut prompt, components);
        push_layout_rules(&mut prompt);
        push_output_format(&mut prompt);

        prompt
    }
}

/// Serialized view of a component as the model sees it.
#[derive(Serialize)]
struct ComponentSnapshot<'a> {
    id: &'a str,
    kind: ComponentKind,
    position: Position,
    size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "no_properties")]
    properties: &'a Properties,
}

impl<'a> From<&'a Component> for ComponentSnapshot<'a> {
    fn from(c: &'a Component) -> Self {
        Self {
            id: &c.id,
            kind: c.kind,
            position: c.position,
            size: c.size,
            text: c.text.as_deref(),
            properties: &c.properties,
        }
    }
}

fn no_properties(properties: &&Properties) -> bool {
    properties.is_empty()
}

fn push_role(prompt: &mut String) {
    prompt.push_str(
        "You are an expert front-end developer. You write clean, modern, \
responsive HTML, CSS and JavaScript.\n\n",
    );
}

fn push_component_snapshot(prompt: &mut String, components: &[Component]) {
    let snapshot: Vec<ComponentSnapshot<'_>> = components.iter().map(Into::into).collect();

    prompt.push_str("COMPONENTS:\n");
    // Serializing plain structs of strings and floats cannot fail.
    prompt.push_str(&serde_json::to_string_pretty(&snapshot).unwrap_or_default());
    prompt.push_str("\n\n");
}

fn push_layout_rules(prompt: &mut String) {
    prompt.push_str(
        "Layout Rules:\n\
- Preserve the relative layout: components that are above, below, left or right of each other must stay that way.\n\
- Keep every component visible; do not drop, hide or merge any of them.\n\
- Use each component's text as its visible label or content.\n\
- Use each component's kind to pick the element (header, button, input, text, image, card).\n\
- Scale sizes sensibly for the page; exact pixel values are not required.\n\n",
    );
}

fn push_output_format(prompt: &mut String) {
    prompt.push_str(
        "Output Format:\n\
Respond with ONE JSON object and nothing else. It must have exactly these keys:\n\
{\n  \"html\": \"<complete HTML document>\",\n  \"css\": \"<all styles>\",\n  \"javascript\": \"<all scripts>\"\n}\n\n\
Rules:\n\
- \"html\" must be a full document skeleton: <!DOCTYPE html>, <html>, <head> and <body>.\n\
- Put styles only in \"css\" and scripts only in \"javascript\"; do not inline <style> or <script> blocks in \"html\".\n\
- Use an empty string for a key that needs no code.\n\
- Do not add explanations, markdown or code fences.\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_embeds_description_verbatim() {
        let prompt = PromptBuilder::build(&GenerationInput::Text(
            "a button that says Hi {weird} \"quotes\"".into(),
        ));
        assert!(prompt.contains("a button that says Hi {weird} \"quotes\""));
        assert!(prompt.contains("\"html\""));
        assert!(prompt.contains("\"css\""));
        assert!(prompt.contains("\"javascript\""));
        assert!(prompt.contains("<!DOCTYPE html>"));
        assert!(!prompt.contains("COMPONENTS:"));
    }

    #[test]
    fn test_structured_prompt_lists_every_component() {
        let components = vec![
            Component::new("h1", ComponentKind::Header, Position::new(0.0, 0.0)).with_text("Title"),
            Component::new("img", ComponentKind::Image, Position::new(50.0, 100.0)),
        ];
        let prompt = PromptBuilder::build(&GenerationInput::Structured {
            components,
            canvas: CanvasSize {
                width: 1024.0,
                height: 768.0,
            },
        });

        assert!(prompt.contains("1024x768"));
        assert!(prompt.contains("\"id\": \"h1\""));
        assert!(prompt.contains("\"kind\": \"header\""));
        assert!(prompt.contains("\"text\": \"Title\""));
        assert!(prompt.contains("\"id\": \"img\""));
        assert!(prompt.contains("\"src\""));
        assert!(prompt.contains("Preserve the relative layout"));
        assert!(prompt.contains("Keep every component visible"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = GenerationInput::Structured {
            components: vec![Component::new("b", ComponentKind::Button, Position::new(3.0, 4.0))],
            canvas: CanvasSize::default(),
        };
        assert_eq!(PromptBuilder::build(&input), PromptBuilder::build(&input));
    }
}
