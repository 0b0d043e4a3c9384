//! Prompt Renderer - Render templates with context variables using Handlebars

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Result, StoryloomError};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a new PromptRenderer with default settings
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Missing variables render as empty strings
        handlebars.set_strict_mode(false);
        // Prompt text is not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render a template string with the given context
    pub fn render(&self, template: &str, context: &HashMap<String, String>) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| StoryloomError::Template(format!("Failed to render template: {}", e)))
    }

    /// Render a template string with any serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| StoryloomError::Template(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple() {
        let renderer = PromptRenderer::new();
        let template = "Hello, {{name}}!";
        let mut context = HashMap::new();
        context.insert("name".to_string(), "World".to_string());

        let result = renderer.render(template, &context).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_render_multiple_variables() {
        let renderer = PromptRenderer::new();
        let template = "{{greeting}}, {{name}}! Welcome to {{place}}.";
        let mut context = HashMap::new();
        context.insert("greeting".to_string(), "Hello".to_string());
        context.insert("name".to_string(), "Alice".to_string());
        context.insert("place".to_string(), "Storyloom".to_string());

        let result = renderer.render(template, &context).unwrap();
        assert_eq!(result, "Hello, Alice! Welcome to Storyloom.");
    }

    #[test]
    fn test_render_missing_variable_empty_string() {
        let renderer = PromptRenderer::new();
        let template = "Hello, {{name}}!";
        let context: HashMap<String, String> = HashMap::new();

        // Missing variables should render as empty string (non-strict mode)
        let result = renderer.render(template, &context).unwrap();
        assert_eq!(result, "Hello, !");
    }

    #[test]
    fn test_render_no_escape_html() {
        let renderer = PromptRenderer::new();
        let template = "Data: {{data}}";
        let mut context = HashMap::new();
        context.insert("data".to_string(), "<rows> & \"columns\"".to_string());

        // Should NOT escape HTML entities in prompt text
        let result = renderer.render(template, &context).unwrap();
        assert_eq!(result, "Data: <rows> & \"columns\"");
    }

    #[test]
    fn test_render_with_serializable() {
        #[derive(Serialize)]
        struct Context {
            audience: String,
            iteration: u32,
        }

        let renderer = PromptRenderer::new();
        let template = "Audience {{audience}}, round {{iteration}}";
        let context = Context {
            audience: "executives".to_string(),
            iteration: 2,
        };

        let result = renderer.render_with(template, &context).unwrap();
        assert_eq!(result, "Audience executives, round 2");
    }

    #[test]
    fn test_render_preserves_whitespace() {
        let renderer = PromptRenderer::new();
        let template = "Line 1\n\nLine 3\n\n\nLine 6";
        let context: HashMap<String, String> = HashMap::new();

        let result = renderer.render(template, &context).unwrap();
        assert_eq!(result, "Line 1\n\nLine 3\n\n\nLine 6");
    }
}
