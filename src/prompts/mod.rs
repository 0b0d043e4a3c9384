//! Prompt templates for the pipeline stages.
//!
//! Templates are compiled into the binary and rendered with Handlebars
//! `{{variable}}` placeholders. Every stage shares the same renderer; only
//! the template and context differ.

pub mod render;

pub use render::PromptRenderer;

/// System prompt for the story generator
pub const GENERATOR_SYSTEM: &str = r#"You are a Data Storytelling Assistant that creates compelling narratives from data.

Adapt your writing to match the preferred tone (formal, casual, technical, persuasive, or balanced)
and format (standard, executive, detailed, or bullet) from the user preferences.

Output ONLY the structured story with appropriate headings."#;

/// User prompt for the story generator
pub const GENERATOR_TEMPLATE: &str = r#"Based on the data source, intended audience, and user preferences provided, craft a structured data story with:
1. A clear title
2. Introduction explaining context
3. 3-4 key insights with supporting narrative
4. Conclusion or call-to-action

Data Source: {{data_summary}}
Target Audience: {{audience}}
User Preferences: {{preferences}}

Focus on the areas specified in the user's focus_areas, if provided."#;

/// System prompt for the critic
pub const CRITIC_SYSTEM: &str = r#"You are a Data Story Reviewer evaluating a narrative created from data.

Output ONLY your critique OR the exact completion phrase."#;

/// User prompt for the critic
pub const CRITIC_TEMPLATE: &str = r#"**Data Story to Review:**
```
{{story}}
```

**Data Source:** {{data_summary}}
**Target Audience:** {{audience}}
**User Preferences:** {{preferences}}

**Task:**
Review the story for:
1. Clarity - Is the narrative easy to understand for the specified audience?
2. Audience fit - Is the language and depth appropriate for the audience?
3. Insight value - Does it highlight the most important patterns/trends?
4. Coherence - Does the story flow logically?
5. Completeness - Does it include all necessary sections?
6. Preference alignment - Does it match the user's preferred tone, format, and focus areas?

IF you identify 1-3 SPECIFIC ways the story could be improved:
Provide actionable, detailed suggestions with examples. Focus on highest-value improvements.
Pay special attention to ensuring the story aligns with the user's preferences.

ELSE IF the story meets all requirements well:
Respond EXACTLY with the phrase "{{completion_phrase}}" and nothing else."#;

/// System prompt for the refiner
pub const REFINER_SYSTEM: &str = r#"You are a Data Storytelling Assistant refining a story based on expert feedback.

Output ONLY the refined story with all improvements integrated."#;

/// User prompt for the refiner
pub const REFINER_TEMPLATE: &str = r#"**Current Story:**
```
{{story}}
```

**Critique/Suggestions:**
{{critique}}

**Task:**
Apply ALL the suggestions to improve the story. Maintain the same structure
(title, introduction, insights, conclusion) but enhance the content based on the feedback."#;

/// System prompt for the finalizer
pub const FINALIZER_SYSTEM: &str = r#"You are preparing the final version of a data story for delivery.

Output ONLY the formatted final story."#;

/// User prompt for the finalizer
pub const FINALIZER_TEMPLATE: &str = r#"**Final Story:**
{{story}}

Format the story with clear section headers and ensure it's ready for presentation."#;

/// Prompt for refining raw user feedback before applying it to a section
pub const REFINE_FEEDBACK_TEMPLATE: &str = r#"Refine and integrate this user feedback for the {{section}} section of the story.

Current Story:
{{story}}

User's Raw Feedback:
{{feedback}}

Task:
1. Analyze the user's feedback and the current story
2. Refine the feedback to maintain consistency with the story's tone and style
3. Ensure the refined feedback aligns with the story's overall narrative
4. Preserve the user's intent while making it fit naturally in the story
5. Output the refined content for the {{section}} section

Output only the refined content for the {{section}} section."#;

/// Prompt for rewriting a single section with refined content
pub const UPDATE_SECTION_TEMPLATE: &str = r#"Update the {{section}} section of this data story while maintaining consistency with the rest of the content.

Current Story:
{{story}}

Refined Content for {{section}}:
{{content}}

Task:
1. Update the {{section}} section using the refined content
2. Ensure the updated section maintains the same tone and style as the rest of the story
3. Preserve the story's overall coherence and flow
4. Keep all other sections unchanged
5. Make sure the transition between sections is smooth

Output the complete story with the updated section."#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generator_template_renders() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert("data_summary".to_string(), "{\"data_type\":\"csv\"}".to_string());
        context.insert("audience".to_string(), "executives".to_string());
        context.insert("preferences".to_string(), "{\"tone\":\"balanced\"}".to_string());

        let prompt = renderer.render(GENERATOR_TEMPLATE, &context).unwrap();
        assert!(prompt.contains("Target Audience: executives"));
        assert!(prompt.contains("3-4 key insights"));
    }

    #[test]
    fn test_critic_template_embeds_completion_phrase() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert("story".to_string(), "# Title".to_string());
        context.insert("data_summary".to_string(), "summary".to_string());
        context.insert("audience".to_string(), "analysts".to_string());
        context.insert("preferences".to_string(), "prefs".to_string());
        context.insert(
            "completion_phrase".to_string(),
            "No significant improvements needed for this story.".to_string(),
        );

        let prompt = renderer.render(CRITIC_TEMPLATE, &context).unwrap();
        assert!(prompt.contains("Respond EXACTLY with the phrase \"No significant improvements needed for this story.\""));
        assert!(prompt.contains("Preference alignment"));
    }

    #[test]
    fn test_section_templates_name_the_section() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert("story".to_string(), "the story".to_string());
        context.insert("section".to_string(), "introduction".to_string());
        context.insert("feedback".to_string(), "make it shorter".to_string());

        let prompt = renderer.render(REFINE_FEEDBACK_TEMPLATE, &context).unwrap();
        assert!(prompt.contains("for the introduction section"));
        assert!(prompt.contains("make it shorter"));
    }
}
