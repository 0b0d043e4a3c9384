//! Interactive feedback prompts.
//!
//! The reader/writer pair is injected so the flow is testable without a
//! terminal; `main` wires these to stdin/stdout.

use std::io::{BufRead, Write};

use storyloom::feedback::FeedbackRecord;
use storyloom::preferences::{DEFAULT_FOCUS_AREAS, Tone, StoryFormat};
use storyloom::story::SectionKind;

const VALID_TONES: [&str; 5] = ["formal", "casual", "technical", "persuasive", "balanced"];
const VALID_FORMATS: [&str; 4] = ["standard", "executive", "detailed", "bullet"];
const VALID_SECTIONS: [&str; 4] = ["title", "introduction", "insights", "conclusion"];
const YES_NO: [&str; 2] = ["y", "n"];

/// Prompt for a line of input with an optional default and option list.
///
/// Re-prompts until the input matches one of the valid options (case
/// insensitive); an empty line takes the default when one exists.
pub fn get_user_input(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    prompt: &str,
    default: Option<&str>,
    valid_options: Option<&[&str]>,
) -> std::io::Result<String> {
    let mut full_prompt = prompt.to_string();
    if let Some(d) = default {
        full_prompt.push_str(&format!(" (default: {})", d));
    }
    if let Some(options) = valid_options {
        full_prompt.push_str(&format!(" [{}]", options.join("/")));
    }
    full_prompt.push_str(": ");

    loop {
        write!(writer, "{}", full_prompt)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            // EOF: fall back to the default or give up with empty input
            return Ok(default.unwrap_or("").to_string());
        }
        let input = line.trim().to_string();

        if input.is_empty() {
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }

        match valid_options {
            Some(options) if !options.iter().any(|o| o.eq_ignore_ascii_case(&input)) => {
                writeln!(writer, "Please enter a valid option: {}", options.join(", "))?;
            }
            _ => {
                if !input.is_empty() || default.is_none() {
                    return Ok(input);
                }
            }
        }
    }
}

/// Collect post-run feedback: preference updates and optional
/// per-section story feedback.
pub fn collect_story_feedback(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> std::io::Result<FeedbackRecord> {
    let mut record = FeedbackRecord::new();

    let tone = get_user_input(
        reader,
        writer,
        "\nPreferred tone for future stories",
        Some(Tone::default().as_str()),
        Some(&VALID_TONES),
    )?;
    record.preferences.tone_preference = Some(tone);

    let format = get_user_input(
        reader,
        writer,
        "\nPreferred format for future stories",
        Some(StoryFormat::default().as_str()),
        Some(&VALID_FORMATS),
    )?;
    record.preferences.format_preference = Some(format);

    let focus = get_user_input(
        reader,
        writer,
        "\nWhat areas should stories focus on? (comma-separated)",
        Some(&DEFAULT_FOCUS_AREAS.join(",")),
        None,
    )?;
    record.preferences.focus_areas = Some(
        focus
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
    );

    let update_section = get_user_input(
        reader,
        writer,
        "\nWould you like to update any section of the story?",
        Some("n"),
        Some(&YES_NO),
    )?;

    if update_section.eq_ignore_ascii_case("y") {
        let section = get_user_input(
            reader,
            writer,
            "\nWhich section would you like to update?",
            None,
            Some(&VALID_SECTIONS),
        )?;
        let new_content = get_user_input(
            reader,
            writer,
            &format!("\nPlease provide your updated content for the {}", section),
            None,
            None,
        )?;

        if let Some(kind) = SectionKind::parse(&section) {
            record.story_feedback.insert(kind.as_str().to_string(), new_content);
        }
    }

    let comments = get_user_input(reader, writer, "\nAny other feedback or comments?", Some(""), None)?;
    if !comments.is_empty() {
        record.general_comments = Some(comments);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_input(
        input: &str,
        prompt: &str,
        default: Option<&str>,
        valid: Option<&[&str]>,
    ) -> (String, String) {
        let mut reader = Cursor::new(input.to_string());
        let mut output = Vec::new();
        let result = get_user_input(&mut reader, &mut output, prompt, default, valid).unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_input_returns_typed_value() {
        let (result, _) = run_input("formal\n", "Tone", Some("balanced"), Some(&VALID_TONES));
        assert_eq!(result, "formal");
    }

    #[test]
    fn test_empty_input_takes_default() {
        let (result, _) = run_input("\n", "Tone", Some("balanced"), Some(&VALID_TONES));
        assert_eq!(result, "balanced");
    }

    #[test]
    fn test_invalid_option_reprompts() {
        let (result, output) = run_input("aggressive\ncasual\n", "Tone", Some("balanced"), Some(&VALID_TONES));
        assert_eq!(result, "casual");
        assert!(output.contains("Please enter a valid option"));
    }

    #[test]
    fn test_case_insensitive_options() {
        let (result, _) = run_input("FORMAL\n", "Tone", Some("balanced"), Some(&VALID_TONES));
        assert_eq!(result, "FORMAL");
    }

    #[test]
    fn test_eof_takes_default() {
        let (result, _) = run_input("", "Tone", Some("balanced"), Some(&VALID_TONES));
        assert_eq!(result, "balanced");
    }

    #[test]
    fn test_prompt_shows_default_and_options() {
        let (_, output) = run_input("n\n", "Update?", Some("n"), Some(&YES_NO));
        assert!(output.contains("(default: n)"));
        assert!(output.contains("[y/n]"));
    }

    #[test]
    fn test_collect_feedback_preferences_only() {
        let input = "casual\nexecutive\nchurn,growth\nn\n\n";
        let mut reader = Cursor::new(input.to_string());
        let mut output = Vec::new();

        let record = collect_story_feedback(&mut reader, &mut output).unwrap();

        assert_eq!(record.preferences.tone_preference.as_deref(), Some("casual"));
        assert_eq!(record.preferences.format_preference.as_deref(), Some("executive"));
        assert_eq!(
            record.preferences.focus_areas,
            Some(vec!["churn".to_string(), "growth".to_string()])
        );
        assert!(record.story_feedback.is_empty());
        assert!(record.general_comments.is_none());
    }

    #[test]
    fn test_collect_feedback_with_section_update() {
        let input = "\n\n\ny\nconclusion\nend with a concrete ask\nloved it\n";
        let mut reader = Cursor::new(input.to_string());
        let mut output = Vec::new();

        let record = collect_story_feedback(&mut reader, &mut output).unwrap();

        assert_eq!(record.preferences.tone_preference.as_deref(), Some("balanced"));
        assert_eq!(
            record.story_feedback.get("conclusion").map(String::as_str),
            Some("end with a concrete ask")
        );
        assert_eq!(record.general_comments.as_deref(), Some("loved it"));
    }
}
