//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Storyloom - turn a data source into a refined data story
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a data file or a description of the data source
    #[arg(short = 'd', long = "data-source")]
    pub data_source: String,

    /// Target audience for the story (e.g. "executives", "technical team")
    #[arg(short = 'a', long)]
    pub audience: String,

    /// Output file path; prints to stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// User id for preference and feedback storage
    #[arg(long = "user-id", default_value = "user_01")]
    pub user_id: String,

    /// Story tone override (formal, casual, technical, persuasive, balanced)
    #[arg(long)]
    pub tone: Option<String>,

    /// Story format override (standard, executive, detailed, bullet)
    #[arg(long)]
    pub format: Option<String>,

    /// Comma-separated focus areas (e.g. "key_trends,outliers")
    #[arg(long)]
    pub focus: Option<String>,

    /// Save the effective preferences for future runs
    #[arg(long = "save-preferences")]
    pub save_preferences: bool,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Focus areas parsed from the comma-separated override
    pub fn focus_areas(&self) -> Option<Vec<String>> {
        self.focus.as_ref().map(|f| {
            f.split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_minimal_args() {
        let cli = parse(&["storyloom", "-d", "sales.csv", "-a", "executives"]);
        assert_eq!(cli.data_source, "sales.csv");
        assert_eq!(cli.audience, "executives");
        assert_eq!(cli.user_id, "user_01");
        assert!(cli.output.is_none());
        assert!(!cli.save_preferences);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_data_source_required() {
        let result = Cli::try_parse_from(["storyloom", "-a", "executives"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_audience_required() {
        let result = Cli::try_parse_from(["storyloom", "-d", "sales.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_path() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y", "-o", "story.md"]);
        assert_eq!(cli.output, Some(PathBuf::from("story.md")));
    }

    #[test]
    fn test_user_id_override() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y", "--user-id", "alice"]);
        assert_eq!(cli.user_id, "alice");
    }

    #[test]
    fn test_tone_and_format_overrides() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y", "--tone", "formal", "--format", "bullet"]);
        assert_eq!(cli.tone.as_deref(), Some("formal"));
        assert_eq!(cli.format.as_deref(), Some("bullet"));
    }

    #[test]
    fn test_focus_areas_parsing() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y", "--focus", "key_trends, outliers,,churn "]);
        assert_eq!(
            cli.focus_areas(),
            Some(vec!["key_trends".to_string(), "outliers".to_string(), "churn".to_string()])
        );
    }

    #[test]
    fn test_focus_areas_none_when_absent() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y"]);
        assert_eq!(cli.focus_areas(), None);
    }

    #[test]
    fn test_save_preferences_flag() {
        let cli = parse(&["storyloom", "-d", "x", "-a", "y", "--save-preferences"]);
        assert!(cli.save_preferences);
    }

    #[test]
    fn test_description_text_as_data_source() {
        let cli = parse(&["storyloom", "-d", "monthly signups trending up", "-a", "board"]);
        assert_eq!(cli.data_source, "monthly signups trending up");
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }
}
