use anyhow::{Context, Result};
use intervu_types::Assistant;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Key (file stem) of the interviewer's system prompt.
pub const INTERVIEWER_PROMPT: &str = "interviewer";

pub const FIRST_MESSAGE: &str = "Hello! Thank you for taking the time to speak with me today. \
I'm excited to learn more about you and your experience.";

const BUILTIN_INTERVIEWER_PROMPT: &str = include_str!("../prompts/interviewer.md");

pub fn load_prompts(dir_path: &Path) -> Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();

    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read prompts directory: {}", dir_path.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem for prompt file")?
                .to_string();

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;

            prompts.insert(prompt_key, content);
        }
    }

    Ok(prompts)
}

/// The interviewer definition sent with every call start.
///
/// Uses the `interviewer` prompt when one was loaded, otherwise the prompt
/// compiled into the binary.
pub fn interviewer_assistant(prompts: &HashMap<String, String>) -> Assistant {
    let system_prompt = match prompts.get(INTERVIEWER_PROMPT) {
        Some(prompt) => prompt.as_str(),
        None => {
            tracing::debug!("no interviewer prompt loaded, using the built-in one");
            BUILTIN_INTERVIEWER_PROMPT
        }
    };

    Assistant::builder()
        .with_name("Interviewer")
        .with_first_message(FIRST_MESSAGE)
        .with_system_prompt(system_prompt.trim())
        .with_voice("sarah")
        .with_model("gpt-4")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_prompts_only_reads_markdown() -> Result<()> {
        let dir = tempdir()?;
        let dir_path = dir.path();

        let mut file = File::create(dir_path.join("interviewer.md"))?;
        writeln!(file, "Ask these: {{{{questions}}}}")?;
        let mut ignored = File::create(dir_path.join("notes.txt"))?;
        writeln!(ignored, "not a prompt")?;
        std::fs::create_dir(dir_path.join("drafts.md"))?;

        let prompts = load_prompts(dir_path)?;

        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts.get("interviewer").unwrap(),
            "Ask these: {{questions}}\n"
        );
        Ok(())
    }

    #[test]
    fn test_load_prompts_from_nonexistent_dir() {
        let result = load_prompts(Path::new("nonexistent_dir_for_testing_prompts"));
        assert!(result.is_err());
    }

    #[test]
    fn test_loaded_prompt_wins_over_builtin() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("interviewer.md"), "Custom prompt.\n{{questions}}\n")?;

        let assistant = interviewer_assistant(&load_prompts(dir.path())?);

        assert_eq!(assistant.system_prompt(), "Custom prompt.\n{{questions}}");
        assert_eq!(assistant.first_message(), FIRST_MESSAGE);
        Ok(())
    }

    #[test]
    fn test_builtin_prompt_references_questions() {
        let assistant = interviewer_assistant(&HashMap::new());
        assert_eq!(assistant.name(), "Interviewer");
        assert!(assistant.system_prompt().contains("{{questions}}"));
        assert_eq!(assistant.voice(), Some("sarah"));
    }
}
