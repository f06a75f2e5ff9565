//! Prompt Assembly
//!
//! Builds the structured prompts sent to the generation backend. Every
//! embedded excerpt is character-bounded so prompts stay inside the
//! configured context window.

use std::fmt::Write;

use crate::constants::generation as limits;
use crate::github::RepoInfo;
use crate::types::{AnalysisResult, FileRecord};

/// Full README synthesis prompt: repository metadata, discovery counts,
/// manifest excerpts, a bounded excerpt of any existing README, and
/// optional user-supplied context.
pub fn readme_prompt(
    repo: &RepoInfo,
    files: &[FileRecord],
    existing_readme: Option<&str>,
    analysis: &AnalysisResult,
    user_context: Option<&str>,
) -> String {
    let file_list = files
        .iter()
        .take(limits::FILE_LIST_LIMIT)
        .map(|f| f.path.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let manifest_content = manifest_excerpts(
        files,
        limits::README_MANIFEST_FILES,
        2,
        limits::MANIFEST_EXCERPT_CHARS,
    );

    let readme_section = match existing_readme {
        Some(readme) => format!(
            "\n\nEXISTING README:\n{}",
            truncate_chars(readme, limits::README_EXCERPT_CHARS)
        ),
        None => "\n\nNo existing README.".to_string(),
    };

    let mut prompt = format!(
        "You are a technical writer creating a GitHub README.md.\n\n\
         PROJECT: {}\n\
         Language: {}\n\
         Description: {}\n\n\
         FILES: {}\n",
        repo.full_name,
        repo.language.as_deref().unwrap_or("Web/Frontend"),
        repo.description.as_deref().unwrap_or("No description"),
        file_list,
    );

    let _ = write!(
        prompt,
        "\nANALYSIS:\n\
         - {} files analyzed\n\
         - {} functions found\n\
         - {} classes found\n\
         - {} API endpoints detected",
        files.len(),
        analysis.functions.len(),
        analysis.classes.len(),
        analysis.endpoints.len(),
    );
    if !analysis.imports.is_empty() {
        let _ = write!(prompt, "\n- {} modules imported", analysis.imports.len());
    }
    prompt.push_str(&readme_section);

    if !manifest_content.is_empty() {
        let _ = write!(prompt, "\n\nCONFIGURATION FILES:\n{}", manifest_content);
    }

    if let Some(context) = user_context {
        let _ = write!(prompt, "\n\nNOTES: {}", context);
    }

    prompt.push_str(
        "\n\nTASK: Write a complete README.md with:\n\n\
         # Project Name\n\n\
         ## Overview (2-3 sentences)\n\n\
         ## Features (3-5 bullet points)\n\n\
         ## Installation\n\
         Show setup commands\n\n\
         ## Usage\n\
         How to run/use it\n\n\
         ## Project Structure\n\
         Brief overview\n\n\
         Write the complete README now:",
    );

    prompt
}

/// Architectural overview prompt.
pub fn overview_prompt(
    repo: &RepoInfo,
    analysis: &AnalysisResult,
    existing_readme: Option<&str>,
    user_context: Option<&str>,
) -> String {
    let readme_section = existing_readme
        .map(|r| {
            format!(
                "\n\nREADME Content (excerpt):\n{}",
                truncate_chars(r, limits::SHORT_README_EXCERPT_CHARS)
            )
        })
        .unwrap_or_default();

    let context_section = user_context
        .map(|c| format!("\n\nUser Context: {}", c))
        .unwrap_or_default();

    format!(
        "You are a technical documentation expert. Generate a comprehensive 4-5 paragraph \
         architectural overview of this project:\n\n\
         Project: {}\n\
         Description: {}\n\
         Primary Language: {}\n\
         Stars: {}\n\n\
         Code Analysis:\n\
         - {} functions found\n\
         - {} classes found\n\
         - {} API endpoints detected{}{}\n\n\
         Write a detailed architectural overview explaining:\n\
         1. What problem this project solves\n\
         2. Main components and how they work together\n\
         3. Key technologies and frameworks used\n\
         4. How users would typically interact with this project\n\n\
         Be specific and technical. Focus on architecture, not installation steps.",
        repo.full_name,
        repo.description.as_deref().unwrap_or("No description provided"),
        repo.language.as_deref().unwrap_or("Unknown"),
        repo.stars,
        analysis.functions.len(),
        analysis.classes.len(),
        analysis.endpoints.len(),
        readme_section,
        context_section,
    )
}

/// Install instruction prompt built around detected manifest files.
pub fn install_prompt(
    repo: &RepoInfo,
    files: &[FileRecord],
    existing_readme: Option<&str>,
) -> String {
    let manifest_content = manifest_excerpts(
        files,
        limits::MANIFEST_FILES,
        3,
        limits::INSTALL_MANIFEST_EXCERPT_CHARS,
    );

    format!(
        "You are a technical documentation expert. Generate clear, accurate installation \
         instructions for this project.\n\n\
         Project: {}\n\
         Language: {}\n\
         Description: {}\n\n\
         Configuration Files Found:\n{}\n\n\
         README Excerpt:\n{}\n\n\
         Generate installation instructions that include:\n\
         1. Prerequisites (languages, tools, versions)\n\
         2. Step-by-step installation commands\n\
         3. Any environment setup needed (virtual environments, etc.)\n\
         4. How to verify the installation\n\n\
         Format as markdown with code blocks. Be specific to THIS project based on the \
         files you see. Keep it concise (max 15 lines).",
        repo.full_name,
        repo.language.as_deref().unwrap_or("Unknown"),
        repo.description.as_deref().unwrap_or("No description"),
        if manifest_content.is_empty() {
            "No configuration files detected".to_string()
        } else {
            manifest_content
        },
        existing_readme
            .map(|r| truncate_chars(r, limits::SHORT_README_EXCERPT_CHARS).to_string())
            .unwrap_or_else(|| "No README available".to_string()),
    )
}

/// Usage instruction prompt built around likely entry-point files.
pub fn usage_prompt(
    repo: &RepoInfo,
    files: &[FileRecord],
    analysis: &AnalysisResult,
) -> String {
    let entry_files: Vec<&FileRecord> = files
        .iter()
        .filter(|f| is_entry_point(&f.path))
        .take(3)
        .collect();

    let entry_info = entry_files
        .iter()
        .map(|f| {
            format!(
                "{}:\n{}",
                f.path,
                truncate_chars(&f.content, limits::ENTRY_EXCERPT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let has_api = !analysis.endpoints.is_empty();
    let has_cli = analysis
        .functions
        .iter()
        .any(|f| f.name.contains("main") || f.name.contains("cli"));
    let project_type = if has_api {
        "API/Web Service"
    } else if has_cli {
        "CLI Tool"
    } else {
        "Library/Module"
    };

    let mut prompt = format!(
        "You are a technical documentation expert. Generate clear usage instructions for \
         this project.\n\n\
         Project: {}\n\
         Type: {}\n\
         Language: {}\n\n\
         Main Entry Points:\n{}\n",
        repo.full_name,
        project_type,
        repo.language.as_deref().unwrap_or("Unknown"),
        if entry_info.is_empty() {
            "Not clearly identified"
        } else {
            entry_info.as_str()
        },
    );

    if has_api {
        let _ = write!(prompt, "\nAPI Endpoints Found: {}", analysis.endpoints.len());
    }
    let _ = write!(prompt, "\nFunctions Found: {}", analysis.functions.len());

    prompt.push_str(
        "\n\nGenerate usage instructions that show:\n\
         1. How to run/start the project\n\
         2. Basic usage examples with actual commands\n\
         3. Common commands or API calls\n\
         4. Configuration options (if any)\n\n\
         Format as markdown with code blocks. Be specific based on the code structure. \
         Keep it concise (max 15 lines).",
    );

    prompt
}

/// One- or two-sentence summary prompt for a single function or class.
pub fn summary_prompt(code: &str, kind: &str, name: &str) -> String {
    format!(
        "You are a technical documentation expert. Analyze this {} named \"{}\" and provide \
         a concise 1-2 sentence description of what it does.\n\n\
         Code:\n```\n{}\n```\n\n\
         Provide ONLY the description, no additional text.",
        kind,
        name,
        truncate_chars(code, limits::SUMMARY_CODE_CHARS),
    )
}

// =============================================================================
// Helpers
// =============================================================================

/// Character-bounded prefix that never splits a UTF-8 code point.
pub(super) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn manifest_excerpts(
    files: &[FileRecord],
    manifest_names: &[&str],
    take: usize,
    excerpt_chars: usize,
) -> String {
    files
        .iter()
        .filter(|f| manifest_names.contains(&f.file_name()))
        .take(take)
        .map(|f| format!("{}:\n{}", f.path, truncate_chars(&f.content, excerpt_chars)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn is_entry_point(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
    name.starts_with("main.")
        || name.starts_with("app.")
        || name.starts_with("index.")
        || name.starts_with("server.")
        || name.starts_with("cli.")
        || name == "__main__.py"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::language::Language;

    fn repo() -> RepoInfo {
        RepoInfo {
            name: "demo".to_string(),
            full_name: "user/demo".to_string(),
            description: Some("A demo project".to_string()),
            language: Some("JavaScript".to_string()),
            stars: 42,
            default_branch: "main".to_string(),
        }
    }

    fn file(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
            size: content.len() as u64,
            language: Language::from_path(path),
        }
    }

    #[test]
    fn test_truncate_chars_bounds() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 10), "hi");
        // Multi-byte safety
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_readme_prompt_embeds_counts_and_context() {
        let files = vec![file("package.json", "{\"name\": \"demo\"}")];
        let mut analysis = AnalysisResult::default();
        analysis.imports.push("os".to_string());

        let prompt = readme_prompt(&repo(), &files, Some("# Old"), &analysis, Some("internal tool"));
        assert!(prompt.contains("user/demo"));
        assert!(prompt.contains("1 files analyzed"));
        assert!(prompt.contains("1 modules imported"));
        assert!(prompt.contains("EXISTING README:\n# Old"));
        assert!(prompt.contains("NOTES: internal tool"));
        assert!(prompt.contains("package.json"));
    }

    #[test]
    fn test_readme_prompt_without_readme() {
        let prompt = readme_prompt(&repo(), &[], None, &AnalysisResult::default(), None);
        assert!(prompt.contains("No existing README."));
        assert!(!prompt.contains("NOTES:"));
    }

    #[test]
    fn test_readme_excerpt_is_bounded() {
        let long_readme = "x".repeat(5000);
        let prompt = readme_prompt(
            &repo(),
            &[],
            Some(&long_readme),
            &AnalysisResult::default(),
            None,
        );
        // The embedded excerpt is capped, so the prompt stays well under
        // the raw README length
        assert!(prompt.len() < 3000);
    }

    #[test]
    fn test_usage_prompt_picks_entry_points() {
        let files = vec![
            file("src/helper.js", "helper"),
            file("src/server.js", "startServer()"),
        ];
        let prompt = usage_prompt(&repo(), &files, &AnalysisResult::default());
        assert!(prompt.contains("src/server.js"));
        assert!(!prompt.contains("src/helper.js"));
        assert!(prompt.contains("Library/Module"));
    }

    #[test]
    fn test_summary_prompt_truncates_code() {
        let code = "y".repeat(3000);
        let prompt = summary_prompt(&code, "function", "bigOne");
        assert!(prompt.len() < 2000);
        assert!(prompt.contains("bigOne"));
    }
}
