//! Deterministic Fallback Documents
//!
//! Templated output used when generation is unavailable or insufficient.
//! Assembly never fails: this is the orchestrator's only guaranteed-success
//! path.

use std::fmt::Write;

use crate::github::RepoInfo;
use crate::types::{AnalysisResult, FileRecord};

/// Fallback README: enhance an existing README when one is present,
/// otherwise assemble a skeleton from repository metadata.
pub fn readme(
    repo: &RepoInfo,
    existing_readme: Option<&str>,
    analysis: &AnalysisResult,
    files: &[FileRecord],
) -> String {
    if let Some(existing) = existing_readme
        && existing.len() > 100
    {
        return enhanced_readme(repo, existing, files);
    }
    basic_readme(repo, analysis, files)
}

/// Keep the existing README and append the standard sections it lacks.
fn enhanced_readme(repo: &RepoInfo, existing: &str, files: &[FileRecord]) -> String {
    let mut doc = format!("# {}\n\n{}\n\n", repo.name, existing);
    let lower = existing.to_lowercase();

    if !lower.contains("install") && !lower.contains("setup") {
        doc.push_str("## Installation\n\n");
        let has_package_json = files.iter().any(|f| f.path == "package.json");
        let has_requirements = files.iter().any(|f| f.path == "requirements.txt");

        if has_package_json {
            doc.push_str("```bash\nnpm install\n```\n\n");
        } else if has_requirements {
            doc.push_str("```bash\npip install -r requirements.txt\n```\n\n");
        } else {
            doc.push_str("Refer to the repository for setup instructions.\n\n");
        }
    }

    if !lower.contains("usage") && !lower.contains("how to") {
        doc.push_str("## Usage\n\n");
        doc.push_str("Please refer to the documentation or code comments for usage instructions.\n\n");
    }

    doc
}

fn basic_readme(repo: &RepoInfo, analysis: &AnalysisResult, files: &[FileRecord]) -> String {
    let language = repo.language.as_deref().unwrap_or("Web");
    let mut doc = format!("# {}\n\n", repo.name);

    if let Some(description) = &repo.description {
        let _ = writeln!(doc, "{}\n", description);
    }

    let _ = writeln!(doc, "## Project Info\n");
    let _ = writeln!(doc, "- **Language:** {}", language);
    let _ = writeln!(doc, "- **Files:** {}", files.len());
    let _ = writeln!(doc, "- **Functions:** {}", analysis.functions.len());
    let _ = writeln!(doc, "- **Classes:** {}", analysis.classes.len());
    if !analysis.endpoints.is_empty() {
        let _ = writeln!(doc, "- **API Endpoints:** {}", analysis.endpoints.len());
    }

    let _ = writeln!(doc, "\n## Getting Started\n");
    let _ = writeln!(
        doc,
        "```bash\ngit clone https://github.com/{}.git\n```\n",
        repo.full_name
    );
    doc.push_str("Refer to the repository for detailed setup and usage instructions.\n\n");
    doc.push_str("---\n*Generated by codedocs*\n");

    doc
}

/// Fallback overview: the existing README's head, or a one-liner from
/// repository metadata.
pub fn overview(repo: &RepoInfo, existing_readme: Option<&str>) -> String {
    match existing_readme {
        Some(readme) => super::prompt::truncate_chars(readme, 500).to_string(),
        None => format!(
            "{} built primarily with {}.",
            repo.description.as_deref().unwrap_or("A software project"),
            repo.language.as_deref().unwrap_or("an unspecified language"),
        ),
    }
}

/// Per-language install snippet.
pub fn install(language: Option<&str>) -> String {
    match language.map(str::to_lowercase).as_deref() {
        Some("python") => "```bash\npip install -r requirements.txt\n```".to_string(),
        Some("javascript") | Some("typescript") => "```bash\nnpm install\n```".to_string(),
        Some("go") => "```bash\ngo mod download\n```".to_string(),
        Some("rust") => "```bash\ncargo build\n```".to_string(),
        _ => "Refer to the repository README for installation instructions.".to_string(),
    }
}

pub fn usage() -> String {
    "Refer to the repository README for usage instructions.".to_string()
}

/// One-line summary for a single function or class.
pub fn summary(kind: &str, name: &str) -> String {
    format!("A {} that performs {} operations.", kind, name)
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
            language: Some("Python".to_string()),
            stars: 0,
            default_branch: "main".to_string(),
        }
    }

    fn file(path: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: String::new(),
            size: 0,
            language: Language::from_path(path),
        }
    }

    #[test]
    fn test_basic_readme_when_no_existing() {
        let doc = readme(&repo(), None, &AnalysisResult::default(), &[]);
        assert!(doc.starts_with("# demo"));
        assert!(doc.contains("A demo project"));
        assert!(doc.contains("git clone https://github.com/user/demo.git"));
        assert!(doc.contains("Generated by codedocs"));
    }

    #[test]
    fn test_short_existing_readme_uses_basic_path() {
        let doc = readme(&repo(), Some("tiny"), &AnalysisResult::default(), &[]);
        assert!(doc.contains("## Project Info"));
    }

    #[test]
    fn test_enhanced_readme_appends_missing_sections() {
        let existing = "x".repeat(120);
        let files = vec![file("requirements.txt")];
        let doc = readme(&repo(), Some(&existing), &AnalysisResult::default(), &files);
        assert!(doc.contains("## Installation"));
        assert!(doc.contains("pip install -r requirements.txt"));
        assert!(doc.contains("## Usage"));
    }

    #[test]
    fn test_enhanced_readme_keeps_present_sections() {
        let existing = format!("{}\n## Installation\nnpm i\n## Usage\nrun it", "y".repeat(120));
        let doc = readme(&repo(), Some(&existing), &AnalysisResult::default(), &[]);
        // Sections already covered are not duplicated
        assert_eq!(doc.matches("## Installation").count(), 1);
        assert_eq!(doc.matches("## Usage").count(), 1);
    }

    #[test]
    fn test_install_snippets_per_language() {
        assert!(install(Some("Python")).contains("pip install"));
        assert!(install(Some("JavaScript")).contains("npm install"));
        assert!(install(Some("Rust")).contains("cargo build"));
        assert!(install(None).contains("Refer to the repository"));
    }

    #[test]
    fn test_overview_prefers_existing_readme() {
        let text = overview(&repo(), Some("The project overview."));
        assert_eq!(text, "The project overview.");

        let fallback = overview(&repo(), None);
        assert!(fallback.contains("A demo project"));
        assert!(fallback.contains("Python"));
    }

    #[test]
    fn test_summary_shape() {
        assert_eq!(
            summary("function", "parseConfig"),
            "A function that performs parseConfig operations."
        );
    }
}
