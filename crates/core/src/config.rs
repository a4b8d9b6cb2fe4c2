use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the project root
pub const CONFIG_FILE: &str = "blog.toml";

/// Raw TOML configuration structure
/// This matches the blog.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    section: Vec<RawSection>,
    #[serde(default)]
    theme: RawTheme,
    #[serde(default)]
    build: RawBuild,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: String,
    url: String,
    #[serde(default)]
    description: String,
    language: Language,
    copyright_year: Option<i32>,
    feed_section: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTheme {
    stylesheet: Option<String>, // Convert to PathBuf
}

#[derive(Debug, Default, Deserialize)]
struct RawBuild {
    content_dir: Option<String>,
    output_dir: Option<String>,
}

/// Parse blog.toml from a file path
pub fn parse_blog_toml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "parsing configuration");
    parse_blog_toml_str(&content)
}

/// Parse blog.toml from a string (useful for testing)
pub fn parse_blog_toml_str(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.site.name.trim().is_empty() {
        return Err(Error::ConfigParse("site.name must not be empty".to_string()));
    }
    let base_url = parse_base_url(&raw.site.url)?;

    // Convert sections, rejecting duplicates
    let mut seen = HashSet::new();
    let mut sections = Vec::with_capacity(raw.section.len());
    for s in raw.section {
        let id = SectionId::parse(&s.id)?;
        if !seen.insert(id.clone()) {
            return Err(Error::ConfigParse(format!("Duplicate section id '{}'", id)));
        }
        let title = s.title.unwrap_or_else(|| id.default_title());
        sections.push(SectionConfig { id, title });
    }

    // The feed follows the first section unless told otherwise
    let feed_section = match raw.site.feed_section {
        Some(id) => {
            let id = SectionId::parse(&id)?;
            if !seen.contains(&id) {
                return Err(Error::ConfigParse(format!(
                    "site.feed_section '{}' is not a declared section",
                    id
                )));
            }
            Some(id)
        }
        None => sections.first().map(|s| s.id.clone()),
    };

    let site = Site {
        name: raw.site.name,
        base_url,
        description: raw.site.description,
        language: raw.site.language,
        sections,
        copyright_year: raw.site.copyright_year,
        feed_section,
    };

    let theme = ThemeConfig {
        stylesheet: raw
            .theme
            .stylesheet
            .map(|p| validate_path(&p, "theme.stylesheet"))
            .transpose()?,
    };

    let defaults = BuildConfig::default();
    let build = BuildConfig {
        content_dir: match raw.build.content_dir {
            Some(p) => validate_path(&p, "build.content_dir")?,
            None => defaults.content_dir,
        },
        output_dir: match raw.build.output_dir {
            Some(p) => validate_path(&p, "build.output_dir")?,
            None => defaults.output_dir,
        },
    };

    if let Some(stylesheet) = theme
        .stylesheet
        .as_ref()
        .filter(|s| s.starts_with(&build.output_dir))
    {
        return Err(Error::ConfigParse(format!(
            "theme.stylesheet '{}' is inside build.output_dir '{}', which every build replaces",
            stylesheet.display(),
            build.output_dir.display()
        )));
    }

    Ok(Config { site, theme, build })
}

/// Check the base URL is absolute http(s) and strip any trailing slash.
fn parse_base_url(url: &str) -> Result<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            Error::ConfigParse(format!(
                "Invalid site.url '{}': must start with http:// or https://",
                url
            ))
        })?;

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(Error::ConfigParse(format!(
            "Invalid site.url '{}': missing host",
            url
        )));
    }

    Ok(url.trim_end_matches('/').to_string())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so a
/// blog.toml can only point at files inside the project directory.
///
/// ```text
/// validate_path("Resources/styles.css", "theme.stylesheet")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "theme.stylesheet")  → Err("Absolute paths not allowed...")
/// validate_path("../shared/site.css", "theme.stylesheet")  → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r##"
[site]
name = "My Blog"
url = "https://kaneeast.github.io/"
description = "A personal blog"
language = "en"

[[section]]
id = "posts"

[[section]]
id = "about"
title = "About Me"
"##;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_blog_toml_str(MINIMAL).unwrap();
        assert_eq!(config.site.name, "My Blog");
        assert_eq!(config.site.base_url, "https://kaneeast.github.io");
        assert_eq!(config.site.language, Language::En);
        assert_eq!(config.site.sections.len(), 2);
        assert_eq!(config.site.sections[0].title, "Posts");
        assert_eq!(config.site.sections[1].title, "About Me");
        assert_eq!(config.theme, ThemeConfig::default());
        assert_eq!(config.build, BuildConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[site]
name = "我的博客"
url = "http://localhost:8000"
language = "zh"
copyright_year = 2025

[theme]
stylesheet = "Resources/CustomTheme/styles.css"

[build]
content_dir = "posts-src"
output_dir = "public"
"##;
        let config = parse_blog_toml_str(toml).unwrap();
        assert_eq!(config.site.language, Language::Zh);
        assert_eq!(config.site.copyright_year, Some(2025));
        assert_eq!(config.site.description, "");
        assert!(config.site.sections.is_empty());
        assert_eq!(
            config.theme.stylesheet,
            Some(PathBuf::from("Resources/CustomTheme/styles.css"))
        );
        assert_eq!(config.build.content_dir, PathBuf::from("posts-src"));
        assert_eq!(config.build.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_language() {
        let toml = MINIMAL.replace("language = \"en\"", "language = \"fr\"");
        assert!(parse_blog_toml_str(&toml).is_err());
    }

    #[test]
    fn test_parse_config_rejects_bad_url() {
        let toml = MINIMAL.replace("https://kaneeast.github.io/", "kaneeast.github.io");
        let err = parse_blog_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("site.url"));

        let toml = MINIMAL.replace("https://kaneeast.github.io/", "https://");
        assert!(parse_blog_toml_str(&toml).is_err());
    }

    #[test]
    fn test_parse_config_rejects_duplicate_section() {
        let toml = format!("{}\n[[section]]\nid = \"posts\"\n", MINIMAL);
        let err = parse_blog_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Duplicate section id 'posts'"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_section_id() {
        let toml = MINIMAL.replace("id = \"posts\"", "id = \"My Posts\"");
        assert!(parse_blog_toml_str(&toml).is_err());
    }

    #[test]
    fn test_parse_config_rejects_stylesheet_traversal() {
        let toml = format!("{}\n[theme]\nstylesheet = \"../../etc/passwd\"\n", MINIMAL);
        let err = parse_blog_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Parent directory references"));
        assert!(err.to_string().contains("theme.stylesheet"));
    }

    #[test]
    fn test_feed_section_defaults_to_first_section() {
        let config = parse_blog_toml_str(MINIMAL).unwrap();
        assert_eq!(config.site.feed_section.as_ref().map(SectionId::as_str), Some("posts"));

        let toml = MINIMAL.replace("language = \"en\"", "language = \"en\"\nfeed_section = \"about\"");
        let config = parse_blog_toml_str(&toml).unwrap();
        assert_eq!(config.site.feed_section.as_ref().map(SectionId::as_str), Some("about"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_feed_section() {
        let toml = MINIMAL.replace("language = \"en\"", "language = \"en\"\nfeed_section = \"notes\"");
        let err = parse_blog_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("site.feed_section 'notes'"));
    }

    #[test]
    fn test_parse_config_rejects_stylesheet_inside_output() {
        let toml = format!("{}\n[theme]\nstylesheet = \"Output/styles.css\"\n", MINIMAL);
        let err = parse_blog_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("inside build.output_dir"));

        let toml = format!(
            "{}\n[theme]\nstylesheet = \"public/styles.css\"\n",
            MINIMAL
        );
        assert!(parse_blog_toml_str(&toml).is_ok());
    }

    #[test]
    fn test_validate_path_valid_relative() {
        assert!(validate_path("Resources/styles.css", "theme.stylesheet").is_ok());
        assert!(validate_path("content", "build.content_dir").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_absolute_unix() {
        let result = validate_path("/etc/passwd", "theme.stylesheet");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Absolute paths not allowed")
        );
    }

    #[test]
    fn test_validate_path_rejects_parent_dir() {
        assert!(validate_path("../styles.css", "theme.stylesheet").is_err());
        assert!(validate_path("Resources/../../styles.css", "theme.stylesheet").is_err());
    }

    #[test]
    fn test_validate_path_rejects_empty() {
        let result = validate_path("   ", "build.output_dir");
        assert!(result.unwrap_err().to_string().contains("Empty path"));
    }
}
