use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Site-relative path of the shared stylesheet every page links to.
pub const STYLESHEET_PATH: &str = "/styles.css";

/// Route of the tag list page. Tag detail pages live underneath it.
pub const TAGS_PATH: &str = "/tags";

/// Complete blog configuration, as loaded from blog.toml
#[derive(Debug, Clone)]
pub struct Config {
    pub site: Site,
    pub theme: ThemeConfig,
    pub build: BuildConfig,
}

/// Site descriptor. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    /// Absolute base URL without a trailing slash
    pub base_url: String,
    pub description: String,
    pub language: Language,
    pub sections: Vec<SectionConfig>,
    pub copyright_year: Option<i32>,
    /// Section whose items are published in the RSS feed
    pub feed_section: Option<SectionId>,
}

impl Site {
    pub fn section(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.id.as_str() == id)
    }

    /// Absolute URL for a site-relative path
    pub fn url_for(&self, path: &str) -> String {
        if path == "/" {
            format!("{}/", self.base_url)
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

/// Languages the theme ships copy for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Value for the `lang` attribute of the root element
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Declared section with its navigation title
#[derive(Debug, Clone, PartialEq)]
pub struct SectionConfig {
    pub id: SectionId,
    pub title: String,
}

/// Validated section identifier: lowercase ASCII letters, digits and `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    pub fn parse(s: &str) -> Result<Self> {
        let valid = !s.is_empty()
            && !s.starts_with('-')
            && s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(Error::ConfigParse(format!(
                "Invalid section id '{}': use lowercase letters, digits and '-'",
                s
            )));
        }
        if s == TAGS_PATH.trim_start_matches('/') {
            return Err(Error::ConfigParse(format!(
                "Section id '{}' is reserved for tag pages",
                s
            )));
        }
        Ok(SectionId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Route of the section listing page
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }

    /// Default navigation title: the id with its first letter capitalized
    pub fn default_title(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Theme resources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeConfig {
    /// Project-relative stylesheet; the built-in one is used when absent
    pub stylesheet: Option<PathBuf>,
}

/// Build directories, relative to the project root
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("Output"),
        }
    }
}

/// A dated, taggable post
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub title: String,
    pub description: String,
    /// Rendered HTML fragment
    pub body: String,
    pub date: NaiveDateTime,
    pub tags: Vec<Tag>,
    /// Site-relative URL, e.g. `/posts/hello-world`
    pub path: String,
    pub section: SectionId,
}

impl Item {
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// An undated, untagged static page such as "About"
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub body: String,
    pub path: String,
}

/// Section listing data, with the optional intro from `<section>/index.md`
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub description: String,
    pub body: Option<String>,
}

/// Tag label. Equality, hashing and ordering use the normalized slug, so
/// "Rust Lang" and "rust-lang" are the same tag and share one link.
#[derive(Debug, Clone)]
pub struct Tag {
    label: String,
    slug: String,
}

impl Tag {
    pub fn new(label: &str) -> Self {
        let label = label.trim();
        Self {
            label: label.to_string(),
            slug: normalize_tag(label),
        }
    }

    /// The label as first written in content
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Route of the tag detail page
    pub fn path(&self) -> String {
        format!("{}/{}", TAGS_PATH, self.slug)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slug.cmp(&other.slug)
    }
}

/// Lowercase, collapse whitespace runs into `-`, drop everything that is
/// not alphanumeric or `-`.
fn normalize_tag(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_normalization() {
        assert_eq!(Tag::new("Swift").slug(), "swift");
        assert_eq!(Tag::new("  Rust   Lang ").slug(), "rust-lang");
        assert_eq!(Tag::new("C++").slug(), "c");
        assert_eq!(Tag::new("静态 网站").slug(), "静态-网站");
        assert_eq!(Tag::new("Rust Lang").path(), "/tags/rust-lang");
    }

    #[test]
    fn test_tag_equality_uses_slug() {
        let a = Tag::new("Rust Lang");
        let b = Tag::new("rust-lang");
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.label(), "Rust Lang");
        assert_eq!(b.label(), "rust-lang");
    }

    #[test]
    fn test_tag_normalization_is_stable() {
        for label in ["Swift", "Hello World", "中文", "a-b c"] {
            assert_eq!(Tag::new(label).path(), Tag::new(label).path());
        }
    }

    #[test]
    fn test_section_id_parse() {
        assert_eq!(SectionId::parse("posts").unwrap().path(), "/posts");
        assert!(SectionId::parse("release-notes-2").is_ok());
        assert!(SectionId::parse("").is_err());
        assert!(SectionId::parse("Posts").is_err());
        assert!(SectionId::parse("my posts").is_err());
        assert!(SectionId::parse("-posts").is_err());
        assert!(SectionId::parse("tags").is_err());
    }

    #[test]
    fn test_section_default_title() {
        assert_eq!(SectionId::parse("posts").unwrap().default_title(), "Posts");
    }

    #[test]
    fn test_url_for() {
        let site = Site {
            name: "My Blog".to_string(),
            base_url: "https://example.com".to_string(),
            description: String::new(),
            language: Language::En,
            sections: vec![],
            copyright_year: None,
            feed_section: None,
        };
        assert_eq!(site.url_for("/"), "https://example.com/");
        assert_eq!(site.url_for("/posts/hello"), "https://example.com/posts/hello");
    }
}
