use anyhow::{Context, Result};
use blogkit_core::config::{CONFIG_FILE, parse_blog_toml_str};
use blogkit_generator::Theme;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

const STYLESHEET: &str = "Resources/styles.css";

/// Escape a string for a TOML basic string.
///
/// The config is written from a template with comments, which toml
/// serialization would not preserve, so values are escaped by hand.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Scaffold a new blog: blog.toml, a first post, an about section and an
/// editable copy of the built-in stylesheet.
pub async fn run(path: PathBuf, name: Option<String>, url: Option<String>, language: String) -> Result<()> {
    println!("Initializing blog directory: {}", path.display());

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            CONFIG_FILE,
            config_path.display()
        );
    }

    let name = name.unwrap_or_else(|| "My Blog".to_string());
    let url = url.unwrap_or_else(|| "https://example.github.io".to_string());
    let config = generate_blog_toml(&name, &url, &language);

    // Never write a config the build would reject
    parse_blog_toml_str(&config).context("Generated configuration is invalid")?;

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    fs::write(&config_path, config).context("Failed to write blog.toml")?;
    println!("✓ Created {}", CONFIG_FILE);

    create_content(&path, &language)?;
    println!("✓ Created sample content");

    let stylesheet = path.join(STYLESHEET);
    write_file(&stylesheet, &Theme::default().stylesheet)?;
    println!("✓ Created {}", STYLESHEET);

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── blog.toml            ← Site name, URL, language, sections");
    println!("  ├── content/");
    println!("  │   ├── about/index.md");
    println!("  │   └── posts/hello-world.md");
    println!("  └── Resources/styles.css");

    println!("\nNext steps:");
    println!("  1. Edit blog.toml (set site name and URL)");
    println!("  2. Write posts in content/posts/");
    println!("  3. Preview: blogkit preview {}", path.display());

    Ok(())
}

fn generate_blog_toml(name: &str, url: &str, language: &str) -> String {
    let (posts, about) = match language {
        "zh" => ("文章", "关于"),
        _ => ("Posts", "About"),
    };

    format!(
        r#"[site]
name = "{name}"
url = "{url}"
description = "A personal blog"
language = "{language}"   # en | zh
# feed_section = "posts"  # section published in feed.xml, defaults to the first

[[section]]
id = "posts"
title = "{posts}"

[[section]]
id = "about"
title = "{about}"

[theme]
stylesheet = "{stylesheet}"

[build]
content_dir = "content"
output_dir = "Output"
"#,
        name = toml_escape_string(name),
        url = toml_escape_string(url),
        language = toml_escape_string(language),
        posts = posts,
        about = about,
        stylesheet = STYLESHEET,
    )
}

fn create_content(base: &Path, language: &str) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d %H:%M");
    let (post, about) = match language {
        "zh" => (
            format!(
                "---\ndate: {}\ndescription: 第一篇文章\ntags: 随笔\n---\n# 你好，世界\n\n这是我的第一篇文章。\n",
                today
            ),
            "---\ndescription: 关于我\n---\n在这里介绍你自己。\n".to_string(),
        ),
        _ => (
            format!(
                "---\ndate: {}\ndescription: My first post\ntags: meta\n---\n# Hello, World\n\nThis is my first post.\n",
                today
            ),
            "---\ndescription: About me\n---\nTell your readers who you are.\n".to_string(),
        ),
    };

    write_file(&base.join("content/posts/hello-world.md"), &post)?;
    write_file(&base.join("content/about/index.md"), &about)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"Kane's "Blog""#), r#"Kane's \"Blog\""#);
        assert_eq!(toml_escape_string("a\\b"), "a\\\\b");
        assert_eq!(toml_escape_string("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_generated_toml_parses() {
        let toml = generate_blog_toml("Quote \" Blog", "https://kaneeast.github.io", "en");
        let config = parse_blog_toml_str(&toml).unwrap();
        assert_eq!(config.site.name, "Quote \" Blog");
        assert_eq!(config.site.sections.len(), 2);

        let toml = generate_blog_toml("我的博客", "https://kaneeast.github.io", "zh");
        let config = parse_blog_toml_str(&toml).unwrap();
        assert_eq!(config.site.sections[0].title, "文章");
    }

    #[tokio::test]
    async fn test_init_creates_loadable_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blog");
        run(root.clone(), None, None, "en".to_string()).await.unwrap();

        let project = Project::load(&root).unwrap();
        assert_eq!(project.config.site.name, "My Blog");
        assert_eq!(project.content.items.len(), 1);
        assert_eq!(project.content.items[0].title, "Hello, World");
        assert!(project.content.sections[1].body.is_some());
    }

    #[tokio::test]
    async fn test_scaffolded_post_shows_title_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blog");
        run(root.clone(), None, None, "en".to_string()).await.unwrap();

        let project = Project::load(&root).unwrap();
        let output = project.output_dir();
        crate::commands::build::build_into(&project, &output, &project.theme).unwrap();

        let html = fs::read_to_string(output.join("posts/hello-world/index.html")).unwrap();
        assert_eq!(html.matches("<h1").count(), 1);
        assert!(html.contains("This is my first post."));
    }

    #[tokio::test]
    async fn test_init_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let result = run(dir.path().to_path_buf(), None, None, "en".to_string()).await;
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }
}
