//! Content ingestion: turns the content directory into items, pages and
//! sections.
//!
//! ```text
//! content/
//! ├── about.md               → Page    /about
//! ├── index.md               (reserved, ignored)
//! └── posts/                 → Section /posts (must be declared in blog.toml)
//!     ├── index.md           → section intro
//!     └── hello-world.md     → Item    /posts/hello-world
//! ```
//!
//! Files are visited in sorted path order; that order is the ingestion order
//! used to break date ties.

use crate::markdown::{Document, parse_document};
use blogkit_core::{Error, Item, Page, Result, Section, Site, TAGS_PATH, Tag};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

const INDEX_FILE: &str = "index.md";

/// Everything ingested from the content directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    pub items: Vec<Item>,
    pub pages: Vec<Page>,
    /// One entry per declared section, in declaration order
    pub sections: Vec<Section>,
}

pub fn load_content(site: &Site, content_dir: &Path) -> Result<Content> {
    if !content_dir.is_dir() {
        return Err(Error::invalid_content(
            content_dir,
            "content directory not found",
        ));
    }

    let mut items = Vec::new();
    let mut pages = Vec::new();
    let mut intros: HashMap<String, Document> = HashMap::new();

    let walker = WalkDir::new(content_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        let relative = path.strip_prefix(content_dir).unwrap_or(path);

        if entry.file_type().is_dir() {
            check_directory(site, relative)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            tracing::debug!(path = %relative.display(), "skipping non-markdown file");
            continue;
        }

        let raw = fs::read_to_string(path)?;
        let doc = parse_document(relative, &raw)?;
        let slug = file_slug(relative)?;
        let is_index = entry.file_name() == INDEX_FILE;

        match entry.depth() {
            1 if is_index => {
                tracing::debug!(path = %relative.display(), "ignoring reserved index.md");
            }
            1 => pages.push(build_page(relative, &slug, doc)?),
            _ => {
                let section = section_dir(relative);
                if is_index {
                    intros.insert(section, doc);
                } else {
                    items.push(build_item(site, relative, &section, &slug, doc)?);
                }
            }
        }
        tracing::debug!(path = %relative.display(), "loaded");
    }

    let sections = site
        .sections
        .iter()
        .map(|config| {
            let intro = intros.remove(config.id.as_str());
            Section {
                id: config.id.clone(),
                title: config.title.clone(),
                description: intro
                    .as_ref()
                    .and_then(|d| d.front_matter.description.clone())
                    .unwrap_or_default(),
                body: intro
                    .map(|d| d.html)
                    .filter(|html| !html.trim().is_empty()),
            }
        })
        .collect();

    let content = Content {
        items,
        pages,
        sections,
    };
    check_unique_paths(site, &content)?;

    tracing::info!(
        items = content.items.len(),
        pages = content.pages.len(),
        sections = content.sections.len(),
        "content loaded"
    );
    Ok(content)
}

/// Dotfiles below the content root; the root itself may live anywhere
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Top-level directories must be declared sections; sections are flat.
fn check_directory(site: &Site, relative: &Path) -> Result<()> {
    if relative.components().count() > 1 {
        return Err(Error::invalid_content(
            relative,
            "nested directories inside a section are not supported",
        ));
    }
    let name = relative.to_string_lossy();
    if site.section(&name).is_none() {
        return Err(Error::invalid_content(
            relative,
            format!(
                "unknown section '{}'; declare it with [[section]] in blog.toml",
                name
            ),
        ));
    }
    Ok(())
}

fn section_dir(relative: &Path) -> String {
    relative
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// URL segment from the file stem
fn file_slug(relative: &Path) -> Result<String> {
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let usable = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !usable {
        return Err(Error::invalid_content(
            relative,
            "file name must only contain letters, digits, '-', '_' or '.'",
        ));
    }
    Ok(stem.to_string())
}

fn build_page(relative: &Path, slug: &str, doc: Document) -> Result<Page> {
    let title = doc
        .title()
        .ok_or_else(|| Error::invalid_content(relative, "missing title"))?
        .to_string();
    Ok(Page {
        title,
        description: doc.front_matter.description.unwrap_or_default(),
        body: doc.html,
        path: format!("/{}", slug),
    })
}

fn build_item(site: &Site, relative: &Path, section: &str, slug: &str, doc: Document) -> Result<Item> {
    let config = site
        .section(section)
        .ok_or_else(|| Error::invalid_content(relative, format!("unknown section '{}'", section)))?;
    let title = doc
        .title()
        .ok_or_else(|| Error::invalid_content(relative, "missing title"))?
        .to_string();
    let date = doc
        .front_matter
        .date
        .ok_or_else(|| Error::invalid_content(relative, "missing date in front matter"))?;

    let mut tags: Vec<Tag> = Vec::with_capacity(doc.front_matter.tags.len());
    for label in &doc.front_matter.tags {
        let tag = Tag::new(label);
        if tag.slug().is_empty() {
            return Err(Error::invalid_content(
                relative,
                format!("tag '{}' is empty after normalization", label),
            ));
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(Item {
        title,
        description: doc.front_matter.description.unwrap_or_default(),
        body: doc.body_html,
        date,
        tags,
        path: format!("{}/{}", config.id.path(), slug),
        section: config.id.clone(),
    })
}

/// Every item and page route must be unique and must not shadow a
/// generated listing route.
fn check_unique_paths(site: &Site, content: &Content) -> Result<()> {
    let mut routes: HashMap<String, String> = HashMap::new();
    routes.insert("/".to_string(), "the index page".to_string());
    routes.insert(TAGS_PATH.to_string(), "the tag list".to_string());
    for section in &site.sections {
        routes.insert(section.id.path(), format!("section '{}'", section.id));
    }

    let documents = content
        .items
        .iter()
        .map(|item| (&item.path, format!("item '{}'", item.title)))
        .chain(
            content
                .pages
                .iter()
                .map(|page| (&page.path, format!("page '{}'", page.title))),
        );

    for (route, source) in documents {
        if let Some(first) = routes.get(route) {
            return Err(Error::DuplicatePath {
                route: route.clone(),
                first: first.clone(),
                second: source,
            });
        }
        routes.insert(route.clone(), source);
    }
    Ok(())
}
