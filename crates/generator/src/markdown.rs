//! Markdown documents with an optional `---` front matter block.

use blogkit_core::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use std::path::Path;

const FRONT_MATTER_DELIMITER: &str = "---";

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}

/// A parsed content file
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub front_matter: FrontMatter,
    /// Text of the first level-1 heading, if any
    pub heading: Option<String>,
    /// Rendered HTML body
    pub html: String,
    /// Body without the heading that supplied the title; equal to `html`
    /// when the title comes from front matter
    pub body_html: String,
}

impl Document {
    /// Front matter title, falling back to the first heading
    pub fn title(&self) -> Option<&str> {
        self.front_matter
            .title
            .as_deref()
            .or(self.heading.as_deref())
    }
}

pub fn parse_document(path: &Path, content: &str) -> Result<Document> {
    let (front_matter, body) = split_front_matter(path, content)?;
    let (html, heading) = render_markdown(body);
    let body_html = match (&front_matter.title, &heading) {
        (None, Some(_)) => render_without_heading(body),
        _ => html.clone(),
    };
    Ok(Document {
        front_matter,
        heading,
        html,
        body_html,
    })
}

/// Split off and parse the front matter block. Content without a leading
/// `---` line has no front matter.
fn split_front_matter<'a>(path: &Path, content: &'a str) -> Result<(FrontMatter, &'a str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    match lines.next() {
        Some(first) if first.trim_end() == FRONT_MATTER_DELIMITER => {}
        _ => return Ok((FrontMatter::default(), content)),
    }

    let mut front_matter = FrontMatter::default();
    let mut consumed = content.split_inclusive('\n').next().map_or(0, str::len);
    for line in lines {
        consumed += line.len();
        let line = line.trim();
        if line == FRONT_MATTER_DELIMITER {
            return Ok((front_matter, &content[consumed..]));
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| {
            Error::invalid_content(path, format!("expected 'key: value' in front matter, got '{}'", line))
        })?;
        apply_field(path, &mut front_matter, key.trim(), unquote(value.trim()))?;
    }

    Err(Error::invalid_content(path, "unterminated front matter block"))
}

fn apply_field(path: &Path, front_matter: &mut FrontMatter, key: &str, value: &str) -> Result<()> {
    match key {
        "title" => front_matter.title = non_empty(value),
        "description" => front_matter.description = non_empty(value),
        "date" => {
            let date = parse_date(value).ok_or_else(|| {
                Error::invalid_content(path, format!("invalid date '{}', expected YYYY-MM-DD [HH:MM]", value))
            })?;
            front_matter.date = Some(date);
        }
        "tags" => {
            front_matter.tags = value
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|t| unquote(t.trim()).to_string())
                .collect();
            if front_matter.tags.iter().all(String::is_empty) {
                front_matter.tags.clear();
            }
        }
        other => tracing::debug!(path = %path.display(), key = other, "ignoring unknown front matter key"),
    }
    Ok(())
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DDTHH:MM:SS`
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to HTML and capture the first level-1 heading text.
pub fn render_markdown(markdown: &str) -> (String, Option<String>) {
    let events: Vec<Event> = Parser::new_ext(markdown, options()).collect();

    let mut heading: Option<String> = None;
    let mut capturing = false;
    for event in &events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if heading.is_none() => {
                capturing = true;
                heading = Some(String::new());
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if capturing => break,
            Event::Text(text) | Event::Code(text) if capturing => {
                if let Some(h) = heading.as_mut() {
                    h.push_str(text);
                }
            }
            _ => {}
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    (out, heading.filter(|h| !h.trim().is_empty()))
}

/// Render markdown with its first level-1 heading left out
pub fn render_without_heading(markdown: &str) -> String {
    let mut in_heading = false;
    let mut seen = false;
    let events = Parser::new_ext(markdown, options()).filter(|event| match event {
        Event::Start(Tag::Heading {
            level: HeadingLevel::H1,
            ..
        }) if !seen => {
            seen = true;
            in_heading = true;
            false
        }
        Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_heading => {
            in_heading = false;
            false
        }
        _ => !in_heading,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out.trim_start().to_string()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
