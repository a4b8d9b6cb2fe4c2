// Static site generation with Leptos SSR

pub mod components;
pub mod feed;
pub mod loader;
pub mod locale;
pub mod markdown;
pub mod render;
pub mod sitemap;

pub use loader::{Content, load_content};
pub use locale::Locale;
pub use render::{PageKind, Renderer, Theme};

use blogkit_core::{Context, STYLESHEET_PATH, Site};
use feed::{FEED_PATH, build_feed};
use rayon::prelude::*;
use sitemap::{SITEMAP_PATH, build_sitemap};

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

/// Render every route of the site.
///
/// Pages are rendered in parallel; the result keeps route order: index,
/// sections, items, pages, tag list, then one page per tag. Assets are the
/// stylesheet, the RSS feed and the sitemap.
pub fn generate_site(site: &Site, content: &Content, theme: &Theme) -> GeneratedSite {
    let context = Context::new(&content.items);
    let renderer = Renderer::new(site, &context, theme);

    let mut kinds = vec![PageKind::Index];
    kinds.extend(content.sections.iter().map(PageKind::Section));
    kinds.extend(content.items.iter().map(PageKind::Item));
    kinds.extend(content.pages.iter().map(PageKind::Page));
    kinds.push(PageKind::TagList);
    kinds.extend(context.all_tags().iter().map(|tag| PageKind::TagDetail(*tag)));

    let pages: Vec<(String, String)> = kinds
        .par_iter()
        .map(|kind| {
            let route = kind.route();
            tracing::debug!(route = %route, "rendering");
            (output_path(&route), renderer.render(kind))
        })
        .collect();

    tracing::info!(pages = pages.len(), tags = context.all_tags().len(), "site rendered");

    let assets = vec![
        (asset_path(STYLESHEET_PATH), theme.stylesheet.clone().into_bytes()),
        (asset_path(FEED_PATH), build_feed(site, &context).into_bytes()),
        (asset_path(SITEMAP_PATH), build_sitemap(site, &kinds).into_bytes()),
    ];

    GeneratedSite { pages, assets }
}

fn asset_path(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

/// Output file for a route: `/` → `index.html`, `/a/b` → `a/b/index.html`
pub fn output_path(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogkit_core::{Item, Language, Page, Section, SectionConfig, SectionId, Tag};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixture() -> (Site, Content) {
        let posts = SectionId::parse("posts").unwrap();
        let site = Site {
            name: "My Blog".to_string(),
            base_url: "https://kaneeast.github.io".to_string(),
            description: "A personal blog".to_string(),
            language: Language::En,
            sections: vec![SectionConfig {
                id: posts.clone(),
                title: "Posts".to_string(),
            }],
            copyright_year: None,
            feed_section: Some(posts.clone()),
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let content = Content {
            items: vec![Item {
                title: "Hello".to_string(),
                description: String::new(),
                body: "<p>Hi</p>".to_string(),
                date,
                tags: vec![Tag::new("swift"), Tag::new("Rust Lang")],
                path: "/posts/hello".to_string(),
                section: posts.clone(),
            }],
            pages: vec![Page {
                title: "Colophon".to_string(),
                description: String::new(),
                body: "<p>Made by hand</p>".to_string(),
                path: "/colophon".to_string(),
            }],
            sections: vec![Section {
                id: posts,
                title: "Posts".to_string(),
                description: String::new(),
                body: None,
            }],
        };
        (site, content)
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("/"), "index.html");
        assert_eq!(output_path("/posts"), "posts/index.html");
        assert_eq!(output_path("/posts/hello"), "posts/hello/index.html");
        assert_eq!(output_path("/tags/rust-lang/"), "tags/rust-lang/index.html");
    }

    #[test]
    fn test_generate_site_routes() {
        let (site, content) = fixture();
        let generated = generate_site(&site, &content, &Theme::default());
        let paths: Vec<&str> = generated.pages.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "index.html",
                "posts/index.html",
                "posts/hello/index.html",
                "colophon/index.html",
                "tags/index.html",
                "tags/rust-lang/index.html",
                "tags/swift/index.html",
            ]
        );
        let assets: Vec<&str> = generated.assets.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(assets, vec!["styles.css", "feed.xml", "sitemap.xml"]);
    }

    #[test]
    fn test_generate_site_feed_and_sitemap() {
        let (site, content) = fixture();
        let generated = generate_site(&site, &content, &Theme::default());
        let asset = |name: &str| {
            let (_, data) = generated.assets.iter().find(|(p, _)| p == name).unwrap();
            String::from_utf8(data.clone()).unwrap()
        };

        let feed = asset("feed.xml");
        assert_eq!(feed.matches("<item>").count(), 1);
        assert!(feed.contains("https://kaneeast.github.io/posts/hello"));

        let sitemap = asset("sitemap.xml");
        assert_eq!(sitemap.matches("<url>").count(), generated.pages.len());
        assert!(sitemap.contains("<loc>https://kaneeast.github.io/colophon</loc>"));
        assert!(sitemap.contains("<loc>https://kaneeast.github.io/tags/rust-lang</loc>"));
    }

    #[test]
    fn test_generate_site_uses_custom_stylesheet() {
        let (site, content) = fixture();
        let generated = generate_site(&site, &content, &Theme::with_stylesheet("body{}"));
        assert_eq!(generated.assets[0].1, b"body{}".to_vec());
    }

    #[test]
    fn test_generate_site_is_deterministic() {
        let (site, content) = fixture();
        let theme = Theme::default();
        let first = generate_site(&site, &content, &theme);
        let second = generate_site(&site, &content, &theme);
        assert_eq!(first.pages, second.pages);
        assert_eq!(first.assets, second.assets);
    }
}
