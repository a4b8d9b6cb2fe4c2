//! Sitemap listing every generated route.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/posts/hello</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::render::PageKind;
use blogkit_core::Site;
use quick_xml::escape::escape;

/// Site-relative path of the sitemap
pub const SITEMAP_PATH: &str = "/sitemap.xml";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build the sitemap for `kinds`, in the given order. Items carry their
/// publication date as `lastmod`.
pub fn build_sitemap(site: &Site, kinds: &[PageKind<'_>]) -> String {
    let mut xml = String::with_capacity(128 * (kinds.len() + 1));
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS));
    xml.push('\n');

    for kind in kinds {
        let loc = site.url_for(&kind.route());
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(loc.as_str())));
        if let PageKind::Item(item) = kind {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", item.date.format("%Y-%m-%d")));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
