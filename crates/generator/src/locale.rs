//! Theme copy for each supported site language.

use blogkit_core::Language;
use chrono::NaiveDateTime;

/// Localized strings used by the theme. One table per language, selected
/// once from the site descriptor.
#[derive(Debug, PartialEq, Eq)]
pub struct Locale {
    pub home: &'static str,
    pub latest_posts: &'static str,
    pub published: &'static str,
    pub tags: &'static str,
    pub all_tags: &'static str,
    pub tag_heading: &'static str,
    pub browse_all_tags: &'static str,
    pub built_with: &'static str,
    date_format: &'static str,
}

pub static EN: Locale = Locale {
    home: "Home",
    latest_posts: "Latest Posts",
    published: "Published: ",
    tags: "Tags: ",
    all_tags: "All Tags",
    tag_heading: "Tag: ",
    browse_all_tags: "Browse All Tags",
    built_with: "Built with blogkit.",
    date_format: "%B %-d, %Y",
};

pub static ZH: Locale = Locale {
    home: "首页",
    latest_posts: "最新文章",
    published: "发布于: ",
    tags: "标签: ",
    all_tags: "所有标签",
    tag_heading: "标签: ",
    browse_all_tags: "浏览所有标签",
    built_with: "由 blogkit 构建。",
    date_format: "%Y年%-m月%-d日",
};

impl Locale {
    pub fn for_language(language: Language) -> &'static Locale {
        match language {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }

    /// Long-form date without a time component
    pub fn format_date(&self, date: &NaiveDateTime) -> String {
        date.format(self.date_format).to_string()
    }

    /// Footer copyright line
    pub fn footer(&self, site_name: &str, year: Option<i32>) -> String {
        match year {
            Some(year) => format!("© {} {}. {}", year, site_name, self.built_with),
            None => format!("© {}. {}", site_name, self.built_with),
        }
    }
}
