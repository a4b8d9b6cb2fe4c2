use crate::types::{Item, SectionId, Tag};
use std::collections::BTreeMap;

/// Read-only view over the items of one build.
///
/// Items are sorted once by date, newest first. The sort is stable, so items
/// sharing a date keep their ingestion order. Every query below filters that
/// sorted sequence and therefore inherits the same ordering.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    sorted: Vec<&'a Item>,
    tags: Vec<&'a Tag>,
}

impl<'a> Context<'a> {
    pub fn new(items: &'a [Item]) -> Self {
        let mut sorted: Vec<&Item> = items.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        // First spelling in ingestion order wins the label
        let mut by_slug: BTreeMap<&str, &Tag> = BTreeMap::new();
        for tag in items.iter().flat_map(|item| &item.tags) {
            by_slug.entry(tag.slug()).or_insert(tag);
        }

        Self {
            sorted,
            tags: by_slug.into_values().collect(),
        }
    }

    /// All items, newest first
    pub fn all_items(&self) -> &[&'a Item] {
        &self.sorted
    }

    /// Items of one section, newest first
    pub fn items_in_section(&self, section: &SectionId) -> Vec<&'a Item> {
        self.sorted
            .iter()
            .copied()
            .filter(|item| &item.section == section)
            .collect()
    }

    /// Items carrying `tag`, newest first
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&'a Item> {
        self.sorted
            .iter()
            .copied()
            .filter(|item| item.has_tag(tag))
            .collect()
    }

    /// Every distinct tag used by any item, sorted by slug
    pub fn all_tags(&self) -> &[&'a Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn item(title: &str, date: (i32, u32, u32), section: &str, tags: &[&str]) -> Item {
        Item {
            title: title.to_string(),
            description: String::new(),
            body: String::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            tags: tags.iter().map(|t| Tag::new(t)).collect(),
            path: format!("/{}/{}", section, title.to_lowercase()),
            section: SectionId::parse(section).unwrap(),
        }
    }

    fn titles(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_all_items_newest_first() {
        let items = vec![
            item("Old", (2023, 5, 1), "posts", &[]),
            item("New", (2025, 1, 1), "posts", &[]),
            item("Mid", (2024, 7, 15), "notes", &[]),
        ];
        let ctx = Context::new(&items);
        assert_eq!(titles(ctx.all_items()), vec!["New", "Mid", "Old"]);
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_equal_dates_keep_ingestion_order() {
        let items = vec![
            item("First", (2025, 1, 1), "posts", &[]),
            item("Second", (2025, 1, 1), "posts", &[]),
            item("Older", (2024, 1, 1), "posts", &[]),
            item("Third", (2025, 1, 1), "posts", &[]),
        ];
        let ctx = Context::new(&items);
        assert_eq!(
            titles(ctx.all_items()),
            vec!["First", "Second", "Third", "Older"]
        );
    }

    #[test]
    fn test_items_in_section() {
        let items = vec![
            item("A", (2024, 1, 1), "posts", &[]),
            item("B", (2025, 1, 1), "notes", &[]),
            item("C", (2025, 2, 1), "posts", &[]),
        ];
        let ctx = Context::new(&items);
        let posts = SectionId::parse("posts").unwrap();
        assert_eq!(titles(&ctx.items_in_section(&posts)), vec!["C", "A"]);
        let empty = SectionId::parse("about").unwrap();
        assert!(ctx.items_in_section(&empty).is_empty());
    }

    #[test]
    fn test_section_keeps_ingestion_order_for_equal_dates() {
        let items = vec![
            item("First", (2025, 1, 1), "posts", &[]),
            item("Note", (2025, 1, 1), "notes", &[]),
            item("Older", (2024, 1, 1), "posts", &[]),
            item("Second", (2025, 1, 1), "posts", &[]),
        ];
        let ctx = Context::new(&items);
        let posts = SectionId::parse("posts").unwrap();
        assert_eq!(
            titles(&ctx.items_in_section(&posts)),
            vec!["First", "Second", "Older"]
        );
    }

    #[test]
    fn test_items_tagged_includes_exactly_tagged_items() {
        let items = vec![
            item("A", (2024, 1, 1), "posts", &["rust", "web"]),
            item("B", (2025, 1, 1), "posts", &["swift"]),
            item("C", (2025, 2, 1), "posts", &["Rust"]),
        ];
        let ctx = Context::new(&items);
        let rust = ctx.items_tagged(&Tag::new("rust"));
        assert_eq!(titles(&rust), vec!["C", "A"]);
        for tag in ctx.all_tags() {
            for item in &items {
                let listed = ctx.items_tagged(tag).iter().any(|i| i.title == item.title);
                assert_eq!(listed, item.has_tag(tag));
            }
        }
    }

    #[test]
    fn test_all_tags_sorted_and_distinct() {
        let items = vec![
            item("A", (2024, 1, 1), "posts", &["web", "Rust Lang"]),
            item("B", (2025, 1, 1), "posts", &["swift", "rust-lang"]),
            item("C", (2025, 2, 1), "posts", &["async"]),
        ];
        let ctx = Context::new(&items);
        let slugs: Vec<&str> = ctx.all_tags().iter().map(|t| t.slug()).collect();
        assert_eq!(slugs, vec!["async", "rust-lang", "swift", "web"]);
        let rust = ctx.all_tags()[1];
        assert_eq!(rust.label(), "Rust Lang");
    }

    #[test]
    fn test_empty_context() {
        let ctx = Context::new(&[]);
        assert!(ctx.is_empty());
        assert!(ctx.all_tags().is_empty());
    }
}
