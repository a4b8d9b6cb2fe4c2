//! Template renderer: one pure function per page kind.
//!
//! Every function takes immutable site data and returns a complete HTML
//! document. Identical inputs always produce byte-identical output.

use crate::components::{Head, ItemCard, ItemList, Layout, NavLink, TagChip, TagLink};
use crate::locale::Locale;
use blogkit_core::{
    Context, Item, Page, STYLESHEET_PATH, Section, SectionId, Site, TAGS_PATH, Tag,
};
use leptos::prelude::*;

const BUILTIN_STYLESHEET: &str = include_str!("../assets/styles.css");

/// Empty comment tachys leaves around lists and absent optional views
const HYDRATION_MARKER: &str = "<!>";

trait IntoDocument {
    fn into_document(self) -> String;
}

impl<V: RenderHtml> IntoDocument for V {
    /// Static pages are never hydrated, so placeholder comments are dropped.
    fn into_document(self) -> String {
        self.to_html().replace(HYDRATION_MARKER, "")
    }
}

/// Theme resources and render options
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Stylesheet contents, written to `/styles.css`
    pub stylesheet: String,
    /// Link the preview server's reload script from every page
    pub live_reload: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            stylesheet: BUILTIN_STYLESHEET.to_string(),
            live_reload: false,
        }
    }
}

impl Theme {
    pub fn with_stylesheet(stylesheet: impl Into<String>) -> Self {
        Self {
            stylesheet: stylesheet.into(),
            ..Self::default()
        }
    }

    pub fn live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }
}

/// Everything the site generator can render
#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    Index,
    Section(&'a Section),
    Item(&'a Item),
    Page(&'a Page),
    TagList,
    TagDetail(&'a Tag),
}

impl PageKind<'_> {
    /// Site-relative route of the rendered document
    pub fn route(&self) -> String {
        match self {
            PageKind::Index => "/".to_string(),
            PageKind::Section(section) => section.id.path(),
            PageKind::Item(item) => item.path.clone(),
            PageKind::Page(page) => page.path.clone(),
            PageKind::TagList => TAGS_PATH.to_string(),
            PageKind::TagDetail(tag) => tag.path(),
        }
    }
}

pub struct Renderer<'a> {
    site: &'a Site,
    context: &'a Context<'a>,
    theme: &'a Theme,
    locale: &'static Locale,
}

impl<'a> Renderer<'a> {
    pub fn new(site: &'a Site, context: &'a Context<'a>, theme: &'a Theme) -> Self {
        Self {
            site,
            context,
            theme,
            locale: Locale::for_language(site.language),
        }
    }

    pub fn render(&self, kind: &PageKind<'_>) -> String {
        match kind {
            PageKind::Index => self.render_index(),
            PageKind::Section(section) => self.render_section(section),
            PageKind::Item(item) => self.render_item(item),
            PageKind::Page(page) => self.render_page(page),
            PageKind::TagList => self.render_tag_list(),
            PageKind::TagDetail(tag) => self.render_tag_detail(tag),
        }
    }

    pub fn render_index(&self) -> String {
        let head = self.head(&self.site.name, &self.site.description, "/");
        let title = self.site.name.clone();
        let description = self.site.description.clone();
        let latest = self.locale.latest_posts;
        let cards = self.cards(self.context.all_items());
        let (nav, footer, live_reload) = self.chrome(None);

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <h1>{title}</h1>
                <p>{description}</p>
                <h2>{latest}</h2>
                <ItemList cards=cards/>
            </Layout>
        }
        .into_document()
    }

    pub fn render_section(&self, section: &Section) -> String {
        let head = self.head(&section.title, &section.description, &section.id.path());
        let title = section.title.clone();
        let intro = section
            .body
            .clone()
            .map(|body| view! { <div class="content" inner_html=body></div> });
        let cards = self.cards(&self.context.items_in_section(&section.id));
        let (nav, footer, live_reload) = self.chrome(Some(&section.id));

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <h1>{title}</h1>
                {intro}
                <ItemList cards=cards/>
            </Layout>
        }
        .into_document()
    }

    pub fn render_item(&self, item: &Item) -> String {
        let head = self.head(&item.title, &item.description, &item.path);
        let title = item.title.clone();
        let published = format!(
            "{}{}",
            self.locale.published,
            self.locale.format_date(&item.date)
        );
        let tags_label = self.locale.tags;
        let chips: Vec<TagChip> = item.tags.iter().map(TagChip::from).collect();
        let tags = (!chips.is_empty()).then(|| {
            view! {
                <div class="tags">
                    <span>{tags_label}</span>
                    {chips.into_iter().map(|chip| view! { <TagLink chip=chip/> }).collect_view()}
                </div>
            }
        });
        let body = item.body.clone();
        let (nav, footer, live_reload) = self.chrome(Some(&item.section));

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <article>
                    <h1>{title}</h1>
                    <p class="meta">{published}</p>
                    {tags}
                    <div class="content" inner_html=body></div>
                </article>
            </Layout>
        }
        .into_document()
    }

    pub fn render_page(&self, page: &Page) -> String {
        let head = self.head(&page.title, &page.description, &page.path);
        let body = page.body.clone();
        let (nav, footer, live_reload) = self.chrome(None);

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <div class="content" inner_html=body></div>
            </Layout>
        }
        .into_document()
    }

    pub fn render_tag_list(&self) -> String {
        let heading = self.locale.all_tags;
        let head = self.head(heading, "", TAGS_PATH);
        let chips: Vec<TagChip> = self
            .context
            .all_tags()
            .iter()
            .map(|tag| TagChip::from(*tag))
            .collect();
        let (nav, footer, live_reload) = self.chrome(None);

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <h1>{heading}</h1>
                <ul class="all-tags">
                    {chips.into_iter().map(|chip| view! { <li><TagLink chip=chip/></li> }).collect_view()}
                </ul>
            </Layout>
        }
        .into_document()
    }

    pub fn render_tag_detail(&self, tag: &Tag) -> String {
        let heading = format!("{}{}", self.locale.tag_heading, tag.label());
        let head = self.head(&heading, "", &tag.path());
        let browse_all = self.locale.browse_all_tags;
        let cards = self.cards(&self.context.items_tagged(tag));
        let (nav, footer, live_reload) = self.chrome(None);

        view! {
            <Layout head=head nav=nav footer=footer live_reload=live_reload>
                <h1>{heading}</h1>
                <a class="browse-all" href=TAGS_PATH>{browse_all}</a>
                <ItemList cards=cards/>
            </Layout>
        }
        .into_document()
    }

    fn head(&self, title: &str, description: &str, route: &str) -> Head {
        Head {
            lang: self.site.language.code(),
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            canonical: self.site.url_for(route),
            stylesheet: STYLESHEET_PATH,
        }
    }

    fn chrome(&self, selected: Option<&SectionId>) -> (Vec<NavLink>, String, bool) {
        (self.nav(selected), self.footer(), self.theme.live_reload)
    }

    fn nav(&self, selected: Option<&SectionId>) -> Vec<NavLink> {
        let home = NavLink {
            label: self.locale.home.to_string(),
            href: "/".to_string(),
            selected: false,
        };
        std::iter::once(home)
            .chain(self.site.sections.iter().map(|section| NavLink {
                label: section.title.clone(),
                href: section.id.path(),
                selected: selected == Some(&section.id),
            }))
            .collect()
    }

    fn footer(&self) -> String {
        self.locale.footer(&self.site.name, self.site.copyright_year)
    }

    fn cards(&self, items: &[&Item]) -> Vec<ItemCard> {
        items
            .iter()
            .map(|item| ItemCard::new(item, self.locale))
            .collect()
    }
}
