//! Leptos components for the blog theme, rendered server-side only.

use crate::feed::FEED_PATH;
use crate::locale::Locale;
use blogkit_core::{Item, Tag};
use leptos::prelude::*;

/// Script served by the preview server; only linked when live reload is on
pub const RELOAD_SCRIPT_PATH: &str = "/_blogkit/reload.js";

/// Document head data shared by every page kind
#[derive(Debug, Clone)]
pub struct Head {
    pub lang: &'static str,
    pub title: String,
    pub description: Option<String>,
    pub canonical: String,
    pub stylesheet: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

/// A tag rendered as a link to its detail page
#[derive(Debug, Clone, PartialEq)]
pub struct TagChip {
    pub label: String,
    pub href: String,
}

impl From<&Tag> for TagChip {
    fn from(tag: &Tag) -> Self {
        Self {
            label: tag.label().to_string(),
            href: tag.path(),
        }
    }
}

/// Owned, pre-formatted data for one item summary
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCard {
    pub title: String,
    pub href: String,
    pub description: String,
    pub published: String,
    pub tags: Vec<TagChip>,
}

impl ItemCard {
    pub fn new(item: &Item, locale: &Locale) -> Self {
        Self {
            title: item.title.clone(),
            href: item.path.clone(),
            description: item.description.clone(),
            published: format!("{}{}", locale.published, locale.format_date(&item.date)),
            tags: item.tags.iter().map(TagChip::from).collect(),
        }
    }
}

/// Page chrome: head, navigation header, content wrapper and footer
#[component]
pub fn Layout(
    head: Head,
    nav: Vec<NavLink>,
    footer: String,
    live_reload: bool,
    children: Children,
) -> impl IntoView {
    let Head {
        lang,
        title,
        description,
        canonical,
        stylesheet,
    } = head;

    view! {
        <!DOCTYPE html>
        <html lang=lang>
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title}</title>
                {description.map(|content| view! { <meta name="description" content=content/> })}
                <link rel="canonical" href=canonical/>
                <link rel="stylesheet" href=stylesheet/>
                <link rel="alternate" type="application/rss+xml" href=FEED_PATH/>
            </head>
            <body>
                <header>
                    <nav>
                        <ul>
                            {nav
                                .into_iter()
                                .map(|link| {
                                    let NavLink { label, href, selected } = link;
                                    let current = selected.then_some("page");
                                    view! {
                                        <li>
                                            <a href=href aria-current=current>{label}</a>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </nav>
                </header>
                <div class="wrapper">{children()}</div>
                <footer>
                    <p>{footer}</p>
                </footer>
                {live_reload.then(|| view! { <script src=RELOAD_SCRIPT_PATH></script> })}
            </body>
        </html>
    }
}

#[component]
pub fn TagLink(chip: TagChip) -> impl IntoView {
    let TagChip { label, href } = chip;
    view! { <a class="tag" href=href>{label}</a> }
}

/// Shared summary fragment used by every listing page
#[component]
pub fn ItemSummary(card: ItemCard) -> impl IntoView {
    let ItemCard {
        title,
        href,
        description,
        published,
        tags,
    } = card;
    let description = (!description.is_empty()).then(|| view! { <p>{description}</p> });

    view! {
        <article>
            <h3>
                <a href=href>{title}</a>
            </h3>
            {description}
            <p class="meta">{published}</p>
            <div class="tags">
                {tags.into_iter().map(|chip| view! { <TagLink chip=chip/> }).collect_view()}
            </div>
        </article>
    }
}

#[component]
pub fn ItemList(cards: Vec<ItemCard>) -> impl IntoView {
    view! {
        <ul class="item-list">
            {cards
                .into_iter()
                .map(|card| view! { <li><ItemSummary card=card/></li> })
                .collect_view()}
        </ul>
    }
}
