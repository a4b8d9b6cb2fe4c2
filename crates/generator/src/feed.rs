//! RSS 2.0 feed of the feed section's items, newest first.

use blogkit_core::{Context, Item, Site};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder};

/// Site-relative path of the feed
pub const FEED_PATH: &str = "/feed.xml";

const GENERATOR: &str = "blogkit";

/// Build the feed document.
///
/// `lastBuildDate` is the newest item's date, so identical content yields
/// an identical feed.
pub fn build_feed(site: &Site, context: &Context<'_>) -> String {
    let items = match &site.feed_section {
        Some(section) => context.items_in_section(section),
        None => Vec::new(),
    };

    let channel = ChannelBuilder::default()
        .title(site.name.clone())
        .link(site.url_for("/"))
        .description(site.description.clone())
        .language(Some(site.language.code().to_string()))
        .generator(Some(GENERATOR.to_string()))
        .last_build_date(items.first().map(|item| rfc2822(item)))
        .items(items.iter().map(|item| feed_item(site, item)).collect::<Vec<_>>())
        .build();

    channel.to_string()
}

fn feed_item(site: &Site, item: &Item) -> rss::Item {
    let link = site.url_for(&item.path);
    let categories = item
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.label()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description((!item.description.is_empty()).then(|| item.description.clone()))
        .pub_date(Some(rfc2822(item)))
        .categories(categories)
        .build()
}

fn rfc2822(item: &Item) -> String {
    item.date.and_utc().to_rfc2822()
}
