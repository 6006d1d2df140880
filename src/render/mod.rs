//! Server-side HTML for the content pages.

pub mod cards;
pub mod html;

use crate::{
    config::Config,
    entities::{Gender, Region, Room, SanitizedRoom},
    pages::{self, PageConfig, AGE_TAGS},
};
use chrono::Datelike;
use html::{script_json, Escape, Markup};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

/// Navigation entries, in display order.
const NAV_ITEMS: [(&str, &str); 4] = [
    ("/girls/", "Girls"),
    ("/couples/", "Couples"),
    ("/men/", "Men"),
    ("/trans/", "Trans"),
];

const CHEVRON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="6 9 12 15 18 9"></polyline></svg>"#;

/// State handed from the server render to the client script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState<'a> {
    pub rooms: Vec<SanitizedRoom<'a>>,
    pub total_rooms: u64,
    pub offset: u32,
    pub limit: u32,
    pub gender: &'static str,
    pub path: &'static str,
    pub chat: ChatState<'a>,
    /// Popular tags keyed by gender code, `""` for the home page.
    pub popular_tags: BTreeMap<&'static str, Vec<&'static str>>,
    pub pages: Vec<PageState>,
}

/// What the client needs to retitle the document on navigation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub path: &'static str,
    pub gender: &'static str,
    pub title: &'static str,
    pub meta_title: &'static str,
    pub meta_description: &'static str,
    pub canonical_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState<'a> {
    pub base_url: &'a str,
    pub tour_embed: &'a str,
    pub tour_chat: &'a str,
    pub campaign: &'a str,
}

/// Renders a full document for `page` with the first page of rooms.
pub fn page(
    config: &Config,
    page: &'static PageConfig,
    rooms: &[Room],
    total_rooms: u64,
) -> String {
    let canonical_url = format!("{}{}", config.site_url, page.canonical_path());

    let state = InitialState {
        rooms: rooms.iter().map(SanitizedRoom::from).collect(),
        total_rooms,
        offset: config.default_limit,
        limit: config.default_limit,
        gender: page.gender.map_or("", |g| g.code()),
        path: page.path,
        chat: ChatState {
            base_url: &config.chat.base_url,
            tour_embed: &config.chat.tour_embed,
            tour_chat: &config.chat.tour_chat,
            campaign: &config.chat.campaign,
        },
        popular_tags: std::iter::once(None)
            .chain(Gender::ALL.into_iter().map(Some))
            .map(|gender| (gender.map_or("", Gender::code), pages::popular_tags(gender)))
            .collect(),
        pages: pages::PAGES
            .iter()
            .map(|page| PageState {
                path: page.path,
                gender: page.gender.map_or("", Gender::code),
                title: page.title,
                meta_title: page.meta_title,
                meta_description: page.meta_description,
                canonical_url: format!("{}{}", config.site_url, page.canonical_path()),
            })
            .collect(),
    };
    // serializing plain strings and numbers cannot fail
    let state = script_json(&state).unwrap_or_else(|_| Markup::from_template("{}".into()));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    {head}
</head>
<body>
    {header}
    {main}
    {modal}
    {footer}

    <script>
        window.__INITIAL_STATE__ = {state};
    </script>
    <script src="/assets/scripts.js"></script>
</body>
</html>"#,
        head = head(config, page, &canonical_url),
        header = header(page.path),
        main = main_content(page, rooms, total_rooms),
        modal = modal(),
        footer = footer(chrono::Utc::now().year()),
    )
}

fn head(config: &Config, page: &PageConfig, canonical_url: &str) -> Markup {
    let structured_data = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.site_name,
        "url": format!("{}/", config.site_url),
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}/search?q={{search_term_string}}", config.site_url),
            "query-input": "required name=search_term_string"
        },
        "description": page.meta_description,
    });
    let structured_data =
        script_json(&structured_data).unwrap_or_else(|_| Markup::from_template("{}".into()));

    Markup::from_template(format!(
        r#"<meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{description}">
    <meta name="keywords" content="live cams, sex cams, webcams, live video chat, adult webcams">
    <title>{title}</title>
    <link rel="icon" type="image/png" sizes="250x250" href="/assets/images/favicon.png">
    <link rel="apple-touch-icon" href="/assets/images/favicon.png">
    <link rel="canonical" href="{canonical}" id="canonical-url">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:type" content="website">
    <meta property="og:url" content="{canonical}">
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">
    <script type="application/ld+json">{structured_data}</script>
    <link rel="stylesheet" href="/assets/styles.css">"#,
        title = Escape(page.meta_title),
        description = Escape(page.meta_description),
        canonical = Escape(canonical_url),
    ))
}

fn header(current_path: &str) -> Markup {
    let current = pages::normalize(current_path);
    let mut desktop = String::new();
    let mut mobile = String::new();

    for (href, label) in NAV_ITEMS {
        let path = pages::normalize(href);
        let active = if path == current { "active" } else { "" };
        let gender = pages::resolve(path)
            .and_then(|page| page.gender)
            .map_or("", |g| g.code());

        desktop.push_str(&format!(
            r#"<li><a href="{href}" class="nav-link {active}" data-gender="{gender}">{label}</a></li>"#
        ));
        mobile.push_str(&format!(
            r#"<a href="{href}" class="mobile-gender-btn {active}" data-gender="{gender}">{label}</a>"#
        ));
    }

    Markup::from_template(format!(
        r#"<header>
        <nav>
            <a href="/" class="logo-link">
                <img src="/assets/images/logotype.webp" alt="logo" width="198" height="33" class="logo-img">
            </a>
            <ul class="nav-links desktop-menu">{desktop}</ul>
            <button class="hamburger" aria-label="Menu">
                <svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="3" y1="12" x2="21" y2="12"></line><line x1="3" y1="6" x2="21" y2="6"></line><line x1="3" y1="18" x2="21" y2="18"></line></svg>
            </button>
        </nav>
        <div class="mobile-gender-buttons">{mobile}</div>
    </header>"#
    ))
}

fn dropdown_item(value: &str, label: &str, selected: bool) -> Markup {
    Markup::from_template(format!(
        r#"<div class="dropdown-item{}" data-value="{}">{}</div>"#,
        if selected { " selected" } else { "" },
        Escape(value),
        Escape(label),
    ))
}

fn dropdown(id: &str, label: &str, items: &Markup) -> Markup {
    Markup::from_template(format!(
        r#"<div class="dropdown-filter">
                <button class="dropdown-filter-btn" id="{id}-filter-btn">
                    <span>{label}</span>
                    {CHEVRON_ICON}
                </button>
                <div class="dropdown-menu" id="{id}-dropdown">{items}</div>
            </div>"#,
        id = Escape(id),
        label = Escape(label),
    ))
}

fn filters(page: &PageConfig) -> Markup {
    let regions: Markup = std::iter::once(dropdown_item("", "All Regions", true))
        .chain(
            Region::ALL
                .into_iter()
                .map(|region| dropdown_item(region.code(), region.label(), false)),
        )
        .collect();

    let ages: Markup = std::iter::once(dropdown_item("", "All Ages", true))
        .chain(AGE_TAGS.into_iter().map(|tag| dropdown_item(tag, tag, false)))
        .collect();

    let tags: Markup = std::iter::once(dropdown_item("", "All Tags", true))
        .chain(
            pages::popular_tags(page.gender)
                .into_iter()
                .map(|tag| dropdown_item(tag, tag, false)),
        )
        .collect();

    Markup::from_template(format!(
        r#"<div class="dropdown-filters">
            {}
            {}
            {}
        </div>"#,
        dropdown("region", "Region", &regions),
        dropdown("age", "Age", &ages),
        dropdown("tags", "Popular Tags", &tags),
    ))
}

fn main_content(page: &PageConfig, rooms: &[Room], total_rooms: u64) -> Markup {
    let shown = u64::try_from(rooms.len()).unwrap_or(u64::MAX);
    let load_more = if shown < total_rooms { "" } else { " hidden" };
    let no_rooms = if rooms.is_empty() { "" } else { " hidden" };

    Markup::from_template(format!(
        r#"<main>
        <section class="page-header">
            <h1 id="page-title">{title}</h1>
        </section>

        <section class="featured">
            <div class="section-header">
                {filters}
            </div>
            <div class="loader-container hidden" id="rooms-loader">
                <div class="loader"></div>
            </div>
            <div class="rooms-container" id="rooms-container">{cards}
            </div>
            <div class="no-rooms-message{no_rooms}" id="no-rooms-message">
                <div class="no-rooms-title">No rooms found</div>
                <p>Try different filters or check back later.</p>
            </div>
        </section>

        <button class="load-more{load_more}" id="load-more-btn">Load More</button>

        <div class="scroll-loader hidden" id="scroll-loader">
            <div class="loader"></div>
        </div>
    </main>"#,
        title = Escape(page.title),
        filters = filters(page),
        cards = cards::room_cards(rooms),
    ))
}

fn modal() -> Markup {
    Markup::from_template(
        r##"<div class="modal" id="room-modal">
        <div class="modal-content">
            <button class="close-modal" id="close-modal">&times;</button>
            <div class="modal-header">
                <div class="modal-title" id="modal-title">Room Name</div>
            </div>
            <div class="modal-body">
                <div class="embed-container" id="modal-embed"></div>
                <a href="#" class="start-chat-btn" id="start-chat-btn" rel="nofollow noopener noreferrer" target="_blank">Start Chat with Model</a>
                <div class="room-info" id="modal-info"></div>
            </div>
        </div>
    </div>"##
            .to_string(),
    )
}

fn footer(year: i32) -> Markup {
    Markup::from_template(format!(
        r#"<footer>
        <div class="footer-content">
            <div class="footer-section">
                <h2 class="footer-title">Live Cams</h2>
                <p>The best platform to discover and enjoy live cams from around the world. Explore thousands of real-time broadcasts.</p>
            </div>
            <div class="footer-section">
                <span class="footer-title">Legal</span>
                <ul class="footer-links">
                    <li><a href="/terms/" rel="nofollow noopener noreferrer" target="_blank">Terms</a></li>
                    <li><a href="/2257/" rel="nofollow noopener noreferrer" target="_blank">2257</a></li>
                    <li><a href="/privacy/" rel="nofollow noopener noreferrer" target="_blank">Privacy Policy</a></li>
                </ul>
            </div>
        </div>
        <div class="copyright">
            <p>&copy; {year} Live Cams. All rights reserved.</p>
        </div>
    </footer>"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::room;

    fn girls() -> &'static PageConfig {
        pages::resolve("/girls").unwrap()
    }

    fn initial_state(html: &str) -> serde_json::Value {
        let start = html.find("window.__INITIAL_STATE__ = ").unwrap() + 27;
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn full_page_with_more_rooms_available() {
        let rooms: Vec<Room> = (0..36).map(|i| room(&format!("user{i}"))).collect();
        let html = page(&Config::default(), girls(), &rooms, 100);

        assert_eq!(html.matches(r#"class="room-card "#).count(), 36);
        assert_eq!(html.matches(r#"fetchpriority="high""#).count(), 6);
        assert!(html.contains(r#"class="load-more" id="load-more-btn""#));
        assert!(html.contains(r#"class="no-rooms-message hidden""#));
        assert!(html.contains("<title>Female Cams - Free Live Girls</title>"));
        assert!(html.contains(r#"href="https://cambaddies.net/girls/" id="canonical-url""#));
        assert!(html.contains(r#"href="/girls/" class="nav-link active""#));
        assert!(html.contains(r#"href="/men/" class="nav-link " data-gender="m""#));
    }

    #[test]
    fn empty_page_shows_placeholder() {
        let html = page(&Config::default(), girls(), &[], 0);

        assert_eq!(html.matches(r#"class="room-card "#).count(), 0);
        assert!(html.contains(r#"class="load-more hidden""#));
        assert!(html.contains(r#"class="no-rooms-message" id="no-rooms-message""#));
    }

    #[test]
    fn all_rooms_consumed_hides_load_more() {
        let rooms = vec![room("a"), room("b")];
        let html = page(&Config::default(), girls(), &rooms, 2);
        assert!(html.contains(r#"class="load-more hidden""#));
    }

    #[test]
    fn initial_state_is_embedded() {
        let rooms = vec![room("alice"), room("bob")];
        let html = page(&Config::default(), girls(), &rooms, 100);
        let state = initial_state(&html);

        assert_eq!(state["totalRooms"], 100);
        assert_eq!(state["offset"], 36);
        assert_eq!(state["gender"], "f");
        assert_eq!(state["path"], "/girls");
        assert_eq!(state["rooms"][1]["username"], "bob");
        assert!(state["rooms"][0].get("chat_room_url").is_none());
        assert_eq!(state["chat"]["tourChat"], "LQps");
        assert_eq!(state["popularTags"]["m"][0], "muscle");
        assert_eq!(state["pages"][2]["canonicalUrl"], "https://cambaddies.net/men/");
    }

    #[test]
    fn tag_filter_depends_on_gender() {
        let men = page(&Config::default(), pages::resolve("/men").unwrap(), &[], 0);
        assert!(men.contains(r#"data-value="muscle""#));

        let home = page(&Config::default(), pages::resolve("/").unwrap(), &[], 0);
        assert!(!home.contains(r#"data-value="muscle""#));
        assert!(home.contains(r#"data-value="latina""#));
        assert!(home.contains(r#"data-value="europe_russia">Europe/Russia<"#));
        assert!(!home.contains("nav-link active"));
    }
}
