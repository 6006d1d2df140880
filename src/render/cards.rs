use super::html::{Escape, Markup};
use crate::{
    entities::{Room, SanitizedRoom},
    util::{format_count, format_online_time},
};

/// Cards whose thumbnails load eagerly with high fetch priority; every
/// later card is lazy. Counted in upstream order.
pub const PRIORITY_IMAGES: usize = 6;

/// Tags shown on a card.
const CARD_TAGS: usize = 3;

const EYE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M1 12s4-8 11-8 11 8 11 8-4 8-11 8-11-8-11-8z"></path><circle cx="12" cy="12" r="3"></circle></svg>"#;

const LANGUAGE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"></path></svg>"#;

pub fn room_cards(rooms: &[Room]) -> Markup {
    rooms
        .iter()
        .enumerate()
        .map(|(index, room)| room_card(room, index))
        .collect()
}

pub fn room_card(room: &Room, index: usize) -> Markup {
    let data = serde_json::to_string(&SanitizedRoom::from(room)).unwrap_or_else(|_| "{}".into());

    let image_loading = if index < PRIORITY_IMAGES {
        r#"fetchpriority="high""#
    } else {
        r#"loading="lazy""#
    };

    let mut badges = String::new();
    if room.is_hd {
        badges.push_str(r#"<span class="badge badge-hd">HD</span>"#);
    }
    if room.is_new {
        badges.push_str(r#"<span class="badge badge-new">NEW</span>"#);
    }

    let age = room
        .age
        .filter(|age| *age > 0)
        .map(|age| format!("{age} years"))
        .unwrap_or_default();

    let language = if room.spoken_languages.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="room-language">{LANGUAGE_ICON} {}</div>"#,
            Escape(&room.spoken_languages)
        )
    };

    let tags: String = room
        .tags
        .iter()
        .take(CARD_TAGS)
        .map(|tag| format!(r#"<span class="room-tag">{}</span>"#, Escape(tag)))
        .collect();

    Markup::from_template(format!(
        r#"
        <div class="room-card fade-in" data-username="{username}" data-room="{data}">
            <div class="room-thumbnail">
                <img src="{image}" alt="{username} preview" {image_loading}>
                <div class="room-badges">{badges}</div>
                <div class="room-viewers">{EYE_ICON}<span>{viewers}</span></div>
            </div>
            <div class="room-details">
                <div class="room-title">{username}</div>
                <div class="room-meta">
                    <span>{age}</span>
                    <span>{online} online</span>
                </div>
                {language}
                <div class="room-tags">{tags}</div>
            </div>
        </div>"#,
        username = Escape(&room.username),
        data = Escape(&data),
        image = Escape(&room.image_url_360x270),
        viewers = format_count(room.num_users),
        online = format_online_time(room.seconds_online),
    ))
}
