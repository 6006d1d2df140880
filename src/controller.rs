//! Browser-side listing controller, as an explicit state machine.
//!
//! `assets/scripts.js` drives the page with the same transitions. Every
//! user action returns the query to fetch, if any; the response or
//! failure is fed back through [`Controller::receive`] or
//! [`Controller::fail`]. A trigger that arrives while a fetch is in
//! flight is dropped, never queued.

use crate::{
    config::ChatLinks,
    entities::{gender_text, Gender, Region, Room, RoomQuery, RoomsResponse},
    pages,
    util::format_online_time_long,
};
use serde::Deserialize;
use std::collections::HashSet;

pub const ERROR_MESSAGE: &str =
    "There was a problem connecting to the server. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingReset,
    LoadingMore,
    Error,
}

/// The subset of the embedded initial state the controller starts from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hydration {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub total_rooms: u64,
    pub offset: u32,
    pub limit: u32,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone)]
pub struct Controller {
    phase: Phase,
    query: RoomQuery,
    rooms: Vec<Room>,
    seen: HashSet<String>,
    total: u64,
    infinite_scroll: bool,
    load_more_visible: bool,
    no_rooms_visible: bool,
    error: Option<&'static str>,
}

impl Controller {
    pub fn hydrate(initial: Hydration) -> Self {
        let seen = initial.rooms.iter().map(|r| r.username.clone()).collect();
        let consumed = u64::try_from(initial.rooms.len()).unwrap_or(u64::MAX);

        Self {
            phase: Phase::Idle,
            query: RoomQuery {
                limit: initial.limit,
                offset: initial.offset,
                gender: Gender::from_code(&initial.gender),
                ..RoomQuery::default()
            },
            load_more_visible: consumed < initial.total_rooms,
            no_rooms_visible: initial.rooms.is_empty(),
            rooms: initial.rooms,
            seen,
            total: initial.total_rooms,
            infinite_scroll: false,
            error: None,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn query(&self) -> &RoomQuery {
        &self.query
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub const fn infinite_scroll(&self) -> bool {
        self.infinite_scroll
    }

    pub const fn load_more_visible(&self) -> bool {
        self.load_more_visible
    }

    pub const fn no_rooms_visible(&self) -> bool {
        self.no_rooms_visible
    }

    pub const fn error(&self) -> Option<&'static str> {
        self.error
    }

    const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::LoadingReset | Phase::LoadingMore)
    }

    fn has_more(&self) -> bool {
        u64::try_from(self.rooms.len()).unwrap_or(u64::MAX) < self.total
    }

    /// Starts a fetch unless one is already running.
    fn begin(&mut self, reset: bool) -> Option<RoomQuery> {
        if self.is_loading() {
            return None;
        }

        self.error = None;
        if reset {
            self.query.offset = 0;
            self.rooms.clear();
            self.seen.clear();
            self.phase = Phase::LoadingReset;
        } else {
            self.phase = Phase::LoadingMore;
        }

        let mut query = self.query.clone();
        query.tags.truncate(crate::entities::MAX_TAGS);
        Some(query)
    }

    fn reset_and_load(&mut self) -> Option<RoomQuery> {
        self.infinite_scroll = false;
        self.load_more_visible = true;
        self.begin(true)
    }

    /// History navigation or a nav link click.
    pub fn navigate(&mut self, path: &str) -> Option<RoomQuery> {
        if self.is_loading() {
            return None;
        }
        let page = pages::resolve(path).unwrap_or_else(|| pages::for_gender(None));
        self.query.gender = page.gender;
        // the popular-tag list is rebuilt for the new gender
        self.query.tags.retain(|tag| pages::is_age_tag(tag));
        self.reset_and_load()
    }

    pub fn select_region(&mut self, region: Option<Region>) -> Option<RoomQuery> {
        if self.is_loading() {
            return None;
        }
        self.query.region = region;
        self.reset_and_load()
    }

    /// Replaces the age tag, leaving popular tags alone.
    pub fn select_age_tag(&mut self, tag: Option<&str>) -> Option<RoomQuery> {
        if self.is_loading() {
            return None;
        }
        self.query.tags.retain(|t| !pages::is_age_tag(t));
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            self.query.tags.push(tag.to_string());
        }
        self.reset_and_load()
    }

    /// Replaces the popular tag, leaving the age tag alone.
    pub fn select_popular_tag(&mut self, tag: Option<&str>) -> Option<RoomQuery> {
        if self.is_loading() {
            return None;
        }
        self.query.tags.retain(|t| pages::is_age_tag(t));
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            self.query.tags.push(tag.to_string());
        }
        self.reset_and_load()
    }

    /// The manual "load more" button. Turns on infinite scroll.
    pub fn load_more(&mut self) -> Option<RoomQuery> {
        if !self.has_more() {
            return None;
        }
        let next = self.begin(false)?;
        self.infinite_scroll = true;
        self.load_more_visible = false;
        Some(next)
    }

    pub fn scrolled_near_bottom(&mut self) -> Option<RoomQuery> {
        if !self.infinite_scroll || !self.has_more() {
            return None;
        }
        self.begin(false)
    }

    /// Applies a page of results and returns how many new rooms were added.
    pub fn receive(&mut self, response: RoomsResponse) -> usize {
        let reset = match self.phase {
            Phase::LoadingReset => true,
            Phase::LoadingMore => false,
            Phase::Idle | Phase::Error => return 0,
        };
        self.phase = Phase::Idle;
        self.total = response.count;
        let received = !response.results.is_empty();

        let before = self.rooms.len();
        for room in response.results {
            if self.seen.insert(room.username.clone()) {
                self.rooms.push(room);
            }
        }
        let added = self.rooms.len() - before;

        if received {
            // a page of duplicates still moves past that offset
            self.query.offset = self.query.offset.saturating_add(self.query.limit);
        } else if !reset {
            // nothing past this offset, whatever the count says
            self.total = u64::try_from(self.rooms.len()).unwrap_or(u64::MAX);
        }
        if !self.infinite_scroll {
            self.load_more_visible = self.has_more();
        }

        if added > 0 {
            self.no_rooms_visible = false;
        } else if reset {
            self.no_rooms_visible = true;
            self.load_more_visible = false;
        }

        added
    }

    pub fn fail(&mut self) {
        if self.is_loading() {
            self.phase = Phase::Error;
            self.error = Some(ERROR_MESSAGE);
            self.no_rooms_visible = true;
        }
    }

    /// Contents of the details modal for a rendered room.
    pub fn open_modal(&self, username: &str, links: &ChatLinks) -> Option<ModalView> {
        let room = self.rooms.iter().find(|r| r.username == username)?;
        Some(ModalView::new(room, links))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub embed_url: String,
    pub chat_label: String,
    pub chat_url: String,
    pub details: Vec<(&'static str, String)>,
    pub tags: Vec<String>,
    pub subject: String,
}

impl ModalView {
    pub fn new(room: &Room, links: &ChatLinks) -> Self {
        let mut details = vec![("Username", room.username.clone())];
        if let Some(age) = room.age.filter(|age| *age > 0) {
            details.push(("Age", format!("{age} years")));
        }
        if !room.location.is_empty() {
            details.push(("Location", room.location.clone()));
        }
        if !room.country.is_empty() {
            details.push(("Country", room.country.clone()));
        }
        details.push(("Gender", gender_text(&room.gender).to_string()));
        details.push(("Viewers", room.num_users.to_string()));
        details.push(("Followers", room.num_followers.to_string()));
        details.push(("Time online", format_online_time_long(room.seconds_online)));
        if !room.spoken_languages.is_empty() {
            details.push(("Languages", room.spoken_languages.clone()));
        }

        Self {
            title: room.username.clone(),
            embed_url: links.embed_url(&room.username),
            chat_label: format!("Start Chat with {}", room.username),
            chat_url: links.chat_url(&room.username),
            details,
            tags: room.tags.clone(),
            subject: room.room_subject.clone(),
        }
    }
}
