use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Upstream accepts at most this many `tag` parameters.
pub const MAX_TAGS: usize = 5;

/// Upper bound for a page requested through the JSON endpoint.
pub const MAX_LIMIT: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "c")]
    Couple,
    #[serde(rename = "t")]
    Trans,
}

impl Gender {
    pub const ALL: [Self; 4] = [Self::Female, Self::Male, Self::Couple, Self::Trans];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Female => "f",
            Self::Male => "m",
            Self::Couple => "c",
            Self::Trans => "t",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
            Self::Couple => "Couple",
            Self::Trans => "Trans",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() == code)
    }
}

/// Label for a raw upstream gender code, falling back to the code itself.
pub fn gender_text(code: &str) -> &str {
    match Gender::from_code(code) {
        Some(gender) => gender.label(),
        None => code,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    EuropeRussia,
    Asia,
    Other,
}

impl Region {
    pub const ALL: [Self; 5] = [
        Self::NorthAmerica,
        Self::SouthAmerica,
        Self::EuropeRussia,
        Self::Asia,
        Self::Other,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::NorthAmerica => "northamerica",
            Self::SouthAmerica => "southamerica",
            Self::EuropeRussia => "europe_russia",
            Self::Asia => "asia",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NorthAmerica => "North America",
            Self::SouthAmerica => "South America",
            Self::EuropeRussia => "Europe/Russia",
            Self::Asia => "Asia",
            Self::Other => "Other",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

/// Filter and pagination state for one page of rooms.
///
/// Rebuilt per request on the server; owned by the controller on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomQuery {
    pub limit: u32,
    pub offset: u32,
    pub gender: Option<Gender>,
    pub region: Option<Region>,
    pub tags: Vec<String>,
    pub hd: bool,
}

impl RoomQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// The tags actually sent upstream: the first five, in order.
    pub fn forwarded_tags(&self) -> &[String] {
        &self.tags[..self.tags.len().min(MAX_TAGS)]
    }
}

// upstream sends `null` for several string fields
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single live room as returned by the listing API.
///
/// Fields this service does not read are kept in `extra` so the JSON
/// endpoint hands them back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub country: String,
    #[serde(default, deserialize_with = "nullable")]
    pub spoken_languages: String,
    #[serde(default, deserialize_with = "nullable")]
    pub room_subject: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub num_users: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub num_followers: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub seconds_online: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub is_hd: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_new: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url_360x270: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomsResponse {
    pub count: u64,
    pub results: Vec<Room>,
}

/// Display-only projection of a [`Room`] embedded in rendered HTML.
///
/// Deep links to the upstream platform (chat and iframe URLs) never make
/// it into this copy; chat links are built from campaign identifiers.
#[derive(Debug, Serialize)]
pub struct SanitizedRoom<'a> {
    pub username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'a str>,
    pub age: Option<u32>,
    pub gender: &'a str,
    pub location: &'a str,
    pub country: &'a str,
    pub spoken_languages: &'a str,
    pub room_subject: &'a str,
    pub tags: &'a [String],
    pub num_users: u64,
    pub num_followers: u64,
    pub seconds_online: u64,
    pub is_hd: bool,
    pub is_new: bool,
    pub image_url_360x270: &'a str,
}

impl<'a> From<&'a Room> for SanitizedRoom<'a> {
    fn from(room: &'a Room) -> Self {
        Self {
            username: &room.username,
            display_name: room.display_name.as_deref(),
            age: room.age,
            gender: &room.gender,
            location: &room.location,
            country: &room.country,
            spoken_languages: &room.spoken_languages,
            room_subject: &room.room_subject,
            tags: &room.tags,
            num_users: room.num_users,
            num_followers: room.num_followers,
            seconds_online: room.seconds_online,
            is_hd: room.is_hd,
            is_new: room.is_new,
            image_url_360x270: &room.image_url_360x270,
        }
    }
}
