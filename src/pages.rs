//! Content routes and the fixed configuration behind each of them.

use crate::entities::Gender;

/// Tags that make up the age sub-group of the tag filter.
pub const AGE_TAGS: [&str; 4] = ["teen", "young", "milf", "mature"];

/// How many tags the filter offers when no gender is selected.
const MERGED_TAG_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub path: &'static str,
    pub gender: Option<Gender>,
    pub title: &'static str,
    pub meta_title: &'static str,
    pub meta_description: &'static str,
}

impl PageConfig {
    /// Canonical form of the path, with a trailing slash.
    pub fn canonical_path(&self) -> String {
        if self.path == "/" {
            "/".to_string()
        } else {
            format!("{}/", self.path)
        }
    }
}

pub const PAGES: [PageConfig; 5] = [
    PageConfig {
        path: "/",
        gender: None,
        title: "Live Sex Cams",
        meta_title: "Live Sex Cams - Free Adult Webcams",
        meta_description: "Watch free live sex cams with thousands of amateur models broadcasting right now. Browse girls, men, couples and trans performers.",
    },
    PageConfig {
        path: "/girls",
        gender: Some(Gender::Female),
        title: "Female Cams",
        meta_title: "Female Cams - Free Live Girls",
        meta_description: "Free live girl cams. Browse thousands of female models streaming live right now.",
    },
    PageConfig {
        path: "/men",
        gender: Some(Gender::Male),
        title: "Male Cams",
        meta_title: "Male Cams - Free Live Men",
        meta_description: "Free live male cams. Browse men streaming live right now.",
    },
    PageConfig {
        path: "/couples",
        gender: Some(Gender::Couple),
        title: "Couples Cams",
        meta_title: "Couples Cams - Free Live Couples",
        meta_description: "Free live couples cams. Watch couples streaming live right now.",
    },
    PageConfig {
        path: "/trans",
        gender: Some(Gender::Trans),
        title: "Trans Cams",
        meta_title: "Trans Cams - Free Live Trans Models",
        meta_description: "Free live trans cams. Browse trans models streaming live right now.",
    },
];

/// Strips trailing slashes; an empty result is the root.
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Maps a request path to its page, or `None` for anything that is not a
/// content route.
pub fn resolve(path: &str) -> Option<&'static PageConfig> {
    let path = normalize(path);
    PAGES.iter().find(|page| page.path == path)
}

pub fn for_gender(gender: Option<Gender>) -> &'static PageConfig {
    PAGES
        .iter()
        .find(|page| page.gender == gender)
        .unwrap_or(&PAGES[0])
}

const fn curated_tags(gender: Gender) -> [&'static str; 10] {
    match gender {
        Gender::Female => [
            "latina", "asian", "milf", "teen", "bigboobs", "hairy", "squirt", "anal", "ebony",
            "mature",
        ],
        Gender::Male => [
            "muscle", "bigcock", "bear", "uncut", "twink", "daddy", "latino", "cum", "bbc", "fit",
        ],
        Gender::Couple => [
            "anal", "threesome", "young", "bbw", "interracial", "latina", "bisexual", "feet",
            "smoke", "lesbian",
        ],
        Gender::Trans => [
            "bigcock", "asian", "latina", "cum", "anal", "bigass", "slim", "ebony", "mistress",
            "new",
        ],
    }
}

/// Popular tags offered by the tag filter.
///
/// Without a gender the per-gender lists are merged in f, m, c, t order,
/// deduplicated keeping first occurrences, and cut to ten.
pub fn popular_tags(gender: Option<Gender>) -> Vec<&'static str> {
    if let Some(gender) = gender {
        return curated_tags(gender).to_vec();
    }

    let mut merged: Vec<&'static str> = Vec::with_capacity(MERGED_TAG_COUNT);
    for tag in Gender::ALL.into_iter().flat_map(curated_tags) {
        if merged.len() == MERGED_TAG_COUNT {
            break;
        }
        if !merged.contains(&tag) {
            merged.push(tag);
        }
    }
    merged
}

pub fn is_age_tag(tag: &str) -> bool {
    AGE_TAGS.contains(&tag)
}
