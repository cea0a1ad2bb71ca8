//! Artifact key grammar and storyboard grouping.
//!
//! The remote pipeline writes every artifact it produces into object storage
//! under `{user_id}/{project_id}/`, using a fixed filename grammar:
//!
//! - `chapter{N}_{M}_image{K}.jpg`           current image for a slot
//! - `chapter{N}_{M}_image{K}_sbsave{V}.jpg` saved alternate image version
//! - `chapter{N}_{M}_image{K}.jpgoldset`     retired image set
//! - `chapter{N}_{M}_audio{K}.mp3`           narration audio
//! - `chapter{N}_{M}_audio{K}_sbsave.mp3`    alternate narration track
//! - `chapter{N}_{M}_chunk{K}.txt`           source text chunk
//!
//! `N` is the chapter, `M` the chunk within the chapter, `K` the slot index
//! within the chunk. Keys that do not match the grammar are skipped; the
//! pipeline also writes logs and scratch files under the same prefix and
//! those must never surface in a storyboard.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::types::DbId;

/// Status document filename, stored directly under the project prefix.
pub const STATUS_DOC: &str = "project_status.json";

/// Pronunciation corrections filename, stored under the project prefix.
pub const CORRECTIONS_DOC: &str = "pronunciation-corrections.json";

/// Object-storage prefix for all of a project's artifacts.
pub fn project_prefix(user_id: &str, project_id: DbId) -> String {
    format!("{user_id}/{project_id}/")
}

/// Full key of a project's status document.
pub fn status_key(user_id: &str, project_id: DbId) -> String {
    format!("{}{STATUS_DOC}", project_prefix(user_id, project_id))
}

/// Full key of a project's pronunciation corrections document.
pub fn corrections_key(user_id: &str, project_id: DbId) -> String {
    format!("{}{CORRECTIONS_DOC}", project_prefix(user_id, project_id))
}

/// A storage key parsed against the artifact grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedArtifact {
    Image {
        chapter: u32,
        chunk: u32,
        index: u32,
        variant: ImageVariant,
    },
    Audio {
        chapter: u32,
        chunk: u32,
        index: u32,
        alternate: bool,
    },
    Text {
        chapter: u32,
        chunk: u32,
        index: u32,
    },
}

/// Which role an image key plays within its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    /// `chapter{N}_{M}_image{K}.jpg`
    Current,
    /// `chapter{N}_{M}_image{K}_sbsave{V}.jpg`
    Saved(u32),
    /// `chapter{N}_{M}_image{K}.jpgoldset`
    Retired,
}

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^chapter(\d+)_(\d+)_image(\d+)(?:_sbsave(\d+))?\.(jpg|jpgoldset)$")
            .expect("image regex")
    })
}

fn audio_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^chapter(\d+)_(\d+)_audio(\d+)(_sbsave)?\.mp3$").expect("audio regex")
    })
}

fn text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^chapter(\d+)_(\d+)_chunk(\d+)\.txt$").expect("text regex"))
}

/// Parse a storage key against the artifact grammar.
///
/// Classification looks only at the final path segment, so keys may carry
/// any prefix (`{user}/{project}/...`). Returns `None` for keys that do not
/// match; callers are expected to skip those silently.
pub fn parse_key(key: &str) -> Option<ParsedArtifact> {
    let name = key.rsplit('/').next().unwrap_or(key);

    if let Some(caps) = image_re().captures(name) {
        // An `_sbsave` suffix on a `.jpgoldset` key is outside the grammar.
        let extension = caps.get(5).map(|m| m.as_str())?;
        let saved = caps.get(4);
        let variant = match (extension, saved) {
            ("jpg", None) => ImageVariant::Current,
            ("jpg", Some(v)) => ImageVariant::Saved(v.as_str().parse().ok()?),
            ("jpgoldset", None) => ImageVariant::Retired,
            _ => return None,
        };
        return Some(ParsedArtifact::Image {
            chapter: caps[1].parse().ok()?,
            chunk: caps[2].parse().ok()?,
            index: caps[3].parse().ok()?,
            variant,
        });
    }

    if let Some(caps) = audio_re().captures(name) {
        return Some(ParsedArtifact::Audio {
            chapter: caps[1].parse().ok()?,
            chunk: caps[2].parse().ok()?,
            index: caps[3].parse().ok()?,
            alternate: caps.get(4).is_some(),
        });
    }

    if let Some(caps) = text_re().captures(name) {
        return Some(ParsedArtifact::Text {
            chapter: caps[1].parse().ok()?,
            chunk: caps[2].parse().ok()?,
            index: caps[3].parse().ok()?,
        });
    }

    None
}

/// A saved image version within a slot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SavedImage {
    pub version: u32,
    pub key: String,
}

/// One image slot: the current key plus its saved and retired history.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImageSlot {
    pub index: u32,
    pub current: Option<String>,
    pub saved: Vec<SavedImage>,
    pub retired: Vec<String>,
}

/// One narration slot: the current track plus its alternate, if any.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AudioSlot {
    pub index: u32,
    pub current: Option<String>,
    pub alternate: Option<String>,
}

/// One text slot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextSlot {
    pub index: u32,
    pub key: String,
}

/// All artifacts for one chapter-chunk, the unit a storyboard renders.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoryboardItem {
    pub chapter: u32,
    pub chunk: u32,
    pub images: Vec<ImageSlot>,
    pub audio: Vec<AudioSlot>,
    pub text: Vec<TextSlot>,
}

/// Group a flat key listing into ordered per-chapter-chunk storyboard items.
///
/// Keys outside the grammar are ignored. Items are ordered by
/// `(chapter, chunk)`; slots within an item by index; saved image versions
/// by version number.
pub fn group_keys<I, S>(keys: I) -> Vec<StoryboardItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    #[derive(Default)]
    struct Slots {
        images: BTreeMap<u32, ImageSlot>,
        audio: BTreeMap<u32, AudioSlot>,
        text: BTreeMap<u32, String>,
    }

    let mut groups: BTreeMap<(u32, u32), Slots> = BTreeMap::new();

    for key in keys {
        let key = key.as_ref();
        let Some(parsed) = parse_key(key) else {
            continue;
        };

        match parsed {
            ParsedArtifact::Image {
                chapter,
                chunk,
                index,
                variant,
            } => {
                let slot = groups
                    .entry((chapter, chunk))
                    .or_default()
                    .images
                    .entry(index)
                    .or_insert_with(|| ImageSlot {
                        index,
                        ..Default::default()
                    });
                match variant {
                    ImageVariant::Current => slot.current = Some(key.to_string()),
                    ImageVariant::Saved(version) => slot.saved.push(SavedImage {
                        version,
                        key: key.to_string(),
                    }),
                    ImageVariant::Retired => slot.retired.push(key.to_string()),
                }
            }
            ParsedArtifact::Audio {
                chapter,
                chunk,
                index,
                alternate,
            } => {
                let slot = groups
                    .entry((chapter, chunk))
                    .or_default()
                    .audio
                    .entry(index)
                    .or_insert_with(|| AudioSlot {
                        index,
                        ..Default::default()
                    });
                if alternate {
                    slot.alternate = Some(key.to_string());
                } else {
                    slot.current = Some(key.to_string());
                }
            }
            ParsedArtifact::Text {
                chapter,
                chunk,
                index,
            } => {
                groups
                    .entry((chapter, chunk))
                    .or_default()
                    .text
                    .insert(index, key.to_string());
            }
        }
    }

    groups
        .into_iter()
        .map(|((chapter, chunk), slots)| {
            let mut images: Vec<ImageSlot> = slots.images.into_values().collect();
            for slot in &mut images {
                slot.saved.sort_by_key(|s| s.version);
                slot.retired.sort();
            }
            StoryboardItem {
                chapter,
                chunk,
                images,
                audio: slots.audio.into_values().collect(),
                text: slots
                    .text
                    .into_iter()
                    .map(|(index, key)| TextSlot { index, key })
                    .collect(),
            }
        })
        .collect()
}
