//! Requests for the dialogue images the `dldialogue` command produces
//!
//! A dialogue is addressed as `/{type}/{name}/{text}/result.png`, where `name`
//! and `text` are the two options of the command, and tuned with query
//! parameters (font, emotion balloon, background and portrait layers).

use std::collections::HashMap;

use reqwest::Url;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

pub mod portraits;

use portraits::{portrait_url, PortraitIndex};

/// Background used when the request doesn't provide one
pub const DEFAULT_BACKGROUND: &str = "https://dragalialost.wiki/images/b/b4/Sty_bg_0024_100_00.png";

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Invalid base URL {0}")]
    InvalidBase(String),
    #[error("Could not fetch the portrait index: {0}")]
    Fetch(String),
    #[error("Could not parse the portrait index: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How the text box is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DialogueType {
    #[default]
    Dialogue,
    Intro,
    Caption,
    Narration,
    Full,
    Book,
}

impl DialogueType {
    /// Unknown types are drawn as a regular dialogue
    pub fn from_path(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Font {
    #[default]
    En,
    Ja,
    ZhTw,
    ZhCn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Emotion {
    #[default]
    #[strum(serialize = "none")]
    Neutral,
    Anger,
    Bad,
    Exclamation,
    Heart,
    Inspiration,
    Note,
    Notice,
    Question,
    Sleep,
    Sweat,
}

/// Side of the screen the emotion balloon is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// One image drawn behind the text box
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub image: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub opacity: f64,
    pub flip_x: bool,
}

/// Query keys controlling a layer
struct LayerKeys {
    image: &'static str,
    x: &'static str,
    y: &'static str,
    rotation: &'static str,
    scale: &'static str,
    opacity: &'static str,
    flip: &'static str,
    default_y: f64,
}

const BACKGROUND_KEYS: LayerKeys = LayerKeys {
    image: "bg",
    x: "bgx",
    y: "bgy",
    rotation: "bgr",
    scale: "bgs",
    opacity: "bgo",
    flip: "bgflipx",
    default_y: 155.0,
};

const PORTRAIT_KEYS: LayerKeys = LayerKeys {
    image: "src",
    x: "x",
    y: "y",
    rotation: "r",
    scale: "s",
    opacity: "o",
    flip: "flipx",
    default_y: 120.0,
};

/// A number from the query, missing or unparsable values give `default`
fn number(query: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    query
        .get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

impl Layer {
    fn from_query(query: &HashMap<String, String>, keys: &LayerKeys, image: String) -> Self {
        Layer {
            image: query
                .get(keys.image)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or(image),
            offset_x: number(query, keys.x, 0.0),
            offset_y: number(query, keys.y, keys.default_y),
            rotation: number(query, keys.rotation, 0.0),
            scale: number(query, keys.scale, 1.0),
            opacity: number(query, keys.opacity, 1.0),
            flip_x: query.contains_key(keys.flip),
        }
    }
}

/// Text and decoration of the dialogue box
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSettings {
    pub speaker: String,
    pub text: String,
    pub kind: DialogueType,
    pub font: Font,
    pub emotion: Emotion,
    pub emotion_side: Side,
    pub emotion_offset_x: f64,
    pub emotion_offset_y: f64,
}

/// Everything needed to draw one dialogue image, layers from back to front
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueRequest {
    pub layers: Vec<Layer>,
    pub settings: DialogueSettings,
}

impl DialogueRequest {
    /// Build a request from the path segments and query of a dialogue URL
    /// Unsupported fonts and emotions fall back to `en` and `none`
    pub fn from_query(
        kind: &str,
        name: &str,
        text: &str,
        query: &HashMap<String, String>,
        portraits: &PortraitIndex,
    ) -> Self {
        let get = |key: &str| query.get(key).map(String::as_str);

        let settings = DialogueSettings {
            speaker: name.to_string(),
            text: text.to_string(),
            kind: DialogueType::from_path(kind),
            font: get("f").and_then(|f| f.parse().ok()).unwrap_or_default(),
            emotion: get("e").and_then(|e| e.parse().ok()).unwrap_or_default(),
            emotion_side: match get("es") {
                Some("r") => Side::Right,
                _ => Side::Left,
            },
            emotion_offset_x: number(query, "ex", 0.0),
            emotion_offset_y: number(query, "ey", 0.0),
        };

        let mut layers = vec![];
        if !query.contains_key("nobg") {
            layers.push(Layer::from_query(
                query,
                &BACKGROUND_KEYS,
                DEFAULT_BACKGROUND.to_string(),
            ));
        }
        let character = get("id").filter(|id| !id.is_empty()).unwrap_or(name);
        let portrait = portrait_url(portraits.lookup(character));
        layers.push(Layer::from_query(query, &PORTRAIT_KEYS, portrait));

        DialogueRequest { layers, settings }
    }
}

/// The address of a dialogue image, each part being a single path segment
pub fn dialogue_url(
    base: &str,
    kind: DialogueType,
    name: &str,
    text: &str,
) -> Result<Url, DialogueError> {
    let mut url = Url::parse(base).map_err(|_| DialogueError::InvalidBase(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| DialogueError::InvalidBase(base.to_string()))?
        .pop_if_empty()
        .extend([kind.to_string().as_str(), name, text, "result.png"]);
    Ok(url)
}
