use std::collections::HashMap;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::DialogueError;

/// Where the character portraits and their index are served from
pub const PORTRAIT_API: &str = "https://dlportraits.space/portrait_output/";
/// The portrait used when no character matches the request
pub const DEFAULT_PORTRAIT: &str = "100001_01";

#[derive(Debug, Deserialize)]
struct DirData {
    #[serde(rename = "fileList")]
    file_list: HashMap<String, LocalizedNames>,
}

#[derive(Debug, Deserialize)]
struct LocalizedNames {
    en_us: String,
}

/// Maps character names to their portrait id
#[derive(Debug, Clone, Default)]
pub struct PortraitIndex {
    ids: HashMap<String, String>, // English name -> portrait id
}

impl PortraitIndex {
    /// Build the index from the content of `localizedDirData.json`
    pub fn from_dir_data(json: &str) -> Result<Self, DialogueError> {
        let data: DirData = serde_json::from_str(json)?;
        Ok(PortraitIndex {
            ids: data
                .file_list
                .into_iter()
                .map(|(id, names)| (names.en_us, id))
                .collect(),
        })
    }

    /// Download the index from the portrait API
    pub async fn fetch(client: &Client, api: &str) -> Result<Self, DialogueError> {
        let url = format!("{api}localizedDirData.json");
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| DialogueError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DialogueError::Fetch(format!(
                "{url} answered {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| DialogueError::Fetch(e.to_string()))?;
        let index = Self::from_dir_data(&body)?;
        info!("Loaded {} portraits from {url}", index.len());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Find the portrait id of the character whose name is closest to `input`
    pub fn lookup(&self, input: &str) -> &str {
        if let Some((_, id)) = self
            .ids
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(input))
        {
            return id;
        }

        let matcher = SkimMatcherV2::default();
        let best = self
            .ids
            .iter()
            .filter_map(|(name, id)| {
                matcher
                    .fuzzy_match(name, input)
                    .map(|score| (score, name, id))
            })
            // Ties go to the alphabetically first name so lookups are stable
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)));

        match best {
            Some((_, name, id)) => {
                info!("Matched '{input}' to {name}");
                id
            }
            None => {
                warn!("No portrait matches '{input}', using the default one");
                DEFAULT_PORTRAIT
            }
        }
    }
}

/// The base portrait image of a character
pub fn portrait_url(id: &str) -> String {
    format!("{PORTRAIT_API}{id}/{id}_base.png")
}
