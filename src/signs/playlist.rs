use serde::{Deserialize, Serialize};

use super::SignToken;

/// A playable entry and the token it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub uri: String,
    pub token_index: usize,
}

/// Ordered playable resources: a subsequence of the token list keeping
/// only tokens with a resolved sign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn uris(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.uri.as_str()).collect()
    }
}

pub fn build_playlist(tokens: &[SignToken]) -> Playlist {
    let entries = tokens
        .iter()
        .enumerate()
        .filter_map(|(token_index, token)| {
            token.resource().map(|resource| PlaylistEntry {
                uri: resource.uri.clone(),
                token_index,
            })
        })
        .collect();
    Playlist { entries }
}
