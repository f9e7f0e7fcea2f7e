// Sign tokens and the lookups that resolve them
//
// - Catalog: word-to-video map built from a directory scan or a JSON manifest
// - Classifier: turns a filtered gloss into word, letter and name-marker tokens
// - Playlist: ordered playable resources projected from the tokens

pub mod catalog;
pub mod classifier;
pub mod playlist;

use serde::{Deserialize, Serialize};

pub use catalog::SignCatalog;
pub use classifier::{classify, TokenClassifier};
pub use playlist::{build_playlist, Playlist, PlaylistEntry};

/// A playable sign video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignResource {
    pub uri: String,
}

impl SignResource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Outcome of resolving a token against a [`SignLookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignMatch {
    Found(SignResource),
    NotFound,
    /// Name markers are display-only and never looked up.
    NotLookedUp,
}

impl SignMatch {
    pub fn resource(&self) -> Option<&SignResource> {
        match self {
            Self::Found(resource) => Some(resource),
            _ => None,
        }
    }
}

impl From<Option<SignResource>> for SignMatch {
    fn from(resource: Option<SignResource>) -> Self {
        resource.map_or(Self::NotFound, Self::Found)
    }
}

/// Where a fingerspelled letter sits inside its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterPosition {
    pub group_id: u32,
    pub position: usize,
    pub group_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenRole {
    Word,
    Letter(LetterPosition),
    NameStart { group_id: u32 },
    NameEnd { group_id: u32 },
}

/// One classified unit of translated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignToken {
    /// Display text: the word, the letter, or the full name for markers.
    pub word: String,
    pub sign: SignMatch,
    pub role: TokenRole,
}

impl SignToken {
    pub fn resource(&self) -> Option<&SignResource> {
        self.sign.resource()
    }

    pub fn is_not_found(&self) -> bool {
        self.sign == SignMatch::NotFound
    }

    pub fn group_id(&self) -> Option<u32> {
        match self.role {
            TokenRole::Word => None,
            TokenRole::Letter(letter) => Some(letter.group_id),
            TokenRole::NameStart { group_id } | TokenRole::NameEnd { group_id } => Some(group_id),
        }
    }
}

/// Maps a word or single letter to its sign video.
///
/// Implementations compare case-insensitively on the normalized key (see
/// [`crate::text::sign_key`]).
pub trait SignLookup: Send + Sync {
    fn lookup(&self, word: &str) -> Option<SignResource>;
}

impl<F> SignLookup for F
where
    F: Fn(&str) -> Option<SignResource> + Send + Sync,
{
    fn lookup(&self, word: &str) -> Option<SignResource> {
        self(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_match_from_option() {
        let found: SignMatch = Some(SignResource::new("a.mp4")).into();
        assert_eq!(found.resource().map(|r| r.uri.as_str()), Some("a.mp4"));
        assert_eq!(SignMatch::from(None), SignMatch::NotFound);
        assert!(SignMatch::NotLookedUp.resource().is_none());
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |word: &str| (word == "hello").then(|| SignResource::new("hello.mp4"));
        assert!(lookup.lookup("hello").is_some());
        assert!(lookup.lookup("bye").is_none());
    }
}
