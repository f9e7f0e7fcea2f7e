//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use signbridge::playback::{LoadedMedia, PlaybackErrorKind, PlayerError, VideoPlayer};
use signbridge::signs::{SignCatalog, SignResource};

/// Catalog with one `https://signs.test/<word>.mp4` entry per word.
pub fn catalog(words: &[&str]) -> SignCatalog {
    let mut catalog = SignCatalog::new();
    for word in words {
        catalog.insert(word, SignResource::new(uri(word)));
    }
    catalog
}

pub fn uri(word: &str) -> String {
    format!("https://signs.test/{}.mp4", word)
}

/// Player whose load failures are scripted per URI.
pub struct ScriptedPlayer {
    clip: Duration,
    failures: Mutex<HashMap<String, VecDeque<PlaybackErrorKind>>>,
    always_failing: HashSet<String>,
    loads: Mutex<Vec<String>>,
}

impl ScriptedPlayer {
    pub fn new(clip: Duration) -> Self {
        Self {
            clip,
            failures: Mutex::new(HashMap::new()),
            always_failing: HashSet::new(),
            loads: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next loads of `uri` with these kinds, then succeed.
    pub fn fail_then_succeed(self, uri: &str, kinds: &[PlaybackErrorKind]) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(uri.to_string(), kinds.iter().copied().collect());
        self
    }

    /// Every load of `uri` fails transiently.
    pub fn always_fail(mut self, uri: &str) -> Self {
        self.always_failing.insert(uri.to_string());
        self
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }

    pub fn load_count(&self, uri: &str) -> usize {
        self.loads().iter().filter(|loaded| loaded.as_str() == uri).count()
    }
}

#[async_trait]
impl VideoPlayer for ScriptedPlayer {
    async fn load(&self, uri: &str, rate: f32) -> Result<LoadedMedia, PlayerError> {
        self.loads.lock().unwrap().push(uri.to_string());

        let scripted = self
            .failures
            .lock()
            .unwrap()
            .get_mut(uri)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(PlaybackErrorKind::NotFound) => return Err(PlayerError::not_found(uri)),
            Some(PlaybackErrorKind::Transient) => return Err(PlayerError::transient(uri)),
            None => {}
        }
        if self.always_failing.contains(uri) {
            return Err(PlayerError::transient(uri));
        }

        Ok(LoadedMedia {
            uri: uri.to_string(),
            location: uri.to_string(),
            rate,
        })
    }

    async fn play(&self, _media: &LoadedMedia) -> Result<(), PlayerError> {
        tokio::time::sleep(self.clip).await;
        Ok(())
    }
}
