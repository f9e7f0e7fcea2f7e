use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{SignLookup, SignResource};
use crate::config::SignConfig;
use crate::error::{Result, SignBridgeError};
use crate::text::sign_key;

/// In-memory word-to-video map, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct SignCatalog {
    entries: HashMap<String, SignResource>,
}

impl SignCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog from whichever sources the configuration names.
    /// Manifest entries override directory entries with the same key.
    pub fn from_config(config: &SignConfig) -> Result<Self> {
        let mut catalog = Self::new();
        if let Some(dir) = &config.catalog_dir {
            catalog.merge(Self::from_directory(dir, &config.video_extensions)?);
        }
        if let Some(manifest) = &config.manifest {
            catalog.merge(Self::from_manifest(manifest)?);
        }
        if catalog.is_empty() {
            warn!("Sign catalog is empty; every word will be reported as missing");
        }
        Ok(catalog)
    }

    /// Scans `dir` recursively for video files. The file stem is the word,
    /// with `_` or `-` standing for spaces (`thank_you.mp4`).
    pub fn from_directory<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SignBridgeError::Catalog(format!(
                "Sign directory not found: {}",
                dir.display()
            )));
        }

        let mut catalog = Self::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !extensions.iter().any(|ext| ext.eq_ignore_ascii_case(extension)) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = sign_key(stem);
            if key.is_empty() {
                continue;
            }
            if let Some(previous) = catalog.insert(&key, SignResource::new(path.display().to_string())) {
                debug!("Duplicate sign for '{}', replacing {}", key, previous.uri);
            }
        }

        info!("Loaded {} signs from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Loads a JSON object of `word -> uri`. Relative paths resolve against
    /// the manifest's directory; URLs are kept as given.
    pub fn from_manifest<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SignBridgeError::Catalog(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut catalog = Self::new();
        for (word, uri) in raw {
            let uri = if uri.contains("://") || Path::new(&uri).is_absolute() {
                uri
            } else {
                base.join(&uri).display().to_string()
            };
            catalog.insert(&word, SignResource::new(uri));
        }

        info!("Loaded {} signs from manifest {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Adds or replaces a sign, returning the one it replaced.
    pub fn insert(&mut self, word: &str, resource: SignResource) -> Option<SignResource> {
        self.entries.insert(sign_key(word), resource)
    }

    pub fn merge(&mut self, other: SignCatalog) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog keys, sorted.
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl SignLookup for SignCatalog {
    fn lookup(&self, word: &str) -> Option<SignResource> {
        self.entries.get(&sign_key(word)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_punctuation_insensitive() {
        let mut catalog = SignCatalog::new();
        catalog.insert("Thank you", SignResource::new("thank_you.mp4"));
        catalog.insert("hello", SignResource::new("hello.mp4"));

        assert_eq!(catalog.lookup("HELLO!").unwrap().uri, "hello.mp4");
        assert_eq!(catalog.lookup("thank  YOU").unwrap().uri, "thank_you.mp4");
        assert!(catalog.lookup("goodbye").is_none());
        assert_eq!(catalog.words(), vec!["hello", "thank_you"]);
    }

    #[test]
    fn test_underscored_word_matches_spaced_lookup() {
        let mut catalog = SignCatalog::new();
        catalog.insert("thank_you", SignResource::new("thank_you.mp4"));

        assert_eq!(catalog.words(), vec!["thank_you"]);
        assert!(catalog.lookup("thank you").is_some());
        assert!(catalog.lookup("Thank_You").is_some());
        assert!(catalog.lookup("thankyou").is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let mut first = SignCatalog::new();
        first.insert("hello", SignResource::new("a.mp4"));
        let mut second = SignCatalog::new();
        second.insert("hello", SignResource::new("b.mp4"));
        first.merge(second);
        assert_eq!(first.lookup("hello").unwrap().uri, "b.mp4");
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = SignCatalog::from_directory("/definitely/not/here", &["mp4".to_string()]);
        assert!(matches!(err, Err(SignBridgeError::Catalog(_))));
    }
}
