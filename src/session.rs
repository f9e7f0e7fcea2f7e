use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::PlaybackConfig;
use crate::error::Result;
use crate::language::LanguageMode;
use crate::playback::{PlaybackController, VideoPlayer};
use crate::workflow::{SignWorkflow, TranslationOutcome};

/// Hands out increasing request ids and remembers the newest one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == id
    }

    /// Make every id issued so far stale.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// What the surrounding UI should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Pending,
    Ready,
    /// The request succeeded but no word has a sign.
    NoSigns,
    Failed(String),
}

/// A translation request detached from the session so it can run elsewhere.
pub struct PendingTranslation {
    id: u64,
    text: String,
    mode: LanguageMode,
    workflow: Arc<SignWorkflow>,
}

impl PendingTranslation {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn run(self) -> CompletedTranslation {
        let result = self.workflow.translate(&self.text, self.mode).await;
        CompletedTranslation {
            id: self.id,
            result,
        }
    }
}

pub struct CompletedTranslation {
    id: u64,
    result: Result<TranslationOutcome>,
}

impl CompletedTranslation {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Translation and playback state for one user.
pub struct SignSession {
    workflow: Arc<SignWorkflow>,
    player: Arc<dyn VideoPlayer>,
    playback_config: PlaybackConfig,
    sequencer: RequestSequencer,
    mode: LanguageMode,
    status: ViewStatus,
    outcome: Option<TranslationOutcome>,
    playback: Option<PlaybackController>,
}

impl SignSession {
    pub fn new(
        workflow: Arc<SignWorkflow>,
        player: Arc<dyn VideoPlayer>,
        playback_config: PlaybackConfig,
        mode: LanguageMode,
    ) -> Self {
        Self {
            workflow,
            player,
            playback_config,
            sequencer: RequestSequencer::new(),
            mode,
            status: ViewStatus::Idle,
            outcome: None,
            playback: None,
        }
    }

    pub fn mode(&self) -> LanguageMode {
        self.mode
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// The latest successful result, kept across later failures.
    pub fn outcome(&self) -> Option<&TranslationOutcome> {
        self.outcome.as_ref()
    }

    pub fn playback(&self) -> Option<&PlaybackController> {
        self.playback.as_ref()
    }

    pub fn playback_mut(&mut self) -> Option<&mut PlaybackController> {
        self.playback.as_mut()
    }

    /// Start a request. Any request started earlier becomes stale.
    pub fn prepare(&mut self, text: &str) -> PendingTranslation {
        let id = self.sequencer.issue();
        self.status = ViewStatus::Pending;
        debug!("Prepared translation request {}", id);
        PendingTranslation {
            id,
            text: text.to_string(),
            mode: self.mode,
            workflow: Arc::clone(&self.workflow),
        }
    }

    /// Apply a finished request. Returns false when it was stale and dropped.
    pub fn apply(&mut self, completed: CompletedTranslation) -> bool {
        if !self.sequencer.is_current(completed.id) {
            debug!("Discarding stale translation result {}", completed.id);
            return false;
        }

        match completed.result {
            Ok(outcome) => {
                self.stop_playback();
                self.status = if outcome.has_signs() {
                    ViewStatus::Ready
                } else {
                    ViewStatus::NoSigns
                };
                self.playback = Some(PlaybackController::new(
                    outcome.playlist.clone(),
                    outcome.tokens.clone(),
                    Arc::clone(&self.player),
                    &self.playback_config,
                ));
                self.outcome = Some(outcome);
            }
            Err(e) => {
                warn!("Translation request {} failed: {}", completed.id, e);
                self.status = ViewStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Translate and apply in one step.
    pub async fn submit(&mut self, text: &str) -> &ViewStatus {
        let completed = self.prepare(text).run().await;
        self.apply(completed);
        &self.status
    }

    /// Switch language. Clears all derived state and cancels playback.
    pub fn set_mode(&mut self, mode: LanguageMode) {
        if mode == self.mode {
            return;
        }
        info!("Switching language mode from {} to {}", self.mode, mode);
        self.mode = mode;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.sequencer.invalidate();
        self.stop_playback();
        self.playback = None;
        self.outcome = None;
        self.status = ViewStatus::Idle;
    }

    fn stop_playback(&mut self) {
        if let Some(controller) = self.playback.as_mut() {
            controller.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::SignBridgeError;
    use crate::translate::{SourceText, Translator};
    use crate::playback::{DryRunPlayer, PlaybackPhase};
    use crate::signs::{SignCatalog, SignResource};
    use std::time::Duration;

    fn session() -> SignSession {
        let mut catalog = SignCatalog::new();
        for word in ["hello", "how", "are", "you", "thank"] {
            catalog.insert(word, SignResource::new(format!("https://signs.example/{}.mp4", word)));
        }
        let workflow = Arc::new(SignWorkflow::new(&Config::default(), Arc::new(catalog)));
        let player: Arc<dyn VideoPlayer> = Arc::new(DryRunPlayer::new(Duration::from_millis(50)));
        SignSession::new(workflow, player, PlaybackConfig::default(), LanguageMode::Sinhala)
    }

    #[test]
    fn test_sequencer() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        sequencer.invalidate();
        assert!(!sequencer.is_current(second));
    }

    #[tokio::test]
    async fn test_submit_builds_playback() {
        let mut session = session();
        assert_eq!(session.submit("ayubowan kohomada").await, &ViewStatus::Ready);
        let playback = session.playback().unwrap();
        assert_eq!(playback.playlist().len(), 4);
        assert_eq!(playback.state().phase, PlaybackPhase::Idle);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let mut session = session();
        let older = session.prepare("ayubowan");
        let newer = session.prepare("kohomada");

        let newer_done = newer.run().await;
        let older_done = older.run().await;
        assert!(session.apply(newer_done));
        assert!(!session.apply(older_done));

        assert_eq!(session.outcome().unwrap().input_text, "kohomada");
    }

    #[tokio::test]
    async fn test_no_signs_is_distinct_from_failure() {
        let mut session = session();
        assert_eq!(session.submit("wathura").await, &ViewStatus::NoSigns);
        assert!(session.outcome().is_some());
    }

    struct UnreachableTranslator;

    #[async_trait::async_trait]
    impl Translator for UnreachableTranslator {
        async fn translate(&self, _source: &SourceText) -> Result<String> {
            Err(SignBridgeError::Translation("service unreachable".to_string()))
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_outcome() {
        let mut session = session();
        session.submit("ayubowan").await;
        let previous = session.outcome().cloned();

        let failing = SignWorkflow::new(&Config::default(), Arc::new(SignCatalog::new()))
            .with_translator(Arc::new(UnreachableTranslator));
        session.workflow = Arc::new(failing);

        let status = session.submit("kohomada").await.clone();
        assert!(matches!(status, ViewStatus::Failed(ref message) if message.contains("unreachable")));
        assert_eq!(session.outcome().cloned(), previous);
        assert!(session.playback().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_toggle_clears_state_and_stales_requests() {
        let mut session = session();
        session.submit("ayubowan").await;
        session.playback_mut().unwrap().start();

        let pending = session.prepare("kohomada");
        session.set_mode(LanguageMode::Tamil);
        assert_eq!(session.status(), &ViewStatus::Idle);
        assert!(session.outcome().is_none());
        assert!(session.playback().is_none());

        assert!(!session.apply(pending.run().await));
        assert!(session.outcome().is_none());
    }
}
