use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::machine::{Effect, PlaybackMachine};
use super::{PlaybackPhase, PlaybackState, PlayerError, VideoPlayer};
use crate::config::PlaybackConfig;
use crate::signs::{Playlist, SignToken, TokenRole};

/// Progress through a fingerspelled name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameProgress {
    pub name: String,
    pub letter: String,
    /// 1-based
    pub position: usize,
    pub total: usize,
}

impl fmt::Display for NameProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "letter {} of {} of \"{}\"",
            self.position, self.total, self.name
        )
    }
}

/// The token behind the playlist item currently being signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSign {
    pub token_index: usize,
    pub word: String,
    pub name: Option<NameProgress>,
}

impl fmt::Display for ActiveSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(progress) => write!(f, "{} ({})", self.word, progress),
            None => f.write_str(&self.word),
        }
    }
}

/// Published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub active: Option<ActiveSign>,
}

#[derive(Debug)]
enum DriverEvent {
    Loaded,
    Finished,
    Failed(PlayerError),
    RetryElapsed,
}

/// Owns the playback state and the tasks acting on it.
///
/// Loads and retry timers run as spawned tasks that report back through a
/// channel tagged with an epoch. Cancelling bumps the epoch and aborts the
/// tasks, so an event that was already queued is discarded on arrival.
pub struct PlaybackController {
    machine: PlaybackMachine,
    playlist: Playlist,
    tokens: Vec<SignToken>,
    player: Arc<dyn VideoPlayer>,
    rate: f32,
    retry_delay: Duration,
    epoch: u64,
    load_task: Option<JoinHandle<()>>,
    retry_task: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<(u64, DriverEvent)>,
    events_rx: UnboundedReceiver<(u64, DriverEvent)>,
    subscribers: Vec<UnboundedSender<PlaybackSnapshot>>,
}

impl PlaybackController {
    pub fn new(
        playlist: Playlist,
        tokens: Vec<SignToken>,
        player: Arc<dyn VideoPlayer>,
        config: &PlaybackConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            machine: PlaybackMachine::new(playlist.len(), config.max_retries),
            playlist,
            tokens,
            player,
            rate: config.rate,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            epoch: 0,
            load_task: None,
            retry_task: None,
            events_tx,
            events_rx,
            subscribers: Vec::new(),
        }
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&mut self) -> UnboundedReceiver<PlaybackSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.state()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn tokens(&self) -> &[SignToken] {
        &self.tokens
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.machine.state(),
            active: self.active_sign(),
        }
    }

    pub fn start(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.start();
        self.transition(effects)
    }

    pub fn pause(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.pause();
        self.transition(effects)
    }

    pub fn resume(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.resume();
        self.transition(effects)
    }

    pub fn reset(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.reset();
        self.transition(effects)
    }

    pub fn skip_next(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.skip_next();
        self.transition(effects)
    }

    pub fn skip_prev(&mut self) -> PlaybackSnapshot {
        let effects = self.machine.skip_prev();
        self.transition(effects)
    }

    /// Wait for the next player or timer event and apply it.
    ///
    /// Returns `None` when nothing is pending: idle, complete, or paused
    /// after the current clip ended.
    pub async fn next_event(&mut self) -> Option<PlaybackSnapshot> {
        loop {
            let phase = self.machine.phase();
            if matches!(phase, PlaybackPhase::Idle | PlaybackPhase::Complete)
                || self.machine.is_waiting_for_resume()
            {
                return None;
            }

            let (epoch, event) = self.events_rx.recv().await?;
            if epoch != self.epoch {
                debug!("Discarding stale playback event {:?}", event);
                continue;
            }

            let effects = match event {
                DriverEvent::Loaded => self.machine.loaded(),
                DriverEvent::Finished => self.machine.finished(),
                DriverEvent::Failed(err) => {
                    warn!("Playback of item {} failed: {}", self.machine.current_index(), err);
                    self.machine.failed(err.kind)
                }
                DriverEvent::RetryElapsed => self.machine.retry_elapsed(),
            };
            return Some(self.transition(effects));
        }
    }

    /// Start and drive playback until it completes or stops.
    pub async fn run(&mut self) -> PlaybackState {
        self.start();
        while self.next_event().await.is_some() {}
        self.state()
    }

    fn transition(&mut self, effects: Vec<Effect>) -> PlaybackSnapshot {
        for effect in effects {
            self.apply(effect);
        }
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        snapshot
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CancelPending => self.cancel_pending(),
            Effect::Load(index) => self.spawn_load(index),
            Effect::ScheduleRetry => self.spawn_retry(),
            Effect::PausePlayer => self.player.pause(),
            Effect::ResumePlayer => self.player.resume(),
        }
    }

    fn cancel_pending(&mut self) {
        let had_load = self.abort_tasks();
        if had_load {
            self.player.stop();
        }
        self.epoch += 1;
    }

    fn abort_tasks(&mut self) -> bool {
        if let Some(task) = self.retry_task.take() {
            task.abort();
        }
        match self.load_task.take() {
            Some(task) => {
                let running = !task.is_finished();
                task.abort();
                running
            }
            None => false,
        }
    }

    fn spawn_load(&mut self, index: usize) {
        let Some(uri) = self.playlist.get(index).map(|entry| entry.uri.clone()) else {
            return;
        };
        self.abort_tasks();
        self.epoch += 1;

        let epoch = self.epoch;
        let rate = self.rate;
        let player = Arc::clone(&self.player);
        let tx = self.events_tx.clone();

        info!("Loading sign {}/{}: {}", index + 1, self.playlist.len(), uri);
        self.load_task = Some(tokio::spawn(async move {
            let media = match player.load(&uri, rate).await {
                Ok(media) => media,
                Err(err) => {
                    let _ = tx.send((epoch, DriverEvent::Failed(err)));
                    return;
                }
            };
            if tx.send((epoch, DriverEvent::Loaded)).is_err() {
                return;
            }
            let event = match player.play(&media).await {
                Ok(()) => DriverEvent::Finished,
                Err(err) => DriverEvent::Failed(err),
            };
            let _ = tx.send((epoch, event));
        }));
    }

    fn spawn_retry(&mut self) {
        if let Some(task) = self.retry_task.take() {
            task.abort();
        }
        let epoch = self.epoch;
        let delay = self.retry_delay;
        let tx = self.events_tx.clone();
        debug!("Retrying item {} in {:?}", self.machine.current_index(), delay);
        self.retry_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((epoch, DriverEvent::RetryElapsed));
        }));
    }

    fn active_sign(&self) -> Option<ActiveSign> {
        if self.machine.phase() == PlaybackPhase::Idle {
            return None;
        }
        let entry = self.playlist.get(self.machine.current_index())?;
        let token = self.tokens.get(entry.token_index)?;

        let name = match token.role {
            TokenRole::Letter(letter) => {
                let name = self.tokens[..entry.token_index]
                    .iter()
                    .rev()
                    .find(|t| t.role == TokenRole::NameStart { group_id: letter.group_id })
                    .map(|t| t.word.clone())
                    .unwrap_or_default();
                Some(NameProgress {
                    name,
                    letter: token.word.clone(),
                    position: letter.position + 1,
                    total: letter.group_len,
                })
            }
            _ => None,
        };

        Some(ActiveSign {
            token_index: entry.token_index,
            word: token.word.clone(),
            name,
        })
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::DryRunPlayer;
    use crate::signs::{build_playlist, classify, SignResource};

    fn lookup(word: &str) -> Option<SignResource> {
        let key = word.to_lowercase();
        (key != "sam").then(|| SignResource::new(format!("https://signs.example/{}.mp4", key)))
    }

    fn controller(text: &str) -> PlaybackController {
        let tokens = classify(text, &lookup);
        let playlist = build_playlist(&tokens);
        let player: Arc<dyn VideoPlayer> = Arc::new(DryRunPlayer::new(Duration::from_millis(100)));
        PlaybackController::new(playlist, tokens, player, &PlaybackConfig::default())
    }

    #[test]
    fn test_name_progress_display() {
        let progress = NameProgress {
            name: "JOHN".to_string(),
            letter: "O".to_string(),
            position: 2,
            total: 4,
        };
        assert_eq!(progress.to_string(), "letter 2 of 4 of \"JOHN\"");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_plays_every_item() {
        let mut controller = controller("hello friend");
        let mut updates = controller.subscribe();
        let state = controller.run().await;
        assert_eq!(state.phase, PlaybackPhase::Complete);
        assert_eq!(state.current_index, 1);

        let mut phases = Vec::new();
        while let Ok(snapshot) = updates.try_recv() {
            phases.push(snapshot.state.phase);
        }
        assert_eq!(
            phases,
            vec![
                PlaybackPhase::Loading,
                PlaybackPhase::Playing,
                PlaybackPhase::Loading,
                PlaybackPhase::Playing,
                PlaybackPhase::Complete,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_sign_reports_name_progress() {
        let mut controller = controller("hi Sam");
        controller.start();
        assert_eq!(controller.snapshot().active.unwrap().word, "hi");

        controller.next_event().await;
        controller.next_event().await;
        let active = controller.snapshot().active.unwrap();
        assert_eq!(active.word, "S");
        let progress = active.name.unwrap();
        assert_eq!(progress.name, "Sam");
        assert_eq!((progress.position, progress.total), (1, 3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_in_flight_load() {
        let mut controller = controller("hello friend");
        controller.start();
        let snapshot = controller.reset();
        assert_eq!(snapshot.state.phase, PlaybackPhase::Idle);
        assert!(snapshot.active.is_none());
        assert!(controller.next_event().await.is_none());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(controller.state().phase, PlaybackPhase::Idle);
    }
}
