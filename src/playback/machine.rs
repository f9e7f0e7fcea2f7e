use tracing::debug;

use super::{PlaybackErrorKind, PlaybackPhase, PlaybackState};

/// Side effect the driver must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Abort the in-flight load and any pending retry timer.
    CancelPending,
    /// Load and play the playlist item at this index.
    Load(usize),
    /// Arm the single-shot retry timer for the current index.
    ScheduleRetry,
    PausePlayer,
    ResumePlayer,
}

/// Playback state machine over a playlist of `len` items.
///
/// `current_index` only moves forward on its own; `reset` and `skip_prev`
/// are the user commands that move it back. `retry_count` belongs to the
/// current index and is cleared whenever the index changes.
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    len: usize,
    max_retries: u32,
    phase: PlaybackPhase,
    current_index: usize,
    retry_count: u32,
    last_error: Option<PlaybackErrorKind>,
    finished_while_paused: bool,
}

impl PlaybackMachine {
    pub fn new(len: usize, max_retries: u32) -> Self {
        Self {
            len,
            max_retries,
            phase: PlaybackPhase::Idle,
            current_index: 0,
            retry_count: 0,
            last_error: None,
            finished_while_paused: false,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Paused after the current clip already ended; nothing happens until `resume`.
    pub fn is_waiting_for_resume(&self) -> bool {
        self.phase == PlaybackPhase::Paused && self.finished_while_paused
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            phase: self.phase,
            current_index: self.current_index,
            is_playing: matches!(
                self.phase,
                PlaybackPhase::Loading | PlaybackPhase::Playing | PlaybackPhase::Error
            ),
            retry_count: self.retry_count,
            last_error: self.last_error,
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        match self.phase {
            PlaybackPhase::Idle => self.begin(),
            PlaybackPhase::Complete => {
                let mut effects = self.reset();
                effects.extend(self.begin());
                effects
            }
            _ => Vec::new(),
        }
    }

    fn begin(&mut self) -> Vec<Effect> {
        if self.len == 0 {
            self.phase = PlaybackPhase::Complete;
            return Vec::new();
        }
        self.phase = PlaybackPhase::Loading;
        vec![Effect::Load(self.current_index)]
    }

    pub fn loaded(&mut self) -> Vec<Effect> {
        if self.phase == PlaybackPhase::Loading {
            self.phase = PlaybackPhase::Playing;
        }
        Vec::new()
    }

    pub fn finished(&mut self) -> Vec<Effect> {
        match self.phase {
            PlaybackPhase::Playing => self.advance(),
            PlaybackPhase::Paused => {
                self.finished_while_paused = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn failed(&mut self, kind: PlaybackErrorKind) -> Vec<Effect> {
        if !matches!(
            self.phase,
            PlaybackPhase::Loading | PlaybackPhase::Playing | PlaybackPhase::Paused
        ) {
            return Vec::new();
        }

        self.phase = PlaybackPhase::Error;
        self.last_error = Some(kind);

        if kind.is_permanent() || self.retry_count >= self.max_retries {
            debug!(
                "Skipping item {} after {} retries ({})",
                self.current_index, self.retry_count, kind
            );
            return self.advance();
        }
        vec![Effect::ScheduleRetry]
    }

    pub fn retry_elapsed(&mut self) -> Vec<Effect> {
        if self.phase != PlaybackPhase::Error {
            return Vec::new();
        }
        self.retry_count += 1;
        self.phase = PlaybackPhase::Loading;
        vec![Effect::Load(self.current_index)]
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        if self.phase != PlaybackPhase::Playing {
            return Vec::new();
        }
        self.phase = PlaybackPhase::Paused;
        vec![Effect::PausePlayer]
    }

    pub fn resume(&mut self) -> Vec<Effect> {
        if self.phase != PlaybackPhase::Paused {
            return Vec::new();
        }
        self.phase = PlaybackPhase::Playing;
        if std::mem::take(&mut self.finished_while_paused) {
            return self.advance();
        }
        vec![Effect::ResumePlayer]
    }

    pub fn reset(&mut self) -> Vec<Effect> {
        self.phase = PlaybackPhase::Idle;
        self.current_index = 0;
        self.retry_count = 0;
        self.last_error = None;
        self.finished_while_paused = false;
        vec![Effect::CancelPending]
    }

    pub fn skip_next(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        self.finished_while_paused = false;
        let mut effects = vec![Effect::CancelPending];
        effects.extend(self.advance());
        effects
    }

    pub fn skip_prev(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        self.finished_while_paused = false;
        self.move_to(self.current_index.saturating_sub(1));
        vec![Effect::CancelPending, Effect::Load(self.current_index)]
    }

    fn is_active(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::Loading | PlaybackPhase::Playing | PlaybackPhase::Paused | PlaybackPhase::Error
        )
    }

    fn move_to(&mut self, index: usize) {
        self.current_index = index;
        self.retry_count = 0;
        self.phase = PlaybackPhase::Loading;
    }

    fn advance(&mut self) -> Vec<Effect> {
        if self.current_index + 1 < self.len {
            self.move_to(self.current_index + 1);
            vec![Effect::Load(self.current_index)]
        } else {
            self.retry_count = 0;
            self.phase = PlaybackPhase::Complete;
            Vec::new()
        }
    }
}
