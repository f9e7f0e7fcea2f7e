mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedPlayer;
use signbridge::config::PlaybackConfig;
use signbridge::playback::{PlaybackController, PlaybackErrorKind, PlaybackPhase, VideoPlayer};
use signbridge::signs::{build_playlist, classify};

const WORDS: [&str; 3] = ["alpha", "beta", "gamma"];

fn controller(player: Arc<ScriptedPlayer>) -> PlaybackController {
    let catalog = common::catalog(&WORDS);
    let tokens = classify(&WORDS.join(" "), &catalog);
    let playlist = build_playlist(&tokens);
    let player: Arc<dyn VideoPlayer> = player;
    PlaybackController::new(playlist, tokens, player, &PlaybackConfig::default())
}

fn clip() -> Duration {
    Duration::from_secs(1)
}

#[tokio::test(start_paused = true)]
async fn test_plays_through_to_complete() {
    let player = Arc::new(ScriptedPlayer::new(clip()));
    let mut controller = controller(player.clone());

    let state = controller.run().await;
    assert_eq!(state.phase, PlaybackPhase::Complete);
    assert!(!state.is_playing);
    assert_eq!(player.loads(), WORDS.iter().map(|w| common::uri(w)).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_retry_same_index() {
    let beta = common::uri("beta");
    let player = Arc::new(
        ScriptedPlayer::new(clip())
            .fail_then_succeed(&beta, &[PlaybackErrorKind::Transient, PlaybackErrorKind::Transient]),
    );
    let mut controller = controller(player.clone());
    let mut updates = controller.subscribe();

    let state = controller.run().await;
    assert_eq!(state.phase, PlaybackPhase::Complete);
    assert_eq!(player.load_count(&beta), 3);

    let mut beta_retries = Vec::new();
    while let Ok(snapshot) = updates.try_recv() {
        if snapshot.state.phase == PlaybackPhase::Loading && snapshot.state.current_index == 1 {
            beta_retries.push(snapshot.state.retry_count);
        }
    }
    assert_eq!(beta_retries, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_skip_to_next() {
    let beta = common::uri("beta");
    let player = Arc::new(ScriptedPlayer::new(clip()).always_fail(&beta));
    let mut controller = controller(player.clone());
    let mut updates = controller.subscribe();

    let state = controller.run().await;
    assert_eq!(state.phase, PlaybackPhase::Complete);
    assert_eq!(state.last_error, Some(PlaybackErrorKind::Transient));
    assert_eq!(player.load_count(&beta), 3);
    assert_eq!(player.load_count(&common::uri("gamma")), 1);

    let mut after_skip = None;
    while let Ok(snapshot) = updates.try_recv() {
        if snapshot.state.current_index == 2 && snapshot.state.phase == PlaybackPhase::Loading {
            after_skip = Some(snapshot.state);
            break;
        }
    }
    assert_eq!(after_skip.unwrap().retry_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_skips_without_retry() {
    let beta = common::uri("beta");
    let player = Arc::new(ScriptedPlayer::new(clip()).fail_then_succeed(&beta, &[PlaybackErrorKind::NotFound]));
    let mut controller = controller(player.clone());

    let state = controller.run().await;
    assert_eq!(state.phase, PlaybackPhase::Complete);
    assert_eq!(state.last_error, Some(PlaybackErrorKind::NotFound));
    assert_eq!(player.load_count(&beta), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_retry() {
    let beta = common::uri("beta");
    let player = Arc::new(ScriptedPlayer::new(clip()).always_fail(&beta));
    let mut controller = controller(player.clone());

    controller.start();
    while let Some(snapshot) = controller.next_event().await {
        if snapshot.state.phase == PlaybackPhase::Error {
            break;
        }
    }
    assert_eq!(player.load_count(&beta), 1);

    let snapshot = controller.reset();
    assert_eq!(snapshot.state.phase, PlaybackPhase::Idle);
    assert_eq!(snapshot.state.current_index, 0);
    assert_eq!(snapshot.state.retry_count, 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(controller.next_event().await.is_none());
    assert_eq!(player.load_count(&beta), 1);
    assert_eq!(controller.state().phase, PlaybackPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_clip_finishing_while_paused_waits_for_resume() {
    let player = Arc::new(ScriptedPlayer::new(clip()));
    let mut controller = controller(player.clone());

    controller.start();
    let playing = controller.next_event().await.unwrap();
    assert_eq!(playing.state.phase, PlaybackPhase::Playing);

    assert_eq!(controller.pause().state.phase, PlaybackPhase::Paused);
    let finished = controller.next_event().await.unwrap();
    assert_eq!(finished.state.phase, PlaybackPhase::Paused);
    assert_eq!(finished.state.current_index, 0);
    assert!(controller.next_event().await.is_none());

    let resumed = controller.resume();
    assert_eq!(resumed.state.phase, PlaybackPhase::Loading);
    assert_eq!(resumed.state.current_index, 1);

    while controller.next_event().await.is_some() {}
    assert_eq!(controller.state().phase, PlaybackPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_skip_discards_events_from_previous_item() {
    let player = Arc::new(ScriptedPlayer::new(clip()));
    let mut controller = controller(player.clone());

    controller.start();
    controller.next_event().await;
    let skipped = controller.skip_next();
    assert_eq!(skipped.state.current_index, 1);
    assert_eq!(skipped.active.unwrap().word, "beta");

    let loaded = controller.next_event().await.unwrap();
    assert_eq!(loaded.state.phase, PlaybackPhase::Playing);
    assert_eq!(loaded.state.current_index, 1);

    let back = controller.skip_prev();
    assert_eq!(back.state.current_index, 0);
    assert_eq!(back.state.phase, PlaybackPhase::Loading);

    while controller.next_event().await.is_some() {}
    assert_eq!(controller.state().phase, PlaybackPhase::Complete);
    assert_eq!(player.load_count(&common::uri("alpha")), 2);
}
