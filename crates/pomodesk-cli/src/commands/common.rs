use std::error::Error;

use pomodesk_core::audio;
use pomodesk_core::clock;
use pomodesk_core::{Config, Desk, Event, Store};

/// Rebuild the desk from the store, reconciling any wall-clock gap since
/// the last save. Catch-up events are returned for logging; they already
/// happened, so callers should not ring cues for them.
pub fn open_desk(store: &Store) -> (Desk, Vec<Event>) {
    let settings = store.load_settings();
    let tasks = store.load_tasks();
    let stats = store.load_stats();

    let (desk, caught_up) = match store.load_session() {
        Some(session) => Desk::restore(
            settings,
            tasks,
            stats,
            session,
            clock::today(),
            clock::epoch_secs(),
        ),
        None => (Desk::new(settings, tasks, stats, clock::today()), vec![]),
    };

    if std::env::var("POMODESK_DEBUG").is_ok() {
        for event in &caught_up {
            eprintln!("catch-up: {}", event.kind());
        }
    }

    (desk, caught_up)
}

/// Persist every record the desk owns plus a session snapshot, so the
/// next invocation restores exactly this state.
pub fn save_desk(store: &Store, desk: &Desk) -> Result<(), Box<dyn Error>> {
    store.save_settings(desk.settings())?;
    store.save_tasks(desk.tasks())?;
    store.save_stats(desk.stats())?;
    store.save_session(&desk.snapshot(clock::epoch_secs()))?;
    Ok(())
}

/// Print events as pretty JSON when any were emitted.
pub fn print_events(events: &[Event]) -> Result<(), Box<dyn Error>> {
    if !events.is_empty() {
        println!("{}", serde_json::to_string_pretty(events)?);
    }
    Ok(())
}

/// Ring the cue (if any) for events produced by the command itself, then
/// wait out the playback thread; the wait is bounded by the audio cap.
pub fn play_cues(events: &[Event]) {
    if events.is_empty() {
        return;
    }
    let config = Config::load_or_default();
    if let Some(handle) = audio::play_events(events, &config.sound_prefs()) {
        let _ = handle.join();
    }
}
