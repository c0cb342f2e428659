//! Audio cues.
//!
//! Playback shells out to whatever player the host has (`paplay`, `aplay`,
//! `afplay`) on a background thread; a missing player or sound file never
//! fails a desk operation. Every cue is killed after [`PLAYBACK_CAP_SECS`],
//! which also bounds how long a caller joining the playback thread waits.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::events::Event;

/// Hard upper bound on cue playback, in seconds.
pub const PLAYBACK_CAP_SECS: u64 = 5;

/// The three cue kinds the desk can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Interval ran out.
    Alarm,
    /// A task was marked done.
    Success,
    /// In-progress work was discarded.
    Fail,
}

/// Per-cue overrides plus a global kill switch, sourced from the config
/// file's `[sounds]` table.
#[derive(Debug, Clone)]
pub struct SoundPrefs {
    pub enabled: bool,
    pub alarm: Option<PathBuf>,
    pub success: Option<PathBuf>,
    pub fail: Option<PathBuf>,
}

impl Default for SoundPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            alarm: None,
            success: None,
            fail: None,
        }
    }
}

impl SoundPrefs {
    fn override_for(&self, cue: Cue) -> Option<&Path> {
        match cue {
            Cue::Alarm => self.alarm.as_deref(),
            Cue::Success => self.success.as_deref(),
            Cue::Fail => self.fail.as_deref(),
        }
    }
}

/// Maps a desk event to the cue it should trigger, if any.
pub fn cue_for(event: &Event) -> Option<Cue> {
    match event {
        Event::TimerCompleted { .. } => Some(Cue::Alarm),
        Event::TaskCompleted { .. } => Some(Cue::Success),
        Event::TimerReset {
            progress_lost: true,
            ..
        } => Some(Cue::Fail),
        _ => None,
    }
}

/// Plays the first cue mapped by `events`, if any. At most one sound per
/// batch; a focus completion emits several events but rings once. Hands
/// back the capping thread; see [`play`].
pub fn play_events(events: &[Event], prefs: &SoundPrefs) -> Option<JoinHandle<()>> {
    events.iter().find_map(cue_for).and_then(|cue| play(cue, prefs))
}

/// Capped playback on a background thread.
///
/// The returned thread owns the kill at [`PLAYBACK_CAP_SECS`]; a caller
/// that exits without joining it leaves the player running past the cap.
/// The join itself never takes longer than the cap.
pub fn play(cue: Cue, prefs: &SoundPrefs) -> Option<JoinHandle<()>> {
    if !prefs.enabled {
        return None;
    }
    let candidates = candidates_for(cue, prefs);
    Some(std::thread::spawn(move || {
        for (player, file) in &candidates {
            if !Path::new(file).exists() {
                continue;
            }
            let child = Command::new(player)
                .arg(file)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let Ok(mut child) = child else { continue };
            cap_playback(&mut child, Duration::from_secs(PLAYBACK_CAP_SECS));
            break;
        }
    }))
}

/// Waits for the child up to `cap`, then kills it.
fn cap_playback(child: &mut std::process::Child, cap: Duration) {
    let deadline = Instant::now() + cap;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return;
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(100)),
            Err(_) => return,
        }
    }
}

/// Ordered (player, file) pairs to try. A configured override comes first,
/// attempted with each known player; stock desktop theme sounds follow.
fn candidates_for(cue: Cue, prefs: &SoundPrefs) -> Vec<(String, String)> {
    const PLAYERS: [&str; 3] = ["paplay", "aplay", "afplay"];
    let mut out = Vec::new();
    if let Some(path) = prefs.override_for(cue) {
        let path = path.to_string_lossy().into_owned();
        for player in PLAYERS {
            out.push((player.to_string(), path.clone()));
        }
    }
    let stock: &[(&str, &str)] = match cue {
        Cue::Alarm => &[
            (
                "paplay",
                "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga",
            ),
            (
                "paplay",
                "/usr/share/sounds/freedesktop/stereo/complete.oga",
            ),
            ("aplay", "/usr/share/sounds/sound-icons/prompt.wav"),
            ("afplay", "/System/Library/Sounds/Glass.aiff"),
        ],
        Cue::Success => &[
            (
                "paplay",
                "/usr/share/sounds/freedesktop/stereo/complete.oga",
            ),
            ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
            ("afplay", "/System/Library/Sounds/Hero.aiff"),
        ],
        Cue::Fail => &[
            (
                "paplay",
                "/usr/share/sounds/freedesktop/stereo/dialog-error.oga",
            ),
            ("aplay", "/usr/share/sounds/sound-icons/cembalo-2.wav"),
            ("afplay", "/System/Library/Sounds/Basso.aiff"),
        ],
    };
    for (player, file) in stock {
        out.push((player.to_string(), file.to_string()));
    }
    out
}
