use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

pub const DEFAULT_PLAYER_BIN: &str = "mpv";
pub const PLAYER_VOLUME: u32 = 30; // Background music stays quiet

/// Maps a file extension to the media type the file declares itself as.
/// Only the declared type is inspected; the bytes never are.
pub fn declared_media_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
    .to_string()
}

pub fn is_audio_media_type(media_type: &str) -> bool {
    if let Ok(pattern) = Regex::new(r"^audio/[a-z0-9.+-]+$") {
        return pattern.is_match(media_type);
    }
    false
}

/// Background-music player. Playback is delegated to the host system's media
/// player, spawned looping at a fixed low volume and suspended until the
/// user toggles it on. Loading a new file releases the previous player
/// before spawning the next one.
#[derive(Debug)]
pub struct AudioDeck {
    player_bin: String,
    child: Option<Child>,
    source: Option<PathBuf>,
    playing: bool,
}

impl AudioDeck {
    pub fn new(player_bin: &str) -> Self {
        Self {
            player_bin: player_bin.to_string(),
            child: None,
            source: None,
            playing: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.child.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Loads an audio file for looped playback. Files whose declared media
    /// type is not audio are ignored without an error. Returns whether the
    /// file was accepted.
    pub fn load(&mut self, path: &Path) -> std::io::Result<bool> {
        if !is_audio_media_type(&declared_media_type(path)) {
            return Ok(false);
        }

        self.unload();

        let child = Command::new(&self.player_bin)
            .args(["--really-quiet", "--no-video", "--loop=inf"])
            .arg(format!("--volume={}", PLAYER_VOLUME))
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Hold playback until the user asks for it
        signal_child(&child, libc::SIGSTOP);

        self.child = Some(child);
        self.source = Some(path.to_path_buf());
        self.playing = false;
        Ok(true)
    }

    /// Flips between play and pause. No-op when nothing is loaded.
    pub fn toggle(&mut self) {
        let Some(ref child) = self.child else {
            return;
        };
        if self.playing {
            signal_child(child, libc::SIGSTOP);
        } else {
            signal_child(child, libc::SIGCONT);
        }
        self.playing = !self.playing;
    }

    fn unload(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.source = None;
        self.playing = false;
    }
}

impl Drop for AudioDeck {
    fn drop(&mut self) {
        self.unload();
    }
}

fn signal_child(child: &Child, signal: libc::c_int) {
    unsafe {
        libc::kill(child.id() as libc::pid_t, signal);
    }
}
