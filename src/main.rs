use chrono::{DateTime, Local};
use notify_rust::Notification;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

mod audio;
mod breaks;
mod compliments;
mod confetti;
mod config;

use audio::audio::AudioDeck;
use breaks::breaks::{BreakEvent, BreakSender, ChaiBreak, create_break_channel};
use compliments::compliments::{MessagePicker, PLACEHOLDER, REVEAL_DELAY_MS};
use confetti::confetti::{CONFETTI_LIFETIME_MS, ConfettiField};
use config::Config;

const STRIP_WIDTH: usize = 60; // Confetti strip width in terminal cells

/// Delayed presentation effects armed after each compliment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FxEvent {
    Reveal,
    ConfettiSettled,
}

type FxSender = mpsc::UnboundedSender<FxEvent>;

struct CheerSession {
    picker: MessagePicker,
    confetti: ConfettiField,
    chai: ChaiBreak,
    deck: Option<AudioDeck>,
    compliments_served: u64,
    breaks_taken: u64,
    session_start: DateTime<Local>,
    log_file: Option<String>,
    verbose: bool,
}

impl CheerSession {
    fn new(log_file: Option<String>, deck: Option<AudioDeck>, verbose: bool) -> Self {
        let now = Local::now();
        if let Some(ref path) = log_file {
            let _ = Self::log_to_file(
                path,
                &format!(
                    "=== Session started at {} ===",
                    now.format("%Y-%m-%d %H:%M:%S")
                ),
            );
        }
        Self {
            picker: MessagePicker::new(),
            confetti: ConfettiField::new(),
            chai: ChaiBreak::new(),
            deck,
            compliments_served: 0,
            breaks_taken: 0,
            session_start: now,
            log_file,
            verbose,
        }
    }

    fn log_to_file(path: &str, message: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", message)?;
        Ok(())
    }

    fn log(&self, message: &str) {
        if let Some(ref path) = self.log_file {
            let _ = Self::log_to_file(path, message);
        }
    }

    fn get_session_duration(&self) -> i64 {
        (Local::now() - self.session_start).num_seconds()
    }

    fn print_stats(&self) {
        println!("\n--- Session Statistics ---");
        println!(
            "Session duration: {} minutes",
            self.get_session_duration() / 60
        );
        println!("Compliments served: {}", self.compliments_served);
        println!("Chai breaks taken: {}", self.breaks_taken);
        println!("------------------------\n");
    }

    /// Handles one line of user input. Returns false when the session ends.
    fn handle_command(&mut self, input: &str, fx_tx: &FxSender, break_tx: &BreakSender) -> bool {
        match input {
            "" => {}
            "c" | "compliment" => self.serve_compliment(fx_tx),
            "b" | "break" => self.start_break(break_tx),
            "x" | "cancel" => self.cancel_break(),
            "p" | "play" | "pause" => self.toggle_music(),
            "m" | "music" => println!("Usage: music <file>"),
            "s" | "stats" => self.print_stats(),
            "q" | "quit" | "exit" => return false,
            other => {
                if let Some(path) = other
                    .strip_prefix("music ")
                    .or_else(|| other.strip_prefix("m "))
                {
                    self.load_music(path.trim());
                } else {
                    print_commands(self.deck.is_some());
                }
            }
        }
        true
    }

    fn serve_compliment(&mut self, fx_tx: &FxSender) {
        let line = self.picker.pick();
        self.compliments_served += 1;

        let msg = format!(
            "[{}] Compliment served: {}",
            Local::now().format("%H:%M:%S"),
            line
        );
        self.log(&msg);
        if self.verbose {
            println!("[DEBUG] {}", msg);
        }

        // Reveal on a fresh false->true edge even when a message is showing
        let tx = fx_tx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(REVEAL_DELAY_MS)).await;
            let _ = tx.send(FxEvent::Reveal);
        });
    }

    fn handle_fx(&mut self, event: FxEvent, fx_tx: &FxSender) {
        match event {
            FxEvent::Reveal => {
                self.picker.reveal();
                self.confetti.burst();
                if let Some(line) = self.picker.current() {
                    println!("\n{}", self.confetti.render_strip(STRIP_WIDTH));
                    println!("  {}\n", line);
                }
                if self.verbose {
                    if let Some(piece) = self.confetti.pieces().first() {
                        println!(
                            "[DEBUG] Confetti piece {} floats in after {:.2}s for {:.2}s",
                            piece.id, piece.delay_secs, piece.duration_secs
                        );
                    }
                }

                let tx = fx_tx.clone();
                tokio::spawn(async move {
                    sleep(Duration::from_millis(CONFETTI_LIFETIME_MS)).await;
                    let _ = tx.send(FxEvent::ConfettiSettled);
                });
            }
            FxEvent::ConfettiSettled => {
                self.confetti.clear();
                if self.verbose {
                    println!(
                        "[DEBUG] Confetti settled, field empty: {}",
                        self.confetti.is_empty()
                    );
                }
            }
        }
    }

    fn start_break(&mut self, break_tx: &BreakSender) {
        match self.chai.start() {
            Some(epoch) => {
                self.breaks_taken += 1;
                ChaiBreak::arm(epoch, break_tx.clone());

                let msg = format!(
                    "[{}] Switched to {} phase",
                    Local::now().format("%H:%M:%S"),
                    self.chai.phase().as_str()
                );
                println!("\n{} {}", self.chai.phase().emoji(), self.chai.reminder());
                self.log(&msg);

                if let Err(e) = send_notification(self.chai.reminder()) {
                    eprintln!("Failed to send notification: {}", e);
                }
            }
            None => println!("☕ Break in progress..."),
        }
    }

    fn cancel_break(&mut self) {
        if !self.chai.is_active() {
            println!("No break to cancel");
            return;
        }
        self.chai.cancel();
        let msg = format!(
            "[{}] Break cancelled, back to {} phase",
            Local::now().format("%H:%M:%S"),
            self.chai.phase().as_str()
        );
        println!("\n{} Break cancelled", self.chai.phase().emoji());
        self.log(&msg);
    }

    fn handle_break_event(&mut self, event: BreakEvent) {
        if !self.chai.apply(event) {
            if self.verbose {
                println!("[DEBUG] Ignored stale break event: {:?}", event);
            }
            return;
        }

        let msg = format!(
            "[{}] Switched to {} phase",
            Local::now().format("%H:%M:%S"),
            self.chai.phase().as_str()
        );
        self.log(&msg);

        match event {
            BreakEvent::Reminder { .. } => {
                println!("\n{} {}", self.chai.phase().emoji(), self.chai.reminder());
                if let Err(e) = send_notification(self.chai.reminder()) {
                    eprintln!("Failed to send notification: {}", e);
                }
            }
            BreakEvent::Over { .. } => {
                let message = "Break over! Hope the chai was good ☕";
                println!("\n{} {}", self.chai.phase().emoji(), message);
                if let Err(e) = send_notification(message) {
                    eprintln!("Failed to send notification: {}", e);
                }
            }
        }
    }

    fn load_music(&mut self, path: &str) {
        let Some(ref mut deck) = self.deck else {
            println!("Music is disabled");
            return;
        };
        match deck.load(Path::new(path)) {
            Ok(true) => {
                let msg = format!(
                    "[{}] Loaded music: {}",
                    Local::now().format("%H:%M:%S"),
                    path
                );
                if let Some(src) = deck.source() {
                    println!("🎵 {} (press p to play)", src.display());
                }
                self.log(&msg);
            }
            Ok(false) => {
                // Non-audio files are dropped without user-visible feedback
                let msg = format!(
                    "[{}] Ignored non-audio file: {}",
                    Local::now().format("%H:%M:%S"),
                    path
                );
                self.log(&msg);
                if self.verbose {
                    println!("[DEBUG] {}", msg);
                }
            }
            Err(e) => eprintln!("Failed to start player: {}", e),
        }
    }

    fn toggle_music(&mut self) {
        let Some(ref mut deck) = self.deck else {
            println!("Music is disabled");
            return;
        };
        if !deck.is_loaded() {
            if self.verbose {
                println!("[DEBUG] No music loaded, toggle ignored");
            }
            return;
        }
        deck.toggle();
        if deck.is_playing() {
            println!("🎵 Playing");
        } else {
            println!("🔇 Paused");
        }
    }
}

fn send_notification(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    Notification::new()
        .summary("Sip It - Chai Break")
        .body(message)
        .timeout(0) // No auto-dismiss
        .show()?;
    Ok(())
}

fn print_commands(audio_enabled: bool) {
    println!("Commands:");
    println!("  c, compliment     Show a compliment");
    println!("  b, break          Take a chai break");
    println!("  x, cancel         Cancel a running break");
    if audio_enabled {
        println!("  m, music <file>   Load background music");
        println!("  p, play           Play/pause the music");
    }
    println!("  s, stats          Session statistics");
    println!("  q, quit           Leave");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let verbose = args.contains(&"--verbose".to_string()) || args.contains(&"-v".to_string());
    let no_audio = args.contains(&"--no-audio".to_string());

    let config_path = args
        .iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|pos| args.get(pos + 1).cloned());
    let config = Config::load(config_path.as_deref());

    // Check for log file argument
    let log_file = if let Some(pos) = args.iter().position(|a| a == "--log" || a == "-l") {
        args.get(pos + 1).cloned()
    } else {
        config.log_file.clone().or_else(|| {
            Some(format!(
                "{}/.local/share/sip_it/activity.log",
                std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
            ))
        })
    };

    // Create log directory if needed
    if let Some(ref path) = log_file {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let audio_enabled = config.enable_audio && !no_audio;

    println!("☕ Sip It - Chai & Compliments");
    println!("======================================================");
    println!("A little warmth for your stressful day ☕💛");
    println!(
        "Break settings: reminder at +{}s, over at +{}s",
        breaks::breaks::REMINDER_AFTER_MS / 1000,
        breaks::breaks::BREAK_LENGTH_MS / 1000
    );
    if verbose {
        println!("Verbose mode: ON");
    }
    if let Some(ref path) = log_file {
        println!("Logging to: {}", path);
    }
    println!();
    print_commands(audio_enabled);
    println!("\n{}\n", PLACEHOLDER);

    let deck = if audio_enabled {
        Some(AudioDeck::new(&config.player_bin))
    } else {
        None
    };
    let mut session = CheerSession::new(log_file, deck, verbose);

    let (fx_tx, mut fx_rx) = mpsc::unbounded_channel();
    let (break_tx, mut break_rx) = create_break_channel();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(input) => {
                        if !session.handle_command(input.trim(), &fx_tx, &break_tx) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(event) = break_rx.recv() => session.handle_break_event(event),
            Some(event) = fx_rx.recv() => session.handle_fx(event, &fx_tx),
        }
    }

    session.print_stats();
    println!("Made with 💛 to brighten your day");
    Ok(())
}
