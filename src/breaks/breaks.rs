use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

pub const REMINDER_AFTER_MS: u64 = 15_000; // First nag, halfway through the break
pub const BREAK_LENGTH_MS: u64 = 30_000; // Full break length before auto-reset

pub const STEP_AWAY_MSG: &str = "Step away from the laptop… even superheroes need chai 💪";
pub const MISSING_YOU_MSG: &str = "Your chai must be missing you already 😅";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakPhase {
    Idle,
    Active,
    Reminding,
}

impl BreakPhase {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            BreakPhase::Idle => "IDLE",
            BreakPhase::Active => "BREAK",
            BreakPhase::Reminding => "REMINDING",
        }
    }

    pub(crate) fn emoji(&self) -> &str {
        match self {
            BreakPhase::Idle => "💻",
            BreakPhase::Active => "☕",
            BreakPhase::Reminding => "😅",
        }
    }
}

/// Timer callbacks carry the epoch they were armed under so events from a
/// finished or cancelled break land as no-ops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakEvent {
    Reminder { epoch: u64 },
    Over { epoch: u64 },
}

pub type BreakSender = mpsc::UnboundedSender<BreakEvent>;
pub type BreakReceiver = mpsc::UnboundedReceiver<BreakEvent>;

pub fn create_break_channel() -> (BreakSender, BreakReceiver) {
    mpsc::unbounded_channel()
}

/// The chai-break sequence: Idle -> Active -> Reminding -> Idle, driven
/// purely by time once started. Reminding is a sub-phase of one break's
/// lifetime, never entered or left by the user.
#[derive(Debug)]
pub struct ChaiBreak {
    phase: BreakPhase,
    reminder: String,
    epoch: u64,
}

impl ChaiBreak {
    pub fn new() -> Self {
        Self {
            phase: BreakPhase::Idle,
            reminder: String::new(),
            epoch: 0,
        }
    }

    pub fn phase(&self) -> BreakPhase {
        self.phase
    }

    pub fn reminder(&self) -> &str {
        &self.reminder
    }

    pub fn is_active(&self) -> bool {
        self.phase != BreakPhase::Idle
    }

    /// Starts a break. Only valid from Idle: re-entry while a break is
    /// running returns None and must not reset or extend the armed timers.
    pub fn start(&mut self) -> Option<u64> {
        if self.is_active() {
            return None;
        }
        self.epoch += 1;
        self.phase = BreakPhase::Active;
        self.reminder = STEP_AWAY_MSG.to_string();
        Some(self.epoch)
    }

    /// Aborts the running break and invalidates its in-flight timers.
    ///
    /// The observed behavior this reimplements had no cancellation path;
    /// adding one is a deliberate deviation (the armed callbacks still fire,
    /// but their stale epoch makes them inert).
    pub fn cancel(&mut self) {
        if !self.is_active() {
            return;
        }
        self.epoch += 1;
        self.phase = BreakPhase::Idle;
        self.reminder.clear();
    }

    /// Applies a timer event. Returns true when the event was current and
    /// changed state.
    pub fn apply(&mut self, event: BreakEvent) -> bool {
        match event {
            BreakEvent::Reminder { epoch } => {
                if epoch != self.epoch || self.phase != BreakPhase::Active {
                    return false;
                }
                self.phase = BreakPhase::Reminding;
                self.reminder = MISSING_YOU_MSG.to_string();
                true
            }
            BreakEvent::Over { epoch } => {
                if epoch != self.epoch || !self.is_active() {
                    return false;
                }
                self.phase = BreakPhase::Idle;
                self.reminder.clear();
                true
            }
        }
    }

    /// Arms the two fire-and-forget checkpoints for a freshly started break.
    /// Control returns immediately; the callbacks land on the break channel.
    pub fn arm(epoch: u64, tx: BreakSender) {
        let reminder_tx = tx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(REMINDER_AFTER_MS)).await;
            let _ = reminder_tx.send(BreakEvent::Reminder { epoch });
        });
        tokio::spawn(async move {
            sleep(Duration::from_millis(BREAK_LENGTH_MS)).await;
            let _ = tx.send(BreakEvent::Over { epoch });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_start_from_idle_steps_away() {
        let mut brk = ChaiBreak::new();
        assert_eq!(brk.phase(), BreakPhase::Idle);
        assert_eq!(brk.reminder(), "");

        let epoch = brk.start();
        assert!(epoch.is_some());
        assert_eq!(brk.phase(), BreakPhase::Active);
        assert_eq!(brk.reminder(), STEP_AWAY_MSG);
    }

    #[test]
    fn test_reentry_while_active_is_noop() {
        let mut brk = ChaiBreak::new();
        let epoch = brk.start().unwrap();

        assert_eq!(brk.start(), None);
        assert_eq!(brk.phase(), BreakPhase::Active);
        assert_eq!(brk.reminder(), STEP_AWAY_MSG);

        // The original timers must still be the live ones
        assert!(brk.apply(BreakEvent::Reminder { epoch }));
        assert_eq!(brk.phase(), BreakPhase::Reminding);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_fires_at_exact_offsets() {
        let started = Instant::now();
        let (tx, mut rx) = create_break_channel();
        let mut brk = ChaiBreak::new();

        let epoch = brk.start().unwrap();
        ChaiBreak::arm(epoch, tx);
        assert_eq!(brk.phase(), BreakPhase::Active);
        assert_eq!(brk.reminder(), STEP_AWAY_MSG);

        let event = rx.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(REMINDER_AFTER_MS));
        assert!(brk.apply(event));
        assert_eq!(brk.phase(), BreakPhase::Reminding);
        assert_eq!(brk.reminder(), MISSING_YOU_MSG);

        let event = rx.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(BREAK_LENGTH_MS));
        assert!(brk.apply(event));
        assert_eq!(brk.phase(), BreakPhase::Idle);
        assert_eq!(brk.reminder(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_events_after_cancel_are_inert() {
        // Deliberate deviation from the observed behavior, which offered no
        // way out of a running break.
        let (tx, mut rx) = create_break_channel();
        let mut brk = ChaiBreak::new();

        let epoch = brk.start().unwrap();
        ChaiBreak::arm(epoch, tx);
        brk.cancel();
        assert_eq!(brk.phase(), BreakPhase::Idle);
        assert_eq!(brk.reminder(), "");

        // Both callbacks still fire, but their epoch is stale
        let event = rx.recv().await.unwrap();
        assert!(!brk.apply(event));
        let event = rx.recv().await.unwrap();
        assert!(!brk.apply(event));
        assert_eq!(brk.phase(), BreakPhase::Idle);
        assert_eq!(brk.reminder(), "");
    }

    #[test]
    fn test_events_from_previous_break_are_ignored() {
        let mut brk = ChaiBreak::new();
        let first = brk.start().unwrap();
        assert!(brk.apply(BreakEvent::Over { epoch: first }));

        let second = brk.start().unwrap();
        assert_ne!(first, second);
        assert!(!brk.apply(BreakEvent::Reminder { epoch: first }));
        assert_eq!(brk.phase(), BreakPhase::Active);
        assert_eq!(brk.reminder(), STEP_AWAY_MSG);
    }

    #[test]
    fn test_cancel_while_idle_is_noop() {
        let mut brk = ChaiBreak::new();
        brk.cancel();
        assert_eq!(brk.phase(), BreakPhase::Idle);
        assert_eq!(brk.epoch, 0);
    }
}
