use rand::Rng;

pub const CONFETTI_BATCH: usize = 20;
pub const CONFETTI_LIFETIME_MS: u64 = 3000;
pub const CONFETTI_GLYPHS: [&str; 5] = ["💛", "✨", "🌸", "💕", "☕"];

/// One decorative glyph with randomized placement and animation timing.
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub id: usize,
    pub left_pct: f64,
    pub delay_secs: f64,
    pub duration_secs: f64,
    pub glyph: &'static str,
}

/// Holds the current confetti batch. Bursts replace the whole batch; clears
/// empty it. Both are full overwrites, so overlapping clear timers from
/// rapid re-bursts stay harmless.
#[derive(Debug)]
pub struct ConfettiField {
    pieces: Vec<ConfettiPiece>,
}

impl ConfettiField {
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    pub fn burst(&mut self) {
        let mut rng = rand::rng();
        self.pieces = (0..CONFETTI_BATCH)
            .map(|id| ConfettiPiece {
                id,
                left_pct: rng.random_range(0.0..100.0),
                delay_secs: rng.random_range(0.0..0.5),
                duration_secs: rng.random_range(2.0..3.0),
                glyph: CONFETTI_GLYPHS[rng.random_range(0..CONFETTI_GLYPHS.len())],
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Lays the batch out on one terminal line, each glyph placed by its
    /// horizontal percentage. Later pieces win on collisions.
    pub fn render_strip(&self, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let mut cells: Vec<&str> = vec![" "; width];
        for piece in &self.pieces {
            let col = ((piece.left_pct / 100.0) * width as f64) as usize;
            cells[col.min(width - 1)] = piece.glyph;
        }
        cells.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_makes_exactly_one_batch() {
        let mut field = ConfettiField::new();
        field.burst();
        assert_eq!(field.pieces().len(), CONFETTI_BATCH);
        for (i, piece) in field.pieces().iter().enumerate() {
            assert_eq!(piece.id, i);
            assert!((0.0..100.0).contains(&piece.left_pct));
            assert!((0.0..0.5).contains(&piece.delay_secs));
            assert!((2.0..3.0).contains(&piece.duration_secs));
            assert!(CONFETTI_GLYPHS.contains(&piece.glyph));
        }
    }

    #[test]
    fn test_reburst_replaces_batch() {
        let mut field = ConfettiField::new();
        field.burst();
        field.burst();
        assert_eq!(field.pieces().len(), CONFETTI_BATCH);
    }

    #[test]
    fn test_clear_empties_regardless_of_bursts() {
        let mut field = ConfettiField::new();
        field.burst();
        field.burst();
        field.clear();
        assert!(field.is_empty());
        // A stale clear scheduled by an earlier burst is a harmless no-op
        field.clear();
        assert!(field.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_field_is_empty_at_lifetime_even_after_reburst() {
        use tokio::time::{Duration, Instant, sleep};

        let started = Instant::now();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut field = ConfettiField::new();

        field.burst();
        let clear_tx = tx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(CONFETTI_LIFETIME_MS)).await;
            let _ = clear_tx.send(());
        });

        // A second burst halfway through does not keep the first clear from
        // emptying the field on schedule
        sleep(Duration::from_millis(1500)).await;
        field.burst();
        tokio::spawn(async move {
            sleep(Duration::from_millis(CONFETTI_LIFETIME_MS)).await;
            let _ = tx.send(());
        });

        rx.recv().await.unwrap();
        assert_eq!(
            started.elapsed(),
            Duration::from_millis(CONFETTI_LIFETIME_MS)
        );
        field.clear();
        assert!(field.is_empty());

        rx.recv().await.unwrap();
        field.clear();
        assert!(field.is_empty());
    }

    #[test]
    fn test_render_strip_places_glyphs() {
        let mut field = ConfettiField::new();
        assert_eq!(field.render_strip(10), " ".repeat(10));
        field.burst();
        let strip = field.render_strip(60);
        assert!(strip.chars().any(|c| c != ' '));
    }
}
