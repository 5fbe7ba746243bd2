use rand::Rng;

pub const REVEAL_DELAY_MS: u64 = 50; // Re-trigger the reveal on a visible false->true edge

pub const PLACEHOLDER: &str = "Ask for a dose of kindness 💌";

pub const COMPLIMENTS: [&str; 10] = [
    "You have the warmest smile 😊",
    "Your chai-making skills deserve an award ☕",
    "The world feels lighter when you talk 🌸",
    "Even your tired version is adorable 💛",
    "You handle everything with such grace ✨",
    "Your presence makes everything better 🌟",
    "You're stronger than you know 💪",
    "The way you care about others is beautiful 💕",
    "You deserve all the good things coming your way 🌈",
    "Your kindness is a superpower 🦸‍♀️",
];

/// Picks a random compliment and tracks whether it is currently revealed.
///
/// `pick` hides the message; the caller reveals it REVEAL_DELAY_MS later so
/// the fade-in restarts even when a message was already showing.
#[derive(Debug)]
pub struct MessagePicker {
    current: Option<&'static str>,
    visible: bool,
}

impl MessagePicker {
    pub fn new() -> Self {
        Self {
            current: None,
            visible: false,
        }
    }

    pub fn pick(&mut self) -> &'static str {
        let mut rng = rand::rng();
        let line = COMPLIMENTS[rng.random_range(0..COMPLIMENTS.len())];
        self.current = Some(line);
        self.visible = false;
        line
    }

    pub fn reveal(&mut self) {
        if self.current.is_some() {
            self.visible = true;
        }
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
