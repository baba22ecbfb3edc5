use rand::Rng;

/// Draws above this value fire a comment, so roughly 30% of notable events
/// get one. Repeated identical events sometimes commenting and sometimes
/// not is intended behavior.
pub const COMMENT_THRESHOLD: f64 = 0.7;

/// Random source behind the trigger. Injectable so tests can supply fixed
/// sequences without touching production randomness.
pub trait Chance: Send {
    fn draw(&mut self) -> f64;
}

pub struct ThreadRngChance;

impl Chance for ThreadRngChance {
    fn draw(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

pub struct CommentaryTrigger {
    chance: Box<dyn Chance>,
}

impl CommentaryTrigger {
    pub fn new(chance: Box<dyn Chance>) -> Self {
        Self { chance }
    }

    pub fn from_thread_rng() -> Self {
        Self::new(Box::new(ThreadRngChance))
    }

    /// One uniform draw per notable event.
    pub fn should_comment(&mut self) -> bool {
        self.chance.draw() > COMMENT_THRESHOLD
    }
}

/// System-style message embedding the event, sent down the normal gateway
/// path when the trigger fires.
pub fn system_event_message(description: &str) -> String {
    format!("[System Event: Player triggered: {description}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(f64);

    impl Chance for Always {
        fn draw(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn should_comment__fires_strictly_above_threshold() {
        assert!(CommentaryTrigger::new(Box::new(Always(0.71))).should_comment());
        assert!(!CommentaryTrigger::new(Box::new(Always(0.7))).should_comment());
        assert!(!CommentaryTrigger::new(Box::new(Always(0.1))).should_comment());
    }

    #[test]
    fn system_event_message__embeds_description() {
        let msg = system_event_message("jackpot hit");
        assert_eq!(msg, "[System Event: Player triggered: jackpot hit]");
    }
}
