//! Scripted chat responder. Stands in for a conversational agent: classifies
//! the child's message into a bucket by keyword and answers with a canned line
//! picked at random within the bucket.

use rand::Rng;

const GREETING: &[&str] = &[
    "Hello! Let's learn some words together!",
    "Hi! What would you like to learn today?",
    "Welcome back! Ready to practice?",
];

const ENCOURAGEMENT: &[&str] = &[
    "Great job! You're doing amazing!",
    "Wonderful! Keep it up!",
    "You're so smart!",
];

const HINT: &[&str] = &[
    "Here's a hint: think about what we learned before!",
    "Take your time, you've got this!",
    "Try to remember the words we practiced!",
];

const DEFAULT: &[&str] = &[
    "That's interesting! Let's keep learning!",
    "Nice! Would you like to practice more words?",
    "Great! Let's continue our adventure!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Greeting,
    Hint,
    Encouragement,
    Default,
}

impl ReplyKind {
    fn lines(self) -> &'static [&'static str] {
        match self {
            ReplyKind::Greeting => GREETING,
            ReplyKind::Hint => HINT,
            ReplyKind::Encouragement => ENCOURAGEMENT,
            ReplyKind::Default => DEFAULT,
        }
    }
}

pub fn classify(message: &str) -> ReplyKind {
    let lower = message.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| lower.contains(needle));

    if contains_any(&["hello", "hi", "hey"]) {
        ReplyKind::Greeting
    } else if contains_any(&["help", "stuck", "hint", "don't know"]) {
        ReplyKind::Hint
    } else if contains_any(&["good", "great", "easy"]) {
        ReplyKind::Encouragement
    } else {
        ReplyKind::Default
    }
}

pub fn respond(message: &str) -> &'static str {
    let lines = classify(message).lines();
    let mut rng = rand::rng();
    lines[rng.random_range(0..lines.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_greeting() {
        assert_eq!(classify("Hi there!"), ReplyKind::Greeting);
        assert_eq!(classify("HELLO"), ReplyKind::Greeting);
    }

    #[test]
    fn test_classify_hint() {
        assert_eq!(classify("I'm stuck on this one"), ReplyKind::Hint);
        assert_eq!(classify("i don't know"), ReplyKind::Hint);
    }

    #[test]
    fn test_classify_encouragement() {
        assert_eq!(classify("that was easy"), ReplyKind::Encouragement);
    }

    #[test]
    fn test_classify_default() {
        assert_eq!(classify("banana"), ReplyKind::Default);
    }

    #[test]
    fn test_respond_stays_in_bucket() {
        for _ in 0..20 {
            let reply = respond("hello");
            assert!(GREETING.contains(&reply));
        }
    }
}
