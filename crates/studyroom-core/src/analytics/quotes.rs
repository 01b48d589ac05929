use rand::seq::SliceRandom;

pub const QUOTES: &[&str] = &[
    "Small steps today lead you to great heights tomorrow.",
    "There is no failure, only lessons.",
    "Action is the key that opens every door.",
    "Believe in yourself and you can do anything.",
    "Every day is a chance to start again.",
    "Persistence turns dreams into reality.",
    "Success comes from effort, not luck.",
    "Don't wait for the perfect moment. Start now.",
    "You are stronger than the challenges you face.",
    "Every difficulty is a chance to grow.",
    "Be the best version of yourself.",
    "Nothing is impossible once you are determined.",
    "Today is your day to shine.",
    "Every small effort adds up to a big success.",
    "Don't fear failure. Fear not trying.",
];

/// A motivational quote picked at random.
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_the_list() {
        for _ in 0..20 {
            assert!(QUOTES.contains(&random_quote()));
        }
    }
}
