pub mod core;
pub mod selector;

// Re-export the main types for convenience
pub use core::Dictionary;
pub use selector::{InOrderSelector, RandomSelector, WordOrder, WordSelector};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_sample_of_default_size() {
        let dict = Dictionary::builtin(Dictionary::DEFAULT).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let words = WordOrder::Shuffled.selector().select_words(&dict, 100, &mut rng);
        assert_eq!(words.len(), 100);
        assert!(words.iter().all(|w| dict.words.contains(w)));
    }
}
