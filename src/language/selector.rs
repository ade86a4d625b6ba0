use super::core::Dictionary;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Trait for different word selection strategies
pub trait WordSelector {
    /// Select up to `count` words from the dictionary
    fn select_words(&self, dictionary: &Dictionary, count: usize, rng: &mut dyn RngCore)
        -> Vec<String>;
}

/// Shuffled sample without replacement.
///
/// Asking for more words than the dictionary holds yields the whole
/// dictionary in shuffled order.
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_words(
        &self,
        dictionary: &Dictionary,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        dictionary
            .words
            .choose_multiple(rng, count)
            .cloned()
            .collect()
    }
}

/// The first `count` words in dictionary order, used for custom prompts
pub struct InOrderSelector;

impl WordSelector for InOrderSelector {
    fn select_words(
        &self,
        dictionary: &Dictionary,
        count: usize,
        _rng: &mut dyn RngCore,
    ) -> Vec<String> {
        dictionary.words.iter().take(count).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordOrder {
    #[default]
    Shuffled,
    InOrder,
}

impl WordOrder {
    pub fn selector(&self) -> Box<dyn WordSelector> {
        match self {
            WordOrder::Shuffled => Box::new(RandomSelector),
            WordOrder::InOrder => Box::new(InOrderSelector),
        }
    }
}
