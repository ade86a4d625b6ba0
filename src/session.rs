use crate::language::{Dictionary, WordOrder};
use crate::stats::{net_wpm, Counters, FinalResults, LiveStats};
use crate::time_series::WpmSeries;
use crate::typing_policy::{classify, WordMarks};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_SAMPLE_SIZE: usize = 100;
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// What a reducer call did to the session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Started,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub sample_size: usize,
    pub time_limit_secs: u64,
    pub order: WordOrder,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            order: WordOrder::Shuffled,
        }
    }
}

/// One timed typing attempt, from Idle to Finished
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) words: Vec<String>,
    pub(crate) word_index: usize,
    pub(crate) char_buffer: Vec<char>,
    pub(crate) counters: Counters,
    pub(crate) time_limit_secs: u64,
    pub(crate) time_remaining_secs: u64,
    pub(crate) phase: Phase,
    pub(crate) wpm_series: WpmSeries,
    pub(crate) results: Option<FinalResults>,
}

impl Session {
    /// Build a fresh Idle session by sampling words from the dictionary
    pub fn create(dictionary: &Dictionary, config: &SessionConfig, rng: &mut dyn RngCore) -> Self {
        let words = config
            .order
            .selector()
            .select_words(dictionary, config.sample_size, rng);
        debug!(
            dictionary = %dictionary.name,
            words = words.len(),
            time_limit_secs = config.time_limit_secs,
            "session created"
        );
        Self::from_words(words, config.time_limit_secs)
    }

    /// Build an Idle session over an already chosen word sequence.
    ///
    /// A time limit of zero is raised to one second.
    pub fn from_words(words: Vec<String>, time_limit_secs: u64) -> Self {
        let time_limit_secs = time_limit_secs.max(1);
        Self {
            words,
            word_index: 0,
            char_buffer: Vec::new(),
            counters: Counters::default(),
            time_limit_secs,
            time_remaining_secs: time_limit_secs,
            phase: Phase::Idle,
            wpm_series: WpmSeries::default(),
            results: None,
        }
    }

    /// Discard everything and start over with a freshly shuffled sample
    pub fn reset(dictionary: &Dictionary, config: &SessionConfig, rng: &mut dyn RngCore) -> Self {
        debug!("session reset");
        Self::create(dictionary, config, rng)
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> Transition {
        if self.phase != Phase::Running {
            return Transition::None;
        }

        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        let elapsed = self.elapsed_secs() as f64;
        let wpm = net_wpm(self.counters.total_chars, self.counters.errors, elapsed);
        self.wpm_series.push(elapsed, wpm);

        if self.time_remaining_secs == 0 {
            self.finish();
            return Transition::Finished;
        }
        Transition::None
    }

    pub(crate) fn start(&mut self) -> Transition {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
            debug!("session started");
            return Transition::Started;
        }
        Transition::None
    }

    pub(crate) fn finish(&mut self) {
        if self.phase == Phase::Finished {
            return;
        }
        self.phase = Phase::Finished;
        let results = FinalResults::from_counters(
            &self.counters,
            self.elapsed_secs() as f64,
            self.wpm_series.consistency(),
        );
        info!(
            wpm = results.wpm,
            accuracy = results.accuracy,
            raw_chars = results.raw_chars,
            errors = results.errors,
            words_committed = self.word_index,
            "session finished"
        );
        self.results = Some(results);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// The word currently being typed, if the list is not exhausted
    pub fn active_word(&self) -> Option<&str> {
        self.words.get(self.word_index).map(String::as_str)
    }

    pub fn char_buffer(&self) -> &[char] {
        &self.char_buffer
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn total_chars(&self) -> u64 {
        self.counters.total_chars
    }

    pub fn correct_chars(&self) -> u64 {
        self.counters.correct_chars
    }

    pub fn errors(&self) -> u64 {
        self.counters.errors
    }

    pub fn time_limit_secs(&self) -> u64 {
        self.time_limit_secs
    }

    pub fn time_remaining_secs(&self) -> u64 {
        self.time_remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.time_limit_secs - self.time_remaining_secs
    }

    pub fn wpm_series(&self) -> &WpmSeries {
        &self.wpm_series
    }

    /// Classification of the active word against what has been typed so far
    pub fn active_marks(&self) -> WordMarks {
        classify(self.active_word().unwrap_or_default(), &self.char_buffer)
    }

    pub fn live_stats(&self) -> LiveStats {
        LiveStats::from_counters(&self.counters, self.elapsed_secs() as f64)
    }

    /// Results snapshot; only available once the session has finished
    pub fn final_results(&self) -> Option<&FinalResults> {
        match self.phase {
            Phase::Finished => self.results.as_ref(),
            _ => None,
        }
    }
}
