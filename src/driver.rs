// Owns the current session together with its tick.
//
// Each session gets a new generation number. A tick carrying an older
// generation belongs to a session that no longer exists and is dropped, so a
// timer that was still in flight during a reset can never touch the new
// session.

use crate::language::Dictionary;
use crate::runtime::{TickHandle, TickScheduler};
use crate::session::{Session, SessionConfig, Transition};
use crate::typing_policy::{apply_keystroke, Keystroke};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

pub struct SessionDriver<S: TickScheduler> {
    dictionary: Dictionary,
    config: SessionConfig,
    rng: StdRng,
    scheduler: S,
    session: Session,
    generation: u64,
    ticker: Option<TickHandle>,
}

impl<S: TickScheduler> SessionDriver<S> {
    pub fn new(dictionary: Dictionary, config: SessionConfig, scheduler: S) -> Self {
        Self::with_rng(dictionary, config, scheduler, StdRng::from_entropy())
    }

    pub fn with_rng(
        dictionary: Dictionary,
        config: SessionConfig,
        scheduler: S,
        mut rng: StdRng,
    ) -> Self {
        let session = Session::create(&dictionary, &config, &mut rng);
        Self {
            dictionary,
            config,
            rng,
            scheduler,
            session,
            generation: 0,
            ticker: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Whether a tick is currently scheduled for the session
    pub fn has_live_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub fn input(&mut self, keystroke: Keystroke) -> Transition {
        let transition = apply_keystroke(&mut self.session, keystroke);
        self.follow(transition);
        transition
    }

    /// Deliver a tick; ticks from earlier sessions are ignored
    pub fn tick(&mut self, generation: u64) -> Transition {
        if generation != self.generation {
            trace!(generation, current = self.generation, "stale tick ignored");
            return Transition::None;
        }
        let transition = self.session.tick();
        self.follow(transition);
        transition
    }

    /// Stop the tick and replace the session with a fresh Idle one
    pub fn reset(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        self.session = Session::reset(&self.dictionary, &self.config, &mut self.rng);
        debug!(generation = self.generation, "driver reset");
    }

    /// Start over on the same words with a fresh Idle session
    pub fn retry(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        let words = self.session.words().to_vec();
        self.session = Session::from_words(words, self.config.time_limit_secs);
        debug!(generation = self.generation, "driver retry");
    }

    /// Change the time limit; the current session is discarded
    pub fn set_time_limit(&mut self, secs: u64) {
        self.config.time_limit_secs = secs;
        self.reset();
    }

    fn follow(&mut self, transition: Transition) {
        match transition {
            Transition::Started => {
                self.stop_ticker();
                self.ticker = Some(self.scheduler.schedule(self.generation));
            }
            Transition::Finished => self.stop_ticker(),
            Transition::None => {}
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::WordOrder;
    use crate::runtime::ManualTickScheduler;

    fn driver(words: &[&str], secs: u64) -> SessionDriver<ManualTickScheduler> {
        let dictionary =
            Dictionary::from_words("test", words.iter().map(|w| w.to_string()).collect()).unwrap();
        let config = SessionConfig {
            sample_size: words.len(),
            time_limit_secs: secs,
            order: WordOrder::InOrder,
        };
        SessionDriver::with_rng(
            dictionary,
            config,
            ManualTickScheduler::default(),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn first_keystroke_schedules_tick() {
        let mut d = driver(&["the", "be"], 10);
        assert!(!d.has_live_ticker());

        assert_eq!(d.input(Keystroke::Char('t')), Transition::Started);
        assert!(d.has_live_ticker());
        assert_eq!(d.scheduler().live_generations(), vec![0]);

        d.input(Keystroke::Char('h'));
        assert_eq!(d.scheduler().scheduled(), 1);
    }

    #[test]
    fn time_out_cancels_tick() {
        let mut d = driver(&["the", "be"], 2);
        d.input(Keystroke::Char('t'));

        assert_eq!(d.tick(0), Transition::None);
        assert_eq!(d.tick(0), Transition::Finished);
        assert!(d.session().is_finished());
        assert!(!d.has_live_ticker());
        assert!(d.scheduler().live_generations().is_empty());
    }

    #[test]
    fn stale_tick_is_ignored_after_reset() {
        let mut d = driver(&["the", "be"], 10);
        d.input(Keystroke::Char('t'));
        d.reset();

        assert_eq!(d.generation(), 1);
        assert!(d.scheduler().live_generations().is_empty());

        d.input(Keystroke::Char('t'));
        assert_eq!(d.tick(0), Transition::None);
        assert_eq!(d.session().time_remaining_secs(), 10);

        d.tick(1);
        assert_eq!(d.session().time_remaining_secs(), 9);
        assert_eq!(d.scheduler().live_generations(), vec![1]);
    }

    #[test]
    fn reset_restores_idle_session() {
        let mut d = driver(&["the", "be"], 10);
        d.input(Keystroke::Char('x'));
        d.input(Keystroke::Space);
        d.reset();

        let s = d.session();
        assert!(s.is_idle());
        assert_eq!(s.total_chars(), 0);
        assert_eq!(s.word_index(), 0);
    }

    #[test]
    fn retry_replays_same_words() {
        let dictionary = Dictionary::builtin(Dictionary::DEFAULT).unwrap();
        let config = SessionConfig {
            sample_size: 20,
            time_limit_secs: 30,
            order: WordOrder::Shuffled,
        };
        let mut d = SessionDriver::with_rng(
            dictionary,
            config,
            ManualTickScheduler::default(),
            StdRng::seed_from_u64(9),
        );
        let words = d.session().words().to_vec();
        d.input(Keystroke::Char('z'));
        d.input(Keystroke::Space);
        d.retry();

        let s = d.session();
        assert_eq!(s.words(), words.as_slice());
        assert!(s.is_idle());
        assert_eq!(s.total_chars(), 0);
        assert_eq!(s.word_index(), 0);
        assert_eq!(s.time_remaining_secs(), 30);
        assert_eq!(d.generation(), 1);
        assert!(!d.has_live_ticker());
        assert_eq!(d.tick(0), Transition::None);
    }

    #[test]
    fn set_time_limit_reconfigures() {
        let mut d = driver(&["the", "be"], 60);
        d.input(Keystroke::Char('t'));
        d.set_time_limit(15);

        assert_eq!(d.config().time_limit_secs, 15);
        assert_eq!(d.session().time_remaining_secs(), 15);
        assert!(d.session().is_idle());
        assert!(!d.has_live_ticker());
    }

    #[test]
    fn exhausting_words_cancels_tick() {
        let mut d = driver(&["hi"], 30);
        d.input(Keystroke::Char('h'));
        d.input(Keystroke::Char('i'));

        assert_eq!(d.input(Keystroke::Space), Transition::Finished);
        assert!(!d.has_live_ticker());
        assert!(d.session().final_results().is_some());
    }
}
