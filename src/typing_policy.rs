// Keystroke reducers for a Session.
//
// Counters only ever grow: a backspace edits the buffer but never takes
// back a keystroke that was already scored.

use crate::session::{Session, Transition};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharMark {
    Unset,
    Correct,
    Incorrect,
}

/// Per-position view of the active word
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct WordMarks {
    /// One entry per character of the target word
    pub positions: Vec<CharMark>,
    /// Typed characters past the end of the target word
    pub overflow: Vec<char>,
}

impl WordMarks {
    /// Position the next keystroke lands on, if still inside the word
    pub fn cursor(&self) -> Option<usize> {
        self.positions.iter().position(|m| *m == CharMark::Unset)
    }
}

/// Compare typed characters against the target word position by position
pub fn classify(target: &str, typed: &[char]) -> WordMarks {
    let target: Vec<char> = target.chars().collect();

    let positions = target
        .iter()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            None => CharMark::Unset,
            Some(c) if c == expected => CharMark::Correct,
            Some(_) => CharMark::Incorrect,
        })
        .collect();

    let overflow = typed.iter().skip(target.len()).copied().collect();

    WordMarks {
        positions,
        overflow,
    }
}

enum Admission {
    Accept { started: Transition, target: String },
    Reject(Transition),
}

/// Starts an Idle session on its first input and hands back the target word.
/// An exhausted (or empty) word list ends the session instead.
fn admit(session: &mut Session) -> Admission {
    if session.is_finished() {
        return Admission::Reject(Transition::None);
    }
    let started = session.start();
    match session.active_word() {
        Some(target) => Admission::Accept {
            started,
            target: target.to_string(),
        },
        None => {
            session.finish();
            Admission::Reject(Transition::Finished)
        }
    }
}

/// A single input event from the keyboard layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
    Space,
}

pub fn apply_keystroke(session: &mut Session, keystroke: Keystroke) -> Transition {
    match keystroke {
        Keystroke::Char(c) => submit_character(session, c),
        Keystroke::Backspace => submit_backspace(session),
        Keystroke::Space => submit_space(session),
    }
}

pub fn submit_character(session: &mut Session, c: char) -> Transition {
    if c == ' ' {
        return submit_space(session);
    }
    let (started, target) = match admit(session) {
        Admission::Accept { started, target } => (started, target),
        Admission::Reject(transition) => return transition,
    };

    let idx = session.char_buffer.len();
    match target.chars().nth(idx) {
        Some(expected) if expected == c => session.counters.correct_chars += 1,
        // wrong character or overflow past the end of the word
        _ => session.counters.errors += 1,
    }
    session.counters.total_chars += 1;
    session.char_buffer.push(c);

    started
}

pub fn submit_backspace(session: &mut Session) -> Transition {
    if !session.is_finished() {
        session.char_buffer.pop();
    }
    Transition::None
}

/// Commit the active word and move to the next one
pub fn submit_space(session: &mut Session) -> Transition {
    let (started, target) = match admit(session) {
        Admission::Accept { started, target } => (started, target),
        Admission::Reject(transition) => return transition,
    };

    session.counters.total_chars += 1;
    let typed: String = session.char_buffer.iter().collect();
    if typed.trim() == target {
        session.counters.correct_chars += 1;
    }
    session.char_buffer.clear();
    session.word_index += 1;

    if session.word_index >= session.words.len() {
        session.finish();
        return Transition::Finished;
    }
    started
}
