use log::debug;

use crate::alphabet::{Code, Symbol, ALPHABET_SIZE};
use crate::error::{Error, Result};
use crate::oracle::Oracle;
use crate::profile::SymbolCounts;
use crate::session::{Answer, Session};

/// Partial arrangement of a multiset, checked against every scored candidate.
struct Search {
    len: usize,
    partial: Vec<Symbol>,
    remaining: SymbolCounts,
    answers: Vec<Answer>,
    /// For each answer, how many placed positions agree with its candidate.
    agree: Vec<usize>,
}

impl Search {
    fn new(counts: &SymbolCounts, history: &[Answer]) -> Self {
        let len = counts.total();
        let answers: Vec<Answer> = history
            .iter()
            .filter(|answer| answer.candidate.len() == len)
            .cloned()
            .collect();
        Self {
            len,
            partial: Vec::with_capacity(len),
            remaining: *counts,
            agree: vec![0; answers.len()],
            answers,
        }
    }

    fn place(&mut self, symbol: Symbol) -> bool {
        if !self.remaining.take(symbol) {
            return false;
        }
        let depth = self.partial.len();
        for (answer, agree) in self.answers.iter().zip(self.agree.iter_mut()) {
            if answer.candidate[depth] == symbol {
                *agree += 1;
            }
        }
        self.partial.push(symbol);
        true
    }

    fn unplace(&mut self) {
        if let Some(symbol) = self.partial.pop() {
            let depth = self.partial.len();
            for (answer, agree) in self.answers.iter().zip(self.agree.iter_mut()) {
                if answer.candidate[depth] == symbol {
                    *agree -= 1;
                }
            }
            self.remaining.give(symbol);
        }
    }

    /// Whether some completion of `partial` could have produced every score.
    fn feasible(&self) -> bool {
        let open = self.len - self.partial.len();
        self.answers
            .iter()
            .zip(self.agree.iter())
            .all(|(answer, &agree)| agree <= answer.score && agree + open >= answer.score)
    }

    /// Record the score of the complete `partial`.
    fn learn(&mut self, score: usize) {
        self.answers.push(Answer {
            candidate: self.partial.clone(),
            score,
        });
        self.agree.push(self.len);
    }
}

/// Search the distinct arrangements of the multiset `counts` for the secret,
/// sending at most `cap` of them to the oracle.
///
/// Only arrangements that agree with every candidate scored so far in this
/// session are sent, so the history prunes the search. Backtracking uses an
/// explicit stack of per-depth cursors into the alphabet.
pub fn arrange<O: Oracle>(
    session: &mut Session<O>,
    counts: &SymbolCounts,
    cap: usize,
) -> Result<Code> {
    let mut search = Search::new(counts, session.history());
    let len = search.len;
    debug!("arranging {} with a budget of {}", counts, cap);

    let mut cursor: Vec<usize> = vec![0];
    let mut attempts = 0;
    while let Some(depth) = cursor.len().checked_sub(1) {
        if search.partial.len() > depth {
            search.unplace();
        }

        let mut placed = false;
        while cursor[depth] < ALPHABET_SIZE {
            let symbol = Symbol::ALL[cursor[depth]];
            cursor[depth] += 1;
            if !search.place(symbol) {
                continue;
            }
            if search.feasible() {
                placed = true;
                break;
            }
            search.unplace();
        }

        if !placed {
            cursor.pop();
        } else if search.partial.len() < len {
            cursor.push(0);
        } else {
            if attempts == cap {
                debug!("arrangement budget of {} spent", cap);
                return Err(Error::FallbackExhausted { attempts });
            }
            attempts += 1;
            let score = session.ask(&search.partial)?;
            if score == len {
                debug!("arranged after {} attempts", attempts);
                return Ok(search.partial.clone().into());
            }
            search.learn(score);
        }
    }

    Err(Error::FallbackExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::SecretCode;

    fn counts_of(secret: &str) -> SymbolCounts {
        let mut counts = SymbolCounts::default();
        for b in secret.bytes() {
            counts.give(Symbol::from_letter(b).unwrap());
        }
        counts
    }

    #[test]
    fn finds_a_permutation() {
        let mut oracle = SecretCode::new("CAB").unwrap();
        let mut session = Session::new(&mut oracle);
        let code = arrange(&mut session, &counts_of("CAB"), 6).unwrap();
        assert_eq!(code.to_string(), "CAB");
        assert!(session.queries() <= 6);
    }

    #[test]
    fn skips_repeated_arrangements() {
        // BBAA misses every position, which leaves only AABB.
        let mut oracle = SecretCode::new("AABB").unwrap();
        let mut session = Session::new(&mut oracle);
        let code = arrange(&mut session, &counts_of("AABB"), 6).unwrap();
        assert_eq!(code.to_string(), "AABB");
        assert_eq!(session.queries(), 2);
    }

    #[test]
    fn budget_is_enforced() {
        let mut oracle = SecretCode::new("UIXCAB").unwrap();
        let mut session = Session::new(&mut oracle);
        // The first arrangement, BACXIU, misses every position.
        assert_eq!(
            arrange(&mut session, &counts_of("UIXCAB"), 1),
            Err(Error::FallbackExhausted { attempts: 1 })
        );
        assert_eq!(session.queries(), 1);

        let mut oracle = SecretCode::new("UIXCAB").unwrap();
        let mut session = Session::new(&mut oracle);
        assert_eq!(
            arrange(&mut session, &counts_of("UIXCAB"), 0),
            Err(Error::FallbackExhausted { attempts: 0 })
        );
        assert_eq!(session.queries(), 0);
    }

    #[test]
    fn every_attempt_agrees_with_earlier_scores() {
        let secret = "UIXCABBA";
        let mut oracle = SecretCode::new(secret).unwrap();
        let mut session = Session::new(&mut oracle);
        let code = arrange(&mut session, &counts_of(secret), 200).unwrap();
        assert_eq!(code.to_string(), secret);

        let history = session.history();
        for (i, later) in history.iter().enumerate() {
            for earlier in &history[..i] {
                let agree = later
                    .candidate
                    .iter()
                    .zip(earlier.candidate.iter())
                    .filter(|(a, b)| a == b)
                    .count();
                assert_eq!(agree, earlier.score);
            }
        }
    }

    #[test]
    fn history_prunes_the_search() {
        let secret = "XBAC";
        let mut oracle = SecretCode::new(secret).unwrap();
        let mut session = Session::new(&mut oracle);
        // XBCA scores 2; only arrangements keeping exactly two of its
        // positions are tried afterwards.
        let seed = [Symbol::X, Symbol::B, Symbol::C, Symbol::A];
        assert_eq!(session.ask(&seed), Ok(2));
        let code = arrange(&mut session, &counts_of(secret), 24).unwrap();
        assert_eq!(code.to_string(), secret);
        assert!(session.queries() <= 1 + 6);
    }

    #[test]
    fn partial_placements_are_pruned() {
        let mut oracle = SecretCode::new("AB").unwrap();
        let mut session = Session::new(&mut oracle);
        assert_eq!(session.ask(&[Symbol::B, Symbol::A]), Ok(0));
        let mut search = Search::new(&counts_of("AB"), session.history());
        assert!(search.place(Symbol::B));
        assert!(!search.feasible());
        search.unplace();
        assert!(search.place(Symbol::A));
        assert!(search.feasible());
        assert!(!search.place(Symbol::A));
    }

    #[test]
    fn exhausted_space_is_reported() {
        /// Claims nothing ever matches.
        struct Nothing;
        impl Oracle for Nothing {
            fn guess(&mut self, _candidate: &[u8]) -> i32 {
                0
            }
            fn queries(&self) -> u64 {
                0
            }
        }
        let mut oracle = Nothing;
        let mut session = Session::new(&mut oracle);
        // BA and AB both score 0, after which no arrangement fits.
        assert_eq!(
            arrange(&mut session, &counts_of("AB"), 10),
            Err(Error::FallbackExhausted { attempts: 2 })
        );
    }
}
