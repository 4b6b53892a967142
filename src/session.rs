use log::trace;

use crate::alphabet::{Code, Symbol};
use crate::error::{Error, Result};
use crate::oracle::{Feedback, Oracle};

/// A candidate the oracle has scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub candidate: Vec<Symbol>,
    pub score: usize,
}

/// The queries of a single solve against one oracle.
///
/// Every scored candidate is remembered in order, so an identical candidate
/// is never sent twice.
pub struct Session<'o, O: Oracle> {
    oracle: &'o mut O,
    buf: Vec<u8>,
    queries: usize,
    history: Vec<Answer>,
}

impl<'o, O: Oracle> Session<'o, O> {
    pub fn new(oracle: &'o mut O) -> Self {
        Self {
            oracle,
            buf: Vec::new(),
            queries: 0,
            history: Vec::new(),
        }
    }

    /// Number of queries this session sent to the oracle.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Every scored candidate, oldest first.
    pub fn history(&self) -> &[Answer] {
        &self.history
    }

    /// The recorded score of `candidate`, if it was already asked.
    pub fn answered(&self, candidate: &[Symbol]) -> Option<usize> {
        self.history
            .iter()
            .find(|answer| answer.candidate == candidate)
            .map(|answer| answer.score)
    }

    /// Submit a candidate whose length may be wrong; `None` on a length
    /// mismatch.
    ///
    /// An invalid-symbol answer cannot happen for a candidate built from the
    /// alphabet and is an error.
    pub fn probe(&mut self, candidate: &[Symbol]) -> Result<Option<usize>> {
        if let Some(score) = self.answered(candidate) {
            return Ok(Some(score));
        }
        Code::encode_into(candidate, &mut self.buf);
        let code = self.oracle.guess(&self.buf);
        self.queries += 1;
        trace!("query {}: {} -> {}", self.queries, Code::render(candidate), code);
        match Feedback::from_code(code) {
            Some(Feedback::InvalidSymbol) => Err(Error::InvalidSymbol {
                candidate: Code::render(candidate),
            }),
            Some(Feedback::Matches(score)) if score > candidate.len() => {
                Err(self.violation(candidate, format!("score {} exceeds length", score)))
            }
            Some(Feedback::Matches(score)) => {
                self.history.push(Answer {
                    candidate: candidate.to_vec(),
                    score,
                });
                Ok(Some(score))
            }
            Some(Feedback::WrongLength) => Ok(None),
            None => Err(self.violation(candidate, format!("unknown answer code {}", code))),
        }
    }

    /// Submit a candidate of the established length and return its score.
    pub fn ask(&mut self, candidate: &[Symbol]) -> Result<usize> {
        match self.probe(candidate)? {
            Some(score) => Ok(score),
            None => Err(self.violation(candidate, "length mismatch after length was found".into())),
        }
    }

    pub(crate) fn violation(&self, candidate: &[Symbol], reason: String) -> Error {
        Error::Oracle {
            candidate: Code::render(candidate),
            reason,
        }
    }
}
