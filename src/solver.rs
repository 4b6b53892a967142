use log::debug;

use crate::alphabet::{Code, Symbol};
use crate::arrange::arrange;
use crate::error::{Error, Result};
use crate::oracle::Oracle;
use crate::profile::{discover_length, profile, LengthProbe, SymbolCounts};
use crate::resolve::{BaselineChoice, CandidateOrder, PositionResolver};
use crate::session::Session;

/// When the arrangement search is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackTrigger {
    /// Never; a failed verification is an error.
    Never,
    /// Only when the resolved candidate fails its verification query.
    OnMismatch,
    /// Always, in place of position resolution.
    MultisetFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub baseline: BaselineChoice,
    pub order: CandidateOrder,
    pub fallback: FallbackTrigger,
    /// Most arrangements the fallback may submit.
    pub fallback_cap: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            baseline: BaselineChoice::MostFrequent,
            order: CandidateOrder::MostRemaining,
            fallback: FallbackTrigger::OnMismatch,
            fallback_cap: 20,
        }
    }
}

impl SolverConfig {
    fn baseline(&self, probe: &LengthProbe, counts: &SymbolCounts) -> Symbol {
        match self.baseline {
            BaselineChoice::MostFrequent => counts.most_frequent(),
            BaselineChoice::FirstSymbol => probe.symbol,
        }
    }
}

/// Deduces a secret from exact-match feedback.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find the secret held by `oracle`.
    ///
    /// The returned code has scored a full match; anything short of that is
    /// an error.
    pub fn solve<O: Oracle>(&self, oracle: &mut O) -> Result<Code> {
        let mut session = Session::new(oracle);
        let probe = discover_length(&mut session)?;
        let len = probe.len;
        let profile = profile(&mut session, &probe)?;

        if let Some(symbol) = profile.uniform {
            let code = vec![symbol; len];
            return self.verified(&mut session, code);
        }

        let counts = profile.counts;
        if self.config.fallback == FallbackTrigger::MultisetFirst {
            return arrange(&mut session, &counts, self.config.fallback_cap);
        }

        let baseline = self.config.baseline(&probe, &counts);
        debug!("baseline {}", baseline);
        let mut resolver = PositionResolver::new(self.config.order, counts, baseline);
        resolver.run(&mut session)?;
        if resolver.score() == len {
            debug!("solved in {} queries", session.queries());
            return Ok(resolver.candidate().to_vec().into());
        }

        let candidate = resolver.candidate().to_vec();
        let score = session.ask(&candidate)?;
        if score == len {
            return Ok(candidate.into());
        }
        match self.config.fallback {
            FallbackTrigger::OnMismatch => {
                debug!("{} scored {}, falling back", Code::render(&candidate), score);
                arrange(&mut session, &counts, self.config.fallback_cap)
            }
            _ => Err(Error::Unresolved {
                best: Code::render(&candidate),
                score,
            }),
        }
    }

    fn verified<O: Oracle>(&self, session: &mut Session<O>, code: Vec<Symbol>) -> Result<Code> {
        let score = session.ask(&code)?;
        if score != code.len() {
            return Err(session.violation(&code, format!("expected a full match, got {}", score)));
        }
        Ok(code.into())
    }
}

/// Find the secret held by `oracle` with the default configuration.
pub fn solve<O: Oracle>(oracle: &mut O) -> Result<Code> {
    Solver::default().solve(oracle)
}
