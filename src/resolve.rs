use log::debug;

use crate::alphabet::Symbol;
use crate::error::{Error, Result};
use crate::oracle::Oracle;
use crate::profile::SymbolCounts;
use crate::session::Session;

use std::cmp::{Ordering, Reverse};

/// Which symbol pre-fills every position before refinement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaselineChoice {
    /// The symbol with the largest count.
    MostFrequent,
    /// The symbol the length was probed with.
    FirstSymbol,
}

/// The order substitutes are tried in at each position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateOrder {
    /// Largest remaining count first, alphabet order on ties.
    MostRemaining,
    /// Fixed alphabet order.
    Alphabet,
}

impl Default for CandidateOrder {
    fn default() -> Self {
        CandidateOrder::MostRemaining
    }
}

/// Works out the symbol at each position of the secret by substituting one
/// symbol at a time into an all-baseline candidate and watching the score.
///
/// A rise means the substitute belongs there, a drop means the baseline did,
/// and no change rules the substitute out. When every substitute is ruled
/// out the baseline is accepted by elimination. Each position costs at most
/// one query per non-baseline symbol.
///
/// If the symbol a position settles on has no positions left, the resolver
/// stalls and leaves its best candidate to the caller.
///
/// `len - score == unresolved - remaining[baseline]` holds after every step,
/// so the unresolved positions are all baseline exactly when the score is full.
pub struct PositionResolver {
    order: CandidateOrder,
    baseline: Symbol,
    candidate: Vec<Symbol>,
    resolved: Vec<bool>,
    unresolved: usize,
    next: usize,
    remaining: SymbolCounts,
    score: usize,
    stalled: bool,
}

impl PositionResolver {
    /// Start from the all-`baseline` candidate, whose score is the baseline's count.
    pub fn new(order: CandidateOrder, counts: SymbolCounts, baseline: Symbol) -> Self {
        let len = counts.total();
        Self {
            order,
            baseline,
            candidate: vec![baseline; len],
            resolved: vec![false; len],
            unresolved: len,
            next: 0,
            remaining: counts,
            score: counts.get(baseline),
            stalled: false,
        }
    }

    pub fn baseline(&self) -> Symbol {
        self.baseline
    }

    /// The best known candidate.
    pub fn candidate(&self) -> &[Symbol] {
        &self.candidate
    }

    /// Verified score of `candidate()`.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Positions not yet attributed to a symbol, per symbol.
    pub fn remaining(&self) -> &SymbolCounts {
        &self.remaining
    }

    pub fn is_resolved(&self, pos: usize) -> bool {
        self.resolved[pos]
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// The counts ran out before every position was settled.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Stalled, or every unresolved position is known to hold the baseline.
    pub fn is_done(&self) -> bool {
        self.stalled || self.score == self.candidate.len()
    }

    /// Resolve every position.
    pub fn run<O: Oracle>(&mut self, session: &mut Session<O>) -> Result<()> {
        while self.step(session)? {}
        Ok(())
    }

    /// Resolve the next unresolved position; false once there is nothing left to do.
    pub fn step<O: Oracle>(&mut self, session: &mut Session<O>) -> Result<bool> {
        if self.is_done() {
            return Ok(false);
        }
        let len = self.candidate.len();
        let pos = match (self.next..len).find(|&p| !self.resolved[p]) {
            Some(pos) => pos,
            None => return Ok(false),
        };
        self.next = pos + 1;

        for substitute in self.substitutes() {
            self.candidate[pos] = substitute;
            let score = session.ask(&self.candidate)?;
            match score.cmp(&self.score) {
                Ordering::Greater => {
                    if score != self.score + 1 {
                        return Err(self.jump(session, score));
                    }
                    self.score = score;
                    return Ok(self.settle(pos, substitute));
                }
                Ordering::Less => {
                    if score + 1 != self.score {
                        return Err(self.jump(session, score));
                    }
                    self.candidate[pos] = self.baseline;
                    return Ok(self.settle(pos, self.baseline));
                }
                Ordering::Equal => self.candidate[pos] = self.baseline,
            }
        }

        // Every substitute tied: none of them fits, so the baseline does.
        Ok(self.settle(pos, self.baseline))
    }

    /// Non-baseline symbols with positions left, in the configured order.
    fn substitutes(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = Symbol::ALL
            .iter()
            .copied()
            .filter(|&s| s != self.baseline && self.remaining.get(s) > 0)
            .collect();
        if self.order == CandidateOrder::MostRemaining {
            // Stable, so ties keep alphabet order.
            symbols.sort_by_key(|&s| Reverse(self.remaining.get(s)));
        }
        symbols
    }

    fn settle(&mut self, pos: usize, symbol: Symbol) -> bool {
        if !self.remaining.take(symbol) {
            debug!("no {} left for position {}, stalling", symbol, pos);
            self.stalled = true;
            return false;
        }
        self.resolved[pos] = true;
        self.unresolved -= 1;
        true
    }

    fn jump<O: Oracle>(&self, session: &Session<O>, score: usize) -> Error {
        session.violation(
            &self.candidate,
            format!("one substitution moved the score from {} to {}", self.score, score),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Code;
    use crate::oracle::SecretCode;
    use crate::profile::{discover_length, profile};

    fn resolver_for(secret: &str, order: CandidateOrder) -> (SecretCode, PositionResolver) {
        let mut oracle = SecretCode::new(secret).unwrap();
        let mut session = Session::new(&mut oracle);
        let probe = discover_length(&mut session).unwrap();
        let counts = profile(&mut session, &probe).unwrap().counts;
        let resolver = PositionResolver::new(order, counts, counts.most_frequent());
        (oracle, resolver)
    }

    fn resolve(secret: &str, order: CandidateOrder) -> (String, usize) {
        let (mut oracle, mut resolver) = resolver_for(secret, order);
        let mut session = Session::new(&mut oracle);
        resolver.run(&mut session).unwrap();
        assert_eq!(resolver.score(), secret.len());
        (Code::render(resolver.candidate()), session.queries())
    }

    #[test]
    fn resolves_scenario() {
        let (found, queries) = resolve("ABIXCIABCX", CandidateOrder::default());
        assert_eq!(found, "ABIXCIABCX");
        assert!(queries <= 5 * 10);
    }

    #[test]
    fn stops_once_the_score_is_full() {
        // Baseline is B; once the A is found the rest must be B.
        let (mut oracle, mut resolver) = resolver_for("ABBBBBBB", CandidateOrder::default());
        let mut session = Session::new(&mut oracle);
        assert!(resolver.step(&mut session).unwrap());
        assert!(resolver.is_done());
        assert_eq!(resolver.unresolved(), 7);
        assert_eq!(resolver.remaining().get(resolver.baseline()), 7);
        assert!(!resolver.step(&mut session).unwrap());
        assert_eq!(Code::render(resolver.candidate()), "ABBBBBBB");
        assert_eq!(session.queries(), 1);

        let (found, queries) = resolve("BBBBBBBA", CandidateOrder::default());
        assert_eq!(found, "BBBBBBBA");
        // Every B position is proven by one dropping query, then A raises the score.
        assert_eq!(queries, 8);
    }

    /// Replays fixed answers in order.
    struct Scripted(Vec<i32>);

    impl Oracle for Scripted {
        fn guess(&mut self, _candidate: &[u8]) -> i32 {
            self.0.remove(0)
        }
        fn queries(&self) -> u64 {
            0
        }
    }

    #[test]
    fn elimination_accepts_baseline_when_every_substitute_ties() {
        let counts = SymbolCounts::new([2, 1, 0, 0, 0, 0]);
        let mut resolver = PositionResolver::new(CandidateOrder::default(), counts, Symbol::B);
        let mut oracle = Scripted(vec![2, 3]);
        let mut session = Session::new(&mut oracle);

        // ABB ties, so position 0 keeps B without any drop to prove it.
        assert!(resolver.step(&mut session).unwrap());
        assert!(resolver.is_resolved(0));
        assert_eq!(resolver.candidate()[0], Symbol::B);
        assert_eq!(resolver.remaining().get(Symbol::B), 1);
        assert_eq!(resolver.score(), 2);

        resolver.run(&mut session).unwrap();
        assert_eq!(Code::render(resolver.candidate()), "BAB");
        assert_eq!(resolver.score(), 3);
        assert_eq!(session.queries(), 2);
    }

    #[test]
    fn stalls_when_counts_run_out() {
        let counts = SymbolCounts::new([1, 1, 0, 0, 0, 0]);
        let mut resolver = PositionResolver::new(CandidateOrder::default(), counts, Symbol::B);
        let mut oracle = Scripted(vec![1, 1]);
        let mut session = Session::new(&mut oracle);

        assert!(resolver.step(&mut session).unwrap());
        assert_eq!(resolver.remaining().get(Symbol::B), 0);
        // BA ties as well, but no B is left for position 1.
        assert!(!resolver.step(&mut session).unwrap());
        assert!(resolver.is_stalled());
        assert!(resolver.is_done());
        assert!(!resolver.is_resolved(1));
        assert_eq!(resolver.score(), 1);
        assert!(!resolver.step(&mut session).unwrap());
        assert_eq!(session.queries(), 2);
    }

    #[test]
    fn alphabet_order_still_solves() {
        let (found, _) = resolve("BACXIUBACXIU", CandidateOrder::Alphabet);
        assert_eq!(found, "BACXIUBACXIU");
    }

    #[test]
    fn substitutes_are_ranked_by_remaining_count() {
        let counts = SymbolCounts::new([1, 2, 0, 3, 2, 4]);
        let resolver = PositionResolver::new(CandidateOrder::default(), counts, Symbol::U);
        assert_eq!(
            resolver.substitutes(),
            vec![Symbol::X, Symbol::A, Symbol::I, Symbol::B]
        );

        let resolver = PositionResolver::new(CandidateOrder::Alphabet, counts, Symbol::U);
        assert_eq!(
            resolver.substitutes(),
            vec![Symbol::B, Symbol::A, Symbol::X, Symbol::I]
        );
    }

    #[test]
    fn lying_oracle_is_caught() {
        /// Drops the score by two whenever an A appears.
        struct Liar;
        impl Oracle for Liar {
            fn guess(&mut self, candidate: &[u8]) -> i32 {
                if candidate.contains(&b'A') {
                    0
                } else {
                    2
                }
            }
            fn queries(&self) -> u64 {
                0
            }
        }
        let counts = SymbolCounts::new([2, 1, 0, 0, 0, 0]);
        let mut resolver = PositionResolver::new(CandidateOrder::default(), counts, Symbol::B);
        let mut oracle = Liar;
        let mut session = Session::new(&mut oracle);
        assert!(matches!(
            resolver.step(&mut session),
            Err(Error::Oracle { .. })
        ));
    }
}
