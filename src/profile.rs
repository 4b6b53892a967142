use log::debug;

use crate::alphabet::{Symbol, ALPHABET_SIZE, MAX_LEN};
use crate::error::{Error, Result};
use crate::oracle::Oracle;
use crate::session::Session;

use std::fmt;

/// How many positions each symbol occupies (or still may occupy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolCounts([usize; ALPHABET_SIZE]);

impl SymbolCounts {
    pub fn new(counts: [usize; ALPHABET_SIZE]) -> Self {
        SymbolCounts(counts)
    }

    pub fn get(&self, symbol: Symbol) -> usize {
        self.0[symbol.index()]
    }

    pub fn set(&mut self, symbol: Symbol, count: usize) {
        self.0[symbol.index()] = count;
    }

    /// Sum over all symbols.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Consume one position of `symbol`; false if none were left.
    pub fn take(&mut self, symbol: Symbol) -> bool {
        let count = &mut self.0[symbol.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Return one position of `symbol`.
    pub fn give(&mut self, symbol: Symbol) {
        self.0[symbol.index()] += 1;
    }

    /// The symbol with the largest count, earliest in alphabet order on ties.
    pub fn most_frequent(&self) -> Symbol {
        let mut best = Symbol::ALL[0];
        for &symbol in Symbol::ALL.iter() {
            if self.get(symbol) > self.get(best) {
                best = symbol;
            }
        }
        best
    }
}

impl fmt::Display for SymbolCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, &symbol) in Symbol::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", symbol, self.get(symbol))?;
        }
        Ok(())
    }
}

/// The probe that revealed the secret's length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthProbe {
    pub len: usize,
    /// Symbol the probe was filled with.
    pub symbol: Symbol,
    /// Score of the uniform candidate of `symbol` at `len`.
    pub matches: usize,
}

/// Result of frequency profiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    pub counts: SymbolCounts,
    /// Set when one symbol fills the whole secret.
    pub uniform: Option<Symbol>,
}

/// Find the secret's length by probing uniform candidates of 1..=18 copies
/// of the first symbol.
pub fn discover_length<O: Oracle>(session: &mut Session<O>) -> Result<LengthProbe> {
    let symbol = Symbol::ALL[0];
    let mut candidate = Vec::with_capacity(MAX_LEN);
    for len in 1..=MAX_LEN {
        candidate.push(symbol);
        if let Some(matches) = session.probe(&candidate)? {
            debug!("secret has length {} ({} x {})", len, matches, symbol);
            return Ok(LengthProbe {
                len,
                symbol,
                matches,
            });
        }
    }
    Err(Error::LengthNotFound { max: MAX_LEN })
}

/// Count how many positions each symbol occupies.
///
/// The length probe's score is reused for its symbol. Profiling stops once
/// the counts add up to the length, and the last symbol's count is deduced
/// rather than asked.
pub fn profile<O: Oracle>(session: &mut Session<O>, probe: &LengthProbe) -> Result<Profile> {
    let len = probe.len;
    let order = std::iter::once(probe.symbol)
        .chain(Symbol::ALL.iter().copied().filter(|&s| s != probe.symbol));

    let mut counts = SymbolCounts::default();
    let mut measured = 0;
    for (i, symbol) in order.enumerate() {
        if measured == len {
            break;
        }
        let uniform = vec![symbol; len];
        let count = if symbol == probe.symbol {
            probe.matches
        } else if i == ALPHABET_SIZE - 1 {
            len - measured
        } else {
            session.ask(&uniform)?
        };
        if measured + count > len {
            return Err(session.violation(
                &uniform,
                format!("symbol counts exceed length {}", len),
            ));
        }
        counts.set(symbol, count);
        measured += count;
        if count == len {
            debug!("secret is uniform {}", symbol);
            return Ok(Profile {
                counts,
                uniform: Some(symbol),
            });
        }
    }

    debug!("symbol counts {}", counts);
    Ok(Profile {
        counts,
        uniform: None,
    })
}
