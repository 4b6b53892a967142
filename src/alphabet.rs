use crate::error::{Error, Result};

use std::{fmt, str};

/// Number of symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 6;

/// The longest secret an oracle may hold.
pub const MAX_LEN: usize = 18;

/// One of the six symbols a secret is made of.
///
/// Declaration order is the fixed alphabet order used for every tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    B,
    A,
    C,
    X,
    I,
    U,
}

/// The letter of each symbol, indexed by `Symbol::index`.
const LETTERS: [u8; ALPHABET_SIZE] = *b"BACXIU";

/// Reverse lookup from an ASCII byte to its symbol index.
static INDEX_OF: [Option<u8>; 128] = {
    let mut table = [None; 128];
    let mut i = 0;
    while i < ALPHABET_SIZE {
        table[LETTERS[i] as usize] = Some(i as u8);
        i += 1;
    }
    table
};

impl Symbol {
    /// Every symbol, in alphabet order.
    pub const ALL: [Symbol; ALPHABET_SIZE] = [
        Symbol::B,
        Symbol::A,
        Symbol::C,
        Symbol::X,
        Symbol::I,
        Symbol::U,
    ];

    /// Position of the symbol in alphabet order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Symbol> {
        Self::ALL.get(idx).copied()
    }

    /// The ASCII letter sent to the oracle.
    pub fn letter(self) -> u8 {
        LETTERS[self.index()]
    }

    pub fn from_letter(letter: u8) -> Option<Symbol> {
        let idx = (*INDEX_OF.get(letter as usize)?)?;
        Self::from_index(idx as usize)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter() as char)
    }
}

/// An owned sequence of symbols: a candidate or a discovered secret.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<Symbol>);

impl Code {
    /// A code of `len` copies of `symbol`.
    pub fn uniform(symbol: Symbol, len: usize) -> Self {
        Code(vec![symbol; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Write the ASCII form of `symbols` into `buf`, replacing its contents.
    pub fn encode_into(symbols: &[Symbol], buf: &mut Vec<u8>) {
        buf.clear();
        buf.extend(symbols.iter().map(|s| s.letter()));
    }

    /// Render a bare symbol slice the way `Display` renders a code.
    pub fn render(symbols: &[Symbol]) -> String {
        symbols.iter().map(|s| s.letter() as char).collect()
    }
}

impl From<Vec<Symbol>> for Code {
    fn from(symbols: Vec<Symbol>) -> Self {
        Code(symbols)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&Code::render(&self.0))
    }
}

impl str::FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.bytes()
            .map(|b| {
                Symbol::from_letter(b).ok_or_else(|| {
                    Error::InvalidSecret(format!("{:?} is not in the alphabet", b as char))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Code)
    }
}
