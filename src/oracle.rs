use log::info;
use rand::Rng;

use crate::alphabet::{Code, Symbol, ALPHABET_SIZE, MAX_LEN};
use crate::error::{Error, Result};

/// Raw answer for a candidate containing a byte outside the alphabet.
pub const INVALID_SYMBOL: i32 = -1;
/// Raw answer for a well-formed candidate of the wrong length.
pub const WRONG_LENGTH: i32 = -2;

/// Represents an oracle that can be queried about the secret it holds.
pub trait Oracle {
    /// Compare `candidate` (ASCII letters) with the secret.
    ///
    /// Returns [`INVALID_SYMBOL`], [`WRONG_LENGTH`], or the number of
    /// positions where the candidate equals the secret.
    fn guess(&mut self, candidate: &[u8]) -> i32;
    /// Return the number of times `guess` was called.
    fn queries(&self) -> u64;
}

/// Typed view of an oracle answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    InvalidSymbol,
    WrongLength,
    Matches(usize),
}

impl Feedback {
    /// Decode a raw answer; `None` for codes outside the contract.
    pub fn from_code(code: i32) -> Option<Feedback> {
        match code {
            INVALID_SYMBOL => Some(Feedback::InvalidSymbol),
            WRONG_LENGTH => Some(Feedback::WrongLength),
            n if n >= 0 => Some(Feedback::Matches(n as usize)),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Feedback::InvalidSymbol => INVALID_SYMBOL,
            Feedback::WrongLength => WRONG_LENGTH,
            Feedback::Matches(n) => n as i32,
        }
    }
}

/// An oracle that picks a secret in advance and answers honestly.
pub struct SecretCode {
    secret: Vec<u8>,
    queries: u64,
}

impl SecretCode {
    /// Hold `secret`, which must be 1 to 18 letters from the alphabet.
    pub fn new(secret: &str) -> Result<Self> {
        let code: Code = secret.parse()?;
        Self::from_code(&code)
    }

    pub fn from_code(code: &Code) -> Result<Self> {
        if code.is_empty() || code.len() > MAX_LEN {
            return Err(Error::InvalidSecret(format!(
                "length {} is outside 1..={}",
                code.len(),
                MAX_LEN
            )));
        }
        let mut secret = Vec::with_capacity(code.len());
        Code::encode_into(code.symbols(), &mut secret);
        Ok(Self { secret, queries: 0 })
    }

    /// Draw a secret of length `len` uniformly at random.
    pub fn random_code<R: Rng>(len: usize, rng: &mut R) -> Code {
        (0..len)
            .filter_map(|_| Symbol::from_index(rng.gen_range(0, ALPHABET_SIZE)))
            .collect::<Vec<_>>()
            .into()
    }
}

impl Oracle for SecretCode {
    fn guess(&mut self, candidate: &[u8]) -> i32 {
        self.queries += 1;
        if candidate.iter().any(|&b| Symbol::from_letter(b).is_none()) {
            return INVALID_SYMBOL;
        }
        if candidate.len() != self.secret.len() {
            return WRONG_LENGTH;
        }
        let matched = candidate
            .iter()
            .zip(self.secret.iter())
            .filter(|(c, s)| c == s)
            .count();
        if matched == self.secret.len() {
            info!("Number of guesses: {}", self.queries);
        }
        matched as i32
    }
    fn queries(&self) -> u64 {
        self.queries
    }
}
