//! Deduce a hidden code over the alphabet `BACXIU` from an oracle that only
//! reports how many positions of a guess are exactly right.
//!
//! A solve runs in phases:
//!
//! 1. probe uniform guesses of growing length until the oracle stops
//!    reporting a length mismatch ([`profile::discover_length`]);
//! 2. count every symbol with uniform guesses ([`profile::profile`]);
//! 3. fill the code with the most frequent symbol and fix one position at a
//!    time from the change in score ([`resolve::PositionResolver`]);
//! 4. if that stalls, search arrangements of the counted symbols
//!    ([`arrange::arrange`]).
//!
//! ```
//! use perf_mastermind::{solve, Oracle, SecretCode};
//!
//! let mut oracle = SecretCode::new("ABIXCIABCX").unwrap();
//! let found = solve(&mut oracle).unwrap();
//! assert_eq!(found.to_string(), "ABIXCIABCX");
//! assert!(oracle.queries() < 60);
//! ```

pub mod alphabet;
pub mod arrange;
pub mod error;
pub mod oracle;
pub mod profile;
pub mod resolve;
pub mod session;
pub mod solver;

pub use alphabet::{Code, Symbol, ALPHABET_SIZE, MAX_LEN};
pub use error::{Error, Result};
pub use oracle::{Feedback, Oracle, SecretCode};
pub use resolve::{BaselineChoice, CandidateOrder};
pub use solver::{solve, FallbackTrigger, Solver, SolverConfig};
