#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuzzy address matching between survey rows and heritage inventory
//! candidates.
//!
//! Both sides are reduced to a [`MatchTarget`] (normalized address/name
//! text, a token set, an extracted house number) and compared with an
//! additive integer score. The score is deliberately not normalized by
//! string length; long addresses sharing many common tokens score higher
//! and that is accepted behavior.

pub mod normalize;
pub mod score;

pub use normalize::{MatchTarget, house_number, normalize, tokenize};
pub use score::{MatchThresholds, score};
