#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod accumulator;
mod babyjub;
mod config;
mod context;
mod ecdh;
mod error;
mod field;
mod group;
mod keys;
mod secp256k1;
mod signals;
mod smt;
mod store;
mod tally;
mod ticket;
mod util;
mod vote;
mod voting_power;

pub mod constants;

pub use accumulator::*;
pub use babyjub::*;
pub use config::*;
pub use constants::*;
pub use context::*;
pub use ecdh::*;
pub use error::*;
pub use field::*;
pub use group::*;
pub use keys::*;
pub use secp256k1::*;
pub use signals::*;
pub use smt::*;
pub use store::*;
pub use tally::*;
pub use ticket::*;
pub use util::*;
pub use vote::*;
pub use voting_power::*;

#[cfg(test)]
mod tests;
