use crate::constants::{MAX_NUMBER_OF_VOTE_OPTIONS, MAX_SMT_LEVEL, MIN_SMT_LEVEL, SMT_LEVEL};
use crate::group::CurveKind;
use crate::Error;
use std::env::var;

pub const CURVE_VAR: &str = "PRIVATE_VOTING_CURVE";
pub const TREE_DEPTH_VAR: &str = "PRIVATE_VOTING_TREE_DEPTH";
pub const MAX_VOTE_OPTIONS_VAR: &str = "PRIVATE_VOTING_MAX_VOTE_OPTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub curve: CurveKind,
    pub tree_depth: usize,
    pub max_vote_options: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            curve: CurveKind::BabyJub,
            tree_depth: SMT_LEVEL,
            max_vote_options: MAX_NUMBER_OF_VOTE_OPTIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| var(name).ok())
    }

    /// Build a config from any variable lookup. Unset variables take their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let curve = match lookup(CURVE_VAR) {
            Some(val) => val.parse()?,
            None => defaults.curve,
        };

        let tree_depth = match lookup(TREE_DEPTH_VAR) {
            Some(val) => parse_number(TREE_DEPTH_VAR, &val)?,
            None => defaults.tree_depth,
        };
        if !(MIN_SMT_LEVEL..=MAX_SMT_LEVEL).contains(&tree_depth) {
            return Err(Error::Config(format!(
                "{} must be between {} and {}, found {}",
                TREE_DEPTH_VAR, MIN_SMT_LEVEL, MAX_SMT_LEVEL, tree_depth
            )));
        }

        let max_vote_options = match lookup(MAX_VOTE_OPTIONS_VAR) {
            Some(val) => parse_number(MAX_VOTE_OPTIONS_VAR, &val)?,
            None => defaults.max_vote_options,
        };
        if max_vote_options == 0 || max_vote_options > MAX_NUMBER_OF_VOTE_OPTIONS {
            return Err(Error::Config(format!(
                "{} must be between 1 and {}, found {}",
                MAX_VOTE_OPTIONS_VAR, MAX_NUMBER_OF_VOTE_OPTIONS, max_vote_options
            )));
        }

        Ok(Config {
            curve,
            tree_depth,
            max_vote_options,
        })
    }
}

fn parse_number(name: &str, value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} is not a number: {}", name, value)))
}
