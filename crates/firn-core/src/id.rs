//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one member of a simulation ensemble.
///
/// Members are registered in a fixed order when an ensemble stack is
/// assembled; `MemberId(n)` corresponds to the n-th experiment in that
/// stack. The id survives resampling, so downstream reporting can map
/// draws back to the originating run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MemberId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
