//! Atomic shells that can hold an initial vacancy

// internal modules
use crate::error::{Error, Result};

// external crates
use serde::Serialize;

/// Atomic shell of an initial vacancy
///
/// Sub-shells are only resolved for L, matching the level of detail that
/// ENSDF provides for conversion coefficients. Outer shells are averaged.
///
/// The discriminant is the index used throughout for per-shell data, so the
/// K shell is always index `0`.
///
/// ```rust
/// # use ensdf_relax::Shell;
/// # use std::str::FromStr;
/// assert_eq!(Shell::from_str("l2").unwrap(), Shell::L2);
/// assert_eq!(Shell::try_from(0).unwrap(), Shell::K);
/// assert_eq!(Shell::M.index(), 4);
/// ```
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Shell {
    K = 0,
    L1 = 1,
    L2 = 2,
    L3 = 3,
    M = 4,
    N = 5,
}

impl Shell {
    /// Every shell in index order
    pub const ALL: [Shell; 6] = [
        Shell::K,
        Shell::L1,
        Shell::L2,
        Shell::L3,
        Shell::M,
        Shell::N,
    ];

    /// Index into per-shell data
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<usize> for Shell {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Shell::ALL
            .get(index)
            .copied()
            .ok_or(Error::ShellIndexOutOfRange(index))
    }
}

impl std::str::FromStr for Shell {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "K" => Ok(Shell::K),
            "L1" => Ok(Shell::L1),
            "L2" => Ok(Shell::L2),
            "L3" => Ok(Shell::L3),
            "M" | "M+" => Ok(Shell::M),
            "N" | "N+" => Ok(Shell::N),
            _ => Err(Error::FailedToInferShell(s.to_string())),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Shell::K => "K",
            Shell::L1 => "L1",
            Shell::L2 => "L2",
            Shell::L3 => "L3",
            Shell::M => "M",
            Shell::N => "N",
        };
        write!(f, "{s}")
    }
}
