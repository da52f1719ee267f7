//! Nuclide identifiers and element data

// ensdf modules
use ensdf_utils::{f, StringExt};

// internal modules
use crate::error::{Error, Result};

// external crates
use log::warn;
use serde::Serialize;

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{alpha1, one_of, space0, u16 as mass_number, u8 as isomer_number};
use nom::combinator::{all_consuming, opt};
use nom::IResult;

/// Element symbols indexed by atomic number minus one
const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Atomic number for an element symbol, case-insensitive
///
/// ```rust
/// # use ensdf_decay::atomic_number;
/// assert_eq!(atomic_number("Co"), Some(27));
/// assert_eq!(atomic_number("NI"), Some(28));
/// assert_eq!(atomic_number("Xx"), None);
/// ```
pub fn atomic_number(symbol: &str) -> Option<u8> {
    let symbol = symbol.trim();
    ELEMENTS
        .iter()
        .position(|e| e.eq_ignore_ascii_case(symbol))
        .map(|idx| idx as u8 + 1)
}

/// Element symbol for an atomic number
pub fn element_symbol(z: u8) -> Option<&'static str> {
    ELEMENTS.get((z as usize).checked_sub(1)?).copied()
}

/// Variants of excited states
///
/// A nuclide can either be in the ground state, or some excited state, using
/// the ENSDF notation where `m1` is the first excited state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IsomerState {
    #[default]
    Ground,
    Excited(u8),
}

impl std::fmt::Display for IsomerState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IsomerState::Ground => Ok(()),
            IsomerState::Excited(1) => write!(f, "m"),
            IsomerState::Excited(e) => write!(f, "m{e}"),
        }
    }
}

/// A radionuclide identifier
///
/// The `FromStr` trait is implemented and accepts most of the common ways of
/// writing a nuclide name:
///
/// - Element then mass: `Co60`, `co-60`, `Co_60`
/// - Mass then element: `60Co`, `60CO`
/// - Metastable states: `Tc99m`, `Am242m1`, `Tc-99m`
///
/// ```rust
/// # use ensdf_decay::{Nuclide, IsomerState};
/// # use std::str::FromStr;
/// let nuclide = Nuclide::from_str("tc-99m").unwrap();
///
/// assert_eq!(nuclide.symbol, "Tc");
/// assert_eq!(nuclide.z, 43);
/// assert_eq!(nuclide.mass, 99);
/// assert_eq!(nuclide.state, IsomerState::Excited(1));
/// assert_eq!(nuclide.name(), "Tc99m");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Nuclide {
    /// Element symbol with the usual capitalisation
    pub symbol: String,
    /// Atomic number
    pub z: u8,
    /// Mass number (Z+N, total nucleons)
    pub mass: u16,
    /// Excited state status
    pub state: IsomerState,
}

impl Nuclide {
    /// A name for the nuclide with consistent formatting
    ///
    /// Formatted as `<element><mass><state>`, which is also the file stem
    /// expected for per-nuclide data files.
    pub fn name(&self) -> String {
        f!("{}{}{}", self.symbol, self.mass, self.state)
    }

    /// Parse a NUCID from columns 1-5 of an ENSDF record
    ///
    /// Returns `None` for anything that does not look like a mass number
    /// followed by a known element.
    ///
    /// ```rust
    /// # use ensdf_decay::Nuclide;
    /// let nuclide = Nuclide::from_nucid(" 60NI").unwrap();
    /// assert_eq!((nuclide.z, nuclide.mass), (28, 60));
    ///
    /// assert!(Nuclide::from_nucid("     ").is_none());
    /// ```
    pub fn from_nucid(nucid: &str) -> Option<Nuclide> {
        let (_, (mass, symbol)) = mass_then_element(nucid.trim()).ok()?;
        let z = atomic_number(symbol)?;
        Some(Nuclide {
            symbol: symbol.capitalise(),
            z,
            mass,
            state: IsomerState::Ground,
        })
    }
}

impl std::str::FromStr for Nuclide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (symbol, mass, state)) = all_consuming(nuclide_name)(s.trim())
            .map_err(|_| Error::ParseError(f!("could not interpret \"{s}\" as a nuclide")))?;

        let z = atomic_number(symbol).ok_or_else(|| Error::UnknownElement(symbol.to_string()))?;

        Ok(Nuclide {
            symbol: symbol.capitalise(),
            z,
            mass,
            state,
        })
    }
}

impl std::fmt::Display for Nuclide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Either ordering of element and mass, with an optional isomer tag
fn nuclide_name(i: &str) -> IResult<&str, (&str, u16, IsomerState)> {
    alt((element_first, mass_first))(i)
}

fn element_first(i: &str) -> IResult<&str, (&str, u16, IsomerState)> {
    let (i, symbol) = element(i)?;
    let (i, _) = opt(one_of("_- "))(i)?;
    let (i, mass) = mass_number(i)?;
    let (i, state) = metastable(i)?;
    Ok((i, (symbol, mass, state)))
}

fn mass_first(i: &str) -> IResult<&str, (&str, u16, IsomerState)> {
    let (i, mass) = mass_number(i)?;
    let (i, _) = opt(one_of("_- "))(i)?;
    let (i, symbol) = element(i)?;
    Ok((i, (symbol, mass, IsomerState::Ground)))
}

/// NUCID layout of a right-justified mass number then the element
fn mass_then_element(i: &str) -> IResult<&str, (u16, &str)> {
    let (i, mass) = mass_number(i)?;
    let (i, _) = space0(i)?;
    let (i, symbol) = alpha1(i)?;
    Ok((i, (mass, symbol)))
}

/// One or two letter element symbol
///
/// Metastable tags directly follow the mass number, so there is no ambiguity
/// in taking every leading letter here.
fn element(i: &str) -> IResult<&str, &str> {
    let (rest, symbol) = alpha1(i)?;
    if symbol.len() > 2 {
        Err(nom::Err::Error(nom::error::Error::new(
            i,
            nom::error::ErrorKind::Fail,
        )))
    } else {
        Ok((rest, symbol))
    }
}

/// Isomer state from `m`, `m1`, `m2`, ..., or nothing for the ground state
fn metastable(i: &str) -> IResult<&str, IsomerState> {
    let (i, tag) = opt(one_of("mMgG"))(i)?;
    let (i, number) = opt(isomer_number)(i)?;

    let state = match (tag, number) {
        (None, _) | (Some('g' | 'G'), _) => IsomerState::Ground,
        (Some(_), None) => IsomerState::Excited(1),
        (Some(_), Some(0)) => {
            warn!("Isomer state m0 interpreted as the ground state");
            IsomerState::Ground
        }
        (Some(_), Some(n)) => IsomerState::Excited(n),
    };

    Ok((i, state))
}
