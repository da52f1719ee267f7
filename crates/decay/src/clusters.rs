//! X-ray and Auger emission lines merged from comment tables
//!
//! Some evaluations tabulate the atomic emissions following a decay in the
//! comments of the data set, for example:
//!
//! ```text
//! 221FR T        10.38-17.799       18.7     9     XL (total)
//! 221FR T        10.38                             XLL
//! 221FR T        96.815         |]                 XKB3
//! 221FR T        97.474         |]  0.57     5     XKB1
//! 221FR T        98.069         |]                 XKB5II
//! ```
//!
//! Lines are grouped into clusters by their label (`XK*`, `XL*`, Auger K,
//! and Auger L). Within a cluster, every line with its own intensity becomes
//! an emission line and any total is ignored. A total is only used when none
//! of the individual lines have an intensity, in which case the midpoint of
//! its energy range is used.

// standard library
use std::collections::BTreeMap;

// internal modules
use crate::records::{Comment, SIGNIFICANCE_THRESHOLD};

// external crates
use log::{debug, trace};
use serde::Serialize;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::opt;
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use nom::IResult;

/// Parallel energy and intensity sequences for a set of emission lines
///
/// Energies are in keV and intensities are per disintegration.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EmissionLines {
    /// Line energies (keV)
    pub energies: Vec<f64>,
    /// Line intensities per disintegration
    pub intensities: Vec<f64>,
}

impl EmissionLines {
    /// Add a line, ignoring anything below the significance threshold
    pub fn push(&mut self, energy: f64, intensity: f64) {
        if intensity < SIGNIFICANCE_THRESHOLD {
            trace!("Dropped negligible line at {energy} keV ({intensity:e})");
            return;
        }
        self.energies.push(energy);
        self.intensities.push(intensity);
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// True if there are no lines
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Iterate over (energy, intensity) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.energies
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// Total intensity of every line
    pub fn total_intensity(&self) -> f64 {
        self.intensities.iter().sum()
    }
}

/// Groups of related atomic emission lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cluster {
    XrayK,
    XrayL,
    AugerK,
    AugerL,
}

impl Cluster {
    /// Cluster of a comment line label, if any
    ///
    /// ```rust
    /// # use ensdf_decay::Cluster;
    /// assert_eq!(Cluster::from_label("XKB1"), Some(Cluster::XrayK));
    /// assert_eq!(Cluster::from_label("XL (total)"), Some(Cluster::XrayL));
    /// assert_eq!(Cluster::from_label("KLX"), Some(Cluster::AugerK));
    /// assert_eq!(Cluster::from_label("Auger L"), Some(Cluster::AugerL));
    /// assert_eq!(Cluster::from_label("Gamma"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_uppercase();

        if starts_with_any(&label, &["XK"]) {
            Some(Self::XrayK)
        } else if starts_with_any(&label, &["XL"]) {
            Some(Self::XrayL)
        } else if starts_with_any(&label, &["KLL", "KLX", "KXY", "AUGER K"]) {
            Some(Self::AugerK)
        } else if starts_with_any(&label, &["LMM", "LMX", "LXY", "AUGER L"]) {
            Some(Self::AugerL)
        } else {
            None
        }
    }

    /// True for fluorescence, false for Auger electrons
    pub fn is_xray(&self) -> bool {
        matches!(self, Self::XrayK | Self::XrayL)
    }
}

fn starts_with_any(label: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| label.starts_with(prefix))
}

/// Single tabulated line from a comment
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommentLine {
    pub(crate) energy: f64,
    pub(crate) intensity: Option<f64>,
    pub(crate) label: String,
}

impl CommentLine {
    /// Parse the text of a comment, `None` for anything that is not a line
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let (_, line) = comment_line(text).ok()?;
        Some(line)
    }

    fn is_total(&self) -> bool {
        let label = self.label.trim().to_uppercase();
        label.contains("TOTAL") || label == "AUGER K" || label == "AUGER L"
    }
}

/// Merge the X-ray and Auger lines of every comment, returning both
///
/// Each comment block is clustered on its own, and the results appended in
/// comment order.
pub fn cluster_comments<'a>(
    comments: impl IntoIterator<Item = &'a Comment>,
) -> (EmissionLines, EmissionLines) {
    let mut xray = EmissionLines::default();
    let mut auger = EmissionLines::default();

    for comment in comments {
        let mut clusters: BTreeMap<Cluster, Vec<CommentLine>> = BTreeMap::new();

        for text in &comment.text {
            let Some(line) = CommentLine::parse(text) else {
                continue;
            };
            if let Some(cluster) = Cluster::from_label(&line.label) {
                trace!("{cluster:?} line: {line:?}");
                clusters.entry(cluster).or_default().push(line);
            }
        }

        for (cluster, lines) in clusters {
            let target = match cluster.is_xray() {
                true => &mut xray,
                false => &mut auger,
            };
            for (energy, intensity) in merge_cluster(&lines) {
                debug!("{cluster:?} emission at {energy} keV, intensity {intensity:e}");
                target.push(energy, intensity);
            }
        }
    }

    (xray, auger)
}

/// Resolve the lines of one cluster into (energy, intensity) pairs
///
/// Intensities are given per 100 disintegrations, and converted here.
fn merge_cluster(lines: &[CommentLine]) -> Vec<(f64, f64)> {
    let individual = lines
        .iter()
        .filter(|line| !line.is_total())
        .filter_map(|line| line.intensity.map(|i| (line.energy, i / 100.0)))
        .collect::<Vec<_>>();

    if !individual.is_empty() {
        return individual;
    }

    lines
        .iter()
        .filter(|line| line.is_total())
        .filter_map(|line| line.intensity.map(|i| (line.energy, i / 100.0)))
        .take(1)
        .collect()
}

/// Energy or energy range, optional bracket, intensity, uncertainty, label
fn comment_line(i: &str) -> IResult<&str, CommentLine> {
    let (i, _) = space0(i)?;
    let (i, energy) = energy_field(i)?;
    let (i, _) = opt(preceded(space0, bracket))(i)?;
    let (i, intensity) = opt(preceded(space1, double))(i)?;
    let (i, _) = match intensity {
        Some(_) => opt(preceded(space1, digit1))(i)?,
        None => (i, None),
    };

    Ok((
        "",
        CommentLine {
            energy,
            intensity: intensity.filter(|v| v.is_finite()),
            label: i.trim().to_string(),
        },
    ))
}

/// Single energy, or the midpoint of a range `a-b`
fn energy_field(i: &str) -> IResult<&str, f64> {
    let (i, low) = double(i)?;
    let (i, high) = opt(preceded(tuple((space0, char('-'), space0)), double))(i)?;
    Ok((i, high.map_or(low, |high| 0.5 * (low + high))))
}

/// Bracket markers grouping lines together
fn bracket(i: &str) -> IResult<&str, &str> {
    alt((tag("|]"), tag("|"), tag("]"), tag("}")))(i)
}
