//! The decay scheme of a single radionuclide

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ensdf modules
use ensdf_utils::{f, OptionExt, ValueExt};

// internal modules
use crate::arena::{Arena, Handle};
use crate::clusters::{cluster_comments, EmissionLines};
use crate::error::{Error, Result};
use crate::normalise::normalise;
use crate::nuclide::Nuclide;
use crate::options::{Options, RelaxationMode};
use crate::reader::{group_blocks, SchemeBuilder};
use crate::records::{
    Alpha, Beta, Comment, EmissionId, Gamma, Level, Normalisation, Parent, RecordId,
    SIGNIFICANCE_THRESHOLD,
};
use crate::relation::Relation;

// external crates
use log::{debug, info};
use serde::Serialize;

/// Linked and normalised decay data for one radionuclide
///
/// Built once from an ENSDF file, after which the structure is read-only.
/// Only the sampling counters of individual records change, and those are
/// atomic, so a scheme may be shared between threads for sampling.
///
/// # Structure
///
/// Records are stored by type and referenced by [Handle]. Every emission is
/// a member of exactly one parent, one normalisation, and one level at the
/// same time:
///
/// - the parent that decays
/// - the normalisation that makes its intensity absolute
/// - the level it feeds (beta, alpha) or de-excites (gamma)
///
/// Gamma transitions are also linked to the level they end on, when one can
/// be found.
///
/// # Exported lists
///
/// The per-type emission lists only include emissions with a probability of
/// at least 1e-10 per disintegration. Everything is still available through
/// [records()](DecayScheme::records) and the handle iterators.
///
/// ```rust
/// # use ensdf_decay::{DecayScheme, Options, RelaxationMode};
/// let options = Options::builder()
///     .path("./data/Co60.txt")
///     .relaxation(RelaxationMode::None)
///     .build();
///
/// let scheme = DecayScheme::read("Co60", options).unwrap();
///
/// for gamma in scheme.gamma_records() {
///     println!("{} keV {:.4}", gamma.energy, gamma.gamma_intensity);
/// }
///
/// assert!(scheme.decay_discrepancy() < 0.01);
/// ```
#[derive(Debug, Default)]
pub struct DecayScheme {
    nuclide: Nuclide,
    relaxation: RelaxationMode,
    decay_discrepancy: f64,
    xray: EmissionLines,
    auger: EmissionLines,

    // every record in file order
    pub(crate) records: Vec<RecordId>,

    // storage
    pub(crate) comments: Arena<Comment>,
    pub(crate) parents: Arena<Parent>,
    pub(crate) normalisations: Arena<Normalisation>,
    pub(crate) levels: Arena<Level>,
    pub(crate) betas: Arena<Beta>,
    pub(crate) alphas: Arena<Alpha>,
    pub(crate) gammas: Arena<Gamma>,

    // composite emission membership
    pub(crate) parent_links: Relation<Handle<Parent>, EmissionId>,
    pub(crate) normalisation_links: Relation<Handle<Normalisation>, EmissionId>,
    pub(crate) level_links: Relation<Handle<Level>, EmissionId>,

    // structure of the data sets
    pub(crate) parent_normalisations: Relation<Handle<Parent>, Handle<Normalisation>>,
    pub(crate) normalisation_levels: Relation<Handle<Normalisation>, Handle<Level>>,

    // gamma transitions by the level they end on
    pub(crate) sink_links: Relation<Handle<Level>, Handle<Gamma>>,
}

impl DecayScheme {
    /// Read the decay scheme of a nuclide
    ///
    /// The file is the explicit path in the options if provided, otherwise
    /// the default per-nuclide file (see [Options::file_path()]).
    pub fn read(nuclide: &str, options: Options) -> Result<Self> {
        let nuclide = Nuclide::from_str(nuclide)?;
        let path = options.file_path(&nuclide);
        Self::read_file(nuclide, &path, &options)
    }

    /// Read a decay scheme from any ENSDF file
    ///
    /// The nuclide is taken from the file name if possible (e.g. `Co60.txt`),
    /// and otherwise from the first parent record.
    pub fn from_file(path: impl AsRef<Path>, options: &Options) -> Result<Self> {
        let path = path.as_ref();
        let nuclide = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| Nuclide::from_str(stem).ok())
            .unwrap_or_default();
        Self::read_file(nuclide, path, options)
    }

    /// Build a decay scheme from anything buffered
    ///
    /// Lines are decoded lossily. A stray non-UTF-8 byte only degrades the
    /// field it appears in.
    pub fn from_reader(nuclide: Nuclide, reader: impl BufRead, options: &Options) -> Result<Self> {
        let lines = reader
            .split(b'\n')
            .map(|bytes| {
                bytes.map(|b| {
                    // one byte per column, so fields after a bad byte stay aligned
                    String::from_utf8_lossy(&b)
                        .trim_end_matches('\r')
                        .replace(char::REPLACEMENT_CHARACTER, "?")
                })
            })
            .collect::<std::io::Result<Vec<String>>>()?;
        Self::from_lines(nuclide, &lines, options)
    }

    /// Build a decay scheme from ENSDF lines
    pub fn from_lines<I, S>(nuclide: Nuclide, lines: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocks = group_blocks(lines);

        let mut scheme = DecayScheme {
            nuclide,
            relaxation: options.relaxation,
            ..Default::default()
        };

        let generator = match options.relaxation {
            RelaxationMode::Eadl => options.atomic_relaxation.clone(),
            _ => None,
        };

        SchemeBuilder::new(&mut scheme, generator).build(blocks)?;

        if scheme.nuclide.z == 0 {
            if let Some(parent) = scheme.parents.values().next() {
                scheme.nuclide = parent.record.nuclide().unwrap_or_default();
            }
        }

        scheme.decay_discrepancy = normalise(&mut scheme, options.allow_multi_transition);

        if options.relaxation == RelaxationMode::Ensdf {
            let (xray, auger) = cluster_comments(scheme.comments.values());
            scheme.xray = xray;
            scheme.auger = auger;
        }

        scheme.log_summary(options.verbosity);
        Ok(scheme)
    }

    fn read_file(nuclide: Nuclide, path: &Path, options: &Options) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        if options.verbosity > 0 {
            info!("Reading {}", path.display());
        }

        let reader = BufReader::new(File::open(path)?);
        let scheme = Self::from_reader(nuclide, reader, options)?;

        if scheme.records.is_empty() {
            return Err(Error::EmptyFile {
                path: PathBuf::from(path),
            });
        }

        Ok(scheme)
    }

    fn log_summary(&self, verbosity: usize) {
        if verbosity == 0 {
            return;
        }

        info!("{self}");

        if verbosity > 1 {
            for (handle, gamma) in self.gammas.iter() {
                let sink = self
                    .sink_of(handle)
                    .and_then(|level| self.levels.get(level))
                    .map(|level| level.energy);
                debug!("{gamma}\n  Final level      {}", sink.display());
            }
            for (_, beta) in self.betas.iter() {
                debug!("{beta}");
            }
            for (_, alpha) in self.alphas.iter() {
                debug!("{alpha}");
            }
        }
    }

    /// Nuclide the scheme describes
    pub fn nuclide(&self) -> &Nuclide {
        &self.nuclide
    }

    /// Atomic number of the decaying nuclide
    pub fn z(&self) -> u8 {
        self.nuclide.z
    }

    /// Mass number of the decaying nuclide
    pub fn a(&self) -> u16 {
        self.nuclide.mass
    }

    /// Relaxation mode the scheme was built with
    pub fn relaxation_mode(&self) -> RelaxationMode {
        self.relaxation
    }

    /// Summed distance of every context's outgoing intensity from unity
    ///
    /// Always non-negative. This is purely diagnostic, large values suggest
    /// incomplete or inconsistent data.
    pub fn decay_discrepancy(&self) -> f64 {
        self.decay_discrepancy
    }

    /// Every record, in file order
    pub fn records(&self) -> &[RecordId] {
        &self.records
    }

    /// Comment records
    pub fn comment_records(&self) -> Vec<&Comment> {
        self.comments.values().collect()
    }

    /// Parent records
    pub fn parent_records(&self) -> Vec<&Parent> {
        self.parents.values().collect()
    }

    /// Normalisation records
    pub fn normalisation_records(&self) -> Vec<&Normalisation> {
        self.normalisations.values().collect()
    }

    /// Level records
    pub fn level_records(&self) -> Vec<&Level> {
        self.levels.values().collect()
    }

    /// Significant Beta- and EC/Beta+ emissions
    pub fn beta_records(&self) -> Vec<&Beta> {
        self.betas
            .values()
            .filter(|b| b.intensity >= SIGNIFICANCE_THRESHOLD)
            .collect()
    }

    /// Significant Beta- emissions
    pub fn beta_minus_records(&self) -> Vec<&Beta> {
        self.beta_records()
            .into_iter()
            .filter(|b| b.is_minus())
            .collect()
    }

    /// Significant EC/Beta+ emissions
    pub fn beta_plus_records(&self) -> Vec<&Beta> {
        self.beta_records()
            .into_iter()
            .filter(|b| b.is_plus())
            .collect()
    }

    /// Significant alpha emissions
    pub fn alpha_records(&self) -> Vec<&Alpha> {
        self.alphas
            .values()
            .filter(|a| a.intensity >= SIGNIFICANCE_THRESHOLD)
            .collect()
    }

    /// Significant gamma transitions
    pub fn gamma_records(&self) -> Vec<&Gamma> {
        self.significant_gammas().map(|(_, g)| g).collect()
    }

    /// Significant gamma transitions from metastable levels
    ///
    /// These are not correlated in time with the decay that populated the
    /// level, and are sampled separately.
    pub fn metastable_gamma_records(&self) -> Vec<&Gamma> {
        self.significant_gammas()
            .filter(|(h, _)| self.origin(*h).is_some_and(|l| l.is_metastable()))
            .map(|(_, g)| g)
            .collect()
    }

    /// Significant gamma transitions from levels that are never populated
    ///
    /// Metastable levels are excluded, so this never overlaps with
    /// [metastable_gamma_records()](DecayScheme::metastable_gamma_records).
    pub fn uncorrelated_gamma_records(&self) -> Vec<&Gamma> {
        self.significant_gammas()
            .filter(|(h, _)| {
                self.origin(*h)
                    .is_some_and(|l| !l.is_metastable() && !l.can_decay)
            })
            .map(|(_, g)| g)
            .collect()
    }

    fn significant_gammas(&self) -> impl Iterator<Item = (Handle<Gamma>, &Gamma)> {
        self.gammas
            .iter()
            .filter(|(_, g)| g.transition_intensity >= SIGNIFICANCE_THRESHOLD)
    }

    fn origin(&self, gamma: Handle<Gamma>) -> Option<&Level> {
        self.level_of(EmissionId::Gamma(gamma))
            .and_then(|h| self.levels.get(h))
    }

    /// X-ray lines from the comments, when built with `RelaxationMode::Ensdf`
    pub fn xray_lines(&self) -> &EmissionLines {
        &self.xray
    }

    /// Auger lines from the comments, when built with `RelaxationMode::Ensdf`
    pub fn auger_lines(&self) -> &EmissionLines {
        &self.auger
    }

    /// X-ray energies (keV)
    pub fn xray_energies(&self) -> &[f64] {
        &self.xray.energies
    }

    /// X-ray intensities per disintegration
    pub fn xray_intensities(&self) -> &[f64] {
        &self.xray.intensities
    }

    /// Auger electron energies (keV)
    pub fn auger_energies(&self) -> &[f64] {
        &self.auger.energies
    }

    /// Auger electron intensities per disintegration
    pub fn auger_intensities(&self) -> &[f64] {
        &self.auger.intensities
    }

    // * Handle based access

    /// Every parent with its handle
    pub fn parents(&self) -> impl Iterator<Item = (Handle<Parent>, &Parent)> {
        self.parents.iter()
    }

    /// Every normalisation with its handle
    pub fn normalisations(&self) -> impl Iterator<Item = (Handle<Normalisation>, &Normalisation)> {
        self.normalisations.iter()
    }

    /// Every level with its handle
    pub fn levels(&self) -> impl Iterator<Item = (Handle<Level>, &Level)> {
        self.levels.iter()
    }

    /// Every beta emission with its handle, regardless of intensity
    pub fn betas(&self) -> impl Iterator<Item = (Handle<Beta>, &Beta)> {
        self.betas.iter()
    }

    /// Every alpha emission with its handle, regardless of intensity
    pub fn alphas(&self) -> impl Iterator<Item = (Handle<Alpha>, &Alpha)> {
        self.alphas.iter()
    }

    /// Every gamma transition with its handle, regardless of intensity
    pub fn gammas(&self) -> impl Iterator<Item = (Handle<Gamma>, &Gamma)> {
        self.gammas.iter()
    }

    /// Look up a comment
    pub fn comment(&self, handle: Handle<Comment>) -> Option<&Comment> {
        self.comments.get(handle)
    }

    /// Look up a parent
    pub fn parent(&self, handle: Handle<Parent>) -> Option<&Parent> {
        self.parents.get(handle)
    }

    /// Look up a normalisation
    pub fn normalisation(&self, handle: Handle<Normalisation>) -> Option<&Normalisation> {
        self.normalisations.get(handle)
    }

    /// Look up a level
    pub fn level(&self, handle: Handle<Level>) -> Option<&Level> {
        self.levels.get(handle)
    }

    /// Look up a beta emission
    pub fn beta(&self, handle: Handle<Beta>) -> Option<&Beta> {
        self.betas.get(handle)
    }

    /// Look up an alpha emission
    pub fn alpha(&self, handle: Handle<Alpha>) -> Option<&Alpha> {
        self.alphas.get(handle)
    }

    /// Look up a gamma transition
    pub fn gamma(&self, handle: Handle<Gamma>) -> Option<&Gamma> {
        self.gammas.get(handle)
    }

    // * Relations

    /// Parent an emission belongs to
    pub fn parent_of(&self, emission: EmissionId) -> Option<Handle<Parent>> {
        self.parent_links.owner(emission)
    }

    /// Normalisation an emission belongs to
    pub fn normalisation_of(&self, emission: EmissionId) -> Option<Handle<Normalisation>> {
        self.normalisation_links.owner(emission)
    }

    /// Level an emission feeds (beta, alpha) or de-excites (gamma)
    pub fn level_of(&self, emission: EmissionId) -> Option<Handle<Level>> {
        self.level_links.owner(emission)
    }

    /// Level a gamma transition ends on, if it could be found
    pub fn sink_of(&self, gamma: Handle<Gamma>) -> Option<Handle<Level>> {
        self.sink_links.owner(gamma)
    }

    /// Emissions belonging to a level, in file order
    pub fn emissions_of_level(&self, level: Handle<Level>) -> &[EmissionId] {
        self.level_links.members(level)
    }

    /// Gamma transitions ending on a level
    pub fn gammas_into_level(&self, level: Handle<Level>) -> &[Handle<Gamma>] {
        self.sink_links.members(level)
    }

    /// Normalisations of a parent, in file order
    pub fn normalisations_of(&self, parent: Handle<Parent>) -> &[Handle<Normalisation>] {
        self.parent_normalisations.members(parent)
    }

    /// Emissions belonging to a normalisation context, in file order
    pub fn emissions_of_normalisation(&self, normalisation: Handle<Normalisation>) -> &[EmissionId] {
        self.normalisation_links.members(normalisation)
    }

    /// Levels of a normalisation context, in file order
    pub fn levels_of(&self, normalisation: Handle<Normalisation>) -> &[Handle<Level>] {
        self.normalisation_levels.members(normalisation)
    }

    /// Serialise a summary of the scheme to a JSON format string
    ///
    /// Includes every parent, normalisation, and level, the significant
    /// emissions, and any X-ray or Auger lines.
    pub fn summary_json(&self) -> Result<String> {
        let summary = Summary {
            nuclide: &self.nuclide,
            relaxation: self.relaxation.to_string(),
            decay_discrepancy: self.decay_discrepancy,
            parents: self.parent_records(),
            normalisations: self.normalisation_records(),
            levels: self.level_records(),
            betas: self.beta_records(),
            alphas: self.alpha_records(),
            gammas: self.gamma_records(),
            xray: &self.xray,
            auger: &self.auger,
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

impl std::fmt::Display for DecayScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Decay scheme for {}\n", self.nuclide);
        s += &f!("  Relaxation       {}\n", self.relaxation);
        s += &f!("  Records          {}\n", self.records.len());
        s += &f!("  Parents          {}\n", self.parents.len());
        s += &f!("  Normalisations   {}\n", self.normalisations.len());
        s += &f!("  Levels           {}\n", self.levels.len());
        s += &f!("  Beta-            {}\n", self.beta_minus_records().len());
        s += &f!("  EC/Beta+         {}\n", self.beta_plus_records().len());
        s += &f!("  Alphas           {}\n", self.alpha_records().len());
        s += &f!("  Gammas           {}\n", self.gamma_records().len());
        s += &f!("  X-ray lines      {}\n", self.xray.len());
        s += &f!("  Auger lines      {}\n", self.auger.len());
        s += &f!(
            "  Discrepancy      {}",
            self.decay_discrepancy.sci(5, 2)
        );
        write!(f, "{s}")
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    nuclide: &'a Nuclide,
    relaxation: String,
    decay_discrepancy: f64,
    parents: Vec<&'a Parent>,
    normalisations: Vec<&'a Normalisation>,
    levels: Vec<&'a Level>,
    betas: Vec<&'a Beta>,
    alphas: Vec<&'a Alpha>,
    gammas: Vec<&'a Gamma>,
    xray: &'a EmissionLines,
    auger: &'a EmissionLines,
}
