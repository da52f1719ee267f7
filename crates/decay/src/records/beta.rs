// standard library
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

// ensdf modules
use ensdf_relax::{
    AtomicContext, AtomicRelaxation, Cutoffs, Relax, RelaxationParticle, Shell, SpectrumTable,
};
use ensdf_utils::{f, ValueExt};

// internal modules
use crate::error::Result;
use crate::records::{endpoint_energy, Record};

// external crates
use rand::RngCore;
use serde::Serialize;

/// Beta decay variants
///
/// Both variants share the common [Beta] fields. Only the EC/Beta+ payload
/// can create an atomic vacancy, which is checked with
/// [Beta::relaxation()].
#[derive(Debug, Serialize)]
pub enum BetaKind {
    /// Beta- decay
    Minus,
    /// Electron capture and Beta+ decay
    Plus(PositronCapture),
}

/// Electron capture and positron branch of an EC/Beta+ record
///
/// | Field | Columns |
/// | ----- | ------- |
/// | IB    | 22-29   |
/// | DIB   | 30-31   |
/// | IE    | 32-39   |
/// | DIE   | 40-41   |
/// | TI    | 65-74   |
///
/// Capture fractions by shell come from the `CK=`, `CL=`, `CM+=` and `CN+=`
/// continuation records.
#[derive(Debug, Serialize)]
pub struct PositronCapture {
    /// Positron emission intensity
    pub positron_intensity: f64,
    /// Uncertainty on the positron intensity
    pub positron_uncertainty: f64,
    /// Electron capture intensity
    pub capture_intensity: f64,
    /// Uncertainty on the electron capture intensity
    pub capture_uncertainty: f64,
    /// Raw total intensity (TI), used when IB and IE are both blank
    pub total_intensity: f64,
    /// Fraction of captures from the K, L, M, and N+ shells
    pub shell_fractions: [f64; 4],
    /// Capture intensity from the K, L, M, and N+ shells
    pub shell_intensities: [f64; 4],
    #[serde(skip)]
    atomic: AtomicContext,
}

impl PositronCapture {
    fn new(record: &Record, generator: Option<Arc<dyn AtomicRelaxation>>) -> Self {
        let fields = record.fields();

        let cm = match fields.has_tag("CM+=") {
            true => fields.tagged("CM+=", "$"),
            false => fields.tagged("CM=", "$"),
        };
        let cn = match fields.has_tag("CN+=") {
            true => fields.tagged("CN+=", "$"),
            false => fields.tagged("CN=", "$"),
        };

        Self {
            positron_intensity: fields.number(22, 29),
            positron_uncertainty: fields.uncertainty((22, 29), (30, 31)),
            capture_intensity: fields.number(32, 39),
            capture_uncertainty: fields.uncertainty((32, 39), (40, 41)),
            total_intensity: fields.number(65, 74),
            shell_fractions: [fields.tagged("CK=", "$"), fields.tagged("CL=", "$"), cm, cn],
            shell_intensities: [0.0; 4],
            atomic: AtomicContext::new(record.z(), generator),
        }
    }

    /// Set normalised positron and capture intensities
    ///
    /// Per-shell capture intensities follow from the shell fractions.
    pub fn set_intensities(&mut self, positron: f64, capture: f64) {
        self.positron_intensity = positron.max(0.0);
        self.capture_intensity = capture.max(0.0);
        for (intensity, fraction) in self
            .shell_intensities
            .iter_mut()
            .zip(self.shell_fractions.iter())
        {
            *intensity = self.capture_intensity * fraction;
        }
    }

    /// Atomic number of the daughter
    pub fn z(&self) -> u8 {
        self.atomic.z
    }
}

impl Relax for PositronCapture {
    fn relax(
        &self,
        shell: Shell,
        cutoffs: Cutoffs,
        rng: &mut dyn RngCore,
        deposited: &mut f64,
        particles: &mut Vec<RelaxationParticle>,
    ) {
        self.atomic
            .relax(shell, cutoffs, rng, deposited, particles)
    }

    fn relaxations(&self) -> u64 {
        self.atomic.relaxations()
    }
}

/// Beta- or EC/Beta+ emission
///
/// | Field | Columns |
/// | ----- | ------- |
/// | E     | 10-19   |
/// | DE    | 20-21   |
/// | IB    | 22-29   |
/// | DIB   | 30-31   |
/// | UN    | 78-79   |
///
/// The intensity is the total for the branch, which for EC/Beta+ is the sum
/// of positron emission and electron capture.
#[derive(Debug, Serialize)]
pub struct Beta {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Beta- or EC/Beta+
    pub kind: BetaKind,
    /// Endpoint energy (keV)
    pub energy: f64,
    /// Uncertainty on the endpoint energy (keV)
    pub energy_uncertainty: f64,
    /// Total intensity of the branch
    pub intensity: f64,
    /// Uncertainty on the intensity
    pub intensity_uncertainty: f64,
    /// Charge of the emitted particle
    pub charge: i8,
    /// Mass number of the daughter
    pub mass: u16,
    /// Degree of unique forbiddenness, zero for allowed transitions
    pub forbiddenness: u8,
    #[serde(skip)]
    spectrum: OnceLock<Arc<dyn SpectrumTable>>,
    #[serde(skip)]
    sampled: AtomicU64,
}

impl Beta {
    /// Build a Beta- emission from its line block
    pub fn minus(record: Record) -> Self {
        Self::new(record, BetaKind::Minus, -1)
    }

    /// Build an EC/Beta+ emission from its line block
    pub fn plus(record: Record, generator: Option<Arc<dyn AtomicRelaxation>>) -> Self {
        let capture = PositronCapture::new(&record, generator);
        Self::new(record, BetaKind::Plus(capture), 1)
    }

    fn new(record: Record, kind: BetaKind, charge: i8) -> Self {
        let fields = record.fields();

        let intensity = match &kind {
            BetaKind::Minus => fields.number(22, 29),
            BetaKind::Plus(ec) => match ec.positron_intensity + ec.capture_intensity {
                sum if sum > 0.0 => sum,
                _ => ec.total_intensity,
            },
        };

        Self {
            energy: fields.number(10, 19),
            energy_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            intensity,
            intensity_uncertainty: fields.uncertainty((22, 29), (30, 31)),
            charge,
            mass: record.a(),
            forbiddenness: forbiddenness(&fields.text(78, 79)),
            kind,
            spectrum: OnceLock::new(),
            sampled: AtomicU64::new(0),
            record,
        }
    }

    /// True for Beta- emissions
    pub fn is_minus(&self) -> bool {
        matches!(self.kind, BetaKind::Minus)
    }

    /// True for EC/Beta+ emissions
    pub fn is_plus(&self) -> bool {
        matches!(self.kind, BetaKind::Plus(_))
    }

    /// The EC/Beta+ payload, if any
    pub fn positron_capture(&self) -> Option<&PositronCapture> {
        match &self.kind {
            BetaKind::Plus(ec) => Some(ec),
            BetaKind::Minus => None,
        }
    }

    /// Mutable EC/Beta+ payload, if any
    pub fn positron_capture_mut(&mut self) -> Option<&mut PositronCapture> {
        match &mut self.kind {
            BetaKind::Plus(ec) => Some(ec),
            BetaKind::Minus => None,
        }
    }

    /// Relaxation capability, only available for EC/Beta+
    pub fn relaxation(&self) -> Option<&dyn Relax> {
        self.positron_capture().map(|ec| ec as &dyn Relax)
    }

    /// Set the normalised total intensity of the branch
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity.max(0.0);
    }

    /// Fill a blank endpoint from the Q-value and the energies involved
    pub(crate) fn fill_endpoint(&mut self, q_value: f64, parent_energy: f64, level_energy: f64) {
        if self.energy == 0.0 {
            self.energy = endpoint_energy(q_value, parent_energy, level_energy, self.is_plus());
        }
    }

    /// Attach the sampling table for the continuous spectrum
    ///
    /// The table can only be set once. Returns false if one was already set.
    pub fn set_spectrum(&self, table: Arc<dyn SpectrumTable>) -> bool {
        self.spectrum.set(table).is_ok()
    }

    /// Sampling table for the continuous spectrum, if set
    pub fn spectrum(&self) -> Option<&Arc<dyn SpectrumTable>> {
        self.spectrum.get()
    }

    /// Sample an emission energy (keV) from the spectrum table
    ///
    /// Every call counts as a sampled emission. Returns `None` if no table has
    /// been attached.
    pub fn sample_energy(&self, rng: &mut dyn RngCore) -> Option<f64> {
        self.incr_sampled();
        self.spectrum.get().map(|table| table.sample(rng))
    }

    /// Count one sampled emission
    pub fn incr_sampled(&self) {
        self.sampled.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of sampled emissions so far
    pub fn sampled(&self) -> u64 {
        self.sampled.load(Ordering::Relaxed)
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Beta {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = if self.is_minus() { "Beta-" } else { "EC/Beta+" };
        let mut s = f!("{name}\n");
        s += &f!(
            "  Endpoint         {} +/- {} keV\n",
            self.energy,
            self.energy_uncertainty
        );
        s += &f!("  Intensity        {}\n", self.intensity.sci(5, 2));
        if let Some(ec) = self.positron_capture() {
            s += &f!("  Positron         {}\n", ec.positron_intensity.sci(5, 2));
            s += &f!("  Capture          {}\n", ec.capture_intensity.sci(5, 2));
        }
        s += &f!("  Forbiddenness    {}", self.forbiddenness);
        write!(f, "{s}")
    }
}

/// Degree of unique forbiddenness from the UN field, e.g. `1U`
fn forbiddenness(un: &str) -> u8 {
    let mut chars = un.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(digit), Some('U' | 'u')) => digit.to_digit(10).map_or(0, |d| d as u8),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{card, record};
    use crate::records::RecordType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[derive(Debug)]
    struct Flat(f64);

    impl SpectrumTable for Flat {
        fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
            self.0
        }
    }

    #[rstest]
    #[case("1U", 1)]
    #[case("2U", 2)]
    #[case("1 ", 0)]
    #[case("", 0)]
    #[case("XU", 0)]
    fn unique_forbiddenness(#[case] un: &str, #[case] expected: u8) {
        assert_eq!(forbiddenness(un), expected);
    }

    #[test]
    fn beta_minus() {
        let lines = vec![card(&[
            (1, " 60NI"),
            (8, "B"),
            (10, "317.05"),
            (20, "10"),
            (22, "99.88"),
            (30, "3"),
            (78, "1U"),
        ])];
        let beta = Beta::minus(record(RecordType::BetaMinus, &lines));

        assert!(beta.is_minus());
        assert!(beta.relaxation().is_none());
        assert_eq!(beta.energy, 317.05);
        assert!((beta.energy_uncertainty - 0.10).abs() < 1e-12);
        assert_eq!(beta.intensity, 99.88);
        assert_eq!((beta.charge, beta.mass, beta.forbiddenness), (-1, 60, 1));
    }

    #[test]
    fn positron_capture() {
        let lines = vec![
            card(&[
                (1, " 22NE"),
                (8, "E"),
                (10, "545.7"),
                (22, "90.3"),
                (32, "9.6"),
                (65, "99.9"),
            ]),
            card(&[
                (1, " 22NE"),
                (6, "S"),
                (8, "E"),
                (10, "CK=0.9$CL=0.08$CM+=0.02"),
            ]),
        ];
        let mut beta = Beta::plus(record(RecordType::BetaPlus, &lines), None);

        assert!(beta.is_plus());
        assert!(beta.relaxation().is_some());
        assert_eq!(beta.charge, 1);
        assert!((beta.intensity - 99.9).abs() < 1e-12);

        let ec = beta.positron_capture_mut().unwrap();
        assert_eq!(ec.z(), 10);
        assert_eq!(ec.shell_fractions, [0.9, 0.08, 0.02, 0.0]);

        ec.set_intensities(0.903, 0.096);
        assert!((ec.shell_intensities[0] - 0.0864).abs() < 1e-12);
        assert!((ec.shell_intensities[1] - 0.00768).abs() < 1e-12);
    }

    #[test]
    fn blank_endpoint() {
        let lines = vec![card(&[(1, " 60NI"), (8, "B"), (22, "0.12")])];
        let mut beta = Beta::minus(record(RecordType::BetaMinus, &lines));

        beta.fill_endpoint(2822.81, 0.0, 1332.514);
        assert!((beta.energy - 1490.296).abs() < 1e-9);

        // only blank endpoints are filled
        beta.fill_endpoint(0.0, 0.0, 0.0);
        assert!((beta.energy - 1490.296).abs() < 1e-9);
    }

    #[test]
    fn spectrum_sampling() {
        let lines = vec![card(&[(1, " 60NI"), (8, "B"), (10, "317.05")])];
        let beta = Beta::minus(record(RecordType::BetaMinus, &lines));
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(beta.sample_energy(&mut rng), None);
        assert!(beta.set_spectrum(Arc::new(Flat(95.8))));
        assert!(!beta.set_spectrum(Arc::new(Flat(1.0))));
        assert_eq!(beta.sample_energy(&mut rng), Some(95.8));
        assert_eq!(beta.sampled(), 2);
    }
}
