// ensdf modules
use ensdf_utils::{f, ValueExt};

// internal modules
use crate::decoder::{parse_number, parse_uncertainty};
use crate::error::Result;
use crate::records::Record;

// external crates
use serde::Serialize;

/// Parent nuclide of the decay
///
/// | Field | Columns |
/// | ----- | ------- |
/// | E     | 10-19   |
/// | J     | 22-39   |
/// | T     | 40-49   |
/// | DT    | 50-55   |
/// | QP    | 65-74   |
/// | DQP   | 75-76   |
#[derive(Debug, Clone, Serialize)]
pub struct Parent {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Atomic number
    pub z: u8,
    /// Mass number
    pub a: u16,
    /// Energy of the decaying level (keV)
    pub energy: f64,
    /// Uncertainty on the level energy (keV)
    pub energy_uncertainty: f64,
    /// Spin and parity
    pub spin_parity: String,
    /// Half-life (s)
    pub half_life: f64,
    /// Uncertainty on the half-life (s)
    pub half_life_uncertainty: f64,
    /// Ground state Q-value (keV)
    pub q_value: f64,
    /// Uncertainty on the Q-value (keV)
    pub q_uncertainty: f64,
}

impl Parent {
    /// Build from a parent line block
    pub fn new(record: Record) -> Self {
        let fields = record.fields();

        let half_life = fields.half_life(40, 49);
        let half_life_text = fields.text(40, 49);
        let half_life_value = parse_number(&half_life_text);
        let half_life_uncertainty = if half_life_value > 0.0 && half_life.is_finite() {
            parse_uncertainty(&half_life_text, &fields.text(50, 55)) * half_life / half_life_value
        } else {
            0.0
        };

        Self {
            z: record.z(),
            a: record.a(),
            energy: fields.number(10, 19),
            energy_uncertainty: fields.uncertainty((10, 19), (20, 21)),
            spin_parity: fields.text(22, 39),
            half_life,
            half_life_uncertainty,
            q_value: fields.number(65, 74),
            q_uncertainty: fields.uncertainty((65, 74), (75, 76)),
            record,
        }
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Parent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Parent\n".to_string();
        s += &f!("  Nuclide          {}\n", self.record.nucid.trim());
        s += &f!(
            "  Energy           {} +/- {} keV\n",
            self.energy,
            self.energy_uncertainty
        );
        s += &f!("  Spin parity      {}\n", self.spin_parity);
        s += &f!(
            "  Half life        {} +/- {} s\n",
            self.half_life.sci(5, 2),
            self.half_life_uncertainty.sci(2, 2)
        );
        s += &f!(
            "  Q value          {} +/- {} keV",
            self.q_value,
            self.q_uncertainty
        );
        write!(f, "{s}")
    }
}
