//! Conversion of relative intensities to probabilities per disintegration
//!
//! Intensities in ENSDF are relative, and each normalisation record carries
//! the multipliers that make them absolute (per 100 decays through the
//! branch). Every normalisation is treated as its own context:
//!
//! | Quantity   | Absolute intensity                                 |
//! | ---------- | -------------------------------------------------- |
//! | gamma      | RI x NR / 100                                      |
//! | transition | TI x NT / 100, or gamma x (1 + CC + IPC) if blank  |
//! | conversion | gamma x CC                                         |
//! | pair       | gamma x IPC                                        |
//! | beta/alpha | I x NB / 100                                       |
//! | positron   | IB x NB / 100                                      |
//! | capture    | IE x NB / 100                                      |
//!
//! The outgoing intensity of a context is the sum of its beta and alpha
//! branches. Pure gamma decays (e.g. isomeric transitions) use the
//! transitions out of levels that nothing else feeds instead. The distance of
//! that sum from 1 is added to the decay discrepancy, and the context is then
//! rescaled to sum to its branching ratio.

// standard library
use std::collections::BTreeSet;

// internal modules
use crate::arena::Handle;
use crate::records::{EmissionId, Gamma, Level, Normalisation};
use crate::scheme::DecayScheme;

// external crates
use log::debug;

/// Absolute intensities of a gamma transition before rescaling
#[derive(Debug, Default, Clone, Copy)]
struct GammaIntensities {
    gamma: f64,
    transition: f64,
    conversion: f64,
    pair: f64,
}

impl GammaIntensities {
    fn scaled(self, factor: f64) -> Self {
        Self {
            gamma: self.gamma * factor,
            transition: self.transition * factor,
            conversion: self.conversion * factor,
            pair: self.pair * factor,
        }
    }
}

/// Normalise every context and return the accumulated decay discrepancy
pub(crate) fn normalise(scheme: &mut DecayScheme, allow_multi_transition: bool) -> f64 {
    let contexts = scheme.normalisations.handles().collect::<Vec<_>>();

    let discrepancy: f64 = contexts
        .into_iter()
        .map(|context| normalise_context(scheme, context))
        .sum();

    accumulate_level_feeding(scheme);
    assign_multi_transition_probs(scheme, allow_multi_transition);

    discrepancy
}

/// Rescale one normalisation context, returning its discrepancy
fn normalise_context(scheme: &mut DecayScheme, context: Handle<Normalisation>) -> f64 {
    let normalisation = &scheme.normalisations[context];
    let nr = normalisation.relative_multiplier() / 100.0;
    let nt = normalisation.transition_multiplier() / 100.0;
    let nb = normalisation.beta_multiplier() / 100.0;
    let br = normalisation.branch_multiplier();

    let members = scheme.normalisation_links.members(context).to_vec();

    let mut gammas = Vec::new();
    let mut betas = Vec::new();
    let mut alphas = Vec::new();

    for id in &members {
        match *id {
            EmissionId::Gamma(h) => gammas.push((h, absolute_gamma(&scheme.gammas[h], nr, nt))),
            EmissionId::Beta(h) => {
                let beta = &scheme.betas[h];
                let (positron, capture, total) = match beta.positron_capture() {
                    Some(ec) => {
                        let positron = ec.positron_intensity * nb;
                        let capture = ec.capture_intensity * nb;
                        let total = match positron + capture {
                            sum if sum > 0.0 => sum,
                            _ => ec.total_intensity * nb,
                        };
                        (positron, capture, total)
                    }
                    None => (0.0, 0.0, beta.intensity * nb),
                };
                betas.push((h, positron, capture, total));
            }
            EmissionId::Alpha(h) => alphas.push((h, scheme.alphas[h].intensity * nb)),
        }
    }

    let mut outgoing = betas.iter().map(|b| b.3).sum::<f64>()
        + alphas.iter().map(|a| a.1).sum::<f64>();

    if outgoing == 0.0 {
        // pure gamma decay, start from the levels nothing else feeds
        let fed = gammas
            .iter()
            .filter_map(|(h, _)| scheme.sink_links.owner(*h))
            .collect::<BTreeSet<Handle<Level>>>();

        outgoing = gammas
            .iter()
            .filter(|(h, _)| {
                scheme
                    .level_links
                    .owner(EmissionId::Gamma(*h))
                    .is_some_and(|origin| !fed.contains(&origin))
            })
            .map(|(_, g)| g.transition)
            .sum();
    }

    let discrepancy = (outgoing - 1.0).abs();
    let factor = match outgoing > 0.0 {
        true => br / outgoing,
        false => 1.0,
    };

    debug!(
        "Normalisation {context}: outgoing {outgoing:.6}, discrepancy {discrepancy:.3e}, scale {factor:.6}"
    );

    for (h, intensities) in gammas {
        let intensities = intensities.scaled(factor);
        let gamma = &mut scheme.gammas[h];
        gamma.set_gamma_intensity(intensities.gamma);
        gamma.set_transition_intensity(intensities.transition);
        gamma.set_conversion_intensity(intensities.conversion);
        gamma.set_pair_intensity(intensities.pair);
    }

    for (h, positron, capture, total) in betas {
        let beta = &mut scheme.betas[h];
        beta.set_intensity(total * factor);
        if let Some(ec) = beta.positron_capture_mut() {
            ec.set_intensities(positron * factor, capture * factor);
        }
    }

    for (h, intensity) in alphas {
        scheme.alphas[h].set_intensity(intensity * factor);
    }

    discrepancy
}

/// Absolute gamma intensities from the raw fields
///
/// Either the gamma or the transition intensity may be blank, in which case it
/// is derived from the other using the conversion and pair coefficients.
fn absolute_gamma(gamma: &Gamma, nr: f64, nt: f64) -> GammaIntensities {
    let competing = 1.0 + gamma.conversion_coefficient + gamma.pair_coefficient;

    let mut photon = gamma.gamma_intensity * nr;
    let transition = match gamma.transition_intensity > 0.0 {
        true => gamma.transition_intensity * nt,
        false => photon * competing,
    };

    if photon == 0.0 && transition > 0.0 {
        photon = transition / competing;
    }

    GammaIntensities {
        gamma: photon,
        transition,
        conversion: photon * gamma.conversion_coefficient,
        pair: photon * gamma.pair_coefficient,
    }
}

/// Total population of each level from direct feeding and gamma cascades
fn accumulate_level_feeding(scheme: &mut DecayScheme) {
    let levels = scheme.levels.handles().collect::<Vec<_>>();

    for handle in levels {
        let direct = scheme
            .level_links
            .members(handle)
            .iter()
            .map(|id| match *id {
                EmissionId::Beta(h) => scheme.betas[h].intensity,
                EmissionId::Alpha(h) => scheme.alphas[h].intensity,
                EmissionId::Gamma(_) => 0.0,
            })
            .sum::<f64>();

        let cascade = scheme
            .sink_links
            .members(handle)
            .iter()
            .map(|h| scheme.gammas[*h].transition_intensity)
            .sum::<f64>();

        scheme.levels[handle].add_disintegration_intensity(direct + cascade);
    }
}

/// Probability of each gamma given a disintegration of its level
///
/// This is the share of the level's outgoing transitions. With multiple
/// transitions allowed, a level emitting more than it receives uses its
/// incoming intensity instead.
fn assign_multi_transition_probs(scheme: &mut DecayScheme, allow_multi_transition: bool) {
    let gammas = scheme.gammas.handles().collect::<Vec<_>>();

    for handle in gammas {
        let Some(origin) = scheme.level_links.owner(EmissionId::Gamma(handle)) else {
            continue;
        };

        let outgoing = scheme
            .level_links
            .members(origin)
            .iter()
            .filter_map(|id| match *id {
                EmissionId::Gamma(h) => Some(scheme.gammas[h].transition_intensity),
                _ => None,
            })
            .sum::<f64>();
        let incoming = scheme.levels[origin].disintegration_intensity;
        let transition = scheme.gammas[handle].transition_intensity;

        let probability = if allow_multi_transition && outgoing > incoming && incoming > 0.0 {
            transition / incoming
        } else if outgoing > 0.0 {
            transition / outgoing
        } else {
            0.0
        };

        scheme.gammas[handle].set_multi_transition_prob(probability);
    }
}
