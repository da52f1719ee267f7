//! Grouping of ENSDF lines into record blocks and the two-phase build
//!
//! # Line blocks
//!
//! Every line is classified by its comment marker (col 7) and record tag
//! (col 8). A blank or `1` in column 6 starts a new record, and anything else
//! continues the record before it.
//!
//! - Contiguous comment lines form a single block
//! - Continuation lines are appended to the open block of the same type, and
//!   are skipped if there is no such block
//! - Blank lines and unrecognised records close the open block
//!
//! # Building the scheme
//!
//! Records of a decay data set are implicitly linked by their position in the
//! file. An emission belongs to the most recent parent, normalisation, and
//! level before it.
//!
//! 1. Comments, parents, normalisations, and levels are built in file order.
//!    Normalisations join the most recent parent, and levels the most recent
//!    normalisation.
//! 2. Emissions are built in file order, tracking the current context as the
//!    records from phase 1 are passed. Each is attached to the context at that
//!    point.
//!
//! Gamma transitions are then linked to the level they end on.

// standard library
use std::sync::Arc;

// ensdf modules
use ensdf_relax::AtomicRelaxation;
use ensdf_utils::ColumnExt;

// internal modules
use crate::arena::Handle;
use crate::error::Result;
use crate::records::{
    Alpha, Beta, Comment, EmissionId, Gamma, Level, Normalisation, Parent, Record, RecordId,
    RecordType,
};
use crate::scheme::DecayScheme;

// external crates
use log::{debug, trace, warn};

/// Group raw lines into record blocks, in file order
pub(crate) fn group_blocks<I, S>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut blocks: Vec<Record> = Vec::new();
    let mut open: Option<Record> = None;

    for line in lines {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);

        if line.trim().is_empty() {
            blocks.extend(open.take());
            continue;
        }

        let Some(kind) = RecordType::from_line(line) else {
            trace!("Skipped line \"{line}\"");
            blocks.extend(open.take());
            continue;
        };

        let is_primary = matches!(line.column_char(6), ' ' | '1');

        // comments are merged regardless of the continuation marker
        let continues_open = match &open {
            Some(block) if kind == RecordType::Comment => block.kind == RecordType::Comment,
            Some(block) => !is_primary && block.kind == kind,
            None => false,
        };

        if continues_open {
            if let Some(block) = open.as_mut() {
                block.push(line);
            }
        } else if !is_primary && kind != RecordType::Comment {
            trace!("Skipped continuation with no open {kind} record");
        } else {
            blocks.extend(open.take());
            open = Some(Record::new(kind, line));
        }
    }

    blocks.extend(open);
    blocks
}

/// A line block either built in phase 1 or waiting for phase 2
enum Slot {
    Built(RecordId),
    Pending(Record),
}

/// The implicit parent, normalisation, and level at a point in the file
#[derive(Debug, Default, Clone, Copy)]
struct Context {
    parent: Option<Handle<Parent>>,
    normalisation: Option<Handle<Normalisation>>,
    level: Option<Handle<Level>>,
}

/// Builds the linked records of a decay scheme from line blocks
pub(crate) struct SchemeBuilder<'a> {
    scheme: &'a mut DecayScheme,
    generator: Option<Arc<dyn AtomicRelaxation>>,
}

impl<'a> SchemeBuilder<'a> {
    pub(crate) fn new(
        scheme: &'a mut DecayScheme,
        generator: Option<Arc<dyn AtomicRelaxation>>,
    ) -> Self {
        Self { scheme, generator }
    }

    /// Run both phases and link gamma sinks
    pub(crate) fn build(mut self, blocks: Vec<Record>) -> Result<()> {
        let slots = self.build_structure(blocks)?;
        self.build_emissions(slots)?;
        self.resolve_sinks()
    }

    /// Phase 1: comments, parents, normalisations, and levels
    fn build_structure(&mut self, blocks: Vec<Record>) -> Result<Vec<Slot>> {
        let mut context = Context::default();
        let mut slots = Vec::with_capacity(blocks.len());

        for block in blocks {
            trace!("{} block:\n{block}", block.kind);

            let slot = match block.kind {
                RecordType::Comment => {
                    let handle = self.scheme.comments.insert(Comment::new(block));
                    Slot::Built(RecordId::Comment(handle))
                }
                RecordType::Parent => {
                    let handle = self.scheme.parents.insert(Parent::new(block));
                    self.scheme.parent_normalisations.add_owner(handle);
                    context = Context {
                        parent: Some(handle),
                        ..Context::default()
                    };
                    Slot::Built(RecordId::Parent(handle))
                }
                RecordType::Normalisation => {
                    let normalisation = Normalisation::new(block, self.generator.clone());
                    let handle = self.scheme.normalisations.insert(normalisation);
                    match context.parent {
                        Some(parent) => self
                            .scheme
                            .parent_normalisations
                            .attach(handle, parent)?,
                        None => warn!("Normalisation record with no parent"),
                    }
                    self.scheme.normalisation_levels.add_owner(handle);
                    context.normalisation = Some(handle);
                    context.level = None;
                    Slot::Built(RecordId::Normalisation(handle))
                }
                RecordType::Level => {
                    let handle = self.scheme.levels.insert(Level::new(block));
                    if let Some(normalisation) = context.normalisation {
                        self.scheme
                            .normalisation_levels
                            .attach(handle, normalisation)?;
                    }
                    context.level = Some(handle);
                    Slot::Built(RecordId::Level(handle))
                }
                _ => Slot::Pending(block),
            };

            slots.push(slot);
        }

        Ok(slots)
    }

    /// Phase 2: emissions attached to the context at their position
    fn build_emissions(&mut self, slots: Vec<Slot>) -> Result<()> {
        let mut context = Context::default();

        for slot in slots {
            let block = match slot {
                Slot::Built(id) => {
                    self.update_context(&mut context, id);
                    self.scheme.records.push(id);
                    continue;
                }
                Slot::Pending(block) => block,
            };

            let (Some(parent), Some(normalisation), Some(level)) =
                (context.parent, context.normalisation, context.level)
            else {
                warn!(
                    "Skipped {} record with no parent, normalisation, or level: \"{}\"",
                    block.kind,
                    block.lines[0].trim_end()
                );
                continue;
            };

            let id = self.insert_emission(block, parent, level);
            debug!("Built {id:?}");

            self.scheme.parent_links.attach(id, parent)?;
            self.scheme.normalisation_links.attach(id, normalisation)?;
            self.scheme.level_links.attach(id, level)?;
            self.scheme.records.push(id.into());
        }

        Ok(())
    }

    fn update_context(&self, context: &mut Context, id: RecordId) {
        match id {
            RecordId::Parent(parent) => {
                *context = Context {
                    parent: Some(parent),
                    ..Context::default()
                }
            }
            RecordId::Normalisation(normalisation) => {
                context.parent = self.scheme.parent_normalisations.owner(normalisation);
                context.normalisation = Some(normalisation);
                context.level = None;
            }
            RecordId::Level(level) => context.level = Some(level),
            _ => (),
        }
    }

    /// Build an emission record and store it, filling in blank endpoints
    fn insert_emission(
        &mut self,
        block: Record,
        parent: Handle<Parent>,
        level: Handle<Level>,
    ) -> EmissionId {
        let scheme = &mut *self.scheme;
        let kind = block.kind;

        match kind {
            RecordType::BetaMinus | RecordType::BetaPlus => {
                let mut beta = match kind {
                    RecordType::BetaMinus => Beta::minus(block),
                    _ => Beta::plus(block, self.generator.clone()),
                };
                if let (Some(p), Some(l)) = (scheme.parents.get(parent), scheme.levels.get(level))
                {
                    beta.fill_endpoint(p.q_value, p.energy, l.energy);
                }
                EmissionId::Beta(scheme.betas.insert(beta))
            }
            RecordType::Alpha => EmissionId::Alpha(scheme.alphas.insert(Alpha::new(block))),
            _ => {
                let gamma = Gamma::new(block, self.generator.clone());
                EmissionId::Gamma(scheme.gammas.insert(gamma))
            }
        }
    }

    /// Link every gamma to the level it ends on
    ///
    /// Candidates are lower levels of the same nuclide and data set. The
    /// closest to the origin energy minus the gamma energy wins, as long as it
    /// is within 1 keV or 1% of the origin energy, whichever is larger.
    fn resolve_sinks(&mut self) -> Result<()> {
        let scheme = &mut *self.scheme;
        let mut links = Vec::new();

        for (handle, gamma) in scheme.gammas.iter() {
            let id = EmissionId::Gamma(handle);
            let (Some(origin), Some(normalisation)) = (
                scheme.level_links.owner(id),
                scheme.normalisation_links.owner(id),
            ) else {
                continue;
            };

            let origin_level = &scheme.levels[origin];
            let target = origin_level.energy - gamma.energy;
            let tolerance = (0.01 * origin_level.energy).max(1.0);

            let sink = scheme
                .normalisation_levels
                .members(normalisation)
                .iter()
                .filter(|&&l| l != origin)
                .map(|&l| (l, &scheme.levels[l]))
                .filter(|(_, l)| {
                    l.record.nucid == origin_level.record.nucid && l.energy < origin_level.energy
                })
                .map(|(l, level)| (l, (level.energy - target).abs()))
                .filter(|(_, delta)| *delta <= tolerance)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(l, _)| l);

            match sink {
                Some(level) => links.push((handle, level)),
                None => warn!(
                    "No final level for the {} keV gamma from the {} keV level",
                    gamma.energy, origin_level.energy
                ),
            }
        }

        for (gamma, level) in links {
            scheme.sink_links.attach(gamma, level)?;
        }

        Ok(())
    }
}
