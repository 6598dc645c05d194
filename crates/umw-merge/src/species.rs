use std::cmp::Ordering;

use umw_core::entities::{QuantitativeData, SensoryClaim, SpeciesRecord};
use umw_core::ids::is_known;
use umw_core::outcome::MergeOutcome;

/// Merge `incoming` into `existing` in place.
///
/// Claims are matched on `(modality_domain, sub_type)`. A matched claim gains
/// evidence with unseen citations and adopts `mechanism` and a known
/// `stimulus_type` only where it has none. Of two `quantitative_data` blocks
/// the more complete one is kept, ties going to the greater values, so the
/// result does not depend on merge order. Unmatched claims are appended. Unknown names are filled in and differing ones become aliases.
pub fn merge_species(existing: &mut SpeciesRecord, incoming: &SpeciesRecord) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    merge_identity(existing, incoming, &mut outcome);
    merge_claims(&mut existing.claims, &incoming.claims, &mut outcome);
    existing.data_quality_flag = incoming.data_quality_flag;

    tracing::debug!(
        species = %existing.identity.common_name,
        claims_added = outcome.claims_added,
        evidence_added = outcome.evidence_added,
        "species merged"
    );
    outcome
}

/// First stored version of a profile: `incoming` with duplicate claim slots
/// and citations folded together.
#[must_use]
pub fn seed_species(incoming: &SpeciesRecord) -> (SpeciesRecord, MergeOutcome) {
    let mut record = SpeciesRecord {
        claims: Vec::new(),
        ..incoming.clone()
    };
    let mut outcome = MergeOutcome::default();
    merge_claims(&mut record.claims, &incoming.claims, &mut outcome);
    (record, outcome)
}

fn merge_identity(existing: &mut SpeciesRecord, incoming: &SpeciesRecord, outcome: &mut MergeOutcome) {
    let identity = &mut existing.identity;
    for (name, value) in [
        (&mut identity.common_name, &incoming.identity.common_name),
        (&mut identity.scientific_name, &incoming.identity.scientific_name),
    ] {
        if !is_known(name) && is_known(value) {
            name.clone_from(value);
        }
    }

    let offered = [
        &incoming.identity.common_name,
        &incoming.identity.scientific_name,
    ]
    .into_iter()
    .chain(incoming.identity.aliases.iter());

    for name in offered {
        if !is_known(name) || name == &identity.common_name || name == &identity.scientific_name {
            continue;
        }
        if identity.aliases.insert(name.clone()) {
            outcome.aliases_added += 1;
        }
    }

    if identity.stable_id.is_none() {
        identity.stable_id = incoming.identity.stable_id;
    }

    let taxonomy = &mut identity.taxonomy;
    let offered = &incoming.identity.taxonomy;
    for (rank, value) in [
        (&mut taxonomy.class, &offered.class),
        (&mut taxonomy.order, &offered.order),
        (&mut taxonomy.family, &offered.family),
    ] {
        if !is_known(rank) && is_known(value) {
            rank.clone_from(value);
        }
    }
}

fn merge_claims(existing: &mut Vec<SensoryClaim>, incoming: &[SensoryClaim], outcome: &mut MergeOutcome) {
    for claim in incoming {
        match existing.iter_mut().find(|c| c.slot() == claim.slot()) {
            Some(slot) => merge_claim(slot, claim, outcome),
            None => {
                let mut fresh = SensoryClaim {
                    evidence: Vec::with_capacity(claim.evidence.len()),
                    ..claim.clone()
                };
                for evidence in &claim.evidence {
                    if !fresh.has_citation(&evidence.citation) {
                        fresh.evidence.push(evidence.clone());
                        outcome.evidence_added += 1;
                    }
                }
                existing.push(fresh);
                outcome.claims_added += 1;
            }
        }
    }
}

fn merge_claim(slot: &mut SensoryClaim, incoming: &SensoryClaim, outcome: &mut MergeOutcome) {
    for evidence in &incoming.evidence {
        if !slot.has_citation(&evidence.citation) {
            slot.evidence.push(evidence.clone());
            outcome.evidence_added += 1;
        }
    }

    match (&slot.quantitative_data, &incoming.quantitative_data) {
        (_, None) => {}
        (Some(held), Some(offered)) if block_order(offered, held) != Ordering::Greater => {}
        _ => {
            slot.quantitative_data.clone_from(&incoming.quantitative_data);
            outcome.quantitative_adopted += 1;
        }
    }

    if slot.mechanism.is_none() && incoming.mechanism.is_some() {
        slot.mechanism.clone_from(&incoming.mechanism);
    }

    if !is_known(&slot.stimulus_type) && is_known(&incoming.stimulus_type) {
        slot.stimulus_type.clone_from(&incoming.stimulus_type);
    }
}

/// Total order on blocks: number of set fields first, then `min`, `max`,
/// `unit` and `context`.
fn block_order(a: &QuantitativeData, b: &QuantitativeData) -> Ordering {
    fn filled(q: &QuantitativeData) -> usize {
        [q.min.is_some(), q.max.is_some(), q.unit.is_some(), q.context.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count()
    }
    fn bound(a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (a, b) => a.is_some().cmp(&b.is_some()),
        }
    }

    filled(a)
        .cmp(&filled(b))
        .then_with(|| bound(a.min, b.min))
        .then_with(|| bound(a.max, b.max))
        .then_with(|| a.unit.cmp(&b.unit))
        .then_with(|| a.context.cmp(&b.context))
}
