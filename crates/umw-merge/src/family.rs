use std::collections::btree_map::Entry;

use umw_core::entities::FamilyProfile;
use umw_core::outcome::MergeOutcome;

/// Merge `incoming` into `existing` in place.
///
/// Scalars fill only when absent. Per modality: new keys are added, existing
/// ones absorb the incoming prevalence (species union, note append joined by
/// `separator`, monotonic presence upgrade, frequency range fill). Sources are
/// unioned. `confidence` and `generated_at` take the incoming values.
pub fn merge_family(existing: &mut FamilyProfile, incoming: &FamilyProfile, separator: &str) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    if existing.stable_id.is_none() {
        existing.stable_id = incoming.stable_id;
    }
    if existing.order_name.is_none() {
        existing.order_name.clone_from(&incoming.order_name);
    }

    for (name, prevalence) in &incoming.modalities {
        match existing.modalities.entry(name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(prevalence.clone());
                outcome.modalities_added += 1;
            }
            Entry::Occupied(mut slot) => {
                let merged = slot.get_mut().absorb(prevalence, separator);
                if merged.presence_upgraded {
                    outcome.presence_upgrades += 1;
                }
                if merged.note_appended {
                    outcome.notes_appended += 1;
                }
            }
        }
    }

    for source in &incoming.sources {
        if existing.sources.insert(source.clone()) {
            outcome.sources_added += 1;
        }
    }

    existing.confidence = incoming.confidence;
    existing.generated_at = incoming.generated_at;

    tracing::debug!(
        family = %existing.family_name,
        modalities_added = outcome.modalities_added,
        presence_upgrades = outcome.presence_upgrades,
        "family merged"
    );
    outcome
}

/// First stored version of a family profile.
#[must_use]
pub fn seed_family(incoming: &FamilyProfile) -> (FamilyProfile, MergeOutcome) {
    let outcome = MergeOutcome {
        modalities_added: u32::try_from(incoming.modalities.len()).unwrap_or(u32::MAX),
        sources_added: u32::try_from(incoming.sources.len()).unwrap_or(u32::MAX),
        ..MergeOutcome::default()
    };
    (incoming.clone(), outcome)
}
