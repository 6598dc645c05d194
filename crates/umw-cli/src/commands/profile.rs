use umw_core::entities::{FamilyProfile, SpeciesRecord};
use umw_core::enums::EntityKind;
use umw_db::repos::Stored;
use umw_db::repos::profile::Profile;
use umw_db::service::UmwService;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfileCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `umw profile`.
pub async fn handle(
    action: &ProfileCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProfileCommands::Species { name_or_key } => {
            let stored: Stored<SpeciesRecord> = find(&ctx.service, EntityKind::Species, name_or_key).await?;
            output(&stored, flags.format)
        }
        ProfileCommands::Family { name_or_key } => {
            let stored: Stored<FamilyProfile> = find(&ctx.service, EntityKind::Family, name_or_key).await?;
            output(&stored, flags.format)
        }
    }
}

/// Exact key first, then a unique name match. Several matches are listed
/// rather than guessed between.
async fn find<T: Profile>(
    service: &UmwService,
    kind: EntityKind,
    name_or_key: &str,
) -> anyhow::Result<Stored<T>> {
    if let Some(stored) = service.load_profile::<T>(name_or_key).await? {
        return Ok(stored);
    }

    let keys = service.find_keys_by_name(kind, name_or_key).await?;
    match keys.as_slice() {
        [] => anyhow::bail!("no {kind} profile named or keyed '{name_or_key}'"),
        [key] => service
            .load_profile::<T>(key)
            .await?
            .ok_or_else(|| anyhow::anyhow!("{kind} profile '{key}' disappeared during lookup")),
        many => anyhow::bail!(
            "'{name_or_key}' matches {} {kind} profiles: {}; pass a key instead",
            many.len(),
            many.join(", ")
        ),
    }
}
