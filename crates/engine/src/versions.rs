//! Probability version management and the admin catalog operations that
//! feed it (machines, rewards).
//!
//! Version create and publish lock the machine row, so version numbering and
//! the single-published-version rule are serialized per machine.

use serde::Serialize;
use spinvault_core::selection::total_weight;
use spinvault_core::types::{now_micros, DbId};
use spinvault_db::models::machine::{CreateMachine, Machine, UpdateMachine};
use spinvault_db::models::probability::{
    CreatePoolItem, CreateTier, PoolItemView, ProbabilityTier, ProbabilityVersion, RewardPoolItem,
};
use spinvault_db::models::reward::{CreateReward, RewardCatalogEntry};
use spinvault_db::repositories::{
    MachineRepo, ProbabilityTierRepo, ProbabilityVersionRepo, RewardCatalogRepo, RewardPoolRepo,
};
use sqlx::PgConnection;

use crate::{Engine, EngineError, EngineResult};

/// A new odds table for one machine.
#[derive(Debug, Clone, Default)]
pub struct VersionDraft {
    pub notes: Option<String>,
    pub tiers: Vec<CreateTier>,
    pub pool_items: Vec<CreatePoolItem>,
    pub publish: bool,
}

/// A version with its full odds table.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDetail {
    pub version: ProbabilityVersion,
    pub tiers: Vec<ProbabilityTier>,
    pub pool: Vec<PoolItemView>,
}

fn validate_draft(draft: &VersionDraft) -> EngineResult<()> {
    if draft.tiers.is_empty() {
        return Err(EngineError::validation("at least one tier is required"));
    }
    if draft.pool_items.is_empty() {
        return Err(EngineError::validation("at least one reward pool item is required"));
    }
    if draft.tiers.iter().any(|t| t.rarity.trim().is_empty()) {
        return Err(EngineError::validation("tier rarity must not be empty"));
    }
    if draft.tiers.iter().any(|t| t.weight < 0)
        || draft.pool_items.iter().any(|p| p.weight < 0)
    {
        return Err(EngineError::validation("weights must be >= 0"));
    }
    if total_weight(&draft.tiers, |t| t.weight) <= 0 {
        return Err(EngineError::validation("total tier weight must be > 0"));
    }
    if total_weight(&draft.pool_items, |p| p.weight) <= 0 {
        return Err(EngineError::validation("total pool weight must be > 0"));
    }
    Ok(())
}

/// A drawable tier must either have no pool items (the draw falls back to the
/// full pool) or at least one item with positive weight.
fn check_tier_weights(tiers: &[CreateTier], pool: &[RewardPoolItem]) -> EngineResult<()> {
    for tier in tiers.iter().filter(|t| t.weight > 0) {
        let members: Vec<&RewardPoolItem> =
            pool.iter().filter(|p| p.rarity == tier.rarity).collect();
        if !members.is_empty() && total_weight(&members, |p| p.weight) <= 0 {
            return Err(EngineError::validation(format!(
                "tier {} has only zero-weight pool items",
                tier.rarity
            )));
        }
    }
    Ok(())
}

fn validate_machine_fields(name: Option<&str>, cost_per_spin: Option<i64>) -> EngineResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(EngineError::validation("machine name must not be empty"));
    }
    if cost_per_spin.is_some_and(|c| c <= 0) {
        return Err(EngineError::validation("cost_per_spin must be > 0"));
    }
    Ok(())
}

/// Archive the machine's current version, publish `version_id` and point the
/// machine at it. The caller holds the machine lock.
async fn publish_locked(
    conn: &mut PgConnection,
    machine_id: DbId,
    version_id: DbId,
) -> EngineResult<ProbabilityVersion> {
    let archived =
        ProbabilityVersionRepo::archive_published(&mut *conn, machine_id, version_id).await?;
    let version = ProbabilityVersionRepo::mark_published(&mut *conn, version_id, now_micros()).await?;
    MachineRepo::set_live_version(&mut *conn, machine_id, version_id).await?;

    tracing::info!(
        machine_id,
        version_id,
        version_number = version.version_number,
        archived,
        "Probability version published"
    );
    Ok(version)
}

impl Engine {
    /// Create the next version of a machine's odds table, publishing it in
    /// the same transaction when `draft.publish` is set.
    pub async fn create_version(
        &self,
        machine_id: DbId,
        draft: &VersionDraft,
    ) -> EngineResult<ProbabilityVersion> {
        validate_draft(draft)?;

        let mut tx = self.begin().await?;
        MachineRepo::lock(&mut *tx, machine_id)
            .await?
            .ok_or(EngineError::MachineNotFound(machine_id))?;

        let reward_ids: Vec<DbId> = draft.pool_items.iter().map(|p| p.reward_id).collect();
        if let Some(&reward_id) = RewardCatalogRepo::missing_ids(&mut *tx, &reward_ids).await?.first()
        {
            return Err(EngineError::UnknownReward { reward_id });
        }

        let number = ProbabilityVersionRepo::next_version_number(&mut *tx, machine_id).await?;
        let notes = draft.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let mut version =
            ProbabilityVersionRepo::create(&mut *tx, machine_id, number, notes).await?;

        for tier in &draft.tiers {
            ProbabilityTierRepo::create(&mut *tx, version.id, tier).await?;
        }
        let mut pool = Vec::with_capacity(draft.pool_items.len());
        for item in &draft.pool_items {
            let created = RewardPoolRepo::create_from_catalog(
                &mut *tx,
                version.id,
                item.reward_id,
                item.weight,
            )
            .await?
            .ok_or(EngineError::UnknownReward {
                reward_id: item.reward_id,
            })?;
            pool.push(created);
        }
        check_tier_weights(&draft.tiers, &pool)?;

        if draft.publish {
            version = publish_locked(&mut *tx, machine_id, version.id).await?;
        }
        tx.commit().await?;

        tracing::info!(
            machine_id,
            version_id = version.id,
            version_number = version.version_number,
            tiers = draft.tiers.len(),
            pool_items = draft.pool_items.len(),
            "Probability version created"
        );
        Ok(version)
    }

    /// Make `version_id` the machine's only published version.
    pub async fn publish_version(&self, version_id: DbId) -> EngineResult<ProbabilityVersion> {
        let mut tx = self.begin().await?;
        let version = ProbabilityVersionRepo::find_by_id(&mut *tx, version_id)
            .await?
            .ok_or(EngineError::VersionNotFound(version_id))?;
        MachineRepo::lock(&mut *tx, version.machine_id)
            .await?
            .ok_or(EngineError::MachineNotFound(version.machine_id))?;

        let version = publish_locked(&mut *tx, version.machine_id, version_id).await?;
        tx.commit().await?;
        Ok(version)
    }

    pub async fn list_versions(&self, machine_id: DbId) -> EngineResult<Vec<ProbabilityVersion>> {
        MachineRepo::find_by_id(self.pool(), machine_id)
            .await?
            .ok_or(EngineError::MachineNotFound(machine_id))?;
        Ok(ProbabilityVersionRepo::list_by_machine(self.pool(), machine_id).await?)
    }

    pub async fn get_version(&self, version_id: DbId) -> EngineResult<VersionDetail> {
        let version = ProbabilityVersionRepo::find_by_id(self.pool(), version_id)
            .await?
            .ok_or(EngineError::VersionNotFound(version_id))?;
        let tiers = ProbabilityTierRepo::list_by_version(self.pool(), version_id).await?;
        let pool = RewardPoolRepo::list_view_by_version(self.pool(), version_id).await?;
        Ok(VersionDetail {
            version,
            tiers,
            pool,
        })
    }

    // -- Machines -------------------------------------------------------------

    pub async fn create_machine(&self, input: &CreateMachine) -> EngineResult<Machine> {
        validate_machine_fields(Some(&input.name), Some(input.cost_per_spin))?;
        let machine = MachineRepo::create(self.pool(), input).await?;
        tracing::info!(machine_id = machine.id, name = %machine.name, "Machine created");
        Ok(machine)
    }

    pub async fn update_machine(
        &self,
        machine_id: DbId,
        input: &UpdateMachine,
    ) -> EngineResult<Machine> {
        validate_machine_fields(input.name.as_deref(), input.cost_per_spin)?;
        let machine = MachineRepo::update(self.pool(), machine_id, input)
            .await?
            .ok_or(EngineError::MachineNotFound(machine_id))?;
        tracing::info!(machine_id, is_active = machine.is_active, "Machine updated");
        Ok(machine)
    }

    // -- Reward catalog -------------------------------------------------------

    pub async fn create_reward(&self, input: &CreateReward) -> EngineResult<RewardCatalogEntry> {
        if input.name.trim().is_empty() || input.rarity.trim().is_empty() {
            return Err(EngineError::validation("reward name and rarity are required"));
        }
        let reward = RewardCatalogRepo::create(self.pool(), input).await?;
        tracing::info!(
            reward_id = reward.id,
            reward_type = %reward.reward_type,
            "Reward created"
        );
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(tiers: &[(&str, i64)], pool: &[(DbId, i64)]) -> VersionDraft {
        VersionDraft {
            notes: None,
            tiers: tiers
                .iter()
                .map(|(r, w)| CreateTier {
                    rarity: r.to_string(),
                    weight: *w,
                })
                .collect(),
            pool_items: pool
                .iter()
                .map(|(id, w)| CreatePoolItem {
                    reward_id: *id,
                    weight: *w,
                })
                .collect(),
            publish: false,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate_draft(&draft(&[("Common", 70), ("Rare", 0)], &[(1, 1)])).is_ok());
    }

    #[test]
    fn empty_parts_are_rejected() {
        assert!(matches!(
            validate_draft(&draft(&[], &[(1, 1)])),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            validate_draft(&draft(&[("Common", 1)], &[])),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn negative_weight_is_a_validation_error() {
        assert!(matches!(
            validate_draft(&draft(&[("Common", -1), ("Rare", 5)], &[(1, 1)])),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        assert!(matches!(
            validate_draft(&draft(&[("Common", 0)], &[(1, 1)])),
            Err(EngineError::Validation(msg)) if msg.contains("tier")
        ));
        assert!(matches!(
            validate_draft(&draft(&[("Common", 1)], &[(1, 0)])),
            Err(EngineError::Validation(msg)) if msg.contains("pool")
        ));
    }

    fn pool_item(reward_id: DbId, rarity: &str, weight: i64) -> RewardPoolItem {
        RewardPoolItem {
            id: reward_id,
            probability_version_id: 1,
            reward_id,
            rarity: rarity.to_string(),
            weight,
        }
    }

    #[test]
    fn tier_with_only_zero_weight_items_is_rejected() {
        let tiers = draft(&[("Epic", 1), ("Common", 4)], &[]).tiers;
        let pool = [pool_item(3, "Epic", 0), pool_item(4, "Common", 4)];
        assert!(matches!(
            check_tier_weights(&tiers, &pool),
            Err(EngineError::Validation(msg)) if msg.contains("Epic")
        ));
    }

    #[test]
    fn empty_or_undrawable_tiers_pass_weight_check() {
        // Legendary has no items; Epic can never be drawn.
        let tiers = draft(&[("Legendary", 1), ("Epic", 0), ("Common", 4)], &[]).tiers;
        let pool = [pool_item(3, "Epic", 0), pool_item(4, "Common", 4)];
        assert!(check_tier_weights(&tiers, &pool).is_ok());
    }

    #[test]
    fn machine_fields() {
        assert!(validate_machine_fields(Some("Neon"), Some(100)).is_ok());
        assert!(validate_machine_fields(None, None).is_ok());
        assert!(validate_machine_fields(Some("  "), None).is_err());
        assert!(validate_machine_fields(None, Some(0)).is_err());
    }
}
