//! Inventory listing and cosmetic equip.

use serde::Serialize;
use spinvault_core::rewards::{check_equip, normalize_slot, EquipRejection};
use spinvault_core::types::DbId;
use spinvault_db::models::inventory::{EquippedItem, InventoryView};
use spinvault_db::repositories::{EquippedItemRepo, InventoryRepo, RewardCatalogRepo};

use crate::{Engine, EngineError, EngineResult};

#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub rarity: Option<String>,
    pub reward_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryListing {
    pub items: Vec<InventoryView>,
    pub equipped: Vec<EquippedItem>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Engine {
    pub async fn list_inventory(
        &self,
        user_id: DbId,
        filter: &InventoryFilter,
    ) -> EngineResult<InventoryListing> {
        let items = InventoryRepo::list_view(
            self.pool(),
            user_id,
            non_blank(&filter.rarity),
            non_blank(&filter.reward_type),
        )
        .await?;
        let equipped = EquippedItemRepo::list(self.pool(), user_id).await?;
        Ok(InventoryListing { items, equipped })
    }

    /// Put an owned cosmetic into `slot`, replacing whatever was there.
    pub async fn equip(&self, user_id: DbId, slot: &str, reward_id: DbId) -> EngineResult<EquippedItem> {
        let slot = normalize_slot(slot);
        if slot.is_empty() {
            return Err(EngineError::validation("slot is required"));
        }

        let mut tx = self.begin().await?;
        if InventoryRepo::owned_qty(&mut *tx, user_id, reward_id).await? <= 0 {
            return Err(EngineError::NotOwned { reward_id });
        }
        let reward = RewardCatalogRepo::find_by_id(&mut *tx, reward_id)
            .await?
            .ok_or(EngineError::UnknownReward { reward_id })?;
        let metadata = reward
            .typed_metadata()
            .map_err(|e| EngineError::CorruptRewardMetadata {
                reward_id,
                reason: e.to_string(),
            })?;
        check_equip(&metadata, &slot).map_err(|rejection| match rejection {
            EquipRejection::NotEquippable => EngineError::NotEquippable { reward_id },
            EquipRejection::SlotMismatch { expected } => EngineError::SlotMismatch { expected },
        })?;

        let equipped = EquippedItemRepo::upsert(&mut *tx, user_id, &slot, reward_id).await?;
        tx.commit().await?;

        tracing::info!(user_id, reward_id, slot = %slot, "Item equipped");
        Ok(equipped)
    }
}
