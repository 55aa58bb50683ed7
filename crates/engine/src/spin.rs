//! Spin execution and verification.

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use spinvault_core::guardrails::check_spin_allowed;
use spinvault_core::selection;
use spinvault_core::signing::SpinClaim;
use spinvault_core::types::{now_micros, DbId};
use spinvault_db::models::machine::Machine;
use spinvault_db::models::probability::{
    PoolItemView, ProbabilityTier, ProbabilityVersion, RewardPoolItem,
};
use spinvault_db::models::reward::RewardCatalogEntry;
use spinvault_db::models::spin::{CreateSpin, Spin, SpinHistoryEntry};
use spinvault_db::models::wallet::LedgerRef;
use spinvault_db::repositories::{
    InventoryRepo, MachineRepo, ProbabilityTierRepo, ProbabilityVersionRepo, ResponsibleLimitRepo,
    RewardCatalogRepo, RewardPoolRepo, SpinRepo, UserRepo,
};

use crate::ledger::{self, REF_SPIN};
use crate::{Engine, EngineError, EngineResult};

/// Maximum idempotency key length, in characters, after trimming.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 100;

/// Recent wins shown on the machine page.
pub const RECENT_WINS: i64 = 10;

const UQ_SPIN_KEY: &str = "uq_spins_user_idempotency";

#[derive(Debug, Clone)]
pub struct SpinRequest {
    pub user_id: DbId,
    pub machine_id: DbId,
    pub idempotency_key: String,
    pub use_ticket: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinOutcome {
    pub spin: Spin,
    pub reward: RewardCatalogEntry,
    pub balance_after: i64,
    /// The key had already been used; nothing was charged or granted.
    pub idempotent_replay: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinVerification {
    pub spin_id: DbId,
    pub signature: String,
    pub valid: bool,
}

/// Public machine page: the live odds table and recent wins.
#[derive(Debug, Clone, Serialize)]
pub struct MachineView {
    pub machine: Machine,
    pub version: Option<ProbabilityVersion>,
    pub tiers: Vec<ProbabilityTier>,
    pub pool: Vec<PoolItemView>,
    pub recent_wins: Vec<SpinHistoryEntry>,
}

/// Trim and bound-check a client idempotency key.
pub fn normalize_idempotency_key(key: &str) -> EngineResult<&str> {
    let key = key.trim();
    let len = key.chars().count();
    if len == 0 || len > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(EngineError::validation(
            "idempotency key must be 1..=100 characters",
        ));
    }
    Ok(key)
}

/// Two-stage draw: a rarity tier, then a reward of that rarity.
///
/// When the pool has no item of the drawn rarity the reward is drawn from the
/// whole pool instead.
pub fn draw<'a, R>(
    tiers: &[ProbabilityTier],
    pool: &'a [RewardPoolItem],
    rng: &mut R,
) -> EngineResult<&'a RewardPoolItem>
where
    R: Rng + ?Sized,
{
    let tier = selection::pick(tiers, |t| t.weight, rng)?;
    let in_tier: Vec<&RewardPoolItem> =
        pool.iter().filter(|item| item.rarity == tier.rarity).collect();

    if in_tier.is_empty() {
        return Ok(selection::pick(pool, |item| item.weight, rng)?);
    }
    // A tier whose items all weigh 0 is a broken table, not an empty tier.
    Ok(*selection::pick(&in_tier, |item| item.weight, rng)?)
}

/// Draw with the thread-local generator. Kept synchronous so the generator is
/// never held across an await point.
fn draw_with_thread_rng<'a>(
    tiers: &[ProbabilityTier],
    pool: &'a [RewardPoolItem],
) -> EngineResult<&'a RewardPoolItem> {
    draw(tiers, pool, &mut rand::rng())
}

fn is_key_collision(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.constraint() == Some(UQ_SPIN_KEY))
}

impl Engine {
    /// Execute one spin atomically.
    ///
    /// Holds the user's wallet lock for the whole transaction, so concurrent
    /// calls for one user run one at a time and a repeated key observes the
    /// committed spin.
    pub async fn execute_spin(&self, req: &SpinRequest) -> EngineResult<SpinOutcome> {
        let key = normalize_idempotency_key(&req.idempotency_key)?;
        let user_id = req.user_id;

        let (mut tx, _) = self.begin_for_user(user_id).await?;

        let user = UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;
        if !user.is_active() {
            return Err(EngineError::AccountInactive {
                status: user.status,
            });
        }

        if let Some(spin) = SpinRepo::find_by_key(&mut *tx, user_id, key).await? {
            let reward = RewardCatalogRepo::find_by_id(&mut *tx, spin.result_reward_id)
                .await?
                .ok_or(EngineError::UnknownReward {
                    reward_id: spin.result_reward_id,
                })?;
            let balance_after = ledger::balance(&mut *tx, user_id).await?;
            tx.commit().await?;
            tracing::info!(user_id, spin_id = spin.id, "Spin replayed");
            return Ok(SpinOutcome {
                spin,
                reward,
                balance_after,
                idempotent_replay: true,
            });
        }

        let cooldown_until = ResponsibleLimitRepo::find(&mut *tx, user_id)
            .await?
            .and_then(|l| l.cooldown_until);
        check_spin_allowed(user.self_excluded_until, cooldown_until, Utc::now())?;

        let machine = MachineRepo::find_by_id(&mut *tx, req.machine_id)
            .await?
            .ok_or(EngineError::MachineNotFound(req.machine_id))?;
        if !machine.is_active {
            return Err(EngineError::MachineInactive);
        }
        let version_id = machine
            .probability_version_id
            .ok_or(EngineError::NoPublishedOdds)?;

        let cost = if req.use_ticket {
            if !InventoryRepo::consume_ticket(&mut *tx, user_id).await? {
                return Err(EngineError::NoTicketAvailable);
            }
            0
        } else {
            ledger::spend(
                &mut *tx,
                user_id,
                machine.cost_per_spin,
                LedgerRef::new(REF_SPIN, format!("machine:{}", machine.id)),
            )
            .await?;
            machine.cost_per_spin
        };

        let tiers = ProbabilityTierRepo::list_by_version(&mut *tx, version_id).await?;
        let pool = RewardPoolRepo::list_by_version(&mut *tx, version_id).await?;
        if tiers.is_empty() || pool.is_empty() {
            tracing::error!(version_id, "Published probability table is incomplete");
            return Err(EngineError::IncompleteProbabilityTable { version_id });
        }
        let item = draw_with_thread_rng(&tiers, &pool)?;

        let reward = RewardCatalogRepo::find_by_id(&mut *tx, item.reward_id)
            .await?
            .ok_or(EngineError::UnknownReward {
                reward_id: item.reward_id,
            })?;

        let created_at = now_micros();
        let result_signature = self.signer().sign(&SpinClaim {
            user_id,
            machine_id: machine.id,
            probability_version_id: version_id,
            reward_id: reward.id,
            rarity: &item.rarity,
            created_at,
            idempotency_key: key,
        });
        let input = CreateSpin {
            user_id,
            machine_id: machine.id,
            probability_version_id: version_id,
            cost,
            used_ticket: req.use_ticket,
            result_rarity: item.rarity.clone(),
            result_reward_id: reward.id,
            idempotency_key: key.to_string(),
            result_signature,
            created_at,
        };

        let spin = match SpinRepo::create(&mut *tx, &input).await {
            Ok(spin) => spin,
            Err(e) if is_key_collision(&e) => {
                return Err(EngineError::Transient("concurrent spin with same key".into()))
            }
            Err(e) => return Err(e.into()),
        };

        if reward.stackable {
            InventoryRepo::add_to_stack(&mut *tx, user_id, reward.id).await?;
        } else {
            InventoryRepo::insert_from_spin(&mut *tx, user_id, reward.id, spin.id).await?;
        }

        let balance_after = ledger::balance(&mut *tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            spin_id = spin.id,
            machine_id = machine.id,
            version_id,
            reward_id = reward.id,
            rarity = %spin.result_rarity,
            cost,
            used_ticket = req.use_ticket,
            "Spin executed"
        );

        Ok(SpinOutcome {
            spin,
            reward,
            balance_after,
            idempotent_replay: false,
        })
    }

    /// Recompute a stored spin's signature and compare.
    pub async fn verify_spin(&self, spin_id: DbId) -> EngineResult<SpinVerification> {
        let spin = SpinRepo::find_by_id(self.pool(), spin_id)
            .await?
            .ok_or(EngineError::SpinNotFound(spin_id))?;
        let valid = self.signer().verify(&spin.claim(), &spin.result_signature);
        if !valid {
            tracing::warn!(spin_id, "Spin signature mismatch");
        }
        Ok(SpinVerification {
            spin_id,
            signature: spin.result_signature,
            valid,
        })
    }

    pub async fn machine_view(&self, machine_id: DbId) -> EngineResult<MachineView> {
        let machine = MachineRepo::find_by_id(self.pool(), machine_id)
            .await?
            .ok_or(EngineError::MachineNotFound(machine_id))?;

        let (version, tiers, pool) = match machine.probability_version_id {
            Some(version_id) => (
                ProbabilityVersionRepo::find_by_id(self.pool(), version_id).await?,
                ProbabilityTierRepo::list_by_version(self.pool(), version_id).await?,
                RewardPoolRepo::list_view_by_version(self.pool(), version_id).await?,
            ),
            None => (None, Vec::new(), Vec::new()),
        };
        let recent_wins = SpinRepo::recent_for_machine(self.pool(), machine_id, RECENT_WINS).await?;

        Ok(MachineView {
            machine,
            version,
            tiers,
            pool,
            recent_wins,
        })
    }
}
