//! Repository layer.
//!
//! Each repository is a zero-sized struct whose async methods take an
//! executor (pool or open transaction) as the first argument.

pub mod equipped_item_repo;
pub mod inventory_repo;
pub mod machine_repo;
pub mod payment_repo;
pub mod probability_tier_repo;
pub mod probability_version_repo;
pub mod responsible_limit_repo;
pub mod reward_catalog_repo;
pub mod reward_pool_repo;
pub mod shop_package_repo;
pub mod spin_repo;
pub mod user_repo;
pub mod wallet_repo;
pub mod wallet_transaction_repo;

pub use equipped_item_repo::EquippedItemRepo;
pub use inventory_repo::InventoryRepo;
pub use machine_repo::MachineRepo;
pub use payment_repo::PaymentRepo;
pub use probability_tier_repo::ProbabilityTierRepo;
pub use probability_version_repo::ProbabilityVersionRepo;
pub use responsible_limit_repo::ResponsibleLimitRepo;
pub use reward_catalog_repo::RewardCatalogRepo;
pub use reward_pool_repo::RewardPoolRepo;
pub use shop_package_repo::ShopPackageRepo;
pub use spin_repo::SpinRepo;
pub use user_repo::UserRepo;
pub use wallet_repo::WalletRepo;
pub use wallet_transaction_repo::WalletTransactionRepo;
