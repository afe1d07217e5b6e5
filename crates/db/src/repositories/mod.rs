//! Repository layer: zero-sized structs with static methods taking a pool.

pub mod collection_repo;
pub mod nft_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use collection_repo::CollectionRepo;
pub use nft_repo::NftRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
