pub mod two_tier_cache;

pub use two_tier_cache::TwoTierCache;
