//! Agents of the economy and the markets they meet in
//!
//! Households work for firms and buy their goods. Both live in an
//! `EconomyWorld` arena and are advanced by the free functions in `systems`.

pub mod firm;
pub mod household;
pub mod systems;
pub mod world;

pub use firm::{Firm, HiringStatus};
pub use household::Household;
pub use world::EconomyWorld;
