//! Pilgrimage - simulation core of a persistent real-time RPG
//!
//! Stat aggregation, quest resolution, turn-based combat, the progression
//! economy, guilds and raids, plus a balance simulator built on top of them.
//! Every resolver takes its configuration and random source explicitly.

pub mod character;
pub mod combat;
pub mod core;
pub mod events;
pub mod guild;
pub mod items;
pub mod progression;
pub mod quests;
pub mod simulator;
pub mod zones;
