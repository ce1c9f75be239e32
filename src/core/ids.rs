use rand::Rng;
use uuid::{Builder, Uuid};

/// Persistent player identifier, assigned by the storage layer.
pub type PlayerId = u64;

/// Persistent guild identifier, assigned by the storage layer.
pub type GuildId = u64;

/// Builds a v4 UUID from the injected generator so seeded runs stay reproducible.
pub fn new_outcome_id(rng: &mut impl Rng) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Id of one member's share of a group outcome. The same group and member
/// always give the same id, so a share can only be applied once.
pub fn member_outcome_id(group: &Uuid, player_id: PlayerId) -> Uuid {
    Uuid::new_v5(group, &player_id.to_le_bytes())
}
