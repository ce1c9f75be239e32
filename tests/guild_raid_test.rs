//! Integration test: guild membership, tourney resets and raids
//!
//! Guild rewards come back as reward deltas, so every scenario ends by
//! paying them into progression records.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pilgrimage::character::{effective_stats, BaseCharacter};
use pilgrimage::core::{GameConfig, GameError, PlayerId};
use pilgrimage::guild::{reset_tourney, Guild, Raid, RaidFailure, RaidParticipant, RaidPhase, Tourney};
use pilgrimage::items::Equipment;
use pilgrimage::progression::{ProgressionLedger, ProgressionRecord};
use pilgrimage::zones::Zone;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap()
}

fn guild_with(id: u64, owner: PlayerId, members: &[PlayerId], config: &GameConfig) -> Guild {
    let mut guild = Guild::new(id, format!("Fellowship {}", id), owner, &config.guild, t0());
    for &member in members {
        guild.add_member(member, &config.guild).unwrap();
    }
    guild
}

fn participant(player_id: PlayerId, level: u32, in_town: bool, config: &GameConfig) -> RaidParticipant {
    let base = BaseCharacter::new(format!("Pilgrim {}", player_id), level);
    let stats = effective_stats(&base, &Equipment::new(), &[], config).unwrap();
    RaidParticipant::from_stats(player_id, &stats, in_town)
}

fn formed_raid(guild: &Guild, config: &GameConfig, rng: &mut ChaCha8Rng) -> Raid {
    let mut raid = Raid::form(guild, Zone::new(6, "Hollow Keep", 8), rng).unwrap();
    for &member in &guild.members {
        raid.join(guild, participant(member, 10, true, config)).unwrap();
    }
    raid
}

#[test]
fn test_guild_fills_up_until_upgraded() {
    let config = GameConfig::default();
    let mut guild = guild_with(1, 100, &[101, 102, 103], &config);
    assert_eq!(guild.capacity(&config.guild), 4);

    let err = guild.add_member(104, &config.guild).unwrap_err();
    assert!(matches!(err, GameError::GuildFull { capacity: 4 }));
    assert_eq!(guild.members.len(), 4);

    assert!(matches!(
        guild.upgrade(&config.guild),
        Err(GameError::InsufficientFunds { .. })
    ));
    guild.deposit(guild.upgrade_cost(&config.guild));
    guild.upgrade(&config.guild).unwrap();
    assert_eq!(guild.level, 2);
    assert_eq!(guild.bank, 0);
    assert_eq!(guild.capacity(&config.guild), 8);
    guild.add_member(104, &config.guild).unwrap();

    assert!(matches!(
        guild.remove_member(100),
        Err(GameError::ActionNotPermitted(_))
    ));
    guild.remove_member(104).unwrap();
    assert!(!guild.is_member(104));
}

#[test]
fn test_tourney_reset_pays_members() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut guilds = vec![
        guild_with(1, 100, &[101], &config),
        guild_with(2, 200, &[], &config),
        guild_with(3, 300, &[301], &config),
    ];
    // 10 prestige shared by two members, 3 prestige by one
    assert_eq!(guilds[0].record_quest(10, &config.guild), 500);
    assert_eq!(guilds[1].record_quest(3, &config.guild), 300);

    let mut tourney = Tourney::new(t0(), &config.guild);
    let end = tourney.ends_at();
    assert!(tourney.has_ended(end));

    let result = reset_tourney(&mut tourney, &mut guilds, end, &config.guild, &mut rng);
    assert_eq!(result.edition, 1);
    assert_eq!(result.placements.len(), 2);
    assert_eq!(result.placements[0].guild_id, 1);
    assert_eq!(result.placements[0].reward_per_member, 10_000);
    assert_eq!(result.placements[1].guild_id, 2);
    assert_eq!(result.placements[1].reward_per_member, 5_000);
    assert_eq!(result.rewards.len(), 3);

    assert_eq!(tourney.edition, 2);
    assert_eq!(tourney.start, end);
    assert!(guilds.iter().all(|g| g.tourney_score == 0));
    assert_eq!(guilds[0].prestige, 10);

    for reward in &result.rewards {
        let mut record = ProgressionRecord::new(reward.player_id, "Member", &config, t0());
        ledger.apply_outcome(&mut record, &reward.delta).unwrap();
        let expected_pieces = u32::from(reward.player_id == 100);
        assert_eq!(record.artifact_pieces, expected_pieces);
        assert!(record.money > config.progression.default_money);
    }
}

#[test]
fn test_raid_runs_to_completion() {
    let config = GameConfig::default();
    let ledger = ProgressionLedger::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut guild = guild_with(1, 100, &[101, 102], &config);

    let mut raid = formed_raid(&guild, &config, &mut rng);
    raid.start(&mut guild, t0(), &config.raid, &mut rng).unwrap();
    assert_eq!(raid.phase, RaidPhase::Active);
    assert_eq!(raid.monsters.len(), 3);
    assert!(raid.monsters.iter().all(|m| m.level == 8));
    assert_eq!(guild.last_raid, Some(t0()));

    let phase = raid
        .advance(t0() + Duration::hours(17), &config.raid, &mut rng)
        .unwrap();
    assert_eq!(phase, RaidPhase::Active);
    let phase = raid
        .advance(t0() + Duration::hours(18), &config.raid, &mut rng)
        .unwrap();
    assert_eq!(phase, RaidPhase::BossPhase);
    assert_eq!(raid.boss.as_ref().map(|b| b.level), Some(13));

    raid.update_participant_hp(101, 0).unwrap();
    let phase = raid
        .advance(t0() + Duration::hours(24), &config.raid, &mut rng)
        .unwrap();
    assert_eq!(phase, RaidPhase::Resolved);

    let result = raid.result(&config.raid).unwrap();
    assert!(result.success);
    assert_eq!(result.participants, vec![100, 101, 102]);
    assert_eq!(result.rewards.len(), 3);

    let mut record = ProgressionRecord::new(100, "Leader", &config, t0());
    ledger.apply_outcome(&mut record, &result.rewards[0].delta).unwrap();
    assert_eq!(record.money, config.progression.default_money + 4_000);
    assert!(record.level > 1);

    // Asking for the result again must not mint a second payout
    let again = raid.result(&config.raid).unwrap();
    let money = record.money;
    assert!(matches!(
        ledger.apply_outcome(&mut record, &again.rewards[0].delta),
        Err(GameError::DuplicateOutcome(id)) if id == result.rewards[0].delta.outcome_id
    ));
    assert_eq!(record.money, money);
}

#[test]
fn test_raid_fails_when_leader_dies() {
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut guild = guild_with(1, 100, &[101], &config);

    let mut raid = formed_raid(&guild, &config, &mut rng);
    raid.start(&mut guild, t0(), &config.raid, &mut rng).unwrap();

    let phase = raid.update_participant_hp(100, 0).unwrap();
    assert_eq!(phase, RaidPhase::Failed(RaidFailure::LeaderDead));
    assert!(!raid.leader_alive());
    assert!(matches!(
        raid.advance(t0() + Duration::hours(24), &config.raid, &mut rng),
        Err(GameError::InvalidRaidTransition(_))
    ));

    let result = raid.result(&config.raid).unwrap();
    assert!(!result.success);
    assert!(result.rewards.is_empty());
}

#[test]
fn test_raid_preconditions() {
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let mut guild = guild_with(1, 100, &[101, 102], &config);
    let zone = Zone::new(6, "Hollow Keep", 8);

    // Leader missing
    let mut raid = Raid::form(&guild, zone.clone(), &mut rng).unwrap();
    raid.join(&guild, participant(101, 10, true, &config)).unwrap();
    assert!(matches!(
        raid.start(&mut guild, t0(), &config.raid, &mut rng),
        Err(GameError::RaidPreconditionFailed(_))
    ));

    // Someone still out questing
    raid.join(&guild, participant(100, 10, true, &config)).unwrap();
    raid.join(&guild, participant(102, 10, false, &config)).unwrap();
    assert!(matches!(
        raid.start(&mut guild, t0(), &config.raid, &mut rng),
        Err(GameError::RaidPreconditionFailed(_))
    ));
    assert!(guild.last_raid.is_none());

    // Outsiders cannot join
    assert!(matches!(
        raid.join(&guild, participant(999, 10, true, &config)),
        Err(GameError::NotAMember(999))
    ));

    // Cooldown
    let mut first = formed_raid(&guild, &config, &mut rng);
    first.start(&mut guild, t0(), &config.raid, &mut rng).unwrap();

    let mut second = formed_raid(&guild, &config, &mut rng);
    assert!(matches!(
        second.start(&mut guild, t0() + Duration::days(6), &config.raid, &mut rng),
        Err(GameError::RaidPreconditionFailed(_))
    ));
    second
        .start(&mut guild, t0() + Duration::days(7), &config.raid, &mut rng)
        .unwrap();
    assert_eq!(guild.last_raid, Some(t0() + Duration::days(7)));
}
