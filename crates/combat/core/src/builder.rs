//! Participant construction from persisted snapshots and catalog content.
//!
//! Aggregation order for players:
//!
//! ```text
//! persisted base → agency modifiers → title boost → upgraded equipment → sub-stats
//! ```
//!
//! Monsters take their definition stats plus their monster title's boost.
//! Every lookup that misses is a data gap: the contribution is skipped and
//! logged at debug level, never reported as an error. An unknown item also
//! drops its slot's upgrade sub-stats.

use tracing::debug;

use crate::config::CombatConfig;
use crate::env::{
    BaseStatLine, CatalogOracle, MonsterDefinition, PlayerSnapshot, SkillKind, TitleDefinition,
};
use crate::passives::PassiveId;
use crate::state::Participant;
use crate::stats::{Stats, apply_agency_modifiers, apply_boost};

fn stats_from(base: &BaseStatLine) -> Stats {
    let mut stats = Stats::new(base.hp, base.atk, base.def, base.spd);
    stats.crit_rate = base.crit_rate;
    stats.crit_damage = base.crit_damage;
    stats
}

/// Declares the title's actives and passives on `participant`.
fn equip_title_skills(mut participant: Participant, title: &TitleDefinition) -> Participant {
    for decl in &title.skills {
        match decl.kind {
            SkillKind::Active => {
                let cooldown = decl.cooldown.unwrap_or(CombatConfig::DEFAULT_COOLDOWN);
                participant = participant.with_skill(decl.name.as_str(), cooldown);
            }
            SkillKind::Passive => match decl.name.parse::<PassiveId>() {
                Ok(passive) => participant = participant.with_passive(passive),
                Err(_) => {
                    debug!(
                        target: "combat::builder",
                        title = %title.id,
                        passive = %decl.name,
                        "ignoring unknown passive"
                    );
                }
            },
        }
    }
    participant
}

/// Builds a player's battle participant.
pub fn build_player(snapshot: &PlayerSnapshot, catalog: &dyn CatalogOracle) -> Participant {
    let mut stats = stats_from(&snapshot.base);

    let agency = snapshot.agency_id.as_deref().and_then(|id| {
        let found = catalog.agency(id);
        if found.is_none() {
            debug!(target: "combat::builder", player = %snapshot.player_id, agency = id, "unknown agency");
        }
        found
    });
    if let Some(agency) = agency {
        apply_agency_modifiers(&mut stats, &agency.stat_modifiers);
    }

    let title = snapshot.title_id.as_deref().and_then(|id| {
        let found = catalog.title(id);
        if found.is_none() {
            debug!(target: "combat::builder", player = %snapshot.player_id, title = id, "unknown title");
        }
        found
    });
    if let Some(title) = title {
        apply_boost(&mut stats, &title.stat_boost, None);
    }

    for (slot, item_id) in &snapshot.equipment {
        let Some(item) = catalog.item(item_id) else {
            debug!(target: "combat::builder", slot = %slot, item = %item_id, "unknown item");
            continue;
        };
        let upgrade = snapshot.upgrades.get(slot);
        let level = upgrade.map_or(0, |u| u.level);
        apply_boost(&mut stats, &item.stat_boost, Some(level));
        if let Some(upgrade) = upgrade {
            apply_boost(&mut stats, &upgrade.bonus_stats, None);
        }
    }

    let mut participant = Participant::new(snapshot.name.as_str(), stats).with_player(snapshot.player_id);
    if let Some(agency) = agency {
        participant = participant.with_agency(agency.clone());
    }
    if let Some(title) = title {
        participant = equip_title_skills(participant, title);
    }

    debug!(
        target: "combat::builder",
        player = %snapshot.player_id,
        hp = participant.max_hp(),
        atk = participant.stats.atk,
        def = participant.stats.def,
        spd = participant.stats.spd,
        skills = participant.skills.len(),
        passives = participant.passives.len(),
        "player built"
    );
    participant
}

/// Builds a monster's battle participant, rewards included.
pub fn build_monster(definition: &MonsterDefinition, catalog: &dyn CatalogOracle) -> Participant {
    let mut stats = stats_from(&definition.stats);
    let title = definition.title_id.as_deref().and_then(|id| {
        let found = catalog.monster_title(id);
        if found.is_none() {
            debug!(target: "combat::builder", monster = %definition.id, title = id, "unknown monster title");
        }
        found
    });
    if let Some(title) = title {
        apply_boost(&mut stats, &title.stat_boost, None);
    }

    let mut participant =
        Participant::new(definition.name.as_str(), stats).with_rewards(definition.rewards);
    if let Some(title) = title {
        participant = equip_title_skills(participant, title);
    }
    debug!(
        target: "combat::builder",
        monster = %definition.id,
        hp = participant.max_hp(),
        skills = participant.skills.len(),
        "monster built"
    );
    participant
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::env::{
        AgencyDefinition, ItemDefinition, ModifierOp, RewardRange, RewardTable, SkillDecl,
        SlotUpgrade, StatBoost, StatModifier,
    };
    use crate::state::SkillRef;
    use crate::skills::SkillId;

    #[derive(Default)]
    struct MapCatalog {
        titles: BTreeMap<String, TitleDefinition>,
        monster_titles: BTreeMap<String, TitleDefinition>,
        items: BTreeMap<String, ItemDefinition>,
        agencies: BTreeMap<String, AgencyDefinition>,
    }

    impl CatalogOracle for MapCatalog {
        fn title(&self, id: &str) -> Option<&TitleDefinition> {
            self.titles.get(id)
        }

        fn monster_title(&self, id: &str) -> Option<&TitleDefinition> {
            self.monster_titles.get(id)
        }

        fn item(&self, id: &str) -> Option<&ItemDefinition> {
            self.items.get(id)
        }

        fn agency(&self, id: &str) -> Option<&AgencyDefinition> {
            self.agencies.get(id)
        }

        fn monster(&self, _id: &str) -> Option<&MonsterDefinition> {
            None
        }
    }

    fn boost(pairs: &[(&str, f64)]) -> StatBoost {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    fn catalog() -> MapCatalog {
        let mut catalog = MapCatalog::default();
        catalog.titles.insert(
            "bard".into(),
            TitleDefinition {
                id: "bard".into(),
                name: "Bard".into(),
                stat_boost: boost(&[("atk", 5.0), ("crit_dmg", 0.25)]),
                skills: vec![
                    SkillDecl::active("Heavy Blow", 2),
                    SkillDecl {
                        name: "Mystery Dance".into(),
                        kind: SkillKind::Active,
                        cooldown: None,
                    },
                    SkillDecl::passive("Extra Life"),
                    SkillDecl::passive("Unheard Of"),
                ],
            },
        );
        catalog.items.insert(
            "sword".into(),
            ItemDefinition {
                id: "sword".into(),
                name: "Sword".into(),
                stat_boost: boost(&[("atk", 10.0), ("spd", -5.0)]),
            },
        );
        let mut agency = AgencyDefinition::new("guild", "Guild");
        agency.stat_modifiers = vec![StatModifier {
            stat: "hp".into(),
            op: ModifierOp::Multiply,
            value: 1.5,
        }];
        catalog.agencies.insert("guild".into(), agency);
        catalog
    }

    #[test]
    fn player_aggregates_every_layer() {
        let mut snapshot = PlayerSnapshot::new(7, "Ayla");
        snapshot.base = BaseStatLine::new(200.0, 20.0, 10.0, 15.0);
        snapshot.agency_id = Some("guild".into());
        snapshot.title_id = Some("bard".into());
        snapshot.equipment.insert("weapon".into(), "sword".into());
        snapshot.upgrades.insert(
            "weapon".into(),
            SlotUpgrade {
                level: 3,
                bonus_stats: boost(&[("def", 4.0)]),
            },
        );

        let player = build_player(&snapshot, &catalog());
        // 20 + 5 (title) + trunc(10 × 1.3) (sword +3)
        assert_eq!(player.stats.atk, 38.0);
        assert_eq!(player.stats.def, 14.0);
        // -5 + trunc(3 / 3)
        assert_eq!(player.stats.spd, 11.0);
        assert_eq!(player.max_hp(), 300);
        assert_eq!(player.hp(), 300);
        assert!((player.stats.crit_damage - 1.75).abs() < 1e-9);
        assert!(player.is_player);
        assert!(player.agency.is_some());
        assert_eq!(player.base_stats(), &player.stats);
    }

    #[test]
    fn title_skills_default_their_cooldown() {
        let mut snapshot = PlayerSnapshot::new(1, "Bo");
        snapshot.title_id = Some("bard".into());
        let player = build_player(&snapshot, &catalog());

        assert_eq!(player.skills.len(), 2);
        assert_eq!(player.skills[0].skill, SkillRef::Active(SkillId::HeavyBlow));
        assert_eq!(player.skills[0].cooldown, 2);
        assert_eq!(player.skills[1].skill, SkillRef::Unknown);
        assert_eq!(player.skills[1].cooldown, CombatConfig::DEFAULT_COOLDOWN);
        assert!(player.skills.iter().all(|s| s.is_ready()));
        assert_eq!(player.passives, vec![PassiveId::ExtraLife]);
    }

    #[test]
    fn missing_content_is_neutral() {
        let mut snapshot = PlayerSnapshot::new(2, "Cy");
        snapshot.base = BaseStatLine::new(150.0, 12.0, 6.0, 9.0);
        snapshot.title_id = Some("ghost".into());
        snapshot.agency_id = Some("nowhere".into());
        snapshot.equipment.insert("ring".into(), "lost ring".into());
        snapshot.upgrades.insert(
            "ring".into(),
            SlotUpgrade {
                level: 2,
                bonus_stats: boost(&[("atk", 9.0)]),
            },
        );
        let player = build_player(&snapshot, &catalog());
        assert_eq!(player.stats, Stats::new(150.0, 12.0, 6.0, 9.0));
        assert!(player.agency.is_none());
        assert!(player.skills.is_empty());
    }

    #[test]
    fn monster_copies_rewards_and_title() {
        let mut catalog = catalog();
        catalog.monster_titles.insert(
            "brute".into(),
            TitleDefinition {
                id: "brute".into(),
                name: "Brute".into(),
                stat_boost: boost(&[("hp", 50.0)]),
                skills: vec![SkillDecl::active("Savage Rampage", 4)],
            },
        );
        let definition = MonsterDefinition {
            id: "ogre".into(),
            name: "Ogre".into(),
            stats: BaseStatLine::new(400.0, 30.0, 12.0, 5.0),
            title_id: Some("brute".into()),
            rewards: RewardTable {
                exp: RewardRange::new(10, 20),
                prisma: RewardRange::new(1, 3),
            },
        };
        let monster = build_monster(&definition, &catalog);
        assert_eq!(monster.max_hp(), 450);
        assert!(!monster.is_player);
        assert_eq!(monster.rewards, Some(definition.rewards));
        assert_eq!(monster.skills[0].skill, SkillRef::Active(SkillId::SavageRampage));
    }
}
