use std::fs;

use combat_content::ContentFactory;
use combat_core::{CatalogOracle, build_player};

fn write_fixture(dir: &std::path::Path) {
    fs::write(
        dir.join("titles.ron"),
        r#"(titles: [(
            id: "knight",
            name: "Knight",
            stat_boost: { "def": 5.0 },
            skills: [(name: "Heavy Blow", kind: active, cooldown: Some(2)), (name: "Extra Life", kind: passive)],
        )])"#,
    )
    .unwrap();
    fs::write(
        dir.join("monsters.ron"),
        r#"(monsters: [(
            id: "rat",
            name: "Rat",
            stats: (hp: 80.0, atk: 8.0, def: 2.0, spd: 9.0),
            rewards: (exp: (min: 5, max: 8), prisma: (min: 1, max: 2)),
        )])"#,
    )
    .unwrap();
    fs::write(
        dir.join("items.ron"),
        r#"(items: [(id: "stick", name: "Stick", stat_boost: { "atk": 3.0 })])"#,
    )
    .unwrap();
    fs::write(dir.join("agencies.ron"), "(agencies: [])").unwrap();
    fs::write(
        dir.join("players.ron"),
        r#"(players: [(
            player_id: (1),
            name: "Pip",
            base: (hp: 120.0, atk: 12.0, def: 4.0, spd: 8.0),
            equipment: { "weapon": "stick" },
            title_id: Some("knight"),
        )])"#,
    )
    .unwrap();
    fs::write(dir.join("config.toml"), "counter_multiplier = 1.0\n").unwrap();
}

#[test]
fn factory_loads_a_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let factory = ContentFactory::new(dir.path());

    let catalog = factory.load_catalog().unwrap();
    assert_eq!(catalog.monster("rat").map(|m| m.stats.hp), Some(80.0));
    assert_eq!(factory.load_config().unwrap().counter_multiplier, 1.0);

    let players = factory.load_players().unwrap();
    let pip = build_player(&players[0], &catalog);
    assert_eq!(pip.stats.atk, 15.0);
    assert_eq!(pip.stats.def, 9.0);
    assert_eq!(pip.skills.len(), 1);
    assert_eq!(pip.passives.len(), 1);
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(err.to_string().contains("monsters.ron"));
}

#[test]
fn malformed_ron_reports_the_table() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("items.ron"), "(items: [(id: 3)])").unwrap();
    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(err.to_string().contains("item catalog"));
}
