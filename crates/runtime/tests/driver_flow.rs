use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use combat_content::ContentFactory;
use combat_core::{
    CombatAction, CombatSession, OutcomeReason, Participant, SessionBuilder, Side, Stats,
};
use combat_runtime::{
    AiActionProvider, ChannelActionProvider, CombatDriver, CombatEvent, EncounterBuilder,
    PhaseEvent, RuntimeConfig, RuntimeError, ScriptedActionProvider, SessionRegistry, Topic,
};

fn fighter(name: &str, hp: f64, atk: f64, spd: f64) -> Participant {
    let mut stats = Stats::new(hp, atk, 0.0, spd);
    stats.crit_rate = 0.0;
    Participant::new(name, stats)
}

fn duel(p1: Participant, p2: Participant) -> CombatSession {
    SessionBuilder::new(p1, p2).seed(11).build()
}

fn quick_config() -> RuntimeConfig {
    RuntimeConfig {
        ai_delay: Duration::ZERO,
        action_timeout: Duration::from_secs(5),
        max_turns: Some(500),
        event_buffer_size: 4096,
        ..RuntimeConfig::default()
    }
    .with_seed(7)
}

#[tokio::test]
async fn ai_battle_from_the_bundled_catalog_finishes() {
    let catalog = ContentFactory::bundled_catalog().unwrap();
    let players = ContentFactory::bundled_players().unwrap();
    let registry = SessionRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_cb = Arc::clone(&calls);

    let encounter = EncounterBuilder::new(&catalog, registry.clone(), quick_config())
        .on_finish(move |_| {
            calls_cb.fetch_add(1, Ordering::SeqCst);
        })
        .pve(&players[0], "thornback_wolf")
        .unwrap();
    assert!(registry.is_in_combat(players[0].player_id));

    let ai: Arc<AiActionProvider> = Arc::new(AiActionProvider::instant());
    let driver = CombatDriver::new(encounter.session, ai.clone(), ai, quick_config())
        .with_guard(encounter.guard);
    let mut phases = driver.handle().subscribe(Topic::Phase);
    let mut narration = driver.handle().subscribe(Topic::Narration);

    let outcome = driver.run().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.is_empty());
    assert!(matches!(
        narration.recv().await.unwrap(),
        CombatEvent::Narration { lines } if !lines.is_empty()
    ));

    let mut finished = None;
    while let Ok(event) = phases.try_recv() {
        if let CombatEvent::Phase(PhaseEvent::Finished(o)) = event {
            finished = Some(o);
        }
    }
    assert_eq!(finished, Some(outcome));
}

#[tokio::test]
async fn surrender_interrupts_a_pending_action() {
    let (_sender, input) = ChannelActionProvider::channel(Side::P1, 4);
    let driver = CombatDriver::new(
        duel(fighter("Hero", 500.0, 10.0, 20.0), fighter("Ogre", 500.0, 10.0, 5.0)),
        Arc::new(input),
        Arc::new(AiActionProvider::instant()),
        quick_config(),
    );
    let mut phases = driver.handle().subscribe(Topic::Phase);
    let (handle, task) = driver.spawn();

    loop {
        if let CombatEvent::Phase(PhaseEvent::AwaitingAction { side: Side::P1, .. }) =
            phases.recv().await.unwrap()
        {
            break;
        }
    }
    handle.surrender(Side::P1).await.unwrap();

    let outcome = task.await.unwrap().unwrap();
    assert_eq!(outcome.reason, OutcomeReason::Surrender);
    assert_eq!(outcome.winner, Some(Side::P2));
    assert_eq!(outcome.loser, Some(Side::P1));
}

#[tokio::test]
async fn inactivity_ends_the_battle_as_a_timeout() {
    let (_sender, input) = ChannelActionProvider::channel(Side::P1, 4);
    let config = RuntimeConfig {
        action_timeout: Duration::from_millis(50),
        ..quick_config()
    };
    let driver = CombatDriver::new(
        duel(fighter("Hero", 500.0, 10.0, 20.0), fighter("Ogre", 500.0, 10.0, 5.0)),
        Arc::new(input),
        Arc::new(AiActionProvider::instant()),
        config,
    );

    let outcome = driver.run().await.unwrap();
    assert_eq!(outcome.reason, OutcomeReason::Timeout);
    assert_eq!(outcome.winner, None);
}

#[tokio::test]
async fn player_input_is_resolved() {
    let (sender, input) = ChannelActionProvider::channel(Side::P1, 4);
    let driver = CombatDriver::new(
        duel(fighter("Hero", 500.0, 100.0, 20.0), fighter("Rat", 50.0, 1.0, 0.0)),
        Arc::new(input),
        Arc::new(AiActionProvider::instant()),
        quick_config(),
    );
    sender.send(CombatAction::Attack).await.unwrap();

    let outcome = driver.run().await.unwrap();
    assert_eq!(outcome.winner, Some(Side::P1));
    assert_eq!(outcome.reason, OutcomeReason::Knockout);
}

#[tokio::test]
async fn rejected_actions_are_reported_and_retried() {
    let driver = CombatDriver::new(
        duel(fighter("Hero", 500.0, 100.0, 20.0), fighter("Rat", 1.0, 1.0, 0.0)),
        Arc::new(ScriptedActionProvider::new([CombatAction::Skill("Moonbeam".into())])),
        Arc::new(ScriptedActionProvider::default()),
        quick_config(),
    );
    let mut phases = driver.handle().subscribe(Topic::Phase);

    let outcome = driver.run().await.unwrap();
    assert_eq!(outcome.winner, Some(Side::P1));

    let mut rejected = false;
    while let Ok(event) = phases.try_recv() {
        if let CombatEvent::Phase(PhaseEvent::ActionRejected { side, reason }) = event {
            assert_eq!(side, Side::P1);
            assert!(reason.contains("Moonbeam"));
            rejected = true;
        }
    }
    assert!(rejected);
}

#[tokio::test]
async fn busy_players_cannot_start_a_second_encounter() {
    let catalog = ContentFactory::bundled_catalog().unwrap();
    let players = ContentFactory::bundled_players().unwrap();
    let registry = SessionRegistry::new();

    let first = EncounterBuilder::new(&catalog, registry.clone(), quick_config())
        .pvp(&players[0], &players[1])
        .unwrap();
    let err = EncounterBuilder::new(&catalog, registry.clone(), quick_config())
        .pve(&players[1], "marsh_spider")
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::AlreadyInCombat { player } if player == players[1].player_id
    ));

    drop(first);
    assert!(!registry.is_in_combat(players[1].player_id));
    assert!(
        EncounterBuilder::new(&catalog, registry, quick_config())
            .pve(&players[1], "missing")
            .is_err()
    );
}
