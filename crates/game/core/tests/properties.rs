//! End-to-end tick properties: invariants, determinism, cascade order,
//! loot ordering, statuses, deaths and the conversion guard.

use combat_core::{
    AiBehavior, CombatConfig, CombatEnv, CombatWorld, Combatant, CombatantId, Env,
    EventKind, EventPayload, Gate, ItemCatalog, ItemDefinition, ItemHandle, ItemId, ItemInstance,
    ItemKind, LootEntry, LootOutcome, Origin, PcgRng, Placement, PlayerAction, Position,
    ScriptedRng, SpeciesId, SpeciesTable, StatusEffect, StatusKind, TickError, TickInput,
    TickOutcome, TurnOrchestrator,
};
use combat_core::engine::ActionError;
use combat_core::env::{ArmourData, RngOracle, WeaponData};
use combat_core::state::{AbilityScores, InnateAttack};

const PLAYER: CombatantId = CombatantId::PLAYER;
const GHOUL: CombatantId = CombatantId(2);
const RAT: CombatantId = CombatantId(3);

const DAGGER: ItemHandle = ItemHandle(1);
const LEATHER: ItemHandle = ItemHandle(2);
const TRINKET: ItemHandle = ItemHandle(3);

fn catalog() -> ItemCatalog {
    [
        ItemDefinition::new(DAGGER, "dagger", ItemKind::Weapon(WeaponData::melee(6))).with_ion_value(40),
        ItemDefinition::new(LEATHER, "leather", ItemKind::Armour(ArmourData { armour_class: 5 }))
            .with_ion_value(60),
        ItemDefinition::new(TRINKET, "bottle cap", ItemKind::Trinket).with_ion_value(25),
    ]
    .into_iter()
    .collect()
}

fn player() -> Combatant {
    Combatant::player("Tess").with_hp(40, 40)
}

fn create_test_monster(id: CombatantId) -> Combatant {
    Combatant::monster(id, "Ghoul", SpeciesId(1)).with_hp(30, 30)
}

/// Player and monster targeting each other at the origin.
fn engaged_world(monster: Combatant) -> CombatWorld {
    let mut world = CombatWorld::new(7);
    let mut player = player();
    player.target = Some(monster.id);
    let mut monster = monster;
    monster.target = Some(PLAYER);
    monster.behavior = AiBehavior::Attack;
    world.insert_combatant(player).unwrap();
    world.insert_combatant(monster).unwrap();
    world
}

fn resolve(
    world: &CombatWorld,
    action: PlayerAction,
    config: &CombatConfig,
    rng: &dyn RngOracle,
) -> Result<TickOutcome, TickError> {
    let items = catalog();
    let species = SpeciesTable::new();
    let env: CombatEnv<'_> = Env::new(
        Some(&items as &dyn combat_core::ItemOracle),
        Some(&species as &dyn combat_core::SpeciesOracle),
        Some(rng),
    );
    TurnOrchestrator::new(env, config).resolve(world, &TickInput::new(action))
}

fn clawed_monster(id: CombatantId) -> Combatant {
    create_test_monster(id).with_innate(InnateAttack::new("claw", 3, 1))
}

/// Gives the player a dagger to wield.
fn arm_player(world: &mut CombatWorld, item: ItemId) {
    world
        .insert_item(ItemInstance::new(item, DAGGER, Origin::Native, Placement::Carried(PLAYER)))
        .unwrap();
    let tess = world.combatant_mut(PLAYER).unwrap();
    tess.bag.push(item);
    tess.weapon = Some(item);
}

fn player_strike_damage(outcome: &TickOutcome) -> i32 {
    outcome
        .events
        .iter()
        .find_map(|e| match &e.payload {
            EventPayload::Strike(result) if e.actor == PLAYER => Some(result.damage),
            _ => None,
        })
        .expect("player strike event")
}

fn kinds(outcome: &TickOutcome) -> Vec<EventKind> {
    outcome.events.iter().map(|e| e.kind).collect()
}

fn gates(outcome: &TickOutcome) -> Vec<Gate> {
    outcome
        .events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::Gate(decision) => Some(decision.gate),
            _ => None,
        })
        .collect()
}

#[test]
fn flee_roll_below_threshold_flees() {
    // hp 20% sits under the 25% flee line.
    let world = engaged_world(create_test_monster(GHOUL).with_hp(20, 100).with_ions(50, 50));
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Flee, 10), (Gate::Heal, 100)]);
    let rng = ScriptedRng::new(vec![9]);

    let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();

    assert_eq!(gates(&outcome), vec![Gate::Flee]);
    assert_eq!(kinds(&outcome), vec![EventKind::Gate, EventKind::Flee]);
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.behavior, AiBehavior::Flee);
    assert_eq!(ghoul.target, None);
    assert_eq!(outcome.world.combatant(PLAYER).unwrap().target, None);
    assert_eq!(rng.consumed(), 1);
}

#[test]
fn failed_flee_roll_falls_through_to_heal() {
    let world = engaged_world(create_test_monster(GHOUL).with_hp(20, 100).with_ions(50, 50));
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Flee, 10), (Gate::Heal, 100)]);
    let rng = ScriptedRng::new(vec![10, 0]);

    let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();

    let EventPayload::Gate(decision) = &outcome.events[0].payload else {
        panic!("first event should be the gate decision");
    };
    assert_eq!(decision.gate, Gate::Heal);
    assert_eq!(decision.records[0].gate, Gate::Flee);
    assert_eq!(decision.records[0].roll, Some(10));
    assert!(!decision.records[0].triggered);

    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    // level 1: heal 1 + 5 HP for 5 ions
    assert_eq!(ghoul.hp.current, 26);
    assert_eq!(ghoul.ions, 45);
    assert_eq!(ghoul.behavior, AiBehavior::Heal);
    assert!(kinds(&outcome).contains(&EventKind::Heal));
}

#[test]
fn seeded_runs_replay_identically() {
    let mut start = engaged_world(create_test_monster(GHOUL).with_ions(30, 30));
    start
        .insert_combatant({
            let mut rat = create_test_monster(RAT).with_hp(12, 12);
            rat.name = "Rat".into();
            rat.target = Some(PLAYER);
            rat.behavior = AiBehavior::Attack;
            rat.abilities = AbilityScores::new(0, 40);
            rat
        })
        .unwrap();
    let config = CombatConfig::default().with_seed(0xC0FFEE);
    let script = [
        PlayerAction::Strike,
        PlayerAction::Strike,
        PlayerAction::Wait,
        PlayerAction::Strike,
        PlayerAction::Look,
        PlayerAction::Strike,
    ];

    let run = || {
        let rng = PcgRng;
        let mut world = start.clone();
        let mut trail = Vec::new();
        for action in script {
            match resolve(&world, action, &config, &rng) {
                Ok(outcome) => {
                    trail.push((outcome.events.clone(), outcome.rolls.clone()));
                    world = outcome.world;
                }
                Err(error) => {
                    trail.push((Vec::new(), Vec::new()));
                    assert!(matches!(error, TickError::Action { .. }), "{error}");
                }
            }
        }
        (trail, world)
    };

    let (first, first_world) = run();
    let (second, second_world) = run();
    assert_eq!(first, second);
    assert_eq!(first_world, second_world);
    assert!(first.iter().any(|(_, rolls)| !rolls.is_empty()));
}

#[test]
fn invariants_hold_across_seeded_fights() {
    let script = [
        PlayerAction::Engage { target: GHOUL },
        PlayerAction::Strike,
        PlayerAction::Strike,
        PlayerAction::Wait,
        PlayerAction::Strike,
        PlayerAction::Move {
            to: Position::new(2000, 1, 0),
        },
        PlayerAction::Move { to: Position::ORIGIN },
        PlayerAction::Strike,
        PlayerAction::Disengage,
        PlayerAction::Look,
    ];

    for seed in 0..24u64 {
        let mut world = CombatWorld::new(seed);
        world.insert_combatant(player()).unwrap();
        let mut ghoul = create_test_monster(GHOUL).with_ions(20, 40);
        ghoul.behavior = AiBehavior::Patrol;
        ghoul.bag = vec![ItemId(1)];
        ghoul.weapon = Some(ItemId(1));
        ghoul.armour = Some(ItemId(2));
        world.insert_combatant(ghoul).unwrap();
        world
            .insert_item(
                ItemInstance::new(ItemId(1), DAGGER, Origin::World, Placement::Carried(GHOUL))
                    .with_condition(8),
            )
            .unwrap();
        world
            .insert_item(ItemInstance::new(ItemId(2), LEATHER, Origin::World, Placement::Carried(GHOUL)))
            .unwrap();
        world
            .insert_item(ItemInstance::new(
                ItemId(3),
                TRINKET,
                Origin::World,
                Placement::Ground(Position::ORIGIN),
            ))
            .unwrap();

        let config = CombatConfig::default().with_wear_per_hit(5);
        for action in script {
            let outcome = match resolve(&world, action, &config, &PcgRng) {
                Ok(outcome) => outcome,
                Err(TickError::Action { .. }) => continue,
                Err(error) => panic!("seed {seed}: {action:?} failed: {error}"),
            };
            for combatant in outcome.world.combatants() {
                assert!(combatant.hp.current >= 0 && combatant.hp.current <= combatant.hp.maximum);
                assert!(combatant.ions >= 0);
            }
            for item in outcome.world.items() {
                if let Placement::Carried(owner) = item.placement {
                    let owner = outcome.world.combatant(owner).unwrap();
                    assert!(owner.holds(item.id), "seed {seed}: {} lost track of {}", owner.id, item.id);
                }
            }
            world = outcome.world;
        }
    }
}

#[test]
fn monster_death_drops_loot_in_declared_order() {
    let mut ghoul = create_test_monster(GHOUL).with_hp(5, 10).with_ions(12, 20);
    ghoul.bag = vec![ItemId(1), ItemId(2), ItemId(3)];
    ghoul.armour = Some(ItemId(4));
    let mut world = engaged_world(ghoul);
    for (id, handle) in [(1, DAGGER), (2, TRINKET), (3, TRINKET), (4, LEATHER)] {
        world
            .insert_item(ItemInstance::new(ItemId(id), handle, Origin::World, Placement::Carried(GHOUL)))
            .unwrap();
    }
    let config = CombatConfig::default().with_ground_cap(2);
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Strike, &config, &rng).unwrap();

    assert_eq!(
        kinds(&outcome),
        vec![
            EventKind::InnateHit,
            EventKind::Death,
            EventKind::LootSpawn,
            EventKind::LootSpawn,
            EventKind::LootVaporize,
            EventKind::LootVaporize,
            EventKind::LootVaporize,
        ]
    );
    let entries: Vec<LootEntry> = outcome
        .events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::Loot(outcome) => Some(outcome.entry()),
            _ => None,
        })
        .collect();
    assert_eq!(
        entries,
        vec![
            LootEntry::Item(ItemId(1)),
            LootEntry::Item(ItemId(2)),
            LootEntry::Item(ItemId(3)),
            LootEntry::Skull,
            LootEntry::Item(ItemId(4)),
        ]
    );
    assert!(matches!(
        outcome.events[2].payload,
        EventPayload::Loot(LootOutcome::Spawned { .. })
    ));

    let world = &outcome.world;
    assert_eq!(world.ground_at(Position::ORIGIN), vec![ItemId(1), ItemId(2)]);
    assert!(world.item(ItemId(3)).is_none());
    assert!(world.item(ItemId(4)).is_none());

    let tess = world.combatant(PLAYER).unwrap();
    assert_eq!(tess.ions, 12);
    assert_eq!(tess.experience, 100);
    assert_eq!(tess.target, None);
    assert!(!world.combatant(GHOUL).unwrap().is_alive());
}

#[test]
fn native_items_are_never_converted() {
    let mut ghoul = create_test_monster(GHOUL).with_ions(1, 100);
    ghoul.bag = vec![ItemId(1)];
    let mut world = engaged_world(ghoul);
    world
        .insert_item(ItemInstance::new(ItemId(1), TRINKET, Origin::Native, Placement::Carried(GHOUL)))
        .unwrap();
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Convert, 100)]);

    for roll in [0, 50, 99] {
        let rng = ScriptedRng::new(Vec::new()).with_fallback(roll);
        let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();
        assert_eq!(gates(&outcome), vec![Gate::Idle]);
        assert!(!kinds(&outcome).contains(&EventKind::Convert));
        assert_eq!(outcome.world.combatant(GHOUL).unwrap().bag, vec![ItemId(1)]);
    }
}

#[test]
fn low_ion_monster_converts_loot_from_the_ground() {
    let mut world = engaged_world(create_test_monster(GHOUL).with_ions(1, 100));
    world
        .insert_item(ItemInstance::new(
            ItemId(1),
            TRINKET,
            Origin::World,
            Placement::Ground(Position::ORIGIN),
        ))
        .unwrap();
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Convert, 100)]);
    let rng = ScriptedRng::new(vec![0]);

    let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();

    assert_eq!(kinds(&outcome), vec![EventKind::Gate, EventKind::Pickup, EventKind::Convert]);
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.ions, 26);
    assert!(ghoul.bag.is_empty());
    assert!(outcome.world.item(ItemId(1)).is_none());
}

#[test]
fn engaging_an_absent_monster_is_rejected() {
    let mut world = CombatWorld::new(1);
    world.insert_combatant(player()).unwrap();
    world
        .insert_combatant(create_test_monster(GHOUL).with_position(Position::new(2000, 3, 3)))
        .unwrap();
    let rng = ScriptedRng::new(Vec::new());

    let error = resolve(
        &world,
        PlayerAction::Engage { target: GHOUL },
        &CombatConfig::default(),
        &rng,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        TickError::Action {
            error: ActionError::TargetAbsent { target: GHOUL, .. },
            ..
        }
    ));
}

#[test]
fn corrupted_snapshot_is_never_committed() {
    let mut world = engaged_world(create_test_monster(GHOUL));
    // Carried by the ghoul, yet in nobody's bag.
    world
        .insert_item(ItemInstance::new(ItemId(9), TRINKET, Origin::World, Placement::Carried(GHOUL)))
        .unwrap();
    let config = CombatConfig::default().with_only_gates(&[]);

    let error = resolve(&world, PlayerAction::Wait, &config, &PcgRng).unwrap_err();
    assert!(matches!(error, TickError::Invariant(_)));
}

#[test]
fn exit_releases_every_pairing_without_monster_turns() {
    let world = engaged_world(create_test_monster(GHOUL));
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Exit, &CombatConfig::default(), &rng).unwrap();

    assert_eq!(kinds(&outcome), vec![EventKind::Disengage]);
    assert_eq!(outcome.world.combatant(PLAYER).unwrap().target, None);
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.target, None);
    assert_eq!(ghoul.behavior, AiBehavior::Patrol);
    assert!(outcome.rolls.is_empty());
}

#[test]
fn look_wakes_a_dormant_monster_which_waits_a_tick() {
    let mut world = CombatWorld::new(1);
    world.insert_combatant(player()).unwrap();
    world.insert_combatant(create_test_monster(GHOUL)).unwrap();
    let rng = ScriptedRng::new(vec![14]);

    let outcome = resolve(&world, PlayerAction::Look, &CombatConfig::default(), &rng).unwrap();

    assert_eq!(kinds(&outcome), vec![EventKind::Wake]);
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.target, Some(PLAYER));
    assert_eq!(ghoul.behavior, AiBehavior::Taunt);
}

#[test]
fn failed_wake_roll_leaves_no_trace() {
    let mut world = CombatWorld::new(1);
    world.insert_combatant(player()).unwrap();
    world.insert_combatant(create_test_monster(GHOUL)).unwrap();
    let rng = ScriptedRng::new(vec![15]);

    let outcome = resolve(&world, PlayerAction::Look, &CombatConfig::default(), &rng).unwrap();

    assert!(outcome.events.is_empty());
    assert!(outcome.batch.is_empty());
    assert_eq!(outcome.world.combatant(GHOUL).unwrap().behavior, AiBehavior::Idle);
}

#[test]
fn pursuing_monster_follows_and_acts_on_arrival() {
    let world = engaged_world(create_test_monster(GHOUL));
    let to = Position::new(2000, 0, 1);
    let config = CombatConfig::default().with_single_credit().with_only_gates(&[]);
    let rng = ScriptedRng::new(vec![0]);

    let outcome = resolve(&world, PlayerAction::Move { to }, &config, &rng).unwrap();

    assert_eq!(
        kinds(&outcome),
        vec![
            EventKind::Leave,
            EventKind::Arrive,
            EventKind::Pursue,
            EventKind::Leave,
            EventKind::Arrive,
            EventKind::Gate,
            EventKind::Idle,
        ]
    );
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.position, to);
    assert_eq!(ghoul.target, Some(PLAYER));
}

#[test]
fn failed_pursuit_keeps_the_target_for_later() {
    let world = engaged_world(create_test_monster(GHOUL));
    let to = Position::new(2000, 0, 1);
    let config = CombatConfig::default().with_single_credit().with_only_gates(&[]);
    let rng = ScriptedRng::new(vec![95]);

    let outcome = resolve(&world, PlayerAction::Move { to }, &config, &rng).unwrap();

    assert_eq!(
        kinds(&outcome),
        vec![EventKind::Leave, EventKind::Arrive, EventKind::Pursue]
    );
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.position, Position::ORIGIN);
    assert_eq!(ghoul.target, Some(PLAYER));

    // The player walks back in: the ghoul acts with the re-entry credit.
    let config = CombatConfig {
        credit_weights: [1, 0, 0, 0],
        ..config
    };
    let outcome = resolve(
        &outcome.world,
        PlayerAction::Move { to: Position::ORIGIN },
        &config,
        &ScriptedRng::new(Vec::new()),
    )
    .unwrap();
    assert!(kinds(&outcome).ends_with(&[EventKind::Gate, EventKind::Idle]));
}

#[test]
fn stunned_monster_forfeits_its_credits() {
    let mut ghoul = clawed_monster(GHOUL);
    ghoul.statuses.apply(StatusEffect::new(StatusKind::Stunned, 2, 1));
    let world = engaged_world(ghoul);
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Attack, 100)]);
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();

    assert!(gates(&outcome).is_empty());
    assert!(outcome.events.is_empty());
    assert!(outcome.rolls.is_empty());
    assert_eq!(outcome.world.combatant(PLAYER).unwrap().hp.current, 40);
    let stun = outcome
        .world
        .combatant(GHOUL)
        .unwrap()
        .statuses
        .get(StatusKind::Stunned)
        .copied()
        .unwrap();
    assert_eq!(stun.remaining, 1);

    // Once the stun wears off the ghoul attacks again.
    let outcome = resolve(&outcome.world, PlayerAction::Wait, &config, &rng).unwrap();
    assert!(kinds(&outcome).contains(&EventKind::StatusExpired));
    let outcome = resolve(&outcome.world, PlayerAction::Wait, &config, &rng).unwrap();
    assert_eq!(gates(&outcome), vec![Gate::Attack]);
    assert!(kinds(&outcome).contains(&EventKind::InnateHit));
}

#[test]
fn weakened_attacker_hits_softer() {
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[]);
    let strike = |weakened: bool| {
        let mut world = engaged_world(create_test_monster(GHOUL).with_hp(20, 30));
        arm_player(&mut world, ItemId(1));
        if weakened {
            world
                .combatant_mut(PLAYER)
                .unwrap()
                .statuses
                .apply(StatusEffect::new(StatusKind::Weakened, 3, 2));
        }
        resolve(&world, PlayerAction::Strike, &config, &ScriptedRng::new(Vec::new())).unwrap()
    };

    let fresh = strike(false);
    let weakened = strike(true);

    assert_eq!(player_strike_damage(&fresh) - player_strike_damage(&weakened), 2);
    assert_eq!(
        weakened.world.combatant(GHOUL).unwrap().hp.current,
        fresh.world.combatant(GHOUL).unwrap().hp.current + 2
    );
}

#[test]
fn player_death_pays_the_killer_and_drops_the_bag() {
    let mut world = engaged_world(clawed_monster(GHOUL));
    {
        let tess = world.combatant_mut(PLAYER).unwrap();
        *tess = tess.clone().with_hp(3, 40).with_ions(30, 30);
        tess.riblets = 7;
        tess.bag = vec![ItemId(1), ItemId(2)];
    }
    for (id, handle) in [(1, DAGGER), (2, TRINKET)] {
        world
            .insert_item(ItemInstance::new(ItemId(id), handle, Origin::World, Placement::Carried(PLAYER)))
            .unwrap();
    }
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[(Gate::Attack, 100)]);
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Wait, &config, &rng).unwrap();

    assert_eq!(
        kinds(&outcome),
        vec![
            EventKind::Gate,
            EventKind::InnateHit,
            EventKind::Death,
            EventKind::LootSpawn,
            EventKind::LootSpawn,
        ]
    );
    assert!(!outcome.events.iter().any(|e| e.is_skull_loot()));
    assert_eq!(
        outcome.events[2].payload,
        EventPayload::Death {
            killer: Some(GHOUL),
            ions: 30,
            riblets: 7,
            experience: 0,
        }
    );

    let world = &outcome.world;
    let tess = world.combatant(PLAYER).unwrap();
    assert!(!tess.is_alive());
    assert_eq!((tess.ions, tess.riblets), (0, 0));
    assert!(tess.bag.is_empty());
    assert_eq!(tess.target, None);

    let ghoul = world.combatant(GHOUL).unwrap();
    assert_eq!((ghoul.ions, ghoul.riblets), (30, 7));
    assert_eq!(ghoul.target, None);
    assert_eq!(ghoul.behavior, AiBehavior::Patrol);
    assert_eq!(world.ground_at(Position::ORIGIN), vec![ItemId(1), ItemId(2)]);
}

#[test]
fn disengage_clears_both_sides_of_every_pairing() {
    let mut world = engaged_world(create_test_monster(GHOUL));
    let mut rat = create_test_monster(RAT);
    rat.target = Some(PLAYER);
    rat.behavior = AiBehavior::Attack;
    world.insert_combatant(rat).unwrap();
    let config = CombatConfig::default().with_single_credit();
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Disengage, &config, &rng).unwrap();

    assert_eq!(kinds(&outcome), vec![EventKind::Disengage, EventKind::Disengage]);
    assert_eq!(outcome.world.combatant(PLAYER).unwrap().target, None);
    for id in [GHOUL, RAT] {
        let monster = outcome.world.combatant(id).unwrap();
        assert_eq!(monster.target, None);
        assert_eq!(monster.behavior, AiBehavior::Patrol);
    }
    assert!(outcome.rolls.is_empty());
}

#[test]
fn armour_cracked_mid_fight_is_shed_at_the_next_decision() {
    let mut ghoul = create_test_monster(GHOUL);
    ghoul.armour = Some(ItemId(2));
    let mut world = engaged_world(ghoul);
    arm_player(&mut world, ItemId(1));
    world
        .insert_item(
            ItemInstance::new(ItemId(2), LEATHER, Origin::World, Placement::Carried(GHOUL))
                .with_condition(1),
        )
        .unwrap();
    let config = CombatConfig::default()
        .with_single_credit()
        .with_only_gates(&[]);
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Strike, &config, &rng).unwrap();

    assert_eq!(
        kinds(&outcome),
        vec![
            EventKind::MeleeHit,
            EventKind::Crack,
            EventKind::Drop,
            EventKind::Gate,
            EventKind::Idle,
        ]
    );
    let ghoul = outcome.world.combatant(GHOUL).unwrap();
    assert_eq!(ghoul.armour, None);
    let leather = outcome.world.item(ItemId(2)).unwrap();
    assert_eq!(leather.template, ItemHandle::BROKEN_ARMOUR);
    assert_eq!(leather.placement, Placement::Ground(Position::ORIGIN));
}

#[test]
fn resolved_deaths_are_forgotten_the_next_tick() {
    let world = engaged_world(create_test_monster(GHOUL).with_hp(5, 10));
    let rng = ScriptedRng::new(Vec::new());
    let config = CombatConfig::default();

    let killed = resolve(&world, PlayerAction::Strike, &config, &rng).unwrap();
    assert_eq!(killed.world.deaths().count(), 1);

    let after = resolve(&killed.world, PlayerAction::Wait, &config, &rng).unwrap();
    assert_eq!(after.world.deaths().count(), 0);
}

#[test]
fn death_rewards_saturate_instead_of_overflowing() {
    let mut world = engaged_world(create_test_monster(GHOUL).with_hp(5, 10).with_ions(12, 20));
    {
        let tess = world.combatant_mut(PLAYER).unwrap();
        tess.ions = i32::MAX - 1;
        tess.experience = i64::MAX;
    }
    let rng = ScriptedRng::new(Vec::new());

    let outcome = resolve(&world, PlayerAction::Strike, &CombatConfig::default(), &rng).unwrap();

    let tess = outcome.world.combatant(PLAYER).unwrap();
    assert_eq!(tess.ions, i32::MAX);
    assert_eq!(tess.experience, i64::MAX);
    assert!(!outcome.world.combatant(GHOUL).unwrap().is_alive());
}
