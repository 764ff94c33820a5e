//! Session-level behaviour: content loading, commit through the stores,
//! id remapping for minted loot, rejection handling and replay digests.

use std::path::Path;
use std::sync::Arc;

use combat_content::ContentFactory;
use combat_core::{
    AiBehavior, CombatConfig, CombatWorld, Combatant, CombatantId, CombatantStore, EventKind,
    EventPayload, ItemCatalog, ItemDefinition, ItemHandle, ItemId, ItemInstance, ItemKind,
    ItemStore, LootEntry, LootOutcome, Origin, PcgRng, Placement, PlayerAction, Position,
    ScriptedRng, SpeciesId, SpeciesProfile, SpeciesTable, TickError,
};
use combat_core::env::WeaponData;
use combat_core::state::InnateAttack;
use combat_runtime::{CombatSession, InMemoryCombatantStore, InMemoryItemStore, RuntimeError};

const PLAYER: CombatantId = CombatantId::PLAYER;
const GHOUL: CombatantId = CombatantId(2);
const DAGGER: ItemHandle = ItemHandle(1);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_content(dir: &Path) {
    std::fs::write(dir.join("config.toml"), "ground_cap = 4\n").unwrap();
    std::fs::write(
        dir.join("items.ron"),
        r#"(items: [
            (handle: (1), name: "dagger", kind: Weapon((melee_power: Some(6))), ion_value: 40),
        ])"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("species.ron"),
        r#"(species: [
            (
                id: (1),
                name: "ghoul",
                innate: (name: "claw", base_power: 3, power_per_level: 1, status: None),
            ),
        ])"#,
    )
    .unwrap();
}

fn catalog() -> ItemCatalog {
    [ItemDefinition::new(DAGGER, "dagger", ItemKind::Weapon(WeaponData::melee(6))).with_ion_value(40)]
        .into_iter()
        .collect()
}

fn species() -> SpeciesTable {
    [SpeciesProfile::new(SpeciesId(1), "ghoul").with_innate(InnateAttack::new("claw", 3, 1))]
        .into_iter()
        .collect()
}

/// Player and ghoul already fighting at the origin.
fn engaged_world(seed: u64, ghoul_hp: i32) -> CombatWorld {
    let mut world = CombatWorld::new(seed);
    let mut player = Combatant::player("Tess").with_hp(40, 40);
    player.target = Some(GHOUL);
    let mut ghoul = Combatant::monster(GHOUL, "Ghoul", SpeciesId(1)).with_hp(ghoul_hp, ghoul_hp);
    ghoul.target = Some(PLAYER);
    ghoul.behavior = AiBehavior::Attack;
    world.insert_combatant(player).unwrap();
    world.insert_combatant(ghoul).unwrap();
    world
}

fn armed_world(seed: u64) -> CombatWorld {
    let mut world = engaged_world(seed, 30);
    world
        .insert_item(ItemInstance::new(ItemId(1), DAGGER, Origin::Native, Placement::Carried(PLAYER)))
        .unwrap();
    let player = world.combatant_mut(PLAYER).unwrap();
    player.bag = vec![ItemId(1)];
    player.weapon = Some(ItemId(1));
    world.combatant_mut(GHOUL).unwrap().innate = InnateAttack::new("claw", 3, 1);
    world
}

#[test]
fn content_directory_drives_a_session() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write_content(dir.path());
    let content = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(content.config.ground_cap, 4);

    let session = CombatSession::builder()
        .content(content)
        .world(engaged_world(3, 30))
        .build()
        .unwrap();

    let ghoul = session.world().combatant(GHOUL).unwrap();
    assert_eq!(ghoul.innate.name, "claw");
    assert_eq!(ghoul.innate.power_at(ghoul.level), 4);
}

#[test]
fn minted_skull_takes_the_store_assigned_id() {
    init_tracing();
    let world = engaged_world(7, 5);

    // Ids 1..=5 were handed out and consumed before this session started.
    let items = Arc::new(InMemoryItemStore::new());
    for _ in 0..5 {
        let id = items.mint(DAGGER, Origin::World).unwrap();
        items.consume(id).unwrap();
    }
    let combatants = Arc::new(InMemoryCombatantStore::with_combatants(world.combatants()));

    let mut session = CombatSession::builder()
        .species(species())
        .rng(ScriptedRng::new(Vec::new()))
        .world(world)
        .stores(items.clone(), combatants.clone())
        .build()
        .unwrap();

    let report = session.tick(PlayerAction::Strike).unwrap();

    let skull = ItemId(6);
    assert_eq!(report.minted.values().copied().collect::<Vec<_>>(), vec![skull]);
    let spawn = report
        .events
        .iter()
        .find(|e| e.is_skull_loot())
        .expect("skull loot event");
    assert_eq!(
        spawn.payload,
        EventPayload::Loot(LootOutcome::Spawned {
            entry: LootEntry::Skull,
            item: skull,
        })
    );

    assert_eq!(session.world().ground_at(Position::ORIGIN), vec![skull]);
    let stored = items.get(skull).unwrap();
    assert_eq!(stored.template, ItemHandle::SKULL);
    assert_eq!(stored.placement, Placement::Ground(Position::ORIGIN));

    let ghoul = combatants.get(GHOUL).unwrap();
    assert!(!ghoul.is_alive());
    assert_eq!(combatants.get(PLAYER).unwrap().target, None);
    assert_eq!(session.log().count_of(EventKind::Death), 1);
}

#[test]
fn stores_mirror_the_world_after_every_tick() {
    init_tracing();
    let world = armed_world(0xBEEF);
    let items = Arc::new(InMemoryItemStore::with_items(world.items()));
    let combatants = Arc::new(InMemoryCombatantStore::with_combatants(world.combatants()));

    let mut session = CombatSession::builder()
        .config(CombatConfig::default().with_crit(10, 200))
        .items(catalog())
        .species(species())
        .rng(PcgRng)
        .world(world)
        .stores(items.clone(), combatants.clone())
        .build()
        .unwrap();

    for round in 0..30 {
        let action = if round % 4 == 3 {
            PlayerAction::Wait
        } else {
            PlayerAction::Strike
        };
        let before = session.world().clone();
        match session.tick(action) {
            Ok(_) => {}
            Err(error) => {
                assert!(error.is_rejection(), "unexpected failure: {error}");
                assert_eq!(session.world(), &before);
                break;
            }
        }

        let world_items: Vec<ItemInstance> = session.world().items().cloned().collect();
        assert_eq!(items.snapshot().unwrap(), world_items);
        let world_combatants: Vec<Combatant> = session.world().combatants().cloned().collect();
        assert_eq!(combatants.snapshot().unwrap(), world_combatants);
    }
    assert!(!session.log().is_empty());
}

#[test]
fn rejected_tick_writes_nothing() {
    init_tracing();
    let mut session = CombatSession::builder()
        .species(species())
        .world(engaged_world(1, 30))
        .build()
        .unwrap();
    let before = session.world().clone();

    let error = session
        .tick(PlayerAction::Engage {
            target: CombatantId(99),
        })
        .unwrap_err();

    assert!(error.is_rejection());
    assert!(matches!(error, RuntimeError::Tick(TickError::Action { .. })));
    assert_eq!(session.world(), &before);
    assert!(session.log().is_empty());
}

#[test]
fn identical_sessions_replay_to_the_same_digest() {
    init_tracing();
    let script = [
        PlayerAction::Strike,
        PlayerAction::Wait,
        PlayerAction::Strike,
        PlayerAction::Strike,
        PlayerAction::Look,
        PlayerAction::Strike,
    ];
    let run = || {
        let mut session = CombatSession::builder()
            .config(CombatConfig::default().with_seed(0x5EED))
            .items(catalog())
            .species(species())
            .world(armed_world(1))
            .build()
            .unwrap();
        for action in script {
            if session.tick(action).is_err() {
                break;
            }
        }
        (session.digest().unwrap(), session.log().to_json_lines().unwrap())
    };

    let (first_digest, first_log) = run();
    let (second_digest, second_log) = run();
    assert_eq!(first_digest, second_digest);
    assert_eq!(first_log, second_log);
    assert!(!first_log.is_empty());
}

#[test]
fn builder_validates_the_starting_world() {
    let missing_player = CombatSession::builder()
        .species(species())
        .spawn(Combatant::monster(GHOUL, "Ghoul", SpeciesId(1)))
        .build();
    assert!(matches!(missing_player, Err(RuntimeError::MissingPlayer)));

    let unknown_species = CombatSession::builder()
        .spawn(Combatant::player("Tess"))
        .spawn(Combatant::monster(GHOUL, "Ghoul", SpeciesId(4)))
        .build();
    assert!(matches!(
        unknown_species,
        Err(RuntimeError::UnknownSpecies {
            monster: GHOUL,
            species: SpeciesId(4),
        })
    ));
}
