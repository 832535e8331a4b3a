//! Tests for the SQLite repository.

mod common;

use std::thread;

use tempfile::NamedTempFile;

use cardball::{
    ActionSubmission, Game, GameError, GameId, GamePhase, GameService, GameStore, HalfInning,
    RegulationRule, Role, RosterFile, RosterResolver, Side, SqliteRepository, TeamId,
};
use common::full_lineup;

const ROSTER: &str = r#"
[[teams]]
city = "Colorado"
name = "Rockies"
owner_first_name = "Ned"
owner_last_name = "Gladstone"

[[teams.players]]
first_name = "Todd"
last_name = "Helton"
season = 2003
primary_position = 3
bats = "L"
throws = "L"
batting_average = 358

[[teams.players]]
first_name = "Larry"
last_name = "Walker"
season = 1997
primary_position = 9
bats = "L"
throws = "R"
batting_average = 366
weight = 235

[[teams]]
city = "Philadelphia"
name = "Phillies"
owner_first_name = "Ed"
owner_last_name = "Gladstone"

[[teams.players]]
first_name = "Greg"
last_name = "Luzinski"
season = 1978
primary_position = 7
bats = "R"
throws = "R"
batting_average = 265

[[teams.players]]
first_name = "Larry"
last_name = "Bowa"
season = 1980
primary_position = 6
bats = "S"
throws = "R"
batting_average = 267

[[teams]]
city = "Nowhere"
name = "Expansion"
owner_first_name = "No"
owner_last_name = "One"
"#;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, SqliteRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = SqliteRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

/// Seeds the demo roster and returns (rockies, phillies).
fn seed(repo: &SqliteRepository) -> (TeamId, TeamId) {
    let file = RosterFile::parse(ROSTER).expect("Roster parse failed");
    let ids = repo.seed(&file).expect("Seed failed");
    assert_eq!(ids.len(), 3);
    (ids[0], ids[1])
}

#[test]
fn test_empty_path_rejected() {
    assert!(SqliteRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, repo) = setup_test_db();
    repo.run_migrations().expect("Second migration run failed");
    assert!(repo.list().expect("List failed").is_empty());
}

#[test]
fn test_seed_and_resolve_roster() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);

    let team = repo
        .team(rockies)
        .expect("Query failed")
        .expect("Rockies missing");
    assert_eq!(team.display_name(), "Colorado Rockies");
    assert_eq!(team.players().len(), 2);

    let walker = repo
        .player(team.players()[1])
        .expect("Query failed")
        .expect("Walker missing");
    assert_eq!(walker.full_name(), "Larry Walker");
    assert_eq!(*walker.team(), rockies);
    assert_eq!(*walker.profile().weight(), Some(235));

    let teams = repo.list_teams().expect("List failed");
    assert_eq!(teams.len(), 3);
    assert_eq!(*teams[1].id(), phillies);
    assert!(teams[2].players().is_empty());
}

#[test]
fn test_unknown_ids_resolve_to_none() {
    let (_db, repo) = setup_test_db();
    seed(&repo);
    assert!(repo.team(TeamId::from(77)).expect("Query failed").is_none());
    assert!(repo.load(GameId::from(77)).expect("Query failed").is_none());
}

#[test]
fn test_create_and_load_game() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);

    let created = repo.create(phillies, rockies).expect("Create failed");
    assert_eq!(*created.version(), 1);
    let loaded = repo
        .load(*created.game().id())
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(loaded, created);
}

#[test]
fn test_full_aggregate_round_trips() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);
    let service = GameService::new(repo.clone(), repo.clone(), RegulationRule::default());
    let game = service.create_game(phillies, rockies).expect("Create failed");

    let helton = repo.team(rockies).expect("Query failed").expect("Missing").players()[0];
    let phils = repo.team(phillies).expect("Query failed").expect("Missing");
    let (luzinski, bowa) = (phils.players()[0], phils.players()[1]);

    service
        .put_lineup(game, Side::Home, &full_lineup(&[helton]), None)
        .expect("Put lineup failed");
    service
        .post_strategy(game, Role::PitchingCoach, "pitch around Luzinski".to_string(), None)
        .expect("Post failed");
    let action = ActionSubmission::new(1, HalfInning::Top, luzinski, "KL")
        .with_count(3, 3)
        .with_note("caught looking")
        .with_result(ActionSubmission::new(1, HalfInning::Top, bowa, "PB"));
    let written = service
        .append_action(game, action, None)
        .expect("Append failed");

    let reread = service.get_game(game).expect("Get failed");
    assert_eq!(reread, written);
    assert_eq!(*reread.version(), 4);
    assert_eq!(*reread.action_count(), 2);
    assert_eq!(*reread.phase(), GamePhase::InProgress);

    let record = repo.load(game).expect("Load failed").expect("Game missing");
    let root = record
        .game()
        .book()
        .actions()
        .roots()
        .next()
        .expect("Root missing");
    assert_eq!(root.record().note(), "caught looking");
    assert_eq!(root.results().len(), 1);
}

#[test]
fn test_update_increments_version_and_checks_it() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);
    let service = GameService::new(repo.clone(), repo.clone(), RegulationRule::default());
    let game = service.create_game(phillies, rockies).expect("Create failed");

    service
        .post_strategy(game, Role::Manager, "A".to_string(), Some(1))
        .expect("Post failed");
    let stale = service.post_strategy(game, Role::Manager, "B".to_string(), Some(1));
    assert!(matches!(
        stale,
        Err(GameError::Conflict {
            expected: 1,
            actual: 2,
            ..
        })
    ));
    let status = service.get_game(game).expect("Get failed");
    assert_eq!(*status.version(), 2);
    assert_eq!(
        status.strategies().get(Role::Manager).map(|d| d.as_str()),
        Some("A")
    );
}

#[test]
fn test_failed_mutation_writes_nothing() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);
    let created = repo.create(phillies, rockies).expect("Create failed");
    let id = *created.game().id();

    let result = repo.update(id, None, &mut |_game: &mut Game| Err(GameError::validation("no")));
    assert!(matches!(result, Err(GameError::Validation(_))));
    let loaded = repo.load(id).expect("Load failed").expect("Game missing");
    assert_eq!(*loaded.version(), 1);
}

#[test]
fn test_update_unknown_game_is_not_found() {
    let (_db, repo) = setup_test_db();
    let result = repo.update(GameId::from(5), None, &mut |_game: &mut Game| Ok(()));
    assert!(matches!(result, Err(GameError::NotFound { .. })));
}

#[test]
fn test_concurrent_updates_are_serialized() {
    let (_db, repo) = setup_test_db();
    let (rockies, phillies) = seed(&repo);
    let service = GameService::new(repo.clone(), repo.clone(), RegulationRule::default());
    let game = service.create_game(phillies, rockies).expect("Create failed");
    let bowa = repo.team(phillies).expect("Query failed").expect("Missing").players()[1];

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || {
                let action = ActionSubmission::new(1, HalfInning::Top, bowa, "B");
                service
                    .append_action(game, action, None)
                    .expect("Append failed");
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Append thread panicked");
    }

    let status = service.get_game(game).expect("Get failed");
    assert_eq!(*status.action_count(), 4);
    assert_eq!(*status.version(), 5);
}
