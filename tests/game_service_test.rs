//! Tests for game creation, lookup, versioning and concurrent updates.

mod common;

use std::sync::Arc;
use std::thread;

use cardball::{
    ActionSubmission, EntityKind, GameError, GameId, GamePhase, GameService, HalfInning,
    InMemoryStore, RegulationRule, Role, Side, TeamId,
};
use common::{full_lineup, roster, service_with_game};

#[test]
fn test_create_game_starts_empty() {
    let (service, clubs, game) = service_with_game(RegulationRule::default());
    let status = service.get_game(game).expect("Get failed");
    assert_eq!(*status.id(), game);
    assert_eq!(*status.visiting_team(), clubs.phillies);
    assert_eq!(*status.home_team(), clubs.rockies);
    assert_eq!(*status.phase(), GamePhase::Created);
    assert_eq!(*status.version(), 1);
    assert_eq!(*status.inning(), 1);
    assert_eq!(*status.half_inning(), HalfInning::Top);
    assert_eq!(*status.action_count(), 0);
    assert!(status.strategies().is_empty());
    assert_eq!(*status.winner(), None);
}

#[test]
fn test_create_game_with_unknown_team_leaves_count_unchanged() {
    let (service, clubs, _game) = service_with_game(RegulationRule::default());
    let before = service.list_games().expect("List failed").len();

    let result = service.create_game(TeamId::from(404), clubs.rockies);
    assert_eq!(
        result,
        Err(GameError::NotFound {
            kind: EntityKind::Team,
            id: 404
        })
    );
    assert_eq!(service.list_games().expect("List failed").len(), before);
}

#[test]
fn test_team_cannot_play_itself() {
    let (service, clubs, _game) = service_with_game(RegulationRule::default());
    let result = service.create_game(clubs.rockies, clubs.rockies);
    assert!(matches!(result, Err(GameError::Validation(_))));
}

#[test]
fn test_get_unknown_game_is_not_found() {
    let (service, _clubs, _game) = service_with_game(RegulationRule::default());
    assert_eq!(
        service.get_game(GameId::from(99)),
        Err(GameError::NotFound {
            kind: EntityKind::Game,
            id: 99
        })
    );
}

#[test]
fn test_list_games_in_id_order() {
    let (service, clubs, first) = service_with_game(RegulationRule::default());
    let second = service
        .create_game(clubs.rockies, clubs.phillies)
        .expect("Create failed");
    let ids: Vec<GameId> = service
        .list_games()
        .expect("List failed")
        .iter()
        .map(|status| *status.id())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn test_every_change_bumps_version() {
    let (service, clubs, game) = service_with_game(RegulationRule::default());
    let status = service
        .put_lineup(game, Side::Home, &full_lineup(clubs.players(Side::Home)), Some(1))
        .expect("Put lineup failed");
    assert_eq!(*status.version(), 2);
    let status = service
        .post_strategy(game, Role::Manager, "steal on 2-0".to_string(), Some(2))
        .expect("Post failed");
    assert_eq!(*status.version(), 3);
    let action = ActionSubmission::new(1, HalfInning::Top, clubs.luzinski(), "B");
    let status = service
        .append_action(game, action, Some(3))
        .expect("Append failed");
    assert_eq!(*status.version(), 4);
}

#[test]
fn test_stale_version_conflicts_without_writing() {
    let (service, _clubs, game) = service_with_game(RegulationRule::default());
    service
        .post_strategy(game, Role::Manager, "first".to_string(), Some(1))
        .expect("Post failed");

    let result = service.post_strategy(game, Role::Manager, "second".to_string(), Some(1));
    assert_eq!(
        result,
        Err(GameError::Conflict {
            game,
            expected: 1,
            actual: 2
        })
    );

    let status = service.get_game(game).expect("Get failed");
    assert_eq!(*status.version(), 2);
    assert_eq!(
        status.strategies().get(Role::Manager).map(|d| d.as_str()),
        Some("first")
    );
}

#[test]
fn test_concurrent_lineup_and_action_both_land() {
    let (service, clubs, game) = service_with_game(RegulationRule::default());
    let lineup = full_lineup(clubs.players(Side::Home));
    let batter = clubs.luzinski();

    let lineup_service = service.clone();
    let lineup_thread = thread::spawn(move || {
        lineup_service
            .put_lineup(game, Side::Home, &lineup, None)
            .expect("Put lineup failed");
    });
    let action_service = service.clone();
    let action_thread = thread::spawn(move || {
        let action = ActionSubmission::new(1, HalfInning::Top, batter, "1B").ending_appearance();
        action_service
            .append_action(game, action, None)
            .expect("Append failed");
    });
    lineup_thread.join().expect("Lineup thread panicked");
    action_thread.join().expect("Action thread panicked");

    let status = service.get_game(game).expect("Get failed");
    assert_eq!(status.home_lineup().participants().len(), 9);
    assert_eq!(*status.action_count(), 1);
    assert_eq!(*status.version(), 3);
}

#[test]
fn test_many_concurrent_appends_are_serialized() {
    let (roster, clubs) = roster();
    let store = Arc::new(InMemoryStore::new());
    let service = GameService::from_shared(store, Arc::new(roster), RegulationRule::default());
    let game = service
        .create_game(clubs.phillies, clubs.rockies)
        .expect("Create failed");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let batter = clubs.bowa();
            thread::spawn(move || {
                let action = ActionSubmission::new(1, HalfInning::Top, batter, "F");
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
    assert_eq!(*status.action_count(), 8);
    assert_eq!(*status.version(), 9);
}

#[test]
fn test_games_are_isolated() {
    let (service, clubs, first) = service_with_game(RegulationRule::default());
    let second = service
        .create_game(clubs.phillies, clubs.rockies)
        .expect("Create failed");
    service
        .post_strategy(first, Role::BenchCoach, "shift left".to_string(), None)
        .expect("Post failed");
    let other = service.get_game(second).expect("Get failed");
    assert!(other.strategies().is_empty());
    assert_eq!(*other.version(), 1);
}
