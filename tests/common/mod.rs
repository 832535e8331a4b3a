//! Shared fixtures: the Phillies visiting the Rockies.

#![allow(dead_code)]

use cardball::{
    GameId, GameService, Handedness, InMemoryRoster, InMemoryStore, LineupEntry, PlayerId,
    PlayerProfile, RegulationRule, Side, TeamId, TeamProfile,
};

/// Roster ids created by [`fixture`].
pub struct Clubs {
    pub rockies: TeamId,
    pub phillies: TeamId,
    /// Rockies players; Helton first, Walker second.
    pub rockies_players: Vec<PlayerId>,
    /// Phillies players; Luzinski first, Bowa second.
    pub phillies_players: Vec<PlayerId>,
}

impl Clubs {
    pub fn helton(&self) -> PlayerId {
        self.rockies_players[0]
    }

    pub fn walker(&self) -> PlayerId {
        self.rockies_players[1]
    }

    pub fn luzinski(&self) -> PlayerId {
        self.phillies_players[0]
    }

    pub fn bowa(&self) -> PlayerId {
        self.phillies_players[1]
    }

    pub fn players(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::Visiting => &self.phillies_players,
            Side::Home => &self.rockies_players,
        }
    }
}

fn player(first: &str, last: &str, position: u8, bats: Handedness) -> PlayerProfile {
    PlayerProfile::new(
        first.to_string(),
        last.to_string(),
        1980,
        position,
        bats,
        Handedness::Right,
        270,
        None,
    )
}

fn sign(roster: &mut InMemoryRoster, team: TeamId, names: &[(&str, &str)]) -> Vec<PlayerId> {
    names
        .iter()
        .enumerate()
        .map(|(i, (first, last))| {
            let position = u8::try_from(i % 9 + 1).expect("position fits");
            roster
                .add_player(team, player(first, last, position, Handedness::Right))
                .expect("Failed to sign player")
        })
        .collect()
}

/// Builds a roster with two full clubs and one extra club with no players.
pub fn roster() -> (InMemoryRoster, Clubs) {
    let mut roster = InMemoryRoster::new();
    let rockies = roster.add_team(TeamProfile::new(
        "Colorado".to_string(),
        "Rockies".to_string(),
        "Ned".to_string(),
        "Gladstone".to_string(),
    ));
    let phillies = roster.add_team(TeamProfile::new(
        "Philadelphia".to_string(),
        "Phillies".to_string(),
        "Ed".to_string(),
        "Gladstone".to_string(),
    ));

    let rockies_players = sign(
        &mut roster,
        rockies,
        &[
            ("Todd", "Helton"),
            ("Larry", "Walker"),
            ("Dante", "Bichette"),
            ("Vinny", "Castilla"),
            ("Andres", "Galarraga"),
            ("Ellis", "Burks"),
            ("Walt", "Weiss"),
            ("Eric", "Young"),
            ("Joe", "Girardi"),
            ("Kevin", "Ritz"),
        ],
    );
    let phillies_players = sign(
        &mut roster,
        phillies,
        &[
            ("Greg", "Luzinski"),
            ("Larry", "Bowa"),
            ("Mike", "Schmidt"),
            ("Pete", "Rose"),
            ("Garry", "Maddox"),
            ("Bob", "Boone"),
            ("Manny", "Trillo"),
            ("Bake", "McBride"),
            ("Steve", "Carlton"),
            ("Tug", "McGraw"),
        ],
    );

    let clubs = Clubs {
        rockies,
        phillies,
        rockies_players,
        phillies_players,
    };
    (roster, clubs)
}

/// Nine entries: slot `n` gets the `n`th player at position `n`.
pub fn full_lineup(players: &[PlayerId]) -> Vec<LineupEntry> {
    players
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, player)| {
            let n = u8::try_from(i + 1).expect("slot fits");
            LineupEntry::new(n, n, *player)
        })
        .collect()
}

pub type MemoryService = GameService<InMemoryStore, InMemoryRoster>;

/// An in-memory service with one fresh Phillies-at-Rockies game.
pub fn service_with_game(rule: RegulationRule) -> (MemoryService, Clubs, GameId) {
    let (roster, clubs) = roster();
    let service = GameService::new(InMemoryStore::new(), roster, rule);
    let game = service
        .create_game(clubs.phillies, clubs.rockies)
        .expect("Failed to create game");
    (service, clubs, game)
}
