use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// GameResult – the outcome of one game from one team's perspective
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
}

impl GameResult {
    /// Parse a raw result cell.  Whitespace is trimmed and case ignored;
    /// anything other than `W` / `L` is rejected (ties, blanks, spelled-out
    /// words like `"win"`).
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "W" => Some(GameResult::Win),
            "L" => Some(GameResult::Loss),
            _ => None,
        }
    }

    pub fn is_win(self) -> bool {
        matches!(self, GameResult::Win)
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win => write!(f, "W"),
            GameResult::Loss => write!(f, "L"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameType – regular season vs playoffs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    RegularSeason,
    Playoffs,
}

impl GameType {
    /// Derive the game type from the source playoff flag.  `1` means
    /// playoffs; every other value (including the default substituted for a
    /// missing or unparseable flag) means regular season.
    pub fn from_playoff_flag(flag: i64) -> Self {
        if flag == 1 {
            GameType::Playoffs
        } else {
            GameType::RegularSeason
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::RegularSeason => write!(f, "Regular Season"),
            GameType::Playoffs => write!(f, "Playoffs"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameTypeFilter – the user-facing game-type selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameTypeFilter {
    RegularSeason,
    Playoffs,
    #[default]
    Both,
}

impl GameTypeFilter {
    /// All selector values, in the order the UI presents them.
    pub const ALL: [GameTypeFilter; 3] = [
        GameTypeFilter::RegularSeason,
        GameTypeFilter::Playoffs,
        GameTypeFilter::Both,
    ];

    pub fn matches(self, game_type: GameType) -> bool {
        match self {
            GameTypeFilter::RegularSeason => game_type == GameType::RegularSeason,
            GameTypeFilter::Playoffs => game_type == GameType::Playoffs,
            GameTypeFilter::Both => true,
        }
    }
}

impl fmt::Display for GameTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameTypeFilter::RegularSeason => write!(f, "Regular Season"),
            GameTypeFilter::Playoffs => write!(f, "Playoffs"),
            GameTypeFilter::Both => write!(f, "Both"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameRecord – one row of the normalized game log
// ---------------------------------------------------------------------------

/// A single game from one team's perspective (one row of the source table).
///
/// `season`, `team` and `result` are guaranteed present by normalization;
/// everything else survives as an `Option` and downstream code substitutes
/// or skips when a value is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub season: i64,
    pub team: String,
    /// Game date; `None` when the source cell was missing or unparseable.
    pub game_date: Option<NaiveDate>,
    /// Ordinal of the game within the team's season.
    pub seasongame: Option<i64>,
    pub game_type: GameType,
    pub result: GameResult,
    /// Display-only passthrough columns, never validated.
    pub pts: Option<String>,
    pub opp_id: Option<String>,
    pub opp_pts: Option<String>,
}

// ---------------------------------------------------------------------------
// GameDataset – the complete normalized game log
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed selector indexes.
/// Immutable after construction; every view works on filtered copies.
#[derive(Debug, Clone)]
pub struct GameDataset {
    /// All games, in source insertion order.
    games: Vec<GameRecord>,
    /// Distinct seasons, ascending.
    seasons: Vec<i64>,
    /// Teams appearing in each season, sorted.
    teams_by_season: BTreeMap<i64, BTreeSet<String>>,
    /// All distinct teams across the dataset, sorted.
    all_teams: Vec<String>,
}

impl GameDataset {
    /// Build the selector indexes from the normalized games.
    pub fn from_games(games: Vec<GameRecord>) -> Self {
        let mut season_set: BTreeSet<i64> = BTreeSet::new();
        let mut teams_by_season: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
        let mut team_set: BTreeSet<String> = BTreeSet::new();

        for game in &games {
            season_set.insert(game.season);
            teams_by_season
                .entry(game.season)
                .or_default()
                .insert(game.team.clone());
            team_set.insert(game.team.clone());
        }

        GameDataset {
            games,
            seasons: season_set.into_iter().collect(),
            teams_by_season,
            all_teams: team_set.into_iter().collect(),
        }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Distinct seasons, ascending.
    pub fn seasons(&self) -> &[i64] {
        &self.seasons
    }

    /// The most recent season present, if any.
    pub fn latest_season(&self) -> Option<i64> {
        self.seasons.last().copied()
    }

    /// Teams playing in `season`, sorted.  Falls back to every team in the
    /// dataset when the season has none.
    pub fn teams_for_season(&self, season: i64) -> Vec<String> {
        match self.teams_by_season.get(&season) {
            Some(teams) if !teams.is_empty() => teams.iter().cloned().collect(),
            _ => self.all_teams.clone(),
        }
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
