use std::cmp::Ordering;

use chrono::NaiveDate;

use super::model::{GameDataset, GameRecord, GameTypeFilter};

// ---------------------------------------------------------------------------
// Selection – the user's current season / team / game-type choice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub season: Option<i64>,
    pub team: Option<String>,
    pub game_type: GameTypeFilter,
}

// ---------------------------------------------------------------------------
// Sort key choice
// ---------------------------------------------------------------------------

/// Which key orders the filtered games and labels the chart x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAxis {
    /// Ordinal of the game within the team's season.
    SeasonGame,
    /// Calendar date (fallback when no row carries an ordinal).
    GameDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Ordinal(i64),
    Date(NaiveDate),
}

fn sort_key(game: &GameRecord, axis: ChartAxis) -> Option<SortKey> {
    match axis {
        ChartAxis::SeasonGame => game.seasongame.map(SortKey::Ordinal),
        ChartAxis::GameDate => game.game_date.map(SortKey::Date),
    }
}

/// Ascending, missing keys last.  Used with a stable sort so rows with equal
/// or missing keys keep their source order.
fn cmp_ascending(a: Option<SortKey>, b: Option<SortKey>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

/// Descending, missing keys still last (undated games stay at the bottom of
/// the table in either direction).
fn cmp_descending(a: Option<SortKey>, b: Option<SortKey>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.cmp(&x),
    }
}

// ---------------------------------------------------------------------------
// FilteredView – filtered, sorted, with running totals
// ---------------------------------------------------------------------------

/// One game of a [`FilteredView`] with its running totals.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredGame {
    pub game: GameRecord,
    pub cumulative_wins: u32,
    pub cumulative_losses: u32,
}

/// The filtered, ordered, derived sequence backing every widget for one
/// selection.  Recomputed on each selection change, never stored.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub games: Vec<FilteredGame>,
    pub axis: ChartAxis,
}

/// Derived summary metrics for the current view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSummary {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of games won; `None` when no games survived the filter.
    pub win_rate: Option<f64>,
}

/// Row cap for the recent-games table.
pub const RECENT_GAMES_CAP: usize = 50;

/// Filter the dataset to the selection, pick the sort axis, order the games
/// and attach running win/loss totals.  An empty result is a valid view.
/// The dataset itself is never touched.
pub fn build_view(dataset: &GameDataset, selection: &Selection) -> FilteredView {
    let mut picked: Vec<GameRecord> = dataset
        .games()
        .iter()
        .filter(|g| {
            selection.season == Some(g.season)
                && selection.team.as_deref() == Some(g.team.as_str())
                && selection.game_type.matches(g.game_type)
        })
        .cloned()
        .collect();

    // Order by the season ordinal when any surviving row has one; otherwise
    // fall back to the game date.
    let axis = if picked.iter().any(|g| g.seasongame.is_some()) {
        ChartAxis::SeasonGame
    } else {
        ChartAxis::GameDate
    };

    picked.sort_by(|a, b| cmp_ascending(sort_key(a, axis), sort_key(b, axis)));

    let mut wins = 0u32;
    let mut losses = 0u32;
    let games = picked
        .into_iter()
        .map(|game| {
            if game.result.is_win() {
                wins += 1;
            } else {
                losses += 1;
            }
            FilteredGame {
                game,
                cumulative_wins: wins,
                cumulative_losses: losses,
            }
        })
        .collect();

    FilteredView { games, axis }
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn summary(&self) -> ViewSummary {
        let games = self.games.len();
        let wins = self
            .games
            .iter()
            .filter(|g| g.game.result.is_win())
            .count();
        let losses = games - wins;
        let win_rate = (games > 0).then(|| wins as f64 / games as f64 * 100.0);
        ViewSummary {
            games,
            wins,
            losses,
            win_rate,
        }
    }

    /// The newest `cap` games: the same key the chart sorts ascending by,
    /// descending, stably, missing keys last.
    pub fn recent_games(&self, cap: usize) -> Vec<&FilteredGame> {
        let mut rows: Vec<&FilteredGame> = self.games.iter().collect();
        rows.sort_by(|a, b| cmp_descending(sort_key(&a.game, self.axis), sort_key(&b.game, self.axis)));
        rows.truncate(cap);
        rows
    }
}
