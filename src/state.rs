use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::filter::{build_view, FilteredView, Selection};
use crate::data::loader;
use crate::data::model::{GameDataset, GameTypeFilter};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<GameDataset>>,

    /// Path the dataset was loaded from.
    pub source_path: Option<PathBuf>,

    /// Current season / team / game-type selection.
    pub selection: Selection,

    /// View for the current selection (cached, rebuilt on every change).
    pub view: Option<FilteredView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a game log (memoized per path) and install it on success.
    /// Failure leaves the current dataset untouched.
    pub fn open_path(&mut self, path: &Path) {
        match loader::load_cached(path) {
            Ok(dataset) => {
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Install a dataset and reset the selection to its defaults: the most
    /// recent season, that season's first team, both game types.
    pub fn set_dataset(&mut self, dataset: Arc<GameDataset>) {
        let season = dataset.latest_season();
        let team = season.and_then(|s| dataset.teams_for_season(s).into_iter().next());
        self.selection = Selection {
            season,
            team,
            game_type: GameTypeFilter::Both,
        };
        self.dataset = Some(dataset);
        self.status_message = None;
        self.rebuild_view();
    }

    /// Switch seasons.  The team selection survives only if that team plays
    /// in the new season; otherwise it resets to the season's first team.
    pub fn select_season(&mut self, season: i64) {
        self.selection.season = Some(season);
        if let Some(ds) = &self.dataset {
            let teams = ds.teams_for_season(season);
            let keep = self
                .selection
                .team
                .as_ref()
                .is_some_and(|team| teams.contains(team));
            if !keep {
                self.selection.team = teams.into_iter().next();
            }
        }
        self.rebuild_view();
    }

    pub fn select_team(&mut self, team: String) {
        self.selection.team = Some(team);
        self.rebuild_view();
    }

    pub fn select_game_type(&mut self, game_type: GameTypeFilter) {
        self.selection.game_type = game_type;
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| build_view(ds, &self.selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{GameRecord, GameResult, GameType};

    fn record(season: i64, team: &str, seasongame: i64, result: GameResult) -> GameRecord {
        GameRecord {
            season,
            team: team.to_string(),
            game_date: None,
            seasongame: Some(seasongame),
            game_type: GameType::RegularSeason,
            result,
            pts: None,
            opp_id: None,
            opp_pts: None,
        }
    }

    fn sample_state() -> AppState {
        let dataset = GameDataset::from_games(vec![
            record(2014, "LAL", 1, GameResult::Win),
            record(2015, "NYK", 1, GameResult::Loss),
            record(2015, "BOS", 1, GameResult::Win),
            record(2015, "BOS", 2, GameResult::Loss),
        ]);
        let mut state = AppState::default();
        state.set_dataset(Arc::new(dataset));
        state
    }

    #[test]
    fn test_defaults_to_latest_season_and_first_team() {
        let state = sample_state();
        assert_eq!(state.selection.season, Some(2015));
        assert_eq!(state.selection.team.as_deref(), Some("BOS"));
        assert_eq!(state.selection.game_type, GameTypeFilter::Both);
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_season_change_rescopes_missing_team() {
        let mut state = sample_state();
        // BOS does not play in 2014, so the team resets to that season's
        // first entry.
        state.select_season(2014);
        assert_eq!(state.selection.team.as_deref(), Some("LAL"));
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_season_change_keeps_team_when_it_plays_there() {
        let mut state = sample_state();
        state.select_team("NYK".to_string());
        state.select_season(2015);
        assert_eq!(state.selection.team.as_deref(), Some("NYK"));
    }

    #[test]
    fn test_selection_changes_rebuild_the_view() {
        let mut state = sample_state();
        state.select_team("NYK".to_string());
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(1));

        state.select_game_type(GameTypeFilter::Playoffs);
        assert_eq!(state.view.as_ref().map(|v| v.len()), Some(0));
    }

    #[test]
    fn test_open_path_failure_sets_status_and_keeps_dataset() {
        let mut state = sample_state();
        state.open_path(Path::new("/definitely/not/here/games.csv"));
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert!(state.dataset.is_some());
        assert_eq!(state.selection.season, Some(2015));
    }
}
