use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use cached::proc_macro::cached;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{GameDataset, GameRecord, GameResult, GameType};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load-fatal failures.  Row-level defects never end up here; they degrade
/// the offending field or drop the offending row during normalization.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing mandatory column '{0}'")]
    MissingColumn(&'static str),
    #[error("malformed {format} input: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },
}

impl DataError {
    fn read(path: &Path, err: impl std::fmt::Display) -> Self {
        DataError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn malformed(format: &'static str, err: impl std::fmt::Display) -> Self {
        DataError::Malformed {
            format,
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Canonical field name → accepted source column names.  Files that already
/// carry canonical names load unchanged; the historical export's names
/// (`year_id`, `team_id`, `date_game`) are renamed on the way in.  Columns
/// matching neither are ignored.
const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("season", &["season", "year_id"]),
    ("team", &["team", "team_id"]),
    ("game_date", &["game_date", "date_game"]),
    ("seasongame", &["seasongame"]),
    ("is_playoffs", &["is_playoffs"]),
    ("game_result", &["game_result"]),
    ("pts", &["pts"]),
    ("opp_id", &["opp_id"]),
    ("opp_pts", &["opp_pts"]),
];

/// Columns that must be present in the source, or the load fails outright.
const MANDATORY_COLUMNS: &[&str] = &["season", "team", "game_result"];

fn canonical_for(header: &str) -> Option<&'static str> {
    COLUMN_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&header))
        .map(|(canonical, _)| *canonical)
}

// ---------------------------------------------------------------------------
// Raw rows – everything as optional text before coercion
// ---------------------------------------------------------------------------

/// One source row with every cell still a string.  Reading text first keeps
/// malformed numeric/date cells recoverable instead of aborting ingestion.
#[derive(Debug, Clone, Default)]
struct RawGameRow {
    season: Option<String>,
    team: Option<String>,
    game_date: Option<String>,
    seasongame: Option<String>,
    is_playoffs: Option<String>,
    game_result: Option<String>,
    pts: Option<String>,
    opp_id: Option<String>,
    opp_pts: Option<String>,
}

impl RawGameRow {
    fn set(&mut self, canonical: &str, value: Option<String>) {
        let slot = match canonical {
            "season" => &mut self.season,
            "team" => &mut self.team,
            "game_date" => &mut self.game_date,
            "seasongame" => &mut self.seasongame,
            "is_playoffs" => &mut self.is_playoffs,
            "game_result" => &mut self.game_result,
            "pts" => &mut self.pts,
            "opp_id" => &mut self.opp_id,
            "opp_pts" => &mut self.opp_pts,
            _ => return,
        };
        *slot = value;
    }
}

/// Empty and whitespace-only cells count as missing.
fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a game log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a header row (canonical)
/// * `.json`    – `[{ "year_id": ..., "team_id": ..., ... }, ...]`
/// * `.parquet` – flat scalar columns, same logical schema
pub fn load_file(path: &Path) -> Result<GameDataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!("loaded {} games from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Process-wide memoized load.  The game log is read-only for the life of
/// the process, so repeated opens of the same path reuse the first parse.
#[cached(result = true, key = "PathBuf", convert = r#"{ path.to_path_buf() }"#)]
pub fn load_cached(path: &Path) -> Result<Arc<GameDataset>, DataError> {
    load_file(path).map(Arc::new)
}

// ---------------------------------------------------------------------------
// Normalization – raw rows → GameDataset
// ---------------------------------------------------------------------------

/// Coerce raw rows into [`GameRecord`]s, dropping rows that lack a season,
/// team or `W`/`L` result.  Surviving rows keep source order; sorting is the
/// view pipeline's job.
fn normalize(raws: Vec<RawGameRow>) -> GameDataset {
    let total = raws.len();
    let mut games = Vec::with_capacity(total);

    for raw in raws {
        let Some(season) = raw.season.as_deref().and_then(parse_int_lenient) else {
            continue;
        };
        let Some(team) = raw.team else {
            continue;
        };
        let Some(result) = raw.game_result.as_deref().and_then(GameResult::from_raw) else {
            continue;
        };

        // Missing or unparseable flag counts as regular season.
        let playoff_flag = raw
            .is_playoffs
            .as_deref()
            .and_then(parse_int_lenient)
            .unwrap_or(0);

        games.push(GameRecord {
            season,
            team,
            game_date: raw.game_date.as_deref().and_then(parse_game_date),
            seasongame: raw.seasongame.as_deref().and_then(parse_int_lenient),
            game_type: GameType::from_playoff_flag(playoff_flag),
            result,
            pts: raw.pts,
            opp_id: raw.opp_id,
            opp_pts: raw.opp_pts,
        });
    }

    let dropped = total - games.len();
    if dropped > 0 {
        log::info!("dropped {dropped} of {total} rows during normalization");
    }

    GameDataset::from_games(games)
}

/// Integer coercion matching the source export's habits: plain integers,
/// or floats like `"2015.0"` truncated.
fn parse_int_lenient(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d %b %Y"];

/// Tolerant date parse over the formats seen in the wild.  Failure is a
/// `None` date, never a dropped row.
fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<GameDataset, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::read(path, e))?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(input: R) -> Result<GameDataset, DataError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| DataError::malformed("CSV", e))?
        .clone();

    // Resolve header positions once; first alias match wins.
    let mut columns: Vec<(usize, &'static str)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(canonical) = canonical_for(header) {
            if !columns.iter().any(|(_, c)| *c == canonical) {
                columns.push((idx, canonical));
            }
        }
    }
    for &mandatory in MANDATORY_COLUMNS {
        if !columns.iter().any(|(_, c)| *c == mandatory) {
            return Err(DataError::MissingColumn(mandatory));
        }
    }

    let mut raws = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::malformed("CSV", e))?;
        let mut raw = RawGameRow::default();
        for &(idx, canonical) in &columns {
            raw.set(canonical, record.get(idx).and_then(non_empty));
        }
        raws.push(raw);
    }

    Ok(normalize(raws))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year_id": 2015, "team_id": "BOS", "date_game": "4/15/2015",
///     "seasongame": 82, "is_playoffs": 0, "game_result": "W",
///     "pts": 101, "opp_id": "TOR", "opp_pts": 93 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<GameDataset, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::read(path, e))?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<GameDataset, DataError> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|e| DataError::malformed("JSON", e))?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::malformed("JSON", "expected a top-level array of records"))?;

    let mut seen_columns: Vec<&'static str> = Vec::new();
    let mut raws = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::malformed("JSON", format!("row {i} is not an object")))?;

        let mut raw = RawGameRow::default();
        for (key, value) in obj {
            if let Some(canonical) = canonical_for(key) {
                if !seen_columns.contains(&canonical) {
                    seen_columns.push(canonical);
                }
                raw.set(canonical, json_cell_to_string(value));
            }
        }
        raws.push(raw);
    }

    // An empty array carries no column information; treat it as an empty
    // dataset rather than a schema failure.
    if !records.is_empty() {
        for &mandatory in MANDATORY_COLUMNS {
            if !seen_columns.contains(&mandatory) {
                return Err(DataError::MissingColumn(mandatory));
            }
        }
    }

    Ok(normalize(raws))
}

fn json_cell_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => non_empty(s),
        JsonValue::Number(n) => Some(n.to_string()),
        // Booleans show up for flag columns; map them to the numeric form
        // the coercion step understands.
        JsonValue::Bool(true) => Some("1".to_string()),
        JsonValue::Bool(false) => Some("0".to_string()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet game log.  Flat scalar columns only (strings, ints,
/// floats, bools); every value is stringified before the shared
/// normalization pass so all three formats coerce identically.
fn load_parquet(path: &Path) -> Result<GameDataset, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::read(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::malformed("Parquet", e))?;

    // Column resolution comes from the file schema, before reading batches.
    let mut columns: Vec<(usize, &'static str)> = Vec::new();
    for (idx, field) in builder.schema().fields().iter().enumerate() {
        if let Some(canonical) = canonical_for(field.name()) {
            if !columns.iter().any(|(_, c)| *c == canonical) {
                columns.push((idx, canonical));
            }
        }
    }
    for &mandatory in MANDATORY_COLUMNS {
        if !columns.iter().any(|(_, c)| *c == mandatory) {
            return Err(DataError::MissingColumn(mandatory));
        }
    }

    let reader = builder
        .build()
        .map_err(|e| DataError::malformed("Parquet", e))?;

    let mut raws = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::malformed("Parquet", e))?;

        for row in 0..batch.num_rows() {
            let mut raw = RawGameRow::default();
            for &(idx, canonical) in &columns {
                raw.set(canonical, scalar_to_string(batch.column(idx), row));
            }
            raws.push(raw);
        }
    }

    Ok(normalize(raws))
}

/// Stringify a single scalar cell from an Arrow column.  Nulls and
/// unsupported types degrade to a missing value.
fn scalar_to_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .and_then(|a| non_empty(a.value(row))),
        DataType::LargeUtf8 => {
            let a = col.as_string::<i64>();
            non_empty(a.value(row))
        }
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| if a.value(row) { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{GameResult, GameType};

    const CSV_HEADER: &str = "year_id,team_id,date_game,seasongame,is_playoffs,game_result,pts,opp_id,opp_pts";

    fn csv_dataset(rows: &[&str]) -> GameDataset {
        let text = format!("{CSV_HEADER}\n{}\n", rows.join("\n"));
        read_csv(text.as_bytes()).expect("CSV should load")
    }

    #[test]
    fn test_csv_renames_and_coerces() {
        let ds = csv_dataset(&["2015,BOS,4/15/2015,82,0,W,101,TOR,93"]);
        assert_eq!(ds.len(), 1);
        let game = &ds.games()[0];
        assert_eq!(game.season, 2015);
        assert_eq!(game.team, "BOS");
        assert_eq!(game.game_date, NaiveDate::from_ymd_opt(2015, 4, 15));
        assert_eq!(game.seasongame, Some(82));
        assert_eq!(game.game_type, GameType::RegularSeason);
        assert_eq!(game.result, GameResult::Win);
        assert_eq!(game.pts.as_deref(), Some("101"));
        assert_eq!(game.opp_id.as_deref(), Some("TOR"));
        assert_eq!(game.opp_pts.as_deref(), Some("93"));
    }

    #[test]
    fn test_csv_drops_rows_missing_mandatory_fields() {
        let ds = csv_dataset(&[
            "2015,BOS,4/15/2015,1,0,W,101,TOR,93", // kept
            ",BOS,4/16/2015,2,0,W,99,TOR,95",      // no season
            "2015,,4/17/2015,3,0,L,90,TOR,95",     // no team
            "2015,BOS,4/18/2015,4,0,,88,TOR,95",   // no result
            "bad,BOS,4/19/2015,5,0,W,97,TOR,95",   // unparseable season
        ]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.games()[0].seasongame, Some(1));
    }

    #[test]
    fn test_csv_drops_non_win_loss_results() {
        let ds = csv_dataset(&[
            "2015,BOS,4/15/2015,1,0, w ,101,TOR,93", // trimmed + uppercased, kept
            "2015,BOS,4/16/2015,2,0,T,99,TOR,99",    // tie, dropped
            "2015,BOS,4/17/2015,3,0,win,98,TOR,92",  // spelled out, dropped
        ]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.games()[0].result, GameResult::Win);
    }

    #[test]
    fn test_bad_date_degrades_to_none_and_keeps_row() {
        let ds = csv_dataset(&["2015,BOS,not-a-date,7,0,L,90,TOR,95"]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.games()[0].game_date, None);
        assert_eq!(ds.games()[0].result, GameResult::Loss);
    }

    #[test]
    fn test_playoff_flag_defaults_to_regular_season() {
        // Missing and unparseable flags both mean regular season; this pins
        // the source program's behavior of conflating "0" with "unknown".
        let ds = csv_dataset(&[
            "2015,BOS,4/15/2015,1,,W,101,TOR,93",
            "2015,BOS,4/16/2015,2,maybe,W,99,TOR,95",
            "2015,BOS,4/17/2015,3,1,L,90,TOR,95",
        ]);
        assert_eq!(ds.games()[0].game_type, GameType::RegularSeason);
        assert_eq!(ds.games()[1].game_type, GameType::RegularSeason);
        assert_eq!(ds.games()[2].game_type, GameType::Playoffs);
    }

    #[test]
    fn test_missing_mandatory_column_is_fatal() {
        let text = "year_id,team_id,pts\n2015,BOS,101\n";
        match read_csv(text.as_bytes()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, "game_result"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_optional_column_is_not_an_error() {
        let text = "year_id,team_id,game_result\n2015,BOS,W\n";
        let ds = read_csv(text.as_bytes()).expect("optional columns may be absent");
        assert_eq!(ds.len(), 1);
        let game = &ds.games()[0];
        assert_eq!(game.seasongame, None);
        assert_eq!(game.game_date, None);
        assert_eq!(game.game_type, GameType::RegularSeason);
        assert_eq!(game.pts, None);
    }

    #[test]
    fn test_canonical_column_names_accepted() {
        let text = "season,team,game_date,game_result\n2014,NYK,2014-01-02,L\n";
        let ds = read_csv(text.as_bytes()).expect("canonical names should load");
        assert_eq!(ds.games()[0].season, 2014);
        assert_eq!(ds.games()[0].game_date, NaiveDate::from_ymd_opt(2014, 1, 2));
    }

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient("2015"), Some(2015));
        assert_eq!(parse_int_lenient(" 2015 "), Some(2015));
        assert_eq!(parse_int_lenient("2015.0"), Some(2015));
        assert_eq!(parse_int_lenient("abc"), None);
        assert_eq!(parse_int_lenient(""), None);
        assert_eq!(parse_int_lenient("NaN"), None);
    }

    #[test]
    fn test_parse_game_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1947, 4, 16);
        assert_eq!(parse_game_date("1947-04-16"), expected);
        assert_eq!(parse_game_date("4/16/1947"), expected);
        assert_eq!(parse_game_date("1947/04/16"), expected);
        assert_eq!(parse_game_date("16 Apr 1947"), expected);
        assert_eq!(parse_game_date("sometime in April"), None);
    }

    #[test]
    fn test_json_records_load() {
        let text = r#"[
            {"year_id": 2015, "team_id": "BOS", "date_game": "4/15/2015",
             "seasongame": 82, "is_playoffs": 0, "game_result": "W",
             "pts": 101, "opp_id": "TOR", "opp_pts": 93},
            {"year_id": 2015, "team_id": "BOS", "date_game": null,
             "seasongame": null, "is_playoffs": true, "game_result": "L",
             "pts": 88, "opp_id": "CLE", "opp_pts": 95}
        ]"#;
        let ds = read_json(text).expect("JSON should load");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.games()[0].season, 2015);
        assert_eq!(ds.games()[0].pts.as_deref(), Some("101"));
        // JSON true for the playoff flag means playoffs, not the default.
        assert_eq!(ds.games()[1].game_type, GameType::Playoffs);
        assert_eq!(ds.games()[1].game_date, None);
    }

    #[test]
    fn test_json_empty_array_is_empty_dataset() {
        let ds = read_json("[]").expect("empty array is fine");
        assert!(ds.is_empty());
    }

    #[test]
    fn test_json_missing_mandatory_column_is_fatal() {
        let text = r#"[{"year_id": 2015, "team_id": "BOS"}]"#;
        match read_json(text) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, "game_result"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        match load_file(Path::new("games.txt")) {
            Err(DataError::UnsupportedExtension(ext)) => assert_eq!(ext, "txt"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_file() {
        match load_file(Path::new("/definitely/not/here/games.csv")) {
            Err(DataError::Read { .. }) => {}
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_cached_reuses_the_first_parse() {
        let path = std::env::temp_dir().join("courtside_load_cached_test.csv");
        std::fs::write(&path, format!("{CSV_HEADER}\n2015,BOS,4/15/2015,1,0,W,101,TOR,93\n"))
            .expect("writing temp CSV");

        let first = load_cached(&path).expect("first load");
        let second = load_cached(&path).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }
}
