use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// One sample row, written with the historical export's column names so the
/// loader's rename map gets exercised.
#[derive(Serialize)]
struct SampleRow<'a> {
    year_id: i64,
    team_id: &'a str,
    date_game: String,
    seasongame: i64,
    is_playoffs: u8,
    game_result: &'static str,
    pts: i64,
    opp_id: &'a str,
    opp_pts: i64,
}

/// Team identifier and a rough strength used for win probabilities.
const TEAMS: [(&str, f64); 6] = [
    ("BOS", 0.72),
    ("LAL", 0.65),
    ("CHI", 0.55),
    ("NYK", 0.48),
    ("DET", 0.42),
    ("CLE", 0.35),
];

const REGULAR_GAMES: i64 = 40;
const PLAYOFF_GAMES: i64 = 7;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_games.csv";
    let mut writer =
        csv::Writer::from_path(output_path).with_context(|| format!("creating {output_path}"))?;

    let mut rows: u64 = 0;
    for season in 2013i32..=2015 {
        for (team_idx, &(team, strength)) in TEAMS.iter().enumerate() {
            let mut date = NaiveDate::from_ymd_opt(season - 1, 11, 1).expect("valid start date");
            let mut seasongame = 0;

            // Regular season for everyone.
            for _ in 0..REGULAR_GAMES {
                seasongame += 1;
                write_game(
                    &mut writer, &mut rng, season, team, team_idx, strength, seasongame, 0, date,
                )?;
                rows += 1;
                date = date + Duration::days(2 + (rng.next_u64() % 2) as i64);
            }

            // The stronger half of the league also plays a playoff round.
            if strength > 0.5 {
                date = NaiveDate::from_ymd_opt(season, 4, 20).expect("valid playoff date");
                for _ in 0..PLAYOFF_GAMES {
                    seasongame += 1;
                    write_game(
                        &mut writer, &mut rng, season, team, team_idx, strength, seasongame, 1,
                        date,
                    )?;
                    rows += 1;
                    date = date + Duration::days(2);
                }
            }
        }
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {rows} games to {output_path}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn write_game(
    writer: &mut csv::Writer<std::fs::File>,
    rng: &mut SimpleRng,
    season: i32,
    team: &str,
    team_idx: usize,
    strength: f64,
    seasongame: i64,
    is_playoffs: u8,
    date: NaiveDate,
) -> Result<()> {
    // Pick an opponent other than ourselves.
    let mut opp_idx = (rng.next_u64() as usize) % TEAMS.len();
    if opp_idx == team_idx {
        opp_idx = (opp_idx + 1) % TEAMS.len();
    }
    let (opp, opp_strength) = TEAMS[opp_idx];

    let win = rng.next_f64() < strength / (strength + opp_strength);
    let base = 85 + (rng.next_f64() * 30.0) as i64;
    let margin = 1 + (rng.next_f64() * 14.0) as i64;
    let (pts, opp_pts) = if win {
        (base + margin, base)
    } else {
        (base, base + margin)
    };

    writer
        .serialize(SampleRow {
            year_id: season as i64,
            team_id: team,
            date_game: date.format("%m/%d/%Y").to_string(),
            seasongame,
            is_playoffs,
            game_result: if win { "W" } else { "L" },
            pts,
            opp_id: opp,
            opp_pts,
        })
        .context("writing CSV row")?;
    Ok(())
}
