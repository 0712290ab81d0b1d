use serde::Serialize;

/// Per-game box score stats. Every field is a number; gaps in the source are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BasicStats {
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub steals: f64,
    pub blocks: f64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
    pub minutes_played: f64,
    pub field_goal_attempts: f64,
}

/// Advanced metrics. `None` means the value was absent or unparsable, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdvancedStats {
    pub efficiency_rating: Option<f64>,
    pub true_shooting_pct: Option<f64>,
    pub win_shares: Option<f64>,
}

impl AdvancedStats {
    pub fn is_complete(&self) -> bool {
        self.efficiency_rating.is_some()
            && self.true_shooting_pct.is_some()
            && self.win_shares.is_some()
    }
}

/// One cleaned row of the per-game table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStatLine {
    pub player_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub age: Option<u32>,
    pub games_played: u32,
    pub stats: BasicStats,
}

/// One cleaned row of the advanced table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedStatLine {
    pub player_name: String,
    pub games_played: Option<u32>,
    pub stats: AdvancedStats,
}

/// Basic stats with advanced stats attached when the player had a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonRecord {
    pub player_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub age: Option<u32>,
    pub games_played: u32,
    pub basic: BasicStats,
    pub advanced: AdvancedStats,
}

impl PlayerSeasonRecord {
    pub fn from_basic(line: &BasicStatLine, advanced: AdvancedStats) -> Self {
        Self {
            player_name: line.player_name.clone(),
            team: line.team.clone(),
            position: line.position.clone(),
            age: line.age,
            games_played: line.games_played,
            basic: line.stats,
            advanced,
        }
    }
}

/// A record paired with its MVP score. `None` marks an undefined score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: PlayerSeasonRecord,
    pub mvp_score: Option<f64>,
}

impl ScoredRecord {
    pub fn player_name(&self) -> &str {
        &self.record.player_name
    }
}
