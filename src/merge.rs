use std::collections::HashMap;

use crate::error::DataIssue;
use crate::model::{AdvancedStatLine, AdvancedStats, BasicStatLine, PlayerSeasonRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub records: Vec<PlayerSeasonRecord>,
    pub issues: Vec<DataIssue>,
}

/// Left join of advanced stats onto basic stats by player name.
///
/// Every basic line yields exactly one record, in input order. A player with no
/// advanced row keeps missing advanced stats. A player with several advanced rows
/// also keeps missing advanced stats and is reported as a `MergeAmbiguity`; no row is
/// picked on the caller's behalf.
pub fn merge(basic: &[BasicStatLine], advanced: &[AdvancedStatLine]) -> MergeOutcome {
    let mut by_name: HashMap<&str, Vec<&AdvancedStats>> = HashMap::new();
    for line in advanced {
        by_name
            .entry(line.player_name.as_str())
            .or_default()
            .push(&line.stats);
    }

    let mut issues = Vec::new();
    let records = basic
        .iter()
        .map(|line| {
            let advanced = match by_name.get(line.player_name.as_str()).map(Vec::as_slice) {
                Some([single]) => **single,
                Some(many) if many.len() > 1 => {
                    tracing::warn!(
                        player = %line.player_name,
                        matches = many.len(),
                        "ambiguous advanced stats, leaving them missing"
                    );
                    issues.push(DataIssue::MergeAmbiguity {
                        player: line.player_name.clone(),
                        matches: many.len(),
                    });
                    AdvancedStats::default()
                }
                _ => AdvancedStats::default(),
            };
            PlayerSeasonRecord::from_basic(line, advanced)
        })
        .collect();

    MergeOutcome { records, issues }
}
