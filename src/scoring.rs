use std::cmp::Ordering;

use crate::model::{PlayerSeasonRecord, ScoredRecord};

/// Fixed weights of the MVP proxy score. Arbitrary by construction, not fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MvpWeights {
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub steals: f64,
    pub blocks: f64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
    pub efficiency_rating: f64,
    pub true_shooting_pct: f64,
    pub win_shares: f64,
}

pub const MVP_WEIGHTS: MvpWeights = MvpWeights {
    points: 0.40,
    assists: 0.20,
    rebounds: 0.15,
    steals: 0.05,
    blocks: 0.05,
    field_goal_pct: 0.03,
    three_point_pct: 0.01,
    free_throw_pct: 0.01,
    efficiency_rating: 0.05,
    true_shooting_pct: 0.03,
    win_shares: 0.02,
};

/// MVP score of one record. `None` when any advanced stat is missing: a missing
/// value propagates rather than counting as zero.
pub fn mvp_score(record: &PlayerSeasonRecord) -> Option<f64> {
    let w = &MVP_WEIGHTS;
    let b = &record.basic;
    let a = &record.advanced;

    let per = a.efficiency_rating?;
    let ts = a.true_shooting_pct?;
    let ws = a.win_shares?;

    Some(
        b.points * w.points
            + b.assists * w.assists
            + b.rebounds * w.rebounds
            + b.steals * w.steals
            + b.blocks * w.blocks
            + b.field_goal_pct * w.field_goal_pct
            + b.three_point_pct * w.three_point_pct
            + b.free_throw_pct * w.free_throw_pct
            + per * w.efficiency_rating
            + ts * w.true_shooting_pct
            + ws * w.win_shares,
    )
}

/// Scores every record into a new table; the input is left untouched.
pub fn score(records: &[PlayerSeasonRecord]) -> Vec<ScoredRecord> {
    records
        .iter()
        .map(|record| ScoredRecord {
            record: record.clone(),
            mvp_score: mvp_score(record),
        })
        .collect()
}

/// Top `top_n` by score, highest first. Undefined scores are left out; equal scores
/// keep their input order.
pub fn rank(scored: &[ScoredRecord], top_n: usize) -> Vec<ScoredRecord> {
    let mut ranked: Vec<&ScoredRecord> = scored.iter().filter(|r| r.mvp_score.is_some()).collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| compare_desc(a.mvp_score, b.mvp_score));
    ranked.into_iter().take(top_n).cloned().collect()
}

fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::compare_desc;
    use std::cmp::Ordering;

    #[test]
    fn higher_scores_sort_first() {
        assert_eq!(compare_desc(Some(2.0), Some(1.0)), Ordering::Less);
        assert_eq!(compare_desc(Some(1.0), Some(1.0)), Ordering::Equal);
        assert_eq!(compare_desc(None, Some(0.0)), Ordering::Greater);
    }
}
