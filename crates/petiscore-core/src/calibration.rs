//! Calibration core: checks whether automated scores track human ratings.
//!
//! Pure functions over [`EvaluationRecord`] slices — grouping by customer
//! rating, per-bucket descriptive statistics, Pearson correlation over the
//! paired (rating, score) series, the two fixed threshold judgments, and
//! issue-tag frequency analysis. No I/O; the reporter in the CLI drives this
//! and renders the output.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationRecord;

/// Calibration target: mean AI score for gold-standard petitions must reach
/// this, and low-quality petitions must stay below it.
pub const CALIBRATION_TARGET: f64 = 85.0;

/// Customer rating treated as the gold standard.
pub const GOLD_RATING: i32 = 5;

/// Highest customer rating still counted as low quality.
pub const LOW_RATING_MAX: i32 = 3;

/// How many issue tags to report per rating bucket.
pub const TOP_ISSUES: usize = 5;

// ── Grouping ──

/// Partition records into buckets keyed by exact `customer_rating`.
///
/// Within-bucket order is input order; no binning or rounding. Empty input
/// yields an empty map.
pub fn group_by_rating(records: &[EvaluationRecord]) -> BTreeMap<i32, Vec<&EvaluationRecord>> {
    let mut buckets: BTreeMap<i32, Vec<&EvaluationRecord>> = BTreeMap::new();
    for rec in records {
        buckets.entry(rec.customer_rating).or_default().push(rec);
    }
    buckets
}

// ── Descriptive statistics ──

/// Descriptive statistics of `ai_score` within one rating bucket.
///
/// `ai_score_stdev` is the sample standard deviation (n−1) and is reported
/// as 0 for single-member buckets; the textual report additionally omits the
/// stdev line in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingStats {
    pub count: usize,
    pub ai_score_avg: f64,
    pub ai_score_median: f64,
    pub ai_score_min: u32,
    pub ai_score_max: u32,
    pub ai_score_stdev: f64,
}

impl RatingStats {
    /// Compute statistics over raw scores. Returns `None` for an empty slice.
    pub fn from_scores(scores: &[u32]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        Some(Self {
            count: scores.len(),
            ai_score_avg: mean(scores),
            ai_score_median: median(scores),
            ai_score_min: *scores.iter().min().unwrap_or(&0),
            ai_score_max: *scores.iter().max().unwrap_or(&0),
            ai_score_stdev: sample_stdev(scores),
        })
    }
}

fn mean(scores: &[u32]) -> f64 {
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// Median with the even-length convention of averaging the two middle values.
fn median(scores: &[u32]) -> f64 {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 {
        f64::from(sorted[n / 2])
    } else {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    }
}

/// Sample standard deviation (n−1 denominator); 0 when n < 2.
fn sample_stdev(scores: &[u32]) -> f64 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(scores);
    let ss: f64 = scores
        .iter()
        .map(|&s| {
            let d = f64::from(s) - m;
            d * d
        })
        .sum();
    (ss / (n - 1) as f64).sqrt()
}

// ── Correlation ──

/// Pearson product-moment correlation between two paired series.
///
/// Returns exactly 0 for unequal lengths, fewer than two pairs, or a
/// constant series. The 0 is a neutral sentinel for "not well-defined", not
/// a claim of no linear relationship — callers must not read it as such.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let numerator: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let ss_x: f64 = x.iter().map(|xi| (xi - mean_x) * (xi - mean_x)).sum();
    let ss_y: f64 = y.iter().map(|yi| (yi - mean_y) * (yi - mean_y)).sum();

    if ss_x == 0.0 || ss_y == 0.0 {
        return 0.0;
    }
    numerator / (ss_x * ss_y).sqrt()
}

/// Correlation between customer ratings and AI scores, one pair per record.
///
/// Larger buckets dominate proportionally to their size; this is the global
/// statistic, not a bucket-balanced one.
pub fn rating_score_correlation(records: &[EvaluationRecord]) -> f64 {
    let ratings: Vec<f64> = records.iter().map(|r| f64::from(r.customer_rating)).collect();
    let scores: Vec<f64> = records.iter().map(|r| f64::from(r.ai_score)).collect();
    pearson(&ratings, &scores)
}

// ── Threshold judgments ──

/// Calibration check over the gold-standard pool (`customer_rating == 5`).
#[derive(Debug, Clone)]
pub struct GoldStandardCheck {
    pub count: usize,
    pub mean_score: f64,
    /// Records whose individual score already reaches the target.
    pub at_or_above_target: usize,
    /// Pass iff mean score >= [`CALIBRATION_TARGET`].
    pub passed: bool,
}

impl GoldStandardCheck {
    /// Fraction of gold-standard records at or above the target, in percent.
    pub fn at_target_pct(&self) -> f64 {
        self.at_or_above_target as f64 / self.count as f64 * 100.0
    }
}

/// Calibration check over the low-quality pool (`customer_rating <= 3`).
#[derive(Debug, Clone)]
pub struct LowQualityCheck {
    pub count: usize,
    pub mean_score: f64,
    /// Pass iff mean score < [`CALIBRATION_TARGET`].
    pub passed: bool,
}

/// Judge the gold-standard pool. `None` when no record has rating 5 — an
/// absent pool is skipped, not failed.
pub fn gold_standard_check(records: &[EvaluationRecord]) -> Option<GoldStandardCheck> {
    let scores: Vec<u32> = records
        .iter()
        .filter(|r| r.customer_rating == GOLD_RATING)
        .map(|r| r.ai_score)
        .collect();
    if scores.is_empty() {
        return None;
    }
    let mean_score = mean(&scores);
    let at_or_above_target = scores
        .iter()
        .filter(|&&s| f64::from(s) >= CALIBRATION_TARGET)
        .count();
    Some(GoldStandardCheck {
        count: scores.len(),
        mean_score,
        at_or_above_target,
        passed: mean_score >= CALIBRATION_TARGET,
    })
}

/// Judge the low-quality pool. `None` when no record has rating <= 3.
pub fn low_quality_check(records: &[EvaluationRecord]) -> Option<LowQualityCheck> {
    let scores: Vec<u32> = records
        .iter()
        .filter(|r| r.customer_rating <= LOW_RATING_MAX)
        .map(|r| r.ai_score)
        .collect();
    if scores.is_empty() {
        return None;
    }
    let mean_score = mean(&scores);
    Some(LowQualityCheck {
        count: scores.len(),
        mean_score,
        passed: mean_score < CALIBRATION_TARGET,
    })
}

// ── Issue-tag frequency ──

/// Count issue tags across a bucket and return the `limit` most frequent.
///
/// Exact string match, no normalisation. Ties are broken by first appearance
/// in the concatenated bucket order (record order, then within-record list
/// order). Empty result when the bucket carries no issues.
pub fn top_issues(records: &[&EvaluationRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut next_index = 0usize;

    for rec in records {
        for issue in &rec.evaluation.problemas {
            *counts.entry(issue.as_str()).or_insert(0) += 1;
            first_seen.entry(issue.as_str()).or_insert_with(|| {
                let idx = next_index;
                next_index += 1;
                idx
            });
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by_key(|&(issue, count)| (std::cmp::Reverse(count), first_seen[issue]));
    ranked
        .into_iter()
        .take(limit)
        .map(|(issue, count)| (issue.to_string(), count))
        .collect()
}

// ── Summary ──

/// Fully derived calibration summary, rebuilt on every reporter run and
/// persisted as `calibration_summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub total_evaluations: usize,
    pub correlation: f64,
    pub by_rating: BTreeMap<i32, RatingStats>,
}

impl CalibrationSummary {
    /// Build the summary from the aggregate record list.
    ///
    /// Empty input produces an empty summary (zero total, zero buckets,
    /// correlation 0) rather than an error.
    pub fn build(records: &[EvaluationRecord]) -> Self {
        let by_rating = group_by_rating(records)
            .into_iter()
            .filter_map(|(rating, bucket)| {
                let scores: Vec<u32> = bucket.iter().map(|r| r.ai_score).collect();
                RatingStats::from_scores(&scores).map(|stats| (rating, stats))
            })
            .collect();

        Self {
            total_evaluations: records.len(),
            correlation: rating_score_correlation(records),
            by_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{Breakdown, CriterionScore, Evaluation};

    fn criterion(score: u32, max: u32) -> CriterionScore {
        CriterionScore {
            score,
            max,
            comentario: String::new(),
        }
    }

    fn record(id: i64, rating: i32, score: u32, problemas: &[&str]) -> EvaluationRecord {
        EvaluationRecord {
            request_id: id,
            customer_rating: rating,
            ai_score: score,
            evaluation: Evaluation {
                score,
                breakdown: Breakdown {
                    estrutura_formatacao: criterion(15, 20),
                    fundamentacao_juridica: criterion(20, 25),
                    coerencia_clareza: criterion(15, 20),
                    qualidade_textual: criterion(12, 15),
                    personalizacao_contexto: criterion(8, 10),
                    completude: criterion(8, 10),
                },
                problemas: problemas.iter().map(|s| s.to_string()).collect(),
                pontos_fortes: vec![],
                summary: String::new(),
            },
            text_length: 12000,
            method: None,
        }
    }

    // ── pearson ──

    #[test]
    fn pearson_positive_affine_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0]; // y = 2x + 1
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_negative_affine_is_minus_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0]; // y = -2x + 10
        assert!((pearson(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_within_unit_interval() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&x, &y);
        assert!((-1.0..=1.0).contains(&r));
        assert!(r > 0.0, "roughly increasing data should correlate positively");
    }

    #[test]
    fn pearson_unequal_lengths_is_zero() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn pearson_short_series_is_zero() {
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn pearson_constant_series_is_zero() {
        assert_eq!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]), 0.0);
    }

    // ── grouping ──

    #[test]
    fn grouping_is_a_partition() {
        let records = vec![
            record(1, 5, 90, &[]),
            record(2, 3, 55, &[]),
            record(3, 5, 88, &[]),
            record(4, 1, 30, &[]),
        ];
        let buckets = group_by_rating(&records);
        let total: usize = buckets.values().map(|b| b.len()).sum();
        assert_eq!(total, records.len());
        assert_eq!(buckets[&5].len(), 2);
        assert_eq!(buckets[&3].len(), 1);
        assert_eq!(buckets[&1].len(), 1);
        // Within-bucket order is input order.
        assert_eq!(buckets[&5][0].request_id, 1);
        assert_eq!(buckets[&5][1].request_id, 3);
    }

    #[test]
    fn grouping_empty_input_yields_no_buckets() {
        assert!(group_by_rating(&[]).is_empty());
    }

    // ── descriptive stats ──

    #[test]
    fn stats_exact_mean_and_median() {
        let stats = RatingStats::from_scores(&[90, 92, 80]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.ai_score_avg - 87.333333333333329).abs() < 1e-9);
        assert_eq!(stats.ai_score_median, 90.0);
        assert_eq!(stats.ai_score_min, 80);
        assert_eq!(stats.ai_score_max, 92);
    }

    #[test]
    fn stats_even_length_median_averages_middle_pair() {
        let stats = RatingStats::from_scores(&[40, 60, 80, 100]).unwrap();
        assert_eq!(stats.ai_score_median, 70.0);
    }

    #[test]
    fn stats_single_member_stdev_is_zero() {
        let stats = RatingStats::from_scores(&[73]).unwrap();
        assert_eq!(stats.ai_score_stdev, 0.0);
        assert_eq!(stats.ai_score_median, 73.0);
    }

    #[test]
    fn stats_sample_stdev() {
        // Sample stdev of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138.
        let stats = RatingStats::from_scores(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert!((stats.ai_score_stdev - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn stats_empty_is_none() {
        assert!(RatingStats::from_scores(&[]).is_none());
    }

    // ── threshold judgments ──

    #[test]
    fn gold_standard_passes_at_mean_above_target() {
        let records = vec![
            record(1, 5, 90, &[]),
            record(2, 5, 92, &[]),
            record(3, 5, 80, &[]),
        ];
        let check = gold_standard_check(&records).unwrap();
        assert_eq!(check.count, 3);
        assert!((check.mean_score - 87.333333333333329).abs() < 1e-9);
        assert!(check.passed);
        assert_eq!(check.at_or_above_target, 2);
        assert!((check.at_target_pct() - 66.666666666666671).abs() < 1e-9);
    }

    #[test]
    fn gold_standard_ignores_other_ratings() {
        let records = vec![record(1, 5, 80, &[]), record(2, 4, 100, &[])];
        let check = gold_standard_check(&records).unwrap();
        assert_eq!(check.count, 1);
        assert!(!check.passed);
    }

    #[test]
    fn gold_standard_skipped_when_pool_empty() {
        let records = vec![record(1, 3, 80, &[])];
        assert!(gold_standard_check(&records).is_none());
    }

    #[test]
    fn low_quality_passes_below_target() {
        let records = vec![record(1, 2, 40, &[]), record(2, 3, 95, &[])];
        let check = low_quality_check(&records).unwrap();
        assert_eq!(check.count, 2);
        assert_eq!(check.mean_score, 67.5);
        assert!(check.passed);
    }

    #[test]
    fn low_quality_fails_at_or_above_target() {
        let records = vec![record(1, 1, 85, &[]), record(2, 3, 85, &[])];
        let check = low_quality_check(&records).unwrap();
        assert!(!check.passed);
    }

    #[test]
    fn low_quality_excludes_rating_four_and_five() {
        let records = vec![record(1, 4, 10, &[]), record(2, 5, 10, &[])];
        assert!(low_quality_check(&records).is_none());
    }

    // ── issue frequency ──

    #[test]
    fn top_issues_counts_and_orders() {
        let records = vec![
            record(1, 2, 40, &["A", "B"]),
            record(2, 2, 45, &["A"]),
            record(3, 2, 50, &["C", "A"]),
        ];
        let bucket: Vec<&EvaluationRecord> = records.iter().collect();
        let top = top_issues(&bucket, 5);
        assert_eq!(top[0], ("A".to_string(), 3));
        // B and C both occur once; B was seen first.
        assert_eq!(top[1], ("B".to_string(), 1));
        assert_eq!(top[2], ("C".to_string(), 1));
    }

    #[test]
    fn top_issues_respects_limit() {
        let records = vec![record(1, 1, 30, &["a", "b", "c", "d", "e", "f", "g"])];
        let bucket: Vec<&EvaluationRecord> = records.iter().collect();
        let top = top_issues(&bucket, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].0, "a");
    }

    #[test]
    fn top_issues_exact_match_no_normalisation() {
        let records = vec![record(1, 1, 30, &["Valor ausente", "valor ausente"])];
        let bucket: Vec<&EvaluationRecord> = records.iter().collect();
        let top = top_issues(&bucket, 5);
        assert_eq!(top.len(), 2, "case-differing strings are distinct tags");
    }

    #[test]
    fn top_issues_empty_bucket() {
        let records = vec![record(1, 4, 70, &[])];
        let bucket: Vec<&EvaluationRecord> = records.iter().collect();
        assert!(top_issues(&bucket, 5).is_empty());
    }

    // ── summary ──

    #[test]
    fn summary_empty_input() {
        let summary = CalibrationSummary::build(&[]);
        assert_eq!(summary.total_evaluations, 0);
        assert_eq!(summary.correlation, 0.0);
        assert!(summary.by_rating.is_empty());
    }

    #[test]
    fn summary_buckets_and_correlation() {
        let records = vec![
            record(1, 5, 90, &[]),
            record(2, 5, 88, &[]),
            record(3, 2, 45, &[]),
            record(4, 1, 30, &[]),
        ];
        let summary = CalibrationSummary::build(&records);
        assert_eq!(summary.total_evaluations, 4);
        assert_eq!(summary.by_rating.len(), 3);
        assert_eq!(summary.by_rating[&5].count, 2);
        assert_eq!(summary.by_rating[&5].ai_score_avg, 89.0);
        assert!(
            summary.correlation > 0.9,
            "higher ratings with higher scores should correlate strongly, got {}",
            summary.correlation
        );
    }

    #[test]
    fn summary_json_roundtrip() {
        let records = vec![record(1, 5, 90, &[]), record(2, 3, 50, &[])];
        let summary = CalibrationSummary::build(&records);
        let json = serde_json::to_string_pretty(&summary).unwrap();
        let parsed: CalibrationSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_evaluations, 2);
        assert_eq!(parsed.by_rating[&3].ai_score_min, 50);
    }
}
