pub mod calibration;
pub mod evaluation;
pub mod petition;

pub use calibration::{
    CALIBRATION_TARGET, CalibrationSummary, GOLD_RATING, GoldStandardCheck, LOW_RATING_MAX,
    LowQualityCheck, RatingStats, TOP_ISSUES, gold_standard_check, group_by_rating, low_quality_check,
    pearson, rating_score_correlation, top_issues,
};
pub use evaluation::{Breakdown, CriterionScore, Evaluation, EvaluationRecord};
pub use petition::{PetitionRecord, ProcessedPetition};
