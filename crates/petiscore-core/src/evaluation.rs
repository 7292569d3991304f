//! Structured evaluation types: the contract between the scorers and the
//! calibration reporter.
//!
//! Both the heuristic scorer and the model-backed scorer produce the same
//! [`Evaluation`] shape; the reporter never distinguishes between them.

use serde::{Deserialize, Serialize};

/// One scored criterion: points awarded, the fixed ceiling, and a short note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: u32,
    pub max: u32,
    pub comentario: String,
}

/// The six fixed evaluation criteria.
///
/// Ceilings are 20/25/20/15/10/10, totalling 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    pub estrutura_formatacao: CriterionScore,
    pub fundamentacao_juridica: CriterionScore,
    pub coerencia_clareza: CriterionScore,
    pub qualidade_textual: CriterionScore,
    pub personalizacao_contexto: CriterionScore,
    pub completude: CriterionScore,
}

/// A complete quality evaluation of one petition text.
///
/// `score` is the 0-100 total. It is not enforced to equal the sum of the
/// breakdown sub-scores; model output occasionally disagrees and we keep
/// whatever the scorer reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u32,
    pub breakdown: Breakdown,
    /// Detected issues, free text, most relevant first.
    pub problemas: Vec<String>,
    /// Strengths, free text.
    pub pontos_fortes: Vec<String>,
    pub summary: String,
}

/// One evaluated petition paired with its ground-truth customer rating.
///
/// The unit the calibration core operates on; the aggregate list of these is
/// the persistence boundary between the scorer and the reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub request_id: i64,
    /// Ground-truth ordinal label, 1-5.
    pub customer_rating: i32,
    /// Automated 0-100 quality score.
    pub ai_score: u32,
    pub evaluation: Evaluation,
    pub text_length: usize,
    /// Which scorer produced this record; absent on older artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Breakdown {
    /// Sub-scores in rubric order.
    pub fn scores(&self) -> [u32; 6] {
        [
            self.estrutura_formatacao.score,
            self.fundamentacao_juridica.score,
            self.coerencia_clareza.score,
            self.qualidade_textual.score,
            self.personalizacao_contexto.score,
            self.completude.score,
        ]
    }

    /// Sum of the six sub-scores.
    pub fn total(&self) -> u32 {
        self.scores().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_breakdown() -> Breakdown {
        Breakdown {
            estrutura_formatacao: CriterionScore {
                score: 18,
                max: 20,
                comentario: "Bem organizada".into(),
            },
            fundamentacao_juridica: CriterionScore {
                score: 22,
                max: 25,
                comentario: "CDC aplicado corretamente".into(),
            },
            coerencia_clareza: CriterionScore {
                score: 17,
                max: 20,
                comentario: "Argumentação fluida".into(),
            },
            qualidade_textual: CriterionScore {
                score: 13,
                max: 15,
                comentario: "Sem erros relevantes".into(),
            },
            personalizacao_contexto: CriterionScore {
                score: 8,
                max: 10,
                comentario: "Adequada ao caso".into(),
            },
            completude: CriterionScore {
                score: 7,
                max: 10,
                comentario: "Valor da causa presente".into(),
            },
        }
    }

    #[test]
    fn breakdown_total_sums_sub_scores() {
        let b = sample_breakdown();
        assert_eq!(b.total(), 18 + 22 + 17 + 13 + 8 + 7);
    }

    #[test]
    fn evaluation_record_json_roundtrip() {
        let rec = EvaluationRecord {
            request_id: 48211,
            customer_rating: 5,
            ai_score: 85,
            evaluation: Evaluation {
                score: 85,
                breakdown: sample_breakdown(),
                problemas: vec!["Valor da causa não especificado".into()],
                pontos_fortes: vec!["Boa fundamentação".into()],
                summary: "Petição sólida.".into(),
            },
            text_length: 21044,
            method: Some("claude".into()),
        };
        let json = serde_json::to_string_pretty(&rec).unwrap();
        let parsed: EvaluationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.request_id, 48211);
        assert_eq!(parsed.ai_score, 85);
        assert_eq!(parsed.evaluation.breakdown.fundamentacao_juridica.score, 22);
        assert_eq!(parsed.evaluation.problemas.len(), 1);
        assert_eq!(parsed.method.as_deref(), Some("claude"));
    }

    #[test]
    fn method_absent_on_older_artifacts() {
        let rec = EvaluationRecord {
            request_id: 1,
            customer_rating: 3,
            ai_score: 60,
            evaluation: Evaluation {
                score: 60,
                breakdown: sample_breakdown(),
                problemas: vec![],
                pontos_fortes: vec![],
                summary: String::new(),
            },
            text_length: 100,
            method: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("method"), "None method must not serialize");
        let parsed: EvaluationRecord = serde_json::from_str(&json).unwrap();
        assert!(parsed.method.is_none());
    }

    #[test]
    fn evaluation_missing_required_field_fails() {
        // No "breakdown" — must be a parse error, not a silent default.
        let json = r#"{
            "score": 70,
            "problemas": [],
            "pontos_fortes": [],
            "summary": "ok"
        }"#;
        assert!(serde_json::from_str::<Evaluation>(json).is_err());
    }

    #[test]
    fn record_list_roundtrip_preserves_order_and_fields() {
        let mk = |id: i64, rating: i32, score: u32| EvaluationRecord {
            request_id: id,
            customer_rating: rating,
            ai_score: score,
            evaluation: Evaluation {
                score,
                breakdown: sample_breakdown(),
                problemas: vec![format!("problema {id}")],
                pontos_fortes: vec![],
                summary: "resumo".into(),
            },
            text_length: 5000,
            method: Some("heuristic".into()),
        };
        let records = vec![mk(1, 5, 90), mk(2, 2, 45), mk(3, 5, 88)];
        let json = serde_json::to_string_pretty(&records).unwrap();
        let parsed: Vec<EvaluationRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].request_id, 2);
        assert_eq!(parsed[2].ai_score, 88);
        assert_eq!(parsed[0].evaluation.problemas, vec!["problema 1"]);
    }
}
