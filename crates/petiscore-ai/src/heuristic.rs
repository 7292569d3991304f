//! Deterministic rule-based scorer.
//!
//! A stand-in for the model scorer: counts legal-citation patterns and
//! structural markers in the raw text and maps them through fixed linear
//! formulas onto the six rubric criteria. Pure and deterministic; identical
//! input always yields an identical evaluation.

use std::time::Duration;

use async_trait::async_trait;
use petiscore_core::{Breakdown, CriterionScore, Evaluation};
use regex::Regex;

use crate::scorer::{ScoreError, Scorer};

/// Pattern-based petition scorer.
pub struct HeuristicScorer {
    articles: Regex,
    jurisprudence: Regex,
    consumer_code: Regex,
    monetary_value: Regex,
}

/// Raw signals extracted from one petition text.
struct Signals {
    length: usize,
    articles: usize,
    jurisprudence: usize,
    consumer_code: usize,
    paragraphs: usize,
    has_parties: bool,
    has_requests: bool,
    has_value: bool,
    has_placeholders: bool,
}

impl HeuristicScorer {
    pub fn new() -> Self {
        // The patterns are fixed; construction cannot fail.
        Self {
            articles: Regex::new(r"Art\.|Artigo|art\.").unwrap(),
            jurisprudence: Regex::new(r"(?i)STJ|STF|TJ[A-Z]{2}|Súmula").unwrap(),
            consumer_code: Regex::new(r"(?i)CDC|Código de Defesa do Consumidor").unwrap(),
            monetary_value: Regex::new(r"R\$\s*[\d.,]+").unwrap(),
        }
    }

    fn signals(&self, text: &str) -> Signals {
        let lower = text.to_lowercase();
        Signals {
            length: text.chars().count(),
            articles: self.articles.find_iter(text).count(),
            jurisprudence: self.jurisprudence.find_iter(text).count(),
            consumer_code: self.consumer_code.find_iter(text).count(),
            paragraphs: text.lines().filter(|l| !l.trim().is_empty()).count(),
            has_parties: text.contains("em desfavor de") || text.contains("em face de"),
            has_requests: lower.contains("pedidos") || lower.contains("requer"),
            has_value: self.monetary_value.is_match(text),
            // "___" is an unfilled template blank; a double space is the
            // residue of a removed placeholder.
            has_placeholders: text.contains("___") || text.contains("  "),
        }
    }

    fn evaluate_text(&self, text: &str) -> Evaluation {
        let s = self.signals(text);

        let estrutura = u32::min(
            20,
            (if s.has_parties { 15 } else { 10 })
                + (if s.has_requests { 3 } else { 0 })
                + (if s.paragraphs > 20 { 2 } else { 0 }),
        );
        let fundamentacao = usize::min(
            25,
            s.articles * 2 + s.jurisprudence * 3 + s.consumer_code * 4,
        ) as u32;
        let coerencia = if s.length > 10_000 { 15 } else { 10 };
        let qualidade = if !s.has_placeholders { 12 } else { 8 };
        let personalizacao = if s.has_value && s.length > 15_000 { 8 } else { 4 };
        let completude = u32::min(
            10,
            (if s.has_parties { 3 } else { 0 })
                + (if s.has_value { 2 } else { 0 })
                + (if s.has_requests { 3 } else { 0 })
                + 2,
        );

        let total = estrutura + fundamentacao + coerencia + qualidade + personalizacao + completude;

        let mut problemas = Vec::new();
        if s.has_placeholders {
            problemas.push("Presença de placeholders não preenchidos (___)".to_string());
        }
        if !s.has_value {
            problemas.push("Valor da causa não especificado".to_string());
        }
        if s.articles < 5 {
            problemas.push("Poucas citações de artigos legais".to_string());
        }
        if s.jurisprudence < 2 {
            problemas.push("Fundamentação jurisprudencial insuficiente".to_string());
        }
        if s.length < 10_000 {
            problemas.push("Petição muito curta, pode estar incompleta".to_string());
        }
        if problemas.is_empty() {
            problemas.push("Nenhum problema crítico detectado".to_string());
        }

        let mut pontos_fortes = Vec::new();
        if s.consumer_code >= 3 {
            pontos_fortes.push("Bom uso do Código de Defesa do Consumidor".to_string());
        }
        if s.jurisprudence >= 3 {
            pontos_fortes.push("Fundamentação jurisprudencial adequada".to_string());
        }
        if s.length > 20_000 {
            pontos_fortes.push("Petição bem desenvolvida e detalhada".to_string());
        }
        if estrutura >= 18 {
            pontos_fortes.push("Estrutura bem organizada".to_string());
        }
        if pontos_fortes.is_empty() {
            pontos_fortes.push("Petição atende requisitos mínimos".to_string());
        }

        let mut summary = format!("Petição com score {total}/100. ");
        if fundamentacao >= 15 {
            summary.push_str(&format!(
                "Boa fundamentação jurídica com {} artigos e {} precedentes.",
                s.articles, s.jurisprudence
            ));
        } else {
            summary.push_str("Fundamentação jurídica pode ser aprimorada.");
        }
        if s.has_placeholders || !s.has_value {
            summary.push_str(" Necessita revisão para completar informações faltantes.");
        }

        Evaluation {
            score: total,
            breakdown: Breakdown {
                estrutura_formatacao: CriterionScore {
                    score: estrutura,
                    max: 20,
                    comentario: "Análise da presença de elementos estruturais obrigatórios".into(),
                },
                fundamentacao_juridica: CriterionScore {
                    score: fundamentacao,
                    max: 25,
                    comentario: format!(
                        "{} artigos citados, {} precedentes",
                        s.articles, s.jurisprudence
                    ),
                },
                coerencia_clareza: CriterionScore {
                    score: coerencia,
                    max: 20,
                    comentario: "Avaliação baseada na extensão e organização do texto".into(),
                },
                qualidade_textual: CriterionScore {
                    score: qualidade,
                    max: 15,
                    comentario: if !s.has_placeholders {
                        "Sem placeholders".into()
                    } else {
                        "Presença de placeholders detectada".into()
                    },
                },
                personalizacao_contexto: CriterionScore {
                    score: personalizacao,
                    max: 10,
                    comentario: "Adequação aos fatos específicos do caso".into(),
                },
                completude: CriterionScore {
                    score: completude,
                    max: 10,
                    comentario: "Verificação de elementos essenciais presentes".into(),
                },
            },
            problemas,
            pontos_fortes,
            summary,
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for HeuristicScorer {
    fn method(&self) -> &'static str {
        "heuristic"
    }

    fn pause(&self) -> Duration {
        Duration::from_millis(100)
    }

    async fn evaluate(&self, text: &str) -> Result<Evaluation, ScoreError> {
        Ok(self.evaluate_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A long, well-formed petition that trips every positive signal and no
    /// negative one.
    fn strong_petition() -> String {
        let mut text = String::new();
        text.push_str("AÇÃO DE INDENIZAÇÃO em desfavor de EMPRESA RÉ LTDA\n");
        text.push_str("DOS PEDIDOS: requer a condenação da ré\n");
        for i in 0..25 {
            text.push_str(&format!(
                "Parágrafo {i}: nos termos do Art. 6º do CDC, conforme STJ Súmula 297.\n"
            ));
        }
        text.push_str("Valor da causa: R$ 10.000,00\n");
        while text.chars().count() <= 15_001 {
            text.push_str("A prestação do serviço foi inadequada conforme narrado acima.\n");
        }
        text
    }

    #[test]
    fn strong_petition_scores_ninety() {
        let scorer = HeuristicScorer::new();
        let eval = scorer.evaluate_text(&strong_petition());

        let b = &eval.breakdown;
        assert_eq!(b.estrutura_formatacao.score, 20);
        assert_eq!(b.fundamentacao_juridica.score, 25);
        assert_eq!(b.coerencia_clareza.score, 15);
        assert_eq!(b.qualidade_textual.score, 12);
        assert_eq!(b.personalizacao_contexto.score, 8);
        assert_eq!(b.completude.score, 10);
        assert_eq!(eval.score, 90);
        assert_eq!(eval.score, b.total());

        assert_eq!(eval.problemas, vec!["Nenhum problema crítico detectado"]);
        assert!(
            eval.pontos_fortes
                .contains(&"Bom uso do Código de Defesa do Consumidor".to_string())
        );
        assert!(eval.summary.contains("90/100"));
    }

    #[test]
    fn empty_text_floor_scores() {
        let scorer = HeuristicScorer::new();
        let eval = scorer.evaluate_text("");

        let b = &eval.breakdown;
        assert_eq!(b.estrutura_formatacao.score, 10);
        assert_eq!(b.fundamentacao_juridica.score, 0);
        assert_eq!(b.coerencia_clareza.score, 10);
        assert_eq!(b.qualidade_textual.score, 12);
        assert_eq!(b.personalizacao_contexto.score, 4);
        assert_eq!(b.completude.score, 2);
        assert_eq!(eval.score, 38);

        assert_eq!(
            eval.problemas,
            vec![
                "Valor da causa não especificado",
                "Poucas citações de artigos legais",
                "Fundamentação jurisprudencial insuficiente",
                "Petição muito curta, pode estar incompleta",
            ]
        );
        assert_eq!(eval.pontos_fortes, vec!["Petição atende requisitos mínimos"]);
    }

    #[test]
    fn placeholders_lower_textual_quality() {
        let scorer = HeuristicScorer::new();
        let eval = scorer.evaluate_text("Nome do autor: ___ requer indenização");
        assert_eq!(eval.breakdown.qualidade_textual.score, 8);
        assert!(
            eval.problemas
                .contains(&"Presença de placeholders não preenchidos (___)".to_string())
        );
    }

    #[test]
    fn double_space_counts_as_placeholder() {
        let scorer = HeuristicScorer::new();
        let eval = scorer.evaluate_text("o autor  requer");
        assert_eq!(eval.breakdown.qualidade_textual.score, 8);
    }

    #[test]
    fn fundamentacao_is_capped_at_twenty_five() {
        let scorer = HeuristicScorer::new();
        let text = "Art. Art. Art. Art. Art. Art. Art. Art. Art. Art. Art. Art. Art. Art.";
        let eval = scorer.evaluate_text(text);
        assert_eq!(eval.breakdown.fundamentacao_juridica.score, 25);
    }

    #[test]
    fn jurisprudence_matching_is_case_insensitive() {
        let scorer = HeuristicScorer::new();
        let upper = scorer.signals("conforme STJ e súmula 297");
        assert_eq!(upper.jurisprudence, 2);
        let tj = scorer.signals("julgado do TJSP");
        assert_eq!(tj.jurisprudence, 1);
    }

    #[test]
    fn monetary_value_detection() {
        let scorer = HeuristicScorer::new();
        assert!(scorer.signals("no valor de R$ 5.000,00").has_value);
        assert!(scorer.signals("R$1.500").has_value);
        assert!(!scorer.signals("sem valor indicado").has_value);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let scorer = HeuristicScorer::new();
        // Multibyte text: "ação" is 4 chars, 6 bytes.
        assert_eq!(scorer.signals("ação").length, 4);
    }

    #[tokio::test]
    async fn deterministic_across_calls() {
        let scorer = HeuristicScorer::new();
        let text = strong_petition();
        let a = scorer.evaluate(&text).await.unwrap();
        let b = scorer.evaluate(&text).await.unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn method_and_pause() {
        let scorer = HeuristicScorer::new();
        assert_eq!(scorer.method(), "heuristic");
        assert_eq!(scorer.pause(), Duration::from_millis(100));
    }
}
