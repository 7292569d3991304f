//! The fixed Portuguese evaluation rubric sent to the model.

/// Rubric prompt; `{petition_text}` is replaced with the (truncated)
/// document text. The criteria ceilings match the `Breakdown` type:
/// 20/25/20/15/10/10.
const RUBRIC: &str = r#"Você é um avaliador especializado em petições iniciais de Direito do Consumidor.

Sua tarefa é avaliar a qualidade da petição fornecida usando os seguintes critérios:

**CRITÉRIOS DE AVALIAÇÃO:**

1. **ESTRUTURA E FORMATAÇÃO (0-20 pontos)**
   - Presença de todos os elementos obrigatórios (endereçamento, qualificação das partes, dos fatos, do direito, dos pedidos)
   - Organização lógica e clara
   - Formatação profissional
   - Uso adequado de títulos e subtítulos

2. **FUNDAMENTAÇÃO JURÍDICA (0-25 pontos)**
   - Citação adequada de leis, códigos e precedentes
   - Aplicação correta das normas ao caso concreto
   - Uso do CDC (Código de Defesa do Consumidor) de forma apropriada
   - Fundamentação sólida e coerente

3. **COERÊNCIA E CLAREZA (0-20 pontos)**
   - Argumentação lógica e bem estruturada
   - Linguagem clara e objetiva
   - Ausência de contradições
   - Fluidez na leitura

4. **QUALIDADE TEXTUAL (0-15 pontos)**
   - Correção gramatical e ortográfica
   - Uso adequado de linguagem jurídica
   - Redação profissional
   - Concisão sem perda de informação relevante

5. **PERSONALIZAÇÃO E CONTEXTO (0-10 pontos)**
   - Adequação aos fatos específicos do caso
   - Evidências de análise individual (não texto genérico)
   - Conexão entre fatos narrados e pedidos

6. **COMPLETUDE (0-10 pontos)**
   - Todos os elementos necessários estão presentes
   - Valor da causa (quando aplicável)
   - Documentos mencionados
   - Qualificação completa das partes

**FORMATO DE RESPOSTA:**

Retorne APENAS um JSON válido no seguinte formato:

```json
{
  "score": 85,
  "breakdown": {
    "estrutura_formatacao": {
      "score": 18,
      "max": 20,
      "comentario": "Breve comentário sobre este critério"
    },
    "fundamentacao_juridica": {
      "score": 22,
      "max": 25,
      "comentario": "Breve comentário sobre este critério"
    },
    "coerencia_clareza": {
      "score": 17,
      "max": 20,
      "comentario": "Breve comentário sobre este critério"
    },
    "qualidade_textual": {
      "score": 13,
      "max": 15,
      "comentario": "Breve comentário sobre este critério"
    },
    "personalizacao_contexto": {
      "score": 8,
      "max": 10,
      "comentario": "Breve comentário sobre este critério"
    },
    "completude": {
      "score": 7,
      "max": 10,
      "comentario": "Breve comentário sobre este critério"
    }
  },
  "problemas": [
    "Lista de problemas específicos encontrados",
    "Cada item deve ser claro e objetivo",
    "Máximo 10 problemas mais relevantes"
  ],
  "pontos_fortes": [
    "Lista de pontos positivos da petição",
    "Aspectos bem executados",
    "Máximo 5 pontos fortes"
  ],
  "summary": "Resumo geral da avaliação em 2-3 frases"
}
```

**PETIÇÃO A AVALIAR:**

{petition_text}

**IMPORTANTE:** Retorne APENAS o JSON, sem texto adicional antes ou depois."#;

/// Render the rubric prompt for one petition text.
pub fn render_prompt(petition_text: &str) -> String {
    RUBRIC.replace("{petition_text}", petition_text)
}
