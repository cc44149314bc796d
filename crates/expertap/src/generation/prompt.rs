//! Prompt templates for RAG generation

use crate::types::{ChatMessage, Decision, Role};

/// System instructions for grounded answers about CNSC jurisprudence
pub const SYSTEM_PROMPT: &str = r#"Ești ExpertAP, un consultant senior în achiziții publice specializat în jurisprudența CNSC (Consiliul Național de Soluționare a Contestațiilor).

Sarcina ta este să răspunzi la întrebări despre deciziile CNSC folosind EXCLUSIV informațiile din documentele furnizate în contextul de mai jos.

Reguli importante:
1. Bazează-te DOAR pe informațiile din contextul furnizat
2. Citează deciziile specifice când răspunzi (ex: "Conform deciziei BO2023_123...")
3. Dacă informația nu este în context, spune clar că nu ai suficiente date
4. Oferă răspunsuri clare, structurate și profesionale
5. Folosește terminologie juridică corectă specifică achizițiilor publice
6. Când discuți despre soluții, menționează argumentele CNSC

Răspunde în limba română, profesional și precis."#;

/// System instructions for red-flag analysis; the model must answer with JSON only
pub const RED_FLAGS_SYSTEM_PROMPT: &str = r#"Ești un expert în achiziții publice din România, specializat în identificarea clauzelor restrictive și ilegale.

Sarcina ta este să analizezi documentația de achiziție și să identifici "red flags" - clauze problematice care ar putea fi ilegale sau discriminatorii.

Categorii de red flags:
1. **Experiență similară excesivă** - Cerințe nejustificate de experiență
2. **Cifră de afaceri disproporționată** - Cerințe financiare excesive
3. **Certificări restrictive** - Cerințe de certificare care limitează concurența
4. **Personal dedicat excesiv** - Cerințe de personal nejustificate
5. **Clauze discriminatorii** - Criterii care favorizează anumiți operatori
6. **Termene nerealiste** - Termene prea scurte pentru pregătirea ofertei
7. **Criterii tehnice restrictive** - Specificații prea detaliate care limitează concurența

Pentru fiecare red flag identificat, furnizează:
- **Categoria**: Din lista de mai sus
- **Severitate**: CRITICĂ, MEDIE, SCĂZUTĂ
- **Clauza problematică**: Textul exact din document
- **Problema**: Ce este ilegal/problematic
- **Referință legală**: Articolul din Legea 98/2016 sau HG 395/2016
- **Recomandare**: Cum ar trebui modificată clauza

Răspunde EXCLUSIV în format JSON cu următoarea structură:
```json
{
  "red_flags": [
    {
      "category": "Experiență similară excesivă",
      "severity": "CRITICĂ",
      "clause": "textul exact al clauzei",
      "issue": "descrierea problemei",
      "legal_reference": "art. 170 alin. (1) din Legea 98/2016",
      "recommendation": "recomandarea de modificare"
    }
  ]
}
```

Dacă nu identifici red flags, returnează: `{"red_flags": []}`"#;

/// Characters of decision text quoted in red-flag jurisprudence blocks
const RED_FLAG_EXCERPT_CHARS: usize = 500;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// One structured context block per decision, text cut to `max_chars`
    pub fn build_context(decisions: &[Decision], max_chars: usize) -> Vec<String> {
        decisions
            .iter()
            .map(|d| Self::format_decision(d, max_chars))
            .collect()
    }

    fn format_decision(decision: &Decision, max_chars: usize) -> String {
        let or_na = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

        let codes = if decision.criticism_codes.is_empty() {
            "N/A".to_string()
        } else {
            decision.criticism_codes.join(", ")
        };

        [
            format!("=== Decizia {} ===", decision.external_id()),
            format!("Număr decizie: {}", or_na(decision.decision_number.map(|n| n.to_string()))),
            format!("Dată: {}", or_na(decision.date_display())),
            format!("Complet: {}", or_na(decision.panel.clone())),
            format!("Tip contestație: {}", decision.contest_type.as_str()),
            format!("Coduri critici: {}", codes),
            format!("Soluție: {}", or_na(decision.outcome.map(|o| o.as_str().to_string()))),
            format!("Contestator: {}", or_na(decision.claimant.clone())),
            format!(
                "Autoritate contractantă: {}",
                or_na(decision.contracting_authority.clone())
            ),
            String::new(),
            "Text integral (fragment):".to_string(),
            excerpt(&decision.full_text, max_chars),
        ]
        .join("\n")
    }

    /// Full prompt: system block, numbered documents, prior turns, then the query
    pub fn build_prompt(
        system: &str,
        contexts: &[String],
        history: &[ChatMessage],
        query: &str,
    ) -> String {
        let mut parts = vec![format!("<system>\n{}\n</system>\n", system)];

        if !contexts.is_empty() {
            parts.push("<context>".to_string());
            for (i, ctx) in contexts.iter().enumerate() {
                parts.push(format!("\n[Document {}]\n{}\n", i + 1, ctx));
            }
            parts.push("</context>\n".to_string());
        }

        if !history.is_empty() {
            parts.push("<history>".to_string());
            for message in history {
                let speaker = match message.role {
                    Role::User => "Utilizator",
                    Role::Assistant => "ExpertAP",
                };
                parts.push(format!("{}: {}", speaker, message.content));
            }
            parts.push("</history>\n".to_string());
        }

        parts.push(format!("<query>\n{}\n</query>", query));

        parts.join("\n")
    }

    /// Query sent through the RAG pipeline for a legal memo
    pub fn memo_query(topic: &str) -> String {
        format!(
            "Generează un memo juridic despre: {}. Include jurisprudență CNSC relevantă, argumente cheie și recomandări.",
            topic
        )
    }

    /// Red-flag analysis prompt with optional jurisprudence blocks
    pub fn build_red_flags_prompt(document_text: &str, jurisprudence: &[Decision]) -> String {
        let mut parts = vec![
            "Analizează următoarea documentație de achiziție publică și identifică toate clauzele problematice (red flags):\n".to_string(),
        ];

        if !jurisprudence.is_empty() {
            let blocks: Vec<String> = jurisprudence
                .iter()
                .map(|d| {
                    format!(
                        "Decizia {}: {}\nCritici: {}\nFragment cheie: {}\n",
                        d.external_id(),
                        d.outcome.map(|o| o.as_str()).unwrap_or("N/A"),
                        d.criticism_codes.join(", "),
                        excerpt(&d.full_text, RED_FLAG_EXCERPT_CHARS)
                    )
                })
                .collect();

            parts.push(format!(
                "\n=== JURISPRUDENȚĂ CNSC RELEVANTĂ ===\n{}\n=== SFÂRȘIT JURISPRUDENȚĂ ===\n",
                blocks.join("\n---\n")
            ));
        }

        parts.push(format!(
            "=== DOCUMENTAȚIE ACHIZIȚIE ===\n{}\n=== SFÂRȘIT DOCUMENTAȚIE ===",
            document_text
        ));

        let prompt = parts.join("\n");
        format!("<system>\n{}\n</system>\n\n{}", RED_FLAGS_SYSTEM_PROMPT, prompt)
    }
}

/// First `max_chars` characters, with `...` when cut
fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
