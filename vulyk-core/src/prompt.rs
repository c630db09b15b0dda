//! # Prompts a partir de sentenças IOB
//!
//! Converte o dataset de treino em IOB (uma linha `palavra TAG` por token,
//! sentenças separadas por linha em branco) no formato de prompt usado para
//! avaliar modelos generativos:
//!
//! ```text
//! Андрій B-PERS
//! Шевченко I-PERS
//! забив O
//! . O
//! ```
//!
//! vira
//!
//! ```text
//! речення: Андрій Шевченко забив.
//! PERS: Андрій Шевченко
//! ```
//!
//! A sentença e cada entidade passam pelo [`crate::reconstruct`], então a
//! pontuação sai com o mesmo espaçamento do documento Vulyk.

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::tokenizer::TokenizedDocument;

/// Textos fixos do prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptFormat {
    /// Vem antes da sentença reconstruída
    pub prefix: String,
    /// Linha usada quando a sentença não tem entidades
    pub no_entities: String,
}

impl Default for PromptFormat {
    fn default() -> Self {
        Self {
            prefix: "речення: ".to_string(),
            no_entities: "Ніц нема".to_string(),
        }
    }
}

impl PromptFormat {
    /// Monta o prompt de uma sentença (linhas `palavra TAG`).
    ///
    /// Cada sequência `B-X I-X ...` vira uma linha `X: <entidade>`. Um `I-`
    /// sem `B-` antes abre uma entidade nova do seu tipo.
    pub fn render(&self, sentence: &[&str]) -> Result<String> {
        let mut words = Vec::with_capacity(sentence.len());
        let mut mentions = Vec::new();
        let mut run: Option<(&str, Vec<String>)> = None;

        for line in sentence {
            let (word, tag) = split_iob_line(line)?;
            words.push(word.to_string());

            if tag == "O" || tag.starts_with("B-") {
                flush_run(&mut run, &mut mentions);
            }
            if let Some(kind) = tag.strip_prefix("B-") {
                run = Some((kind, vec![word.to_string()]));
            } else if let Some(kind) = tag.strip_prefix("I-") {
                match &mut run {
                    Some((_, run_words)) => run_words.push(word.to_string()),
                    None => run = Some((kind, vec![word.to_string()])),
                }
            }
        }
        flush_run(&mut run, &mut mentions);

        let body = if mentions.is_empty() {
            self.no_entities.clone()
        } else {
            mentions.join("\n")
        };
        Ok(format!("{}{}\n{}", self.prefix, reconstruct(words), body))
    }

    /// Converte um arquivo IOB inteiro. Cada prompt termina em `\n\n`.
    pub fn render_iob(&self, input: &str) -> Result<String> {
        let mut out = String::new();
        let mut sentence = Vec::new();

        // A linha vazia extra fecha a última sentença
        for line in input.lines().map(str::trim).chain(std::iter::once("")) {
            if !line.is_empty() {
                sentence.push(line);
                continue;
            }
            if !sentence.is_empty() {
                out.push_str(&self.render(&sentence)?);
                out.push_str("\n\n");
                sentence.clear();
            }
        }
        Ok(out)
    }
}

/// Prompt de uma sentença com os textos padrão.
pub fn convert_sentence(sentence: &[&str]) -> Result<String> {
    PromptFormat::default().render(sentence)
}

/// `"Київ B-LOC"` → `("Київ", "B-LOC")`
fn split_iob_line(line: &str) -> Result<(&str, &str)> {
    let mut parts = line.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(word), Some(tag), None) if !word.is_empty() && !tag.is_empty() => Ok((word, tag)),
        _ => Err(ConvertError::InvalidIobLine { line: line.to_string() }),
    }
}

fn flush_run(run: &mut Option<(&str, Vec<String>)>, mentions: &mut Vec<String>) {
    if let Some((kind, words)) = run.take() {
        mentions.push(format!("{kind}: {}", reconstruct(words)));
    }
}

/// Texto normalizado de uma única sentença.
fn reconstruct(words: Vec<String>) -> String {
    TokenizedDocument::new(vec![words]).positioned_tokens().map(|t| t.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_runs() {
        let prompt = convert_sentence(&[
            "Президент O",
            "Володимир B-PERS",
            "Зеленський I-PERS",
            "відвідав O",
            "Київ B-LOC",
            ". O",
        ])
        .unwrap();
        assert_eq!(
            prompt,
            "речення: Президент Володимир Зеленський відвідав Київ.\nPERS: Володимир Зеленський\nLOC: Київ"
        );
    }

    #[test]
    fn test_begin_right_after_inside() {
        let prompt = convert_sentence(&["Андрій B-PERS", "Шевченко I-PERS", "Динамо B-ORG", "Київ I-ORG"]).unwrap();
        assert_eq!(
            prompt,
            "речення: Андрій Шевченко Динамо Київ\nPERS: Андрій Шевченко\nORG: Динамо Київ"
        );
    }

    #[test]
    fn test_entity_keeps_punctuation_spacing() {
        let prompt = convert_sentence(&["« B-ORG", "Нафтогаз I-ORG", "» I-ORG", "заявив O"]).unwrap();
        assert_eq!(prompt, "речення: «Нафтогаз» заявив\nORG: «Нафтогаз»");
    }

    #[test]
    fn test_inside_without_begin_opens_entity() {
        let prompt = convert_sentence(&["У O", "Львові I-LOC"]).unwrap();
        assert_eq!(prompt, "речення: У Львові\nLOC: Львові");
    }

    #[test]
    fn test_no_entities() {
        let prompt = convert_sentence(&["Нічого O", "тут O", "немає O", ". O"]).unwrap();
        assert_eq!(prompt, "речення: Нічого тут немає.\nНіц нема");
    }

    #[test]
    fn test_invalid_line() {
        match convert_sentence(&["Київ B-LOC", "зайве поле O"]) {
            Err(ConvertError::InvalidIobLine { line }) => assert_eq!(line, "зайве поле O"),
            other => panic!("esperava InvalidIobLine, veio {other:?}"),
        }
        assert!(convert_sentence(&["Київ"]).is_err());
    }

    #[test]
    fn test_render_iob_file() {
        let input = "Мама B-PERS\nмиє O\n\n\n  Рама O  \n! O";
        let out = PromptFormat::default().render_iob(input).unwrap();
        assert_eq!(
            out,
            "речення: Мама миє\nPERS: Мама\n\nречення: Рама!\nНіц нема\n\n"
        );
    }

    #[test]
    fn test_custom_format() {
        let format = PromptFormat {
            prefix: "sentence: ".to_string(),
            no_entities: "none".to_string(),
        };
        assert_eq!(format.render(&["Texto O"]).unwrap(), "sentence: Texto\nnone");
    }
}
