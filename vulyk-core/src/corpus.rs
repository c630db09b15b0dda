//! # Corpus Anotado `<S>...</S>`
//!
//! Lê o formato do corpus morfológico, uma sentença por linha e cada palavra
//! seguida da sua etiqueta entre colchetes:
//!
//! ```text
//! <S>Мама[noun] мила[verb] раму[noun].[punct]</S>
//! ```
//!
//! e gera o mesmo documento Vulyk da conversão BSF, sem entidades. Ao
//! contrário do [`crate::reconstruct`], o texto não é normalizado: os espaços
//! ao redor de cada palavra ficam no `text` como vieram, mas não entram nos
//! `token_offsets`. Cada sentença termina em `\n`, e o span dela inclui essa
//! quebra de linha.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RecordTemplate;
use crate::document::DocumentRecord;
use crate::error::Result;
use crate::span::Span;

/// Uma sentença. Não atravessa linhas.
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<S>(.*)</S>").unwrap());

/// `palavra[etiqueta]`; a palavra pode ter espaços nas bordas.
static WORD_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\[]*)\[([^\]]*)\]").unwrap());

/// Conta para a estatística de palavras.
static CYRILLIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[а-яА-ЯєіїЄЇІ]").unwrap());

/// Um arquivo do corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFile {
    pub file_id: String,
    pub content: String,
}

impl CorpusFile {
    /// Lê um arquivo; o `file_id` é o nome do arquivo, sem diretórios.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_id, content })
    }
}

/// Documento Vulyk gerado de um arquivo do corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusDocument {
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub file_id: String,
    /// Palavras com pelo menos uma letra cirílica
    #[serde(skip)]
    pub word_count: usize,
}

/// Converte um arquivo do corpus num documento Vulyk.
pub fn parse_file(file: &CorpusFile, template: &RecordTemplate, timestamp: u64) -> CorpusDocument {
    let mut text = String::new();
    // Tamanho de `text` em caracteres
    let mut len = 0;
    let mut token_offsets = Vec::new();
    let mut sentence_offsets = Vec::new();
    let mut word_count = 0;

    for sentence in SENTENCE.captures_iter(&file.content) {
        let Some(body) = sentence.get(1) else {
            continue;
        };
        let sentence_begin = len;

        for form in WORD_FORM.captures_iter(body.as_str()) {
            let Some(raw) = form.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let unpadded = raw.trim_start_matches(' ');
            let leading = raw.len() - unpadded.len();
            let trailing = unpadded.len() - unpadded.trim_end_matches(' ').len();
            let word = raw.trim();

            push_spaces(&mut text, &mut len, leading);
            let token_begin = len;
            text.push_str(word);
            len += word.chars().count();
            if len > token_begin {
                token_offsets.push(Span::new(token_begin, len));
                if CYRILLIC.is_match(word) {
                    word_count += 1;
                }
            }
            push_spaces(&mut text, &mut len, trailing);
        }

        text.push('\n');
        len += 1;
        sentence_offsets.push(Span::new(sentence_begin, len));
    }

    info!(file_id = %file.file_id, word_count, "arquivo do corpus convertido");

    let record = DocumentRecord::from_template(template, text, sentence_offsets, token_offsets, vec![], timestamp);
    CorpusDocument {
        record,
        file_id: file.file_id.clone(),
        word_count,
    }
}

fn push_spaces(text: &mut String, len: &mut usize, count: usize) {
    text.extend(std::iter::repeat(' ').take(count));
    *len += count;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> CorpusDocument {
        let file = CorpusFile {
            file_id: "sample.txt".to_string(),
            content: content.to_string(),
        };
        parse_file(&file, &RecordTemplate::default(), 1_600_000_000)
    }

    #[test]
    fn test_padded_words_keep_spaces_out_of_tokens() {
        let doc = parse("<S>Мама[noun] мила[verb] раму[noun].[punct]</S>\n<S> Київ [noun]</S>\n");
        let record = &doc.record;

        assert_eq!(record.text, "Мама мила раму.\n Київ \n");
        assert_eq!(record.token_texts(), vec!["Мама", "мила", "раму", ".", "Київ"]);
        assert_eq!(
            record.token_offsets,
            vec![
                Span::new(0, 4),
                Span::new(5, 9),
                Span::new(10, 14),
                Span::new(14, 15),
                Span::new(17, 21)
            ]
        );
        assert_eq!(record.sentence_offsets, vec![Span::new(0, 16), Span::new(16, 23)]);
        assert_eq!(record.sentence_texts(), vec!["Мама мила раму.\n", " Київ \n"]);
        assert!(record.entities.is_empty());
    }

    #[test]
    fn test_word_count_only_cyrillic() {
        let doc = parse("<S>Kyiv[noun] 2024[num] Київ[noun] і[conj] ї[x]![punct]</S>");
        assert_eq!(doc.word_count, 3);
        assert_eq!(doc.record.token_offsets.len(), 6);
    }

    #[test]
    fn test_text_outside_sentences_ignored() {
        let doc = parse("cabeçalho\n<S>Раз[num]</S> lixo\n<S>\n</S>");
        assert_eq!(doc.record.text, "Раз\n");
        assert_eq!(doc.record.sentence_offsets, vec![Span::new(0, 4)]);
    }

    #[test]
    fn test_empty_sentence_still_gets_newline() {
        let doc = parse("<S></S>");
        assert_eq!(doc.record.text, "\n");
        assert_eq!(doc.record.sentence_offsets, vec![Span::new(0, 1)]);
        assert!(doc.record.token_offsets.is_empty());
    }

    #[test]
    fn test_load_uses_file_name() {
        let dir = std::env::temp_dir().join(format!("vulyk-corpus-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("zbirka.txt");
        std::fs::write(&path, "<S>Раз[num]</S>").unwrap();

        let file = CorpusFile::load(&path).unwrap();
        assert_eq!(file.file_id, "zbirka.txt");
        assert_eq!(file.content, "<S>Раз[num]</S>");

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(CorpusFile::load(&path).is_err());
    }

    #[test]
    fn test_json_carries_file_id() {
        let doc = parse("<S>Раз[num]</S>");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["file_id"], "sample.txt");
        assert_eq!(json["text"], "Раз\n");
        assert_eq!(json["token_offsets"], serde_json::json!([[0, 3]]));
        assert!(json.get("word_count").is_none());
    }
}
