//! # Parser de Brat Standoff (BSF)
//!
//! Lê o formato de anotação do brat, uma entidade por registro:
//!
//! ```text
//! T9	PERS 778 783	токен
//! T10	LOC 0 5;10 14	Київ ... місто
//! ```
//!
//! O texto da menção pode conter quebras de linha, então um registro vai até
//! o início do próximo cabeçalho `T<n> TAG <início> <fim>` (ou até o fim da
//! entrada), e não até o fim da linha.
//!
//! Registros que não casam com o padrão são ignorados: o resto do documento
//! continua sendo convertido.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::span::{Entity, Span};

/// Cabeçalho completo de um registro: id, tag, fragmentos e o separador final.
static RECORD_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(T[0-9]+)\s(\w+)\s([0-9]+\s[0-9]+(?:;[0-9]+\s[0-9]+)*)\s").unwrap()
});

/// Onde começa o próximo registro. Delimita o texto da menção anterior.
static RECORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"T[0-9]+\s\w+\s[0-9]+\s[0-9]+").unwrap());

/// Converte um bloco BSF (possivelmente multilinha) em entidades.
///
/// As entidades saem na ordem em que aparecem no texto, sem ordenação.
/// Entrada vazia ou só com espaços produz uma lista vazia.
pub fn parse_bsf(bsf_data: &str) -> Vec<Entity> {
    let data = bsf_data.trim();
    let mut entities = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let Some(caps) = RECORD_HEAD.captures_at(data, pos) else {
            log_skipped(&data[pos..]);
            break;
        };
        let (Some(head), Some(id), Some(tag), Some(fragments)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            break;
        };
        log_skipped(&data[pos..head.start()]);

        // O texto da menção precisa de pelo menos um caractere
        let Some(first) = data[head.end()..].chars().next() else {
            break;
        };
        let body_end = RECORD_BOUNDARY
            .find_at(data, head.end() + first.len_utf8())
            .map_or(data.len(), |m| m.start());
        let mention = data[head.end()..body_end].trim();

        match parse_fragments(fragments.as_str()) {
            Some(spans) => entities.push(Entity {
                id: id.as_str().to_string(),
                tag: tag.as_str().to_string(),
                spans,
                mention: mention.to_string(),
            }),
            None => debug!(id = id.as_str(), "offsets do registro BSF não cabem em usize; ignorado"),
        }

        pos = body_end;
    }

    entities
}

/// `"0 5;10 14"` → `[Span(0, 5), Span(10, 14)]`
fn parse_fragments(fragments: &str) -> Option<Vec<Span>> {
    fragments
        .split(';')
        .map(|fragment| {
            let mut bounds = fragment.split_whitespace().map(str::parse::<usize>);
            match (bounds.next(), bounds.next()) {
                (Some(Ok(start)), Some(Ok(end))) => Some(Span::new(start, end)),
                _ => None,
            }
        })
        .collect()
}

fn log_skipped(text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        debug!(skipped = text, "trecho BSF malformado ignorado");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(entity: &Entity) -> Vec<(usize, usize)> {
        entity.spans.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_bsf("").is_empty());
        assert!(parse_bsf("  \n\t ").is_empty());
    }

    #[test]
    fn test_parse_single_line() {
        let ents = parse_bsf("T9\tPERS 778 783\tтокен");
        assert_eq!(ents.len(), 1);
        assert_eq!(ents[0].id, "T9");
        assert_eq!(ents[0].tag, "PERS");
        assert_eq!(spans(&ents[0]), vec![(778, 783)]);
        assert_eq!(ents[0].mention, "токен");
    }

    #[test]
    fn test_parse_keeps_lexical_order() {
        let ents = parse_bsf("T2 MISC 24 30 Другий\nT1 ORG 10 15 Токен\n");
        let ids: Vec<&str> = ents.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T1"]);
        assert_eq!(ents[1].mention, "Токен");
    }

    #[test]
    fn test_parse_multiline_mention() {
        let ents = parse_bsf("T1 ORG 0 12 Рада\nміста\nT2 LOC 13 17 Київ");
        assert_eq!(ents.len(), 2);
        assert_eq!(ents[0].mention, "Рада\nміста");
        assert_eq!(ents[1].mention, "Київ");
    }

    #[test]
    fn test_parse_fragmented_entity() {
        let ents = parse_bsf("T3\tLOC 0 5;10 14\tКиїв місто");
        assert_eq!(ents.len(), 1);
        assert_eq!(spans(&ents[0]), vec![(0, 5), (10, 14)]);
    }

    #[test]
    fn test_parse_skips_malformed_records() {
        let data = "lixo qualquer\nT1 ORG 10 15 Токен\nT2 MISC abc 30 Другий\nT3 LOC 1 2 Львів";
        let ents = parse_bsf(data);
        // T2 não casa com o padrão e vira parte da menção de T1
        let ids: Vec<&str> = ents.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T3"]);
        assert_eq!(ents[1].mention, "Львів");
    }

    #[test]
    fn test_parse_record_without_mention_is_dropped() {
        let ents = parse_bsf("T1 ORG 10 15 Токен T2 MISC 24 30");
        assert_eq!(ents.len(), 1);
        assert_eq!(ents[0].mention, "Токен");
    }

    #[test]
    fn test_parse_mention_with_arbitrary_chars() {
        let ents = parse_bsf("T1 MISC 0 9 «[x] 1:2»?\nT2 ORG 10 12 ТОВ");
        assert_eq!(ents[0].mention, "«[x] 1:2»?");
        assert_eq!(ents[1].tag, "ORG");
    }
}
