//! # Remapeamento de Offsets
//!
//! Leva entidades com offsets do texto ingênuo para o texto normalizado
//! usando o [`DisplacementMap`]. Todos os fragmentos de todas as entidades
//! são traduzidos, de forma independente.
//!
//! Se os offsets já foram calculados contra o texto normalizado (ex: o
//! tagger rodou sobre ele), use [`OffsetMode::Normalized`] e nada é
//! traduzido.

use serde::{Deserialize, Serialize};

use crate::displacement::DisplacementMap;
use crate::error::{ConvertError, Result};
use crate::span::{Entity, Span};

/// Contra qual texto os offsets das entidades foram calculados.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// Texto ingênuo (tokens unidos por espaço): precisa compensar.
    #[default]
    Naive,
    /// Texto normalizado: os spans passam direto.
    Normalized,
}

/// Traduz todos os spans de todas as entidades para o texto normalizado.
pub fn remap_entities(entities: Vec<Entity>, map: &DisplacementMap) -> Vec<Entity> {
    entities
        .into_iter()
        .map(|mut entity| {
            for span in &mut entity.spans {
                *span = Span::new(map.translate(span.start), map.translate(span.end));
            }
            entity
        })
        .collect()
}

/// Aplica o modo de offsets: remapeia em [`OffsetMode::Naive`], repassa em
/// [`OffsetMode::Normalized`].
pub fn apply_mode(entities: Vec<Entity>, map: &DisplacementMap, mode: OffsetMode) -> Vec<Entity> {
    match mode {
        OffsetMode::Naive => remap_entities(entities, map),
        OffsetMode::Normalized => entities,
    }
}

/// Confere se todos os spans cabem num texto de `text_len` caracteres.
///
/// Um span fora do texto indica que a anotação não corresponde à
/// tokenização. É reportado como erro, nunca ajustado.
pub fn check_bounds(entities: &[Entity], text_len: usize) -> Result<()> {
    for entity in entities {
        for span in &entity.spans {
            if span.start > span.end || span.end > text_len {
                return Err(ConvertError::EntityOutOfBounds {
                    id: entity.id.clone(),
                    start: span.start,
                    end: span.end,
                    len: text_len,
                });
            }
        }
    }
    Ok(())
}

/// Confere se os spans de `entity` recortam em `text` a menção que veio no BSF.
///
/// A normalização mexe nos espaços, então a comparação ignora qualquer
/// espaço em branco. Entidades sem menção sempre passam.
pub fn mention_matches(entity: &Entity, text: &str) -> bool {
    if entity.mention.is_empty() {
        return true;
    }
    let mut sliced = String::new();
    for span in &entity.spans {
        match span.slice(text) {
            Some(part) => sliced.push_str(part),
            None => return false,
        }
    }
    let visible = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    visible(&sliced) == visible(&entity.mention)
}
