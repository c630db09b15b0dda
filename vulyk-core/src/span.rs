//! # Spans e Entidades
//!
//! Tipos de valor compartilhados por todos os estágios da conversão.
//!
//! Todos os offsets são **índices de caractere** (não de byte), porque é assim
//! que a ferramenta de anotação (Vulyk/brat) indexa o texto. Um span é
//! semiaberto: `[start, end)`.
//!
//! No JSON, um [`Span`] vira o par `[start, end]` e uma [`Entity`] vira a
//! tripla `[id, tag, [[start, end], ...]]`.

use serde::{Deserialize, Serialize};

/// Intervalo semiaberto `[start, end)` em caracteres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Span {
    /// Índice do primeiro caractere (inclusivo)
    pub start: usize,
    /// Índice após o último caractere (exclusivo)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Número de caracteres cobertos.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorta `text` neste span, contando caracteres.
    ///
    /// Retorna `None` se o span não couber no texto.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start > self.end {
            return None;
        }
        let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
        let start = indices.nth(self.start)?;
        let end = if self.end == self.start {
            start
        } else {
            indices.nth(self.end - self.start - 1)?
        };
        Some(&text[start..end])
    }
}

impl From<[usize; 2]> for Span {
    fn from([start, end]: [usize; 2]) -> Self {
        Span { start, end }
    }
}

impl From<Span> for [usize; 2] {
    fn from(span: Span) -> Self {
        [span.start, span.end]
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Span { start, end }
    }
}

/// Uma entidade nomeada anotada.
///
/// Uma entidade pode ter vários fragmentos disjuntos (menção fragmentada);
/// cada fragmento é remapeado de forma independente.
///
/// # Exemplo
/// `T1 ORG 10 15 Токен` vira
/// `Entity { id: "T1", tag: "ORG", spans: [Span { start: 10, end: 15 }], mention: "Токен" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntityRow", into = "EntityRow")]
pub struct Entity {
    /// Identificador opaco (por convenção `T<dígitos>`)
    pub id: String,
    /// Rótulo da entidade (ex: "ORG", "РІЗН")
    pub tag: String,
    /// Fragmentos da menção, na ordem em que apareceram
    pub spans: Vec<Span>,
    /// Texto da menção como veio no BSF. Só para diagnóstico; não vai para o JSON.
    pub mention: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            spans,
            mention: String::new(),
        }
    }
}

/// Forma serializada de [`Entity`]: `[id, tag, [[start, end], ...]]`.
#[derive(Serialize, Deserialize)]
struct EntityRow(String, String, Vec<Span>);

impl From<EntityRow> for Entity {
    fn from(EntityRow(id, tag, spans): EntityRow) -> Self {
        Entity::new(id, tag, spans)
    }
}

impl From<Entity> for EntityRow {
    fn from(entity: Entity) -> Self {
        EntityRow(entity.id, entity.tag, entity.spans)
    }
}
