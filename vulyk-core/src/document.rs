//! # Documento Vulyk e Montador
//!
//! O [`DocumentRecord`] é a saída final: texto normalizado, offsets de
//! sentenças, de tokens e entidades, mais os campos fixos que a ferramenta
//! de anotação (Vulyk, baseada no brat) espera.
//!
//! A ordem dos campos no JSON segue a do documento original, porque há
//! ferramentas a jusante que dependem da estrutura.

use serde::{Deserialize, Serialize};

use crate::config::{ConverterConfig, RecordTemplate};
use crate::reconstruct::{PositionedToken, UnitKind};
use crate::span::{Entity, Span};

/// Documento no formato do Vulyk. Criado uma vez pelo [`DocumentAssembler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub modifications: Vec<serde_json::Value>,
    pub equivs: Vec<serde_json::Value>,
    pub protocol: u32,
    pub ctime: u64,
    pub triggers: Vec<serde_json::Value>,
    pub text: String,
    pub source_files: Vec<String>,
    pub messages: Vec<serde_json::Value>,
    pub sentence_offsets: Vec<Span>,
    pub comments: Vec<serde_json::Value>,
    pub entities: Vec<Entity>,
    pub mtime: u64,
    pub relations: Vec<serde_json::Value>,
    pub token_offsets: Vec<Span>,
    pub action: String,
    pub normalizations: Vec<serde_json::Value>,
    pub attributes: Vec<serde_json::Value>,
    pub events: Vec<serde_json::Value>,
    pub document: String,
    pub collection: String,
}

impl DocumentRecord {
    /// Preenche os campos fixos a partir do `template`; os demais ficam vazios.
    pub(crate) fn from_template(
        template: &RecordTemplate,
        text: String,
        sentence_offsets: Vec<Span>,
        token_offsets: Vec<Span>,
        entities: Vec<Entity>,
        timestamp: u64,
    ) -> Self {
        Self {
            modifications: vec![],
            equivs: vec![],
            protocol: template.protocol,
            ctime: timestamp,
            triggers: vec![],
            text,
            source_files: template.source_files.clone(),
            messages: vec![],
            sentence_offsets,
            comments: vec![],
            entities,
            mtime: timestamp,
            relations: vec![],
            token_offsets,
            action: template.action.clone(),
            normalizations: vec![],
            attributes: vec![],
            events: vec![],
            document: template.document.clone(),
            collection: template.collection.clone(),
        }
    }

    /// Tamanho do texto em caracteres (a unidade de todos os offsets).
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Textos dos tokens, recortados pelos `token_offsets`.
    pub fn token_texts(&self) -> Vec<&str> {
        self.slices(&self.token_offsets)
    }

    /// Textos das sentenças, recortados pelos `sentence_offsets`.
    pub fn sentence_texts(&self) -> Vec<&str> {
        self.slices(&self.sentence_offsets)
    }

    /// Textos de todos os fragmentos de entidade, em ordem.
    pub fn entity_texts(&self) -> Vec<&str> {
        let spans: Vec<Span> = self.entities.iter().flat_map(|e| e.spans.iter().copied()).collect();
        self.slices(&spans)
    }

    fn slices(&self, spans: &[Span]) -> Vec<&str> {
        spans.iter().filter_map(|span| span.slice(&self.text)).collect()
    }
}

/// Monta o [`DocumentRecord`] a partir das unidades posicionadas.
pub struct DocumentAssembler<'c> {
    config: &'c ConverterConfig,
}

impl<'c> DocumentAssembler<'c> {
    pub fn new(config: &'c ConverterConfig) -> Self {
        Self { config }
    }

    /// Consome as unidades e monta o documento.
    ///
    /// - `text` é a concatenação das unidades;
    /// - cada `\n` fecha a sentença corrente, que só é registrada se não for vazia;
    /// - `token_offsets` guarda o span normalizado de cada token real;
    /// - as tags das entidades passam pela tabela de rótulos.
    pub fn assemble<I>(&self, tokens: I, entities: Vec<Entity>, timestamp: u64) -> DocumentRecord
    where
        I: IntoIterator<Item = PositionedToken>,
    {
        let mut text = String::new();
        let mut sentence_offsets = Vec::new();
        let mut token_offsets = Vec::new();
        let mut sentence_start = 0;
        let mut sentence_len = 0;

        for unit in tokens {
            match unit.kind {
                UnitKind::Newline => {
                    close_sentence(&mut sentence_offsets, sentence_start, sentence_len);
                    sentence_start = unit.normalized.end;
                    sentence_len = 0;
                }
                UnitKind::Space => sentence_len += unit.normalized.len(),
                UnitKind::Token => {
                    sentence_len += unit.normalized.len();
                    token_offsets.push(unit.normalized);
                }
            }
            text.push_str(&unit.text);
        }
        close_sentence(&mut sentence_offsets, sentence_start, sentence_len);

        let entities = entities
            .into_iter()
            .map(|mut entity| {
                entity.tag = self.config.label(&entity.tag).to_string();
                entity
            })
            .collect();

        DocumentRecord::from_template(
            &self.config.template,
            text,
            sentence_offsets,
            token_offsets,
            entities,
            timestamp,
        )
    }
}

/// Registra a sentença `[start, start + len)` se ela tiver conteúdo.
fn close_sentence(offsets: &mut Vec<Span>, start: usize, len: usize) {
    if len > 0 {
        offsets.push(Span::new(start, start + len));
    }
}
