//! # Conversor BSF → Vulyk
//!
//! Orquestra os estágios da conversão de um documento:
//!
//! ```text
//! tokens ──► Reconstructor ──┬──────────────────────────► DocumentAssembler ──► DocumentRecord
//!                            └──► DisplacementMap ──┐            ▲
//! BSF ─────► parse_bsf ──► entidades ──► remap (se Naive) ───────┘
//! ```
//!
//! Cada documento é independente: em lote, os documentos são convertidos em
//! paralelo (Rayon) e a falha de um não interrompe os outros.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use vulyk_core::{Converter, OffsetMode, TokenizedDocument};
//!
//! let converter = Converter::default();
//! let doc: TokenizedDocument = vec![vec!["Речення", "з", "Токен", "."], vec!["токен", "Другий"]]
//!     .into_iter()
//!     .collect();
//! let record = converter
//!     .convert(&doc, "T1 ORG 10 15 Токен\nT2 MISC 24 30 Другий", OffsetMode::Naive)
//!     .unwrap();
//!
//! assert_eq!(record.text, "Речення з Токен.\nтокен Другий");
//! assert_eq!(record.entity_texts(), vec!["Токен", "Другий"]);
//! ```

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bsf::parse_bsf;
use crate::config::ConverterConfig;
use crate::corpus::{parse_file, CorpusDocument, CorpusFile};
use crate::displacement::DisplacementMap;
use crate::document::{DocumentAssembler, DocumentRecord};
use crate::error::{ConvertError, Result};
use crate::remap::{apply_mode, check_bounds, mention_matches, OffsetMode};
use crate::tokenizer::{simple_tokenize, TokenizedDocument};

/// Um pedido de conversão (um item de lote ou o corpo de `/convert`).
///
/// Exatamente uma fonte de texto é usada: `tokens` (pré-tokenizado) tem
/// prioridade sobre `text` (passa pelo [`simple_tokenize`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionJob {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tokens: Option<TokenizedDocument>,
    #[serde(default)]
    pub text: Option<String>,
    /// Anotações BSF; ausente equivale a nenhuma entidade
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(default)]
    pub offset_mode: OffsetMode,
}

impl ConversionJob {
    /// Documento tokenizado deste pedido.
    pub fn document(&self) -> Result<Cow<'_, TokenizedDocument>> {
        match (&self.tokens, &self.text) {
            (Some(tokens), _) => Ok(Cow::Borrowed(tokens)),
            (None, Some(text)) => Ok(Cow::Owned(simple_tokenize(text))),
            (None, None) => Err(ConvertError::MissingField { field: "tokens" }),
        }
    }
}

/// Resultado de um item de lote, sempre associado ao seu identificador.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub id: String,
    #[serde(flatten)]
    pub status: BatchStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Ok(Box<DocumentRecord>),
    Error(String),
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, BatchStatus::Ok(_))
    }
}

/// O conversor. Só lê a configuração, então pode ser compartilhado entre threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converte um documento tokenizado com suas anotações BSF.
    pub fn convert(&self, doc: &TokenizedDocument, markup: &str, mode: OffsetMode) -> Result<DocumentRecord> {
        self.convert_at(doc, markup, mode, unix_now())
    }

    /// Como [`Converter::convert`], com o timestamp de criação explícito.
    pub fn convert_at(
        &self,
        doc: &TokenizedDocument,
        markup: &str,
        mode: OffsetMode,
        timestamp: u64,
    ) -> Result<DocumentRecord> {
        let entities = parse_bsf(markup);
        let entities = match mode {
            // O mapa só é necessário quando há o que compensar
            OffsetMode::Naive if !entities.is_empty() => {
                let map = DisplacementMap::build(doc.positioned_tokens());
                apply_mode(entities, &map, mode)
            }
            _ => entities,
        };

        let record = DocumentAssembler::new(&self.config).assemble(doc.positioned_tokens(), entities, timestamp);
        check_bounds(&record.entities, record.text_len())?;
        for entity in record.entities.iter().filter(|e| !mention_matches(e, &record.text)) {
            debug!(id = %entity.id, mention = %entity.mention, "span não recorta a menção do BSF");
        }

        debug!(
            sentences = record.sentence_offsets.len(),
            tokens = record.token_offsets.len(),
            entities = record.entities.len(),
            "documento convertido"
        );
        Ok(record)
    }

    /// Tokeniza `text` por espaços e converte.
    pub fn convert_text(&self, text: &str, markup: &str, mode: OffsetMode) -> Result<DocumentRecord> {
        self.convert(&simple_tokenize(text), markup, mode)
    }

    /// Converte um pedido já decodificado.
    pub fn convert_job(&self, job: &ConversionJob) -> Result<DocumentRecord> {
        let doc = job.document()?;
        self.convert(&doc, job.markup.as_deref().unwrap_or_default(), job.offset_mode)
    }

    /// Converte um arquivo do corpus `<S>...</S>` com o esqueleto configurado.
    pub fn convert_corpus(&self, file: &CorpusFile) -> CorpusDocument {
        parse_file(file, &self.config.template, unix_now())
    }

    /// Converte um arquivo IOB em prompts, com os textos configurados.
    pub fn convert_iob(&self, input: &str) -> Result<String> {
        self.config.prompt.render_iob(input)
    }

    /// Converte um lote de pedidos em JSON, em paralelo.
    ///
    /// Cada item é decodificado e convertido isoladamente. Itens inválidos
    /// (JSON fora do formato, campo obrigatório ausente, entidade fora do
    /// texto) viram [`BatchStatus::Error`] com o seu identificador, ou
    /// `#<posição>` quando o item não tem `id`. O lote nunca é abortado.
    pub fn convert_batch(&self, items: Vec<serde_json::Value>) -> Vec<BatchOutcome> {
        items
            .into_par_iter()
            .enumerate()
            .map(|(index, item)| {
                let id = item
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| format!("#{index}"), str::to_string);

                let result = serde_json::from_value::<ConversionJob>(item)
                    .map_err(ConvertError::from)
                    .and_then(|job| self.convert_job(&job));

                let status = match result {
                    Ok(record) => BatchStatus::Ok(Box::new(record)),
                    Err(err) => {
                        warn!(id = %id, error = %err, "documento ignorado no lote");
                        BatchStatus::Error(err.to_string())
                    }
                };
                BatchOutcome { id, status }
            })
            .collect()
    }
}

/// Segundos desde a época Unix (0 se o relógio estiver antes dela).
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
