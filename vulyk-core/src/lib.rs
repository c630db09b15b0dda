//! # vulyk-core: Conversão de anotações BSF para documentos Vulyk
//!
//! Este crate converte textos tokenizados com anotações no formato brat
//! standoff (BSF) em documentos prontos para a ferramenta de anotação Vulyk.
//!
//! O problema central é o **realinhamento de offsets**: as anotações BSF
//! externas foram calculadas contra o texto "ingênuo" (tokens unidos por um
//! espaço), enquanto o documento final usa um texto normalizado, sem espaço
//! antes de pontuação de fechamento nem depois de pontuação de abertura.
//! Cada caractere removido na normalização desloca todas as entidades
//! seguintes, e um erro aqui corrompe spans em silêncio.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: documento tokenizado ([`tokenizer`]) e texto BSF.
//! 2.  **Parser BSF** ([`bsf`]): extrai as entidades com seus spans.
//! 3.  **Reconstrução** ([`reconstruct`]): gera, de forma preguiçosa, cada
//!     token, espaço e quebra de linha com sua posição nos dois textos.
//! 4.  **Mapa de deslocamento** ([`displacement`]): função em degraus
//!     ingênuo → normalizado, consultada por busca binária.
//! 5.  **Remapeamento** ([`remap`]): traduz os spans das entidades.
//! 6.  **Montagem** ([`document`]): texto, sentenças, tokens e entidades no
//!     formato do Vulyk.
//!
//! O [`converter`] junta tudo, para um documento ou para um lote em paralelo.
//!
//! Dois formatos vizinhos reaproveitam as mesmas peças: o corpus `<S>...</S>`
//! ([`corpus`]) vira o mesmo documento Vulyk, e sentenças IOB viram prompts
//! de avaliação ([`prompt`]) com o espaçamento do reconstrutor.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use vulyk_core::{Converter, OffsetMode};
//!
//! let converter = Converter::default();
//! let record = converter
//!     .convert_text("Мамо , навіщо ?", "T1 PER 0 4 Мамо", OffsetMode::Naive)
//!     .unwrap();
//!
//! assert_eq!(record.text, "Мамо, навіщо?");
//! assert_eq!(record.entities[0].tag, "ПЕРС");
//! ```

pub mod bsf;
pub mod config;
pub mod converter;
pub mod corpus;
pub mod displacement;
pub mod document;
pub mod error;
pub mod prompt;
pub mod reconstruct;
pub mod remap;
pub mod span;
pub mod tokenizer;

pub use config::ConverterConfig;
pub use converter::{BatchOutcome, BatchStatus, ConversionJob, Converter};
pub use corpus::{CorpusDocument, CorpusFile};
pub use document::DocumentRecord;
pub use error::{ConvertError, Result};
pub use prompt::{convert_sentence, PromptFormat};
pub use remap::OffsetMode;
pub use span::{Entity, Span};
pub use tokenizer::{simple_tokenize, TokenizedDocument};
