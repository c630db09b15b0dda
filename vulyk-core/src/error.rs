//! # Erros da conversão
//!
//! Falhas de conversão são falhas de validação de dados, nunca transitórias:
//! não faz sentido repetir. Cada documento falha de forma isolada, e o lote
//! continua (ver [`crate::converter::Converter::convert_batch`]).

use thiserror::Error;

/// Erros que podem ocorrer ao converter um documento.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Um span de entidade caiu fora do texto normalizado depois do remapeamento.
    ///
    /// Indica divergência entre a tokenização e a anotação de origem. O span
    /// é reportado como veio, sem ser cortado para caber no texto.
    #[error("entity {id}: span [{start}, {end}) out of bounds for text of {len} chars")]
    EntityOutOfBounds {
        id: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Um registro de entrada não trouxe um campo obrigatório.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// Linha IOB fora do formato `palavra TAG`.
    #[error("invalid IOB line `{line}`: expected `word TAG`")]
    InvalidIobLine { line: String },

    /// JSON inválido (configuração ou registro de lote).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Erro de I/O ao ler um arquivo (configuração, corpus).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Atalho para resultados da conversão.
pub type Result<T> = std::result::Result<T, ConvertError>;
