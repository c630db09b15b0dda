//! # Documento Tokenizado e Tokenizador por Espaços
//!
//! A entrada da conversão é sempre um [`TokenizedDocument`]: uma lista de
//! sentenças, cada uma uma lista de tokens crus. Ele pode vir de duas fontes:
//!
//! - **Texto cru** via [`simple_tokenize`]: quebra em `\n` (sentenças) e em
//!   `' '` (tokens). É o formato dos arquivos `.txt` do corpus, já tokenizados
//!   com um espaço entre tokens.
//! - **Pré-tokenizado**: uma lista aninhada de strings fornecida diretamente
//!   (ex: saída de um tokenizador externo), sem passar pelo tokenizador.
//!
//! Tokens podem ser só espaço (enchimento) ou ter espaços nas bordas; quem
//! decide o que fazer com isso é o [`crate::reconstruct`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use vulyk_core::tokenizer::simple_tokenize;
//!
//! let doc = simple_tokenize("Мама мила раму !\nРама була біла .");
//! assert_eq!(doc.sentences()[1], vec!["Рама", "була", "біла", "."]);
//! ```

use serde::{Deserialize, Serialize};

use crate::reconstruct::Reconstructor;

/// Documento tokenizado: sentenças de tokens crus. Imutável.
///
/// No JSON é simplesmente `[["tok", "tok"], ["tok"]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizedDocument {
    sentences: Vec<Vec<String>>,
}

impl TokenizedDocument {
    pub fn new(sentences: Vec<Vec<String>>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Texto "ingênuo": tokens unidos por um espaço e sentenças por `\n`.
    ///
    /// É contra este texto que offsets BSF de documentos externos foram
    /// calculados.
    pub fn naive_text(&self) -> String {
        self.sentences
            .iter()
            .map(|sentence| sentence.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Nova passada do reconstrutor sobre o documento.
    ///
    /// Pode ser chamada quantas vezes for preciso; cada chamada começa do zero.
    pub fn positioned_tokens(&self) -> Reconstructor<'_> {
        Reconstructor::new(&self.sentences)
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for TokenizedDocument {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|sentence| sentence.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Tokenizador por espaços: `\n` separa sentenças, `' '` separa tokens.
///
/// Texto vazio produz um documento sem sentenças. Espaços repetidos geram
/// tokens vazios, que o reconstrutor trata como enchimento.
pub fn simple_tokenize(text: &str) -> TokenizedDocument {
    if text.is_empty() {
        return TokenizedDocument::default();
    }
    text.split('\n')
        .map(|sentence| sentence.split(' ').collect::<Vec<_>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty() {
        assert!(simple_tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_single_sentence() {
        let doc = simple_tokenize("Мама мила раму");
        assert_eq!(doc.sentences(), &[vec!["Мама", "мила", "раму"]]);
    }

    #[test]
    fn test_tokenize_sentences() {
        let doc = simple_tokenize("Мама мила раму !\nРама була біла .");
        assert_eq!(
            doc.sentences(),
            &[vec!["Мама", "мила", "раму", "!"], vec!["Рама", "була", "біла", "."]]
        );
    }

    #[test]
    fn test_naive_text_roundtrip() {
        let text = "Семпл   з Токен .\nтокен Другий";
        assert_eq!(simple_tokenize(text).naive_text(), text);
    }

    #[test]
    fn test_deserialize_nested_lists() {
        let doc: TokenizedDocument = serde_json::from_str(r#"[["a", " b"], []]"#).unwrap();
        assert_eq!(doc.sentences().len(), 2);
        assert_eq!(doc.sentences()[0][1], " b");
    }
}
