//! # Reconstrutor de Tokens
//!
//! Transforma um [`crate::tokenizer::TokenizedDocument`] numa sequência
//! preguiçosa de [`PositionedToken`]s: tokens reais, espaços separadores
//! inseridos e quebras de linha entre sentenças.
//!
//! Cada unidade emitida carrega **dois** spans:
//!
//! - `naive`: onde ela estaria no texto ingênuo (tokens unidos por `' '`,
//!   sentenças por `\n`, sem normalização nenhuma);
//! - `normalized`: onde ela fica no texto normalizado, com espaçamento
//!   correto ao redor da pontuação.
//!
//! Esse par exato de posições é a base de todo o trabalho de offsets
//! seguinte ([`crate::displacement`], [`crate::remap`]).
//!
//! ## Regras de espaçamento
//!
//! - Nada de espaço **antes** de `. , : ! ? ) ] ” »`.
//! - Nada de espaço **depois** de `( [ “ «`.
//! - Espaços nas bordas de um token são removidos; tokens que viram vazios
//!   são enchimento e não emitem nada.
//!
//! ```text
//! tokens:     ["Мамо", ",", "навіщо", "!", "?"]
//! ingênuo:    "Мамо , навіщо ! ?"
//! normalizado "Мамо, навіщо!?"
//! ```

use crate::span::Span;

/// Pontuação que nunca recebe espaço antes.
pub const CLOSING_PUNCTUATION: &[char] = &['.', ',', ':', '!', '?', ')', ']', '”', '»'];

/// Pontuação que nunca recebe espaço depois.
pub const OPENING_PUNCTUATION: &[char] = &['(', '[', '“', '«'];

/// Tipo da unidade emitida pelo reconstrutor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Token real (já sem espaços nas bordas)
    Token,
    /// Espaço separador inserido entre dois tokens
    Space,
    /// Quebra de linha entre sentenças
    Newline,
}

/// Unidade posicionada nos dois sistemas de coordenadas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    pub text: String,
    pub kind: UnitKind,
    /// Span no texto ingênuo. Para tokens, cobre o token cru (com espaços).
    pub naive: Span,
    /// Span no texto normalizado. Para tokens, cobre só o texto limpo.
    pub normalized: Span,
    /// Quantos caracteres de espaço foram removidos do início do token cru.
    pub leading: usize,
}

impl PositionedToken {
    fn separator(text: &str, kind: UnitKind, naive: usize, normalized: usize) -> Self {
        Self {
            text: text.to_string(),
            kind,
            naive: Span::new(naive, naive + 1),
            normalized: Span::new(normalized, normalized + 1),
            leading: 0,
        }
    }
}

impl std::fmt::Display for PositionedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Iterador preguiçoso sobre as unidades posicionadas de um documento.
///
/// Uma única passada, sem I/O. É `Clone`, então um consumidor pode
/// "reiniciar" a partir de qualquer ponto.
#[derive(Debug, Clone)]
pub struct Reconstructor<'a> {
    sentences: &'a [Vec<String>],
    sentence: usize,
    token: usize,
    /// Cursor no texto ingênuo (caracteres)
    naive: usize,
    /// Cursor no texto normalizado (caracteres)
    normalized: usize,
    /// Último caractere do token real emitido antes, na sentença corrente
    prev_last: Option<char>,
    newline_due: bool,
    /// Token que espera a emissão do espaço que o precede
    pending: Option<PositionedToken>,
}

impl<'a> Reconstructor<'a> {
    pub fn new(sentences: &'a [Vec<String>]) -> Self {
        Self {
            sentences,
            sentence: 0,
            token: 0,
            naive: 0,
            normalized: 0,
            prev_last: None,
            newline_due: false,
            pending: None,
        }
    }

    /// Decide se vai espaço entre o token anterior e `clean`.
    fn needs_space(&self, clean: &str) -> bool {
        let Some(prev) = self.prev_last else {
            // Primeiro token real da sentença
            return false;
        };
        let closes = clean.starts_with(CLOSING_PUNCTUATION);
        let opened = OPENING_PUNCTUATION.contains(&prev);
        !closes && !opened
    }

    /// Processa um token cru. Retorna a unidade a emitir agora, se houver.
    fn step(&mut self, raw: &str, first_in_sentence: bool) -> Option<PositionedToken> {
        let raw_len = raw.chars().count();
        let clean = raw.trim();

        if clean.is_empty() {
            // Enchimento: não emite nada, mas ocupa espaço no texto ingênuo
            self.naive += raw_len + usize::from(!first_in_sentence);
            return None;
        }

        let space = if self.needs_space(clean) {
            let unit = PositionedToken::separator(" ", UnitKind::Space, self.naive, self.normalized);
            self.naive += 1;
            self.normalized += 1;
            Some(unit)
        } else {
            // O espaço existia no texto ingênuo, mesmo que não seja emitido
            self.naive += usize::from(!first_in_sentence);
            None
        };

        let clean_len = clean.chars().count();
        let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
        let token = PositionedToken {
            text: clean.to_string(),
            kind: UnitKind::Token,
            naive: Span::new(self.naive, self.naive + raw_len),
            normalized: Span::new(self.normalized, self.normalized + clean_len),
            leading,
        };
        self.naive += raw_len;
        self.normalized += clean_len;
        self.prev_last = clean.chars().last();

        match space {
            Some(space) => {
                self.pending = Some(token);
                Some(space)
            }
            None => Some(token),
        }
    }
}

impl Iterator for Reconstructor<'_> {
    type Item = PositionedToken;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        loop {
            let sentences = self.sentences;
            let sentence = sentences.get(self.sentence)?;

            if self.newline_due {
                self.newline_due = false;
                let unit = PositionedToken::separator("\n", UnitKind::Newline, self.naive, self.normalized);
                self.naive += 1;
                self.normalized += 1;
                return Some(unit);
            }

            let Some(raw) = sentence.get(self.token) else {
                self.sentence += 1;
                self.token = 0;
                self.prev_last = None;
                self.newline_due = self.sentence < self.sentences.len();
                continue;
            };

            let first_in_sentence = self.token == 0;
            self.token += 1;
            if let Some(unit) = self.step(raw, first_in_sentence) {
                return Some(unit);
            }
        }
    }
}
