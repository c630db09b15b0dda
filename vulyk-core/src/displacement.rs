//! # Mapa de Deslocamento
//!
//! Função em degraus que leva offsets do texto ingênuo para o texto
//! normalizado.
//!
//! O texto normalizado nunca é mais longo que o ingênuo: ele só perde
//! caracteres (espaços antes de pontuação, espaços nas bordas de tokens,
//! enchimento). O mapa guarda, em ordem, os pontos onde essa perda acumulada
//! cresce:
//!
//! ```text
//! ingênuo:     "Семпл   з Токен ."      (o token era "Семпл  ")
//! normalizado: "Семпл з Токен."
//! entradas:    [{boundary: 7, delta: 2}, {boundary: 16, delta: 1}]
//! ```
//!
//! Para traduzir um offset `o`: soma os `delta` de todas as entradas com
//! `boundary <= o` e subtrai de `o`. A busca é binária, então o custo não
//! depende do tamanho do documento além de `O(log n)`.

use crate::reconstruct::PositionedToken;

/// Um degrau do mapa: a partir de `boundary` (no texto ingênuo), o texto
/// normalizado encolheu mais `delta` caracteres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplacementEntry {
    pub boundary: usize,
    pub delta: usize,
}

/// Mapa ordenado de deslocamentos (ingênuo → normalizado).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplacementMap {
    entries: Vec<DisplacementEntry>,
    /// `cumulative[i]` = soma dos deltas de `entries[..=i]`
    cumulative: Vec<usize>,
}

impl DisplacementMap {
    /// Constrói o mapa a partir das unidades posicionadas.
    ///
    /// Para cada unidade cujo início ingênuo está à frente do início
    /// normalizado, a diferença (`gap`) vira um novo degrau se for maior que o
    /// deslocamento já registrado. Tokens com espaço removido no início também
    /// ancoram o primeiro caractere visível, para que uma entidade que comece
    /// ali caia exatamente no token.
    pub fn build<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = PositionedToken>,
    {
        let mut map = Self::default();
        for token in tokens {
            map.observe(token.naive.start, token.normalized.start);
            if token.leading > 0 {
                map.observe(token.naive.start + token.leading, token.normalized.start);
            }
        }
        map
    }

    fn observe(&mut self, naive: usize, normalized: usize) {
        if naive <= normalized {
            return;
        }
        let gap = naive - normalized;
        let current = self.total();
        if gap > current {
            self.entries.push(DisplacementEntry {
                boundary: naive,
                delta: gap - current,
            });
            self.cumulative.push(gap);
        }
    }

    /// Deslocamento total acumulado no fim do documento.
    pub fn total(&self) -> usize {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Deslocamento acumulado válido para o offset ingênuo `offset`.
    pub fn displacement_at(&self, offset: usize) -> usize {
        let idx = self.entries.partition_point(|e| e.boundary <= offset);
        if idx == 0 {
            0
        } else {
            self.cumulative[idx - 1]
        }
    }

    /// Traduz um offset ingênuo para o texto normalizado.
    pub fn translate(&self, offset: usize) -> usize {
        offset - self.displacement_at(offset)
    }

    pub fn entries(&self) -> &[DisplacementEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
