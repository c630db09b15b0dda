//! # Configuração do Conversor
//!
//! Dados fixos que entram no documento Vulyk mas não são comportamento:
//!
//! - a tabela de rótulos exibidos para cada tag BSF (ex: `ORG` → `ОРГ`);
//! - o esqueleto de metadados exigido pela ferramenta de anotação
//!   (`action`, `protocol`, `source_files`, ...);
//! - os textos fixos dos prompts IOB ([`PromptFormat`]).
//!
//! O padrão reproduz os valores do corpus. Pode ser sobrescrito por um JSON
//! parcial; campos ausentes ficam com o valor padrão:
//!
//! ```json
//! { "tag_labels": { "ORG": "ORG", "DATE": "ДАТА" } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompt::PromptFormat;

/// Rótulos padrão das tags (tags desconhecidas passam sem tradução).
const DEFAULT_TAG_LABELS: &[(&str, &str)] = &[
    ("ORG", "ОРГ"),
    ("PER", "ПЕРС"),
    ("PERS", "ПЕРС"),
    ("LOC", "ЛОК"),
    ("MISC", "РІЗН"),
];

/// Campos constantes do documento Vulyk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordTemplate {
    pub action: String,
    pub protocol: u32,
    pub source_files: Vec<String>,
    pub document: String,
    pub collection: String,
}

impl Default for RecordTemplate {
    fn default() -> Self {
        Self {
            action: "getDocument".to_string(),
            protocol: 1,
            source_files: vec!["ann".to_string(), "txt".to_string()],
            document: String::new(),
            collection: "/".to_string(),
        }
    }
}

/// Configuração completa do conversor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Tag BSF → rótulo exibido
    pub tag_labels: BTreeMap<String, String>,
    pub template: RecordTemplate,
    /// Textos dos prompts gerados a partir de IOB
    pub prompt: PromptFormat,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            tag_labels: DEFAULT_TAG_LABELS
                .iter()
                .map(|(tag, label)| (tag.to_string(), label.to_string()))
                .collect(),
            template: RecordTemplate::default(),
            prompt: PromptFormat::default(),
        }
    }
}

impl ConverterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lê a configuração de um arquivo JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Rótulo exibido para `tag`; tags desconhecidas voltam como vieram.
    pub fn label<'a>(&'a self, tag: &'a str) -> &'a str {
        self.tag_labels.get(tag).map_or(tag, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let config = ConverterConfig::default();
        assert_eq!(config.label("ORG"), "ОРГ");
        assert_eq!(config.label("MISC"), "РІЗН");
        assert_eq!(config.label("DATE"), "DATE");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConverterConfig::from_json_str(r#"{"tag_labels": {"DATE": "ДАТА"}}"#).unwrap();
        assert_eq!(config.label("DATE"), "ДАТА");
        // a tabela foi substituída inteira
        assert_eq!(config.label("ORG"), "ORG");
        assert_eq!(config.template, RecordTemplate::default());
    }

    #[test]
    fn test_template_override() {
        let config =
            ConverterConfig::from_json_str(r#"{"template": {"collection": "/ner/"}}"#).unwrap();
        assert_eq!(config.template.collection, "/ner/");
        assert_eq!(config.template.action, "getDocument");
        assert_eq!(config.label("LOC"), "ЛОК");
    }

    #[test]
    fn test_prompt_override() {
        let config = ConverterConfig::from_json_str(r#"{"prompt": {"no_entities": "нічого"}}"#).unwrap();
        assert_eq!(config.prompt.no_entities, "нічого");
        assert_eq!(config.prompt.prefix, "речення: ");
    }

    #[test]
    fn test_invalid_json() {
        assert!(ConverterConfig::from_json_str("{").is_err());
    }
}
