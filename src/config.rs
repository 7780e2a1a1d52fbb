//! Configuração do pipewise carregada a partir de `pipewise.toml`.
//!
//! A struct [`PipewiseConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `ANTHROPIC_API_KEY` e `OPENAI_API_KEY` têm
//! precedência sobre o arquivo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "pipewise.toml";

/// Configuração de nível superior carregada de `pipewise.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipewiseConfig {
    /// Chave da API Anthropic (Claude).
    #[serde(default)]
    pub anthropic_api_key: String,

    /// Chave da API OpenAI.
    #[serde(default)]
    pub openai_api_key: String,

    /// Diretório com `clients.json` e `activity.jsonl`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Usuário registrado nas entradas de atividade quando `--user` não é dado.
    #[serde(default = "default_acting_user")]
    pub acting_user: String,

    /// Tempo máximo de uma chamada aos provedores de IA.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Valor padrão para o diretório de dados: ".pipewise".
fn default_data_dir() -> PathBuf {
    PathBuf::from(".pipewise")
}

// Valor padrão para o usuário: "operator".
fn default_acting_user() -> String {
    "operator".to_string()
}

// Valor padrão para o timeout: 120s.
fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for PipewiseConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            openai_api_key: String::new(),
            data_dir: default_data_dir(),
            acting_user: default_acting_user(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PipewiseConfig {
    /// Carrega a configuração de `pipewise.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<PipewiseConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        // Variáveis de ambiente têm precedência sobre o arquivo para as chaves.
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.is_empty()
        {
            config.anthropic_api_key = key;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.openai_api_key = key;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
