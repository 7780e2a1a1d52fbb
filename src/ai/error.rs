//! Tipos de erro para os provedores de IA.
//!
//! Define [`AiError`] com variantes para rate limiting, erros da API,
//! erros de rede e falha de todos os provedores de uma rota.

use thiserror::Error;

use super::types::{Provider, TaskType};

/// Erros que podem ocorrer ao chamar um provedor de IA.
#[derive(Debug, Error)]
pub enum AiError {
    /// O servidor retornou HTTP 429.
    /// `retry_after_ms` indica quantos milissegundos esperar antes de retentar.
    #[error("{provider}: rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: Provider,
        retry_after_ms: u64,
    },

    /// Qualquer outro erro HTTP (4xx/5xx), com o corpo da resposta.
    #[error("{provider}: API error (status {status}): {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    /// Resposta sem nenhum texto utilizável.
    #[error("{0}: empty response")]
    EmptyResponse(Provider),

    /// Prompt vazio; nenhuma chamada é feita.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Nenhuma chave de API configurada para o provedor.
    #[error("{0}: not configured")]
    NotConfigured(Provider),

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Primário e fallback falharam.
    #[error("all providers failed for {task}: {}", join_failures(.failures))]
    AllProvidersFailed {
        task: TaskType,
        failures: Vec<(Provider, String)>,
    },
}

fn join_failures(failures: &[(Provider, String)]) -> String {
    failures
        .iter()
        .map(|(provider, error)| format!("{provider}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}
