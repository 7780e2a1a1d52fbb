//! Tipos de dados para o roteamento de tarefas de IA e para as APIs
//! Anthropic Messages e OpenAI Chat Completions.
//!
//! Os tipos de fio derivam `Serialize` e `Deserialize` conforme o formato
//! esperado por cada endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provedor de IA que atende uma tarefa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Claude,
    #[serde(rename = "openai")]
    OpenAi,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Claude => write!(f, "claude"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Tipos de tarefa assistida por IA no painel de clientes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Rascunho de proposta comercial a partir das notas da auditoria.
    ProposalDraft,
    /// Resumo de uma sessão de auditoria.
    AuditSummary,
    /// E-mail curto de acompanhamento.
    EmailDraft,
    /// Extração de tarefas acionáveis a partir de notas.
    TaskExtraction,
    /// Preparação para reunião com o cliente.
    MeetingPrep,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskType::ProposalDraft => "proposal_draft",
            TaskType::AuditSummary => "audit_summary",
            TaskType::EmailDraft => "email_draft",
            TaskType::TaskExtraction => "task_extraction",
            TaskType::MeetingPrep => "meeting_prep",
        };
        f.write_str(name)
    }
}

/// Requisição independente de provedor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Texto gerado e o provedor que o produziu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub provider: Provider,
    pub model: String,
    pub text: String,
}

// --- Anthropic Messages ---

/// Corpo da requisição para `/v1/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    /// Instrução de sistema; omitida do JSON quando ausente.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

/// Uma única mensagem de conversa, usada pelas duas APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// "system", "user" ou "assistant".
    pub role: String,
    pub content: String,
}

/// Resposta de `/v1/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

/// Bloco de conteúdo. `content_type` é serializado como `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// --- OpenAI Chat Completions ---

/// Corpo da requisição para `/v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Mensagem da resposta; `content` pode vir nulo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: Option<String>,
}
