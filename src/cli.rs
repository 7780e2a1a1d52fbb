//! Interface de linha de comando do pipewise baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (add, list, show,
//! classify, move, draft) e flags globais (--user, --data-dir, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::ai::TaskType;
use crate::pipeline::Stage;

/// pipewise — funil de clientes com transições auditadas e rascunhos por IA.
#[derive(Debug, Parser)]
#[command(name = "pipewise", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Usuário registrado nas entradas de atividade.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Diretório de dados (sobrepõe `data_dir` do arquivo de configuração).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Tipo de tarefa aceito pela CLI, mapeado para [`TaskType`] internamente.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaskArg {
    /// Rascunho de proposta comercial.
    Proposal,
    /// Resumo de auditoria.
    AuditSummary,
    /// E-mail de acompanhamento.
    Email,
    /// Extração de tarefas a partir de notas.
    Tasks,
    /// Preparação para reunião.
    MeetingPrep,
}

impl From<TaskArg> for TaskType {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Proposal => TaskType::ProposalDraft,
            TaskArg::AuditSummary => TaskType::AuditSummary,
            TaskArg::Email => TaskType::EmailDraft,
            TaskArg::Tasks => TaskType::TaskExtraction,
            TaskArg::MeetingPrep => TaskType::MeetingPrep,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cria um cliente no estágio `lead`.
    Add {
        /// Nome do cliente.
        name: String,
    },

    /// Lista os clientes e seus estágios atuais.
    List,

    /// Mostra um cliente e o histórico de atividades.
    Show {
        client_id: String,
    },

    /// Classifica uma transição sem aplicá-la.
    Classify {
        from: Stage,
        to: Stage,
    },

    /// Move um cliente para outro estágio.
    Move {
        client_id: String,

        /// Estágio de destino.
        to: Stage,

        /// Justificativa, obrigatória para saltos, retrocessos, `lost` e `on_hold`.
        #[arg(long, short)]
        reason: Option<String>,
    },

    /// Gera um rascunho com IA (proposta, resumo, e-mail…).
    Draft {
        /// Texto de entrada (notas, contexto do cliente).
        prompt: String,

        /// Tipo de tarefa; inferido do texto quando omitido.
        #[arg(long, short)]
        task: Option<TaskArg>,
    },
}
