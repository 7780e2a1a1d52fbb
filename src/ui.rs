//! Interface de terminal do pipewise — spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner enquanto um provedor de IA responde e
//! `console` para estilizar estágios, classificações e o histórico.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ai::{Completion, TaskType};
use crate::pipeline::{ActivityEntry, Client, Stage, TransitionClass};

/// Spinner exibido durante uma chamada de IA.
pub struct DraftProgress {
    pb: ProgressBar,
}

impl DraftProgress {
    /// Inicia o spinner com o tipo de tarefa.
    pub fn start(task: TaskType) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{task}…"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    /// Finaliza o spinner e imprime o texto gerado.
    pub fn finish(self, completion: &Completion) {
        self.pb.finish_and_clear();
        let dim = Style::new().dim();
        println!(
            "{}",
            dim.apply_to(format!("── {} · {} ──", completion.provider, completion.model))
        );
        println!("{}", completion.text);
    }

    pub fn fail(self) {
        self.pb.finish_and_clear();
    }
}

fn stage_style(stage: Stage) -> Style {
    match stage {
        Stage::Won => Style::new().green().bold(),
        Stage::Lost => Style::new().red(),
        Stage::OnHold => Style::new().yellow(),
        _ => Style::new().cyan(),
    }
}

pub fn print_client_created(client: &Client) {
    println!(
        "  {} {} ({})",
        Style::new().green().bold().apply_to("✓"),
        client.name,
        client.id
    );
}

pub fn print_clients(clients: &[Client]) {
    if clients.is_empty() {
        println!("  No clients yet. Add one with `pipewise add <name>`.");
        return;
    }
    for client in clients {
        println!(
            "  {:<36}  {:<22}  {}",
            client.id,
            stage_style(client.stage).apply_to(client.stage),
            client.name
        );
    }
}

pub fn print_classification(from: Stage, to: Stage, class: TransitionClass) {
    let label = match class {
        TransitionClass::Sequential => Style::new().green().apply_to("sequential"),
        TransitionClass::RequiresReason => Style::new().yellow().apply_to("requires reason"),
        TransitionClass::Blocked => Style::new().red().apply_to("blocked"),
    };
    println!("  {from} → {to}: {label}");
}

pub fn print_entry(entry: &ActivityEntry) {
    let reason = entry
        .reason
        .as_deref()
        .map(|r| format!("  “{r}”"))
        .unwrap_or_default();
    println!(
        "  {}  {} → {}  by {}{}",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        stage_style(entry.from_stage).apply_to(entry.from_stage),
        stage_style(entry.to_stage).apply_to(entry.to_stage),
        entry.acting_user_id,
        reason
    );
}

pub fn print_client_history(client: &Client, entries: &[ActivityEntry]) {
    println!(
        "{} {}",
        Style::new().bold().apply_to(&client.name),
        stage_style(client.stage).apply_to(format!("[{}]", client.stage))
    );
    println!("  id: {}", client.id);
    println!("  created: {}", client.created_at.format("%Y-%m-%d %H:%M"));
    if entries.is_empty() {
        println!("  No stage changes recorded.");
    }
    for entry in entries {
        print_entry(entry);
    }
}

/// Aviso amarelo para erros de validação que pedem nova tentativa.
pub fn print_reprompt(message: &str, needs_reason: bool) {
    let hint = if needs_reason {
        " Re-run with --reason \"…\"."
    } else {
        ""
    };
    eprintln!("  {} {message}.{hint}", Style::new().yellow().apply_to("!"));
}

/// O estágio mudou mas a entrada de atividade não foi gravada.
pub fn print_unaudited_warning() {
    eprintln!(
        "  {} Stage was changed but the activity log append failed; reconcile manually.",
        Style::new().red().bold().apply_to("✗")
    );
}
