use std::collections::HashMap;

use crate::ai::{AiError, Completion, CompletionProvider, CompletionRequest, Provider, TaskType};

/// Primary provider for a task and the one tried if it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub primary: Provider,
    pub fallback: Provider,
}

const ROUTES: &[(TaskType, Provider, Provider)] = &[
    (TaskType::ProposalDraft, Provider::Claude, Provider::OpenAi),
    (TaskType::AuditSummary, Provider::Claude, Provider::OpenAi),
    (TaskType::EmailDraft, Provider::OpenAi, Provider::Claude),
    (TaskType::TaskExtraction, Provider::OpenAi, Provider::Claude),
    (TaskType::MeetingPrep, Provider::OpenAi, Provider::Claude),
];

impl Route {
    pub fn for_task(task: TaskType) -> Route {
        ROUTES
            .iter()
            .find(|(t, _, _)| *t == task)
            .map(|&(_, primary, fallback)| Route { primary, fallback })
            .unwrap_or(Route {
                primary: Provider::Claude,
                fallback: Provider::OpenAi,
            })
    }
}

/// Model identifier for a provider/task pair.
pub fn model_for(provider: Provider, task: TaskType) -> &'static str {
    match (provider, task) {
        (Provider::Claude, TaskType::TaskExtraction | TaskType::EmailDraft) => {
            "claude-haiku-4-5-20251001"
        }
        (Provider::Claude, _) => "claude-sonnet-4-5-20250929",
        (Provider::OpenAi, TaskType::ProposalDraft | TaskType::AuditSummary) => "gpt-4o",
        (Provider::OpenAi, _) => "gpt-4o-mini",
    }
}

fn max_tokens(task: TaskType) -> u32 {
    match task {
        TaskType::ProposalDraft => 4096,
        TaskType::AuditSummary | TaskType::MeetingPrep => 2048,
        TaskType::EmailDraft | TaskType::TaskExtraction => 1024,
    }
}

fn system_prompt(task: TaskType) -> &'static str {
    match task {
        TaskType::ProposalDraft => {
            "You draft commercial proposals for an AI-automation consultancy. \
             Write in Lithuanian. Structure: problem, proposed automation, \
             deliverables, timeline, investment. Be concrete and avoid hype."
        }
        TaskType::AuditSummary => {
            "You summarize AI-automation audit sessions. Write in Lithuanian. \
             List the client's current processes, the pain points, and the \
             automation opportunities ranked by expected impact."
        }
        TaskType::EmailDraft => {
            "You write short, polite follow-up emails to business clients. \
             Write in Lithuanian. Keep it under 150 words."
        }
        TaskType::TaskExtraction => {
            "Extract actionable tasks from the notes. Respond with one task per \
             line, imperative mood, no numbering, in Lithuanian."
        }
        TaskType::MeetingPrep => {
            "Prepare a meeting brief for a consultant: goals, open questions, \
             and risks. Write in Lithuanian as a bullet list."
        }
    }
}

/// Infers a task type from free text using weighted keyword scoring.
pub struct TaskRouter;

impl TaskRouter {
    pub fn infer(description: &str) -> TaskType {
        let lower = description.to_lowercase();

        let keyword_tasks: &[(&str, TaskType, u32)] = &[
            ("proposal", TaskType::ProposalDraft, 10),
            ("pasiūlym", TaskType::ProposalDraft, 10),
            ("offer", TaskType::ProposalDraft, 5),
            ("audit", TaskType::AuditSummary, 10),
            ("summar", TaskType::AuditSummary, 5),
            ("santrauk", TaskType::AuditSummary, 5),
            ("email", TaskType::EmailDraft, 10),
            ("laišk", TaskType::EmailDraft, 10),
            ("follow up", TaskType::EmailDraft, 5),
            ("follow-up", TaskType::EmailDraft, 5),
            ("task", TaskType::TaskExtraction, 10),
            ("užduot", TaskType::TaskExtraction, 10),
            ("todo", TaskType::TaskExtraction, 7),
            ("meeting", TaskType::MeetingPrep, 10),
            ("susitikim", TaskType::MeetingPrep, 10),
            ("call", TaskType::MeetingPrep, 5),
        ];

        let mut scores: HashMap<TaskType, u32> = HashMap::new();
        for &(keyword, task, weight) in keyword_tasks {
            if lower.contains(keyword) {
                *scores.entry(task).or_insert(0) += weight;
            }
        }

        // Ties resolve by routing-table order so the result is stable.
        ROUTES
            .iter()
            .map(|(task, _, _)| *task)
            .filter_map(|task| scores.get(&task).map(|score| (task, *score)))
            .fold(None, |best: Option<(TaskType, u32)>, (task, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((task, score)),
            })
            .map(|(task, _)| task)
            .unwrap_or(TaskType::EmailDraft)
    }
}

/// Sends each task to its primary provider, falling back once on failure.
///
/// No retries or backoff: one attempt per provider.
pub struct AiRouter<C, O> {
    claude: Option<C>,
    openai: Option<O>,
}

impl<C, O> AiRouter<C, O>
where
    C: CompletionProvider,
    O: CompletionProvider,
{
    pub fn new(claude: Option<C>, openai: Option<O>) -> Self {
        Self { claude, openai }
    }

    pub fn is_configured(&self) -> bool {
        self.claude.is_some() || self.openai.is_some()
    }

    pub async fn run(&self, task: TaskType, prompt: &str) -> Result<Completion, AiError> {
        if prompt.trim().is_empty() {
            return Err(AiError::EmptyPrompt);
        }

        let route = Route::for_task(task);
        let mut failures = Vec::with_capacity(2);

        for provider in [route.primary, route.fallback] {
            let req = CompletionRequest {
                model: model_for(provider, task).to_string(),
                system: Some(system_prompt(task).to_string()),
                prompt: prompt.to_string(),
                max_tokens: max_tokens(task),
            };

            match self.call(provider, &req).await {
                Ok(text) => {
                    tracing::info!(%task, %provider, model = %req.model, "ai task completed");
                    return Ok(Completion {
                        provider,
                        model: req.model,
                        text,
                    });
                }
                Err(e) => {
                    if provider == route.primary {
                        tracing::warn!(
                            %task,
                            %provider,
                            fallback = %route.fallback,
                            error = %e,
                            "primary provider failed, trying fallback"
                        );
                    }
                    failures.push((provider, e.to_string()));
                }
            }
        }

        Err(AiError::AllProvidersFailed { task, failures })
    }

    async fn call(&self, provider: Provider, req: &CompletionRequest) -> Result<String, AiError> {
        match provider {
            Provider::Claude => match &self.claude {
                Some(client) => Self::send(client, req).await,
                None => Err(AiError::NotConfigured(Provider::Claude)),
            },
            Provider::OpenAi => match &self.openai {
                Some(client) => Self::send(client, req).await,
                None => Err(AiError::NotConfigured(Provider::OpenAi)),
            },
        }
    }

    async fn send(client: &impl CompletionProvider, req: &CompletionRequest) -> Result<String, AiError> {
        tracing::debug!(provider = %client.provider(), model = %req.model, "sending ai request");
        client.complete(req).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // --- Route table ---

    #[test]
    fn long_form_tasks_prefer_claude() {
        assert_eq!(
            Route::for_task(TaskType::ProposalDraft),
            Route {
                primary: Provider::Claude,
                fallback: Provider::OpenAi
            }
        );
        assert_eq!(Route::for_task(TaskType::AuditSummary).primary, Provider::Claude);
    }

    #[test]
    fn short_tasks_prefer_openai() {
        for task in [TaskType::EmailDraft, TaskType::TaskExtraction, TaskType::MeetingPrep] {
            let route = Route::for_task(task);
            assert_eq!(route.primary, Provider::OpenAi, "{task}");
            assert_eq!(route.fallback, Provider::Claude, "{task}");
        }
    }

    #[test]
    fn model_mapping() {
        assert_eq!(
            model_for(Provider::Claude, TaskType::ProposalDraft),
            "claude-sonnet-4-5-20250929"
        );
        assert_eq!(
            model_for(Provider::Claude, TaskType::TaskExtraction),
            "claude-haiku-4-5-20251001"
        );
        assert_eq!(model_for(Provider::OpenAi, TaskType::AuditSummary), "gpt-4o");
        assert_eq!(model_for(Provider::OpenAi, TaskType::EmailDraft), "gpt-4o-mini");
    }

    // --- TaskRouter ---

    #[test]
    fn infer_proposal() {
        assert_eq!(
            TaskRouter::infer("Parenk pasiūlymą UAB Medis"),
            TaskType::ProposalDraft
        );
        assert_eq!(TaskRouter::infer("Draft a proposal"), TaskType::ProposalDraft);
    }

    #[test]
    fn infer_audit_summary() {
        assert_eq!(
            TaskRouter::infer("Summarize the audit notes"),
            TaskType::AuditSummary
        );
    }

    #[test]
    fn infer_meeting_prep() {
        assert_eq!(
            TaskRouter::infer("Prepare for the meeting on Friday"),
            TaskType::MeetingPrep
        );
    }

    #[test]
    fn infer_highest_score_wins() {
        // "task" → extraction(10), "todo" → extraction(7), "email" → email(10)
        assert_eq!(
            TaskRouter::infer("turn this email into a todo task list"),
            TaskType::TaskExtraction
        );
    }

    #[test]
    fn infer_defaults_to_email() {
        assert_eq!(TaskRouter::infer("labas rytas"), TaskType::EmailDraft);
    }

    // --- AiRouter with mock providers ---

    struct MockProvider {
        provider: Provider,
        result: Result<String, u16>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl MockProvider {
        fn ok(provider: Provider, text: &str) -> Self {
            Self {
                provider,
                result: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(provider: Provider, status: u16) -> Self {
            Self {
                provider,
                result: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl CompletionProvider for MockProvider {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn complete(&self, req: &CompletionRequest) -> Result<String, AiError> {
            self.seen.lock().unwrap().push(req.clone());
            match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AiError::Api {
                    provider: self.provider,
                    status: *status,
                    message: "mock error".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let router = AiRouter::new(
            Some(MockProvider::ok(Provider::Claude, "Pasiūlymas")),
            Some(MockProvider::ok(Provider::OpenAi, "unused")),
        );

        let completion = router.run(TaskType::ProposalDraft, "UAB Medis").await.unwrap();
        assert_eq!(completion.provider, Provider::Claude);
        assert_eq!(completion.model, "claude-sonnet-4-5-20250929");
        assert_eq!(completion.text, "Pasiūlymas");

        let claude = router.claude.as_ref().unwrap();
        assert_eq!(claude.calls(), 1);
        let sent = &claude.seen.lock().unwrap()[0];
        assert_eq!(sent.max_tokens, 4096);
        assert!(sent.system.as_deref().unwrap().contains("Lithuanian"));
        assert_eq!(router.openai.as_ref().unwrap().calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_once() {
        let router = AiRouter::new(
            Some(MockProvider::ok(Provider::Claude, "Laiškas")),
            Some(MockProvider::failing(Provider::OpenAi, 503)),
        );

        let completion = router.run(TaskType::EmailDraft, "Padėkok už susitikimą").await.unwrap();
        assert_eq!(completion.provider, Provider::Claude);
        assert_eq!(completion.model, "claude-haiku-4-5-20251001");
        assert_eq!(router.openai.as_ref().unwrap().calls(), 1);
        assert_eq!(router.claude.as_ref().unwrap().calls(), 1);
    }

    #[tokio::test]
    async fn missing_primary_uses_fallback() {
        let router: AiRouter<MockProvider, MockProvider> =
            AiRouter::new(None, Some(MockProvider::ok(Provider::OpenAi, "Santrauka")));

        let completion = router.run(TaskType::AuditSummary, "notes").await.unwrap();
        assert_eq!(completion.provider, Provider::OpenAi);
        assert_eq!(completion.model, "gpt-4o");
    }

    #[tokio::test]
    async fn both_failing_reports_each_failure() {
        let router = AiRouter::new(
            Some(MockProvider::failing(Provider::Claude, 500)),
            Some(MockProvider::failing(Provider::OpenAi, 429)),
        );

        let err = router.run(TaskType::ProposalDraft, "anything").await.unwrap_err();
        match err {
            AiError::AllProvidersFailed { task, failures } => {
                assert_eq!(task, TaskType::ProposalDraft);
                let order: Vec<Provider> = failures.iter().map(|(p, _)| *p).collect();
                assert_eq!(order, vec![Provider::Claude, Provider::OpenAi]);
            }
            other => panic!("expected AllProvidersFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfigured_router_fails_without_calls() {
        let router: AiRouter<MockProvider, MockProvider> = AiRouter::new(None, None);
        assert!(!router.is_configured());

        let err = router.run(TaskType::MeetingPrep, "agenda").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let router = AiRouter::new(
            Some(MockProvider::ok(Provider::Claude, "x")),
            Some(MockProvider::ok(Provider::OpenAi, "x")),
        );
        let err = router.run(TaskType::EmailDraft, "   ").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyPrompt));
        assert_eq!(router.claude.as_ref().unwrap().calls(), 0);
    }
}
