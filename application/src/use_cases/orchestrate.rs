//! The orchestrator: one entry point per user message.
//!
//! Routing order: back-reference check, then classification (keyword first,
//! model second), then either direct dispatch or the collaborative fallback
//! where every agent answers concurrently and the most confident reply wins.
//! The entry point is infallible: any unexpected error inside the pipeline is
//! logged and converted into one fixed generic message.

use crate::agents::SpecializedAgent;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::task_store::StoreError;
use crate::use_cases::build_context::BuildContextUseCase;
use crate::use_cases::classify_intent::ClassifyIntentUseCase;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use taskcrew_domain::{
    AgentKind, AgentReply, ConversationState, SessionId, Task, detect_reference,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const CLARIFICATION: &str =
    "I'm not sure what you'd like me to do. Could you be more specific?";
const GENERIC_ERROR: &str = "Something went wrong while handling that. Please try again.";

/// The normalized shape every caller of the orchestrator receives.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_used: Option<String>,
}

#[derive(Error, Debug)]
pub enum OrchestrateError {
    #[error("no agent registered for kind {0}")]
    UnknownAgent(AgentKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Orchestrator {
    agents: Vec<Arc<dyn SpecializedAgent>>,
    classifier: ClassifyIntentUseCase,
    context_builder: Arc<BuildContextUseCase>,
    logger: Arc<dyn ConversationLogger>,
    sessions: Mutex<HashMap<SessionId, ConversationState>>,
    fallback_threshold: f64,
    floor_threshold: f64,
}

impl Orchestrator {
    pub fn new(
        agents: Vec<Arc<dyn SpecializedAgent>>,
        classifier: ClassifyIntentUseCase,
        context_builder: Arc<BuildContextUseCase>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            agents,
            classifier,
            context_builder,
            logger,
            sessions: Mutex::new(HashMap::new()),
            fallback_threshold: 0.7,
            floor_threshold: 0.4,
        }
    }

    pub fn with_thresholds(mut self, fallback: f64, floor: f64) -> Self {
        self.fallback_threshold = fallback;
        self.floor_threshold = floor;
        self
    }

    /// Handle one user message in one session. Never fails.
    pub async fn process(&self, session_id: &SessionId, input: &str) -> OrchestratorResponse {
        match self.run(session_id, input).await {
            Ok(response) => response,
            Err(e) => {
                error!(session = %session_id, error = %e, "orchestration failed");
                OrchestratorResponse {
                    action: None,
                    message: GENERIC_ERROR.to_string(),
                    data: None,
                    agent_used: Some("orchestrator".to_string()),
                }
            }
        }
    }

    async fn run(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<OrchestratorResponse, OrchestrateError> {
        let state = {
            let mut sessions = self.sessions.lock().await;
            sessions.entry(session_id.clone()).or_default().clone()
        };

        // Back-references bypass classification entirely.
        if let Some(kind) = Self::resolve_reference(input, &state) {
            info!(session = %session_id, agent = %kind, "back-reference dispatch");
            let reply = self.dispatch(kind, input, &state).await?;
            return Ok(self.finish(session_id, input, kind, reply).await);
        }

        let det = self.classifier.execute(input).await;
        self.logger.log(ConversationEvent::new(
            "classification",
            json!({
                "session": session_id,
                "input": input,
                "agent": det.kind.as_str(),
                "confidence": det.confidence,
                "reasoning": det.reasoning,
            }),
        ));

        if det.confidence < self.fallback_threshold {
            debug!(
                confidence = det.confidence,
                "weak classification, running collaborative fallback"
            );
            match self.collaborative(input, &state).await {
                Some((kind, reply)) if reply.confidence >= self.floor_threshold => {
                    info!(session = %session_id, agent = %kind, confidence = reply.confidence,
                        "collaborative fallback winner");
                    return Ok(self.finish(session_id, input, kind, reply).await);
                }
                _ => {
                    // Nobody was confident enough; ask instead of guessing.
                    self.record_turn(session_id, input, det.kind, None, CLARIFICATION)
                        .await;
                    return Ok(OrchestratorResponse {
                        action: None,
                        message: CLARIFICATION.to_string(),
                        data: None,
                        agent_used: None,
                    });
                }
            }
        }

        let reply = self.dispatch(det.kind, input, &state).await?;
        Ok(self.finish(session_id, input, det.kind, reply).await)
    }

    /// A detected back-reference resolves to an agent only when the session
    /// carries the state it needs: a known last task for date/confirmation
    /// families, a non-error turn for the explanation family.
    fn resolve_reference(input: &str, state: &ConversationState) -> Option<AgentKind> {
        let reference = detect_reference(input)?;
        match reference.target_agent() {
            Some(kind) => state.last_task().is_some().then_some(kind),
            None => state.last_successful_kind(),
        }
    }

    fn agent_for(&self, kind: AgentKind) -> Option<&Arc<dyn SpecializedAgent>> {
        self.agents.iter().find(|a| a.kind() == kind)
    }

    async fn dispatch(
        &self,
        kind: AgentKind,
        input: &str,
        state: &ConversationState,
    ) -> Result<AgentReply, OrchestrateError> {
        let agent = self
            .agent_for(kind)
            .ok_or(OrchestrateError::UnknownAgent(kind))?;
        let context = self.context_builder.execute(kind, state).await?;
        Ok(agent.process(input, &context).await)
    }

    /// Broadcast the request to every agent concurrently and keep the most
    /// confident reply. A failed agent contributes nothing; it never aborts
    /// the batch.
    async fn collaborative(
        &self,
        input: &str,
        state: &ConversationState,
    ) -> Option<(AgentKind, AgentReply)> {
        let mut set = JoinSet::new();
        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let builder = Arc::clone(&self.context_builder);
            let state = state.clone();
            let input = input.to_string();
            set.spawn(async move {
                let context = builder.execute(agent.kind(), &state).await.ok()?;
                let reply = agent.process(&input, &context).await;
                Some((agent.kind(), reply))
            });
        }

        let mut best: Option<(AgentKind, AgentReply)> = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Some((kind, reply))) => {
                    if best
                        .as_ref()
                        .is_none_or(|(_, current)| reply.confidence > current.confidence)
                    {
                        best = Some((kind, reply));
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "fallback agent task panicked"),
            }
        }
        best
    }

    /// Append the turn, refresh the last-task pointer and shape the response.
    async fn finish(
        &self,
        session_id: &SessionId,
        input: &str,
        kind: AgentKind,
        reply: AgentReply,
    ) -> OrchestratorResponse {
        {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.entry(session_id.clone()).or_default();
            session.record_turn(input, kind, reply.action.clone(), reply.response.clone());
            if let Some(task) = Self::referenced_task(&reply) {
                session.set_last_task(task);
            }
        }

        self.logger.log(ConversationEvent::new(
            "turn",
            json!({
                "session": session_id,
                "input": input,
                "agent": kind.as_str(),
                "action": reply.action,
                "response": reply.response,
                "confidence": reply.confidence,
            }),
        ));

        OrchestratorResponse {
            action: reply.action,
            message: reply.response,
            data: reply.data,
            agent_used: Some(kind.as_str().to_string()),
        }
    }

    async fn record_turn(
        &self,
        session_id: &SessionId,
        input: &str,
        kind: AgentKind,
        action: Option<String>,
        response: &str,
    ) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(session_id.clone()).or_default();
        session.record_turn(input, kind, action, response);
    }

    /// The task a mutating reply leaves behind as "it" for the next turn.
    fn referenced_task(reply: &AgentReply) -> Option<Task> {
        let action = reply.action.as_deref()?;
        if !matches!(
            action,
            "create_task" | "update_task" | "set_deadline" | "schedule_tasks"
        ) {
            return None;
        }

        let data = reply.data.as_ref()?;
        let value = data.get("task").cloned().or_else(|| {
            data.get("scheduled")
                .and_then(|v| v.as_array())
                .and_then(|a| a.first())
                .cloned()
        })?;
        serde_json::from_value(value).ok()
    }

    /// Pre-seed a session, used by tests and by surfaces that restore state.
    pub async fn seed_session(&self, session_id: &SessionId, state: ConversationState) {
        self.sessions.lock().await.insert(session_id.clone(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{
        AnalyticsAgent, CategoryAgent, FocusedAgent, MessagingAgent, PlannerAgent, TaskAgent,
    };
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmReply};
    use crate::ports::messenger::{DeliveryResult, MessengerPort};
    use crate::ports::task_store::TaskStorePort;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;
    use taskcrew_domain::{
        Category, CategoryId, Contact, StoredMessage, TaskDraft, TaskId, TaskPatch, TaskStats,
        TaskStatus, ToolCall,
    };

    struct MemStore {
        tasks: StdMutex<Vec<Task>>,
        next_id: AtomicI64,
    }

    impl MemStore {
        fn empty() -> Self {
            Self {
                tasks: StdMutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }
        }
    }

    #[async_trait]
    impl TaskStorePort for MemStore {
        async fn tasks(&self) -> Result<Vec<Task>, StoreError> {
            Ok(self.tasks.lock().unwrap().clone())
        }
        async fn task(&self, id: TaskId) -> Result<Task, StoreError> {
            self.tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| StoreError::task_not_found(id))
        }
        async fn tasks_by_status(&self, status: &TaskStatus) -> Result<Vec<Task>, StoreError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| &t.status == status)
                .cloned()
                .collect())
        }
        async fn tasks_by_category(&self, id: CategoryId) -> Result<Vec<Task>, StoreError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.category_id == Some(id))
                .cloned()
                .collect())
        }
        async fn create_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
            let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
            let task = Task::from_draft(id, draft);
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }
        async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StoreError::task_not_found(id))?;
            if let Some(deadline) = patch.deadline {
                task.deadline = Some(deadline);
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(title) = patch.title {
                task.title = title;
            }
            Ok(task.clone())
        }
        async fn delete_task(&self, id: TaskId) -> Result<Task, StoreError> {
            let mut tasks = self.tasks.lock().unwrap();
            let pos = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::task_not_found(id))?;
            Ok(tasks.remove(pos))
        }
        async fn task_stats(&self) -> Result<TaskStats, StoreError> {
            Ok(TaskStats::from_tasks(self.tasks.lock().unwrap().iter()))
        }
        async fn categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(vec![Category {
                id: CategoryId(1),
                name: "General".to_string(),
                color: "gray".to_string(),
            }])
        }
        async fn create_category(
            &self,
            name: String,
            color: String,
        ) -> Result<Category, StoreError> {
            Ok(Category {
                id: CategoryId(99),
                name,
                color,
            })
        }
        async fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
            Ok(Vec::new())
        }
        async fn messages_with(&self, _contact_id: i64) -> Result<Vec<StoredMessage>, StoreError> {
            Ok(Vec::new())
        }
        async fn record_message(&self, _message: StoredMessage) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Gateway with a fixed script: `classification` answers `complete`,
    /// `tool`/`text` answer `complete_with_tools`. Counts classification
    /// calls and captures agent prompts.
    struct ScriptedGateway {
        classification: Option<String>,
        tool: Option<ToolCall>,
        text: Option<String>,
        classification_calls: AtomicUsize,
        agent_prompts: StdMutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn silent() -> Self {
            Self {
                classification: None,
                tool: None,
                text: None,
                classification_calls: AtomicUsize::new(0),
                agent_prompts: StdMutex::new(Vec::new()),
            }
        }

        fn with_tool(tool: ToolCall) -> Self {
            Self {
                tool: Some(tool),
                ..Self::silent()
            }
        }

        fn with_text(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                ..Self::silent()
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, GatewayError> {
            self.classification_calls.fetch_add(1, Ordering::SeqCst);
            self.classification
                .clone()
                .ok_or_else(|| GatewayError::ConnectionError("offline".to_string()))
        }

        async fn complete_with_tools(
            &self,
            _system: &str,
            user: &str,
            _tools: &[Value],
        ) -> Result<LlmReply, GatewayError> {
            self.agent_prompts.lock().unwrap().push(user.to_string());
            if let Some(tool) = &self.tool {
                return Ok(LlmReply::ToolCall(tool.clone()));
            }
            if let Some(text) = &self.text {
                return Ok(LlmReply::Text(text.clone()));
            }
            Err(GatewayError::ConnectionError("offline".to_string()))
        }
    }

    struct OkMessenger;

    #[async_trait]
    impl MessengerPort for OkMessenger {
        async fn send_message(&self, _to: &str, _body: &str) -> DeliveryResult {
            DeliveryResult::delivered()
        }
    }

    fn orchestrator(store: Arc<MemStore>, gateway: Arc<ScriptedGateway>) -> Orchestrator {
        let t = Duration::from_secs(5);
        let g: Arc<dyn LlmGateway> = gateway;
        let s: Arc<dyn TaskStorePort> = store;
        let agents: Vec<Arc<dyn SpecializedAgent>> = vec![
            Arc::new(TaskAgent::new(s.clone(), g.clone(), t, CategoryId(1))),
            Arc::new(PlannerAgent::new(s.clone(), g.clone(), t)),
            Arc::new(CategoryAgent::new(s.clone(), g.clone(), t)),
            Arc::new(AnalyticsAgent::new(s.clone(), g.clone(), t)),
            Arc::new(FocusedAgent::marketing(s.clone(), g.clone(), t)),
            Arc::new(FocusedAgent::project(s.clone(), g.clone(), t)),
            Arc::new(MessagingAgent::new(
                s.clone(),
                Arc::new(OkMessenger),
                g.clone(),
                t,
            )),
        ];
        Orchestrator::new(
            agents,
            ClassifyIntentUseCase::new(g, 0.8, t),
            Arc::new(BuildContextUseCase::new(s)),
            Arc::new(NoConversationLogger),
        )
    }

    fn session() -> SessionId {
        SessionId::new("test-session")
    }

    #[tokio::test]
    async fn test_strong_keywords_never_touch_the_classification_gateway() {
        let store = Arc::new(MemStore::empty());
        let gateway = Arc::new(ScriptedGateway::with_text(
            r#"{"action": "respond", "response": "Here is your week.", "confidence": 0.8}"#,
        ));
        let orch = orchestrator(store, gateway.clone());

        let response = orch
            .process(&session(), "plan my week and schedule the deadline")
            .await;

        assert_eq!(response.agent_used.as_deref(), Some("planner"));
        assert_eq!(gateway.classification_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_everything_failing_yields_clarification_without_action_or_data() {
        let store = Arc::new(MemStore::empty());
        let gateway = Arc::new(ScriptedGateway::silent());
        let orch = orchestrator(store, gateway);

        // No keywords, no model: every agent bottoms out below the floor.
        let response = orch.process(&session(), "hmm, you know").await;

        assert!(response.action.is_none());
        assert!(response.data.is_none());
        assert!(response.message.contains("more specific"));
    }

    #[tokio::test]
    async fn test_vague_input_with_confident_agent_wins_the_fallback() {
        let store = Arc::new(MemStore::empty());
        let gateway = Arc::new(ScriptedGateway::with_tool(
            ToolCall::new("create_task")
                .with_arg("title", "Do the accounting")
                .with_arg("deadline", "2026-03-27"),
        ));
        let orch = orchestrator(store.clone(), gateway);

        // Classification cannot decide; the task agent's tool execution
        // scores highest in the collaborative round.
        let response = orch
            .process(&session(), "I need to do the accounting, due March 27")
            .await;

        assert_eq!(response.action.as_deref(), Some("create_task"));
        assert_eq!(response.agent_used.as_deref(), Some("task"));

        let tasks = store.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Do the accounting");
        assert_eq!(tasks[0].deadline.unwrap().to_string(), "2026-03-27");
    }

    #[tokio::test]
    async fn test_deadline_reference_reuses_planner_with_last_task_injected() {
        let store = Arc::new(MemStore::empty());
        let seeded = store
            .create_task(TaskDraft::new("Quarterly filing"))
            .await
            .unwrap();

        let gateway = Arc::new(ScriptedGateway::with_text(
            r#"{"action": "respond", "response": "It is due next week.", "confidence": 0.8}"#,
        ));
        let orch = orchestrator(store, gateway.clone());

        let mut state = ConversationState::new();
        state.record_turn(
            "set a deadline for the filing",
            AgentKind::Planner,
            Some("set_deadline".to_string()),
            "done",
        );
        state.set_last_task(seeded);
        orch.seed_session(&session(), state).await;

        let response = orch
            .process(&session(), "what date did you set for it?")
            .await;

        assert_eq!(response.agent_used.as_deref(), Some("planner"));
        // Classification was bypassed entirely.
        assert_eq!(gateway.classification_calls.load(Ordering::SeqCst), 0);
        // The planner saw the referenced task in its context.
        let prompts = gateway.agent_prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Quarterly filing"));
    }

    #[tokio::test]
    async fn test_mutating_reply_updates_the_last_task_pointer() {
        let store = Arc::new(MemStore::empty());
        let gateway = Arc::new(ScriptedGateway::with_tool(
            ToolCall::new("create_task").with_arg("title", "Write the launch post"),
        ));
        let orch = orchestrator(store, gateway);

        // "create" and "task" give the keyword classifier a direct hit.
        let response = orch
            .process(&session(), "create a task to write the launch post")
            .await;
        assert_eq!(response.action.as_deref(), Some("create_task"));

        let sessions = orch.sessions.lock().await;
        let state = sessions.get(&session()).unwrap();
        assert_eq!(
            state.last_task().unwrap().title,
            "Write the launch post"
        );
        assert_eq!(state.all_turns().len(), 1);
    }

    #[tokio::test]
    async fn test_scheduling_reply_points_last_task_at_the_first_slot() {
        let store = Arc::new(MemStore::empty());
        store.create_task(TaskDraft::new("Draft the brief")).await.unwrap();
        store.create_task(TaskDraft::new("Review the brief")).await.unwrap();

        let gateway = Arc::new(ScriptedGateway::with_tool(
            ToolCall::new("schedule_tasks")
                .with_arg("task_ids", serde_json::json!([1, 2]))
                .with_arg("start_date", "2026-09-01")
                .with_arg("end_date", "2026-09-11"),
        ));
        let orch = orchestrator(store, gateway);

        let response = orch
            .process(&session(), "plan my week and schedule the deadline")
            .await;
        assert_eq!(response.action.as_deref(), Some("schedule_tasks"));

        // "it" now means the first scheduled task, deadline applied.
        let sessions = orch.sessions.lock().await;
        let last = sessions.get(&session()).unwrap().last_task().unwrap();
        assert_eq!(last.id, TaskId(1));
        assert_eq!(last.deadline.unwrap().to_string(), "2026-09-01");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = Arc::new(MemStore::empty());
        let gateway = Arc::new(ScriptedGateway::with_tool(
            ToolCall::new("create_task").with_arg("title", "Only in session A"),
        ));
        let orch = orchestrator(store, gateway);

        let a = SessionId::new("a");
        let b = SessionId::new("b");
        orch.process(&a, "create a task called only in session a")
            .await;

        let sessions = orch.sessions.lock().await;
        assert!(sessions.get(&a).unwrap().last_task().is_some());
        assert!(sessions.get(&b).is_none());
    }
}
