//! Simple test fixtures used across unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use trailhunt_domain::{
    InventoryItem, Marker, MarkerTask, Outcome, Sentiment, SessionContext, Task, TaskCommon,
};

use crate::ports::outbound::{ChatReply, GatewayError, NextStep, TrailGatewayPort};

/// The reference session used across orchestrator tests.
pub fn dragon_session() -> SessionContext {
    SessionContext::new("42", "DragonReturn_Brandon").expect("valid fixture session")
}

pub fn marker_task(lat: f64, lng: f64) -> Task {
    Task::Marker(MarkerTask {
        common: TaskCommon {
            content: Some("Find the old gate".to_string()),
            ..Default::default()
        },
        lat,
        lng,
        title: Some("Old Gate".to_string()),
    })
}

pub fn information_task(content: &str) -> Task {
    Task::Information(TaskCommon {
        content: Some(content.to_string()),
        ..Default::default()
    })
}

pub fn key_outcome() -> Outcome {
    Outcome::new(Sentiment::Positive, "Well done!", "You found a key")
        .with_item(InventoryItem::named("Key"))
}

pub fn next_step(task: Option<Task>, outcome: Option<Outcome>) -> NextStep {
    NextStep { task, outcome }
}

/// Gateway double that replays queued `fetch_next` results.
///
/// With a gate attached, every call parks until the gate is notified, which
/// lets tests interleave other orchestrator calls with an in-flight request.
#[derive(Default)]
pub struct ScriptedGateway {
    steps: Mutex<VecDeque<Result<NextStep, GatewayError>>>,
    markers: Vec<Marker>,
    chat_items: Vec<InventoryItem>,
    chat_energy: Option<i64>,
    gate: Option<Arc<Notify>>,
    fetch_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(steps: Vec<Result<NextStep, GatewayError>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            ..Default::default()
        }
    }

    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    /// Items and energy attached to every chat reply.
    pub fn with_chat_reward(mut self, items: Vec<InventoryItem>, energy: Option<i64>) -> Self {
        self.chat_items = items;
        self.chat_energy = energy;
        self
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TrailGatewayPort for ScriptedGateway {
    async fn fetch_next(
        &self,
        _session: &SessionContext,
        _debug: bool,
    ) -> Result<NextStep, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.steps
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(next_step(None, None)))
    }

    async fn fetch_markers(&self, _session: &SessionContext) -> Result<Vec<Marker>, GatewayError> {
        self.wait_for_gate().await;
        Ok(self.markers.clone())
    }

    async fn post_chat_message(
        &self,
        _session: &SessionContext,
        message: &str,
    ) -> Result<ChatReply, GatewayError> {
        self.wait_for_gate().await;
        Ok(ChatReply {
            message: format!("echo: {}", message),
            items: self.chat_items.clone(),
            energy: self.chat_energy,
        })
    }
}
