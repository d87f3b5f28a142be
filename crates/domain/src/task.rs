//! Task model.
//!
//! A `Task` is a tagged union keyed on its `type`. The tag alone determines how
//! a task is routed and what resolves it; callers outside a task's own screen
//! only ever look at [`Task::task_type`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, Marker, Position};

/// Every declared task tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    QuestionMulti,
    QuestionSingle,
    Marker,
    Message,
    Character,
    Map,
    Information,
    Instruction,
    Chat,
    Finish,
}

impl TaskType {
    pub const ALL: [TaskType; 10] = [
        TaskType::QuestionMulti,
        TaskType::QuestionSingle,
        TaskType::Marker,
        TaskType::Message,
        TaskType::Character,
        TaskType::Map,
        TaskType::Information,
        TaskType::Instruction,
        TaskType::Chat,
        TaskType::Finish,
    ];

    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::QuestionMulti => "QuestionMulti",
            TaskType::QuestionSingle => "QuestionSingle",
            TaskType::Marker => "Marker",
            TaskType::Message => "Message",
            TaskType::Character => "Character",
            TaskType::Map => "Map",
            TaskType::Information => "Information",
            TaskType::Instruction => "Instruction",
            TaskType::Chat => "Chat",
            TaskType::Finish => "Finish",
        }
    }

    /// What the player must do for a task of this type to count as resolved.
    pub fn resolution(&self) -> Resolution {
        match self {
            TaskType::QuestionMulti | TaskType::QuestionSingle => Resolution::AnswerSubmission,
            TaskType::Marker | TaskType::Map => Resolution::ProximityFound,
            TaskType::Message
            | TaskType::Character
            | TaskType::Information
            | TaskType::Instruction => Resolution::Acknowledgement,
            TaskType::Chat => Resolution::ChatExchange,
            TaskType::Finish => Resolution::TrailEnd,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown task type: {}", s)))
    }
}

/// How a task screen hands control back to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Player submits an answer (question tasks)
    AnswerSubmission,
    /// Player dismisses an informational screen
    Acknowledgement,
    /// Player reaches the target on the live map
    ProximityFound,
    /// Player exchanges messages with a character
    ChatExchange,
    /// Nothing left to resolve
    TrailEnd,
}

/// Fields shared by every task variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCommon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionTask {
    #[serde(flatten)]
    pub common: TaskCommon,
    #[serde(rename = "answerChoices", default)]
    pub answer_choices: Vec<String>,
}

/// A single pin the player must walk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerTask {
    #[serde(flatten)]
    pub common: TaskCommon,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapTask {
    #[serde(flatten)]
    pub common: TaskCommon,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterTask {
    #[serde(flatten)]
    pub common: TaskCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTask {
    #[serde(flatten)]
    pub common: TaskCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<i64>,
}

/// One interactive unit presented to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Task {
    QuestionMulti(QuestionTask),
    QuestionSingle(QuestionTask),
    Marker(MarkerTask),
    Message(CharacterTask),
    Character(CharacterTask),
    Map(MapTask),
    Information(TaskCommon),
    Instruction(TaskCommon),
    Chat(ChatTask),
    Finish(TaskCommon),
}

impl Task {
    pub fn task_type(&self) -> TaskType {
        match self {
            Task::QuestionMulti(_) => TaskType::QuestionMulti,
            Task::QuestionSingle(_) => TaskType::QuestionSingle,
            Task::Marker(_) => TaskType::Marker,
            Task::Message(_) => TaskType::Message,
            Task::Character(_) => TaskType::Character,
            Task::Map(_) => TaskType::Map,
            Task::Information(_) => TaskType::Information,
            Task::Instruction(_) => TaskType::Instruction,
            Task::Chat(_) => TaskType::Chat,
            Task::Finish(_) => TaskType::Finish,
        }
    }

    pub fn common(&self) -> &TaskCommon {
        match self {
            Task::QuestionMulti(t) | Task::QuestionSingle(t) => &t.common,
            Task::Marker(t) => &t.common,
            Task::Message(t) | Task::Character(t) => &t.common,
            Task::Map(t) => &t.common,
            Task::Information(c) | Task::Instruction(c) | Task::Finish(c) => c,
            Task::Chat(t) => &t.common,
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.common().content.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.common().required.unwrap_or(false)
    }

    /// The location this task asks the player to reach, if any.
    pub fn proximity_target(&self) -> Option<Position> {
        match self {
            Task::Marker(t) => Some(Position {
                lat: t.lat,
                lng: t.lng,
            }),
            Task::Map(t) => t.target,
            _ => None,
        }
    }
}
