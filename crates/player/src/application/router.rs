//! Task Router - maps a task tag to the screen that renders and resolves it.
//!
//! `resolve_screen` is a total function over `TaskType`: adding a task type
//! without a screen fails to compile. Raw tags coming off the wire go through
//! `route_tag`, which reports an unknown tag instead of rendering nothing.

use thiserror::Error;
use trailhunt_domain::{Resolution, Task, TaskType};

/// Screen responsible for a task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskScreen {
    MultipleChoice,
    SingleChoice,
    MarkerHunt,
    MessageCard,
    CharacterIntro,
    LiveMap,
    InformationCard,
    InstructionCard,
    ChatRoom,
    TrailFinish,
}

impl TaskScreen {
    pub fn name(&self) -> &'static str {
        match self {
            TaskScreen::MultipleChoice => "multiple-choice",
            TaskScreen::SingleChoice => "single-choice",
            TaskScreen::MarkerHunt => "marker-hunt",
            TaskScreen::MessageCard => "message",
            TaskScreen::CharacterIntro => "character",
            TaskScreen::LiveMap => "map",
            TaskScreen::InformationCard => "information",
            TaskScreen::InstructionCard => "instruction",
            TaskScreen::ChatRoom => "chat",
            TaskScreen::TrailFinish => "finish",
        }
    }

    /// Whether this screen needs the proximity engine running.
    pub fn uses_proximity(&self) -> bool {
        matches!(self, TaskScreen::MarkerHunt | TaskScreen::LiveMap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No screen registered for task type {tag:?}")]
    Unroutable { tag: String },
}

/// Screen for a declared task type.
pub fn resolve_screen(task_type: TaskType) -> TaskScreen {
    match task_type {
        TaskType::QuestionMulti => TaskScreen::MultipleChoice,
        TaskType::QuestionSingle => TaskScreen::SingleChoice,
        TaskType::Marker => TaskScreen::MarkerHunt,
        TaskType::Message => TaskScreen::MessageCard,
        TaskType::Character => TaskScreen::CharacterIntro,
        TaskType::Map => TaskScreen::LiveMap,
        TaskType::Information => TaskScreen::InformationCard,
        TaskType::Instruction => TaskScreen::InstructionCard,
        TaskType::Chat => TaskScreen::ChatRoom,
        TaskType::Finish => TaskScreen::TrailFinish,
    }
}

/// Screen for a raw wire tag.
pub fn route_tag(tag: &str) -> Result<TaskScreen, RouteError> {
    tag.parse::<TaskType>()
        .map(resolve_screen)
        .map_err(|_| RouteError::Unroutable {
            tag: tag.to_string(),
        })
}

/// Screen and resolution rule for a decoded task.
pub fn route(task: &Task) -> (TaskScreen, Resolution) {
    let task_type = task.task_type();
    (resolve_screen(task_type), task_type.resolution())
}
