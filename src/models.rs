use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Workspace Collections (Mapped to REST payloads) ---

/// Classroom
///
/// A classroom owned by the signed-in teacher, as returned by the portal API.
/// This is one of the two member collections of the teacher workspace cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Classroom {
    pub id: Uuid,
    pub name: String,
    // Subject taught in this classroom, e.g. "Mathematics".
    pub subject: String,
    pub student_count: i32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Course
///
/// A course the signed-in teacher coordinates (as opposed to merely teaching).
/// The workspace derives its "is coordinator" flag from this collection being
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Course {
    pub id: Uuid,
    // Short catalog code, e.g. "MATH-7".
    pub code: String,
    pub title: String,
}

// --- Shell-Internal Records ---

/// NoticeLevel
///
/// Severity of a transient user-visible notice. The presentation layer decides
/// how each level is rendered; the shell only classifies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Notice
///
/// A transient, non-blocking message for the user, emitted by the shell (for
/// example when a session refresh forces the workspace to reload). Notices are
/// pushed over a channel and drained by the toast layer, which is outside this
/// crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            at: Utc::now(),
        }
    }
}
