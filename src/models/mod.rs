//! Data models for gitapro

mod lesson;
mod verse;

pub use lesson::Lesson;
pub use verse::Verse;
