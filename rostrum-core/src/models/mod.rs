pub mod report;
pub mod session;

pub use report::{
    BasicStats, CompanyCount, FullAnalysis, RoomAnalysis, RoomUsage, ScheduleAnalysis,
    SpeakerAnalysis, SpeakerProfile, TalkRef, TopicAnalysis, WordCount,
};
pub use session::{Participant, SessionRecord, TimeSlot, DEFAULT_ROOM, DEFAULT_TALK_LENGTH, UNKNOWN};
