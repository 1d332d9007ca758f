use crate::models::{ChatMessage, Profile};

/// Conversational session state: the collected profile, the ordered
/// transcript exchanged with the completion service, and the phase flag
/// gating follow-up chat.
///
/// The transcript is append-only and replayed in full on every follow-up
/// turn. It grows without bound over the life of a session; no truncation
/// or summarization is applied, so a long enough session will eventually
/// exceed the completion service's input limit.
///
/// Fields are private: all mutation goes through [`Session::install_plan`]
/// and [`Session::record_turn`], which preserve insertion order and never
/// touch past messages.
#[derive(Debug, Default)]
pub struct Session {
    profile: Option<Profile>,
    transcript: Vec<ChatMessage>,
    plan_ready: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a plan has been generated and follow-up chat is open.
    pub fn plan_ready(&self) -> bool {
        self.plan_ready
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Replace the session with a freshly generated plan. The transcript is
    /// unconditionally reset, discarding any follow-up history from a
    /// previous plan. That lossy reset mirrors the documented behavior of
    /// plan regeneration.
    pub fn install_plan(&mut self, profile: Profile, advice: String) {
        self.profile = Some(profile);
        self.transcript.clear();
        self.transcript.push(ChatMessage::assistant(advice));
        self.plan_ready = true;
    }

    /// Commit one completed follow-up turn: the user question and the
    /// assistant reply, in that order. Called only after the completion
    /// service answered, so a failed turn leaves no dangling user message.
    pub fn record_turn(&mut self, question: String, reply: String) {
        self.transcript.push(ChatMessage::user(question));
        self.transcript.push(ChatMessage::assistant(reply));
    }
}
