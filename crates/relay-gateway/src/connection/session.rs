//! Session bookkeeping across connections
//!
//! What survives a dropped socket so the next connection can resume.

/// Resume information for one gateway session
#[derive(Debug, Default, Clone)]
pub struct Session {
    /// From READY; `None` until identified
    session_id: Option<String>,

    /// From READY; where to reconnect when resuming
    resume_url: Option<String>,

    /// Last dispatch sequence
    sequence: Option<u64>,

    /// Whether ready was already emitted for this session
    ready_emitted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh session from READY
    pub fn start(&mut self, session_id: String, resume_url: Option<String>) {
        self.session_id = Some(session_id);
        self.resume_url = resume_url;
        self.ready_emitted = false;
    }

    /// Forget the session; the next connection identifies again
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Session id and sequence, when there is something to resume
    pub fn resumable(&self) -> Option<(&str, u64)> {
        let session_id = self.session_id.as_deref()?;
        Some((session_id, self.sequence.unwrap_or(0)))
    }

    /// URL to connect to: the resume URL while a session exists
    pub fn connect_url(&self, default_url: &str) -> String {
        match (&self.session_id, &self.resume_url) {
            (Some(_), Some(resume_url)) => with_query(resume_url, default_url),
            _ => default_url.to_string(),
        }
    }

    /// Last sequence seen, `None` before the first dispatch
    pub fn last_sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Store the sequence of a dispatch
    pub fn set_sequence(&mut self, seq: u64) {
        self.sequence = Some(self.sequence.map_or(seq, |last| last.max(seq)));
    }

    /// Mark ready as emitted; returns false if it already was
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready_emitted, true)
    }

    pub fn ready_emitted(&self) -> bool {
        self.ready_emitted
    }
}

/// Carry the version/encoding query of the configured URL onto the resume URL
fn with_query(resume_url: &str, default_url: &str) -> String {
    match default_url.split_once('?') {
        Some((_, query)) if !resume_url.contains('?') => {
            format!("{}/?{query}", resume_url.trim_end_matches('/'))
        }
        _ => resume_url.to_string(),
    }
}
