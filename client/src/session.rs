/// Identity of the local user, filled in by the join confirmation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    username: Option<String>,
    session_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the name sent in a join request, before the server confirms it
    pub fn request(&mut self, username: &str) {
        self.username = Some(username.to_string());
    }

    /// Store the identity confirmed by the server
    pub fn establish(&mut self, username: &str, session_id: &str) {
        self.username = Some(username.to_string());
        self.session_id = Some(session_id.to_string());
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Chat controls are only enabled once the server assigned a session
    pub fn is_joined(&self) -> bool {
        self.session_id.is_some()
    }

    /// Whether a message with this sender session was sent by us
    pub fn is_own(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }
}
