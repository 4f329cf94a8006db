//! Mutable per-run session state.
//!
//! One instance lives inside the provider for the process lifetime. The state
//! machine has two states: Inactive and Active. `begin` requires a non-empty
//! tracking id (enforced by the caller, which also resolves the client id);
//! `finish` is idempotent. User id and location survive a session end, the
//! anonymize-ip flag does not.

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    tracking_id: String,
    client_id: String,
    user_id: String,
    location: String,
    anonymize_ip: bool,
    dispatch_interval: Option<u32>,
    session_started: bool,
    first_hit_sent: bool,
}

impl SessionState {
    pub fn new(tracking_id: impl Into<String>, dispatch_interval: Option<u32>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            dispatch_interval,
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_started
    }

    /// Activates the session with the resolved per-installation client id and
    /// arms the session-start marker.
    pub fn begin(&mut self, client_id: String) {
        self.client_id = client_id;
        self.session_started = true;
        self.first_hit_sent = false;
    }

    /// Deactivates the session. Idempotent when already inactive.
    pub fn finish(&mut self) {
        if self.session_started {
            self.session_started = false;
            self.first_hit_sent = false;
            self.anonymize_ip = false;
        }
    }

    /// Returns `true` exactly once per session: on the first hit built after
    /// `begin`. The caller attaches `sc=start` to that hit.
    pub fn take_session_start_marker(&mut self) -> bool {
        if self.first_hit_sent {
            return false;
        }
        self.first_hit_sent = true;
        true
    }

    pub fn tracking_id(&self) -> &str {
        &self.tracking_id
    }

    pub fn set_tracking_id(&mut self, tracking_id: impl Into<String>) {
        self.tracking_id = tracking_id.into();
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn anonymize_ip(&self) -> bool {
        self.anonymize_ip
    }

    pub fn set_anonymize_ip(&mut self, anonymize: bool) {
        self.anonymize_ip = anonymize;
    }

    pub fn dispatch_interval(&self) -> Option<u32> {
        self.dispatch_interval
    }
}
