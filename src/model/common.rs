use uuid::Uuid;

pub type Id = String;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as an RFC 3339 string. Timestamps are taken at
/// mutation time, never while replaying history.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
