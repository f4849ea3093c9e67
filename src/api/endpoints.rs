//! Admin backend endpoint map.
//!
//! Single place that knows every REST path the console talks to, split
//! between the knowledge-admin API (`/api/...`) and the RAG orchestrator
//! API (`/rag-api/v1/...`). Parameterized paths are builder functions.

// ── Auth ────────────────────────────────────────────────────────────

pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";
pub const AUTH_ME: &str = "/api/auth/me";
pub const AUTH_PERMISSIONS: &str = "/api/auth/permissions";

// ── Knowledge admin API ─────────────────────────────────────────────

pub const KNOWLEDGE: &str = "/api/knowledge";

pub fn knowledge_by_id(id: i64) -> String {
    format!("{KNOWLEDGE}/{id}")
}

pub const VENDORS: &str = "/api/vendors";

pub fn vendor_by_id(id: i64) -> String {
    format!("{VENDORS}/{id}")
}

pub const TEST_SCENARIOS: &str = "/api/test-scenarios";

pub fn test_scenario_by_id(id: i64) -> String {
    format!("{TEST_SCENARIOS}/{id}")
}

pub const ROLES: &str = "/api/roles";

pub fn role_by_id(id: i64) -> String {
    format!("{ROLES}/{id}")
}

/// Full permission catalog, grouped by resource on the backend side.
pub const PERMISSIONS_ALL: &str = "/api/roles/permissions/all";

pub const ADMINS: &str = "/api/admins";

pub fn admin_by_id(id: i64) -> String {
    format!("{ADMINS}/{id}")
}

// ── RAG orchestrator API ────────────────────────────────────────────

pub const CHAT: &str = "/rag-api/v1/chat";
pub const CHAT_STREAM: &str = "/rag-api/v1/chat/stream";

pub const INTENTS: &str = "/rag-api/v1/intents";

pub fn intent_by_id(id: i64) -> String {
    format!("{INTENTS}/{id}")
}

pub fn vendor_chat(vendor_id: i64) -> String {
    format!("/rag-api/v1/vendors/{vendor_id}/chat")
}

pub fn vendor_sops(vendor_id: i64) -> String {
    format!("/rag-api/v1/vendors/{vendor_id}/sops")
}

pub const KNOWLEDGE_CANDIDATES_PENDING: &str = "/rag-api/v1/knowledge-candidates/pending";
pub const KNOWLEDGE_CANDIDATES_STATS: &str = "/rag-api/v1/knowledge-candidates/stats";

pub fn knowledge_candidate_by_id(id: i64) -> String {
    format!("/rag-api/v1/knowledge-candidates/{id}")
}

pub fn knowledge_candidate_review(id: i64) -> String {
    format!("/rag-api/v1/knowledge-candidates/{id}/review")
}

pub const UNCLEAR_QUESTIONS: &str = "/rag-api/v1/unclear-questions";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_paths_match_backend_router_prefix() {
        assert_eq!(AUTH_LOGIN, "/api/auth/login");
        assert_eq!(AUTH_ME, "/api/auth/me");
        assert_eq!(AUTH_PERMISSIONS, "/api/auth/permissions");
    }

    #[test]
    fn id_builders_interpolate() {
        assert_eq!(knowledge_by_id(42), "/api/knowledge/42");
        assert_eq!(role_by_id(3), "/api/roles/3");
        assert_eq!(vendor_sops(7), "/rag-api/v1/vendors/7/sops");
        assert_eq!(
            knowledge_candidate_review(9),
            "/rag-api/v1/knowledge-candidates/9/review"
        );
    }
}
