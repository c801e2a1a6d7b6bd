//! Navigation gating for protected views.

use tracing::warn;

use crate::session::SessionManager;

/// Views that only require a logged-in session, not an allow-list entry.
const AUTH_ONLY_VIEWS: &[&str] = &["/create-route"];

/// Outcome of gating a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Not logged in: go to the entry point, keeping the requested view
    /// for the post-login redirect.
    RedirectToLogin { return_url: String },
    /// Logged in but the role's allow-list denies this view.
    RedirectHome,
}

/// Decide whether the current session may navigate to `target`.
pub fn evaluate(session: &SessionManager, target: &str) -> GateDecision {
    if !session.is_logged_in() {
        return GateDecision::RedirectToLogin {
            return_url: target.to_string(),
        };
    }

    if AUTH_ONLY_VIEWS.contains(&target) {
        return GateDecision::Allow;
    }

    if !session.has_access_to_view(target) {
        warn!(view = target, "Access denied");
        return GateDecision::RedirectHome;
    }

    GateDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, RoleDetail, User};
    use crate::providers::backend::AuthPayload;
    use crate::storage::CredentialStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn make_token() -> String {
        let exp = crate::session::token::now_ms() / 1000 + 3600;
        format!(
            "header.{}.signature",
            URL_SAFE_NO_PAD.encode(format!("{{\"exp\": {exp}}}"))
        )
    }

    async fn session_with_role(role: Option<Role>) -> SessionManager {
        let session = SessionManager::new(CredentialStore::in_memory().await.unwrap());
        session
            .establish(AuthPayload {
                token: make_token(),
                user: User {
                    mongo_id: None,
                    name: None,
                    email: "pat@example.com".to_string(),
                    role,
                },
            })
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn anonymous_visitors_are_sent_to_login_with_a_return_url() {
        let session = SessionManager::new(CredentialStore::in_memory().await.unwrap());
        assert_eq!(
            evaluate(&session, "/admin-proposals"),
            GateDecision::RedirectToLogin {
                return_url: "/admin-proposals".to_string()
            }
        );
    }

    #[tokio::test]
    async fn auth_only_views_skip_the_allow_list() {
        let session = session_with_role(Some(Role::Detailed(RoleDetail {
            name: None,
            routes: Some(vec!["/home".to_string()]),
        })))
        .await;

        // "/create-route" is not on the allow-list, but only needs a login.
        assert_eq!(evaluate(&session, "/create-route"), GateDecision::Allow);
    }

    #[tokio::test]
    async fn denied_views_redirect_home() {
        let session = session_with_role(Some(Role::Detailed(RoleDetail {
            name: None,
            routes: Some(vec!["/home".to_string()]),
        })))
        .await;

        assert_eq!(evaluate(&session, "/admin-proposals"), GateDecision::RedirectHome);
        assert_eq!(evaluate(&session, "/home"), GateDecision::Allow);
    }

    #[tokio::test]
    async fn users_without_an_allow_list_pass_the_gate() {
        let session = session_with_role(None).await;
        assert_eq!(evaluate(&session, "/admin-proposals"), GateDecision::Allow);
    }
}
