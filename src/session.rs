use crate::api::CurrentUser;

/// Who is acting and how to reach the server.
///
/// One session is built when the app starts (or a user signs in) and handed
/// to every controller explicitly. Signing out replaces it with an anonymous
/// session; controllers built from the old one keep their copy until their
/// view is torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<A> {
    pub api: A,
    pub current_user: Option<CurrentUser>,
}

impl<A> Session<A> {
    pub fn new(api: A, current_user: Option<CurrentUser>) -> Self {
        Self {
            api,
            current_user: current_user.filter(|user| !user.name.is_empty()),
        }
    }

    pub fn anonymous(api: A) -> Self {
        Self::new(api, None)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.current_user.as_ref().map(|user| user.name.as_str())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.current_user
            .as_ref()
            .filter(|user| user.has_token())
            .map(|user| user.auth_token.as_str())
    }

    /// True only for a signed-in user whose name equals `name`.
    pub fn is_current_user(&self, name: Option<&str>) -> bool {
        match (self.user_name(), name) {
            (Some(current), Some(name)) => !name.is_empty() && current == name,
            _ => false,
        }
    }

    pub fn sign_out(self) -> Self {
        tracing::info!(user = ?self.user_name(), "session ended");
        Self::anonymous(self.api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_requires_signed_in_matching_user() {
        let session = Session::new((), Some(CurrentUser::new("rob", "token")));
        assert!(session.is_current_user(Some("rob")));
        assert!(!session.is_current_user(Some("ana")));
        assert!(!session.is_current_user(None));

        let anonymous = session.sign_out();
        assert!(!anonymous.is_current_user(Some("rob")));
        assert_eq!(anonymous.auth_token(), None);
    }

    #[test]
    fn blank_token_is_no_token() {
        let session = Session::new((), Some(CurrentUser::new("rob", "  ")));
        assert_eq!(session.user_name(), Some("rob"));
        assert_eq!(session.auth_token(), None);
    }
}
