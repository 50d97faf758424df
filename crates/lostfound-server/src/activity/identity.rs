use super::context::RequestContext;
use super::error::ActivityError;

/// Answers who, if anyone, issued a request.
///
/// Both calls may fail; the logger treats a failure like any other
/// classification error and still forwards the request.
pub trait IdentityResolver: Send + Sync {
    fn is_authenticated(&self, request: &RequestContext) -> Result<bool, ActivityError>;

    fn current_user_id(&self, request: &RequestContext) -> Result<Option<i64>, ActivityError>;
}

/// Resolves identity from the session established by [`crate::auth::session_layer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionIdentity;

impl IdentityResolver for SessionIdentity {
    fn is_authenticated(&self, request: &RequestContext) -> Result<bool, ActivityError> {
        Ok(request.identity().is_some())
    }

    fn current_user_id(&self, request: &RequestContext) -> Result<Option<i64>, ActivityError> {
        Ok(request.identity().map(|user| user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use http::Method;

    #[test]
    fn test_session_identity() {
        let anonymous = RequestContext::new(Method::GET, "/items");
        assert!(!SessionIdentity.is_authenticated(&anonymous).unwrap());
        assert_eq!(SessionIdentity.current_user_id(&anonymous).unwrap(), None);

        let signed_in = anonymous.with_identity(AuthenticatedUser { id: 12 });
        assert!(SessionIdentity.is_authenticated(&signed_in).unwrap());
        assert_eq!(SessionIdentity.current_user_id(&signed_in).unwrap(), Some(12));
    }
}
