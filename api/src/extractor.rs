use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kernel::model::{id::UserId, role::Role};
use shared::error::AppError;

/// Actor identity forwarded by the upstream identity gateway.
///
/// Authentication itself is an external collaborator; the gateway
/// terminates it and forwards the verified identity in `x-user-id` and
/// `x-user-role` headers. The engine only enforces roles at its boundary.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedUser {
    user_id: UserId,
    role: Role,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<UserId>().ok())
            .ok_or_else(|| {
                AppError::Unauthenticated("missing or malformed x-user-id header".into())
            })?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Role>().ok())
            .unwrap_or_default();

        Ok(Self { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<AuthorizedUser, AppError> {
        let (mut parts, _) = req.into_parts();
        AuthorizedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_identity_header_is_rejected() {
        let req = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(req).await,
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn role_defaults_to_user_when_absent() {
        let req = Request::builder()
            .header("x-user-id", UserId::new().to_string())
            .body(())
            .unwrap();
        let user = extract(req).await.unwrap();
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn admin_role_is_recognized() {
        let req = Request::builder()
            .header("x-user-id", UserId::new().to_string())
            .header("x-user-role", "admin")
            .body(())
            .unwrap();
        let user = extract(req).await.unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn malformed_user_id_is_rejected() {
        let req = Request::builder()
            .header("x-user-id", "not-a-uuid")
            .body(())
            .unwrap();
        assert!(extract(req).await.is_err());
    }
}
