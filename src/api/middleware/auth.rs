use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::errors::AppError;
use crate::revocation::{CompositeRevocations, RevocationStore};
use crate::security::{Claims, JwtManager, Role};

/// JWT 认证中间件
///
/// 校验 Bearer Token、吊销表和角色，通过后把 `Claims` 放入请求扩展。
pub struct JwtAuth {
    jwt_manager: Arc<JwtManager>,
    revocations: Arc<CompositeRevocations>,
    allowed_roles: Option<Rc<[Role]>>,
}

impl JwtAuth {
    pub fn new(jwt_manager: Arc<JwtManager>, revocations: Arc<CompositeRevocations>) -> Self {
        Self {
            jwt_manager,
            revocations,
            allowed_roles: None,
        }
    }

    /// 只允许给定角色访问
    pub fn allow(mut self, roles: &[Role]) -> Self {
        self.allowed_roles = Some(Rc::from(roles));
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            jwt_manager: self.jwt_manager.clone(),
            revocations: self.revocations.clone(),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    jwt_manager: Arc<JwtManager>,
    revocations: Arc<CompositeRevocations>,
    allowed_roles: Option<Rc<[Role]>>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let jwt_manager = self.jwt_manager.clone();
        let revocations = self.revocations.clone();
        let allowed_roles = self.allowed_roles.clone();
        let service = self.service.clone();

        // 提取 Authorization header
        let token = match extract_bearer_token(&req) {
            Ok(t) => t,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        Box::pin(async move {
            // 验证 JWT
            let claims = jwt_manager
                .verify_token(&token)
                .map_err(|e| -> Error { e.into() })?;

            // 已登出的令牌
            if revocations.is_revoked(&claims.jti).await? {
                return Err(AppError::InvalidToken.into());
            }

            if let Some(roles) = &allowed_roles {
                let role = claims.role()?;
                if !roles.contains(&role) {
                    return Err(AppError::Forbidden(format!("role {} not allowed", role)).into());
                }
            }

            // 将 Claims 注入到请求扩展中
            req.extensions_mut().insert(claims);

            // 调用下一个服务
            service.call(req).await
        })
    }
}

/// 从请求中提取 Bearer Token
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

/// 从请求扩展中取出 Claims（由 JwtAuth 中间件注入）
pub fn claims_of(req: &HttpRequest) -> Result<Claims, AppError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}
