use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{
        header::{self, HeaderValue},
        Method,
    },
    middleware::Next,
    web, Error, HttpResponse,
};

/// Exact-match origin allow-list.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Returns the origin to echo back, if it is on the list.
    pub fn allowed_origin<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        let origin = origin?;
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == origin)
            .then_some(origin)
    }
}

/// Adds CORS headers for allow-listed origins and answers every preflight
/// with 204, whether or not the origin is allowed.
pub async fn cors_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let echo = req
        .app_data::<web::Data<CorsPolicy>>()
        .and_then(|policy| policy.allowed_origin(origin.as_deref()))
        .and_then(|origin| HeaderValue::from_str(origin).ok());

    if origin.is_some() && echo.is_none() {
        log::debug!("Origin {:?} is not allow-listed", origin);
    }

    let mut res = if req.method() == Method::OPTIONS {
        req.into_response(HttpResponse::NoContent().finish())
    } else {
        next.call(req).await?.map_into_boxed_body()
    };

    if let Some(origin) = echo {
        let headers = res.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,POST,OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type,Authorization"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("false"),
        );
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let policy = CorsPolicy::new(vec!["https://ai-clothes-swap.web.app".into()]);

        assert_eq!(
            policy.allowed_origin(Some("https://ai-clothes-swap.web.app")),
            Some("https://ai-clothes-swap.web.app")
        );
        assert_eq!(policy.allowed_origin(Some("https://ai-clothes-swap.web.app/")), None);
        assert_eq!(policy.allowed_origin(Some("https://evil.example")), None);
        assert_eq!(policy.allowed_origin(None), None);
    }
}
