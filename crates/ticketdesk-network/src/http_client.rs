//! HTTP REST 설정 클라이언트.
//!
//! `SettingsApi` 포트 구현. Bearer 인증 헤더 자동 주입 + 상태 코드별 에러 매핑.
//! 쓰기 요청은 재시도하지 않는다 (호출 측에서 결과만 토스트로 보여준다).

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::setting::Setting;
use ticketdesk_core::ports::settings_api::SettingsApi;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenManager;

/// 서버 에러 응답 본문 `{"error": "..."}` 또는 `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// REST API 클라이언트: `SettingsApi` 포트 구현
pub struct HttpSettingsClient {
    client: reqwest::Client,
    base_url: Url,
    token_manager: Arc<TokenManager>,
}

impl HttpSettingsClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(
        base_url: &str,
        token_manager: Arc<TokenManager>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CoreError::Config(format!("잘못된 서버 URL: {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CoreError::Config(format!("잘못된 서버 URL: {base_url}")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token_manager,
        })
    }

    /// 기본 URL 뒤에 경로 세그먼트를 이어 붙인다 (세그먼트는 퍼센트 인코딩)
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::Config(format!("잘못된 서버 URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 토큰이 있으면 Authorization 헤더가 포함된 요청 빌더 반환
    async fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, CoreError> {
        let url = self.endpoint(segments)?;
        let builder = self.client.request(method, url);
        Ok(match self.token_manager.current().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        let code = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error));

        match status_code {
            401 => Err(CoreError::Auth(format!("인증 실패: {text}"))),
            404 if code.is_none() => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Api {
                status: status_code,
                code,
                message: text,
            }),
        }
    }
}

/// 전송 실패를 네트워크 에러로 변환
fn transport_error(context: &str, e: reqwest::Error) -> CoreError {
    if e.is_timeout() {
        CoreError::Network(format!("{context}: 타임아웃"))
    } else {
        CoreError::Network(format!("{context}: {e}"))
    }
}

#[async_trait]
impl SettingsApi for HttpSettingsClient {
    async fn list_settings(&self) -> Result<Vec<Setting>, CoreError> {
        debug!("설정 목록 조회 요청");

        let resp = self
            .request(reqwest::Method::GET, &["settings"])
            .await?
            .send()
            .await
            .map_err(|e| transport_error("설정 조회 요청 실패", e))?;

        let resp = Self::check_response(resp).await?;
        let settings: Vec<Setting> = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("설정 응답 파싱 실패: {e}")))?;

        debug!("설정 {}개 수신", settings.len());
        Ok(settings)
    }

    async fn update_setting(&self, key: &str, value: &str) -> Result<(), CoreError> {
        debug!("설정 변경 요청: {key}={value}");

        let body = serde_json::json!({ "value": value });
        let resp = self
            .request(reqwest::Method::PUT, &["settings", key])
            .await?
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("설정 변경 요청 실패", e))?;

        Self::check_response(resp).await?;
        debug!("설정 변경 성공: {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> HttpSettingsClient {
        let tm = Arc::new(token.map(TokenManager::with_token).unwrap_or_default());
        HttpSettingsClient::new(&server.url(), tm, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let tm = Arc::new(TokenManager::new());
        let result = HttpSettingsClient::new("not a url", tm, Duration::from_secs(5));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn endpoint_keeps_base_path_and_escapes_key() {
        let tm = Arc::new(TokenManager::new());
        let client =
            HttpSettingsClient::new("http://localhost:8080/api/", tm, Duration::from_secs(5))
                .unwrap();

        let url = client.endpoint(&["settings", "call"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/settings/call");

        let url = client.endpoint(&["settings", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/settings/a%2Fb%20c");
    }

    #[tokio::test]
    async fn list_settings_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/settings")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"key":"userCreation","value":"enabled"},
                    {"key":"call","value":"disabled"},
                    {"key":"userApiToken","value":"abc-123"}]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let settings = client.list_settings().await.unwrap();

        let keys: Vec<&str> = settings.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["userCreation", "call", "userApiToken"]);
        assert_eq!(settings[2].value, "abc-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_settings_without_token_sends_no_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/settings")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server, None);
        assert!(client.list_settings().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_settings_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/settings")
            .with_status(401)
            .with_body(r#"{"error":"ERR_SESSION_EXPIRED"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("old"));
        let err = client.list_settings().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
    }

    #[tokio::test]
    async fn list_settings_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/settings")
            .with_status(200)
            .with_body(r#"{"not":"a list"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.list_settings().await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn update_setting_sends_value_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/settings/transferTicket")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(serde_json::json!({ "value": "disabled" })))
            .with_status(200)
            .with_body(r#"{"key":"transferTicket","value":"disabled"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        client
            .update_setting("transferTicket", "disabled")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_setting_backend_error_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/settings/call")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"ERR_NO_PERMISSION"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let err = client.update_setting("call", "enabled").await.unwrap_err();
        match err {
            CoreError::Api { status, code, .. } => {
                assert_eq!(status, 403);
                assert_eq!(code.as_deref(), Some("ERR_NO_PERMISSION"));
            }
            other => panic!("예상하지 못한 에러: {other}"),
        }
    }

    #[tokio::test]
    async fn update_setting_unknown_key_with_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/settings/nope")
            .with_status(404)
            .with_body(r#"{"error":"ERR_NO_SETTING_FOUND"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.update_setting("nope", "enabled").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { status: 404, .. }));
        assert_eq!(err.backend_code(), Some("ERR_NO_SETTING_FOUND"));
    }

    #[tokio::test]
    async fn update_setting_not_found_without_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/settings/nope")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.update_setting("nope", "enabled").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(err.backend_code(), None);
    }

    #[tokio::test]
    async fn update_setting_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/settings/call")
            .with_status(503)
            .with_body("maintenance")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.update_setting("call", "enabled").await.unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // 바인딩 후 즉시 닫아 사용되지 않는 포트를 얻는다
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let tm = Arc::new(TokenManager::new());
        let client =
            HttpSettingsClient::new(&format!("http://{addr}"), tm, Duration::from_secs(2)).unwrap();
        let err = client.list_settings().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}
