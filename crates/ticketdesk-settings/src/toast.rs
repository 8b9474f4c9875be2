//! 에러 → 토스트 메시지 변환.
//!
//! 서버 에러 코드가 있으면 `backendErrors.<code>` 번역을, 번역이 없으면 코드 자체를,
//! 코드가 없으면 일반 에러 문구를 사용한다.

use ticketdesk_core::error::CoreError;

use crate::i18n::I18n;

/// 사용자에게 보여줄 에러 토스트 문구
pub fn error_message(err: &CoreError, i18n: &I18n) -> String {
    match err.backend_code() {
        Some(code) => {
            let key = format!("backendErrors.{code}");
            if i18n.exists(&key) {
                i18n.t(&key)
            } else {
                code.to_string()
            }
        }
        None => i18n.t("errors.generic"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    fn api_error(code: Option<&str>) -> CoreError {
        CoreError::Api {
            status: 400,
            code: code.map(str::to_string),
            message: String::new(),
        }
    }

    #[test]
    fn known_backend_code_is_translated() {
        let i18n = I18n::new(Locale::Pt);
        assert_eq!(
            error_message(&api_error(Some("ERR_NO_PERMISSION")), &i18n),
            "Você não tem permissão para acessar este recurso."
        );
    }

    #[test]
    fn unknown_backend_code_is_shown_raw() {
        let i18n = I18n::new(Locale::En);
        assert_eq!(
            error_message(&api_error(Some("ERR_WAPP_NOT_INITIALIZED")), &i18n),
            "ERR_WAPP_NOT_INITIALIZED"
        );
    }

    #[test]
    fn errors_without_code_use_generic_text() {
        let i18n = I18n::new(Locale::Es);
        assert_eq!(error_message(&api_error(None), &i18n), "¡Ocurrió un error!");
        assert_eq!(
            error_message(&CoreError::Network("refused".to_string()), &i18n),
            "¡Ocurrió un error!"
        );
    }
}
