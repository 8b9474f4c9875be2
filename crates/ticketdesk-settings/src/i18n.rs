//! 국제화 (i18n) 모듈.
//!
//! 영어(en), 포르투갈어(pt), 스페인어(es) 지원.
//! 모든 표시 문자열은 점으로 구분된 키(`settings.settings.call.name`)로 조회한다.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 지원 언어
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// 영어 (기본값)
    #[default]
    En,
    /// 포르투갈어 (브라질)
    Pt,
    /// 스페인어
    Es,
}

impl Locale {
    /// 언어 코드 반환
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pt => "pt",
            Locale::Es => "es",
        }
    }

    /// 언어 코드 파싱 (`pt-BR`, `pt_BR.UTF-8` 같은 지역 접미사 허용)
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = code
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::En),
            "pt" => Some(Locale::Pt),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }

    /// 시스템 로케일 감지
    pub fn detect_system() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|lang| Locale::from_code(&lang))
            .unwrap_or_default()
    }
}

type Catalog = HashMap<&'static str, &'static str>;

const EN: &[(&str, &str)] = &[
    ("settings.title", "Settings"),
    ("settings.success", "Settings saved successfully."),
    ("settings.readOnly", "This setting is read-only."),
    ("settings.status.unloaded", "Not loaded"),
    ("settings.status.loading", "Loading..."),
    ("settings.status.loaded", "Up to date"),
    ("settings.status.loadError", "Could not load settings"),
    ("settings.settings.userCreation.name", "User creation"),
    (
        "settings.settings.userCreation.note",
        "If enabled, new administrators can be created through the signup screen.",
    ),
    ("settings.settings.userCreation.options.enabled", "Enabled"),
    ("settings.settings.userCreation.options.disabled", "Disabled"),
    ("settings.settings.transferTicket.name", "Transfer ticket"),
    (
        "settings.settings.transferTicket.note",
        "If enabled, an automatic message is sent to the customer every time the ticket is transferred.",
    ),
    ("settings.settings.transferTicket.options.enabled", "Enabled"),
    ("settings.settings.transferTicket.options.disabled", "Disabled"),
    ("settings.settings.call.name", "Accept calls"),
    (
        "settings.settings.call.note",
        "If enabled, whenever someone places an audio/video call a message is sent saying this kind of call is not supported.",
    ),
    ("settings.settings.call.options.enabled", "Enabled"),
    ("settings.settings.call.options.disabled", "Disabled"),
    ("settings.settings.CheckMsgIsGroup.name", "Ignore group messages"),
    (
        "settings.settings.CheckMsgIsGroup.note",
        "If enabled, the system ignores incoming group messages.",
    ),
    ("settings.settings.CheckMsgIsGroup.options.enabled", "Enabled"),
    ("settings.settings.CheckMsgIsGroup.options.disabled", "Disabled"),
    ("settings.settings.userApiToken.name", "API token"),
    (
        "settings.settings.userApiToken.note",
        "Token key used for sending through the REST API.",
    ),
    ("errors.generic", "An error occurred!"),
    (
        "backendErrors.ERR_NO_PERMISSION",
        "You don't have permission to access this resource.",
    ),
    (
        "backendErrors.ERR_SESSION_EXPIRED",
        "Session expired. Please login.",
    ),
    (
        "backendErrors.ERR_NO_SETTING_FOUND",
        "No setting found with this ID.",
    ),
];

const PT: &[(&str, &str)] = &[
    ("settings.title", "Configurações"),
    ("settings.success", "Configurações salvas com sucesso."),
    ("settings.readOnly", "Esta configuração é somente leitura."),
    ("settings.status.unloaded", "Não carregado"),
    ("settings.status.loading", "Carregando..."),
    ("settings.status.loaded", "Atualizado"),
    ("settings.status.loadError", "Não foi possível carregar as configurações"),
    ("settings.settings.userCreation.name", "Criação de usuário"),
    (
        "settings.settings.userCreation.note",
        "Se ativo, permite criação de novos administradores através da tela de cadastro.",
    ),
    ("settings.settings.userCreation.options.enabled", "Ativado"),
    ("settings.settings.userCreation.options.disabled", "Desativado"),
    ("settings.settings.transferTicket.name", "Transferir ticket"),
    (
        "settings.settings.transferTicket.note",
        "Se ativo, é enviada uma mensagem automática para o cliente toda vez que o ticket for transferido.",
    ),
    ("settings.settings.transferTicket.options.enabled", "Ativado"),
    ("settings.settings.transferTicket.options.disabled", "Desativado"),
    ("settings.settings.call.name", "Aceitar chamadas"),
    (
        "settings.settings.call.note",
        "Se ativo, sempre que alguém fizer uma chamada de áudio/vídeo é enviada uma mensagem informando que esse tipo não é suportado.",
    ),
    ("settings.settings.call.options.enabled", "Ativado"),
    ("settings.settings.call.options.disabled", "Desativado"),
    ("settings.settings.CheckMsgIsGroup.name", "Ignorar mensagens de grupos"),
    (
        "settings.settings.CheckMsgIsGroup.note",
        "Se ativo, o sistema ignora mensagens entrantes de grupos.",
    ),
    ("settings.settings.CheckMsgIsGroup.options.enabled", "Ativado"),
    ("settings.settings.CheckMsgIsGroup.options.disabled", "Desativado"),
    ("settings.settings.userApiToken.name", "Token Api"),
    (
        "settings.settings.userApiToken.note",
        "Chave token, utilizada para envios através da API/REST.",
    ),
    ("errors.generic", "Ocorreu um erro!"),
    (
        "backendErrors.ERR_NO_PERMISSION",
        "Você não tem permissão para acessar este recurso.",
    ),
    (
        "backendErrors.ERR_SESSION_EXPIRED",
        "Sessão expirada. Por favor entre.",
    ),
    (
        "backendErrors.ERR_NO_SETTING_FOUND",
        "Nenhuma configuração encontrada com este ID.",
    ),
];

const ES: &[(&str, &str)] = &[
    ("settings.title", "Configuraciones"),
    ("settings.success", "Configuraciones guardadas con éxito."),
    ("settings.readOnly", "Esta configuración es de solo lectura."),
    ("settings.status.unloaded", "No cargado"),
    ("settings.status.loading", "Cargando..."),
    ("settings.status.loaded", "Actualizado"),
    ("settings.status.loadError", "No se pudieron cargar las configuraciones"),
    ("settings.settings.userCreation.name", "Creación de usuario"),
    (
        "settings.settings.userCreation.note",
        "Si está activo, permite crear nuevos administradores a través de la pantalla de registro.",
    ),
    ("settings.settings.userCreation.options.enabled", "Habilitado"),
    ("settings.settings.userCreation.options.disabled", "Deshabilitado"),
    ("settings.settings.transferTicket.name", "Transferir ticket"),
    (
        "settings.settings.transferTicket.note",
        "Si está activo, se envía un mensaje automático al cliente cada vez que se transfiere el ticket.",
    ),
    ("settings.settings.transferTicket.options.enabled", "Habilitado"),
    ("settings.settings.transferTicket.options.disabled", "Deshabilitado"),
    ("settings.settings.call.name", "Aceptar llamadas"),
    (
        "settings.settings.call.note",
        "Si está activo, cada vez que alguien haga una llamada de audio/video se envía un mensaje indicando que ese tipo no es compatible.",
    ),
    ("settings.settings.call.options.enabled", "Habilitado"),
    ("settings.settings.call.options.disabled", "Deshabilitado"),
    ("settings.settings.CheckMsgIsGroup.name", "Ignorar mensajes de grupos"),
    (
        "settings.settings.CheckMsgIsGroup.note",
        "Si está activo, el sistema ignora los mensajes entrantes de grupos.",
    ),
    ("settings.settings.CheckMsgIsGroup.options.enabled", "Habilitado"),
    ("settings.settings.CheckMsgIsGroup.options.disabled", "Deshabilitado"),
    ("settings.settings.userApiToken.name", "Token API"),
    (
        "settings.settings.userApiToken.note",
        "Clave de token utilizada para envíos a través de la API REST.",
    ),
    ("errors.generic", "¡Ocurrió un error!"),
    (
        "backendErrors.ERR_NO_PERMISSION",
        "No tienes permiso para acceder a este recurso.",
    ),
    (
        "backendErrors.ERR_SESSION_EXPIRED",
        "Sesión caducada. Por favor inicie sesión.",
    ),
    (
        "backendErrors.ERR_NO_SETTING_FOUND",
        "No se encontró ninguna configuración con este ID.",
    ),
];

static CATALOGS: Lazy<[Catalog; 3]> = Lazy::new(|| {
    [
        EN.iter().copied().collect(),
        PT.iter().copied().collect(),
        ES.iter().copied().collect(),
    ]
});

fn catalog(locale: Locale) -> &'static Catalog {
    match locale {
        Locale::En => &CATALOGS[0],
        Locale::Pt => &CATALOGS[1],
        Locale::Es => &CATALOGS[2],
    }
}

/// 문자열 조회기
#[derive(Debug, Clone, Copy, Default)]
pub struct I18n {
    locale: Locale,
}

impl I18n {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// 키가 현재 언어 또는 영어 카탈로그에 있는지
    pub fn exists(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// 키 조회: 현재 언어 → 영어 → 키 자체 순으로 대체
    pub fn t(&self, key: &str) -> String {
        self.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        catalog(self.locale)
            .get(key)
            .or_else(|| catalog(Locale::En).get(key))
            .copied()
    }
}
