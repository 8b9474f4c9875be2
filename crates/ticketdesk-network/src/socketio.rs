//! Engine.IO v4 / Socket.IO v4 텍스트 프레임 코덱.
//!
//! WebSocket 전송 위에서 오가는 텍스트 패킷만 다룬다 (바이너리 첨부 미지원).
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,"pingTimeout":20000}   open
//! 2 / 3                                                    ping / pong
//! 40 / 40/admin,{..}                                        connect
//! 42["settings",{"action":"update",..}]                    event
//! 4212["event",..]                                          event + ack id
//! ```

use serde::Deserialize;
use serde_json::Value;
use ticketdesk_core::error::CoreError;

/// 기본 네임스페이스
pub const DEFAULT_NAMESPACE: &str = "/";

/// Engine.IO 프로토콜 버전 (핸드셰이크 쿼리 `EIO=4`)
pub const ENGINE_IO_VERSION: &str = "4";

/// 핑에 대한 응답 프레임
pub const PONG: &str = "3";

/// Engine.IO open 패킷 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

/// Engine.IO 패킷
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// Socket.IO 패킷 (Engine.IO message 안에 실림)
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        message: String,
    },
}

/// 텍스트 프레임 디코드
pub fn decode(frame: &str) -> Result<EnginePacket, CoreError> {
    let mut chars = frame.chars();
    let kind = chars
        .next()
        .ok_or_else(|| CoreError::Protocol("빈 프레임".to_string()))?;
    let rest = chars.as_str();

    match kind {
        '0' => {
            let handshake: Handshake = serde_json::from_str(rest)
                .map_err(|e| CoreError::Protocol(format!("open 패킷 파싱 실패: {e}")))?;
            Ok(EnginePacket::Open(handshake))
        }
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping),
        '3' => Ok(EnginePacket::Pong),
        '4' => decode_socket_packet(rest).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(CoreError::Protocol(format!(
            "알 수 없는 Engine.IO 패킷 타입: {other}"
        ))),
    }
}

fn decode_socket_packet(packet: &str) -> Result<SocketPacket, CoreError> {
    let mut chars = packet.chars();
    let kind = chars
        .next()
        .ok_or_else(|| CoreError::Protocol("빈 Socket.IO 패킷".to_string()))?;
    let (namespace, rest) = split_namespace(chars.as_str());

    let id_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (id, body) = rest.split_at(id_len);
    let id = if id.is_empty() {
        None
    } else {
        Some(
            id.parse::<u64>()
                .map_err(|e| CoreError::Protocol(format!("잘못된 ack id: {e}")))?,
        )
    };

    match kind {
        '0' => {
            let data = if body.is_empty() {
                None
            } else {
                Some(parse_json(body)?)
            };
            Ok(SocketPacket::Connect { namespace, data })
        }
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let mut args = parse_args(body)?;
            if args.is_empty() {
                return Err(CoreError::Protocol("이벤트 이름 없음".to_string()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(CoreError::Protocol(format!(
                        "이벤트 이름이 문자열이 아님: {other}"
                    )))
                }
            };
            Ok(SocketPacket::Event {
                namespace,
                id,
                name,
                args,
            })
        }
        '3' => {
            let id = id.ok_or_else(|| CoreError::Protocol("ack id 없음".to_string()))?;
            Ok(SocketPacket::Ack {
                namespace,
                id,
                args: parse_args(body)?,
            })
        }
        '4' => {
            let message = match parse_json(body)? {
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                Value::String(message) => message,
                other => other.to_string(),
            };
            Ok(SocketPacket::ConnectError { namespace, message })
        }
        '5' | '6' => Err(CoreError::Protocol(
            "바이너리 패킷은 지원하지 않음".to_string(),
        )),
        other => Err(CoreError::Protocol(format!(
            "알 수 없는 Socket.IO 패킷 타입: {other}"
        ))),
    }
}

/// `/admin,<rest>` → (`/admin`, `<rest>`), 네임스페이스가 없으면 기본값
fn split_namespace(rest: &str) -> (String, &str) {
    if rest.starts_with('/') {
        match rest.split_once(',') {
            Some((namespace, rest)) => (namespace.to_string(), rest),
            None => (rest.to_string(), ""),
        }
    } else {
        (DEFAULT_NAMESPACE.to_string(), rest)
    }
}

fn parse_json(body: &str) -> Result<Value, CoreError> {
    serde_json::from_str(body)
        .map_err(|e| CoreError::Protocol(format!("패킷 JSON 파싱 실패: {e}")))
}

fn parse_args(body: &str) -> Result<Vec<Value>, CoreError> {
    match parse_json(body)? {
        Value::Array(args) => Ok(args),
        other => Err(CoreError::Protocol(format!(
            "이벤트 인자는 배열이어야 함: {other}"
        ))),
    }
}

fn namespace_prefix(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        String::new()
    } else {
        format!("{namespace},")
    }
}

/// 네임스페이스 연결 프레임 (`40`, `40{auth}`, `40/ns,{auth}`)
pub fn encode_connect(namespace: &str, auth: Option<&Value>) -> String {
    let mut frame = format!("40{}", namespace_prefix(namespace));
    if let Some(auth) = auth {
        frame.push_str(&auth.to_string());
    }
    frame
}

/// 이벤트 프레임 (`42["name",arg..]`)
pub fn encode_event(namespace: &str, name: &str, args: &[Value]) -> String {
    let mut payload = Vec::with_capacity(args.len() + 1);
    payload.push(Value::String(name.to_string()));
    payload.extend(args.iter().cloned());
    format!(
        "42{}{}",
        namespace_prefix(namespace),
        Value::Array(payload)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_open() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        match decode(frame).unwrap() {
            EnginePacket::Open(hs) => {
                assert_eq!(hs.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(hs.ping_interval, 25_000);
                assert_eq!(hs.ping_timeout, 20_000);
                assert_eq!(hs.max_payload, Some(1_000_000));
            }
            other => panic!("open 패킷이 아님: {other:?}"),
        }
    }

    #[test]
    fn decode_ping_pong_close() {
        assert_eq!(decode("2").unwrap(), EnginePacket::Ping);
        assert_eq!(decode("3").unwrap(), EnginePacket::Pong);
        assert_eq!(decode("1").unwrap(), EnginePacket::Close);
        assert_eq!(decode("6").unwrap(), EnginePacket::Noop);
    }

    #[test]
    fn decode_connect_default_namespace() {
        assert_eq!(
            decode("40").unwrap(),
            EnginePacket::Message(SocketPacket::Connect {
                namespace: "/".to_string(),
                data: None
            })
        );
        assert_eq!(
            decode(r#"40{"sid":"abc"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::Connect {
                namespace: "/".to_string(),
                data: Some(json!({"sid": "abc"}))
            })
        );
    }

    #[test]
    fn decode_settings_event() {
        let frame =
            r#"42["settings",{"action":"update","setting":{"key":"call","value":"disabled"}}]"#;
        match decode(frame).unwrap() {
            EnginePacket::Message(SocketPacket::Event {
                namespace,
                id,
                name,
                args,
            }) => {
                assert_eq!(namespace, "/");
                assert!(id.is_none());
                assert_eq!(name, "settings");
                assert_eq!(args[0]["setting"]["key"], "call");
            }
            other => panic!("이벤트 패킷이 아님: {other:?}"),
        }
    }

    #[test]
    fn decode_event_with_namespace_and_ack_id() {
        let frame = r#"42/tenant-7,12["ticket",{"id":1}]"#;
        match decode(frame).unwrap() {
            EnginePacket::Message(SocketPacket::Event {
                namespace, id, name, ..
            }) => {
                assert_eq!(namespace, "/tenant-7");
                assert_eq!(id, Some(12));
                assert_eq!(name, "ticket");
            }
            other => panic!("이벤트 패킷이 아님: {other:?}"),
        }
    }

    #[test]
    fn decode_connect_error() {
        let frame = r#"44{"message":"Not authorized"}"#;
        assert_eq!(
            decode(frame).unwrap(),
            EnginePacket::Message(SocketPacket::ConnectError {
                namespace: "/".to_string(),
                message: "Not authorized".to_string()
            })
        );
    }

    #[test]
    fn decode_disconnect_and_ack() {
        assert_eq!(
            decode("41").unwrap(),
            EnginePacket::Message(SocketPacket::Disconnect {
                namespace: "/".to_string()
            })
        );
        assert_eq!(
            decode(r#"433["ok"]"#).unwrap(),
            EnginePacket::Message(SocketPacket::Ack {
                namespace: "/".to_string(),
                id: 3,
                args: vec![json!("ok")]
            })
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("9").is_err());
        assert!(decode("42").is_err());
        assert!(decode("42[]").is_err());
        assert!(decode("42[1,2]").is_err());
        assert!(decode(r#"45-["bin",{"_placeholder":true,"num":0}]"#).is_err());
    }

    #[test]
    fn encode_frames() {
        assert_eq!(encode_connect("/", None), "40");
        assert_eq!(
            encode_connect("/admin", Some(&json!({"token": "t"}))),
            r#"40/admin,{"token":"t"}"#
        );
        assert_eq!(
            encode_event("/", "settings", &[json!({"action": "update"})]),
            r#"42["settings",{"action":"update"}]"#
        );
    }
}
