use serde_json::{json, Value};

use crate::app::runtime::Runtime;
use crate::app::Msg;
use crate::error::{CoreError, CoreResult};
use crate::model::state::StateView;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload.get(field).and_then(|v| v.as_str())
}

fn require_str<'a>(payload: &'a Value, field: &str) -> CoreResult<&'a str> {
    get_str(payload, field)
        .ok_or_else(|| CoreError::InvalidRequest(format!("payload.{field} is required")))
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn state_payload(view: StateView) -> Value {
    json!({ "state": view })
}

/// Pushed line for state changes that were not caused by a request.
pub fn state_event(view: StateView) -> String {
    json!({
        "event": "state",
        "payload": view
    })
    .to_string()
}

/// Reply for a request line that could not be read at all.
pub fn input_error() -> String {
    err(Value::Null, "invalid input")
}

pub fn handle(runtime: &mut Runtime, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd = Command::from(get_cmd(&req));
    let payload = get_payload(&req);

    if cmd == Command::Ping {
        return ok(id, json!({ "message": "deepl-core alive" }));
    }

    match apply(runtime, cmd, payload) {
        Ok(()) => ok(id, state_payload(runtime.state().view())),
        Err(e) => err(id, e.to_string()),
    }
}

fn apply(runtime: &mut Runtime, cmd: Command, payload: &Value) -> CoreResult<()> {
    match cmd {
        Command::Ping | Command::StateGet => Ok(()),

        Command::ApiKeySet => {
            let key = require_str(payload, "api_key")?;
            runtime.dispatch(Msg::ApiKeyChanged(key.to_string()))
        }

        Command::ApiKeySubmit => {
            if let Some(key) = get_str(payload, "api_key") {
                runtime.dispatch(Msg::ApiKeyChanged(key.to_string()))?;
            }
            runtime.dispatch(Msg::ApiKeySubmitted)
        }

        Command::ApiKeyEdit => runtime.dispatch(Msg::ApiKeyEdit),

        Command::ApiKeyForget => runtime.dispatch(Msg::ApiKeyForget),

        Command::LanguagesSet => {
            let source = require_str(payload, "source")?;
            let target = require_str(payload, "target")?;
            runtime.dispatch(Msg::LanguagesChanged {
                source: source.to_string(),
                target: target.to_string(),
            })
        }

        Command::LanguagesReverse => runtime.dispatch(Msg::ReverseDirection),

        Command::QueryInput => {
            let text = require_str(payload, "text")?;
            runtime.dispatch(Msg::QueryChanged(text.to_string()))
        }

        Command::Unknown => Err(CoreError::InvalidRequest("unknown command".into())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiError;
    use crate::model::language::{Language, LanguageKind, LanguagePair, Translation};
    use crate::services::deepl::TranslationApi;
    use crate::services::store::KeyStore;

    struct OfflineApi;

    #[async_trait]
    impl TranslationApi for OfflineApi {
        async fn languages(&self, _: &str, _: LanguageKind) -> Result<Vec<Language>, ApiError> {
            Err(ApiError::Decode("offline".into()))
        }

        async fn translate(
            &self,
            _: &str,
            _: &str,
            _: &LanguagePair,
        ) -> Result<Translation, ApiError> {
            Err(ApiError::Decode("offline".into()))
        }
    }

    fn runtime(dir: &tempfile::TempDir) -> Runtime {
        let store = KeyStore::open(dir.path().join("store.json"));
        Runtime::new(Arc::new(OfflineApi), store, Duration::from_millis(500))
    }

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[tokio::test]
    async fn ping_echoes_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, r#"{"id":7,"cmd":"ping"}"#));
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["status"], "ok");
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, "{nope"));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "invalid json");
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, r#"{"id":"a","cmd":"translate.everything"}"#));
        assert_eq!(resp["id"], "a");
        assert_eq!(resp["message"], "unknown command");
    }

    #[tokio::test]
    async fn submit_short_key_reports_notice_in_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(
            &mut rt,
            r#"{"id":1,"cmd":"api_key.submit","payload":{"api_key":"abcdef"}}"#,
        ));
        let state = &resp["payload"]["state"];
        assert_eq!(state["key_status"], "invalid");
        assert_eq!(state["key_notice"], "Needs to be 36 characters");
        assert_eq!(state["api_key_preview"], "abc...");
        assert_eq!(state["disabled"], true);
    }

    #[tokio::test]
    async fn query_input_while_disabled_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(
            &mut rt,
            r#"{"id":2,"cmd":"query.input","payload":{"text":"Hallo"}}"#,
        ));
        assert_eq!(resp["status"], "error");
        assert_eq!(
            resp["message"],
            "translation form is disabled until an API key is validated"
        );
    }

    #[tokio::test]
    async fn missing_field_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, r#"{"id":3,"cmd":"api_key.set","payload":{}}"#));
        assert_eq!(resp["message"], "payload.api_key is required");
    }

    #[tokio::test]
    async fn query_input_without_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, r#"{"id":5,"cmd":"query.input","payload":{}}"#));
        assert_eq!(resp["id"], 5);
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "payload.text is required");

        let resp = parse(&handle(
            &mut rt,
            r#"{"id":6,"cmd":"query.input","payload":{"text":42}}"#,
        ));
        assert_eq!(resp["message"], "payload.text is required");
        assert_eq!(rt.state().query, "");
    }

    #[test]
    fn unreadable_line_gets_error_reply() {
        let v = parse(&input_error());
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "invalid input");
    }

    #[tokio::test]
    async fn state_get_returns_initial_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(&dir);

        let resp = parse(&handle(&mut rt, r#"{"id":4,"cmd":"state.get"}"#));
        let pair = &resp["payload"]["state"]["active_languages"];
        assert_eq!(pair["source"]["language"], "DE");
        assert_eq!(pair["target"]["language"], "EN-US");
        assert_eq!(pair["target"]["name"], "English (American)");
    }

    #[test]
    fn state_event_is_tagged() {
        let line = state_event(crate::model::state::AppState::default().view());
        let v = parse(&line);
        assert_eq!(v["event"], "state");
        assert_eq!(v["payload"]["key_status"], "editing");
    }
}
