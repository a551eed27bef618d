use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;

struct ScriptedBackend {
    name: &'static str,
    reply: Result<&'static str, u16>,
    calls: Rc<Cell<usize>>,
    last_temperature: Rc<RefCell<Option<f32>>>,
}

impl ScriptedBackend {
    fn ok(name: &'static str, reply: &'static str) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let backend = Self {
            name,
            reply: Ok(reply),
            calls: Rc::clone(&calls),
            last_temperature: Rc::new(RefCell::new(None)),
        };
        (backend, calls)
    }

    fn failing(name: &'static str, status: u16) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let backend = Self {
            name,
            reply: Err(status),
            calls: Rc::clone(&calls),
            last_temperature: Rc::new(RefCell::new(None)),
        };
        (backend, calls)
    }
}

impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn complete(&self, _messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_temperature.borrow_mut() = Some(temperature);
        match self.reply {
            Ok(reply) => Ok(reply.to_string()),
            Err(status) => Err(LlmError::Http {
                endpoint: self.name.to_string(),
                status,
                body: "unavailable".to_string(),
            }),
        }
    }
}

fn mode(mode: BackendMode) -> ModeSwitch {
    let switch = ModeSwitch::default();
    switch.set(mode);
    switch
}

fn conversation() -> Vec<ChatMessage> {
    vec![ChatMessage::system("sys"), ChatMessage::user("doc")]
}

#[test]
fn local_mode_uses_local_endpoint_when_it_answers() {
    let (local, local_calls) = ScriptedBackend::ok("local", "from local");
    let (cloud, cloud_calls) = ScriptedBackend::ok("cloud", "from cloud");
    let client = FailoverClient::new(
        Box::new(local),
        Box::new(cloud),
        mode(BackendMode::Local),
    );

    assert_eq!(client.complete(&conversation(), 0.7).unwrap(), "from local");
    assert_eq!(local_calls.get(), 1);
    assert_eq!(cloud_calls.get(), 0);
}

#[test]
fn local_failure_retries_once_on_cloud() {
    let (local, local_calls) = ScriptedBackend::failing("local", 503);
    let (cloud, cloud_calls) = ScriptedBackend::ok("cloud", "from cloud");
    let client = FailoverClient::new(
        Box::new(local),
        Box::new(cloud),
        mode(BackendMode::Local),
    );

    assert_eq!(client.complete(&conversation(), 0.7).unwrap(), "from cloud");
    assert_eq!(local_calls.get(), 1);
    assert_eq!(cloud_calls.get(), 1);
}

#[test]
fn both_failures_are_reported_together() {
    let (local, _) = ScriptedBackend::failing("local", 500);
    let (cloud, cloud_calls) = ScriptedBackend::failing("cloud", 401);
    let client = FailoverClient::new(
        Box::new(local),
        Box::new(cloud),
        mode(BackendMode::Local),
    );

    let error = client.complete(&conversation(), 0.7).unwrap_err();
    assert_eq!(cloud_calls.get(), 1);
    match error {
        LlmError::BothEndpointsFailed { local, cloud } => {
            assert!(local.contains("http 500"), "{local}");
            assert!(cloud.contains("http 401"), "{cloud}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cloud_mode_skips_local_endpoint() {
    let (local, local_calls) = ScriptedBackend::ok("local", "from local");
    let (cloud, cloud_calls) = ScriptedBackend::failing("cloud", 429);
    let client = FailoverClient::new(
        Box::new(local),
        Box::new(cloud),
        mode(BackendMode::Cloud),
    );

    let error = client.complete(&conversation(), 0.7).unwrap_err();
    assert!(matches!(error, LlmError::Http { status: 429, .. }));
    assert_eq!(local_calls.get(), 0);
    assert_eq!(cloud_calls.get(), 1);
}

#[test]
fn mode_switch_is_shared_between_clones() {
    let switch = ModeSwitch::default();
    assert_eq!(switch.get(), BackendMode::Local);
    let handle = switch.clone();

    assert_eq!(handle.set(BackendMode::Cloud), BackendMode::Local);
    assert_eq!(switch.get(), BackendMode::Cloud);
    assert_eq!(switch.set(BackendMode::Local), BackendMode::Cloud);
    assert_eq!(handle.get(), BackendMode::Local);
}

#[test]
fn switching_mode_changes_routing_of_later_calls() {
    let (local, local_calls) = ScriptedBackend::ok("local", "from local");
    let (cloud, cloud_calls) = ScriptedBackend::ok("cloud", "from cloud");
    let client = FailoverClient::new(Box::new(local), Box::new(cloud), ModeSwitch::default());

    assert_eq!(client.complete(&conversation(), 0.7).unwrap(), "from local");
    client.mode().set(BackendMode::Cloud);
    assert_eq!(client.complete(&conversation(), 0.7).unwrap(), "from cloud");
    assert_eq!(local_calls.get(), 1);
    assert_eq!(cloud_calls.get(), 1);
}

#[test]
fn temperature_is_forwarded_unchanged() {
    let (local, _) = ScriptedBackend::ok("local", "ok");
    let seen = Rc::clone(&local.last_temperature);
    let (cloud, _) = ScriptedBackend::ok("cloud", "ok");
    let client = FailoverClient::new(Box::new(local), Box::new(cloud), ModeSwitch::default());

    client
        .complete(&conversation(), prompt::SUGGESTION_TEMPERATURE)
        .unwrap();
    assert_eq!(*seen.borrow(), Some(0.8));
}

#[test]
fn cloud_endpoint_caps_tokens_and_drops_blank_keys() {
    let timeout = Duration::from_secs(60);
    let cloud = EndpointConfig::cloud(DEFAULT_CLOUD_API_URL, DEFAULT_CLOUD_MODEL, Some("  ".into()), timeout);
    assert_eq!(cloud.max_tokens, Some(CLOUD_MAX_TOKENS));
    assert_eq!(cloud.api_key, None);

    let local = EndpointConfig::local(DEFAULT_LOCAL_API_URL, DEFAULT_LOCAL_MODEL, timeout);
    assert_eq!(local.max_tokens, None);
    assert_eq!(local.name, "local");
}
