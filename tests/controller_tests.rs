//! End-to-end controller scenarios driven through test doubles for the data
//! client and the view port.

use async_trait::async_trait;
use kestrel::api::{ApiError, DashboardApi};
use kestrel::controller::{INPUT_REENABLE_DELAY, LoadPhase, PageController, PageView, Region};
use kestrel::render::{self, PickerOptions};
use kestrel::types::{ChatReply, ConnectionStatus, ModelCatalog, ModelEntry};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

enum ChatBehavior {
    Reply(ChatReply),
    Fail,
}

struct StubApi {
    connection: Option<ConnectionStatus>,
    catalog: Option<ModelCatalog>,
    chat: ChatBehavior,
    chat_gate: Mutex<Option<oneshot::Receiver<()>>>,
    panic_on_status: bool,
}

impl Default for StubApi {
    fn default() -> Self {
        Self {
            connection: None,
            catalog: None,
            chat: ChatBehavior::Reply(ChatReply::default()),
            chat_gate: Mutex::new(None),
            panic_on_status: false,
        }
    }
}

fn payload_error() -> ApiError {
    let malformed = serde_json::from_str::<ChatReply>("not json").expect_err("malformed");
    ApiError::Payload(malformed)
}

#[async_trait]
impl DashboardApi for StubApi {
    async fn connection_status(&self) -> Option<ConnectionStatus> {
        if self.panic_on_status {
            panic!("status fetch blew up");
        }
        self.connection.clone()
    }

    async fn model_catalog(&self) -> Option<ModelCatalog> {
        self.catalog.clone()
    }

    async fn submit_chat(&self, _prompt: &str, _model: &str) -> Result<ChatReply, ApiError> {
        let gate = self.chat_gate.lock().expect("gate").take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match &self.chat {
            ChatBehavior::Reply(reply) => Ok(reply.clone()),
            ChatBehavior::Fail => Err(payload_error()),
        }
    }
}

/// Records every port call so tests can assert on the full history, not
/// just the final state.
#[derive(Default)]
struct RecordingView {
    missing: HashSet<Region>,
    fragments: Mutex<HashMap<Region, Vec<String>>>,
    pickers: Mutex<Vec<PickerOptions>>,
    prompt_enabled: Mutex<Vec<bool>>,
    submit_visible: Mutex<Vec<bool>>,
    response_visible: Mutex<Vec<bool>>,
}

impl RecordingView {
    fn without(regions: &[Region]) -> Self {
        Self {
            missing: regions.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn last_fragment(&self, region: Region) -> Option<String> {
        self.fragments
            .lock()
            .expect("fragments")
            .get(&region)
            .and_then(|history| history.last().cloned())
    }

    fn fragment_history(&self, region: Region) -> Vec<String> {
        self.fragments
            .lock()
            .expect("fragments")
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }

    fn last_picker(&self) -> Option<PickerOptions> {
        self.pickers.lock().expect("pickers").last().cloned()
    }

    fn prompt_enabled_history(&self) -> Vec<bool> {
        self.prompt_enabled.lock().expect("prompt").clone()
    }

    fn submit_visible_history(&self) -> Vec<bool> {
        self.submit_visible.lock().expect("submit").clone()
    }
}

impl PageView for RecordingView {
    fn has_region(&self, region: Region) -> bool {
        !self.missing.contains(&region)
    }

    fn set_fragment(&self, region: Region, fragment: String) -> bool {
        if self.missing.contains(&region) {
            return false;
        }
        self.fragments
            .lock()
            .expect("fragments")
            .entry(region)
            .or_default()
            .push(fragment);
        true
    }

    fn set_picker(&self, options: PickerOptions) -> bool {
        self.pickers.lock().expect("pickers").push(options);
        true
    }

    fn set_prompt_enabled(&self, enabled: bool) {
        self.prompt_enabled.lock().expect("prompt").push(enabled);
    }

    fn set_submit_visible(&self, visible: bool) {
        self.submit_visible.lock().expect("submit").push(visible);
    }

    fn set_response_visible(&self, visible: bool) {
        self.response_visible.lock().expect("response").push(visible);
    }
}

fn controller_with(
    api: StubApi,
    view: RecordingView,
) -> (Arc<PageController<StubApi, RecordingView>>, Arc<RecordingView>) {
    let view = Arc::new(view);
    let controller = Arc::new(PageController::new(Arc::new(api), Arc::clone(&view)));
    (controller, view)
}

fn one_model_catalog() -> ModelCatalog {
    ModelCatalog {
        available: vec![ModelEntry {
            name: "Llama".to_string(),
            model: "llama3".to_string(),
        }],
        active: Vec::new(),
    }
}

#[tokio::test(start_paused = true)]
async fn load_renders_connected_dashboard() {
    let api = StubApi {
        connection: Some(ConnectionStatus {
            host: Some("localhost".to_string()),
            port: Some("11434".to_string()),
            status: Some("ok".to_string()),
        }),
        catalog: Some(one_model_catalog()),
        ..StubApi::default()
    };
    let (controller, view) = controller_with(api, RecordingView::default());

    controller.initialize(false).await;
    assert_eq!(controller.phase(), LoadPhase::Ready);

    let connection = view.last_fragment(Region::Connection).expect("connection");
    assert!(connection.contains("Host: localhost"));
    assert!(connection.contains("Port: 11434"));
    assert!(connection.contains("Status: ok - CONNECTED"));

    let picker = view.last_picker().expect("picker");
    assert_eq!(picker.options.len(), 1);
    assert_eq!(picker.options[0].value, "llama3");
    assert_eq!(picker.options[0].label, "Llama");

    assert_eq!(
        view.last_fragment(Region::ActiveModels).as_deref(),
        Some(render::NO_ACTIVE_MODELS)
    );
    // The main region was never replaced.
    assert!(view.fragment_history(Region::Main).is_empty());
}

#[tokio::test(start_paused = true)]
async fn load_renders_unreachable_dashboard_and_reenables_after_delay() {
    let (controller, view) = controller_with(StubApi::default(), RecordingView::default());

    controller.initialize(false).await;
    assert_eq!(controller.phase(), LoadPhase::Ready);

    assert_eq!(
        view.last_fragment(Region::Connection).as_deref(),
        Some(render::UNABLE_TO_CONNECT)
    );
    assert_eq!(
        view.last_fragment(Region::AvailableModels).as_deref(),
        Some(render::NO_MODELS_FOUND)
    );
    assert_eq!(view.last_picker(), Some(PickerOptions::placeholder()));

    // Input is locked the moment the sequence settles...
    assert_eq!(view.prompt_enabled_history(), vec![false]);

    // ...and stays locked until the fixed delay elapses.
    tokio::time::sleep(INPUT_REENABLE_DELAY - Duration::from_millis(1)).await;
    assert_eq!(view.prompt_enabled_history(), vec![false]);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(view.prompt_enabled_history(), vec![false, true]);
    assert_eq!(view.submit_visible_history(), vec![false, true]);
}

#[tokio::test(start_paused = true)]
async fn load_with_loading_page_replaces_main_region() {
    let (controller, view) = controller_with(StubApi::default(), RecordingView::default());

    controller.initialize(true).await;
    assert_eq!(
        view.fragment_history(Region::Main),
        vec![render::LOADING_PAGE.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn missing_main_region_aborts_the_load() {
    let (controller, view) =
        controller_with(StubApi::default(), RecordingView::without(&[Region::Main]));

    controller.initialize(false).await;

    assert_eq!(controller.phase(), LoadPhase::Idle);
    assert!(view.prompt_enabled_history().is_empty());
    assert!(view.fragment_history(Region::Connection).is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_side_region_is_skipped_not_fatal() {
    let api = StubApi {
        catalog: Some(one_model_catalog()),
        ..StubApi::default()
    };
    let (controller, view) = controller_with(api, RecordingView::without(&[Region::AvailableModels]));

    controller.initialize(false).await;

    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert!(view.fragment_history(Region::AvailableModels).is_empty());
    assert!(view.last_fragment(Region::ActiveModels).is_some());
}

#[tokio::test(start_paused = true)]
async fn panicking_sequence_fails_and_still_schedules_reenable() {
    let api = StubApi {
        panic_on_status: true,
        ..StubApi::default()
    };
    let (controller, view) = controller_with(api, RecordingView::default());

    controller.initialize(false).await;

    assert_eq!(controller.phase(), LoadPhase::Failed);
    let main = view.last_fragment(Region::Main).expect("error page");
    assert!(main.contains("ERROR:"));

    tokio::time::sleep(INPUT_REENABLE_DELAY + Duration::from_millis(10)).await;
    assert_eq!(view.prompt_enabled_history(), vec![false, true]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_cancels_the_reenable_timer() {
    let (controller, view) = controller_with(StubApi::default(), RecordingView::default());

    controller.initialize(false).await;
    drop(controller);

    tokio::time::sleep(INPUT_REENABLE_DELAY * 2).await;
    assert_eq!(view.prompt_enabled_history(), vec![false]);
}

#[tokio::test(start_paused = true)]
async fn repeated_initialize_replaces_the_pending_timer() {
    let (controller, view) = controller_with(StubApi::default(), RecordingView::default());

    controller.initialize(false).await;
    controller.initialize(false).await;

    tokio::time::sleep(INPUT_REENABLE_DELAY * 2).await;
    let reenables = view
        .prompt_enabled_history()
        .iter()
        .filter(|enabled| **enabled)
        .count();
    assert_eq!(reenables, 1);
}

#[tokio::test]
async fn chat_submission_renders_reply_and_restores_submit() {
    let (gate_tx, gate_rx) = oneshot::channel();
    let api = StubApi {
        chat: ChatBehavior::Reply(ChatReply {
            response: Some("hi there".to_string()),
        }),
        chat_gate: Mutex::new(Some(gate_rx)),
        ..StubApi::default()
    };
    let (controller, view) = controller_with(api, RecordingView::default());

    let submit_controller = Arc::clone(&controller);
    let submission =
        tokio::spawn(async move { submit_controller.submit_prompt("hello", "llama3").await });

    // Let the sub-flow reach the in-flight state.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(view.submit_visible_history(), vec![false]);
    assert_eq!(
        view.last_fragment(Region::Response).as_deref(),
        Some(render::RESPONSE_LOADING)
    );

    gate_tx.send(()).expect("release gate");
    submission.await.expect("submission task");

    let response = view.last_fragment(Region::Response).expect("response");
    assert!(response.contains("response-card"));
    assert!(response.contains("hi there"));
    assert_eq!(view.submit_visible_history(), vec![false, true]);
}

#[tokio::test]
async fn chat_failure_renders_error_and_still_restores_submit() {
    let api = StubApi {
        chat: ChatBehavior::Fail,
        ..StubApi::default()
    };
    let (controller, view) = controller_with(api, RecordingView::default());

    controller.submit_prompt("hello", "llama3").await;

    assert_eq!(
        view.last_fragment(Region::Response).as_deref(),
        Some(render::SEND_ERROR)
    );
    assert_eq!(view.submit_visible_history(), vec![false, true]);
}

#[tokio::test]
async fn missing_response_region_skips_the_submission() {
    let (controller, view) = controller_with(
        StubApi::default(),
        RecordingView::without(&[Region::Response]),
    );

    controller.submit_prompt("hello", "llama3").await;

    assert!(view.submit_visible_history().is_empty());
    assert!(view.fragment_history(Region::Response).is_empty());
}
