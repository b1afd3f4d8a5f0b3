//! Page controller: orchestrates the load sequence and the chat submission
//! sub-flow against abstract data and view ports, and manages the busy
//! state around them.

use crate::api::DashboardApi;
use crate::render::{self, PickerOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay before the prompt input is re-enabled once the load sequence has
/// settled, independent of how long the sequence itself took.
pub const INPUT_REENABLE_DELAY: Duration = Duration::from_millis(1000);

/// Logical page regions the controller renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Main,
    Connection,
    AvailableModels,
    ActiveModels,
    Response,
}

/// Load lifecycle of the dashboard page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// View-model port the controller drives.
///
/// The controller never looks regions up itself; it receives this handle
/// and lets the implementation decide what each region maps to. Setters
/// return whether the region exists so a missing one can be logged and
/// skipped rather than aborting the surrounding sequence.
pub trait PageView: Send + Sync {
    fn has_region(&self, region: Region) -> bool;
    fn set_fragment(&self, region: Region, fragment: String) -> bool;
    fn set_picker(&self, options: PickerOptions) -> bool;
    fn set_prompt_enabled(&self, enabled: bool);
    fn set_submit_visible(&self, visible: bool);
    fn set_response_visible(&self, visible: bool);
}

pub struct PageController<A, V> {
    api: Arc<A>,
    view: Arc<V>,
    phase: Mutex<LoadPhase>,
    reenable: Mutex<Option<JoinHandle<()>>>,
}

impl<A, V> PageController<A, V>
where
    A: DashboardApi + 'static,
    V: PageView + 'static,
{
    pub fn new(api: Arc<A>, view: Arc<V>) -> Self {
        Self {
            api,
            view,
            phase: Mutex::new(LoadPhase::Idle),
            reenable: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> LoadPhase {
        *self.phase.lock().expect("controller state poisoned")
    }

    /// Runs the page-load sequence: lock the input, fetch connection and
    /// model data, render every region from whatever was obtained, then
    /// schedule the input re-enable.
    ///
    /// The fetch/render sequence runs on its own task; a panic escaping it
    /// is caught here, rendered as an error page, and still followed by the
    /// re-enable timer.
    pub async fn initialize(&self, show_loading_page: bool) {
        if !self.view.has_region(Region::Main) {
            tracing::error!("missing main container; skipping page load");
            return;
        }

        self.set_phase(LoadPhase::Loading);
        self.view.set_prompt_enabled(false);
        self.view.set_submit_visible(false);
        if show_loading_page {
            self.view
                .set_fragment(Region::Main, render::LOADING_PAGE.to_string());
        }

        let api = Arc::clone(&self.api);
        let view = Arc::clone(&self.view);
        let sequence = tokio::spawn(async move { load_dashboard(api.as_ref(), view.as_ref()).await });

        match sequence.await {
            Ok(()) => self.set_phase(LoadPhase::Ready),
            Err(err) => {
                tracing::error!(%err, "page load sequence aborted");
                self.view
                    .set_fragment(Region::Main, render::error_page_fragment(&err.to_string()));
                self.set_phase(LoadPhase::Failed);
            }
        }

        self.schedule_reenable();
    }

    /// Chat submission sub-flow: each invocation manages its own region.
    /// Overlapping submissions are not serialized; the last reply to settle
    /// wins the render. The submit control is restored unconditionally and
    /// without the page-load delay gate.
    pub async fn submit_prompt(&self, prompt: &str, model: &str) {
        if !self.view.has_region(Region::Response) {
            tracing::error!("missing response region; skipping chat submission");
            return;
        }

        self.view.set_submit_visible(false);
        self.view.set_response_visible(true);
        self.view
            .set_fragment(Region::Response, render::RESPONSE_LOADING.to_string());

        match self.api.submit_chat(prompt, model).await {
            Ok(reply) => {
                self.view
                    .set_fragment(Region::Response, render::chat_reply_fragment(&reply));
            }
            Err(err) => {
                tracing::error!(%err, "error sending message");
                self.view
                    .set_fragment(Region::Response, render::SEND_ERROR.to_string());
            }
        }

        self.view.set_submit_visible(true);
    }

    fn set_phase(&self, phase: LoadPhase) {
        *self.phase.lock().expect("controller state poisoned") = phase;
    }

    // The re-enable delay is an owned, cancellable task: a repeated trigger
    // replaces the previous timer, and dropping the controller aborts an
    // outstanding one.
    fn schedule_reenable(&self) {
        let mut slot = self.reenable.lock().expect("controller state poisoned");
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        let view = Arc::clone(&self.view);
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(INPUT_REENABLE_DELAY).await;
            view.set_prompt_enabled(true);
            view.set_submit_visible(true);
        }));
    }
}

impl<A, V> Drop for PageController<A, V> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.reenable.lock() {
            if let Some(timer) = slot.take() {
                timer.abort();
            }
        }
    }
}

/// Fetches connection and catalog data (fixed order), then renders the
/// three status regions and rebuilds the picker from the results.
async fn load_dashboard<A: DashboardApi, V: PageView>(api: &A, view: &V) {
    let connection = api.connection_status().await;
    let catalog = api.model_catalog().await;

    apply_fragment(
        view,
        Region::Connection,
        render::connection_fragment(connection.as_ref()),
    );
    apply_fragment(
        view,
        Region::AvailableModels,
        render::available_models_fragment(catalog.as_ref()),
    );
    if !view.set_picker(render::picker_options(catalog.as_ref())) {
        tracing::warn!("model picker not present; skipping option rebuild");
    }
    apply_fragment(
        view,
        Region::ActiveModels,
        render::active_models_fragment(catalog.as_ref()),
    );
}

fn apply_fragment<V: PageView>(view: &V, region: Region, fragment: String) {
    if !view.set_fragment(region, fragment) {
        tracing::warn!(?region, "region not present; skipping render");
    }
}
