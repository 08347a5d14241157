mod api;
mod components;

use components::handlers;
use components::header::render_header;
use components::live_panel::render_live_panel;
use components::results::render_result;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Interval;
use shared::{ClassifyResponse, LiveClassification};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

/// Matches the server's live polling interval.
const LIVE_POLL_MS: u32 = 2000;

pub enum Msg {
    // Upload
    FileSelected(GlooFile),
    ClearFile,
    Classify,
    ClassifyResult(ClassifyResponse),

    // Live feed
    PollLive,
    LiveUpdated(LiveClassification),
    HealthChecked(bool),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct SelectedFile {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

impl SelectedFile {
    pub fn is_video(&self) -> bool {
        self.file.raw_mime_type().starts_with("video/")
    }
}

pub struct Model {
    pub selected: Option<SelectedFile>,
    pub result: Option<ClassifyResponse>,
    pub live: Option<LiveClassification>,
    pub server_online: Option<bool>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_dragging: bool,
    _paste_listener: Option<EventListener>,
    _live_interval: Interval,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let paste_listener = web_sys::window().map(|window| {
            EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            })
        });

        let link = ctx.link().clone();
        let live_interval = Interval::new(LIVE_POLL_MS, move || link.send_message(Msg::PollLive));

        ctx.link().send_message(Msg::PollLive);
        ctx.link().send_future(async { Msg::HealthChecked(api::check_health().await) });

        Self {
            selected: None,
            result: None,
            live: None,
            server_online: None,
            loading: false,
            error: None,
            is_dragging: false,
            _paste_listener: paste_listener,
            _live_interval: live_interval,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::ClearFile => handlers::handle_clear_file(self),
            Msg::Classify => handlers::handle_classify(self, ctx),
            Msg::ClassifyResult(response) => {
                self.result = Some(response);
                self.loading = false;
                true
            }

            Msg::PollLive => {
                handlers::poll_live(ctx);
                false
            }
            Msg::LiveUpdated(live) => {
                let changed = self.live.as_ref() != Some(&live);
                self.live = Some(live);
                self.server_online = Some(true);
                changed
            }
            Msg::HealthChecked(online) => {
                self.server_online = Some(online);
                true
            }

            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header(self.server_online) }

                <main class="main-content">
                    { render_live_panel(self.live.as_ref()) }
                    <section class="upload-panel">
                        <h2><i class="fa-solid fa-film"></i>{" Classify a recording"}</h2>
                        { render_upload_section(self, ctx) }
                        { render_error_message(self) }
                        { render_result(self) }
                    </section>
                </main>

                <footer class="app-footer">
                    <p>{"Anomaly Monitor | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
