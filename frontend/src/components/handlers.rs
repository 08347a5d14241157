use super::super::{Model, Msg, SelectedFile};
use super::utils::first_media_file;
use crate::api;
use gloo_console::error;
use gloo_file::{File as GlooFile, ObjectUrl};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, file: GlooFile) -> bool {
    let preview_url = ObjectUrl::from(file.clone());
    model.selected = Some(SelectedFile { file, preview_url });
    model.result = None;
    model.error = None;
    true
}

pub fn handle_clear_file(model: &mut Model) -> bool {
    if model.selected.take().is_none() {
        return false;
    }
    model.result = None;
    model.error = None;
    true
}

pub fn handle_classify(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(file) = model.selected.as_ref().map(|s| s.file.clone()) else {
        ctx.link()
            .send_message(Msg::SetError(Some("No file selected for analysis.".into())));
        return false;
    };

    model.loading = true;
    model.error = None;
    model.result = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::classify(&file).await {
            Ok(response) => link.send_message(Msg::ClassifyResult(response)),
            Err(e) => {
                error!(format!("Classification failed: {}", e));
                link.send_message(Msg::SetError(Some(e)))
            }
        }
    });

    true
}

pub fn poll_live(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_live().await {
            Ok(live) => link.send_message(Msg::LiveUpdated(live)),
            Err(e) => {
                log::warn!("Live classification unavailable: {}", e);
                link.send_message(Msg::HealthChecked(false));
            }
        }
    });
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|data| data.files()) {
        process_file_list(ctx, &file_list);
    }

    true
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    let Some(file_list) = event.clipboard_data().and_then(|data| data.files()) else {
        return false;
    };
    if file_list.length() == 0 {
        return false;
    }
    event.prevent_default();
    process_file_list(ctx, &file_list);
    false
}

fn process_file_list(ctx: &Context<Model>, file_list: &FileList) {
    match first_media_file(file_list) {
        Some(file) => ctx.link().send_message(Msg::FileSelected(file)),
        None => {
            log::warn!("No image or video in {} dropped file(s)", file_list.length());
            ctx.link().send_message(Msg::SetError(Some(
                "Only image and video files can be classified.".into(),
            )));
        }
    }
}
