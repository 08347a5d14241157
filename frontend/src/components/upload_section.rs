use super::super::{Model, Msg};
use super::utils::{debounce, first_media_file};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_selected_file(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_media_file);
        input.set_value("");

        match file {
            Some(file) => Msg::FileSelected(file),
            None => Msg::SetError(Some("No valid image or video file selected.".into())),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"));
        if let Some(html_input) = input.and_then(|i| i.dyn_into::<web_sys::HtmlElement>().ok()) {
            html_input.click();
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*,video/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an image or video here, paste, or click"}</p>
                    <p class="file-types">{"Videos: MP4, AVI, MOV, MKV. Images: JPG, PNG, BMP"}</p>
                </div>
            </div>
        </>
    }
}

fn render_selected_file(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(selected) = &model.selected else {
        return html! {};
    };

    let link = ctx.link();
    let preview = if selected.is_video() {
        html! { <video class="preview" src={selected.preview_url.to_string()} controls=true muted=true></video> }
    } else {
        html! { <img class="preview" src={selected.preview_url.to_string()} alt={selected.file.name()} /> }
    };

    html! {
        <div class="preview-area">
            { preview }
            <p class="preview-filename">{ selected.file.name() }</p>
            <div class="preview-actions">
                <button
                    class="analyze-btn"
                    disabled={model.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Classify)
                    })}
                >
                    <i class="fa-solid fa-magnifying-glass"></i>{" Classify"}
                </button>
                <button
                    class="clear-btn"
                    disabled={model.loading}
                    onclick={link.callback(|_| Msg::ClearFile)}
                >
                    <i class="fa-solid fa-xmark"></i>{" Clear"}
                </button>
            </div>
        </div>
    }
}
