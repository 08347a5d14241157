use js_sys::Date;
use shared::{ClassLabel, LiveClassification};
use wasm_bindgen::JsValue;
use yew::prelude::*;

/// HLS playlist written by the camera recorder, served from the segment directory.
pub const LIVE_STREAM_URL: &str = "/stream/index.m3u8";

fn render_stream() -> Html {
    html! {
        <video
            class="live-stream"
            src={LIVE_STREAM_URL}
            autoplay=true
            muted=true
            playsinline=true
            controls=true
        ></video>
    }
}

pub fn render_live_panel(live: Option<&LiveClassification>) -> Html {
    let Some(live) = live else {
        return html! {
            <section class="live-panel">
                <h2><i class="fa-solid fa-satellite-dish"></i>{" Live feed"}</h2>
                { render_stream() }
                <p class="live-waiting">{"Waiting for the camera feed..."}</p>
            </section>
        };
    };

    let confidence = live.confidence * 100.0;
    let state = if live.result == ClassLabel::NormalVideos {
        "live-normal"
    } else {
        "live-anomaly"
    };

    html! {
        <section class={classes!("live-panel", state)}>
            <h2><i class="fa-solid fa-satellite-dish"></i>{" Live feed"}</h2>
            { render_stream() }
            <div class="live-label">{ live.result.to_string() }</div>
            <div class="confidence-meter">
                <div class="meter-label">{"Confidence:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                </div>
                <div class="meter-value">{format!("{:.1}%", confidence)}</div>
            </div>
            <p class="live-updated">{ format!("Updated {}", format_timestamp(live.timestamp)) }</p>
        </section>
    }
}

fn format_timestamp(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "never".to_string();
    }
    let date = Date::new(&JsValue::from_f64(seconds * 1000.0));
    String::from(date.to_locale_time_string("default"))
}
