use super::super::Model;
use shared::{ClassLabel, UNABLE_TO_CLASSIFY};
use std::str::FromStr;
use yew::prelude::*;

pub fn render_result(model: &Model) -> Html {
    if model.loading {
        return html! {
            <div class="loading">
                <i class="fa-solid fa-spinner fa-spin"></i>{" Classifying..."}
            </div>
        };
    }

    let Some(response) = &model.result else {
        return html! {};
    };

    let filename = model
        .selected
        .as_ref()
        .map_or_else(|| "Uploaded file".to_string(), |s| s.file.name());

    let (class, icon, headline) = if response.result == UNABLE_TO_CLASSIFY {
        ("result-unknown", "fa-circle-question", "Unable to classify".to_string())
    } else {
        match ClassLabel::from_str(&response.result) {
            Ok(label) if label.is_normal() => {
                ("result-normal", "fa-circle-check", label.to_string())
            }
            Ok(label) => ("result-anomaly", "fa-triangle-exclamation", label.to_string()),
            Err(_) => ("result-unknown", "fa-circle-question", response.result.clone()),
        }
    };

    html! {
        <div class={classes!("results-container", class)}>
            <div class="result-header">
                <h2 title={format!("Classification for: {}", filename)}>
                    <i class={classes!("fa-solid", icon)}></i>
                    {" "}{ headline }
                    <span class="analyzed-filename-display">{format!("({})", filename)}</span>
                </h2>
            </div>
        </div>
    }
}
