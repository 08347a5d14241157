use yew::prelude::*;

/// Renders the application header with the backend status badge.
pub fn render_header(server_online: Option<bool>) -> Html {
    let (class, label) = match server_online {
        Some(true) => ("status-online", "Server online"),
        Some(false) => ("status-offline", "Server offline"),
        None => ("status-pending", "Connecting..."),
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-video"></i> {" Anomaly Monitor"}</h1>
            <p class="subtitle">{"Live camera classification and on-demand analysis of recordings"}</p>
            <span class={classes!("server-status", class)}>{ label }</span>
        </header>
    }
}
