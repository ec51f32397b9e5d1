//! Browser dashboard: a small HTML page over a JSON API driving the console

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::console::{Console, SubmitReport};
use crate::form::Field;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub console: Arc<Console>,
}

/// Body of a form field edit
#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    pub value: String,
}

/// Build the dashboard axum router
pub fn build_router(console: Arc<Console>) -> Router {
    let dashboard_state = DashboardState { console };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/form/{field}", put(edit_handler))
        .route("/api/submit", post(submit_handler))
        .route("/api/notification", delete(dismiss_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn view_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.console.view().await)
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> Response {
    let started = dashboard.console.refresh().await;
    let view = dashboard.console.view().await;
    let status = if started {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    (status, Json(view)).into_response()
}

async fn edit_handler(
    State(dashboard): State<DashboardState>,
    Path(field): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> Response {
    let field: Field = match field.parse() {
        Ok(field) => field,
        Err(e) => {
            tracing::debug!("Rejected edit: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    dashboard.console.edit(field, &edit.value).await;
    Json(dashboard.console.view().await).into_response()
}

async fn submit_handler(State(dashboard): State<DashboardState>) -> Response {
    let report = dashboard.console.submit().await;
    let status = match &report {
        SubmitReport::Sent => StatusCode::OK,
        SubmitReport::Failed { .. } => StatusCode::BAD_GATEWAY,
        SubmitReport::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitReport::Busy => StatusCode::CONFLICT,
    };
    (status, Json(report)).into_response()
}

async fn dismiss_handler(State(dashboard): State<DashboardState>) -> StatusCode {
    dashboard.console.dismiss_notification();
    StatusCode::NO_CONTENT
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Diameter Traffic Simulator</title>
    <script>
        const FIELDS = [
            ['imsi', 'IMSI (International Mobile Subscriber Identity)'],
            ['plmnId', 'PLMN ID (Hexadecimal)'],
            ['ratType', 'RAT Type'],
            ['ulrFlags', 'ULR Flags'],
        ];

        function el(tag, style, text) {
            const node = document.createElement(tag);
            if (style) node.style.cssText = style;
            if (text !== undefined) node.textContent = text;
            return node;
        }

        function renderCards(view) {
            const cards = view.cards.map(c => {
                const section = el('section', 'border: 1px solid #dee2e6; padding: 1rem; margin-bottom: 1rem;');
                section.appendChild(el('h2', '', c.title));
                if (c.loading) {
                    section.appendChild(el('span', '', 'Loading status...'));
                } else if (c.error) {
                    section.appendChild(el('span', 'color: #721c24;', c.error));
                } else {
                    const running = c.status && c.status.isRunning;
                    const [color, bg] = running ? ['#155724', '#d4edda'] : ['#721c24', '#f8d7da'];
                    const message = c.status ? c.status.message : 'Status unknown';
                    section.appendChild(el('span',
                        `padding: 0.25em 0.6em; border-radius: 0.25rem; color: ${color}; background-color: ${bg};`,
                        message));
                    if (c.status && c.status.details) section.appendChild(el('div', '', c.status.details));
                }
                return section;
            });
            document.getElementById('cards').replaceChildren(...cards);
            document.getElementById('refresh').disabled = !view.refresh_enabled;
        }

        function renderForm(view) {
            const form = document.getElementById('form');
            if (!form.dataset.ready) {
                form.innerHTML = FIELDS.map(([name, label]) => `
                    <label style="display: block; margin-top: 0.5rem;">${label}
                        <input id="f-${name}" style="display: block; width: 100%;" onchange="edit('${name}', this.value)">
                    </label>
                    <div id="e-${name}" style="color: #721c24; font-size: 0.85em;"></div>`).join('');
                form.dataset.ready = '1';
            }
            for (const [name] of FIELDS) {
                const input = document.getElementById(`f-${name}`);
                if (document.activeElement !== input) input.value = view.form.values[name];
                document.getElementById(`e-${name}`).textContent = view.form.errors[name] || '';
            }
            document.getElementById('send').disabled = view.form.submitting;
        }

        function renderToast(view) {
            const toast = document.getElementById('toast');
            const n = view.notification;
            if (!n) { toast.style.display = 'none'; return; }
            toast.style.display = 'block';
            toast.style.backgroundColor = n.kind === 'success' ? '#d4edda' : '#f8d7da';
            document.getElementById('toast-message').textContent = n.message;
        }

        function render(view) { renderCards(view); renderForm(view); renderToast(view); }
        function load() { fetch('/api/view').then(r => r.json()).then(render); }
        function refresh() { fetch('/api/refresh', { method: 'POST' }).then(load); }
        // Edits and sends are serialized so a send never overtakes an edit
        let pending = Promise.resolve();
        function edit(name, value) {
            pending = pending.then(() => fetch(`/api/form/${name}`, {
                method: 'PUT',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ value }),
            })).then(load, load);
        }
        function send() {
            const active = document.activeElement;
            if (active && active.id && active.id.startsWith('f-')) {
                edit(active.id.slice(2), active.value);
            }
            pending = pending.then(() => fetch('/api/submit', { method: 'POST' })).then(load, load);
        }
        function dismiss() { fetch('/api/notification', { method: 'DELETE' }).then(load); }

        window.addEventListener('load', load);
        setInterval(load, 1000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Diameter Traffic Simulator</h1>
    <div id="cards"></div>
    <button id="refresh" onclick="refresh()">Refresh Status</button>
    <section style="margin-top: 1rem;">
        <h2>Send Update Location Request (ULR)</h2>
        <div id="form"></div>
        <button id="send" style="margin-top: 1rem;" onclick="send()">Send ULR</button>
    </section>
    <div id="toast" style="display: none; position: fixed; top: 1rem; right: 1rem; padding: 1rem; border-radius: 0.5rem;">
        <span id="toast-message"></span>
        <button onclick="dismiss()">&times;</button>
    </div>
</body>
</html>"#;
