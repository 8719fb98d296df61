//! GET /candidates.html — wraps the current render-cache content in the
//! static page shell. The handler never touches the pipeline; it only
//! reads the last published value (or the initial placeholder).

use axum::extract::State;
use axum::response::Html;
use chrono::{DateTime, Local};

use crate::state::AppState;

pub async fn candidates_handler(State(state): State<AppState>) -> Html<String> {
    let content = state.render_cache.load();
    Html(page_shell(&content, Local::now()))
}

/// Timestamp shown in the page header. Reflects when the page was
/// rendered, not when the data was last refreshed.
fn page_timestamp(now: DateTime<Local>) -> String {
    now.format("%A, %d %B %Y %H:%M:%S").to_string()
}

fn page_shell(content: &str, now: DateTime<Local>) -> String {
    format!(
        r#"<html>
    <head>
        <meta charset="UTF-8" />
        <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-9ndCyUaIbzAi2FUVXJi0CjmCapSmO7SnpJef0486qhLnuZ2cdeRhO02iuK6FUUVM" crossorigin="anonymous">
        <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js" integrity="sha384-geWF76RCwLtnZ8qwWowPQNguL3RmwHVBC9FhGdlKrxdiJJigb/j/68SIy3Te4Bkz" crossorigin="anonymous"></script>
        <style>
            pre {{
                white-space: pre-wrap;
            }}
        </style>
    </head>
    <body>
        <div class="container">
            <h1>Candidate Information</h1>
            <h4>{timestamp}</h4>
            <div class="row">
                <div class="col-12 mb-3" style="text-align: right">
                    <button type="button" class="btn btn-light">Toggle Cards</button>
                </div>
            </div>
            {content}
        </div>
        <script>
            [...document.querySelectorAll(".card-header")]
                .forEach(e => e.addEventListener("click", () => e.parentNode.querySelector(".card-body").classList.toggle('d-none')))
            function toggleCards() {{
                [...document.querySelectorAll(".card-body")].forEach(e => e.classList.toggle('d-none'))
            }}
            document.querySelector("button").addEventListener("click", toggleCards)
        </script>
    </body>
</html>
"#,
        timestamp = page_timestamp(now),
        content = content,
    )
}
