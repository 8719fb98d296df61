//! HTML rendering for candidate records: one collapsible Bootstrap card
//! per document, question/answer pairs in asked order. Pure and
//! deterministic — identical input always yields identical bytes.

use crate::extraction::pipeline::CandidateInfo;

/// Renders the full card list fragment served inside the page shell.
/// Model output and file names are escaped before interpolation.
pub fn render_candidate_infos(candidate_infos: &[CandidateInfo]) -> String {
    let mut html = String::new();
    for candidate_info in candidate_infos {
        let mut qa_html = String::new();
        for qa in &candidate_info.questions {
            qa_html.push_str(&format!(
                r#"
<h5 class="card-title">{question}</h5>
<p class="card-text"><pre style="background-color: #f6f8fa; padding: 1em">{answer}</pre></p>
"#,
                question = escape_html(&qa.question),
                answer = escape_html(&qa.answer),
            ));
        }
        html.push_str(&format!(
            r#"
<div class="card">
  <div class="card-header" style="cursor: pointer">
    {candidate_file}
  </div>
  <div class="card-body mb-3">
    {qa_html}
  </div>
</div>
"#,
            candidate_file = escape_html(&candidate_info.candidate_file),
        ));
    }
    html
}

/// Minimal HTML entity escaping for text interpolated into markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
