//! Server-rendered HTML for the oracle form.

use std::fmt::Write;

use crate::config::OracleConfig;
use crate::predictor::Candidate;

/// Result message shown above the form.
#[derive(Clone, Debug, PartialEq)]
pub enum Banner {
    Success { word: String, candidates: Vec<Candidate> },
    Warning(String),
    Error(String),
}

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a phrase or click an example!";
pub const CONFUSED_MESSAGE: &str = "The oracle is confused. Try another phrase.";
pub const FAILURE_MESSAGE: &str = "The oracle stumbled. Please try again later.";

const STYLE: &str = r#"
body {
    background: linear-gradient(to bottom, #e6e6fa, #d8bfd8);
    color: #4b0082;
    font-family: 'Garamond', serif;
    overflow-x: hidden;
    margin: 0;
    min-height: 100vh;
}
main { max-width: 46rem; margin: 0 auto; padding: 2rem 1rem; }
aside {
    position: fixed; left: 0; top: 0; width: 14rem; height: 100vh;
    padding: 1.5rem 1rem; background: rgba(249, 240, 255, 0.85);
}
input[type=text] {
    width: 100%; box-sizing: border-box;
    background-color: #f9f0ff; border-radius: 12px; padding: 10px;
    font-size: 18px; font-family: 'Garamond', serif; border: 2px solid #9370db;
}
button {
    background-color: #9370db; color: white; font-size: 18px;
    border: none; border-radius: 12px; padding: 10px 20px; margin: 4px;
    font-weight: bold; transition: transform 0.2s; cursor: pointer;
}
button:hover { transform: scale(1.05); background-color: #7b68ee; }
.examples { display: flex; flex-wrap: wrap; }
.banner { border-radius: 12px; padding: 12px 16px; margin: 1rem 0; font-size: 20px; }
.success { background: #e3f9e5; color: #1e6b2e; }
.warning { background: #fff6d6; color: #7a5b00; }
.error { background: #fde2e2; color: #8a1c1c; }
.candidates { font-size: 15px; margin-top: 6px; }
.floating-words {
    position: fixed; top: -50px; font-size: 18px; font-weight: bold;
    color: #8a2be2; animation: float 15s linear infinite; opacity: 0.7;
    pointer-events: none;
}
@keyframes float {
    0% {transform: translateY(0) rotate(0deg);}
    50% {transform: translateY(600px) rotate(15deg);}
    100% {transform: translateY(-100px) rotate(-10deg);}
}
"#;

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_banner(out: &mut String, banner: &Banner) {
    match banner {
        Banner::Success { word, candidates } => {
            let _ = write!(
                out,
                r#"<div class="banner success">&#128220; Next word: <strong>{}</strong>"#,
                escape_html(word)
            );
            if candidates.len() > 1 {
                out.push_str(r#"<div class="candidates">Also considered: "#);
                let listed: Vec<String> = candidates
                    .iter()
                    .filter(|c| &c.word != word)
                    .map(|c| format!("{} ({:.1}%)", escape_html(&c.word), c.probability * 100.0))
                    .collect();
                out.push_str(&listed.join(", "));
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        Banner::Warning(msg) => {
            let _ = write!(out, r#"<div class="banner warning">&#9888;&#65039; {}</div>"#, escape_html(msg));
        }
        Banner::Error(msg) => {
            let _ = write!(out, r#"<div class="banner error">&#128565; {}</div>"#, escape_html(msg));
        }
    }
}

/// Full page: title, example buttons, the text box holding `text`, and
/// an optional banner with the last outcome.
pub fn render_page(config: &OracleConfig, text: &str, banner: Option<&Banner>) -> String {
    let title = escape_html(&config.title);
    let mut out = String::with_capacity(8 * 1024);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>&#128220; {title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
    );

    out.push_str("<aside>\n<h3>&#129497; About This Oracle</h3>\n<p>This LSTM predicts <strong>the next word</strong> in Shakespeare's Hamlet.</p>\n<ul><li>Trained on <code>Hamlet.txt</code> (1599)</li><li>Uses word embeddings &amp; sequence padding</li></ul>\n</aside>\n");

    let _ = write!(
        out,
        "<main>\n<h1>&#128220; {title}</h1>\n\
         <h3>Predict the next word in Shakespeare's words&hellip; select an example or type your own!</h3>\n"
    );

    out.push_str("<form method=\"post\" action=\"/\">\n<h3>&#127917; Example Phrases</h3>\n<div class=\"examples\">\n");
    for example in &config.examples {
        let escaped = escape_html(example);
        let _ = writeln!(out, r#"<button type="submit" name="example" value="{escaped}">{escaped}</button>"#);
    }
    out.push_str("</div>\n");

    let _ = write!(
        out,
        "<p><label for=\"text\">Enter your phrase:</label></p>\n\
         <input type=\"text\" id=\"text\" name=\"text\" value=\"{}\" autocomplete=\"off\">\n\
         <p><button type=\"submit\" name=\"action\" value=\"predict\">&#128302; Predict Next Word</button></p>\n\
         </form>\n",
        escape_html(text)
    );

    if let Some(banner) = banner {
        render_banner(&mut out, banner);
    }
    out.push_str("</main>\n");

    for (i, word) in config.floating_words.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<div class="floating-words" style="left:{}vw;">{}</div>"#,
            20 + i * 15,
            escape_html(word)
        );
    }

    out.push_str("</body>\n</html>\n");
    out
}
