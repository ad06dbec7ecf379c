//! HTML rendering
//!
//! Plain `format!` templates; every dynamic value goes through [`escape`].

use std::fmt::Write;

/// Escape text for element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// WIDGETS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Closed set of options
    Select { options: &'static [&'static str] },
    /// Number input; bounds are enforced in the browser and on submit
    Number { min: f64, max: Option<f64>, step: f64 },
    /// Free text
    Text,
}

/// One input of a form, named after the API's wire field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    /// Current value as it should appear in the input
    pub value: String,
}

impl Field {
    pub fn select(name: &'static str, label: &'static str, options: &'static [&'static str], value: &str) -> Self {
        Self { name, label, widget: Widget::Select { options }, value: value.to_string() }
    }

    pub fn number(name: &'static str, label: &'static str, min: f64, max: Option<f64>, step: f64, value: impl ToString) -> Self {
        Self { name, label, widget: Widget::Number { min, max, step }, value: value.to_string() }
    }

    pub fn text(name: &'static str, label: &'static str, value: &str) -> Self {
        Self { name, label, widget: Widget::Text, value: value.to_string() }
    }

    fn render(&self, out: &mut String) {
        let name = escape(self.name);
        let _ = writeln!(out, "<label for=\"{name}\">{}</label>", escape(self.label));

        match &self.widget {
            Widget::Select { options } => {
                let _ = writeln!(out, "<select id=\"{name}\" name=\"{name}\">");
                for option in options.iter() {
                    let selected = if *option == self.value { " selected" } else { "" };
                    let option = escape(option);
                    let _ = writeln!(out, "  <option value=\"{option}\"{selected}>{option}</option>");
                }
                out.push_str("</select>\n");
            }
            Widget::Number { min, max, step } => {
                let max = max.map(|m| format!(" max=\"{}\"", m)).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\"{max} step=\"{step}\" value=\"{}\" required>",
                    escape(&self.value)
                );
            }
            Widget::Text => {
                let _ = writeln!(
                    out,
                    "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\" required>",
                    escape(&self.value)
                );
            }
        }
    }
}

// ============================================================================
// PAGES
// ============================================================================

/// Result banner under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

const STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.8rem;font-weight:600}\
input,select{width:100%;padding:.4rem;box-sizing:border-box}\
button{margin-top:1.2rem;padding:.6rem 1.2rem}\
.success{background:#e6f4ea;border:1px solid #34a853;padding:.8rem;margin-top:1rem}\
.error{background:#fce8e6;border:1px solid #d93025;padding:.8rem;margin-top:1rem}\
footer{margin-top:2rem;color:#777;font-size:.85rem}";

/// Full HTML document
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n\
<footer><a href=\"/\">All forms</a></footer>\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

/// Form page with an optional result banner
pub fn form_page(title: &str, intro: &str, action: &str, fields: &[Field], outcome: Option<&Outcome>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>\n<p>{}</p>", escape(title), escape(intro));
    let _ = writeln!(body, "<form method=\"post\" action=\"{}\">", escape(action));
    for field in fields {
        field.render(&mut body);
    }
    body.push_str("<button type=\"submit\">🔍 Predict</button>\n</form>\n");

    match outcome {
        Some(Outcome::Success(message)) => {
            let _ = writeln!(body, "<div class=\"success\">{}</div>", escape(message));
        }
        Some(Outcome::Failure(message)) => {
            let _ = writeln!(body, "<div class=\"error\">{}</div>", escape(message));
        }
        None => {}
    }

    page(title, &body)
}

/// Landing page linking every form
pub fn index_page(links: &[(&str, &str)]) -> String {
    let mut body = String::from("<h1>Prediction Services</h1>\n<ul>\n");
    for (path, title) in links {
        let _ = writeln!(body, "  <li><a href=\"{}\">{}</a></li>", escape(path), escape(title));
    }
    body.push_str("</ul>\n");
    page("Prediction Services", &body)
}
