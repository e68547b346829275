//! HTML presentation adapter: landing page, encode/decode forms, flash messages.
//!
//! Pages are rendered from plain strings. Every dynamic value passes through
//! [`escape`] before it reaches the markup.

use std::fmt::Write as _;

use crate::endpoint::{EndpointError, FieldViolation, Operation};

/// A one-shot message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    /// Successful operation: bold label followed by the output.
    Success { label: &'static str, output: String },
    /// A classified failure, already formatted for display.
    Error(String),
}

impl Flash {
    /// Turn an endpoint outcome into a flash message.
    ///
    /// Validation failures produce no flash; they are shown next to their
    /// fields instead.
    pub fn from_outcome(op: Operation, outcome: &Result<String, EndpointError>) -> Option<Self> {
        match outcome {
            Ok(output) => Some(Flash::Success {
                label: success_label(op),
                output: output.clone(),
            }),
            Err(err) => {
                let kind = err.kind()?;
                let message = match op {
                    Operation::Encode => err.to_string(),
                    Operation::Decode => format!("{}: {err}", kind.decode_prefix()),
                };
                Some(Flash::Error(message))
            }
        }
    }
}

fn success_label(op: Operation) -> &'static str {
    match op {
        Operation::Encode => "Encode string",
        Operation::Decode => "Decode string",
    }
}

fn title(op: Operation) -> &'static str {
    match op {
        Operation::Encode => "Encode",
        Operation::Decode => "Decode",
    }
}

/// State of an encode or decode form as it is re-rendered.
#[derive(Debug, Clone, Default)]
pub struct FormView<'a> {
    pub value: &'a str,
    pub key: &'a str,
    pub violations: &'a [FieldViolation],
}

/// Render the landing page.
pub fn landing() -> String {
    layout(
        "strcrypt",
        "<p>Encrypt and decrypt short strings with a shared key.</p>\n\
         <ul>\n\
         <li><a href=\"/encode\">Encode a string</a></li>\n\
         <li><a href=\"/decode\">Decode a string</a></li>\n\
         <li><a href=\"/api/key\">Generate a key</a></li>\n\
         </ul>\n",
    )
}

/// Render an encode or decode page with its form and any flash messages.
pub fn form_page(op: Operation, form: &FormView<'_>, flashes: &[Flash]) -> String {
    let mut body = String::new();

    for flash in flashes {
        match flash {
            Flash::Success { label, output } => {
                let _ = writeln!(
                    body,
                    "<div class=\"flash success\"><b>{}</b>: <code>{}</code></div>",
                    label,
                    escape(output)
                );
            }
            Flash::Error(message) => {
                let _ = writeln!(body, "<div class=\"flash errors\">{}</div>", escape(message));
            }
        }
    }

    let _ = writeln!(body, "<form method=\"post\" action=\"/{}\">", op.as_str());
    field(&mut body, "value", "Value", form.value, form.violations);
    field(&mut body, "key", "Key", form.key, form.violations);
    let _ = writeln!(body, "<button type=\"submit\">{}</button>", title(op));
    body.push_str("</form>\n");

    layout(title(op), &body)
}

fn field(
    body: &mut String,
    name: &str,
    label: &str,
    value: &str,
    violations: &[FieldViolation],
) {
    let _ = writeln!(body, "<div class=\"field\">");
    let _ = writeln!(body, "<label for=\"{name}\">{label}</label>");
    let _ = writeln!(
        body,
        "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
        escape(value)
    );
    for v in violations.iter().filter(|v| v.field == name) {
        let _ = writeln!(body, "<ul class=\"field-errors\"><li>{}</li></ul>", escape(v.message));
    }
    body.push_str("</div>\n");
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/encode\">Encode</a> | <a href=\"/decode\">Decode</a></nav>\n\
         <h1>{title}</h1>\n\
         {body}\
         </body>\n\
         </html>\n"
    )
}

/// Escape text for use in HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
