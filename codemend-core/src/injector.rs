//! Logger injection for files rewritten by the debug-log pass.
//!
//! The injector never looks at the logger implementation. It only checks the
//! original file text for three presence markers and, when none is found,
//! adds one import line and one field declaration.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::config::DebugLogConfig;

/// Substrings meaning the file already references the logger.
pub const LOGGER_MARKERS: [&str; 3] = ["import { Logger }", "private logger", "this.logger"];

static CLASS_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?P<indent>[ \t]*)(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)",
    )
    .expect("class head pattern is valid")
});

/// Byte offset just past the `{` opening the class body that follows a class
/// head ending at `from`. Braces inside `<...>` type parameters or type
/// literals in the heritage clause do not count; the header may span lines.
fn class_body_open(text: &str, from: usize) -> Option<usize> {
    let mut angle = 0usize;
    let mut type_braces = 0usize;
    let mut prev = '\0';

    for (offset, c) in text[from..].char_indices() {
        match c {
            '<' => angle += 1,
            '>' if prev != '=' && angle > 0 => angle -= 1,
            '{' if angle > 0 || type_braces > 0 => type_braces += 1,
            '{' => return Some(from + offset + c.len_utf8()),
            '}' if type_braces > 0 => type_braces -= 1,
            '}' => return None,
            ';' if angle == 0 && type_braces == 0 => return None,
            _ => {}
        }
        prev = c;
    }
    None
}

#[derive(Serialize)]
struct FieldContext<'a> {
    class: &'a str,
}

/// What an injection actually inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub text: String,
    pub import_added: bool,
    pub field_added: bool,
}

#[derive(Debug, Clone)]
pub struct Injector {
    import_text: String,
    field_template: String,
}

impl Injector {
    pub fn new(import_text: impl Into<String>, field_template: impl Into<String>) -> Self {
        Self {
            import_text: import_text.into(),
            field_template: field_template.into(),
        }
    }

    pub fn from_config(config: &DebugLogConfig) -> Self {
        Self::new(config.logger_import.clone(), config.logger_field.clone())
    }

    /// True when none of the presence markers occurs in `original`.
    pub fn needs_injection(&self, original: &str) -> bool {
        !LOGGER_MARKERS.iter().any(|marker| original.contains(marker))
    }

    /// Inserts the import after the import block and the field after the first
    /// class brace.
    pub fn inject(&self, text: &str) -> Injection {
        let with_import = insert_after_imports(text, &self.import_text);

        let located = CLASS_HEAD.captures_iter(&with_import).find_map(|caps| {
            let head = caps.get(0)?;
            let name = caps.name("name")?;
            let body = class_body_open(&with_import, head.end())?;
            let indent = caps.name("indent").map_or("", |m| m.as_str());
            Some((body, name.as_str(), indent))
        });
        let Some((body, name, indent)) = located else {
            warn!("No class declaration found; added the logger import only.");
            return Injection {
                text: with_import,
                import_added: true,
                field_added: false,
            };
        };
        let field = self.render_field(name);
        debug!("Injecting logger field into class '{}'.", name);

        let mut out = String::with_capacity(with_import.len() + field.len() + 8);
        out.push_str(&with_import[..body]);
        out.push('\n');
        out.push_str(indent);
        out.push_str("  ");
        out.push_str(&field);
        out.push_str(&with_import[body..]);

        Injection {
            text: out,
            import_added: true,
            field_added: true,
        }
    }

    fn render_field(&self, class_name: &str) -> String {
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        let rendered = tt
            .add_template("field", &self.field_template)
            .and_then(|_| tt.render("field", &FieldContext { class: class_name }));
        match rendered {
            Ok(field) => field,
            Err(e) => {
                debug!("Field template is not a tinytemplate ({}); substituting literally.", e);
                self.field_template.replace("{class}", class_name)
            }
        }
    }
}

/// Byte offset just past the last statement of the leading import block.
fn import_block_end(text: &str) -> Option<usize> {
    let mut offset = 0usize;
    let mut block_end = None;
    let mut in_import = false;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let line_end = offset + line.len();
        offset = line_end;

        if in_import {
            if ends_import(trimmed) {
                in_import = false;
                block_end = Some(line_end);
            }
            continue;
        }
        if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
            if ends_import(trimmed) {
                block_end = Some(line_end);
            } else {
                in_import = true;
            }
            continue;
        }
        let preamble = trimmed.is_empty()
            || trimmed.starts_with("//")
            || trimmed.starts_with("/*")
            || trimmed.starts_with('*')
            || trimmed.starts_with("'use strict'")
            || trimmed.starts_with("\"use strict\"");
        if !preamble {
            break;
        }
    }
    block_end
}

fn ends_import(trimmed: &str) -> bool {
    trimmed.ends_with(';')
        || trimmed.contains(" from '")
        || trimmed.contains(" from \"")
        || trimmed.starts_with("import '")
        || trimmed.starts_with("import \"")
}

fn insert_after_imports(text: &str, import_line: &str) -> String {
    let mut out = String::with_capacity(text.len() + import_line.len() + 2);
    match import_block_end(text) {
        Some(end) => {
            out.push_str(&text[..end]);
            if !text[..end].ends_with('\n') {
                out.push('\n');
            }
            out.push_str(import_line);
            out.push('\n');
            out.push_str(&text[end..]);
        }
        None => {
            out.push_str(import_line);
            out.push('\n');
            out.push_str(text);
        }
    }
    out
}
