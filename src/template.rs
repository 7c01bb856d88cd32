//! A small template-substitution engine for plain-text sheets.
//!
//! Syntax:
//!
//! - `{field}` inserts a value; `{field:<28}`, `{field:>4}` and
//!   `{field:^10}` pad it to a width. A bare width pads text on the right
//!   and numbers on the left.
//! - `{#name}...{/name}` renders its body once per element of a list, once
//!   for any other truthy value, and not at all for `null`, `false`, `""`,
//!   `[]` or a missing field.
//!
//! Lookups search the innermost section element first and fall back to
//! enclosing scopes, so `{name}` inside `{#skills}` is the skill's name and
//! outside it the character's. Missing fields render as nothing.

use crate::error::{Result, SheetError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Format {
    align: Option<Align>,
    width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Field { name: String, format: Option<Format> },
    Section { name: String, body: Vec<Node> },
}

/// A parsed template, reusable across renders.
///
/// # Examples
///
/// ```rust
/// use chargen::Template;
/// use serde_json::json;
///
/// let template = Template::parse("{title}:{#items} {name:<6}|{/items}").unwrap();
/// let text = template
///     .render(&json!({"title": "Gear", "items": [{"name": "rope"}, {"name": "lamp"}]}))
///     .unwrap();
/// assert_eq!(text, "Gear: rope  | lamp  |");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text.
    ///
    /// # Errors
    ///
    /// [`SheetError::Template`] for an unterminated tag, a section closed
    /// with the wrong name, an unclosed section or a bad format spec.
    pub fn parse(source: &str) -> Result<Self> {
        let mut stack: Vec<(String, Vec<Node>)> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                current.push(Node::Text(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| SheetError::Template(format!("unterminated tag at {:?}", truncate(&rest[open..]))))?;
            let tag = after[..close].trim();
            rest = &after[close + 1..];

            if let Some(name) = tag.strip_prefix('#') {
                stack.push((name.trim().to_string(), std::mem::take(&mut current)));
            } else if let Some(name) = tag.strip_prefix('/') {
                let name = name.trim();
                let (open_name, parent) = stack.pop().ok_or_else(|| {
                    SheetError::Template(format!("closing {{/{name}}} without an open section"))
                })?;
                if open_name != name {
                    return Err(SheetError::Template(format!(
                        "section {{#{open_name}}} closed by {{/{name}}}"
                    )));
                }
                let body = std::mem::replace(&mut current, parent);
                current.push(Node::Section { name: open_name, body });
            } else {
                current.push(Self::parse_field(tag)?);
            }
        }
        if !rest.is_empty() {
            current.push(Node::Text(rest.to_string()));
        }
        if let Some((name, _)) = stack.pop() {
            return Err(SheetError::Template(format!("section {{#{name}}} is never closed")));
        }
        Ok(Self { nodes: current })
    }

    fn parse_field(tag: &str) -> Result<Node> {
        let (name, spec) = match tag.split_once(':') {
            Some((name, spec)) => (name.trim(), Some(spec.trim())),
            None => (tag, None),
        };
        if name.is_empty() {
            return Err(SheetError::Template("empty field name".to_string()));
        }
        let format = spec.map(Self::parse_format).transpose()?;
        Ok(Node::Field {
            name: name.to_string(),
            format,
        })
    }

    fn parse_format(spec: &str) -> Result<Format> {
        let (align, digits) = match spec.chars().next() {
            Some('<') => (Some(Align::Left), &spec[1..]),
            Some('>') => (Some(Align::Right), &spec[1..]),
            Some('^') => (Some(Align::Center), &spec[1..]),
            _ => (None, spec),
        };
        let width = digits
            .parse()
            .map_err(|_| SheetError::Template(format!("bad format spec {spec:?}")))?;
        Ok(Format { align, width })
    }

    /// Render against a JSON context.
    pub fn render(&self, context: &Value) -> Result<String> {
        let mut out = String::new();
        let mut scopes = vec![context];
        render_nodes(&self.nodes, &mut scopes, &mut out);
        Ok(out)
    }
}

/// Parse and render in one step.
pub fn render(source: &str, context: &Value) -> Result<String> {
    Template::parse(source)?.render(context)
}

fn truncate(s: &str) -> String {
    s.chars().take(20).collect()
}

fn lookup<'a>(scopes: &[&'a Value], name: &str) -> Option<&'a Value> {
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.as_object().and_then(|obj| obj.get(name)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}

fn render_nodes<'a>(nodes: &[Node], scopes: &mut Vec<&'a Value>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field { name, format } => {
                let value = lookup(scopes, name);
                let text = match value {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                };
                match format {
                    Some(format) => {
                        let numeric = matches!(value, Some(Value::Number(_)));
                        out.push_str(&pad(&text, format, numeric));
                    }
                    None => out.push_str(&text),
                }
            }
            Node::Section { name, body } => match lookup(scopes, name) {
                Some(Value::Array(items)) => {
                    for item in items {
                        scopes.push(item);
                        render_nodes(body, scopes, out);
                        scopes.pop();
                    }
                }
                Some(value) if is_truthy(value) => {
                    scopes.push(value);
                    render_nodes(body, scopes, out);
                    scopes.pop();
                }
                _ => {}
            },
        }
    }
}

fn pad(text: &str, format: &Format, numeric: bool) -> String {
    let len = text.chars().count();
    if len >= format.width {
        return text.to_string();
    }
    let fill = format.width - len;
    let align = format
        .align
        .unwrap_or(if numeric { Align::Right } else { Align::Left });
    match align {
        Align::Left => format!("{text}{}", " ".repeat(fill)),
        Align::Right => format!("{}{text}", " ".repeat(fill)),
        Align::Center => {
            let left = fill / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
        }
    }
}
