//! YAML 1.1 document loading.
//!
//! Kubernetes reads manifests with YAML 1.1 scalar rules: a plain `0644` is
//! the integer 420, a plain `yes` is `true`, `0x1F` is 31. serde_yaml follows
//! YAML 1.2 and would keep such scalars as strings, which then get quoted on
//! output and change meaning. This loader drives the yaml-rust2 event parser,
//! which reports each scalar's style, and resolves plain scalars the YAML 1.1
//! way into a [`serde_yaml::Value`]. Quoted and block scalars stay strings.

use std::collections::HashMap;

use serde_yaml::{Mapping, Number, Value};
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use crate::error::YamlError;

const CORE_TAG_HANDLES: &[&str] = &["!!", "tag:yaml.org,2002:"];

/// Load a single YAML document. An empty document loads as [`Value::Null`].
pub fn load_document(doc: &str) -> Result<Value, YamlError> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(doc).load(&mut builder, true)?;
    builder.finish()
}

// ---------------------------------------------------------------------------
// Event → Value
// ---------------------------------------------------------------------------

enum Frame {
    Sequence { items: Vec<Value>, anchor: usize },
    Mapping { fields: Mapping, key: Option<Value>, anchor: usize },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    roots: Vec<Value>,
    anchors: HashMap<usize, Value>,
    unknown_anchor: bool,
}

impl TreeBuilder {
    fn finish(mut self) -> Result<Value, YamlError> {
        if self.unknown_anchor {
            return Err(YamlError::UnknownAnchor);
        }
        match self.roots.len() {
            0 => Ok(Value::Null),
            1 => Ok(self.roots.remove(0)),
            n => Err(YamlError::MultipleDocuments(n)),
        }
    }

    fn remember(&mut self, anchor: usize, value: &Value) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
    }

    fn push_node(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.roots.push(value),
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping { fields, key, .. }) => match key.take() {
                None => *key = Some(value),
                Some(k) => {
                    fields.insert(k, value);
                }
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                let core_suffix = tag
                    .as_ref()
                    .filter(|t| CORE_TAG_HANDLES.contains(&t.handle.as_str()))
                    .map(|t| t.suffix.as_str());
                let value = if style != TScalarStyle::Plain || core_suffix == Some("str") {
                    Value::String(text)
                } else {
                    resolve_plain(&text)
                };
                self.remember(anchor, &value);
                self.push_node(value);
            }
            Event::SequenceStart(anchor, _) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                anchor,
            }),
            Event::MappingStart(anchor, _) => self.stack.push(Frame::Mapping {
                fields: Mapping::new(),
                key: None,
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                let (value, anchor) = match self.stack.pop() {
                    Some(Frame::Sequence { items, anchor }) => (Value::Sequence(items), anchor),
                    Some(Frame::Mapping { fields, anchor, .. }) => (Value::Mapping(fields), anchor),
                    None => return,
                };
                self.remember(anchor, &value);
                self.push_node(value);
            }
            Event::Alias(anchor) => match self.anchors.get(&anchor).cloned() {
                Some(value) => self.push_node(value),
                None => {
                    self.unknown_anchor = true;
                    self.push_node(Value::Null);
                }
            },
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// YAML 1.1 plain scalar resolution
// ---------------------------------------------------------------------------

/// Resolve a plain (unquoted) scalar the way go-yaml v2 does.
/// Timestamps stay strings.
pub fn resolve_plain(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
            return Value::Bool(true)
        }
        "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            return Value::Bool(false)
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Value::Number(Number::from(f64::INFINITY))
        }
        "-.inf" | "-.Inf" | "-.INF" => return Value::Number(Number::from(f64::NEG_INFINITY)),
        ".nan" | ".NaN" | ".NAN" => return Value::Number(Number::from(f64::NAN)),
        _ => {}
    }
    if !text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) {
        return Value::String(text.to_string());
    }

    let plain: String = text.chars().filter(|&c| c != '_').collect();
    if let Some(n) = parse_int(&plain) {
        return Value::Number(n);
    }
    if is_decimal(&plain) {
        // Leading zeros with non-octal digits, e.g. `0800`.
        if let Some(n) = parse_signed(&plain, 10) {
            return Value::Number(n);
        }
    }
    if is_float(&plain) {
        if let Ok(f) = plain.parse::<f64>() {
            return Value::Number(Number::from(f));
        }
    }
    Value::String(text.to_string())
}

/// Integer with base prefix: `0x`, `0o`, `0b`, or a leading `0` for octal.
fn parse_int(plain: &str) -> Option<Number> {
    let unsigned = plain.strip_prefix(['+', '-']).unwrap_or(plain);
    let sign = &plain[..plain.len() - unsigned.len()];
    let (radix, digits) = if let Some(d) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = unsigned.strip_prefix("0o").or_else(|| unsigned.strip_prefix("0O")) {
        (8, d)
    } else if let Some(d) = unsigned.strip_prefix("0b").or_else(|| unsigned.strip_prefix("0B")) {
        (2, d)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    parse_signed(&format!("{sign}{digits}"), radix)
}

fn parse_signed(plain: &str, radix: u32) -> Option<Number> {
    let (negative, digits) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.strip_prefix('+').unwrap_or(plain)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        i64::try_from(-i128::from(magnitude)).ok().map(Number::from)
    } else if let Ok(n) = i64::try_from(magnitude) {
        Some(Number::from(n))
    } else {
        Some(Number::from(magnitude))
    }
}

fn is_decimal(plain: &str) -> bool {
    let digits = plain.strip_prefix(['+', '-']).unwrap_or(plain);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_float(plain: &str) -> bool {
    let s = plain.strip_prefix(['+', '-']).unwrap_or(plain);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) if int.is_empty() => !frac.is_empty() && all_digits(frac),
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => !mantissa.is_empty() && all_digits(mantissa),
    };
    let exponent_ok = exponent.map_or(true, |e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && all_digits(e)
    });
    mantissa_ok && exponent_ok
}
