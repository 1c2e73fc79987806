//! Front matter rendering.
//!
//! Pages get a TOML front matter block fenced by `+++`, rendered from a Tera
//! template. String values go through the `toml_str` filter so titles with
//! quotes or control characters still produce valid TOML.

use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera, Value};

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

const TEMPLATE_NAME: &str = "front_matter.toml";

const TEMPLATE: &str = "+++
date = {{ date }}
draft = {{ draft }}
title = {{ title | toml_str }}
weight = {{ weight }}
markup = {{ markup | toml_str }}
slug = {{ slug | toml_str }}
{% if seo %}description = {{ seo.description | toml_str }}
keywords = {{ seo.keywords | toml_str }}
{% endif %}[params]
  author = {{ author | toml_str }}
+++

";

/// Values for one page's front matter.
#[derive(Debug, Serialize)]
pub struct FrontMatter<'a> {
    /// Written unquoted, exactly as the manifest has it
    pub date: &'a str,
    pub draft: bool,
    pub title: &'a str,
    pub weight: i64,
    pub markup: &'a str,
    pub slug: &'a str,
    pub seo: Option<SeoFields<'a>>,
    pub author: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SeoFields<'a> {
    pub description: &'a str,
    pub keywords: &'a str,
}

/// Renders front matter blocks, wrapping Tera.
pub struct FrontMatterRenderer {
    tera: Tera,
}

impl FrontMatterRenderer {
    pub fn new() -> Result<Self, FrontMatterError> {
        let mut tera = Tera::default();
        tera.register_filter("toml_str", toml_str_filter);
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the block, including the blank line that separates it from the body.
    pub fn render(&self, front_matter: &FrontMatter<'_>) -> Result<String, FrontMatterError> {
        let context = Context::from_serialize(front_matter)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

fn toml_str_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(toml_quote(s))),
        other => Err(tera::Error::msg(format!(
            "toml_str expects a string, got {other}"
        ))),
    }
}

/// Quote a value as a TOML string.
///
/// Literal strings (`'...'`) are used whenever TOML allows them; values with a
/// single quote or control characters become escaped basic strings.
pub fn toml_quote(s: &str) -> String {
    let needs_escape = s.contains('\'') || s.chars().any(|c| c.is_control() && c != '\t');
    if !needs_escape {
        return format!("'{s}'");
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
