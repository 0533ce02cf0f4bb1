//! Route template compilation, resolution and parsing.
//!
//! # Template Syntax
//! ```text
//! /users/{id}                 default pattern [0-9a-zA-Z_-]+
//! /users/{id:[0-9]+}          custom pattern
//! /r/{code:[a-z]{2,3}}        nested quantifier braces are balanced
//! /tabs/{tab:([a-z]+)?}       pattern accepting empty = optional param
//! ```
//!
//! # Matching Model
//! Every param remembers the literal text between the previous param (or
//! the template start) and itself. While parsing, that literal must appear
//! verbatim in the path before the param value is read, so a greedy
//! pattern can never swallow a boundary literal. A value is read from the
//! current offset up to the next `/` and only the prefix accepted by the
//! pattern is consumed.
//!
//! A pattern that itself matches `/` can defeat the next-slash split; such
//! templates are accepted but may fail to match paths they resolve to.

use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;
use crate::routing::sanitize::sanitize;

/// Pattern used when a param declares no `:pattern` suffix.
pub const DEFAULT_PATTERN: &str = "[0-9a-zA-Z_-]+";

const PARAM_START: u8 = b'{';
const PARAM_END: u8 = b'}';
const PARAM_NAME_SEPARATOR: u8 = b':';
const ESCAPE: u8 = b'\\';

/// A single `{name[:pattern]}` placeholder inside a template.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    position: Range<usize>,
    pattern: String,
    /// `^(?:pattern)`, used to read a value prefix while parsing.
    prefix_matcher: Regex,
    /// `^(?:pattern)$`, used to validate values while resolving.
    exact_matcher: Regex,
    previous_contents: String,
}

impl Param {
    /// The param name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte span of the `{...}` placeholder in the sanitized template.
    pub fn position(&self) -> Range<usize> {
        self.position.clone()
    }

    /// Width of the placeholder in bytes.
    pub fn width(&self) -> usize {
        self.position.len()
    }

    /// The raw pattern (without anchors).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Literal text between the previous param (or template start) and this one.
    pub fn previous_contents(&self) -> &str {
        &self.previous_contents
    }

    /// Returns true if the whole value is accepted by the pattern.
    pub fn accepts(&self, value: &str) -> bool {
        self.exact_matcher.is_match(value)
    }

    // An optional param resolved to "" leaves `anchor` + suffix with a doubled
    // or trailing slash that sanitizing removed. Recognise that shape.
    fn collapsed_in(&self, rest: &str) -> bool {
        let Some(anchor) = self.previous_contents.strip_suffix('/') else {
            return false;
        };

        self.accepts("")
            && rest
                .strip_prefix(anchor)
                .is_some_and(|after| after.is_empty() || after.starts_with('/'))
    }
}

/// A compiled route template.
///
/// ```
/// use waypoint::routing::{Params, Route};
///
/// let route = Route::new("/books/{id:[0-9]+}")?;
///
/// let params = route.parse("/books/100").unwrap();
/// assert_eq!(params.get("id"), Some("100"));
///
/// let path = route.resolve(&Params::new().with("id", "7"));
/// assert_eq!(path.as_deref(), Some("/books/7"));
/// # Ok::<(), waypoint::routing::RouteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    original: String,
    params: Vec<Param>,
    /// Literal text after the last param.
    suffix: String,
}

impl Route {
    /// Compile a template.
    pub fn new(template: &str) -> RouteResult<Self> {
        let original = sanitize(template);
        let (params, suffix) = Scanner::new(&original).read()?;

        Ok(Self {
            original,
            params,
            suffix,
        })
    }

    /// The sanitized template string.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Params in template order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns `true` if the template contains no params.
    pub fn is_static(&self) -> bool {
        self.params.is_empty()
    }

    /// Build a concrete path from parameter values.
    ///
    /// Returns `None` when a value is rejected by its pattern. A missing
    /// value is treated as empty, so only params whose pattern accepts the
    /// empty string may be omitted.
    pub fn resolve(&self, values: &Params) -> Option<String> {
        if self.params.is_empty() {
            return Some(self.original.clone());
        }

        let mut path = String::with_capacity(self.original.len());
        for param in &self.params {
            let value = values.get(&param.name).unwrap_or("");
            if !param.accepts(value) {
                return None;
            }
            path.push_str(&param.previous_contents);
            path.push_str(value);
        }
        path.push_str(&self.suffix);

        Some(sanitize(&path))
    }

    /// Match a path against the template, extracting param values.
    ///
    /// Returns `None` on any mismatch so callers can move on to the next
    /// candidate route.
    pub fn parse(&self, path: &str) -> Option<Params> {
        let value = sanitize(path);

        if self.params.is_empty() {
            return (value == self.original).then(Params::new);
        }

        let mut values = Params::new();
        // Offset into `value`; the template offset is implied by the params walked.
        let mut cursor = 0;

        for param in &self.params {
            let rest = &value[cursor..];

            if let Some(after) = rest.strip_prefix(param.previous_contents.as_str()) {
                cursor += param.previous_contents.len();

                let segment = after.split('/').next().unwrap_or_default();
                let matched = param.prefix_matcher.find(segment)?.as_str();

                cursor += matched.len();
                values.insert(param.name.as_str(), matched);
            } else if param.collapsed_in(rest) {
                cursor += param.previous_contents.len() - 1;
                values.insert(param.name.as_str(), "");
            } else {
                return None;
            }
        }

        // Everything after the last param must equal the trailing literal.
        (value[cursor..] == self.suffix).then_some(values)
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::new(s)
    }
}

impl TryFrom<&str> for Route {
    type Error = RouteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Route::new(value)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Left-to-right byte scanner over a sanitized template.
struct Scanner<'a> {
    template: &'a str,
    view: &'a [u8],
    offset: usize,
}

impl<'a> Scanner<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            template,
            view: template.as_bytes(),
            offset: 0,
        }
    }

    fn read(mut self) -> RouteResult<(Vec<Param>, String)> {
        let mut params: Vec<Param> = Vec::new();
        let mut last_end = 0;

        while !self.eof() {
            if !self.peek(PARAM_START) {
                self.offset += 1;
                continue;
            }

            let param = self.read_param(last_end)?;
            if params.iter().any(|p| p.name == param.name) {
                return Err(RouteError::DuplicateParam {
                    template: self.template.to_string(),
                    name: param.name,
                });
            }

            last_end = param.position.end;
            params.push(param);
        }

        Ok((params, self.template[last_end..].to_string()))
    }

    fn read_param(&mut self, last_end: usize) -> RouteResult<Param> {
        let template = self.template;
        let start = self.offset;
        self.expect(PARAM_START)?;

        let name_start = self.offset;
        while !self.eof() && !self.peek(PARAM_NAME_SEPARATOR) && !self.peek(PARAM_END) {
            self.offset += 1;
        }
        let name = &template[name_start..self.offset];

        let pattern = if self.consume(PARAM_NAME_SEPARATOR) {
            self.read_pattern()?
        } else {
            self.expect(PARAM_END)?;
            DEFAULT_PATTERN
        };

        if name.is_empty() {
            return Err(RouteError::UnnamedParam {
                template: template.to_string(),
                offset: start,
            });
        }

        let compile = |source: String| {
            Regex::new(&source).map_err(|source| RouteError::InvalidPattern {
                template: template.to_string(),
                name: name.to_string(),
                source,
            })
        };

        Ok(Param {
            name: name.to_string(),
            position: start..self.offset,
            pattern: pattern.to_string(),
            prefix_matcher: compile(format!("^(?:{})", pattern))?,
            exact_matcher: compile(format!("^(?:{})$", pattern))?,
            previous_contents: template[last_end..start].to_string(),
        })
    }

    /// Read a pattern body up to its closing `}`, balancing inner
    /// quantifier braces such as `{1,3}`.
    fn read_pattern(&mut self) -> RouteResult<&'a str> {
        let template = self.template;
        let body_start = self.offset;
        let mut depth = 0usize;

        loop {
            if self.eof() {
                return Err(self.malformed(PARAM_END));
            }

            match self.view[self.offset] {
                ESCAPE => self.offset += 2,
                PARAM_START => {
                    depth += 1;
                    self.offset += 1;
                }
                PARAM_END if depth == 0 => {
                    let body = &template[body_start..self.offset];
                    self.offset += 1;
                    return Ok(body);
                }
                PARAM_END => {
                    depth -= 1;
                    self.offset += 1;
                }
                _ => self.offset += 1,
            }
        }
    }

    fn expect(&mut self, ch: u8) -> RouteResult<()> {
        if !self.consume(ch) {
            return Err(self.malformed(ch));
        }
        Ok(())
    }

    fn consume(&mut self, ch: u8) -> bool {
        if self.peek(ch) {
            self.offset += 1;
            return true;
        }
        false
    }

    fn peek(&self, ch: u8) -> bool {
        self.view.get(self.offset) == Some(&ch)
    }

    fn eof(&self) -> bool {
        self.offset >= self.view.len()
    }

    fn malformed(&self, expected: u8) -> RouteError {
        RouteError::MalformedTemplate {
            template: self.template.to_string(),
            offset: self.offset.min(self.view.len()),
            expected: expected as char,
        }
    }
}
