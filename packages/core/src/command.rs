//! Structured commands for the CyREST command gateway.
//!
//! A command is a namespace, a verb of one or more words, and named
//! arguments:
//!
//! ```text
//! apps information app="stringApp"
//! └──┘ └─────────┘ └─────────────┘
//!  ns     verb        argument
//! ```
//!
//! # Grammar
//!
//! ```text
//! command  = word { SP word } { SP argument }
//! argument = key '=' value
//! key      = 1*( ALPHA / DIGIT / '_' / '.' )
//! value    = '"' *( '\' CHAR / any char except '"' and '\' ) '"'
//!          / 1*( any char except SP )
//! ```
//!
//! Rendering always quotes string values and backslash-escapes `"` and `\`,
//! so [`Command::parse`] reads back the rendered string of every argument
//! that [`Command`]'s `Display` wrote. Typed values (`Int`, `Float`, `Bool`)
//! come back as [`ArgValue::Str`] holding their rendered form.
//!
//! On the wire the words become URL path segments and the arguments a JSON
//! object of strings.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde_json::{Map, Value};
use urlencoding::encode;

use crate::error::Error;

// ---------------------------------------------------------------------------
// ArgValue
// ---------------------------------------------------------------------------

/// Value of a command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Rendered as comma-separated elements. Elements containing commas
    /// cannot be told apart by the remote process.
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// The string the command gateway receives for this value.
    pub fn render(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::Int(i) => i.to_string(),
            ArgValue::Float(f) => f.to_string(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::List(items) => items
                .iter()
                .map(ArgValue::render)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn is_quoted(&self) -> bool {
        matches!(self, ArgValue::Str(_) | ArgValue::List(_))
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<&String> for ArgValue {
    fn from(s: &String) -> Self {
        ArgValue::Str(s.clone())
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<i32> for ArgValue {
    fn from(i: i32) -> Self {
        ArgValue::Int(i64::from(i))
    }
}

impl From<u32> for ArgValue {
    fn from(i: u32) -> Self {
        ArgValue::Int(i64::from(i))
    }
}

impl From<f64> for ArgValue {
    fn from(f: f64) -> Self {
        ArgValue::Float(f)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(items: Vec<T>) -> Self {
        ArgValue::List(items.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A command for the command gateway.
///
/// ```rust,ignore
/// let cmd = Command::new("apps", "information").arg("app", "stringApp");
/// assert_eq!(cmd.to_string(), r#"apps information app="stringApp""#);
/// assert_eq!(cmd.path(), "apps/information");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    namespace: String,
    verb: Vec<String>,
    args: Vec<(String, ArgValue)>,
}

impl Command {
    /// `verb` may hold several words (`"list installed"`); it is split on
    /// whitespace.
    pub fn new(namespace: impl Into<String>, verb: &str) -> Self {
        Self {
            namespace: namespace.into(),
            verb: verb.split_whitespace().map(str::to_string).collect(),
            args: Vec::new(),
        }
    }

    /// Set an argument, replacing an earlier value for the same key.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.args.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.args.push((key, value)),
        }
        self
    }

    /// Set an argument only when `value` is present.
    pub fn arg_opt<V: Into<ArgValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.arg(key, v),
            None => self,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn verb(&self) -> &[String] {
        &self.verb
    }

    pub fn args(&self) -> &[(String, ArgValue)] {
        &self.args
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.args.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Gateway path: namespace and verb words joined by `/`, each segment
    /// percent-encoded.
    pub fn path(&self) -> String {
        std::iter::once(&self.namespace)
            .chain(self.verb.iter())
            .map(|segment| encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// JSON request body: every argument rendered to a string.
    pub fn body(&self) -> Value {
        let map: Map<String, Value> = self
            .args
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.render())))
            .collect();
        Value::Object(map)
    }

    /// Parse a command string. Every argument value comes back as
    /// [`ArgValue::Str`].
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut chars = input.trim().chars().peekable();
        let mut words: Vec<String> = Vec::new();
        let mut args: Vec<(String, ArgValue)> = Vec::new();

        loop {
            skip_whitespace(&mut chars);
            if chars.peek().is_none() {
                break;
            }

            let token = read_token(&mut chars);
            match chars.peek() {
                Some('=') => {
                    chars.next();
                    if token.is_empty() {
                        return Err(invalid(input, "argument without a name"));
                    }
                    if !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                        return Err(invalid(input, &format!("bad argument name {token:?}")));
                    }
                    let value = read_value(&mut chars).map_err(|reason| invalid(input, reason))?;
                    args.push((token, ArgValue::Str(value)));
                }
                Some('"') => return Err(invalid(input, "unexpected '\"' outside an argument")),
                _ => {
                    if !args.is_empty() {
                        return Err(invalid(input, &format!("word {token:?} after arguments")));
                    }
                    words.push(token);
                }
            }
        }

        if words.is_empty() {
            return Err(invalid(input, "missing namespace"));
        }
        let namespace = words.remove(0);
        Ok(Self {
            namespace,
            verb: words,
            args,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)?;
        for word in &self.verb {
            write!(f, " {word}")?;
        }
        for (key, value) in &self.args {
            if value.is_quoted() {
                write!(f, " {key}=\"{}\"", escape(&value.render()))?;
            } else {
                write!(f, " {key}={}", value.render())?;
            }
        }
        Ok(())
    }
}

// --- helpers -----------------------------------------------------------------

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidArgument(format!("cannot parse command {input:?}: {reason}"))
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_token(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut token = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '=' || c == '"' {
            break;
        }
        token.push(c);
        chars.next();
    }
    token
}

fn read_value(chars: &mut Peekable<Chars<'_>>) -> Result<String, &'static str> {
    let mut value = String::new();

    if chars.peek() != Some(&'"') {
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            value.push(c);
            chars.next();
        }
        if value.is_empty() {
            return Err("missing value");
        }
        return Ok(value);
    }

    chars.next();
    loop {
        match chars.next() {
            None => return Err("unterminated quoted value"),
            Some('\\') => match chars.next() {
                Some(c) => value.push(c),
                None => return Err("dangling escape at end of input"),
            },
            Some('"') => break,
            Some(c) => value.push(c),
        }
    }

    match chars.peek() {
        None => Ok(value),
        Some(c) if c.is_whitespace() => Ok(value),
        Some(_) => Err("closing quote must be followed by whitespace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_multi_word_verb_and_quoted_args() {
        let cmd = Command::new("session", "save as").arg("file", "/tmp/my session.cys");
        assert_eq!(cmd.to_string(), r#"session save as file="/tmp/my session.cys""#);
        assert_eq!(cmd.path(), "session/save/as");
        assert_eq!(cmd.body(), json!({ "file": "/tmp/my session.cys" }));
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        let cmd = Command::new("apps", "status").arg("app", r#"odd "name" \ here"#);
        assert_eq!(cmd.to_string(), r#"apps status app="odd \"name\" \\ here""#);
        let back = Command::parse(&cmd.to_string()).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn non_string_values_render_bare_on_the_line_and_as_strings_in_the_body() {
        let cmd = Command::new("layout", "force-directed")
            .arg("numIterations", 100)
            .arg("defaultSpringLength", 80.5)
            .arg("isDeterministic", true)
            .arg("nodeList", vec!["a", "b"]);
        assert_eq!(
            cmd.to_string(),
            r#"layout force-directed numIterations=100 defaultSpringLength=80.5 isDeterministic=true nodeList="a,b""#
        );
        assert_eq!(
            cmd.body(),
            json!({
                "numIterations": "100",
                "defaultSpringLength": "80.5",
                "isDeterministic": "true",
                "nodeList": "a,b",
            })
        );
    }

    #[test]
    fn typed_values_read_back_as_their_rendered_strings() {
        let cmd = Command::new("layout", "force-directed")
            .arg("numIterations", 100)
            .arg("isDeterministic", true);
        let parsed = Command::parse(&cmd.to_string()).unwrap();

        assert_ne!(parsed, cmd);
        assert_eq!(parsed.get("numIterations"), Some(&ArgValue::from("100")));
        assert_eq!(parsed.get("isDeterministic"), Some(&ArgValue::from("true")));
        assert_eq!(parsed.body(), cmd.body());
    }

    #[test]
    fn repeated_key_replaces_value() {
        let cmd = Command::new("apps", "install").arg("app", "a").arg("app", "b");
        assert_eq!(cmd.args().len(), 1);
        assert_eq!(cmd.get("app"), Some(&ArgValue::from("b")));
    }

    #[test]
    fn arg_opt_skips_none() {
        let cmd = Command::new("session", "save").arg_opt::<&str>("file", None);
        assert!(cmd.args().is_empty());
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let cmd = Command::new("my ns", "do it?");
        assert_eq!(cmd.path(), "my%20ns/do/it%3F");
    }

    #[test]
    fn parses_bare_and_quoted_values() {
        let cmd = Command::parse(r#"  network rename name="new title"  sourceNetwork=SUID:52 "#).unwrap();
        assert_eq!(cmd.namespace(), "network");
        assert_eq!(cmd.verb(), ["rename".to_string()]);
        assert_eq!(cmd.get("name"), Some(&ArgValue::from("new title")));
        assert_eq!(cmd.get("sourceNetwork"), Some(&ArgValue::from("SUID:52")));
    }

    #[test]
    fn parses_command_without_arguments() {
        let cmd = Command::parse("apps list installed").unwrap();
        assert_eq!(cmd.path(), "apps/list/installed");
        assert_eq!(cmd.body(), json!({}));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in [
            "",
            "   ",
            r#"apps status app="unterminated"#,
            r#"apps status ="x""#,
            r#"apps status app="x" trailing"#,
            r#"apps status app="x"y"#,
            r#"apps "quoted""#,
            r#"apps status a-b="x""#,
            "apps status app=",
            "apps status app= other=1",
        ] {
            assert!(
                matches!(Command::parse(bad), Err(Error::InvalidArgument(_))),
                "expected parse error for {bad:?}"
            );
        }
    }
}
