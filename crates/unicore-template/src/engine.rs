use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};
use unicore_path::{is_restricted_name, Container};
use unicore_value::{Key, Map, Value};

use crate::error::TemplateError;
use crate::sanitize::{sanitize_string, SanitizeOptions};

/// Default cap on template source length, in characters.
pub const DEFAULT_MAX_TEMPLATE_LENGTH: usize = 10_000;

/// String methods callable from `<%= name.method() %>`.
pub const SAFE_METHODS: &[&str] = &["upper", "lower", "title", "capitalize"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    pub max_len: usize,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        TemplateOptions {
            max_len: DEFAULT_MAX_TEMPLATE_LENGTH,
        }
    }
}

fn dangerous_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<%=.*?.__(class|bases|subclasses|globals|dict|code|builtins|module)__.*?%>")
            .unwrap()
    })
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<%=?[^%]*?%>").unwrap())
}

fn expression_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_]*)(\.[a-zA-Z_][a-zA-Z0-9_]*(\(\))?)*$").unwrap()
    })
}

fn condition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Expr(String),
    Tag(String),
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in token_regex().find_iter(source) {
        if m.start() > last {
            tokens.push(Token::Text(source[last..m.start()].to_string()));
        }
        let raw = m.as_str();
        if let Some(body) = raw.strip_prefix("<%=") {
            tokens.push(Token::Expr(body[..body.len() - 2].trim().to_string()));
        } else {
            tokens.push(Token::Tag(raw[2..raw.len() - 2].trim().to_string()));
        }
        last = m.end();
    }
    if last < source.len() {
        tokens.push(Token::Text(source[last..].to_string()));
    }
    tokens
}

/// A checked, tokenized template.
///
/// Supports `<%= name.attr.method() %>` interpolation and
/// `<% if name %> ... <% endif %>` blocks, which may nest.
///
/// # Example
///
/// ```
/// use unicore_template::Template;
/// use unicore_value::Value;
///
/// let t = Template::new("Hi <%= user.name.upper() %>!<% if admin %> (admin)<% endif %>").unwrap();
/// let ctx = Value::map_from([
///     ("user", Value::map_from([("name", "ada")])),
///     ("admin", Value::from(false)),
/// ]);
/// assert_eq!(t.render(&ctx).unwrap(), "Hi ADA!");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    pub fn new(source: &str) -> Result<Self, TemplateError> {
        Template::with_options(source, &TemplateOptions::default())
    }

    /// Sanitizes `source` (trim + length cap) and rejects interpolations
    /// that reach for introspection attributes.
    pub fn with_options(source: &str, options: &TemplateOptions) -> Result<Self, TemplateError> {
        let source = sanitize_string(source, &SanitizeOptions::max_length(options.max_len))?;
        if dangerous_regex().is_match(&source) {
            warn!("dangerous template pattern rejected");
            return Err(TemplateError::DangerousPattern);
        }
        let tokens = tokenize(&source);
        debug!(tokens = tokens.len(), "template parsed");
        Ok(Template { tokens })
    }

    /// Renders against a map with string keys.
    pub fn render(&self, context: &Value) -> Result<String, TemplateError> {
        let Value::Map(ctx) = context else {
            return Err(TemplateError::Context("Context must be a dictionary".to_string()));
        };
        let ctx = ctx.borrow();
        if let Some(bad) = ctx.keys().find(|k| !matches!(k, Key::Str(_))) {
            return Err(TemplateError::Context(format!(
                "Context key '{bad}' must be a string"
            )));
        }

        let mut out = String::new();
        let mut skip: Vec<bool> = Vec::new();
        for token in &self.tokens {
            let skipping = skip.iter().any(|s| *s);
            match token {
                Token::Text(text) => {
                    if !skipping {
                        out.push_str(text);
                    }
                }
                Token::Expr(expr) => {
                    if !skipping {
                        out.push_str(&evaluate_expression(expr, &ctx)?.to_string());
                    }
                }
                Token::Tag(tag) => {
                    if let Some(condition) = tag.strip_prefix("if ") {
                        let condition = condition.trim_end_matches(':').trim();
                        skip.push(!evaluate_condition(condition, &ctx)?);
                    } else if tag == "endif" {
                        if skip.pop().is_none() {
                            return Err(TemplateError::UnmatchedEndif);
                        }
                    } else {
                        return Err(TemplateError::UnknownTag(tag.clone()));
                    }
                }
            }
        }
        if !skip.is_empty() {
            return Err(TemplateError::UnclosedIf);
        }
        Ok(out)
    }
}

/// Parses and renders in one step with default options.
pub fn template(source: &str, context: &Value) -> Result<String, TemplateError> {
    Template::new(source)?.render(context)
}

fn evaluate_expression(expr: &str, ctx: &Map) -> Result<Value, TemplateError> {
    if !expression_regex().is_match(expr) {
        return Err(TemplateError::InvalidExpression(expr.to_string()));
    }
    let mut parts = expr.split('.');
    let name = parts.next().unwrap_or_default();
    let mut value = match ctx.get(&Key::from(name)) {
        Some(v) if !v.is_null() => v.clone(),
        _ => return Err(TemplateError::Name(name.to_string())),
    };
    for part in parts {
        if let Some(method) = part.strip_suffix("()") {
            value = call_safe_method(&value, method)?;
            continue;
        }
        if is_restricted_name(part) {
            warn!(attribute = part, "restricted template attribute rejected");
            return Err(TemplateError::RestrictedAttribute(part.to_string()));
        }
        value = Container::of(&value)
            .and_then(|c| c.member(&Key::from(part)))
            .ok_or_else(|| TemplateError::Attribute(part.to_string()))?;
    }
    Ok(value)
}

fn evaluate_condition(condition: &str, ctx: &Map) -> Result<bool, TemplateError> {
    if !condition_regex().is_match(condition) {
        return Err(TemplateError::InvalidCondition(condition.to_string()));
    }
    Ok(ctx
        .get(&Key::from(condition))
        .is_some_and(Value::truthy))
}

fn call_safe_method(value: &Value, method: &str) -> Result<Value, TemplateError> {
    let not_allowed = || TemplateError::MethodNotAllowed {
        method: method.to_string(),
        type_name: value.type_name(),
    };
    let Value::Str(s) = value else {
        return Err(not_allowed());
    };
    let out = match method {
        "upper" => s.to_uppercase(),
        "lower" => s.to_lowercase(),
        "title" => title_case(s),
        "capitalize" => capitalize(s),
        _ => return Err(not_allowed()),
    };
    Ok(Value::Str(out))
}

/// Uppercases the first letter of every run of letters.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Value {
        Value::map_from([
            ("name", Value::from("world")),
            ("flag", Value::from(true)),
            ("off", Value::from(0)),
            ("user", Value::map_from([("first", "ada lovelace")])),
        ])
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("a<%= x %>b<% if y %>c<% endif %>"),
            vec![
                Token::Text("a".into()),
                Token::Expr("x".into()),
                Token::Text("b".into()),
                Token::Tag("if y".into()),
                Token::Text("c".into()),
                Token::Tag("endif".into()),
            ]
        );
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(template("Hello <%= name %>!", &ctx()), Ok("Hello world!".to_string()));
        assert_eq!(
            template("<%= user.first.title() %>", &ctx()),
            Ok("Ada Lovelace".to_string())
        );
        assert_eq!(template("<%= name.capitalize() %>", &ctx()), Ok("World".to_string()));
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(
            template("<% if flag %>A<% if off %>B<% endif %>C<% endif %>", &ctx()),
            Ok("AC".to_string())
        );
        assert_eq!(template("<% if missing: %>x<% endif %>y", &ctx()), Ok("y".to_string()));
    }

    #[test]
    fn test_skipped_blocks_are_not_evaluated() {
        assert_eq!(
            template("<% if off %><%= undefined_name %><% endif %>ok", &ctx()),
            Ok("ok".to_string())
        );
    }

    #[test]
    fn test_structure_errors() {
        assert_eq!(template("<% endif %>", &ctx()), Err(TemplateError::UnmatchedEndif));
        assert_eq!(template("<% if flag %>x", &ctx()), Err(TemplateError::UnclosedIf));
        assert_eq!(
            template("<% for x %>", &ctx()),
            Err(TemplateError::UnknownTag("for x".to_string()))
        );
        assert_eq!(
            template("<% if a b %><% endif %>", &ctx()),
            Err(TemplateError::InvalidCondition("a b".to_string()))
        );
    }

    #[test]
    fn test_expression_errors() {
        assert_eq!(
            template("<%= nope %>", &ctx()),
            Err(TemplateError::Name("nope".to_string()))
        );
        assert_eq!(
            template("<%= user.last %>", &ctx()),
            Err(TemplateError::Attribute("last".to_string()))
        );
        assert_eq!(
            template("<%= name[0] %>", &ctx()),
            Err(TemplateError::InvalidExpression("name[0]".to_string()))
        );
        assert_eq!(
            template("<%= flag.upper() %>", &ctx()),
            Err(TemplateError::MethodNotAllowed {
                method: "upper".to_string(),
                type_name: "bool"
            })
        );
        assert_eq!(
            template("<%= name.strip() %>", &ctx()),
            Err(TemplateError::MethodNotAllowed {
                method: "strip".to_string(),
                type_name: "str"
            })
        );
    }

    #[test]
    fn test_security_guards() {
        let err = template("<%= name.__class__ %>", &ctx()).unwrap_err();
        assert_eq!(err, TemplateError::DangerousPattern);
        assert!(err.is_security());

        let err = template("<%= name.__init__ %>", &ctx()).unwrap_err();
        assert_eq!(err, TemplateError::RestrictedAttribute("__init__".to_string()));
    }

    #[test]
    fn test_length_limit() {
        let long = "x".repeat(DEFAULT_MAX_TEMPLATE_LENGTH + 1);
        assert!(matches!(
            Template::new(&long),
            Err(TemplateError::Sanitize(_))
        ));
        let opts = TemplateOptions { max_len: 20_000 };
        assert!(Template::with_options(&long, &opts).is_ok());
    }

    #[test]
    fn test_context_must_be_string_keyed_map() {
        let t = Template::new("x").unwrap();
        assert!(matches!(t.render(&Value::from(1)), Err(TemplateError::Context(_))));
        let bad = Value::map_from([(Key::Int(1), "v")]);
        assert!(matches!(t.render(&bad), Err(TemplateError::Context(_))));
    }

    #[test]
    fn test_render_is_reusable() {
        let t = Template::new("<%= name %>").unwrap();
        assert_eq!(t.render(&ctx()), Ok("world".to_string()));
        let other = Value::map_from([("name", "there")]);
        assert_eq!(t.render(&other), Ok("there".to_string()));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(title_case("they're bill's"), "They'Re Bill'S");
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(capitalize(""), "");
    }
}
