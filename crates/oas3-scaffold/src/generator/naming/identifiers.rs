use std::{
  collections::{BTreeSet, HashSet},
  path::Path,
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

/// Names that would shadow prelude types or the generated support types.
static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Box", "Err", "None", "Ok", "Option", "Result", "Self", "Some", "String", "Timestamp", "Vec",
  ]
  .into_iter()
  .collect()
});

/// Initialisms rendered fully upper-case inside identifiers.
pub(crate) static ACRONYMS: LazyLock<BTreeSet<&str>> = LazyLock::new(|| {
  [
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "LHS", "QPS",
    "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL",
    "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static TOKEN_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores, and trims any leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Normalizes a raw spec identifier (path template, property or operation name).
///
/// Path-template braces are dropped, the input is split on every separator (`/`, `-`, `_`
/// and anything else that is not alphanumeric), and the tokens are concatenated. A token
/// whose upper-case form is a known acronym is rendered upper-case; every other token is
/// title-cased, lowering the rest of the token.
pub(crate) fn format_identifier(raw: &str) -> String {
  let ascii = any_ascii(&raw.replace(['{', '}'], ""));
  TOKEN_SEPARATOR_RE
    .split(&ascii)
    .filter(|token| !token.is_empty())
    .map(|token| {
      let upper = token.to_ascii_uppercase();
      if ACRONYMS.contains(upper.as_str()) {
        upper
      } else {
        title_case(token)
      }
    })
    .collect()
}

fn title_case(token: &str) -> String {
  let mut chars = token.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
  }
}

/// Lower-cases the longest acronym prefix of an identifier, or only its first character
/// when no acronym matches. The remainder is left untouched.
pub(crate) fn lowercase_leading_variant(identifier: &str) -> String {
  let prefix_len = ACRONYMS
    .iter()
    .filter(|acronym| identifier.starts_with(**acronym))
    .map(|acronym| acronym.len())
    .max()
    .unwrap_or_else(|| identifier.chars().next().map_or(0, char::len_utf8));

  let (head, tail) = identifier.split_at(prefix_len);
  head.to_lowercase() + tail
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Converts a string into a valid Rust field or function name (`snake_case`).
///
/// Keywords become raw identifiers, `self` becomes `self_`, a leading digit gets a `_`
/// prefix, and an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if ident == "self" {
    return "self_".to_string();
  }

  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  prefix_if_digit_start(&mut ident, '_');
  ident
}

/// Converts a declared schema name into a Rust type name.
///
/// Names that are already plain alphanumeric words keep their casing (`ObjectModel`); anything
/// with separators goes through [`format_identifier`].
pub(crate) fn to_rust_type_name(raw: &str) -> String {
  let mut ident = if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
    let mut chars = raw.chars();
    chars
      .next()
      .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
      .unwrap_or_default()
  } else {
    format_identifier(raw)
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    ident.push_str("Type");
  }

  prefix_if_digit_start(&mut ident, 'T');
  ident
}

/// Derives a local binding (field, function or variable) from a type-like identifier.
pub(crate) fn binding_name(identifier: &str) -> String {
  to_rust_field_name(&lowercase_leading_variant(identifier))
}

/// Snake-case stem of a function derived from a type name. Digit runs form words of their own,
/// so `GetThingResponse200Headers` becomes `get_thing_response_200_headers`.
pub(crate) fn function_stem(identifier: &str) -> String {
  let mut spaced = String::with_capacity(identifier.len() + 4);
  let mut previous: Option<char> = None;
  for c in identifier.chars() {
    if let Some(p) = previous
      && p.is_ascii_alphanumeric()
      && c.is_ascii_alphanumeric()
      && p.is_ascii_digit() != c.is_ascii_digit()
    {
      spaced.push('_');
    }
    spaced.push(c);
    previous = Some(c);
  }
  binding_name(&spaced)
}

/// Namespace of a generation unit: the file stem with separators removed, lowercased.
pub(crate) fn unit_name(path: &Path) -> String {
  let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
  let stem = [".yaml", ".yml", ".json"]
    .iter()
    .find_map(|ext| file_name.strip_suffix(ext))
    .unwrap_or(file_name);

  let mut name: String = any_ascii(stem)
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_lowercase())
    .collect();

  if name.is_empty() {
    return "api".to_string();
  }
  if FORBIDDEN_IDENTIFIERS.contains(name.as_str()) {
    name.push_str("_api");
  }
  prefix_if_digit_start(&mut name, '_');
  name
}

fn prefix_if_digit_start(ident: &mut String, prefix: char) {
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, prefix);
  }
}
