use crate::models::ArgValue;
use chrono::NaiveDateTime;

/// Characters with a special meaning in Markdown prose.
const MARKDOWN_SPECIAL: [char; 16] = [
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '.', '!', '|',
];

const ELLIPSIS: &str = "...";

/// Prefix every Markdown special character with a backslash.
///
/// Single pass over the input, so inserted backslashes are never escaped again.
pub(crate) fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn arg_to_string(arg: &ArgValue, string_limit: usize) -> String {
    match arg {
        ArgValue::String(s) => match s.char_indices().nth(string_limit) {
            Some((cut, _)) => format!("\"{}{}\"", &s[..cut], ELLIPSIS),
            None => format!("\"{}\"", s),
        },
        ArgValue::Int(i) => i.to_string(),
        ArgValue::Float(f) => f.to_string(),
        ArgValue::Bool(b) => b.to_string(),
        ArgValue::Null => "null".into(),
        ArgValue::Sequence(values) => format!("array({})", values.len()),
        ArgValue::Mapping(entries) => format!("array({})", entries.len()),
        ArgValue::Object { type_name } => type_name.clone(),
        ArgValue::Other(type_tag) => type_tag.clone(),
    }
}

pub(crate) fn args_to_string(args: &[ArgValue], string_limit: usize) -> String {
    args.iter()
        .map(|arg| arg_to_string(arg, string_limit))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn time_to_string(time: NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Convert e.g. `ACCEPT_LANGUAGE` or `accept-language` to `Accept-Language`.
pub(crate) fn to_header_case(name: &str) -> String {
    name.replace('_', "-")
        .to_lowercase()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
