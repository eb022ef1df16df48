//! Text helpers: placeholder substitution and natural-language lists.

use std::collections::BTreeSet;

/// Substitutes `{name}` placeholders in a template.
///
/// Unknown placeholders and unbalanced braces are copied through verbatim,
/// so a bad translation never loses text.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after_open[..close];
        match args.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..=open + 1 + close]),
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Joins items into a series such as `a, b, and c`.
///
/// Items are deduplicated and sorted so output is stable. Beyond `limit`
/// entries the tail collapses into `N others`.
pub fn render_series<S: AsRef<str>>(items: &[S], limit: usize) -> String {
    let unique: BTreeSet<&str> = items.iter().map(AsRef::<str>::as_ref).collect();
    let mut items: Vec<String> = unique.into_iter().map(str::to_string).collect();

    if items.len() <= 1 {
        return items.pop().unwrap_or_default();
    }

    let limit = limit.max(2);
    if items.len() > limit {
        let others = items.len() - limit + 1;
        items.truncate(limit - 1);
        items.push(format!("{others} others"));
    }

    let Some(last) = items.pop() else {
        return String::new();
    };
    let head = items.join(", ");
    // oxford comma once there are three or more entries
    if items.len() > 1 {
        format!("{head}, and {last}")
    } else {
        format!("{head} and {last}")
    }
}
