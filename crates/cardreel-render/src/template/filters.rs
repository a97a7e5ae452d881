//! MiniJinja filter registration.

use minijinja::Environment;

/// Registers the card filters on a MiniJinja environment.
///
/// - `css_safe`: drops characters that could close a declaration or the
///   surrounding `<style>` element, for catalog values written into CSS.
/// - `seconds`: formats a millisecond count as seconds (`5000` -> `5s`).
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("css_safe", |value: String| -> String {
        value
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';' | '\\'))
            .collect()
    });

    env.add_filter("seconds", |ms: u64| -> String {
        if ms % 1000 == 0 {
            format!("{}s", ms / 1000)
        } else {
            format!("{:.1}s", ms as f64 / 1000.0)
        }
    });
}
