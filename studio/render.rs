/// Central template renderer for the salary studio.
///
/// The studio uses a single HTML template (`studio/assets/studio.html`) with
/// placeholder tokens like `{{TOKEN}}`.  The template is embedded at compile
/// time; `render_page` resolves the global tokens and hands the rest to a
/// caller-supplied closure.

use crate::state::{FlashKind, FlashMessage};

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Which tab is active: controls the active CSS class and the JS
/// `ACTIVE_TAB` variable injected into the page.
#[derive(Clone, Copy)]
pub enum Page {
    Predict = 0,
    Batch   = 1,
}

/// Renders the full studio page.
///
/// `fill` replaces the tab-specific placeholders; anything it leaves behind
/// is blanked.
pub fn render_page<F>(page: Page, flash: Option<&FlashMessage>, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{ACTIVE_TAB}}", &(page as u8).to_string());
    html = html.replace("{{FLASH}}", &render_flash_html(flash));

    html = fill(html);

    blank_remaining(html)
}

pub fn render_flash_html(flash: Option<&FlashMessage>) -> String {
    match flash {
        None    => String::new(),
        Some(f) => {
            let cls = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error   => "flash-error",
            };
            format!(r#"<div class="flash {}">{}</div>"#, cls, html_escape(&f.text))
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y_Z}}c".into()), "abc");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("<b a=\"1\">&"), "&lt;b a=&quot;1&quot;&gt;&amp;");
    }
}
