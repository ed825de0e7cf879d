//! Markdown to HTML conversion for view mode.
//!
//! Stateless: the same input always yields the same output. The dual-editor
//! core never calls this; only the view surface does.

use comrak::{Options, markdown_to_html};

/// Options shared by rendering and the structured editor, so both agree
/// on which GFM constructs exist.
pub fn markdown_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

/// Render markdown to an HTML fragment.
///
/// Raw HTML in the source is passed through unchanged.
pub fn render(markdown: &str) -> String {
    let mut options = markdown_options();
    options.render.unsafe_ = true;
    markdown_to_html(markdown, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading() {
        assert_eq!(render("# Title"), "<h1>Title</h1>\n");
    }

    #[test]
    fn test_render_strong() {
        assert!(render("**hi**").contains("<strong>hi</strong>"));
    }

    #[test]
    fn test_render_strikethrough() {
        assert!(render("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn test_render_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_tasklist() {
        let html = render("- [x] done\n- [ ] todo\n");
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_render_passes_raw_html_through() {
        let html = render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_render_empty_is_empty() {
        assert_eq!(render(""), "");
    }
}
