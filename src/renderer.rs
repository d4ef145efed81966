//! HTML note bodies to Markdown.
//!
//! Two element handlers replace the converter's defaults: checkboxes become
//! task-list markers and image sources are pointed at the `_thumb.png` asset
//! names the app actually ships next to the export. Both read attributes from
//! the parsed DOM.

use eyre::{Context, Result};
use htmd::{Element, HtmlToMarkdown};

pub const THUMB_SUFFIX: &str = "_thumb.png";

pub const CHECKED_MARKER: &str = "- [x] ";
pub const UNCHECKED_MARKER: &str = "- [ ] ";

fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| &*a.value)
}

/// `src` with [`THUMB_SUFFIX`] appended, unless it already ends with it.
pub fn thumb_source(src: &str) -> String {
    if src.ends_with(THUMB_SUFFIX) {
        src.to_string()
    } else {
        format!("{}{}", src, THUMB_SUFFIX)
    }
}

/// Task marker for a checkbox `<input>`; other inputs keep their content.
fn input_handler(element: Element) -> Option<String> {
    let is_checkbox =
        attr(&element, "type").is_some_and(|t| t.trim().eq_ignore_ascii_case("checkbox"));
    if !is_checkbox {
        return Some(element.content.to_string());
    }
    let marker = if attr(&element, "checked").is_some() {
        CHECKED_MARKER
    } else {
        UNCHECKED_MARKER
    };
    Some(marker.to_string())
}

fn clean_label(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().replace('"', "\\\""))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `![alt](src_thumb.png "title")`. Images without `src` are dropped.
fn img_handler(element: Element) -> Option<String> {
    let src = attr(&element, "src")?;
    let src = if src.is_empty() {
        String::new()
    } else {
        thumb_source(src)
    };
    let link = src.replace('(', "\\(").replace(')', "\\)");
    let link = if link.contains(' ') {
        format!("<{}>", link)
    } else {
        link
    };
    let alt = attr(&element, "alt").map(clean_label).unwrap_or_default();
    let title = attr(&element, "title")
        .map(|t| format!(" \"{}\"", clean_label(t)))
        .unwrap_or_default();

    Some(format!("![{}]({}{})", alt, link, title))
}

/// Converts note HTML to Markdown. Build once per run.
pub struct Renderer {
    converter: HtmlToMarkdown,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style"])
            .add_handler(vec!["input"], input_handler)
            .add_handler(vec!["img"], img_handler)
            .build();
        Self { converter }
    }

    pub fn html_to_markdown(&self, html: &str) -> Result<String> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }
        self.converter
            .convert(html)
            .wrap_err("HTML to Markdown conversion failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        Renderer::new().html_to_markdown(html).unwrap()
    }

    #[test]
    fn checkbox_states() {
        let md = render(
            r#"<div><input type="checkbox" checked>Buy milk</div><div><input type="checkbox">Call mom</div><div><input type='CHECKBOX' checked="checked"/>Pay rent</div>"#,
        );
        assert!(md.contains("- [x] Buy milk"), "{md}");
        assert!(md.contains("- [ ] Call mom"), "{md}");
        assert!(md.contains("- [x] Pay rent"), "{md}");
        assert_eq!(md.matches("- [x] ").count(), 2);
        assert_eq!(md.matches("- [ ] ").count(), 1);
    }

    #[test]
    fn non_checkbox_inputs_are_not_markers() {
        let md = render(r#"<p><input type="text" value="checked">a<input class="checked">b</p>"#);
        assert_eq!(md, "ab");
    }

    #[test]
    fn checked_in_other_attribute_value_is_not_checked() {
        let md = render(r#"<p><input type="checkbox" class="checked">x</p>"#);
        assert_eq!(md, "- [ ] x");
    }

    #[test]
    fn thumb_suffix_is_idempotent() {
        assert_eq!(thumb_source("img/a.png"), "img/a.png_thumb.png");
        assert_eq!(thumb_source("img/a.png_thumb.png"), "img/a.png_thumb.png");
        assert_eq!(thumb_source(&thumb_source("x")), thumb_source("x"));
    }

    #[test]
    fn image_sources_rewritten() {
        assert_eq!(render(r#"<p><img src="pic.png"></p>"#), "![](pic.png_thumb.png)");
        assert_eq!(
            render(r#"<p><img alt="cat" src="cat.jpg"></p>"#),
            "![cat](cat.jpg_thumb.png)"
        );
    }

    #[test]
    fn already_suffixed_sources_unchanged() {
        assert_eq!(render(r#"<p><IMG SRC='dog_thumb.png' /></p>"#), "![](dog_thumb.png)");
    }

    #[test]
    fn angle_bracket_in_attribute_value() {
        assert_eq!(
            render(r#"<p><img alt="a>b" src="x.png"></p>"#),
            "![a>b](x.png_thumb.png)"
        );
        let md = render(r#"<p><input data-note="1>0" type="checkbox" checked>ok</p>"#);
        assert_eq!(md, "- [x] ok");
    }

    #[test]
    fn images_without_src_dropped_and_empty_src_kept() {
        assert_eq!(render(r#"<p>a<img alt="none">b</p>"#), "ab");
        assert_eq!(render(r#"<p><img src=""></p>"#), "![]()");
    }

    #[test]
    fn markdown_paragraph() {
        assert_eq!(render("<p>Hi</p>"), "Hi");
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(render(""), "");
        assert_eq!(render("  \n"), "");
    }
}
