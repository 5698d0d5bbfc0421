//! Portable Text rendering.
//!
//! Converts Portable Text block arrays into escaped HTML:
//! - text blocks with `normal`, `h2`-`h4` and `blockquote` styles
//! - bullet and numbered list items, grouped into `<ul>`/`<ol>`
//! - `strong`, `em`, `underline`, `code` and `strike-through` marks
//! - link annotations restricted to http, https and mailto
//! - image blocks, when an image URL builder is available
//!
//! Unknown block types are skipped.

use serde_json::Value;

use crate::cms::ImageUrlBuilder;
use crate::models::ImageRef;
use crate::routes::helpers::html_escape;

/// Render a block array to HTML.
pub fn render_html(blocks: &Value, images: Option<&ImageUrlBuilder>) -> String {
    let Some(blocks) = blocks.as_array() else {
        return String::new();
    };

    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = block
            .get("listItem")
            .and_then(Value::as_str)
            .map(|kind| if kind == "number" { "ol" } else { "ul" });

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{tag}>"));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{tag}>"));
            }
            open_list = list_tag;
        }

        match block.get("_type").and_then(Value::as_str) {
            Some("block") => {
                let inner = render_children(block);
                if list_tag.is_some() {
                    html.push_str(&format!("<li>{inner}</li>"));
                    continue;
                }
                let tag = match block.get("style").and_then(Value::as_str) {
                    Some(style @ ("h2" | "h3" | "h4")) => style,
                    Some("blockquote") => "blockquote",
                    _ => "p",
                };
                html.push_str(&format!("<{tag}>{inner}</{tag}>"));
            }
            Some("image") => {
                if let Some(figure) = images.and_then(|b| render_image(block, b)) {
                    html.push_str(&figure);
                }
            }
            _ => {}
        }
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{tag}>"));
    }
    html
}

/// Concatenated text of all text blocks, one block per line.
pub fn plain_text(blocks: &Value) -> String {
    let Some(blocks) = blocks.as_array() else {
        return String::new();
    };
    blocks
        .iter()
        .filter(|b| b.get("_type").and_then(Value::as_str) == Some("block"))
        .map(|b| {
            children(b)
                .iter()
                .filter_map(|c| c.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn children(block: &Value) -> &[Value] {
    block
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn render_children(block: &Value) -> String {
    let mark_defs = block.get("markDefs").and_then(Value::as_array);
    let mut html = String::new();

    for span in children(block) {
        let text = span.get("text").and_then(Value::as_str).unwrap_or("");
        let mut rendered = html_escape(text).replace('\n', "<br>");

        let marks = span.get("marks").and_then(Value::as_array);
        for mark in marks.into_iter().flatten().filter_map(Value::as_str) {
            rendered = match mark {
                "strong" => format!("<strong>{rendered}</strong>"),
                "em" => format!("<em>{rendered}</em>"),
                "underline" => format!("<u>{rendered}</u>"),
                "code" => format!("<code>{rendered}</code>"),
                "strike-through" => format!("<s>{rendered}</s>"),
                key => match link_href(mark_defs, key) {
                    Some(href) => format!("<a href=\"{}\">{rendered}</a>", html_escape(href)),
                    None => rendered,
                },
            };
        }
        html.push_str(&rendered);
    }
    html
}

/// Resolve a link annotation key to a safe href.
fn link_href<'a>(mark_defs: Option<&'a Vec<Value>>, key: &str) -> Option<&'a str> {
    let def = mark_defs?
        .iter()
        .find(|d| d.get("_key").and_then(Value::as_str) == Some(key))?;
    if def.get("_type").and_then(Value::as_str) != Some("link") {
        return None;
    }
    let href = def.get("href").and_then(Value::as_str)?.trim();
    let safe = href.starts_with("https://") || href.starts_with("http://") || href.starts_with("mailto:");
    safe.then_some(href)
}

fn render_image(block: &Value, images: &ImageUrlBuilder) -> Option<String> {
    let image: ImageRef = serde_json::from_value(block.clone()).ok()?;
    let src = images.scaled(&image, 1200)?;
    let alt = image.alt_text().unwrap_or("");
    Some(format!(
        "<figure><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></figure>",
        html_escape(&src),
        html_escape(alt)
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(style: &str, text: &str) -> Value {
        json!({
            "_type": "block",
            "style": style,
            "children": [{"_type": "span", "text": text, "marks": []}]
        })
    }

    #[test]
    fn paragraphs_and_headings() {
        let html = render_html(&json!([block("h2", "Impasto"), block("normal", "Mescolare")]), None);
        assert_eq!(html, "<h2>Impasto</h2><p>Mescolare</p>");
    }

    #[test]
    fn text_is_escaped() {
        let html = render_html(&json!([block("normal", "<script>alert(1)</script>")]), None);
        assert_eq!(html, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[test]
    fn marks_and_links() {
        let blocks = json!([{
            "_type": "block",
            "markDefs": [
                {"_key": "l1", "_type": "link", "href": "https://example.com"},
                {"_key": "l2", "_type": "link", "href": "javascript:alert(1)"}
            ],
            "children": [
                {"_type": "span", "text": "burro", "marks": ["strong"]},
                {"_type": "span", "text": " e ", "marks": []},
                {"_type": "span", "text": "zucchero", "marks": ["l1"]},
                {"_type": "span", "text": "!", "marks": ["l2"]}
            ]
        }]);
        assert_eq!(
            render_html(&blocks, None),
            "<p><strong>burro</strong> e <a href=\"https://example.com\">zucchero</a>!</p>"
        );
    }

    #[test]
    fn list_items_are_grouped() {
        let mut first = block("normal", "Uova");
        first["listItem"] = json!("bullet");
        let mut second = block("normal", "Farina");
        second["listItem"] = json!("bullet");
        let mut step = block("normal", "Impastare");
        step["listItem"] = json!("number");

        let html = render_html(&json!([first, second, step, block("normal", "Fine")]), None);
        assert_eq!(
            html,
            "<ul><li>Uova</li><li>Farina</li></ul><ol><li>Impastare</li></ol><p>Fine</p>"
        );
    }

    #[test]
    fn images_need_a_builder() {
        let blocks = json!([{"_type": "image", "asset": {"_ref": "image-abc-800x600-jpg"}, "alt": "Torta"}]);
        assert_eq!(render_html(&blocks, None), "");
        let builder = ImageUrlBuilder::new("p1", "production");
        let html = render_html(&blocks, Some(&builder));
        assert!(html.contains("https://cdn.sanity.io/images/p1/production/abc-800x600.jpg?w=1200"));
        assert!(html.contains("alt=\"Torta\""));
    }

    #[test]
    fn plain_text_joins_blocks() {
        let blocks = json!([block("h2", "Crema"), {"_type": "image"}, block("normal", "Pasticcera")]);
        assert_eq!(plain_text(&blocks), "Crema\nPasticcera");
        assert_eq!(plain_text(&Value::Null), "");
    }
}
