use crate::dom::Element;
use crate::page::{Page, PageMode, SEARCH_INPUT_ID};
use crate::render::RenderOptions;
use crate::utils::escape_html;

const STYLESHEET: &str = "assets/style.css";
const INDEX_PAGE: &str = "index.html";

fn header(options: &RenderOptions) -> Element {
    Element::new("header")
        .class("header")
        .child(Element::new("h1").text(options.messages.site_title))
}

fn index_body(page: &Page, options: &RenderOptions) -> Element {
    let search = Element::new("input")
        .with_id(SEARCH_INPUT_ID)
        .attr("type", "search")
        .attr("placeholder", options.messages.search_placeholder)
        .attr("value", page.search_value());
    Element::new("main")
        .class("container")
        .child(Element::new("div").class("search-bar").child(search))
        .child(page.container().clone())
}

fn detail_body(page: &Page, options: &RenderOptions) -> Element {
    Element::new("main")
        .class("container")
        .child(
            Element::new("a")
                .class("back-link")
                .attr("href", INDEX_PAGE)
                .text(options.messages.back_to_list),
        )
        .child(page.container().clone())
}

/// Wraps the page's rendered container in a complete HTML document. The
/// body carries the `data-page` mode flag.
pub fn render_document(page: &Page, options: &RenderOptions) -> String {
    let main = match page.mode() {
        PageMode::Index => index_body(page, options),
        PageMode::Detail => detail_body(page, options),
    };
    let body = Element::new("body")
        .attr("data-page", page.mode().as_str())
        .child(header(options))
        .child(main);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!(
        "<html lang=\"{}\">\n",
        options.messages.locale.html_lang()
    ));
    out.push_str("<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    out.push_str(&format!(
        "  <title>{}</title>\n",
        escape_html(options.messages.site_title)
    ));
    out.push_str(&format!(
        "  <link rel=\"stylesheet\" href=\"{STYLESHEET}\">\n"
    ));
    out.push_str("</head>\n");
    body.write_html(&mut out);
    out.push_str("\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Locale, Messages};

    #[test]
    fn index_document_carries_mode_flag_and_search_input() {
        let page = Page::index();
        let html = render_document(&page, &RenderOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="zh-Hant">"#));
        assert!(html.contains(r#"<body data-page="index">"#));
        assert!(html.contains(r#"<input id="search" type="search""#));
        assert!(html.contains(r#"id="roll-list""#));
    }

    #[test]
    fn detail_document_uses_locale_strings() {
        let options = RenderOptions {
            messages: Messages::for_locale(Locale::En),
            ..RenderOptions::default()
        };
        let html = render_document(&Page::detail("?id=1"), &options);
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"<body data-page="detail">"#));
        assert!(html.contains("Back to list"));
        assert!(html.contains(r#"id="roll-detail""#));
    }
}
