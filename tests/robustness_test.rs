//! Malformed and hostile inputs: extraction must not panic and always
//! returns at least one non-empty message.

use rs_chat_export::layout::{render, PreloadedImages, RecordingCanvas};
use rs_chat_export::{extract, extract_bytes, LayoutOptions};

const INPUTS: &[&str] = &[
    "",
    "   ",
    "<",
    "<<<>>>",
    "<html",
    "<div data-message-author-role=",
    "<div data-message-author-role=\"user\">",
    "<div data-message-author-role=\"robot\"><p>who am I</p></div>",
    "<pre><code class=\"language-\"></code></pre>",
    "<table><tr></tr><tr><td></td></tr></table>",
    "<table><thead><tr><th>a</th></tr></thead><tbody><tr><td><table><tr><td>nested</td></tr></table></td></tr></tbody></table>",
    "<img><img src=\"\"><img src=\"x.png\" width=\"abc\" height=\"-4\">",
    "<span class=\"katex\"></span><math></math><div data-latex=\"\"></div>",
    "<p>unclosed <b>bold <i>italic</p></div></span>",
    "<div data-top=\"NaN\"><p data-top=\"inf\">odd positions</p></div>",
    "<main><div data-testid=\"conversation-turn-1\"></div></main>",
    "<script>document.write('<p>x</p>')</script><style>p{}</style>",
    "<button>Copy</button><nav>Edit</nav>",
    "\u{0}\u{1}\u{2}<p>\u{FEFF}\u{200B}</p>",
];

#[test]
fn malformed_pages_still_yield_a_message() {
    for input in INPUTS {
        let conversation = extract(input);
        assert!(!conversation.messages.is_empty(), "no message for {input:?}");
        assert!(conversation.messages.iter().all(|m| !m.items.is_empty()), "empty message for {input:?}");
        assert!(!conversation.title.is_empty());
    }
}

#[test]
fn deeply_nested_markup() {
    let depth = 500;
    let html = format!(
        "<div data-message-author-role=\"assistant\">{}<p>deep</p>{}</div>",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let conversation = extract(&html);
    assert!(!conversation.messages.is_empty());
}

#[test]
fn invalid_bytes_are_tolerated() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
    let conversation = extract_bytes(&bytes);
    assert!(!conversation.messages.is_empty());
}

#[tokio::test]
async fn malformed_pages_render() {
    let layout = LayoutOptions { exported_at: Some("2024-01-01 00:00:00".to_string()), ..LayoutOptions::default() };
    for input in INPUTS {
        let conversation = extract(input);
        let mut canvas = RecordingCanvas::from_layout(&layout);
        let doc = render(&mut canvas, &conversation, &layout, &PreloadedImages::new())
            .await
            .unwrap();
        assert!(doc.pages >= 1);
    }
}
