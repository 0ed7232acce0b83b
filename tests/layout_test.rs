//! Rendering conversations onto the recording canvas.

use std::io::Cursor;

use rs_chat_export::layout::{render, DrawOp, PreloadedImages, RecordingCanvas};
use rs_chat_export::{export, Conversation, Item, LayoutOptions, Message, Options, Speaker};

const EPSILON: f64 = 1e-6;

fn layout() -> LayoutOptions {
    LayoutOptions { exported_at: Some("2024-05-01 08:30:00".to_string()), ..LayoutOptions::default() }
}

fn single(items: Vec<Item>) -> Conversation {
    Conversation {
        title: "Layout check".to_string(),
        messages: vec![Message { speaker: Speaker::Assistant, timestamp: "08:30:00".to_string(), items }],
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png).unwrap();
    buf
}

fn table_item() -> Item {
    Item::Table {
        headers: vec!["Mass".to_string(), "Speed".to_string()],
        rows: vec![
            vec!["2".to_string(), "3".to_string()],
            vec!["4".to_string(), "5".to_string()],
        ],
        y: None,
    }
}

#[tokio::test]
async fn long_conversation_stays_inside_margins() {
    let layout = layout();
    let code: String = (0..120).map(|i| format!("let value_{i} = {i};\n")).collect();
    let mut messages = Vec::new();
    for turn in 0..6 {
        let items = (0..25)
            .map(|i| Item::text(format!("Turn {turn} paragraph {i} with enough words to wrap around the page width at least once or twice.")))
            .chain(std::iter::once(Item::code(code.clone(), "rust")))
            .collect();
        let speaker = if turn % 2 == 0 { Speaker::User } else { Speaker::Assistant };
        messages.push(Message { speaker, timestamp: "08:30:00".to_string(), items });
    }
    let conversation = Conversation { title: "Long".to_string(), messages };

    let mut canvas = RecordingCanvas::from_layout(&layout);
    let doc = render(&mut canvas, &conversation, &layout, &PreloadedImages::new()).await.unwrap();

    assert!(doc.pages > 3);
    assert_eq!(doc.pages, canvas.pages().len());
    assert!(doc.warnings.is_empty());
    let bottom = layout.content_bottom();
    for (page, op) in canvas.ops() {
        assert!(op.bottom() <= bottom + EPSILON, "page {page}: {op:?} crosses the bottom margin");
    }
    for page in canvas.pages().iter().skip(1) {
        assert!(page.iter().all(|op| op.top() >= layout.margin_top - EPSILON));
    }
}

#[tokio::test]
async fn every_paragraph_is_drawn_once() {
    let layout = LayoutOptions { page_height: 150.0, ..layout() };
    let items = (0..30).map(|i| Item::text(format!("Entry {i}"))).collect();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    render(&mut canvas, &single(items), &layout, &PreloadedImages::new()).await.unwrap();

    let texts = canvas.texts();
    for i in 0..30 {
        let entry = format!("Entry {i}");
        assert_eq!(texts.iter().filter(|t| **t == entry).count(), 1);
    }
}

#[tokio::test]
async fn code_caption_lines_not_drawn() {
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    let item = Item::code("java\ncopy edit\nSystem.out.println(1);", "java");
    render(&mut canvas, &single(vec![item]), &layout, &PreloadedImages::new()).await.unwrap();

    let code_lines: Vec<&DrawOp> = canvas
        .ops()
        .map(|(_, op)| op)
        .filter(|op| matches!(op, DrawOp::Text { font, .. } if font.family == rs_chat_export::layout::FontFamily::Courier))
        .collect();
    assert_eq!(code_lines.len(), 1);
    let DrawOp::Text { lines, .. } = code_lines[0] else { unreachable!() };
    assert_eq!(lines, &vec!["System.out.println(1);".to_string()]);
}

#[tokio::test]
async fn table_reaches_the_canvas_intact() {
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    render(&mut canvas, &single(vec![table_item()]), &layout, &PreloadedImages::new()).await.unwrap();

    let tables = canvas.tables();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].headers, vec!["Mass", "Speed"]);
    assert_eq!(tables[0].rows, vec![vec!["2", "3"], vec!["4", "5"]]);
}

#[tokio::test]
async fn boxes_after_a_continuation_marker_stay_inside_margins() {
    let layout = LayoutOptions { page_height: 120.0, ..layout() };
    let bottom = layout.content_bottom();
    for filler in 0..6 {
        for size in 1..=30 {
            let terms: Vec<String> = (0..size * 10).map(|i| format!("x{i}")).collect();
            let rows = (0..size).map(|i| vec![i.to_string(), (i * i).to_string()]).collect();
            let items = (0..filler)
                .map(|i| Item::text(format!("Filler paragraph {i}")))
                .chain([
                    Item::equation(terms.join(" + ")),
                    Item::Table { headers: vec!["n".to_string(), "n^2".to_string()], rows, y: None },
                ])
                .collect();

            let mut canvas = RecordingCanvas::from_layout(&layout);
            render(&mut canvas, &single(items), &layout, &PreloadedImages::new()).await.unwrap();
            for (page, op) in canvas.ops() {
                assert!(
                    op.bottom() <= bottom + EPSILON,
                    "filler {filler}, size {size}, page {page}: {op:?} crosses the bottom margin"
                );
            }
        }
    }
}

#[tokio::test]
async fn table_without_grid_support_drawn_as_rows() {
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout).without_tables();
    let doc = render(&mut canvas, &single(vec![table_item()]), &layout, &PreloadedImages::new())
        .await
        .unwrap();

    assert!(canvas.tables().is_empty());
    let texts = canvas.texts();
    assert!(texts.contains(&"Mass | Speed".to_string()));
    assert!(texts.contains(&"2 | 3".to_string()));
    assert!(texts.contains(&"4 | 5".to_string()));
    assert!(doc.warnings.iter().any(|w| w.contains("table")));
}

#[tokio::test]
async fn cross_origin_image_becomes_placeholder() {
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    let item = Item::Image { content: "https://cdn.test/plot.png".to_string(), width: None, height: None, y: None };
    let doc = render(&mut canvas, &single(vec![item]), &layout, &PreloadedImages::new())
        .await
        .unwrap();

    assert!(!canvas.ops().any(|(_, op)| matches!(op, DrawOp::Image { .. })));
    let texts = canvas.texts();
    assert!(texts.contains(&"Image".to_string()));
    assert!(texts.contains(&"https://cdn.test/plot.png".to_string()));
    assert_eq!(doc.warnings.len(), 1);
}

#[tokio::test]
async fn preloaded_image_is_embedded_at_pixel_size() {
    let layout = layout();
    let bytes = png(400, 300);
    let images = PreloadedImages::new().with("https://cdn.test/plot.png", bytes.clone());
    let item = Item::Image { content: "https://cdn.test/plot.png".to_string(), width: None, height: None, y: None };
    let mut canvas = RecordingCanvas::from_layout(&layout);
    render(&mut canvas, &single(vec![item]), &layout, &images).await.unwrap();

    let drawn = canvas.ops().find_map(|(_, op)| match op {
        DrawOp::Image { width, height, bytes: len, .. } => Some((*width, *height, *len)),
        _ => None,
    });
    let (width, height, len) = drawn.unwrap();
    assert_eq!(len, bytes.len());
    assert!((width / height - 4.0 / 3.0).abs() < 1e-9);
    assert!(width <= layout.content_width() + EPSILON);
}

#[tokio::test]
async fn list_entries_indented_by_depth() {
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    let items = vec![Item::text("• top level"), Item::text("•   nested")];
    render(&mut canvas, &single(items), &layout, &PreloadedImages::new()).await.unwrap();

    let x_of = |needle: &str| {
        canvas.ops().find_map(|(_, op)| match op {
            DrawOp::Text { lines, x, .. } if lines.iter().any(|l| l.contains(needle)) => Some(*x),
            _ => None,
        })
    };
    let top = x_of("top level").unwrap();
    let nested = x_of("nested").unwrap();
    assert!(top > layout.margin_left);
    assert!(nested > top);
}

#[tokio::test]
async fn export_end_to_end() {
    let html = r#"<html><head><title>Torque - ChatGPT</title></head><body>
        <div data-message-author-role="user"><p>What is torque?</p></div>
        <div data-message-author-role="assistant"><p>Force times lever arm.</p>
          <div class="katex-display"><span class="katex" data-latex="\tau = r F">τ=rF</span></div></div>
        </body></html>"#;
    let opts = Options { timestamp: Some("08:30:00".to_string()), ..Options::default() };
    let layout = layout();
    let mut canvas = RecordingCanvas::from_layout(&layout);
    let doc = export(html, &opts, &layout, &mut canvas, &PreloadedImages::new()).await.unwrap();

    assert_eq!(doc.filename, "Torque.json");
    assert_eq!(doc.pages, 1);
    let texts = canvas.texts();
    assert!(texts.contains(&"What is torque?".to_string()));
    assert!(texts.iter().any(|t| t.contains('τ')));

    let pages: serde_json::Value = serde_json::from_slice(&doc.bytes).unwrap();
    assert_eq!(pages.as_array().map(Vec::len), Some(1));
}
