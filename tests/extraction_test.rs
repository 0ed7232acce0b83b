//! End-to-end extraction: container location, classification, speakers,
//! ordering and the fallback guarantee.

use rs_chat_export::extractor::EMPTY_PAGE_DIAGNOSTIC;
use rs_chat_export::{extract, extract_bytes, extract_with_options, Conversation, Item, ItemKind, Options, Speaker};

fn options() -> Options {
    Options { timestamp: Some("12:00:00".to_string()), ..Options::default() }
}

fn kinds(conversation: &Conversation, message: usize) -> Vec<ItemKind> {
    conversation.messages[message].items.iter().map(Item::kind).collect()
}

const SORTING_PAGE: &str = r#"<html><head><title>Sorting help - ChatGPT</title></head><body><main>
<div data-testid="conversation-turn-1">
  <div data-message-author-role="user"><div class="whitespace-pre-wrap">How do I sort a list in Python?</div></div>
</div>
<div data-testid="conversation-turn-2">
  <div data-message-author-role="assistant"><div class="markdown prose">
    <p>Use the built-in sorted function.</p>
    <pre><div class="flex"><span>python</span><button>Copy code</button></div><code class="language-python">items = [3, 1, 2]
print(sorted(items))</code></pre>
    <table>
      <thead><tr><th>Input</th><th>Output</th></tr></thead>
      <tbody><tr><td>[3, 1, 2]</td><td>[1, 2, 3]</td></tr></tbody>
    </table>
    <ul><li>Stable sort</li><li>Returns a new list</li></ul>
    <img src="https://files.test/chart.png" width="400" height="300">
  </div></div>
</div>
</main></body></html>"#;

#[test]
fn extracts_a_full_exchange() {
    let conversation = extract_with_options(SORTING_PAGE, &options());

    assert_eq!(conversation.title, "Sorting help");
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[0].speaker, Speaker::User);
    assert_eq!(conversation.messages[1].speaker, Speaker::Assistant);
    assert_eq!(conversation.messages[0].timestamp, "12:00:00");

    assert_eq!(
        conversation.messages[0].items[0].content(),
        Some("How do I sort a list in Python?")
    );
    assert_eq!(
        kinds(&conversation, 1),
        vec![ItemKind::Text, ItemKind::Code, ItemKind::Table, ItemKind::Text, ItemKind::Text, ItemKind::Image]
    );
}

#[test]
fn code_block_keeps_language_and_drops_toolbar() {
    let conversation = extract_with_options(SORTING_PAGE, &options());
    let code = &conversation.messages[1].items[1];

    assert_eq!(
        code,
        &Item::Code {
            content: "items = [3, 1, 2]\nprint(sorted(items))".to_string(),
            language: "python".to_string(),
            y: code.y(),
        }
    );
}

#[test]
fn table_headers_and_rows() {
    let conversation = extract_with_options(SORTING_PAGE, &options());
    let Item::Table { headers, rows, .. } = &conversation.messages[1].items[2] else {
        panic!("expected a table");
    };
    assert_eq!(headers, &vec!["Input".to_string(), "Output".to_string()]);
    assert_eq!(rows, &vec![vec!["[3, 1, 2]".to_string(), "[1, 2, 3]".to_string()]]);
}

#[test]
fn list_items_carry_markers() {
    let conversation = extract_with_options(SORTING_PAGE, &options());
    let texts: Vec<&str> = conversation.messages[1].items.iter().filter_map(Item::content).collect();
    assert!(texts.contains(&"• Stable sort"));
    assert!(texts.contains(&"• Returns a new list"));
}

#[test]
fn loose_list_items_carry_markers() {
    let html = r#"<body><div data-message-author-role="assistant">
        <ol><li><p>Heat the pan until it is hot</p></li><li><p>Add the oil and wait</p></li></ol>
        <ul><li><p>Stir gently with a spoon</p></li></ul>
    </div></body>"#;
    let conversation = extract_with_options(html, &options());
    let texts: Vec<&str> = conversation.messages[0].items.iter().filter_map(Item::content).collect();
    assert_eq!(
        texts,
        vec!["1. Heat the pan until it is hot", "2. Add the oil and wait", "• Stir gently with a spoon"]
    );
}

#[test]
fn duplicate_adjacent_container_yields_one_message() {
    let html = r#"<body>
        <div class="group w-full"><p>Explain inertia</p></div>
        <div class="group w-full"><p>Explain   inertia </p></div>
        <div class="group w-full"><p>Inertia resists changes in motion.</p></div>
    </body>"#;
    let conversation = extract_with_options(html, &options());

    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[0].items[0].content(), Some("Explain inertia"));
    assert_eq!(conversation.messages[1].items[0].content(), Some("Inertia resists changes in motion."));
}

#[test]
fn container_without_items_yields_no_message() {
    let html = r#"<body>
        <div data-message-author-role="user"><p>Hello</p></div>
        <div data-message-author-role="assistant"><p>python</p><p>4o</p></div>
    </body>"#;
    let conversation = extract_with_options(html, &options());

    assert_eq!(conversation.messages.len(), 1);
    assert!(conversation.messages.iter().all(|m| !m.items.is_empty()));
}

#[test]
fn equation_restated_as_text_is_dropped_across_turns() {
    let html = r#"<body>
        <div data-message-author-role="user">
          <div class="katex-display"><span class="katex" data-latex="F=ma">F=ma</span></div>
        </div>
        <div data-message-author-role="assistant"><p>F = m * a</p></div>
    </body>"#;
    let conversation = extract_with_options(html, &options());

    let equations: Vec<&Item> = conversation
        .messages
        .iter()
        .flat_map(|m| &m.items)
        .filter(|i| i.kind() == ItemKind::Equation)
        .collect();
    assert_eq!(equations.len(), 1);
    assert_eq!(equations[0].content(), Some("F=ma"));
    // the assistant turn had nothing else, so it is gone
    assert_eq!(conversation.messages.len(), 1);
}

#[test]
fn items_sorted_by_measured_position() {
    let html = r#"<body><div data-message-author-role="assistant">
        <p data-top="30">third</p><p data-top="10">first</p><p data-top="20">second</p>
    </div></body>"#;
    let conversation = extract_with_options(html, &options());
    let items = &conversation.messages[0].items;

    let ys: Vec<f64> = items.iter().filter_map(Item::y).collect();
    assert_eq!(ys, vec![10.0, 20.0, 30.0]);
    let texts: Vec<&str> = items.iter().filter_map(Item::content).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn custom_geometry_attribute() {
    let html = r#"<body><div data-message-author-role="assistant">
        <p data-y="2">b</p><p data-y="1">a</p>
    </div></body>"#;
    let opts = Options { geometry_attribute: "data-y".to_string(), ..options() };
    let conversation = extract_with_options(html, &opts);
    let texts: Vec<&str> = conversation.messages[0].items.iter().filter_map(Item::content).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn inline_math_stays_in_the_sentence() {
    let html = r#"<body><div data-message-author-role="assistant">
        <p>The value <span class="katex" data-latex="x^2"><span class="katex-html">x2</span></span> is positive.</p>
    </div></body>"#;
    let conversation = extract_with_options(html, &options());
    let items = &conversation.messages[0].items;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content(), Some("The value x^2 is positive."));
}

#[test]
fn icons_skipped_and_relative_images_resolved() {
    let html = r#"<body><div data-message-author-role="assistant">
        <p>Here is the chart.</p>
        <img src="/avatar.png" width="16" height="16">
        <img src="/chart.png" width="400" height="300">
    </div></body>"#;
    let opts = Options { base_url: Some("https://chat.test/c/1".to_string()), ..options() };
    let conversation = extract_with_options(html, &opts);
    let images: Vec<&Item> = conversation.messages[0]
        .items
        .iter()
        .filter(|i| i.kind() == ItemKind::Image)
        .collect();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].content(), Some("https://chat.test/chart.png"));
}

#[test]
fn speaker_parity_without_role_markers() {
    // Parity is a best-effort guess; it only holds for strictly alternating turns.
    let html = r#"<body>
        <div class="group w-full"><p>first</p></div>
        <div class="group w-full"><p>second</p></div>
        <div class="group w-full"><p>third</p></div>
    </body>"#;
    let conversation = extract_with_options(html, &options());
    let speakers: Vec<Speaker> = conversation.messages.iter().map(|m| m.speaker).collect();
    assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant, Speaker::User]);
}

#[test]
fn fallback_uses_page_text() {
    let html = "<html><body><nav>Home</nav><header>Notes</header><p>Just some article text.</p></body></html>";
    let conversation = extract(html);
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].speaker, Speaker::Assistant);
    assert_eq!(conversation.messages[0].items[0].content(), Some("Notes Just some article text."));
}

#[test]
fn fallback_diagnostic_on_empty_page() {
    let conversation = extract("<html><body><script>var a = 1;</script></body></html>");
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].items[0].content(), Some(EMPTY_PAGE_DIAGNOSTIC));
    assert_eq!(conversation.title, "ChatGPT Conversation");
}

#[test]
fn snapshot_bytes_are_decoded() {
    let html = b"<html><head><meta charset=\"windows-1252\"></head><body>\
        <div data-message-author-role=\"user\"><p>\x93Caf\xE9\x94 menu?</p></div></body></html>";
    let conversation = extract_bytes(html);
    assert_eq!(conversation.messages[0].items[0].content(), Some("\u{201C}Café\u{201D} menu?"));
}

#[test]
fn conversation_json_round_trip() {
    let conversation = extract_with_options(SORTING_PAGE, &options());
    let json = conversation.to_json().unwrap();
    assert!(json.contains(r#""type":"code""#));
    assert_eq!(Conversation::from_json(&json).unwrap(), conversation);
}
