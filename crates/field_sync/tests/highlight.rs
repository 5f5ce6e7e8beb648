//! Debounced preview highlighting and click-to-focus sync.

use anyhow::{Result, anyhow};
use core::cell::RefCell;
use core::time::Duration;
use field_sync::highlight::{CLICKABLE_CLASS, HIGHLIGHT_CLASS, STYLE_ELEMENT_ID, TOOLTIP_CLASS};
use field_sync::{
    FormSignal, FrameRequest, HighlightOutcome, Strategy, SyncConfig, Synchronizer, inject_styles,
    locate_with_strategy, setup_bidirectional_sync,
};
use html::{DOM, NodeId, parse_document};
use std::rc::Rc;
use tokio::time::Instant;

const PREVIEW: &str = "<div class=\"card\" style=\"color: red\">\
    <h1 id=\"title\">Welcome</h1>\
    <p data-field=\"code\">SAVE10</p>\
    </div>";

fn by_id(dom: &DOM, id: &str) -> Result<NodeId> {
    dom.element_by_id(id).ok_or_else(|| anyhow!("no element with id {id:?}"))
}

fn decorated(dom: &DOM) -> Vec<NodeId> {
    dom.elements()
        .filter(|node| dom.has_class(*node, HIGHLIGHT_CLASS))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn only_the_last_rapid_request_is_decorated() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::default();

    sync.highlight_field("title", Some("Title"));
    sync.highlight_field("code", Some("Coupon code"));
    assert!(decorated(&dom).is_empty());
    assert_eq!(sync.poll(&mut dom, Instant::now()), None);
    assert!(decorated(&dom).is_empty());
    assert_eq!(sync.pending_field(), Some("code"));

    let outcome = sync.settle(&mut dom).await;
    let code = dom
        .first_element_by_tag("p")
        .ok_or_else(|| anyhow!("no <p>"))?;
    assert_eq!(
        outcome,
        Some(HighlightOutcome::Highlighted {
            field: "code".to_owned(),
            node: code,
        })
    );
    assert_eq!(decorated(&dom), vec![code]);
    assert_eq!(sync.highlighted_node("title"), None);
    assert_eq!(sync.active_field(), Some("code"));
    assert_eq!(sync.superseded_requests(), 1);
    assert_eq!(sync.settle(&mut dom).await, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn request_fires_once_the_window_has_passed() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::new(SyncConfig::new().with_debounce_ms(100));
    let start = Instant::now();
    sync.highlight_field_at("title", None, start);
    assert_eq!(sync.next_deadline(), Some(start + Duration::from_millis(100)));
    assert_eq!(sync.poll(&mut dom, start + Duration::from_millis(99)), None);
    let fired = sync.poll(&mut dom, start + Duration::from_millis(100));
    assert!(matches!(fired, Some(HighlightOutcome::Highlighted { .. })));
    assert!(dom.has_class(by_id(&dom, "title")?, HIGHLIGHT_CLASS));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn switching_fields_moves_decoration_and_tooltip() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::default();
    let card = dom.first_element_by_tag("div").ok_or_else(|| anyhow!("no card"))?;

    sync.highlight_field("title", Some("Headline"));
    sync.settle(&mut dom).await;
    let tooltip = sync.tooltip_node("title").ok_or_else(|| anyhow!("no tooltip"))?;
    assert!(dom.has_class(tooltip, TOOLTIP_CLASS));
    assert_eq!(dom.text_content(tooltip), "Headline");
    assert_eq!(dom.parent(tooltip), Some(card));
    assert_eq!(dom.attr(card, "style"), Some("color: red; position: relative"));

    sync.highlight_field("code", None);
    sync.settle(&mut dom).await;
    assert!(!dom.contains(tooltip));
    assert!(!dom.has_class(by_id(&dom, "title")?, HIGHLIGHT_CLASS));
    assert_eq!(sync.tooltip_node("code"), None);
    assert_eq!(decorated(&dom).len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn positioned_parent_keeps_its_position() -> Result<()> {
    let mut dom = parse_document("<div style=\"position: absolute\"><b id=\"x\">x</b></div>")?;
    let mut sync = Synchronizer::default();
    sync.highlight_field("x", Some("X"));
    sync.settle(&mut dom).await;
    let parent = dom.first_element_by_tag("div").ok_or_else(|| anyhow!("no div"))?;
    assert_eq!(dom.attr(parent, "style"), Some("position: absolute"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn scroll_is_queued_for_the_next_frame() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::new(SyncConfig::new().with_tooltips(false));
    sync.highlight_field("title", Some("ignored"));
    sync.settle(&mut dom).await;
    let title = by_id(&dom, "title")?;
    assert_eq!(sync.tooltip_node("title"), None);
    assert_eq!(
        sync.take_frame_requests(),
        vec![FrameRequest::ScrollIntoView {
            node: title,
            centered: true,
        }]
    );
    assert!(sync.take_frame_requests().is_empty());

    let mut quiet = Synchronizer::new(SyncConfig::new().with_scroll_into_view(false));
    quiet.highlight_field("title", None);
    quiet.settle(&mut dom).await;
    assert!(quiet.take_frame_requests().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn missing_field_leaves_state_idle() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::default();
    sync.highlight_field("nowhere", Some("Nowhere"));
    let outcome = sync.settle(&mut dom).await;
    assert_eq!(
        outcome,
        Some(HighlightOutcome::NotFound {
            field: "nowhere".to_owned(),
        })
    );
    assert!(sync.is_idle());
    assert!(decorated(&dom).is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn blur_cancels_a_pending_focus() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::default();
    sync.handle_form_signal(
        &mut dom,
        FormSignal::Focus {
            field: "title".to_owned(),
            display_name: None,
        },
    );
    sync.handle_form_signal(&mut dom, FormSignal::Blur);
    assert_eq!(sync.settle(&mut dom).await, None);
    assert!(sync.is_idle());
    assert!(decorated(&dom).is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn clear_and_cleanup_are_repeatable() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let before = dom.to_html();
    let mut sync = Synchronizer::default();
    sync.clear_highlight(&mut dom);
    assert!(sync.is_idle());
    assert_eq!(dom.to_html(), before);

    sync.highlight_field("title", None);
    sync.settle(&mut dom).await;
    sync.cleanup(&mut dom);
    sync.cleanup(&mut dom);
    assert!(sync.is_idle());
    assert_eq!(sync.active_field(), None);
    assert!(decorated(&dom).is_empty());
    assert!(sync.take_frame_requests().is_empty());
    Ok(())
}

#[test]
fn clicks_on_field_elements_reach_the_form() -> Result<()> {
    let mut dom = parse_document(
        "<section>\
           <span id=\"visible\">x</span>\
           <span data-field=\"gone\" style=\"display: none\">x</span>\
           <span name=\"ghost\" style=\"visibility:hidden\">x</span>\
           <span data-id=\"flat\" style=\"height: 0px\">x</span>\
           <div data-field-id=\"empty\"></div>\
           <div hidden><b id=\"inner\">x</b></div>\
           <img name=\"logo\" src=\"logo.png\">\
           <p>plain</p>\
         </section>",
    )?;
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    let mut binding = setup_bidirectional_sync(&mut dom, move |field: &str| {
        sink.borrow_mut().push(field.to_owned());
    });
    assert!(binding.is_active());

    let clickable: Vec<String> = dom
        .elements()
        .filter(|node| dom.has_class(*node, CLICKABLE_CLASS))
        .filter_map(|node| field_sync::field_id_of(&dom, node).map(str::to_owned))
        .collect();
    assert_eq!(clickable, vec!["visible".to_owned(), "logo".to_owned()]);

    let visible = by_id(&dom, "visible")?;
    let event = dom.dispatch_click(visible);
    assert!(event.default_prevented());
    let plain = dom.first_element_by_tag("p").ok_or_else(|| anyhow!("no <p>"))?;
    let event = dom.dispatch_click(plain);
    assert!(!event.default_prevented());
    let hidden = by_id(&dom, "inner")?;
    dom.dispatch_click(hidden);
    assert_eq!(*clicked.borrow(), vec!["visible".to_owned(), "inner".to_owned()]);

    assert!(binding.release(&mut dom));
    assert!(!binding.release(&mut dom));
    assert_eq!(dom.click_listener_count(), 0);
    dom.dispatch_click(visible);
    assert_eq!(clicked.borrow().len(), 2);
    Ok(())
}

#[test]
fn synchronizer_cleanup_releases_click_sync() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    let mut sync = Synchronizer::default();
    let mut first = sync.setup_bidirectional_sync(&mut dom, |_field: &str| {});
    let _second = sync.setup_bidirectional_sync(&mut dom, |_field: &str| {});
    assert_eq!(dom.click_listener_count(), 1);
    assert!(!first.release(&mut dom));
    sync.cleanup(&mut dom);
    assert_eq!(dom.click_listener_count(), 0);
    sync.cleanup(&mut dom);
    Ok(())
}

#[test]
fn styles_are_injected_once() -> Result<()> {
    let mut dom = parse_document(PREVIEW)?;
    inject_styles(&mut dom)?;
    let style = inject_styles(&mut dom)?;
    let copies = dom
        .elements()
        .filter(|node| dom.attr(*node, "id") == Some(STYLE_ELEMENT_ID))
        .count();
    assert_eq!(copies, 1);
    assert_eq!(dom.parent(style), dom.head());
    assert!(dom.text_content(style).contains(".field-highlight"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn decorations_do_not_become_field_addresses() -> Result<()> {
    let mut dom = parse_document(
        "<h1 id=\"title\">Welcome</h1>\
         <span id=\"a\">x</span>\
         <p>Hit the {{highlight}} now, {{clickable}} too</p>",
    )?;
    let paragraph = dom.first_element_by_tag("p").ok_or_else(|| anyhow!("no <p>"))?;
    let mut sync = Synchronizer::new(SyncConfig::new().with_tooltips(true));

    sync.highlight_field("title", Some("Title"));
    sync.settle(&mut dom).await;
    sync.setup_bidirectional_sync(&mut dom, |_field: &str| {});
    assert!(dom.has_class(by_id(&dom, "title")?, HIGHLIGHT_CLASS));
    assert!(dom.has_class(by_id(&dom, "a")?, CLICKABLE_CLASS));

    for field in ["highlight", "clickable"] {
        let located =
            locate_with_strategy(&dom, field).ok_or_else(|| anyhow!("{field} not found"))?;
        assert_eq!(located.node, paragraph, "field {field}");
        assert_eq!(located.strategy, Strategy::TextScan, "field {field}");
    }
    assert_eq!(field_sync::locate(&dom, "highlight-tooltip"), None);
    sync.cleanup(&mut dom);
    Ok(())
}

#[test]
fn binding_only_releases_in_its_own_document() -> Result<()> {
    let mut first = parse_document(PREVIEW)?;
    let mut second = parse_document(PREVIEW)?;
    let mut binding = setup_bidirectional_sync(&mut first, |_field: &str| {});
    let mut other = setup_bidirectional_sync(&mut second, |_field: &str| {});

    assert!(!binding.release(&mut second));
    assert_eq!(second.click_listener_count(), 1);
    assert_eq!(first.click_listener_count(), 1);

    assert!(binding.is_active());

    assert!(other.release(&mut second));
    assert_eq!(second.click_listener_count(), 0);
    assert!(binding.release(&mut first));
    assert_eq!(first.click_listener_count(), 0);
    assert!(!binding.is_active());
    Ok(())
}
