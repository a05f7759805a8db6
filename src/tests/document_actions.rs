use super::*;

use std::cell::RefCell;
use std::rc::Rc;

const FORM: &str = r#"
    <form id='f'>
      <input id='name' type='text'>
      <input id='frozen' type='text' disabled>
      <input id='agree' type='checkbox'>
      <input id='red' type='radio' name='color' value='red' checked>
      <input id='blue' type='radio' name='color' value='blue'>
      <select id='size'><option value=''>-</option><option value='s'>S</option></select>
      <textarea id='bio'></textarea>
      <button id='go' type='submit'>Go</button>
    </form>
    <div id='loose'></div>
    "#;

#[test]
fn type_text_sets_value_and_fires_input_then_change() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let name = doc.select_one("#name")?;
    let events = doc.type_text("#name", "Ada")?;
    assert_eq!(
        events,
        vec![
            UiEvent::new(UiEventKind::Input, name),
            UiEvent::new(UiEventKind::Change, name)
        ]
    );
    assert_eq!(doc.value(name)?, "Ada");

    doc.type_text("#bio", "line")?;
    assert_eq!(doc.value(doc.select_one("#bio")?)?, "line");
    Ok(())
}

#[test]
fn type_text_on_disabled_control_is_a_no_op() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    assert!(doc.type_text("#frozen", "x")?.is_empty());
    assert_eq!(doc.value(doc.select_one("#frozen")?)?, "");
    Ok(())
}

#[test]
fn type_text_rejects_non_text_controls() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    match doc.type_text("#agree", "x") {
        Err(Error::TypeMismatch { actual, .. }) => assert_eq!(actual, "input[type=checkbox]"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        doc.type_text("#size", "s"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        doc.type_text("#missing", "s"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}

#[test]
fn check_reports_only_real_changes() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let agree = doc.select_one("#agree")?;
    assert_eq!(doc.check("#agree", true)?.len(), 2);
    assert!(doc.checked(agree)?);
    assert!(doc.check("#agree", true)?.is_empty());
    assert!(matches!(
        doc.check("#name", true),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn checking_a_radio_unchecks_its_group() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let red = doc.select_one("#red")?;
    let blue = doc.select_one("#blue")?;
    assert!(doc.checked(red)?);

    doc.check("#blue", true)?;
    assert!(doc.checked(blue)?);
    assert!(!doc.checked(red)?);
    Ok(())
}

#[test]
fn choose_selects_matching_option_or_errors() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let size = doc.select_one("#size")?;
    assert_eq!(doc.value(size)?, "");

    let events = doc.choose("#size", "s")?;
    assert_eq!(events.last().map(|event| event.kind), Some(UiEventKind::Change));
    assert_eq!(doc.value(size)?, "s");

    assert!(matches!(
        doc.choose("#size", "xl"),
        Err(Error::SelectorNotFound(_))
    ));
    assert_eq!(doc.value(size)?, "s");
    Ok(())
}

#[test]
fn submit_and_reset_resolve_the_owning_form() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let form = doc.select_one("#f")?;
    assert_eq!(
        doc.submit("#go")?,
        vec![UiEvent::new(UiEventKind::Submit, form)]
    );
    assert_eq!(doc.reset("#f")?, vec![UiEvent::new(UiEventKind::Reset, form)]);
    assert!(matches!(
        doc.submit("#loose"),
        Err(Error::TypeMismatch { .. })
    ));

    let name = doc.select_one("#name")?;
    assert_eq!(doc.blur("#name")?, vec![UiEvent::new(UiEventKind::Blur, name)]);
    Ok(())
}

#[test]
fn dispatch_event_bubbles_to_ancestors() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let form = doc.select_one("#f")?;
    let name = doc.select_one("#name")?;
    let seen = Rc::new(RefCell::new(Vec::new()));

    for node in [name, form] {
        let seen = Rc::clone(&seen);
        doc.add_event_listener(node, "valid.zf.abide", move |event| {
            seen.borrow_mut().push((event.target, event.current_target));
        });
    }
    doc.add_event_listener(form, "invalid.zf.abide", |_| panic!("wrong notification"));

    let event = doc.dispatch_event(name, "valid.zf.abide")?;
    assert_eq!(event.target, name);
    assert_eq!(event.current_target, name);
    assert_eq!(*seen.borrow(), vec![(name, name), (name, form)]);

    assert_eq!(doc.listener_count(form, "valid.zf.abide"), 1);
    assert_eq!(doc.remove_event_listeners(form, "valid.zf.abide"), 1);
    doc.dispatch_event(name, "valid.zf.abide")?;
    assert_eq!(seen.borrow().len(), 3);
    Ok(())
}

#[test]
fn generated_ids_are_unique_and_seed_deterministic() -> Result<()> {
    let mut first = Document::from_html(FORM)?;
    let mut second = Document::from_html(FORM)?;
    first.set_random_seed(42);
    second.set_random_seed(42);

    let a = first.generate_id("abide-error");
    assert_eq!(a, second.generate_id("abide-error"));
    let (prefix, namespace) = a.split_once('-').unwrap_or_default();
    assert_eq!(namespace, "abide-error");
    assert_eq!(prefix.len(), 6);
    assert!(prefix.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));

    let b = first.generate_id("abide-error");
    assert_ne!(a, b);
    Ok(())
}

#[test]
fn generate_id_skips_ids_already_in_use() -> Result<()> {
    let mut scratch = Document::from_html("<p></p>")?;
    scratch.set_random_seed(7);
    let taken = scratch.generate_id("x");

    let mut doc = Document::from_html(&format!("<p id='{taken}'></p>"))?;
    doc.set_random_seed(7);
    let fresh = doc.generate_id("x");
    assert_ne!(fresh, taken);
    assert!(fresh.ends_with("-x"));
    Ok(())
}

#[test]
fn trace_logs_record_actions_and_notifications() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    doc.set_trace_stderr(false);
    doc.type_text("#name", "before")?;
    assert!(doc.take_trace_logs().is_empty());

    doc.enable_trace(true);
    doc.type_text("#name", "Ada")?;
    let name = doc.select_one("#name")?;
    doc.dispatch_event(name, "valid.zf.abide")?;
    assert_eq!(
        doc.take_trace_logs(),
        vec![
            r#"[action] type_text target=input#name value="Ada""#.to_string(),
            "[event] valid.zf.abide target=input#name".to_string(),
        ]
    );

    doc.set_trace_actions(false);
    doc.set_trace_events(false);
    doc.type_text("#name", "quiet")?;
    doc.dispatch_event(name, "valid.zf.abide")?;
    assert!(doc.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_log_limit_keeps_newest_entries() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    doc.set_trace_stderr(false);
    doc.enable_trace(true);
    let name = doc.select_one("#name")?;
    for kind in ["one", "two", "three"] {
        doc.dispatch_event(name, kind)?;
    }
    doc.set_trace_log_limit(2)?;
    doc.dispatch_event(name, "four")?;
    assert_eq!(
        doc.take_trace_logs(),
        vec![
            "[event] three target=input#name".to_string(),
            "[event] four target=input#name".to_string(),
        ]
    );

    match doc.set_trace_log_limit(0) {
        Err(Error::InvalidConfig(message)) => {
            assert_eq!(message, "set_trace_log_limit requires at least 1 entry")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn inline_style_controls_display() -> Result<()> {
    let mut doc = Document::from_html(
        "<div id='outer' style='color: red'><p id='inner'></p></div><p id='h' hidden></p>",
    )?;
    let outer = doc.select_one("#outer")?;
    let inner = doc.select_one("#inner")?;
    assert!(doc.is_displayed(inner));
    assert!(!doc.is_displayed(doc.select_one("#h")?));

    doc.set_style_property(outer, "display", "none")?;
    assert_eq!(doc.attr(outer, "style").as_deref(), Some("color: red; display: none;"));
    assert!(!doc.is_displayed(inner));

    doc.set_style_property(outer, "Display", "block")?;
    assert_eq!(doc.style_property(outer, "display")?.as_deref(), Some("block"));
    assert!(doc.is_displayed(inner));

    doc.set_style_property(outer, "display", "")?;
    doc.set_style_property(outer, "color", "")?;
    assert_eq!(doc.attr(outer, "style").as_deref(), Some(""));
    Ok(())
}

#[test]
fn append_html_inserts_fragment_and_indexes_ids() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let form = doc.select_one("#f")?;
    let inserted = doc.append_html(
        form,
        "<input id='green' type='radio' name='color' value='green' checked><span>x</span>",
    )?;
    assert_eq!(inserted.len(), 2);

    let green = doc.select_one("#green")?;
    assert_eq!(doc.parent(green), Some(form));
    assert_eq!(doc.by_id("green"), Some(green));
    assert!(doc.checked(green)?);
    assert!(!doc.checked(doc.select_one("#red")?)?);
    Ok(())
}

#[test]
fn set_attr_keeps_live_state_in_sync() -> Result<()> {
    let mut doc = Document::from_html(FORM)?;
    let name = doc.select_one("#name")?;
    doc.set_attr(name, "value", "from-attr")?;
    assert_eq!(doc.value(name)?, "from-attr");

    doc.set_attr(name, "disabled", "")?;
    assert!(doc.is_disabled(name));
    doc.remove_attr(name, "disabled")?;
    assert!(!doc.is_disabled(name));

    doc.set_attr(name, "id", "renamed")?;
    assert_eq!(doc.by_id("renamed"), Some(name));
    assert_eq!(doc.by_id("name"), None);
    Ok(())
}

#[test]
fn class_helpers_do_not_duplicate_tokens() -> Result<()> {
    let mut doc = Document::from_html("<p id='p' class='a  b'></p>")?;
    let p = doc.select_one("#p")?;
    doc.class_add(p, "b")?;
    doc.class_add(p, "c")?;
    assert_eq!(doc.attr(p, "class").as_deref(), Some("a b c"));
    doc.class_remove(p, "a")?;
    assert!(!doc.has_class(p, "a"));
    assert!(doc.has_class(p, "c"));
    Ok(())
}
