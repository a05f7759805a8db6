use super::*;

#[test]
fn void_and_self_closing_tags_do_not_swallow_siblings() -> Result<()> {
    let doc = Document::from_html(
        "<form id='f'><input id='a'><br><input id='b'/><span id='c'></span></form>",
    )?;
    let form = doc.select_one("#f")?;
    let children = doc
        .children(form)
        .into_iter()
        .filter_map(|node| doc.tag_name(node).map(str::to_string))
        .collect::<Vec<_>>();
    assert_eq!(children, vec!["input", "br", "input", "span"]);
    Ok(())
}

#[test]
fn attributes_are_lowercased_and_valueless_ones_are_empty() -> Result<()> {
    let doc = Document::from_html(
        "<INPUT ID='mail' Type=email REQUIRED data-abide-ignore value='x' value='y'>",
    )?;
    let input = doc.select_one("#mail")?;
    assert_eq!(doc.tag_name(input), Some("input"));
    assert_eq!(doc.attr(input, "type").as_deref(), Some("email"));
    assert_eq!(doc.attr(input, "required").as_deref(), Some(""));
    assert_eq!(doc.attr(input, "data-abide-ignore").as_deref(), Some(""));
    // The first duplicate wins.
    assert_eq!(doc.value(input)?, "x");
    Ok(())
}

#[test]
fn character_references_are_decoded_in_text_and_attributes() -> Result<()> {
    let doc = Document::from_html(
        "<p id='p' title='a &amp; b'>1 &lt; 2 &#38; &#x41; &unknown; &copy; &#+65;</p>",
    )?;
    let p = doc.select_one("#p")?;
    assert_eq!(doc.attr(p, "title").as_deref(), Some("a & b"));
    assert_eq!(doc.text_content(p), "1 < 2 & A &unknown; © &#+65;");
    Ok(())
}

#[test]
fn options_close_implicitly_and_last_selected_wins() -> Result<()> {
    let html = r#"
        <select id='pick'>
          <option value=''>Choose
          <option value='one' selected>One
          <option id='two' selected>Two
        </select>
        "#;
    let doc = Document::from_html(html)?;
    let select = doc.select_one("#pick")?;
    let options = doc.query_selector_from(select, "option")?;
    assert_eq!(options.len(), 3);
    for option in &options {
        assert_eq!(doc.parent(*option), Some(select));
    }
    assert_eq!(doc.selected_option(select), Some(doc.select_one("#two")?));
    // No `value` attribute: the trimmed text is the value.
    assert_eq!(doc.value(select)?, "Two");
    Ok(())
}

#[test]
fn select_without_selection_reports_first_option() -> Result<()> {
    let doc = Document::from_html(
        "<select id='s'><option>First</option><option value='2'>Second</option></select>",
    )?;
    let select = doc.select_one("#s")?;
    assert_eq!(doc.value(select)?, "First");

    let empty = Document::from_html("<select id='s'></select>")?;
    assert_eq!(empty.value(empty.select_one("#s")?)?, "");
    Ok(())
}

#[test]
fn textarea_body_is_raw_text_and_becomes_its_value() -> Result<()> {
    let doc = Document::from_html("<textarea id='t'>\n<b>bold</b> &amp; more</textarea><p id='after'></p>")?;
    let textarea = doc.select_one("#t")?;
    assert_eq!(doc.value(textarea)?, "<b>bold</b> & more");
    assert!(doc.query_selector("b")?.is_none());
    assert!(doc.query_selector("#after")?.is_some());
    Ok(())
}

#[test]
fn later_checked_radio_wins_within_its_group() -> Result<()> {
    let html = r#"
        <form>
          <input type='radio' id='r1' name='color' checked>
          <input type='radio' id='r2' name='color' checked>
          <input type='radio' id='other' name='size' checked>
        </form>
        <input type='radio' id='outside' name='color' checked>
        "#;
    let doc = Document::from_html(html)?;
    assert!(!doc.checked(doc.select_one("#r1")?)?);
    assert!(doc.checked(doc.select_one("#r2")?)?);
    assert!(doc.checked(doc.select_one("#other")?)?);
    // Groups are scoped to their form owner.
    assert!(doc.checked(doc.select_one("#outside")?)?);
    Ok(())
}

#[test]
fn comments_doctype_and_stray_end_tags_are_skipped() -> Result<()> {
    let doc = Document::from_html(
        "<!DOCTYPE html><!-- note --><div id='d'></span>text</div></p>",
    )?;
    let div = doc.select_one("#d")?;
    assert_eq!(doc.text_content(div), "text");
    assert_eq!(doc.parent(div), Some(doc.root()));
    Ok(())
}

#[test]
fn malformed_markup_is_reported() {
    for html in [
        "<div><!-- never closed",
        "<input id='x",
        "<textarea>no end",
        "<div",
    ] {
        assert!(
            matches!(Document::from_html(html), Err(Error::HtmlParse(_))),
            "{html:?} should fail to parse"
        );
    }
}

#[test]
fn duplicate_ids_resolve_to_first_in_document_order() -> Result<()> {
    let mut doc = Document::from_html("<p id='dup' class='first'></p><p id='dup' class='second'></p>")?;
    let first = doc.select_one(".first")?;
    let second = doc.select_one(".second")?;
    assert_eq!(doc.by_id("dup"), Some(first));
    assert_eq!(doc.query_selector_all("#dup")?, vec![first, second]);

    doc.remove_attr(first, "id")?;
    assert_eq!(doc.by_id("dup"), Some(second));
    Ok(())
}
