use super::*;

#[test]
fn selector_list_stores_compounds_right_to_left() -> Result<()> {
    let list = SelectorList::parse("form#signup > .row input[type='text']")?;
    let [complex] = list.alternatives.as_slice() else {
        panic!("expected one alternative: {list:?}");
    };
    assert_eq!(complex.subject.tag.as_deref(), Some("input"));
    assert_eq!(
        complex.subject.filters,
        vec![Filter::AttrEquals("type".into(), "text".into())]
    );
    assert_eq!(
        complex.context,
        vec![
            (
                Relation::Ancestor,
                Compound {
                    tag: None,
                    filters: vec![Filter::Class("row".into())],
                }
            ),
            (
                Relation::Parent,
                Compound {
                    tag: Some("form".into()),
                    filters: vec![Filter::Id("signup".into())],
                }
            ),
        ]
    );
    Ok(())
}

#[test]
fn commas_inside_quotes_and_negations_do_not_split_the_list() -> Result<()> {
    let list = SelectorList::parse(r#"input:not([type="a,b"], .x) , textarea,select"#)?;
    assert_eq!(list.alternatives.len(), 3);
    let Some(Filter::Not(inner)) = list.alternatives[0].subject.filters.first() else {
        panic!("expected a negation: {list:?}");
    };
    assert_eq!(inner.alternatives.len(), 2);
    assert_eq!(
        inner.alternatives[0].subject.filters,
        vec![Filter::AttrEquals("type".into(), "a,b".into())]
    );
    Ok(())
}

#[test]
fn lone_id_selectors_use_the_id_index() -> Result<()> {
    assert_eq!(SelectorList::parse(" #signup ")?.lone_id(), Some("signup"));
    assert_eq!(SelectorList::parse("form#signup")?.lone_id(), None);
    assert_eq!(SelectorList::parse("#a, #b")?.lone_id(), None);
    assert_eq!(SelectorList::parse("div #a")?.lone_id(), None);
    Ok(())
}

#[test]
fn malformed_or_unsupported_selectors_are_rejected() {
    for selector in [
        "", "a >", "> a", "div[", "a,,b", ".", "#", "[a=]", "[a='open]", "input:not(",
        "p::before", ":hover", ":checked", "li:first-child", "a + b", "a ~ b",
        "[a^=b]", "[a~=b]", "[a|=b]", "[a*=b]", "[a$=b]", ":is(a, b)",
    ] {
        assert!(
            matches!(
                SelectorList::parse(selector),
                Err(Error::UnsupportedSelector(_))
            ),
            "selector {selector:?} should be rejected"
        );
    }
}

#[test]
fn attribute_presence_and_equality_match() -> Result<()> {
    let html = r#"
        <div id='a' data-kind='alpha beta' title='hello world'></div>
        <div id='b' data-kind='gamma' title=''></div>
        <div id='c'></div>
        "#;
    let doc = Document::from_html(html)?;
    let a = doc.select_one("#a")?;
    let b = doc.select_one("#b")?;

    assert_eq!(doc.query_selector_all("[title]")?, vec![a, b]);
    assert_eq!(doc.query_selector_all("[TITLE='hello world']")?, vec![a]);
    assert_eq!(doc.query_selector_all("[data-kind=gamma]")?, vec![b]);
    assert_eq!(doc.query_selector_all("div[title = '']")?, vec![b]);
    // Equality is exact, not a token match.
    assert!(doc.query_selector_all("[data-kind=beta]")?.is_empty());
    Ok(())
}

#[test]
fn type_class_and_universal_compounds_combine() -> Result<()> {
    let html = r#"
        <label id='l' class='is-invalid-label  extra'>x</label>
        <span id='s' class='form-error is-visible'></span>
        <p id='p' class='form-error'></p>
        "#;
    let doc = Document::from_html(html)?;
    let l = doc.select_one("#l")?;
    let s = doc.select_one("#s")?;
    let p = doc.select_one("#p")?;

    assert_eq!(doc.query_selector_all("label.is-invalid-label.extra")?, vec![l]);
    assert_eq!(doc.query_selector_all(".form-error")?, vec![s, p]);
    assert_eq!(doc.query_selector_all("SPAN.form-error.is-visible")?, vec![s]);
    assert_eq!(doc.query_selector_all("*.form-error:not(span)")?, vec![p]);
    assert_eq!(doc.query_selector_all("*")?, vec![l, s, p]);
    Ok(())
}

#[test]
fn not_accepts_selector_lists() -> Result<()> {
    let html = r#"
        <form id='f'>
          <input id='name'>
          <input id='go' type='submit'>
          <textarea id='bio'></textarea>
          <select id='pick'></select>
          <button id='btn'>x</button>
        </form>
        "#;
    let doc = Document::from_html(html)?;
    let form = doc.select_one("#f")?;
    let ids = |nodes: Vec<NodeId>| -> Vec<String> {
        nodes
            .into_iter()
            .filter_map(|node| doc.attr(node, "id"))
            .collect()
    };

    assert_eq!(
        ids(doc.query_selector_from(form, r#"input:not([type="submit"]), textarea, select"#)?),
        vec!["name", "bio", "pick"]
    );
    assert_eq!(
        ids(doc.query_selector_from(form, "form > :not(input, select)")?),
        vec!["bio", "btn"]
    );
    Ok(())
}

#[test]
fn descendant_matching_backtracks_past_nearest_ancestor() -> Result<()> {
    let html = r#"
        <section class='outer'>
          <div class='box'>
            <div class='inner'>
              <span id='target'>x</span>
            </div>
          </div>
        </section>
        "#;
    let doc = Document::from_html(html)?;
    let target = doc.select_one("#target")?;
    // The nearest `div` ancestor is `.inner`, whose parent is not a `section`.
    assert!(doc.matches_selector(target, "section > div span")?);
    assert!(!doc.matches_selector(target, "section > .inner span")?);
    assert!(doc.matches_selector(target, ".outer .inner > span")?);
    assert!(!doc.matches_selector(target, ".box > span")?);
    Ok(())
}

#[test]
fn subtree_queries_exclude_the_root() -> Result<()> {
    let html = "<div id='outer' class='c'><div id='inner' class='c'></div></div>";
    let doc = Document::from_html(html)?;
    let outer = doc.select_one("#outer")?;
    let inner = doc.select_one("#inner")?;
    assert_eq!(doc.query_selector_from(outer, ".c")?, vec![inner]);
    assert_eq!(doc.query_selector_all(".c")?, vec![outer, inner]);
    Ok(())
}

#[test]
fn closest_includes_the_node_itself() -> Result<()> {
    let html = r#"<label id='outer'><span><input id='inner'></span></label>"#;
    let doc = Document::from_html(html)?;
    let inner = doc.select_one("#inner")?;
    let outer = doc.select_one("#outer")?;
    assert_eq!(doc.closest(inner, "label")?, Some(outer));
    assert_eq!(doc.closest(outer, "label")?, Some(outer));
    assert_eq!(doc.closest(inner, "form")?, None);
    Ok(())
}

#[test]
fn quoted_attribute_values_round_trip_through_selectors() -> Result<()> {
    assert_eq!(quote_attr_value("plain"), "\"plain\"");
    assert_eq!(quote_attr_value(r#"a"b\c"#), r#""a\"b\\c""#);

    let doc = Document::from_html(r#"<p id='p' data-note='say "hi" \ bye'></p>"#)?;
    let p = doc.select_one("#p")?;
    let selector = format!("[data-note={}]", quote_attr_value(r#"say "hi" \ bye"#));
    assert_eq!(doc.query_selector_all(&selector)?, vec![p]);
    Ok(())
}
