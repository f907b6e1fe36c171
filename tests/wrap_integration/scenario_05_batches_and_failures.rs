use super::*;

#[test]
fn two_disjoint_requests_on_separate_lines() {
    assert_transforms(
        &[(1, 8), (2, 8)],
        r#"
            foo = {'abcd': 1234}
            bar = {'abcd': 1234}
        "#,
        r#"
            foo = {
                'abcd': 1234,
            }
            bar = {
                'abcd': 1234,
            }
        "#,
    );
}

#[test]
fn two_disjoint_requests_on_one_line() {
    assert_transforms(
        &[(1, 18), (1, 10)],
        r#"
            pair = ([1, 2], [3, 4])
        "#,
        r#"
            pair = ([
                1,
                2,
            ], [
                3,
                4,
            ])
        "#,
    );
}

#[test]
fn requests_on_the_same_mapping_overlap() {
    let error = transform(
        &[(1, 8), (1, 16)],
        r#"
            foo = {'abcd': 1234}
        "#,
    )
    .expect_err("both cursors resolve to one mapping");

    match error {
        TuckError::EditsOverlap { first, second } => {
            let span = Span::new(Position::new(1, 7), Position::new(1, 20));
            assert_eq!(first, span);
            assert_eq!(second, span);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nested_requests_overlap() {
    let error = transform(
        &[(1, 8), (1, 33)],
        r#"
            foo = {'key': 1234, 'other': {'bar': 5678}}
        "#,
    )
    .expect_err("outer mapping contains the inner one");

    assert!(matches!(error, TuckError::EditsOverlap { .. }));
}

#[test]
fn failing_request_leaves_whole_batch_unapplied() {
    let error = transform(
        &[(1, 8), (2, 1)],
        r#"
            foo = {'abcd': 1234}

            bar = [1]
        "#,
    )
    .expect_err("blank line has no node");

    match error {
        TuckError::NoNodeFound { position } => assert_eq!(position, Position::new(2, 1)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_context_reports_ancestor_stack() {
    let error = transform(&[(1, 1)], "\nimport os\n").expect_err("imports are not wrappable");

    match error {
        TuckError::NoSupportedNodeFound { path, .. } => {
            assert_eq!(path, vec!["import_statement".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn syntax_errors_fail_before_any_edit() {
    let error = transform(&[(1, 8)], "\nfoo = {'a': \n").expect_err("source does not parse");
    assert!(matches!(error, TuckError::ParseFailure { .. }));
}

#[test]
fn crlf_sources_keep_their_line_endings() {
    let processed = process(&[Position::new(1, 8)], "foo = {'a': 1}\r\nx = 2\r\n", "demo.py")
        .expect("wrap should succeed");
    assert_eq!(processed.text, "foo = {\r\n    'a': 1,\r\n}\r\nx = 2\r\n");
}

#[test]
fn lines_outside_affected_spans_are_untouched() {
    let source = dedent(
        r#"
            first = [1, 2]
            middle = {'a': 1}
            last = (3, 4)
        "#,
    );
    let processed = process(
        &[Position::new(1, 10), Position::new(3, 9)],
        &source,
        "demo.py",
    )
    .expect("wrap should succeed");

    assert_eq!(
        processed
            .text
            .lines()
            .filter(|line| line.starts_with("middle"))
            .collect::<Vec<_>>(),
        vec!["middle = {'a': 1}"]
    );
    assert_eq!(processed.spans.len(), 2);
    assert!(processed.spans.iter().all(|span| !span.is_multiline()));
}
