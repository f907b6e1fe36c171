use super::*;

#[test]
fn single_key_dict_literal() {
    assert_transform(
        1,
        8,
        r#"
            foo = {'abcd': 1234}
        "#,
        r#"
            foo = {
                'abcd': 1234,
            }
        "#,
    );
}

#[test]
fn multi_key_dict_literal() {
    assert_transform(
        1,
        8,
        r#"
            foo = {'a': 1, 'b': 2}
        "#,
        r#"
            foo = {
                'a': 1,
                'b': 2,
            }
        "#,
    );
}

#[test]
fn dict_unpacking_entry_gets_its_own_line() {
    assert_transform(
        1,
        6,
        r#"
            d = {**base, 'k': v}
        "#,
        r#"
            d = {
                **base,
                'k': v,
            }
        "#,
    );
}

#[test]
fn nested_dict_selects_innermost_and_indents_from_statement() {
    assert_transform(
        1,
        33,
        r#"
            foo = {'key': 1234, 'other': {'bar': 5678}}
        "#,
        r#"
            foo = {'key': 1234, 'other': {
                'bar': 5678,
            }}
        "#,
    );
}

#[test]
fn outer_dict_keeps_nested_dict_inline() {
    assert_transform(
        1,
        8,
        r#"
            foo = {'key': 1234, 'other': {'bar': 5678}}
        "#,
        r#"
            foo = {
                'key': 1234,
                'other': {'bar': 5678},
            }
        "#,
    );
}

#[test]
fn wrapping_outer_dict_reindents_already_wrapped_inner_dict() {
    assert_transform(
        1,
        8,
        r#"
            foo = {'key': 1234, 'other': {
                'bar': 5678,
            }}
        "#,
        r#"
            foo = {
                'key': 1234,
                'other': {
                    'bar': 5678,
                },
            }
        "#,
    );
}

#[test]
fn list_literal_in_function_body_uses_statement_indent() {
    assert_transform(
        2,
        13,
        r#"
            def build():
                return [first, second]
        "#,
        r#"
            def build():
                return [
                    first,
                    second,
                ]
        "#,
    );
}

#[test]
fn single_element_tuple_keeps_its_comma() {
    assert_transform(
        1,
        6,
        r#"
            x = (1,)
        "#,
        r#"
            x = (
                1,
            )
        "#,
    );
}

#[test]
fn set_literal_is_wrapped_like_a_list() {
    assert_transform(
        1,
        6,
        r#"
            s = {1, 2}
        "#,
        r#"
            s = {
                1,
                2,
            }
        "#,
    );
}

#[test]
fn columns_count_characters_not_bytes() {
    assert_transform(
        1,
        10,
        r#"
            naïve = ['é', 'ü']
        "#,
        r#"
            naïve = [
                'é',
                'ü',
            ]
        "#,
    );
}

#[test]
fn trailing_comment_stays_after_closing_bracket() {
    assert_transform(
        1,
        5,
        r#"
            x = [1, 2]  # keep
        "#,
        r#"
            x = [
                1,
                2,
            ]  # keep
        "#,
    );
}

#[test]
fn multi_line_string_element_is_not_reindented() {
    assert_transform(
        1,
        5,
        r#"
            x = [1, """a
            b"""]
        "#,
        r#"
            x = [
                1,
                """a
            b""",
            ]
        "#,
    );
}

#[test]
fn empty_literal_is_left_unchanged() {
    assert_unchanged(
        1,
        5,
        r#"
            x = []
        "#,
    );
}

#[test]
fn canonical_layout_is_left_unchanged() {
    assert_unchanged(
        1,
        5,
        r#"
            x = [
                1,
                2,
            ]
        "#,
    );
}

#[test]
fn wrapping_is_idempotent() {
    let once = transform(&[(1, 8)], "\nfoo = {'a': 1, 'b': [2, 3]}\n").expect("first wrap");
    let twice = process(&[Position::new(1, 8)], &once, "demo.py")
        .expect("second wrap")
        .text;
    assert_eq!(once, twice);
}

#[test]
fn bare_tuple_in_return_gains_parentheses() {
    assert_transform(
        2,
        12,
        r#"
            def f():
                return a, b
        "#,
        r#"
            def f():
                return (
                    a,
                    b,
                )
        "#,
    );
}

#[test]
fn bare_tuple_assignment_keeps_existing_trailing_comma() {
    assert_transform(
        1,
        10,
        r#"
            point = 1, 2,
        "#,
        r#"
            point = (
                1,
                2,
            )
        "#,
    );
}

#[test]
fn unpacking_target_is_not_a_tuple_to_wrap() {
    let error = transform(
        &[(1, 1)],
        r#"
            a, b = pair
        "#,
    )
    .expect_err("assignment target has no wrappable node");

    assert!(matches!(error, TuckError::NoSupportedNodeFound { .. }));
}
