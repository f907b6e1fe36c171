use super::*;

#[test]
fn boolean_chain_in_assignment_gains_parentheses() {
    assert_transform(
        1,
        9,
        r#"
            ready = alpha and beta and gamma
        "#,
        r#"
            ready = (
                alpha and
                beta and
                gamma
            )
        "#,
    );
}

#[test]
fn mixed_precedence_wraps_only_the_enclosing_tier() {
    assert_transform(
        1,
        11,
        r#"
            if foo or bar and baz or spam:
                pass
        "#,
        r#"
            if foo or (
                bar and
                baz
            ) or spam:
                pass
        "#,
    );
}

#[test]
fn outer_tier_and_if_header_produce_the_same_layout() {
    let source = r#"
        if foo or bar and baz or spam:
            pass
    "#;
    let expected = r#"
        if (
            foo or
            bar and baz or
            spam
        ):
            pass
    "#;

    assert_transform(1, 4, source, expected);
    assert_transform(1, 1, source, expected);
}

#[test]
fn parenthesized_chain_reuses_its_parentheses() {
    assert_transform(
        1,
        9,
        r#"
            while (a or b):
                pass
        "#,
        r#"
            while (
                a or
                b
            ):
                pass
        "#,
    );
}

#[test]
fn elif_header_is_wrapped_from_its_keyword() {
    assert_transform(
        3,
        1,
        r#"
            if a:
                pass
            elif b or c:
                pass
        "#,
        r#"
            if a:
                pass
            elif (
                b or
                c
            ):
                pass
        "#,
    );
}

#[test]
fn non_boolean_condition_is_wrapped_as_single_operand() {
    assert_transform(
        1,
        1,
        r#"
            if check(value):
                pass
        "#,
        r#"
            if (
                check(value)
            ):
                pass
        "#,
    );
}

#[test]
fn conditional_expression_splits_into_three_lines() {
    assert_transform(
        1,
        9,
        r#"
            label = "yes" if flag else "no"
        "#,
        r#"
            label = (
                "yes"
                if flag
                else "no"
            )
        "#,
    );
}

#[test]
fn parenthesized_conditional_expression_is_not_double_wrapped() {
    assert_transform(
        1,
        10,
        r#"
            label = ("yes" if flag else "no")
        "#,
        r#"
            label = (
                "yes"
                if flag
                else "no"
            )
        "#,
    );
}

#[test]
fn cursor_in_if_body_does_not_wrap_the_header() {
    let error = transform(
        &[(2, 6)],
        r#"
            if check(x):
                pass
        "#,
    )
    .expect_err("body statement has no wrappable ancestor");

    assert!(matches!(error, TuckError::NoSupportedNodeFound { .. }));
}

#[test]
fn partially_wrapped_chain_pulls_operator_back_up() {
    assert_transform(
        1,
        6,
        r#"
            x = (a
                 and b)
        "#,
        r#"
            x = (
                a and
                b
            )
        "#,
    );
}

#[test]
fn partially_wrapped_if_header_keeps_operators_trailing() {
    assert_transform(
        1,
        1,
        r#"
            if (foo
                    or bar or baz):
                pass
        "#,
        r#"
            if (
                foo or
                bar or
                baz
            ):
                pass
        "#,
    );
}

#[test]
fn chain_as_sole_call_argument_is_not_double_parenthesized() {
    assert_transform(
        1,
        5,
        r#"
            foo(a and b)
        "#,
        r#"
            foo(
                a and
                b
            )
        "#,
    );
}

#[test]
fn conditional_expression_as_sole_call_argument_uses_call_parentheses() {
    assert_transform(
        1,
        5,
        r#"
            foo(a if b else c)
        "#,
        r#"
            foo(
                a
                if b
                else c
            )
        "#,
    );
}
