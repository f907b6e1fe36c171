use super::*;

#[test]
fn list_comprehension_breaks_before_body_and_each_clause() {
    assert_transform(
        1,
        12,
        r#"
            squares = [x * x for x in values if x]
        "#,
        r#"
            squares = [
                x * x
                for x in values
                if x
            ]
        "#,
    );
}

#[test]
fn dict_comprehension_has_no_trailing_comma() {
    assert_transform(
        1,
        11,
        r#"
            lookup = {k: v for k, v in items}
        "#,
        r#"
            lookup = {
                k: v
                for k, v in items
            }
        "#,
    );
}

#[test]
fn nested_for_clauses_each_get_a_line() {
    assert_transform(
        1,
        8,
        r#"
            flat = [cell for row in grid for cell in row if cell]
        "#,
        r#"
            flat = [
                cell
                for row in grid
                for cell in row
                if cell
            ]
        "#,
    );
}

#[test]
fn generator_sole_argument_uses_call_parentheses() {
    assert_transform(
        1,
        9,
        r#"
            total = sum(x for x in y)
        "#,
        r#"
            total = sum(
                x
                for x in y
            )
        "#,
    );
}

#[test]
fn call_arguments_each_get_a_line_with_trailing_comma() {
    assert_transform(
        1,
        10,
        r#"
            result = compute(alpha, beta=2, *rest)
        "#,
        r#"
            result = compute(
                alpha,
                beta=2,
                *rest,
            )
        "#,
    );
}

#[test]
fn method_call_is_selected_from_its_name() {
    assert_transform(
        1,
        21,
        r#"
            value = self.client.fetch(url, timeout=5)
        "#,
        r#"
            value = self.client.fetch(
                url,
                timeout=5,
            )
        "#,
    );
}

#[test]
fn cursor_on_receiver_chain_wraps_enclosing_construct() {
    assert_transform(
        1,
        10,
        r#"
            items = [self.load(a), b]
        "#,
        r#"
            items = [
                self.load(a),
                b,
            ]
        "#,
    );
}

#[test]
fn inner_call_wraps_inside_outer_call() {
    assert_transform(
        1,
        7,
        r#"
            outer(inner(1, 2))
        "#,
        r#"
            outer(inner(
                1,
                2,
            ))
        "#,
    );
}

#[test]
fn call_without_arguments_is_left_unchanged() {
    assert_unchanged(
        1,
        1,
        r#"
            run()
        "#,
    );
}
