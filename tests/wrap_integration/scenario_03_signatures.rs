use super::*;

#[test]
fn function_parameters_get_trailing_comma() {
    assert_transform(
        1,
        11,
        r#"
            def greet(name, greeting="hi"):
                pass
        "#,
        r#"
            def greet(
                name,
                greeting="hi",
            ):
                pass
        "#,
    );
}

#[test]
fn function_ending_in_kwargs_has_no_trailing_comma() {
    assert_transform(
        1,
        10,
        r#"
            def call(*args, **kwargs):
                pass
        "#,
        r#"
            def call(
                *args,
                **kwargs
            ):
                pass
        "#,
    );
}

#[test]
fn annotated_kwargs_and_return_type_are_handled() {
    assert_transform(
        1,
        7,
        r#"
            def f(a: int, **kw: str) -> None:
                pass
        "#,
        r#"
            def f(
                a: int,
                **kw: str
            ) -> None:
                pass
        "#,
    );
}

#[test]
fn keyword_only_parameter_list_has_no_trailing_comma() {
    assert_transform(
        1,
        10,
        r#"
            def opts(*, flag, mode):
                pass
        "#,
        r#"
            def opts(
                *,
                flag,
                mode
            ):
                pass
        "#,
    );
}

#[test]
fn method_signature_indents_from_def() {
    assert_transform(
        2,
        14,
        r#"
            class Service:
                def run(self, job):
                    return job
        "#,
        r#"
            class Service:
                def run(
                    self,
                    job,
                ):
                    return job
        "#,
    );
}

#[test]
fn class_bases_get_trailing_comma() {
    assert_transform(
        1,
        14,
        r#"
            class Widget(Base, metaclass=Meta):
                pass
        "#,
        r#"
            class Widget(
                Base,
                metaclass=Meta,
            ):
                pass
        "#,
    );
}

#[test]
fn class_bases_keep_trailing_comma_after_kwargs() {
    assert_transform(
        1,
        14,
        r#"
            class Widget(Base, **options):
                pass
        "#,
        r#"
            class Widget(
                Base,
                **options,
            ):
                pass
        "#,
    );
}

#[test]
fn lambda_is_parenthesized_and_broken_before_colon() {
    assert_transform(
        1,
        11,
        r#"
            handler = lambda event, context: event
        "#,
        r#"
            handler = (lambda
                event,
                context,
            : event)
        "#,
    );
}

#[test]
fn signature_without_parameters_is_left_unchanged() {
    assert_unchanged(
        1,
        6,
        r#"
            def f():
                pass
        "#,
    );
}

#[test]
fn function_ending_in_star_args_keeps_trailing_comma() {
    assert_transform(
        1,
        7,
        r#"
            def f(a, *args):
                pass
        "#,
        r#"
            def f(
                a,
                *args,
            ):
                pass
        "#,
    );
}

#[test]
fn keyword_marker_after_ordinary_parameters_keeps_trailing_comma() {
    assert_transform(
        1,
        7,
        r#"
            def f(a, *, b):
                pass
        "#,
        r#"
            def f(
                a,
                *,
                b,
            ):
                pass
        "#,
    );
}

#[test]
fn lambda_as_sole_call_argument_uses_call_parentheses() {
    assert_transform(
        1,
        12,
        r#"
            register(lambda event, context: event)
        "#,
        r#"
            register(lambda
                event,
                context,
            : event)
        "#,
    );
}
