use super::*;
use pretty_assertions::assert_eq;

#[test]
fn boxed_keeps_span() {
    let expr = Expr::boxed(ExprKind::Null, Span::new(2, 6));
    assert_eq!(expr.span, Span::new(2, 6));
    assert_eq!(expr.kind, ExprKind::Null);
}

#[test]
fn default_visibility_is_inherit() {
    let field = Field {
        name: FieldName::Ident(Name::EMPTY),
        plus: false,
        visibility: Visibility::default(),
        params: None,
        value: Expr::new(ExprKind::True, Span::DUMMY),
        span: Span::DUMMY,
    };
    assert_eq!(field.visibility, Visibility::Inherit);
}
