//! Object literals and object comprehensions.

use sonnet_diagnostic::ErrorCode;
use sonnet_ir::ast::{Expr, ExprKind, Field, FieldName, Member, ObjectComp};
use sonnet_ir::{Span, TokenKind, Visibility};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `{ member, ... }` or `{ [k]: v for ... }`.
    pub(crate) fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut members = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::RBrace => break,
                TokenKind::For => return self.finish_object_comp(start, members),
                _ => {}
            }
            members.push(self.parse_member()?);
            match self.current_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::For => {}
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ErrorCode::E1003,
                        "unterminated object, expected , or }",
                        self.current_span(),
                    ))
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("expected , or }}, got {}", other.display_name()),
                        self.current_span(),
                    ))
                }
            }
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Expr::new(ExprKind::Object(members), start.merge(end)))
    }

    fn parse_member(&mut self) -> Result<Member, ParseError> {
        match self.current_kind() {
            TokenKind::Local => {
                self.advance();
                Ok(Member::Local(self.parse_bind()?))
            }
            TokenKind::Assert => Ok(Member::Assert(self.parse_assert_clause()?)),
            _ => Ok(Member::Field(self.parse_field()?)),
        }
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.current_span();
        let name = match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                FieldName::Ident(name)
            }
            TokenKind::Str(name, _) => {
                self.advance();
                FieldName::Str(name)
            }
            TokenKind::LBracket => {
                self.advance();
                let key = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                FieldName::Computed(key)
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("expected field name, got {}", other.display_name()),
                    start,
                ))
            }
        };

        let params = if self.check(TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };
        let plus = self.eat(TokenKind::Plus);

        let visibility = match self.current_kind() {
            TokenKind::Colon => Visibility::Inherit,
            TokenKind::DoubleColon => Visibility::Hidden,
            TokenKind::TripleColon => Visibility::Visible,
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("expected one of :, ::, :::, got {}", other.display_name()),
                    self.current_span(),
                ))
            }
        };
        let marker = self.advance().span;
        if plus && params.is_some() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "cannot use +: syntax sugar in a method",
                marker,
            ));
        }

        let value = self.parse_expr()?;
        let span = start.merge(value.span);
        Ok(Field {
            name,
            plus,
            visibility,
            params,
            value,
            span,
        })
    }

    /// The members parsed so far must be locals plus exactly one `[key]: value`
    /// field; the cursor is at the first `for`.
    fn finish_object_comp(&mut self, start: Span, members: Vec<Member>) -> Result<Expr, ParseError> {
        let malformed = |message: &str, span: Span| ParseError::new(ErrorCode::E1005, message, span);

        let mut locals = Vec::new();
        let mut field: Option<Field> = None;
        for member in members {
            match member {
                Member::Local(bind) => locals.push(bind),
                Member::Assert(clause) => {
                    return Err(malformed("object comprehension cannot have asserts", clause.span))
                }
                Member::Field(f) => {
                    if field.is_some() {
                        return Err(malformed("object comprehension can only have one field", f.span));
                    }
                    field = Some(f);
                }
            }
        }

        let field = field.ok_or_else(|| malformed("object comprehension must have a field", start))?;
        let FieldName::Computed(key) = field.name else {
            return Err(malformed(
                "object comprehensions can only have [e] fields",
                field.span,
            ));
        };
        if field.visibility != Visibility::Inherit {
            return Err(malformed(
                "object comprehensions cannot have hidden fields",
                field.span,
            ));
        }
        let value = match field.params {
            Some(params) => {
                let span = field.value.span;
                Expr::new(
                    ExprKind::Function {
                        params,
                        body: Box::new(field.value),
                    },
                    span,
                )
            }
            None => field.value,
        };

        let specs = self.parse_comp_specs()?;
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Expr::new(
            ExprKind::ObjectComp(Box::new(ObjectComp {
                locals,
                key,
                plus: field.plus,
                value,
                specs,
            })),
            start.merge(end),
        ))
    }
}
