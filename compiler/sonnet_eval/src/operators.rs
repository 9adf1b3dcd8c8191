//! Unary and binary operators on forced values.
//!
//! Numbers are IEEE doubles throughout; any arithmetic result that is not
//! finite is an `Overflow` error. Bitwise operators and shifts work on the
//! operands truncated to `i64`.

use std::cmp::Ordering;
use std::rc::Rc;

use sonnet_ir::{BinaryOp, Name, UnaryOp};
use sonnet_stack::ensure_sufficient_stack;

use crate::diagnostics::FrameName;
use crate::errors::{
    binary_type_mismatch, division_by_zero, function_comparison, no_such_field, overflow,
    type_mismatch, EvalResult,
};
use crate::heap::{ObjectRef, ThunkRef};
use crate::interpreter::Interpreter;
use crate::value::{Array, Value};

/// A number result, rejecting infinities and NaN.
#[inline]
pub(crate) fn finite(n: f64) -> EvalResult {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(overflow())
    }
}

pub(crate) fn evaluate_unary(op: UnaryOp, value: &Value) -> EvalResult {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(*n)),
        (UnaryOp::BitNot, Value::Number(n)) => Ok(Value::Number(!(*n as i64) as f64)),
        (UnaryOp::Not, other) => Err(type_mismatch(
            "unary operator !",
            "boolean",
            other.type_name(),
        )),
        (_, other) => Err(type_mismatch(
            format!("unary operator {}", op.as_symbol()),
            "number",
            other.type_name(),
        )),
    }
}

fn eval_number_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    match op {
        BinaryOp::Add => finite(a + b),
        BinaryOp::Sub => finite(a - b),
        BinaryOp::Mul => finite(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                Err(division_by_zero())
            } else {
                finite(a / b)
            }
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                Err(division_by_zero())
            } else {
                finite(a % b)
            }
        }
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::BitAnd | BinaryOp::BitXor | BinaryOp::BitOr => {
            eval_bitwise(op, a as i64, b as i64)
        }
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::In | BinaryOp::And | BinaryOp::Or => Err(
            binary_type_mismatch(op.as_symbol(), "number", "number"),
        ),
    }
}

fn eval_bitwise(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    let result = match op {
        BinaryOp::Shl | BinaryOp::Shr if b < 0 => {
            return Err(type_mismatch(
                format!("shift amount for {}", op.as_symbol()),
                "non-negative number",
                "negative number",
            ));
        }
        BinaryOp::Shl => u32::try_from(b)
            .ok()
            .and_then(|shift| a.checked_shl(shift))
            .unwrap_or(0),
        BinaryOp::Shr => a >> b.min(63),
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::BitOr => a | b,
        _ => return Err(binary_type_mismatch(op.as_symbol(), "number", "number")),
    };
    Ok(Value::Number(result as f64))
}

fn relational(op: BinaryOp, ordering: Ordering) -> Value {
    Value::Bool(match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

impl Interpreter {
    /// Apply `op` to two forced operands. The operands must be rooted by the
    /// caller.
    pub(crate) fn evaluate_binary(&mut self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
        match (op, left, right) {
            (_, Value::Number(a), Value::Number(b))
                if !matches!(op, BinaryOp::Eq | BinaryOp::NotEq) =>
            {
                eval_number_binary(op, *a, *b)
            }

            (BinaryOp::Eq, _, _) => Ok(Value::Bool(self.equals(left, right)?)),
            (BinaryOp::NotEq, _, _) => Ok(Value::Bool(!self.equals(left, right)?)),

            (BinaryOp::Add, Value::Str(_), _) | (BinaryOp::Add, _, Value::Str(_)) => {
                let l = self.to_display_string(left)?;
                let r = self.to_display_string(right)?;
                let mut joined = String::with_capacity(l.len() + r.len());
                joined.push_str(&l);
                joined.push_str(&r);
                Ok(Value::Str(Rc::from(joined)))
            }
            (BinaryOp::Add, Value::Array(a), Value::Array(b)) => {
                let mut elements = self.heap.array(*a)?.elements.clone();
                elements.extend_from_slice(&self.heap.array(*b)?.elements);
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            (BinaryOp::Add, Value::Object(a), Value::Object(b)) => self.merge_objects(*a, *b),

            (
                BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq,
                Value::Str(_) | Value::Array(_),
                _,
            ) => {
                let ordering = self.compare(op, left, right)?;
                Ok(relational(op, ordering))
            }

            (BinaryOp::In, Value::Str(field), Value::Object(object)) => {
                let name = self.interner.intern_rc(field);
                Ok(Value::Bool(self.has_field(*object, name, true)?))
            }

            (BinaryOp::And, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a && *b)),
            (BinaryOp::Or, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),

            _ => Err(binary_type_mismatch(
                op.as_symbol(),
                left.type_name(),
                right.type_name(),
            )),
        }
    }

    /// Deep structural equality. Objects compare every field, hidden or not.
    pub(crate) fn equals(&mut self, left: &Value, right: &Value) -> EvalResult<bool> {
        ensure_sufficient_stack(|| self.equals_inner(left, right))
    }

    fn equals_inner(&mut self, left: &Value, right: &Value) -> EvalResult<bool> {
        match (left, right) {
            (Value::Null, Value::Null) => Ok(true),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Number(a), Value::Number(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::Function(_), Value::Function(_)) => Err(function_comparison()),
            (Value::Array(a), Value::Array(b)) => {
                let a = self.heap.array(*a)?.elements.clone();
                let b = self.heap.array(*b)?.elements.clone();
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.into_iter().zip(b) {
                    let (x, y) = self.force_pair(x, y)?;
                    if !self.equals(&x, &y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Object(a), Value::Object(b)) => {
                let mut names = self.heap.object(*a)?.field_names();
                let mut other = self.heap.object(*b)?.field_names();
                if names.len() != other.len() {
                    return Ok(false);
                }
                names.sort_unstable_by_key(|name| self.interner.lookup(*name));
                other.sort_unstable_by_key(|name| self.interner.lookup(*name));
                if names != other {
                    return Ok(false);
                }
                for name in names {
                    let x = self.field_value(*a, name)?;
                    self.root(&x);
                    let y = self.field_value(*b, name)?;
                    self.root(&y);
                    if !self.equals(&x, &y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Ordering for `<`, `<=`, `>` and `>=` on strings and arrays.
    pub(crate) fn compare(&mut self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Ordering> {
        ensure_sufficient_stack(|| self.compare_inner(op, left, right))
    }

    fn compare_inner(&mut self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Ordering> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => {
                Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal))
            }
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Array(a), Value::Array(b)) => {
                let a = self.heap.array(*a)?.elements.clone();
                let b = self.heap.array(*b)?.elements.clone();
                for (&x, &y) in a.iter().zip(&b) {
                    let (x, y) = self.force_pair(x, y)?;
                    let ordering = self.compare(op, &x, &y)?;
                    if ordering != Ordering::Equal {
                        return Ok(ordering);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            _ => Err(binary_type_mismatch(
                op.as_symbol(),
                left.type_name(),
                right.type_name(),
            )),
        }
    }

    /// `std.toString` semantics: strings as-is, anything else compact JSON.
    pub(crate) fn to_display_string(&mut self, value: &Value) -> EvalResult<Rc<str>> {
        match value {
            Value::Str(text) => Ok(Rc::clone(text)),
            other => Ok(Rc::from(self.manifest_compact(other)?)),
        }
    }

    /// Force an array element.
    pub(crate) fn force_element(&mut self, thunk: ThunkRef) -> EvalResult {
        let value = self.force(thunk, FrameName::Thunk(Name::EMPTY), None)?;
        self.root(&value);
        Ok(value)
    }

    fn force_pair(&mut self, x: ThunkRef, y: ThunkRef) -> EvalResult<(Value, Value)> {
        let x = self.force_element(x)?;
        let y = self.force_element(y)?;
        Ok((x, y))
    }

    /// Field `name` of `object`, which must exist.
    pub(crate) fn field_value(&mut self, object: ObjectRef, name: Name) -> EvalResult {
        match self.object_field(object, name, None, None)? {
            Some(value) => Ok(value),
            None => Err(no_such_field(&self.interner.lookup(name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts() {
        let shl = eval_number_binary(BinaryOp::Shl, 1.0, 4.0).ok();
        assert!(matches!(shl, Some(Value::Number(n)) if n == 16.0));
        let shr = eval_number_binary(BinaryOp::Shr, 256.0, 100.0).ok();
        assert!(matches!(shr, Some(Value::Number(n)) if n == 0.0));
        assert!(eval_number_binary(BinaryOp::Shl, 1.0, -1.0).is_err());
    }

    #[test]
    fn division_by_zero_and_overflow() {
        let err = eval_number_binary(BinaryOp::Div, 1.0, 0.0).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Division by zero."));
        let err = eval_number_binary(BinaryOp::Mod, 1.0, 0.0).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Division by zero."));
        let err = eval_number_binary(BinaryOp::Mul, f64::MAX, 2.0).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Overflow"));
    }

    #[test]
    fn unary() {
        assert!(matches!(
            evaluate_unary(UnaryOp::BitNot, &Value::Number(0.0)),
            Ok(Value::Number(n)) if n == -1.0
        ));
        assert!(matches!(
            evaluate_unary(UnaryOp::Not, &Value::Bool(true)),
            Ok(Value::Bool(false))
        ));
        assert!(evaluate_unary(UnaryOp::Neg, &Value::string("x")).is_err());
    }
}
