//! The native `std` library.
//!
//! Each builtin is a hidden field of `std` holding a [`Function::Builtin`].
//! Calls are bound by parameter name like closures, then dispatched here
//! with one argument thunk per parameter. Most builtins force their
//! arguments immediately; `std.map` and `std.makeArray` build arrays of
//! unforced [`Thunk::Apply`] elements instead.
//!
//! [`Function::Builtin`]: crate::value::Function::Builtin

mod format;

use std::rc::Rc;

use smallvec::smallvec;
use sonnet_ir::{BinaryOp, Name};

use crate::diagnostics::FrameName;
use crate::errors::{builtin_error, internal, user_error, EvalError, EvalResult};
use crate::heap::{ArrayRef, FunctionRef, ObjectRef, ThunkRef};
use crate::interpreter::Interpreter;
use crate::operators::finite;
use crate::value::{Array, Function, Thunk, Value};

/// A native `std` function.
///
/// `ALL` lists every variant in declaration order; per-builtin tables are
/// indexed by `builtin as usize`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    ExtVar,
    Type,
    Length,
    ToString,
    Codepoint,
    Char,
    Substr,
    StartsWith,
    EndsWith,
    Split,
    Join,
    MakeArray,
    Range,
    Filter,
    Map,
    Foldl,
    Foldr,
    FlatMap,
    ObjectFields,
    ObjectFieldsAll,
    ObjectHas,
    ObjectHasAll,
    Abs,
    Floor,
    Ceil,
    Pow,
    Sqrt,
    Max,
    Min,
    Slice,
    Mod,
    Format,
    AssertEqual,
    Equals,
    IsArray,
    IsBoolean,
    IsFunction,
    IsNumber,
    IsObject,
    IsString,
    ManifestJson,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::ExtVar,
        Builtin::Type,
        Builtin::Length,
        Builtin::ToString,
        Builtin::Codepoint,
        Builtin::Char,
        Builtin::Substr,
        Builtin::StartsWith,
        Builtin::EndsWith,
        Builtin::Split,
        Builtin::Join,
        Builtin::MakeArray,
        Builtin::Range,
        Builtin::Filter,
        Builtin::Map,
        Builtin::Foldl,
        Builtin::Foldr,
        Builtin::FlatMap,
        Builtin::ObjectFields,
        Builtin::ObjectFieldsAll,
        Builtin::ObjectHas,
        Builtin::ObjectHasAll,
        Builtin::Abs,
        Builtin::Floor,
        Builtin::Ceil,
        Builtin::Pow,
        Builtin::Sqrt,
        Builtin::Max,
        Builtin::Min,
        Builtin::Slice,
        Builtin::Mod,
        Builtin::Format,
        Builtin::AssertEqual,
        Builtin::Equals,
        Builtin::IsArray,
        Builtin::IsBoolean,
        Builtin::IsFunction,
        Builtin::IsNumber,
        Builtin::IsObject,
        Builtin::IsString,
        Builtin::ManifestJson,
    ];

    /// Field name in `std`.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::ExtVar => "extVar",
            Builtin::Type => "type",
            Builtin::Length => "length",
            Builtin::ToString => "toString",
            Builtin::Codepoint => "codepoint",
            Builtin::Char => "char",
            Builtin::Substr => "substr",
            Builtin::StartsWith => "startsWith",
            Builtin::EndsWith => "endsWith",
            Builtin::Split => "split",
            Builtin::Join => "join",
            Builtin::MakeArray => "makeArray",
            Builtin::Range => "range",
            Builtin::Filter => "filter",
            Builtin::Map => "map",
            Builtin::Foldl => "foldl",
            Builtin::Foldr => "foldr",
            Builtin::FlatMap => "flatMap",
            Builtin::ObjectFields => "objectFields",
            Builtin::ObjectFieldsAll => "objectFieldsAll",
            Builtin::ObjectHas => "objectHas",
            Builtin::ObjectHasAll => "objectHasAll",
            Builtin::Abs => "abs",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Pow => "pow",
            Builtin::Sqrt => "sqrt",
            Builtin::Max => "max",
            Builtin::Min => "min",
            Builtin::Slice => "slice",
            Builtin::Mod => "mod",
            Builtin::Format => "format",
            Builtin::AssertEqual => "assertEqual",
            Builtin::Equals => "equals",
            Builtin::IsArray => "isArray",
            Builtin::IsBoolean => "isBoolean",
            Builtin::IsFunction => "isFunction",
            Builtin::IsNumber => "isNumber",
            Builtin::IsObject => "isObject",
            Builtin::IsString => "isString",
            Builtin::ManifestJson => "manifestJson",
        }
    }

    /// Parameter names, all required.
    pub const fn params(self) -> &'static [&'static str] {
        match self {
            Builtin::ExtVar | Builtin::Type | Builtin::Length => &["x"],
            Builtin::ToString => &["a"],
            Builtin::Codepoint => &["str"],
            Builtin::Char => &["n"],
            Builtin::Substr => &["str", "from", "len"],
            Builtin::StartsWith | Builtin::EndsWith => &["a", "b"],
            Builtin::Split => &["str", "c"],
            Builtin::Join => &["sep", "arr"],
            Builtin::MakeArray => &["sz", "func"],
            Builtin::Range => &["from", "to"],
            Builtin::Filter | Builtin::Map | Builtin::FlatMap => &["func", "arr"],
            Builtin::Foldl | Builtin::Foldr => &["func", "arr", "init"],
            Builtin::ObjectFields | Builtin::ObjectFieldsAll => &["o"],
            Builtin::ObjectHas | Builtin::ObjectHasAll => &["o", "f"],
            Builtin::Abs => &["n"],
            Builtin::Floor | Builtin::Ceil | Builtin::Sqrt => &["x"],
            Builtin::Pow => &["x", "n"],
            Builtin::Max | Builtin::Min | Builtin::Mod => &["a", "b"],
            Builtin::Slice => &["indexable", "index", "end", "step"],
            Builtin::Format => &["str", "vals"],
            Builtin::AssertEqual | Builtin::Equals => &["a", "b"],
            Builtin::IsArray
            | Builtin::IsBoolean
            | Builtin::IsFunction
            | Builtin::IsNumber
            | Builtin::IsObject
            | Builtin::IsString => &["v"],
            Builtin::ManifestJson => &["value"],
        }
    }
}

/// The argument thunks of one builtin call, in parameter order.
#[derive(Copy, Clone)]
struct Args<'a> {
    builtin: Builtin,
    thunks: &'a [ThunkRef],
}

impl Args<'_> {
    fn param(&self, i: usize) -> &'static str {
        self.builtin.params().get(i).copied().unwrap_or("?")
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        builtin_error(self.builtin.name(), message)
    }

    fn expected(&self, i: usize, expected: &str, got: &Value) -> EvalError {
        self.error(format!(
            "{} must be {expected}, got {}",
            self.param(i),
            got.type_name()
        ))
    }
}

/// Integral value of `n`, or `None` if it has a fractional part.
fn as_integer(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15).then_some(n as i64)
}

impl Interpreter {
    /// Run `builtin` on its bound arguments.
    pub(crate) fn call_builtin(&mut self, builtin: Builtin, thunks: &[ThunkRef]) -> EvalResult {
        let args = Args { builtin, thunks };
        match builtin {
            Builtin::ExtVar => {
                let name = self.string_arg(args, 0)?;
                match self.options.external_vars.get(&*name) {
                    Some(value) => Ok(Value::string(value)),
                    None => Err(args.error(format!("undefined external variable: {name}"))),
                }
            }
            Builtin::Type => {
                let value = self.arg(args, 0)?;
                Ok(Value::string(value.type_name()))
            }
            Builtin::Length => self.length(args),
            Builtin::ToString => {
                let value = self.arg(args, 0)?;
                Ok(Value::Str(self.to_display_string(&value)?))
            }
            Builtin::Codepoint => {
                let text = self.string_arg(args, 0)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Number(f64::from(u32::from(c)))),
                    _ => Err(args.error("str must be a single character")),
                }
            }
            Builtin::Char => {
                let n = self.integer_arg(args, 0)?;
                u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .map(|c| Value::string(c.encode_utf8(&mut [0; 4])))
                    .ok_or_else(|| args.error(format!("invalid unicode codepoint: {n}")))
            }
            Builtin::Substr => {
                let text = self.string_arg(args, 0)?;
                let from = self.index_arg(args, 1)?;
                let len = self.index_arg(args, 2)?;
                let sub: String = text.chars().skip(from).take(len).collect();
                Ok(Value::Str(Rc::from(sub)))
            }
            Builtin::StartsWith => {
                let a = self.string_arg(args, 0)?;
                let b = self.string_arg(args, 1)?;
                Ok(Value::Bool(a.starts_with(&*b)))
            }
            Builtin::EndsWith => {
                let a = self.string_arg(args, 0)?;
                let b = self.string_arg(args, 1)?;
                Ok(Value::Bool(a.ends_with(&*b)))
            }
            Builtin::Split => {
                let text = self.string_arg(args, 0)?;
                let sep = self.string_arg(args, 1)?;
                if sep.is_empty() {
                    return Err(args.error("c must be a non-empty string"));
                }
                let elements = text
                    .split(&*sep)
                    .map(|part| self.heap.alloc_value(Value::string(part)))
                    .collect();
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            Builtin::Join => self.join(args),
            Builtin::MakeArray => {
                let size = self.index_arg(args, 0)?;
                let function = self.function_arg(args, 1)?;
                let elements = (0..size)
                    .map(|i| {
                        let index = self.heap.alloc_value(Value::Number(i as f64));
                        self.heap.alloc_thunk(Thunk::Apply {
                            function,
                            args: smallvec![index],
                        })
                    })
                    .collect();
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            Builtin::Range => {
                let from = self.integer_arg(args, 0)?;
                let to = self.integer_arg(args, 1)?;
                let elements = (from..=to)
                    .map(|i| self.heap.alloc_value(Value::Number(i as f64)))
                    .collect();
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            Builtin::Filter => self.filter(args),
            Builtin::Map => self.map(args),
            Builtin::Foldl => self.fold(args, false),
            Builtin::Foldr => self.fold(args, true),
            Builtin::FlatMap => self.flat_map(args),
            Builtin::ObjectFields | Builtin::ObjectFieldsAll => {
                let object = self.object_arg(args, 0)?;
                let object = self.heap.object(object)?;
                let names = if builtin == Builtin::ObjectFields {
                    object.visible_names()
                } else {
                    object.field_names()
                };
                let elements = names
                    .into_iter()
                    .map(|name| {
                        let text = self.interner.lookup(name);
                        self.heap.alloc_value(Value::Str(text))
                    })
                    .collect();
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            Builtin::ObjectHas | Builtin::ObjectHasAll => {
                let object = self.object_arg(args, 0)?;
                let field = self.string_arg(args, 1)?;
                let name = self.interner.intern_rc(&field);
                let found = self.has_field(object, name, builtin == Builtin::ObjectHasAll)?;
                Ok(Value::Bool(found))
            }
            Builtin::Abs => Ok(Value::Number(self.number_arg(args, 0)?.abs())),
            Builtin::Floor => Ok(Value::Number(self.number_arg(args, 0)?.floor())),
            Builtin::Ceil => Ok(Value::Number(self.number_arg(args, 0)?.ceil())),
            Builtin::Sqrt => {
                let x = self.number_arg(args, 0)?;
                if x < 0.0 {
                    return Err(args.error("x must not be negative"));
                }
                Ok(Value::Number(x.sqrt()))
            }
            Builtin::Pow => {
                let x = self.number_arg(args, 0)?;
                let n = self.number_arg(args, 1)?;
                finite(x.powf(n))
            }
            Builtin::Max => {
                let a = self.number_arg(args, 0)?;
                let b = self.number_arg(args, 1)?;
                Ok(Value::Number(a.max(b)))
            }
            Builtin::Min => {
                let a = self.number_arg(args, 0)?;
                let b = self.number_arg(args, 1)?;
                Ok(Value::Number(a.min(b)))
            }
            Builtin::Slice => self.slice(args),
            Builtin::Mod => {
                let a = self.arg(args, 0)?;
                let b = self.arg(args, 1)?;
                match (&a, &b) {
                    (Value::Number(_), Value::Number(_)) => {
                        self.evaluate_binary(BinaryOp::Mod, &a, &b)
                    }
                    (Value::Str(text), _) => {
                        let formatted = self.format(builtin, text, &b)?;
                        Ok(Value::Str(Rc::from(formatted)))
                    }
                    _ => Err(args.error(format!(
                        "operator % cannot be used on {} and {}",
                        a.type_name(),
                        b.type_name()
                    ))),
                }
            }
            Builtin::Format => {
                let text = self.string_arg(args, 0)?;
                let vals = self.arg(args, 1)?;
                let formatted = self.format(builtin, &text, &vals)?;
                Ok(Value::Str(Rc::from(formatted)))
            }
            Builtin::AssertEqual => {
                let a = self.arg(args, 0)?;
                let b = self.arg(args, 1)?;
                if self.equals(&a, &b)? {
                    return Ok(Value::Bool(true));
                }
                let a = self.manifest_compact(&a)?;
                let b = self.manifest_compact(&b)?;
                Err(user_error(format!("Assertion failed. {a} != {b}")))
            }
            Builtin::Equals => {
                let a = self.arg(args, 0)?;
                let b = self.arg(args, 1)?;
                Ok(Value::Bool(self.equals(&a, &b)?))
            }
            Builtin::IsArray => Ok(Value::Bool(matches!(self.arg(args, 0)?, Value::Array(_)))),
            Builtin::IsBoolean => Ok(Value::Bool(matches!(self.arg(args, 0)?, Value::Bool(_)))),
            Builtin::IsFunction => Ok(Value::Bool(matches!(
                self.arg(args, 0)?,
                Value::Function(_)
            ))),
            Builtin::IsNumber => Ok(Value::Bool(matches!(self.arg(args, 0)?, Value::Number(_)))),
            Builtin::IsObject => Ok(Value::Bool(matches!(self.arg(args, 0)?, Value::Object(_)))),
            Builtin::IsString => Ok(Value::Bool(matches!(self.arg(args, 0)?, Value::Str(_)))),
            Builtin::ManifestJson => {
                let value = self.arg(args, 0)?;
                let json = self.manifest_multiline(&value, "    ")?;
                Ok(Value::Str(Rc::from(json)))
            }
        }
    }

    /// Force argument `i` and keep it rooted for the rest of the call.
    fn arg(&mut self, args: Args<'_>, i: usize) -> EvalResult {
        let thunk = *args.thunks.get(i).ok_or_else(|| {
            internal(format!("std.{} called without argument {i}", args.builtin.name()))
        })?;
        let name = self
            .names
            .builtin_params(args.builtin)
            .get(i)
            .copied()
            .unwrap_or(Name::EMPTY);
        let value = self.force(thunk, FrameName::Thunk(name), None)?;
        self.root(&value);
        Ok(value)
    }

    fn number_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<f64> {
        match self.arg(args, i)? {
            Value::Number(n) => Ok(n),
            other => Err(args.expected(i, "a number", &other)),
        }
    }

    fn integer_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<i64> {
        let n = self.number_arg(args, i)?;
        as_integer(n).ok_or_else(|| args.error(format!("{} must be an integer, got {n}", args.param(i))))
    }

    /// A non-negative integer argument.
    fn index_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<usize> {
        let n = self.integer_arg(args, i)?;
        usize::try_from(n)
            .map_err(|_| args.error(format!("{} must not be negative, got {n}", args.param(i))))
    }

    /// A non-negative integer argument, or `None` for `null`.
    fn optional_index_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<Option<usize>> {
        match self.arg(args, i)? {
            Value::Null => Ok(None),
            Value::Number(n) => match as_integer(n).map(usize::try_from) {
                Some(Ok(index)) => Ok(Some(index)),
                _ => Err(args.error(format!(
                    "{} must be a non-negative integer, got {n}",
                    args.param(i)
                ))),
            },
            other => Err(args.expected(i, "a number or null", &other)),
        }
    }

    fn string_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<Rc<str>> {
        match self.arg(args, i)? {
            Value::Str(text) => Ok(text),
            other => Err(args.expected(i, "a string", &other)),
        }
    }

    fn array_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<ArrayRef> {
        match self.arg(args, i)? {
            Value::Array(array) => Ok(array),
            other => Err(args.expected(i, "an array", &other)),
        }
    }

    fn object_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<ObjectRef> {
        match self.arg(args, i)? {
            Value::Object(object) => Ok(object),
            other => Err(args.expected(i, "an object", &other)),
        }
    }

    fn function_arg(&mut self, args: Args<'_>, i: usize) -> EvalResult<FunctionRef> {
        match self.arg(args, i)? {
            Value::Function(function) => Ok(function),
            other => Err(args.expected(i, "a function", &other)),
        }
    }

    /// Call a user function on already-forced values.
    fn apply(&mut self, function: FunctionRef, values: &[Value]) -> EvalResult {
        let thunks: Vec<ThunkRef> = values
            .iter()
            .map(|value| self.heap.alloc_value(value.clone()))
            .collect();
        let result = self.call_function(function, &thunks, &[], None)?;
        self.root(&result);
        Ok(result)
    }

    fn length(&mut self, args: Args<'_>) -> EvalResult {
        let len = match self.arg(args, 0)? {
            Value::Str(text) => text.chars().count(),
            Value::Array(array) => self.heap.array(array)?.elements.len(),
            Value::Object(object) => self.heap.object(object)?.visible_names().len(),
            Value::Function(function) => match self.heap.function(function)? {
                Function::Closure { params, .. } => self.arena.params(*params).len(),
                Function::Builtin(builtin) => builtin.params().len(),
            },
            other => return Err(args.expected(0, "a string, array, object or function", &other)),
        };
        Ok(Value::Number(len as f64))
    }

    fn join(&mut self, args: Args<'_>) -> EvalResult {
        let sep = self.arg(args, 0)?;
        let array = self.array_arg(args, 1)?;
        let elements = self.heap.array(array)?.elements.clone();
        match sep {
            Value::Str(sep) => {
                let mut out = String::new();
                let mut first = true;
                for thunk in elements {
                    match self.force_element(thunk)? {
                        Value::Null => continue,
                        Value::Str(part) => {
                            if !first {
                                out.push_str(&sep);
                            }
                            out.push_str(&part);
                            first = false;
                        }
                        other => {
                            return Err(args.error(format!(
                                "expected string elements, got {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                Ok(Value::Str(Rc::from(out)))
            }
            Value::Array(sep) => {
                let sep = self.heap.array(sep)?.elements.clone();
                let mut out: Vec<ThunkRef> = Vec::new();
                let mut first = true;
                for thunk in elements {
                    match self.force_element(thunk)? {
                        Value::Null => continue,
                        Value::Array(part) => {
                            if !first {
                                out.extend_from_slice(&sep);
                            }
                            out.extend_from_slice(&self.heap.array(part)?.elements);
                            first = false;
                        }
                        other => {
                            return Err(args.error(format!(
                                "expected array elements, got {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                Ok(Value::Array(self.heap.alloc_array(Array { elements: out })))
            }
            other => Err(args.expected(0, "a string or array", &other)),
        }
    }

    fn map(&mut self, args: Args<'_>) -> EvalResult {
        let function = self.function_arg(args, 0)?;
        let elements: Vec<ThunkRef> = match self.arg(args, 1)? {
            Value::Array(array) => self.heap.array(array)?.elements.clone(),
            Value::Str(text) => text
                .chars()
                .map(|c| self.heap.alloc_value(Value::string(c.encode_utf8(&mut [0; 4]))))
                .collect(),
            other => return Err(args.expected(1, "an array or string", &other)),
        };
        let mapped = elements
            .into_iter()
            .map(|element| {
                self.heap.alloc_thunk(Thunk::Apply {
                    function,
                    args: smallvec![element],
                })
            })
            .collect();
        Ok(Value::Array(self.heap.alloc_array(Array { elements: mapped })))
    }

    fn filter(&mut self, args: Args<'_>) -> EvalResult {
        let function = self.function_arg(args, 0)?;
        let array = self.array_arg(args, 1)?;
        let elements = self.heap.array(array)?.elements.clone();
        let mut kept = Vec::new();
        for thunk in elements {
            let keep = self.call_function(function, &[thunk], &[], None)?;
            match keep {
                Value::Bool(true) => kept.push(thunk),
                Value::Bool(false) => {}
                other => {
                    return Err(args.error(format!(
                        "filter function must return boolean, got {}",
                        other.type_name()
                    )));
                }
            }
        }
        Ok(Value::Array(self.heap.alloc_array(Array { elements: kept })))
    }

    fn fold(&mut self, args: Args<'_>, from_right: bool) -> EvalResult {
        let function = self.function_arg(args, 0)?;
        let array = self.array_arg(args, 1)?;
        let mut acc = self.arg(args, 2)?;
        let mut elements = self.heap.array(array)?.elements.clone();
        if from_right {
            elements.reverse();
        }
        for thunk in elements {
            let acc_thunk = self.heap.alloc_value(acc);
            let call_args = if from_right {
                [thunk, acc_thunk]
            } else {
                [acc_thunk, thunk]
            };
            acc = self.call_function(function, &call_args, &[], None)?;
            self.root(&acc);
        }
        Ok(acc)
    }

    fn flat_map(&mut self, args: Args<'_>) -> EvalResult {
        let function = self.function_arg(args, 0)?;
        match self.arg(args, 1)? {
            Value::Array(array) => {
                let elements = self.heap.array(array)?.elements.clone();
                let mut out = Vec::new();
                for thunk in elements {
                    let result = self.call_function(function, &[thunk], &[], None)?;
                    self.root(&result);
                    match result {
                        Value::Array(part) => {
                            out.extend_from_slice(&self.heap.array(part)?.elements);
                        }
                        other => {
                            return Err(args.error(format!(
                                "func must return an array, got {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                Ok(Value::Array(self.heap.alloc_array(Array { elements: out })))
            }
            Value::Str(text) => {
                let mut out = String::new();
                for c in text.chars() {
                    match self.apply(function, &[Value::string(c.encode_utf8(&mut [0; 4]))])? {
                        Value::Str(part) => out.push_str(&part),
                        other => {
                            return Err(args.error(format!(
                                "func must return a string, got {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                Ok(Value::Str(Rc::from(out)))
            }
            other => Err(args.expected(1, "an array or string", &other)),
        }
    }

    fn slice(&mut self, args: Args<'_>) -> EvalResult {
        let target = self.arg(args, 0)?;
        let start = self.optional_index_arg(args, 1)?.unwrap_or(0);
        let end = self.optional_index_arg(args, 2)?;
        let step = self.optional_index_arg(args, 3)?.unwrap_or(1);
        if step == 0 {
            return Err(args.error("step must be greater than zero"));
        }
        match target {
            Value::Str(text) => {
                let len = text.chars().count();
                let end = end.map_or(len, |end| end.min(len));
                let sliced: String = text
                    .chars()
                    .enumerate()
                    .skip(start)
                    .take_while(|(i, _)| *i < end)
                    .step_by(step)
                    .map(|(_, c)| c)
                    .collect();
                Ok(Value::Str(Rc::from(sliced)))
            }
            Value::Array(array) => {
                let elements = &self.heap.array(array)?.elements;
                let end = end.map_or(elements.len(), |end| end.min(elements.len()));
                let sliced: Vec<ThunkRef> = if start < end {
                    elements[start..end].iter().step_by(step).copied().collect()
                } else {
                    Vec::new()
                };
                Ok(Value::Array(self.heap.alloc_array(Array { elements: sliced })))
            }
            other => Err(args.expected(0, "a string or array", &other)),
        }
    }
}
