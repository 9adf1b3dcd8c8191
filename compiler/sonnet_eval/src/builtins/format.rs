//! `std.format` and the string form of `%`.
//!
//! Python-style conversions: `%[(key)][flags][width][.precision]type` with
//! flags `#0- +`, `*` for width or precision taken from the values, and
//! types `d i u o x X e E f F g G c s r %`. Length modifiers (`h l L`) are
//! accepted and ignored.

use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;

use bitflags::bitflags;

use super::Builtin;
use crate::errors::{builtin_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::manifest::format_number;
use crate::value::Value;

bitflags! {
    /// Conversion flags, in any order between `%` and the width.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Flags: u8 {
        /// `#`: alternate form (`0x` prefixes, kept trailing zeros).
        const ALT = 1 << 0;
        /// `0`: pad numbers with zeros after the sign.
        const ZERO = 1 << 1;
        /// `-`: left-justify; overrides `0`.
        const LEFT = 1 << 2;
        /// ` `: blank before non-negative numbers.
        const BLANK = 1 << 3;
        /// `+`: sign before non-negative numbers; overrides ` `.
        const PLUS = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Count {
    Fixed(usize),
    /// `*`: taken from the next value.
    Star,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Spec {
    key: Option<String>,
    flags: Flags,
    width: Option<Count>,
    precision: Option<Count>,
    conversion: char,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Code(Spec),
}

fn parse(text: &str) -> Result<Vec<Piece>, String> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }

        let key = if chars.peek() == Some(&'(') {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some(')') => break,
                    Some(c) => key.push(c),
                    None => return Err("truncated format code".to_string()),
                }
            }
            Some(key)
        } else {
            None
        };

        let mut flags = Flags::empty();
        while let Some(&c) = chars.peek() {
            let flag = match c {
                '#' => Flags::ALT,
                '0' => Flags::ZERO,
                '-' => Flags::LEFT,
                ' ' => Flags::BLANK,
                '+' => Flags::PLUS,
                _ => break,
            };
            flags |= flag;
            chars.next();
        }

        let width = parse_count(&mut chars);
        let precision = if chars.peek() == Some(&'.') {
            chars.next();
            Some(parse_count(&mut chars).unwrap_or(Count::Fixed(0)))
        } else {
            None
        };

        while matches!(chars.peek(), Some('h' | 'l' | 'L')) {
            chars.next();
        }

        let conversion = match chars.next() {
            Some(c @ ('d' | 'i' | 'u' | 'o' | 'x' | 'X' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G'
            | 'c' | 's' | 'r' | '%')) => c,
            Some(c) => return Err(format!("unrecognised conversion type: {c}")),
            None => return Err("truncated format code".to_string()),
        };
        pieces.push(Piece::Code(Spec {
            key,
            flags,
            width,
            precision,
            conversion,
        }));
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

fn parse_count(chars: &mut Peekable<Chars<'_>>) -> Option<Count> {
    if chars.peek() == Some(&'*') {
        chars.next();
        return Some(Count::Star);
    }
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }
    digits.parse().ok().map(Count::Fixed)
}

/// Pad `body` (with its sign or prefix already split off into `sign`) to
/// `width`. Zero padding goes between the sign and the digits.
fn pad(sign: &str, body: &str, width: usize, flags: Flags, numeric: bool) -> String {
    let len = sign.chars().count() + body.chars().count();
    let fill = width.saturating_sub(len);
    if flags.contains(Flags::LEFT) {
        format!("{sign}{body}{}", " ".repeat(fill))
    } else if flags.contains(Flags::ZERO) && numeric {
        format!("{sign}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

fn sign_of(negative: bool, flags: Flags) -> &'static str {
    if negative {
        "-"
    } else if flags.contains(Flags::PLUS) {
        "+"
    } else if flags.contains(Flags::BLANK) {
        " "
    } else {
        ""
    }
}

/// Integer conversions `d o x X`, truncating toward zero.
fn format_integer(n: f64, conversion: char, precision: Option<usize>, flags: Flags) -> (String, String) {
    let value = n.trunc();
    let magnitude = value.abs() as u64;
    let mut digits = match conversion {
        'o' => format!("{magnitude:o}"),
        'x' => format!("{magnitude:x}"),
        'X' => format!("{magnitude:X}"),
        _ => magnitude.to_string(),
    };
    if let Some(min) = precision {
        if digits.len() < min {
            digits = format!("{}{digits}", "0".repeat(min - digits.len()));
        }
    }
    let prefix = match (flags.contains(Flags::ALT), conversion) {
        (true, 'o') => "0",
        (true, 'x') => "0x",
        (true, 'X') => "0X",
        _ => "",
    };
    let sign = sign_of(value < 0.0, flags);
    (format!("{sign}{prefix}"), digits)
}

/// `1.500000e+00` style: mantissa with `precision` decimals, signed
/// exponent of at least two digits.
fn exponent_form(magnitude: f64, precision: usize, upper: bool) -> String {
    let text = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let e = if upper { 'E' } else { 'e' };
    format!("{mantissa}{e}{sign}{:02}", exponent.abs())
}

fn strip_trailing_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    let (number, exponent) = match text.find(['e', 'E']) {
        Some(at) => text.split_at(at),
        None => (text, ""),
    };
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{number}{exponent}")
}

/// Float conversions `e E f F g G`.
fn format_float(n: f64, conversion: char, precision: Option<usize>, flags: Flags) -> (String, String) {
    let precision = precision.unwrap_or(6);
    let magnitude = n.abs();
    let body = match conversion {
        'f' | 'F' => format!("{magnitude:.precision$}"),
        'e' | 'E' => exponent_form(magnitude, precision, conversion == 'E'),
        _ => {
            let significant = precision.max(1);
            let exponent = if magnitude == 0.0 {
                0
            } else {
                magnitude.log10().floor() as i64
            };
            let upper = conversion == 'G';
            let text = if exponent < -4 || exponent >= significant as i64 {
                exponent_form(magnitude, significant - 1, upper)
            } else {
                let decimals = (significant as i64 - 1 - exponent).max(0) as usize;
                format!("{magnitude:.decimals$}")
            };
            if flags.contains(Flags::ALT) {
                text
            } else {
                strip_trailing_zeros(&text)
            }
        }
    };
    (sign_of(n < 0.0, flags).to_string(), body)
}

/// Where conversion values come from.
enum Source<'a> {
    Positional { values: &'a [Value], next: usize },
    Keyed(&'a [(String, Value)]),
}

impl Source<'_> {
    fn next(&mut self, spec: &Spec) -> Result<Value, String> {
        match self {
            Source::Positional { values, next } => {
                if spec.key.is_some() {
                    return Err("mapping keys require an object".to_string());
                }
                let value = values
                    .get(*next)
                    .cloned()
                    .ok_or_else(|| "not enough values to format".to_string())?;
                *next += 1;
                Ok(value)
            }
            Source::Keyed(fields) => {
                let key = spec
                    .key
                    .as_deref()
                    .ok_or_else(|| "format codes need a mapping key when formatting an object".to_string())?;
                fields
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| format!("no such field: {key}"))
            }
        }
    }

    fn count(&mut self, count: Option<Count>, spec: &Spec) -> Result<Option<usize>, String> {
        match count {
            None => Ok(None),
            Some(Count::Fixed(n)) => Ok(Some(n)),
            Some(Count::Star) => match self.next(spec)? {
                Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as usize)),
                other => Err(format!("* must be a non-negative integer, got {}", other.type_name())),
            },
        }
    }
}

impl Interpreter {
    /// Format `text` with `vals`: an array supplies positional values, an
    /// object supplies `%(key)` values, anything else is a single value.
    pub(super) fn format(&mut self, builtin: Builtin, text: &str, vals: &Value) -> EvalResult<String> {
        let error = |message: String| builtin_error(builtin.name(), message);
        let pieces = parse(text).map_err(error)?;

        let mut keyed = Vec::new();
        let mut positional = Vec::new();
        let mut source = match vals {
            Value::Array(array) => {
                for thunk in self.heap.array(*array)?.elements.clone() {
                    positional.push(self.force_element(thunk)?);
                }
                Source::Positional {
                    values: &positional,
                    next: 0,
                }
            }
            Value::Object(object) => {
                for name in self.heap.object(*object)?.field_names() {
                    let value = self.field_value(*object, name)?;
                    self.root(&value);
                    keyed.push((self.interner.lookup(name).to_string(), value));
                }
                Source::Keyed(&keyed)
            }
            other => {
                positional.push(other.clone());
                Source::Positional {
                    values: &positional,
                    next: 0,
                }
            }
        };

        let mut out = String::new();
        for piece in pieces {
            let spec = match piece {
                Piece::Literal(literal) => {
                    out.push_str(&literal);
                    continue;
                }
                Piece::Code(spec) if spec.conversion == '%' => {
                    out.push('%');
                    continue;
                }
                Piece::Code(spec) => spec,
            };
            let width = source.count(spec.width, &spec).map_err(error)?.unwrap_or(0);
            let precision = source.count(spec.precision, &spec).map_err(error)?;
            let value = source.next(&spec).map_err(error)?;
            out.push_str(&self.convert(builtin, &spec, &value, width, precision)?);
        }

        if let Source::Positional { values, next } = source {
            if next < values.len() {
                return Err(error(format!(
                    "too many values to format: {} given, {next} used",
                    values.len()
                )));
            }
        }
        Ok(out)
    }

    fn convert(
        &mut self,
        builtin: Builtin,
        spec: &Spec,
        value: &Value,
        width: usize,
        precision: Option<usize>,
    ) -> EvalResult<String> {
        let number = |value: &Value| -> Result<f64, EvalError> {
            match value {
                Value::Number(n) => Ok(*n),
                other => Err(builtin_error(
                    builtin.name(),
                    format!(
                        "format %{} expected number, got {}",
                        spec.conversion,
                        other.type_name()
                    ),
                )),
            }
        };
        let flags = spec.flags;
        let text = match spec.conversion {
            'd' | 'i' | 'u' | 'o' | 'x' | 'X' => {
                let (sign, digits) = format_integer(number(value)?, spec.conversion, precision, flags);
                pad(&sign, &digits, width, flags, true)
            }
            'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                let (sign, digits) = format_float(number(value)?, spec.conversion, precision, flags);
                pad(&sign, &digits, width, flags, true)
            }
            'c' => {
                let c: Rc<str> = match value {
                    Value::Number(n) => {
                        let code = u32::try_from(*n as i64).ok().and_then(char::from_u32);
                        match code {
                            Some(c) => Rc::from(c.to_string()),
                            None => {
                                return Err(builtin_error(
                                    builtin.name(),
                                    format!("invalid codepoint for %c: {}", format_number(*n)),
                                ));
                            }
                        }
                    }
                    Value::Str(text) if text.chars().count() == 1 => Rc::clone(text),
                    other => {
                        return Err(builtin_error(
                            builtin.name(),
                            format!("%c expected number or single character, got {}", other.type_name()),
                        ));
                    }
                };
                pad("", &c, width, flags, false)
            }
            'r' => {
                let repr = self.manifest_compact(value)?;
                pad("", &truncate(&repr, precision), width, flags, false)
            }
            _ => {
                let shown = self.to_display_string(value)?;
                pad("", &truncate(&shown, precision), width, flags, false)
            }
        };
        Ok(text)
    }
}

/// `%.Ns`: at most `N` characters.
fn truncate(text: &str, precision: Option<usize>) -> String {
    match precision {
        Some(n) => text.chars().take(n).collect(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: f64, conversion: char, precision: Option<usize>, flags: Flags, width: usize) -> String {
        let (sign, digits) = format_integer(n, conversion, precision, flags);
        pad(&sign, &digits, width, flags, true)
    }

    fn float(n: f64, conversion: char, precision: Option<usize>) -> String {
        let (sign, digits) = format_float(n, conversion, precision, Flags::empty());
        format!("{sign}{digits}")
    }

    #[test]
    fn parses_codes_and_literals() {
        let pieces = parse("a%-5.2fb%%%(x)s").unwrap_or_default();
        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[0], Piece::Literal("a".to_string()));
        assert!(matches!(
            &pieces[1],
            Piece::Code(Spec { flags, width: Some(Count::Fixed(5)), precision: Some(Count::Fixed(2)), conversion: 'f', .. })
                if *flags == Flags::LEFT
        ));
        assert!(matches!(&pieces[4], Piece::Code(Spec { key: Some(k), conversion: 's', .. }) if k == "x"));
    }

    #[test]
    fn rejects_unknown_conversion() {
        assert_eq!(parse("%q"), Err("unrecognised conversion type: q".to_string()));
        assert_eq!(parse("%5"), Err("truncated format code".to_string()));
    }

    #[test]
    fn integers() {
        let zero = Flags::ZERO;
        let alt = Flags::ALT;
        assert_eq!(int(42.9, 'd', None, Flags::empty(), 0), "42");
        assert_eq!(int(-42.9, 'd', None, Flags::empty(), 0), "-42");
        assert_eq!(int(-7.0, 'd', None, zero, 5), "-0007");
        assert_eq!(int(255.0, 'x', None, alt, 0), "0xff");
        assert_eq!(int(8.0, 'o', None, alt, 0), "010");
        assert_eq!(int(3.0, 'd', Some(3), Flags::empty(), 0), "003");
    }

    #[test]
    fn floats() {
        assert_eq!(float(3.14159, 'f', Some(2)), "3.14");
        assert_eq!(float(1.5, 'f', None), "1.500000");
        assert_eq!(float(12345.678, 'e', Some(2)), "1.23e+04");
        assert_eq!(float(0.0001, 'g', None), "0.0001");
        assert_eq!(float(1e-5, 'g', None), "1e-05");
        assert_eq!(float(100000.0, 'g', None), "100000");
        assert_eq!(float(1e6, 'G', None), "1E+06");
    }
}
