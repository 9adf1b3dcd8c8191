//! Text rendering of a lowered tree, for `debug_ast`.
//!
//! One node per line, children indented by two spaces:
//!
//! ```text
//! local
//!   std =
//!     std
//!   in
//!     binary +
//!       number 1
//!       number 1
//! ```
//!
//! Nodes shared by lowering (a `+:` body, object locals) are printed at
//! every place they occur.

use sonnet_ir::canon::{CanArena, CanExpr, CanFieldName, CanId, CanRange, CanSpec};
use sonnet_ir::{Name, StringInterner};
use sonnet_stack::ensure_sufficient_stack;

pub fn dump(arena: &CanArena, root: CanId, interner: &StringInterner) -> String {
    let mut printer = Printer {
        arena,
        interner,
        out: String::new(),
    };
    printer.node(root, 0);
    printer.out
}

struct Printer<'a> {
    arena: &'a CanArena,
    interner: &'a StringInterner,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_string()
    }

    fn quoted(&self, name: Name) -> String {
        format!("{:?}", &*self.interner.lookup(name))
    }

    fn node(&mut self, id: CanId, depth: usize) {
        ensure_sufficient_stack(|| self.node_inner(id, depth));
    }

    fn node_inner(&mut self, id: CanId, depth: usize) {
        let arena = self.arena;
        let child = depth + 1;
        match arena.kind(id) {
            CanExpr::Null => self.line(depth, "null"),
            CanExpr::True => self.line(depth, "true"),
            CanExpr::False => self.line(depth, "false"),
            CanExpr::Number(n) => {
                let text = format!("number {n}");
                self.line(depth, &text);
            }
            CanExpr::Str(s) => {
                let text = format!("string {}", self.quoted(s));
                self.line(depth, &text);
            }
            CanExpr::Var(v) => {
                let text = format!("var {}", self.name(v));
                self.line(depth, &text);
            }
            CanExpr::SelfRef => self.line(depth, "self"),
            CanExpr::Std => self.line(depth, "std"),
            CanExpr::SuperIndex(index) => {
                self.line(depth, "super index");
                self.node(index, child);
            }
            CanExpr::InSuper(name) => {
                self.line(depth, "in super");
                self.node(name, child);
            }
            CanExpr::Local { binds, body } => {
                self.line(depth, "local");
                for bind in arena.binds(binds) {
                    let text = format!("{} =", self.name(bind.name));
                    self.line(child, &text);
                    self.node(bind.body, child + 1);
                }
                self.line(child, "in");
                self.node(body, child + 1);
            }
            CanExpr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(depth, "if");
                self.node(cond, child);
                self.node(then_branch, child);
                self.node(else_branch, child);
            }
            CanExpr::Binary { op, left, right } => {
                let text = format!("binary {}", op.as_symbol());
                self.line(depth, &text);
                self.node(left, child);
                self.node(right, child);
            }
            CanExpr::Unary { op, operand } => {
                let text = format!("unary {}", op.as_symbol());
                self.line(depth, &text);
                self.node(operand, child);
            }
            CanExpr::Index { target, index } => {
                self.line(depth, "index");
                self.node(target, child);
                self.node(index, child);
            }
            CanExpr::Apply {
                target,
                args,
                tailstrict,
            } => {
                self.line(depth, if tailstrict { "apply tailstrict" } else { "apply" });
                self.node(target, child);
                for arg in arena.args(args) {
                    if let Some(name) = arg.name {
                        let text = format!("{} =", self.name(name));
                        self.line(child, &text);
                        self.node(arg.value, child + 1);
                    } else {
                        self.node(arg.value, child);
                    }
                }
            }
            CanExpr::Function { name, params, body } => {
                let mut text = String::from("function ");
                if name == Name::EMPTY {
                    text.push_str("<anonymous>");
                } else {
                    text.push_str(&self.name(name));
                }
                text.push('(');
                for (i, param) in arena.params(params).iter().enumerate() {
                    if i > 0 {
                        text.push_str(", ");
                    }
                    text.push_str(&self.name(param.name));
                    if param.default.is_some() {
                        text.push('=');
                    }
                }
                text.push(')');
                self.line(depth, &text);
                for param in arena.params(params) {
                    if let Some(default) = param.default {
                        let text = format!("default {}", self.name(param.name));
                        self.line(child, &text);
                        self.node(default, child + 1);
                    }
                }
                self.node(body, child);
            }
            CanExpr::Object { fields, asserts } => {
                self.line(depth, "object");
                for field in arena.fields(fields) {
                    let marker = field.visibility.as_symbol();
                    match field.name {
                        CanFieldName::Fixed(name) => {
                            let text = format!("field {}{marker}", self.quoted(name));
                            self.line(child, &text);
                        }
                        CanFieldName::Computed(key) => {
                            let text = format!("field [computed]{marker}");
                            self.line(child, &text);
                            self.node(key, child + 1);
                        }
                    }
                    self.node(field.body, child + 1);
                }
                for &assert in arena.expr_list(asserts) {
                    self.line(child, "assert");
                    self.node(assert, child + 1);
                }
            }
            CanExpr::ObjectComp { key, value, specs } => {
                self.line(depth, "object comprehension");
                self.node(key, child);
                self.node(value, child);
                self.specs(specs, child);
            }
            CanExpr::Array(items) => {
                self.line(depth, "array");
                for &item in arena.expr_list(items) {
                    self.node(item, child);
                }
            }
            CanExpr::ArrayComp { body, specs } => {
                self.line(depth, "array comprehension");
                self.node(body, child);
                self.specs(specs, child);
            }
            CanExpr::Import(path) => {
                let text = format!("import {}", self.quoted(path));
                self.line(depth, &text);
            }
            CanExpr::ImportStr(path) => {
                let text = format!("importstr {}", self.quoted(path));
                self.line(depth, &text);
            }
            CanExpr::Error(value) => {
                self.line(depth, "error");
                self.node(value, child);
            }
        }
    }

    fn specs(&mut self, specs: CanRange<CanSpec>, depth: usize) {
        let arena = self.arena;
        for spec in arena.specs(specs) {
            match *spec {
                CanSpec::For { var, iter } => {
                    let text = format!("for {} in", self.name(var));
                    self.line(depth, &text);
                    self.node(iter, depth + 1);
                }
                CanSpec::If { cond } => {
                    self.line(depth, "if");
                    self.node(cond, depth + 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
