//! Rust code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting Rust AST nodes
//! to string representations. Each AST type implements `Emit` for clean,
//! composable code generation. Nested blocks are indented with four spaces.

use super::types::{
    FormatPart, RsConst, RsExpr, RsField, RsFn, RsImpl, RsItem, RsModule, RsParam, RsStmt,
    RsStruct, RsType, RsUse,
};
use super::utils::{escape_format_literal, escape_rust_string};

const INDENT: &str = "    ";

/// Trait for emitting Rust code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Rust source representation.
    fn emit(&self) -> String;
}

/// Indent every non-empty line of `text` by `level` steps.
fn indent(text: &str, level: usize) -> String {
    let prefix = INDENT.repeat(level);
    let mut output = String::with_capacity(text.len());
    for line in text.lines() {
        if !line.is_empty() {
            output.push_str(&prefix);
            output.push_str(line);
        }
        output.push('\n');
    }
    output
}

fn join_emitted<T: Emit>(nodes: &[T], separator: &str) -> String {
    nodes.iter().map(Emit::emit).collect::<Vec<_>>().join(separator)
}

fn emit_docs(output: &mut String, docs: &[String]) {
    for line in docs {
        if line.is_empty() {
            output.push_str("///\n");
        } else {
            output.push_str(&format!("/// {line}\n"));
        }
    }
}

fn emit_attrs(output: &mut String, attrs: &[String]) {
    for attr in attrs {
        output.push_str(&format!("#[{attr}]\n"));
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for RsType {
    fn emit(&self) -> String {
        match self {
            RsType::Path(name) => name.clone(),
            RsType::Generic { name, args } => format!("{}<{}>", name, join_emitted(args, ", ")),
            RsType::Ref(inner) => format!("&{}", inner.emit()),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for RsExpr {
    fn emit(&self) -> String {
        match self {
            RsExpr::Ident(name) => name.clone(),
            RsExpr::Str(value) => format!("\"{}\"", escape_rust_string(value)),
            RsExpr::Field { base, name } => format!("{}.{}", base.emit(), name),
            RsExpr::Call { callee, args } => format!("{}({})", callee, join_emitted(args, ", ")),
            RsExpr::MethodCall {
                receiver,
                method,
                args,
            } => format!("{}.{}({})", receiver.emit(), method, join_emitted(args, ", ")),
            RsExpr::Format(parts) => {
                let mut template = String::new();
                let mut args = Vec::new();
                for part in parts {
                    match part {
                        FormatPart::Literal(text) => template.push_str(&escape_format_literal(text)),
                        FormatPart::Arg(expr) => {
                            template.push_str("{}");
                            args.push(expr.emit());
                        }
                    }
                }
                if args.is_empty() {
                    format!("format!(\"{template}\")")
                } else {
                    format!("format!(\"{}\", {})", template, args.join(", "))
                }
            }
            RsExpr::Ref(inner) => format!("&{}", inner.emit()),
            RsExpr::Not(inner) => format!("!{}", inner.emit()),
            RsExpr::Await(inner) => format!("{}.await", inner.emit()),
            RsExpr::Closure { params, body } => format!("|{}| {}", params.join(", "), body.emit()),
            RsExpr::If {
                cond,
                then,
                otherwise,
            } => format!(
                "if {} {{ {} }} else {{ {} }}",
                cond.emit(),
                then.emit(),
                otherwise.emit()
            ),
            RsExpr::Match { scrutinee, arms } => {
                let mut output = format!("match {} {{\n", scrutinee.emit());
                for (pattern, expr) in arms {
                    output.push_str(&indent(&format!("{} => {},", pattern, expr.emit()), 1));
                }
                output.push('}');
                output
            }
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl RsStmt {
    /// Emit with the given indentation level.
    pub fn emit_indented(&self, level: usize) -> String {
        match self {
            RsStmt::IfLet {
                pattern,
                value,
                body,
            } => {
                let mut output = indent(&format!("if let {} = {} {{", pattern, value.emit()), level);
                for stmt in body {
                    output.push_str(&stmt.emit_indented(level + 1));
                }
                output.push_str(&indent("}", level));
                output
            }
            _ => indent(&self.emit(), level),
        }
    }
}

impl Emit for RsStmt {
    fn emit(&self) -> String {
        match self {
            RsStmt::Let {
                name,
                mutable,
                ty,
                value,
            } => {
                let binding = if *mutable { "let mut" } else { "let" };
                let annotation = ty
                    .as_ref()
                    .map(|t| format!(": {}", t.emit()))
                    .unwrap_or_default();
                format!("{} {}{} = {};\n", binding, name, annotation, value.emit())
            }
            RsStmt::Expr(expr) => format!("{};\n", expr.emit()),
            RsStmt::Tail(expr) => format!("{}\n", expr.emit()),
            RsStmt::IfLet { .. } => self.emit_indented(0),
            RsStmt::Comment(text) => format!("// {text}\n"),
            RsStmt::Raw(code) => {
                let mut output = code.clone();
                if !output.ends_with('\n') {
                    output.push('\n');
                }
                output
            }
        }
    }
}

// =============================================================================
// Items
// =============================================================================

impl Emit for RsField {
    fn emit(&self) -> String {
        let mut output = String::new();
        emit_docs(&mut output, &self.docs);
        emit_attrs(&mut output, &self.attrs);
        let visibility = if self.is_pub { "pub " } else { "" };
        output.push_str(&format!("{}{}: {},\n", visibility, self.name, self.ty.emit()));
        output
    }
}

impl Emit for RsStruct {
    fn emit(&self) -> String {
        let mut output = String::new();
        emit_docs(&mut output, &self.docs);
        if !self.derives.is_empty() {
            output.push_str(&format!("#[derive({})]\n", self.derives.join(", ")));
        }
        let visibility = if self.is_pub { "pub " } else { "" };
        output.push_str(&format!("{}struct {} {{\n", visibility, self.name));
        for field in &self.fields {
            output.push_str(&indent(&field.emit(), 1));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for RsParam {
    fn emit(&self) -> String {
        format!("{}: {}", self.pattern, self.ty.emit())
    }
}

impl Emit for RsFn {
    fn emit(&self) -> String {
        let mut output = String::new();
        emit_docs(&mut output, &self.docs);
        emit_attrs(&mut output, &self.attrs);

        let visibility = if self.is_pub { "pub " } else { "" };
        let asyncness = if self.is_async { "async " } else { "" };
        let params: Vec<String> = self
            .receiver
            .iter()
            .cloned()
            .chain(self.params.iter().map(Emit::emit))
            .collect();
        let ret = self
            .ret
            .as_ref()
            .map(|t| format!(" -> {}", t.emit()))
            .unwrap_or_default();

        output.push_str(&format!(
            "{}{}fn {}({}){} {{\n",
            visibility,
            asyncness,
            self.name,
            params.join(", "),
            ret
        ));
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for RsImpl {
    fn emit(&self) -> String {
        let mut output = String::new();
        emit_attrs(&mut output, &self.attrs);
        match &self.trait_name {
            Some(trait_name) => {
                output.push_str(&format!("impl {} for {} {{\n", trait_name, self.target));
            }
            None => output.push_str(&format!("impl {} {{\n", self.target)),
        }
        let fns: Vec<String> = self.fns.iter().map(|f| indent(&f.emit(), 1)).collect();
        output.push_str(&fns.join("\n"));
        output.push_str("}\n");
        output
    }
}

impl Emit for RsConst {
    fn emit(&self) -> String {
        format!(
            "const {}: {} = {};\n",
            self.name,
            self.ty.emit(),
            self.value.emit()
        )
    }
}

impl Emit for RsUse {
    fn emit(&self) -> String {
        match self.items.as_slice() {
            [single] => format!("use {}::{};\n", self.path, single),
            items => format!("use {}::{{{}}};\n", self.path, items.join(", ")),
        }
    }
}

impl Emit for RsItem {
    fn emit(&self) -> String {
        match self {
            RsItem::Const(c) => c.emit(),
            RsItem::Struct(s) => s.emit(),
            RsItem::Impl(i) => i.emit(),
            RsItem::Fn(f) => f.emit(),
        }
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for RsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.header {
            output.push_str(&format!("// {line}\n"));
        }
        if !self.header.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("pub mod {} {{\n", self.name));

        let mut sections = Vec::new();
        if !self.uses.is_empty() {
            sections.push(join_emitted(&self.uses, ""));
        }
        sections.extend(self.items.iter().map(Emit::emit));

        let body: Vec<String> = sections.iter().map(|s| indent(s, 1)).collect();
        output.push_str(&body.join("\n"));
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Tests
// =============================================================================
