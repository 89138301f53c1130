//! Source printer for the AST.
//!
//! The output is minimal, re-parseable source: every compound expression is
//! parenthesized, blocks are printed on a single line and statements end with
//! `;`. Parsing the printed text yields the same tree up to locations.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{
    Block, Declaration, Expr, FunctionDeclaration, Literal, Parameter, Program, Statement,
    TemplatePart, VariableDeclaration,
};

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, decl) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "{decl}")?;
        }
        Ok(())
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(func) => write!(f, "{func}"),
            Self::Variable(var) => write!(f, "{var}"),
        }
    }
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fun {}(", self.name)?;
        write_separated(f, &self.parameters, ", ")?;
        f.write_char(')')?;
        if let Some(ty) = &self.return_type {
            write!(f, ": {}", ty.name)?;
        }
        write!(f, " {}", self.body)
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_annotation.name)
    }
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let keyword = if self.mutable { "var" } else { "val" };
        write!(f, "{keyword} {}", self.name)?;
        if let Some(ty) = &self.type_annotation {
            write!(f, ": {}", ty.name)?;
        }
        if let Some(init) = &self.initializer {
            write!(f, " = {init}")?;
        }
        f.write_char(';')
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for statement in &self.statements {
            write!(f, " {statement}")?;
        }
        f.write_str(" }")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(block) => write!(f, "{block}"),
            Self::Expression { expr, .. } => write!(f, "{expr};"),
            Self::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                write!(f, "if ({condition}) {then_branch}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            },
            Self::While { condition, body, .. } => write!(f, "while ({condition}) {body}"),
            Self::Return { value: Some(value),
                           .. } => write!(f, "return {value};"),
            Self::Return { value: None, .. } => f.write_str("return;"),
            Self::Declaration(decl) => write!(f, "{decl}"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Identifier { name, .. } => f.write_str(name),
            Self::Binary { op, left, right, .. } => write!(f, "({left} {op} {right})"),
            Self::Unary { op, operand, .. } => write!(f, "({op}{operand})"),
            Self::Call { name, arguments, .. } => {
                write!(f, "{name}(")?;
                write_separated(f, arguments, ", ")?;
                f.write_char(')')
            },
            Self::Assignment { target, value, .. } => write!(f, "({target} = {value})"),
            Self::If { condition,
                       then_branch,
                       else_branch,
                       .. } => write!(f, "(if ({condition}) {then_branch} else {else_branch})"),
            Self::StringTemplate { parts, .. } => {
                f.write_char('"')?;
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => write_escaped(f, text)?,
                        TemplatePart::Expr(expr) => write!(f, "${{{expr}}}")?,
                    }
                }
                f.write_char('"')
            },
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => {
                f.write_char('"')?;
                write_escaped(f, s)?;
                f.write_char('"')
            },
        }
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_escaped(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '$' => f.write_str("\\$")?,
            other => f.write_char(other)?,
        }
    }
    Ok(())
}
