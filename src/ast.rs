use crate::location::SourceLocation;

/// Renders AST nodes back into source text.
pub mod display;

/// A literal value written directly in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A 64-bit signed integer literal.
    Int(i64),
    /// A string literal with escapes resolved.
    String(String),
    /// `true` or `false`.
    Boolean(bool),
}

/// A complete parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionDeclaration),
    Variable(VariableDeclaration),
}

impl Declaration {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Variable(v) => &v.name,
        }
    }

    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Function(f) => &f.location,
            Self::Variable(v) => &v.location,
        }
    }
}

/// A written type name such as `Int` in `x: Int`.
///
/// The name is kept as text; the semantic passes decide whether it denotes a
/// known type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub name:     String,
    pub location: SourceLocation,
}

/// A function parameter, `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name:            String,
    pub type_annotation: TypeAnnotation,
    pub location:        SourceLocation,
}

/// A function declared with `fun`.
///
/// ```text
///     fun name(a: Int, b: Int): Int { ... }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// The name of the function.
    pub name:        String,
    /// Parameters in declaration order.
    pub parameters:  Vec<Parameter>,
    /// The declared return type; `None` means `Unit`.
    pub return_type: Option<TypeAnnotation>,
    /// The body block.
    pub body:        Block,
    /// Location of the `fun` keyword.
    pub location:    SourceLocation,
}

/// A `val` or `var` declaration, at top level or inside a block.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// `true` for `var`, `false` for `val`.
    pub mutable:         bool,
    /// The name of the variable.
    pub name:            String,
    /// The optional `: Type` annotation.
    pub type_annotation: Option<TypeAnnotation>,
    /// The optional `= expr` initializer.
    pub initializer:     Option<Expr>,
    /// Location of the `val`/`var` keyword.
    pub location:        SourceLocation,
}

/// A brace-delimited sequence of statements introducing a new scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    /// Location of the opening brace.
    pub location:   SourceLocation,
}

/// A statement inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A nested block.
    Block(Block),
    /// An expression evaluated for its value or side effects.
    Expression {
        expr:     Expr,
        location: SourceLocation,
    },
    /// An `if` statement; the `else` branch is optional.
    If {
        condition:   Expr,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
        location:    SourceLocation,
    },
    /// A `while` loop.
    While {
        condition: Expr,
        body:      Box<Self>,
        location:  SourceLocation,
    },
    /// `return` with an optional value.
    Return {
        value:    Option<Expr>,
        location: SourceLocation,
    },
    /// A local `val`/`var` declaration.
    Declaration(VariableDeclaration),
}

impl Statement {
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Block(block) => &block.location,
            Self::Declaration(decl) => &decl.location,
            Self::Expression { location, .. }
            | Self::If { location, .. }
            | Self::While { location, .. }
            | Self::Return { location, .. } => location,
        }
    }
}

/// A piece of a string template: literal text or an interpolated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant value.
    Literal {
        value:    Literal,
        location: SourceLocation,
    },
    /// A reference to a variable or function by name.
    Identifier {
        name:     String,
        location: SourceLocation,
    },
    /// A binary operation such as `a + b`.
    Binary {
        op:       BinaryOperator,
        left:     Box<Self>,
        right:    Box<Self>,
        location: SourceLocation,
    },
    /// A prefix operation such as `-a` or `!a`.
    Unary {
        op:       UnaryOperator,
        operand:  Box<Self>,
        location: SourceLocation,
    },
    /// A call of a named function, `name(args)`.
    Call {
        name:      String,
        arguments: Vec<Self>,
        location:  SourceLocation,
    },
    /// `target = value`. Evaluates to the assigned value.
    Assignment {
        target:   String,
        value:    Box<Self>,
        location: SourceLocation,
    },
    /// `if (condition) a else b` used as an expression; `else` is mandatory.
    If {
        condition:   Box<Self>,
        then_branch: Box<Self>,
        else_branch: Box<Self>,
        location:    SourceLocation,
    },
    /// A string with interpolated `$name` or `${expr}` parts.
    StringTemplate {
        parts:    Vec<TemplatePart>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Gets the source location of `self`.
    ///
    /// ## Example
    /// ```
    /// use ktinterp::{ast::Expr, location::SourceLocation};
    ///
    /// let expr = Expr::Identifier { name:     "x".to_string(),
    ///                               location: SourceLocation::new(5, 2), };
    ///
    /// assert_eq!(expr.location().line, 5);
    /// ```
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Literal { location, .. }
            | Self::Identifier { location, .. }
            | Self::Binary { location, .. }
            | Self::Unary { location, .. }
            | Self::Call { location, .. }
            | Self::Assignment { location, .. }
            | Self::If { location, .. }
            | Self::StringTemplate { location, .. } => location,
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

impl BinaryOperator {
    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`).
    Not,
}

impl UnaryOperator {
    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
