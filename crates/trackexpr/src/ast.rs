//! Abstract syntax tree for tracking expressions
//!
//! The node set is closed: the parser only ever produces the variants of
//! [`Node`], and the evaluator matches on them exhaustively. Nodes are
//! immutable once built and compare structurally, so parsing the same
//! source twice yields equal trees.

use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Nodes
// ═══════════════════════════════════════════════════════════════════════

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Number, string, boolean or `null` literal
    Literal(Literal),

    /// A bare name resolved through the scope chain
    Identifier(Identifier),

    /// The `this` keyword
    This,

    /// `object.name` or `object[expr]`
    Member(MemberExpr),

    /// `callee(arg, ...)`
    Call(CallExpr),

    /// Prefix operator application
    Unary(UnaryExpr),

    /// Arithmetic, comparison, bitwise and relational operators
    Binary(BinaryExpr),

    /// Short-circuiting `&&` / `||`
    Logical(LogicalExpr),

    /// `test ? consequent : alternate`
    Conditional(ConditionalExpr),

    /// `[a, , b]`
    Array(ArrayExpr),

    /// Several top-level expressions separated by `;` or `,`
    Program(Program),
}

/// A literal value as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The decoded value
    pub value: LiteralValue,

    /// The source text the literal was read from
    pub raw: String,
}

/// The value carried by a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal (always a double)
    Number(f64),
    /// String literal with escapes decoded
    String(String),
}

/// A reference to a binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The identifier text
    pub name: String,

    /// Character offset of the name in the source
    pub offset: usize,
}

/// Member access.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    /// The object being accessed
    pub object: Box<Node>,

    /// The accessed property
    pub property: MemberProperty,
}

/// The property part of a [`MemberExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `.name`
    Named(String),

    /// `[expr]`
    Computed(Box<Node>),
}

impl MemberExpr {
    /// Whether the property is an evaluated expression (`obj[expr]`).
    pub fn is_computed(&self) -> bool {
        matches!(self.property, MemberProperty::Computed(_))
    }
}

/// Function or method invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The expression producing the function
    pub callee: Box<Node>,

    /// Arguments in source order
    pub arguments: Vec<Node>,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Minus,
    /// `+x`
    Plus,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `typeof x`
    Typeof,
    /// `void x`
    Void,
    /// `delete x`
    Delete,
}

impl UnaryOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }

    /// Whether the operator is spelled as a word.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            UnaryOperator::Typeof | UnaryOperator::Void | UnaryOperator::Delete
        )
    }
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// The operator
    pub operator: UnaryOperator,

    /// The operand
    pub argument: Box<Node>,
}

/// Non-logical infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinaryOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::In => "in",
            BinaryOperator::Instanceof => "instanceof",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::UShr => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
        }
    }

    /// Binding power, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::BitOr => 3,
            BinaryOperator::BitXor => 4,
            BinaryOperator::BitAnd => 5,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::StrictEq
            | BinaryOperator::StrictNotEq => 6,
            BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::LtEq
            | BinaryOperator::GtEq
            | BinaryOperator::In
            | BinaryOperator::Instanceof => 7,
            BinaryOperator::Shl | BinaryOperator::Shr | BinaryOperator::UShr => 8,
            BinaryOperator::Add | BinaryOperator::Sub => 9,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 10,
        }
    }

    /// Whether the operator is spelled as a word.
    pub fn is_keyword(self) -> bool {
        matches!(self, BinaryOperator::In | BinaryOperator::Instanceof)
    }
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// The operator
    pub operator: BinaryOperator,

    /// Left operand
    pub left: Box<Node>,

    /// Right operand
    pub right: Box<Node>,
}

/// Short-circuit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl LogicalOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }

    /// Binding power, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            LogicalOperator::Or => 1,
            LogicalOperator::And => 2,
        }
    }
}

/// A logical expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    /// The operator
    pub operator: LogicalOperator,

    /// Left operand, always evaluated
    pub left: Box<Node>,

    /// Right operand, evaluated only when the left does not decide
    pub right: Box<Node>,
}

/// A ternary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    /// The condition
    pub test: Box<Node>,

    /// Taken when the condition is truthy
    pub consequent: Box<Node>,

    /// Taken when the condition is falsy
    pub alternate: Box<Node>,
}

/// An array literal. `None` marks an elided element.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    /// Elements in source order
    pub elements: Vec<Option<Node>>,
}

/// A sequence of top-level expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Expressions in source order
    pub body: Vec<Node>,
}

// ═══════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════

impl Node {
    /// Build an identifier node.
    pub fn identifier(name: impl Into<String>, offset: usize) -> Self {
        Node::Identifier(Identifier {
            name: name.into(),
            offset,
        })
    }

    /// Build a numeric literal node.
    pub fn number(value: f64, raw: impl Into<String>) -> Self {
        Node::Literal(Literal {
            value: LiteralValue::Number(value),
            raw: raw.into(),
        })
    }

    /// Build a non-computed member node.
    pub fn member(object: Node, name: impl Into<String>) -> Self {
        Node::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProperty::Named(name.into()),
        })
    }

    /// Build a computed member node.
    pub fn index(object: Node, property: Node) -> Self {
        Node::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(property)),
        })
    }

    /// Build a binary node.
    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Node::Binary(BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Build a logical node.
    pub fn logical(operator: LogicalOperator, left: Node, right: Node) -> Self {
        Node::Logical(LogicalExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Build a unary node.
    pub fn unary(operator: UnaryOperator, argument: Node) -> Self {
        Node::Unary(UnaryExpr {
            operator,
            argument: Box::new(argument),
        })
    }

    /// Number of nodes on the longest root-to-leaf path. This is the depth
    /// the evaluator reaches when walking the tree.
    pub fn height(&self) -> usize {
        let children = match self {
            Node::Literal(_) | Node::Identifier(_) | Node::This => 0,
            Node::Member(member) => match &member.property {
                MemberProperty::Named(_) => member.object.height(),
                MemberProperty::Computed(prop) => member.object.height().max(prop.height()),
            },
            Node::Call(call) => call
                .arguments
                .iter()
                .map(Node::height)
                .fold(call.callee.height(), usize::max),
            Node::Unary(unary) => unary.argument.height(),
            Node::Binary(bin) => bin.left.height().max(bin.right.height()),
            Node::Logical(log) => log.left.height().max(log.right.height()),
            Node::Conditional(cond) => cond
                .test
                .height()
                .max(cond.consequent.height())
                .max(cond.alternate.height()),
            Node::Array(array) => array
                .elements
                .iter()
                .flatten()
                .map(Node::height)
                .max()
                .unwrap_or(0),
            Node::Program(program) => program.body.iter().map(Node::height).max().unwrap_or(0),
        };
        children + 1
    }

    /// Human-readable name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "Literal",
            Node::Identifier(_) => "Identifier",
            Node::This => "ThisExpression",
            Node::Member(_) => "MemberExpression",
            Node::Call(_) => "CallExpression",
            Node::Unary(_) => "UnaryExpression",
            Node::Binary(_) => "BinaryExpression",
            Node::Logical(_) => "LogicalExpression",
            Node::Conditional(_) => "ConditionalExpression",
            Node::Array(_) => "ArrayExpression",
            Node::Program(_) => "Program",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Source Rendering
// ═══════════════════════════════════════════════════════════════════════

/// Renders the node back to source. Binary, logical and conditional
/// forms are parenthesised so the grouping chosen by the parser is visible.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(lit) => write!(f, "{}", lit.raw),
            Node::Identifier(id) => write!(f, "{}", id.name),
            Node::This => write!(f, "this"),
            Node::Member(member) => {
                write_chain_target(f, &member.object)?;
                match &member.property {
                    MemberProperty::Named(name) => write!(f, ".{}", name),
                    MemberProperty::Computed(prop) => write!(f, "[{}]", prop),
                }
            }
            Node::Call(call) => {
                write_chain_target(f, &call.callee)?;
                write!(f, "(")?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::Unary(unary) => {
                if unary.operator.is_keyword() {
                    write!(f, "{} {}", unary.operator.as_str(), unary.argument)
                } else {
                    write!(f, "{}{}", unary.operator.as_str(), unary.argument)
                }
            }
            Node::Binary(bin) => write!(
                f,
                "({} {} {})",
                bin.left,
                bin.operator.as_str(),
                bin.right
            ),
            Node::Logical(log) => write!(
                f,
                "({} {} {})",
                log.left,
                log.operator.as_str(),
                log.right
            ),
            Node::Conditional(cond) => write!(
                f,
                "({} ? {} : {})",
                cond.test, cond.consequent, cond.alternate
            ),
            Node::Array(array) => {
                write!(f, "[")?;
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(element) = element {
                        write!(f, "{}", element)?;
                    }
                }
                // A trailing hole needs its own comma to survive re-parsing
                if matches!(array.elements.last(), Some(None)) {
                    write!(f, ",")?;
                }
                write!(f, "]")
            }
            Node::Program(program) => {
                for (i, node) in program.body.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", node)?;
                }
                Ok(())
            }
        }
    }
}

/// The left side of `.name`, `[index]` or `(args)`. Prefix operators and
/// numeric literals bind looser than the suffix when written bare, so they
/// get a group.
fn write_chain_target(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::Unary(_) | Node::Program(_) => write!(f, "({})", node),
        Node::Literal(lit) if !matches!(lit.value, LiteralValue::String(_)) => {
            write!(f, "({})", node)
        }
        _ => write!(f, "{}", node),
    }
}
