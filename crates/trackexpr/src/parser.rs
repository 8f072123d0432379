//! Expression parser
//!
//! A hand-written recursive-descent parser over the characters of the
//! source. Binary operators are folded with an explicit operand/operator
//! stack: an incoming operator first reduces every stacked operator that
//! binds at least as tightly, which makes all binary operators
//! left-associative.
//!
//! Top-level expressions may be separated by `;` or `,` (or simply written
//! one after another). A single expression is returned as-is; more than one
//! is wrapped in a [`Program`] node.
//!
//! Offsets in [`ParseError`] and [`Identifier`](crate::ast::Identifier)
//! count characters, not bytes.

use serde::{Deserialize, Serialize};

use crate::ast::{
    ArrayExpr, BinaryOperator, CallExpr, ConditionalExpr, Literal, LiteralValue, LogicalOperator,
    Node, Program, UnaryOperator,
};
use crate::context::DEFAULT_MAX_DEPTH;
use crate::error::ParseError;

/// Parse `source` with default options.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::new(source).parse()
}

/// Grammar switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    /// Recognise `typeof`, `void`, `delete`, `in` and `instanceof`
    pub keyword_operators: bool,

    /// Nesting ceiling for groups, arrays, calls, unary chains and ternaries
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            keyword_operators: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operator Tables
// ═══════════════════════════════════════════════════════════════════════

/// An infix operator: either a plain binary operator or a short-circuit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

impl Infix {
    fn precedence(self) -> u8 {
        match self {
            Infix::Binary(op) => op.precedence(),
            Infix::Logical(op) => op.precedence(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Infix::Binary(op) => op.as_str(),
            Infix::Logical(op) => op.as_str(),
        }
    }

    fn combine(self, left: Node, right: Node) -> Node {
        match self {
            Infix::Binary(op) => Node::binary(op, left, right),
            Infix::Logical(op) => Node::logical(op, left, right),
        }
    }
}

const SYMBOL_INFIX: &[(&str, Infix)] = &[
    ("===", Infix::Binary(BinaryOperator::StrictEq)),
    ("!==", Infix::Binary(BinaryOperator::StrictNotEq)),
    (">>>", Infix::Binary(BinaryOperator::UShr)),
    ("||", Infix::Logical(LogicalOperator::Or)),
    ("&&", Infix::Logical(LogicalOperator::And)),
    ("==", Infix::Binary(BinaryOperator::Eq)),
    ("!=", Infix::Binary(BinaryOperator::NotEq)),
    ("<=", Infix::Binary(BinaryOperator::LtEq)),
    (">=", Infix::Binary(BinaryOperator::GtEq)),
    ("<<", Infix::Binary(BinaryOperator::Shl)),
    (">>", Infix::Binary(BinaryOperator::Shr)),
    ("|", Infix::Binary(BinaryOperator::BitOr)),
    ("^", Infix::Binary(BinaryOperator::BitXor)),
    ("&", Infix::Binary(BinaryOperator::BitAnd)),
    ("<", Infix::Binary(BinaryOperator::Lt)),
    (">", Infix::Binary(BinaryOperator::Gt)),
    ("+", Infix::Binary(BinaryOperator::Add)),
    ("-", Infix::Binary(BinaryOperator::Sub)),
    ("*", Infix::Binary(BinaryOperator::Mul)),
    ("/", Infix::Binary(BinaryOperator::Div)),
    ("%", Infix::Binary(BinaryOperator::Rem)),
];

const KEYWORD_INFIX: &[(&str, Infix)] = &[
    ("instanceof", Infix::Binary(BinaryOperator::Instanceof)),
    ("in", Infix::Binary(BinaryOperator::In)),
];

const SYMBOL_PREFIX: &[(&str, UnaryOperator)] = &[
    ("-", UnaryOperator::Minus),
    ("!", UnaryOperator::Not),
    ("~", UnaryOperator::BitNot),
    ("+", UnaryOperator::Plus),
];

const KEYWORD_PREFIX: &[(&str, UnaryOperator)] = &[
    ("typeof", UnaryOperator::Typeof),
    ("delete", UnaryOperator::Delete),
    ("void", UnaryOperator::Void),
];

// ═══════════════════════════════════════════════════════════════════════
// Character Classes
// ═══════════════════════════════════════════════════════════════════════

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

// ═══════════════════════════════════════════════════════════════════════
// Parser
// ═══════════════════════════════════════════════════════════════════════

/// Single-use parser over one source string.
#[derive(Debug)]
pub struct Parser {
    chars: Vec<char>,
    index: usize,
    depth: usize,
    options: ParserOptions,
}

impl Parser {
    /// Create a parser with default options.
    pub fn new(source: &str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(source: &str, options: ParserOptions) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            depth: 0,
            options,
        }
    }

    /// Parse the whole source.
    ///
    /// Empty input (or input made only of separators) yields an empty
    /// [`Program`].
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == ';' || c == ',' {
                self.index += 1;
                continue;
            }
            match self.gobble_expression()? {
                Some(node) => nodes.push(node),
                None => {
                    // Trailing whitespace is not an expression
                    if let Some(c) = self.peek() {
                        return Err(self.error(format!("Unexpected \"{}\"", c)));
                    }
                }
            }
        }

        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Ok(Node::Program(Program { body: nodes }))
        }
    }

    // ───────────────────────────────────────────────────────────────────
    // Cursor helpers
    // ───────────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.index)
    }

    fn gobble_spaces(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.index += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn starts_with(&self, text: &str) -> bool {
        let mut at = self.index;
        for expected in text.chars() {
            if self.peek_at(at) != Some(expected) {
                return false;
            }
            at += 1;
        }
        true
    }

    /// Operators spelled with identifier characters must not run into a
    /// following identifier character, so `typeofx` stays a name. An
    /// operator that ends the input is rejected as well.
    fn respects_identifier_boundary(&self, op: &str) -> bool {
        let first = op.chars().next().map(is_identifier_start).unwrap_or(false);
        if !first {
            return true;
        }
        let end = self.index + op.chars().count();
        end < self.chars.len() && !self.peek_at(end).is_some_and(is_identifier_part)
    }

    /// Longest operator in `tables` matching at the cursor.
    fn match_operator<T: Copy>(&self, tables: &[&[(&'static str, T)]]) -> Option<(&'static str, T)> {
        tables
            .iter()
            .flat_map(|table| table.iter())
            .filter(|(text, _)| self.starts_with(text))
            .filter(|(text, _)| self.respects_identifier_boundary(text))
            .max_by_key(|(text, _)| text.len())
            .copied()
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error("Expression nested too deeply"));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    // ───────────────────────────────────────────────────────────────────
    // Expressions
    // ───────────────────────────────────────────────────────────────────

    /// A full expression, including the ternary form. `None` means the
    /// cursor is not at the start of an expression.
    fn gobble_expression(&mut self) -> Result<Option<Node>, ParseError> {
        self.descend()?;
        let result = self.gobble_conditional();
        self.ascend();
        result
    }

    fn gobble_conditional(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(test) = self.gobble_binary_expression()? else {
            return Ok(None);
        };
        self.gobble_spaces();
        if self.peek() != Some('?') {
            return Ok(Some(test));
        }
        self.index += 1;

        let consequent = self
            .gobble_expression()?
            .ok_or_else(|| self.error("Expected expression"))?;
        self.gobble_spaces();
        if self.peek() != Some(':') {
            return Err(self.error("Expected :"));
        }
        self.index += 1;
        let alternate = self
            .gobble_expression()?
            .ok_or_else(|| self.error("Expected expression"))?;

        Ok(Some(Node::Conditional(ConditionalExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })))
    }

    fn gobble_infix_operator(&mut self) -> Option<Infix> {
        self.gobble_spaces();
        let found = if self.options.keyword_operators {
            self.match_operator(&[SYMBOL_INFIX, KEYWORD_INFIX])
        } else {
            self.match_operator(&[SYMBOL_INFIX])
        };
        let (text, op) = found?;
        self.index += text.chars().count();
        Some(op)
    }

    fn gobble_binary_expression(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(first) = self.gobble_token()? else {
            return Ok(None);
        };

        // Operands carry their tree height so folding can enforce the ceiling
        let height = first.height();
        let mut operands = vec![(first, height)];
        let mut operators: Vec<Infix> = Vec::new();

        while let Some(op) = self.gobble_infix_operator() {
            while let Some(&top) = operators.last() {
                if op.precedence() > top.precedence() {
                    break;
                }
                operators.pop();
                self.reduce(&mut operands, top)?;
            }

            let right = self
                .gobble_token()?
                .ok_or_else(|| self.error(format!("Expected expression after {}", op.as_str())))?;
            let height = right.height();
            operators.push(op);
            operands.push((right, height));
        }

        while let Some(op) = operators.pop() {
            self.reduce(&mut operands, op)?;
        }
        Ok(operands.pop().map(|(node, _)| node))
    }

    /// Fold the two topmost operands with `op`.
    fn reduce(&self, operands: &mut Vec<(Node, usize)>, op: Infix) -> Result<(), ParseError> {
        if let (Some((right, rh)), Some((left, lh))) = (operands.pop(), operands.pop()) {
            let height = lh.max(rh) + 1;
            self.check_height(height)?;
            operands.push((op.combine(left, right), height));
        }
        Ok(())
    }

    /// A tree of `height` built at the current nesting level must stay
    /// within the ceiling the evaluator enforces. The outermost expression
    /// level is the tree's own root.
    fn check_height(&self, height: usize) -> Result<(), ParseError> {
        if self.depth.saturating_sub(1) + height > self.options.max_depth {
            return Err(self.error("Expression nested too deeply"));
        }
        Ok(())
    }

    /// One operand: a literal, array, unary application or variable chain.
    fn gobble_token(&mut self) -> Result<Option<Node>, ParseError> {
        self.gobble_spaces();
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        if c.is_ascii_digit() || c == '.' {
            return self.gobble_numeric_literal().map(Some);
        }
        if c == '\'' || c == '"' {
            let literal = self.gobble_string_literal()?;
            return self.gobble_postfix(literal).map(Some);
        }
        if c == '[' {
            let array = self.gobble_array()?;
            return self.gobble_postfix(array).map(Some);
        }

        let prefix = if self.options.keyword_operators {
            self.match_operator(&[SYMBOL_PREFIX, KEYWORD_PREFIX])
        } else {
            self.match_operator(&[SYMBOL_PREFIX])
        };
        if let Some((text, op)) = prefix {
            self.index += text.chars().count();
            self.descend()?;
            let argument = self.gobble_token();
            self.ascend();
            let argument =
                argument?.ok_or_else(|| self.error(format!("Expected expression after {}", text)))?;
            return Ok(Some(Node::unary(op, argument)));
        }

        if is_identifier_start(c) || c == '(' {
            return self.gobble_variable().map(Some);
        }
        Ok(None)
    }

    // ───────────────────────────────────────────────────────────────────
    // Literals
    // ───────────────────────────────────────────────────────────────────

    fn gobble_digits(&mut self, into: &mut String) {
        while let Some(d) = self.peek().filter(char::is_ascii_digit) {
            into.push(d);
            self.index += 1;
        }
    }

    fn gobble_numeric_literal(&mut self) -> Result<Node, ParseError> {
        let mut number = String::new();
        self.gobble_digits(&mut number);

        if self.peek() == Some('.') {
            number.push('.');
            self.index += 1;
            self.gobble_digits(&mut number);
        }

        if number == "." {
            self.index -= 1;
            return Err(self.error("Unexpected period"));
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            number.push(e);
            self.index += 1;
            if let Some(sign @ ('+' | '-')) = self.peek() {
                number.push(sign);
                self.index += 1;
            }
            let before = number.len();
            self.gobble_digits(&mut number);
            if number.len() == before {
                let next = self.peek().map(String::from).unwrap_or_default();
                return Err(self.error(format!("Expected exponent ({}{})", number, next)));
            }
        }

        match self.peek() {
            Some(c) if is_identifier_start(c) => {
                return Err(self.error(format!(
                    "Variable names cannot start with a number ({}{})",
                    number, c
                )));
            }
            Some('.') => return Err(self.error("Unexpected period")),
            _ => {}
        }

        let value = number.parse::<f64>().unwrap_or(f64::NAN);
        Ok(Node::number(value, number))
    }

    fn gobble_string_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.index;
        let quote = self.chars[self.index];
        self.index += 1;

        let mut text = String::new();
        let mut closed = false;
        while let Some(c) = self.peek() {
            self.index += 1;
            if c == quote {
                closed = true;
                break;
            }
            if c != '\\' {
                text.push(c);
                continue;
            }
            let Some(escaped) = self.peek() else {
                break;
            };
            self.index += 1;
            text.push(match escaped {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'b' => '\u{8}',
                'f' => '\u{c}',
                'v' => '\u{b}',
                other => other,
            });
        }

        if !closed {
            return Err(self.error(format!("Unclosed quote after \"{}\"", text)));
        }

        Ok(Node::Literal(Literal {
            value: LiteralValue::String(text),
            raw: self.slice(start, self.index),
        }))
    }

    fn gobble_array(&mut self) -> Result<Node, ParseError> {
        self.index += 1;
        self.descend()?;
        let elements = self.gobble_arguments(']');
        self.ascend();
        Ok(Node::Array(ArrayExpr { elements: elements? }))
    }

    // ───────────────────────────────────────────────────────────────────
    // Names and postfix chains
    // ───────────────────────────────────────────────────────────────────

    /// Read a raw identifier, returning its text and start offset.
    fn gobble_identifier_name(&mut self) -> Result<(String, usize), ParseError> {
        let start = self.index;
        match self.peek() {
            Some(c) if is_identifier_start(c) => self.index += 1,
            Some(c) => return Err(self.error(format!("Unexpected {}", c))),
            None => return Err(self.error("Unexpected end of expression")),
        }
        while self.peek().is_some_and(is_identifier_part) {
            self.index += 1;
        }
        Ok((self.slice(start, self.index), start))
    }

    fn gobble_identifier(&mut self) -> Result<Node, ParseError> {
        let (name, offset) = self.gobble_identifier_name()?;
        let literal = |value| {
            Node::Literal(Literal {
                value,
                raw: name.clone(),
            })
        };
        Ok(match name.as_str() {
            "true" => literal(LiteralValue::Bool(true)),
            "false" => literal(LiteralValue::Bool(false)),
            "null" => literal(LiteralValue::Null),
            "this" => Node::This,
            _ => Node::identifier(name.clone(), offset),
        })
    }

    fn gobble_variable(&mut self) -> Result<Node, ParseError> {
        let node = if self.peek() == Some('(') {
            self.gobble_group()?
        } else {
            self.gobble_identifier()?
        };
        self.gobble_postfix(node)
    }

    /// Member, index and call suffixes applied to `node`.
    fn gobble_postfix(&mut self, mut node: Node) -> Result<Node, ParseError> {
        let mut height = node.height();
        self.gobble_spaces();
        while let Some(c @ ('.' | '[' | '(')) = self.peek() {
            self.index += 1;
            node = match c {
                '.' => {
                    self.gobble_spaces();
                    let (name, _) = self.gobble_identifier_name()?;
                    height += 1;
                    Node::member(node, name)
                }
                '[' => {
                    let property = self
                        .gobble_expression()?
                        .ok_or_else(|| self.error("Expected expression"))?;
                    self.gobble_spaces();
                    if self.peek() != Some(']') {
                        return Err(self.error("Unclosed ["));
                    }
                    self.index += 1;
                    height = height.max(property.height()) + 1;
                    Node::index(node, property)
                }
                _ => {
                    self.descend()?;
                    let arguments = self.gobble_arguments(')');
                    self.ascend();
                    let arguments = arguments?
                        .into_iter()
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| self.error("Unexpected token ,"))?;
                    height = arguments.iter().map(Node::height).fold(height, usize::max) + 1;
                    Node::Call(CallExpr {
                        callee: Box::new(node),
                        arguments,
                    })
                }
            };
            self.check_height(height)?;
            self.gobble_spaces();
        }
        Ok(node)
    }

    fn gobble_group(&mut self) -> Result<Node, ParseError> {
        self.index += 1;
        let node = self
            .gobble_expression()?
            .ok_or_else(|| self.error("Expected expression"))?;
        self.gobble_spaces();
        if self.peek() != Some(')') {
            return Err(self.error("Unclosed ("));
        }
        self.index += 1;
        Ok(node)
    }

    /// Comma-separated expressions up to `terminator`, which is consumed.
    /// Elided elements are only legal in array literals, where they become
    /// `None`.
    fn gobble_arguments(&mut self, terminator: char) -> Result<Vec<Option<Node>>, ParseError> {
        let allow_holes = terminator == ']';
        let mut args: Vec<Option<Node>> = Vec::new();
        let mut separators = 0usize;

        loop {
            self.gobble_spaces();
            let Some(c) = self.peek() else {
                return Err(self.error(format!("Expected {}", terminator)));
            };

            if c == terminator {
                self.index += 1;
                if !allow_holes && separators > 0 && separators >= args.len() {
                    return Err(self.error(format!("Unexpected token {}", terminator)));
                }
                return Ok(args);
            }

            if c == ',' {
                self.index += 1;
                separators += 1;
                if separators != args.len() {
                    if !allow_holes {
                        return Err(self.error("Unexpected token ,"));
                    }
                    while args.len() < separators {
                        args.push(None);
                    }
                }
                continue;
            }

            if args.len() > separators {
                return Err(self.error("Expected comma"));
            }
            match self.gobble_expression()? {
                Some(Node::Program(_)) | None => return Err(self.error("Expected comma")),
                Some(node) => args.push(Some(node)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(v: f64) -> Node {
        Node::number(v, crate::value::number_to_string(v))
    }

    fn id(name: &str, offset: usize) -> Node {
        Node::identifier(name, offset)
    }

    fn keyword_parser(src: &str) -> Parser {
        Parser::with_options(
            src,
            ParserOptions {
                keyword_operators: true,
                ..ParserOptions::default()
            },
        )
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            Node::binary(
                BinaryOperator::Add,
                num(1.0),
                Node::binary(BinaryOperator::Mul, num(2.0), num(3.0))
            )
        );
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(parse("10 - 4 - 3").unwrap().to_string(), "((10 - 4) - 3)");
        assert_eq!(parse("a || b && c").unwrap().to_string(), "(a || (b && c))");
        assert_eq!(parse("1 < 2 == true").unwrap().to_string(), "((1 < 2) == true)");
    }

    #[test]
    fn test_member_chain() {
        assert_eq!(
            parse("a['c'][0]").unwrap(),
            Node::index(
                Node::index(
                    id("a", 0),
                    Node::Literal(Literal {
                        value: LiteralValue::String("c".into()),
                        raw: "'c'".into()
                    })
                ),
                num(0.0)
            )
        );
        assert_eq!(parse("a . b").unwrap(), Node::member(id("a", 0), "b"));
    }

    #[test]
    fn test_keyword_property_names() {
        assert_eq!(parse("a.true").unwrap(), Node::member(id("a", 0), "true"));
        assert_eq!(parse("a.this").unwrap(), Node::member(id("a", 0), "this"));
    }

    #[test]
    fn test_identifier_offsets() {
        assert_eq!(parse("  foo").unwrap(), id("foo", 2));
        assert_eq!(parse("é + bar").unwrap().to_string(), "(é + bar)");
        match parse("é + bar").unwrap() {
            Node::Binary(bin) => assert_eq!(*bin.right, id("bar", 4)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse("true").unwrap(),
            Node::Literal(Literal {
                value: LiteralValue::Bool(true),
                raw: "true".into()
            })
        );
        assert_eq!(parse("this").unwrap(), Node::This);
        assert_eq!(parse(".5").unwrap(), Node::number(0.5, ".5"));
        assert_eq!(parse("1e3").unwrap(), Node::number(1000.0, "1e3"));
        assert_eq!(parse("2E-1").unwrap(), Node::number(0.2, "2E-1"));
    }

    #[test]
    fn test_string_escapes() {
        let node = parse(r#""a\n\'b\q""#).unwrap();
        match node {
            Node::Literal(Literal {
                value: LiteralValue::String(s),
                raw,
            }) => {
                assert_eq!(s, "a\n'bq");
                assert_eq!(raw, r#""a\n\'b\q""#);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_quote() {
        let err = parse("'abc").unwrap_err();
        assert_eq!(err.message, "Unclosed quote after \"abc\"");
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_number_errors() {
        assert_eq!(
            parse("123abc").unwrap_err().message,
            "Variable names cannot start with a number (123a)"
        );
        assert_eq!(parse("1e").unwrap_err().message, "Expected exponent (1e)");
        assert_eq!(parse("1.2.3").unwrap_err().message, "Unexpected period");
        assert_eq!(parse(".").unwrap_err().message, "Unexpected period");
    }

    #[test]
    fn test_array_holes() {
        assert_eq!(
            parse("[1,,3]").unwrap(),
            Node::Array(ArrayExpr {
                elements: vec![Some(num(1.0)), None, Some(num(3.0))]
            })
        );
        assert_eq!(
            parse("[,]").unwrap(),
            Node::Array(ArrayExpr {
                elements: vec![None]
            })
        );
        assert_eq!(parse("[1, ,]").unwrap().to_string(), "[1, ,]");
    }

    #[test]
    fn test_call_arguments() {
        assert_eq!(parse("f()").unwrap().to_string(), "f()");
        assert_eq!(parse("f(1, g(2))").unwrap().to_string(), "f(1, g(2))");
        assert_eq!(parse("f(1,)").unwrap_err().message, "Unexpected token )");
        assert_eq!(parse("f(,1)").unwrap_err().message, "Unexpected token ,");
        assert_eq!(parse("f(1 2)").unwrap_err().message, "Expected comma");
        assert_eq!(parse("f(1").unwrap_err().message, "Expected )");
    }

    #[test]
    fn test_program() {
        assert_eq!(
            parse("a; b, c").unwrap(),
            Node::Program(Program {
                body: vec![id("a", 0), id("b", 3), id("c", 6)]
            })
        );
        assert_eq!(parse("").unwrap(), Node::Program(Program { body: vec![] }));
        assert_eq!(parse(" ; ").unwrap(), Node::Program(Program { body: vec![] }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse("a # b").unwrap_err();
        assert_eq!(err.message, "Unexpected \"#\"");
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(parse("1 +").unwrap_err().message, "Expected expression after +");
        assert_eq!(parse("2 ** 3").unwrap_err().message, "Expected expression after *");
        assert_eq!(parse("-").unwrap_err().message, "Expected expression after -");
    }

    #[test]
    fn test_ternary() {
        assert_eq!(parse("a ? 1 : b ? 2 : 3").unwrap().to_string(), "(a ? 1 : (b ? 2 : 3))");
        assert_eq!(parse("a ? 1").unwrap_err().message, "Expected :");
        assert_eq!(parse("a ? : 1").unwrap_err().message, "Expected expression");
    }

    #[test]
    fn test_groups_and_brackets() {
        assert_eq!(parse("(1+2)*3").unwrap().to_string(), "((1 + 2) * 3)");
        assert_eq!(parse("(1").unwrap_err().message, "Unclosed (");
        assert_eq!(parse("a[1").unwrap_err().message, "Unclosed [");
        assert_eq!(parse("()").unwrap_err().message, "Expected expression");
    }

    #[test]
    fn test_unary_chain() {
        assert_eq!(parse("1 - -1").unwrap().to_string(), "(1 - -1)");
        assert_eq!(parse("!~x").unwrap().to_string(), "!~x");
    }

    #[test]
    fn test_keyword_operators_disabled_by_default() {
        // Without keyword operators `typeof` is just a name
        assert_eq!(
            parse("typeof x").unwrap(),
            Node::Program(Program {
                body: vec![id("typeof", 0), id("x", 7)]
            })
        );
        assert_eq!(parse("a in b").unwrap().to_string(), "a; in; b");
    }

    #[test]
    fn test_keyword_operators() {
        let node = keyword_parser("typeof x === 'string'").parse().unwrap();
        assert_eq!(node.to_string(), "(typeof x === 'string')");

        let node = keyword_parser("'a' in obj && obj instanceof Object").parse().unwrap();
        assert_eq!(node.to_string(), "(('a' in obj) && (obj instanceof Object))");

        let node = keyword_parser("delete a.b").parse().unwrap();
        assert_eq!(node, Node::unary(UnaryOperator::Delete, Node::member(id("a", 7), "b")));
    }

    #[test]
    fn test_keyword_boundary() {
        assert_eq!(keyword_parser("typeofx").parse().unwrap(), id("typeofx", 0));
        assert_eq!(keyword_parser("index").parse().unwrap(), id("index", 0));
        assert_eq!(
            keyword_parser("a inb").parse().unwrap(),
            Node::Program(Program {
                body: vec![id("a", 0), id("inb", 2)]
            })
        );
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        let options = ParserOptions {
            max_depth: 10,
            ..ParserOptions::default()
        };
        let err = Parser::with_options(&deep, options).parse().unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");

        let negations = format!("{}1", "-".repeat(20));
        assert!(Parser::with_options(&negations, options).parse().is_err());
        assert!(parse(&deep).is_ok());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let src = "a.b(c, [1,,d]) ? x['y'] : -z";
        assert_eq!(parse(src).unwrap(), parse(src).unwrap());
    }

    #[test]
    fn test_options_deserialize() {
        let options: ParserOptions =
            serde_json::from_str(r#"{"keywordOperators": true}"#).unwrap();
        assert!(options.keyword_operators);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
