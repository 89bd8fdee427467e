//! RcDoc-based pretty-printer with termcolor annotations for formulas.
//!
//! This module builds annotated `RcDoc<Style>` trees from [`FNode`]s and renders
//! them to a `termcolor::WriteColor` sink with width-aware layout, or to a plain string.
//!
//! Surface syntax (loosest to tightest binding):
//! `forall x: T . p`, `p <-> q`, `p -> q`, `p | q`, `p & q`, `a = b`, `a <= b`, `a < b`,
//! `a + b`, `a - b`, `a * b`, `!p`, then atoms (`x`, `true`, `3`, `f(a, b)`,
//! `ite(c, t, e)`, `to_real(a)`).

use std::io::{self, Write};

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    node::{FNode, FormulaView, NodeType},
    symbol::Symbol,
};

/// Width used when a formula is rendered on a single line (e.g. by `Display`).
pub const INLINE_WIDTH: usize = 1 << 20;

/// Cycle of colors used for parentheses, indexed by nesting depth.
const PAREN_PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Green,
    Color::White,
    Color::Yellow,
    Color::Red,
    Color::Magenta,
];

/// Annotation attached to every token of a formula document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// `,` `:` `.`
    Punct,
    /// Parenthesis at the given nesting depth.
    Paren(u8),
    /// `forall`, `exists`, `ite`, `to_real`, `true`, `false`.
    Keyword,
    /// Connective, relation and arithmetic symbols.
    Operator,
    /// Symbol names.
    Ident,
    /// Numerals.
    Constant,
    /// Sort annotations on binders.
    Type,
}

impl From<Style> for ColorSpec {
    fn from(style: Style) -> Self {
        let mut spec = ColorSpec::new();
        match style {
            Style::Punct => spec.set_dimmed(true),
            Style::Paren(depth) => spec
                .set_fg(Some(PAREN_PALETTE[depth as usize % PAREN_PALETTE.len()]))
                .set_dimmed(true),
            Style::Keyword => spec.set_fg(Some(Color::Cyan)).set_bold(true),
            Style::Operator => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            Style::Ident => spec.set_fg(Some(Color::Green)).set_bold(true),
            Style::Constant => spec.set_fg(Some(Color::Blue)),
            Style::Type => spec.set_fg(Some(Color::Magenta)),
        };
        spec
    }
}

type Doc = RcDoc<'static, Style>;

#[inline]
fn token(style: Style, text: impl Into<String>) -> Doc {
    RcDoc::text(text.into()).annotate(style)
}

#[inline]
fn punct(text: &'static str) -> Doc {
    token(Style::Punct, text)
}

#[inline]
fn keyword(text: &'static str) -> Doc {
    token(Style::Keyword, text)
}

#[inline]
fn operator(text: &'static str) -> Doc {
    token(Style::Operator, text)
}

#[inline]
fn paren(text: &'static str, depth: u8) -> Doc {
    token(Style::Paren(depth), text)
}

fn symbol_name(symbol: &Symbol) -> Doc {
    token(Style::Ident, symbol.name())
}

/// Binding strength of a node kind; larger binds tighter.
pub fn precedence(kind: NodeType) -> u8 {
    use NodeType::*;

    match kind {
        Forall | Exists => 0,
        Iff => 1,
        Implies => 2,
        Or => 3,
        And => 4,
        Equals | Le | Lt => 5,
        Plus | Minus => 6,
        Times => 7,
        Not => 8,
        Symbol | BoolConstant | IntConstant | RealConstant | Function | Ite | ToReal => 9,
    }
}

/// Kinds whose nested occurrences read the same without parentheses.
#[inline]
fn flattens(kind: NodeType) -> bool {
    matches!(
        kind,
        NodeType::And | NodeType::Or | NodeType::Plus | NodeType::Times | NodeType::Not
    )
}

#[inline]
fn needs_parens(child: NodeType, parent: NodeType) -> bool {
    let (child_prec, parent_prec) = (precedence(child), precedence(parent));
    child_prec < parent_prec || (child_prec == parent_prec && !(child == parent && flattens(parent)))
}

/// Document builder threading the parenthesis depth.
struct Printer {
    depth: u8,
}

impl Printer {
    fn nested(&self) -> Printer {
        Printer {
            depth: self.depth.wrapping_add(1),
        }
    }

    fn operand(&self, node: &FNode, parent: NodeType) -> Doc {
        if needs_parens(node.node_type(), parent) {
            paren("(", self.depth)
                .append(self.nested().formula(node))
                .append(paren(")", self.depth))
                .group()
        } else {
            self.formula(node)
        }
    }

    fn infix<'n>(
        &self,
        operands: impl IntoIterator<Item = &'n FNode>,
        symbol: &'static str,
        parent: NodeType,
    ) -> Doc {
        RcDoc::intersperse(
            operands.into_iter().map(|c| self.operand(c, parent)),
            RcDoc::line().append(operator(symbol)).append(RcDoc::space()),
        )
        .group()
    }

    fn call<'n>(&self, head: Doc, args: impl IntoIterator<Item = &'n FNode>) -> Doc {
        let inner = self.nested();
        head.append(paren("(", self.depth))
            .append(
                RcDoc::intersperse(
                    args.into_iter().map(|a| inner.formula(a)),
                    punct(",").append(RcDoc::line()),
                )
                .nest(2),
            )
            .append(paren(")", self.depth))
            .group()
    }

    fn binder(&self, kind: NodeType, variables: &[Symbol], body: &FNode) -> Doc {
        let quantifier = if kind == NodeType::Forall {
            "forall"
        } else {
            "exists"
        };
        let bindings = RcDoc::intersperse(
            variables.iter().map(|v| {
                symbol_name(v)
                    .append(punct(":"))
                    .append(RcDoc::space())
                    .append(token(Style::Type, v.get_type().to_string()))
            }),
            punct(",").append(RcDoc::space()),
        );
        keyword(quantifier)
            .append(RcDoc::space())
            .append(bindings)
            .append(RcDoc::space())
            .append(punct("."))
            .append(RcDoc::line())
            .append(self.operand(body, kind))
            .nest(2)
            .group()
    }

    fn formula(&self, node: &FNode) -> Doc {
        match node.view() {
            FormulaView::Symbol(s) => symbol_name(s),
            FormulaView::BoolConstant(true) => keyword("true"),
            FormulaView::BoolConstant(false) => keyword("false"),
            FormulaView::IntConstant(i) => token(Style::Constant, i.to_string()),
            FormulaView::RealConstant(r) => token(Style::Constant, r.to_string()),

            FormulaView::Not(p) => operator("!").append(self.operand(p, NodeType::Not)),
            FormulaView::And(cs) => self.infix(cs, "&", NodeType::And),
            FormulaView::Or(cs) => self.infix(cs, "|", NodeType::Or),
            FormulaView::Implies(a, b) => self.infix([a, b], "->", NodeType::Implies),
            FormulaView::Iff(a, b) => self.infix([a, b], "<->", NodeType::Iff),
            FormulaView::Ite {
                condition,
                then_branch,
                else_branch,
            } => self.call(keyword("ite"), [condition, then_branch, else_branch]),

            FormulaView::Equals(a, b) => self.infix([a, b], "=", NodeType::Equals),
            FormulaView::Le(a, b) => self.infix([a, b], "<=", NodeType::Le),
            FormulaView::Lt(a, b) => self.infix([a, b], "<", NodeType::Lt),

            FormulaView::Plus(cs) => self.infix(cs, "+", NodeType::Plus),
            FormulaView::Minus(a, b) => self.infix([a, b], "-", NodeType::Minus),
            FormulaView::Times(cs) => self.infix(cs, "*", NodeType::Times),
            FormulaView::ToReal(a) => self.call(keyword("to_real"), [a]),
            FormulaView::Function { func, args } => self.call(symbol_name(func), args),

            FormulaView::Forall { variables, body } => self.binder(NodeType::Forall, variables, body),
            FormulaView::Exists { variables, body } => self.binder(NodeType::Exists, variables, body),
        }
    }
}

/// Annotated document for `node`.
pub fn to_doc(node: &FNode) -> RcDoc<'static, Style> {
    Printer { depth: 0 }.formula(node)
}

/// Adapter from `Style` annotations to a `termcolor` sink.
struct TermcolorSink<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, W: WriteColor + Write> RenderAnnotated<'a, Style> for TermcolorSink<'_, W> {
    fn push_annotation(&mut self, style: &'a Style) -> io::Result<()> {
        self.out.set_color(&ColorSpec::from(*style))
    }

    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<W: WriteColor + Write> pretty::Render for TermcolorSink<'_, W> {
    type Error = io::Error;

    fn write_str(&mut self, text: &str) -> io::Result<usize> {
        self.out.write(text.as_bytes())
    }

    fn write_str_all(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn fail_doc(&self) -> io::Error {
        io::Error::other("formula document cannot be laid out")
    }
}

/// Lay out `doc` at `width` columns into a color-capable writer.
pub fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    doc.render_raw(width, &mut TermcolorSink { out })
}

/// Print `node` on stdout, colored when the terminal supports it.
pub fn print_colored(node: &FNode, width: usize) -> io::Result<()> {
    let stdout = StandardStream::stdout(ColorChoice::Auto);
    render_to(&to_doc(node), width, &mut stdout.lock())
}

/// Render `node` without colors.
pub fn to_plain_string(node: &FNode, width: usize) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = to_doc(node).render_fmt(width, &mut text);
    text
}

/// Width of the attached terminal, 80 columns when unknown.
pub fn terminal_width() -> usize {
    term_size::dimensions().map_or(80, |(width, _)| width)
}

/// Pretty-printing helpers available on formula nodes.
pub trait PrettyFormula {
    /// Print to stdout, colored when supported, at the terminal width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Render as a plain string wrapped at `width` columns.
    fn pretty_string(&self, width: usize) -> String;
}

impl PrettyFormula for FNode {
    fn pretty_print(&self) -> io::Result<()> {
        print_colored(self, terminal_width())
    }

    fn pretty_string(&self, width: usize) -> String {
        to_plain_string(self, width)
    }
}
