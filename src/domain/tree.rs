//! Constituency trees.
//!
//! A [`Tree`] is a labelled node with ordered children. Terminals are leaves
//! whose label is the literal word, so a preterminal such as `(NN fool)` is a
//! node labelled `NN` with a single leaf child `fool`. Equality, ordering and
//! hashing are structural: two trees are equal when their labels, child order
//! and leaf words match.
//!
//! Trees are read from and written to Penn Treebank bracket notation:
//! `(ROOT (S (NP (PRP he)) (VP (VBZ is) (NP (DT a) (NN fool)))))`.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map, opt};
use nom::error::{Error, ErrorKind, ParseError};
use nom::multi::many0;
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::domain::error::{DomainError, DomainResult};

/// Label given to a bracketed node that carries none, e.g. `( (S ...))`.
pub const DEFAULT_ROOT_LABEL: &str = "ROOT";

/// Deepest bracket nesting accepted by the parser.
///
/// Parsing, cloning, comparing and dropping a tree all recurse per level,
/// so deeper input is rejected as malformed instead of exhausting the stack.
pub const MAX_DEPTH: usize = 256;

/// Index of a node in a template's pre-order traversal.
///
/// Positions are stable for the lifetime of one template and are the only
/// way nodes are addressed across deep copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(pub usize);

impl Position {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Tree {
    pub fn new(label: impl Into<String>, children: Vec<Tree>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// A terminal carrying a literal word.
    pub fn leaf(word: impl Into<String>) -> Self {
        Self::new(word, Vec::new())
    }

    /// A preterminal: part-of-speech tag over a single word.
    pub fn tagged(tag: impl Into<String>, word: impl Into<String>) -> Self {
        Self::new(tag, vec![Self::leaf(word)])
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Tree> {
        &mut self.children
    }

    pub fn into_children(self) -> Vec<Tree> {
        self.children
    }

    pub fn first_child(&self) -> Option<&Tree> {
        self.children.first()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The literal word, if this node is a terminal.
    pub fn word(&self) -> Option<&str> {
        self.is_leaf().then_some(self.label.as_str())
    }

    /// Nodes in pre-order (node, then children left to right).
    pub fn pre_order(&self) -> impl Iterator<Item = &Tree> + '_ {
        self.walk().map(|(_, node)| node)
    }

    /// Number of nodes, terminals included.
    pub fn size(&self) -> usize {
        self.walk().count()
    }

    /// The node at `position` in this tree's pre-order.
    pub fn node_at(&self, position: Position) -> Option<&Tree> {
        self.pre_order().nth(position.index())
    }

    /// Parent of the node at `position`, relative to `self` as root.
    pub fn parent_of(&self, position: Position) -> Option<&Tree> {
        self.walk()
            .nth(position.index())
            .and_then(|(parent, _)| parent)
    }

    /// Leaf words from left to right.
    pub fn yield_words(&self) -> Vec<&str> {
        self.pre_order().filter_map(Tree::word).collect()
    }

    /// Leaf words joined with single spaces.
    pub fn sentence(&self) -> String {
        self.pre_order().filter_map(Tree::word).join(" ")
    }

    fn walk(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![(None, self)],
        }
    }
}

/// Stack-based pre-order walk carrying each node's parent.
struct PreOrder<'a> {
    stack: Vec<(Option<&'a Tree>, &'a Tree)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (Option<&'a Tree>, &'a Tree);

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((Some(node), child));
        }
        Some((parent, node))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.label);
        }
        write!(f, "({}", self.label)?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for Tree {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        all_consuming(ws(|i| node(i, 1)))(s)
            .map(|(_, tree)| tree)
            .map_err(|e| DomainError::MalformedTree {
                input: s.trim().to_string(),
                reason: describe(e),
            })
    }
}

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

// Labels and words: anything up to whitespace or a bracket
fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')')(input)
}

fn node(input: &str, depth: usize) -> IResult<&str, Tree> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let (input, _) = ws(char('('))(input)?;
    let (rest, label) = opt(token)(input)?;
    let (rest, children) = many0(ws(alt((
        |i| node(i, depth + 1),
        map(token, |word: &str| Tree::leaf(word)),
    ))))(rest)?;
    // `(NP)` would otherwise read as the word "NP"
    if children.is_empty() {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::NonEmpty)));
    }
    let (rest, _) = ws(char(')'))(rest)?;
    Ok((
        rest,
        Tree::new(label.unwrap_or(DEFAULT_ROOT_LABEL), children),
    ))
}

fn describe(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let rest: String = e.input.chars().take(20).collect();
            match e.code {
                ErrorKind::TooLarge => format!("nesting too deep (more than {MAX_DEPTH} levels)"),
                ErrorKind::NonEmpty => format!("constituent without children near {rest:?}"),
                code if rest.is_empty() => format!("{code:?} at end of input"),
                code => format!("{code:?} near {rest:?}"),
            }
        }
    }
}
