//! CSS Grammar
//!
//! Thin adapter over the `cssparser` tokenizer. Turns stylesheet text into
//! selector chains and per-declaration term lists; property semantics are
//! left to the property classes.
//!
//! Supported selectors: `*`, type, `.class`, `#id`, `[attr op value]`,
//! `:pseudo-class`, compound refinement, descendant (` `) and child (`>`)
//! combinators. Anything else drops the rule with a warning.

use std::fmt;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

use crate::selector::{AttrOp, Selector};

/// One component value of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Ident(String),
    Number(f32),
    Dimension { value: f32, unit: String },
    /// `50%` is stored as `50.0`
    Percentage(f32),
    /// `#abc` without the `#`
    Hash(String),
    String(String),
    /// `name(args)`; `url(x)` is always a function with one string argument
    Function { name: String, args: Vec<Term> },
    Comma,
    Slash,
}

impl Term {
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Term::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn is_ident(&self, keyword: &str) -> bool {
        self.as_ident()
            .is_some_and(|ident| ident.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Ident(ident) => f.write_str(ident),
            Term::Number(value) => write!(f, "{value}"),
            Term::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Term::Percentage(value) => write!(f, "{value}%"),
            Term::Hash(hash) => write!(f, "#{hash}"),
            Term::String(string) => write!(f, "\"{string}\""),
            Term::Function { name, args } => {
                write!(f, "{name}(")?;
                write_terms(f, args)?;
                f.write_str(")")
            }
            Term::Comma => f.write_str(","),
            Term::Slash => f.write_str("/"),
        }
    }
}

/// Write terms space-separated, without a space before commas
pub(crate) fn write_terms(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 && *term != Term::Comma {
            f.write_str(" ")?;
        }
        write!(f, "{term}")?;
    }
    Ok(())
}

/// `name: terms [!important]`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub terms: Vec<Term>,
    pub important: bool,
}

/// Selector list and declarations of one rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
    /// 1-based source line of the rule
    pub line: u32,
}

/// Grammar-level failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    EmptySelector,
    UnsupportedCombinator,
    EmptyValue,
    /// More components of one kind than a specificity counter holds
    SpecificityOverflow,
}

type GrammarResult<'i, T> = Result<T, ParseError<'i, GrammarError>>;

/// Parse a stylesheet; malformed rules are skipped.
pub fn parse_stylesheet(css: &str) -> Vec<Rule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let line = parser.current_source_location().line + 1;
        match parse_rule(&mut parser, line) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                tracing::warn!(line, "skipping malformed rule: {:?}", e.kind);
                skip_to_next_rule(&mut parser);
            }
        }
    }

    rules
}

/// Parse a declaration list without selector, as found in inline styles.
pub fn parse_declaration_list(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declarations(&mut parser)
}

fn parse_rule<'i>(parser: &mut Parser<'i, '_>, line: u32) -> GrammarResult<'i, Rule> {
    let selectors = parser.parse_until_before(Delimiter::CurlyBracketBlock, |p| {
        p.parse_comma_separated(|p| parse_complex_selector(p))
    })?;

    parser.expect_curly_bracket_block()?;
    let declarations = parser.parse_nested_block(|p| {
        let declarations: GrammarResult<'i, Vec<Declaration>> = Ok(parse_declarations(p));
        declarations
    })?;

    Ok(Rule {
        selectors,
        declarations,
        line,
    })
}

fn skip_to_next_rule(parser: &mut Parser<'_, '_>) {
    // Blocks are skipped as a whole once the next token is requested
    while let Ok(token) = parser.next() {
        if matches!(token, Token::CurlyBracketBlock) {
            break;
        }
    }
}

#[derive(Clone, Copy)]
enum Combinator {
    Child,
    Descendant,
}

fn parse_complex_selector<'i>(parser: &mut Parser<'i, '_>) -> GrammarResult<'i, Selector> {
    parser.skip_whitespace();
    let mut selector = parse_compound_selector(parser)?;

    loop {
        let mut saw_whitespace = false;
        let combinator = loop {
            let state = parser.state();
            let token = match parser.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break None,
            };
            match token {
                Token::WhiteSpace(_) => saw_whitespace = true,
                Token::Delim('>') => break Some(Combinator::Child),
                other => {
                    if !saw_whitespace {
                        return Err(parser.new_unexpected_token_error(other));
                    }
                    parser.reset(&state);
                    break Some(Combinator::Descendant);
                }
            }
        };

        let Some(combinator) = combinator else {
            break;
        };

        parser.skip_whitespace();
        let next = parse_compound_selector(parser)?;
        let appended = match combinator {
            Combinator::Child => selector.try_append_child(next),
            Combinator::Descendant => selector.try_append_descendant(next),
        };
        selector = appended
            .map_err(|_| parser.new_custom_error(GrammarError::SpecificityOverflow))?;
    }

    Ok(selector)
}

fn parse_compound_selector<'i>(parser: &mut Parser<'i, '_>) -> GrammarResult<'i, Selector> {
    let mut compound: Option<Selector> = None;

    loop {
        let state = parser.state();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let simple = match token {
            Token::Ident(ref name) if compound.is_none() => Selector::of_type(name.to_string()),
            Token::Delim('*') if compound.is_none() => Selector::universal(),
            Token::Delim('.') => Selector::class(parser.expect_ident()?.to_string()),
            Token::IDHash(ref id) => Selector::id(id.to_string()),
            Token::Colon => Selector::pseudo_class(parser.expect_ident()?.to_string()),
            Token::SquareBracketBlock => parser.parse_nested_block(|p| parse_attribute(p))?,
            Token::Delim('+') | Token::Delim('~') => {
                return Err(parser.new_custom_error(GrammarError::UnsupportedCombinator));
            }
            _ => {
                parser.reset(&state);
                break;
            }
        };

        match compound.as_mut() {
            Some(compound) => compound
                .try_refine(simple)
                .map_err(|_| parser.new_custom_error(GrammarError::SpecificityOverflow))?,
            None => compound = Some(simple),
        }
    }

    compound.ok_or_else(|| parser.new_custom_error(GrammarError::EmptySelector))
}

fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> GrammarResult<'i, Selector> {
    let name = parser.expect_ident()?.to_string();

    let token = match parser.next() {
        Ok(token) => token.clone(),
        Err(_) => return Ok(Selector::attribute(name, AttrOp::Exists, "")),
    };
    let op = match token {
        Token::Delim('=') => AttrOp::Equals,
        Token::IncludeMatch => AttrOp::Includes,
        Token::DashMatch => AttrOp::DashMatch,
        Token::PrefixMatch => AttrOp::StartsWith,
        Token::SuffixMatch => AttrOp::EndsWith,
        Token::SubstringMatch => AttrOp::Contains,
        other => return Err(parser.new_unexpected_token_error(other)),
    };
    let value = parser.expect_ident_or_string()?.to_string();

    Ok(Selector::attribute(name, op, value))
}

fn parse_declarations<'i>(parser: &mut Parser<'i, '_>) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let line = parser.current_source_location().line + 1;
        match parser.parse_until_after(Delimiter::Semicolon, |p| parse_declaration(p)) {
            Ok(declaration) => declarations.push(declaration),
            Err(e) => tracing::warn!(line, "skipping malformed declaration: {:?}", e.kind),
        }
    }

    declarations
}

fn parse_declaration<'i>(parser: &mut Parser<'i, '_>) -> GrammarResult<'i, Declaration> {
    let name = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;

    let mut terms = Vec::new();
    let mut important = false;
    loop {
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Delim('!') => {
                parser.expect_ident_matching("important")?;
                important = true;
            }
            other => terms.push(parse_term(parser, other)?),
        }
    }

    if terms.is_empty() {
        return Err(parser.new_custom_error(GrammarError::EmptyValue));
    }

    Ok(Declaration {
        name,
        terms,
        important,
    })
}

fn parse_term<'i>(parser: &mut Parser<'i, '_>, token: Token<'i>) -> GrammarResult<'i, Term> {
    let term = match token {
        Token::Ident(ident) => Term::Ident(ident.to_string()),
        Token::Number { value, .. } => Term::Number(value),
        Token::Percentage { unit_value, .. } => Term::Percentage(unit_value * 100.0),
        Token::Dimension { value, unit, .. } => Term::Dimension {
            value,
            unit: unit.to_ascii_lowercase(),
        },
        Token::Hash(hash) | Token::IDHash(hash) => Term::Hash(hash.to_string()),
        Token::QuotedString(string) => Term::String(string.to_string()),
        Token::UnquotedUrl(url) => Term::Function {
            name: "url".to_string(),
            args: vec![Term::String(url.to_string())],
        },
        Token::Function(name) => {
            let args = parser.parse_nested_block(|p| parse_function_args(p))?;
            Term::Function {
                name: name.to_ascii_lowercase(),
                args,
            }
        }
        Token::Comma => Term::Comma,
        Token::Delim('/') => Term::Slash,
        other => return Err(parser.new_unexpected_token_error(other)),
    };
    Ok(term)
}

fn parse_function_args<'i>(parser: &mut Parser<'i, '_>) -> GrammarResult<'i, Vec<Term>> {
    let mut args = Vec::new();
    loop {
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        args.push(parse_term(parser, token)?);
    }
    Ok(args)
}
