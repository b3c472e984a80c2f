//! Filter DSL parser using nom.
//!
//! One expression per line:
//!
//! ```text
//! (( @age >= [30] ) AND
//! ─┬ ─┬─ ─┬ ──┬─ ┬ ─┬─
//!  │  │   │   │  │  └── Chaining key (AND / OR, joins to the next line)
//!  │  │   │   │  └── Group close markers
//!  │  │   │   └── Bracketed value (comma list for IN / NOT_IN)
//!  │  │   └── Operator
//!  │  └── Field hook
//!  └── Group open markers
//! ```
//!
//! Sorts (`name+:created_at-`) and pagination (`page:2`, `limit:10`) have their
//! own small parsers so a whole [`Criteria`] can be described as text.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{eof, opt, peek},
    sequence::delimited,
    IResult,
};
use tracing::debug;

use crate::ast::*;
use crate::error::{DafiError, DafiResult};
use crate::infer;

/// Parse filter lines into a filter sequence, one item per line.
///
/// The first line that does not match the grammar aborts the whole parse.
pub fn parse_filters<S: AsRef<str>>(lines: &[S]) -> DafiResult<Filters> {
    let mut filters = Filters::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        filters.push(parse_filter_line(i + 1, line.as_ref())?);
    }

    debug!(count = filters.len(), "parsed filter lines");
    Ok(filters)
}

/// Parse a single filter line. `line_no` is only used for error reporting.
pub fn parse_filter_line(line_no: usize, line: &str) -> DafiResult<Filter> {
    let input = line.trim();

    let parts = match parse_line(input) {
        Ok((_, parts)) => parts,
        Err(_) => return Err(DafiError::format(line_no, line)),
    };

    let operator = FilterOperator::from_token(parts.operator)?;
    let value = if operator.is_list() {
        infer::parse_in_value(parts.value)?
    } else {
        Value::String(parts.value.to_string())
    };

    let chaining_key = match parts.chain {
        Some(key) => Some(key.parse::<ChainingKey>()?),
        None => None,
    };

    Ok(Filter {
        field: parts.field.to_string(),
        operator,
        value,
        group_open: parts.group_open.len(),
        group_close: parts.group_close.len(),
        chaining_key,
    })
}

/// Raw captures of one line.
struct LineParts<'a> {
    group_open: &'a str,
    field: &'a str,
    operator: &'a str,
    value: &'a str,
    group_close: &'a str,
    chain: Option<&'a str>,
}

fn parse_line(input: &str) -> IResult<&str, LineParts<'_>> {
    let (input, group_open) = take_while(|c| c == '(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('@')(input)?;
    let (input, (field, operator)) = parse_field_and_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = parse_bracketed(input)?;
    let (input, _) = multispace0(input)?;
    let (input, group_close) = take_while(|c| c == ')')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, chain) = opt(alt((tag_no_case("AND"), tag_no_case("OR"))))(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        LineParts {
            group_open,
            field,
            operator,
            value,
            group_close,
            chain,
        },
    ))
}

/// Field names: ASCII letters and underscores.
fn parse_field(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '_')(input)
}

/// Field followed by its operator.
///
/// Word operators may follow the field with no space (`@ageIN [1]`), so the
/// letter run is shortened until the remainder starts with an operator and a
/// `[`. The longest such field wins.
fn parse_field_and_operator(input: &str) -> IResult<&str, (&str, &str)> {
    let (_, run) = parse_field(input)?;

    let mut last_err = None;
    for len in (1..=run.len()).rev() {
        let (field, rest) = input.split_at(len);
        match parse_operator_before_value(rest) {
            Ok((rest, operator)) => return Ok((rest, (field, operator))),
            Err(e) => last_err = Some(e),
        }
    }

    // run is non-empty, so at least one attempt was made
    Err(last_err.unwrap_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha))
    }))
}

/// Operator, then optional whitespace, with a `[` next (not consumed).
fn parse_operator_before_value(input: &str) -> IResult<&str, &str> {
    let (input, _) = multispace0(input)?;
    let (input, operator) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (_, _) = peek(char('['))(input)?;
    Ok((input, operator))
}

/// Operator token. Longer tokens are tried before their prefixes.
fn parse_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag_no_case("NOT_CONTAINS"),
        tag_no_case("CONTAINS"),
        tag_no_case("NOT_IN"),
        tag_no_case("IS_NOT"),
        tag_no_case("IS"),
        tag_no_case("IN"),
        tag("!="),
        tag(">="),
        tag("<="),
        tag("="),
        tag(">"),
        tag("<"),
    ))(input)
}

/// `[value]`, where value is any non-empty run without `]`.
fn parse_bracketed(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_while1(|c| c != ']'), char(']'))(input)
}

/// Parse a sort expression: `field[+|-]` items separated by `:`.
///
/// `+` sorts ascending, `-` descending; no suffix leaves the direction unspecified.
pub fn parse_sorts(expression: &str) -> DafiResult<Sorts> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Ok(Sorts::new());
    }

    expression
        .split(':')
        .map(|part| {
            let part = part.trim();
            let (field, direction) = if let Some(field) = part.strip_suffix('+') {
                (field, Some(SortDirection::Asc))
            } else if let Some(field) = part.strip_suffix('-') {
                (field, Some(SortDirection::Desc))
            } else {
                (part, None)
            };

            if field.is_empty() {
                return Err(DafiError::InvalidSort(format!(
                    "empty field in '{}'",
                    expression
                )));
            }

            Ok(Sort::new(field, direction))
        })
        .collect()
}

/// Parse `page:N` / `limit:N` parts into a pagination request.
pub fn parse_pagination<S: AsRef<str>>(parts: &[S]) -> DafiResult<Pagination> {
    let mut pagination = Pagination::default();

    for part in parts {
        let part = part.as_ref().trim();
        let Some((key, raw)) = part.split_once(':') else {
            return Err(DafiError::InvalidPagination(format!(
                "expected key:value, got '{}'",
                part
            )));
        };

        let n: u64 = raw.trim().parse().map_err(|_| {
            DafiError::InvalidPagination(format!("'{}' is not a page count", raw))
        })?;

        match key.trim() {
            "page" => pagination.page_number = n,
            "limit" => pagination.page_size = n,
            other => {
                return Err(DafiError::InvalidPagination(format!(
                    "unknown key '{}'",
                    other
                )));
            }
        }
    }

    Ok(pagination)
}

/// Parse filters, sorts and pagination into one criteria value.
pub fn parse_criteria<S: AsRef<str>, P: AsRef<str>>(
    filter_lines: &[S],
    sort_expression: &str,
    pagination_parts: &[P],
) -> DafiResult<Criteria> {
    Ok(Criteria {
        filters: parse_filters(filter_lines)?,
        sorts: parse_sorts(sort_expression)?,
        pagination: parse_pagination(pagination_parts)?,
    })
}
