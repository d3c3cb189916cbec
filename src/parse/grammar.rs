use chrono::{NaiveDate, NaiveDateTime};
use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{Condition, Effect, Policy, Value};

use super::parser::ParsedPolicy;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

/// `2021-09-01` or `2021-09-01T10:30:00`.
fn date_literal(input: &mut &str) -> ModalResult<Value> {
    let digit = |c: char| c.is_ascii_digit();
    let date = (
        take_while(4, digit),
        '-',
        take_while(2, digit),
        '-',
        take_while(2, digit),
    )
        .take()
        .parse_next(input)?;
    let time = opt(preceded(
        'T',
        (
            take_while(2, digit),
            ':',
            take_while(2, digit),
            ':',
            take_while(2, digit),
        )
            .take(),
    ))
    .parse_next(input)?;

    let parsed = match time {
        Some(time) => {
            NaiveDateTime::parse_from_str(&format!("{date}T{time}"), "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(Value::DateTime)
        }
        None => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
    };
    parsed.ok_or_else(|| ErrMode::from_input(input).cut())
}

fn negative_number(input: &mut &str) -> ModalResult<Value> {
    let neg_str = (
        '-',
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .parse_next(input)?;
    if neg_str.contains('.') {
        let f: f64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn float_literal(input: &mut &str) -> ModalResult<f64> {
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn list_literal(input: &mut &str) -> ModalResult<Value> {
    '['.parse_next(input)?;
    let items: Vec<Value> = separated(0.., value, (ws, ',')).parse_next(input)?;
    (ws, cut_err(']')).parse_next(input)?;
    Ok(Value::List(items))
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        list_literal,
        date_literal,
        negative_number,
        float_literal.map(Value::Float),
        dec_int::<_, i64, _>.map(Value::Int),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Predicate tokens -------------------------------------------------------

/// Symbols or word tokens. Unknown words are kept and rejected at compile time.
fn predicate_token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ws.parse_next(input)?;
    alt((
        ">=",
        ">",
        "<=",
        "<",
        "==",
        "!=",
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse_next(input)
}

// -- Policies ---------------------------------------------------------------

fn condition(input: &mut &str) -> ModalResult<Condition> {
    ws.parse_next(input)?;
    let column = ident.parse_next(input)?;

    let predicate = cut_err(predicate_token)
        .context(StrContext::Expected(StrContextValue::Description(
            "predicate",
        )))
        .parse_next(input)?;

    let value = cut_err(value).parse_next(input)?;

    Ok(Condition {
        column: column.to_owned(),
        predicate: predicate.to_owned(),
        value,
    })
}

fn policy_def(input: &mut &str) -> ModalResult<ParsedPolicy> {
    ws.parse_next(input)?;
    "policy".parse_next(input)?;
    ws.parse_next(input)?;

    let resource = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "resource name",
        )))
        .parse_next(input)?;

    ws.parse_next(input)?;
    let effect = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description("effect")))
        .parse_next(input)?;

    ws.parse_next(input)?;
    cut_err('{').parse_next(input)?;
    let conditions: Vec<Condition> = repeat(0.., condition).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;

    Ok(ParsedPolicy {
        resource: resource.to_owned(),
        policy: Policy::new(Effect::from_token(effect), conditions),
    })
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_policies(input: &mut &str) -> ModalResult<Vec<ParsedPolicy>> {
    let policies: Vec<ParsedPolicy> = repeat(0.., policy_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(policies)
}
