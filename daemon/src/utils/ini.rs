//! Parses the ini-style configuration document.
//!
//! Recognised lines are `[section]` headers and `key = value` (or `key: value`) entries.
//! Blank lines and lines starting with `#` or `;` are ignored.
//! A later entry overrides an earlier one with the same key in the same section.

use nom::branch::alt;
use nom::bytes::complete::take_till1;
use nom::character::complete::{char, space0};
use nom::combinator::{map, rest};
use nom::sequence::{delimited, separated_pair};
use nom::{Finish, IResult, Parser};
use std::collections::HashMap;

use crate::utils::ParseError;

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Section(&'a str),
    Entry(&'a str, &'a str),
}

#[derive(Debug, Default, PartialEq)]
pub struct Ini {
    sections: HashMap<String, HashMap<String, String>>,
}

fn parse_section(input: &str) -> IResult<&str, Line<'_>> {
    map(
        delimited(char('['), take_till1(|c: char| c == ']'), char(']')),
        |name: &str| Line::Section(name.trim()),
    )
    .parse(input)
}

fn parse_entry(input: &str) -> IResult<&str, Line<'_>> {
    map(
        separated_pair(
            take_till1(|c: char| c == '=' || c == ':' || c == '['),
            (alt((char('='), char(':'))), space0),
            rest,
        ),
        |(key, value): (&str, &str)| Line::Entry(key.trim(), value.trim()),
    )
    .parse(input)
}

fn parse_line(input: &str) -> IResult<&str, Line<'_>> {
    alt((parse_section, parse_entry)).parse(input)
}

impl Ini {
    /// Parses a whole document.
    ///
    /// # Errors
    /// Returns a [`ParseError`] carrying the 1-based line number of the first offending line.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut ini = Self::default();
        let mut current: Option<String> = None;

        for (line_no, line) in input.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            match parse_line(trimmed).finish() {
                Ok((_, Line::Section(name))) => {
                    ini.sections.entry(name.to_string()).or_default();
                    current = Some(name.to_string());
                }
                Ok((_, Line::Entry(key, value))) => {
                    let Some(section) = &current else {
                        return Err(ParseError::OrphanEntry(line_no + 1));
                    };
                    ini.sections
                        .entry(section.clone())
                        .or_default()
                        .insert(key.to_string(), value.to_string());
                }
                Err(_) => return Err(ParseError::InvalidLine(line_no + 1)),
            }
        }
        Ok(ini)
    }

    /// Looks up a raw value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}
