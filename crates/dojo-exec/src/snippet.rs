//! Snippet harness: wrap a submitted solution so that calling the
//! challenge's function with one test case's input prints the result.
//!
//! A test case's input is an opaque string like `3, 4` or `"abc", [1, 2]`.
//! It is split into argument tokens, each token is rendered as a source
//! literal, and the user's code is suffixed with a single print of the
//! function call.

use crate::Language;

/// Build the runnable program for one test case.
pub fn build_snippet(
  language: Language,
  function_name: &str,
  source: &str,
  input: &str,
) -> String {
  let args = split_arguments(input)
    .iter()
    .map(|token| render_argument(token))
    .collect::<Vec<_>>()
    .join(", ");

  match language {
    Language::Javascript => {
      format!("{source}\nconsole.log({function_name}({args}));\n")
    }
    Language::Python => {
      format!("{source}\nprint({function_name}({args}))\n")
    }
  }
}

/// Split an input string into argument tokens.
///
/// A token is a bracketed group (`[...]` or `{...}`, to the first closing
/// delimiter), a quoted string (double or single quotes), or a bare run of
/// characters up to the next comma or whitespace.
fn split_arguments(input: &str) -> Vec<String> {
  let chars: Vec<char> = input.chars().collect();
  let mut tokens = Vec::new();
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    if c.is_whitespace() || c == ',' {
      i += 1;
      continue;
    }

    let token = match c {
      '[' => take_until(&chars, &mut i, ']'),
      '{' => take_until(&chars, &mut i, '}'),
      '"' => take_until(&chars, &mut i, '"'),
      '\'' => take_until(&chars, &mut i, '\''),
      _ => {
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != ',' {
          i += 1;
        }
        chars[start..i].iter().collect()
      }
    };
    tokens.push(token);
  }

  tokens
}

/// Consume from the opening delimiter at `*i` through the first `close`
/// (inclusive). An unterminated group runs to the end of input.
fn take_until(chars: &[char], i: &mut usize, close: char) -> String {
  let start = *i;
  *i += 1;
  while *i < chars.len() && chars[*i] != close {
    *i += 1;
  }
  if *i < chars.len() {
    *i += 1; // include the closing delimiter
  }
  chars[start..*i].iter().collect()
}

/// Render one token as a source literal: bracketed groups and numbers pass
/// through verbatim, quoted strings are normalised to double quotes, and
/// anything else is treated as a string.
fn render_argument(token: &str) -> String {
  if (token.starts_with('[') && token.ends_with(']'))
    || (token.starts_with('{') && token.ends_with('}'))
  {
    return token.to_owned();
  }

  if token.len() >= 2
    && ((token.starts_with('"') && token.ends_with('"'))
      || (token.starts_with('\'') && token.ends_with('\'')))
  {
    let inner = &token[1..token.len() - 1];
    return format!("\"{inner}\"");
  }

  if token.parse::<f64>().is_ok() {
    return token.to_owned();
  }

  format!("\"{token}\"")
}
