use crate::{error::CardwrightResult, symbols::SymbolResolver};

/// One unit of a scanned string: literal text or a resolved symbol reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineElement {
    Text(String),
    Symbol(String),
}

impl InlineElement {
    /// Literal form of the element, with symbols rendered back as `{id}`.
    pub fn literal(&self) -> String {
        match self {
            InlineElement::Text(s) => s.clone(),
            InlineElement::Symbol(id) => format!("{{{id}}}"),
        }
    }
}

/// Scan `text` left to right into literal runs and symbol references.
///
/// `{` opens token capture and `}` closes it; a token the resolver knows
/// becomes [`InlineElement::Symbol`] (canonical identifier), anything else
/// stays literal braces included. An unterminated `{` at end of input is kept
/// as literal text, as is a `{` that opens inside an unclosed token.
pub fn scan(text: &str, symbols: &SymbolResolver) -> CardwrightResult<Vec<InlineElement>> {
    let mut elements = Vec::new();
    let mut run = String::new();
    let mut token = String::new();
    let mut in_token = false;

    for ch in text.chars() {
        if in_token {
            match ch {
                '}' => {
                    in_token = false;
                    match symbols.resolve(&token)? {
                        Some(glyph) => {
                            if !run.is_empty() {
                                elements.push(InlineElement::Text(std::mem::take(&mut run)));
                            }
                            elements.push(InlineElement::Symbol(glyph.identifier().to_string()));
                        }
                        None => {
                            run.push('{');
                            run.push_str(&token);
                            run.push('}');
                        }
                    }
                    token.clear();
                }
                '{' => {
                    // Orphaned opener: flush the half-captured token as
                    // literal text and restart capture.
                    run.push('{');
                    run.push_str(&token);
                    token.clear();
                }
                c => token.push(c),
            }
        } else if ch == '{' {
            in_token = true;
        } else {
            run.push(ch);
        }
    }

    if in_token {
        run.push('{');
        run.push_str(&token);
    }
    if !run.is_empty() {
        elements.push(InlineElement::Text(run));
    }

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unknown tokens never touch the filesystem, so a bogus root is enough
    // for every case that does not resolve.
    fn resolver() -> SymbolResolver {
        SymbolResolver::new("/nonexistent/symbol/root")
    }

    fn literals(elements: &[InlineElement]) -> String {
        elements.iter().map(InlineElement::literal).collect()
    }

    #[test]
    fn plain_text_is_one_run() {
        let got = scan("Lightning Bolt", &resolver()).unwrap();
        assert_eq!(got, vec![InlineElement::Text("Lightning Bolt".into())]);
    }

    #[test]
    fn empty_input_yields_no_elements() {
        assert!(scan("", &resolver()).unwrap().is_empty());
    }

    #[test]
    fn unknown_token_degrades_to_literal() {
        let got = scan("{Q}", &resolver()).unwrap();
        assert_eq!(got, vec![InlineElement::Text("{Q}".into())]);
    }

    #[test]
    fn unterminated_brace_is_literal_tail() {
        let got = scan("cost {2 and more", &resolver()).unwrap();
        assert_eq!(got, vec![InlineElement::Text("cost {2 and more".into())]);
    }

    #[test]
    fn reopened_brace_keeps_orphan_text() {
        let got = scan("{a{quux}", &resolver()).unwrap();
        assert_eq!(got, vec![InlineElement::Text("{a{quux}".into())]);
    }

    #[test]
    fn unresolvable_input_round_trips() {
        for input in ["{X}{Y}: pay {Q}", "a{b", "}{", "text only", "{}{}"] {
            let got = scan(input, &resolver()).unwrap();
            assert_eq!(literals(&got), *input, "round trip failed for {input:?}");
        }
    }
}
