//! Lightweight inline markup used in detail texts.
//!
//! Only `**bold**` runs are recognised. An opening `**` without a closing
//! partner is kept as literal text.

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Split a detail text into plain and bold spans. Empty runs are dropped.
pub fn spans(text: &str) -> Vec<Span> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        plain.push_str(&rest[..open]);
        let bold = &after_open[..close];
        if bold.is_empty() {
            // `****` has nothing to emphasise.
            plain.push_str("****");
        } else {
            if !plain.is_empty() {
                out.push(Span::plain(std::mem::take(&mut plain)));
            }
            out.push(Span::bold(bold));
        }
        rest = &after_open[close + 2..];
    }

    plain.push_str(rest);
    if !plain.is_empty() {
        out.push(Span::plain(plain));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_runs_are_split_out() {
        assert_eq!(
            spans("**Dates :** 1789 et **1792**."),
            vec![
                Span::bold("Dates :"),
                Span::plain(" 1789 et "),
                Span::bold("1792"),
                Span::plain("."),
            ]
        );
    }

    #[test]
    fn unterminated_marker_is_literal() {
        assert_eq!(spans("a **b"), vec![Span::plain("a **b")]);
        assert_eq!(
            spans("**x** and **y"),
            vec![Span::bold("x"), Span::plain(" and **y")]
        );
    }

    #[test]
    fn plain_and_empty_inputs() {
        assert_eq!(spans("nothing special"), vec![Span::plain("nothing special")]);
        assert!(spans("").is_empty());
        assert_eq!(spans("a****b"), vec![Span::plain("a****b")]);
    }
}
