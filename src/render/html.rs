use serde::Serialize;
use std::fmt::{self, Display, Write};

/// A fragment of HTML that is safe to emit as-is.
///
/// Only the render functions build one; any text they interpolate goes
/// through [`Escape`] or [`script_json`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub(crate) const fn from_template(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Self> for Markup {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self(iter.into_iter().map(|m| m.0).collect())
    }
}

/// Escapes its contents for text and quoted attribute positions.
pub struct Escape<T>(pub T);

impl<T: Display> Display for Escape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        write!(text, "{}", self.0)?;
        for ch in text.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#039;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// JSON for a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, where their
/// `\u` escapes mean the same thing, so no payload can close the element.
pub fn script_json<T: Serialize>(value: &T) -> Result<Markup, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(Markup(out))
}
