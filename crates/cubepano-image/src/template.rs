//! Frame-numbered path templates (`frame_%05d.png`).

use std::fmt;
use std::path::{Path, PathBuf};

use crate::CubemapError;

/// A path with at most one printf-style integer placeholder.
///
/// Supported placeholders are `%d`, `%Nd` (space padded) and `%0Nd` (zero
/// padded); `%%` is a literal percent sign. Without a placeholder the frame
/// index is appended to the file stem as `_N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    /// Text before the placeholder (or the whole template), unescaped.
    prefix: String,
    placeholder: Option<Placeholder>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placeholder {
    width: usize,
    zero_pad: bool,
    /// Byte offset of the `%` in `raw`.
    start: usize,
    /// Byte offset in `raw` just past the placeholder.
    end: usize,
}

impl PathTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// [`CubemapError::InvalidTemplate`] for more than one placeholder or an
    /// unsupported `%` conversion.
    pub fn parse(raw: &str) -> Result<Self, CubemapError> {
        let invalid = |reason: &str| CubemapError::InvalidTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let bytes = raw.as_bytes();
        let mut placeholder = None;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'%' {
                i += 1;
                continue;
            }
            if bytes.get(i + 1) == Some(&b'%') {
                i += 2;
                continue;
            }
            if placeholder.is_some() {
                return Err(invalid("more than one placeholder"));
            }

            let mut j = i + 1;
            let zero_pad = bytes.get(j) == Some(&b'0');
            if zero_pad {
                j += 1;
            }
            let digits_start = j;
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            if bytes.get(j) != Some(&b'd') {
                return Err(invalid("only %d, %Nd and %0Nd placeholders are supported"));
            }
            let width = if j > digits_start {
                raw[digits_start..j]
                    .parse()
                    .map_err(|_| invalid("placeholder width is too large"))?
            } else {
                0
            };

            placeholder = Some(Placeholder {
                width,
                zero_pad,
                start: i,
                end: j + 1,
            });
            i = j + 1;
        }
        let prefix = match placeholder {
            Some(p) => unescape(&raw[..p.start]),
            None => unescape(raw),
        };

        Ok(Self {
            raw: raw.to_string(),
            prefix,
            placeholder,
        })
    }

    /// `true` if the template contains a numeric placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Path for frame `index`.
    #[must_use]
    pub fn render(&self, index: u32) -> PathBuf {
        match self.placeholder {
            Some(p) => {
                let number = if p.zero_pad {
                    format!("{index:0width$}", width = p.width)
                } else {
                    format!("{index:width$}", width = p.width)
                };
                let suffix = unescape(&self.raw[p.end..]);
                PathBuf::from(format!("{}{number}{suffix}", self.prefix))
            }
            None => append_index(Path::new(&self.prefix), index),
        }
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn unescape(s: &str) -> String {
    s.replace("%%", "%")
}

/// `dir/name.ext` → `dir/name_N.ext`.
fn append_index(path: &Path, index: u32) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return PathBuf::from(format!("{}_{index}", path.display()));
    };
    let mut name = stem.to_os_string();
    name.push(format!("_{index}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
