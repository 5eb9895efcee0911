use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    /// Literal text between this field and the next one; empty for the last field.
    pub separator: String,
}

/// Declarative description of the fixed prefix of a log line, parsed from a
/// format string such as `"<Date> <Time> <Pid> <Level> <Component>: <Content>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub format: String,
    pub content_field: String,
    pub fields: Vec<HeaderField>,
}

impl HeaderLayout {
    pub fn parse(format: &str, content_field: &str) -> Result<Self, ConfigError> {
        if format.is_empty() {
            return Err(ConfigError::EmptyHeaderFormat);
        }

        let mut fields = Vec::new();
        let mut remaining = format;
        while let Some(start) = remaining.find('<') {
            let after_open = &remaining[start + 1..];
            let end = after_open
                .find('>')
                .ok_or_else(|| ConfigError::UnclosedFieldMarker(format.to_string()))?;
            let name = &after_open[..end];
            if name.contains('<') {
                return Err(ConfigError::UnclosedFieldMarker(format.to_string()));
            }
            remaining = &after_open[end + 1..];

            // separator runs up to the next marker or the end of the format
            let sep_end = remaining.find('<').unwrap_or(remaining.len());
            fields.push(HeaderField {
                name: name.to_string(),
                separator: remaining[..sep_end].to_string(),
            });
            remaining = &remaining[sep_end..];
        }

        if fields.is_empty() {
            return Err(ConfigError::NoHeaderFields(format.to_string()));
        }

        Ok(Self {
            format: format.to_string(),
            content_field: content_field.to_string(),
            fields,
        })
    }

    /// Returns the message body of `line`.
    ///
    /// Fields before the content field are skipped by locating their
    /// separators. When a separator is missing the rest of the line is taken
    /// as the body instead of rejecting the line.
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        let mut remaining = line;
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            if field.name == self.content_field {
                return remaining.trim();
            }
            if field.separator.is_empty() || i == last {
                break;
            }
            match remaining.find(field.separator.as_str()) {
                Some(idx) => remaining = &remaining[idx + field.separator.len()..],
                None => return remaining.trim(),
            }
        }
        remaining.trim()
    }
}

/// Content extraction with an optional layout; without one the trimmed line is the body.
pub fn extract_content<'a>(layout: Option<&HeaderLayout>, line: &'a str) -> &'a str {
    match layout {
        Some(layout) => layout.extract(line),
        None => line.trim(),
    }
}
