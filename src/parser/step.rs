use indexmap::IndexMap;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    /// Numeric view of the value; integers widen to `f64`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StepValue::Real(f) => Some(*f),
            StepValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<&str> {
        match self.values.get(index) {
            Some(StepValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn reference_at(&self, index: usize) -> Option<u64> {
        match self.values.get(index) {
            Some(StepValue::Reference(id)) => Some(*id),
            _ => None,
        }
    }

    /// References held in a list attribute. Non-reference items are skipped.
    #[must_use]
    pub fn references_at(&self, index: usize) -> Vec<u64> {
        match self.values.get(index) {
            Some(StepValue::List(list)) => list
                .iter()
                .filter_map(|item| match item {
                    StepValue::Reference(id) => Some(*id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn number_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(StepValue::as_number)
    }
}

/// A parsed STEP physical file. Entities keep the order they appear in the
/// DATA section, so every enumeration over them is deterministic per file.
#[derive(Debug)]
pub struct StepFile {
    pub entities: IndexMap<u64, StepEntity>,
    pub schema: String,
}

impl StepFile {
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entities = IndexMap::new();
        let mut schema = String::new();
        let mut in_data = false;
        let mut saw_data = false;

        for statement in split_statements(content) {
            // Parse schema
            if statement.starts_with("FILE_SCHEMA") {
                if let Some(start) = statement.find("('") {
                    if let Some(end) = statement[start + 2..].find('\'') {
                        schema = statement[start + 2..start + 2 + end].to_string();
                    }
                }
                continue;
            }

            if statement == "DATA" {
                in_data = true;
                saw_data = true;
                continue;
            }
            if statement == "ENDSEC" {
                in_data = false;
                continue;
            }

            if in_data && statement.starts_with('#') {
                if let Some(entity) = Self::parse_entity(&statement) {
                    entities.insert(entity.id, entity);
                }
            }
        }

        if !saw_data {
            return Err(ParseError::InvalidStep {
                message: "missing DATA section".to_string(),
            });
        }

        Ok(StepFile { entities, schema })
    }

    fn parse_entity(statement: &str) -> Option<StepEntity> {
        // Format: #123=IFCWALL('guid',#ref,'name',...)
        let eq_pos = statement.find('=')?;
        let id: u64 = statement[1..eq_pos].trim().parse().ok()?;

        let rest = statement[eq_pos + 1..].trim();
        let paren_pos = rest.find('(')?;
        let entity_type = rest[..paren_pos].trim().to_ascii_uppercase();
        // Complex instances like #5=(IFCA()IFCB()) carry no simple type name
        if entity_type.is_empty() {
            return None;
        }

        let values_str = rest[paren_pos + 1..].strip_suffix(')')?;
        let values = Self::parse_values(values_str);

        Some(StepEntity {
            id,
            entity_type,
            values,
        })
    }

    fn parse_values(s: &str) -> Vec<StepValue> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut paren_depth = 0;

        for ch in s.chars() {
            match ch {
                '\'' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '(' if !in_string => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' if !in_string => {
                    paren_depth -= 1;
                    current.push(ch);
                }
                ',' if !in_string && paren_depth == 0 => {
                    values.push(Self::parse_single_value(current.trim()));
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if !current.trim().is_empty() {
            values.push(Self::parse_single_value(current.trim()));
        }

        values
    }

    fn parse_single_value(s: &str) -> StepValue {
        let s = s.trim();

        if s == "$" {
            return StepValue::Null;
        }
        if s == "*" {
            return StepValue::Derived;
        }
        if let Some(stripped) = s.strip_prefix('#') {
            if let Ok(id) = stripped.parse::<u64>() {
                return StepValue::Reference(id);
            }
        }
        if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
            let raw = &s[1..s.len() - 1];
            return StepValue::String(decode_step_string(raw));
        }
        if s.len() >= 2 && s.starts_with('.') && s.ends_with('.') {
            let inner = &s[1..s.len() - 1];
            if inner == "T" {
                return StepValue::Boolean(true);
            }
            if inner == "F" {
                return StepValue::Boolean(false);
            }
            return StepValue::Enum(inner.to_string());
        }
        if s.starts_with('(') && s.ends_with(')') {
            let inner = &s[1..s.len() - 1];
            return StepValue::List(Self::parse_values(inner));
        }
        if let Ok(i) = s.parse::<i64>() {
            return StepValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return StepValue::Real(f);
        }
        // Typed value like IFCVOLUMEMEASURE(2.5) or IFCBOOLEAN(.T.)
        if let Some(paren_pos) = s.find('(') {
            if s.ends_with(')') {
                let inner = &s[paren_pos + 1..s.len() - 1];
                return Self::parse_single_value(inner);
            }
        }

        StepValue::String(s.to_string())
    }

    #[must_use]
    pub fn get_entity(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    #[must_use]
    pub fn get_entities_by_type(&self, entity_type: &str) -> Vec<&StepEntity> {
        self.entities
            .values()
            .filter(|e| e.entity_type == entity_type)
            .collect()
    }
}

/// Split STEP content into `;`-terminated statements.
///
/// Statements may span several lines. Semicolons inside quoted strings and
/// `/* ... */` comments are ignored; line breaks outside strings are dropped.
fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_string = !in_string;
                current.push(ch);
            }
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ';' if !in_string => {
                let statement = current.trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                current.clear();
            }
            '\n' | '\r' if !in_string => {}
            _ => current.push(ch),
        }
    }

    statements
}

/// Decode STEP/IFC encoded strings with Unicode escape sequences.
/// Supports:
/// - `\X2\XXXX\X0\` - 2-byte Unicode (BMP), can have multiple 4-char hex codes
/// - `\X\XX` - 1-byte ISO 8859-1
/// - `\\` - escaped backslash
/// - `''` - escaped apostrophe
fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('X') => {
                    chars.next(); // consume 'X'
                    match chars.peek() {
                        Some('2') => {
                            chars.next(); // consume '2'
                            chars.next(); // consume '\'

                            let mut hex = String::new();
                            while let Some(&c) = chars.peek() {
                                if c == '\\' {
                                    break;
                                }
                                hex.push(c);
                                chars.next();
                            }
                            // Skip \X0\
                            if chars.peek() == Some(&'\\') {
                                for _ in 0..4 {
                                    chars.next();
                                }
                            }
                            for chunk in hex.as_bytes().chunks(4) {
                                let decoded = std::str::from_utf8(chunk)
                                    .ok()
                                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                                    .and_then(char::from_u32);
                                if let Some(c) = decoded {
                                    result.push(c);
                                }
                            }
                        }
                        Some('\\') => {
                            chars.next(); // consume '\'
                            let hex: String = chars.by_ref().take(2).collect();
                            if let Ok(code) = u8::from_str_radix(&hex, 16) {
                                result.push(char::from(code));
                            }
                        }
                        _ => {
                            result.push('\\');
                            result.push('X');
                        }
                    }
                }
                Some('\\') => {
                    chars.next();
                    result.push('\\');
                }
                Some('S') => {
                    // \S\X - single char shift (ISO 8859-1 high bit)
                    chars.next(); // 'S'
                    chars.next(); // '\'
                    if let Some(c) = chars.next() {
                        if let Ok(low) = u8::try_from(u32::from(c)) {
                            result.push(char::from(low.wrapping_add(128)));
                        }
                    }
                }
                _ => result.push('\\'),
            }
        } else if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
            }
            result.push('\'');
        } else {
            result.push(ch);
        }
    }

    result
}
