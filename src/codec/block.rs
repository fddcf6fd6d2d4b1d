//! On-disk representation of one record

/// One record as stored: a schema name and ordered `field: value` pairs.
///
/// Values are raw text, already unquoted. Typing happens when a block is
/// turned into a [`Record`](crate::record::Record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    schema: String,
    fields: Vec<(String, String)>,
    /// 1-based header line in the decoded text, 0 if not decoded
    line: usize,
}

impl Block {
    /// Create a block that did not come from a file
    pub fn new(schema: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
            line: 0,
        }
    }

    pub(crate) fn at_line(schema: impl Into<String>, line: usize) -> Self {
        Self {
            schema: schema.into(),
            fields: Vec::new(),
            line,
        }
    }

    /// Schema name from the block header
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Fields in file order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Raw value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header line of the block
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.fields.push((name, value));
    }
}
