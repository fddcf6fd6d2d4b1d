//! Line-oriented block decoder
//!
//! Grammar, per line after trailing whitespace is removed:
//! - empty: ignored
//! - non-indented, starting with `#`: comment, ignored
//! - non-indented `Name:`: starts a new block
//! - indented `field: value`: belongs to the current block
//!
//! Anything else is `FileCorrupted` with the offending line number.

use std::sync::Arc;

use super::block::Block;
use super::quoting::unquote;
use crate::errors::{OrmError, OrmResult};
use crate::record::Record;
use crate::schema::{is_identifier, Schema};

/// Decodes all blocks in file order
pub fn decode(text: &str) -> OrmResult<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end();

        if line.is_empty() {
            continue;
        }

        if !line.starts_with(|c: char| c == ' ' || c == '\t') {
            if line.starts_with('#') {
                continue;
            }
            blocks.push(parse_header(line, line_no)?);
            continue;
        }

        let block = blocks.last_mut().ok_or_else(|| {
            OrmError::corrupted_at(line_no, "field line outside of any block")
        })?;
        let (name, value) = parse_field(line.trim_start(), line_no)?;

        if block.get(&name).is_some() {
            return Err(OrmError::corrupted_at(
                line_no,
                format!("duplicate field '{}' in block '{}'", name, block.schema()),
            ));
        }
        block.push(name, value);
    }

    Ok(blocks)
}

/// Decodes the blocks of one schema into records, skipping other schemas
pub fn decode_records(text: &str, schema: &Arc<Schema>) -> OrmResult<Vec<Record>> {
    decode(text)?
        .iter()
        .filter(|block| block.schema() == schema.name())
        .map(|block| Record::from_block(schema, block))
        .collect()
}

fn parse_header(line: &str, line_no: usize) -> OrmResult<Block> {
    let name = line
        .strip_suffix(':')
        .filter(|name| is_identifier(name))
        .ok_or_else(|| {
            OrmError::corrupted_at(line_no, format!("expected block header, found '{}'", line))
        })?;
    Ok(Block::at_line(name, line_no))
}

fn parse_field(content: &str, line_no: usize) -> OrmResult<(String, String)> {
    let (name, rest) = content.split_once(':').ok_or_else(|| {
        OrmError::corrupted_at(line_no, format!("expected 'field: value', found '{}'", content))
    })?;

    let name = name.trim_end();
    if !is_identifier(name) {
        return Err(OrmError::corrupted_at(
            line_no,
            format!("invalid field name '{}'", name),
        ));
    }

    let value = unquote(rest.trim(), line_no)?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_input() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\n\n   \n").unwrap().is_empty());
        assert!(decode("# nothing yet\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_blocks() {
        let text = "User:\n  id: 1\n  username: Andriy\n\nUser:\n  id: 2\n  username: \"Doe: Jr\"\n";
        let blocks = decode(text).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].schema(), "User");
        assert_eq!(blocks[0].get("username"), Some("Andriy"));
        assert_eq!(blocks[0].line(), 1);
        assert_eq!(blocks[1].get("username"), Some("Doe: Jr"));
        assert_eq!(blocks[1].line(), 5);
    }

    #[test]
    fn test_decode_tolerates_whitespace() {
        let text = "User:   \r\n\tid:7   \r\n\n\n    username:   Maria  \n\n";
        let blocks = decode(text).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("id"), Some("7"));
        assert_eq!(blocks[0].get("username"), Some("Maria"));
    }

    #[test]
    fn test_header_without_fields() {
        let blocks = decode("Empty:\nUser:\n  id: 1\n").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].fields().is_empty());
    }

    #[test]
    fn test_field_before_header_is_corrupted() {
        let err = decode("  id: 1\n").unwrap_err();
        assert!(matches!(err, OrmError::FileCorrupted { line: Some(1), .. }));
    }

    #[test]
    fn test_bad_header_is_corrupted() {
        assert!(decode("User\n  id: 1\n").is_err());
        assert!(decode("User: extra\n").is_err());
        assert!(decode("- Andriy\n").is_err());
    }

    #[test]
    fn test_field_without_separator_is_corrupted() {
        let err = decode("User:\n  id 1\n").unwrap_err();
        assert!(matches!(err, OrmError::FileCorrupted { line: Some(2), .. }));
    }

    #[test]
    fn test_duplicate_field_is_corrupted() {
        let err = decode("User:\n  id: 1\n  id: 2\n").unwrap_err();
        assert!(err.to_string().contains("duplicate field 'id'"));
    }
}
