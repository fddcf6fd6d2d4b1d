//! Block encoder
//!
//! Output layout:
//!
//! ```text
//! User:
//!   id: 1
//!   username: Andriy
//!
//! User:
//!   id: 2
//!   username: Ivan
//! ```

use super::block::Block;
use super::quoting::quote;
use crate::record::Record;

const INDENT: &str = "  ";

/// Encodes records in order
pub fn encode(records: &[Record]) -> String {
    let blocks: Vec<Block> = records.iter().map(Record::to_block).collect();
    encode_blocks(&blocks)
}

/// Encodes blocks in order, separated by blank lines
pub fn encode_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(block.schema());
        out.push_str(":\n");
        for (name, value) in block.fields() {
            out.push_str(INDENT);
            out.push_str(name);
            out.push_str(": ");
            out.push_str(&quote(value));
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let blocks = vec![
            Block::new(
                "User",
                vec![("id".into(), "1".into()), ("username".into(), "Andriy".into())],
            ),
            Block::new(
                "User",
                vec![("id".into(), "2".into()), ("username".into(), "Doe: Jr".into())],
            ),
        ];

        let text = encode_blocks(&blocks);
        assert_eq!(
            text,
            "User:\n  id: 1\n  username: Andriy\n\nUser:\n  id: 2\n  username: \"Doe: Jr\"\n"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_blocks(&[]), "");
        assert_eq!(encode(&[]), "");
    }
}
