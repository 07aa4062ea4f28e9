//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token. Binary blocks
//! are billed by the provider per page or image, so they are counted as a
//! flat cost here.

use agenrp_core::request::{ContentBlock, Turn};

/// Flat estimate for one image or PDF block.
const BINARY_BLOCK_TOKENS: usize = 258;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.len().div_ceil(4)
}

/// Estimate tokens for one content block.
pub fn estimate_block_tokens(block: &ContentBlock) -> usize {
    match block {
        ContentBlock::Text { text } => estimate_tokens(text),
        ContentBlock::Binary(_) => BINARY_BLOCK_TOKENS,
    }
}

/// Estimate tokens for a turn including per-turn overhead.
///
/// Each turn costs ~4 tokens of overhead for the role tag and delimiters.
pub fn estimate_turn_tokens(turn: &Turn) -> usize {
    let overhead = 4;
    overhead + turn.blocks.iter().map(estimate_block_tokens).sum::<usize>()
}

/// Estimate tokens for a slice of turns.
pub fn estimate_turns_tokens(turns: &[Turn]) -> usize {
    turns.iter().map(estimate_turn_tokens).sum()
}
