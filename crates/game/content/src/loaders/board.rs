//! Board file loader.

use std::path::Path;

use anyhow::Context;
use horde_core::Board;

use crate::format::BoardLoader;
use crate::loaders::{LoadResult, read_file};

impl BoardLoader {
    /// Reads and parses a board file.
    pub fn load(path: &Path) -> LoadResult<Board> {
        let content = read_file(path)?;
        let board = Self::parse(&content)
            .with_context(|| format!("invalid board file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            width = board.width(),
            height = board.height(),
            "board loaded"
        );
        Ok(board)
    }
}
