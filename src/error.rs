/// Errors raised while reading a starting position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("expected 8 board rows, got {found}")]
    RowCount { found: usize },

    #[error("row {row} has {found} cells, expected 8")]
    RowWidth { row: usize, found: usize },

    #[error("unknown cell {ch:?} at row {row}, col {col}")]
    UnknownCell { row: usize, col: usize, ch: char },

    #[error("unknown player code {0} (expected 1=black or 2=white)")]
    UnknownPlayer(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_display() {
        assert_eq!(
            SetupError::RowWidth { row: 2, found: 7 }.to_string(),
            "row 2 has 7 cells, expected 8"
        );
        assert_eq!(
            SetupError::UnknownCell {
                row: 0,
                col: 5,
                ch: '?'
            }
            .to_string(),
            "unknown cell '?' at row 0, col 5"
        );
        assert_eq!(
            SetupError::UnknownPlayer(3).to_string(),
            "unknown player code 3 (expected 1=black or 2=white)"
        );
    }
}
