//! Finds `PHOTO` placeholder cells in the parsed grid and emits one spec per
//! token, strictly in document order. That ordering is the contract with the
//! capture and recomposition stages — nothing downstream may re-sort.

use crate::model::{PlaceholderSpec, TableGrid};
use crate::units::dxa_to_mm_opt;

const TOKEN: &str = "PHOTO";

/// All `PHOTO`/`PHOTO<N>` tokens in `text`, left to right. Matching is
/// case-sensitive substring matching; a trailing digit sequence is part of
/// the token (`PHOTO12` is one token, not `PHOTO` + `12`).
fn tokens_in(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(TOKEN) {
        let after = &rest[pos + TOKEN.len()..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        found.push(format!("{TOKEN}{}", &after[..digits]));
        rest = &after[digits..];
    }
    found
}

/// Walk tables, then rows, then cells, and emit a [`PlaceholderSpec`] for
/// every token found. An empty result is not an error — the caller decides
/// what a template without placeholders means.
pub fn extract(grid: &TableGrid) -> Vec<PlaceholderSpec> {
    let mut specs = Vec::new();
    for (ti, table) in grid.tables.iter().enumerate() {
        for (ri, row) in table.rows.iter().enumerate() {
            let height_mm = dxa_to_mm_opt(row.height_dxa);
            for (ci, cell) in row.cells.iter().enumerate() {
                for token in tokens_in(&cell.text) {
                    specs.push(PlaceholderSpec {
                        token,
                        table_index: ti,
                        row_index: ri,
                        col_index: ci,
                        width_mm: dxa_to_mm_opt(cell.width_dxa),
                        height_mm,
                    });
                }
            }
        }
    }
    log::debug!("extracted {} placeholder(s)", specs.len());
    specs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Row, Table};

    fn cell(text: &str, width_dxa: Option<u32>) -> Cell {
        Cell {
            width_dxa,
            text: text.to_string(),
        }
    }

    fn one_cell_grid(text: &str, width_dxa: Option<u32>, height_dxa: Option<u32>) -> TableGrid {
        TableGrid {
            tables: vec![Table {
                rows: vec![Row {
                    height_dxa,
                    cells: vec![cell(text, width_dxa)],
                }],
            }],
        }
    }

    #[test]
    fn numbered_token_with_dimensions() {
        let specs = extract(&one_cell_grid("PHOTO1", Some(1600), Some(800)));
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].token, "PHOTO1");
        assert_eq!(specs[0].width_mm, Some(28.22));
        assert_eq!(specs[0].height_mm, Some(14.11));
    }

    #[test]
    fn bare_token_and_surrounding_text_match() {
        let specs = extract(&one_cell_grid("site PHOTO here", Some(1600), None));
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].token, "PHOTO");
        assert_eq!(specs[0].height_mm, None);
    }

    #[test]
    fn lowercase_is_not_a_token() {
        assert!(extract(&one_cell_grid("photo1", Some(1600), Some(800))).is_empty());
    }

    #[test]
    fn empty_grid_yields_empty_list() {
        assert!(extract(&TableGrid::default()).is_empty());
    }

    #[test]
    fn order_is_table_then_row_then_column() {
        let grid = TableGrid {
            tables: vec![
                Table {
                    rows: vec![
                        Row {
                            height_dxa: None,
                            cells: vec![cell("PHOTO1", None), cell("PHOTO2", None)],
                        },
                        Row {
                            height_dxa: None,
                            cells: vec![cell("-", None), cell("PHOTO3", None)],
                        },
                    ],
                },
                Table {
                    rows: vec![Row {
                        height_dxa: None,
                        cells: vec![cell("PHOTO4", None)],
                    }],
                },
            ],
        };
        let specs = extract(&grid);
        let order: Vec<(usize, usize, usize)> = specs
            .iter()
            .map(|s| (s.table_index, s.row_index, s.col_index))
            .collect();
        assert_eq!(order, vec![(0, 0, 0), (0, 0, 1), (0, 1, 1), (1, 0, 0)]);
        assert_eq!(specs[3].token, "PHOTO4");
    }

    #[test]
    fn multiple_tokens_in_one_cell() {
        let specs = extract(&one_cell_grid("PHOTO1 PHOTO2", None, None));
        let tokens: Vec<&str> = specs.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(tokens, vec!["PHOTO1", "PHOTO2"]);
    }
}
