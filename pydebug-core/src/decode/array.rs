//! Array viewer chunks: `<array>` header plus `<arraydata>` grid
//!
//! A chunk payload lists the header, the grid dimensions, and then the
//! elements row by row, each row opened by a numbered `<row>` marker:
//!
//! ```xml
//! <xml>
//!   <array slice="a" rows="2" cols="2" format=".5f" type="float64" max="4.0" min="1.0"/>
//!   <arraydata rows="2" cols="2"/>
//!   <row index="0"/>
//!   <var name="0" type="float64" value="1.0"/><var name="1" type="float64" value="2.0"/>
//!   <row index="1"/>
//!   <var name="0" type="float64" value="3.0"/><var name="1" type="float64" value="4.0"/>
//! </xml>
//! ```
//!
//! Every row transition checks that the previous row was completely filled.
//! The last row is not checked: a short final row leaves its trailing slots
//! empty instead of failing.

use super::attributes::{expect_node, read_required, read_required_int};
use super::open_reader;
use super::values::decode_value;
use crate::accessor::AccessorLink;
use crate::error::{Error, Result};
use crate::reader::TreeReader;
use crate::types::{ArrayChunk, ArrayGrid, DebugValue};

/// Decode the header and grid of an array chunk payload.
///
/// Fails with [`Error::EmptyMessage`] when the payload has no header.
pub fn parse_array_chunk(payload: &str, accessor: &AccessorLink) -> Result<ArrayChunk> {
    let mut reader = open_reader(payload, false)?;
    decode_array_chunk(&mut reader, accessor)
}

/// Decode only the header of an array chunk payload.
///
/// Returns `Ok(None)` for an empty envelope. The returned chunk has no data.
pub fn parse_array_header(payload: &str, accessor: &AccessorLink) -> Result<Option<ArrayChunk>> {
    let mut reader = open_reader(payload, false)?;
    decode_array_header(&mut reader, accessor)
}

/// Decode header and grid from the envelope under the cursor.
pub fn decode_array_chunk<R: TreeReader + ?Sized>(
    reader: &mut R,
    accessor: &AccessorLink,
) -> Result<ArrayChunk> {
    let header = decode_array_header(reader, accessor)?.ok_or_else(|| {
        Error::EmptyMessage("array payload has no <array> header".to_string())
    })?;
    let data = decode_array_data(reader, accessor)?;

    tracing::debug!(
        slice = %header.slice,
        rows = data.len(),
        cols = data.first().map(Vec::len).unwrap_or(0),
        "Decoded array chunk"
    );

    Ok(ArrayChunk {
        data: Some(data),
        ..header
    })
}

/// Decode the `<array>` header, the first child of the envelope under the
/// cursor, if there is one.
pub fn decode_array_header<R: TreeReader + ?Sized>(
    reader: &mut R,
    accessor: &AccessorLink,
) -> Result<Option<ArrayChunk>> {
    if !reader.move_down() {
        return Ok(None);
    }
    expect_node(reader, "array")?;

    let slice = read_required(reader, "slice")?;
    let rows = read_required_int(reader, "rows")?;
    let cols = read_required_int(reader, "cols")?;
    let format = format!("%{}", read_required(reader, "format")?);
    let type_name = read_required(reader, "type")?;
    let max = read_required(reader, "max")?;
    let min = read_required(reader, "min")?;
    reader.move_up();

    Ok(Some(ArrayChunk {
        value: DebugValue::slice(slice.clone(), accessor.clone()),
        slice,
        rows,
        cols,
        format,
        type_name,
        max,
        min,
        data: None,
    }))
}

/// Rebuild the element grid from the children following the header.
///
/// The `<arraydata>` dimensions are authoritative for the grid and are not
/// compared with the header's.
pub fn decode_array_data<R: TreeReader + ?Sized>(
    reader: &mut R,
    accessor: &AccessorLink,
) -> Result<ArrayGrid> {
    let mut rows = -1;
    let mut cols = -1;
    if reader.move_down() {
        expect_node(reader, "arraydata")?;
        rows = read_required_int(reader, "rows")?;
        cols = read_required_int(reader, "cols")?;
        reader.move_up();
    }
    if rows <= 0 || cols <= 0 {
        return Err(Error::InvalidDimensions { rows, cols });
    }

    let (rows, cols) = (rows as usize, cols as usize);
    // rows are filled as their markers arrive and padded to rows x cols at the end
    let mut grid = ArrayGrid::new();

    // curr_row counts <row> markers seen, so elements land in curr_row - 1
    let mut curr_row = 0usize;
    let mut curr_col = 0usize;

    while reader.move_down() {
        match reader.node_name() {
            "row" => {
                let index = read_required_int(reader, "index")?;
                if usize::try_from(index).ok() != Some(curr_row) {
                    return Err(Error::Sequence(format!(
                        "expected {} row, found {}",
                        curr_row, index
                    )));
                }
                if curr_row > 0 && curr_col != cols {
                    return Err(Error::Sequence(format!(
                        "expected {} filled columns, got {} instead",
                        cols, curr_col
                    )));
                }
                if curr_row < rows {
                    grid.push(Vec::new());
                }
                curr_row += 1;
                curr_col = 0;
            }
            "var" => {
                if curr_row == 0 {
                    return Err(Error::Sequence("<var> before the first <row>".to_string()));
                }
                if curr_row > rows {
                    return Err(Error::Sequence(format!(
                        "row {} exceeds the {} rows announced",
                        curr_row - 1,
                        rows
                    )));
                }
                if curr_col >= cols {
                    return Err(Error::Sequence(format!(
                        "row {} has more than {} columns",
                        curr_row - 1,
                        cols
                    )));
                }
                let value = decode_value(reader, accessor)?;
                grid[curr_row - 1].push(value.value);
                curr_col += 1;
            }
            other => return Err(Error::unexpected(&["var", "row"], other)),
        }
        reader.move_up();
    }

    pad_grid(&mut grid, rows, cols)?;
    Ok(grid)
}

/// Pad `grid` with empty slots up to `rows` x `cols`.
fn pad_grid(grid: &mut ArrayGrid, rows: usize, cols: usize) -> Result<()> {
    let too_large = || Error::InvalidDimensions {
        rows: rows as i32,
        cols: cols as i32,
    };

    grid.try_reserve_exact(rows - grid.len())
        .map_err(|_| too_large())?;
    grid.resize_with(rows, Vec::new);
    for row in grid.iter_mut() {
        row.try_reserve_exact(cols - row.len())
            .map_err(|_| too_large())?;
        row.resize(cols, None);
    }
    Ok(())
}
