use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fixed-width table: header, dashed separator, one line per row. Columns
/// are sized to the widest cell.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: Vec<String>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", render(headers.iter().map(|h| h.to_string()).collect()));
    println!("{}", render(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        println!("{}", render(row));
    }
}
