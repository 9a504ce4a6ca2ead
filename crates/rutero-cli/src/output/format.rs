#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: &str = "  ";
const GAP: &str = "  ";
const MIN_TEXT_WIDTH: usize = 8;
const DEFAULT_WIDTH: usize = 120;
const NARROWEST_TERMINAL: usize = 40;

pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_WIDTH)
        .max(NARROWEST_TERMINAL)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| char_width(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);
    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Aligned table when it fits in `max_width`, else one labelled block per row.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }
    let budget = max_width
        .saturating_sub(INDENT.len())
        .saturating_sub(GAP.len() * (columns.len() - 1));
    match fitted_widths(columns, rows, budget) {
        Some(widths) => render_table(columns, rows, &widths),
        None => render_blocks(columns, rows, block_label),
    }
}

fn char_width(value: &str) -> usize {
    value.chars().count()
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Numbers never split, so a right-aligned column keeps its longest token.
fn floor_width(column: &Column<'_>, index: usize, rows: &[Vec<String>]) -> usize {
    let floor = char_width(column.name).max(MIN_TEXT_WIDTH);
    match column.align {
        Align::Left => floor,
        Align::Right => rows
            .iter()
            .flat_map(|row| cell(row, index).split_whitespace())
            .map(char_width)
            .fold(floor, usize::max),
    }
}

/// Shrinks the column with the most room above its floor, one char at a time,
/// until the table fits. `None` when even the floors do not fit.
fn fitted_widths(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    budget: usize,
) -> Option<Vec<usize>> {
    let floors = columns
        .iter()
        .enumerate()
        .map(|(index, column)| floor_width(column, index, rows))
        .collect::<Vec<usize>>();
    if floors.iter().sum::<usize>() > budget {
        return None;
    }

    let mut widths = columns
        .iter()
        .zip(&floors)
        .enumerate()
        .map(|(index, (column, floor))| {
            rows.iter()
                .map(|row| char_width(cell(row, index)))
                .fold(char_width(column.name), usize::max)
                .max(*floor)
        })
        .collect::<Vec<usize>>();

    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        let widest = (0..widths.len())
            .filter(|index| widths[*index] > floors[*index])
            .max_by_key(|index| (widths[*index] - floors[*index], std::cmp::Reverse(*index)))?;
        widths[widest] -= 1;
        total -= 1;
    }
    Some(widths)
}

fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut lines = vec![table_line(columns, &header, widths)];

    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap(cell(row, index), *width))
            .collect::<Vec<Vec<String>>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        for line_index in 0..height {
            let cells = wrapped
                .iter()
                .map(|chunks| chunks.get(line_index).cloned().unwrap_or_default())
                .collect::<Vec<String>>();
            lines.push(table_line(columns, &cells, widths));
        }
    }
    lines
}

fn table_line(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(cells.iter().zip(widths))
        .map(|(column, (value, width))| match column.align {
            Align::Left => format!("{value:<width$}"),
            Align::Right => format!("{value:>width$}"),
        })
        .collect::<Vec<String>>();
    format!("{INDENT}{}", pieces.join(GAP))
}

/// Word-wraps `value` to `width` chars; a word longer than a line is cut.
fn wrap(value: &str, width: usize) -> Vec<String> {
    if width == 0 || char_width(value) <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let needed = if current.is_empty() {
            char_width(word)
        } else {
            char_width(&current) + 1 + char_width(word)
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut pieces = cut_word(word, width);
        if let Some(last) = pieces.pop() {
            lines.extend(pieces);
            current = last;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn cut_word(word: &str, width: usize) -> Vec<String> {
    let chars = word.chars().collect::<Vec<char>>();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let label_width = columns
        .iter()
        .map(|column| char_width(column.name) + 1)
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{INDENT}{block_label} {}:", row_index + 1));
        for (index, column) in columns.iter().enumerate() {
            let label = format!("{}:", column.name);
            lines.push(format!(
                "{INDENT}{INDENT}{label:<label_width$}  {}",
                cell(row, index)
            ));
        }
    }
    lines
}
