use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bars_cli::pipeline::RunResult;
use bars_model::{ClinicalDomain, GroupSummary, ResponseGrade, ScoredRecord};

/// Scored rows shown in the terminal preview.
const PREVIEW_ROWS: usize = 10;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input);
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("Patients: {}", result.rows.len());

    print_preview(&result.rows);
    print_distribution(result);
    print_group_means(result);

    let coerced: usize = result.coerced.values().sum();
    if coerced > 0 {
        println!();
        println!("Non-numeric cells treated as missing:");
        for (column, count) in &result.coerced {
            println!("- {column}: {count}");
        }
    }
    if !result.outputs.is_empty() {
        println!();
        println!("Files:");
        for path in &result.outputs {
            println!("- {}", path.display());
        }
    }
}

fn print_preview(rows: &[ScoredRecord]) {
    let mut table = Table::new();
    let mut header = vec![header_cell("Patient ID"), header_cell("Treatment")];
    header.extend(
        ClinicalDomain::ALL
            .into_iter()
            .map(|domain| header_cell(domain.score_column())),
    );
    header.extend([header_cell("Response_mean"), header_cell("Response_score")]);
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows.iter().take(PREVIEW_ROWS) {
        let mut cells = vec![
            Cell::new(row.patient_id()),
            row.treatment().map_or_else(|| dim_cell("-"), Cell::new),
        ];
        cells.extend(ClinicalDomain::ALL.into_iter().map(|domain| grade_cell(row.grade(domain))));
        cells.push(match row.response_mean {
            Some(mean) => Cell::new(format!("{mean:.2}")),
            None => dim_cell("-"),
        });
        cells.push(grade_cell(row.response_score).add_attribute(Attribute::Bold));
        table.add_row(cells);
    }
    println!();
    if rows.len() > PREVIEW_ROWS {
        println!("Scored rows (first {PREVIEW_ROWS} of {}):", rows.len());
    } else {
        println!("Scored rows:");
    }
    println!("{table}");
}

fn print_distribution(result: &RunResult) {
    let distribution = result.distribution;
    let total = distribution.total();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Response"),
        header_cell("Patients"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let categories = ResponseGrade::ALL
        .into_iter()
        .rev()
        .map(Some)
        .chain([None]);
    for grade in categories {
        let count = distribution.count(grade);
        let label = grade.map_or("Undefined (no scorable domain)", ResponseGrade::description);
        let share = if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        };
        table.add_row(vec![
            grade_label_cell(grade, label),
            Cell::new(count),
            Cell::new(format!("{share:.1}%")),
        ]);
    }
    println!();
    println!("Response distribution:");
    println!("{table}");

    let undefined: Vec<String> = result
        .undefined
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(domain, count)| format!("{} {count}", domain.prefix()))
        .collect();
    if !undefined.is_empty() {
        println!("Undefined domain scores: {}", undefined.join(", "));
    }
}

fn print_group_means(result: &RunResult) {
    if result.summaries.iter().all(GroupSummary::is_empty) {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Domain"),
        header_cell("Treatment"),
        header_cell("Mean BL"),
        header_cell("Mean FU"),
        header_cell("Patients"),
    ]);
    apply_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in &result.summaries {
        for group in &summary.groups {
            table.add_row(vec![
                Cell::new(summary.domain.prefix())
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(&group.treatment),
                Cell::new(format!("{:.2}", group.mean_before)),
                Cell::new(format!("{:.2}", group.mean_after)),
                Cell::new(group.patients),
            ]);
        }
    }
    println!();
    println!("Group means:");
    println!("{table}");
}

fn grade_color(grade: ResponseGrade) -> Color {
    match grade {
        ResponseGrade::Good => Color::Green,
        ResponseGrade::Partial => Color::Yellow,
        ResponseGrade::Poor => Color::Red,
    }
}

fn grade_cell(grade: Option<ResponseGrade>) -> Cell {
    match grade {
        Some(grade) => Cell::new(grade).fg(grade_color(grade)),
        None => dim_cell("-"),
    }
}

fn grade_label_cell(grade: Option<ResponseGrade>, label: &str) -> Cell {
    match grade {
        Some(grade) => Cell::new(label).fg(grade_color(grade)),
        None => dim_cell(label),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
