use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use nutri_cli::pipeline::{DietResult, SourceSummary, SubstitutionsResult, UnifyResult};

pub fn print_unify_summary(result: &UnifyResult) {
    if result.dry_run {
        println!("Output: {} (dry run, nothing written)", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
    }

    let mut table = source_table(&result.sources);
    let total_rows: usize = result.sources.iter().map(|source| source.rows).sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    let stats = result.ingredient_stats;
    let mut datasets = Table::new();
    datasets.set_header(vec![
        header_cell("Dataset"),
        header_cell("Input rows"),
        header_cell("Records"),
        header_cell("Merged"),
        header_cell("Dropped"),
    ]);
    apply_table_style(&mut datasets);
    for index in 1..5 {
        align_column(&mut datasets, index, CellAlignment::Right);
    }
    datasets.add_row(vec![
        Cell::new("Ingredients"),
        Cell::new(stats.input),
        Cell::new(result.ingredients).add_attribute(Attribute::Bold),
        Cell::new(stats.merged),
        count_cell(stats.dropped_unresolvable, Color::Yellow),
    ]);
    datasets.add_row(vec![
        Cell::new("Recipes"),
        Cell::new(result.recipes + result.recipe_duplicates + result.recipe_unidentified),
        Cell::new(result.recipes).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(result.recipe_duplicates + result.recipe_unidentified, Color::Yellow),
    ]);
    println!("{datasets}");

    for path in &result.outputs {
        println!("Wrote {}", path.display());
    }
    print_errors(&result.sources);
}

pub fn print_substitutions_summary(result: &SubstitutionsResult) {
    println!("{}", source_table(&result.sources));
    println!(
        "Wrote {} ({} ingredients with substitutes)",
        result.output.display(),
        result.foods
    );
    print_errors(&result.sources);
}

pub fn print_diet_summary(result: &DietResult) {
    println!(
        "Wrote {} ({} rows, decoded as {})",
        result.output.display(),
        result.rows,
        result.encoding
    );
}

/// Compact style for listings.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn source_table(sources: &[SourceSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Encoding"),
        header_cell("Rows"),
        header_cell("Ingredients"),
        header_cell("Recipes"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for source in sources {
        let encoding = match source.encoding {
            Some(encoding) => Cell::new(encoding),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&source.file),
            encoding,
            Cell::new(source.rows),
            flag_cell(source.kind.ingredients),
            flag_cell(source.kind.recipes),
            status_cell(source),
        ]);
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn flag_cell(present: bool) -> Cell {
    if present {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn status_cell(source: &SourceSummary) -> Cell {
    match &source.error {
        Some(_) => Cell::new("skipped").fg(Color::Red),
        None if source.kind.is_unclassified() => Cell::new("ignored").fg(Color::Yellow),
        None => Cell::new("ok").fg(Color::Green),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn print_errors(sources: &[SourceSummary]) {
    let errors: Vec<&String> = sources
        .iter()
        .filter_map(|source| source.error.as_ref())
        .collect();
    if errors.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for error in errors {
        eprintln!("- {error}");
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
